use serde::Serialize;

use crate::target::Target;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub completed_count: usize,
    pub total_count: usize,
    pub completion_percentage: u8,
}

impl Summary {
    pub fn of(targets: &[Target]) -> Self {
        let total_count = targets.len();
        let completed_count = targets.iter().filter(|t| t.completed).count();
        let completion_percentage = if total_count == 0 {
            0
        } else {
            (completed_count as f64 / total_count as f64 * 100.0).round() as u8
        };

        Self {
            completed_count,
            total_count,
            completion_percentage,
        }
    }

    pub fn remaining(&self) -> usize {
        self.total_count - self.completed_count
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn targets(flags: &[bool]) -> Vec<Target> {
        let now = Utc::now();
        flags
            .iter()
            .enumerate()
            .map(|(idx, done)| {
                let mut t = Target::new(format!("target {idx}"), now);
                t.completed = *done;
                t
            })
            .collect()
    }

    #[test]
    fn empty_collection_is_all_zero() {
        assert_eq!(
            Summary::of(&[]),
            Summary {
                completed_count: 0,
                total_count: 0,
                completion_percentage: 0,
            }
        );
    }

    #[test]
    fn half_done_is_fifty_percent() {
        let summary = Summary::of(&targets(&[true, false, true, false]));
        assert_eq!(summary.completed_count, 2);
        assert_eq!(summary.total_count, 4);
        assert_eq!(summary.completion_percentage, 50);
        assert_eq!(summary.remaining(), 2);
    }

    #[test]
    fn percentage_rounds_to_nearest() {
        assert_eq!(Summary::of(&targets(&[true, false, false])).completion_percentage, 33);
        assert_eq!(Summary::of(&targets(&[true, true, false])).completion_percentage, 67);
        let eighth = targets(&[true, false, false, false, false, false, false, false]);
        assert_eq!(Summary::of(&eighth).completion_percentage, 13);
    }
}
