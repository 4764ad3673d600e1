use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single goal item.
///
/// Serialized with camelCase keys so the stored payload reads
/// `{"id", "text", "completed", "createdAt"}` with an RFC 3339 timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    pub id: String,
    pub text: String,
    pub completed: bool,
    #[serde(deserialize_with = "created_at_serde::deserialize")]
    pub created_at: DateTime<Utc>,
}

impl Target {
    /// Builds a fresh, not yet completed target. `text` must already be
    /// trimmed and non-empty.
    pub fn new(text: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text,
            completed: false,
            created_at: now,
        }
    }

    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}

/// Trims user input, returning `None` when nothing is left.
pub fn normalize_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Reads `createdAt` written either as an RFC 3339 string or as epoch
/// milliseconds. Writing always uses RFC 3339.
pub mod created_at_serde {
  use chrono::{
    DateTime,
    Utc
  };
  use serde::de::Error;
  use serde::{
    Deserialize,
    Deserializer
  };

  #[derive(Deserialize)]
  #[serde(untagged)]
  enum RawTimestamp {
    Text(String),
    Millis(i64),
    Float(f64)
  }

  pub fn deserialize<'de, D>(
    deserializer: D
  ) -> Result<DateTime<Utc>, D::Error>
  where
    D: Deserializer<'de>
  {
    let millis = match RawTimestamp::deserialize(
      deserializer
    )? {
      | RawTimestamp::Text(raw) => {
        return DateTime::parse_from_rfc3339(
          raw.trim()
        )
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(D::Error::custom);
      }
      | RawTimestamp::Millis(ms) => ms,
      | RawTimestamp::Float(ms)
        if ms.is_finite()
          && ms.fract() == 0.0 =>
      {
        ms as i64
      }
      | RawTimestamp::Float(ms) => {
        return Err(D::Error::custom(
          format!(
            "createdAt {ms} is not a whole number of milliseconds"
          )
        ));
      }
    };

    DateTime::from_timestamp_millis(millis)
      .ok_or_else(|| {
        D::Error::custom(format!(
          "createdAt {millis} is out of range"
        ))
      })
  }
}
