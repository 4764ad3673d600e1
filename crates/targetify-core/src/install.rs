use std::fmt;

use tracing::{debug, info, warn};

use crate::error::InstallError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Accepted,
    Dismissed,
}

impl InstallOutcome {
    /// Parses the platform's `userChoice.outcome` string.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "accepted" => Some(Self::Accepted),
            "dismissed" => Some(Self::Dismissed),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Dismissed => "dismissed",
        }
    }
}

impl fmt::Display for InstallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallState {
    Idle,
    PromptCaptured,
    Prompting,
    Resolved(InstallOutcome),
    Dismissed,
}

/// The deferred install handle a platform hands out once per page load.
#[allow(async_fn_in_trait)]
pub trait DeferredPrompt {
    /// Stops the platform from showing its own prompt.
    fn prevent_default(&self);

    /// Shows the prompt and resolves with the user's choice.
    async fn prompt(&self) -> Result<InstallOutcome, InstallError>;
}

/// Drives the "add to home screen" banner.
///
/// Any resolved choice, accepted or dismissed, discards the single-shot
/// handle and hides the banner.
#[derive(Debug)]
pub struct InstallPromptController<P> {
    state: InstallState,
    handle: Option<P>,
}

impl<P> Default for InstallPromptController<P> {
    fn default() -> Self {
        Self {
            state: InstallState::Idle,
            handle: None,
        }
    }
}

impl<P: DeferredPrompt> InstallPromptController<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> InstallState {
        self.state
    }

    pub fn banner_visible(&self) -> bool {
        matches!(
            self.state,
            InstallState::PromptCaptured | InstallState::Prompting
        )
    }

    pub fn has_handle(&self) -> bool {
        self.handle.is_some()
    }

    /// Handles the platform's install-availability signal. Default handling
    /// is always suppressed; the handle is ignored while a prompt is open.
    pub fn capture(&mut self, handle: P) -> bool {
        handle.prevent_default();
        if self.state == InstallState::Prompting {
            warn!("install signal ignored while a prompt is open");
            return false;
        }
        self.handle = Some(handle);
        self.state = InstallState::PromptCaptured;
        info!("install prompt captured");
        true
    }

    /// Hides the banner. The stale handle is kept but never re-shown.
    pub fn dismiss(&mut self) {
        if self.state == InstallState::Prompting {
            return;
        }
        debug!(previous = ?self.state, "install banner dismissed");
        self.state = InstallState::Dismissed;
    }

    /// Takes the handle out so the prompt can be awaited without holding a
    /// borrow of the controller. Pair with [`Self::finish_install`].
    pub fn begin_install(&mut self) -> Result<P, InstallError> {
        if self.state == InstallState::Dismissed {
            return Err(InstallError::NoPrompt);
        }
        let handle = self.handle.take().ok_or(InstallError::NoPrompt)?;
        self.state = InstallState::Prompting;
        Ok(handle)
    }

    pub fn finish_install(
        &mut self,
        result: Result<InstallOutcome, InstallError>,
    ) -> Result<InstallOutcome, InstallError> {
        match &result {
            Ok(outcome) => {
                info!(%outcome, "install prompt resolved");
                self.state = InstallState::Resolved(*outcome);
            }
            Err(err) => {
                warn!(error = %err, "install prompt failed");
                self.state = InstallState::Idle;
            }
        }
        self.handle = None;
        result
    }

    pub async fn install(&mut self) -> Result<InstallOutcome, InstallError> {
        let handle = self.begin_install()?;
        let result = handle.prompt().await;
        self.finish_install(result)
    }

    /// The platform reported a completed install by other means.
    pub fn mark_installed(&mut self) {
        self.handle = None;
        self.state = InstallState::Resolved(InstallOutcome::Accepted);
        info!("app installed");
    }
}
