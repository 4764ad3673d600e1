use serde::{
  Deserialize,
  Serialize
};
use tracing::{
  debug,
  info,
  warn
};

pub const DEFAULT_STORAGE_KEY: &str =
  "dailyTargets";
pub const DEFAULT_TOAST_TIMEOUT_MS: u32 =
  4_000;
const MIN_TOAST_TIMEOUT_MS: u32 = 500;
const MAX_TOAST_TIMEOUT_MS: u32 =
  60_000;

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
#[serde(default)]
pub struct TargetifyConfig {
  pub storage_key:      String,
  pub toast_timeout_ms: u32,
  pub install_banner:   bool
}

impl Default for TargetifyConfig {
  fn default() -> Self {
    Self {
      storage_key:      DEFAULT_STORAGE_KEY
        .to_string(),
      toast_timeout_ms:
        DEFAULT_TOAST_TIMEOUT_MS,
      install_banner:   true
    }
  }
}

impl TargetifyConfig {
  #[tracing::instrument(skip(raw))]
  pub fn from_toml_str(
    raw: &str
  ) -> Result<Self, toml::de::Error> {
    let mut cfg =
      toml::from_str::<Self>(raw)?;
    cfg.sanitize();
    info!(
      storage_key = %cfg.storage_key,
      toast_timeout_ms =
        cfg.toast_timeout_ms,
      install_banner =
        cfg.install_banner,
      "loaded targetify config"
    );
    Ok(cfg)
  }

  pub fn load_or_default(
    raw: Option<&str>
  ) -> Self {
    let Some(raw) = raw else {
      debug!(
        "no config supplied; using \
         defaults"
      );
      return Self::default();
    };

    match Self::from_toml_str(raw) {
      | Ok(cfg) => cfg,
      | Err(error) => {
        warn!(
          %error,
          "failed parsing targetify \
           config; using defaults"
        );
        Self::default()
      }
    }
  }

  fn sanitize(&mut self) {
    let key =
      self.storage_key.trim();
    if key.is_empty() {
      self.storage_key =
        DEFAULT_STORAGE_KEY.to_string();
    } else if key.len()
      != self.storage_key.len()
    {
      self.storage_key =
        key.to_string();
    }

    self.toast_timeout_ms = self
      .toast_timeout_ms
      .clamp(
        MIN_TOAST_TIMEOUT_MS,
        MAX_TOAST_TIMEOUT_MS
      );
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_document_yields_defaults() {
    let cfg =
      TargetifyConfig::from_toml_str("")
        .expect("parse");
    assert_eq!(
      cfg,
      TargetifyConfig::default()
    );
    assert_eq!(
      cfg.storage_key,
      "dailyTargets"
    );
  }

  #[test]
  fn values_are_sanitized() {
    let cfg =
      TargetifyConfig::from_toml_str(
        "storage_key = \"   \"\n\
         toast_timeout_ms = 10\n\
         install_banner = false\n"
      )
      .expect("parse");
    assert_eq!(
      cfg.storage_key,
      DEFAULT_STORAGE_KEY
    );
    assert_eq!(
      cfg.toast_timeout_ms,
      MIN_TOAST_TIMEOUT_MS
    );
    assert!(!cfg.install_banner);

    let cfg =
      TargetifyConfig::from_toml_str(
        "storage_key = \" goals \"\n\
         toast_timeout_ms = 900000\n"
      )
      .expect("parse");
    assert_eq!(cfg.storage_key, "goals");
    assert_eq!(
      cfg.toast_timeout_ms,
      MAX_TOAST_TIMEOUT_MS
    );
  }

  #[test]
  fn malformed_config_falls_back() {
    let cfg =
      TargetifyConfig::load_or_default(
        Some("toast_timeout_ms = \"soon\"")
      );
    assert_eq!(
      cfg,
      TargetifyConfig::default()
    );
    assert_eq!(
      TargetifyConfig::load_or_default(
        None
      ),
      TargetifyConfig::default()
    );
  }
}
