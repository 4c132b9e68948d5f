// crates/scrubreel-core/src/config.rs
//
// Tunables for sampling and hover preview, loadable from JSON.
// Every field has a default so a partial file (or no file) is fine.

use std::path::Path;
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use crate::helpers::geometry::PopupLayout;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrubConfig {
    /// Target number of thumbnails in the strip.
    pub thumbnail_budget: usize,
    /// Parallel sampler workers, each with its own decoder.
    pub workers:          usize,
    /// Height of strip thumbnails and hover previews.
    pub thumbnail_height: u32,
    /// Minimum spacing between two hover preview requests.
    pub throttle_ms:      u64,
    pub popup_width:      f64,
    pub popup_height:     f64,
    /// Space between the popup's bottom edge and the pointer.
    pub popup_gap:        f64,
}

impl Default for ScrubConfig {
    fn default() -> Self {
        Self {
            thumbnail_budget: 100,
            workers:          8,
            thumbnail_height: 80,
            throttle_ms:      50,
            popup_width:      202.0,
            popup_height:     108.0,
            popup_gap:        10.0,
        }
    }
}

impl ScrubConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let cfg: Self = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        cfg.validate()
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(cfg)
    }

    /// `load`, or the defaults when `path` does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("[config] {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.workers > 0,          "workers must be at least 1");
        ensure!(self.thumbnail_budget > 0, "thumbnail_budget must be at least 1");
        ensure!(self.thumbnail_height > 0, "thumbnail_height must be at least 1");
        ensure!(
            self.popup_width > 0.0 && self.popup_height > 0.0,
            "popup size must be positive"
        );
        Ok(())
    }

    pub fn throttle_window(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    pub fn popup_layout(&self) -> PopupLayout {
        PopupLayout { width: self.popup_width, height: self.popup_height, gap: self.popup_gap }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_player() {
        let c = ScrubConfig::default();
        assert_eq!(c.thumbnail_budget, 100);
        assert_eq!(c.workers, 8);
        assert_eq!(c.thumbnail_height, 80);
        assert_eq!(c.throttle_window(), Duration::from_millis(50));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{ "workers": 4, "throttle_ms": 80 }}"#).unwrap();
        let c = ScrubConfig::load(f.path()).unwrap();
        assert_eq!(c.workers, 4);
        assert_eq!(c.throttle_ms, 80);
        assert_eq!(c.thumbnail_budget, 100);
    }

    #[test]
    fn zero_workers_rejected() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{ "workers": 0 }}"#).unwrap();
        let err = ScrubConfig::load(f.path()).unwrap_err();
        assert!(format!("{err:#}").contains("workers"));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "not json").unwrap();
        assert!(ScrubConfig::load(f.path()).is_err());
    }

    #[test]
    fn missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let c = ScrubConfig::load_or_default(&dir.path().join("absent.json")).unwrap();
        assert_eq!(c, ScrubConfig::default());
    }
}
