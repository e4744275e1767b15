use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::SceneError;

/// Errors from loading a scene configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(#[from] SceneError),
}

/// Construction parameters for a [`Scene`](crate::Scene).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub name: String,
    /// Viewport width in pixels.
    pub width: f32,
    /// Viewport height in pixels.
    pub height: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            name: "Main".into(),
            width: 800.0,
            height: 600.0,
        }
    }
}

impl SceneConfig {
    pub fn new(name: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
        }
    }

    /// Viewport dimensions must be finite and strictly positive.
    pub fn validate(&self) -> Result<(), SceneError> {
        validate_viewport(self.width, self.height)
    }

    /// Read a JSON config file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        tracing::debug!(path = %path.as_ref().display(), ?config, "loaded scene config");
        Ok(config)
    }
}

pub(crate) fn validate_viewport(width: f32, height: f32) -> Result<(), SceneError> {
    let ok = |v: f32| v.is_finite() && v > 0.0;
    if ok(width) && ok(height) {
        Ok(())
    } else {
        Err(SceneError::InvalidViewport { width, height })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config() {
        let c = SceneConfig::default();
        assert_eq!(c.name, "Main");
        assert_eq!((c.width, c.height), (800.0, 600.0));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn rejects_bad_viewports() {
        assert!(SceneConfig::new("s", 0.0, 600.0).validate().is_err());
        assert!(SceneConfig::new("s", 800.0, -1.0).validate().is_err());
        assert!(SceneConfig::new("s", f32::NAN, 600.0).validate().is_err());
        assert!(SceneConfig::new("s", f32::INFINITY, 600.0).validate().is_err());
    }

    #[test]
    fn partial_json_uses_defaults() {
        let c: SceneConfig = serde_json::from_str(r#"{ "name": "Title" }"#).unwrap();
        assert_eq!(c.name, "Title");
        assert_eq!(c.width, 800.0);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "name": "Level1", "width": 1280, "height": 720 }}"#).unwrap();
        let c = SceneConfig::load(file.path()).unwrap();
        assert_eq!(c, SceneConfig::new("Level1", 1280.0, 720.0));
    }

    #[test]
    fn load_rejects_invalid_viewport() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "width": 0 }}"#).unwrap();
        let err = SceneConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SceneConfig::load(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
