//! Settings files and configuration fingerprints.
//!
//! A settings file is TOML or JSON, picked by extension. Every field is
//! optional; missing fields take the engine defaults.

use std::path::Path;

use candlelab_core::Settings;
use thiserror::Error;
use tracing::debug;

/// Identifier for a settings configuration (content-addressable hash).
pub type SettingsId = String;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported settings file extension '{0}' (expected .toml or .json)")]
    UnsupportedExtension(String),
}

/// Settings file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsFormat {
    Toml,
    Json,
}

impl SettingsFormat {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::UnsupportedExtension(ext)),
        }
    }
}

/// Parse settings from a TOML string.
pub fn parse_settings_toml(input: &str) -> Result<Settings, ConfigError> {
    Ok(toml::from_str(input)?)
}

/// Parse settings from a JSON string.
pub fn parse_settings_json(input: &str) -> Result<Settings, ConfigError> {
    Ok(serde_json::from_str(input)?)
}

/// Load settings from a `.toml` or `.json` file.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let format = SettingsFormat::from_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let settings = match format {
        SettingsFormat::Toml => parse_settings_toml(&content)?,
        SettingsFormat::Json => parse_settings_json(&content)?,
    };
    debug!(path = %path.display(), asset = %settings.asset, "loaded settings");
    Ok(settings)
}

/// Deterministic BLAKE3 fingerprint of a settings value.
///
/// Two settings with identical fields share a fingerprint, so sweep rows and
/// exported runs can be matched back to their configuration.
pub fn settings_fingerprint(settings: &Settings) -> SettingsId {
    let canonical = serde_json::to_vec(settings)
        .unwrap_or_else(|_| format!("{settings:?}").into_bytes());
    blake3::hash(&canonical).to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use candlelab_core::TradeType;

    #[test]
    fn toml_fills_defaults() {
        let s = parse_settings_toml(
            r#"
initialCapital = 5000.0
stopLoss = 30
tradeType = "short"
asset = "USDJPY"
useOBV = false
"#,
        )
        .unwrap();
        assert_eq!(s.initial_capital, 5000.0);
        assert_eq!(s.stop_loss, 30.0);
        assert_eq!(s.trade_type, TradeType::Short);
        assert_eq!(s.asset, "USDJPY");
        assert!(!s.use_obv);
        // untouched fields keep their defaults
        assert_eq!(s.take_profit, Settings::default().take_profit);
        assert_eq!(s.obv_period, 10);
    }

    #[test]
    fn json_accepts_obv_alias() {
        let s = parse_settings_json(r#"{"useObv": false, "obvPeriod": 4}"#).unwrap();
        assert!(!s.use_obv);
        assert_eq!(s.obv_period, 4);
    }

    #[test]
    fn toml_rejects_garbage() {
        assert!(matches!(
            parse_settings_toml("stopLoss = \"fifty\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn format_by_extension() {
        assert_eq!(
            SettingsFormat::from_path(Path::new("a/b.TOML")).unwrap(),
            SettingsFormat::Toml
        );
        assert_eq!(
            SettingsFormat::from_path(Path::new("x.json")).unwrap(),
            SettingsFormat::Json
        );
        assert!(matches!(
            SettingsFormat::from_path(Path::new("x.yaml")),
            Err(ConfigError::UnsupportedExtension(ext)) if ext == "yaml"
        ));
        assert!(SettingsFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn fingerprint_is_deterministic() {
        let a = Settings::default();
        let b = Settings::default();
        assert_eq!(settings_fingerprint(&a), settings_fingerprint(&b));
        assert_eq!(settings_fingerprint(&a).len(), 64);
    }

    #[test]
    fn fingerprint_changes_with_params() {
        let a = Settings::default();
        let b = Settings {
            stop_loss: 25.0,
            ..Settings::default()
        };
        assert_ne!(settings_fingerprint(&a), settings_fingerprint(&b));
    }
}
