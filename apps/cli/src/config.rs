//! # Application Configuration
//!
//! Loads everything the generator and store need at startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command line (highest priority)                                    │
//! │     --data-dir /srv/kosh                                               │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     KOSH_DATA_DIR=/srv/kosh                                            │
//! │     KOSH_TAX_RATE=18          (percent)                                │
//! │     KOSH_ISSUER_NAME="AONE PET RECYCLERS"                              │
//! │     KOSH_LOGO=/srv/kosh/logo.png                                       │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     ~/.config/kosh-billing/kosh.toml (Linux)                           │
//! │     ~/Library/Application Support/com.kosh.billing/kosh.toml (macOS)   │
//! │     or --config <PATH>                                                 │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     18% GST, A4 layout, platform data directory                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # kosh.toml
//! data_dir = "/srv/kosh"
//! tax_rate = 18.0
//!
//! [issuer]
//! name = "AONE PET RECYCLERS"
//! address = "Plot C-39, Etmadpur, Agra"
//! mobile = "9897201594"
//! gstin = "09EMMPK5033B1Z5"
//! email = "accounts@example.com"
//!
//! [layout]
//! title = "TAX INVOICE - ORIGINAL"
//! description_max_chars = 30
//!
//! [assets]
//! logo = "/srv/kosh/logo.png"
//! font_regular = "/srv/kosh/fonts/DejaVuSans.ttf"
//! font_bold = "/srv/kosh/fonts/DejaVuSans-Bold.ttf"
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use kosh_core::{TaxRate, DEFAULT_TAX_RATE_BPS};
use kosh_docs::{AssetPaths, GeneratorConfig, IssuerProfile, LayoutConfig, OutputDirs};
use kosh_store::StoreConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Name of the configuration file inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "kosh.toml";

// =============================================================================
// Errors
// =============================================================================

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// App Config
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root of snapshots, master data and generated artifacts.
    pub data_dir: PathBuf,

    /// Total GST rate in percent, split into two equal halves on the page.
    pub tax_rate: f64,

    pub issuer: IssuerProfile,
    pub layout: LayoutConfig,
    pub assets: AssetPaths,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data_dir: default_data_dir(),
            tax_rate: f64::from(DEFAULT_TAX_RATE_BPS) / 100.0,
            issuer: IssuerProfile::default(),
            layout: LayoutConfig::default(),
            assets: AssetPaths::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`--config`, else the platform `kosh.toml`)
    /// 3. Environment variables
    ///
    /// An explicitly named file must exist; the platform default may not.
    pub fn load(config_path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parses one TOML file over the defaults.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    /// Parses TOML text over the defaults.
    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("data_dir must not be empty".into()));
        }

        if !self.tax_rate.is_finite() || !(0.0..=100.0).contains(&self.tax_rate) {
            return Err(ConfigError::Invalid(format!(
                "tax_rate must be a percentage between 0 and 100, got: {}",
                self.tax_rate
            )));
        }

        let layout = &self.layout;
        if layout.page_width <= 0.0 || layout.page_height <= 0.0 {
            return Err(ConfigError::Invalid("page size must be positive".into()));
        }
        if layout.row_height <= 0.0 || layout.line_height <= 0.0 {
            return Err(ConfigError::Invalid(
                "row_height and line_height must be positive".into(),
            ));
        }
        if layout.description_max_chars <= kosh_docs::text::ELLIPSIS.len() {
            return Err(ConfigError::Invalid(format!(
                "description_max_chars must be greater than {}",
                kosh_docs::text::ELLIPSIS.len()
            )));
        }
        if layout.address_max_lines == 0 {
            return Err(ConfigError::Invalid(
                "address_max_lines must be at least 1".into(),
            ));
        }
        if layout.date_format.trim().is_empty() {
            return Err(ConfigError::Invalid("date_format must not be empty".into()));
        }

        if self.issuer.name.trim().is_empty() {
            warn!("Issuer name is not configured; documents will have an empty header");
        }

        Ok(())
    }

    /// Applies environment variable overrides read through `lookup`.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup("KOSH_DATA_DIR") {
            debug!(data_dir = %dir, "Overriding data directory from environment");
            self.data_dir = PathBuf::from(dir);
        }

        if let Some(rate) = lookup("KOSH_TAX_RATE") {
            match rate.trim().parse::<f64>() {
                Ok(pct) => {
                    debug!(tax_rate = pct, "Overriding tax rate from environment");
                    self.tax_rate = pct;
                }
                Err(_) => warn!(value = %rate, "Ignoring unparseable KOSH_TAX_RATE"),
            }
        }

        if let Some(name) = lookup("KOSH_ISSUER_NAME") {
            self.issuer.name = name;
        }

        if let Some(logo) = lookup("KOSH_LOGO") {
            debug!(logo = %logo, "Overriding logo from environment");
            self.assets.logo = Some(PathBuf::from(logo));
        }
    }

    // =========================================================================
    // Derived Configuration
    // =========================================================================

    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_percentage(self.tax_rate)
    }

    /// Generator configuration rooted at `data_dir`.
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            issuer: self.issuer.clone(),
            tax_rate: self.tax_rate(),
            layout: self.layout.clone(),
            assets: self.assets.clone(),
            output: OutputDirs::under(&self.data_dir),
        }
    }

    /// Store configuration rooted at `data_dir`.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(&self.data_dir)
    }
}

/// Returns the default config file path.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

fn default_data_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("data"))
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "kosh", "billing")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tax_rate().bps(), 1800);
    }

    #[test]
    fn test_partial_toml() {
        let config = AppConfig::from_toml(
            r#"
            data_dir = "/srv/kosh"
            tax_rate = 12.0

            [issuer]
            name = "AONE PET RECYCLERS"

            [layout]
            quantity_precision = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/srv/kosh"));
        assert_eq!(config.tax_rate().bps(), 1200);
        assert_eq!(config.issuer.name, "AONE PET RECYCLERS");
        assert_eq!(config.layout.quantity_precision, 2);
        assert_eq!(config.layout.rate_precision, 2);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(env(&[
            ("KOSH_DATA_DIR", "/tmp/kosh"),
            ("KOSH_TAX_RATE", "5"),
            ("KOSH_ISSUER_NAME", "Green Polymers"),
            ("KOSH_LOGO", "/tmp/logo.png"),
        ]));

        assert_eq!(config.data_dir, PathBuf::from("/tmp/kosh"));
        assert_eq!(config.tax_rate().bps(), 500);
        assert_eq!(config.issuer.name, "Green Polymers");
        assert_eq!(config.assets.logo, Some(PathBuf::from("/tmp/logo.png")));
    }

    #[test]
    fn test_bad_env_rate_is_ignored() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(env(&[("KOSH_TAX_RATE", "eighteen")]));
        assert_eq!(config.tax_rate().bps(), 1800);
    }

    #[test]
    fn test_validation_rejects_out_of_range_rate() {
        let config = AppConfig {
            tax_rate: 180.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validation_rejects_tiny_description_limit() {
        let mut config = AppConfig::default();
        config.layout.description_max_chars = 3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_address_lines() {
        let mut config = AppConfig::default();
        config.layout.address_max_lines = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let err = AppConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kosh.toml");
        std::fs::write(&path, "tax_rate = \"lots\"").unwrap();

        let err = AppConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_derived_configs_share_data_dir() {
        let config = AppConfig {
            data_dir: PathBuf::from("/srv/kosh"),
            ..Default::default()
        };
        let generator = config.generator_config();
        assert_eq!(generator.output.documents, PathBuf::from("/srv/kosh/invoices"));
        assert_eq!(config.store_config().invoices_path(), PathBuf::from("/srv/kosh/invoices"));
    }
}
