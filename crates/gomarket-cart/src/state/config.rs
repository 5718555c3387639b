//! # Cart Configuration
//!
//! ## Configuration Sources (later overrides earlier)
//! 1. Defaults (this file)
//! 2. Config file (`cart.toml` in the platform config directory)
//! 3. Environment variables (`GOMARKET_*`)
//!
//! ## Example `cart.toml`
//! ```toml
//! storage_key = "@GoMarketPlace:products"
//! log_filter = "info,gomarket=debug"
//! currency_symbol = "R$ "
//!
//! [storage]
//! backend = "sqlite"
//! path = "/data/user/0/com.gomarketplace/files/cart.db"
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use gomarket_core::DEFAULT_STORAGE_KEY;

use crate::error::{CartError, CartResult};

const CONFIG_FILE_NAME: &str = "cart.toml";
const DATABASE_FILE_NAME: &str = "cart.db";

/// Largest `currency_decimals` accepted.
pub const MAX_CURRENCY_DECIMALS: u8 = 4;

/// Where the cart snapshot is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local map; the cart is gone on restart.
    Memory,

    /// SQLite file on the device.
    Sqlite { path: PathBuf },
}

impl Default for StorageBackend {
    fn default() -> Self {
        StorageBackend::Sqlite {
            path: CartConfig::default_database_path(),
        }
    }
}

/// Cart layer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CartConfig {
    /// Storage backend.
    pub storage: StorageBackend,

    /// Key the cart snapshot lives under.
    pub storage_key: String,

    /// Default tracing filter; `RUST_LOG` still wins when set.
    pub log_filter: String,

    /// Currency symbol for display.
    pub currency_symbol: String,

    /// Number of decimal places for currency, at most [`MAX_CURRENCY_DECIMALS`].
    pub currency_decimals: u8,
}

impl Default for CartConfig {
    fn default() -> Self {
        CartConfig {
            storage: StorageBackend::default(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            log_filter: "info,gomarket=debug,sqlx=warn".to_string(),
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
        }
    }
}

impl CartConfig {
    /// Configuration backed by memory storage (tests, previews).
    pub fn in_memory() -> Self {
        CartConfig {
            storage: StorageBackend::Memory,
            ..CartConfig::default()
        }
    }

    /// Loads configuration from file, environment, and defaults.
    pub fn load(config_path: Option<PathBuf>) -> CartResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading cart config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load cart config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML config file.
    pub fn from_file(path: &Path) -> CartResult<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CartError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&contents)
    }

    /// Parses TOML config text. Missing fields take their defaults.
    pub fn from_toml(contents: &str) -> CartResult<Self> {
        toml::from_str(contents).map_err(|e| CartError::Config(e.to_string()))
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CartResult<()> {
        if self.storage_key.trim().is_empty() {
            return Err(CartError::Config("storage_key must not be empty".into()));
        }

        if self.currency_decimals > MAX_CURRENCY_DECIMALS {
            return Err(CartError::Config(format!(
                "currency_decimals must be at most {}, got {}",
                MAX_CURRENCY_DECIMALS, self.currency_decimals
            )));
        }

        if let StorageBackend::Sqlite { path } = &self.storage {
            if path.as_os_str().is_empty() {
                return Err(CartError::Config("sqlite path must not be empty".into()));
            }
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Applies `GOMARKET_*` overrides read through `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(backend) = lookup("GOMARKET_STORAGE") {
            match backend.to_lowercase().as_str() {
                "memory" => self.storage = StorageBackend::Memory,
                "sqlite" => {
                    if !matches!(self.storage, StorageBackend::Sqlite { .. }) {
                        self.storage = StorageBackend::Sqlite {
                            path: Self::default_database_path(),
                        };
                    }
                }
                _ => warn!(backend = %backend, "Unknown storage backend in environment"),
            }
        }

        // Database path (implies sqlite)
        if let Some(path) = lookup("GOMARKET_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage = StorageBackend::Sqlite {
                path: PathBuf::from(path),
            };
        }

        if let Some(key) = lookup("GOMARKET_STORAGE_KEY") {
            self.storage_key = key;
        }

        if let Some(filter) = lookup("GOMARKET_LOG") {
            self.log_filter = filter;
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "gomarketplace", "cart")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Platform data directory database path, or `cart.db` in the working
    /// directory when the platform has none.
    pub fn default_database_path() -> PathBuf {
        ProjectDirs::from("com", "gomarketplace", "cart")
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(DATABASE_FILE_NAME))
    }

    /// Formats a cent amount as a currency string.
    ///
    /// `currency_decimals` above [`MAX_CURRENCY_DECIMALS`] is clamped.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = CartConfig::default();
    /// assert_eq!(config.format_currency(1234), "$12.34");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        let decimals = self.currency_decimals.min(MAX_CURRENCY_DECIMALS);
        let divisor = 10_i64.pow(u32::from(decimals));
        let whole = (cents / divisor).unsigned_abs();
        let frac = (cents % divisor).unsigned_abs();
        let sign = if cents < 0 { "-" } else { "" };

        if decimals > 0 {
            format!(
                "{}{}{}.{:0width$}",
                sign,
                self.currency_symbol,
                whole,
                frac,
                width = usize::from(decimals)
            )
        } else {
            format!("{}{}{}", sign, self.currency_symbol, whole)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CartConfig::default();

        assert_eq!(config.storage_key, "@GoMarketPlace:products");
        assert!(matches!(config.storage, StorageBackend::Sqlite { .. }));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = CartConfig::from_toml(
            r#"
            currency_symbol = "R$ "

            [storage]
            backend = "memory"
            "#,
        )
        .unwrap();

        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.currency_symbol, "R$ ");
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn test_from_toml_sqlite_path() {
        let config = CartConfig::from_toml(
            r#"
            [storage]
            backend = "sqlite"
            path = "/tmp/cart.db"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.storage,
            StorageBackend::Sqlite {
                path: PathBuf::from("/tmp/cart.db")
            }
        );
    }

    #[test]
    fn test_from_toml_rejects_garbage() {
        let err = CartConfig::from_toml("storage = 12").unwrap_err();
        assert!(matches!(err, CartError::Config(_)));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = CartConfig::in_memory();

        config.apply_overrides(lookup(&[
            ("GOMARKET_DB_PATH", "/data/cart.db"),
            ("GOMARKET_STORAGE_KEY", "@Test:products"),
        ]));

        assert_eq!(
            config.storage,
            StorageBackend::Sqlite {
                path: PathBuf::from("/data/cart.db")
            }
        );
        assert_eq!(config.storage_key, "@Test:products");
    }

    #[test]
    fn test_env_memory_backend() {
        let mut config = CartConfig::default();

        config.apply_overrides(lookup(&[("GOMARKET_STORAGE", "MEMORY")]));

        assert_eq!(config.storage, StorageBackend::Memory);
    }

    #[test]
    fn test_validate_rejects_empty_key() {
        let config = CartConfig {
            storage_key: "  ".to_string(),
            ..CartConfig::in_memory()
        };

        assert!(matches!(config.validate(), Err(CartError::Config(_))));
    }

    #[test]
    fn test_default_format_matches_money_display() {
        let config = CartConfig::default();

        for cents in [0, 5, 99, 1234, 280_000, -550, i64::MAX] {
            assert_eq!(
                config.format_currency(cents),
                gomarket_core::Money::from_cents(cents).to_string()
            );
        }
    }

    #[test]
    fn test_validate_rejects_too_many_decimals() {
        let config = CartConfig::from_toml("currency_decimals = 20").unwrap();

        let err = config.validate().unwrap_err();
        assert!(matches!(err, CartError::Config(ref msg) if msg.contains("currency_decimals")));

        // Formatting an unvalidated config clamps instead of overflowing
        assert_eq!(config.format_currency(1234), "$0.1234");
        assert_eq!(config.format_currency(i64::MIN), "-$922337203685477.5808");
    }

    #[test]
    fn test_load_rejects_too_many_decimals() {
        let path = std::env::temp_dir().join(format!(
            "gomarket-cart-decimals-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "currency_decimals = 19\n").unwrap();

        let result = CartConfig::load(Some(path.clone()));
        let _ = std::fs::remove_file(&path);

        assert!(matches!(result, Err(CartError::Config(_))));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = CartConfig::load_or_default(Some(PathBuf::from(
            "/definitely/not/here/cart.toml",
        )));

        assert!(!config.storage_key.is_empty());
    }

    #[test]
    fn test_format_currency() {
        let config = CartConfig::default();
        assert_eq!(config.format_currency(1234), "$12.34");
        assert_eq!(config.format_currency(5), "$0.05");
        assert_eq!(config.format_currency(-1234), "-$12.34");

        let config = CartConfig {
            currency_symbol: "¥".to_string(),
            currency_decimals: 0,
            ..CartConfig::default()
        };
        assert_eq!(config.format_currency(1500), "¥1500");
    }
}
