use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::ClientConfig;
use crate::error::{PromoError, Result};
use crate::view::{SortOrder, Tab};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/admin/auth/promotions";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration loaded from ~/.promoctl/config.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromoConfig {
    pub api: ApiConfig,
    pub auth: AuthConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Promotions endpoint root, e.g. http://localhost:8080/admin/auth/promotions
    pub base_url: String,
    pub timeout_secs: u64,
    /// Skip TLS certificate verification
    pub insecure: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            insecure: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Where the admin token is stored (default: ~/.promoctl/admin-token)
    pub token_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub default_tab: Tab,
    pub default_sort: SortOrder,
}

impl PromoConfig {
    /// Directory holding config, token and dashboard log: ~/.promoctl
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".promoctl")
    }

    /// Get config file path: ~/.promoctl/config.toml
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load from the default path; a missing file yields defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| PromoError::io(path, e))?;
        let config: Self = toml::from_str(&content).map_err(|source| PromoError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| PromoError::io(parent, e))?;
        }
        let content = self.to_toml()?;
        fs::write(path, content).map_err(|e| PromoError::io(path, e))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| PromoError::config(format!("failed to serialize config: {}", e)))
    }

    pub fn validate(&self) -> Result<()> {
        let base = self.api.base_url.trim();
        if base.is_empty() {
            return Err(PromoError::config("api.base_url is empty"));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(PromoError::invalid_base_url(
                base,
                "must start with http:// or https://",
            ));
        }
        if self.api.timeout_secs == 0 {
            return Err(PromoError::config("api.timeout_secs must be greater than 0"));
        }
        Ok(())
    }

    /// Token file path with a leading `~` expanded
    pub fn token_path(&self) -> PathBuf {
        match &self.auth.token_file {
            Some(path) => expand_home(path),
            None => Self::config_dir().join("admin-token"),
        }
    }

    pub fn token_store(&self) -> TokenStore {
        TokenStore::new(self.token_path())
    }

    /// Build the HTTP client settings.
    ///
    /// Priority: explicit overrides (flags / env) > config file > defaults.
    /// The token falls back to the token file when no override is given.
    pub fn client_config(&self, overrides: ClientOverrides) -> Result<ClientConfig> {
        let token = match overrides.token {
            Some(token) => Some(token),
            None => self.token_store().read()?,
        };

        Ok(ClientConfig {
            base_url: overrides
                .base_url
                .unwrap_or_else(|| self.api.base_url.clone()),
            token,
            timeout: Duration::from_secs(self.api.timeout_secs),
            insecure: overrides.insecure || self.api.insecure,
        })
    }

    /// Look up a value by dot-notation key (e.g. "api.base_url")
    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "api.base_url" => Ok(self.api.base_url.clone()),
            "api.timeout_secs" => Ok(self.api.timeout_secs.to_string()),
            "api.insecure" => Ok(self.api.insecure.to_string()),
            "auth.token_file" => Ok(self.token_path().display().to_string()),
            "dashboard.default_tab" => Ok(self.dashboard.default_tab.to_string()),
            "dashboard.default_sort" => Ok(self.dashboard.default_sort.to_string()),
            _ => Err(PromoError::config(format!("Unknown config key: {}", key))),
        }
    }
}

/// Values given on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ClientOverrides {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub insecure: bool,
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}

// ============================================================================
// Token storage
// ============================================================================

/// Plain-file store for the admin bearer token.
///
/// The token is opaque to the client: it is read, attached to requests and
/// never inspected.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored token, or `None` when the file is missing or blank
    pub fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let token = content.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PromoError::io(&self.path, e)),
        }
    }

    pub fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| PromoError::io(parent, e))?;
        }
        fs::write(&self.path, format!("{}\n", token.trim()))
            .map_err(|e| PromoError::io(&self.path, e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))
                .map_err(|e| PromoError::io(&self.path, e))?;
        }

        Ok(())
    }

    /// Remove the stored token; returns whether a token file existed
    pub fn clear(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(PromoError::io(&self.path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = PromoConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, PromoConfig::default());
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.dashboard.default_tab, Tab::Pending);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[api]\nbase_url = \"https://admin.example.com/admin/auth/promotions\"\n\n[dashboard]\ndefault_tab = \"all\"\ndefault_sort = \"revenue\"\n",
        )
        .unwrap();

        let config = PromoConfig::load_from(&path).unwrap();
        assert_eq!(config.api.base_url, "https://admin.example.com/admin/auth/promotions");
        assert_eq!(config.api.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.dashboard.default_tab, Tab::All);
        assert_eq!(config.dashboard.default_sort, SortOrder::Revenue);
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[api]\nbase_url = \"localhost:8080\"\n").unwrap();

        let err = PromoConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, PromoError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = PromoConfig::default();
        config.api.timeout_secs = 5;
        config.save_to(&path).unwrap();

        assert_eq!(PromoConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_token_store_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = TokenStore::new(dir.path().join("admin-token"));

        assert_eq!(store.read().unwrap(), None);
        store.save("  eyJhbGciOi.token  ").unwrap();
        assert_eq!(store.read().unwrap().as_deref(), Some("eyJhbGciOi.token"));
        assert!(store.clear().unwrap());
        assert!(!store.clear().unwrap());
        assert_eq!(store.read().unwrap(), None);
    }

    #[test]
    fn test_blank_token_file_means_no_token() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("admin-token");
        fs::write(&path, "\n").unwrap();
        assert_eq!(TokenStore::new(path).read().unwrap(), None);
    }

    #[test]
    fn test_client_config_precedence() {
        let dir = TempDir::new().unwrap();
        let token_file = dir.path().join("admin-token");
        fs::write(&token_file, "stored-token").unwrap();

        let mut config = PromoConfig::default();
        config.auth.token_file = Some(token_file);

        let from_file = config.client_config(ClientOverrides::default()).unwrap();
        assert_eq!(from_file.token.as_deref(), Some("stored-token"));
        assert_eq!(from_file.base_url, DEFAULT_BASE_URL);

        let overridden = config
            .client_config(ClientOverrides {
                base_url: Some("http://127.0.0.1:9000/promotions".to_string()),
                token: Some("flag-token".to_string()),
                insecure: true,
            })
            .unwrap();
        assert_eq!(overridden.token.as_deref(), Some("flag-token"));
        assert_eq!(overridden.base_url, "http://127.0.0.1:9000/promotions");
        assert!(overridden.insecure);
    }

    #[test]
    fn test_get_by_key() {
        let config = PromoConfig::default();
        assert_eq!(config.get("api.timeout_secs").unwrap(), "30");
        assert_eq!(config.get("dashboard.default_sort").unwrap(), "newest");
        assert!(config.get("api.nope").is_err());
    }
}
