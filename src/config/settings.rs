use crate::error::{LedgerError, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{PoisonError, RwLock};

pub static GLOBAL_CONFIG: Lazy<Config> = Lazy::new(Config::new);

static DEFAULT_OWNER: &str = "Shakeel";
static DEFAULT_JSON_PATH: &str = "blockchain.txt";
static DEFAULT_SLED_PATH: &str = "data/ledger";
static DEFAULT_CONFIG_FILE: &str = "ledger.toml";

const OWNER_KEY: &str = "OWNER";
const DATA_PATH_KEY: &str = "DATA_PATH";
const BACKEND_KEY: &str = "BACKEND";

const OWNER_ENV: &str = "LEDGER_OWNER";
const DATA_PATH_ENV: &str = "LEDGER_DATA_PATH";
const BACKEND_ENV: &str = "LEDGER_BACKEND";
const CONFIG_FILE_ENV: &str = "LEDGER_CONFIG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// Two newline-separated JSON documents in one text file
    #[default]
    Json,
    /// Bincode records in an embedded sled database
    Sled,
}

impl FromStr for StorageBackend {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(StorageBackend::Json),
            "sled" => Ok(StorageBackend::Sled),
            _ => Err(LedgerError::Config(format!(
                "Invalid storage backend: {s}. Valid options: json, sled"
            ))),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Json => write!(f, "json"),
            StorageBackend::Sled => write!(f, "sled"),
        }
    }
}

/// Keys accepted in `ledger.toml`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    owner: Option<String>,
    data_path: Option<String>,
    backend: Option<String>,
}

pub struct Config {
    inner: RwLock<HashMap<String, String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Built-in defaults overridden by `LEDGER_*` environment variables
    pub fn new() -> Config {
        let mut map = HashMap::new();
        map.insert(String::from(OWNER_KEY), String::from(DEFAULT_OWNER));

        let config = Config {
            inner: RwLock::new(map),
        };
        config.apply_env();
        config
    }

    fn apply_env(&self) {
        if let Ok(owner) = env::var(OWNER_ENV) {
            self.set(OWNER_KEY, owner);
        }
        if let Ok(path) = env::var(DATA_PATH_ENV) {
            self.set(DATA_PATH_KEY, path);
        }
        if let Ok(backend) = env::var(BACKEND_ENV) {
            self.set(BACKEND_KEY, backend);
        }
    }

    fn set(&self, key: &str, value: String) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.insert(String::from(key), value);
    }

    fn get(&self, key: &str) -> Option<String> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.get(key).cloned()
    }

    /// Apply settings from TOML text; environment variables keep priority
    pub fn apply_toml(&self, text: &str) -> Result<()> {
        let settings: FileSettings = toml::from_str(text)?;
        if let Some(backend) = &settings.backend {
            backend.parse::<StorageBackend>()?;
        }
        if let Some(owner) = settings.owner {
            self.set(OWNER_KEY, owner);
        }
        if let Some(path) = settings.data_path {
            self.set(DATA_PATH_KEY, path);
        }
        if let Some(backend) = settings.backend {
            self.set(BACKEND_KEY, backend);
        }
        self.apply_env();
        Ok(())
    }

    pub fn load_file(&self, path: &Path) -> Result<()> {
        let text = fs::read_to_string(path).map_err(|e| {
            LedgerError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        self.apply_toml(&text)
    }

    /// Load `$LEDGER_CONFIG` if set, else `./ledger.toml` if it exists
    pub fn load_default_file(&self) -> Result<()> {
        if let Ok(path) = env::var(CONFIG_FILE_ENV) {
            return self.load_file(Path::new(&path));
        }
        let default = Path::new(DEFAULT_CONFIG_FILE);
        if default.exists() {
            return self.load_file(default);
        }
        Ok(())
    }

    pub fn get_owner(&self) -> String {
        self.get(OWNER_KEY)
            .unwrap_or_else(|| String::from(DEFAULT_OWNER))
    }

    pub fn set_owner(&self, owner: String) {
        self.set(OWNER_KEY, owner);
    }

    pub fn get_backend(&self) -> Result<StorageBackend> {
        match self.get(BACKEND_KEY) {
            Some(backend) => backend.parse(),
            None => Ok(StorageBackend::default()),
        }
    }

    pub fn set_backend(&self, backend: StorageBackend) {
        self.set(BACKEND_KEY, backend.to_string());
    }

    /// Configured data path, or the backend's default location
    pub fn get_data_path(&self) -> Result<PathBuf> {
        if let Some(path) = self.get(DATA_PATH_KEY) {
            return Ok(PathBuf::from(path));
        }
        let default = match self.get_backend()? {
            StorageBackend::Json => DEFAULT_JSON_PATH,
            StorageBackend::Sled => DEFAULT_SLED_PATH,
        };
        Ok(PathBuf::from(default))
    }

    pub fn set_data_path(&self, path: PathBuf) {
        self.set(DATA_PATH_KEY, path.to_string_lossy().to_string());
    }
}
