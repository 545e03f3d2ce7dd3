use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    errors::ListingError,
    listing::DraftDefaults,
    utils::{app_data_dir, ensure_dir},
};

const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the record store keeps listings. Defaults to the data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_root: Option<PathBuf>,
    pub default_country: String,
    pub default_currency: String,
    pub default_check_in: String,
    pub default_check_out: String,
}

impl Default for Config {
    fn default() -> Self {
        let defaults = DraftDefaults::default();
        Self {
            store_root: None,
            default_country: defaults.country,
            default_currency: defaults.currency,
            default_check_in: defaults.check_in,
            default_check_out: defaults.check_out,
        }
    }
}

impl Config {
    pub fn draft_defaults(&self) -> DraftDefaults {
        DraftDefaults {
            country: self.default_country.clone(),
            currency: self.default_currency.clone(),
            check_in: self.default_check_in.clone(),
            check_out: self.default_check_out.clone(),
            ..DraftDefaults::default()
        }
    }

    pub fn resolve_store_root(&self, base: &Path) -> PathBuf {
        self.store_root
            .clone()
            .unwrap_or_else(|| base.to_path_buf())
    }
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ListingError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ListingError> {
        ensure_dir(&base)?;
        let config_root = base.join(CONFIG_DIR);
        ensure_dir(&config_root)?;
        Ok(Self {
            path: config_root.join(CONFIG_FILE),
            base,
        })
    }

    pub fn load(&self) -> Result<Config, ListingError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ListingError> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), ListingError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
