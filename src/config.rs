// File: ./src/config.rs
// Handles configuration loading, saving, and defaults.
use crate::classifier::{Classifier, ColumnLabels, InvalidDatePolicy};
use crate::context::AppContext;
use crate::ingest::InputOptions;
use crate::model::DateParser;
use crate::storage::LocalStorage;
use anyhow::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;

fn default_item_column() -> String {
    "Item Name".to_string()
}
fn default_manufacturing_column() -> String {
    "Date of Manufacturing".to_string()
}
fn default_expiry_column() -> String {
    "Date of Expiry".to_string()
}

fn default_delimiter() -> char {
    ','
}

fn default_bar_width() -> usize {
    40
}

/// Widest text bar drawn, whatever the config file asks for.
pub const MAX_BAR_WIDTH: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_filter().as_str().to_lowercase())
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Config {
    #[serde(default = "default_item_column")]
    pub item_column: String,
    #[serde(default = "default_manufacturing_column")]
    pub manufacturing_column: String,
    #[serde(default = "default_expiry_column")]
    pub expiry_column: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// chrono format strings tried before the built-in ones.
    #[serde(default)]
    pub date_formats: Vec<String>,
    /// Read 01/02/2024 as 1 February instead of 2 January.
    #[serde(default)]
    pub day_first: bool,

    #[serde(default)]
    pub on_invalid_date: InvalidDatePolicy,

    #[serde(default = "default_bar_width")]
    pub bar_width: usize,
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            item_column: default_item_column(),
            manufacturing_column: default_manufacturing_column(),
            expiry_column: default_expiry_column(),
            delimiter: default_delimiter(),
            date_formats: Vec::new(),
            day_first: false,
            on_invalid_date: InvalidDatePolicy::Drop,
            bar_width: default_bar_width(),
            log_level: LogLevel::Warn,
        }
    }
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    /// Returns a contextualized error if reading or parsing fails.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;

        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let mut config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        if config.bar_width > MAX_BAR_WIDTH {
            log::warn!(
                "bar_width {} is too wide, using {}",
                config.bar_width,
                MAX_BAR_WIDTH
            );
            config.bar_width = MAX_BAR_WIDTH;
        }

        Ok(config)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    /// A file that exists and is broken is still an error.
    pub fn load_or_default(ctx: &dyn AppContext) -> Result<Self> {
        match Self::load(ctx) {
            Ok(cfg) => Ok(cfg),
            Err(e) if Self::is_missing_config_error(&e) => {
                log::debug!("No config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }

        for cause in err.chain() {
            if let Some(io_err) = cause.downcast_ref::<std::io::Error>()
                && io_err.kind() == std::io::ErrorKind::NotFound
            {
                return true;
            }
        }

        false
    }

    /// Save configuration using an explicit context.
    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        let toml_str = toml::to_string_pretty(self)?;
        LocalStorage::save(&path, toml_str)
    }

    pub fn get_path_string(ctx: &dyn AppContext) -> Result<String> {
        let path = ctx.get_config_file_path()?;
        Ok(path.to_string_lossy().to_string())
    }

    pub fn input_options(&self) -> Result<InputOptions> {
        if !self.delimiter.is_ascii() {
            return Err(anyhow::anyhow!(
                "CSV delimiter must be a single ASCII character, got '{}'",
                self.delimiter
            ));
        }
        Ok(InputOptions {
            item_column: self.item_column.clone(),
            manufacturing_column: self.manufacturing_column.clone(),
            expiry_column: self.expiry_column.clone(),
            delimiter: self.delimiter as u8,
        })
    }

    /// Date rules shared by the CSV cells and `--today`.
    pub fn date_parser(&self) -> DateParser {
        DateParser::new(self.date_formats.clone(), self.day_first)
    }

    pub fn classifier(&self) -> Classifier {
        Classifier::new(self.date_parser(), self.on_invalid_date).with_columns(ColumnLabels {
            manufacturing: self.manufacturing_column.clone(),
            expiry: self.expiry_column.clone(),
        })
    }

    /// Text bar width, capped at [`MAX_BAR_WIDTH`] cells.
    pub fn bar_width(&self) -> usize {
        self.bar_width.min(MAX_BAR_WIDTH)
    }
}
