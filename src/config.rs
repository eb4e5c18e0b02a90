use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::excel::XlsxWriter;
use crate::mapping::{BlankKeyPolicy, ColumnSuggester, JoinOptions};

/// A business-key concept and the header names it usually goes by
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Concept {
    pub name: String,
    #[serde(default)]
    pub required: bool,
    pub synonyms: Vec<String>,
}

impl Concept {
    fn new(name: &str, required: bool, synonyms: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            required,
            synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default = "default_concepts")]
    pub concepts: Vec<Concept>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
    #[serde(default = "default_key_separator")]
    pub key_separator: String,
    #[serde(default)]
    pub match_blank_keys: bool,
    #[serde(default = "default_attribute_column")]
    pub attribute_column: String,
    #[serde(default = "default_output_file")]
    pub output_file: String,
    #[serde(default = "default_output_sheet")]
    pub output_sheet: String,
    #[serde(default = "default_highlight_color")]
    pub highlight_color: String,
    #[serde(default = "default_missing_label")]
    pub missing_label: String,
}

fn default_similarity_threshold() -> f64 {
    0.6
}

fn default_key_separator() -> String {
    "_".to_string()
}

fn default_attribute_column() -> String {
    "LatestSubChassis".to_string()
}

fn default_output_file() -> String {
    "Mapped_Planning_Sheet.xlsx".to_string()
}

fn default_output_sheet() -> String {
    "Mapped Data".to_string()
}

fn default_highlight_color() -> String {
    "FFC7CE".to_string()
}

fn default_missing_label() -> String {
    "missing".to_string()
}

fn default_concepts() -> Vec<Concept> {
    vec![
        Concept::new("style", true, &["Style", "Style #", "Style No", "Style number"]),
        Concept::new(
            "customer",
            false,
            &["Customer Department", "Department", "Buying Office", "Customer"],
        ),
        Concept::new("department", false, &["Department", "Dept", "Customer Department"]),
        Concept::new("season", false, &["Season", "Season Code"]),
    ]
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            key_separator: default_key_separator(),
            match_blank_keys: false,
            attribute_column: default_attribute_column(),
            output_file: default_output_file(),
            output_sheet: default_output_sheet(),
            highlight_color: default_highlight_color(),
            missing_label: default_missing_label(),
        }
    }
}

impl Settings {
    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            anyhow::bail!(
                "similarity_threshold must be between 0 and 1, got {}",
                self.similarity_threshold
            );
        }
        if self.key_separator.is_empty() {
            anyhow::bail!("key_separator cannot be empty");
        }
        if XlsxWriter::parse_color(&self.highlight_color).is_none() {
            anyhow::bail!(
                "highlight_color must be a 6 digit hex color, got '{}'",
                self.highlight_color
            );
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            concepts: default_concepts(),
        }
    }
}

/// Setting names accepted by `get` / `set`
pub const SETTING_NAMES: &[&str] = &[
    "similarity_threshold",
    "key_separator",
    "match_blank_keys",
    "attribute_column",
    "output_file",
    "output_sheet",
    "highlight_color",
    "missing_label",
];

impl Config {
    pub fn get_config_dir() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("subchassis-mapper")
        } else {
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".subchassis-mapper")
        };

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
            info!("Created config directory: {:?}", config_dir);
        }

        Ok(config_dir)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        Ok(Self::get_config_dir()?.join("config.toml"))
    }

    pub fn get_log_path() -> Result<PathBuf> {
        Ok(Self::get_config_dir()?.join("subchassis-mapper.log"))
    }

    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        debug!("Loading config from: {:?}", config_path);

        if !config_path.exists() {
            info!("Config file doesn't exist, using defaults");
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let config = Self::from_toml_str(&config_content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        debug!("Loaded config with {} key concepts", config.concepts.len());
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        debug!("Saving config to: {:?}", config_path);

        fs::write(&config_path, self.to_toml_string()?)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        info!("Config saved successfully");
        Ok(())
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.settings.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config to TOML")
    }

    pub fn concept(&self, name: &str) -> Option<&Concept> {
        self.concepts.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn get(&self, name: &str) -> Result<String> {
        let s = &self.settings;
        let value = match name {
            "similarity_threshold" => s.similarity_threshold.to_string(),
            "key_separator" => s.key_separator.clone(),
            "match_blank_keys" => s.match_blank_keys.to_string(),
            "attribute_column" => s.attribute_column.clone(),
            "output_file" => s.output_file.clone(),
            "output_sheet" => s.output_sheet.clone(),
            "highlight_color" => s.highlight_color.clone(),
            "missing_label" => s.missing_label.clone(),
            _ => anyhow::bail!(
                "Unknown setting '{}'. Available: {}",
                name,
                SETTING_NAMES.join(", ")
            ),
        };
        Ok(value)
    }

    /// Update one setting in memory; the caller decides when to save
    ///
    /// Invalid values leave the current settings untouched.
    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        info!("Setting {} = {}", name, value);
        let mut updated = self.settings.clone();
        let s = &mut updated;
        match name {
            "similarity_threshold" => {
                s.similarity_threshold = value
                    .parse()
                    .with_context(|| format!("Invalid number: '{}'", value))?
            }
            "key_separator" => s.key_separator = value.to_string(),
            "match_blank_keys" => {
                s.match_blank_keys = value
                    .parse()
                    .with_context(|| format!("Expected true or false, got '{}'", value))?
            }
            "attribute_column" => s.attribute_column = value.to_string(),
            "output_file" => s.output_file = value.to_string(),
            "output_sheet" => s.output_sheet = value.to_string(),
            "highlight_color" => s.highlight_color = value.trim_start_matches('#').to_uppercase(),
            "missing_label" => s.missing_label = value.to_string(),
            _ => anyhow::bail!(
                "Unknown setting '{}'. Available: {}",
                name,
                SETTING_NAMES.join(", ")
            ),
        }
        updated.validate()?;
        self.settings = updated;
        Ok(())
    }

    pub fn reset(&mut self, name: &str) -> Result<()> {
        let value = Config::default().get(name)?;
        self.set(name, &value)
    }

    pub fn join_options(&self) -> JoinOptions {
        JoinOptions {
            separator: self.settings.key_separator.clone(),
            blank_keys: if self.settings.match_blank_keys {
                BlankKeyPolicy::MatchLiteral
            } else {
                BlankKeyPolicy::NeverMatch
            },
            ..JoinOptions::default()
        }
    }

    pub fn suggester(&self) -> ColumnSuggester {
        ColumnSuggester::new(self.settings.similarity_threshold)
    }

    pub fn writer(&self) -> XlsxWriter {
        // validate() guarantees the color parses
        XlsxWriter::new(XlsxWriter::parse_color(&self.settings.highlight_color).unwrap_or_default())
    }
}
