//! Configuration management for the apcal application.
//!
//! Settings live in `config.json` inside the platform data directory. Every
//! section is optional; a missing file or section falls back to defaults so
//! the calendar works without any setup.
//!
//! ## Sections
//!
//! - **database**: location of the SQLite file and the busy timeout
//! - **calendar**: server time correction and the initial work schedule
//! - **registration**: the access code used when the database is created
//!
//! ```rust,no_run
//! use apcal::libs::config::Config;
//!
//! let config = Config::read()?;
//! println!("Correction: {}h", config.calendar().server_time_correction);
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const DB_FILE_NAME: &str = "apcal.db";

/// Represents a configurable section offered by the setup wizard.
#[derive(Debug, Clone)]
pub struct ConfigModule {
    pub key: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file. Relative paths are resolved against the working directory.
    pub path: Option<PathBuf>,

    /// How long a locked database is retried before giving up, in milliseconds.
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            path: None,
            busy_timeout_ms: 5000,
        }
    }
}

impl DatabaseConfig {
    /// Configured path or `<data dir>/apcal.db`.
    pub fn resolve_path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => DataStorage::new().get_path(DB_FILE_NAME),
        }
    }
}

/// Calendar behaviour and the work schedule used on first start.
///
/// The schedule fields only seed an empty template; afterwards the template
/// is edited through the `schedule` commands and stored in the database.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct CalendarConfig {
    /// Hours subtracted from local time before looking up upcoming appointments.
    pub server_time_correction: i64,

    /// First slot of the day (hour, 0-23).
    pub opening_hour: u32,

    /// Slots end before this hour (1-24).
    pub closing_hour: u32,

    /// Length of one slot in minutes.
    pub slot_minutes: u32,

    /// Template times created as breaks, `HH:MM`.
    pub break_times: Vec<String>,

    /// Weekdays off, English names or abbreviations.
    pub days_off: Vec<String>,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        CalendarConfig {
            server_time_correction: 2,
            opening_hour: 9,
            closing_hour: 17,
            slot_minutes: 60,
            break_times: vec!["12:00".to_string()],
            days_off: vec!["Saturday".to_string(), "Sunday".to_string()],
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct RegistrationConfig {
    /// Access code stored when the database is first created.
    pub initial_access_code: String,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        RegistrationConfig {
            initial_access_code: "welcome".to_string(),
        }
    }
}

/// Root configuration object.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar: Option<CalendarConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration: Option<RegistrationConfig>,
}

impl Config {
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        Self::read_from(&config_file_path)
    }

    /// Reads a config file, returning defaults when it does not exist.
    pub fn read_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        self.save_to(&config_file_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let config_file = File::create(path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    pub fn database(&self) -> DatabaseConfig {
        self.database.clone().unwrap_or_default()
    }

    pub fn calendar(&self) -> CalendarConfig {
        self.calendar.clone().unwrap_or_default()
    }

    pub fn registration(&self) -> RegistrationConfig {
        self.registration.clone().unwrap_or_default()
    }

    /// Interactive setup wizard. Existing values are offered as defaults.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();

        let modules = vec![
            ConfigModule {
                key: "database".to_string(),
                name: Message::ConfigModuleDatabase.to_string(),
            },
            ConfigModule {
                key: "calendar".to_string(),
                name: Message::ConfigModuleCalendar.to_string(),
            },
            ConfigModule {
                key: "registration".to_string(),
                name: Message::ConfigModuleRegistration.to_string(),
            },
        ];

        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&modules.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected {
            match modules[selection].key.as_str() {
                "database" => {
                    let default = config.database();
                    msg_print!(Message::ConfigModuleDatabase);
                    let path: String = Input::with_theme(&ColorfulTheme::default())
                        .with_prompt(Message::PromptDatabasePath.to_string())
                        .default(default.resolve_path()?.display().to_string())
                        .interact_text()?;
                    config.database = Some(DatabaseConfig {
                        path: Some(PathBuf::from(path)),
                        ..default
                    });
                }
                "calendar" => {
                    let default = config.calendar();
                    msg_print!(Message::ConfigModuleCalendar);
                    config.calendar = Some(CalendarConfig {
                        server_time_correction: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptServerTimeCorrection.to_string())
                            .default(default.server_time_correction)
                            .interact_text()?,
                        opening_hour: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptOpeningHour.to_string())
                            .default(default.opening_hour)
                            .interact_text()?,
                        closing_hour: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptClosingHour.to_string())
                            .default(default.closing_hour)
                            .interact_text()?,
                        slot_minutes: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptSlotMinutes.to_string())
                            .default(default.slot_minutes)
                            .interact_text()?,
                        ..default
                    });
                }
                "registration" => {
                    let default = config.registration();
                    msg_print!(Message::ConfigModuleRegistration);
                    config.registration = Some(RegistrationConfig {
                        initial_access_code: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptInitialAccessCode.to_string())
                            .default(default.initial_access_code)
                            .interact_text()?,
                    });
                }
                _ => {}
            }
        }

        Ok(config)
    }
}
