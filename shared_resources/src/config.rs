use std::env;
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use log::warn;
use thiserror::Error;

use super::floor_range::FloorRange;

const CONFIG_FILE: &str = "config.json";
const FALLBACK_CONFIG_FILE: &str = "_config.json";

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ElevatorSection {
    pub min_floor: i32,
    pub max_floor: i32,
    pub start_floor: i32,
}

impl Default for ElevatorSection {
    fn default() -> Self {
        ElevatorSection { min_floor: -2, max_floor: 20, start_floor: 0 }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DispatcherSection {
    pub tick_interval_ms: u64,
}

impl Default for DispatcherSection {
    fn default() -> Self {
        DispatcherSection { tick_interval_ms: 1000 }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct NetworkSection {
    pub call_port: u16,
    pub status_port: u16,
    pub status_interval_ms: u64,
    /// Broadcast on the LAN instead of looping back to this host.
    pub broadcast: bool,
}

impl Default for NetworkSection {
    fn default() -> Self {
        NetworkSection {
            call_port: 19740,
            status_port: 19741,
            status_interval_ms: 250,
            broadcast: false,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct DisplaySection {
    pub status_table: bool,
}

/// On-disk layout of `config.json`. Missing sections and keys take their
/// defaults.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ConfigFile {
    pub elevator: ElevatorSection,
    pub dispatcher: DispatcherSection,
    pub network: NetworkSection,
    pub display: DisplaySection,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Io { path: String, source: io::Error },

    #[error("could not parse {path}: {source}")]
    Parse { path: String, source: serde_json::Error },

    #[error("min_floor {min} is above max_floor {max}")]
    InvalidRange { min: i32, max: i32 },

    #[error("start_floor {start} is outside {range}")]
    StartFloorOutOfRange { start: i32, range: FloorRange },

    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),
}

#[derive(Debug, Clone)]
pub struct ElevatorConfig {
    pub floors: FloorRange,
    pub start_floor: i32,
}

#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    pub tick_interval: Duration,
}

#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub call_port: u16,
    pub status_port: u16,
    pub status_interval: Duration,
    pub broadcast: bool,
}

#[derive(Debug, Clone)]
pub struct DisplayConfig {
    pub status_table: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub elevator: ElevatorConfig,
    pub dispatcher: DispatcherConfig,
    pub network: NetworkConfig,
    pub display: DisplayConfig,
}

impl Config {
    /// Reads `config.json` (or the shipped `_config.json`), applies
    /// command-line overrides and validates the result.
    pub fn get() -> Result<Self, ConfigError> {
        let mut config_file = read_config_file()?;
        let args: Vec<String> = env::args().collect();
        parse_env_args(&mut config_file, &args);
        Config::from_file(config_file)
    }

    pub fn from_file(config_file: ConfigFile) -> Result<Self, ConfigError> {
        let elevator = config_file.elevator;
        let floors = FloorRange::new(elevator.min_floor, elevator.max_floor).ok_or(
            ConfigError::InvalidRange { min: elevator.min_floor, max: elevator.max_floor },
        )?;
        if !floors.contains(elevator.start_floor) {
            return Err(ConfigError::StartFloorOutOfRange { start: elevator.start_floor, range: floors });
        }
        if config_file.dispatcher.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval("dispatcher.tick_interval_ms"));
        }
        if config_file.network.status_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval("network.status_interval_ms"));
        }

        Ok(Config {
            elevator: ElevatorConfig { floors, start_floor: elevator.start_floor },
            dispatcher: DispatcherConfig {
                tick_interval: Duration::from_millis(config_file.dispatcher.tick_interval_ms),
            },
            network: NetworkConfig {
                call_port: config_file.network.call_port,
                status_port: config_file.network.status_port,
                status_interval: Duration::from_millis(config_file.network.status_interval_ms),
                broadcast: config_file.network.broadcast,
            },
            display: DisplayConfig { status_table: config_file.display.status_table },
        })
    }
}

fn read_file(path: &Path) -> Result<Option<ConfigFile>, ConfigError> {
    match fs::read_to_string(path) {
        Ok(contents) => serde_json::from_str(&contents)
            .map(Some)
            .map_err(|source| ConfigError::Parse { path: path.display().to_string(), source }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ConfigError::Io { path: path.display().to_string(), source }),
    }
}

fn read_config_file() -> Result<ConfigFile, ConfigError> {
    if let Some(config_file) = read_file(Path::new(CONFIG_FILE))? {
        return Ok(config_file);
    }
    warn!("No configuration file provided, using default settings...");
    match read_file(Path::new(FALLBACK_CONFIG_FILE))? {
        Some(config_file) => Ok(config_file),
        None => {
            warn!("{} not found either, using built-in defaults", FALLBACK_CONFIG_FILE);
            Ok(ConfigFile::default())
        }
    }
}

/// Applies `--flag value` pairs on top of the file. Unknown flags and
/// unparsable values are reported and skipped.
pub fn parse_env_args(config_file: &mut ConfigFile, args: &[String]) {
    for arg_pair in args.rchunks_exact(2) {
        let value = arg_pair[1].as_str();
        match arg_pair[0].as_str() {
            "--startfloor" => match value.parse::<i32>() {
                Ok(floor) => config_file.elevator.start_floor = floor,
                Err(_) => warn!("startfloor {} is not a number, skipping...", value),
            },
            "--callport" => match value.parse::<u16>() {
                Ok(port) => config_file.network.call_port = port,
                Err(_) => warn!("port {} is not a number, skipping...", value),
            },
            "--statusport" => match value.parse::<u16>() {
                Ok(port) => config_file.network.status_port = port,
                Err(_) => warn!("port {} is not a number, skipping...", value),
            },
            "--tick" => match value.parse::<u64>() {
                Ok(ms) => config_file.dispatcher.tick_interval_ms = ms,
                Err(_) => warn!("tick {} is not a number, skipping...", value),
            },
            _ => warn!("illegal argument {}, skipping...", arg_pair[0]),
        }
    }
}
