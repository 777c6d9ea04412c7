use std::path::PathBuf;

use anyhow::Result;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Conf {
    /// Name prefixed to log lines in "node" log format
    pub id: String,
    /// "full", "json" or "node"
    pub log_format: String,
    pub data_directory: PathBuf,
    pub state_file: String,
}

impl Conf {
    pub fn new(config_file: String, data_directory: Option<String>) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("id", "cpamm")?
            .set_default("log_format", "full")?
            .set_default("data_directory", "data_cpamm")?
            .set_default("state_file", "amm_state.bin")?
            // Priority order: config file, then environment variables, then CLI
            .add_source(File::with_name(config_file.as_str()).required(false))
            .add_source(Environment::with_prefix("cpamm"))
            .set_override_option("data_directory", data_directory)?
            .build()?;

        s.try_deserialize()
    }

    pub fn state_path(&self) -> PathBuf {
        self.data_directory.join(&self.state_file)
    }
}
