use std::io::Read;
use std::path::PathBuf;

use anyhow::Result;
use ecp_flow::EcpConfig;
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Default protected resource, overridden by `--url`
    pub url: Option<Url>,
    /// Default account, overridden by `--username`
    pub username: Option<String>,

    #[serde(default)]
    pub ecp: EcpConfig,
}

pub fn read_config(config_file: PathBuf) -> Result<Config> {
    let mut file = std::fs::OpenOptions::new()
        .read(true)
        .open(config_file.as_path())?;

    let mut config = String::new();
    file.read_to_string(&mut config)?;

    Ok(toml::from_str(&config)?)
}
