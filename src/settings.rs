use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct Postgres {
    pub url: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Server {
    pub listen_address: String,
}

/// Receiving account embedded in every BR Code this instance emits.
#[derive(Clone, Debug, Deserialize)]
pub struct Merchant {
    pub pix_key: String,
    pub name: String,
    pub city: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
    pub postgres: Postgres,
    pub server: Server,
    pub merchant: Merchant,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("config.toml"))
            .build()?;

        config.try_deserialize()
    }
}
