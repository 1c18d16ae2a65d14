use serde::Deserialize;
use config::{Config, ConfigError, File};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Root directory holding one sub-directory of attachments per post id.
    pub media_directory: String,
    /// Public URL under which `media_directory` is served.
    pub media_base_url: String,
    /// File name of the legacy import blob inside a post directory.
    pub legacy_blob_name: String,
    pub num_workers: usize,
    pub web_port: u16,
    pub log_level: String,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(File::with_name("config/local").required(false))
            .build()?;

        s.try_deserialize()
    }
}
