use std::{path::PathBuf, time::Duration};

use clap::Args;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/pftracker.toml";
const ENV_PREFIX: &str = "PFTRACKER";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Backend base URL; there is no default.
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub state_dir: PathBuf,
    pub page_size: u32,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: 15,
            state_dir: PathBuf::from("config/pftracker_state"),
            page_size: pftracker_client::DEFAULT_PAGE_SIZE,
            log_level: "warn".to_string(),
        }
    }
}

impl AppConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Flags that override the file and environment layers.
#[derive(Debug, Default, Args)]
pub struct ConfigArgs {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:8000/api).
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Override the directory holding the saved session.
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,
    /// Override log level (error, warn, info, debug, trace).
    #[arg(long, global = true)]
    log_level: Option<String>,
}

/// File first, then `PFTRACKER_*` variables, then flags.
pub fn load(args: &ConfigArgs) -> Result<AppConfig> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = &args.base_url {
        settings.base_url = Some(base_url.clone());
    }
    if let Some(state_dir) = &args.state_dir {
        settings.state_dir = state_dir.clone();
    }
    if let Some(log_level) = &args.log_level {
        settings.log_level = log_level.clone();
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn file_values_and_flag_overrides() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "base_url = \"http://file:8000\"\npage_size = 25").unwrap();

        let args = ConfigArgs {
            config: Some(file.path().to_string_lossy().into_owned()),
            log_level: Some("debug".to_string()),
            ..Default::default()
        };
        let settings = load(&args).unwrap();

        assert_eq!(settings.base_url.as_deref(), Some("http://file:8000"));
        assert_eq!(settings.page_size, 25);
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.timeout_secs, 15);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let args = ConfigArgs {
            config: Some("does/not/exist.toml".to_string()),
            ..Default::default()
        };
        let settings = load(&args).unwrap();
        assert_eq!(settings.page_size, 10);
        assert_eq!(settings.state_dir, PathBuf::from("config/pftracker_state"));
    }
}
