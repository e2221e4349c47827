// Runtime configuration read from the environment.

use crate::store::AddOptions;
use log::LevelFilter;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5001";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5 * 60;

#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the store's HTTP RPC endpoint.
    pub api_url: String,
    /// Request timeout, also used for uploads.
    pub timeout: Duration,
    pub log_level: LevelFilter,
    pub log_file: PathBuf,
    /// Values that were present but unusable; shown once at startup.
    pub warnings: Vec<String>,
}

impl Config {
    /// Read `IPFS_API_URL`, `CIDWALK_TIMEOUT_SECS`, `CIDWALK_LOG` and
    /// `CIDWALK_LOG_FILE`, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut warnings = Vec::new();

        let api_url = lookup("IPFS_API_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.into());

        let timeout_secs = match lookup("CIDWALK_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    warnings.push(format!(
                        "CIDWALK_TIMEOUT_SECS={raw:?} is not a positive number, using {DEFAULT_TIMEOUT_SECS}"
                    ));
                    DEFAULT_TIMEOUT_SECS
                }
            },
            None => DEFAULT_TIMEOUT_SECS,
        };

        let log_level = match lookup("CIDWALK_LOG") {
            Some(raw) => raw.trim().parse::<LevelFilter>().unwrap_or_else(|_| {
                warnings.push(format!("CIDWALK_LOG={raw:?} is not a log level, using info"));
                LevelFilter::Info
            }),
            None => LevelFilter::Info,
        };

        let log_file = lookup("CIDWALK_LOG_FILE")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_log_file);

        Config {
            api_url,
            timeout: Duration::from_secs(timeout_secs),
            log_level,
            log_file,
            warnings,
        }
    }

    /// Upload options with this configuration's timeout.
    pub fn add_options(&self) -> AddOptions {
        AddOptions {
            timeout: self.timeout,
            ..AddOptions::default()
        }
    }
}

fn default_log_file() -> PathBuf {
    let dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    dir.join("cidwalk").join("cidwalk.log")
}
