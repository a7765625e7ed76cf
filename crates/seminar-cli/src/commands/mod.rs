pub mod assign;
pub mod awards;
pub mod evaluate;
pub mod init;
pub mod report;
pub mod session;
pub mod submission;
pub mod users;

use std::path::Path;

use anyhow::Result;

use seminar_core::config::{load_config_from, SeminarConfig};
use seminar_core::Repository;

/// An opened repository together with the configuration that located it.
pub struct Seminar {
    pub repo: Repository,
    pub config: SeminarConfig,
}

impl Seminar {
    /// Load config and open the snapshot. `--data` wins over the config.
    pub fn open(data: Option<&Path>, config_path: Option<&Path>) -> Result<Self> {
        let mut config = load_config_from(config_path)?;
        if let Some(path) = data {
            config.data_file = path.to_path_buf();
        }
        tracing::debug!("using snapshot {}", config.data_file.display());
        let repo = Repository::open_file(&config.data_file);
        Ok(Self { repo, config })
    }
}

/// Render a JSON value to stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
