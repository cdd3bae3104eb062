use crate::logger::FileConfig;
use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};

/// Opens the log file described by `config`, creating missing parent directories.
pub(crate) fn open_log_file(config: &FileConfig) -> Result<File> {
    if let Some(parent) = config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }

    let mut options = OpenOptions::new();
    options.create(true);
    if config.append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }

    options
        .open(&config.path)
        .with_context(|| format!("Failed to open log file {}", config.path.display()))
}
