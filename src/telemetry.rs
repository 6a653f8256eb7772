use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::home_dir;

pub const ENV_LOG_FILTER: &str = "SAM_LOG";
pub const ENV_LOG_FILE: &str = "SAM_LOG_FILE";

/// Install the global subscriber. The terminal runs in raw mode, so logs go to
/// a file instead of stderr. Returns the path being written.
pub fn init() -> Result<PathBuf> {
    let path = log_file_path(
        std::env::var_os(ENV_LOG_FILE).map(PathBuf::from),
        home_dir().as_deref(),
    );
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory `{}`", parent.display()))?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file `{}`", path.display()))?;

    let filter = EnvFilter::try_from_env(ENV_LOG_FILTER).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;
    Ok(path)
}

fn log_file_path(explicit: Option<PathBuf>, home: Option<&Path>) -> PathBuf {
    explicit.unwrap_or_else(|| match home {
        Some(home) => home.join(".config").join("sam").join("sam.log"),
        None => PathBuf::from("sam.log"),
    })
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::log_file_path;

    #[test]
    fn explicit_path_wins() {
        let p = log_file_path(Some(PathBuf::from("/tmp/x.log")), Some(Path::new("/home/u")));
        assert_eq!(p, PathBuf::from("/tmp/x.log"));
    }

    #[test]
    fn falls_back_to_home_then_cwd() {
        assert_eq!(
            log_file_path(None, Some(Path::new("/home/u"))),
            PathBuf::from("/home/u/.config/sam/sam.log")
        );
        assert_eq!(log_file_path(None, None), PathBuf::from("sam.log"));
    }
}
