use caltrack_core::config::ClientConfig;
use std::path::{Path, PathBuf};

pub const BASE_URL_ENV: &str = "CALTRACK_BASE_URL";

const CONFIG_FILE_NAME: &str = "caltrack.json";

pub fn default_client_config() -> ClientConfig {
    ClientConfig::default()
}

/// `caltrack.json` in the working directory.
pub fn default_config_path() -> PathBuf {
    Path::new(CONFIG_FILE_NAME).to_path_buf()
}

/// Applies a base-URL override to all three endpoints. An explicit value wins over the
/// environment.
pub fn apply_base_url_override(
    cfg: ClientConfig,
    explicit: Option<&str>,
    from_env: Option<&str>,
) -> ClientConfig {
    match explicit.or(from_env).map(str::trim).filter(|s| !s.is_empty()) {
        Some(base) => {
            log::info!("using base url {base}");
            cfg.with_base_url(base)
        }
        None => cfg,
    }
}
