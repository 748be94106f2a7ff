use crate::error::{SyftError, SyftResult};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_ACCEPT: &str = "audio/*,video/*";
/// 100 MiB.
pub const DEFAULT_MAX_SIZE_BYTES: u64 = 104_857_600;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub client: ClientConfig,
    pub picker: PickerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PickerConfig {
    /// Comma-separated mime patterns, e.g. `audio/*,video/*`.
    pub accept: String,
    pub max_size_bytes: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            client: ClientConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            },
            picker: PickerConfig {
                accept: DEFAULT_ACCEPT.to_string(),
                max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            },
        }
    }
}

/// Load configuration from `syft.{toml,json,yaml}` in the working directory,
/// then `path` if given, then `SYFT__SECTION__KEY` environment variables.
pub fn load_config(path: Option<&Path>) -> SyftResult<AppConfig> {
    let config_err = |err: config::ConfigError| SyftError::Config(err.to_string());

    let mut builder = Config::builder()
        .set_default("client.base_url", DEFAULT_BASE_URL)
        .map_err(config_err)?
        .set_default("client.timeout_secs", DEFAULT_TIMEOUT_SECS)
        .map_err(config_err)?
        .set_default("picker.accept", DEFAULT_ACCEPT)
        .map_err(config_err)?
        .set_default("picker.max_size_bytes", DEFAULT_MAX_SIZE_BYTES)
        .map_err(config_err)?
        .add_source(File::with_name("syft").required(false));

    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(true));
    }

    builder = builder.add_source(
        Environment::with_prefix("SYFT")
            .separator("__")
            .try_parsing(true),
    );

    let parsed: AppConfig = builder
        .build()
        .map_err(config_err)?
        .try_deserialize()
        .map_err(config_err)?;

    if parsed.client.timeout_secs == 0 {
        return Err(SyftError::Config(
            "client.timeout_secs must be greater than zero".to_string(),
        ));
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::io::Write;

    /// `load_config` reads the process environment; tests that call it hold
    /// this lock so the env override test cannot leak into them.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_default_values() {
        let config = AppConfig::default();
        assert_eq!(config.client.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.client.timeout_secs, 30);
        assert_eq!(config.picker.accept, "audio/*,video/*");
        assert_eq!(config.picker.max_size_bytes, 100 * 1024 * 1024);
    }

    #[test]
    fn test_load_without_files_uses_defaults() {
        let _env = ENV_LOCK.lock();
        let config = load_config(None).unwrap();
        assert_eq!(config.client.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.client.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.picker.accept, DEFAULT_ACCEPT);
        assert_eq!(config.picker.max_size_bytes, DEFAULT_MAX_SIZE_BYTES);
    }

    #[test]
    fn test_env_overrides_file() {
        let _env = ENV_LOCK.lock();
        let mut tmp = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(tmp, "[client]\nbase_url = \"https://file.example.com\"\n").unwrap();

        std::env::set_var("SYFT__CLIENT__BASE_URL", "https://env.example.com");
        std::env::set_var("SYFT__CLIENT__TIMEOUT_SECS", "7");
        let result = load_config(Some(tmp.path()));
        std::env::remove_var("SYFT__CLIENT__BASE_URL");
        std::env::remove_var("SYFT__CLIENT__TIMEOUT_SECS");

        let config = result.unwrap();
        assert_eq!(config.client.base_url, "https://env.example.com");
        assert_eq!(config.client.timeout_secs, 7);
        assert_eq!(config.picker.accept, DEFAULT_ACCEPT);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let _env = ENV_LOCK.lock();
        let mut tmp = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            tmp,
            "[client]\nbase_url = \"https://search.example.com\"\ntimeout_secs = 5\n"
        )
        .unwrap();

        let config = load_config(Some(tmp.path())).unwrap();
        assert_eq!(config.client.base_url, "https://search.example.com");
        assert_eq!(config.client.timeout_secs, 5);
        assert_eq!(config.picker.max_size_bytes, DEFAULT_MAX_SIZE_BYTES);
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let _env = ENV_LOCK.lock();
        let mut tmp = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(tmp, "[client]\ntimeout_secs = 0\n").unwrap();

        let err = load_config(Some(tmp.path())).unwrap_err();
        assert!(matches!(err, SyftError::Config(_)));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let _env = ENV_LOCK.lock();
        let err = load_config(Some(Path::new("/nonexistent/syft-config.toml"))).unwrap_err();
        assert!(matches!(err, SyftError::Config(_)));
    }
}
