use std::fs;
use std::path::{Path, PathBuf};

use contract_hooks_types::{ConfigError, HooksConfig};

const CONFIG_DIR: &str = "contract-hooks";
const CONFIG_FILE: &str = "config.json";

/// `<config_dir>/contract-hooks/config.json`
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE)).ok_or(ConfigError::NoConfigDir)
}

/// Load configuration.
///
/// An explicit `path` must exist. Without one, the default location is used
/// and a missing file yields defaults.
pub fn load_config(path: Option<&Path>) -> Result<HooksConfig, ConfigError> {
    let (config_path, required) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (default_config_path()?, false),
    };

    if !config_path.exists() {
        if required {
            return Err(ConfigError::ReadError {
                path: config_path.display().to_string(),
                message: "file does not exist".to_string(),
            });
        }
        tracing::debug!("No config at {}, using defaults", config_path.display());
        return Ok(HooksConfig::default());
    }

    let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::ReadError {
        path: config_path.display().to_string(),
        message: e.to_string(),
    })?;

    let config: HooksConfig = serde_json::from_str(&content)
        .map_err(|e| ConfigError::ParseError { message: e.to_string() })?;
    config.check()?;

    tracing::debug!("Loaded config from {}", config_path.display());
    Ok(config)
}

/// Save configuration, returning the path written.
pub fn save_config(config: &HooksConfig, path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    config.check()?;

    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };
    let write_err = |e: std::io::Error| ConfigError::WriteError { message: e.to_string() };

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let content = serde_json::to_string_pretty(config)
        .map_err(|e| ConfigError::WriteError { message: e.to_string() })?;

    // Atomic write
    let temp_path = config_path.with_extension("json.tmp");
    fs::write(&temp_path, content).map_err(write_err)?;
    fs::rename(&temp_path, &config_path).map_err(write_err)?;

    Ok(config_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contract_hooks_types::MissingCredentialPolicy;

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = HooksConfig::default();
        config.listen.port = 62000;
        config.credential.missing = MissingCredentialPolicy::Reject;

        let written = save_config(&config, Some(&path)).unwrap();
        assert_eq!(written, path);
        assert!(!path.with_extension("json.tmp").exists());

        let loaded = load_config(Some(&path)).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("absent.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }

    #[test]
    fn test_invalid_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_config(Some(&path)), Err(ConfigError::ParseError { .. })));

        fs::write(&path, r#"{"listen": {"port": 0}}"#).unwrap();
        assert!(matches!(load_config(Some(&path)), Err(ConfigError::ValidationError { .. })));
    }
}
