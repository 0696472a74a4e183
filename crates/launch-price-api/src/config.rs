//! Optional user configuration read from `<home>/config.toml`.
//!
//! Environment flags take precedence; the file only fills in values the
//! environment leaves unset.

use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Default, Deserialize)]
pub struct UserConfig {
    pub logging: Option<LoggingCfg>,
    pub server: Option<ServerCfg>,
    pub artifacts: Option<ArtifactsCfg>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoggingCfg {
    pub to_file: Option<bool>,
    pub dir: Option<String>,
    pub json: Option<bool>,
    pub compact: Option<bool>,
    pub pretty: Option<bool>,
    pub level: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ServerCfg {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ArtifactsCfg {
    pub dir: Option<String>, // bundle directory; `~/` is expanded
}

pub fn load_user_config(home: &Path) -> anyhow::Result<Option<UserConfig>> {
    let path = home.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }
    let s = std::fs::read_to_string(&path)?;
    let cfg: UserConfig = toml::from_str(&s)?;
    Ok(Some(cfg))
}

pub fn expand_home(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Ok(home) = std::env::var("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(path)
}

/// Resolve one setting: an explicitly set env flag wins, then the config file,
/// then the flag's default.
pub fn pick<T>(env_is_set: bool, env_value: T, cfg_value: Option<T>) -> T {
    if env_is_set {
        env_value
    } else {
        cfg_value.unwrap_or(env_value)
    }
}

impl UserConfig {
    pub fn logging(&self) -> Option<&LoggingCfg> {
        self.logging.as_ref()
    }

    pub fn server(&self) -> Option<&ServerCfg> {
        self.server.as_ref()
    }

    pub fn artifacts_dir(&self) -> Option<PathBuf> {
        self.artifacts
            .as_ref()
            .and_then(|a| a.dir.as_deref())
            .map(expand_home)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_user_config(dir.path()).unwrap().is_none());
    }

    #[test]
    fn parses_all_sections() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"
[logging]
level = "debug"
json = true
to_file = false

[server]
host = "127.0.0.1"
port = 9090

[artifacts]
dir = "/srv/launch-price/bundle"
"#,
        )
        .unwrap();
        let cfg = load_user_config(dir.path()).unwrap().expect("config present");
        let logging = cfg.logging().expect("logging section");
        assert_eq!(logging.level.as_deref(), Some("debug"));
        assert_eq!(logging.json, Some(true));
        assert_eq!(cfg.server().and_then(|s| s.port), Some(9090));
        assert_eq!(
            cfg.artifacts_dir(),
            Some(PathBuf::from("/srv/launch-price/bundle"))
        );
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[server\nport = ").unwrap();
        assert!(load_user_config(dir.path()).is_err());
    }

    #[test]
    fn env_wins_then_config_then_default() {
        assert_eq!(pick(true, 8000u16, Some(9090)), 8000);
        assert_eq!(pick(false, 8000u16, Some(9090)), 9090);
        assert_eq!(pick(false, 8000u16, None), 8000);
    }

    #[test]
    fn expands_tilde_prefix_only() {
        assert_eq!(expand_home("/abs/path"), PathBuf::from("/abs/path"));
        assert_eq!(expand_home("rel/~/x"), PathBuf::from("rel/~/x"));
    }
}
