//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` relative to the current working directory
//! (or an explicit path from `-f`), then applies `TAWFIQ_WORK_DIR` and
//! `TAWFIQ_LOG_LEVEL` env overrides.

use std::{
    env,
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::error::AppError;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// PTY (console) channel configuration.
#[derive(Debug, Clone)]
pub struct PtyConfig {
    /// Whether the PTY channel is explicitly enabled.
    pub enabled: bool,
}

/// HTTP channel configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Whether the HTTP channel is explicitly enabled.
    pub enabled: bool,
    /// Socket address to bind the HTTP channel to.
    pub bind: String,
}

/// Comms subsystem configuration.
#[derive(Debug, Clone)]
pub struct CommsConfig {
    pub pty: PtyConfig,
    pub http: HttpConfig,
}

/// Locations of the two JSON corpora loaded at startup.
#[derive(Debug, Clone)]
pub struct CorpusConfig {
    pub hadiths: PathBuf,
    pub friendly_responses: PathBuf,
}

/// Fully-resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Name printed in front of every console reply.
    pub bot_name: String,
    /// Working directory for persistent data (already expanded, no `~`).
    pub work_dir: PathBuf,
    pub log_level: String,
    pub corpus: CorpusConfig,
    /// Query log file, already joined onto `work_dir` when relative.
    pub query_log: PathBuf,
    pub comms: CommsConfig,
}

impl Config {
    /// Returns `true` if the PTY channel should be loaded.
    pub fn comms_pty_should_load(&self) -> bool {
        self.comms.pty.enabled
    }

    /// Returns `true` if the HTTP channel should be loaded.
    pub fn comms_http_should_load(&self) -> bool {
        self.comms.http.enabled
    }
}

/// Raw TOML shape: `serde` target before resolution.
#[derive(Deserialize)]
struct RawConfig {
    supervisor: RawSupervisor,
    #[serde(default)]
    corpus: RawCorpus,
    #[serde(default)]
    query_log: RawQueryLog,
    #[serde(default)]
    comms: RawComms,
}

#[derive(Deserialize)]
struct RawSupervisor {
    #[serde(default = "default_bot_name")]
    bot_name: String,
    work_dir: String,
    log_level: String,
}

#[derive(Deserialize)]
struct RawCorpus {
    #[serde(default = "default_hadiths_path")]
    hadiths: String,
    #[serde(default = "default_friendly_path")]
    friendly_responses: String,
}

impl Default for RawCorpus {
    fn default() -> Self {
        Self {
            hadiths: default_hadiths_path(),
            friendly_responses: default_friendly_path(),
        }
    }
}

#[derive(Deserialize)]
struct RawQueryLog {
    #[serde(default = "default_query_log_file")]
    file: String,
}

impl Default for RawQueryLog {
    fn default() -> Self {
        Self { file: default_query_log_file() }
    }
}

#[derive(Deserialize, Default)]
struct RawComms {
    #[serde(default)]
    pty: RawPty,
    #[serde(default)]
    http: RawHttp,
}

#[derive(Deserialize)]
struct RawPty {
    /// Defaults to `true`: the console is the primary way to talk to Tawfiq.
    #[serde(default = "default_true")]
    enabled: bool,
}

#[derive(Deserialize)]
struct RawHttp {
    /// Defaults to `false`: HTTP must be explicitly enabled.
    #[serde(default = "default_false")]
    enabled: bool,
    #[serde(default = "default_http_bind")]
    bind: String,
}

impl Default for RawPty {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for RawHttp {
    fn default() -> Self {
        Self {
            enabled: false,
            bind: default_http_bind(),
        }
    }
}

fn default_bot_name() -> String { "TAWFIQ".to_string() }
fn default_hadiths_path() -> String { "data/sahih_bukhari_coded.json".to_string() }
fn default_friendly_path() -> String { "data/friendly_responses.json".to_string() }
fn default_query_log_file() -> String { "user_queries.txt".to_string() }
fn default_http_bind() -> String { "127.0.0.1:8080".to_string() }

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

/// Load config from `path` (or [`DEFAULT_CONFIG_PATH`]), then apply env-var
/// overrides.
pub fn load(path: Option<&str>) -> Result<Config, AppError> {
    let work_dir_override = env::var("TAWFIQ_WORK_DIR").ok();
    let log_level_override = env::var("TAWFIQ_LOG_LEVEL").ok();
    load_from(
        Path::new(path.unwrap_or(DEFAULT_CONFIG_PATH)),
        work_dir_override.as_deref(),
        log_level_override.as_deref(),
    )
}

/// Internal loader: accepts an explicit path and optional overrides.
/// Tests pass overrides directly instead of mutating env vars.
pub fn load_from(
    path: &Path,
    work_dir_override: Option<&str>,
    log_level_override: Option<&str>,
) -> Result<Config, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

    let parsed: RawConfig = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;

    let s = parsed.supervisor;

    let work_dir = expand_home(work_dir_override.unwrap_or(&s.work_dir));
    let log_level = log_level_override.unwrap_or(&s.log_level).to_string();

    let query_log = {
        let p = expand_home(&parsed.query_log.file);
        if p.is_absolute() { p } else { work_dir.join(p) }
    };

    Ok(Config {
        bot_name: s.bot_name,
        work_dir,
        log_level,
        corpus: CorpusConfig {
            hadiths: expand_home(&parsed.corpus.hadiths),
            friendly_responses: expand_home(&parsed.corpus.friendly_responses),
        },
        query_log,
        comms: CommsConfig {
            pty: PtyConfig {
                enabled: parsed.comms.pty.enabled,
            },
            http: HttpConfig {
                enabled: parsed.comms.http.enabled,
                bind: parsed.comms.http.bind,
            },
        },
    })
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MINIMAL_TOML: &str = r#"
[supervisor]
work_dir = "~/.tawfiq"
log_level = "info"
"#;

    fn write_toml(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let f = write_toml(MINIMAL_TOML);
        let cfg = load_from(f.path(), None, None).unwrap();
        assert_eq!(cfg.bot_name, "TAWFIQ");
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.corpus.hadiths, PathBuf::from("data/sahih_bukhari_coded.json"));
        assert_eq!(cfg.corpus.friendly_responses, PathBuf::from("data/friendly_responses.json"));
        assert!(cfg.query_log.ends_with("user_queries.txt"));
        assert!(cfg.comms_pty_should_load());
        assert!(!cfg.comms_http_should_load());
        assert_eq!(cfg.comms.http.bind, "127.0.0.1:8080");
    }

    #[test]
    fn query_log_is_relative_to_work_dir() {
        let f = write_toml(MINIMAL_TOML);
        let cfg = load_from(f.path(), Some("/tmp/tawfiq-work"), None).unwrap();
        assert_eq!(cfg.query_log, PathBuf::from("/tmp/tawfiq-work/user_queries.txt"));
    }

    #[test]
    fn absolute_query_log_is_kept() {
        let f = write_toml(
            r#"
[supervisor]
work_dir = "/srv/tawfiq"
log_level = "warn"

[query_log]
file = "/var/log/tawfiq/queries.txt"
"#,
        );
        let cfg = load_from(f.path(), None, None).unwrap();
        assert_eq!(cfg.query_log, PathBuf::from("/var/log/tawfiq/queries.txt"));
    }

    #[test]
    fn explicit_sections_parse() {
        let f = write_toml(
            r#"
[supervisor]
bot_name = "Tawfiq"
work_dir = "."
log_level = "debug"

[corpus]
hadiths = "/data/bukhari.json"
friendly_responses = "/data/friendly.json"

[comms.pty]
enabled = false

[comms.http]
enabled = true
bind = "0.0.0.0:5000"
"#,
        );
        let cfg = load_from(f.path(), None, None).unwrap();
        assert_eq!(cfg.bot_name, "Tawfiq");
        assert_eq!(cfg.corpus.hadiths, PathBuf::from("/data/bukhari.json"));
        assert!(!cfg.comms_pty_should_load());
        assert!(cfg.comms_http_should_load());
        assert_eq!(cfg.comms.http.bind, "0.0.0.0:5000");
    }

    #[test]
    fn tilde_expands_to_home() {
        let home = dirs::home_dir().expect("home dir must exist in test env");
        let expanded = expand_home("~/.tawfiq");
        assert!(expanded.starts_with(&home));
        assert!(expanded.ends_with(".tawfiq"));
    }

    #[test]
    fn relative_path_unchanged() {
        assert_eq!(expand_home("relative/path"), PathBuf::from("relative/path"));
    }

    #[test]
    fn missing_file_errors() {
        let result = load_from(Path::new("/nonexistent/config.toml"), None, None);
        let msg = result.unwrap_err().to_string();
        assert!(msg.contains("config error"));
    }

    #[test]
    fn missing_supervisor_section_errors() {
        let f = write_toml("[comms.pty]\nenabled = true\n");
        assert!(load_from(f.path(), None, None).is_err());
    }

    #[test]
    fn env_log_level_override() {
        let f = write_toml(MINIMAL_TOML);
        let cfg = load_from(f.path(), None, Some("debug")).unwrap();
        assert_eq!(cfg.log_level, "debug");
    }
}
