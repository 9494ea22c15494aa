//! Layering tests for `huddle_config::load`: defaults, file discovery, and
//! `HUDDLE__*` overrides. Every test runs serially inside a sandbox that owns
//! the working directory and the `HUDDLE` environment for its lifetime.

use std::fs;
use std::path::PathBuf;

use serial_test::serial;
use tempfile::TempDir;

use huddle_config::{load, AppConfig};

const HUDDLE_VARS: &[&str] = &[
    "HUDDLE_CONFIG",
    "HUDDLE__AUTH__ALLOW_DEV_TOKENS",
    "HUDDLE__AUTH__SESSION_TTL_SECONDS",
    "HUDDLE__DATABASE__MAX_CONNECTIONS",
    "HUDDLE__DATABASE__URL",
    "HUDDLE__HTTP__ADDRESS",
    "HUDDLE__HTTP__PORT",
];

/// Temp working directory with a clean `HUDDLE` environment, restored on drop.
struct Sandbox {
    dir: TempDir,
    previous_dir: PathBuf,
    saved: Vec<(&'static str, Option<String>)>,
}

impl Sandbox {
    fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let previous_dir = std::env::current_dir().expect("current dir");
        let saved = HUDDLE_VARS
            .iter()
            .map(|key| (*key, std::env::var(key).ok()))
            .collect();

        for key in HUDDLE_VARS {
            std::env::remove_var(key);
        }
        std::env::set_current_dir(dir.path()).expect("enter sandbox");

        Self {
            dir,
            previous_dir,
            saved,
        }
    }

    fn file(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("config dirs");
        }
        fs::write(&path, contents).expect("config file");
        path
    }

    fn env(&self, key: &'static str, value: impl AsRef<str>) {
        assert!(HUDDLE_VARS.contains(&key), "{key} would leak out of the sandbox");
        std::env::set_var(key, value.as_ref());
    }
}

impl Drop for Sandbox {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.previous_dir);
        for (key, value) in self.saved.drain(..) {
            match value {
                Some(value) => std::env::set_var(key, value),
                None => std::env::remove_var(key),
            }
        }
    }
}

#[test]
#[serial]
fn defaults_apply_without_files_or_env() {
    let _sandbox = Sandbox::new();

    let config = load().expect("load");
    let defaults = AppConfig::default();

    assert_eq!(
        (config.http.address.as_str(), config.http.port),
        ("127.0.0.1", 7070)
    );
    assert_eq!(config.database.url, defaults.database.url);
    assert_eq!(config.database.max_connections, 10);
    assert_eq!(config.auth.session_ttl_seconds, 86_400);
    assert!(!config.auth.allow_dev_tokens);
}

#[test]
#[serial]
fn earlier_search_paths_win() {
    let sandbox = Sandbox::new();
    sandbox.file("config/huddle.toml", "[http]\nport = 5151\n");
    sandbox.file("huddle.toml", "[http]\nport = 4242\n");

    assert_eq!(load().expect("load").http.port, 4242);
}

#[test]
#[serial]
fn nested_search_path_is_used_when_root_file_is_missing() {
    let sandbox = Sandbox::new();
    sandbox.file("config/huddle.toml", "[database]\nurl = \"sqlite://nested.db\"\n");

    assert_eq!(load().expect("load").database.url, "sqlite://nested.db");
}

#[test]
#[serial]
fn partial_file_keeps_other_defaults() {
    let sandbox = Sandbox::new();
    sandbox.file(
        "huddle.toml",
        "[database]\nmax_connections = 50\n\n[auth]\nallow_dev_tokens = true\n",
    );

    let config = load().expect("load");

    assert_eq!(config.database.max_connections, 50);
    assert!(config.auth.allow_dev_tokens);
    assert_eq!(config.http.port, 7070);
    assert_eq!(config.auth.session_ttl_seconds, 86_400);
}

#[test]
#[serial]
fn explicit_path_overrides_search() {
    let sandbox = Sandbox::new();
    sandbox.file("huddle.toml", "[http]\naddress = \"10.0.0.1\"\n");
    let custom = sandbox.file("elsewhere/custom.toml", "[http]\naddress = \"0.0.0.0\"\n");
    sandbox.env("HUDDLE_CONFIG", custom.display().to_string());

    assert_eq!(load().expect("load").http.address, "0.0.0.0");
}

#[test]
#[serial]
fn missing_explicit_path_is_an_error() {
    let sandbox = Sandbox::new();
    sandbox.env("HUDDLE_CONFIG", "does/not/exist.toml");

    assert!(load().is_err());
}

#[test]
#[serial]
fn environment_beats_file() {
    let sandbox = Sandbox::new();
    sandbox.file("huddle.toml", "[http]\nport = 3030\n");
    sandbox.env("HUDDLE__HTTP__PORT", "8080");
    sandbox.env("HUDDLE__DATABASE__URL", "sqlite://:memory:");
    sandbox.env("HUDDLE__AUTH__ALLOW_DEV_TOKENS", "true");

    let config = load().expect("load");

    assert_eq!(config.http.port, 8080);
    assert_eq!(config.database.url, "sqlite://:memory:");
    assert!(config.auth.allow_dev_tokens);
}

#[test]
#[serial]
fn oversized_session_ttl_is_clamped() {
    let sandbox = Sandbox::new();
    sandbox.env(
        "HUDDLE__AUTH__SESSION_TTL_SECONDS",
        (i64::MAX as u128 + 42).to_string(),
    );

    assert_eq!(
        load().expect("load").auth.session_ttl_seconds,
        i64::MAX as u64
    );
}
