use super::load::{default_config_path, default_data_path, resolve_config_path};
use super::schema::*;
use crate::checkpoints::CheckpointScope;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_choreo_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("CHOREO_CONFIG_PATH", "/tmp/choreo-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        PathBuf::from("/tmp/choreo-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        PathBuf::from("/tmp/xdg-config-home")
            .join("choreo")
            .join("config.toml")
    );
}

#[test]
fn default_paths_fall_back_to_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::remove("XDG_DATA_HOME");
    let _g3 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_config_path().unwrap(),
        PathBuf::from("/tmp/home-dir/.config/choreo/config.toml")
    );
    assert_eq!(
        default_data_path().unwrap(),
        PathBuf::from("/tmp/home-dir/.local/share/choreo/storage.json")
    );
}

#[test]
fn log_file_defaults_next_to_the_data_file() {
    let mut s = Settings::default();
    s.storage.data_file = Some(PathBuf::from("/srv/choreo/data.json"));
    assert_eq!(s.data_file(), Some(PathBuf::from("/srv/choreo/data.json")));
    assert_eq!(s.log_file(), Some(PathBuf::from("/srv/choreo/choreo.log")));

    s.logging.file = Some(PathBuf::from("/tmp/other.log"));
    assert_eq!(s.log_file(), Some(PathBuf::from("/tmp/other.log")));
}

#[test]
fn defaults_validate() {
    let s = Settings::default();
    assert!(s.validate().is_ok());
    assert_eq!(s.controls.scrub_seconds, 5);
    assert_eq!(s.controls.frame_interval_ms, 16);
    assert_eq!(s.storage.title_history_limit, 20);
    assert_eq!(s.storage.checkpoint_scope, CheckpointScope::Global);
    assert_eq!(s.logging.level, "info");
}

#[test]
fn validate_rejects_bad_values() {
    let mut s = Settings::default();
    s.controls.frame_interval_ms = 0;
    assert!(s.validate().unwrap_err().contains("frame_interval_ms"));

    let mut s = Settings::default();
    s.storage.title_history_limit = 0;
    assert!(s.validate().unwrap_err().contains("title_history_limit"));

    let mut s = Settings::default();
    s.logging.level = "loud".into();
    assert!(s.validate().unwrap_err().contains("loud"));
}

#[test]
fn settings_load_from_config_file_and_parse_scope_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[storage]
data_file = "/tmp/choreo-data.json"
checkpoint_scope = "per_track"
title_history_limit = 7

[controls]
scrub_seconds = 9
frame_interval_ms = 40

[ui]
header_text = "hello"

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("CHOREO_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("CHOREO__CONTROLS__SCRUB_SECONDS");

    let s = Settings::load().unwrap();
    assert_eq!(s.storage.data_file, Some(PathBuf::from("/tmp/choreo-data.json")));
    assert_eq!(s.storage.checkpoint_scope, CheckpointScope::PerTrack);
    assert_eq!(s.storage.title_history_limit, 7);
    assert_eq!(s.controls.scrub_seconds, 9);
    assert_eq!(s.controls.frame_interval_ms, 40);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.logging.level, "debug");
    assert!(s.logging.file.is_none());

    let options = s.session_options();
    assert_eq!(options.checkpoint_scope, CheckpointScope::PerTrack);
    assert_eq!(options.title_history_limit, 7);
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[controls]
scrub_seconds = 30
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("CHOREO_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("CHOREO__CONTROLS__SCRUB_SECONDS", "2");

    let s = Settings::load().unwrap();
    assert_eq!(s.controls.scrub_seconds, 2);
    assert_eq!(s.controls.frame_interval_ms, 16);
}

#[test]
fn printed_config_parses_back() {
    let mut s = Settings::default();
    s.storage.checkpoint_scope = CheckpointScope::PerTrack;
    let text = s.to_toml().unwrap();
    assert!(text.contains("checkpoint_scope = \"per-track\""));

    let back: Settings = toml::from_str(&text).unwrap();
    assert_eq!(back.storage.checkpoint_scope, CheckpointScope::PerTrack);
    assert_eq!(back.controls.scrub_seconds, 5);
}
