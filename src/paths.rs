use anyhow::Context;
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

const APP_DIR: &str = "travel-guru";

/// Directory holding `config.toml`. Nothing is created; the config is optional.
pub fn config_dir() -> anyhow::Result<PathBuf> {
    resolve_config_dir(
        env::var_os("TRAVEL_GURU_HOME"),
        env::var_os("XDG_CONFIG_HOME"),
        env::var_os("HOME"),
    )
}

pub fn config_file() -> anyhow::Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

fn resolve_config_dir(
    app_home: Option<OsString>,
    xdg_config: Option<OsString>,
    home: Option<OsString>,
) -> anyhow::Result<PathBuf> {
    if let Some(base) = app_home.filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(base).join("config"));
    }

    if let Some(xdg) = xdg_config.filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(xdg).join(APP_DIR));
    }

    // On Unix, HOME is standard. (Windows support can be expanded later.)
    let home = home.context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".config").join(APP_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn os(s: &str) -> Option<OsString> {
        Some(OsString::from(s))
    }

    #[test]
    fn app_home_wins() {
        let dir = resolve_config_dir(os("/opt/tg"), os("/xdg"), os("/home/u")).unwrap();
        assert_eq!(dir, PathBuf::from("/opt/tg/config"));
    }

    #[test]
    fn xdg_before_home() {
        let dir = resolve_config_dir(None, os("/xdg"), os("/home/u")).unwrap();
        assert_eq!(dir, PathBuf::from("/xdg/travel-guru"));
    }

    #[test]
    fn empty_vars_are_ignored() {
        let dir = resolve_config_dir(os(""), os(""), os("/home/u")).unwrap();
        assert_eq!(dir, PathBuf::from("/home/u/.config/travel-guru"));
    }

    #[test]
    fn no_home_is_an_error() {
        assert!(resolve_config_dir(None, None, None).is_err());
    }
}
