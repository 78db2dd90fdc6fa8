use std::{
    env, io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};

const APPLICATION_DIR_NAME: &str = "focus-recommender";

/// Directory used for logs and the default `config.json`: `explicit` if given, otherwise the
/// platform state directory. It's created if it doesn't exist yet.
pub fn application_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    let path = match explicit {
        Some(path) => path,
        None => default_application_dir()?,
    };
    ensure_dir(&path)?;
    Ok(path)
}

#[cfg(windows)]
fn default_application_dir() -> Result<PathBuf> {
    let app_data = env::var_os("APPDATA").ok_or_else(|| anyhow!("APPDATA is not set"))?;
    Ok(PathBuf::from(app_data).join(APPLICATION_DIR_NAME))
}

#[cfg(not(windows))]
fn default_application_dir() -> Result<PathBuf> {
    state_dir(env::var_os("XDG_STATE_HOME"), env::var_os("HOME"))
        .map(|v| v.join(APPLICATION_DIR_NAME))
        .ok_or_else(|| anyhow!("Couldn't find neither XDG_STATE_HOME nor HOME"))
}

/// `$XDG_STATE_HOME`, falling back to `$HOME/.local/state`. Empty values count as unset.
#[cfg_attr(windows, allow(dead_code))]
fn state_dir(
    xdg_state_home: Option<std::ffi::OsString>,
    home: Option<std::ffi::OsString>,
) -> Option<PathBuf> {
    let non_empty = |v: std::ffi::OsString| (!v.is_empty()).then(|| PathBuf::from(v));
    xdg_state_home
        .and_then(non_empty)
        .or_else(|| home.and_then(non_empty).map(|v| v.join(".local/state")))
}

fn ensure_dir(path: &Path) -> Result<()> {
    match std::fs::create_dir_all(path) {
        Ok(_) => Ok(()),
        Err(v) if v.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(v) => Err(v).with_context(|| format!("create {}", path.display())),
    }
}
