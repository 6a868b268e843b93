//! Configuration and credential file locations
//!
//! Everything lives in a single directory:
//!
//! - `$XDG_CONFIG_HOME/turses/` when `XDG_CONFIG_HOME` is set
//! - `$HOME/.config/turses/` otherwise
//!
//! Multiple accounts share that directory by suffixing the file names, e.g.
//! `turses.tok.work` and `turses.cfg.work` for the account `work`.

use crate::error::{ConfigError, Result};
use crate::APP_NAME;
use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "turses.cfg";
const TOKEN_FILE: &str = "turses.tok";
const LOG_FILE: &str = "turses.log";

/// Snapshot of the environment variables this crate reads
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    pub home: Option<PathBuf>,
    pub xdg_config_home: Option<PathBuf>,
    /// URL launcher command, overrides `openurl_command`
    pub browser: Option<String>,
}

impl Environment {
    /// Read `HOME`, `XDG_CONFIG_HOME` and `BROWSER` from the process
    ///
    /// Empty values are treated as unset.
    pub fn from_process() -> Self {
        Self::from_lookup(|name| env::var_os(name))
    }

    /// Build the snapshot from any variable source, e.g. a fixed map in tests
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());
        Self {
            home: var("HOME").map(PathBuf::from),
            xdg_config_home: var("XDG_CONFIG_HOME").map(PathBuf::from),
            browser: var("BROWSER").map(|b| b.to_string_lossy().into_owned()),
        }
    }
}

/// Resolved file locations for one account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub home: PathBuf,
    pub xdg_config_home: PathBuf,
    pub turses_dir: PathBuf,
    pub config_file: PathBuf,
    pub token_file: PathBuf,
    pub log_file: PathBuf,
}

impl Paths {
    /// Resolve all paths from the environment and the optional suffixes
    ///
    /// `account` suffixes the token file. The config file takes `config`
    /// when given and falls back to `account`, so each account gets its own
    /// settings unless told otherwise.
    pub fn resolve(env: &Environment, account: Option<&str>, config: Option<&str>) -> Result<Self> {
        let home = env.home.clone().ok_or(ConfigError::MissingEnv("HOME"))?;
        let xdg_config_home = env
            .xdg_config_home
            .clone()
            .unwrap_or_else(|| home.join(".config"));
        let turses_dir = xdg_config_home.join(APP_NAME);

        let token_file = turses_dir.join(suffixed(TOKEN_FILE, account));
        let config_file = turses_dir.join(suffixed(CONFIG_FILE, config.or(account)));
        let log_file = turses_dir.join(LOG_FILE);

        log::debug!("Resolved config directory {:?}", turses_dir);
        Ok(Self {
            home,
            xdg_config_home,
            turses_dir,
            config_file,
            token_file,
            log_file,
        })
    }
}

fn suffixed(name: &str, suffix: Option<&str>) -> String {
    match suffix.filter(|s| !s.is_empty()) {
        Some(suffix) => format!("{}.{}", name, suffix),
        None => name.to_string(),
    }
}

/// Outcome of [`ensure_dir`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirStatus {
    Existed,
    Created,
}

/// Create `dir` (and its parents) unless it already exists
pub fn ensure_dir(dir: &Path) -> Result<DirStatus> {
    if dir.is_dir() {
        return Ok(DirStatus::Existed);
    }
    fs::create_dir_all(dir).map_err(|e| ConfigError::io(dir, e))?;
    log::info!("Created directory {:?}", dir);
    Ok(DirStatus::Created)
}

/// Create the parent directory of `file`, logging instead of failing
///
/// A directory that cannot be created is not fatal here: the caller goes on
/// and the following open/write reports the real error.
pub(crate) fn ensure_parent_dir(file: &Path) -> Option<ConfigError> {
    let parent = file.parent()?;
    match ensure_dir(parent) {
        Ok(_) => None,
        Err(e) => {
            log::warn!("Couldn't create the directory {:?}: {}", parent, e);
            Some(e)
        }
    }
}
