//! Config file codec
//!
//! The config file is INI with three sections:
//!
//! ```ini
//! [colors]
//! body=default
//!
//! [keys]
//! quit=q
//!
//! [params]
//! refresh=2
//! ```
//!
//! Loading overlays whatever the file defines on top of the [`Defaults`];
//! keys the file does not mention keep their default value. Writes are
//! best-effort: a failure half way leaves a truncated file behind.

use crate::defaults::{param_kind, Defaults, PaletteEntry, ParamValue};
use crate::error::{ConfigError, Result};
use crate::paths::Environment;
use ini::Ini;
use log::LevelFilter;
use std::collections::BTreeMap;
use std::path::Path;

const COLORS: &str = "colors";
const KEYS: &str = "keys";
const PARAMS: &str = "params";

/// Param overridden by the `BROWSER` environment variable
pub const OPENURL_COMMAND: &str = "openurl_command";

/// Live configuration: defaults overlaid with file and environment values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    params: BTreeMap<String, ParamValue>,
    keys: BTreeMap<String, String>,
    palette: Vec<PaletteEntry>,
}

impl RuntimeConfig {
    /// A config identical to `defaults`
    pub fn from_defaults(defaults: &Defaults) -> Self {
        Self {
            params: defaults.params().clone(),
            keys: defaults.keys().clone(),
            palette: defaults.palette().to_vec(),
        }
    }

    pub fn params(&self) -> &BTreeMap<String, ParamValue> {
        &self.params
    }

    pub fn keys(&self) -> &BTreeMap<String, String> {
        &self.keys
    }

    pub fn palette(&self) -> &[PaletteEntry] {
        &self.palette
    }

    pub fn param(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }

    /// Key binding string for `action`, e.g. `"q"` or `"^L"`
    pub fn key(&self, action: &str) -> Option<&str> {
        self.keys.get(action).map(String::as_str)
    }

    /// Numeric key code bound to `action`
    pub fn key_code(&self, action: &str) -> Option<u32> {
        self.key(action).and_then(char_value)
    }

    pub fn color(&self, name: &str) -> Option<&str> {
        self.palette
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.color.as_str())
    }

    /// Integer param `name`, `None` when unset or of another kind
    pub fn integer(&self, name: &str) -> Option<i64> {
        self.param(name).and_then(ParamValue::as_integer)
    }

    /// On/off param `name`, `None` when unset or of another kind
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.param(name).and_then(ParamValue::as_flag)
    }

    /// Minutes between timeline refreshes
    pub fn refresh(&self) -> Option<i64> {
        self.integer("refresh")
    }

    pub fn box_position(&self) -> Option<i64> {
        self.integer("box_position")
    }

    /// Command used to open URLs
    pub fn openurl_command(&self) -> Option<&str> {
        self.param(OPENURL_COMMAND).and_then(ParamValue::as_text)
    }

    /// Log level from `logging_level` (1 = debug .. 4 = error), Info when unset
    pub fn log_level(&self) -> Result<LevelFilter> {
        let raw = match self.param("logging_level") {
            None | Some(ParamValue::Disabled) => return Ok(LevelFilter::Info),
            Some(value) => value.to_string(),
        };
        match raw.trim().parse::<u8>() {
            Ok(1) => Ok(LevelFilter::Debug),
            Ok(2) => Ok(LevelFilter::Info),
            Ok(3) => Ok(LevelFilter::Warn),
            Ok(4) => Ok(LevelFilter::Error),
            _ => Err(ConfigError::InvalidLogLevel(raw)),
        }
    }
}

/// Write the three sections of `config` to `path`, replacing the file
pub fn generate(path: &Path, config: &RuntimeConfig) -> Result<()> {
    let mut conf = Ini::new();

    for entry in &config.palette {
        conf.with_section(Some(COLORS))
            .set(entry.name.as_str(), entry.color.as_str());
    }
    for (action, binding) in &config.keys {
        conf.with_section(Some(KEYS))
            .set(action.as_str(), binding.as_str());
    }
    for (name, value) in &config.params {
        if let Some(encoded) = value.encode() {
            conf.with_section(Some(PARAMS)).set(name.as_str(), encoded);
        }
    }

    conf.write_to_file(path)
        .map_err(|e| ConfigError::io(path, e))?;
    log::info!("Generated configuration file in {:?}", path);
    Ok(())
}

/// Load `path`, generating it from `defaults` first if it does not exist
///
/// Precedence of the result: environment > file > default.
pub fn load_or_generate(path: &Path, defaults: &Defaults, env: &Environment) -> Result<RuntimeConfig> {
    if !path.is_file() {
        log::info!("No config file at {:?}, writing defaults", path);
        generate(path, &RuntimeConfig::from_defaults(defaults))?;
    }

    let conf = Ini::load_from_file(path).map_err(|e| ConfigError::from_ini(path, e))?;
    log::debug!("Loaded config from {:?}", path);

    let mut config = overlay(defaults, &conf)?;
    apply_env(&mut config, env);
    Ok(config)
}

/// Build a config from `defaults` with every value `conf` defines replaced
///
/// A section header may appear more than once; its copies are merged in
/// file order, so a later value wins over an earlier one.
pub fn overlay(defaults: &Defaults, conf: &Ini) -> Result<RuntimeConfig> {
    let mut config = RuntimeConfig::from_defaults(defaults);

    let colors = section_entries(conf, COLORS);
    for entry in config.palette.iter_mut() {
        let mut colors_for_entry = colors
            .iter()
            .filter(|(name, _)| *name == entry.name)
            .map(|(_, color)| *color);
        if let Some(color) = colors_for_entry.next() {
            if colors_for_entry.next().is_some() {
                return Err(ConfigError::DuplicatePaletteEntry(entry.name.clone()));
            }
            entry.color = color.to_string();
        }
    }

    for (action, value) in section_entries(conf, KEYS) {
        match config.keys.get_mut(action) {
            Some(binding) => *binding = value.to_string(),
            None => log::debug!("Ignoring unknown key binding `{}`", action),
        }
    }

    overlay_params(&mut config.params, &section_entries(conf, PARAMS))?;

    Ok(config)
}

/// Every `key=value` pair of all sections called `name`, in file order
fn section_entries<'a>(conf: &'a Ini, name: &str) -> Vec<(&'a str, &'a str)> {
    conf.section_all(Some(name))
        .flat_map(|section| section.iter())
        .collect()
}

fn overlay_params(target: &mut BTreeMap<String, ParamValue>, entries: &[(&str, &str)]) -> Result<()> {
    for &(name, raw) in entries {
        let Some(value) = target.get_mut(name) else {
            log::debug!("Ignoring unknown param `{}`", name);
            continue;
        };
        let Some(kind) = param_kind(name) else {
            log::debug!("No decode rule for param `{}`, keeping default", name);
            continue;
        };
        *value = kind.decode(name, raw)?;
    }
    Ok(())
}

fn apply_env(config: &mut RuntimeConfig, env: &Environment) {
    if let Some(browser) = env.browser.as_deref().filter(|b| !b.is_empty()) {
        log::debug!("Using BROWSER={} as {}", browser, OPENURL_COMMAND);
        config
            .params
            .insert(OPENURL_COMMAND.to_string(), ParamValue::Text(browser.to_string()));
    }
}

/// Translate a key binding token to its numeric key code
///
/// `^X` caret notation maps to control characters 0-31. Anything else is
/// the code of its first character, so multi-character names such as
/// `"up"` are not distinguished from their initial letter.
pub fn char_value(binding: &str) -> Option<u32> {
    if binding.starts_with('^') {
        let wanted = binding.to_uppercase();
        if let Some(code) = (0u8..=31).find(|&code| unctrl(code) == wanted) {
            return Some(u32::from(code));
        }
    }
    binding.chars().next().map(u32::from)
}

/// Caret representation of a control character, `^@` for 0 through `^_` for 31
fn unctrl(code: u8) -> String {
    format!("^{}", char::from(code + 0x40))
}
