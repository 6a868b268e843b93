//! Configuration and credential bootstrap for turses
//!
//! This crate provides:
//! - Path resolution for the config, token and log files (`XDG_CONFIG_HOME`, account suffixes)
//! - Built-in defaults for colors, key bindings and params
//! - The INI config codec, overlaying file values on the defaults
//! - Token file persistence
//! - The interactive OAuth 1.0a PIN authorization
//! - [`Configuration`], which ties all of the above together at startup
//!
//! # Example
//!
//! ```rust,no_run
//! use turses_config::{
//!     BootstrapOptions, Configuration, Environment, OAuthAuthorizer, ReqwestTransport,
//!     TerminalPrompt,
//! };
//!
//! # fn example() -> turses_config::Result<()> {
//! let env = Environment::from_process();
//! let mut authorizer = OAuthAuthorizer::new(ReqwestTransport::new()?);
//! let config = Configuration::bootstrap(
//!     &BootstrapOptions::default(),
//!     &env,
//!     &mut authorizer,
//!     &mut TerminalPrompt,
//! )?;
//! println!("refresh: {:?}", config.runtime().param("refresh"));
//! # Ok(())
//! # }
//! ```

pub mod config_file;
pub mod configuration;
pub mod defaults;
pub mod error;
pub mod oauth;
pub mod paths;
pub mod prompt;
pub mod token;

#[cfg(test)]
mod testing;

/// Directory name under the config home
pub const APP_NAME: &str = "turses";

pub use config_file::{char_value, RuntimeConfig};
pub use configuration::{BootstrapOptions, Configuration};
pub use defaults::{Defaults, PaletteEntry, ParamKind, ParamValue, DEFAULTS};
pub use error::{ConfigError, Result};
pub use oauth::{AuthState, Authorize, OAuthAuthorizer, ReqwestTransport};
pub use paths::{DirStatus, Environment, Paths};
pub use prompt::{Prompt, TerminalPrompt};
pub use token::Credential;
