//! OAuth credential persistence
//!
//! The token file is INI with a single `token` section:
//!
//! ```ini
//! [token]
//! oauth_token=...
//! oauth_token_secret=...
//! ```
//!
//! It acts as a create-on-first-use cache: the remote credential does not
//! expire, so once written it is read back on every start.

use crate::error::{ConfigError, Result};
use crate::paths;
use ini::Ini;
use std::path::Path;

const TOKEN: &str = "token";
const OAUTH_TOKEN: &str = "oauth_token";
const OAUTH_TOKEN_SECRET: &str = "oauth_token_secret";
const LAST_READ: &str = "last_read";
const LAST_READ_ID: &str = "id";

/// An OAuth token and its secret
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub oauth_token: String,
    pub oauth_token_secret: String,
}

impl Credential {
    pub fn new(oauth_token: impl Into<String>, oauth_token_secret: impl Into<String>) -> Self {
        Self {
            oauth_token: oauth_token.into(),
            oauth_token_secret: oauth_token_secret.into(),
        }
    }
}

// Keep secrets out of logs
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("oauth_token", &self.oauth_token)
            .field("oauth_token_secret", &"<redacted>")
            .finish()
    }
}

/// Read the credential stored at `path`
///
/// A file that does not exist is an [`ConfigError::Io`] (see
/// [`ConfigError::is_not_found`]); a file lacking either field is a
/// [`ConfigError::MissingCredentialField`].
pub fn load(path: &Path) -> Result<Credential> {
    let conf = Ini::load_from_file(path).map_err(|e| ConfigError::from_ini(path, e))?;
    let field = |name: &'static str| {
        conf.get_from(Some(TOKEN), name)
            .map(str::to_string)
            .ok_or_else(|| ConfigError::MissingCredentialField {
                path: path.to_path_buf(),
                field: name,
            })
    };

    let credential = Credential {
        oauth_token: field(OAUTH_TOKEN)?,
        oauth_token_secret: field(OAUTH_TOKEN_SECRET)?,
    };
    log::debug!("Loaded token from {:?}", path);
    Ok(credential)
}

/// Write `credential` to `path`, replacing any previous content
pub fn save(path: &Path, credential: &Credential) -> Result<()> {
    paths::ensure_parent_dir(path);

    let mut conf = Ini::new();
    conf.with_section(Some(TOKEN))
        .set(OAUTH_TOKEN, credential.oauth_token.as_str())
        .set(OAUTH_TOKEN_SECRET, credential.oauth_token_secret.as_str());
    conf.write_to_file(path)
        .map_err(|e| ConfigError::io(path, e))?;

    log::info!("Saved token to {:?}", path);
    Ok(())
}

/// Record the id of the last read status next to the credential
///
/// The `token` section is left as it is.
pub fn save_last_read(path: &Path, last_read: u64) -> Result<()> {
    let mut conf = Ini::load_from_file(path).map_err(|e| ConfigError::from_ini(path, e))?;
    conf.with_section(Some(LAST_READ))
        .set(LAST_READ_ID, last_read.to_string());
    conf.write_to_file(path)
        .map_err(|e| ConfigError::io(path, e))?;

    log::debug!("Saved last read id {} to {:?}", last_read, path);
    Ok(())
}

/// The last read status id, `None` if never saved
pub fn load_last_read(path: &Path) -> Result<Option<u64>> {
    let conf = Ini::load_from_file(path).map_err(|e| ConfigError::from_ini(path, e))?;
    conf.get_from(Some(LAST_READ), LAST_READ_ID)
        .map(|raw| {
            raw.trim().parse().map_err(|_| ConfigError::InvalidInteger {
                key: LAST_READ_ID.to_string(),
                value: raw.to_string(),
            })
        })
        .transpose()
}
