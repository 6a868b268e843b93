//! Startup orchestration
//!
//! Resolves paths, loads (or first writes) the config file, then loads the
//! token file or runs the OAuth flow to create it. The result is read-only.

use crate::config_file::{self, RuntimeConfig};
use crate::defaults::DEFAULTS;
use crate::error::Result;
use crate::oauth::Authorize;
use crate::paths::{self, Environment, Paths};
use crate::prompt::Prompt;
use crate::token::{self, Credential};
use std::path::{Path, PathBuf};

/// Already-parsed command line inputs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapOptions {
    /// Suffix for the token file (and config file unless `config` is set)
    pub account: Option<String>,
    /// Suffix for the config file only
    pub config: Option<String>,
}

/// Configuration and credential of the active account
#[derive(Debug, Clone)]
pub struct Configuration {
    paths: Paths,
    runtime: RuntimeConfig,
    credential: Credential,
}

impl Configuration {
    pub fn bootstrap(
        options: &BootstrapOptions,
        env: &Environment,
        authorizer: &mut dyn Authorize,
        prompt: &mut dyn Prompt,
    ) -> Result<Self> {
        let paths = Paths::resolve(env, options.account.as_deref(), options.config.as_deref())?;
        if let Err(e) = paths::ensure_dir(&paths.turses_dir) {
            log::warn!("Continuing without config directory: {}", e);
            prompt.show(&format!(
                "Couldn't create the directory in {}",
                paths.turses_dir.display()
            ));
        }

        let generating = !paths.config_file.is_file();
        let runtime = config_file::load_or_generate(&paths.config_file, &DEFAULTS, env)?;
        if generating {
            prompt.show(&format!(
                "Generating configuration file in {}",
                paths.config_file.display()
            ));
        }

        let credential = if paths.token_file.is_file() {
            token::load(&paths.token_file)?
        } else {
            log::info!("No token file at {:?}, starting authorization", paths.token_file);
            let credential = authorizer.authorize(prompt)?;
            token::save(&paths.token_file, &credential)?;
            prompt.show("your account has been saved");
            credential
        };

        Ok(Self {
            paths,
            runtime,
            credential,
        })
    }

    /// Write the default configuration and return where it went
    ///
    /// Without `target` the account's regular config file is used.
    pub fn generate_only(
        options: &BootstrapOptions,
        env: &Environment,
        target: Option<&Path>,
        prompt: &mut dyn Prompt,
    ) -> Result<PathBuf> {
        let path = match target {
            Some(path) => path.to_path_buf(),
            None => {
                Paths::resolve(env, options.account.as_deref(), options.config.as_deref())?
                    .config_file
            }
        };
        if let Some(e) = paths::ensure_parent_dir(&path) {
            prompt.show(&e.to_string());
        }

        config_file::generate(&path, &RuntimeConfig::from_defaults(&DEFAULTS))?;
        prompt.show(&format!("Generating configuration file in {}", path.display()));
        Ok(path)
    }

    pub fn paths(&self) -> &Paths {
        &self.paths
    }

    pub fn runtime(&self) -> &RuntimeConfig {
        &self.runtime
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn save_last_read(&self, last_read: u64) -> Result<()> {
        token::save_last_read(&self.paths.token_file, last_read)
    }

    pub fn last_read(&self) -> Result<Option<u64>> {
        token::load_last_read(&self.paths.token_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::oauth::{AuthState, Consumer, HttpResponse, OAuthAuthorizer};
    use crate::testing::{CountingAuthorizer, FakeTransport, ScriptedPrompt};
    use std::fs;

    fn env_in(dir: &Path) -> Environment {
        Environment {
            home: Some(dir.join("home")),
            xdg_config_home: Some(dir.join("xdg")),
            browser: None,
        }
    }

    #[test]
    fn test_first_run_authorizes_and_persists() {
        let tmp = tempfile::tempdir().unwrap();
        let env = env_in(tmp.path());
        let mut auth = CountingAuthorizer::granting(Credential::new("T2", "S2"));
        let mut prompt = ScriptedPrompt::default();

        let config =
            Configuration::bootstrap(&BootstrapOptions::default(), &env, &mut auth, &mut prompt)
                .unwrap();

        assert_eq!(auth.calls, 1);
        assert!(config.paths().config_file.is_file());
        assert_eq!(token::load(&config.paths().token_file).unwrap(), Credential::new("T2", "S2"));
        assert_eq!(config.credential(), &Credential::new("T2", "S2"));
        assert_eq!(config.runtime(), &RuntimeConfig::from_defaults(&DEFAULTS));
    }

    #[test]
    fn test_missing_token_with_existing_config_authorizes_once() {
        let tmp = tempfile::tempdir().unwrap();
        let env = env_in(tmp.path());
        let dir = tmp.path().join("xdg").join("turses");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("turses.cfg"), "[params]\nrefresh=5\n").unwrap();
        let mut auth = CountingAuthorizer::granting(Credential::new("abc", "xyz"));
        let mut prompt = ScriptedPrompt::default();

        let config =
            Configuration::bootstrap(&BootstrapOptions::default(), &env, &mut auth, &mut prompt)
                .unwrap();

        assert_eq!(auth.calls, 1);
        assert!(dir.join("turses.tok").is_file());
        assert_eq!(config.runtime().refresh(), Some(5));
        assert!(!prompt
            .shown()
            .iter()
            .any(|line| line.starts_with("Generating configuration file")));
    }

    #[test]
    fn test_existing_token_skips_authorization() {
        let tmp = tempfile::tempdir().unwrap();
        let env = env_in(tmp.path());
        let token_file = tmp.path().join("xdg").join("turses").join("turses.tok.work");
        token::save(&token_file, &Credential::new("stored", "secret")).unwrap();
        let options = BootstrapOptions {
            account: Some("work".to_string()),
            config: None,
        };
        let mut auth = CountingAuthorizer::failing();
        let mut prompt = ScriptedPrompt::default();

        let config = Configuration::bootstrap(&options, &env, &mut auth, &mut prompt).unwrap();

        assert_eq!(auth.calls, 0);
        assert_eq!(config.credential(), &Credential::new("stored", "secret"));
        assert!(config.paths().config_file.ends_with("turses.cfg.work"));
    }

    #[test]
    fn test_failed_authorization_writes_no_token() {
        let tmp = tempfile::tempdir().unwrap();
        let env = env_in(tmp.path());
        let mut auth = CountingAuthorizer::failing();
        let mut prompt = ScriptedPrompt::default();

        let err =
            Configuration::bootstrap(&BootstrapOptions::default(), &env, &mut auth, &mut prompt)
                .unwrap_err();

        assert!(matches!(err, ConfigError::RequestTokenFailed { status: 401 }));
        assert!(!tmp.path().join("xdg").join("turses").join("turses.tok").exists());
    }

    #[test]
    fn test_rejected_request_token_leaves_no_token_file() {
        let tmp = tempfile::tempdir().unwrap();
        let env = env_in(tmp.path());
        let transport = FakeTransport::new(vec![HttpResponse::new(401, "")]);
        let mut auth = OAuthAuthorizer::with_base_url(&transport, "https://oauth.test")
            .with_consumer(Consumer::new("ckey", "csecret"));
        let mut prompt = ScriptedPrompt::new(["never asked"]);

        let err =
            Configuration::bootstrap(&BootstrapOptions::default(), &env, &mut auth, &mut prompt)
                .unwrap_err();

        assert!(matches!(err, ConfigError::RequestTokenFailed { status: 401 }));
        assert_eq!(auth.state(), AuthState::RequestFailed);
        assert_eq!(prompt.remaining_answers(), 1);
        let dir = tmp.path().join("xdg").join("turses");
        assert!(dir.join("turses.cfg").is_file());
        assert!(!dir.join("turses.tok").exists());
    }

    #[test]
    fn test_missing_home_is_fatal() {
        let mut auth = CountingAuthorizer::failing();
        let mut prompt = ScriptedPrompt::default();

        let err = Configuration::bootstrap(
            &BootstrapOptions::default(),
            &Environment::default(),
            &mut auth,
            &mut prompt,
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::MissingEnv("HOME")));
        assert_eq!(auth.calls, 0);
    }

    #[test]
    fn test_generate_only_to_explicit_path() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("dump").join("my.cfg");
        let mut prompt = ScriptedPrompt::default();

        let written = Configuration::generate_only(
            &BootstrapOptions::default(),
            &Environment::default(),
            Some(&target),
            &mut prompt,
        )
        .unwrap();

        assert_eq!(written, target);
        assert!(fs::read_to_string(&target).unwrap().contains("[params]"));
    }

    #[test]
    fn test_generate_only_defaults_to_account_config() {
        let tmp = tempfile::tempdir().unwrap();
        let env = env_in(tmp.path());
        let options = BootstrapOptions {
            account: None,
            config: Some("alt".to_string()),
        };
        let mut prompt = ScriptedPrompt::default();

        let written = Configuration::generate_only(&options, &env, None, &mut prompt).unwrap();

        assert_eq!(written, tmp.path().join("xdg").join("turses").join("turses.cfg.alt"));
        assert!(written.is_file());
    }

    #[test]
    fn test_last_read_round_trip_through_facade() {
        let tmp = tempfile::tempdir().unwrap();
        let env = env_in(tmp.path());
        let mut auth = CountingAuthorizer::granting(Credential::new("a", "b"));
        let mut prompt = ScriptedPrompt::default();
        let config =
            Configuration::bootstrap(&BootstrapOptions::default(), &env, &mut auth, &mut prompt)
                .unwrap();

        config.save_last_read(42).unwrap();

        assert_eq!(config.last_read().unwrap(), Some(42));
        assert_eq!(token::load(&config.paths().token_file).unwrap(), Credential::new("a", "b"));
    }
}
