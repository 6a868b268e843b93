use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use turses_config::{
    BootstrapOptions, Configuration, Environment, OAuthAuthorizer, ReqwestTransport,
    TerminalPrompt,
};

mod logger;

/// A Twitter client for the console
#[derive(Debug, Parser)]
#[command(name = "turses", version)]
struct Cli {
    /// Write the default configuration (to FILE, or the account's config file) and exit
    #[arg(short = 'g', long, value_name = "FILE", num_args = 0..=1)]
    generate_config: Option<Option<PathBuf>>,

    /// Use a separate token and config file for this account
    #[arg(short, long)]
    account: Option<String>,

    /// Use `turses.cfg.<CONFIG>` as config file
    #[arg(short, long)]
    config: Option<String>,
}

impl Cli {
    fn bootstrap_options(&self) -> BootstrapOptions {
        BootstrapOptions {
            account: self.account.clone(),
            config: self.config.clone(),
        }
    }
}

fn main() -> Result<()> {
    // A local .env may set BROWSER or XDG_CONFIG_HOME
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Ignoring .env: {}", e);
        }
    }

    let cli = Cli::parse();
    let env = Environment::from_process();
    let options = cli.bootstrap_options();
    let mut prompt = TerminalPrompt;

    if let Some(target) = &cli.generate_config {
        Configuration::generate_only(&options, &env, target.as_deref(), &mut prompt)
            .context("Failed to generate configuration file")?;
        return Ok(());
    }

    let transport = ReqwestTransport::new().context("Failed to build HTTP client")?;
    let mut authorizer = OAuthAuthorizer::new(transport);
    let config = Configuration::bootstrap(&options, &env, &mut authorizer, &mut prompt)
        .context("Failed to load configuration")?;

    logger::init(
        &config.paths().log_file,
        logger::level_for(config.runtime()),
    )?;
    log::info!("turses starting...");
    log::info!("Using config {:?}", config.paths().config_file);
    log::debug!("Using token {:?}", config.credential());
    let runtime = config.runtime();
    log::debug!(
        "Refresh every {:?} min, box position {:?}, tweet border {:?}",
        runtime.refresh(),
        runtime.box_position(),
        runtime.flag("tweet_border")
    );

    Ok(())
}
