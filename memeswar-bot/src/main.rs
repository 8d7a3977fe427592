mod accounts;
mod client;
mod console;
mod errors;
mod headers;
mod orchestrator;
mod quests;
mod retry;
mod session;
mod transport;
mod validator;

#[cfg(test)]
mod test_support;

use anyhow::Result;
use clap::Parser;
use std::io::ErrorKind;
use std::path::PathBuf;

use errors::BotError;
use headers::pick_user_agent;
use memeswar_core::{BotConfig, SessionCredential};
use orchestrator::Orchestrator;
use transport::HttpTransport;

#[derive(Debug, Parser)]
#[command(name = "memeswar-bot", version)]
#[command(
    about = "Multi-account Memes War bot - daily check-in, quests, treasury and guild warbonds"
)]
struct Args {
    /// File with one raw init-data line per account
    #[arg(long, default_value = "data.txt")]
    accounts: PathBuf,

    /// JSON config file (optional; defaults apply when it does not exist)
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Guild that receives every account's warbonds (overrides the config file)
    #[arg(long)]
    guild_id: Option<String>,

    /// Referral code applied to each account (overrides the config file)
    #[arg(long)]
    referral_code: Option<String>,

    /// API base URL (overrides the config file)
    #[arg(long)]
    base_url: Option<String>,

    /// Run a single cycle and exit
    #[arg(long, conflicts_with = "cycles")]
    once: bool,

    /// Stop after this many cycles
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    cycles: Option<u64>,

    /// Skip the banner
    #[arg(long)]
    no_banner: bool,

    /// Verbose output (debug logging unless RUST_LOG is set)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    tokio::select! {
        result = run(&args) => match result {
            Ok(cycles) => {
                log::info!("finished after {cycles} cycle(s)");
                Ok(())
            }
            Err(BotError::Accounts(err)) => {
                console::failure(&err);
                console::failure("No accounts found");
                Ok(())
            }
            Err(BotError::ContractBroken(err)) => {
                console::fatal(&err);
                std::process::exit(1);
            }
            Err(err) => Err(anyhow::Error::new(err).context("memeswar-bot could not start")),
        },
        _ = tokio::signal::ctrl_c() => {
            console::warning("Script terminated by user");
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

async fn run(args: &Args) -> Result<u64, BotError> {
    let config = load_config(args)?;
    if !args.no_banner {
        console::banner();
    }
    let accounts = accounts::read_accounts(&args.accounts)?;
    console::info(format!("Loaded {} account(s)", accounts.len()));

    let orchestrator = Orchestrator::new(config, |credential: &SessionCredential| {
        let agent = pick_user_agent(&mut rand::thread_rng());
        log::debug!("user agent: {agent}");
        HttpTransport::for_account(credential, agent)
    });
    Ok(orchestrator.run(&accounts, max_cycles(args)).await?)
}

fn load_config(args: &Args) -> Result<BotConfig, BotError> {
    let mut config = match std::fs::read_to_string(&args.config) {
        Ok(text) => BotConfig::from_json_str(&text)?,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            log::debug!("{} not found, using defaults", args.config.display());
            BotConfig::default()
        }
        Err(source) => {
            return Err(BotError::ConfigFile {
                path: args.config.clone(),
                source,
            });
        }
    };
    apply_overrides(&mut config, args);
    config.validate()?;
    Ok(config)
}

fn apply_overrides(config: &mut BotConfig, args: &Args) {
    if let Some(guild_id) = &args.guild_id {
        config.guild_id.clone_from(guild_id);
    }
    if let Some(code) = &args.referral_code {
        config.referral_code.clone_from(code);
    }
    if let Some(base_url) = &args.base_url {
        config.base_url.clone_from(base_url);
    }
}

const fn max_cycles(args: &Args) -> Option<u64> {
    if args.once { Some(1) } else { args.cycles }
}
