#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;
use anyhow::{anyhow, bail};
use clap::{Parser, Subcommand};
use log::error;
use shared::model::UserProfile;
use shared::utils::{CONFIG_FILE, CONFIG_PATH};
use sigchos::api::HttpAuthApi;
use sigchos::auth::{token_expiry, validate_login, validate_registration, watch_session, welcome_message, RegistrationForm, SessionManager};
use sigchos::model::{AppConfig, ENV_API_BASE};
use sigchos::repository::{CredentialStore, FileStorage};
use sigchos::utils::init_logger;
use tokio_util::sync::CancellationToken;

const ENV_PASSWORD: &str = "SIGCHOS_PASSWORD";

type Session = SessionManager<FileStorage, HttpAuthApi>;

#[derive(Parser)]
#[command(name = "sigchos")]
#[command(version)]
#[command(about = "Session client for the Sigchos e-commerce backend", long_about = None)]
struct Args {
    /// The config directory
    #[arg(short = 'p', long = "config-path")]
    config_path: Option<String>,

    /// The config file
    #[arg(short = 'c', long = "config")]
    config_file: Option<String>,

    /// Base url of the auth service, e.g. http://localhost:8080/api/auth
    #[arg(long = "api-base")]
    api_base: Option<String>,

    /// log level
    #[arg(short = 'l', long = "log-level")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and store the session
    Login {
        #[arg(short = 'u', long)]
        username: Option<String>,
        /// Remember the username for the next login
        #[arg(long, default_value_t = false)]
        remember: bool,
    },
    /// Clear the stored session
    Logout,
    /// Show whether the stored session is valid
    Status,
    /// Print the stored profile
    Whoami,
    /// Print the headers for authenticated requests
    Headers,
    /// Create a customer account
    Register {
        #[arg(short = 'u', long)]
        username: String,
        #[arg(short = 'e', long)]
        email: String,
        #[arg(long)]
        nombre: String,
        #[arg(long)]
        apellido: String,
    },
    /// Check that the auth service answers
    Probe,
    /// Report session validity changes until interrupted
    Watch {
        /// Seconds between checks
        #[arg(short = 'i', long)]
        interval: Option<u64>,
    },
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config_dir = PathBuf::from(args.config_path.as_deref().unwrap_or(CONFIG_PATH));
    let config_file = args.config_file.as_ref().map_or_else(|| config_dir.join(CONFIG_FILE), PathBuf::from);
    let config = match AppConfig::read(&config_file) {
        Ok(config) => config,
        Err(err) => {
            init_logger(args.log_level.as_deref(), None);
            error!("{err}");
            std::process::exit(1);
        }
    };
    init_logger(args.log_level.as_deref(), config.log_level.as_deref());

    if let Err(err) = run(args, &config, &config_dir).await {
        error!("{err}");
        std::process::exit(1);
    }
}

async fn run(args: Args, config: &AppConfig, config_dir: &std::path::Path) -> anyhow::Result<()> {
    let env_api_base = std::env::var(ENV_API_BASE).ok();
    let api_base = config.resolve_api_base(args.api_base.as_deref(), env_api_base.as_deref())?;
    let store = CredentialStore::new(FileStorage::new(config.storage_path(config_dir)));
    let session = SessionManager::with_policy(store, HttpAuthApi::new(&api_base), config.inspection_policy);

    match args.command {
        Command::Login { username, remember } => login(&session, username, remember).await,
        Command::Logout => {
            let navigation = session.logout();
            println!("Logged out, continue at {}", navigation.route());
            Ok(())
        }
        Command::Status => {
            status(&session);
            Ok(())
        }
        Command::Whoami => whoami(&session),
        Command::Headers => {
            let mut headers: Vec<_> = session.auth_header().into_iter().collect();
            headers.sort();
            for (name, value) in headers {
                println!("{name}: {value}");
            }
            Ok(())
        }
        Command::Register { username, email, nombre, apellido } => register(&session, username, email, nombre, apellido).await,
        Command::Probe => {
            if session.check_connection().await {
                println!("Auth service at {api_base} is reachable");
                Ok(())
            } else {
                bail!("Auth service at {api_base} is not reachable")
            }
        }
        Command::Watch { interval } => {
            let secs = interval.unwrap_or(config.watch_interval_secs).max(1);
            watch(&session, Duration::from_secs(secs)).await;
            Ok(())
        }
    }
}

fn prompt_line(prompt: &str) -> anyhow::Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn read_password(prompt: &str) -> anyhow::Result<String> {
    if let Ok(password) = std::env::var(ENV_PASSWORD) {
        return Ok(password);
    }
    Ok(rpassword::prompt_password(prompt)?)
}

async fn login(session: &Session, username: Option<String>, remember: bool) -> anyhow::Result<()> {
    if session.is_session_valid() {
        println!("Already signed in, continue at {}", session.default_route());
        return Ok(());
    }

    let username = match username.or_else(|| session.store().remembered_username()) {
        Some(username) => username,
        None => prompt_line("Username: ")?,
    };
    let password = read_password("Password: ")?;
    let username = validate_login(&username, &password)?;

    let data = session.login(&username, &password).await?;
    session.store().update_remembered_username(&username, remember);
    println!("{}", welcome_message(&data.profile));
    println!("Continue at {}", session.default_route());
    Ok(())
}

fn describe(profile: &UserProfile) -> String {
    format!("{} ({}, {})", profile.display_name(), profile.role.label(), profile.role.user_type())
}

fn status(session: &Session) {
    if !session.is_session_valid() {
        println!("No active session");
        return;
    }
    if let Some(profile) = session.profile() {
        println!("Signed in as {}", describe(&profile));
    }
    let expiry = session.store().get_token().as_deref().and_then(token_expiry);
    match expiry.and_then(|exp| chrono::DateTime::from_timestamp(exp, 0)) {
        Some(expires_at) => println!("Token expires {}", expires_at.format("%d.%m.%Y %H:%M:%S UTC")),
        None => println!("Token expiry unknown"),
    }
    println!("Back office access: {}", if session.is_staff() { "yes" } else { "no" });
}

fn whoami(session: &Session) -> anyhow::Result<()> {
    let profile = session.profile().ok_or_else(|| anyhow!("Not signed in"))?;
    println!("{}", serde_json::to_string_pretty(&profile)?);
    Ok(())
}

async fn register(session: &Session, username: String, email: String, nombre: String, apellido: String) -> anyhow::Result<()> {
    let password = read_password("Password: ")?;
    let confirm_password = match std::env::var(ENV_PASSWORD) {
        Ok(password) => password,
        Err(_) => rpassword::prompt_password("Confirm password: ")?,
    };
    let form = RegistrationForm { username, password, confirm_password, email, nombre, apellido };
    let request = validate_registration(&form)?;
    let response = session.register(request).await?;
    let message = response.message.unwrap_or_default();
    if response.success {
        println!("{message}");
        if let Some(profile) = response.data {
            println!("Created {}", describe(&profile));
        }
        Ok(())
    } else {
        bail!(message)
    }
}

async fn watch(session: &Session, period: Duration) {
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for ctrl-c: {err}");
        }
        on_signal.cancel();
    });
    watch_session(session, period, cancel, |valid| {
        if valid {
            println!("Session active");
        } else {
            println!("No active session");
        }
    })
    .await;
}
