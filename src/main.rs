use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use quiz_session::config::ConfigError;
use quiz_session::net::auth_api::SignInError;
use quiz_session::{ApiError, App, ErrorCode, FileStore, LogNavigator, OutboundRequest, SessionConfig};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    SignIn(#[from] SignInError),
}

impl ErrorCode for CliError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Api(e) => e.error_code(),
            Self::SignIn(e) => e.error_code(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "quiz-session", about = "Quiz API session client")]
struct Cli {
    /// Overrides `QUIZ_API_BASE_URL`.
    #[arg(long)]
    base_url: Option<String>,

    /// Overrides `QUIZ_SESSION_DIR`.
    #[arg(long)]
    session_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and persist the session.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "QUIZ_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the persisted session.
    Logout,
    /// Show who is signed in.
    Status,
    /// `GET` an API path with the current credential and print the body.
    Get { path: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error [{}]: {e}", e.error_code());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = SessionConfig::from_env()?;
    if let Some(base_url) = cli.base_url {
        config.api_base_url = base_url;
    }
    if let Some(dir) = cli.session_dir {
        config.session_dir = dir;
    }

    let store = Arc::new(FileStore::new(config.session_dir.clone()));
    let app = App::bootstrap(config, store, Arc::new(LogNavigator))?;

    match cli.command {
        Command::Login { username, password } => {
            let user = app.sign_in(&username, &password).await?;
            println!("signed in as {} <{}> [{}]", user.display_name, user.username, user.role);
        }
        Command::Logout => {
            app.controller().logout();
            println!("signed out");
        }
        Command::Status => match app.state().user() {
            Some(user) => println!("signed in as {} <{}> [{}]", user.display_name, user.username, user.role),
            None => println!("signed out"),
        },
        Command::Get { path } => {
            let path = if path.starts_with('/') { path } else { format!("/{path}") };
            let resp = app.client().send(OutboundRequest::get(path)).await?;
            println!("{}", resp.body);
        }
    }
    Ok(())
}
