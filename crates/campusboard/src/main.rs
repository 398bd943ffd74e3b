//! campusboard - College administration dashboard

mod cli;

use anyhow::{bail, Context, Result};
use campusboard_core::models::UserProfile;
use campusboard_core::{
    sync_profile_image, upload_profile_image, AppConfig, DashboardPanel, HttpResourceClient,
    ImageUpload, Locale, ResourceStore, SessionContext,
};
use clap::{Parser, Subcommand};
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "campusboard",
    version,
    about = "College administration dashboard",
    long_about = "REST API server for college records, and a faculty client for it.\n\
                  \n\
                  Examples:\n\
                    campusboard serve --seed seed.json   # Run the API on :5000\n\
                    campusboard login --id u1 --name \"Dr. Rao\"\n\
                    campusboard dashboard                # Today's classes and counts\n\
                    campusboard dashboard --locale hindi\n\
                    campusboard upload ./me.png          # New profile image\n\
                  \n\
                  Environment Variables:\n\
                    CAMPUSBOARD_BASE_URL             # API base URL for client commands\n\
                    CAMPUSBOARD_DATA_DIR             # Where the local session is kept\n\
                    CAMPUSBOARD_LOCALE               # English | Hindi | Marathi\n\
                    CAMPUSBOARD_NO_COLOR             # Disable ANSI colors\n\
                    RUST_LOG                         # Log filter (default: info)"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file (default: <config dir>/campusboard/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// API base URL for client commands
    #[arg(long, global = true, env = "CAMPUSBOARD_BASE_URL")]
    base_url: Option<String>,

    /// Directory holding the local session
    #[arg(long, global = true, env = "CAMPUSBOARD_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Display language (English, Hindi, Marathi)
    #[arg(long, global = true, env = "CAMPUSBOARD_LOCALE")]
    locale: Option<Locale>,

    /// Disable ANSI colors (log-friendly)
    #[arg(long, global = true, env = "CAMPUSBOARD_NO_COLOR")]
    no_color: bool,

    /// Debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Run the REST API server
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
        /// Directory profile images are stored in
        #[arg(long)]
        upload_dir: Option<PathBuf>,
        /// JSON file loaded into the store at startup
        #[arg(long)]
        seed: Option<PathBuf>,
    },
    /// Record the signed-in user locally
    Login {
        /// Account id
        #[arg(long)]
        id: String,
        /// Display name, matched against schedule entries
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "faculty")]
        role: String,
        #[arg(long)]
        email: Option<String>,
    },
    /// Forget the signed-in user
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Show today's classes and dashboard counts
    Dashboard {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Upload a new profile image
    Upload {
        /// Image file
        file: PathBuf,
    },
    /// Pull the profile image from the faculty directory
    SyncProfile,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(base_url) = cli.base_url {
        config.client.base_url = base_url;
    }
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = Some(data_dir);
    }
    if let Some(locale) = cli.locale {
        config.locale = locale;
    }
    let no_color = cli.no_color;

    match cli.command {
        Command::Serve {
            host,
            port,
            upload_dir,
            seed,
        } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(upload_dir) = upload_dir {
                config.server.upload_dir = upload_dir;
            }
            if seed.is_some() {
                config.server.seed = seed;
            }
            run_serve(config).await?;
        }
        Command::Login {
            id,
            name,
            role,
            email,
        } => {
            run_login(
                &config,
                UserProfile {
                    id,
                    name,
                    role,
                    email,
                    profile_img: None,
                },
            )?;
        }
        Command::Logout => run_logout(&config)?,
        Command::Whoami => run_whoami(&config),
        Command::Dashboard { json } => run_dashboard(&config, json, no_color).await?,
        Command::Upload { file } => run_upload(&config, file).await?,
        Command::SyncProfile => run_sync_profile(&config).await?,
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Logs go to stderr so `--json` output stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run_serve(config: AppConfig) -> Result<()> {
    let store = Arc::new(ResourceStore::new());
    if let Some(seed) = &config.server.seed {
        store
            .load_seed(seed)
            .with_context(|| format!("Failed to load seed data from {}", seed.display()))?;
    }

    let addr = resolve_addr(&config.server.host, config.server.port)?;
    let state = campusboard_web::AppState::new(store, config.server.upload_dir.clone());

    campusboard_web::run(state, addr).await
}

fn resolve_addr(host: &str, port: u16) -> Result<SocketAddr> {
    (host, port)
        .to_socket_addrs()
        .with_context(|| format!("Invalid listen address {}:{}", host, port))?
        .next()
        .with_context(|| format!("No address found for {}", host))
}

fn client(config: &AppConfig) -> Result<HttpResourceClient> {
    HttpResourceClient::new(&config.client.base_url, config.client.timeout())
        .context("Failed to create API client")
}

fn signed_in_session(config: &AppConfig) -> Result<SessionContext> {
    let session = SessionContext::load(&config.data_dir());
    if session.current().is_none() {
        bail!("Not signed in. Run `campusboard login --id <id> --name <name>` first");
    }
    Ok(session)
}

fn run_login(config: &AppConfig, profile: UserProfile) -> Result<()> {
    let mut session = SessionContext::load(&config.data_dir());
    let name = profile.name.clone();
    session.login(profile).context("Failed to save session")?;
    println!("Signed in as {}", name);
    Ok(())
}

fn run_logout(config: &AppConfig) -> Result<()> {
    let mut session = SessionContext::load(&config.data_dir());
    session.logout().context("Failed to clear session")?;
    println!("Signed out");
    Ok(())
}

fn run_whoami(config: &AppConfig) {
    let session = SessionContext::load(&config.data_dir());
    println!("{}", cli::format_profile(session.current()));
}

async fn run_dashboard(config: &AppConfig, json: bool, no_color: bool) -> Result<()> {
    let mut session = signed_in_session(config)?;
    let client = client(config)?;
    let faculty_name = session
        .current()
        .map(|user| user.name.clone())
        .unwrap_or_default();

    let panel = DashboardPanel::new();
    let now = chrono::Local::now();

    // Image sync runs alongside the load and never blocks or fails it
    let (outcome, applied) = tokio::join!(
        sync_profile_image(&client, &mut session),
        panel.refresh(&client, &faculty_name, &now)
    );
    debug!(?outcome, applied, "Dashboard loaded");

    let view = panel.view().context("Dashboard view was not loaded")?;
    for line in cli::format_report(&view.report) {
        eprintln!("{}", line);
    }

    let user = session.current().context("Session was cleared during load")?;
    println!(
        "{}",
        cli::format_today_view(&view, user, config.locale, json, no_color)
    );
    Ok(())
}

async fn run_upload(config: &AppConfig, file: PathBuf) -> Result<()> {
    let mut session = signed_in_session(config)?;
    let client = client(config)?;
    let image = ImageUpload::from_path(&file)?;

    let path = upload_profile_image(&client, &mut session, image)
        .await
        .with_context(|| format!("Failed to upload {}", file.display()))?;
    println!("Profile image stored at {}", path);
    Ok(())
}

async fn run_sync_profile(config: &AppConfig) -> Result<()> {
    let mut session = signed_in_session(config)?;
    let client = client(config)?;
    let outcome = sync_profile_image(&client, &mut session).await;
    println!("{}", cli::format_sync_outcome(&outcome));
    Ok(())
}
