//! Tabletop CLI - board game shop from the terminal.
//!
//! Commands:
//! - `tabletop games` - List and filter the catalog
//! - `tabletop game` - Show one game
//! - `tabletop genres` - List genres
//! - `tabletop login` / `register` / `logout` / `whoami` - Accounts
//! - `tabletop shop` - Interactive browsing, cart and checkout
//! - `tabletop orders` - Order history
//! - `tabletop admin` - Add games, edit prices, run discounts
//! - `tabletop config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{AdminArgs, ConfigArgs, GameArgs, GamesArgs, LoginArgs, RegisterArgs};

/// Tabletop - browse and buy board games
#[derive(Parser)]
#[command(name = "tabletop")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List games, optionally filtered
    Games(GamesArgs),

    /// Show details of one game
    Game(GameArgs),

    /// List genres
    Genres,

    /// Log in and remember the session
    Login(LoginArgs),

    /// Create a customer account
    Register(RegisterArgs),

    /// End the saved session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Interactive shop with cart and checkout
    Shop,

    /// List your orders
    Orders,

    /// Catalog administration
    Admin(AdminArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = match context::Context::load(config_path, output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    init_tracing(&ctx.config.logging.level, cli.verbose);

    // Execute command
    let result = match cli.command {
        Commands::Games(args) => commands::games::run(args, &ctx).await,
        Commands::Game(args) => commands::games::show(args, &ctx).await,
        Commands::Genres => commands::games::genres(&ctx).await,
        Commands::Login(args) => commands::auth::login(args, &ctx).await,
        Commands::Register(args) => commands::auth::register(args, &ctx).await,
        Commands::Logout => commands::auth::logout(&ctx).await,
        Commands::Whoami => commands::auth::whoami(&ctx).await,
        Commands::Shop => commands::shop::run(&ctx).await,
        Commands::Orders => commands::orders::run(&ctx).await,
        Commands::Admin(args) => commands::admin::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

/// Log to stderr. `RUST_LOG` wins over the configured level; `--verbose`
/// wins over both.
fn init_tracing(level: &str, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
