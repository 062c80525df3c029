use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use qrbot::application::errors::{error_chain, BotError};
use qrbot::application::messaging::CommandParser;
use qrbot::application::services::{AdminGate, BotRuntime};
use qrbot::domain::entities::Caller;
use qrbot::domain::traits::Bot;
use qrbot::infrastructure::adapters::console::ConsoleAdapter;
use qrbot::infrastructure::adapters::telegram::TelegramAdapter;
use qrbot::infrastructure::config::Config;
use qrbot::infrastructure::database::Database;
use qrbot::infrastructure::logging;
use qrbot::infrastructure::render::QrRenderer;
use qrbot::plugins::{AdminPlugin, PluginManager, QrPlugin, UtilityPlugin};

#[derive(Parser)]
#[command(name = "qrbot")]
#[command(about = "A plugin-based bot that turns text into QR codes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Bot token (overrides config and environment)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            if let Err(e) = run_bot(cli.config, cli.token) {
                tracing::error!("Fatal: {}", error_chain(&e));
                eprintln!("qrbot: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Version => {
            println!("qrbot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            if let Err(e) = init_config() {
                eprintln!("qrbot: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn run_bot(config_path: PathBuf, token_override: Option<String>) -> Result<(), BotError> {
    // .env is optional
    dotenv::dotenv().ok();

    let mut config = Config::load_or_default(&config_path)?;
    if let Some(token) = token_override {
        config.bot.token = Some(token);
    }

    let log_file = logging::init(&config.logging.directory)
        .map_err(|e| BotError::Config(format!("Failed to open log directory: {}", e)))?;
    tracing::info!("Starting {} (logging to {})", config.bot.name, log_file.display());

    let db = Arc::new(Database::open(&config.storage.database)?);
    tracing::info!("Database initialized at {}", config.storage.database.display());

    let admins = Arc::new(AdminGate::new(config.admin_set()));
    if admins.ids().is_empty() {
        tracing::warn!("No administrators configured; admin commands are unavailable");
    }

    let mut plugins = PluginManager::new();
    plugins.register(QrPlugin::new(db.clone(), Arc::new(QrRenderer::default())))?;
    plugins.register(AdminPlugin::new(db.clone(), config.logging.directory.clone()))?;
    plugins.register(UtilityPlugin::new(db.clone()))?;
    tracing::info!("Plugin system initialized with {} plugins", plugins.len());
    for info in plugins.list_plugins() {
        tracing::debug!(
            "Plugin {}",
            serde_json::to_string(&info).unwrap_or_else(|_| info.name.clone())
        );
    }

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| BotError::Internal(format!("Failed to start async runtime: {}", e)))?;

    match config.bot.token.clone() {
        Some(token) => rt.block_on(run_telegram_bot(token, &config, db, admins, &plugins)),
        None => {
            tracing::info!("No bot token configured, starting console mode");
            rt.block_on(run_console_bot(&config, db, admins, &plugins))
        }
    }
}

async fn run_telegram_bot(
    token: String,
    config: &Config,
    db: Arc<Database>,
    admins: Arc<AdminGate>,
    plugins: &PluginManager,
) -> Result<(), BotError> {
    let mut adapter = TelegramAdapter::new(token);
    adapter.fetch_bot_info().await?;

    let info = adapter.bot_info();
    tracing::info!("Bot started: @{}", info.username);

    let adapter = Arc::new(adapter);
    let bot: Arc<dyn Bot> = adapter.clone();
    let runtime = Arc::new(BotRuntime::new(bot, db, admins, plugins)?);

    if let Err(e) = adapter.register_commands(&runtime.dispatcher().public_commands()).await {
        tracing::warn!("Failed to register commands: {}", e);
    }

    let parser = CommandParser::new().with_bot_username(info.username);
    let mut offset: i64 = 0;

    tracing::info!("Starting message loop...");

    loop {
        match adapter.get_updates(offset, config.telegram.poll_timeout_secs).await {
            Ok(updates) => {
                for update in &updates {
                    let Some(event) = update.message.as_ref().and_then(|m| m.command_event(&parser)) else {
                        continue;
                    };

                    tracing::debug!("Command /{} from {}", event.name, event.caller);
                    let runtime = runtime.clone();
                    tokio::spawn(async move {
                        runtime.handle_event(event).await;
                    });
                }

                offset = TelegramAdapter::get_next_offset(&updates, offset);
            }
            Err(e) => {
                tracing::error!("Failed to get updates: {}", e);
                tokio::time::sleep(tokio::time::Duration::from_secs(5)).await;
            }
        }
    }
}

async fn run_console_bot(
    config: &Config,
    db: Arc<Database>,
    admins: Arc<AdminGate>,
    plugins: &PluginManager,
) -> Result<(), BotError> {
    let bot: Arc<dyn Bot> = Arc::new(ConsoleAdapter::new());
    let runtime = BotRuntime::new(bot, db, admins, plugins)?;

    let user_id = config.telegram.console_user_id;
    let caller = Caller::new(user_id).with_first_name("Console");
    let parser = CommandParser::new();

    println!("qrbot console mode. Type /help, Ctrl-D to quit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| BotError::Internal(format!("Failed to read stdin: {}", e)))?
    {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match parser.parse(line, caller.clone(), user_id) {
            Some(event) => {
                runtime.handle_event(event).await;
            }
            None => println!("[BOT] Commands start with '/'. Try /help."),
        }
    }

    tracing::info!("Console closed, shutting down");
    Ok(())
}

fn init_config() -> Result<(), BotError> {
    let yaml = serde_yaml::to_string(&Config::default())
        .map_err(|e| BotError::Config(format!("Failed to serialize config: {}", e)))?;
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
    Ok(())
}
