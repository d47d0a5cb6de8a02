use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

mod domain;
mod application;
mod infrastructure;

use application::errors::BotError;
use application::messaging::{IntentRouter, MessageParser};
use application::services::{replies, MessageService};
use domain::entities::{CommandRegistry, WeatherQuery};
use domain::traits::Bot;
use infrastructure::adapters::console::{ConsoleAdapter, CONSOLE_CHAT};
use infrastructure::adapters::telegram::TelegramAdapter;
use infrastructure::config::Config;
use infrastructure::weather::OpenWeatherClient;

#[derive(Parser)]
#[command(name = "weather-bot")]
#[command(about = "A chat bot that replies with the current weather for a city", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Bot token (overrides config)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Telegram bot
    Run,
    /// Chat with the bot on stdin/stdout
    Console,
    /// Print the reply for one city and exit
    Lookup {
        /// City name
        #[arg(required = true, num_args = 1..)]
        city: Vec<String>,
    },
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging; stdout is kept for replies
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run => run_bot(&cli.config, cli.token),
        Commands::Console => run_console(&cli.config),
        Commands::Lookup { city } => lookup_once(&cli.config, &city.join(" ")),
        Commands::Version => {
            println!("weather-bot v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn load_config(config_path: &str) -> Result<Config, BotError> {
    let config = Config::load_or_default(config_path)?;
    config.validate()?;
    Ok(config)
}

fn runtime() -> Result<tokio::runtime::Runtime, BotError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| BotError::Internal(format!("Failed to start runtime: {}", e)))
}

fn run_bot(config_path: &str, token_override: Option<String>) -> Result<(), BotError> {
    let mut config = load_config(config_path)?;
    if let Some(token) = token_override {
        config.telegram.token = Some(token);
    }

    // Both credentials must be present before anything is served
    let token = config.telegram_token()?.to_string();
    let api_key = config.weather_api_key()?.to_string();

    tracing::info!("Starting {}", config.bot.name);

    let rt = runtime()?;
    rt.block_on(async {
        let mut bot = TelegramAdapter::new(token).with_api_base(&config.telegram.api_base);
        bot.fetch_bot_info().await?;
        bot.start().await?;

        let router = IntentRouter::new(CommandRegistry::with_defaults());

        // Register bot commands with Telegram
        if let Err(e) = bot.register_commands(router.commands()).await {
            tracing::warn!("Failed to register commands: {}", e);
        }

        let provider = OpenWeatherClient::with_base_url(api_key, &config.weather.base_url);
        let service = Arc::new(MessageService::new(bot, provider, router));
        let parser = MessageParser::new(&config.bot.prefix);

        run_telegram_bot(service, parser, config.telegram.poll_timeout_seconds).await;
        Ok::<(), BotError>(())
    })
}

async fn run_telegram_bot(
    service: Arc<MessageService<TelegramAdapter, OpenWeatherClient>>,
    parser: MessageParser,
    timeout_seconds: i64,
) {
    let info = service.bot().bot_info();
    tracing::info!("Bot started: {} (@{}, id {})", info.name, info.username, info.id);

    let mut offset: i64 = 0;
    let mut in_flight = JoinSet::new();

    tracing::info!("Starting message loop...");

    loop {
        // Reap replies that already went out
        while let Some(done) = in_flight.try_join_next() {
            if let Err(e) = done {
                tracing::error!("Message task failed: {}", e);
            }
        }

        let updates = tokio::select! {
            result = service.bot().get_updates(offset, timeout_seconds) => result,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
                break;
            }
        };

        match updates {
            Ok(updates) => {
                if !updates.is_empty() {
                    tracing::info!("Received {} updates", updates.len());
                }

                for update in &updates {
                    let Some(message) = update.to_inbound(&parser) else {
                        tracing::debug!("Skipping update {} without text", update.update_id);
                        continue;
                    };

                    // One task per message; drained on shutdown
                    let service = Arc::clone(&service);
                    in_flight.spawn(async move {
                        if let Err(e) = service.handle(message).await {
                            tracing::error!("Failed to send message: {}", e);
                        }
                    });
                }

                offset = TelegramAdapter::get_next_offset(&updates, offset);
            }
            Err(e) => {
                tracing::error!("Failed to get updates: {}", e);
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
        }
    }

    drain_replies(&mut in_flight).await;
}

/// Waits for every spawned reply task; returns how many completed
async fn drain_replies(in_flight: &mut JoinSet<()>) -> usize {
    if !in_flight.is_empty() {
        tracing::info!("Waiting for {} in-flight replies", in_flight.len());
    }

    let mut completed = 0;
    while let Some(done) = in_flight.join_next().await {
        match done {
            Ok(()) => completed += 1,
            Err(e) => tracing::error!("Message task failed: {}", e),
        }
    }
    completed
}

fn run_console(config_path: &str) -> Result<(), BotError> {
    let config = load_config(config_path)?;
    let api_key = config.weather_api_key()?.to_string();

    let rt = runtime()?;
    rt.block_on(async {
        let bot = ConsoleAdapter::new();
        bot.start().await?;

        let provider = OpenWeatherClient::with_base_url(api_key, &config.weather.base_url);
        let service = MessageService::new(bot, provider, IntentRouter::default());
        let parser = MessageParser::new(&config.bot.prefix);

        run_console_bot(&service, &parser).await;
        Ok::<(), BotError>(())
    })
}

async fn run_console_bot(
    service: &MessageService<ConsoleAdapter, OpenWeatherClient>,
    parser: &MessageParser,
) {
    let info = service.bot().bot_info();
    tracing::info!("Bot started: {} (@{}, id {})", info.name, info.username, info.id);

    while let Some(input) = service.bot().read_line("> ").await {
        if input.is_empty() {
            continue;
        }

        let message = parser.parse(CONSOLE_CHAT, input, None).with_platform("console");
        if let Err(e) = service.handle(message).await {
            tracing::error!("Failed to send message: {}", e);
        }
    }
}

fn lookup_once(config_path: &str, city: &str) -> Result<(), BotError> {
    let config = load_config(config_path)?;
    let api_key = config.weather_api_key()?.to_string();

    let Ok(query) = WeatherQuery::new(city) else {
        println!("{}", replies::missing_city());
        return Ok(());
    };

    let rt = runtime()?;
    rt.block_on(async {
        let provider = OpenWeatherClient::with_base_url(api_key, &config.weather.base_url);
        let service = MessageService::new(ConsoleAdapter::new(), provider, IntentRouter::default());

        println!("{}", service.lookup(&query).await);
        Ok::<(), BotError>(())
    })
}

fn init_config() -> Result<(), BotError> {
    let config = Config::default();
    let yaml = serde_yaml::to_string(&config)
        .map_err(|e| BotError::Internal(format!("Failed to render config: {}", e)))?;
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[tokio::test]
    async fn test_drain_waits_for_pending_replies() {
        let delivered = Arc::new(Mutex::new(Vec::new()));
        let mut in_flight = JoinSet::new();

        for chat in ["1", "2", "3"] {
            let delivered = Arc::clone(&delivered);
            in_flight.spawn(async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                delivered.lock().unwrap().push(chat);
            });
        }

        assert_eq!(drain_replies(&mut in_flight).await, 3);
        assert!(in_flight.is_empty());
        assert_eq!(delivered.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_drain_survives_a_panicked_task() {
        let mut in_flight = JoinSet::new();
        in_flight.spawn(async {});
        in_flight.spawn(async { panic!("reply task blew up") });

        assert_eq!(drain_replies(&mut in_flight).await, 1);
    }
}
