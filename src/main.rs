use std::error::Error;

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use socket_chat::config::{self, AppConfig};
use socket_chat::ui::ChatApp;
use socket_chat::{ChatSession, SessionIdentity, terminal};

#[derive(Parser)]
#[command(
    name = "socket_chat",
    version,
    about = "Real-time chat client for a Socket.IO server"
)]
struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    /// Server base address, overrides the config file and CHAT_SERVER_URL
    #[arg(long, value_name = "URL")]
    server: Option<String>,
    /// Signed-in user's email, overrides CHAT_USER_EMAIL
    #[arg(long, value_name = "EMAIL")]
    email: Option<String>,
    /// Signed-in user's id, overrides CHAT_USER_ID (needs an email)
    #[arg(long, value_name = "ID")]
    user_id: Option<i64>,
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Chat from the terminal instead of opening a window
    Terminal,
    /// Write the effective configuration to the config file and exit
    InitConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    // Khởi tạo Logger để debug
    env_logger::init();

    let cli = Cli::parse();
    let mut app_config =
        config::load_config(&cli.config).with_overrides(|key| std::env::var(key).ok());
    if let Some(server) = cli.server.clone() {
        app_config.server_url = server;
    }
    let identity = config::identity_with_overrides(cli.email.as_deref(), cli.user_id, |key| {
        std::env::var(key).ok()
    });

    match cli.mode {
        Some(Mode::InitConfig) => {
            config::save_config(&cli.config, &app_config)?;
            log::info!("Wrote configuration to {}", cli.config);
            Ok(())
        }
        Some(Mode::Terminal) => {
            let session = ChatSession::start(&app_config, identity);
            terminal::run(session).await?;
            Ok(())
        }
        None => run_window(app_config, identity),
    }
}

fn run_window(app_config: AppConfig, identity: SessionIdentity) -> Result<(), Box<dyn Error>> {
    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "Socket Chat",
        options,
        Box::new(move |cc| {
            log::info!("Window opened, connecting to {}", app_config.server_url);
            let session = ChatSession::start(&app_config, identity);
            Ok(Box::new(ChatApp::new(cc, session)))
        }),
    )?;
    Ok(())
}
