use chatbox::core::config::{self, ChatboxConfig};
use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "chatbox", about = "Terminal chat client for OpenAI-compatible models")]
struct Args {
    /// Model to use (overrides config and CHATBOX_MODEL)
    #[arg(short, long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to chatbox.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("chatbox.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("{}; falling back to defaults", e);
        ChatboxConfig::default()
    });
    let resolved = config::resolve(&file_config, args.model.as_deref());

    log::info!(
        "Chatbox starting up with model {} at {}",
        resolved.model_name,
        resolved.base_url
    );

    chatbox::tui::run(resolved)
}
