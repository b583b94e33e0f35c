use clap::Parser;
use minuteman::core::config;
use minuteman::tui;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "minuteman", about = "Terminal client for a meeting assistant backend")]
struct Args {
    /// Backend base URL (overrides config file and MINUTEMAN_BASE_URL)
    #[arg(short, long)]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to minuteman.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("minuteman.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = match config::load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            // A broken config file shouldn't brick the client; fall back to
            // defaults but make the problem visible before the TUI takes over.
            eprintln!("Warning: {e} (using defaults)");
            log::warn!("Falling back to default config: {e}");
            config::MinutemanConfig::default()
        }
    };
    let resolved = config::resolve(&file_config, args.base_url.as_deref());

    log::info!("Minuteman starting up, backend at {}", resolved.base_url);

    tui::run(resolved)
}
