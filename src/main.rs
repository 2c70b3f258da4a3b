mod api;
mod core;
#[cfg(test)]
mod test_support;
mod tui;

use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "tutorly", about = "Terminal client for the Tutorly tutoring platform")]
struct Args {
    /// Override the API base URL
    #[arg(long)]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to tutorly.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("tutorly.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let config = core::config::load_config().unwrap_or_else(|e| {
        eprintln!("{e}");
        std::process::exit(1);
    });
    let resolved = core::config::resolve(&config, args.base_url.as_deref());

    log::info!("Tutorly starting up against {}", resolved.base_url);

    tui::run(resolved)
}
