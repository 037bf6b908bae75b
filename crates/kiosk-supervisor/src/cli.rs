use std::path::PathBuf;

use clap::Parser;

/// Kiosk supervisor: keeps one full-screen browser worker alive per display.
#[derive(Parser, Debug)]
#[command(name = "kiosk", version, about)]
pub struct Args {
    /// Config file path override. Also handed to the workers.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (a filter directive such as `kiosk=debug`).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
