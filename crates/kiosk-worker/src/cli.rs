use clap::Parser;

/// One kiosk surface on one display. Normally started by `kiosk`.
#[derive(Parser, Debug)]
#[command(name = "kiosk-worker", version, about)]
pub struct Args {
    /// monitorIndex url allowExit exitUrl logConsoleMessages localStorageJson devTools
    #[arg(num_args = 0.., allow_negative_numbers = true, value_name = "ARG")]
    pub contract: Vec<String>,

    /// Log level override (a filter directive such as `kiosk=debug`).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
