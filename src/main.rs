//! bolt-pack CLI
//!
//! Entry point for the bolt-pack command-line application.

use std::io::IsTerminal;

use bolt_pack::cli;
use bolt_pack::cli::report::Reporter;
use bolt_pack::config::defaults::TOOL_NAME;
use bolt_pack::core::dispatch::InterruptFlag;
use bolt_pack::exit_codes;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();

    let interrupt = InterruptFlag::new();
    let handler_flag = interrupt.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        if handler_flag.is_raised() {
            std::process::exit(exit_codes::SUCCESS);
        }
        handler_flag.raise();
    }) {
        tracing::warn!("failed to install interrupt handler: {e}");
    }

    let result = cli::run_default(std::env::args_os(), &interrupt);
    std::process::exit(Reporter::new(TOOL_NAME).report(&result));
}
