use analyzer::console::Console;
use analyzer::{setup_logging, Cli};
use clap::Parser;
use shared::utils::signal::cancel_on_shutdown_signal;
use std::panic;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = setup_logging(&cli.log_level) {
        eprintln!("Warning: Failed to initialize logging: {e}. Using default logging.");
    }

    panic::set_hook(Box::new(|panic_info| {
        let location = panic_info
            .location()
            .unwrap_or_else(|| panic::Location::caller());
        let message = match panic_info.payload().downcast_ref::<&str>() {
            Some(s) => *s,
            None => match panic_info.payload().downcast_ref::<String>() {
                Some(s) => s.as_str(),
                None => "Unknown panic payload",
            },
        };

        log::error!(
            "PANIC: '{message}' at {}:{}",
            location.file(),
            location.line()
        );
    }));

    let cancellation_token = CancellationToken::new();
    let signal_handle = match cancel_on_shutdown_signal(cancellation_token.clone()) {
        Ok(handle) => handle,
        Err(e) => {
            Console::user_error(&format!("Failed to install signal handlers: {e}"));
            return ExitCode::FAILURE;
        }
    };

    let result = cli.run(cancellation_token).await;

    // the watcher may still be waiting for a second signal
    signal_handle.abort();

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            Console::user_error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
