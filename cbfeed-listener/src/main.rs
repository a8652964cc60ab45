mod cli;

use std::{io::Write, process::ExitCode};

use cbfeed_data::{
    client::feed_client::FeedClient, error::SocketError, exchange::coinbase::Coinbase,
};
use clap::Parser;
use tracing::{error, info, warn};

use cli::Cli;

const SOMETHING_WRONG: &str = "Something wrong...";

/*----- */
// Main
/*----- */
#[tokio::main]
async fn main() -> ExitCode {
    // Init
    init_logging();

    let (config, products) = match Cli::parse().into_feed() {
        Ok(feed) => feed,
        Err(error) => {
            error!(%error, message = "Invalid feed configuration");
            return ExitCode::FAILURE;
        }
    };

    info!(url = %config.url, %products, message = "Starting feed listener");

    // Listen, then unsubscribe if interrupted. A second interrupt aborts the
    // unsubscribe.
    let client = FeedClient::<Coinbase>::new(config);
    let mut stdout = std::io::stdout();

    match client
        .run(&products, &mut stdout, interrupted(), interrupted())
        .await
    {
        Ok(outcome) => {
            info!(?outcome, message = "Feed listener finished");
            ExitCode::SUCCESS
        }
        Err(error) => {
            report_fault(&mut stdout, &error);
            ExitCode::FAILURE
        }
    }
}

// Never panics, stdout may be a closed pipe by now
fn report_fault<W: Write>(output: &mut W, error: &SocketError) {
    error!(%error, message = "Feed listener failed");

    if let Err(error) = writeln!(output, "{SOMETHING_WRONG}") {
        error!(%error, message = "Failed to write fault diagnostic");
    }
}

// Resolves on SIGINT. Never resolves if the handler cannot be installed, so
// the listener keeps running instead of cancelling straight away.
async fn interrupted() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, message = "Failed to install SIGINT handler");
        std::future::pending::<()>().await;
    }
}

/*----- */
// Logging config
/*----- */
fn init_logging() {
    tracing_subscriber::fmt()
        // Filter messages based on the INFO
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        // Keep stdout for feed lines
        .with_writer(std::io::stderr)
        // Disable colours on release builds
        .with_ansi(cfg!(debug_assertions))
        // Enable Json formatting
        .json()
        // Install this Tracing subscriber as global default
        .init()
}

#[cfg(test)]
mod test {
    use super::*;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }
    }

    #[test]
    fn test_fault_on_closed_output_does_not_panic() {
        let mut output = ClosedPipe;
        let fault = SocketError::Output(std::io::ErrorKind::BrokenPipe.into());

        report_fault(&mut output, &fault);
    }

    #[test]
    fn test_fault_prints_diagnostic() {
        let mut output = Vec::new();
        let fault = SocketError::Output(std::io::ErrorKind::Other.into());

        report_fault(&mut output, &fault);

        assert_eq!(String::from_utf8(output).unwrap(), "Something wrong...\n");
    }
}
