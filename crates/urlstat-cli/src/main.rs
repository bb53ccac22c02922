//! urlstat CLI - Main entry point

use clap::Parser;
use std::process;
use tracing::error;
use urlstat_cli::commands::{from_csv, get};
use urlstat_cli::{Cli, Commands};
use urlstat_core::logging::{init_logging, LogConfig, LogLevel, LogOutput};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Handle markdown help generation
    if cli.markdown_help {
        println!("{}", clap_markdown::help_markdown::<Cli>());
        return;
    }

    // Ensure a command is provided
    if cli.command.is_none() {
        eprintln!("Error: A subcommand is required");
        eprintln!();
        eprintln!("For more information, try '--help'.");
        process::exit(2);
    }

    // Verbose mode shows debug logs, otherwise only warnings and errors
    let log_config = LogConfig::builder()
        .level(if cli.verbose { LogLevel::Debug } else { LogLevel::Warn })
        .output(LogOutput::Console)
        .log_file_prefix("urlstat")
        .build();

    // Environment variables take precedence
    let log_config = log_config.clone().merge_env().unwrap_or(log_config);

    // The CLI works without logging, so a failed init is not fatal
    let _log_guard = init_logging(&log_config).ok().flatten();

    if let Err(e) = execute_command(&cli).await {
        error!(error = %e, "Command failed");
        let mut chain = e.diagnostic().into_iter();
        if let Some(head) = chain.next() {
            eprintln!("Error: {}", head);
        }
        for cause in chain {
            eprintln!("  caused by: {}", cause);
        }
        process::exit(1);
    }
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> urlstat_cli::Result<()> {
    let Some(ref command) = cli.command else {
        unreachable!("Command should have been validated in main");
    };

    match command {
        Commands::Get {
            url,
            json,
            output,
            output_separator,
        } => {
            get::run(get::GetArgs {
                url: url.clone(),
                json: *json,
                output: output.clone(),
                output_separator: *output_separator,
            })
            .await
        },

        Commands::FromCsv {
            filename,
            url_column,
            csv_separator,
            output_separator,
            clean,
        } => {
            let config = cli.config()?;
            from_csv::run(
                &config,
                from_csv::FromCsvArgs {
                    filename: filename.clone(),
                    url_column: *url_column,
                    csv_separator: *csv_separator,
                    output_separator: *output_separator,
                    clean: *clean,
                },
            )
            .await
        },
    }
}
