mod args;
mod logging;

use std::process::ExitCode;

use clap::Parser;
use tracing::Level;

use school_db::{SchoolDb, SchoolDbError, walkthrough};

use crate::args::{Args, CliConfig, Command};
use crate::logging::LogWriter;

async fn run(config: &CliConfig) -> Result<(), SchoolDbError> {
    let db = SchoolDb::new(config.connection.clone());
    match &config.command {
        Command::CreateDatabase { name } => db.create_database(name).await,
        Command::Init => {
            db.create_schema().await?;
            let inserted = db.populate().await?;
            println!("{inserted} row(s) inserted");
            Ok(())
        }
        Command::Exec { sql } => {
            let affected = db.execute_query(sql).await?;
            println!("{affected} row(s) affected");
            Ok(())
        }
        Command::Query { sql, columns } => {
            let rs = db.read_query(sql).await?;
            let table = if columns.is_empty() {
                rs.into_labeled_table()?
            } else {
                rs.into_table(columns.iter().map(String::as_str))?
            };
            println!("{table}");
            Ok(())
        }
        Command::Walkthrough => {
            let report = walkthrough::run(&db).await;
            for step in &report.steps {
                match &step.result {
                    Ok(output) => println!("== {}: {output}", step.step),
                    Err(err) => println!("== {}: FAILED: {err}", step.step),
                }
            }
            if report.is_success() {
                Ok(())
            } else {
                Err(SchoolDbError::Other(format!(
                    "{} walkthrough step(s) failed",
                    report.failures().count()
                )))
            }
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let config = match CliConfig::from_args(args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("invalid settings: {err}");
            return ExitCode::FAILURE;
        }
    };
    let writer = match LogWriter::new(config.log.as_ref()) {
        Ok(writer) => writer,
        Err(err) => {
            eprintln!("failed to open log file: {err}");
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_target(false)
        .with_max_level(if config.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let config_json = serde_json::to_string(&config).unwrap_or_else(|_| "{}".to_string());
    tracing::info!("config: {}", config_json);

    match run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(kind = ?err.kind(), error = %err, "command failed");
            ExitCode::FAILURE
        }
    }
}
