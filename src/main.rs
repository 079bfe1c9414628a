use clap::Parser;
use color_eyre::Result;
use pgp_workbench::cli::{run_cli, Cli};
use pgp_workbench::config::Settings;
use chrono::Utc;
use dotenvy::dotenv;
use env_logger::Builder;
use log::LevelFilter;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    // load environment variables from .env file, if present
    dotenv().ok();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    setup_cli_logging(cli.verbose, settings.log_file.clone());

    match run_cli(cli, settings).await {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("CLI error: {}", e);
            std::process::exit(1);
        }
    }
}

fn setup_cli_logging(verbose: bool, log_file: Option<PathBuf>) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    use std::fs::OpenOptions;
    use std::io::Write;

    Builder::from_default_env()
        .format(move |buf, record| {
            let ts = Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            let s = format!(
                "[{}] {} [{}] {}",
                ts,
                record.level(),
                record.target(),
                record.args()
            );

            if let Some(path) = &log_file {
                if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
                    let _ = writeln!(file, "{}", s);
                }
            }

            writeln!(buf, "{}", s)
        })
        .filter(None, level)
        .init();
}
