use std::error::Error;
use std::path::PathBuf;
use clap::Parser;
use log::{info, error};
use district_scraper_lib::{config::Config, logger, run, BrowserSession};

/// Looks up each district of a spreadsheet on the school directory and fills
/// in its contact columns.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// CSV or Excel file with a district name column
    input: PathBuf,

    /// JSON file overriding selectors, columns, timeouts and delays
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the updated table here instead of over the input
    #[arg(long)]
    output: Option<PathBuf>,

    /// Where to list districts that could not be found
    #[arg(long)]
    skip_file: Option<PathBuf>,

    /// Header of the district name column
    #[arg(long)]
    column: Option<String>,

    /// Run Chrome without a window
    #[arg(long)]
    headless: bool,
}

/// Command-line flags win over the config file.
fn apply(cli: &Cli, mut config: Config) -> Config {
    if let Some(output) = &cli.output {
        config.output = Some(output.clone());
    }
    if let Some(skip_file) = &cli.skip_file {
        config.skip_file = skip_file.clone();
    }
    if let Some(column) = &cli.column {
        config.columns.district = column.clone();
    }
    if cli.headless {
        config.browser.headless = true;
    }
    config
}

fn main() -> Result<(), Box<dyn Error>> {
    logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let config = apply(&cli, config);

    info!("Starting District Scraper...");
    match run(&cli.input, &config, |c| BrowserSession::launch(&c.browser, &c.site)) {
        Ok(summary) => {
            info!("Done. {} found, {} skipped of {} districts.", summary.found, summary.skipped, summary.total);
            Ok(())
        }
        Err(e) => {
            error!("{}", e);
            Err(e.into())
        }
    }
}
