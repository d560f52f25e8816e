pub mod browser;
pub mod config;
pub mod delay_manager;
pub mod detail_page;
pub mod error;
pub mod extractor;
pub mod input_loader;
pub mod logger;
pub mod lookup;
pub mod search_results;
pub mod skip_list;
pub mod table;

// Exporting types for convenience
pub use browser::{BrowserSession, Navigator, Page};
pub use config::Config;
pub use detail_page::Contact;
pub use error::{LookupError, ScrapeError};
pub use lookup::{DirectoryLookup, RunSummary};
pub use skip_list::SkipList;
pub use table::{DirectoryTable, DistrictRecord};

use std::path::{Path, PathBuf};
use log::{error, info, warn};

/// Where the updated table is written. Formats we cannot write (`.xls`,
/// `.ods`) go to an `.xlsx` next to the input.
pub fn output_path(input: &Path, config: &Config) -> PathBuf {
    if let Some(out) = &config.output {
        return out.clone();
    }
    if input_loader::is_spreadsheet(input) && !input.extension().map_or(false, |e| e.eq_ignore_ascii_case("xlsx")) {
        let out = input.with_extension("xlsx");
        warn!("Cannot write {:?} in place; saving to {:?}", input, out);
        return out;
    }
    input.to_path_buf()
}

/// Loads `input`, opens a navigator with `launch`, looks every district up and
/// saves the table and skip file.
///
/// Input and launch failures abort before anything is written. Once the loop
/// has started, results are saved even if it stops early.
pub fn run<N, F>(input: &Path, config: &Config, launch: F) -> error::Result<RunSummary>
where
    N: Navigator,
    F: FnOnce(&Config) -> error::Result<N>,
{
    config.validate()?;
    let lookup = DirectoryLookup::new(config)?;

    info!("Loading district names from {:?}...", input);
    let mut table = input_loader::load_table(input, &config.columns)?;
    let mut skips = SkipList::new();

    let outcome = if table.district_names().is_empty() {
        info!("No district names found in column '{}'.", config.columns.district);
        Ok(RunSummary::default())
    } else {
        // Dropping the navigator closes the browser before the files are written.
        let mut nav = launch(config)?;
        lookup.run(&mut nav, &mut table, &mut skips)
    };

    let out = output_path(input, config);
    info!("Saving updated table...");
    let saved_table = table.save(&out);
    let saved_skips = skips.save(&config.skip_file);

    if let Err(e) = &outcome {
        error!("Run stopped early: {}", e);
    }
    let summary = outcome?;
    saved_table?;
    saved_skips?;
    Ok(summary)
}
