use log::{error, info, warn};
use crate::browser::Navigator;
use crate::config::{Config, DelayConfig};
use crate::delay_manager;
use crate::detail_page::{Contact, DetailParser};
use crate::error::{ConfigError, LookupError, ScrapeError};
use crate::extractor::Extractor;
use crate::search_results::ResultsParser;
use crate::skip_list::SkipList;
use crate::table::DirectoryTable;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Distinct district names in the table.
    pub total: usize,
    pub found: usize,
    pub skipped: usize,
}

pub struct DirectoryLookup {
    results: ResultsParser,
    details: DetailParser,
    extractor: Extractor,
    delays: DelayConfig,
}

impl DirectoryLookup {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Ok(DirectoryLookup {
            results: ResultsParser::new(&config.site)?,
            details: DetailParser::new(&config.site)?,
            extractor: Extractor::new(),
            delays: config.delays.clone(),
        })
    }

    /// Finds one district's contact. Expects the search page to be open.
    pub fn lookup<N: Navigator + ?Sized>(&self, nav: &mut N, district: &str) -> Result<Contact, LookupError> {
        let term = self.extractor.clean_search_term(district);
        info!("Searching with cleaned term: '{}'", term);

        let page = nav.submit_query(&term)?;
        let links = self.results.links(&page.html);

        let detail = if links.is_empty() && self.results.is_detail_page_for(&page.html, &term) {
            info!("Directly landed on a matching detail page.");
            page
        } else {
            let link = self.results.pick_link(&links, &term, district)?;
            let url = page.resolve(&link.href)?;
            nav.follow(&url)?
        };

        info!("On detail page. Extracting data...");
        self.details.extract(&detail.html)
    }

    /// Looks up every distinct district in `table`, in order, writing found
    /// contacts into it and failures into `skips`.
    ///
    /// Per-district failures, page timeouts and load errors included, never
    /// stop the loop. Only a dead browser session does, at whichever step it
    /// dies, in which case the rows processed so far stay in `table` and the
    /// district being looked up is not skipped.
    pub fn run<N: Navigator + ?Sized>(&self, nav: &mut N, table: &mut DirectoryTable, skips: &mut SkipList) -> Result<RunSummary, ScrapeError> {
        let names = table.district_names();
        let mut summary = RunSummary {
            total: names.len(),
            ..RunSummary::default()
        };
        info!("Identified {} unique districts to process.", summary.total);

        for (i, district) in names.iter().enumerate() {
            info!("Processing {} / {} : {}", i + 1, summary.total, district);

            if i > 0 {
                delay_manager::wait_between_items(&self.delays);
            }

            let outcome = nav
                .open_search()
                .map_err(LookupError::from)
                .and_then(|()| self.lookup(&mut *nav, district));

            match outcome {
                Ok(contact) => {
                    let rows = table.apply_contact(district, &contact);
                    info!("Updated {} row(s) for '{}'", rows, district);
                    summary.found += 1;
                }
                Err(LookupError::SessionLost(message)) => {
                    error!("Browser session unavailable. Aborting: {}", message);
                    log_summary(&summary, skips);
                    return Err(ScrapeError::SessionLost(message));
                }
                Err(reason) => {
                    warn!("Skipping '{}': {}", district, reason);
                    skips.push(district, reason);
                    summary.skipped += 1;
                }
            }
        }

        log_summary(&summary, skips);
        Ok(summary)
    }
}

fn log_summary(summary: &RunSummary, skips: &SkipList) {
    info!("--- SCRAPING SUMMARY ---");
    info!("Total unique districts: {}", summary.total);
    info!("Found: {}", summary.found);
    info!("Skipped: {}", summary.skipped);
    for entry in skips.entries() {
        info!("- {} ({})", entry.district, entry.reason);
    }
}
