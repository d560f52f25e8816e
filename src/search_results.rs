use log::{info, warn};
use scraper::{Html, Selector};
use crate::config::SiteConfig;
use crate::error::{ConfigError, LookupError};
use crate::extractor::Extractor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultLink {
    pub text: String,
    pub href: String,
}

/// Reads the page the directory returns after a search.
pub struct ResultsParser {
    link_selector: Selector,
    title_selector: Selector,
    extractor: Extractor,
}

fn parse_selector(sel: &str) -> Result<Selector, ConfigError> {
    Selector::parse(sel).map_err(|_| ConfigError::Selector(sel.to_string()))
}

impl ResultsParser {
    pub fn new(site: &SiteConfig) -> Result<Self, ConfigError> {
        Ok(ResultsParser {
            link_selector: parse_selector(&site.result_link_selector)?,
            title_selector: parse_selector(&site.detail_title_selector)?,
            extractor: Extractor::new(),
        })
    }

    /// Some searches skip the results table and land straight on the detail page.
    pub fn is_detail_page_for(&self, html: &str, term: &str) -> bool {
        let document = Html::parse_document(html);
        let term = self.extractor.normalize(term);
        document.select(&self.title_selector).any(|title| {
            let text = title.text().collect::<Vec<_>>().join(" ");
            self.extractor.normalize(&text).contains(&term)
        })
    }

    pub fn links(&self, html: &str) -> Vec<ResultLink> {
        let document = Html::parse_document(html);
        document
            .select(&self.link_selector)
            .filter_map(|element| {
                let href = element.value().attr("href")?.trim();
                if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
                    return None;
                }
                let text = element.text().collect::<Vec<_>>().join(" ");
                Some(ResultLink {
                    text: text.split_whitespace().collect::<Vec<_>>().join(" "),
                    href: href.to_string(),
                })
            })
            .collect()
    }

    /// Picks the result for `term`: an exact text match (against the cleaned
    /// term or the original name) first, else the only link containing the term.
    pub fn pick_link<'a>(&self, links: &'a [ResultLink], term: &str, original: &str) -> Result<&'a ResultLink, LookupError> {
        if links.is_empty() {
            return Err(LookupError::NoSearchResults);
        }

        let term_norm = self.extractor.normalize(term);
        let original_norm = self.extractor.normalize(original);

        if let Some(exact) = links.iter().find(|l| {
            let text = self.extractor.normalize(&l.text);
            text == term_norm || text == original_norm
        }) {
            info!("Found exact matching link: '{}'", exact.text);
            return Ok(exact);
        }

        let containing: Vec<&ResultLink> = links
            .iter()
            .filter(|l| self.extractor.normalize(&l.text).contains(&term_norm))
            .collect();

        match containing.as_slice() {
            [] => Err(LookupError::NoMatchingLink),
            [only] => {
                info!("Found matching link: '{}'", only.text);
                Ok(*only)
            }
            many => {
                warn!(
                    "{} links contain '{}': {:?}",
                    many.len(),
                    term,
                    many.iter().map(|l| l.text.as_str()).collect::<Vec<_>>()
                );
                Err(LookupError::AmbiguousResults(many.len()))
            }
        }
    }
}
