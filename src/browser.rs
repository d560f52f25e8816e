use std::sync::Arc;
use std::thread;
use headless_chrome::browser::tab::NavigationFailed;
use headless_chrome::{Browser, LaunchOptions, Tab};
use log::{debug, info};
use url::Url;
use crate::config::{BrowserConfig, SiteConfig};
use crate::error::{NavError, ScrapeError};

/// A rendered page: where the browser ended up and the DOM it shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub url: String,
    pub html: String,
}

impl Page {
    /// Resolves a link found on this page to an absolute URL.
    pub fn resolve(&self, href: &str) -> Result<String, NavError> {
        let base = Url::parse(&self.url).map_err(|_| NavError::BadLink(self.url.clone()))?;
        base.join(href)
            .map(|u| u.to_string())
            .map_err(|_| NavError::BadLink(href.to_string()))
    }
}

/// The handful of browser steps the lookup loop needs.
///
/// From any step, `NavError::Browser` means the session is gone. Every other
/// error only costs the current district.
pub trait Navigator {
    /// Loads the directory's search page.
    fn open_search(&mut self) -> Result<(), NavError>;

    /// Types `query` into the search field, submits it and returns the result.
    fn submit_query(&mut self, query: &str) -> Result<Page, NavError>;

    fn follow(&mut self, url: &str) -> Result<Page, NavError>;
}

/// One visible Chrome window. Chrome is shut down when this is dropped.
pub struct BrowserSession {
    _browser: Browser,
    tab: Arc<Tab>,
    search_url: String,
    search_field: String,
    settle: std::time::Duration,
}

/// Page-level load failures only cost the current district; anything else
/// from the CDP connection means the session is gone.
fn browser_err(err: anyhow::Error) -> NavError {
    if err.downcast_ref::<NavigationFailed>().is_some() {
        NavError::PageLoad(err.to_string())
    } else {
        NavError::Browser(err.to_string())
    }
}

impl BrowserSession {
    pub fn launch(browser: &BrowserConfig, site: &SiteConfig) -> Result<Self, ScrapeError> {
        info!("Initializing web browser (headless: {})...", browser.headless);

        let options = LaunchOptions::default_builder()
            .headless(browser.headless)
            .window_size(Some((browser.window_width, browser.window_height)))
            .idle_browser_timeout(std::time::Duration::from_secs(600))
            .build()
            .map_err(|e| ScrapeError::Browser(e.to_string()))?;

        let handle = Browser::new(options).map_err(|e| ScrapeError::Browser(e.to_string()))?;
        let tab = handle.new_tab().map_err(|e| ScrapeError::Browser(e.to_string()))?;
        tab.set_default_timeout(browser.element_timeout());

        info!("Browser ready.");
        Ok(BrowserSession {
            _browser: handle,
            tab,
            search_url: site.url.clone(),
            search_field: site.search_field_selector.clone(),
            settle: browser.settle(),
        })
    }

    fn current_page(&self) -> Result<Page, NavError> {
        Ok(Page {
            url: self.tab.get_url(),
            html: self.tab.get_content().map_err(browser_err)?,
        })
    }
}

impl Navigator for BrowserSession {
    fn open_search(&mut self) -> Result<(), NavError> {
        debug!("Opening {}", self.search_url);
        self.tab.navigate_to(&self.search_url).map_err(browser_err)?;
        self.tab
            .wait_until_navigated()
            .map_err(|_| NavError::Timeout(self.search_url.clone()))?;
        self.tab
            .wait_for_element(&self.search_field)
            .map_err(|_| NavError::Timeout(self.search_field.clone()))?;
        Ok(())
    }

    fn submit_query(&mut self, query: &str) -> Result<Page, NavError> {
        let field = self
            .tab
            .wait_for_element(&self.search_field)
            .map_err(|_| NavError::Timeout(self.search_field.clone()))?;
        field.click().map_err(browser_err)?;
        field.type_into(query).map_err(browser_err)?;
        self.tab.press_key("Enter").map_err(browser_err)?;
        self.tab
            .wait_until_navigated()
            .map_err(|_| NavError::Timeout(format!("results for '{}'", query)))?;

        // Results are filled in by script after the navigation event.
        thread::sleep(self.settle);
        self.current_page()
    }

    fn follow(&mut self, url: &str) -> Result<Page, NavError> {
        debug!("Following {}", url);
        self.tab.navigate_to(url).map_err(browser_err)?;
        self.tab
            .wait_until_navigated()
            .map_err(|_| NavError::Timeout(url.to_string()))?;
        self.current_page()
    }
}
