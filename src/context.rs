//! Application context: configuration plus the loaded dataset.
//!
//! Built once in `main` and passed by reference to every command.

use tracing::debug;

use crate::config::Config;
use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::types::{Browser, Feature};

#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: Config,
    pub dataset: Dataset,
}

impl AppContext {
    pub fn new(config: Config, dataset: Dataset) -> Self {
        AppContext { config, dataset }
    }

    /// Load the dataset the config points at.
    pub fn load(config: Config) -> Result<Self> {
        let path = config.data_file();
        debug!(path = %path.display(), "loading dataset");
        let dataset = Dataset::load(&path)?;
        Ok(AppContext::new(config, dataset))
    }

    /// Configured browsers that exist in the dataset, in configured order.
    pub fn shown_browsers(&self) -> Result<Vec<Browser>> {
        let browsers = self.dataset.select_browsers(&self.config.browsers);
        if browsers.is_empty() {
            return Err(Error::NoBrowsers);
        }
        Ok(browsers)
    }

    pub fn browser(&self, key: &str) -> Result<&Browser> {
        self.dataset
            .browser(key)
            .ok_or_else(|| Error::BrowserNotFound(key.to_string()))
    }

    /// A browser and one of its eras, spelled as the dataset spells it.
    pub fn browser_era(&self, key: &str, era: &str) -> Result<(&Browser, &str)> {
        let browser = self.browser(key)?;
        let index = browser.era_index(era).ok_or_else(|| Error::EraNotFound {
            browser: browser.title().to_string(),
            era: era.to_string(),
        })?;
        Ok((browser, browser.eras()[index].as_str()))
    }

    pub fn feature(&self, query: &str) -> Result<&Feature> {
        self.dataset
            .find_feature(query)
            .ok_or_else(|| Error::FeatureNotFound(query.to_string()))
    }
}
