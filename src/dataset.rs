//! Loading and normalizing the caniuse `data.json` dataset.
//!
//! Structure:
//! - Raw serde types mirroring the JSON (only the fields we use)
//! - Pure conversion into [`Browser`] / [`Feature`]
//! - Effect function: reading the file from disk

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::marker::PhantomData;
use std::path::Path;

use rayon::prelude::*;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::support::expand_range;
use crate::types::{Browser, Feature, Status};

// ============================================================================
// RAW DATASET (serde)
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawDataset {
    agents: BTreeMap<String, RawAgent>,
    data: BTreeMap<String, RawFeature>,
}

#[derive(Debug, Deserialize)]
struct RawAgent {
    browser: String,
    abbr: String,
    #[serde(default)]
    usage_global: BTreeMap<String, Option<f64>>,
    #[serde(default)]
    versions: Vec<Option<String>>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    spec: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    notes: RawNotes,
    #[serde(default)]
    notes_by_num: BTreeMap<String, String>,
    #[serde(default)]
    usage_perc_y: f64,
    /// Era tokens keep document order: the first token covering an era wins.
    #[serde(default)]
    stats: BTreeMap<String, Ordered<String>>,
}

/// A JSON object read as key/value pairs in document order.
#[derive(Debug)]
struct Ordered<V>(Vec<(String, V)>);

impl<'de, V: Deserialize<'de>> Deserialize<'de> for Ordered<V> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PairsVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for PairsVisitor<V> {
            type Value = Ordered<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(pair) = map.next_entry()? {
                    pairs.push(pair);
                }
                Ok(Ordered(pairs))
            }
        }

        deserializer.deserialize_map(PairsVisitor(PhantomData))
    }
}

/// `notes` is a single string upstream; a list is accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawNotes {
    Text(String),
    List(Vec<String>),
}

impl Default for RawNotes {
    fn default() -> Self {
        RawNotes::Text(String::new())
    }
}

// ============================================================================
// BROWSER NAMING
// ============================================================================

/// Abbreviations that read better remapped.
fn remap_abbr(abbr: &str) -> &str {
    match abbr {
        "ios" => "saf.ios",
        other => other,
    }
}

/// Long display name for a normalized abbreviation.
fn known_title(abbr: &str) -> Option<&'static str> {
    let title = match abbr {
        "ie" => "Internet Explorer",
        "edge" => "Edge",
        "ff" => "Firefox",
        "chr" => "Chrome",
        "saf" => "Safari",
        "op" => "Opera",
        "saf.ios" => "IOS Safari",
        "o.mini" => "Opera Mini",
        "and" => "Android Browser",
        "bb" => "BlackBerry Browser",
        "o.mob" => "Opera Mobile",
        "chr.and" => "Chrome for Android",
        "ff.and" => "Firefox for Android",
        "ie.mob" => "Internet Explorer Mobile",
        "uc" => "UC Browser for android",
        "ss" => "Samsung Internet",
        "qq" => "QQ Browser",
        "baidu" => "Baidu Browser",
        _ => return None,
    };
    Some(title)
}

/// `"Chr/And."` → `"chr.and"`, `"iOS"` → `"saf.ios"`.
pub fn normalize_abbr(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let trimmed = lowered.trim_matches('.').replace('/', ".");
    remap_abbr(&trimmed).to_string()
}

// ============================================================================
// CONVERSION (pure)
// ============================================================================

fn browser_from_raw(key: &str, raw: &RawAgent) -> Browser {
    let abbr = normalize_abbr(&raw.abbr);
    let title = match known_title(&abbr) {
        Some(title) => title,
        None => raw.browser.as_str(),
    };

    let mut usage = HashMap::new();
    for (token, weight) in &raw.usage_global {
        for era in expand_range(token) {
            usage.insert(era, weight.unwrap_or(0.0));
        }
    }

    let eras: Vec<String> = raw
        .versions
        .iter()
        .flatten()
        .flat_map(|token| expand_range(token))
        .collect();

    Browser::new(key, &abbr, title, &eras, &usage)
}

fn feature_from_raw(id: &str, raw: &RawFeature) -> Feature {
    let mut builder = Feature::builder(id)
        .title(&raw.title)
        .description(&raw.description)
        .spec(&raw.spec)
        .status(Status::from_dataset(&raw.status))
        .percent(raw.usage_perc_y);

    match &raw.notes {
        RawNotes::Text(text) => builder = builder.note(text),
        RawNotes::List(list) => {
            for text in list {
                builder = builder.note(text);
            }
        }
    }

    for (key, text) in &raw.notes_by_num {
        match key.trim().parse::<u32>() {
            Ok(number) => builder = builder.numbered_note(number, text),
            Err(_) => debug!(feature = id, key = %key, "skipping note with non-numeric key"),
        }
    }

    for (browser, eras) in &raw.stats {
        for (era_token, support_token) in &eras.0 {
            builder = builder.stat(browser, era_token, support_token);
        }
    }

    builder.build()
}

// ============================================================================
// DATASET
// ============================================================================

/// All browsers and features, normalized and read-only.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    browsers: Vec<Browser>,
    features: Vec<Feature>,
}

impl Dataset {
    pub fn new(browsers: Vec<Browser>, features: Vec<Feature>) -> Self {
        Dataset { browsers, features }
    }

    /// Parse a caniuse `data.json` document.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        let raw: RawDataset = serde_json::from_str(text)?;

        let browsers: Vec<Browser> = raw
            .agents
            .iter()
            .map(|(key, agent)| browser_from_raw(key, agent))
            .collect();

        let mut features: Vec<Feature> = raw
            .data
            .par_iter()
            .map(|(id, feature)| feature_from_raw(id, feature))
            .collect();
        features.sort_by(|a, b| a.id().cmp(b.id()));

        Ok(Dataset { browsers, features })
    }

    /// Read and parse a dataset file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Self::from_json(&text).map_err(|source| Error::Dataset {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            path = %path.display(),
            browsers = dataset.browsers.len(),
            features = dataset.features.len(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    pub fn browsers(&self) -> &[Browser] {
        &self.browsers
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Look up a browser by key, case-insensitively.
    pub fn browser(&self, key: &str) -> Option<&Browser> {
        let key = key.to_lowercase();
        self.browsers.iter().find(|b| b.key() == key)
    }

    /// Find a feature by identifier, falling back to the first feature whose
    /// title contains the query. Both comparisons ignore case.
    pub fn find_feature(&self, query: &str) -> Option<&Feature> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }
        self.features
            .iter()
            .find(|f| f.id() == query)
            .or_else(|| {
                self.features
                    .iter()
                    .find(|f| f.title().to_lowercase().contains(&query))
            })
    }

    /// Browsers for the given keys, in key order. Unknown keys are skipped.
    pub fn select_browsers<S: AsRef<str>>(&self, keys: &[S]) -> Vec<Browser> {
        keys.iter()
            .filter_map(|key| {
                let found = self.browser(key.as_ref());
                if found.is_none() {
                    warn!(browser = key.as_ref(), "browser not in dataset, skipping");
                }
                found.cloned()
            })
            .collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================
