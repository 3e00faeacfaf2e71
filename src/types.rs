//! Domain types for cani.
//!
//! Browsers and features are built once from the dataset and only queried
//! afterwards. Browser eras keep their dataset spelling for display; keys
//! and matrix entries are stored downcased and every lookup downcases its
//! arguments, so queries are case-insensitive.

use std::collections::{BTreeMap, HashMap};

use crate::era::most_popular_era;
use crate::support::{classify, expand_range, note_refs};

// ============================================================================
// ENUMS
// ============================================================================

/// How a feature behaves in one browser era.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SupportClass {
    /// Fully supported (`y`).
    Default,
    /// Partially supported (`a`).
    Partial,
    /// Not supported (`n`).
    Unsupported,
    /// Supported through a polyfill (`p`).
    Polyfill,
    /// Supported behind a vendor prefix (`x`).
    Prefixed,
    /// Disabled by default, needs a flag (`d`).
    Flag,
    /// No data (`u`), also the fallback for missing entries.
    Unknown,
}

impl SupportClass {
    /// All classifications in legend order.
    pub const ALL: [SupportClass; 7] = [
        SupportClass::Default,
        SupportClass::Partial,
        SupportClass::Unsupported,
        SupportClass::Polyfill,
        SupportClass::Prefixed,
        SupportClass::Flag,
        SupportClass::Unknown,
    ];

    /// Map a dataset code character to a classification.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'y' => Some(SupportClass::Default),
            'a' => Some(SupportClass::Partial),
            'n' => Some(SupportClass::Unsupported),
            'p' => Some(SupportClass::Polyfill),
            'x' => Some(SupportClass::Prefixed),
            'd' => Some(SupportClass::Flag),
            'u' => Some(SupportClass::Unknown),
            _ => None,
        }
    }

    /// The dataset code character.
    pub fn code(self) -> char {
        match self {
            SupportClass::Default => 'y',
            SupportClass::Partial => 'a',
            SupportClass::Unsupported => 'n',
            SupportClass::Polyfill => 'p',
            SupportClass::Prefixed => 'x',
            SupportClass::Flag => 'd',
            SupportClass::Unknown => 'u',
        }
    }

    /// Short label used in the legend.
    pub fn short(self) -> &'static str {
        match self {
            SupportClass::Default => "def",
            SupportClass::Partial => "part",
            SupportClass::Unsupported => "unsupp",
            SupportClass::Polyfill => "poly",
            SupportClass::Prefixed => "prefix",
            SupportClass::Flag => "flag",
            SupportClass::Unknown => "unknown",
        }
    }

    /// One-character glyph.
    pub fn glyph(self) -> char {
        match self {
            SupportClass::Default => '+',
            SupportClass::Partial => '~',
            SupportClass::Unsupported => '-',
            SupportClass::Polyfill => '#',
            SupportClass::Prefixed => '@',
            SupportClass::Flag => '!',
            SupportClass::Unknown => '?',
        }
    }

    /// Legend entry, e.g. `part(~)`.
    pub fn legend_label(self) -> String {
        format!("{}({})", self.short(), self.glyph())
    }
}

/// Standards maturity of a feature's spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    LivingStandard,
    Recommendation,
    ProposedRecommendation,
    CandidateRecommendation,
    WorkingDraft,
    Unofficial,
    Other,
}

impl Status {
    pub const ALL: [Status; 7] = [
        Status::LivingStandard,
        Status::Recommendation,
        Status::ProposedRecommendation,
        Status::CandidateRecommendation,
        Status::WorkingDraft,
        Status::Other,
        Status::Unofficial,
    ];

    /// Parse the dataset's status value. Anything unrecognized is `Other`.
    pub fn from_dataset(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ls" => Status::LivingStandard,
            "rec" | "rc" => Status::Recommendation,
            "pr" => Status::ProposedRecommendation,
            "cr" => Status::CandidateRecommendation,
            "wd" => Status::WorkingDraft,
            "unoff" | "un" => Status::Unofficial,
            _ => Status::Other,
        }
    }

    /// Two-letter code shown in the badge.
    pub fn code(self) -> &'static str {
        match self {
            Status::LivingStandard => "ls",
            Status::Recommendation => "rc",
            Status::ProposedRecommendation => "pr",
            Status::CandidateRecommendation => "cr",
            Status::WorkingDraft => "wd",
            Status::Unofficial => "un",
            Status::Other => "ot",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Status::LivingStandard => "WHATWG Living Standard",
            Status::Recommendation => "W3C Recommendation",
            Status::ProposedRecommendation => "W3C Proposed Recommendation",
            Status::CandidateRecommendation => "W3C Candidate Recommendation",
            Status::WorkingDraft => "W3C Working Draft",
            Status::Unofficial => "Unofficial, Editor's draft or W3C \"Note\"",
            Status::Other => "Non-W3C, but reputable",
        }
    }

    /// Badge text, e.g. `[ls]`.
    pub fn badge(self) -> String {
        format!("[{}]", self.code())
    }
}

// ============================================================================
// BROWSER
// ============================================================================

/// A browser and the usage of each of its eras.
#[derive(Debug, Clone, PartialEq)]
pub struct Browser {
    key: String,
    label: String,
    abbr: String,
    title: String,
    eras: Vec<String>,
    /// Parallel to `eras`.
    weights: Vec<f64>,
}

impl Browser {
    /// Build a browser from ordered eras and a usage map.
    ///
    /// Eras are deduplicated ignoring case (first occurrence wins); eras
    /// missing from `usage` get a weight of zero.
    pub fn new<I, S>(key: &str, abbr: &str, title: &str, eras: I, usage: &HashMap<String, f64>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let key = key.to_lowercase();
        let usage: HashMap<String, f64> = usage
            .iter()
            .map(|(era, weight)| (era.to_lowercase(), *weight))
            .collect();

        let mut ordered: Vec<String> = Vec::new();
        let mut seen: Vec<String> = Vec::new();
        for era in eras {
            let era = era.as_ref();
            let folded = era.to_lowercase();
            if !era.is_empty() && !seen.contains(&folded) {
                ordered.push(era.to_string());
                seen.push(folded);
            }
        }
        let weights = seen
            .iter()
            .map(|era| usage.get(era).copied().unwrap_or(0.0))
            .collect();

        Browser {
            label: key.replace('_', "."),
            key,
            abbr: abbr.to_string(),
            title: title.to_string(),
            eras: ordered,
            weights,
        }
    }

    /// Canonical dataset key, e.g. `ios_saf`.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Column header text, e.g. `ios.saf`.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Short abbreviation, e.g. `saf.ios`.
    pub fn abbr(&self) -> &str {
        &self.abbr
    }

    /// Long name, e.g. `IOS Safari`.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Eras in chronological order, as the dataset spells them.
    pub fn eras(&self) -> &[String] {
        &self.eras
    }

    /// Position of `era`, ignoring case.
    pub fn era_index(&self, era: &str) -> Option<usize> {
        let era = era.to_lowercase();
        self.eras.iter().position(|e| e.to_lowercase() == era)
    }

    /// Usage weight of the era at `index`, zero when out of range.
    pub fn weight_at(&self, index: usize) -> f64 {
        self.weights.get(index).copied().unwrap_or(0.0)
    }

    /// Usage weight of a named era, zero when unknown.
    pub fn usage(&self, era: &str) -> f64 {
        self.era_index(era).map_or(0.0, |i| self.weights[i])
    }

    /// Sum of all era weights.
    pub fn total_usage(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Widest text this browser puts in a table column (label or any era).
    pub fn max_column_width(&self) -> usize {
        self.eras
            .iter()
            .map(|era| era.chars().count())
            .chain(std::iter::once(self.label.chars().count()))
            .max()
            .unwrap_or(0)
    }
}

// ============================================================================
// FEATURE
// ============================================================================

/// A web platform feature and its support matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    id: String,
    title: String,
    description: String,
    status: Status,
    spec: String,
    percent: f64,
    notes: Vec<String>,
    numbered_notes: BTreeMap<u32, String>,
    /// browser key → era → classification
    support: HashMap<String, HashMap<String, SupportClass>>,
    /// browser key → era → referenced note numbers
    note_refs: HashMap<String, HashMap<String, Vec<u32>>>,
}

impl Feature {
    pub fn builder(id: &str) -> FeatureBuilder {
        FeatureBuilder::new(id)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// URL of the spec document.
    pub fn spec(&self) -> &str {
        &self.spec
    }

    /// Percentage of global users with full support.
    pub fn percent(&self) -> f64 {
        self.percent
    }

    /// Free-text notes, in dataset order.
    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// Numbered notes, ordered by number.
    pub fn numbered_notes(&self) -> &BTreeMap<u32, String> {
        &self.numbered_notes
    }

    /// Classification of `browser` at `era`. Never fails: `Unknown` when absent.
    pub fn support_in(&self, browser: &str, era: &str) -> SupportClass {
        self.support
            .get(&browser.to_lowercase())
            .and_then(|eras| eras.get(&era.to_lowercase()))
            .copied()
            .unwrap_or(SupportClass::Unknown)
    }

    /// Numbered notes referenced by `browser` at `era`. Empty when absent.
    pub fn notes_for(&self, browser: &str, era: &str) -> &[u32] {
        self.note_refs
            .get(&browser.to_lowercase())
            .and_then(|eras| eras.get(&era.to_lowercase()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Classification at each browser's most popular era.
    pub fn current_support(&self, browsers: &[Browser]) -> Vec<SupportClass> {
        browsers
            .iter()
            .map(|browser| match browser.eras().get(most_popular_era(browser)) {
                Some(era) => self.support_in(browser.key(), era),
                None => SupportClass::Unknown,
            })
            .collect()
    }
}

/// Incremental construction of a [`Feature`] from raw dataset values.
#[derive(Debug)]
pub struct FeatureBuilder {
    feature: Feature,
}

impl FeatureBuilder {
    fn new(id: &str) -> Self {
        FeatureBuilder {
            feature: Feature {
                id: id.to_lowercase(),
                title: id.to_string(),
                description: String::new(),
                status: Status::Other,
                spec: String::new(),
                percent: 0.0,
                notes: Vec::new(),
                numbered_notes: BTreeMap::new(),
                support: HashMap::new(),
                note_refs: HashMap::new(),
            },
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.feature.title = title.to_string();
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.feature.description = description.to_string();
        self
    }

    pub fn status(mut self, status: Status) -> Self {
        self.feature.status = status;
        self
    }

    pub fn spec(mut self, spec: &str) -> Self {
        self.feature.spec = spec.to_string();
        self
    }

    pub fn percent(mut self, percent: f64) -> Self {
        self.feature.percent = percent;
        self
    }

    /// Append a free-text note. Blank notes are dropped.
    pub fn note(mut self, text: &str) -> Self {
        if !text.trim().is_empty() {
            self.feature.notes.push(text.to_string());
        }
        self
    }

    pub fn numbered_note(mut self, number: u32, text: &str) -> Self {
        self.feature.numbered_notes.insert(number, text.to_string());
        self
    }

    /// Record a raw stats entry: `era_token` may be a range, `support_token`
    /// is a classification code with optional `#<n>` note references.
    ///
    /// When two tokens cover the same era, the first one recorded wins.
    pub fn stat(mut self, browser: &str, era_token: &str, support_token: &str) -> Self {
        let browser = browser.to_lowercase();
        let class = classify(support_token);
        let refs = note_refs(support_token);

        let support = self.feature.support.entry(browser.clone()).or_default();
        let notes = self.feature.note_refs.entry(browser).or_default();

        for era in expand_range(&era_token.to_lowercase()) {
            if support.contains_key(&era) {
                continue;
            }
            support.insert(era.clone(), class);
            if !refs.is_empty() {
                notes.insert(era, refs.clone());
            }
        }
        self
    }

    pub fn build(self) -> Feature {
        self.feature
    }
}

// ============================================================================
// TESTS
// ============================================================================
