//! Plain-text listings for the non-interactive commands.
//!
//! Pure functions: (features, browsers) → rows → String.
//! No I/O, no side effects.

use crate::types::{Browser, Feature, Status, SupportClass};

/// Titles longer than this are cut in the feature listing.
const TITLE_WIDTH: usize = 24;

/// Separator between listing columns.
const COLUMN_GAP: &str = "   ";

// ============================================================================
// ROWS
// ============================================================================

/// One row per feature: status badge, percentage, title, then the current
/// support glyph and abbreviation for each browser.
pub fn feature_rows(features: &[Feature], browsers: &[Browser]) -> Vec<Vec<String>> {
    features
        .iter()
        .map(|feature| {
            let mut row = vec![
                feature.status().badge(),
                format!("{:>6}", format!("{:.2}%", feature.percent())),
                short_title(feature.title()),
            ];
            row.extend(
                feature
                    .current_support(browsers)
                    .into_iter()
                    .zip(browsers)
                    .map(|(class, browser)| format!("{}{}", class.glyph(), browser.abbr())),
            );
            row
        })
        .collect()
}

/// One row per browser: title and summed usage.
pub fn browser_rows(browsers: &[Browser]) -> Vec<Vec<String>> {
    browsers
        .iter()
        .map(|browser| {
            vec![
                browser.title().to_string(),
                format!("usage: {:.4}%", browser.total_usage()),
            ]
        })
        .collect()
}

/// One row per era of a browser, newest first.
pub fn era_rows(browser: &Browser) -> Vec<Vec<String>> {
    browser
        .eras()
        .iter()
        .enumerate()
        .rev()
        .map(|(index, era)| vec![era.clone(), format!("usage: {:.4}%", browser.weight_at(index))])
        .collect()
}

/// Every feature's support in one era of a browser, grouped by
/// classification in legend order: status badge, `[glyph]`, title.
pub fn feature_support_rows(features: &[Feature], browser: &Browser, era: &str) -> Vec<Vec<String>> {
    let support: Vec<(&Feature, SupportClass)> = features
        .iter()
        .map(|feature| (feature, feature.support_in(browser.key(), era)))
        .collect();

    let mut rows = Vec::with_capacity(support.len());
    for class in SupportClass::ALL {
        for (feature, _) in support.iter().filter(|(_, c)| *c == class) {
            rows.push(vec![
                feature.status().badge(),
                format!("[{}]", class.glyph()),
                feature.title().to_string(),
            ]);
        }
    }
    rows
}

/// One row per status: badge and description.
pub fn status_rows() -> Vec<Vec<String>> {
    Status::ALL
        .iter()
        .map(|status| vec![status.badge(), status.description().to_string()])
        .collect()
}

/// Every classification as `short(glyph)`, space separated.
pub fn support_legend() -> String {
    SupportClass::ALL
        .iter()
        .map(|class| class.legend_label())
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// FORMATTING
// ============================================================================

/// Left-align every column to its widest cell and join with three spaces.
/// Trailing whitespace is trimmed from each line.
pub fn tableize(rows: &[Vec<String>]) -> Vec<String> {
    let mut widths: Vec<usize> = Vec::new();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            let width = cell.chars().count();
            match widths.get_mut(i) {
                Some(w) if *w < width => *w = width,
                Some(_) => {}
                None => widths.push(width),
            }
        }
    }

    rows.iter()
        .map(|row| {
            row.iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect::<Vec<_>>()
                .join(COLUMN_GAP)
                .trim_end()
                .to_string()
        })
        .collect()
}

/// Tableize and join into printable text (one trailing newline per row).
pub fn format_table(rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    for line in tableize(rows) {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

fn short_title(title: &str) -> String {
    let title = if title.chars().count() > TITLE_WIDTH {
        let cut: String = title.chars().take(TITLE_WIDTH).collect();
        format!("{}..", cut.trim())
    } else {
        title.to_string()
    };
    format!("{:<width$}", title, width = TITLE_WIDTH)
}

// ============================================================================
// TESTS
// ============================================================================
