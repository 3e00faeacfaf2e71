//! Era ranking: which era of a browser most users are on, and the
//! window of eras shown around it.
//!
//! Pure functions, no I/O.

use crate::types::Browser;

/// Number of eras shown per browser, current era included.
pub const WINDOW: usize = 6;

/// Eras shown before the current one.
pub const BEFORE_CURRENT: usize = WINDOW / 2 - 1;

/// Minimum usage weight for a past era to be drawn.
pub const VISIBLE_USAGE: f64 = 0.5;

/// Index of the era with the highest usage weight.
///
/// Stable argmax: the first era reaching the maximum wins ties.
/// An empty era list yields 0.
pub fn most_popular_era(browser: &Browser) -> usize {
    let mut best = 0;
    let mut best_weight = f64::NEG_INFINITY;
    for index in 0..browser.eras().len() {
        let weight = browser.weight_at(index);
        if weight > best_weight {
            best = index;
            best_weight = weight;
        }
    }
    best
}

/// One position in a browser's era window.
#[derive(Debug, Clone, PartialEq)]
pub struct EraSlot<'a> {
    /// Position in the window, `0..WINDOW`.
    pub slot: usize,
    /// The era shown here, `None` past either end of the era list.
    pub era: Option<&'a str>,
    /// Usage weight of the era (zero when absent).
    pub usage: f64,
    /// This slot holds the most popular era.
    pub is_current: bool,
    /// This slot is at or after the most popular era.
    pub from_current: bool,
}

impl EraSlot<'_> {
    /// Past eras need real usage to be drawn; current and upcoming eras
    /// are always drawn when they exist.
    pub fn is_visible(&self) -> bool {
        self.usage >= VISIBLE_USAGE || (self.era.is_some() && self.from_current)
    }
}

/// The `WINDOW` slots centered on the most popular era.
pub fn era_window(browser: &Browser) -> Vec<EraSlot<'_>> {
    let current = most_popular_era(browser) as i64;
    let start = current - BEFORE_CURRENT as i64;

    (0..WINDOW)
        .map(|slot| {
            let index = start + slot as i64;
            let era = usize::try_from(index)
                .ok()
                .and_then(|i| browser.eras().get(i).map(|era| (i, era.as_str())));
            EraSlot {
                slot,
                era: era.map(|(_, name)| name),
                usage: era.map_or(0.0, |(i, _)| browser.weight_at(i)),
                is_current: index == current,
                from_current: index >= current,
            }
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
