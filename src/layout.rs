//! Responsive layout: fit the support table, header, legend and notes into
//! a terminal of any size.
//!
//! Pure functions, no I/O. Recomputed at startup and on every resize.
//! Rows in [`Geometry`] are relative to `offset_y`, columns to `offset_x`;
//! the renderer adds the offsets and lets the surface clip.

use crate::era::WINDOW;
use crate::types::{Browser, Feature, SupportClass};

/// Horizontal padding on each side of a cell.
pub const PADDING: usize = 1;

/// Terminals narrower than this use the compact header.
pub const COMPACT_WIDTH: u16 = 60;

/// Columns kept free between the title and the percentage.
pub const TITLE_MARGIN: usize = 3;

/// Shown left of the percentage in full mode.
pub const SUPPORT_LABEL: &str = "support: ";

/// Columns reserved for the number in front of a numbered note.
pub const NOTE_GUTTER: usize = 5;

/// Rows per era slot: a 3-row cell plus one separator row.
pub const ERA_SLOT_ROWS: usize = 4;

/// Browser-name row and the blank row below it.
pub const TABLE_HEAD_ROWS: usize = 2;

/// Total rows of the support table.
pub const TABLE_ROWS: usize = TABLE_HEAD_ROWS + WINDOW * ERA_SLOT_ROWS;

// ============================================================================
// PRIMITIVES
// ============================================================================

/// Terminal dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

impl Size {
    pub const fn new(cols: u16, rows: u16) -> Self {
        Size { cols, rows }
    }
}

/// Width of one browser column: widest label or era plus padding,
/// rounded up to an even number so centered text is symmetric.
pub fn column_width(browsers: &[Browser]) -> usize {
    let widest = browsers
        .iter()
        .map(Browser::max_column_width)
        .max()
        .unwrap_or(0)
        .max(1);
    let width = 2 * PADDING + widest;
    width + width % 2
}

/// Width of `visible` columns with one separator column between each.
pub fn table_width(column_width: usize, visible: usize) -> usize {
    column_width * visible + visible.saturating_sub(1)
}

/// How many browsers fit in `cols`, dropping from the end of the list.
///
/// Never reorders browsers and never goes below one (when there is one).
pub fn visible_count(browsers: &[Browser], cols: u16) -> usize {
    let mut visible = browsers.len();
    while visible > 1
        && table_width(column_width(&browsers[..visible]), visible) > usize::from(cols)
    {
        visible -= 1;
    }
    visible
}

/// Width of one legend entry: a browser column, widened so that no
/// `short(glyph)` label is cut.
pub fn legend_cell_width(column_width: usize) -> usize {
    SupportClass::ALL
        .iter()
        .map(|class| width_of(&class.legend_label()))
        .max()
        .unwrap_or(0)
        .max(column_width)
}

/// Legend entries per row: as many cells as fit in the table, at least one.
pub fn legend_per_row(table_width: usize, cell: usize) -> usize {
    ((table_width + 1) / (cell + 1)).max(1)
}

pub fn is_compact(cols: u16) -> bool {
    cols < COMPACT_WIDTH
}

/// Split text into chunks of `width` characters (raw positional split,
/// not word-aware). A width of zero is treated as one.
pub fn wrap_chars(text: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(width.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Like [`wrap_chars`] with each chunk trimmed, as notes are displayed.
fn wrap_trimmed(text: &str, width: usize) -> Vec<String> {
    wrap_chars(text, width)
        .into_iter()
        .map(|chunk| chunk.trim().to_string())
        .collect()
}

pub fn percent_text(percent: f64) -> String {
    format!("{:.2}%", percent)
}

fn width_of(text: &str) -> usize {
    text.chars().count()
}

// ============================================================================
// GEOMETRY
// ============================================================================

/// Header content and placement.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    /// Formatted percentage, e.g. `96.10%`.
    pub percent: String,
    /// `"support: "` in full mode, empty in compact mode.
    pub label: &'static str,
    /// Status badge, e.g. `[cr]`.
    pub status: String,
    /// Title split into chunks of `title_chunk` characters.
    pub title_lines: Vec<String>,
    pub title_chunk: usize,
    /// Row of the status badge (0 in full mode).
    pub status_row: usize,
    /// Column of the status badge.
    pub status_col: i32,
}

/// Everything the renderer needs to place a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub size: Size,
    pub visible: usize,
    pub column_width: usize,
    pub table_width: usize,
    pub compact: bool,
    pub offset_x: i32,
    pub offset_y: i32,
    pub header: Header,
    pub table_row: usize,
    pub legend_row: usize,
    /// Width of one legend entry.
    pub legend_cell: usize,
    pub legend_per_row: usize,
    /// Rows of legend entries.
    pub legend_lines: usize,
    /// Row of the notes header, `None` when the feature has no notes.
    pub notes_row: Option<usize>,
    /// Free-text notes wrapped at table width.
    pub notes: Vec<Vec<String>>,
    /// Numbered notes wrapped at table width minus the gutter.
    pub numbered_notes: Vec<(u32, Vec<String>)>,
    /// Total content height in rows.
    pub height: usize,
}

impl Geometry {
    /// Lay out `feature` for `browsers` in a terminal of `size`.
    pub fn compute(size: Size, browsers: &[Browser], feature: &Feature) -> Self {
        let visible = visible_count(browsers, size.cols);
        let column_width = column_width(&browsers[..visible]);
        let table_width = table_width(column_width, visible);
        let compact = is_compact(size.cols);

        let header = layout_header(feature, table_width, compact);
        let header_rows = if compact {
            header.status_row + 1
        } else {
            header.title_lines.len().max(1)
        };

        let table_row = header_rows + 1;
        let legend_row = table_row + TABLE_ROWS;
        let legend_cell = legend_cell_width(column_width);
        let legend_per_row = legend_per_row(table_width, legend_cell);
        let legend_lines = SupportClass::ALL.len().div_ceil(legend_per_row);
        let after_legend = legend_row + 2 + legend_lines + 1;

        let notes: Vec<Vec<String>> = feature
            .notes()
            .iter()
            .map(|note| wrap_trimmed(note, table_width))
            .collect();
        let numbered_notes: Vec<(u32, Vec<String>)> = feature
            .numbered_notes()
            .iter()
            .map(|(number, text)| {
                (*number, wrap_trimmed(text, table_width.saturating_sub(NOTE_GUTTER)))
            })
            .collect();

        let (notes_row, height) = if notes.is_empty() && numbered_notes.is_empty() {
            (None, after_legend)
        } else {
            let body: usize = notes
                .iter()
                .chain(numbered_notes.iter().map(|(_, chunks)| chunks))
                .map(|chunks| chunks.len() + 1)
                .sum();
            (Some(after_legend), after_legend + 2 + body)
        };

        let offset_x = (i32::from(size.cols) - table_width as i32).div_euclid(2);
        let offset_y = ((i32::from(size.rows) - height as i32).div_euclid(2)).max(0);

        Geometry {
            size,
            visible,
            column_width,
            table_width,
            compact,
            offset_x,
            offset_y,
            header,
            table_row,
            legend_row,
            legend_cell,
            legend_per_row,
            legend_lines,
            notes_row,
            notes,
            numbered_notes,
            height,
        }
    }

    /// Absolute row for a row relative to the content top.
    pub fn row(&self, relative: usize) -> i32 {
        self.offset_y + relative as i32
    }

    /// Absolute column of the browser column at `index`.
    pub fn column_x(&self, index: usize) -> i32 {
        self.offset_x + (index * (self.column_width + 1)) as i32
    }

    /// Absolute column of the legend entry at `index` within its row.
    pub fn legend_x(&self, index: usize) -> i32 {
        self.offset_x + (index * (self.legend_cell + 1)) as i32
    }

    /// Absolute row of the middle (text) row of era slot `slot`.
    pub fn era_row(&self, slot: usize) -> i32 {
        self.row(self.table_row + TABLE_HEAD_ROWS + 1 + slot * ERA_SLOT_ROWS)
    }

    /// Absolute column of the right edge of the table.
    pub fn table_right(&self) -> i32 {
        self.offset_x + self.table_width as i32
    }
}

fn layout_header(feature: &Feature, table_width: usize, compact: bool) -> Header {
    let percent = percent_text(feature.percent());
    let label = if compact { "" } else { SUPPORT_LABEL };
    let status = feature.status().badge();

    let reserved = width_of(&percent) + width_of(label) + width_of(&status) + TITLE_MARGIN;
    let mut title_chunk = table_width.saturating_sub(reserved).max(1);
    if compact {
        title_chunk += width_of(&status);
    }
    let title_lines = wrap_chars(feature.title(), title_chunk);

    let (status_row, status_col) = if compact {
        (
            title_lines.len().max(1),
            table_width as i32 - width_of(&status) as i32,
        )
    } else {
        let title_width = width_of(feature.title()).min(title_chunk);
        (0, title_width as i32 + 1)
    };

    Header {
        percent,
        label,
        status,
        title_lines,
        title_chunk,
        status_row,
        status_col,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Status;
    use std::collections::HashMap;

    use proptest::prelude::*;

    fn browser(key: &str, eras: &[&str]) -> Browser {
        Browser::new(key, key, key, eras, &HashMap::new())
    }

    /// `count` browsers whose columns are 8 wide ("chrome" label).
    fn wide_browsers(count: usize) -> Vec<Browser> {
        (0..count).map(|_| browser("chrome", &["120", "121"])).collect()
    }

    fn feature(title: &str) -> Feature {
        Feature::builder("f")
            .title(title)
            .status(Status::CandidateRecommendation)
            .percent(96.1)
            .build()
    }

    #[test]
    fn column_width_is_padded_and_even() {
        assert_eq!(column_width(&[browser("ie", &["11"])]), 4);
        assert_eq!(column_width(&[browser("ie", &["5.5"])]), 6);
        assert_eq!(column_width(&[browser("chrome", &["1"])]), 8);
        assert_eq!(column_width(&[browser("ios_saf", &["1"])]), 10);
        assert_eq!(column_width(&[]), 4);
    }

    #[test]
    fn table_width_adds_separators() {
        assert_eq!(table_width(8, 1), 8);
        assert_eq!(table_width(8, 9), 80);
        assert_eq!(table_width(8, 0), 0);
    }

    #[test]
    fn visible_count_drops_from_the_end() {
        let browsers = wide_browsers(9);
        assert_eq!(visible_count(&browsers, 80), 9);
        assert_eq!(visible_count(&browsers, 79), 8);
        assert_eq!(visible_count(&browsers, 50), 5);
    }

    #[test]
    fn visible_count_recomputes_width_for_the_reduced_set() {
        // The wide last browser stops fitting; without it columns shrink.
        let browsers = vec![
            browser("ie", &["11"]),
            browser("ie", &["10"]),
            browser("ios_saf", &["17"]),
        ];
        assert_eq!(visible_count(&browsers, 32), 3);
        assert_eq!(visible_count(&browsers, 31), 2);
        assert_eq!(visible_count(&browsers, 9), 2);
    }

    #[test]
    fn visible_count_never_below_one() {
        let browsers = wide_browsers(3);
        assert_eq!(visible_count(&browsers, 1), 1);
        assert_eq!(visible_count(&browsers, 0), 1);
        assert_eq!(visible_count(&[], 80), 0);
    }

    #[test]
    fn compact_below_sixty_columns() {
        assert!(is_compact(59));
        assert!(!is_compact(60));
    }

    #[test]
    fn wrap_chars_splits_positionally() {
        assert_eq!(wrap_chars("abcdefg", 3), vec!["abc", "def", "g"]);
        assert_eq!(wrap_chars("ab", 0), vec!["a", "b"]);
        assert!(wrap_chars("", 5).is_empty());
        assert_eq!(wrap_chars("héllo", 2), vec!["hé", "ll", "o"]);
    }

    #[test]
    fn full_mode_title_shares_line_with_status() {
        let title = "x".repeat(70);
        let geometry = Geometry::compute(Size::new(100, 60), &wide_browsers(9), &feature(&title));

        assert!(!geometry.compact);
        assert_eq!(geometry.table_width, 80);
        // 80 - "96.10%" - "support: " - "[cr]" - 3
        assert_eq!(geometry.header.title_chunk, 58);
        assert_eq!(geometry.header.title_lines.len(), 2);
        assert_eq!(geometry.header.status_row, 0);
        assert_eq!(geometry.header.status_col, 59);
        assert_eq!(geometry.header.label, SUPPORT_LABEL);
        assert_eq!(geometry.table_row, 3);
    }

    #[test]
    fn compact_mode_moves_status_and_drops_label() {
        let title = "y".repeat(40);
        let geometry = Geometry::compute(Size::new(50, 60), &wide_browsers(9), &feature(&title));

        assert!(geometry.compact);
        assert_eq!(geometry.visible, 5);
        assert_eq!(geometry.table_width, 44);
        assert_eq!(geometry.header.label, "");
        // 44 - 6 - 0 - 4 - 3, plus the status width added back
        assert_eq!(geometry.header.title_chunk, 35);
        assert_eq!(geometry.header.title_lines.len(), 2);
        assert_eq!(geometry.header.status_row, 2);
        assert_eq!(geometry.header.status_col, 40);
        assert_eq!(geometry.table_row, 4);
    }

    #[test]
    fn title_chunk_never_below_one() {
        let geometry = Geometry::compute(Size::new(100, 60), &[browser("ie", &["9"])], &feature("abc"));
        assert_eq!(geometry.header.title_chunk, 1);
        assert_eq!(geometry.header.title_lines, vec!["a", "b", "c"]);
    }

    #[test]
    fn vertical_sections_stack_in_order() {
        let f = Feature::builder("f")
            .title("Short")
            .note("n".repeat(100).as_str())
            .numbered_note(1, "one")
            .build();
        let geometry = Geometry::compute(Size::new(100, 200), &wide_browsers(9), &f);

        assert_eq!(geometry.table_row, 2);
        assert_eq!(geometry.legend_row, 2 + TABLE_ROWS);
        assert_eq!(geometry.legend_lines, 1);
        let notes_row = geometry.legend_row + 2 + 1 + 1;
        assert_eq!(geometry.notes_row, Some(notes_row));
        assert_eq!(geometry.notes, vec![vec!["n".repeat(80), "n".repeat(20)]]);
        assert_eq!(geometry.numbered_notes, vec![(1, vec!["one".to_string()])]);
        // header + blank, note (2 chunks + blank), numbered (1 chunk + blank)
        assert_eq!(geometry.height, notes_row + 2 + 3 + 2);
    }

    #[test]
    fn legend_cells_fit_the_widest_label() {
        assert_eq!(legend_cell_width(4), "unknown(?)".len());
        assert_eq!(legend_cell_width(12), 12);
        assert_eq!(legend_per_row(44, 10), 4);
        assert_eq!(legend_per_row(43, 10), 3);
        assert_eq!(legend_per_row(4, 10), 1);
    }

    #[test]
    fn legend_wraps_at_table_width() {
        let f = feature("t");
        let geometry = Geometry::compute(Size::new(20, 60), &wide_browsers(9), &f);
        assert_eq!(geometry.visible, 2);
        assert_eq!(geometry.table_width, 17);
        assert_eq!(geometry.legend_cell, 10);
        assert_eq!(geometry.legend_per_row, 1);
        assert_eq!(geometry.legend_lines, 7);
        assert_eq!(geometry.notes_row, None);
        assert_eq!(geometry.height, geometry.legend_row + 2 + 7 + 1);
    }

    #[test]
    fn narrow_columns_widen_the_legend() {
        // "ie" and "edge" columns are 6 wide: table width 13, one entry per row
        let browsers = vec![browser("ie", &["11"]), browser("edge", &["120"])];
        let geometry = Geometry::compute(Size::new(80, 60), &browsers, &feature("t"));
        assert_eq!(geometry.column_width, 6);
        assert_eq!(geometry.legend_cell, 10);
        assert_eq!(geometry.legend_per_row, 1);
        assert_eq!(geometry.legend_x(0), geometry.offset_x);
    }

    #[test]
    fn table_is_centered() {
        let geometry = Geometry::compute(Size::new(101, 200), &wide_browsers(9), &feature("t"));
        assert_eq!(geometry.offset_x, 10);
        assert_eq!(geometry.offset_y, (200 - geometry.height as i32) / 2);
        assert_eq!(geometry.column_x(1), 19);
        assert_eq!(geometry.table_right(), 90);
    }

    #[test]
    fn overflow_gives_negative_x_and_zero_y() {
        let geometry = Geometry::compute(Size::new(5, 3), &wide_browsers(2), &feature("t"));
        assert_eq!(geometry.visible, 1);
        assert_eq!(geometry.offset_x, -2);
        assert_eq!(geometry.offset_y, 0);
    }

    #[test]
    fn era_rows_step_by_slot() {
        let geometry = Geometry::compute(Size::new(100, 200), &wide_browsers(9), &feature("t"));
        let first = geometry.era_row(0);
        assert_eq!(first, geometry.row(geometry.table_row + 3));
        assert_eq!(geometry.era_row(5) - first, 20);
        // bottom border of the last slot is the last table row
        assert_eq!(geometry.era_row(5) + 2, geometry.row(geometry.legend_row - 1));
    }

    fn arb_browser() -> impl Strategy<Value = Browser> {
        (1usize..12, proptest::collection::vec(1usize..8, 0..6)).prop_map(|(label, eras)| {
            let key = "k".repeat(label);
            let eras: Vec<String> = eras
                .iter()
                .enumerate()
                .map(|(i, len)| format!("{}{}", i, "9".repeat(*len)))
                .collect();
            Browser::new(&key, "k", "K", &eras, &HashMap::new())
        })
    }

    proptest! {
        #[test]
        fn visible_count_is_maximal_greedy_fit(
            browsers in proptest::collection::vec(arb_browser(), 1..12),
            cols in 0u16..300,
        ) {
            let k = visible_count(&browsers, cols);
            prop_assert!(k >= 1);
            let fits = |n: usize| table_width(column_width(&browsers[..n]), n) <= usize::from(cols);
            prop_assert!(k == 1 || fits(k));
            for larger in (k + 1)..=browsers.len() {
                prop_assert!(!fits(larger));
            }
        }

        #[test]
        fn column_width_is_even_and_padded(browsers in proptest::collection::vec(arb_browser(), 0..12)) {
            let width = column_width(&browsers);
            prop_assert_eq!(width % 2, 0);
            prop_assert!(width >= 2 * PADDING + 1);
        }
    }
}
