//! Pure rendering: draw one feature's support matrix onto a [`Surface`].
//!
//! Every position comes from a precomputed [`Geometry`]; this module only
//! decides what text goes where and in which style. The only effect is
//! `Surface::write_styled`, so the same code drives the real terminal, the
//! headless text grid and the tests.

use std::io;

use crate::era::era_window;
use crate::layout::{Geometry, Size, NOTE_GUTTER};
use crate::types::{Browser, Feature, SupportClass};

use super::surface::{Surface, TextSurface};
use super::theme::{PercentBand, StatusTone, StyleId};

/// Width of the number column in front of a numbered note.
const NOTE_NUMBER_WIDTH: usize = 3;

// ============================================================================
// DISPATCH
// ============================================================================

/// Draw the whole frame: header, browser columns, legend, notes.
///
/// `browsers` is the full configured list; only the first
/// `geometry.visible` are drawn.
pub fn render<S: Surface + ?Sized>(
    surface: &mut S,
    feature: &Feature,
    browsers: &[Browser],
    geometry: &Geometry,
) -> io::Result<()> {
    render_header(surface, feature, geometry)?;
    for (index, browser) in browsers.iter().take(geometry.visible).enumerate() {
        render_browser(surface, feature, browser, index, geometry)?;
    }
    render_legend(surface, geometry)?;
    render_notes(surface, geometry)?;
    Ok(())
}

/// Render into a text grid as wide as `cols` and exactly as tall as the
/// content, for output that is not a terminal.
pub fn render_to_string(
    feature: &Feature,
    browsers: &[Browser],
    cols: u16,
    monochrome: bool,
) -> io::Result<String> {
    let geometry = Geometry::compute(Size::new(cols, 0), browsers, feature);
    let rows = u16::try_from(geometry.height).unwrap_or(u16::MAX);
    let size = Size::new(cols, rows);
    let mut surface = if monochrome {
        TextSurface::new_monochrome(size)
    } else {
        TextSurface::new(size)
    };
    render(&mut surface, feature, browsers, &geometry)?;
    Ok(surface.to_string())
}

// ============================================================================
// HEADER
// ============================================================================

fn render_header<S: Surface + ?Sized>(
    surface: &mut S,
    feature: &Feature,
    geometry: &Geometry,
) -> io::Result<()> {
    let header = &geometry.header;

    let percent_x = geometry.table_right() - width(&header.percent);
    let band = PercentBand::from_percent(feature.percent());
    put(surface, geometry.row(0), percent_x, &header.percent, StyleId::Percent(band))?;
    if !header.label.is_empty() {
        put(surface, geometry.row(0), percent_x - width(header.label), header.label, StyleId::Plain)?;
    }

    for (line, text) in header.title_lines.iter().enumerate() {
        put(surface, geometry.row(line), geometry.offset_x, text, StyleId::Plain)?;
    }

    let tone = StatusTone::from(feature.status());
    put(
        surface,
        geometry.row(header.status_row),
        geometry.offset_x + header.status_col,
        &header.status,
        StyleId::Status(tone),
    )
}

// ============================================================================
// BROWSER COLUMNS
// ============================================================================

fn render_browser<S: Surface + ?Sized>(
    surface: &mut S,
    feature: &Feature,
    browser: &Browser,
    index: usize,
    geometry: &Geometry,
) -> io::Result<()> {
    let x = geometry.column_x(index);
    let column_width = geometry.column_width;

    put(
        surface,
        geometry.row(geometry.table_row),
        x,
        &center(browser.label(), column_width),
        StyleId::Header,
    )?;

    for slot in era_window(browser) {
        let Some(era) = slot.era.filter(|_| slot.is_visible()) else {
            continue;
        };
        let class = feature.support_in(browser.key(), era);
        let middle = geometry.era_row(slot.slot);

        if slot.is_current {
            render_era_frame(surface, x, middle, column_width)?;
        }

        let blank = " ".repeat(column_width);
        put(surface, middle - 1, x, &blank, StyleId::Cell(class))?;
        put(surface, middle, x, &center(era, column_width), StyleId::Cell(class))?;
        let bottom = if surface.monochrome() {
            center(&class.glyph().to_string(), column_width)
        } else {
            blank
        };
        put(surface, middle + 1, x, &bottom, StyleId::Cell(class))?;

        let refs = feature.notes_for(browser.key(), era);
        if !refs.is_empty() {
            let text: String = refs.iter().map(|n| format!(" {}", n)).collect();
            put(surface, middle - 1, x, &truncate(&text, column_width), StyleId::NoteRef(class))?;
        }
    }
    Ok(())
}

/// Border rows above and below the current era's cell, plus a border
/// column on each side of it.
fn render_era_frame<S: Surface + ?Sized>(
    surface: &mut S,
    x: i32,
    middle: i32,
    column_width: usize,
) -> io::Result<()> {
    let rule = " ".repeat(column_width + 2);
    put(surface, middle - 2, x - 1, &rule, StyleId::EraBorder)?;
    put(surface, middle + 2, x - 1, &rule, StyleId::EraBorder)?;
    for row in (middle - 1)..=(middle + 1) {
        put(surface, row, x - 1, " ", StyleId::EraBorder)?;
        put(surface, row, x + column_width as i32, " ", StyleId::EraBorder)?;
    }
    Ok(())
}

// ============================================================================
// LEGEND & NOTES
// ============================================================================

fn render_legend<S: Surface + ?Sized>(surface: &mut S, geometry: &Geometry) -> io::Result<()> {
    put(
        surface,
        geometry.row(geometry.legend_row),
        geometry.offset_x,
        &center("legend", geometry.table_width),
        StyleId::Plain,
    )?;

    let per_row = geometry.legend_per_row;
    // legend header, then a blank row
    let first = geometry.legend_row + 2;
    for (index, class) in SupportClass::ALL.into_iter().enumerate() {
        put(
            surface,
            geometry.row(first + index / per_row),
            geometry.legend_x(index % per_row),
            &center(&class.legend_label(), geometry.legend_cell),
            StyleId::Legend(class),
        )?;
    }
    Ok(())
}

fn render_notes<S: Surface + ?Sized>(surface: &mut S, geometry: &Geometry) -> io::Result<()> {
    let Some(notes_row) = geometry.notes_row else {
        return Ok(());
    };
    put(
        surface,
        geometry.row(notes_row),
        geometry.offset_x,
        &center("notes", geometry.table_width),
        StyleId::Plain,
    )?;

    let mut row = notes_row + 2;
    for chunks in &geometry.notes {
        for chunk in chunks {
            put(surface, geometry.row(row), geometry.offset_x, chunk, StyleId::Plain)?;
            row += 1;
        }
        row += 1;
    }

    for (number, chunks) in &geometry.numbered_notes {
        put(
            surface,
            geometry.row(row),
            geometry.offset_x,
            &center(&number.to_string(), NOTE_NUMBER_WIDTH),
            StyleId::Header,
        )?;
        for chunk in chunks {
            put(
                surface,
                geometry.row(row),
                geometry.offset_x + NOTE_GUTTER as i32,
                chunk,
                StyleId::Plain,
            )?;
            row += 1;
        }
        row += 1;
    }
    Ok(())
}

// ============================================================================
// HELPERS
// ============================================================================

fn put<S: Surface + ?Sized>(
    surface: &mut S,
    row: i32,
    col: i32,
    text: &str,
    style: StyleId,
) -> io::Result<()> {
    surface.set_cursor(row, col);
    surface.write_styled(text, style)
}

fn width(text: &str) -> i32 {
    i32::try_from(text.chars().count()).unwrap_or(i32::MAX)
}

fn truncate(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

/// Pad `text` to exactly `width` chars, centered (extra space on the right).
/// Text wider than `width` is cut.
pub fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return truncate(text, width);
    }
    let left = (width - len) / 2;
    let right = width - len - left;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Status;
    use std::collections::HashMap;

    use ratatui::backend::TestBackend;
    use ratatui::style::Color;
    use ratatui::Terminal;

    use super::super::surface::BufferSurface;
    use super::super::theme::Palette;

    fn browser(key: &str, eras: &[&str], usage: &[(&str, f64)]) -> Browser {
        let usage: HashMap<String, f64> =
            usage.iter().map(|(era, w)| (era.to_string(), *w)).collect();
        Browser::new(key, key, key, eras, &usage)
    }

    /// Five 8-wide columns: table width 44.
    fn browsers() -> Vec<Browser> {
        let later = ["118", "119", "120", "121", "122", "123"];
        vec![
            browser("chrome", &later, &[("120", 30.0)]),
            browser("opera", &later, &[("120", 2.0)]),
            browser(
                "ie",
                &["6", "7", "8", "9", "10", "11"],
                &[("9", 0.2), ("10", 10.0), ("11", 40.0)],
            ),
            browser("edge", &later, &[("121", 5.0)]),
            browser("safari", &later, &[("119", 5.0)]),
        ]
    }

    fn grid() -> Feature {
        Feature::builder("css-grid")
            .title("CSS Grid Layout")
            .status(Status::CandidateRecommendation)
            .percent(96.1)
            .note("Some note")
            .numbered_note(1, "Numbered")
            .stat("ie", "6-7", "n")
            .stat("ie", "8-9", "a")
            .stat("ie", "10", "y #1")
            .stat("ie", "11", "y")
            .stat("chrome", "118-123", "y")
            .build()
    }

    fn draw(cols: u16, rows: u16) -> (TextSurface, Geometry) {
        let browsers = browsers();
        let feature = grid();
        let geometry = Geometry::compute(Size::new(cols, rows), &browsers, &feature);
        let mut surface = TextSurface::new(Size::new(cols, rows));
        render(&mut surface, &feature, &browsers, &geometry).unwrap();
        (surface, geometry)
    }

    fn text_at(surface: &TextSurface, row: u16, col: u16, len: usize) -> String {
        surface.row_text(row).chars().skip(usize::from(col)).take(len).collect()
    }

    #[test]
    fn center_pads_and_truncates() {
        assert_eq!(center("ie", 8), "   ie   ");
        assert_eq!(center("abc", 8), "  abc   ");
        assert_eq!(center("abc", 2), "ab");
        assert_eq!(center("", 2), "  ");
    }

    #[test]
    fn header_places_title_status_and_percent() {
        let (surface, geometry) = draw(80, 40);
        assert_eq!(geometry.offset_x, 18);
        assert_eq!(geometry.offset_y, 0);

        assert_eq!(text_at(&surface, 0, 18, 20), "CSS Grid Layout [cr]");
        assert_eq!(text_at(&surface, 0, 47, 15), "support: 96.10%");
        assert_eq!(surface.style_at(0, 56), Some(StyleId::Percent(PercentBand::High)));
        assert_eq!(
            surface.style_at(0, 34),
            Some(StyleId::Status(StatusTone::Standard))
        );
    }

    #[test]
    fn compact_header_moves_status_below_title() {
        let (surface, geometry) = draw(50, 40);
        assert!(geometry.compact);
        assert_eq!(geometry.visible, 5);
        assert_eq!(geometry.offset_x, 3);

        assert!(surface.find_row("support:").is_none());
        assert_eq!(text_at(&surface, 0, 3, 15), "CSS Grid Layout");
        assert_eq!(text_at(&surface, 0, 41, 6), "96.10%");
        assert_eq!(text_at(&surface, 1, 43, 4), "[cr]");
    }

    #[test]
    fn browser_labels_head_each_column() {
        let (surface, geometry) = draw(80, 40);
        let row = geometry.row(geometry.table_row) as u16;
        assert_eq!(text_at(&surface, row, 18, 8), " chrome ");
        assert_eq!(text_at(&surface, row, 36, 8), "   ie   ");
        assert_eq!(surface.style_at(row, 36), Some(StyleId::Header));
    }

    #[test]
    fn eras_are_drawn_in_their_class_style() {
        let (surface, geometry) = draw(80, 40);
        let ten = geometry.era_row(1) as u16;
        let eleven = geometry.era_row(2) as u16;

        assert_eq!(text_at(&surface, ten, 36, 8), "   10   ");
        assert_eq!(surface.style_at(ten, 36), Some(StyleId::Cell(SupportClass::Default)));
        assert_eq!(text_at(&surface, eleven, 36, 8), "   11   ");
        assert_eq!(
            surface.style_at(eleven + 1, 40),
            Some(StyleId::Cell(SupportClass::Default))
        );
    }

    #[test]
    fn past_era_with_low_usage_is_hidden() {
        let (surface, geometry) = draw(80, 40);
        let nine = geometry.era_row(0) as u16;
        assert_eq!(text_at(&surface, nine, 36, 8), "        ");
        assert_eq!(surface.style_at(nine, 36), Some(StyleId::Plain));
    }

    #[test]
    fn current_era_is_framed() {
        let (surface, geometry) = draw(80, 40);
        let eleven = geometry.era_row(2) as u16;

        for col in 35..45 {
            assert_eq!(surface.style_at(eleven - 2, col), Some(StyleId::EraBorder));
            assert_eq!(surface.style_at(eleven + 2, col), Some(StyleId::EraBorder));
        }
        for row in (eleven - 1)..=(eleven + 1) {
            assert_eq!(surface.style_at(row, 35), Some(StyleId::EraBorder));
            assert_eq!(surface.style_at(row, 44), Some(StyleId::EraBorder));
        }
        // the previous era's frame is not drawn
        let ten = geometry.era_row(1) as u16;
        assert_eq!(surface.style_at(ten, 35), Some(StyleId::Plain));
    }

    #[test]
    fn note_refs_sit_on_the_cell_top_row() {
        let (surface, geometry) = draw(80, 40);
        let top = geometry.era_row(1) as u16 - 1;
        assert_eq!(text_at(&surface, top, 36, 3), " 1 ");
        assert_eq!(surface.style_at(top, 37), Some(StyleId::NoteRef(SupportClass::Default)));
    }

    #[test]
    fn unknown_support_for_unlisted_browser() {
        let (surface, geometry) = draw(80, 40);
        let current = geometry.era_row(2) as u16;
        assert_eq!(text_at(&surface, current, 27, 8), "  120   ");
        assert_eq!(surface.style_at(current, 27), Some(StyleId::Cell(SupportClass::Unknown)));
    }

    #[test]
    fn legend_wraps_at_table_width() {
        let (surface, geometry) = draw(80, 40);
        let header = geometry.row(geometry.legend_row) as u16;
        assert_eq!(text_at(&surface, header, 18, 44).trim(), "legend");

        // 10-wide cells, four to a row in a 44-wide table
        let first = header + 2;
        assert_eq!(text_at(&surface, first, 18, 10), "  def(+)  ");
        assert_eq!(surface.style_at(first, 20), Some(StyleId::Legend(SupportClass::Default)));
        assert_eq!(text_at(&surface, first, 51, 10), " poly(#)  ");
        assert_eq!(text_at(&surface, first + 1, 18, 10), "prefix(@) ");
        assert_eq!(text_at(&surface, first + 1, 40, 10), "unknown(?)");
        assert_eq!(
            surface.style_at(first + 1, 40),
            Some(StyleId::Legend(SupportClass::Unknown))
        );
    }

    #[test]
    fn narrow_columns_keep_every_legend_glyph() {
        let browsers = vec![
            browser("ie", &["10", "11"], &[("11", 40.0)]),
            browser("edge", &["120", "121"], &[("121", 5.0)]),
        ];
        let text = render_to_string(&grid(), &browsers, 80, true).unwrap();
        for class in SupportClass::ALL {
            let label = class.legend_label();
            assert!(
                text.lines().any(|line| line.trim() == label),
                "legend lacks {label}"
            );
        }
    }

    #[test]
    fn notes_follow_the_legend() {
        let (surface, geometry) = draw(80, 40);
        let notes = geometry.notes_row.unwrap() as u16;
        assert_eq!(text_at(&surface, notes, 18, 44).trim(), "notes");
        assert_eq!(text_at(&surface, notes + 2, 18, 9), "Some note");
        assert_eq!(text_at(&surface, notes + 4, 18, 3), " 1 ");
        assert_eq!(surface.style_at(notes + 4, 19), Some(StyleId::Header));
        assert_eq!(text_at(&surface, notes + 4, 23, 8), "Numbered");
    }

    #[test]
    fn monochrome_adds_glyphs() {
        let browsers = browsers();
        let feature = grid();
        let geometry = Geometry::compute(Size::new(80, 40), &browsers, &feature);
        let mut surface = TextSurface::new_monochrome(Size::new(80, 40));
        render(&mut surface, &feature, &browsers, &geometry).unwrap();

        let bottom = geometry.era_row(1) as u16 + 1;
        assert_eq!(surface.char_at(bottom, 39), Some('+'));
    }

    #[test]
    fn tiny_terminal_clips_without_error() {
        for (cols, rows) in [(1, 1), (5, 3), (0, 0), (20, 10)] {
            draw(cols, rows);
        }
    }

    #[test]
    fn headless_output_is_content_height() {
        let output = render_to_string(&grid(), &browsers(), 80, false).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[0].contains("CSS Grid Layout [cr]"));
        assert!(lines.iter().any(|line| line.trim() == "legend"));
        assert_eq!(lines.last().map(|line| line.trim()), Some("1   Numbered"));
    }

    #[test]
    fn renders_into_ratatui_buffer() {
        let browsers = browsers();
        let feature = grid();
        let mut terminal = Terminal::new(TestBackend::new(80, 40)).unwrap();
        terminal
            .draw(|frame| {
                let geometry = Geometry::compute(Size::new(80, 40), &browsers, &feature);
                let mut surface = BufferSurface::new(frame.buffer_mut(), Palette::standard());
                render(&mut surface, &feature, &browsers, &geometry).expect("render should not fail");
            })
            .unwrap();

        let buffer = terminal.backend().buffer().clone();
        let content: String = buffer
            .content()
            .iter()
            .map(|cell| cell.symbol().to_string())
            .collect();
        assert!(content.contains("CSS Grid Layout"));
        assert_eq!(buffer[(56, 0)].fg, Color::Indexed(70));
        assert_eq!(buffer[(36, 9)].bg, Color::Indexed(70));
    }
}
