//! Positional, styled terminal writes.
//!
//! The renderer only knows [`Surface`]: move the cursor, write a styled run.
//! Writes outside the surface (negative coordinates included) are clipped
//! per character cell, silently.

use std::fmt;
use std::io;

use ratatui::buffer::Buffer;

use crate::layout::Size;

use super::theme::{Palette, StyleId};

pub trait Surface {
    fn dimensions(&self) -> Size;

    /// Move the write position. May be anywhere, on or off the surface.
    fn set_cursor(&mut self, row: i32, col: i32);

    /// Write `text` at the cursor and advance it by one column per char.
    fn write_styled(&mut self, text: &str, style: StyleId) -> io::Result<()>;

    /// No colors: the renderer adds glyphs so classes stay distinguishable.
    fn monochrome(&self) -> bool {
        false
    }
}

/// Cursor state shared by both implementations.
#[derive(Debug, Clone, Copy, Default)]
struct Cursor {
    row: i32,
    col: i32,
}

impl Cursor {
    /// On-surface cells covered by `text`, paired with their char.
    fn cells(self, text: &str, size: Size) -> impl Iterator<Item = (u16, u16, char)> + '_ {
        let row = self.row;
        let col = self.col;
        text.chars().enumerate().filter_map(move |(offset, ch)| {
            let x = col.checked_add(i32::try_from(offset).ok()?)?;
            let x = u16::try_from(x).ok().filter(|x| *x < size.cols)?;
            let y = u16::try_from(row).ok().filter(|y| *y < size.rows)?;
            Some((x, y, ch))
        })
    }

    fn advance(&mut self, text: &str) {
        let width = i32::try_from(text.chars().count()).unwrap_or(i32::MAX);
        self.col = self.col.saturating_add(width);
    }
}

// ============================================================================
// RATATUI BUFFER
// ============================================================================

/// Writes into a ratatui [`Buffer`], resolving styles through a [`Palette`].
///
/// Used inside `Terminal::draw` for the real terminal and `TestBackend`.
pub struct BufferSurface<'b> {
    buffer: &'b mut Buffer,
    palette: Palette,
    cursor: Cursor,
}

impl<'b> BufferSurface<'b> {
    pub fn new(buffer: &'b mut Buffer, palette: Palette) -> Self {
        BufferSurface { buffer, palette, cursor: Cursor::default() }
    }
}

impl Surface for BufferSurface<'_> {
    fn dimensions(&self) -> Size {
        Size::new(self.buffer.area.width, self.buffer.area.height)
    }

    fn set_cursor(&mut self, row: i32, col: i32) {
        self.cursor = Cursor { row, col };
    }

    fn write_styled(&mut self, text: &str, style: StyleId) -> io::Result<()> {
        let area = self.buffer.area;
        let style = self.palette.style(style);
        for (x, y, ch) in self.cursor.cells(text, self.dimensions()) {
            if let Some(cell) = self.buffer.cell_mut((area.x + x, area.y + y)) {
                cell.set_char(ch).set_style(style);
            }
        }
        self.cursor.advance(text);
        Ok(())
    }

    fn monochrome(&self) -> bool {
        self.palette.is_monochrome()
    }
}

// ============================================================================
// TEXT GRID
// ============================================================================

/// In-memory character grid with a style id per cell.
///
/// Backs headless output (stdout is not a terminal) and render assertions.
#[derive(Debug, Clone)]
pub struct TextSurface {
    size: Size,
    cells: Vec<(char, StyleId)>,
    cursor: Cursor,
    monochrome: bool,
}

impl TextSurface {
    pub fn new(size: Size) -> Self {
        let len = usize::from(size.cols) * usize::from(size.rows);
        TextSurface {
            size,
            cells: vec![(' ', StyleId::Plain); len],
            cursor: Cursor::default(),
            monochrome: false,
        }
    }

    pub fn new_monochrome(size: Size) -> Self {
        TextSurface { monochrome: true, ..TextSurface::new(size) }
    }

    fn index(&self, row: u16, col: u16) -> Option<usize> {
        (row < self.size.rows && col < self.size.cols)
            .then(|| usize::from(row) * usize::from(self.size.cols) + usize::from(col))
    }

    /// Full text of one row, trailing spaces included.
    pub fn row_text(&self, row: u16) -> String {
        (0..self.size.cols)
            .filter_map(|col| self.index(row, col).map(|i| self.cells[i].0))
            .collect()
    }

    pub fn char_at(&self, row: u16, col: u16) -> Option<char> {
        self.index(row, col).map(|i| self.cells[i].0)
    }

    pub fn style_at(&self, row: u16, col: u16) -> Option<StyleId> {
        self.index(row, col).map(|i| self.cells[i].1)
    }

    /// Row of the first line containing `needle`.
    pub fn find_row(&self, needle: &str) -> Option<u16> {
        (0..self.size.rows).find(|row| self.row_text(*row).contains(needle))
    }
}

impl Surface for TextSurface {
    fn dimensions(&self) -> Size {
        self.size
    }

    fn set_cursor(&mut self, row: i32, col: i32) {
        self.cursor = Cursor { row, col };
    }

    fn write_styled(&mut self, text: &str, style: StyleId) -> io::Result<()> {
        let written: Vec<(u16, u16, char)> = self.cursor.cells(text, self.size).collect();
        for (x, y, ch) in written {
            if let Some(i) = self.index(y, x) {
                self.cells[i] = (ch, style);
            }
        }
        self.cursor.advance(text);
        Ok(())
    }

    fn monochrome(&self) -> bool {
        self.monochrome
    }
}

/// Rows with trailing spaces trimmed, trailing blank rows dropped.
impl fmt::Display for TextSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<String> = (0..self.size.rows)
            .map(|row| self.row_text(row).trim_end().to_string())
            .collect();
        let last = rows.iter().rposition(|row| !row.is_empty()).map_or(0, |i| i + 1);
        for row in &rows[..last] {
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::layout::Rect;
    use ratatui::style::Color;

    #[test]
    fn writes_advance_the_cursor() {
        let mut surface = TextSurface::new(Size::new(10, 2));
        surface.set_cursor(1, 2);
        surface.write_styled("ab", StyleId::Header).unwrap();
        surface.write_styled("c", StyleId::Plain).unwrap();
        assert_eq!(surface.row_text(1), "  abc     ");
        assert_eq!(surface.style_at(1, 2), Some(StyleId::Header));
        assert_eq!(surface.style_at(1, 4), Some(StyleId::Plain));
    }

    #[test]
    fn negative_and_overflowing_writes_are_clipped() {
        let mut surface = TextSurface::new(Size::new(5, 2));
        surface.set_cursor(0, -2);
        surface.write_styled("abcdefghij", StyleId::Plain).unwrap();
        assert_eq!(surface.row_text(0), "cdefg");

        surface.set_cursor(-1, 0);
        surface.write_styled("zzz", StyleId::Plain).unwrap();
        surface.set_cursor(2, 0);
        surface.write_styled("zzz", StyleId::Plain).unwrap();
        assert_eq!(surface.row_text(1), "     ");
    }

    #[test]
    fn zero_sized_surface_accepts_writes() {
        let mut surface = TextSurface::new(Size::new(0, 0));
        surface.set_cursor(0, 0);
        surface.write_styled("x", StyleId::Plain).unwrap();
        assert_eq!(surface.to_string(), "");
    }

    #[test]
    fn display_trims_trailing_space_and_blank_rows() {
        let mut surface = TextSurface::new(Size::new(6, 4));
        surface.set_cursor(1, 1);
        surface.write_styled("hi", StyleId::Plain).unwrap();
        assert_eq!(surface.to_string(), "\n hi\n");
    }

    #[test]
    fn buffer_surface_resolves_palette_styles() {
        let mut buffer = Buffer::empty(Rect::new(0, 0, 8, 2));
        let mut surface = BufferSurface::new(&mut buffer, Palette::standard());
        surface.set_cursor(1, 6);
        surface.write_styled("xyz", StyleId::Legend(crate::types::SupportClass::Default)).unwrap();
        assert!(!surface.monochrome());

        let cell = &buffer[(6, 1)];
        assert_eq!(cell.symbol(), "x");
        assert_eq!(cell.fg, Color::Indexed(70));
        assert_eq!(buffer[(7, 1)].symbol(), "y");
    }

    #[test]
    fn buffer_surface_honors_area_origin() {
        let mut buffer = Buffer::empty(Rect::new(3, 2, 4, 1));
        let mut surface = BufferSurface::new(&mut buffer, Palette::monochrome());
        assert_eq!(surface.dimensions(), Size::new(4, 1));
        surface.set_cursor(0, 0);
        surface.write_styled("ab", StyleId::Plain).unwrap();
        assert!(surface.monochrome());
        assert_eq!(buffer[(3, 2)].symbol(), "a");
    }
}
