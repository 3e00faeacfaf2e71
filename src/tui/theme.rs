//! TUI color semantics: symbolic style ids and the palettes that map them
//! to terminal colors.
//!
//! Pure data: the renderer only ever names a [`StyleId`]; the surface
//! resolves it through the active [`Palette`].
//!
//! Color semantics (256-color indices):
//! - Green: supported, high usage, living/recommended status
//! - Orange: partial support, medium usage
//! - Red: unsupported, low usage
//! - Yellow: unofficial status
//! - Magenta: flags, non-W3C status
//! - Gray: unknown support, era borders

use ratatui::style::{Color, Modifier, Style};

use crate::config::ColorMode;
use crate::types::{Status, SupportClass};

// ============================================================================
// STYLE IDS
// ============================================================================

/// Usage percentage band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PercentBand {
    High,
    Medium,
    Low,
}

impl PercentBand {
    /// ≥ 70 is high, ≥ 40 medium, anything lower low.
    pub fn from_percent(percent: f64) -> Self {
        if percent >= 70.0 {
            PercentBand::High
        } else if percent >= 40.0 {
            PercentBand::Medium
        } else {
            PercentBand::Low
        }
    }
}

/// Color of the status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusTone {
    Standard,
    Unofficial,
    Other,
}

impl From<Status> for StatusTone {
    fn from(status: Status) -> Self {
        match status {
            Status::Unofficial => StatusTone::Unofficial,
            Status::Other => StatusTone::Other,
            _ => StatusTone::Standard,
        }
    }
}

/// Everything the renderer can ask to be drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleId {
    Plain,
    Header,
    EraBorder,
    /// Era cell background.
    Cell(SupportClass),
    /// Legend entry text.
    Legend(SupportClass),
    /// Note reference numbers drawn on a cell.
    NoteRef(SupportClass),
    Percent(PercentBand),
    Status(StatusTone),
}

// ============================================================================
// COLOR PAIRS
// ============================================================================

/// Foreground/background as 256-color indices; `None` is the terminal default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorPair {
    pub fg: Option<u8>,
    pub bg: Option<u8>,
    pub bold: bool,
    pub reversed: bool,
}

impl ColorPair {
    const fn fg(fg: u8) -> Self {
        ColorPair { fg: Some(fg), bg: None, bold: false, reversed: false }
    }

    const fn pair(fg: u8, bg: u8) -> Self {
        ColorPair { fg: Some(fg), bg: Some(bg), bold: false, reversed: false }
    }

    pub fn to_style(self) -> Style {
        let mut style = Style::new();
        if let Some(fg) = self.fg {
            style = style.fg(Color::Indexed(fg));
        }
        if let Some(bg) = self.bg {
            style = style.bg(Color::Indexed(bg));
        }
        if self.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.reversed {
            style = style.add_modifier(Modifier::REVERSED);
        }
        style
    }
}

const GREEN: u8 = 70;
const ORANGE: u8 = 208;
const RED: u8 = 160;
const YELLOW: u8 = 220;
const MAGENTA: u8 = 134;
const BLUE: u8 = 75;
const PINK: u8 = 205;
const GRAY: u8 = 239;

/// Text drawn on era cells.
const CELL_TEXT: u8 = 7;

/// Signature color of a classification: legend text and cell background.
fn class_color(class: SupportClass) -> u8 {
    match class {
        SupportClass::Default => GREEN,
        SupportClass::Partial => ORANGE,
        SupportClass::Unsupported => RED,
        SupportClass::Flag => MAGENTA,
        SupportClass::Prefixed => BLUE,
        SupportClass::Polyfill => PINK,
        SupportClass::Unknown => GRAY,
    }
}

/// Darker companion of [`class_color`], used behind note numbers.
fn class_shade(class: SupportClass) -> u8 {
    match class {
        SupportClass::Default => 22,
        SupportClass::Partial => 130,
        SupportClass::Unsupported => 88,
        SupportClass::Flag => 91,
        SupportClass::Prefixed => 27,
        SupportClass::Polyfill => 127,
        SupportClass::Unknown => 235,
    }
}

// ============================================================================
// PALETTE
// ============================================================================

/// Fixed mapping from [`StyleId`] to [`ColorPair`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    monochrome: bool,
}

impl Palette {
    pub const fn standard() -> Self {
        Palette { monochrome: false }
    }

    /// Default colors everywhere; headers bold, the current-era frame reversed.
    pub const fn monochrome() -> Self {
        Palette { monochrome: true }
    }

    /// Pick a palette for the configured mode and what the terminal supports.
    pub fn select(mode: ColorMode, colors_available: bool) -> Self {
        match mode {
            ColorMode::Always => Palette::standard(),
            ColorMode::Never => Palette::monochrome(),
            ColorMode::Auto if colors_available => Palette::standard(),
            ColorMode::Auto => Palette::monochrome(),
        }
    }

    pub fn is_monochrome(&self) -> bool {
        self.monochrome
    }

    pub fn pair(&self, id: StyleId) -> ColorPair {
        if self.monochrome {
            return match id {
                StyleId::Header => ColorPair { bold: true, ..ColorPair::default() },
                StyleId::EraBorder => ColorPair { reversed: true, ..ColorPair::default() },
                _ => ColorPair::default(),
            };
        }

        match id {
            StyleId::Plain => ColorPair::default(),
            StyleId::Header => ColorPair::pair(238, 255),
            StyleId::EraBorder => ColorPair::pair(232, 236),
            StyleId::Cell(class) => ColorPair::pair(CELL_TEXT, class_color(class)),
            StyleId::Legend(class) => ColorPair::fg(class_color(class)),
            StyleId::NoteRef(class) => ColorPair::pair(class_shade(class), class_color(class)),
            StyleId::Percent(PercentBand::High) => ColorPair::fg(GREEN),
            StyleId::Percent(PercentBand::Medium) => ColorPair::fg(ORANGE),
            StyleId::Percent(PercentBand::Low) => ColorPair::fg(RED),
            StyleId::Status(StatusTone::Standard) => ColorPair::fg(GREEN),
            StyleId::Status(StatusTone::Unofficial) => ColorPair::fg(YELLOW),
            StyleId::Status(StatusTone::Other) => ColorPair::fg(MAGENTA),
        }
    }

    pub fn style(&self, id: StyleId) -> Style {
        self.pair(id).to_style()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette::standard()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_bands() {
        assert_eq!(PercentBand::from_percent(55.5), PercentBand::Medium);
        assert_eq!(PercentBand::from_percent(85.0), PercentBand::High);
        assert_eq!(PercentBand::from_percent(12.0), PercentBand::Low);
        assert_eq!(PercentBand::from_percent(70.0), PercentBand::High);
        assert_eq!(PercentBand::from_percent(40.0), PercentBand::Medium);
    }

    #[test]
    fn percent_bands_map_to_traffic_light_colors() {
        let palette = Palette::standard();
        assert_eq!(palette.style(StyleId::Percent(PercentBand::High)).fg, Some(Color::Indexed(70)));
        assert_eq!(palette.style(StyleId::Percent(PercentBand::Medium)).fg, Some(Color::Indexed(208)));
        assert_eq!(palette.style(StyleId::Percent(PercentBand::Low)).fg, Some(Color::Indexed(160)));
    }

    #[test]
    fn status_tones() {
        assert_eq!(StatusTone::from(Status::LivingStandard), StatusTone::Standard);
        assert_eq!(StatusTone::from(Status::WorkingDraft), StatusTone::Standard);
        assert_eq!(StatusTone::from(Status::Unofficial), StatusTone::Unofficial);
        assert_eq!(StatusTone::from(Status::Other), StatusTone::Other);

        let palette = Palette::standard();
        assert_eq!(palette.pair(StyleId::Status(StatusTone::Unofficial)).fg, Some(220));
        assert_eq!(palette.pair(StyleId::Status(StatusTone::Other)).fg, Some(134));
    }

    #[test]
    fn cells_use_class_color_as_background() {
        let palette = Palette::standard();
        let cell = palette.pair(StyleId::Cell(SupportClass::Partial));
        assert_eq!(cell, ColorPair::pair(7, 208));
        let legend = palette.pair(StyleId::Legend(SupportClass::Partial));
        assert_eq!(legend.fg, cell.bg);
        assert_eq!(palette.pair(StyleId::NoteRef(SupportClass::Unknown)), ColorPair::pair(235, 239));
    }

    #[test]
    fn plain_is_terminal_default() {
        assert_eq!(Palette::standard().style(StyleId::Plain), Style::new());
    }

    #[test]
    fn monochrome_drops_all_colors() {
        let palette = Palette::monochrome();
        for class in SupportClass::ALL {
            for id in [StyleId::Cell(class), StyleId::Legend(class), StyleId::NoteRef(class)] {
                let pair = palette.pair(id);
                assert_eq!((pair.fg, pair.bg), (None, None));
            }
        }
        assert!(palette.style(StyleId::Header).add_modifier.contains(Modifier::BOLD));
        assert!(palette.style(StyleId::EraBorder).add_modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn select_honors_mode_then_capability() {
        assert!(!Palette::select(ColorMode::Auto, true).is_monochrome());
        assert!(Palette::select(ColorMode::Auto, false).is_monochrome());
        assert!(!Palette::select(ColorMode::Always, false).is_monochrome());
        assert!(Palette::select(ColorMode::Never, true).is_monochrome());
    }
}
