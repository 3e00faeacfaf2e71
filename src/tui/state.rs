//! TUI state algebra: pure types, zero effects.
//!
//! The viewer is a two-state machine. It renders one frame, then blocks on
//! exactly one input event: a resize sends it back to rendering, anything
//! else ends it. The transition function lives in `update`; the effects
//! boundary in `run` drives it.

use crossterm::event::KeyEvent;

use crate::layout::Size;

// ============================================================================
// INPUT EVENTS
// ============================================================================

/// Everything the loop can receive from the terminal.
///
/// Key releases never become an `InputEvent`; the effects layer drops them
/// while mapping raw terminal events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// The terminal changed size.
    Resize { cols: u16, rows: u16 },
    /// A key press or repeat (Ctrl-C included, the terminal is in raw mode).
    Key(KeyEvent),
    /// Mouse, focus, paste: still input, still ends the loop.
    Other,
}

// ============================================================================
// LOOP STATE
// ============================================================================

/// Where the loop is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    /// A frame must be drawn.
    #[default]
    Rendering,
    /// A frame is on screen; waiting for one event.
    AwaitInput,
}

// ============================================================================
// TRANSITIONS
// ============================================================================

/// Result of a pure state transition.
///
/// The effects boundary inspects it: pure code describes WHAT should happen,
/// effectful code decides HOW.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Move to this state, nothing else to do.
    State(LoopState),
    /// New terminal size: re-register the palette, clear, then render.
    Resize(Size),
    /// Release the terminal and stop.
    Exit,
}

// ============================================================================
// TESTS
// ============================================================================
