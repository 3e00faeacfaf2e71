//! TUI effects boundary: the render/await-input loop.
//!
//! This is the only module that sequences side effects. It wires the pure
//! layers (layout, update, view) to a [`Console`]. Kept minimal: all
//! intelligence lives in the pure layers.
//!
//! Single-threaded and synchronous: render one frame, block on one event,
//! repeat. The terminal is released exactly once on every exit path,
//! including errors and panics.

use std::io;

use tracing::debug;

use crate::error::Result;
use crate::layout::Geometry;
use crate::types::{Browser, Feature};

use super::console::{Console, CrosstermConsole};
use super::state::{LoopState, Transition};
use super::theme::Palette;
use super::update::{rendered, update};
use super::view::render;

// ============================================================================
// TERMINAL SESSION
// ============================================================================

/// Releases the console on drop unless already released.
///
/// Created before `acquire`, so a failed or panicking acquire still gets
/// a release.
struct Session<'c, C: Console> {
    console: &'c mut C,
    released: bool,
}

impl<'c, C: Console> Session<'c, C> {
    fn new(console: &'c mut C) -> Self {
        Session { console, released: false }
    }

    /// Show the cursor, then leave raw mode. Only the first call does anything.
    fn release(&mut self) -> io::Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        let cursor = self.console.show_cursor();
        let mode = self.console.restore_mode();
        cursor.and(mode)
    }
}

impl<C: Console> Drop for Session<'_, C> {
    fn drop(&mut self) {
        let _ = self.release();
    }
}

// ============================================================================
// EVENT LOOP
// ============================================================================

/// Show `feature` until the user presses a key.
///
/// Errors from the console or a render pass propagate after release.
pub fn run<C: Console>(
    console: &mut C,
    feature: &Feature,
    browsers: &[Browser],
    palette: Palette,
) -> Result<()> {
    let mut session = Session::new(console);
    let outcome = drive(&mut *session.console, feature, browsers, palette);
    let released = session.release();
    outcome?;
    released?;
    Ok(())
}

/// Run the viewer on the real terminal.
pub fn run_terminal(feature: &Feature, browsers: &[Browser], palette: Palette) -> Result<()> {
    let mut console = CrosstermConsole::new();
    run(&mut console, feature, browsers, palette)
}

fn drive<C: Console>(
    console: &mut C,
    feature: &Feature,
    browsers: &[Browser],
    palette: Palette,
) -> io::Result<()> {
    console.acquire()?;
    console.register_palette(palette)?;
    let mut size = console.dimensions()?;
    let mut state = LoopState::default();

    loop {
        match state {
            LoopState::Rendering => {
                let geometry = Geometry::compute(size, browsers, feature);
                debug!(
                    cols = size.cols,
                    rows = size.rows,
                    visible = geometry.visible,
                    compact = geometry.compact,
                    "render"
                );
                console.draw(&mut |surface| render(surface, feature, browsers, &geometry))?;
                state = rendered(state);
            }
            LoopState::AwaitInput => {
                let event = console.read_event()?;
                match update(state, &event) {
                    Transition::State(next) => state = next,
                    Transition::Resize(reported) => {
                        debug!(cols = reported.cols, rows = reported.rows, "resize");
                        size = console.dimensions()?;
                        console.register_palette(palette)?;
                        console.clear()?;
                        state = LoopState::Rendering;
                    }
                    Transition::Exit => return Ok(()),
                }
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
