//! Terminal lifecycle: the [`Console`] seam and its crossterm implementation.
//!
//! The render loop only talks to a `Console`, so tests can swap in a
//! recording double and observe acquire/release ordering.

use std::io::{self, Stdout, Write};
use std::sync::OnceLock;

use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{debug, info};

use crate::layout::Size;

use super::state::InputEvent;
use super::surface::{BufferSurface, Surface};
use super::theme::Palette;

/// A frame callback: draw onto whatever surface the console provides.
pub type DrawFn<'f> = dyn FnMut(&mut dyn Surface) -> io::Result<()> + 'f;

/// Exclusive access to a character terminal.
pub trait Console {
    /// Raw mode, no echo, hidden cursor.
    fn acquire(&mut self) -> io::Result<()>;

    fn dimensions(&mut self) -> io::Result<Size>;

    fn register_palette(&mut self, palette: Palette) -> io::Result<()>;

    fn clear(&mut self) -> io::Result<()>;

    /// Run one render pass and flush it.
    fn draw(&mut self, frame: &mut DrawFn<'_>) -> io::Result<()>;

    /// Block until one input event arrives.
    fn read_event(&mut self) -> io::Result<InputEvent>;

    fn show_cursor(&mut self) -> io::Result<()>;

    /// Leave raw mode, restoring echo and cooked input.
    fn restore_mode(&mut self) -> io::Result<()>;
}

// ============================================================================
// EVENT MAPPING
// ============================================================================

/// Map a crossterm event to an [`InputEvent`].
///
/// Returns None for key releases, which some platforms report and which
/// are not input.
pub fn map_event(event: Event) -> Option<InputEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Release => None,
        Event::Key(key) => Some(InputEvent::Key(key)),
        Event::Resize(cols, rows) => Some(InputEvent::Resize { cols, rows }),
        _ => Some(InputEvent::Other),
    }
}

/// Whether the terminal can show the 256-color palette at all.
pub fn colors_available() -> bool {
    let no_color = std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty());
    !no_color && crossterm::style::available_color_count() >= 8
}

// ============================================================================
// CROSSTERM CONSOLE
// ============================================================================

/// The real terminal: crossterm for modes and events, ratatui for the
/// frame buffer and diffed flush.
pub struct CrosstermConsole {
    terminal: Option<Terminal<CrosstermBackend<Stdout>>>,
    palette: Palette,
    #[cfg(unix)]
    signals: Option<SignalGuard>,
}

impl CrosstermConsole {
    pub fn new() -> Self {
        CrosstermConsole {
            terminal: None,
            palette: Palette::default(),
            #[cfg(unix)]
            signals: None,
        }
    }

    fn terminal(&mut self) -> io::Result<&mut Terminal<CrosstermBackend<Stdout>>> {
        self.terminal
            .as_mut()
            .ok_or_else(|| io::Error::other("terminal not acquired"))
    }
}

impl Default for CrosstermConsole {
    fn default() -> Self {
        CrosstermConsole::new()
    }
}

impl Console for CrosstermConsole {
    fn acquire(&mut self) -> io::Result<()> {
        install_panic_hook();
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(Hide)?;
        self.terminal = Some(Terminal::new(CrosstermBackend::new(stdout))?);
        #[cfg(unix)]
        {
            self.signals = Some(SignalGuard::new()?);
        }
        info!("terminal acquired");
        Ok(())
    }

    fn dimensions(&mut self) -> io::Result<Size> {
        let (cols, rows) = crossterm::terminal::size()?;
        Ok(Size::new(cols, rows))
    }

    fn register_palette(&mut self, palette: Palette) -> io::Result<()> {
        debug!(monochrome = palette.is_monochrome(), "palette registered");
        self.palette = palette;
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        self.terminal()?.clear()
    }

    fn draw(&mut self, frame: &mut DrawFn<'_>) -> io::Result<()> {
        let palette = self.palette;
        self.terminal()?.try_draw(|f| {
            let mut surface = BufferSurface::new(f.buffer_mut(), palette);
            frame(&mut surface)
        })?;
        Ok(())
    }

    fn read_event(&mut self) -> io::Result<InputEvent> {
        loop {
            if let Some(input) = map_event(event::read()?) {
                return Ok(input);
            }
        }
    }

    fn show_cursor(&mut self) -> io::Result<()> {
        io::stdout().execute(Show)?;
        Ok(())
    }

    fn restore_mode(&mut self) -> io::Result<()> {
        #[cfg(unix)]
        {
            self.signals = None;
        }
        self.terminal = None;
        leave_terminal(&mut io::stdout(), disable_raw_mode)?;
        info!("terminal released");
        Ok(())
    }
}

/// Leave raw mode, then the alternate screen. Every step runs even when an
/// earlier one fails; the first error is returned.
fn leave_terminal<W, F>(out: &mut W, disable_raw: F) -> io::Result<()>
where
    W: Write,
    F: FnOnce() -> io::Result<()>,
{
    let raw = disable_raw();
    let screen = out.execute(LeaveAlternateScreen).map(|_| ());
    let flushed = out.flush();
    raw.and(screen).and(flushed)
}

// ============================================================================
// EMERGENCY CLEANUP
// ============================================================================

/// Restore the terminal without a `Console` at hand. Errors are ignored.
fn best_effort_cleanup() {
    let mut stdout = io::stdout();
    let _ = disable_raw_mode();
    let _ = stdout.execute(Show);
    let _ = stdout.execute(LeaveAlternateScreen);
    let _ = stdout.flush();
}

/// Install (once per process) a panic hook that restores the terminal
/// before the panic message is printed.
fn install_panic_hook() {
    static INSTALLED: OnceLock<()> = OnceLock::new();
    INSTALLED.get_or_init(|| {
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            best_effort_cleanup();
            original_hook(panic_info);
        }));
    });
}

/// Watches for SIGINT/SIGTERM delivered from outside (raw mode turns a
/// typed Ctrl-C into a key event). Restores the terminal and exits.
#[cfg(unix)]
#[derive(Debug)]
struct SignalGuard {
    handle: signal_hook::iterator::Handle,
    thread: Option<std::thread::JoinHandle<()>>,
}

#[cfg(unix)]
impl SignalGuard {
    fn new() -> io::Result<Self> {
        use signal_hook::consts::signal::{SIGINT, SIGTERM};
        use signal_hook::iterator::Signals;

        let mut signals = Signals::new([SIGINT, SIGTERM]).map_err(io::Error::other)?;
        let handle = signals.handle();
        let thread = std::thread::spawn(move || {
            if let Some(signal) = signals.forever().next() {
                tracing::warn!(signal, "termination signal received, restoring terminal");
                best_effort_cleanup();
                std::process::exit(128 + signal);
            }
        });
        Ok(SignalGuard {
            handle,
            thread: Some(thread),
        })
    }
}

#[cfg(unix)]
impl Drop for SignalGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
