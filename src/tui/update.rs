//! Pure state transitions: (LoopState, event) → Transition.
//!
//! Fully testable without a terminal.

use crate::layout::Size;

use super::state::{InputEvent, LoopState, Transition};

/// A frame has been drawn: wait for input.
pub fn rendered(state: LoopState) -> LoopState {
    match state {
        LoopState::Rendering | LoopState::AwaitInput => LoopState::AwaitInput,
    }
}

/// Pure state transition function.
///
/// While awaiting input, a resize re-renders and any other event exits.
/// Nothing is read while rendering, so events there are ignored.
pub fn update(state: LoopState, event: &InputEvent) -> Transition {
    match state {
        LoopState::Rendering => Transition::State(LoopState::Rendering),
        LoopState::AwaitInput => match event {
            InputEvent::Resize { cols, rows } => Transition::Resize(Size::new(*cols, *rows)),
            InputEvent::Key(_) | InputEvent::Other => Transition::Exit,
        },
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> InputEvent {
        InputEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn rendering_leads_to_await_input() {
        assert_eq!(rendered(LoopState::Rendering), LoopState::AwaitInput);
    }

    #[test]
    fn resize_re_renders_at_new_size() {
        let transition = update(LoopState::AwaitInput, &InputEvent::Resize { cols: 100, rows: 30 });
        assert_eq!(transition, Transition::Resize(Size::new(100, 30)));
    }

    #[test]
    fn any_key_exits() {
        for code in [KeyCode::Char('q'), KeyCode::Enter, KeyCode::Esc, KeyCode::Char(' ')] {
            assert_eq!(update(LoopState::AwaitInput, &key(code)), Transition::Exit);
        }
    }

    #[test]
    fn ctrl_c_exits() {
        let event = InputEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(update(LoopState::AwaitInput, &event), Transition::Exit);
    }

    #[test]
    fn non_key_input_exits() {
        assert_eq!(update(LoopState::AwaitInput, &InputEvent::Other), Transition::Exit);
    }

    #[test]
    fn events_while_rendering_are_ignored() {
        assert_eq!(
            update(LoopState::Rendering, &key(KeyCode::Char('q'))),
            Transition::State(LoopState::Rendering)
        );
        assert_eq!(
            update(LoopState::Rendering, &InputEvent::Resize { cols: 1, rows: 1 }),
            Transition::State(LoopState::Rendering)
        );
    }
}
