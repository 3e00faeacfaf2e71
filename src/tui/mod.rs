//! TUI module for the interactive support table.
//!
//! Organized along FP/Unix boundaries:
//! - `state`: Pure data types (LoopState, InputEvent, Transition)
//! - `update`: Pure transitions
//! - `theme`, `surface`, `view`: Styles, write target, pure rendering
//! - `console`, `run`: Terminal lifecycle and the event loop (effects)

pub mod console;
pub mod run;
pub mod state;
pub mod surface;
pub mod theme;
pub mod update;
pub mod view;
