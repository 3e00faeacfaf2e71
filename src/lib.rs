//! cani: browser support tables for web platform features, in the terminal.

pub mod config;
pub mod context;
pub mod dataset;
pub mod era;
pub mod error;
pub mod layout;
pub mod logging;
pub mod report;
pub mod support;
pub mod tui;
pub mod types;
