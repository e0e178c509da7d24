//! Formatting and planning helpers for an ads agency dashboard.
//!
//! The core is the chat-message formatter: raw model output goes in, an
//! ordered list of presentation-agnostic render nodes comes out.
//!
//! See `DESIGN.md` for the architecture notes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod logging;

pub mod format;
pub mod render;

pub mod economics;
pub mod roles;
