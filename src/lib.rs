//! Nimbus Display Library
//!
//! An emulation of the display subsystem of a 1980s school microcomputer:
//! two screen modes, a palette of logical colours, vector and text drawing,
//! a scrolling text console and a line-editing input reader, driven by a
//! host that publishes one frame per render tick.
//!
//! - `core`: modes, palette, framebuffer, cursor, console and snapshots
//! - `raster`: line, polygon fill, scaled text and image blit
//! - `input`: keys, auto-repeat and the line editor
//! - `renderer`: compositing frames and PNG export
//! - `display`: the logic-thread and render-thread handles
//! - `app`: configuration

pub mod app;
pub mod core;
pub mod display;
pub mod error;
pub mod input;
pub mod raster;
pub mod renderer;

pub use display::{init, Display, Host};
pub use error::{DisplayError, Result};
