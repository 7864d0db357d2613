//! Display Core Module
//!
//! Platform-independent display state. This module contains:
//! - Modes and their geometry
//! - The palette of logical colours
//! - The framebuffer of logical colour indices
//! - Cursor state, text boxes and the text console
//! - Deterministic snapshot generation
//!
//! The core is deterministic: given the same sequence of display calls it
//! always produces the same state.

mod console;
mod cursor;
mod framebuffer;
mod mode;
mod palette;
mod screen;
mod snapshot;
mod textbox;

pub use cursor::{Cursor, CursorMode};
pub use framebuffer::Framebuffer;
pub use mode::{Mode, CELL_HEIGHT, CELL_WIDTH};
pub use palette::{ColourValue, FlashSpeed, Palette, Rgb, BASIC_COLOURS};
pub use screen::{DrawOptions, PlotOptions, Screen, DEFAULT_BLINK_PERIOD};
pub use snapshot::{CursorSnapshot, Snapshot};
pub use textbox::{TextBox, TEXT_BOXES};
