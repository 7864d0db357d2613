//! Display handles
//!
//! [`init`] creates the display context and splits access to it in two:
//!
//! - [`Display`] is used by the logic thread (application or script code).
//!   It issues every drawing, console and mode call, and may block inside
//!   [`Display::input`] while waiting for keystrokes.
//! - [`Host`] is used by the render thread. It feeds keystrokes in with
//!   [`Host::update`] and takes frames out with [`Host::publish`]; neither
//!   ever waits on the logic thread.
//!
//! Both share one `Mutex<Screen>`. Each call locks for the duration of that
//! single operation only, so a frame always shows the result of whole
//! operations. Keystrokes cross over through a bounded channel.

use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::app::Config;
use crate::core::{
    ColourValue, CursorMode, DrawOptions, FlashSpeed, Mode, PlotOptions, Screen, Snapshot,
};
use crate::error::Result;
use crate::input::{EditOutcome, Key, KeyRepeat};
use crate::raster::{Charset, Direction, Point};
use crate::renderer::{Frame, Publisher};

/// Lock the screen, recovering from a poisoned lock: a frame must always be
/// produced even if a drawing call panicked
fn lock(screen: &Mutex<Screen>) -> MutexGuard<'_, Screen> {
    screen.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Create the display context in the configured start-up mode
pub fn init(config: &Config) -> (Display, Host) {
    let mode = config.initial_mode();
    let screen = Arc::new(Mutex::new(Screen::new(mode, config.blink_period)));
    let capacity = config.key_queue_capacity.max(1);
    let (tx, rx) = mpsc::sync_channel(capacity);
    debug!(mode = mode.id(), capacity, "display initialised");

    let display = Display {
        screen: Arc::clone(&screen),
        keys: rx,
        max_input_len: config.max_input_len,
    };
    let host = Host {
        screen,
        keys: tx,
        pending: VecDeque::with_capacity(capacity),
        pending_limit: capacity,
        repeat: KeyRepeat::new(),
        fired: Vec::new(),
        publisher: Publisher::new(config.border_width),
    };
    (display, host)
}

/// Logic-thread handle
#[derive(Debug)]
pub struct Display {
    screen: Arc<Mutex<Screen>>,
    keys: Receiver<Key>,
    max_input_len: usize,
}

impl Display {
    fn with<R>(&self, f: impl FnOnce(&mut Screen) -> R) -> R {
        f(&mut lock(&self.screen))
    }

    /// Switch mode by id (40 or 80); clears the screen
    pub fn set_mode(&self, id: u16) -> Result<()> {
        self.with(|s| s.set_mode(id))
    }

    /// Id of the active mode
    pub fn ask_mode(&self) -> u16 {
        self.with(|s| s.mode().id())
    }

    pub fn mode(&self) -> Mode {
        self.with(|s| s.mode())
    }

    pub fn set_colour(&self, index: u8, value: impl Into<ColourValue>) -> Result<()> {
        let value = value.into();
        self.with(|s| s.set_colour(index, value))
    }

    pub fn set_colour_flash(
        &self,
        index: u8,
        speed: FlashSpeed,
        alternate: impl Into<ColourValue>,
    ) -> Result<()> {
        let alternate = alternate.into();
        self.with(|s| s.set_colour_flash(index, speed, alternate))
    }

    pub fn set_paper(&self, index: u8) -> Result<()> {
        self.with(|s| s.set_paper(index))
    }

    pub fn set_border(&self, index: u8) -> Result<()> {
        self.with(|s| s.set_border(index))
    }

    pub fn set_pen(&self, index: u8) -> Result<()> {
        self.with(|s| s.set_pen(index))
    }

    pub fn set_brush(&self, index: u8) -> Result<()> {
        self.with(|s| s.set_brush(index))
    }

    pub fn set_charset(&self, index: u8) -> Result<()> {
        self.with(|s| s.set_charset(index))
    }

    /// Default scale for plotted text
    pub fn set_plot_size(&self, size_x: u32, size_y: u32) {
        self.with(|s| s.set_plot_size(size_x, size_y))
    }

    pub fn set_plot_direction(&self, direction: Direction) {
        self.with(|s| s.set_plot_direction(direction))
    }

    pub fn set_plot_font(&self, font: Charset) {
        self.with(|s| s.set_plot_font(font))
    }

    /// Select the text box (0 to 9) that console output goes to
    pub fn set_writing(&self, index: u8) -> Result<()> {
        self.with(|s| s.set_writing(index))
    }

    /// Define text box `index` (1 to 9) by two corner cells
    pub fn define_writing(
        &self,
        index: u8,
        col1: usize,
        row1: usize,
        col2: usize,
        row2: usize,
    ) -> Result<()> {
        self.with(|s| s.define_writing(index, col1, row1, col2, row2))
    }

    pub fn set_over(&self, over: bool) {
        self.with(|s| s.set_over(over))
    }

    pub fn set_cursor(&self, visible: bool) {
        self.with(|s| s.set_cursor(visible))
    }

    pub fn set_cursor_mode(&self, mode: CursorMode) {
        self.with(|s| s.set_cursor_mode(mode))
    }

    pub fn set_cursor_char(&self, glyph: char, charset: Charset) {
        self.with(|s| s.set_cursor_char(glyph, charset))
    }

    pub fn set_curpos(&self, col: usize, row: usize) {
        self.with(|s| s.set_curpos(col, row))
    }

    pub fn ask_curpos(&self) -> (usize, usize) {
        self.with(|s| s.curpos())
    }

    pub fn cls(&self) {
        self.with(|s| s.cls())
    }

    pub fn plot(&self, opts: &PlotOptions, text: &str, x: i32, y: i32) {
        self.with(|s| s.plot(opts, text, x, y))
    }

    /// Polyline through two or more points
    pub fn line(&self, opts: &DrawOptions, points: &[Point]) {
        self.with(|s| s.line(opts, points))
    }

    /// Filled polygon; the path closes itself
    pub fn area(&self, opts: &DrawOptions, points: &[Point]) {
        self.with(|s| s.area(opts, points))
    }

    pub fn plonk_logo(&self, x: i32, y: i32) {
        self.with(|s| s.plonk_logo(x, y))
    }

    pub fn print(&self, text: &str) {
        self.with(|s| s.print(text))
    }

    pub fn put(&self, c: char) {
        self.with(|s| s.put(c))
    }

    /// Logical colour of a pixel
    pub fn ask_pixel(&self, x: i32, y: i32) -> Option<u8> {
        self.with(|s| s.pixel(x, y))
    }

    /// Next queued key, without waiting
    pub fn get(&self) -> Option<Key> {
        self.keys.try_recv().ok()
    }

    /// Read a line of text.
    ///
    /// Prints `prompt`, shows `prefill` as editable text and consumes keys
    /// until Enter. Keys typed before the call are discarded. Returns None
    /// when the read is aborted with Break, discarded by a mode change or
    /// the host has gone away.
    pub fn input(&self, prompt: &str, prefill: &str) -> Option<String> {
        let mut flushed = 0;
        while self.keys.try_recv().is_ok() {
            flushed += 1;
        }
        if flushed > 0 {
            debug!(flushed, "discarded keys typed before read");
        }

        let id = self.with(|s| s.begin_input(prompt, prefill, self.max_input_len));
        loop {
            // never hold the lock while waiting
            let key = match self.keys.recv() {
                Ok(key) => key,
                Err(_) => {
                    warn!(id, "key channel closed during read");
                    self.with(|s| s.discard_input());
                    return None;
                }
            };
            match self.with(|s| s.input_key(id, key)) {
                Some(EditOutcome::Pending { .. }) => {}
                Some(EditOutcome::Completed(line)) => return Some(line),
                Some(EditOutcome::Aborted) => {
                    debug!(id, "read aborted");
                    return None;
                }
                None => {
                    warn!(id, "read discarded");
                    return None;
                }
            }
        }
    }

    /// Deterministic description of the current state
    pub fn snapshot(&self) -> Snapshot {
        self.with(|s| Snapshot::from_screen(s))
    }
}

/// Render-thread handle
#[derive(Debug)]
pub struct Host {
    screen: Arc<Mutex<Screen>>,
    keys: SyncSender<Key>,
    /// Keys waiting for room in the channel
    pending: VecDeque<Key>,
    pending_limit: usize,
    repeat: KeyRepeat,
    fired: Vec<Key>,
    publisher: Publisher,
}

impl Host {
    /// Queue a key press for delivery on the next [`Host::update`]
    pub fn press(&mut self, key: Key) {
        if self.pending.len() >= self.pending_limit {
            warn!(?key, "key buffer full, dropping key");
            return;
        }
        self.pending.push_back(key);
    }

    /// Queue every character of `text` that maps to a key
    pub fn type_text(&mut self, text: &str) {
        for key in text.chars().filter_map(Key::from_char) {
            self.press(key);
        }
    }

    /// Abort a pending read. Break jumps ahead of queued keys.
    pub fn abort_input(&mut self) {
        self.pending.push_front(Key::Break);
        self.flush();
    }

    /// Deliver keys for this tick. `held` lists the control keys currently
    /// held down; they are auto-repeated. Never blocks.
    pub fn update(&mut self, held: &[Key]) {
        self.fired.clear();
        self.repeat.tick(held, &mut self.fired);
        for i in 0..self.fired.len() {
            let key = self.fired[i];
            self.press(key);
        }
        self.flush();
    }

    fn flush(&mut self) {
        while let Some(&key) = self.pending.front() {
            match self.keys.try_send(key) {
                Ok(()) => {
                    self.pending.pop_front();
                }
                Err(TrySendError::Full(_)) => break,
                Err(TrySendError::Disconnected(_)) => {
                    debug!(dropped = self.pending.len(), "display gone, dropping keys");
                    self.pending.clear();
                    break;
                }
            }
        }
    }

    /// Produce the next frame. Holds the screen lock only while copying.
    pub fn publish(&mut self) -> &Frame {
        {
            let mut screen = lock(&self.screen);
            self.publisher.capture(&mut screen);
        }
        self.publisher.composite()
    }

    /// Deterministic description of the current state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_screen(&lock(&self.screen))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_reach_get() {
        let (display, mut host) = init(&Config::default());
        host.type_text("hi\n");
        assert_eq!(display.get(), None);
        host.update(&[]);
        assert_eq!(display.get(), Some(Key::Char('h')));
        assert_eq!(display.get(), Some(Key::Char('i')));
        assert_eq!(display.get(), Some(Key::Enter));
        assert_eq!(display.get(), None);
    }

    #[test]
    fn test_channel_full_keeps_keys_pending() {
        let config = Config {
            key_queue_capacity: 2,
            ..Config::default()
        };
        let (display, mut host) = init(&config);
        host.press(Key::Char('a'));
        host.press(Key::Char('b'));
        host.update(&[]);
        host.press(Key::Char('c'));
        host.update(&[]);
        assert_eq!(display.get(), Some(Key::Char('a')));
        assert_eq!(display.get(), Some(Key::Char('b')));
        assert_eq!(display.get(), None);
        host.update(&[]);
        assert_eq!(display.get(), Some(Key::Char('c')));
    }

    #[test]
    fn test_held_key_repeats_through_update() {
        let (display, mut host) = init(&Config::default());
        host.update(&[Key::Left]);
        host.update(&[Key::Left]);
        assert_eq!(display.get(), Some(Key::Left));
        assert_eq!(display.get(), None);
    }

    #[test]
    fn test_update_survives_dropped_display() {
        let (display, mut host) = init(&Config::default());
        drop(display);
        host.type_text("abc");
        host.update(&[]);
        let frame = host.publish();
        assert_eq!(frame.drawable_width(), 640);
    }

    #[test]
    fn test_input_returns_none_when_host_gone() {
        let (display, host) = init(&Config::default());
        drop(host);
        assert_eq!(display.input("> ", ""), None);
        assert!(!display.snapshot().reading);
    }
}
