//! Render thread vs. logic thread
//!
//! A read blocks the logic thread; the host must keep publishing frames
//! that show the line being edited.

use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use nimbus_display::app::Config;
use nimbus_display::input::Key;
use nimbus_display::init;

#[test]
fn test_publish_while_input_pending() {
    let config = Config {
        border_width: 0,
        ..Config::default()
    };
    let (display, mut host) = init(&config);
    // keep the blinking cursor out of the cell checks
    display.set_cursor(false);
    let (done_tx, done_rx) = mpsc::channel();

    let logic = thread::spawn(move || {
        let line = display.input("> ", "");
        done_tx.send(()).ok();
        line
    });

    // wait for the read to start
    let deadline = Instant::now() + Duration::from_secs(5);
    while !host.snapshot().reading {
        assert!(Instant::now() < deadline, "read never started");
        thread::sleep(Duration::from_millis(1));
    }

    let blank_cell = |frame: &nimbus_display::renderer::Frame, col: usize| {
        let paper = frame.pixel(0, 249);
        (0..10).all(|row| (0..8).all(|x| frame.pixel(col * 8 + x, row) == paper))
    };

    let typed = "hello";
    for (i, c) in typed.chars().enumerate() {
        host.press(Key::Char(c));
        host.update(&[]);

        // every publish returns promptly while the logic thread is blocked
        let mut shown = false;
        for _ in 0..200 {
            let start = Instant::now();
            let frame = host.publish();
            assert!(start.elapsed() < Duration::from_secs(1));
            assert_eq!(frame.drawable_width(), 640);
            // prompt takes two cells; the new character lands after it
            if !blank_cell(frame, 2 + i) {
                shown = true;
                break;
            }
            thread::sleep(Duration::from_millis(1));
        }
        assert!(shown, "edit {i} never became visible");
    }
    assert!(done_rx.try_recv().is_err(), "read finished early");

    host.press(Key::Enter);
    host.update(&[]);
    assert_eq!(logic.join().unwrap(), Some(typed.to_string()));
}

#[test]
fn test_publish_never_sees_partial_mode_switch() {
    let (display, mut host) = init(&Config::default());
    let logic = thread::spawn(move || {
        for i in 0..50 {
            let id = if i % 2 == 0 { 40 } else { 80 };
            display.set_mode(id).unwrap();
            display.print("mode switch");
        }
    });
    for _ in 0..200 {
        let frame = host.publish();
        let w = frame.drawable_width();
        assert!(w == 320 || w == 640);
        assert_eq!(frame.width(), w + 2 * frame.border());
        assert_eq!(frame.as_rgba().len(), frame.width() * frame.height() * 4);
    }
    logic.join().unwrap();
}
