//! Fuzz target for chord strings against a fixed key event.

#![no_main]

use labelkit::shortcuts::{matches_shortcut, KeyEvent};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(chord) = std::str::from_utf8(data) else {
        return;
    };

    let event = KeyEvent::new("z").with_code("KeyZ").ctrl().shift();
    let _ = matches_shortcut(&event, chord);
});
