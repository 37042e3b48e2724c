//! Fuzz target for mixed-format YOLO label text.
//!
//! Feeds arbitrary UTF-8 to format detection and the auto parser, checking
//! for panics, crashes, or hangs.

#![no_main]

use labelkit::yolo::io::fuzz_parse_auto;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    fuzz_parse_auto(text);
});
