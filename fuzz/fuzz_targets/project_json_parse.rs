//! Fuzz target for project JSON documents.

#![no_main]

use labelkit::export::export_all;
use labelkit::model::io_json::from_json_str;
use labelkit::yolo::LabelFormat;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };

    // Anything that parses must also export without panicking.
    if let Ok(project) = from_json_str(json) {
        let _ = export_all(&project.images, &project.annotations, &project.labels, LabelFormat::Auto);
    }
});
