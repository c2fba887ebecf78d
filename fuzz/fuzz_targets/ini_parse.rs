//! Fuzz target for annotation file parsing.
//!
//! This fuzzer feeds arbitrary byte sequences to the annotation scanner,
//! checking for panics, crashes, or hangs.

#![no_main]

use libfuzzer_sys::fuzz_target;
use periochart::ir::io_ini::fuzz_parse_ini;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let _ = fuzz_parse_ini(data);
});
