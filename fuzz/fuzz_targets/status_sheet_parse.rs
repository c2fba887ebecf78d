//! Fuzz target for tooth status sheet parsing.

#![no_main]

use libfuzzer_sys::fuzz_target;
use periochart::ir::io_tooth_status::fuzz_parse_status;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let _ = fuzz_parse_status(data);
});
