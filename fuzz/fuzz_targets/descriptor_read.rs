#![no_main]

// Whole descriptor files: decoding may fail but must not panic, and every
// decoded tool must be launchable.

use datatype_query_api::descriptor_file::read_descriptor;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(file) = read_descriptor(data) {
        assert!(!file.header.base_name.is_empty());
        assert!(file.tools.iter().all(|tool| tool.is_usable()));
    }
});
