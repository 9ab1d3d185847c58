#![no_main]

// The mode-filtered decoder must agree with the full record parser.

use datatype_query_api::descriptor_file::{decode_tool_record, parse_tool_record};
use datatype_query_api::ToolMode;
use libfuzzer_sys::{arbitrary, fuzz_target};

#[derive(Clone, Debug, arbitrary::Arbitrary)]
pub struct RecordInput {
    pub want: u8,
    pub payload: Vec<u8>,
}

fuzz_target!(|input: RecordInput| {
    let Some(want) = ToolMode::from_code(u16::from(input.want % 6)) else {
        return;
    };

    let decoded = decode_tool_record(&input.payload, want);
    let parsed = parse_tool_record(&input.payload)
        .ok()
        .filter(|binding| binding.mode == want);
    assert_eq!(decoded, parsed);

    if let Some(binding) = decoded {
        assert!(binding.is_usable());
    }
});
