#![no_main]

use libfuzzer_sys::fuzz_target;

use texfence::{fence, find_math_spans, Options, DEFAULT_DELIMITERS};

fuzz_target!(|s: &str| {
    if s.is_empty() {
        return;
    }

    let spans = find_math_spans(s, DEFAULT_DELIMITERS).unwrap();
    let mut last_end = 0;
    for span in &spans {
        assert!(span.start_offset >= last_end, "overlapping spans in {:?}", s);
        assert!(!span.raw_content.trim().is_empty());
        if span.inline {
            assert!(!span.raw_content.contains('\n'));
        }
        last_end = span.end_offset;
    }

    let options = Options::default();
    let once = fence(s, &options).unwrap();
    let twice = fence(&once, &options).unwrap();
    assert_eq!(once, twice, "fencing is not idempotent for {:?}", s);
});
