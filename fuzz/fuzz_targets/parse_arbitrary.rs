// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for parser crash safety.
//!
//! Feeds arbitrary UTF-8 to every parser entry point under a short deadline.
//! The parser passes if it never panics, never overflows the stack, always
//! returns within the deadline, and keeps every diagnostic span inside the
//! input.

#![no_main]

use std::time::Duration;

use escalier_core::source_analysis::{
    Deadline, Source, parse_module, parse_script, parse_type_ann,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Invalid UTF-8 is rejected before the parser ever sees a file.
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let len = u32::try_from(text.len()).unwrap_or(u32::MAX);
    let source = Source::anonymous(text);
    let deadline = || Deadline::after(Duration::from_millis(100));

    let (_script, diagnostics) = parse_script(&source, &deadline());
    assert!(diagnostics.iter().all(|d| d.span.end().offset <= len));

    let (_module, diagnostics) = parse_module(&source, &deadline());
    assert!(diagnostics.iter().all(|d| d.span.end().offset <= len));

    let (_type_ann, diagnostics) = parse_type_ann(text, &deadline());
    assert!(diagnostics.iter().all(|d| d.span.end().offset <= len));
});
