//! Fuzz the RFC 4180 field quoting: quoting then unquoting any string must
//! return the original, and quoted output must never leak a bare separator.

#![no_main]

use docket_core::export::csv_field;
use libfuzzer_sys::fuzz_target;

fn unquote(field: &str) -> String {
    if field.starts_with('"') && field.ends_with('"') && field.len() >= 2 {
        field[1..field.len() - 1].replace("\"\"", "\"")
    } else {
        field.to_string()
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };

    let quoted = csv_field(raw);

    if raw.contains(['"', ',', '\r', '\n']) {
        assert!(quoted.starts_with('"') && quoted.ends_with('"'));
    } else {
        assert_eq!(quoted.as_ref(), raw);
    }

    assert_eq!(unquote(&quoted), raw);
});
