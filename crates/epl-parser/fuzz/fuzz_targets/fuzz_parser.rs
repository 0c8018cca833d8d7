#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // The nesting limit bounds recursion; the size cap keeps iterations fast.
    // Real statements are well under 64KB.
    if data.len() > 65_536 {
        return;
    }
    if let Ok(source) = std::str::from_utf8(data) {
        // The parser must never panic on any input
        if let Ok(stmt) = epl_parser::parse_statement(source) {
            let _ = epl_parser::parse_statement(&stmt.to_string());
        }
    }
});
