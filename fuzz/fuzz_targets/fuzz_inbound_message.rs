//! Fuzz target: `InboundMessage::parse`
//!
//! Feeds arbitrary UTF-8 hub lines through the parser and checks that it
//! never panics and that every accepted report interval is positive.
//!
//! cargo fuzz run fuzz_inbound_message

#![no_main]

use libfuzzer_sys::fuzz_target;
use trafficlight::app::commands::InboundMessage;

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = core::str::from_utf8(data) else {
        return;
    };

    match InboundMessage::parse(raw) {
        Ok(InboundMessage::ReportInterval { secs }) => assert!(secs > 0),
        Ok(InboundMessage::Inputs(update)) => {
            assert_ne!(update.local_poll_ms, Some(0), "zero poll period accepted");
        }
        Err(_) => {}
    }
});
