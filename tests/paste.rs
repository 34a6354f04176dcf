//! End-to-end: bracketed paste accumulates across multiple reads and emits
//! one `Event::Paste` on the terminator.

use std::time::Instant;

use vellum_tui::{Decoder, Event};

#[test]
fn paste_text_split_across_two_feeds_is_reassembled() {
    let mut decoder = Decoder::new();
    let now = Instant::now();

    let begin = decoder.feed(b"\x1b[200~hello ", now);
    assert!(begin.is_empty());

    let events = decoder.feed(b"world\x1b[201~", now);
    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], Event::Paste(s) if s == "hello world"));
}

#[test]
fn ordinary_keys_before_and_after_a_paste_still_decode() {
    let mut decoder = Decoder::new();
    let now = Instant::now();

    // "bc" rather than a lone "b" after the paste: a single trailing
    // character is held back by the decoder in case a combining mark
    // follows, so a second character is needed to force the first to flush
    // within this one `feed` call.
    let events = decoder.feed(b"a\x1b[200~pasted\x1b[201~bc", now);
    assert_eq!(events.len(), 3);
    assert!(matches!(&events[0], Event::Key(_)));
    assert!(matches!(&events[1], Event::Paste(s) if s == "pasted"));
    assert!(matches!(&events[2], Event::Key(_)));
}
