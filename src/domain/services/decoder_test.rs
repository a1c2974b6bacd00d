use test_utils::multibyte_fixture;
use test_utils::split_bytes;

use super::Utf8Decoder;

#[test]
fn it_decodes_ascii() {
    let mut decoder = Utf8Decoder::default();
    assert_eq!(decoder.decode(b"Hi"), "Hi");
    assert_eq!(decoder.decode(b" there"), " there");
    assert_eq!(decoder.flush(), "");
}

#[test]
fn it_decodes_empty_chunks() {
    let mut decoder = Utf8Decoder::default();
    assert_eq!(decoder.decode(b""), "");
    assert_eq!(decoder.flush(), "");
}

#[test]
fn it_holds_back_split_characters() {
    let bytes = "°C".as_bytes();
    let mut decoder = Utf8Decoder::default();

    assert_eq!(decoder.decode(&bytes[..1]), "");
    assert_eq!(decoder.decode(&bytes[1..]), "°C");
}

#[test]
fn it_reassembles_four_byte_characters_over_many_chunks() {
    let bytes = "😷".as_bytes();
    let mut decoder = Utf8Decoder::default();

    assert_eq!(decoder.decode(&bytes[..1]), "");
    assert_eq!(decoder.decode(&bytes[1..2]), "");
    assert_eq!(decoder.decode(&bytes[2..3]), "");
    assert_eq!(decoder.decode(&bytes[3..]), "😷");
    assert_eq!(decoder.flush(), "");
}

#[test]
fn it_reconstructs_text_split_at_every_offset() {
    let text = multibyte_fixture();
    let bytes = text.as_bytes();

    for offset in 0..=bytes.len() {
        let mut decoder = Utf8Decoder::default();
        let (first, second) = bytes.split_at(offset);

        let mut res = decoder.decode(first);
        res += &decoder.decode(second);
        res += &decoder.flush();

        assert_eq!(res, text, "split at byte {offset}");
    }
}

#[test]
fn it_reconstructs_text_from_small_chunks() {
    let text = multibyte_fixture();

    for size in 1..6 {
        let mut decoder = Utf8Decoder::default();
        let mut res = String::new();
        for chunk in split_bytes(text.as_bytes(), size) {
            res += &decoder.decode(&chunk);
        }
        res += &decoder.flush();

        assert_eq!(res, text, "chunk size {size}");
    }
}

#[test]
fn it_replaces_invalid_bytes_and_continues() {
    let mut decoder = Utf8Decoder::default();
    assert_eq!(decoder.decode(b"ok \xFF then"), "ok \u{FFFD} then");
}

#[test]
fn it_flushes_truncated_characters_as_replacement() {
    let bytes = "→".as_bytes();
    let mut decoder = Utf8Decoder::default();

    assert_eq!(decoder.decode(&bytes[..2]), "");
    assert_eq!(decoder.flush(), "\u{FFFD}");
    assert_eq!(decoder.flush(), "");
}
