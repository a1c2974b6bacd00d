#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

/// Text mixing one, two, three and four byte UTF-8 sequences.
pub fn multibyte_fixture() -> &'static str {
    return "Fever 38.5°C, naïve dosage: 5 µg → 10 µg. 発熱 😷 done.";
}

/// Splits `bytes` into chunks of at most `size` bytes, ignoring character
/// boundaries the way a network transport would.
pub fn split_bytes(bytes: &[u8], size: usize) -> Vec<Vec<u8>> {
    return bytes
        .chunks(size.max(1))
        .map(|chunk| return chunk.to_vec())
        .collect();
}

pub fn ocr_response_fixture() -> &'static str {
    return r#"{"filename": "scan.png", "text": "Patient: Jane Doe\nBlood pressure: 120/80"}"#;
}
