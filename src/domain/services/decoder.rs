#[cfg(test)]
#[path = "decoder_test.rs"]
mod tests;

use std::mem;
use std::str;

/// Incremental UTF-8 decoder for an unframed byte stream.
///
/// Bytes of a character split across two chunks are held back until the next
/// call completes them. Invalid sequences decode to U+FFFD and decoding carries
/// on, so neither method can fail. Use one decoder per stream.
#[derive(Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        let mut bytes = mem::take(&mut self.pending);
        bytes.extend_from_slice(chunk);

        let mut text = String::with_capacity(bytes.len());
        let mut rest = bytes.as_slice();

        loop {
            match str::from_utf8(rest) {
                Ok(valid) => {
                    text.push_str(valid);
                    break;
                }
                Err(err) => {
                    let (valid, invalid) = rest.split_at(err.valid_up_to());
                    text.push_str(&String::from_utf8_lossy(valid));

                    match err.error_len() {
                        Some(len) => {
                            text.push(char::REPLACEMENT_CHARACTER);
                            rest = &invalid[len..];
                        }
                        None => {
                            // Truncated character at the end of the chunk.
                            self.pending = invalid.to_vec();
                            break;
                        }
                    }
                }
            }
        }

        return text;
    }

    /// Drains bytes still held back once the stream has ended.
    pub fn flush(&mut self) -> String {
        if self.pending.is_empty() {
            return "".to_string();
        }

        let pending = mem::take(&mut self.pending);
        return String::from_utf8_lossy(&pending).to_string();
    }
}
