#[cfg(test)]
#[path = "stream_consumer_test.rs"]
mod tests;

use futures::stream;
use futures::stream::BoxStream;
use futures::StreamExt;

use super::Utf8Decoder;
use crate::domain::models::ByteStream;
use crate::domain::models::ChatError;

struct Consumer {
    source: ByteStream,
    decoder: Utf8Decoder,
    text: String,
    done: bool,
}

async fn next_text(mut consumer: Consumer) -> Option<(Result<String, ChatError>, Consumer)> {
    while !consumer.done {
        match consumer.source.next().await {
            Some(Ok(chunk)) => {
                let decoded = consumer.decoder.decode(&chunk);
                if decoded.is_empty() {
                    continue;
                }

                consumer.text.push_str(&decoded);
                let text = consumer.text.clone();
                return Some((Ok(text), consumer));
            }
            Some(Err(err)) => {
                consumer.done = true;
                return Some((Err(err), consumer));
            }
            None => {
                consumer.done = true;
                let tail = consumer.decoder.flush();
                if !tail.is_empty() {
                    consumer.text.push_str(&tail);
                    let text = consumer.text.clone();
                    return Some((Ok(text), consumer));
                }
            }
        }
    }

    return None;
}

/// Reads `source` to the end and yields the cumulative decoded text after
/// every chunk that produced characters. A chunk that only carries part of a
/// multi-byte character, or no bytes at all, yields nothing; the text it
/// contributes shows up with the next chunk or the final flush.
///
/// A failed read is yielded as an `Err` and ends the sequence, so callers can
/// tell a truncated reply apart from one that finished normally.
pub fn consume(source: ByteStream) -> BoxStream<'static, Result<String, ChatError>> {
    let consumer = Consumer {
        source,
        decoder: Utf8Decoder::default(),
        text: String::new(),
        done: false,
    };

    return stream::unfold(consumer, |consumer| return next_text(consumer)).boxed();
}
