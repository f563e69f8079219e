use crate::error::RelayError;

/// Incremental UTF-8 decoder for a chunked byte stream.
///
/// The transport delivers bytes with no regard for code point boundaries, so
/// a multi-byte scalar may be split across chunks. `push` yields the longest
/// valid prefix of what has arrived and keeps the incomplete tail (at most
/// three bytes) for the next chunk. A sequence that can never become valid
/// is an error, as is a stream that ends mid code point.
#[derive(Debug, Default)]
pub struct Utf8Buffer {
    pending: Vec<u8>,
}

impl Utf8Buffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes the next chunk, returning the text that became available.
    ///
    /// An empty string means the chunk only extended an incomplete code
    /// point; more bytes are needed.
    pub fn push(&mut self, bytes: &[u8]) -> Result<String, RelayError> {
        self.pending.extend_from_slice(bytes);

        match std::str::from_utf8(&self.pending) {
            Ok(text) => {
                let text = text.to_string();
                self.pending.clear();
                Ok(text)
            }
            Err(e) => {
                if e.error_len().is_some() {
                    return Err(RelayError::Decode(e.to_string()));
                }
                // Incomplete tail: decode up to it, carry the rest over.
                let valid = e.valid_up_to();
                let text = String::from_utf8_lossy(&self.pending[..valid]).into_owned();
                self.pending.drain(..valid);
                Ok(text)
            }
        }
    }

    /// Checks that no partial code point is left once the stream ends.
    pub fn finish(&mut self) -> Result<(), RelayError> {
        if self.pending.is_empty() {
            Ok(())
        } else {
            Err(RelayError::Decode(
                "stream ended inside a multi-byte character".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_passes_through() {
        let mut buffer = Utf8Buffer::new();
        assert_eq!(buffer.push(b"Hello, world").unwrap(), "Hello, world");
        assert!(buffer.finish().is_ok());
    }

    #[test]
    fn scalar_split_across_chunks_is_reassembled() {
        // "日" is e6 97 a5.
        let mut buffer = Utf8Buffer::new();
        assert_eq!(buffer.push(&[0xe6]).unwrap(), "");
        assert_eq!(buffer.push(&[0x97]).unwrap(), "");
        assert_eq!(buffer.push(&[0xa5, b'!']).unwrap(), "日!");
        assert!(buffer.finish().is_ok());
    }

    #[test]
    fn valid_prefix_is_yielded_before_the_split() {
        let mut buffer = Utf8Buffer::new();
        let mut bytes = b"abc".to_vec();
        bytes.push(0xe6);
        assert_eq!(buffer.push(&bytes).unwrap(), "abc");
        assert_eq!(buffer.push(&[0x97, 0xa5]).unwrap(), "日");
    }

    #[test]
    fn invalid_sequence_is_an_error() {
        let mut buffer = Utf8Buffer::new();
        assert!(buffer.push(&[b'a', 0xff, b'b']).is_err());
    }

    #[test]
    fn truncated_tail_fails_at_finish() {
        let mut buffer = Utf8Buffer::new();
        assert_eq!(buffer.push(&[0xe6, 0x97]).unwrap(), "");
        assert!(buffer.finish().is_err());
    }
}
