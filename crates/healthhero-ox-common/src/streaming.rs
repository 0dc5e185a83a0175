use crate::error::CommonRequestError;
use futures_util::{Stream, StreamExt};

/// The line marker that distinguishes data frames from everything else.
const DATA_PREFIX: &str = "data: ";

/// Incremental parser for server-sent streaming responses.
///
/// Raw bytes are buffered across network chunks and split on `\n`, so a
/// multi-byte UTF-8 character straddling a chunk boundary decodes correctly
/// once the rest of it arrives. Only lines starting with `data: ` are frames;
/// blank lines, comments and unknown fields are ignored. A trailing line
/// without a terminating newline is flushed when the transport closes.
pub struct SseParser {
    byte_stream: std::pin::Pin<
        Box<dyn Stream<Item = Result<bytes::Bytes, reqwest::Error>> + Send>,
    >,
    buffer: Vec<u8>,
}

impl SseParser {
    pub fn new(response: reqwest::Response) -> Self {
        Self::from_stream(response.bytes_stream())
    }

    /// Build a parser over any byte stream, mainly for tests
    pub fn from_stream(
        stream: impl Stream<Item = Result<bytes::Bytes, reqwest::Error>> + Send + 'static,
    ) -> Self {
        Self {
            byte_stream: Box::pin(stream),
            buffer: Vec::new(),
        }
    }

    /// Get the payload of the next data frame, or `None` at end of stream
    pub async fn next_frame(&mut self) -> Result<Option<String>, CommonRequestError> {
        loop {
            if let Some(payload) = self.take_frame_from_buffer()? {
                return Ok(Some(payload));
            }

            // Need more bytes before another complete line can exist
            if let Some(chunk_result) = self.byte_stream.next().await {
                let chunk = chunk_result?;
                self.buffer.extend_from_slice(&chunk);
            } else {
                return self.flush_final_frame();
            }
        }
    }

    /// Pop complete lines off the buffer until one of them is a data frame
    fn take_frame_from_buffer(&mut self) -> Result<Option<String>, CommonRequestError> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line_bytes = self.buffer.drain(..=pos).collect::<Vec<u8>>();
            let line = String::from_utf8(line_bytes)?;

            if let Some(payload) = frame_payload(&line) {
                return Ok(Some(payload.to_string()));
            }
        }

        Ok(None)
    }

    /// Stream ended: treat whatever is left as one unterminated line
    fn flush_final_frame(&mut self) -> Result<Option<String>, CommonRequestError> {
        if self.buffer.is_empty() {
            return Ok(None);
        }

        let line = String::from_utf8(std::mem::take(&mut self.buffer))?;
        Ok(frame_payload(&line).map(str::to_string))
    }
}

/// Return the payload of a data-frame line, or `None` for any other line
fn frame_payload(line: &str) -> Option<&str> {
    let line = line.trim_end_matches(['\r', '\n']);
    line.strip_prefix(DATA_PREFIX)
}
