//! Line framing for the stdio transport.
//!
//! One frame is one `\n`-terminated line. Bytes are returned raw; UTF-8 and
//! JSON decoding belong to the caller so a bad frame only fails that frame.

use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Outcome of reading one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A complete line without its terminator (a trailing `\r` is kept).
    Line(Vec<u8>),
    /// A line longer than the cap. Its bytes were consumed and discarded.
    Oversized(usize),
    /// Clean end of input.
    Eof,
}

/// Read one frame from the stream.
///
/// At most `max_line_bytes` of a line are ever buffered. A final line with no
/// terminator is still returned as a frame before `Eof`.
pub async fn read_frame<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    max_line_bytes: usize,
) -> io::Result<Frame> {
    let mut line = Vec::new();
    let mut seen = 0usize;
    let mut started = false;

    loop {
        let (used, terminated) = {
            let available = reader.fill_buf().await?;
            if available.is_empty() {
                if !started {
                    return Ok(Frame::Eof);
                }
                break;
            }

            let (chunk, used, terminated) = match available.iter().position(|b| *b == b'\n') {
                Some(i) => (&available[..i], i + 1, true),
                None => (available, available.len(), false),
            };
            seen += chunk.len();
            if seen <= max_line_bytes {
                line.extend_from_slice(chunk);
            } else if !line.is_empty() {
                line = Vec::new();
            }
            (used, terminated)
        };
        reader.consume(used);
        started = true;

        if terminated {
            break;
        }
    }

    if seen > max_line_bytes {
        Ok(Frame::Oversized(seen))
    } else {
        Ok(Frame::Line(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    async fn frames(input: &[u8], max: usize) -> Vec<Frame> {
        let mut reader = Cursor::new(input.to_vec());
        let mut out = Vec::new();
        loop {
            let frame = read_frame(&mut reader, max).await.unwrap();
            if frame == Frame::Eof {
                break;
            }
            out.push(frame);
        }
        out
    }

    #[tokio::test]
    async fn test_splits_on_newline() {
        let got = frames(b"one\ntwo\n", 64).await;
        assert_eq!(
            got,
            vec![Frame::Line(b"one".to_vec()), Frame::Line(b"two".to_vec())]
        );
    }

    #[tokio::test]
    async fn test_unterminated_tail_is_a_frame() {
        let got = frames(b"one\ntail", 64).await;
        assert_eq!(got[1], Frame::Line(b"tail".to_vec()));
    }

    #[tokio::test]
    async fn test_blank_line_is_empty_frame() {
        let got = frames(b"\nx\n", 64).await;
        assert_eq!(got, vec![Frame::Line(vec![]), Frame::Line(b"x".to_vec())]);
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_returned_raw() {
        let got = frames(b"\xff\xfe garbage\n", 64).await;
        assert_eq!(got, vec![Frame::Line(b"\xff\xfe garbage".to_vec())]);
    }

    #[tokio::test]
    async fn test_oversized_line_is_skipped() {
        let long = vec![b'a'; 100];
        let mut input = long.clone();
        input.extend_from_slice(b"\nok\n");

        let got = frames(&input, 16).await;
        assert_eq!(got, vec![Frame::Oversized(100), Frame::Line(b"ok".to_vec())]);
    }

    #[tokio::test]
    async fn test_oversized_across_small_reads() {
        let mut input = vec![b'x'; 40];
        input.extend_from_slice(b"\nok\n");
        let mut reader = tokio::io::BufReader::with_capacity(8, Cursor::new(input));

        assert_eq!(read_frame(&mut reader, 16).await.unwrap(), Frame::Oversized(40));
        assert_eq!(
            read_frame(&mut reader, 16).await.unwrap(),
            Frame::Line(b"ok".to_vec())
        );
        assert_eq!(read_frame(&mut reader, 16).await.unwrap(), Frame::Eof);
    }
}
