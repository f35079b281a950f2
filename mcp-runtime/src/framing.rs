use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// How a message was delimited on the wire. Replies reuse the request's framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// `Content-Length: N` headers, blank line, then N bytes of JSON.
    ContentLength,
    /// One JSON document per line.
    NewlineDelimited,
}

/// Upper bound on a `Content-Length` body. Larger frames are refused before allocating.
pub const MAX_MESSAGE_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("I/O error on MCP stream: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unexpected EOF while reading MCP headers")]
    UnexpectedEof,
    #[error("Invalid Content-Length header: {0}")]
    InvalidContentLength(String),
    #[error("Missing Content-Length header")]
    MissingContentLength,
    #[error("Content-Length {length} exceeds maximum message size {limit}")]
    MessageTooLarge { length: usize, limit: usize },
    #[error("Invalid JSON payload: {source}")]
    InvalidJson {
        framing: Framing,
        #[source]
        source: serde_json::Error,
    },
}

/// Read the next message. `Ok(None)` means clean EOF between messages.
///
/// Only [`FrameError::InvalidJson`] leaves the stream on a message boundary;
/// every other error means the session cannot continue.
pub async fn read_message<R>(reader: &mut R) -> Result<Option<(Value, Framing)>, FrameError>
where
    R: AsyncBufRead + Unpin,
{
    let mut content_length: Option<usize> = None;
    let mut saw_header = false;

    loop {
        let mut line = Vec::new();
        let bytes_read = reader.read_until(b'\n', &mut line).await?;
        if bytes_read == 0 {
            if !saw_header {
                return Ok(None);
            }
            return Err(FrameError::UnexpectedEof);
        }

        let trimmed = trim_line_end(&line);
        if !saw_header {
            let body = trimmed.trim_ascii_start();
            if body.is_empty() {
                continue;
            }
            if matches!(body.first(), Some(b'{' | b'[')) {
                let value = parse_payload(body, Framing::NewlineDelimited)?;
                return Ok(Some((value, Framing::NewlineDelimited)));
            }
        }

        if trimmed.is_empty() {
            break;
        }
        saw_header = true;

        let header = String::from_utf8_lossy(trimmed);
        let Some((name, raw_len)) = header.split_once(':') else {
            continue;
        };
        if name.trim().eq_ignore_ascii_case("content-length") {
            let raw_len = raw_len.trim();
            let parsed = raw_len
                .parse::<usize>()
                .map_err(|_| FrameError::InvalidContentLength(raw_len.to_string()))?;
            content_length = Some(parsed);
        }
    }

    let content_length = content_length.ok_or(FrameError::MissingContentLength)?;
    if content_length > MAX_MESSAGE_BYTES {
        return Err(FrameError::MessageTooLarge {
            length: content_length,
            limit: MAX_MESSAGE_BYTES,
        });
    }
    let mut payload = vec![0_u8; content_length];
    reader.read_exact(&mut payload).await?;

    let value = parse_payload(&payload, Framing::ContentLength)?;
    Ok(Some((value, Framing::ContentLength)))
}

fn trim_line_end(mut line: &[u8]) -> &[u8] {
    while let [rest @ .., b'\r' | b'\n'] = line {
        line = rest;
    }
    line
}

fn parse_payload(bytes: &[u8], framing: Framing) -> Result<Value, FrameError> {
    serde_json::from_slice(bytes).map_err(|source| FrameError::InvalidJson { framing, source })
}

pub async fn write_message<W>(
    writer: &mut W,
    value: &Value,
    framing: Framing,
) -> Result<(), FrameError>
where
    W: AsyncWrite + Unpin,
{
    let body = serde_json::to_vec(value).map_err(|source| FrameError::InvalidJson {
        framing,
        source,
    })?;
    match framing {
        Framing::ContentLength => {
            let header = format!(
                "Content-Length: {}\r\nContent-Type: application/json\r\n\r\n",
                body.len()
            );
            writer.write_all(header.as_bytes()).await?;
            writer.write_all(&body).await?;
        }
        Framing::NewlineDelimited => {
            writer.write_all(&body).await?;
            writer.write_all(b"\n").await?;
        }
    }
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn reads_content_length_frames() {
        let body = r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#;
        let raw = format!("Content-Length: {}\r\n\r\n{body}", body.len());
        let mut reader = raw.as_bytes();

        let (value, framing) = read_message(&mut reader).await.unwrap().unwrap();
        assert_eq!(framing, Framing::ContentLength);
        assert_eq!(value["method"], "ping");
        assert!(read_message(&mut reader).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn reads_newline_delimited_messages_and_skips_blank_lines() {
        let raw = "{\"id\":1}\n\n{\"id\":2}\n";
        let mut reader = raw.as_bytes();

        let (first, framing) = read_message(&mut reader).await.unwrap().unwrap();
        assert_eq!(framing, Framing::NewlineDelimited);
        assert_eq!(first["id"], 1);
        let (second, _) = read_message(&mut reader).await.unwrap().unwrap();
        assert_eq!(second["id"], 2);
        assert!(read_message(&mut reader).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn header_without_length_is_rejected() {
        let mut reader = "Content-Type: application/json\r\n\r\n{}".as_bytes();
        let err = read_message(&mut reader).await.unwrap_err();
        assert!(matches!(err, FrameError::MissingContentLength));
    }

    #[tokio::test]
    async fn eof_inside_headers_is_an_error() {
        let mut reader = "Content-Length: 10\r\n".as_bytes();
        let err = read_message(&mut reader).await.unwrap_err();
        assert!(matches!(err, FrameError::UnexpectedEof));
    }

    #[tokio::test]
    async fn bad_json_line_is_recoverable() {
        let mut reader = "{not json}\n{\"id\":3}\n".as_bytes();
        let err = read_message(&mut reader).await.unwrap_err();
        assert!(matches!(
            err,
            FrameError::InvalidJson { framing: Framing::NewlineDelimited, .. }
        ));
        let (next, _) = read_message(&mut reader).await.unwrap().unwrap();
        assert_eq!(next["id"], 3);
    }

    #[tokio::test]
    async fn invalid_utf8_line_is_a_json_error_not_io() {
        let mut reader: &[u8] = b"{\"id\":\xff}\n{\"id\":2}\n";
        let err = read_message(&mut reader).await.unwrap_err();
        assert!(matches!(
            err,
            FrameError::InvalidJson { framing: Framing::NewlineDelimited, .. }
        ));
        let (next, _) = read_message(&mut reader).await.unwrap().unwrap();
        assert_eq!(next["id"], 2);
    }

    #[tokio::test]
    async fn oversized_content_length_is_refused_before_reading_body() {
        let raw = format!("Content-Length: {}\r\n\r\n{{}}", usize::MAX);
        let mut reader = raw.as_bytes();
        let err = read_message(&mut reader).await.unwrap_err();
        assert!(matches!(
            err,
            FrameError::MessageTooLarge { length: usize::MAX, limit: MAX_MESSAGE_BYTES }
        ));

        let raw = format!("Content-Length: {}\r\n\r\n{{}}", MAX_MESSAGE_BYTES + 1);
        let mut reader = raw.as_bytes();
        let err = read_message(&mut reader).await.unwrap_err();
        assert!(matches!(err, FrameError::MessageTooLarge { .. }));
    }

    #[tokio::test]
    async fn invalid_utf8_header_line_is_ignored() {
        let mut reader: &[u8] = b"X-Note: \xff\r\nContent-Length: 2\r\n\r\n{}";
        let (value, framing) = read_message(&mut reader).await.unwrap().unwrap();
        assert_eq!(framing, Framing::ContentLength);
        assert_eq!(value, json!({}));
    }

    #[tokio::test]
    async fn writes_in_requested_framing() {
        let value = json!({ "ok": true });

        let mut framed = Vec::new();
        write_message(&mut framed, &value, Framing::ContentLength)
            .await
            .unwrap();
        let framed = String::from_utf8(framed).unwrap();
        assert!(framed.starts_with("Content-Length: 11\r\n"));
        assert!(framed.ends_with("\r\n\r\n{\"ok\":true}"));

        let mut lines = Vec::new();
        write_message(&mut lines, &value, Framing::NewlineDelimited)
            .await
            .unwrap();
        assert_eq!(String::from_utf8(lines).unwrap(), "{\"ok\":true}\n");
    }
}
