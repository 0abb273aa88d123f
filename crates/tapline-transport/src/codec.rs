// SPDX-FileCopyrightText: 2026 Tapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Payload framing shared by the file and TCP transports.
//!
//! Every payload is followed by [`PAYLOAD_SEPARATOR`]. The separator both
//! starts and ends with `\n`, so a reader can scan line by line and check
//! for it whenever a line completes.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Marks the end of one payload in a stream.
pub const PAYLOAD_SEPARATOR: &[u8] = "\n🐵🙈🙉\n".as_bytes();

/// Append the separator to `payload`.
pub fn encode(payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(payload.len() + PAYLOAD_SEPARATOR.len());
    frame.extend_from_slice(payload);
    frame.extend_from_slice(PAYLOAD_SEPARATOR);
    frame
}

/// Read one payload.
///
/// Returns `Ok(None)` at a clean end of stream. Trailing bytes with no
/// separator before EOF are returned as a final payload.
pub async fn read_frame<R>(reader: &mut R) -> std::io::Result<Option<Vec<u8>>>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    loop {
        let n = reader.read_until(b'\n', &mut buf).await?;
        if n == 0 {
            return Ok((!buf.is_empty()).then_some(buf));
        }
        if buf.ends_with(PAYLOAD_SEPARATOR) {
            buf.truncate(buf.len() - PAYLOAD_SEPARATOR.len());
            return Ok(Some(buf));
        }
    }
}
