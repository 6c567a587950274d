use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

/// Read one `\n`-terminated line, returning the raw bytes including the
/// terminator. `Ok(None)` means EOF before any byte arrived; EOF in the
/// middle of a line yields the partial line. A line longer than `max_len`
/// is consumed in full but only its first `max_len` bytes are kept.
pub(super) async fn read_raw_line<S>(
    reader: &mut BufReader<S>,
    max_len: usize,
) -> Result<Option<Vec<u8>>>
where
    S: AsyncRead + Unpin,
{
    let mut collected = Vec::new();
    let mut truncated = false;

    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            if collected.is_empty() {
                return Ok(None);
            }
            return Ok(Some(collected));
        }

        let newline_pos = available.iter().position(|byte| *byte == b'\n');
        let consume = newline_pos.map(|idx| idx + 1).unwrap_or(available.len());

        if !truncated {
            let room = max_len.saturating_sub(collected.len());
            let keep = consume.min(room);
            collected.extend_from_slice(&available[..keep]);
            if keep < consume {
                truncated = true;
            }
        }
        reader.consume(consume);

        if newline_pos.is_some() {
            return Ok(Some(collected));
        }
    }
}
