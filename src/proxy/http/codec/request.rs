use anyhow::Result;
use tokio::io::{AsyncRead, BufReader};

use crate::proxy::request::{RequestError, split_request_line};

use super::headers::HeaderFilter;
use super::line::read_raw_line;

#[derive(Debug)]
pub(crate) struct RequestHead {
    pub target: String,
    pub headers: HeaderFilter,
}

/// Read and validate one request head: the request line plus the header
/// block. `Ok(None)` means the client closed before sending anything.
///
/// Only GET is served (matched case-insensitively); the version token is
/// accepted verbatim and never inspected. EOF before the blank line simply
/// ends the header block.
pub(crate) async fn read_request_head<S>(
    reader: &mut BufReader<S>,
    max_line_bytes: usize,
    max_header_bytes: usize,
) -> Result<Option<RequestHead>>
where
    S: AsyncRead + Unpin,
{
    let Some(raw_line) = read_raw_line(reader, max_line_bytes).await? else {
        return Ok(None);
    };
    let request_line = String::from_utf8_lossy(&raw_line);
    let (method, target, _version) =
        split_request_line(request_line.trim_end_matches(['\r', '\n']))?;
    if !method.eq_ignore_ascii_case("GET") {
        return Err(RequestError::UnsupportedMethod(method.to_string()).into());
    }
    let target = target.to_string();

    let mut headers = HeaderFilter::new(max_header_bytes);
    loop {
        let Some(raw) = read_raw_line(reader, max_line_bytes).await? else {
            break;
        };
        if !headers.push_line(&raw) {
            break;
        }
    }

    Ok(Some(RequestHead { target, headers }))
}
