/// Accumulates the client's header block for pass-through, dropping the
/// headers the proxy synthesizes itself and capturing the raw `Host:` value
/// separately as a fallback hostname source.
#[derive(Debug)]
pub(crate) struct HeaderFilter {
    extra: Vec<u8>,
    host: Option<String>,
    max_bytes: usize,
}

const DROPPED_PREFIXES: [&str; 3] = ["User-Agent:", "Connection:", "Proxy-Connection:"];

impl HeaderFilter {
    pub fn new(max_bytes: usize) -> Self {
        Self {
            extra: Vec::new(),
            host: None,
            max_bytes,
        }
    }

    /// Feed one raw header line, terminator included. Returns `false` once
    /// the blank line closing the header block was seen.
    ///
    /// Pass-through lines are kept verbatim, in arrival order. A line that
    /// would overflow the block cap is dropped; later lines that still fit
    /// are kept.
    pub fn push_line(&mut self, line: &[u8]) -> bool {
        if line == b"\r\n" {
            return false;
        }

        if let Some(value) = strip_prefix_icase(line, "Host:") {
            self.host = Some(String::from_utf8_lossy(value).into_owned());
            return true;
        }
        for prefix in DROPPED_PREFIXES {
            if strip_prefix_icase(line, prefix).is_some() {
                return true;
            }
        }

        if self.extra.len() + line.len() < self.max_bytes {
            self.extra.extend_from_slice(line);
        }
        true
    }

    /// Raw `Host:` value as received, whitespace and terminator included.
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn extra_headers(&self) -> &[u8] {
        &self.extra
    }
}

fn strip_prefix_icase<'a>(line: &'a [u8], prefix: &str) -> Option<&'a [u8]> {
    let prefix = prefix.as_bytes();
    if line.len() >= prefix.len() && line[..prefix.len()].eq_ignore_ascii_case(prefix) {
        Some(&line[prefix.len()..])
    } else {
        None
    }
}
