use thiserror::Error;

/// Upper bound on any single parsed field. Mirrors the fixed-size buffers
/// this kind of proxy traditionally uses: longer values are truncated,
/// never rejected.
const MAX_FIELD_BYTES: usize = 8 * 1024;

/// Reasons a request is dropped without any response to the client.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("malformed request line")]
    MalformedRequestLine,
    #[error("unsupported method '{0}'")]
    UnsupportedMethod(String),
    #[error("request carries no hostname")]
    MissingHost,
}

/// Normalized client request: the origin to contact and the path to ask for.
///
/// `port` is kept verbatim as the client supplied it. It is never validated
/// numerically; a port that does not resolve simply fails at connect time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRequest {
    pub hostname: String,
    pub port: String,
    pub path: String,
}

impl ParsedRequest {
    /// Cache key shared by explicit and defaulted ports: `<hostname>:<port><path>`.
    pub fn cache_key(&self) -> String {
        format!("{}:{}{}", self.hostname, self.port, self.path)
    }

    /// `Host:` value sent upstream. The default port stays implicit; the
    /// comparison is on the string, so a port of `080` is spelled out.
    pub fn host_value(&self) -> String {
        if self.port == "80" {
            self.hostname.clone()
        } else {
            format!("{}:{}", self.hostname, self.port)
        }
    }
}

/// Split a request line into its three tokens. Anything other than exactly
/// three whitespace-separated tokens is malformed.
pub fn split_request_line(line: &str) -> Result<(&str, &str, &str), RequestError> {
    let mut tokens = line.split_whitespace();
    match (tokens.next(), tokens.next(), tokens.next(), tokens.next()) {
        (Some(method), Some(target), Some(version), None) => Ok((method, target, version)),
        _ => Err(RequestError::MalformedRequestLine),
    }
}

/// Decompose a request target into hostname, port, and path.
///
/// Accepts absolute form (`http://host[:port]/path`, scheme optional and
/// matched case-insensitively) and origin form (`/path`). Origin-form
/// targets leave the hostname empty for the caller to fill from the `Host`
/// header. Defaults: port `80`, path `/`.
pub fn parse_target(target: &str) -> ParsedRequest {
    let mut parsed = ParsedRequest {
        hostname: String::new(),
        port: "80".to_string(),
        path: "/".to_string(),
    };

    let rest = strip_http_scheme(target);

    if rest.starts_with('/') {
        parsed.path = truncate_field(rest);
        return parsed;
    }

    let (host_port, path) = match rest.find('/') {
        Some(idx) => (&rest[..idx], &rest[idx..]),
        None => (rest, "/"),
    };
    parsed.path = truncate_field(path);

    match host_port.split_once(':') {
        Some((hostname, port)) => {
            parsed.hostname = truncate_field(hostname);
            parsed.port = truncate_field(port);
        }
        None => parsed.hostname = truncate_field(host_port),
    }

    parsed
}

/// Fill hostname (and port, when one is spelled out) from a raw `Host:`
/// header value. Callers only invoke this when the target itself carried no
/// hostname.
pub fn apply_host_fallback(parsed: &mut ParsedRequest, host_header: &str) {
    let trimmed = host_header.trim();
    if trimmed.is_empty() {
        return;
    }
    match trimmed.split_once(':') {
        Some((hostname, port)) => {
            parsed.hostname = truncate_field(hostname);
            parsed.port = truncate_field(port);
        }
        None => parsed.hostname = truncate_field(trimmed),
    }
}

fn strip_http_scheme(target: &str) -> &str {
    const SCHEME: &str = "http://";
    if target.len() >= SCHEME.len() && target[..SCHEME.len()].eq_ignore_ascii_case(SCHEME) {
        &target[SCHEME.len()..]
    } else {
        target
    }
}

fn truncate_field(value: &str) -> String {
    if value.len() <= MAX_FIELD_BYTES {
        return value.to_string();
    }
    let mut end = MAX_FIELD_BYTES;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    value[..end].to_string()
}
