mod headers;
mod line;
mod request;

pub(crate) use headers::HeaderFilter;
pub(crate) use request::{RequestHead, read_request_head};
