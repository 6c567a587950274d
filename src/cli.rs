use clap::Parser;

/// The proxy takes a single positional listening port; anything more (or
/// less) is a usage error reported on stderr.
#[derive(Debug, Clone, Parser)]
#[command(name = "cachepipe", about = "Concurrent caching HTTP/1.0 forward proxy")]
pub struct Cli {
    /// TCP port to listen on.
    pub port: u16,
}
