use anyhow::Result;
use clap::Parser;

use cachepipe::{cli::Cli, logging, run, settings::Settings};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // Usage errors exit with status 1; --help and --version keep
        // clap's normal behavior.
        Err(err) if err.use_stderr() => {
            let _ = err.print();
            std::process::exit(1);
        }
        Err(err) => err.exit(),
    };
    let settings = Settings::new(cli.port);
    logging::init_logger()?;
    run(settings).await
}
