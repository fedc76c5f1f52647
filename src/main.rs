use anyhow::Result;
use clap::Parser;
use serp_pixel::cli::{self, Cli};

fn main() -> Result<()> {
    let args = Cli::parse();
    cli::init_logging(args.log_level);

    let code = cli::execute(args)?;
    if code != 0 {
        // Nothing is left to drop here, so exiting directly is safe
        std::process::exit(code);
    }
    Ok(())
}
