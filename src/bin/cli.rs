//! refmap CLI - map cross-file references in a repository.

use clap::Parser;
use refmap::cli::{init_logging, run, Cli};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
