use clap::Parser;

use phylograph::args::Args;
use phylograph::runner::Runner;

fn main() {
    let args = Args::parse();
    let runner = Runner::new(args).unwrap_or_else(|err| {
        eprintln!("Unable to initialize: {err}.");
        std::process::exit(1);
    });
    if let Err(err) = runner.start() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
