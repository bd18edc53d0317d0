use dropup_core::logging;

mod cli;

use clap::Parser;

use crate::cli::Cli;

fn main() {
    // Parse first so --help/--version work before any logging noise.
    let args = Cli::parse();
    logging::init_logging(args.log_directive());

    match cli::run(&args) {
        Ok(remote_path) => {
            println!("{remote_path}");
        }
        Err(err) => {
            eprintln!("dropup error: {err:#}");
            std::process::exit(err.exit_code());
        }
    }
}
