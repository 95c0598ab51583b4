//! `vxsearch <store> <query> [k]`

use clap::Parser;
use std::process::ExitCode;
use vxsearch_cli::{CliArgs, VxsearchConfig, init_logging, run};

fn main() -> ExitCode {
    // Usage errors exit with status 2 inside `parse`.
    let args = CliArgs::parse();
    init_logging(args.verbose, args.quiet);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("vxsearch: failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match VxsearchConfig::load(args.config.as_deref()) {
        Ok(config) => runtime.block_on(run(&args, &config)),
        Err(e) => Err(e),
    };

    match result {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("vxsearch: {e}");
            ExitCode::FAILURE
        }
    }
}
