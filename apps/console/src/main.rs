//! Stockroom console entry point.

use std::process::ExitCode;

use clap::Parser;
use stockroom_console::Args;

#[tokio::main]
async fn main() -> ExitCode {
    match stockroom_console::run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("stockroom: {err}");
            ExitCode::FAILURE
        }
    }
}
