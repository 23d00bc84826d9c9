//! category-graph: operator command line over category-graph-core.
//!
//! Every invocation opens the JSON data file, runs one command against a
//! fresh snapshot and prints a JSON result on stdout. Failures print a JSON
//! error object and exit non-zero. A duplicate similarity is not a failure:
//! it is reported with `"status": "duplicate"`.

use clap::Parser;
use serde_json::Value;

mod category;
mod config;
mod error;
mod rabbit_hole;
mod similarity;
mod status;
mod store;
mod tree;
mod util;

use config::{CliArgs, Command};
use error::CliError;
use store::JsonFileStore;

fn main() {
    let args = CliArgs::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(util::env_filter(&args.log_level))
        .init();

    let pretty = args.pretty;
    match run(args) {
        Ok(Output::Json(value)) => print_json(&value, pretty),
        Ok(Output::Text(text)) => println!("{}", text),
        Err(e) => {
            tracing::error!(code = e.code(), "{}", e);
            print_json(&e.to_json_error(), pretty);
            std::process::exit(e.exit_code());
        }
    }
}

enum Output {
    Json(Value),
    Text(String),
}

fn run(args: CliArgs) -> Result<Output, CliError> {
    let mut store = JsonFileStore::open(&args.data)?;

    let value = match args.command {
        Command::Tree { id, kind } => tree::run(&store, id, &kind)?,
        Command::Similar(cmd) => similarity::run(&mut store, &cmd)?,
        Command::Category(cmd) => category::run(&mut store, cmd)?,
        Command::RabbitHole { text } => {
            let report = rabbit_hole::run(&store)?;
            if text {
                return Ok(Output::Text(rabbit_hole::to_text(&report)));
            }
            rabbit_hole::to_json(&report)?
        }
        Command::Status => status::run(&store)?,
    };

    Ok(Output::Json(value))
}

fn print_json(value: &Value, pretty: bool) {
    match util::render_json(value, pretty) {
        Ok(out) => println!("{}", out),
        Err(e) => {
            eprintln!("category-graph: {}", e);
            std::process::exit(1);
        }
    }
}
