use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use serde_json::Value as Json;
use tracing::Level;
use value_path::{from_json, PathError};

/// Look up a value in a JSON document by path expression.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON document (string). You can also pipe a file using shell quoting.
    json: String,
    /// Path expression, e.g. `a.b[2]` or `Map["42.5"]`
    path: String,
    /// Fallback JSON printed when the last key is not found
    #[arg(long)]
    default: Option<String>,
    /// Exit with status 2 when the last key is not found
    #[arg(long)]
    strict: bool,
    /// Print `{"value": ..., "found": ...}` instead of the bare value
    #[arg(long)]
    found: bool,
    /// Log resolution steps to stderr (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Serialize)]
struct Output {
    value: Json,
    found: bool,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let data: Json = match serde_json::from_str(&args.json) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Invalid JSON: {e}");
            return ExitCode::FAILURE;
        }
    };

    let (mut value, found) = match from_json(data, &args.path) {
        Ok(out) => out,
        Err(PathError::Syntax(e)) => {
            eprintln!("Invalid path {:?} at {e}", args.path);
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(path = %args.path, found, "resolved");

    if !found {
        if let Some(def) = args.default.as_deref() {
            value = serde_json::from_str(def).unwrap_or_else(|_| Json::String(def.to_string()));
        }
    }

    let rendered = if args.found {
        serde_json::to_string_pretty(&Output { value, found })
    } else {
        serde_json::to_string_pretty(&value)
    };
    match rendered {
        Ok(s) => println!("{s}"),
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    }

    if args.strict && !found {
        return ExitCode::from(2);
    }
    ExitCode::SUCCESS
}
