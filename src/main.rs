#![forbid(unsafe_code)]

use std::io::Write;
use std::path::Path;
use std::process::exit;

use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: mapslice [--pretty] <file>\n\
    Converts a YAML file to JSON, or a .json file to YAML, keeping key order.\n\
    The result is written to stdout. --pretty indents the JSON output.\n\
    Set RUST_LOG=debug for conversion logs.";

struct Args {
    path: String,
    pretty: bool,
}

/// Parse the command line. `Ok(None)` means help was printed.
fn parse_args(args: impl Iterator<Item = String>) -> Result<Option<Args>, String> {
    let mut path = None;
    let mut pretty = false;
    for arg in args {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--pretty" => pretty = true,
            opt if opt.starts_with('-') && opt.len() > 1 => {
                return Err(format!("Unknown option: {opt}"));
            }
            _ if path.is_some() => return Err(format!("Unexpected extra argument: {arg}")),
            _ => path = Some(arg),
        }
    }
    match path {
        Some(path) => Ok(Some(Args { path, pretty })),
        None => Err(USAGE.to_owned()),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn is_json_path(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some("json")
}

/// Convert the given file and print the result. Exit codes: 1 usage, 2 read
/// failure, 3 conversion failure.
fn main() {
    init_tracing();

    let Args { path, pretty } = match parse_args(std::env::args().skip(1)) {
        Ok(Some(args)) => args,
        Ok(None) => {
            println!("{USAGE}");
            return;
        }
        Err(msg) => {
            eprintln!("{msg}");
            exit(1);
        }
    };

    let content = match std::fs::read(&path) {
        Ok(content) => content,
        Err(err) => {
            eprintln!("Failed to read {path}: {err}");
            exit(2);
        }
    };

    let converted = if is_json_path(Path::new(&path)) {
        mapslice::json_to_yaml(&content).map(String::into_bytes)
    } else {
        mapslice::yaml_to_document(&content)
            .and_then(|doc| if pretty { doc.to_json_pretty() } else { doc.to_json() })
            .map(|mut json| {
                json.push(b'\n');
                json
            })
    };

    match converted {
        Ok(out) => {
            if let Err(err) = std::io::stdout().write_all(&out) {
                eprintln!("Failed to write output: {err}");
                exit(3);
            }
        }
        Err(err) => {
            eprintln!("{path} invalid:\n{err}");
            exit(3);
        }
    }
}
