//! Command-line interface for thrift-idl
//!
//! Usage:
//!   thrift-idl process `<path>` `<format>`   - Process an IDL file and print the result
//!   thrift-idl `<path>` `<format>`           - Same as process
//!   thrift-idl write `<json-path>`           - Render an AST JSON file as canonical IDL
//!   thrift-idl scan `<dir>` [-o `<out>`] [--pretty] - Validate every .thrift file under a directory
//!   thrift-idl formats                     - List all available formats

use clap::{Arg, ArgAction, ArgMatches, Command};
use log::{debug, error, info, LevelFilter};
use miette::{GraphicalReportHandler, NamedSource, Report};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::str::FromStr;
use thrift_idl::thrift::processor::{
    available_formats, process_source, scan, ProcessingError, ProcessingSpec, ScanFailure,
    ScanOptions,
};
use thrift_idl::{initialize, IdlError};

fn main() {
    let matches = Command::new("thrift-idl")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Parse, inspect and canonically format Thrift IDL files")
        .subcommand_required(false)
        .arg_required_else_help(true)
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .default_value("warn")
                .help("Log level: off, error, warn, info, debug or trace"),
        )
        .arg(
            Arg::new("path")
                .help("Path to the Thrift file to process")
                .index(1),
        )
        .arg(
            Arg::new("format")
                .help("Output format (e.g., ast-json, idl-canonical)")
                .index(2),
        )
        .subcommand(
            Command::new("process")
                .about("Process a file and output to stdout (default command)")
                .arg(
                    Arg::new("path")
                        .help("Path to the Thrift file to process")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .help("Output format (e.g., ast-json, idl-canonical)")
                        .required(true)
                        .index(2),
                ),
        )
        .subcommand(
            Command::new("write")
                .about("Render an AST JSON file as canonical Thrift IDL")
                .arg(
                    Arg::new("path")
                        .help("Path to the AST JSON file")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("scan")
                .about("Validate every .thrift file under a directory")
                .arg(
                    Arg::new("path")
                        .help("A .thrift file or a directory to search")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Directory for one JSON AST per input file"),
                )
                .arg(
                    Arg::new("pretty")
                        .long("pretty")
                        .action(ArgAction::SetTrue)
                        .help("Indent the JSON written with --output"),
                ),
        )
        .subcommand(Command::new("formats").about("List all available output formats"))
        .get_matches();

    init_logging(&matches);

    let result = match matches.subcommand() {
        Some(("process", process_matches)) => {
            let (path, format) = path_and_format(process_matches);
            handle_process_command(path, format)
        }
        Some(("write", write_matches)) => match write_matches.get_one::<String>("path") {
            Some(path) => handle_write_command(path),
            None => Err(String::from("missing JSON path")),
        },
        Some(("scan", scan_matches)) => {
            let path = scan_matches
                .get_one::<String>("path")
                .map_or("", String::as_str);
            let options = ScanOptions {
                output: scan_matches.get_one::<String>("output").map(PathBuf::from),
                pretty: scan_matches.get_flag("pretty"),
            };
            handle_scan_command(path, &options)
        }
        Some(("formats", _)) => {
            handle_formats_command();
            Ok(())
        }
        _ => {
            let (path, format) = path_and_format(&matches);
            handle_process_command(path, format)
        }
    };

    if let Err(report) = result {
        error!("Command failed");
        eprintln!("{report}");
        process::exit(1);
    }
    info!("Completed successfully");
}

fn init_logging(matches: &ArgMatches) {
    let requested = matches
        .get_one::<String>("log-level")
        .map_or("warn", String::as_str);
    let log_level = LevelFilter::from_str(requested).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {requested}. Using 'warn' instead.");
        LevelFilter::Warn
    });
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();
    debug!(log_level:?; "Logger initialised");
}

fn path_and_format(matches: &ArgMatches) -> (&str, &str) {
    let path = matches.get_one::<String>("path").map_or("", String::as_str);
    let format = matches.get_one::<String>("format").map_or("", String::as_str);
    (path, format)
}

/// Handle the process command
fn handle_process_command(path: &str, format_str: &str) -> Result<(), String> {
    let spec = ProcessingSpec::from_string(format_str).map_err(|err| {
        format!(
            "{err}\nAvailable formats: {}",
            available_formats().join(", ")
        )
    })?;
    let source = read(path)?;
    initialize().map_err(|err| render(err, path, &source))?;
    match process_source(&source, &spec) {
        Ok(output) => {
            print!("{output}");
            Ok(())
        }
        Err(ProcessingError::Idl(err)) => Err(render(err, path, &source)),
        Err(err) => Err(err.to_string()),
    }
}

/// Handle the write command
fn handle_write_command(path: &str) -> Result<(), String> {
    let json = read(path)?;
    let engine = initialize().map_err(|err| render(err, path, &json))?;
    let output = engine
        .write_json(&json)
        .map_err(|err| render(err, path, &json))?;
    print!("{output}");
    Ok(())
}

/// Handle the scan command; any failed file fails the command
fn handle_scan_command(path: &str, options: &ScanOptions) -> Result<(), String> {
    initialize().map_err(|err| err.to_string())?;
    let report = scan(Path::new(path), options).map_err(|err| err.to_string())?;
    if report.total() == 0 {
        println!("No Thrift files found in {path}");
        return Ok(());
    }

    for failure in &report.failures {
        eprintln!("{}", render_failure(failure));
    }
    println!(
        "Scanned {} files: {} succeeded, {} failed",
        report.total(),
        report.succeeded.len(),
        report.failures.len()
    );
    if let Some(output) = &options.output {
        println!("Wrote {} JSON files to {}", report.written.len(), output.display());
    }

    if report.failures.is_empty() {
        Ok(())
    } else {
        Err(format!("{} of {} files failed", report.failures.len(), report.total()))
    }
}

fn render_failure(failure: &ScanFailure) -> String {
    let path = failure.path.display().to_string();
    match &failure.error {
        ProcessingError::Idl(err) => render(err.clone(), &path, &failure.source),
        err => format!("{path}: {err}"),
    }
}

/// Handle the formats command
fn handle_formats_command() {
    println!("Available formats:");
    for format in available_formats() {
        println!("  {format}");
    }
}

fn read(path: &str) -> Result<String, String> {
    fs::read_to_string(path).map_err(|err| format!("Cannot read {path}: {err}"))
}

/// Render an error as a miette diagnostic over the file it came from
fn render(err: IdlError, path: &str, source: &str) -> String {
    let report = Report::new(err).with_source_code(NamedSource::new(path, source.to_string()));
    let mut writer = String::new();
    match GraphicalReportHandler::new().render_report(&mut writer, &*report) {
        Ok(()) => writer,
        Err(_) => report.to_string(),
    }
}
