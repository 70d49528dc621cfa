//! Processing API for Thrift IDL files
//!
//! A processing spec names a stage (what to extract) and a format (how to
//! print it), written as one dash-separated string such as `token-simple`,
//! `ast-json` or `idl-canonical`. The CLI and the integration tests go through
//! this module.
//!
//! [`scan`] validates every `.thrift` file under a directory in parallel and
//! can write one JSON AST per file.

use crate::thrift::error::IdlError;
use crate::thrift::lexer::{tokenize_all, SpannedToken, TokenRecord};
use crate::thrift::{json, parser, writer};
use log::{debug, info, warn};
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::thread;
use walkdir::WalkDir;

/// What data to extract from the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    Token,
    Ast,
    Idl,
}

/// How to print it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Simple,
    Json,
    Yaml,
    Canonical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingSpec {
    pub stage: ProcessingStage,
    pub format: OutputFormat,
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    #[error("Invalid stage: {0}")]
    InvalidStage(String),
    #[error("Invalid format type: {0}")]
    InvalidFormatType(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("'{0}' is not a .thrift file")]
    NotThrift(PathBuf),
    #[error(transparent)]
    Idl(#[from] IdlError),
}

const SPECS: &[(&str, ProcessingStage, OutputFormat)] = &[
    ("token-simple", ProcessingStage::Token, OutputFormat::Simple),
    ("token-json", ProcessingStage::Token, OutputFormat::Json),
    ("ast-json", ProcessingStage::Ast, OutputFormat::Json),
    ("ast-yaml", ProcessingStage::Ast, OutputFormat::Yaml),
    ("idl-canonical", ProcessingStage::Idl, OutputFormat::Canonical),
];

impl ProcessingSpec {
    /// Parse a format string like `token-simple` or `ast-json`
    pub fn from_string(format_str: &str) -> Result<Self, ProcessingError> {
        let Some((stage, format)) = format_str.split_once('-') else {
            return Err(ProcessingError::InvalidFormat(format_str.to_string()));
        };
        if !matches!(stage, "token" | "ast" | "idl") {
            return Err(ProcessingError::InvalidStage(stage.to_string()));
        }
        SPECS
            .iter()
            .find(|(name, _, _)| *name == format_str)
            .map(|&(_, stage, format)| ProcessingSpec { stage, format })
            .ok_or_else(|| {
                ProcessingError::InvalidFormatType(format!(
                    "format '{format}' is not supported for the {stage} stage"
                ))
            })
    }

    pub fn available_specs() -> Vec<ProcessingSpec> {
        SPECS
            .iter()
            .map(|&(_, stage, format)| ProcessingSpec { stage, format })
            .collect()
    }

    pub fn name(&self) -> &'static str {
        SPECS
            .iter()
            .find(|(_, stage, format)| *stage == self.stage && *format == self.format)
            .map_or("unknown", |(name, _, _)| name)
    }
}

/// All format strings accepted by [`ProcessingSpec::from_string`]
pub fn available_formats() -> Vec<&'static str> {
    SPECS.iter().map(|(name, _, _)| *name).collect()
}

/// Read a Thrift file and process it with `spec`
pub fn process_file<P: AsRef<Path>>(
    file_path: P,
    spec: &ProcessingSpec,
) -> Result<String, ProcessingError> {
    let file_path = file_path.as_ref();
    let content = fs::read_to_string(file_path)?;
    debug!(path:? = file_path, format = spec.name(); "Processing file");
    process_source(&content, spec)
}

/// Process Thrift source text with `spec`
pub fn process_source(source: &str, spec: &ProcessingSpec) -> Result<String, ProcessingError> {
    let output = match (spec.stage, spec.format) {
        (ProcessingStage::Token, OutputFormat::Simple) => {
            format_tokens_simple(&lex(source)?)
        }
        (ProcessingStage::Token, _) => {
            let records: Vec<TokenRecord> = lex(source)?.into_iter().map(Into::into).collect();
            serde_json::to_string_pretty(&records).map_err(|err| {
                ProcessingError::InvalidFormat(format!("token dump failed: {err}"))
            })?
        }
        (ProcessingStage::Ast, OutputFormat::Yaml) => json::to_yaml(&parser::parse(source)?)?,
        (ProcessingStage::Ast, _) => json::to_json_pretty(&parser::parse(source)?)?,
        (ProcessingStage::Idl, _) => writer::write(&parser::parse(source)?)?,
    };
    Ok(output)
}

/// Where [`scan`] writes its output, if anywhere
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Directory for one `<stem>.json` AST per input file
    pub output: Option<PathBuf>,
    pub pretty: bool,
}

/// A file that failed to read, parse or write during a [`scan`]
#[derive(Debug)]
pub struct ScanFailure {
    pub path: PathBuf,
    /// File contents, empty when the file could not be read
    pub source: String,
    pub error: ProcessingError,
}

/// Result of a [`scan`], with files in path order
#[derive(Debug, Default)]
pub struct ScanReport {
    pub succeeded: Vec<PathBuf>,
    /// JSON files written into [`ScanOptions::output`]
    pub written: Vec<PathBuf>,
    pub failures: Vec<ScanFailure>,
}

impl ScanReport {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failures.len()
    }
}

/// A `.thrift` file by itself, or every `.thrift` file under a directory, sorted
pub fn collect_thrift_files(path: &Path) -> Result<Vec<PathBuf>, ProcessingError> {
    if path.is_file() {
        if is_thrift_file(path) {
            return Ok(vec![path.to_path_buf()]);
        }
        return Err(ProcessingError::NotThrift(path.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path) {
        let entry = entry?;
        if entry.file_type().is_file() && is_thrift_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

fn is_thrift_file(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some("thrift")
}

/// Parse every Thrift file under `path`, spread over the available cores
///
/// Per-file failures are collected in the report; only a failure to list the
/// files or create the output directory fails the whole scan.
pub fn scan(path: &Path, options: &ScanOptions) -> Result<ScanReport, ProcessingError> {
    let files = collect_thrift_files(path)?;
    if let Some(output) = &options.output {
        fs::create_dir_all(output)?;
    }
    info!(path:? = path, files = files.len(); "Scanning Thrift files");

    let workers = thread::available_parallelism()
        .map_or(1, NonZeroUsize::get)
        .clamp(1, files.len().max(1));
    let chunk_size = files.len().div_ceil(workers).max(1);

    let outcomes: Vec<(PathBuf, Result<Option<PathBuf>, ScanFailure>)> = thread::scope(|scope| {
        let handles: Vec<_> = files
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(move || {
                    chunk
                        .iter()
                        .map(|file| (file.clone(), scan_file(file, options)))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
            })
            .collect()
    });

    let mut report = ScanReport::default();
    for (file, outcome) in outcomes {
        match outcome {
            Ok(written) => {
                report.succeeded.push(file);
                report.written.extend(written);
            }
            Err(failure) => {
                warn!(path:? = failure.path; "Scan failed for file");
                report.failures.push(failure);
            }
        }
    }
    info!(
        succeeded = report.succeeded.len(),
        failed = report.failures.len();
        "Scan finished"
    );
    Ok(report)
}

/// Parse one file and write its JSON AST when an output directory is set
fn scan_file(path: &Path, options: &ScanOptions) -> Result<Option<PathBuf>, ScanFailure> {
    let fail = |source: String, error: ProcessingError| ScanFailure {
        path: path.to_path_buf(),
        source,
        error,
    };
    let source = fs::read_to_string(path).map_err(|err| fail(String::new(), err.into()))?;
    let document = match parser::parse(&source) {
        Ok(document) => document,
        Err(err) => return Err(fail(source, err.into())),
    };
    let Some(output) = &options.output else {
        return Ok(None);
    };

    let encoded = if options.pretty {
        json::to_json_pretty(&document)
    } else {
        json::to_json(&document)
    };
    let text = encoded.map_err(|err| fail(String::new(), err.into()))?;
    let stem = path.file_stem().unwrap_or(path.as_os_str()).to_string_lossy();
    let output_path = output.join(format!("{stem}.json"));
    fs::write(&output_path, text).map_err(|err| fail(String::new(), err.into()))?;
    debug!(path:? = output_path; "Wrote JSON AST");
    Ok(Some(output_path))
}

fn lex(source: &str) -> Result<Vec<SpannedToken<'_>>, IdlError> {
    tokenize_all(source).map_err(|err| IdlError::from_lex(err, source))
}

/// One output line per source line, tokens as `<name>` separated by spaces
fn format_tokens_simple(tokens: &[SpannedToken<'_>]) -> String {
    let mut result = String::new();
    let mut line = None;
    for token in tokens {
        match line {
            Some(current) if current == token.loc.start.line => result.push(' '),
            Some(_) => result.push('\n'),
            None => {}
        }
        result.push_str(&token.kind.to_string());
        line = Some(token.loc.end.line);
    }
    if !result.is_empty() {
        result.push('\n');
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_from_string() {
        let spec = ProcessingSpec::from_string("ast-json").unwrap();
        assert_eq!(spec.stage, ProcessingStage::Ast);
        assert_eq!(spec.format, OutputFormat::Json);
        assert_eq!(spec.name(), "ast-json");

        assert!(matches!(
            ProcessingSpec::from_string("json"),
            Err(ProcessingError::InvalidFormat(_))
        ));
        assert!(matches!(
            ProcessingSpec::from_string("tree-json"),
            Err(ProcessingError::InvalidStage(_))
        ));
        assert!(matches!(
            ProcessingSpec::from_string("token-yaml"),
            Err(ProcessingError::InvalidFormatType(_))
        ));
    }

    #[test]
    fn test_every_format_round_trips_through_its_name() {
        for name in available_formats() {
            assert_eq!(ProcessingSpec::from_string(name).unwrap().name(), name);
        }
        assert_eq!(ProcessingSpec::available_specs().len(), available_formats().len());
    }

    #[test]
    fn test_token_simple() {
        let spec = ProcessingSpec::from_string("token-simple").unwrap();
        let output = process_source("struct A {\n  1: i32 x\n}", &spec).unwrap();
        assert_eq!(
            output,
            "<struct> <identifier> <{>\n<integer> <:> <i32> <identifier>\n<}>\n"
        );
    }

    #[test]
    fn test_token_json() {
        let spec = ProcessingSpec::from_string("token-json").unwrap();
        let output = process_source("const i32 X = 0x1F", &spec).unwrap();
        let records: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(records[4]["kind"], "hex");
        assert_eq!(records[4]["text"], "0x1F");
    }

    #[test]
    fn test_idl_canonical() {
        let spec = ProcessingSpec::from_string("idl-canonical").unwrap();
        let output = process_source("typedef   i32   Id;", &spec).unwrap();
        assert_eq!(output, "typedef i32 Id\n");
    }

    #[test]
    fn test_parse_errors_pass_through() {
        let spec = ProcessingSpec::from_string("ast-json").unwrap();
        let error = process_source("struct {", &spec).unwrap_err();
        let ProcessingError::Idl(error) = error else {
            panic!("expected an IDL error");
        };
        assert_eq!(error.kind(), "ParseError");
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("thrift-idl-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_collect_thrift_files_recurses_and_sorts() {
        let dir = scratch_dir("collect");
        fs::create_dir_all(dir.join("nested")).unwrap();
        fs::write(dir.join("b.thrift"), "").unwrap();
        fs::write(dir.join("nested/a.thrift"), "").unwrap();
        fs::write(dir.join("notes.txt"), "").unwrap();

        let files = collect_thrift_files(&dir).unwrap();
        assert_eq!(files, vec![dir.join("b.thrift"), dir.join("nested/a.thrift")]);
        assert_eq!(collect_thrift_files(&dir.join("b.thrift")).unwrap().len(), 1);
        assert!(matches!(
            collect_thrift_files(&dir.join("notes.txt")),
            Err(ProcessingError::NotThrift(_))
        ));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_scan_keeps_going_past_failures() {
        let dir = scratch_dir("scan-failures");
        fs::write(dir.join("good.thrift"), "struct A { 1: i32 x }").unwrap();
        fs::write(dir.join("bad.thrift"), "struct {").unwrap();

        let report = scan(&dir, &ScanOptions::default()).unwrap();
        assert_eq!(report.total(), 2);
        assert_eq!(report.succeeded, vec![dir.join("good.thrift")]);
        assert!(report.written.is_empty());
        let failure = &report.failures[0];
        assert_eq!(failure.path, dir.join("bad.thrift"));
        assert_eq!(failure.source, "struct {");
        assert!(matches!(&failure.error, ProcessingError::Idl(err) if err.kind() == "ParseError"));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file() {
        let spec = ProcessingSpec::from_string("ast-json").unwrap();
        let error = process_file("does/not/exist.thrift", &spec).unwrap_err();
        assert!(matches!(error, ProcessingError::Io(_)));
    }
}
