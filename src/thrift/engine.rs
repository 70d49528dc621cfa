//! One-time setup and the handle that front ends call through
//!
//! [`initialize`] runs a self check of the keyword table against the lexer the
//! first time it is called and memoises the result process-wide. Later calls,
//! from any thread, return the same [`Engine`] without repeating the work.
//! Callers waiting on a setup that fails all see its error; the setup is not
//! memoised on failure, so the next call tries again.

use crate::thrift::ast::Document;
use crate::thrift::error::{ErrorCode, IdlError, Result};
use crate::thrift::lexer::tokenize_all;
use crate::thrift::{json, parser, writer};
use log::{debug, info};
use once_cell::sync::OnceCell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

/// Reserved words of the IDL, in the order the lexer declares them
pub const KEYWORDS: &[&str] = &[
    "namespace", "include", "const", "typedef", "enum", "struct", "union", "exception",
    "service", "required", "optional", "oneway", "throws", "extends", "void", "bool", "byte",
    "i8", "i16", "i32", "i64", "double", "string", "binary", "list", "set", "map", "true",
    "false",
];

/// A value built at most once, where a failed build leaves the slot empty
///
/// Callers queued behind a failing build receive that build's error. A caller
/// that arrives after the failure runs a fresh build.
pub struct Bootstrap<T> {
    cell: OnceCell<T>,
    /// Finished build attempts
    attempts: AtomicU64,
    /// Held while a build runs; keeps the error of the last failed build
    last_failure: Mutex<Option<IdlError>>,
}

impl<T> Bootstrap<T> {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
            attempts: AtomicU64::new(0),
            last_failure: Mutex::new(None),
        }
    }

    /// Return the value, building it with `init` if no build has succeeded yet
    pub fn get_or_try_init(&self, init: impl FnOnce() -> Result<T>) -> Result<&T> {
        if let Some(value) = self.cell.get() {
            return Ok(value);
        }
        let seen = self.attempts.load(Ordering::Acquire);
        let mut last_failure = self
            .last_failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(value) = self.cell.get() {
            return Ok(value);
        }
        if self.attempts.load(Ordering::Acquire) != seen {
            if let Some(error) = last_failure.as_ref() {
                return Err(error.clone());
            }
        }

        let outcome = init();
        self.attempts.fetch_add(1, Ordering::Release);
        match outcome {
            Ok(value) => {
                *last_failure = None;
                Ok(self.cell.get_or_init(|| value))
            }
            Err(error) => {
                *last_failure = Some(error.clone());
                Err(error)
            }
        }
    }

    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    pub fn is_ready(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T> Default for Bootstrap<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
struct Runtime {
    keywords: Vec<&'static str>,
}

static RUNTIME: Bootstrap<Runtime> = Bootstrap::new();

/// Set up the engine; safe to call any number of times from any thread
pub fn initialize() -> Result<Engine> {
    let runtime = RUNTIME.get_or_try_init(|| {
        let runtime = bootstrap()?;
        info!(keywords = runtime.keywords.len(); "Thrift IDL engine initialised");
        Ok(runtime)
    })?;
    Ok(Engine { runtime })
}

/// Every keyword must lex as exactly one keyword token spelling itself
fn bootstrap() -> Result<Runtime> {
    for &keyword in KEYWORDS {
        let tokens = tokenize_all(keyword).map_err(|err| {
            IdlError::from_lex(err, keyword)
                .with_help(format!("keyword `{keyword}` does not lex"))
        })?;
        match tokens.as_slice() {
            [token] if token.kind.keyword() == Some(keyword) => {}
            _ => {
                return Err(IdlError::parse(
                    ErrorCode::E100,
                    format!("keyword `{keyword}` is not recognised by the lexer"),
                ))
            }
        }
    }
    debug!(keywords = KEYWORDS.len(); "Keyword table verified");
    Ok(Runtime {
        keywords: KEYWORDS.to_vec(),
    })
}

/// What [`Engine::write`] renders: a document, or the JSON text of one
#[derive(Debug, Clone, Copy)]
pub enum WriteInput<'a> {
    Document(&'a Document),
    Json(&'a str),
}

impl<'a> From<&'a Document> for WriteInput<'a> {
    fn from(document: &'a Document) -> Self {
        WriteInput::Document(document)
    }
}

impl<'a> From<&'a str> for WriteInput<'a> {
    fn from(json: &'a str) -> Self {
        WriteInput::Json(json)
    }
}

/// Handle returned by [`initialize`]
#[derive(Debug, Clone, Copy)]
pub struct Engine {
    runtime: &'static Runtime,
}

impl Engine {
    pub fn parse(self, source: &str) -> Result<Document> {
        parser::parse(source)
    }

    /// Parse and return the document in its JSON form
    pub fn parse_to_json(self, source: &str) -> Result<String> {
        json::to_json(&parser::parse(source)?)
    }

    pub fn write<'a>(self, input: impl Into<WriteInput<'a>>) -> Result<String> {
        match input.into() {
            WriteInput::Document(document) => writer::write(document),
            WriteInput::Json(text) => self.write_json(text),
        }
    }

    pub fn write_json(self, text: &str) -> Result<String> {
        writer::write(&json::from_json(text)?)
    }

    pub fn keywords(self) -> &'static [&'static str] {
        &self.runtime.keywords
    }
}
