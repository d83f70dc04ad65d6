//! # Error and Result for this crate
//!
//! This crate defines a common [Error] structure that's used across all stages of
//! document processing, from lexing up to cross-document linking.

use logos::Span;
use std::{error, fmt, io, path::Path, result};

/// This crate's result type using the [Error] structure.
pub type Result<T> = result::Result<T, Error>;

/// This crate's error structure which internal errors are converted into.
///
/// The error is split into a general message, an optional source location, and an
/// optional context string. For syntax errors the location points at the offending
/// token, while errors that are re-raised per document carry a context string with
/// a preview of the offending source line and its neighbours.
///
/// The Error implements both the [`fmt::Display`] and [`fmt::Debug`] traits. It also
/// implements [`error::Error`] so that it can be used with existing patterns for
/// error handling.
#[derive(PartialEq, Eq, Clone)]
pub struct Error {
    pub(crate) message: String,
    pub(crate) location: Option<Location>,
    pub(crate) context: Option<String>,
    pub(crate) error_type: ErrorType,
}

#[derive(PartialEq, Eq, Clone)]
pub enum ErrorType {
    /// Lexer and parser rejections.
    Syntax,
    /// Schema resolution, typing, conflict, and cross-document errors.
    GraphQL,
    /// An error re-raised with the path and source preview of one document.
    Document,
    /// An unreadable input file.
    Io,
}

impl Error {
    /// Create a new Error with only a main message from an input string.
    pub fn new<S: Into<String>>(message: S, error_type: Option<ErrorType>) -> Self {
        Self {
            message: message.into(),
            location: None,
            context: None,
            error_type: error_type.unwrap_or(ErrorType::GraphQL),
        }
    }

    /// Create a new Error with a main message and a source location.
    pub fn new_with_location<S: Into<String>>(
        message: S,
        location: Location,
        error_type: Option<ErrorType>,
    ) -> Self {
        Self {
            message: message.into(),
            location: Some(location),
            context: None,
            error_type: error_type.unwrap_or(ErrorType::GraphQL),
        }
    }

    /// Returns the message of the current error. The context is discarded.
    pub fn message(&self) -> &str {
        self.message.as_ref()
    }

    /// Returns the location of the current error.
    pub fn location(&self) -> &Option<Location> {
        &self.location
    }

    /// Formats this error, with the option to include the context information as
    /// well, which will cause the string to be multi-line.
    pub fn print(&self, include_ctx: bool) -> String {
        let formatted = match self.error_type {
            ErrorType::Syntax => format!("Syntax Error: {}", self.message),
            ErrorType::GraphQL => format!("GraphQL Error: {}", self.message),
            ErrorType::Document | ErrorType::Io => self.message.clone(),
        };

        match self.context {
            Some(ref context) if include_ctx => format!("{}\n{}", formatted, context),
            _ => formatted,
        }
    }

    /// Re-raise an error that occurred while processing a single document with the
    /// document's file path and, when the location is known, a preview of the
    /// offending source line.
    pub(crate) fn into_document_error(self, file_path: &str, source: &str) -> Error {
        let message = match self.location {
            Some(ref location) => format!(
                "Failed to parse GraphQL file '{}' ({}:{}): {}",
                file_path, location.line, location.column, self.message
            ),
            None => format!("Failed to parse GraphQL file '{}': {}", file_path, self.message),
        };
        let context = self
            .location
            .as_ref()
            .map(|location| print_preview(source, location.line))
            .or(self.context);
        Error {
            message,
            location: self.location,
            context,
            error_type: ErrorType::Document,
        }
    }

    /// Wrap a failed file read into this crate's error structure.
    pub(crate) fn from_io(path: &Path, error: io::Error) -> Error {
        Error::new(
            format!("Failed to read GraphQL file '{}': {}", path.display(), error),
            Some(ErrorType::Io),
        )
    }
}

/// Renders the offending source line flanked by its two neighbours, framed by
/// horizontal rules.
pub(crate) fn print_preview(source: &str, line: usize) -> String {
    const RULE: &str = "----------------------------------------------------";
    let mut out = String::new();
    out.push_str(RULE);
    for (index, text) in source.lines().enumerate() {
        let line_num = index + 1;
        if line_num + 1 >= line && line_num <= line + 1 {
            out.push('\n');
            out.push('[');
            out.push_str(&line_num.to_string());
            out.push_str("]: ");
            out.push_str(text);
        }
    }
    out.push('\n');
    out.push_str(RULE);
    out
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

pub(crate) fn get_location(source: &str, span: Span) -> Location {
    let line = source[..span.start].lines().count();
    let col = source[..span.start]
        .lines()
        .last()
        .map_or(span.start, |x| x.len());

    Location {
        line: line.max(1),
        column: col,
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.print(true))
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\n{}\n", self)
    }
}

impl error::Error for Error {}
