//! # IR Generation
//!
//! The `graphql_ir::ir` module turns parsed GraphQL documents into the typed IR
//! that code emitters consume. Each document is walked against a
//! [Schema](crate::schema::Schema) by the [DocumentWalker], which validates
//! selections, arguments, and variables while building [Operation] and [Fragment]
//! records. A linking pass then checks cross-document rules, resolves every
//! fragment reference transitively, and derives the [TypeDeclaration]s for the
//! schema types the documents touch.
//!
//! The usual entry point is [parse_documents]:
//!
//! ```
//! use graphql_ir::{ast::ASTContext, ir, schema::*};
//!
//! let ctx = ASTContext::new();
//! let introspection_json = include_str!("../../fixture/introspection_query.json");
//! let introspection: IntrospectionQuery = serde_json::from_str(introspection_json).unwrap();
//! let schema = introspection.build_client_schema(&ctx);
//!
//! let files = vec![ir::DocumentSource::new(
//!     "src/queries/Hello.graphql",
//!     "query Hello { me { name } }",
//! )];
//! let output = ir::parse_documents(&ctx, schema, &files).unwrap();
//! assert_eq!(output.operations.len(), 1);
//! ```
//!
//! [parse_document_files] does the same but reads the documents from disk first.

#[allow(clippy::module_inception)]
mod ir;

mod linker;
mod type_collector;
mod values;
mod walker;

pub use ir::*;
pub use walker::DocumentWalker;

use crate::ast::ASTContext;
use crate::error::{Error, Result};
use crate::schema::Schema;
use indexmap::IndexSet;
use std::fs;
use std::path::Path;

/// Parses and links a set of GraphQL documents against a schema, producing the
/// full [CodeGenerationIr].
///
/// Documents are walked in input order and their results combined by list
/// concatenation and set union, so the output is deterministic for a given input
/// sequence. The first error aborts processing; errors raised while walking one
/// document are re-raised with that document's file path and a source preview.
pub fn parse_documents<'a>(
    ctx: &'a ASTContext,
    schema: &'a Schema<'a>,
    files: &[DocumentSource],
) -> Result<CodeGenerationIr> {
    let mut operations = Vec::new();
    let mut fragments = Vec::new();
    let mut used_types: IndexSet<String> = IndexSet::new();

    for file in files {
        let result = DocumentWalker::new(schema)
            .walk_document(ctx, file)
            .map_err(|error| error.into_document_error(&file.path, &file.source))?;
        operations.extend(result.operations);
        fragments.extend(result.fragments);
        used_types.extend(result.used_types);
    }

    let (operations, fragments) = linker::link(operations, fragments)?;
    let types_used = type_collector::collect_type_declarations(schema, &used_types);

    Ok(CodeGenerationIr {
        operations,
        fragments,
        types_used,
    })
}

/// Reads the given document files and hands them to [parse_documents].
///
/// A file that cannot be read fails the whole run with an I/O error carrying the
/// offending path.
pub fn parse_document_files<'a, P: AsRef<Path>>(
    ctx: &'a ASTContext,
    schema: &'a Schema<'a>,
    paths: &[P],
) -> Result<CodeGenerationIr> {
    let files = paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            let source =
                fs::read_to_string(path).map_err(|error| Error::from_io(path, error))?;
            Ok(DocumentSource::new(path.display().to_string(), source))
        })
        .collect::<Result<Vec<_>>>()?;
    parse_documents(ctx, schema, &files)
}
