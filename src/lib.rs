//! `graphql_ir`
//! =========
//!
//! _GraphQL document parsing and typed IR generation for client code generators._
//!
//! The **`graphql_ir`** library is the front half of an ahead-of-time GraphQL client
//! code generator. Given a set of GraphQL operation and fragment documents, and a
//! schema obtained via an introspection query, it produces a typed, validated, and
//! fully resolved intermediate representation (IR) that a code emitter for any
//! target language can consume.
//!
//! The crate does not aim to support full, server-side GraphQL execution or the
//! GraphQL Schema Language. It focuses on the query language subset that clients
//! write: operations, fragments, selections, variables, and the `@skip`/`@include`
//! directives, all checked against a client schema.
//!
//! Processing happens in three stages:
//!
//! - the [`ast`] module parses each document into an arena-allocated syntax tree,
//! - the [`ir`] module walks the tree against a [`schema::Schema`] and builds
//!   [`ir::Operation`], [`ir::Fragment`], and [`ir::TypeDeclaration`] records,
//! - a linking pass resolves fragment references across documents and attaches
//!   each operation's source text together with its transitive fragments.
//!
//! The resulting [`ir::CodeGenerationIr`] is an owned value and serializes to the
//! JSON shape code emitters expect.
//!
//! ```
//! use graphql_ir::{ast::ASTContext, ir, schema::*};
//!
//! let ctx = ASTContext::new();
//!
//! let introspection_json = include_str!("../fixture/introspection_query.json");
//! let introspection: IntrospectionQuery = serde_json::from_str(introspection_json).unwrap();
//! let schema = introspection.build_client_schema(&ctx);
//!
//! let files = vec![ir::DocumentSource::new(
//!     "src/queries/Hello.graphql",
//!     "query Hello { me { name } }",
//! )];
//! let output = ir::parse_documents(&ctx, schema, &files).unwrap();
//! assert_eq!(output.operations[0].operation_name, "Hello");
//! ```

pub mod ast;
pub mod error;
pub mod ir;
pub mod schema;

pub use bumpalo;
