//! # Using Schema Definitions
//!
//! The `graphql_ir::schema` module contains utilities to create a GraphQL Schema from
//! introspection data. This information is then used to validate the documents that IR is
//! generated for and to derive the type declarations the IR carries.
//!
//! The [BuildClientSchema] trait may be used to convert introspection data into a usable
//! [Schema]:
//!
//! ```
//! use graphql_ir::{ast::ASTContext, schema::*};
//!
//! fn inspect() {
//!     let ctx = ASTContext::new();
//!
//!     let introspection_json = include_str!("../../fixture/introspection_query.json");
//!     let introspection: IntrospectionQuery = serde_json::from_str(introspection_json).unwrap();
//!     let _schema = introspection.build_client_schema(&ctx);
//! }
//! ```
//!
//! [More information on the Schema struct.](Schema)

pub mod build_client_schema;
pub mod introspection;
#[allow(clippy::module_inception)]
pub mod schema;

pub use build_client_schema::BuildClientSchema;
pub use introspection::{IntrospectionQuery, IntrospectionSchema};
pub use schema::*;
