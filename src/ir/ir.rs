use crate::ast::OperationKind;
use indexmap::IndexSet;
use serde::Serialize;
use serde_json::Value as JsValue;
use std::fmt;

/// One GraphQL document file handed to the parser, pairing the file's path with
/// its UTF-8 source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSource {
    pub path: String,
    pub source: String,
}

impl DocumentSource {
    pub fn new<P: Into<String>, S: Into<String>>(path: P, source: S) -> Self {
        DocumentSource {
            path: path.into(),
            source: source.into(),
        }
    }
}

/// The result of walking a single document: its operations and fragments, plus the
/// schema type names the document referenced.
///
/// Results of multiple documents combine by list concatenation and set union.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DocumentParseResult {
    pub operations: Vec<Operation>,
    pub fragments: Vec<Fragment>,
    pub used_types: IndexSet<String>,
}

/// The kind of an [Operation], spelled the way the query language spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    Query,
    Mutation,
    Subscription,
}

impl From<OperationKind> for OperationType {
    #[inline]
    fn from(kind: OperationKind) -> Self {
        match kind {
            OperationKind::Query => OperationType::Query,
            OperationKind::Mutation => OperationType::Mutation,
            OperationKind::Subscription => OperationType::Subscription,
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationType::Query => f.write_str("query"),
            OperationType::Mutation => f.write_str("mutation"),
            OperationType::Subscription => f.write_str("subscription"),
        }
    }
}

/// IR record for one named operation definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub operation_name: String,
    pub operation_type: OperationType,
    pub variables: Vec<Variable>,
    /// The operation's own raw source text, sliced verbatim from its document.
    pub source: String,
    /// The operation's source concatenated with the sources of every fragment it
    /// transitively references. Populated by the linker.
    pub source_with_fragments: String,
    pub fields: Vec<Field>,
    /// Names of the fragments the operation references. The walker records the
    /// spreads written in the operation itself; the linker augments this to the
    /// transitive closure.
    pub fragments_referenced: Vec<String>,
    pub file_path: String,
    /// Left empty here; a persisted-query registry fills it in downstream.
    pub operation_id: String,
}

/// IR record for one named fragment definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fragment {
    pub fragment_name: String,
    pub type_condition: String,
    /// The concrete object types this fragment can match: the possible types of
    /// the type condition for interfaces and unions, otherwise the type itself.
    pub possible_types: Vec<String>,
    pub source: String,
    pub fields: Vec<Field>,
    /// Names of fragments spread at the fragment's top level.
    pub fragment_spreads: Vec<String>,
    pub inline_fragments: Vec<InlineFragment>,
    /// Names of every fragment referenced anywhere inside this fragment.
    pub fragments_referenced: Vec<String>,
    pub file_path: String,
}

/// IR record for one selected field occurrence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// The key under which the field's value appears in the response: the alias
    /// when one is written, the schema field name otherwise.
    pub response_name: String,
    /// The field's name on the schema type it is selected on.
    pub field_name: String,
    /// The field's declared type in the IR's compact encoding, e.g. `[User!]!`.
    pub r#type: String,
    pub args: Vec<Argument>,
    /// Whether the field's inclusion depends on any `@skip`/`@include` condition.
    pub is_conditional: bool,
    pub fields: Vec<Field>,
    pub fragment_spreads: Vec<String>,
    pub inline_fragments: Vec<InlineFragment>,
    pub description: Option<String>,
    pub is_deprecated: bool,
    pub deprecation_reason: Option<String>,
    pub conditions: Vec<Condition>,
}

impl Field {
    /// The synthetic `__typename` selection injected at the start of selection sets.
    pub(crate) fn typename() -> Field {
        Field {
            response_name: "__typename".to_string(),
            field_name: "__typename".to_string(),
            r#type: "String!".to_string(),
            args: Vec::new(),
            is_conditional: false,
            fields: Vec::new(),
            fragment_spreads: Vec::new(),
            inline_fragments: Vec::new(),
            description: None,
            is_deprecated: false,
            deprecation_reason: None,
            conditions: Vec::new(),
        }
    }

    #[inline]
    pub(crate) fn is_typename(&self) -> bool {
        self.response_name == "__typename"
    }
}

/// IR record for one inline fragment occurrence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineFragment {
    pub type_condition: String,
    pub possible_types: Vec<String>,
    pub fields: Vec<Field>,
    pub fragment_spreads: Vec<String>,
}

/// IR record for one argument passed to a field.
///
/// Literal values convert to their JSON form; a variable reference is represented
/// as a `{"kind": "Variable", "variableName": …}` object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Argument {
    pub name: String,
    pub r#type: String,
    pub value: JsValue,
}

/// IR record for one variable declared by an operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub name: String,
    pub r#type: String,
}

/// IR record for one `@skip`/`@include` directive on a field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub kind: String,
    pub variable_name: String,
    /// `true` for `@skip`, `false` for `@include`.
    pub inverted: bool,
}

impl Condition {
    pub(crate) fn boolean<S: Into<String>>(variable_name: S, inverted: bool) -> Condition {
        Condition {
            kind: "BooleanCondition".to_string(),
            variable_name: variable_name.into(),
            inverted,
        }
    }
}

/// IR record for one schema type the documents used, limited to the kinds a code
/// emitter generates declarations for.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum TypeDeclaration {
    #[serde(rename = "ScalarType", rename_all = "camelCase")]
    Scalar {
        name: String,
        description: Option<String>,
    },
    #[serde(rename = "EnumType", rename_all = "camelCase")]
    Enum {
        name: String,
        description: Option<String>,
        values: Vec<EnumValueDeclaration>,
    },
    #[serde(rename = "InputObjectType", rename_all = "camelCase")]
    InputObject {
        name: String,
        description: Option<String>,
        fields: Vec<InputFieldDeclaration>,
    },
}

impl TypeDeclaration {
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            TypeDeclaration::Scalar { name, .. } => name,
            TypeDeclaration::Enum { name, .. } => name,
            TypeDeclaration::InputObject { name, .. } => name,
        }
    }
}

/// One value of an enum [TypeDeclaration].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumValueDeclaration {
    pub name: String,
    pub description: Option<String>,
    pub is_deprecated: bool,
    pub deprecation_reason: Option<String>,
}

/// One field of an input object [TypeDeclaration].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputFieldDeclaration {
    pub name: String,
    pub description: Option<String>,
    pub r#type: String,
    /// The field's schema default, normalised to its JSON form.
    pub default_value: JsValue,
}

/// The aggregate the parser hands to code emitters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeGenerationIr {
    pub operations: Vec<Operation>,
    pub fragments: Vec<Fragment>,
    pub types_used: Vec<TypeDeclaration>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typename_field_shape() {
        let field = Field::typename();
        assert_eq!(field.response_name, "__typename");
        assert_eq!(field.field_name, "__typename");
        assert_eq!(field.r#type, "String!");
        assert!(field.is_typename());
        assert!(!field.is_conditional);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let condition = Condition::boolean("withDetails", true);
        let json = serde_json::to_value(&condition).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "kind": "BooleanCondition",
                "variableName": "withDetails",
                "inverted": true,
            })
        );

        let declaration = TypeDeclaration::Scalar {
            name: "Date".to_string(),
            description: None,
        };
        let json = serde_json::to_value(&declaration).unwrap();
        assert_eq!(json["kind"], "ScalarType");
        assert_eq!(json["name"], "Date");

        let field = Field::typename();
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["responseName"], "__typename");
        assert_eq!(json["type"], "String!");
    }
}
