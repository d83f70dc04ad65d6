use serde::{Deserialize, Serialize};

/// The result of a standard introspection query against a GraphQL API.
///
/// Type and field names are borrowed from the input JSON, while descriptions,
/// deprecation reasons, and default values are owned since they may contain
/// escape sequences.
#[derive(Debug, Deserialize, Serialize)]
pub struct IntrospectionQuery<'a> {
    #[serde(rename = "__schema", borrow)]
    pub schema: IntrospectionSchema<'a>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionSchema<'a> {
    pub query_type: Option<IntrospectionNamedTypeRef<'a>>,
    pub mutation_type: Option<IntrospectionNamedTypeRef<'a>>,
    pub subscription_type: Option<IntrospectionNamedTypeRef<'a>>,
    #[serde(borrow)]
    pub types: Vec<IntrospectionType<'a>>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionDeprecation {
    pub is_deprecated: Option<bool>,
    pub deprecation_reason: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntrospectionType<'a> {
    #[serde(borrow)]
    Scalar(IntrospectionScalarType<'a>),
    Object(IntrospectionObjectType<'a>),
    Interface(IntrospectionInterfaceType<'a>),
    Union(IntrospectionUnionType<'a>),
    Enum(IntrospectionEnumType<'a>),
    InputObject(IntrospectionInputObjectType<'a>),
}

impl<'a> IntrospectionType<'a> {
    #[inline]
    pub fn name(&self) -> &'a str {
        match self {
            IntrospectionType::Scalar(x) => x.name,
            IntrospectionType::Object(x) => x.name,
            IntrospectionType::Interface(x) => x.name,
            IntrospectionType::Union(x) => x.name,
            IntrospectionType::Enum(x) => x.name,
            IntrospectionType::InputObject(x) => x.name,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "kind")]
pub enum IntrospectionOutputTypeRef<'a> {
    #[serde(rename = "LIST")]
    List {
        #[serde(rename = "ofType")]
        of_type: Box<IntrospectionOutputTypeRef<'a>>,
    },
    #[serde(rename = "NON_NULL")]
    NonNull {
        #[serde(rename = "ofType")]
        of_type: Box<IntrospectionOutputTypeRef<'a>>,
    },
    #[serde(rename = "SCALAR")]
    ScalarType {
        #[serde(borrow)]
        name: &'a str,
    },
    #[serde(rename = "OBJECT")]
    ObjectType {
        #[serde(borrow)]
        name: &'a str,
    },
    #[serde(rename = "INTERFACE")]
    InterfaceType {
        #[serde(borrow)]
        name: &'a str,
    },
    #[serde(rename = "UNION")]
    UnionType {
        #[serde(borrow)]
        name: &'a str,
    },
    #[serde(rename = "ENUM")]
    EnumType {
        #[serde(borrow)]
        name: &'a str,
    },
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(tag = "kind")]
pub enum IntrospectionInputTypeRef<'a> {
    #[serde(rename = "LIST")]
    List {
        #[serde(rename = "ofType")]
        of_type: Box<IntrospectionInputTypeRef<'a>>,
    },
    #[serde(rename = "NON_NULL")]
    NonNull {
        #[serde(rename = "ofType")]
        of_type: Box<IntrospectionInputTypeRef<'a>>,
    },
    #[serde(rename = "SCALAR")]
    ScalarType {
        #[serde(borrow)]
        name: &'a str,
    },
    #[serde(rename = "ENUM")]
    EnumType {
        #[serde(borrow)]
        name: &'a str,
    },
    #[serde(rename = "INPUT_OBJECT")]
    InputObjectType {
        #[serde(borrow)]
        name: &'a str,
    },
}

#[derive(Debug, Deserialize, Serialize)]
pub struct IntrospectionNamedTypeRef<'a> {
    #[serde(borrow)]
    pub name: &'a str,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct IntrospectionScalarType<'a> {
    #[serde(borrow)]
    pub name: &'a str,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct IntrospectionObjectType<'a> {
    #[serde(borrow)]
    pub name: &'a str,
    pub description: Option<String>,
    pub fields: Vec<IntrospectionField<'a>>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionInterfaceType<'a> {
    #[serde(borrow)]
    pub name: &'a str,
    pub description: Option<String>,
    pub fields: Vec<IntrospectionField<'a>>,
    pub possible_types: Vec<IntrospectionNamedTypeRef<'a>>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionUnionType<'a> {
    #[serde(borrow)]
    pub name: &'a str,
    pub description: Option<String>,
    pub possible_types: Vec<IntrospectionNamedTypeRef<'a>>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionEnumType<'a> {
    #[serde(borrow)]
    pub name: &'a str,
    pub description: Option<String>,
    pub enum_values: Vec<IntrospectionEnumValue<'a>>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionInputObjectType<'a> {
    #[serde(borrow)]
    pub name: &'a str,
    pub description: Option<String>,
    pub input_fields: Vec<IntrospectionInputValue<'a>>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionField<'a> {
    #[serde(borrow)]
    pub name: &'a str,
    pub description: Option<String>,
    pub args: Vec<IntrospectionInputValue<'a>>,
    #[serde(rename = "type")]
    pub of_type: IntrospectionOutputTypeRef<'a>,
    #[serde(flatten)]
    pub deprecation: IntrospectionDeprecation,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionInputValue<'a> {
    #[serde(borrow)]
    pub name: &'a str,
    pub description: Option<String>,
    pub default_value: Option<String>,
    #[serde(rename = "type")]
    pub of_type: IntrospectionInputTypeRef<'a>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionEnumValue<'a> {
    #[serde(borrow)]
    pub name: &'a str,
    pub description: Option<String>,
    #[serde(flatten)]
    pub deprecation: IntrospectionDeprecation,
}
