use indexmap::IndexSet;
use serde_json::Value as JsValue;

use super::ir::{EnumValueDeclaration, InputFieldDeclaration, TypeDeclaration};
use crate::schema::{Schema, SchemaType, TypeRef};

/// The scalars every GraphQL schema ships with; these never get declarations.
const BUILTIN_SCALARS: [&str; 5] = ["Int", "Float", "String", "Boolean", "ID"];

/// Turns the set of schema type names the documents used into the scalar, enum,
/// and input object declarations the IR carries.
///
/// Input object fields pull their own field types in, repeated until the set no
/// longer grows, so that nested input objects referenced only through other input
/// objects are declared too.
pub(crate) fn collect_type_declarations(
    schema: &Schema,
    used_types: &IndexSet<String>,
) -> Vec<TypeDeclaration> {
    let mut names: IndexSet<String> = used_types
        .iter()
        .filter(|name| !BUILTIN_SCALARS.contains(&name.as_str()))
        .cloned()
        .collect();

    loop {
        let mut discovered: Vec<String> = Vec::new();
        for name in names.iter() {
            if let Some(SchemaType::InputObject(input_object)) = schema.get_type(name) {
                for field in input_object.fields.iter() {
                    let field_type = field.input_type.name();
                    if !BUILTIN_SCALARS.contains(&field_type)
                        && !names.contains(field_type)
                        && !discovered.iter().any(|known| known == field_type)
                    {
                        discovered.push(field_type.to_string());
                    }
                }
            }
        }
        if discovered.is_empty() {
            break;
        }
        names.extend(discovered);
    }

    names
        .iter()
        .filter_map(|name| schema.get_type(name))
        .filter_map(|schema_type| declaration_for(schema, schema_type))
        .collect()
}

fn declaration_for(schema: &Schema, schema_type: &SchemaType) -> Option<TypeDeclaration> {
    match schema_type {
        SchemaType::Scalar(scalar) => Some(TypeDeclaration::Scalar {
            name: scalar.name.to_string(),
            description: scalar.description.map(|text| text.to_string()),
        }),
        SchemaType::Enum(enum_type) => Some(TypeDeclaration::Enum {
            name: enum_type.name.to_string(),
            description: enum_type.description.map(|text| text.to_string()),
            values: enum_type
                .values
                .iter()
                .map(|value| EnumValueDeclaration {
                    name: value.name.to_string(),
                    description: value.description.map(|text| text.to_string()),
                    is_deprecated: value.is_deprecated,
                    deprecation_reason: value.deprecation_reason.map(|text| text.to_string()),
                })
                .collect(),
        }),
        SchemaType::InputObject(input_object) => Some(TypeDeclaration::InputObject {
            name: input_object.name.to_string(),
            description: input_object.description.map(|text| text.to_string()),
            fields: input_object
                .fields
                .iter()
                .map(|field| InputFieldDeclaration {
                    name: field.name.to_string(),
                    description: field.description.map(|text| text.to_string()),
                    r#type: field.input_type.type_string(),
                    default_value: field
                        .default_value
                        .map(|text| normalize_default_value(schema, field.input_type, text))
                        .unwrap_or(JsValue::Null),
                })
                .collect(),
        }),
        _ => None,
    }
}

/// Normalises the textual default value reported by introspection into its JSON
/// form, guided by the field's type.
fn normalize_default_value(schema: &Schema, type_ref: &TypeRef, text: &str) -> JsValue {
    match type_ref {
        TypeRef::NonNullType(inner) => normalize_default_value(schema, inner, text),
        TypeRef::ListType(inner) => {
            // TODO: lists of enum values have no agreed normal form yet and stay null
            if matches!(schema.get_type(inner.name()), Some(SchemaType::Enum(_))) {
                return JsValue::Null;
            }
            let trimmed = text.trim();
            let inner_text = trimmed
                .strip_prefix('[')
                .and_then(|rest| rest.strip_suffix(']'))
                .unwrap_or(trimmed);
            if inner_text.trim().is_empty() {
                return JsValue::Array(Vec::new());
            }
            JsValue::Array(
                inner_text
                    .split(',')
                    .map(|element| {
                        normalize_default_value(schema, inner, strip_quotes(element.trim()))
                    })
                    .collect(),
            )
        }
        TypeRef::Type(name) => match schema.get_type(name) {
            Some(SchemaType::Scalar(scalar)) => match scalar.name {
                "Int" => text
                    .parse::<i64>()
                    .map(JsValue::from)
                    .unwrap_or_else(|_| JsValue::String(text.to_string())),
                "Float" => text
                    .parse::<f64>()
                    .ok()
                    .and_then(serde_json::Number::from_f64)
                    .map(JsValue::Number)
                    .unwrap_or_else(|| JsValue::String(text.to_string())),
                "Boolean" => text
                    .parse::<bool>()
                    .map(JsValue::from)
                    .unwrap_or_else(|_| JsValue::String(text.to_string())),
                _ => JsValue::String(strip_quotes(text).to_string()),
            },
            _ => JsValue::String(strip_quotes(text).to_string()),
        },
    }
}

fn strip_quotes(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(text)
}
