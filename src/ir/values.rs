use crate::ast::*;
use serde_json::{json, Map as JsMap, Value as JsValue};

/// Trait for converting AST Value Nodes of a GraphQL language document to the
/// [serde_json::Value] form the IR carries.
///
/// Numbers convert to doubles regardless of whether they were written as integers,
/// which is the numeric model of the IR. Variable references convert to tagged
/// `{"kind": "Variable", …}` objects via [variable_reference].
pub(crate) trait ValueFromNode {
    /// Convert the current AST Value Node to a [serde_json::Value].
    fn to_ir_value(&self) -> JsValue;
}

/// The tagged object form under which a variable reference appears in IR values.
pub(crate) fn variable_reference(name: &str) -> JsValue {
    json!({ "kind": "Variable", "variableName": name })
}

impl<'a> ValueFromNode for Value<'a> {
    #[inline]
    fn to_ir_value(&self) -> JsValue {
        match self {
            Value::Variable(node) => variable_reference(node.name),
            Value::List(node) => node.to_ir_value(),
            Value::Object(node) => node.to_ir_value(),
            Value::Int(node) => node.to_ir_value(),
            Value::Float(node) => node.to_ir_value(),
            Value::Boolean(node) => JsValue::Bool(node.value),
            Value::String(node) => JsValue::String(node.value.to_string()),
            Value::Enum(node) => JsValue::String(node.value.to_string()),
            Value::Null => JsValue::Null,
        }
    }
}

impl<'a> ValueFromNode for IntValue<'a> {
    #[inline]
    fn to_ir_value(&self) -> JsValue {
        match self.value.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
            Some(number) => JsValue::Number(number),
            None => JsValue::String(self.value.to_string()),
        }
    }
}

impl<'a> ValueFromNode for FloatValue<'a> {
    #[inline]
    fn to_ir_value(&self) -> JsValue {
        match self.value.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
            Some(number) => JsValue::Number(number),
            None => JsValue::String(self.value.to_string()),
        }
    }
}

impl<'a> ValueFromNode for ListValue<'a> {
    #[inline]
    fn to_ir_value(&self) -> JsValue {
        self.children
            .iter()
            .map(|value| value.to_ir_value())
            .collect::<Vec<JsValue>>()
            .into()
    }
}

impl<'a> ValueFromNode for ObjectValue<'a> {
    #[inline]
    fn to_ir_value(&self) -> JsValue {
        self.children
            .iter()
            .map(|field| (field.name.to_string(), field.value.to_ir_value()))
            .collect::<JsMap<String, JsValue>>()
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ASTContext, Document};

    // Values only occur in argument position, so the tests parse them from one
    fn to_ir(ctx: &ASTContext, literal: &str) -> JsValue {
        let source = format!("query Literals {{ field(input: {}) }}", literal);
        let document = Document::parse(ctx, source).unwrap();
        let operation = document.definitions[0].operation().unwrap();
        let field = operation.selection_set.selections[0].field().unwrap();
        field.arguments.children[0].value.to_ir_value()
    }

    #[test]
    fn scalars() {
        let ctx = ASTContext::new();
        assert_eq!(to_ir(&ctx, "null"), json!(null));
        assert_eq!(to_ir(&ctx, "true"), json!(true));
        assert_eq!(to_ir(&ctx, "\"hi\""), json!("hi"));
        assert_eq!(to_ir(&ctx, "MOBILE"), json!("MOBILE"));
    }

    #[test]
    fn numbers_are_doubles() {
        let ctx = ASTContext::new();
        assert_eq!(to_ir(&ctx, "1"), json!(1.0));
        assert_eq!(to_ir(&ctx, "-42"), json!(-42.0));
        assert_eq!(to_ir(&ctx, "1.5"), json!(1.5));
    }

    #[test]
    fn variables_become_references() {
        let ctx = ASTContext::new();
        assert_eq!(
            to_ir(&ctx, "$episode"),
            json!({ "kind": "Variable", "variableName": "episode" })
        );
    }

    #[test]
    fn lists_and_objects_recurse() {
        let ctx = ASTContext::new();
        assert_eq!(to_ir(&ctx, "[1, \"two\", $three]"), json!([1.0, "two", { "kind": "Variable", "variableName": "three" }]));
        assert_eq!(
            to_ir(&ctx, "{ stars: 5, commentary: $text }"),
            json!({ "stars": 5.0, "commentary": { "kind": "Variable", "variableName": "text" } })
        );
    }
}
