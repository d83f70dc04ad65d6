use indexmap::IndexSet;

use super::ir::*;
use super::values::{variable_reference, ValueFromNode};
use crate::ast::{self, ASTContext, Document, Selection};
use crate::error::{Error, Result};
use crate::schema::{Schema, SchemaField, SchemaFields, SchemaPossibleTypes, SchemaType};

/// Walks one document's syntax tree against a [Schema] and produces the IR records
/// for its operations and fragments.
///
/// The walker accumulates the names of every schema type the document touches
/// through variables, fields, and arguments; the type-declaration collector later
/// expands this set into [TypeDeclaration]s.
pub struct DocumentWalker<'a> {
    schema: &'a Schema<'a>,
    used_types: IndexSet<String>,
}

impl<'a> DocumentWalker<'a> {
    pub fn new(schema: &'a Schema<'a>) -> Self {
        DocumentWalker {
            schema,
            used_types: IndexSet::new(),
        }
    }

    /// Parse and walk one document file, consuming the walker.
    pub fn walk_document(
        mut self,
        ctx: &'a ASTContext,
        file: &DocumentSource,
    ) -> Result<DocumentParseResult> {
        let document = Document::parse(ctx, file.source.as_str())?;
        let mut operations = Vec::new();
        let mut fragments = Vec::new();
        for (definition, span) in document
            .definitions
            .iter()
            .zip(document.definition_spans.iter())
        {
            let source = file.source[span.start..span.end].to_string();
            match definition {
                ast::Definition::Operation(operation) => {
                    operations.push(self.walk_operation(operation, source, &file.path)?)
                }
                ast::Definition::Fragment(fragment) => {
                    fragments.push(self.walk_fragment(fragment, source, &file.path)?)
                }
            }
        }
        Ok(DocumentParseResult {
            operations,
            fragments,
            used_types: self.used_types,
        })
    }

    fn walk_operation(
        &mut self,
        operation: &'a ast::OperationDefinition<'a>,
        source: String,
        file_path: &str,
    ) -> Result<Operation> {
        let operation_name = operation
            .name
            .map(|name| name.name.to_string())
            .ok_or_else(|| Error::new("Anonymous operations are not supported", None))?;
        let operation_type = OperationType::from(operation.operation);
        let root_type = self.schema.get_root_type(operation.operation).ok_or_else(|| {
            Error::new(
                format!("Schema is not configured for {} operations", operation_type),
                None,
            )
        })?;

        let variables = operation
            .variable_definitions
            .children
            .iter()
            .map(|definition| self.parse_variable(definition))
            .collect::<Result<Vec<_>>>()?;

        let fields = self.parse_selection_set(
            &operation.selection_set,
            SchemaType::Object(root_type),
            &variables,
        )?;
        if fields.is_empty() {
            return Err(Error::new(
                format!(
                    "Operation '{}' of type '{}' must have a selection of sub-fields",
                    operation_name, operation_type
                ),
                None,
            ));
        }

        // The root selection drops the injected __typename again; an explicitly
        // written one is kept
        let wrote_typename = operation
            .selection_set
            .selections
            .iter()
            .any(|selection| matches!(selection.field(), Some(field) if field.name == "__typename"));
        let fields = if wrote_typename {
            fields
        } else {
            fields.into_iter().filter(|field| !field.is_typename()).collect()
        };

        let mut fragments_referenced = IndexSet::new();
        collect_spread_names(&operation.selection_set, &mut fragments_referenced);

        Ok(Operation {
            operation_name,
            operation_type,
            variables,
            source,
            source_with_fragments: String::new(),
            fields,
            fragments_referenced: fragments_referenced.into_iter().collect(),
            file_path: file_path.to_string(),
            operation_id: String::new(),
        })
    }

    fn walk_fragment(
        &mut self,
        fragment: &'a ast::FragmentDefinition<'a>,
        source: String,
        file_path: &str,
    ) -> Result<Fragment> {
        let type_condition = fragment.type_condition.name;
        let on_type = self
            .schema
            .get_type(type_condition)
            .ok_or_else(|| Error::new(format!("Unknown type '{}'", type_condition), None))?;

        let fields = self.parse_selection_set(&fragment.selection_set, *on_type, &[])?;
        if fields.is_empty() {
            return Err(Error::new(
                format!(
                    "Fragment '{}' must have a selection of sub-fields",
                    fragment.name.name
                ),
                None,
            ));
        }

        let fragment_spreads = direct_spread_names(&fragment.selection_set);
        let mut inline_fragments = Vec::new();
        for selection in fragment.selection_set.selections.iter() {
            if let Selection::InlineFragment(inline) = selection {
                inline_fragments.push(self.parse_inline_fragment(
                    &fragment.selection_set,
                    inline,
                    &[],
                )?);
            }
        }
        let (fields, fragment_spreads, inline_fragments) =
            merge_same_type_inline_fragments(fields, fragment_spreads, inline_fragments, type_condition)?;

        let mut fragments_referenced = IndexSet::new();
        collect_spread_names(&fragment.selection_set, &mut fragments_referenced);

        Ok(Fragment {
            fragment_name: fragment.name.name.to_string(),
            type_condition: type_condition.to_string(),
            possible_types: self.possible_types(on_type),
            source,
            fields,
            fragment_spreads,
            inline_fragments,
            fragments_referenced: fragments_referenced.into_iter().collect(),
            file_path: file_path.to_string(),
        })
    }

    fn parse_variable(&mut self, definition: &ast::VariableDefinition<'a>) -> Result<Variable> {
        let type_name = definition.of_type.of_type().name;
        if self.schema.get_type(type_name).is_none() {
            return Err(Error::new(
                format!("Unknown variable type '{}'", type_name),
                None,
            ));
        }
        self.used_types.insert(type_name.to_string());
        Ok(Variable {
            name: definition.variable.name.to_string(),
            r#type: definition.of_type.to_string(),
        })
    }

    /// Parses the plain fields of one selection set against the schema type it
    /// selects on, merging selections that collapse to the same response name and
    /// injecting the synthetic leading `__typename` field.
    fn parse_selection_set(
        &mut self,
        selection_set: &'a ast::SelectionSet<'a>,
        parent_type: SchemaType<'a>,
        variables: &[Variable],
    ) -> Result<Vec<Field>> {
        let mut fields: Vec<Field> = Vec::new();
        for selection in selection_set.selections.iter() {
            if let Selection::Field(field) = selection {
                let parsed = self.parse_field(field, parent_type, variables)?;
                merge_field_into(&mut fields, parsed)?;
            }
        }
        if !selection_set.selections.is_empty() && !fields.iter().any(Field::is_typename) {
            fields.insert(0, Field::typename());
        }
        Ok(fields)
    }

    fn parse_field(
        &mut self,
        field: &'a ast::Field<'a>,
        parent_type: SchemaType<'a>,
        variables: &[Variable],
    ) -> Result<Field> {
        if field.name == "__typename" {
            return Ok(Field::typename());
        }

        let schema_field = self.lookup_field(parent_type, field.name)?;
        let type_name = schema_field.output_type.name();
        self.used_types.insert(type_name.to_string());

        let args = self.parse_arguments(&field.arguments, schema_field, field.name, variables)?;

        let mut fields = Vec::new();
        let mut fragment_spreads = Vec::new();
        let mut inline_fragments = Vec::new();
        if !field.selection_set.is_empty() {
            let field_type = self
                .schema
                .get_type(type_name)
                .ok_or_else(|| Error::new(format!("Unknown type '{}'", type_name), None))?;
            fields = self.parse_selection_set(&field.selection_set, *field_type, variables)?;
            fragment_spreads = direct_spread_names(&field.selection_set);
            for selection in field.selection_set.selections.iter() {
                if let Selection::InlineFragment(inline) = selection {
                    inline_fragments.push(self.parse_inline_fragment(
                        &field.selection_set,
                        inline,
                        variables,
                    )?);
                }
            }
            let merged = merge_same_type_inline_fragments(
                fields,
                fragment_spreads,
                inline_fragments,
                type_name,
            )?;
            fields = merged.0;
            fragment_spreads = merged.1;
            inline_fragments = merged.2;
        }

        let conditions = parse_conditions(&field.directives);

        Ok(Field {
            response_name: field.alias_or_name().to_string(),
            field_name: field.name.to_string(),
            r#type: schema_field.output_type.type_string(),
            args,
            is_conditional: !conditions.is_empty(),
            fields,
            fragment_spreads,
            inline_fragments,
            description: schema_field.description.map(|text| text.to_string()),
            is_deprecated: schema_field.is_deprecated,
            deprecation_reason: schema_field.deprecation_reason.map(|text| text.to_string()),
            conditions,
        })
    }

    /// Parses one inline fragment against its narrowed type.
    ///
    /// The plain fields of the parent selection set are forwarded into the
    /// narrowing first, so that selections shared between all branches appear
    /// inside each of them, and the inline fragment's own selections are unioned
    /// on top.
    fn parse_inline_fragment(
        &mut self,
        parent_set: &'a ast::SelectionSet<'a>,
        inline: &'a ast::InlineFragment<'a>,
        variables: &[Variable],
    ) -> Result<InlineFragment> {
        let type_condition = inline
            .type_condition
            .ok_or_else(|| {
                Error::new("Inline fragment without a type condition is not supported", None)
            })?
            .name;
        let on_type = self
            .schema
            .get_type(type_condition)
            .ok_or_else(|| Error::new(format!("Unknown type '{}'", type_condition), None))?;

        let forwarded = self.parse_selection_set(parent_set, *on_type, variables)?;
        let own = self.parse_selection_set(&inline.selection_set, *on_type, variables)?;
        let fields = union_fields(forwarded, own);
        if fields.is_empty() {
            return Err(Error::new(
                format!(
                    "Inline fragment on type '{}' must have a selection of sub-fields",
                    type_condition
                ),
                None,
            ));
        }

        Ok(InlineFragment {
            type_condition: type_condition.to_string(),
            possible_types: self.possible_types(on_type),
            fields,
            fragment_spreads: direct_spread_names(&inline.selection_set),
        })
    }

    fn parse_arguments(
        &mut self,
        arguments: &ast::Arguments<'a>,
        schema_field: &SchemaField<'a>,
        field_name: &str,
        variables: &[Variable],
    ) -> Result<Vec<Argument>> {
        arguments
            .children
            .iter()
            .map(|argument| {
                let schema_argument = schema_field.get_argument(argument.name).ok_or_else(|| {
                    Error::new(
                        format!("Unknown argument '{}' on field '{}'", argument.name, field_name),
                        None,
                    )
                })?;
                let argument_type = schema_argument.input_type.type_string();
                self.used_types
                    .insert(schema_argument.input_type.name().to_string());

                let value = match &argument.value {
                    ast::Value::Variable(variable) => {
                        let declared = variables
                            .iter()
                            .find(|declared| declared.name == variable.name)
                            .ok_or_else(|| {
                                Error::new(format!("Undefined variable '{}'", variable.name), None)
                            })?;
                        // A non-null variable may flow into a nullable position of
                        // the same base type
                        let compatible = declared.r#type == argument_type
                            || declared.r#type.strip_suffix('!') == Some(argument_type.as_str());
                        if !compatible {
                            return Err(Error::new(
                                format!(
                                    "Variable '{}' of type '{}' used in position expecting type '{}'",
                                    variable.name, declared.r#type, argument_type
                                ),
                                None,
                            ));
                        }
                        variable_reference(variable.name)
                    }
                    value => value.to_ir_value(),
                };

                Ok(Argument {
                    name: argument.name.to_string(),
                    r#type: argument_type,
                    value,
                })
            })
            .collect()
    }

    fn lookup_field(
        &self,
        parent_type: SchemaType<'a>,
        name: &str,
    ) -> Result<&'a SchemaField<'a>> {
        let field = match parent_type {
            SchemaType::Object(object) => object.get_field(name),
            SchemaType::Interface(interface) => interface.get_field(name),
            // Unions expose no fields of their own; everything except the meta
            // fields handled above must be selected behind a type condition
            SchemaType::Union(_) => None,
            _ => {
                return Err(Error::new(
                    format!(
                        "Can't query '{}' on type '{}'. '{}' is not one of the expected types: OBJECT, INTERFACE or UNION",
                        name,
                        parent_type.name(),
                        parent_type.name()
                    ),
                    None,
                ))
            }
        };
        field.ok_or_else(|| {
            Error::new(
                format!("Can't query '{}' on type '{}'", name, parent_type.name()),
                None,
            )
        })
    }

    fn possible_types(&self, schema_type: &SchemaType<'a>) -> Vec<String> {
        match schema_type {
            SchemaType::Interface(interface) => interface
                .get_possible_types()
                .iter()
                .map(|name| name.to_string())
                .collect(),
            SchemaType::Union(union_type) => union_type
                .get_possible_types()
                .iter()
                .map(|name| name.to_string())
                .collect(),
            other => vec![other.name().to_string()],
        }
    }
}

/// Interprets the `@skip`/`@include` directives on a field. Other directives are
/// ignored, as are conditions whose `if` argument isn't a variable.
fn parse_conditions(directives: &ast::Directives) -> Vec<Condition> {
    directives
        .children
        .iter()
        .filter_map(|directive| {
            let inverted = match directive.name {
                "skip" => true,
                "include" => false,
                _ => return None,
            };
            directive
                .arguments
                .children
                .iter()
                .find(|argument| argument.name == "if")
                .and_then(|argument| match &argument.value {
                    ast::Value::Variable(variable) => {
                        Some(Condition::boolean(variable.name, inverted))
                    }
                    _ => None,
                })
        })
        .collect()
}

/// The names of fragments spread directly within one selection set, in source order.
fn direct_spread_names(selection_set: &ast::SelectionSet) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for selection in selection_set.selections.iter() {
        if let Selection::FragmentSpread(spread) = selection {
            let name = spread.name.name.to_string();
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

/// The names of fragments spread anywhere below one selection set, in source order.
fn collect_spread_names(selection_set: &ast::SelectionSet, out: &mut IndexSet<String>) {
    for selection in selection_set.selections.iter() {
        match selection {
            Selection::FragmentSpread(spread) => {
                out.insert(spread.name.name.to_string());
            }
            Selection::Field(field) => collect_spread_names(&field.selection_set, out),
            Selection::InlineFragment(inline) => collect_spread_names(&inline.selection_set, out),
        }
    }
}

/// Merges a newly parsed field into a selection, enforcing that selections which
/// collapse to the same response name agree on their shape.
fn merge_field_into(fields: &mut Vec<Field>, other: Field) -> Result<()> {
    match fields
        .iter_mut()
        .find(|field| field.response_name == other.response_name)
    {
        Some(existing) => merge_field(existing, other),
        None => {
            fields.push(other);
            Ok(())
        }
    }
}

fn merge_field(field: &mut Field, other: Field) -> Result<()> {
    if field.field_name != other.field_name {
        return Err(conflict_error(&field.response_name, "schema names"));
    }
    if field.r#type != other.r#type {
        return Err(conflict_error(&field.response_name, "types"));
    }
    if !other.args.iter().all(|arg| field.args.contains(arg)) {
        return Err(conflict_error(&field.response_name, "arguments"));
    }
    if !other.fields.iter().all(|sub| field.fields.contains(sub)) {
        return Err(conflict_error(&field.response_name, "shapes"));
    }
    if !other
        .inline_fragments
        .iter()
        .all(|inline| field.inline_fragments.contains(inline))
    {
        return Err(conflict_error(&field.response_name, "shapes"));
    }
    for spread in other.fragment_spreads {
        if !field.fragment_spreads.contains(&spread) {
            field.fragment_spreads.push(spread);
        }
    }
    Ok(())
}

fn conflict_error(response_name: &str, what: &str) -> Error {
    Error::new(
        format!(
            "Fields '{}' conflict because they have different {}. Use different aliases on the fields.",
            response_name, what
        ),
        None,
    )
}

/// The union of two field lists, keyed by `responseName:fieldName` so that
/// differently aliased selections coexist. Matching fields keep the left entry
/// with their sub-selections unioned recursively.
fn union_fields(left: Vec<Field>, right: Vec<Field>) -> Vec<Field> {
    let mut result: Vec<Field> = Vec::with_capacity(left.len() + right.len());
    for mut field in left {
        if let Some(matching) = right
            .iter()
            .find(|other| selection_key(other) == selection_key(&field))
        {
            field.fields = union_fields(std::mem::take(&mut field.fields), matching.fields.clone());
        }
        result.push(field);
    }
    for other in right {
        if !result
            .iter()
            .any(|field| selection_key(field) == selection_key(&other))
        {
            result.push(other);
        }
    }
    result
}

fn selection_key(field: &Field) -> (&str, &str) {
    (&field.response_name, &field.field_name)
}

/// Folds inline fragments whose type condition equals the enclosing type back into
/// the primary selection, so that `... on X` inside a selection of type `X` adds
/// no redundant narrowing.
fn merge_same_type_inline_fragments(
    mut fields: Vec<Field>,
    mut fragment_spreads: Vec<String>,
    inline_fragments: Vec<InlineFragment>,
    parent_type_name: &str,
) -> Result<(Vec<Field>, Vec<String>, Vec<InlineFragment>)> {
    let mut remaining = Vec::new();
    for inline in inline_fragments {
        if inline.type_condition == parent_type_name {
            for field in inline.fields {
                merge_field_into(&mut fields, field)?;
            }
            for spread in inline.fragment_spreads {
                if !fragment_spreads.contains(&spread) {
                    fragment_spreads.push(spread);
                }
            }
        } else {
            remaining.push(inline);
        }
    }
    Ok((fields, fragment_spreads, remaining))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{BuildClientSchema, IntrospectionQuery};
    use serde_json::json;

    fn build_schema(ctx: &ASTContext) -> &Schema<'_> {
        let introspection_json = include_str!("../../fixture/introspection_query.json");
        let introspection: IntrospectionQuery = serde_json::from_str(introspection_json).unwrap();
        introspection.build_client_schema(ctx)
    }

    fn walk<'a>(ctx: &'a ASTContext, source: &str) -> Result<DocumentParseResult> {
        let schema = build_schema(ctx);
        DocumentWalker::new(schema)
            .walk_document(ctx, &DocumentSource::new("src/queries/Test.graphql", source))
    }

    fn response_names(fields: &[Field]) -> Vec<&str> {
        fields.iter().map(|field| field.response_name.as_str()).collect()
    }

    #[test]
    fn minimal_query() {
        let ctx = ASTContext::new();
        let result = walk(&ctx, "query Hello { me { name } }").unwrap();

        assert_eq!(result.operations.len(), 1);
        let operation = &result.operations[0];
        assert_eq!(operation.operation_name, "Hello");
        assert_eq!(operation.operation_type, OperationType::Query);
        assert_eq!(operation.source, "query Hello { me { name } }");
        assert_eq!(operation.file_path, "src/queries/Test.graphql");
        assert_eq!(operation.operation_id, "");

        // The injected __typename is dropped again at the operation root
        assert_eq!(response_names(&operation.fields), vec!["me"]);
        let me = &operation.fields[0];
        assert_eq!(me.field_name, "me");
        assert_eq!(me.r#type, "User!");
        assert_eq!(me.description.as_deref(), Some("The currently authenticated user"));
        assert_eq!(response_names(&me.fields), vec!["__typename", "name"]);
        assert_eq!(me.fields[0].r#type, "String!");

        assert!(result.used_types.contains("User"));
        assert!(result.used_types.contains("String"));
    }

    #[test]
    fn explicit_typename_is_kept() {
        let ctx = ASTContext::new();
        let result = walk(&ctx, "query Meta { __typename me { name __typename } }").unwrap();
        let operation = &result.operations[0];
        assert_eq!(response_names(&operation.fields), vec!["__typename", "me"]);
        // Written mid-selection it stays where it was written, exactly once
        assert_eq!(
            response_names(&operation.fields[1].fields),
            vec!["name", "__typename"]
        );
    }

    #[test]
    fn anonymous_operations_are_rejected() {
        let ctx = ASTContext::new();
        let error = walk(&ctx, "{ me { name } }").unwrap_err();
        assert_eq!(error.message(), "Anonymous operations are not supported");
    }

    #[test]
    fn subscriptions_need_a_root() {
        let ctx = ASTContext::new();
        let error = walk(&ctx, "subscription Events { me { name } }").unwrap_err();
        assert_eq!(
            error.message(),
            "Schema is not configured for subscription operations"
        );
    }

    #[test]
    fn variables_resolve_and_type_check() {
        let ctx = ASTContext::new();
        let result = walk(&ctx, "query X($id: ID!) { user(id: $id) { id } }").unwrap();
        let operation = &result.operations[0];
        assert_eq!(
            operation.variables,
            vec![Variable {
                name: "id".to_string(),
                r#type: "ID!".to_string(),
            }]
        );
        let user = &operation.fields[0];
        assert_eq!(user.args.len(), 1);
        assert_eq!(user.args[0].r#type, "ID!");
        assert_eq!(
            user.args[0].value,
            json!({ "kind": "Variable", "variableName": "id" })
        );
        assert!(result.used_types.contains("ID"));
    }

    #[test]
    fn variable_type_mismatch() {
        let ctx = ASTContext::new();
        let error = walk(&ctx, "query X($id: String!) { user(id: $id) { id } }").unwrap_err();
        assert_eq!(
            error.message(),
            "Variable 'id' of type 'String!' used in position expecting type 'ID!'"
        );
    }

    #[test]
    fn nonnull_variable_at_nullable_position() {
        let ctx = ASTContext::new();
        walk(&ctx, "query H($e: Episode!) { hero(episode: $e) { name } }").unwrap();
        walk(&ctx, "query H($e: Episode) { hero(episode: $e) { name } }").unwrap();
        let error =
            walk(&ctx, "query H($e: String) { hero(episode: $e) { name } }").unwrap_err();
        assert_eq!(
            error.message(),
            "Variable 'e' of type 'String' used in position expecting type 'Episode'"
        );
    }

    #[test]
    fn undefined_variable() {
        let ctx = ASTContext::new();
        let error = walk(&ctx, "query V { user(id: $id) { id } }").unwrap_err();
        assert_eq!(error.message(), "Undefined variable 'id'");
    }

    #[test]
    fn unknown_variable_type() {
        let ctx = ASTContext::new();
        let error = walk(&ctx, "query V($x: Junk) { me { name } }").unwrap_err();
        assert_eq!(error.message(), "Unknown variable type 'Junk'");
    }

    #[test]
    fn unknown_argument() {
        let ctx = ASTContext::new();
        let error = walk(&ctx, "query A { user(handle: \"x\") { id } }").unwrap_err();
        assert_eq!(error.message(), "Unknown argument 'handle' on field 'user'");
    }

    #[test]
    fn unknown_field() {
        let ctx = ASTContext::new();
        let error = walk(&ctx, "query F { me { nope } }").unwrap_err();
        assert_eq!(error.message(), "Can't query 'nope' on type 'User'");
    }

    #[test]
    fn fields_on_leaf_types_are_rejected() {
        let ctx = ASTContext::new();
        let error = walk(&ctx, "query F { me { name { length } } }").unwrap_err();
        assert_eq!(
            error.message(),
            "Can't query 'length' on type 'String'. 'String' is not one of the expected types: OBJECT, INTERFACE or UNION"
        );
    }

    #[test]
    fn union_fields_require_type_conditions() {
        let ctx = ASTContext::new();
        let error = walk(&ctx, "query S { search(text: \"a\") { name } }").unwrap_err();
        assert_eq!(error.message(), "Can't query 'name' on type 'SearchResult'");
    }

    #[test]
    fn alias_conflicts_are_detected() {
        let ctx = ASTContext::new();
        let error = walk(
            &ctx,
            "query A { a: user(id: \"1\") { id } a: user(id: \"2\") { id } }",
        )
        .unwrap_err();
        assert_eq!(
            error.message(),
            "Fields 'a' conflict because they have different arguments. Use different aliases on the fields."
        );

        let error = walk(&ctx, "query B { me { a: name a: email } }").unwrap_err();
        assert_eq!(
            error.message(),
            "Fields 'a' conflict because they have different schema names. Use different aliases on the fields."
        );
    }

    #[test]
    fn aliased_duplicates_coexist() {
        let ctx = ASTContext::new();
        let result = walk(
            &ctx,
            "query A { one: user(id: \"1\") { id } two: user(id: \"2\") { id } }",
        )
        .unwrap();
        assert_eq!(response_names(&result.operations[0].fields), vec!["one", "two"]);
    }

    #[test]
    fn identical_duplicate_selections_merge() {
        let ctx = ASTContext::new();
        let result = walk(&ctx, "query D { me { name } me { name } }").unwrap();
        let me = &result.operations[0].fields[0];
        assert_eq!(response_names(&result.operations[0].fields), vec!["me"]);
        assert_eq!(response_names(&me.fields), vec!["__typename", "name"]);
    }

    #[test]
    fn duplicate_selections_with_different_shapes_conflict() {
        let ctx = ASTContext::new();
        let error = walk(&ctx, "query D { me { name } me { email } }").unwrap_err();
        assert_eq!(
            error.message(),
            "Fields 'me' conflict because they have different shapes. Use different aliases on the fields."
        );
    }

    #[test]
    fn same_type_inline_fragment_merges_into_field() {
        let ctx = ASTContext::new();
        let result = walk(&ctx, "query N { node(id: \"4\") { id ... on Node { name } } }").unwrap();
        let node = &result.operations[0].fields[0];
        assert_eq!(node.r#type, "Node");
        assert_eq!(response_names(&node.fields), vec!["__typename", "id", "name"]);
        assert!(node.inline_fragments.is_empty());
    }

    #[test]
    fn narrowing_inline_fragment_forwards_parent_fields() {
        let ctx = ASTContext::new();
        let result = walk(
            &ctx,
            "query N { node(id: \"4\") { id ... on Post { title } } }",
        )
        .unwrap();
        let node = &result.operations[0].fields[0];
        assert_eq!(response_names(&node.fields), vec!["__typename", "id"]);
        assert_eq!(node.inline_fragments.len(), 1);
        let narrowed = &node.inline_fragments[0];
        assert_eq!(narrowed.type_condition, "Post");
        assert_eq!(narrowed.possible_types, vec!["Post"]);
        // The parent's selections are forwarded into the narrowing
        assert_eq!(
            response_names(&narrowed.fields),
            vec!["__typename", "id", "title"]
        );
    }

    #[test]
    fn union_narrowing() {
        let ctx = ASTContext::new();
        let result = walk(
            &ctx,
            "query S { search(text: \"x\") { ... on User { name } ... on Post { title } } }",
        )
        .unwrap();
        let search = &result.operations[0].fields[0];
        assert_eq!(search.r#type, "[SearchResult!]");
        assert_eq!(response_names(&search.fields), vec!["__typename"]);
        assert_eq!(search.inline_fragments.len(), 2);
        assert_eq!(search.inline_fragments[0].type_condition, "User");
        assert_eq!(search.inline_fragments[1].type_condition, "Post");
    }

    #[test]
    fn skip_and_include_conditions() {
        let ctx = ASTContext::new();
        let result = walk(
            &ctx,
            "query C($all: Boolean!) { me { name @skip(if: $all) email @include(if: $all) birthday @deprecated } }",
        )
        .unwrap();
        let me = &result.operations[0].fields[0];
        let name = &me.fields[1];
        assert!(name.is_conditional);
        assert_eq!(name.conditions, vec![Condition::boolean("all", true)]);
        let email = &me.fields[2];
        assert!(email.is_conditional);
        assert_eq!(email.conditions, vec![Condition::boolean("all", false)]);
        assert!(email.is_deprecated);
        assert_eq!(email.deprecation_reason.as_deref(), Some("Use contact instead"));
        // Unrecognised directives are ignored
        let birthday = &me.fields[3];
        assert!(!birthday.is_conditional);
        assert!(birthday.conditions.is_empty());
    }

    #[test]
    fn literal_arguments_convert() {
        let ctx = ASTContext::new();
        let result = walk(
            &ctx,
            "mutation R($e: Episode) { createReview(episode: $e, review: { stars: 5, commentary: \"ok\" }) { stars } }",
        )
        .unwrap();
        let operation = &result.operations[0];
        assert_eq!(operation.operation_type, OperationType::Mutation);
        let review = &operation.fields[0];
        assert_eq!(review.args[1].r#type, "ReviewInput!");
        assert_eq!(
            review.args[1].value,
            json!({ "stars": 5.0, "commentary": "ok" })
        );
        assert!(result.used_types.contains("ReviewInput"));
        assert!(result.used_types.contains("Episode"));
    }

    #[test]
    fn fragment_on_object() {
        let ctx = ASTContext::new();
        let result = walk(&ctx, "fragment UserBits on User { name ...ContactBits }").unwrap();
        let fragment = &result.fragments[0];
        assert_eq!(fragment.fragment_name, "UserBits");
        assert_eq!(fragment.type_condition, "User");
        assert_eq!(fragment.possible_types, vec!["User"]);
        assert_eq!(response_names(&fragment.fields), vec!["__typename", "name"]);
        assert_eq!(fragment.fragment_spreads, vec!["ContactBits"]);
        assert_eq!(fragment.fragments_referenced, vec!["ContactBits"]);
        assert_eq!(fragment.source, "fragment UserBits on User { name ...ContactBits }");
    }

    #[test]
    fn fragment_on_interface_and_union() {
        let ctx = ASTContext::new();
        let result = walk(&ctx, "fragment NodeBits on Node { id }").unwrap();
        assert_eq!(result.fragments[0].possible_types, vec!["User", "Post"]);

        let result = walk(&ctx, "fragment Hit on SearchResult { __typename }").unwrap();
        assert_eq!(result.fragments[0].possible_types, vec!["User", "Post"]);
    }

    #[test]
    fn fragment_with_same_type_inline_fragment() {
        let ctx = ASTContext::new();
        let result =
            walk(&ctx, "fragment UserBits on User { id ... on User { name } }").unwrap();
        let fragment = &result.fragments[0];
        assert_eq!(
            response_names(&fragment.fields),
            vec!["__typename", "id", "name"]
        );
        assert!(fragment.inline_fragments.is_empty());
    }

    #[test]
    fn fragment_on_unknown_type() {
        let ctx = ASTContext::new();
        let error = walk(&ctx, "fragment F on Junk { x }").unwrap_err();
        assert_eq!(error.message(), "Unknown type 'Junk'");
    }

    #[test]
    fn nested_spreads_are_collected() {
        let ctx = ASTContext::new();
        let result = walk(
            &ctx,
            "query Feed { ...TopBits me { friends { ...FriendBits } } }",
        )
        .unwrap();
        assert_eq!(
            result.operations[0].fragments_referenced,
            vec!["TopBits", "FriendBits"]
        );
    }

    #[test]
    fn union_fields_helper() {
        let left = vec![Field::typename()];
        let mut named = Field::typename();
        named.response_name = "name".to_string();
        named.field_name = "name".to_string();
        let right = vec![Field::typename(), named.clone()];
        let unioned = union_fields(left, right);
        assert_eq!(
            unioned
                .iter()
                .map(|field| field.response_name.as_str())
                .collect::<Vec<_>>(),
            vec!["__typename", "name"]
        );
    }
}
