use super::ast::*;
use super::lexer::{Extras, Token};
use crate::error::{get_location, Error, ErrorType, Result};
use bumpalo::collections::Vec;
use logos::{Lexer, Logos};

/// Why the parser rejected the input at the current token.
enum Reject {
    /// A production needed something other than the token in the lookahead.
    Expected(&'static str),
    /// A complete document was followed by a token that cannot start a
    /// definition.
    UnsupportedToken,
}

type Progress<T> = std::result::Result<T, Reject>;

/// A recursive descent parser over the token stream of one document.
///
/// Each grammar production is one method returning [Progress]; the entry point
/// attaches the source location of the offending token once, when a production
/// fails. All nodes are allocated on the context's arena.
struct Parser<'a> {
    arena: &'a bumpalo::Bump,
    tokens: Lexer<'a, Token<'a>>,
    lookahead: Option<Token<'a>>,
    in_default_value: bool,
}

impl<'a> Parser<'a> {
    fn new(ctx: &'a ASTContext, source: &'a str) -> Self {
        Parser {
            arena: &ctx.arena,
            tokens: Token::lexer_with_extras(source, Extras { arena: &ctx.arena }),
            lookahead: None,
            in_default_value: false,
        }
    }

    /// Takes the next token, either from the lookahead or the lexer.
    fn advance(&mut self) -> Token<'a> {
        let tokens = &mut self.tokens;
        self.lookahead
            .take()
            .unwrap_or_else(|| tokens.next().unwrap_or(Token::End))
    }

    /// The next token, without consuming it.
    fn peek(&mut self) -> &Token<'a> {
        let tokens = &mut self.tokens;
        self.lookahead
            .get_or_insert_with(|| tokens.next().unwrap_or(Token::End))
    }

    fn expect(&mut self, token: Token<'a>, description: &'static str) -> Progress<()> {
        if self.advance() == token {
            Ok(())
        } else {
            Err(Reject::Expected(description))
        }
    }

    fn expect_name(&mut self, description: &'static str) -> Progress<&'a str> {
        match self.advance() {
            Token::Name(name) => Ok(name),
            _ => Err(Reject::Expected(description)),
        }
    }

    fn document(&mut self) -> Progress<Document<'a>> {
        let mut definitions = Vec::new_in(self.arena);
        let mut definition_spans = Vec::new_in(self.arena);
        loop {
            // The lexer rests on the peeked token here, so its span marks where
            // the definition starts; once a definition is accepted the lexer
            // rests on the definition's last token
            match self.peek() {
                Token::End => break,
                Token::Name("fragment") => {
                    let start = self.tokens.span().start;
                    definitions.push(Definition::Fragment(self.fragment_definition()?));
                    definition_spans.push(start..self.tokens.span().end);
                }
                Token::BraceOpen | Token::Name("query" | "mutation" | "subscription") => {
                    let start = self.tokens.span().start;
                    definitions.push(Definition::Operation(self.operation_definition()?));
                    definition_spans.push(start..self.tokens.span().end);
                }
                _ => return Err(Reject::UnsupportedToken),
            }
        }
        Ok(Document {
            definitions,
            definition_spans,
        })
    }

    fn operation_definition(&mut self) -> Progress<OperationDefinition<'a>> {
        // The query-shorthand form is just a brace-enclosed selection set
        if let Token::BraceOpen = self.peek() {
            return Ok(OperationDefinition {
                operation: OperationKind::Query,
                name: None,
                variable_definitions: VariableDefinitions {
                    children: Vec::new_in(self.arena),
                },
                directives: Directives {
                    children: Vec::new_in(self.arena),
                },
                selection_set: self.selection_set()?,
            });
        }
        let operation = match self.advance() {
            Token::Name("query") => OperationKind::Query,
            Token::Name("mutation") => OperationKind::Mutation,
            Token::Name("subscription") => OperationKind::Subscription,
            _ => return Err(Reject::Expected("an operation keyword")),
        };
        let name = match self.peek() {
            Token::Name(name) => {
                let name = *name;
                self.advance();
                Some(NamedType { name })
            }
            _ => None,
        };
        let variable_definitions = self.variable_definitions()?;
        let directives = self.directives()?;
        let selection_set = self.selection_set()?;
        Ok(OperationDefinition {
            operation,
            name,
            variable_definitions,
            directives,
            selection_set,
        })
    }

    fn fragment_definition(&mut self) -> Progress<FragmentDefinition<'a>> {
        self.expect(Token::Name("fragment"), "the fragment keyword")?;
        let name = self.expect_name("a fragment name")?;
        self.expect(Token::Name("on"), "the 'on' keyword of the type condition")?;
        let type_condition = self.expect_name("a type condition")?;
        let directives = self.directives()?;
        let selection_set = self.selection_set()?;
        Ok(FragmentDefinition {
            name: NamedType { name },
            type_condition: NamedType {
                name: type_condition,
            },
            directives,
            selection_set,
        })
    }

    fn variable_definitions(&mut self) -> Progress<VariableDefinitions<'a>> {
        let mut children = Vec::new_in(self.arena);
        if let Token::ParenOpen = self.peek() {
            self.advance();
            while !matches!(self.peek(), Token::ParenClose) {
                children.push(self.variable_definition()?);
            }
            self.advance();
        }
        Ok(VariableDefinitions { children })
    }

    fn variable_definition(&mut self) -> Progress<VariableDefinition<'a>> {
        let variable = match self.advance() {
            Token::VariableName(name) => Variable { name },
            _ => return Err(Reject::Expected("a variable name")),
        };
        self.expect(Token::Colon, "a colon after the variable name")?;
        let of_type = self.type_reference()?;
        let default_value = if let Token::Equals = self.peek() {
            self.advance();
            self.in_default_value = true;
            let value = self.value();
            self.in_default_value = false;
            value?
        } else {
            Value::Null
        };
        let directives = self.directives()?;
        Ok(VariableDefinition {
            variable,
            of_type,
            default_value,
            directives,
        })
    }

    fn type_reference(&mut self) -> Progress<Type<'a>> {
        let base = match self.advance() {
            Token::Name(name) => Type::NamedType(NamedType { name }),
            Token::BracketOpen => {
                let inner = self.type_reference()?;
                self.expect(Token::BracketClose, "a closing bracket on the list type")?;
                Type::ListType(self.arena.alloc(inner))
            }
            _ => return Err(Reject::Expected("a type reference")),
        };
        if let Token::Bang = self.peek() {
            self.advance();
            Ok(Type::NonNullType(self.arena.alloc(base)))
        } else {
            Ok(base)
        }
    }

    /// A brace-enclosed selection set with at least one selection.
    fn selection_set(&mut self) -> Progress<SelectionSet<'a>> {
        self.expect(Token::BraceOpen, "a brace-enclosed selection set")?;
        let mut selections = Vec::new_in(self.arena);
        loop {
            selections.push(self.selection()?);
            if let Token::BraceClose = self.peek() {
                self.advance();
                break;
            }
        }
        Ok(SelectionSet { selections })
    }

    /// A field's selection set, which may be absent entirely.
    fn optional_selection_set(&mut self) -> Progress<SelectionSet<'a>> {
        if let Token::BraceOpen = self.peek() {
            self.selection_set()
        } else {
            Ok(SelectionSet {
                selections: Vec::new_in(self.arena),
            })
        }
    }

    fn selection(&mut self) -> Progress<Selection<'a>> {
        match self.peek() {
            Token::Name(_) => self.field().map(Selection::Field),
            Token::Spread => {
                self.advance();
                match self.peek() {
                    Token::Name("on") | Token::BraceOpen | Token::DirectiveName(_) => {
                        self.inline_fragment().map(Selection::InlineFragment)
                    }
                    Token::Name(_) => self.fragment_spread().map(Selection::FragmentSpread),
                    _ => Err(Reject::Expected("a fragment spread or an inline fragment")),
                }
            }
            _ => Err(Reject::Expected("a field or fragment selection")),
        }
    }

    fn field(&mut self) -> Progress<Field<'a>> {
        let first = self.expect_name("a field name")?;
        let (alias, name) = if let Token::Colon = self.peek() {
            self.advance();
            (Some(first), self.expect_name("a field name after its alias")?)
        } else {
            (None, first)
        };
        let arguments = self.arguments()?;
        let directives = self.directives()?;
        let selection_set = self.optional_selection_set()?;
        Ok(Field {
            alias,
            name,
            arguments,
            directives,
            selection_set,
        })
    }

    /// A fragment spread, entered with the `...` already consumed.
    fn fragment_spread(&mut self) -> Progress<FragmentSpread<'a>> {
        let name = self.expect_name("a fragment name")?;
        let directives = self.directives()?;
        Ok(FragmentSpread {
            name: NamedType { name },
            directives,
        })
    }

    /// An inline fragment, entered with the `...` already consumed.
    fn inline_fragment(&mut self) -> Progress<InlineFragment<'a>> {
        let type_condition = if let Token::Name("on") = self.peek() {
            self.advance();
            Some(NamedType {
                name: self.expect_name("a type condition")?,
            })
        } else {
            None
        };
        let directives = self.directives()?;
        let selection_set = self.selection_set()?;
        Ok(InlineFragment {
            type_condition,
            directives,
            selection_set,
        })
    }

    fn arguments(&mut self) -> Progress<Arguments<'a>> {
        let mut children = Vec::new_in(self.arena);
        if let Token::ParenOpen = self.peek() {
            self.advance();
            while !matches!(self.peek(), Token::ParenClose) {
                let name = self.expect_name("an argument name")?;
                self.expect(Token::Colon, "a colon after the argument name")?;
                children.push(Argument {
                    name,
                    value: self.value()?,
                });
            }
            self.advance();
        }
        Ok(Arguments { children })
    }

    fn directives(&mut self) -> Progress<Directives<'a>> {
        let mut children = Vec::new_in(self.arena);
        while let Token::DirectiveName(name) = self.peek() {
            let name = *name;
            self.advance();
            children.push(Directive {
                name,
                arguments: self.arguments()?,
            });
        }
        Ok(Directives { children })
    }

    fn value(&mut self) -> Progress<Value<'a>> {
        match self.advance() {
            // A default value must be constant and cannot name other variables
            Token::VariableName(_) if self.in_default_value => {
                Err(Reject::Expected("a constant default value"))
            }
            Token::VariableName(name) => Ok(Value::Variable(Variable { name })),
            Token::IntLiteral(value) => Ok(Value::Int(IntValue { value })),
            Token::FloatLiteral(value) => Ok(Value::Float(FloatValue { value })),
            Token::StringLiteral(value) => Ok(Value::String(StringValue { value })),
            Token::Name("null") => Ok(Value::Null),
            Token::Name("true") => Ok(Value::Boolean(BooleanValue { value: true })),
            Token::Name("false") => Ok(Value::Boolean(BooleanValue { value: false })),
            Token::Name(value) => Ok(Value::Enum(EnumValue { value })),
            Token::BracketOpen => self.list_value(),
            Token::BraceOpen => self.object_value(),
            _ => Err(Reject::Expected("a value")),
        }
    }

    /// A list value, entered with the opening bracket already consumed.
    fn list_value(&mut self) -> Progress<Value<'a>> {
        let mut children = Vec::new_in(self.arena);
        while !matches!(self.peek(), Token::BracketClose) {
            children.push(self.value()?);
        }
        self.advance();
        Ok(Value::List(ListValue { children }))
    }

    /// An input object value, entered with the opening brace already consumed.
    fn object_value(&mut self) -> Progress<Value<'a>> {
        let mut children = Vec::new_in(self.arena);
        while !matches!(self.peek(), Token::BraceClose) {
            let name = self.expect_name("an object field name")?;
            self.expect(Token::Colon, "a colon after the object field name")?;
            children.push(ObjectField {
                name,
                value: self.value()?,
            });
        }
        self.advance();
        Ok(Value::Object(ObjectValue { children }))
    }
}

impl<'a> Document<'a> {
    /// Parses a source text into a [Document] allocated on the context's arena.
    ///
    /// On failure the returned error carries the line and column of the token
    /// the parser stopped at. A document followed by leftover tokens fails with
    /// an `Unsupported token` error.
    pub fn parse<S: ToString>(ctx: &'a ASTContext, source: S) -> Result<&'a Document<'a>> {
        let source = ctx.alloc_string(source.to_string());
        let mut parser = Parser::new(ctx, source);
        match parser.document() {
            Ok(document) => Ok(ctx.alloc(document)),
            Err(reject) => {
                let message = match reject {
                    Reject::Expected(what) => format!("Expected {}", what),
                    Reject::UnsupportedToken => {
                        format!("Unsupported token '{}'", parser.tokens.slice())
                    }
                };
                Err(Error::new_with_location(
                    message,
                    get_location(source, parser.tokens.span()),
                    Some(ErrorType::Syntax),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::ast::*;
    use crate::error::Location;

    fn parse<'a>(ctx: &'a ASTContext, source: &str) -> &'a Document<'a> {
        Document::parse(ctx, source).unwrap()
    }

    fn parse_error(source: &str) -> crate::error::Error {
        let ctx = ASTContext::new();
        Document::parse(&ctx, source).unwrap_err()
    }

    fn only_operation<'a>(document: &'a Document<'a>) -> &'a OperationDefinition<'a> {
        assert_eq!(document.definitions.len(), 1);
        document.definitions[0].operation().unwrap()
    }

    #[test]
    fn operation_keywords() {
        let ctx = ASTContext::new();
        let operation = only_operation(parse(&ctx, "query Feed { items }"));
        assert_eq!(operation.operation, OperationKind::Query);
        assert_eq!(operation.name, Some(NamedType { name: "Feed" }));

        let operation = only_operation(parse(&ctx, "mutation Save { items }"));
        assert_eq!(operation.operation, OperationKind::Mutation);

        let operation = only_operation(parse(&ctx, "subscription Watch { items }"));
        assert_eq!(operation.operation, OperationKind::Subscription);
    }

    #[test]
    fn query_shorthand() {
        let ctx = ASTContext::new();
        let operation = only_operation(parse(&ctx, "{ items }"));
        assert_eq!(operation.operation, OperationKind::Query);
        assert_eq!(operation.name, None);
        assert!(operation.variable_definitions.is_empty());
        assert!(operation.directives.is_empty());
        assert_eq!(operation.selection_set.selections.len(), 1);
    }

    #[test]
    fn fields_with_aliases_arguments_and_directives() {
        let ctx = ASTContext::new();
        let operation = only_operation(parse(
            &ctx,
            r#"query Q { posts: feed(first: 2, after: "cursor") @include(if: $more) { id } }"#,
        ));
        let field = operation.selection_set.selections[0].field().unwrap();
        assert_eq!(field.alias, Some("posts"));
        assert_eq!(field.name, "feed");
        assert_eq!(field.alias_or_name(), "posts");

        assert_eq!(field.arguments.children.len(), 2);
        assert_eq!(field.arguments.children[0].name, "first");
        assert_eq!(
            field.arguments.children[0].value,
            Value::Int(IntValue { value: "2" })
        );
        assert_eq!(
            field.arguments.children[1].value,
            Value::String(StringValue { value: "cursor" })
        );

        assert_eq!(field.directives.children.len(), 1);
        let directive = &field.directives.children[0];
        assert_eq!(directive.name, "include");
        assert_eq!(
            directive.arguments.children[0].value,
            Value::Variable(Variable { name: "more" })
        );

        let child = field.selection_set.selections[0].field().unwrap();
        assert_eq!(child.name, "id");
        assert!(child.selection_set.is_empty());
    }

    #[test]
    fn value_literals() {
        let ctx = ASTContext::new();
        let operation = only_operation(parse(
            &ctx,
            r#"{ f(a: null, b: true, c: false, d: MOBILE, e: [1, 2.5], g: { nested: "text" }) }"#,
        ));
        let arguments = &operation.selection_set.selections[0]
            .field()
            .unwrap()
            .arguments
            .children;
        assert_eq!(arguments[0].value, Value::Null);
        assert_eq!(arguments[1].value, Value::Boolean(BooleanValue { value: true }));
        assert_eq!(arguments[2].value, Value::Boolean(BooleanValue { value: false }));
        assert_eq!(arguments[3].value, Value::Enum(EnumValue { value: "MOBILE" }));
        match &arguments[4].value {
            Value::List(list) => {
                assert_eq!(list.children.len(), 2);
                assert_eq!(list.children[0], Value::Int(IntValue { value: "1" }));
                assert_eq!(list.children[1], Value::Float(FloatValue { value: "2.5" }));
            }
            other => panic!("expected a list value, got {:?}", other),
        }
        match &arguments[5].value {
            Value::Object(object) => {
                assert_eq!(object.children.len(), 1);
                assert_eq!(object.children[0].name, "nested");
                assert_eq!(
                    object.children[0].value,
                    Value::String(StringValue { value: "text" })
                );
            }
            other => panic!("expected an object value, got {:?}", other),
        }
    }

    #[test]
    fn fragment_definitions_and_spreads() {
        let ctx = ASTContext::new();
        let document = parse(
            &ctx,
            "fragment Bits on User { id ...More ... on Friend { name } ... { tag } }",
        );
        let fragment = document.definitions[0].fragment().unwrap();
        assert_eq!(fragment.name.name, "Bits");
        assert_eq!(fragment.type_condition.name, "User");

        let selections = &fragment.selection_set.selections;
        assert_eq!(selections.len(), 4);
        assert_eq!(selections[0].field().unwrap().name, "id");
        assert_eq!(selections[1].fragment_spread().unwrap().name.name, "More");
        let narrowed = selections[2].inline_fragment().unwrap();
        assert_eq!(narrowed.type_condition, Some(NamedType { name: "Friend" }));
        let bare = selections[3].inline_fragment().unwrap();
        assert_eq!(bare.type_condition, None);
    }

    #[test]
    fn inline_fragment_with_directives_only() {
        let ctx = ASTContext::new();
        let operation = only_operation(parse(&ctx, "{ ... @include(if: $x) { id } }"));
        let inline = operation.selection_set.selections[0]
            .inline_fragment()
            .unwrap();
        assert_eq!(inline.type_condition, None);
        assert_eq!(inline.directives.children[0].name, "include");
    }

    #[test]
    fn variable_definitions_and_types() {
        let ctx = ASTContext::new();
        let operation = only_operation(parse(
            &ctx,
            "query Q($a: [Int!]!, $b: [[ID]], $limit: Int = 10 @lowered) { items }",
        ));
        let definitions = &operation.variable_definitions.children;
        assert_eq!(definitions.len(), 3);

        assert_eq!(definitions[0].variable.name, "a");
        assert_eq!(definitions[0].of_type.to_string(), "[Int!]!");
        assert_eq!(definitions[0].of_type.of_type().name, "Int");
        assert_eq!(definitions[0].default_value, Value::Null);

        assert_eq!(definitions[1].of_type.to_string(), "[[ID]]");
        assert_eq!(definitions[1].of_type.of_type().name, "ID");

        assert_eq!(
            definitions[2].default_value,
            Value::Int(IntValue { value: "10" })
        );
        assert_eq!(definitions[2].directives.children[0].name, "lowered");
    }

    #[test]
    fn default_values_must_be_constant() {
        let error = parse_error("query Q($a: Int = $b) { items }");
        assert_eq!(error.message(), "Expected a constant default value");

        let error = parse_error("query Q($a: [Int] = [$b]) { items }");
        assert_eq!(error.message(), "Expected a constant default value");
    }

    #[test]
    fn definition_spans_slice_sources() {
        let ctx = ASTContext::new();
        let source = "query A { fieldA }\n\nfragment B on SomeType { fieldB }";
        let document = parse(&ctx, source);
        assert_eq!(document.definitions.len(), 2);
        let first = &document.definition_spans[0];
        let second = &document.definition_spans[1];
        assert_eq!(&source[first.start..first.end], "query A { fieldA }");
        assert_eq!(
            &source[second.start..second.end],
            "fragment B on SomeType { fieldB }"
        );
    }

    #[test]
    fn trailing_tokens_are_unsupported() {
        let error = parse_error("query Test { field } }");
        assert_eq!(error.message(), "Unsupported token '}'");

        let error = parse_error("{ field } stray");
        assert_eq!(error.message(), "Unsupported token 'stray'");

        let error = parse_error("query Test { field } %");
        assert_eq!(error.message(), "Unsupported token '%'");
    }

    #[test]
    fn empty_and_missing_selection_sets_are_rejected() {
        let error = parse_error("query Q { }");
        assert_eq!(error.message(), "Expected a field or fragment selection");

        let error = parse_error("query Q");
        assert_eq!(error.message(), "Expected a brace-enclosed selection set");

        let error = parse_error("fragment Loose on User");
        assert_eq!(error.message(), "Expected a brace-enclosed selection set");
    }

    #[test]
    fn error_locations() {
        let error = parse_error("query { me { $ } }");
        assert_eq!(
            *error.location(),
            Some(Location {
                line: 1,
                column: 13
            })
        );

        let error = parse_error("query Broken {\n  me {\n    $\n  }\n}");
        assert_eq!(*error.location(), Some(Location { line: 3, column: 4 }));
    }
}
