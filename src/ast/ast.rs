use std::fmt;

/// A context for a GraphQL document which holds an arena allocator.
///
/// For the duration of parsing and walking a document it's performant and
/// convenient to allocate memory in one chunk for the syntax tree's nodes. This
/// context represents the lifetime of a parsed document and its derivatives.
///
/// Once the IR for a set of documents has been generated the entire allocated
/// memory can be dropped at once. It's hence inadvisable to reuse one context
/// across unrelated code generation runs.
pub struct ASTContext {
    /// An arena allocator that holds the memory allocated for the AST Context's lifetime
    pub arena: bumpalo::Bump,
}

impl ASTContext {
    /// Create a new AST context with a preallocated arena.
    pub fn new() -> Self {
        let arena = bumpalo::Bump::new();
        ASTContext { arena }
    }

    /// Put the value of `item` onto the arena and return a reference to it.
    #[inline]
    pub fn alloc<T>(&self, item: T) -> &T {
        self.arena.alloc(item)
    }

    /// Allocate an `&str` slice onto the arena and return a reference to it.
    ///
    /// This is useful when the original slice has an undefined lifetime.
    #[inline]
    pub fn alloc_str(&self, str: &str) -> &str {
        self.arena.alloc_str(str)
    }

    /// Puts a `String` onto the arena and returns a reference to it to tie the `String`'s lifetime
    /// to this AST context without reallocating or copying it.
    #[inline]
    pub fn alloc_string(&self, str: String) -> &str {
        self.arena.alloc(str)
    }
}

impl Default for ASTContext {
    fn default() -> Self {
        Self::new()
    }
}

/// AST Node of a boolean value
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Boolean-Value)
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct BooleanValue {
    pub value: bool,
}

/// AST Node of a variable identifier value.
///
/// These are identifiers prefixed with a `$` sign, typically in variable definitions.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Language.Variables)
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Variable<'a> {
    pub name: &'a str,
}

/// AST Node of an enum value.
///
/// These are typically written in all caps and snake case, e.g. "`MOBILE_WEB`".
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Enum-Value)
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct EnumValue<'a> {
    pub value: &'a str,
}

/// AST Node of an integer value.
///
/// Integers in GraphQL are limited to 32-bit signed, non-fractional values.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Int)
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct IntValue<'a> {
    pub value: &'a str,
}

/// AST Node of a floating point value.
///
/// Floats in GraphQL are signed, double precision values as defined by
/// [IEEE 754](https://en.wikipedia.org/wiki/IEEE_754), limited to finite values.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Float)
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct FloatValue<'a> {
    pub value: &'a str,
}

/// AST Node of a string value.
///
/// GraphQL has a number of escaped characters that are normalised away when parsing and
/// hence this `value` is expected to not contain escaped characters.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-String)
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct StringValue<'a> {
    pub value: &'a str,
}

/// AST Node of possible input values in GraphQL.
///
/// Fields and Directives accept input values as arguments.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Input-Values)
#[derive(Debug, PartialEq, Clone)]
pub enum Value<'a> {
    Variable(Variable<'a>),
    String(StringValue<'a>),
    Float(FloatValue<'a>),
    Int(IntValue<'a>),
    Boolean(BooleanValue),
    Enum(EnumValue<'a>),
    List(ListValue<'a>),
    Object(ObjectValue<'a>),
    /// Representing JSON-like `null` values or the absence of a value
    Null,
}

/// AST Node for a List of values.
///
/// Lists in GraphQL are ordered sequences and serialize to JSON arrays. Its
/// contents may be any arbitrary value literal or variable.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-List-Value)
#[derive(Debug, PartialEq, Clone)]
pub struct ListValue<'a> {
    pub children: bumpalo::collections::Vec<'a, Value<'a>>,
}

impl<'a> ListValue<'a> {
    /// Checks whether this List contains any values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// AST Node for a field of an Object value.
///
/// [Reference](https://spec.graphql.org/October2021/#ObjectField)
#[derive(Debug, PartialEq, Clone)]
pub struct ObjectField<'a> {
    pub name: &'a str,
    pub value: Value<'a>,
}

/// AST Node for an Object value, which is a list of Object fields.
///
/// Objects in GraphQL are unordered lists of keyed input values and serialize to JSON objects.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Input-Object-Values)
#[derive(Debug, PartialEq, Clone)]
pub struct ObjectValue<'a> {
    pub children: bumpalo::collections::Vec<'a, ObjectField<'a>>,
}

impl<'a> ObjectValue<'a> {
    /// Checks whether this Object contains any fields.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// AST Node for an Argument, which carries a name and a value.
///
/// [Reference](https://spec.graphql.org/October2021/#Argument)
#[derive(Debug, PartialEq, Clone)]
pub struct Argument<'a> {
    pub name: &'a str,
    pub value: Value<'a>,
}

/// AST Node for a list of Arguments, which are similar to parameterized inputs to a function.
///
/// [Reference](https://spec.graphql.org/October2021/#Arguments)
#[derive(Debug, PartialEq, Clone)]
pub struct Arguments<'a> {
    pub children: bumpalo::collections::Vec<'a, Argument<'a>>,
}

impl<'a> Arguments<'a> {
    /// Checks whether this list of Arguments contains any values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// AST Node for GraphQL Directives, which provide a way to describe alternate behavior.
///
/// The directives a client code generator interprets are `@skip` and `@include`.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Language.Directives)
#[derive(Debug, PartialEq, Clone)]
pub struct Directive<'a> {
    pub name: &'a str,
    pub arguments: Arguments<'a>,
}

/// AST Node for lists of GraphQL Directives.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Language.Directives)
#[derive(Debug, PartialEq, Clone)]
pub struct Directives<'a> {
    pub children: bumpalo::collections::Vec<'a, Directive<'a>>,
}

impl<'a> Directives<'a> {
    /// Checks whether this list of Directives contains any values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// AST Node for Selection Sets, which provide a way to select more information on a given parent.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Selection-Sets)
#[derive(Debug, PartialEq, Clone)]
pub struct SelectionSet<'a> {
    pub selections: bumpalo::collections::Vec<'a, Selection<'a>>,
}

impl<'a> SelectionSet<'a> {
    /// Checks whether this Selection Set contains any selections.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }
}

/// AST Node for Fields, which can be likened to functions or properties on a parent object.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Language.Fields)
#[derive(Debug, PartialEq, Clone)]
pub struct Field<'a> {
    /// A Field's `alias`, which is used to request information under a different name than the
    /// Field's `name`.
    /// [Reference](https://spec.graphql.org/October2021/#sec-Field-Alias)
    pub alias: Option<&'a str>,
    /// A Field's `name`, which represents a resolver on a GraphQL schema's object type.
    pub name: &'a str,
    /// Arguments that are passed to a Field. When no Arguments are passed, this
    /// will be an empty list, as can be checked using `Arguments::is_empty`.
    pub arguments: Arguments<'a>,
    /// Directives that are annotating this Field.
    pub directives: Directives<'a>,
    /// A sub-Selection Set that is passed below this field to add selections to this field's
    /// returned GraphQL object type.
    pub selection_set: SelectionSet<'a>,
}

impl<'a> Field<'a> {
    /// Get the alias of the field, if present, otherwise get the name.
    ///
    /// This is the key under which the field's value appears in a response.
    #[inline]
    pub fn alias_or_name(&self) -> &'a str {
        self.alias.unwrap_or(self.name)
    }
}

/// AST Node for a Fragment Spread, which refers to a [`FragmentDefinition`].
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Language.Fragments)
#[derive(Debug, PartialEq, Clone)]
pub struct FragmentSpread<'a> {
    /// A given name of the [FragmentDefinition] that must be spread in place of this Fragment
    /// Spread on a GraphQL API.
    pub name: NamedType<'a>,
    /// Directives that are annotating this Fragment Spread.
    pub directives: Directives<'a>,
}

/// AST Node for an inline Fragment definition with an additional [`SelectionSet`].
/// This may only be applied when the type condition matches or when no type condition is present.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Language.Fragments)
#[derive(Debug, PartialEq, Clone)]
pub struct InlineFragment<'a> {
    /// A given type condition's type name that must match before this fragment is applied on a
    /// GraphQL API. On inline fragments this is optional and no type condition has to be passed.
    pub type_condition: Option<NamedType<'a>>,
    /// Directives that are annotating this Inline Fragment.
    pub directives: Directives<'a>,
    /// A sub-Selection Set that is applied when this Fragment is applied to the parent
    /// Selection Set.
    pub selection_set: SelectionSet<'a>,
}

/// AST Node of a selection as contained inside a [`SelectionSet`].
///
/// Any given Selection Set may contain fields, fragment spreads, and inline fragments.
///
/// [Reference](https://spec.graphql.org/October2021/#Selection)
#[derive(Debug, PartialEq, Clone)]
pub enum Selection<'a> {
    Field(Field<'a>),
    FragmentSpread(FragmentSpread<'a>),
    InlineFragment(InlineFragment<'a>),
}

impl<'a> Selection<'a> {
    /// Helper method to return the [`Field`] if the Selection is a `Field`.
    #[inline]
    pub fn field(&'a self) -> Option<&'a Field<'a>> {
        match self {
            Selection::Field(field) => Some(field),
            _ => None,
        }
    }

    /// Helper method to return the [`FragmentSpread`] if the Selection is a `FragmentSpread`.
    #[inline]
    pub fn fragment_spread(&'a self) -> Option<&'a FragmentSpread<'a>> {
        match self {
            Selection::FragmentSpread(spread) => Some(spread),
            _ => None,
        }
    }

    /// Helper method to return the [`InlineFragment`] if the Selection is an `InlineFragment`.
    #[inline]
    pub fn inline_fragment(&'a self) -> Option<&'a InlineFragment<'a>> {
        match self {
            Selection::InlineFragment(fragment) => Some(fragment),
            _ => None,
        }
    }
}

/// AST Node for a type name.
///
/// This AST uses this reference instead of a raw `&str` slice whenever the AST
/// refers to a concrete object type, input type, fragment name, or operation name.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct NamedType<'a> {
    pub name: &'a str,
}

/// AST Node for a type reference.
///
/// [`VariableDefinitions`] must describe their type when they're defined, including whether they
/// expect lists, non-null values, or a type reference, which is a recursive type definition.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Type-References)
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Type<'a> {
    /// A reference to a named input type, which is a leaf node of a [Type].
    NamedType(NamedType<'a>),
    /// A list node wrapper for a Type, which indicates that a GraphQL API will always pass a list
    /// of the contained type in place.
    ListType(&'a Type<'a>),
    /// A non-null node wrapper for a Type, which indicates that a GraphQL API may not pass `null`
    /// instead of the contained type.
    NonNullType(&'a Type<'a>),
}

impl<'a> Type<'a> {
    /// Unwraps a Type recursively and returns the `NamedType` that is contained within its
    /// wrappers.
    #[inline]
    pub fn of_type(&self) -> NamedType<'a> {
        match self {
            Type::NamedType(of_type) => *of_type,
            Type::ListType(inner) => inner.of_type(),
            Type::NonNullType(inner) => inner.of_type(),
        }
    }
}

/// A [Type] renders to the compact textual encoding used by the IR, with `[ ]`
/// for lists and a trailing `!` for non-null wrappers, e.g. `[User!]!`.
impl<'a> fmt::Display for Type<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::NamedType(of_type) => f.write_str(of_type.name),
            Type::ListType(inner) => write!(f, "[{}]", inner),
            Type::NonNullType(inner) => write!(f, "{}!", inner),
        }
    }
}

/// AST Node for a variable definition.
///
/// A variable definition defines multiple [Variable] identifiers that can be used in
/// place of any other non-static [Value] throughout the document.
///
/// [Reference](https://spec.graphql.org/October2021/#VariableDefinition)
#[derive(Debug, PartialEq, Clone)]
pub struct VariableDefinition<'a> {
    /// The variable's name, as in, its identifier, which is prefixed with a `$` sign in the
    /// document.
    pub variable: Variable<'a>,
    /// Annotation of the type of a given variable, which ultimately leads to a type reference of
    /// an input type, as defined on a GraphQL schema.
    pub of_type: Type<'a>,
    /// A GraphQL variable may be replaced by a default value, when it's not passed or `null`
    /// is passed for a non-null variable. When this definition doesn't contain any default value
    /// this property is set to `Value::Null`.
    pub default_value: Value<'a>,
    /// Directives that are annotating this Variable Definition.
    pub directives: Directives<'a>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct VariableDefinitions<'a> {
    pub children: bumpalo::collections::Vec<'a, VariableDefinition<'a>>,
}

impl<'a> VariableDefinitions<'a> {
    /// Checks whether the list of Variable Definitions is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// AST Node for a Fragment definition with an additional Selection Set.
///
/// This may only be applied when the type condition matches and extends a Selection
/// Set by being applied using a [`FragmentSpread`] selection.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Language.Fragments)
#[derive(Debug, PartialEq, Clone)]
pub struct FragmentDefinition<'a> {
    /// A given name of the Fragment Definition that is used by [FragmentSpread] selections to
    /// refer to this definition.
    pub name: NamedType<'a>,
    /// A given type condition's type name that must match before this fragment is applied on a
    /// GraphQL API.
    pub type_condition: NamedType<'a>,
    /// Directives that are annotating this Fragment.
    pub directives: Directives<'a>,
    /// A sub-Selection Set that is applied when this Fragment is applied to the parent
    /// Selection Set.
    pub selection_set: SelectionSet<'a>,
}

/// AST Node for a kind of operation, as referred to by an [`OperationDefinition`].
///
/// In GraphQL there are three different operations, with each having a unique identifier on
/// Operation Definitions.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Language.Operations)
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

/// An [OperationKind] renders to its keyword in the query language.
impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Query => f.write_str("query"),
            OperationKind::Mutation => f.write_str("mutation"),
            OperationKind::Subscription => f.write_str("subscription"),
        }
    }
}

/// AST Node for an Operation Definition, which defines the entrypoint for GraphQL's execution.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Language.Operations)
#[derive(Debug, PartialEq, Clone)]
pub struct OperationDefinition<'a> {
    /// The kind of operation that this definition specifies
    pub operation: OperationKind,
    /// An optional name, as given to the operation definition.
    pub name: Option<NamedType<'a>>,
    /// A list of variables that the operation defines and accepts during execution.
    pub variable_definitions: VariableDefinitions<'a>,
    /// Directives that are annotating this Operation Definition.
    pub directives: Directives<'a>,
    /// A sub-Selection Set that is applied when this Operation Definition is executed to the root
    /// type of the specified kind of operation.
    pub selection_set: SelectionSet<'a>,
}

/// AST Root Node for a GraphQL query language document. This contains one or more definitions of
/// fragments or operations.
///
/// Alongside each definition the document records the byte range the definition
/// occupies in the source text, so that a definition's raw source can be sliced
/// back out verbatim.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Document)
#[derive(Debug, PartialEq, Clone)]
pub struct Document<'a> {
    pub definitions: bumpalo::collections::Vec<'a, Definition<'a>>,
    /// The byte range of each definition in the source text, index-aligned with
    /// `definitions`.
    pub definition_spans: bumpalo::collections::Vec<'a, logos::Span>,
}

impl<'a> Document<'a> {
    /// Checks whether this document contains any definitions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// AST Node for a Definition inside a query language document, which may either be an Operation
/// Definition or a Fragment Definition.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Document)
#[derive(Debug, PartialEq, Clone)]
pub enum Definition<'a> {
    Operation(OperationDefinition<'a>),
    Fragment(FragmentDefinition<'a>),
}

impl<'a> Definition<'a> {
    /// Helper method to return the [`OperationDefinition`] if the Definition is an `OperationDefinition`.
    #[inline]
    pub fn operation(&'a self) -> Option<&'a OperationDefinition<'a>> {
        match self {
            Definition::Operation(operation) => Some(operation),
            Definition::Fragment(_) => None,
        }
    }

    /// Helper method to return the [`FragmentDefinition`] if the Definition is a `FragmentDefinition`.
    #[inline]
    pub fn fragment(&'a self) -> Option<&'a FragmentDefinition<'a>> {
        match self {
            Definition::Fragment(fragment) => Some(fragment),
            Definition::Operation(_) => None,
        }
    }
}
