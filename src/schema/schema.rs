use crate::ast::OperationKind;
use bumpalo::collections::Vec;
use hashbrown::hash_map::DefaultHashBuilder;
use hashbrown::HashMap;

use crate::ast::ASTContext;

/// Schema Definition
///
/// A schema is created from root types for each kind of operation and is then used against
/// AST documents for validation and IR generation. In this library the schema is never executable
/// and serves only for metadata and type information. It is hence a "Client Schema".
/// [Reference](https://spec.graphql.org/October2021/#sec-Schema)
#[derive(Debug, Clone)]
pub struct Schema<'a> {
    pub(crate) query_type: Option<&'a SchemaObject<'a>>,
    pub(crate) mutation_type: Option<&'a SchemaObject<'a>>,
    pub(crate) subscription_type: Option<&'a SchemaObject<'a>>,
    pub(crate) types:
        HashMap<&'a str, &'a SchemaType<'a>, DefaultHashBuilder, hashbrown::BumpWrapper<'a>>,
}

impl<'a> Schema<'a> {
    /// Returns the root object type for query operations
    #[inline]
    pub fn query_type(&self) -> Option<&'a SchemaObject<'a>> {
        self.query_type
    }

    /// Returns the root object type for mutation operations
    #[inline]
    pub fn mutation_type(&self) -> Option<&'a SchemaObject<'a>> {
        self.mutation_type
    }

    /// Returns the root object type for subscription operations
    #[inline]
    pub fn subscription_type(&self) -> Option<&'a SchemaObject<'a>> {
        self.subscription_type
    }

    /// Returns the appropriate root object type depending on the passed operation kind
    #[inline]
    pub fn get_root_type(&self, operation_kind: OperationKind) -> Option<&'a SchemaObject<'a>> {
        match operation_kind {
            OperationKind::Query => self.query_type,
            OperationKind::Mutation => self.mutation_type,
            OperationKind::Subscription => self.subscription_type,
        }
    }

    /// Retrieves a type by name from known schema types.
    #[inline]
    pub fn get_type(&self, name: &str) -> Option<&'a SchemaType<'a>> {
        self.types.get(name).copied()
    }
}

/// Generic trait for any schema type that carries selectable fields.
pub trait SchemaFields<'a>: Sized {
    /// Add a new [SchemaField] to the list of fields
    fn add_field(&mut self, ctx: &'a ASTContext, field: SchemaField<'a>);

    /// Get a known field by name
    fn get_field(&self, name: &str) -> Option<&'a SchemaField<'a>>;
}

/// Generic trait for any schema type that narrows to a set of possible object types.
pub trait SchemaPossibleTypes<'a>: Sized {
    /// Add a new [SchemaObject] name to the list of possible types
    fn add_possible_type(&mut self, ctx: &'a ASTContext, object: &'a str);

    /// Get the list of possible [SchemaObject] type names
    fn get_possible_types(&self) -> &Vec<'a, &'a str>;

    /// Get a specific possible type by name if it exists on the type
    #[inline]
    fn get_possible_type(&self, name: &str) -> Option<&'a str> {
        self.get_possible_types()
            .iter()
            .copied()
            .find(|&possible_type| possible_type == name)
    }
}

/// An Object type definition.
///
/// Most types in GraphQL are objects and define a set of fields.
/// [Reference](https://spec.graphql.org/October2021/#sec-Objects)
#[derive(Debug, Clone)]
pub struct SchemaObject<'a> {
    pub name: &'a str,
    pub(crate) fields: HashMap<&'a str, &'a SchemaField<'a>, DefaultHashBuilder, hashbrown::BumpWrapper<'a>>,
}

impl<'a> SchemaObject<'a> {
    #[inline]
    pub fn new(ctx: &'a ASTContext, name: &'a str) -> Self {
        SchemaObject {
            name,
            fields: HashMap::new_in(hashbrown::BumpWrapper(&ctx.arena)),
        }
    }
}

impl<'a> SchemaFields<'a> for SchemaObject<'a> {
    fn add_field(&mut self, ctx: &'a ASTContext, field: SchemaField<'a>) {
        self.fields.insert(field.name, ctx.alloc(field));
    }

    fn get_field(&self, name: &str) -> Option<&'a SchemaField<'a>> {
        self.fields.get(name).copied()
    }
}

/// An Interface type definition.
///
/// A field that returns an interface as its return type may return any object that
/// implements this interface, which is what its list of possible types records.
/// [Reference](https://spec.graphql.org/October2021/#sec-Interfaces)
#[derive(Debug, Clone)]
pub struct SchemaInterface<'a> {
    pub name: &'a str,
    pub(crate) fields: HashMap<&'a str, &'a SchemaField<'a>, DefaultHashBuilder, hashbrown::BumpWrapper<'a>>,
    pub(crate) possible_types: Vec<'a, &'a str>,
}

impl<'a> SchemaInterface<'a> {
    #[inline]
    pub fn new(ctx: &'a ASTContext, name: &'a str) -> Self {
        SchemaInterface {
            name,
            fields: HashMap::new_in(hashbrown::BumpWrapper(&ctx.arena)),
            possible_types: Vec::new_in(&ctx.arena),
        }
    }
}

impl<'a> SchemaFields<'a> for SchemaInterface<'a> {
    fn add_field(&mut self, ctx: &'a ASTContext, field: SchemaField<'a>) {
        self.fields.insert(field.name, ctx.alloc(field));
    }

    fn get_field(&self, name: &str) -> Option<&'a SchemaField<'a>> {
        self.fields.get(name).copied()
    }
}

impl<'a> SchemaPossibleTypes<'a> for SchemaInterface<'a> {
    fn add_possible_type(&mut self, _ctx: &'a ASTContext, object: &'a str) {
        self.possible_types.push(object);
    }

    #[inline]
    fn get_possible_types(&self) -> &Vec<'a, &'a str> {
        &self.possible_types
    }
}

/// An object Field type definition.
///
/// A field is like a function that given its arguments as input values produces an output value.
/// [Reference](https://spec.graphql.org/October2021/#FieldsDefinition)
#[derive(Debug, Clone)]
pub struct SchemaField<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub is_deprecated: bool,
    pub deprecation_reason: Option<&'a str>,
    pub arguments: HashMap<&'a str, SchemaInputField<'a>, DefaultHashBuilder, hashbrown::BumpWrapper<'a>>,
    pub output_type: &'a TypeRef<'a>,
}

impl<'a> SchemaField<'a> {
    #[inline]
    pub fn new(ctx: &'a ASTContext, name: &'a str, output_type: &'a TypeRef<'a>) -> Self {
        SchemaField {
            name,
            description: None,
            is_deprecated: false,
            deprecation_reason: None,
            arguments: HashMap::new_in(hashbrown::BumpWrapper(&ctx.arena)),
            output_type,
        }
    }

    pub fn add_argument(&mut self, _ctx: &'a ASTContext, arg: SchemaInputField<'a>) {
        self.arguments.insert(arg.name, arg);
    }

    #[inline]
    pub fn get_argument(&self, name: &str) -> Option<&SchemaInputField<'a>> {
        self.arguments.get(name)
    }
}

/// A Union type definition.
///
/// A union contains a list of possible types that can be returned in its stead when it's defined
/// as an output type.
/// [Reference](https://spec.graphql.org/October2021/#sec-Unions)
#[derive(Debug, Clone)]
pub struct SchemaUnion<'a> {
    pub name: &'a str,
    pub(crate) possible_types: Vec<'a, &'a str>,
}

impl<'a> SchemaUnion<'a> {
    #[inline]
    pub fn new(ctx: &'a ASTContext, name: &'a str) -> Self {
        SchemaUnion {
            name,
            possible_types: Vec::new_in(&ctx.arena),
        }
    }
}

impl<'a> SchemaPossibleTypes<'a> for SchemaUnion<'a> {
    fn add_possible_type(&mut self, _ctx: &'a ASTContext, object: &'a str) {
        self.possible_types.push(object);
    }

    #[inline]
    fn get_possible_types(&self) -> &Vec<'a, &'a str> {
        &self.possible_types
    }
}

/// A Scalar type definition.
///
/// Scalars represent primitive leaf values in GraphQL.
/// [Reference](https://spec.graphql.org/October2021/#sec-Scalars)
#[derive(Debug, Clone)]
pub struct SchemaScalar<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
}

impl<'a> SchemaScalar<'a> {
    #[inline]
    pub fn new(name: &'a str) -> Self {
        SchemaScalar {
            name,
            description: None,
        }
    }
}

/// An Enum type definition with its list of values in schema order.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Enums)
#[derive(Debug, Clone)]
pub struct SchemaEnum<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub values: Vec<'a, SchemaEnumValue<'a>>,
}

impl<'a> SchemaEnum<'a> {
    #[inline]
    pub fn new(ctx: &'a ASTContext, name: &'a str) -> Self {
        SchemaEnum {
            name,
            description: None,
            values: Vec::new_in(&ctx.arena),
        }
    }

    pub fn add_value(&mut self, _ctx: &'a ASTContext, value: SchemaEnumValue<'a>) {
        self.values.push(value);
    }
}

/// A single value of an Enum type definition.
#[derive(Debug, Clone, Copy)]
pub struct SchemaEnumValue<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub is_deprecated: bool,
    pub deprecation_reason: Option<&'a str>,
}

/// An Input Object type definition with its fields in schema order.
///
/// Inputs, such as arguments, may sometimes be nested and accept objects that must adhere to the
/// shape of an Input Object definition.
/// [Reference](https://spec.graphql.org/October2021/#sec-Input-Objects)
#[derive(Debug, Clone)]
pub struct SchemaInputObject<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub fields: Vec<'a, SchemaInputField<'a>>,
}

impl<'a> SchemaInputObject<'a> {
    #[inline]
    pub fn new(ctx: &'a ASTContext, name: &'a str) -> Self {
        SchemaInputObject {
            name,
            description: None,
            fields: Vec::new_in(&ctx.arena),
        }
    }

    pub fn add_field(&mut self, _ctx: &'a ASTContext, field: SchemaInputField<'a>) {
        self.fields.push(field);
    }
}

/// An input value definition, used both for field arguments and input object fields.
#[derive(Debug, Clone, Copy)]
pub struct SchemaInputField<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub input_type: &'a TypeRef<'a>,
    /// The textual form of the default value, as reported by introspection.
    pub default_value: Option<&'a str>,
}

impl<'a> SchemaInputField<'a> {
    #[inline]
    pub fn new(name: &'a str, input_type: &'a TypeRef<'a>) -> Self {
        SchemaInputField {
            name,
            description: None,
            input_type,
            default_value: None,
        }
    }
}

/// A named type enum that represents all possible GraphQL definition types.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Types)
#[derive(Debug, Clone, Copy)]
pub enum SchemaType<'a> {
    InputObject(&'a SchemaInputObject<'a>),
    Object(&'a SchemaObject<'a>),
    Union(&'a SchemaUnion<'a>),
    Interface(&'a SchemaInterface<'a>),
    Scalar(&'a SchemaScalar<'a>),
    Enum(&'a SchemaEnum<'a>),
}

impl<'a> SchemaType<'a> {
    #[inline]
    pub fn name(&self) -> &'a str {
        match self {
            SchemaType::InputObject(x) => x.name,
            SchemaType::Object(x) => x.name,
            SchemaType::Union(x) => x.name,
            SchemaType::Interface(x) => x.name,
            SchemaType::Scalar(x) => x.name,
            SchemaType::Enum(x) => x.name,
        }
    }

    pub fn object(&self) -> Option<&'a SchemaObject<'a>> {
        match self {
            SchemaType::Object(x) => Some(x),
            _ => None,
        }
    }

    pub fn input_object(&self) -> Option<&'a SchemaInputObject<'a>> {
        match self {
            SchemaType::InputObject(x) => Some(x),
            _ => None,
        }
    }

    pub fn interface(&self) -> Option<&'a SchemaInterface<'a>> {
        match self {
            SchemaType::Interface(x) => Some(x),
            _ => None,
        }
    }

    pub fn union_type(&self) -> Option<&'a SchemaUnion<'a>> {
        match self {
            SchemaType::Union(x) => Some(x),
            _ => None,
        }
    }
}

impl<'a> From<&'a SchemaObject<'a>> for SchemaType<'a> {
    #[inline]
    fn from(schema_object: &'a SchemaObject<'a>) -> Self {
        SchemaType::Object(schema_object)
    }
}

impl<'a> From<&'a SchemaUnion<'a>> for SchemaType<'a> {
    #[inline]
    fn from(schema_union: &'a SchemaUnion<'a>) -> Self {
        SchemaType::Union(schema_union)
    }
}

impl<'a> From<&'a SchemaInterface<'a>> for SchemaType<'a> {
    #[inline]
    fn from(schema_interface: &'a SchemaInterface<'a>) -> Self {
        SchemaType::Interface(schema_interface)
    }
}

/// A reference to a named schema type, wrapped in any number of list and non-null wrappers.
#[derive(Clone, Copy)]
pub enum TypeRef<'a> {
    Type(&'a str),
    ListType(&'a TypeRef<'a>),
    NonNullType(&'a TypeRef<'a>),
}

impl<'a> TypeRef<'a> {
    /// Unwraps the reference recursively and returns the named type it refers to.
    #[inline]
    pub fn name(&self) -> &'a str {
        match self {
            TypeRef::Type(name) => name,
            TypeRef::ListType(of_type) => of_type.name(),
            TypeRef::NonNullType(of_type) => of_type.name(),
        }
    }

    /// Renders the reference to the compact textual encoding used by the IR, with
    /// `[ ]` for lists and a trailing `!` for non-null wrappers, e.g. `[User!]!`.
    pub fn type_string(&self) -> String {
        match self {
            TypeRef::Type(name) => (*name).to_string(),
            TypeRef::ListType(of_type) => format!("[{}]", of_type.type_string()),
            TypeRef::NonNullType(of_type) => format!("{}!", of_type.type_string()),
        }
    }
}

/// This implementation is necessary to circuit break circular types.
/// Without this impl, `Debug` would print on and on, overflowing the stack as it's bouncing between types over and over.
impl<'a> std::fmt::Debug for TypeRef<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Type(arg0) => f.debug_tuple("Type").field(&arg0).finish(),
            Self::ListType(arg0) => f.debug_tuple("ListType").field(arg0).finish(),
            Self::NonNullType(arg0) => f.debug_tuple("NonNullType").field(arg0).finish(),
        }
    }
}
