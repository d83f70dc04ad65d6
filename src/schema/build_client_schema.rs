use self::private::BuildSchemaContext;

use super::introspection::{IntrospectionQuery, IntrospectionSchema};
use super::schema::Schema;
use crate::ast::ASTContext;

pub(crate) mod private {
    use hashbrown::{hash_map::DefaultHashBuilder, HashMap};

    use super::super::{introspection::*, schema::*};
    use super::ASTContext;

    fn from_output_type_ref<'a>(
        ctx: &'a ASTContext,
        output: &IntrospectionOutputTypeRef,
    ) -> &'a TypeRef<'a> {
        let out = match output {
            IntrospectionOutputTypeRef::List { of_type } => {
                TypeRef::ListType(from_output_type_ref(ctx, of_type.as_ref()))
            }
            IntrospectionOutputTypeRef::NonNull { of_type } => {
                TypeRef::NonNullType(from_output_type_ref(ctx, of_type.as_ref()))
            }
            IntrospectionOutputTypeRef::ScalarType { name }
            | IntrospectionOutputTypeRef::EnumType { name }
            | IntrospectionOutputTypeRef::ObjectType { name }
            | IntrospectionOutputTypeRef::InterfaceType { name }
            | IntrospectionOutputTypeRef::UnionType { name } => {
                TypeRef::Type(ctx.alloc_str(name))
            }
        };

        ctx.alloc(out)
    }

    fn from_input_type_ref<'a>(
        ctx: &'a ASTContext,
        input: &IntrospectionInputTypeRef,
    ) -> &'a TypeRef<'a> {
        let type_ref = match input {
            IntrospectionInputTypeRef::List { of_type } => {
                TypeRef::ListType(from_input_type_ref(ctx, of_type.as_ref()))
            }
            IntrospectionInputTypeRef::NonNull { of_type } => {
                TypeRef::NonNullType(from_input_type_ref(ctx, of_type.as_ref()))
            }
            IntrospectionInputTypeRef::ScalarType { name }
            | IntrospectionInputTypeRef::EnumType { name }
            | IntrospectionInputTypeRef::InputObjectType { name } => {
                TypeRef::Type(ctx.alloc_str(name))
            }
        };

        ctx.alloc(type_ref)
    }

    fn alloc_description<'a>(ctx: &'a ASTContext, description: &Option<String>) -> Option<&'a str> {
        description.as_deref().map(|text| ctx.alloc_str(text))
    }

    fn from_input_value<'a>(
        ctx: &'a ASTContext,
        value: &IntrospectionInputValue,
    ) -> SchemaInputField<'a> {
        let mut input_field = SchemaInputField::new(
            ctx.alloc_str(value.name),
            from_input_type_ref(ctx, &value.of_type),
        );
        input_field.description = alloc_description(ctx, &value.description);
        input_field.default_value = value.default_value.as_deref().map(|text| ctx.alloc_str(text));
        input_field
    }

    fn from_field<'a>(ctx: &'a ASTContext, field: &IntrospectionField) -> SchemaField<'a> {
        let mut schema_field = SchemaField::new(
            ctx,
            ctx.alloc_str(field.name),
            from_output_type_ref(ctx, &field.of_type),
        );
        schema_field.description = alloc_description(ctx, &field.description);
        schema_field.is_deprecated = field.deprecation.is_deprecated.unwrap_or(false);
        schema_field.deprecation_reason = field
            .deprecation
            .deprecation_reason
            .as_deref()
            .map(|reason| ctx.alloc_str(reason));
        for arg in field.args.iter() {
            schema_field.add_argument(ctx, from_input_value(ctx, arg));
        }
        schema_field
    }

    #[derive(Clone)]
    pub struct BuildSchemaContext<'arena> {
        pub(crate) ctx: &'arena ASTContext,
    }

    impl<'arena> BuildSchemaContext<'arena> {
        pub(crate) fn new(ctx: &'arena ASTContext) -> Self {
            BuildSchemaContext { ctx }
        }

        pub fn build_schema(
            &'arena self,
            introspection: &IntrospectionSchema<'arena>,
        ) -> &'arena Schema<'arena> {
            // Create the full set of types first so that root type lookups below
            // resolve against the same allocations
            let mut schema_types: HashMap<
                &str,
                &'arena SchemaType,
                DefaultHashBuilder,
                hashbrown::BumpWrapper<'arena>,
            > = HashMap::new_in(hashbrown::BumpWrapper(&self.ctx.arena));
            for introspection_type in introspection.types.iter() {
                let schema_type = BuildSchemaType::on_create(introspection_type, self);
                schema_types.insert(
                    self.ctx.alloc_str(introspection_type.name()),
                    self.ctx.alloc(schema_type),
                );
            }

            let query_type = introspection
                .query_type
                .as_ref()
                .and_then(|type_ref| schema_types.get(&type_ref.name))
                .and_then(|schema_type| schema_type.object());

            let mutation_type = introspection
                .mutation_type
                .as_ref()
                .and_then(|type_ref| schema_types.get(&type_ref.name))
                .and_then(|schema_type| schema_type.object());

            let subscription_type = introspection
                .subscription_type
                .as_ref()
                .and_then(|type_ref| schema_types.get(&type_ref.name))
                .and_then(|schema_type| schema_type.object());

            self.ctx.alloc(Schema {
                query_type,
                mutation_type,
                subscription_type,
                types: schema_types,
            })
        }
    }

    pub trait BuildSchemaType<'arena, T>: Sized {
        fn on_create(&self, ctx: &'arena BuildSchemaContext<'arena>) -> T;
    }

    impl<'arena> BuildSchemaType<'arena, SchemaType<'arena>> for IntrospectionType<'arena> {
        #[inline]
        fn on_create(&self, ctx: &'arena BuildSchemaContext<'arena>) -> SchemaType<'arena> {
            match self {
                IntrospectionType::Scalar(scalar) => {
                    SchemaType::Scalar(ctx.ctx.alloc(scalar.on_create(ctx)))
                }
                IntrospectionType::Object(object) => {
                    SchemaType::Object(ctx.ctx.alloc(object.on_create(ctx)))
                }
                IntrospectionType::Interface(interface) => {
                    SchemaType::Interface(ctx.ctx.alloc(interface.on_create(ctx)))
                }
                IntrospectionType::Union(union_type) => {
                    SchemaType::Union(ctx.ctx.alloc(union_type.on_create(ctx)))
                }
                IntrospectionType::Enum(enum_type) => {
                    SchemaType::Enum(ctx.ctx.alloc(enum_type.on_create(ctx)))
                }
                IntrospectionType::InputObject(input_object) => {
                    SchemaType::InputObject(ctx.ctx.alloc(input_object.on_create(ctx)))
                }
            }
        }
    }

    impl<'arena> BuildSchemaType<'arena, SchemaScalar<'arena>> for IntrospectionScalarType<'arena> {
        #[inline]
        fn on_create(&self, ctx: &'arena BuildSchemaContext<'arena>) -> SchemaScalar<'arena> {
            let mut scalar = SchemaScalar::new(ctx.ctx.alloc_str(self.name));
            scalar.description = alloc_description(ctx.ctx, &self.description);
            scalar
        }
    }

    impl<'arena> BuildSchemaType<'arena, SchemaEnum<'arena>> for IntrospectionEnumType<'arena> {
        #[inline]
        fn on_create(&self, ctx: &'arena BuildSchemaContext<'arena>) -> SchemaEnum<'arena> {
            let name = ctx.ctx.alloc_str(self.name);
            let mut enum_type = SchemaEnum::new(ctx.ctx, name);
            enum_type.description = alloc_description(ctx.ctx, &self.description);
            for value in self.enum_values.iter() {
                enum_type.add_value(
                    ctx.ctx,
                    SchemaEnumValue {
                        name: ctx.ctx.alloc_str(value.name),
                        description: alloc_description(ctx.ctx, &value.description),
                        is_deprecated: value.deprecation.is_deprecated.unwrap_or(false),
                        deprecation_reason: value
                            .deprecation
                            .deprecation_reason
                            .as_deref()
                            .map(|reason| ctx.ctx.alloc_str(reason)),
                    },
                );
            }
            enum_type
        }
    }

    impl<'arena> BuildSchemaType<'arena, SchemaUnion<'arena>> for IntrospectionUnionType<'arena> {
        #[inline]
        fn on_create(&self, ctx: &'arena BuildSchemaContext<'arena>) -> SchemaUnion<'arena> {
            let name = ctx.ctx.alloc_str(self.name);
            let mut schema_union_type = SchemaUnion::new(ctx.ctx, name);
            for introspection_type_ref in self.possible_types.iter() {
                let name = ctx.ctx.alloc_str(introspection_type_ref.name);
                schema_union_type.add_possible_type(ctx.ctx, name);
            }
            schema_union_type
        }
    }

    impl<'arena> BuildSchemaType<'arena, SchemaObject<'arena>> for IntrospectionObjectType<'arena> {
        #[inline]
        fn on_create(&self, ctx: &'arena BuildSchemaContext<'arena>) -> SchemaObject<'arena> {
            let name = ctx.ctx.alloc_str(self.name);
            let mut schema_object_type = SchemaObject::new(ctx.ctx, name);
            for field in self.fields.iter() {
                schema_object_type.add_field(ctx.ctx, from_field(ctx.ctx, field));
            }
            schema_object_type
        }
    }

    impl<'arena> BuildSchemaType<'arena, SchemaInterface<'arena>>
        for IntrospectionInterfaceType<'arena>
    {
        #[inline]
        fn on_create(&self, ctx: &'arena BuildSchemaContext<'arena>) -> SchemaInterface<'arena> {
            let name = ctx.ctx.alloc_str(self.name);
            let mut schema_interface_type = SchemaInterface::new(ctx.ctx, name);
            for field in self.fields.iter() {
                schema_interface_type.add_field(ctx.ctx, from_field(ctx.ctx, field));
            }
            for introspection_type_ref in self.possible_types.iter() {
                let name = ctx.ctx.alloc_str(introspection_type_ref.name);
                schema_interface_type.add_possible_type(ctx.ctx, name);
            }
            schema_interface_type
        }
    }

    impl<'arena> BuildSchemaType<'arena, SchemaInputObject<'arena>>
        for IntrospectionInputObjectType<'arena>
    {
        #[inline]
        fn on_create(&self, ctx: &'arena BuildSchemaContext<'arena>) -> SchemaInputObject<'arena> {
            let name = ctx.ctx.alloc_str(self.name);
            let mut input = SchemaInputObject::new(ctx.ctx, name);
            input.description = alloc_description(ctx.ctx, &self.description);
            for field in self.input_fields.iter() {
                input.add_field(ctx.ctx, from_input_value(ctx.ctx, field));
            }
            input
        }
    }
}

pub trait BuildClientSchema<'arena> {
    /// Converts the introspected data to a [Schema].
    fn build_client_schema(&self, ctx: &'arena ASTContext) -> &'arena Schema<'arena>;
}

impl<'arena> BuildClientSchema<'arena> for IntrospectionSchema<'arena> {
    /// Converts the introspected data to a [Schema].
    fn build_client_schema(&self, ctx: &'arena ASTContext) -> &'arena Schema<'arena> {
        let builder_ctx: &mut BuildSchemaContext =
            ctx.arena.alloc(private::BuildSchemaContext::new(ctx));
        builder_ctx.build_schema(self)
    }
}

impl<'arena> BuildClientSchema<'arena> for IntrospectionQuery<'arena> {
    /// Converts the introspected data to a [Schema].
    fn build_client_schema(&self, ctx: &'arena ASTContext) -> &'arena Schema<'arena> {
        self.schema.build_client_schema(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::super::schema::{SchemaFields, SchemaPossibleTypes, SchemaType};
    use super::*;

    fn build_fixture_schema(ctx: &ASTContext) -> &Schema<'_> {
        let introspection_json = include_str!("../../fixture/introspection_query.json");
        let introspection: IntrospectionQuery = serde_json::from_str(introspection_json).unwrap();
        introspection.build_client_schema(ctx)
    }

    #[test]
    fn build_schema() {
        let ctx = ASTContext::new();
        let schema = build_fixture_schema(&ctx);

        let query_root_name = schema.query_type().map(|obj| obj.name).unwrap();
        assert_eq!(query_root_name, "Query");
        assert_eq!(schema.mutation_type().map(|obj| obj.name), Some("Mutation"));
        assert!(schema.subscription_type().is_none());

        assert!(std::ptr::eq(
            schema
                .get_type(query_root_name)
                .and_then(|t| t.object())
                .unwrap(),
            schema.query_type().unwrap()
        ));
    }

    #[test]
    fn schema_fields() {
        let ctx = ASTContext::new();
        let schema = build_fixture_schema(&ctx);

        let user_type = schema.get_type("User").and_then(|t| t.object()).unwrap();
        user_type.get_field("id").unwrap();
        user_type.get_field("name").unwrap();

        let email_field = user_type.get_field("email").unwrap();
        assert!(email_field.is_deprecated);
        assert_eq!(email_field.deprecation_reason, Some("Use contact instead"));

        let friends_field = user_type.get_field("friends").unwrap();
        assert_eq!(friends_field.output_type.type_string(), "[User!]");
        assert_eq!(friends_field.output_type.name(), "User");

        let query_type = schema.get_type("Query").and_then(|t| t.object()).unwrap();
        let user_field = query_type.get_field("user").unwrap();
        let id_argument = user_field.get_argument("id").unwrap();
        assert_eq!(id_argument.input_type.type_string(), "ID!");
    }

    #[test]
    fn schema_abstract_relationships() {
        let ctx = ASTContext::new();
        let schema = build_fixture_schema(&ctx);

        let node_type = schema.get_type("Node").and_then(|t| t.interface()).unwrap();
        assert!(node_type.get_possible_type("User").is_some());
        assert!(node_type.get_possible_type("Post").is_some());
        node_type.get_field("id").unwrap();

        let search_type = schema
            .get_type("SearchResult")
            .and_then(|t| t.union_type())
            .unwrap();
        assert!(search_type.get_possible_type("User").is_some());
        assert!(search_type.get_possible_type("Post").is_some());
        assert!(search_type.get_possible_type("Episode").is_none());
    }

    #[test]
    fn schema_enums_and_inputs() {
        let ctx = ASTContext::new();
        let schema = build_fixture_schema(&ctx);

        let episode = match schema.get_type("Episode") {
            Some(SchemaType::Enum(episode)) => episode,
            _ => panic!("Episode should be an enum"),
        };
        let names: Vec<&str> = episode.values.iter().map(|value| value.name).collect();
        assert_eq!(names, vec!["NEWHOPE", "EMPIRE", "JEDI"]);
        assert!(episode.values[2].is_deprecated);

        let review_input = match schema.get_type("ReviewInput") {
            Some(SchemaType::InputObject(input)) => input,
            _ => panic!("ReviewInput should be an input object"),
        };
        let stars = &review_input.fields[0];
        assert_eq!(stars.name, "stars");
        assert_eq!(stars.input_type.type_string(), "Int!");
        assert_eq!(stars.default_value, Some("5"));
    }
}
