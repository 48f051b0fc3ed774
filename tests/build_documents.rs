use gql_shape::prelude::*;
use gql_shape::BuildError;
use pretty_assertions::assert_eq;

const OPERATIONS: [OperationType; 2] = [OperationType::Query, OperationType::Mutation];

fn check(build_schema: impl Fn(&mut QueryBuilder) -> Node, options: OperationOptions, expected: &str) {
    for operation_type in OPERATIONS {
        let mut builder = QueryBuilder::new();
        let root = build_schema(&mut builder);
        let document = builder.build(operation_type, &root, &options).unwrap();
        assert_eq!(document, format!("{operation_type}{expected}"));
    }
}

fn check_error(build_schema: impl Fn(&mut QueryBuilder) -> Node, options: OperationOptions, expected: &str) {
    for operation_type in OPERATIONS {
        let mut builder = QueryBuilder::new();
        let root = build_schema(&mut builder);
        let error = builder.build(operation_type, &root, &options).unwrap_err();
        assert_eq!(error.to_string(), expected);
    }
}

fn var(name: &str) -> GraphqlValue {
    variable_placeholder(name).unwrap()
}

fn union_ab() -> Node {
    tagged_union(
        "__typename",
        [
            object([("__typename", literal("A")), ("valueA", string())]),
            object([("__typename", literal("B")), ("valueB", string())]),
        ],
    )
}

const FRAGMENTS_AB: &str = " { foo { ... on A { __typename, valueA }, ... on B { __typename, valueB } } }";

#[test]
fn undefined_reference_fails() {
    check_error(
        |b| {
            object([(
                "foo",
                b.register_field_options(string(), FieldOptions::default().with_parameter("bar", var("$bar"))),
            )])
        },
        OperationOptions::default(),
        r#"Referenced variable "$bar" is missing in variableDefinitions"#,
    );
}

#[test]
fn unreferenced_definition_fails() {
    check_error(
        |_| object([("foo", string())]),
        OperationOptions::default().with_variable("$bar", "String!"),
        r#"Variable definition for "$bar" is never referenced"#,
    );
}

#[test]
fn invalid_variable_type_fails() {
    check_error(
        |b| {
            object([(
                "foo",
                b.register_field_options(string(), FieldOptions::default().with_parameter("bar", var("$bar"))),
            )])
        },
        OperationOptions::default().with_variable("$bar", "String!!"),
        r#"Type "String!!" for variable "$bar" is invalid"#,
    );
}

#[test]
fn empty_variable_type_fails() {
    check_error(
        |b| {
            object([(
                "foo",
                b.register_field_options(string(), FieldOptions::default().with_parameter("bar", var("$bar"))),
            )])
        },
        OperationOptions::default().with_variable("$bar", ""),
        r#"Type "" for variable "$bar" is invalid"#,
    );
}

#[test]
fn variable_type_may_carry_ignored_tokens() {
    // Declared types are emitted as written.
    let mut builder = QueryBuilder::new();
    let foo = builder.register_field_options(string(), FieldOptions::default().with_parameter("bar", var("$bar")));
    let document = builder
        .build_query(&object([("foo", foo)]), &OperationOptions::default().with_variable("$bar", " String "))
        .unwrap();
    assert_eq!(document, "query ($bar:  String ) { foo(bar: $bar) }");
}

#[test]
fn simple_unnamed() {
    check(|_| object([("foo", string())]), OperationOptions::default(), " { foo }");
}

#[test]
fn simple_named() {
    check(|_| object([("foo", string())]), OperationOptions::named("theOperationName"), " theOperationName { foo }");
}

#[test]
fn unnamed_with_variables() {
    check(
        |b| {
            object([(
                "foo",
                b.register_field_options(string(), FieldOptions::default().with_parameter("bar", var("$bar"))),
            )])
        },
        OperationOptions::default().with_variable("$bar", "String!"),
        " ($bar: String!) { foo(bar: $bar) }",
    );
}

#[test]
fn named_with_variables() {
    check(
        |b| {
            object([(
                "foo",
                b.register_field_options(string(), FieldOptions::default().with_parameter("bar", var("$bar"))),
            )])
        },
        OperationOptions::named("theOperationName").with_variable("$bar", "String!"),
        " theOperationName($bar: String!) { foo(bar: $bar) }",
    );
}

#[test]
fn options_survive_later_wrapping() {
    check(
        |b| {
            let foo = b.register_field_options(string(), FieldOptions::default().with_parameter("bar", "baz"));
            object([("foo", foo.nullable())])
        },
        OperationOptions::default(),
        r#" { foo(bar: "baz") }"#,
    );
}

#[test]
fn outermost_options_win_without_merging() {
    check(
        |b| {
            let inner = b.register_field_options(
                string(),
                FieldOptions::default()
                    .with_parameter("bar", "inner-overwritten")
                    .with_parameter("baz", "inner-only"),
            );
            let outer = b.register_field_options(
                inner.nullable(),
                FieldOptions::default()
                    .with_parameter("bar", "outer-overwritten")
                    .with_parameter("qux", "outer-only"),
            );
            object([("foo", outer)])
        },
        OperationOptions::default(),
        r#" { foo(bar: "outer-overwritten", qux: "outer-only") }"#,
    );
}

#[test]
fn multiple_top_level_fields() {
    check(|_| object([("foo", string()), ("bar", number())]), OperationOptions::default(), " { foo, bar }");
}

#[test]
fn nested_objects() {
    check(
        |_| object([("foo", object([("bar", object([("baz", number())]))]))]),
        OperationOptions::default(),
        " { foo { bar { baz } } }",
    );
    check(
        |_| object([("foo", object([("bar", object([("baz", number())]))])), ("qux", boolean())]),
        OperationOptions::default(),
        " { foo { bar { baz } }, qux }",
    );
}

#[test]
fn nested_objects_with_parameters_and_alias() {
    check(
        |b| {
            let bar = b.register_field_options(
                object([("baz", number())]),
                FieldOptions::default().with_parameter("parameter", "value"),
            );
            object([("foo", object([("bar", bar)]))])
        },
        OperationOptions::default(),
        r#" { foo { bar(parameter: "value") { baz } } }"#,
    );
    check(
        |b| {
            let bar = b.register_field_options(object([("baz", number())]), FieldOptions::alias("qux"));
            object([("foo", object([("bar", bar)]))])
        },
        OperationOptions::default(),
        " { foo { bar: qux { baz } } }",
    );
    check(
        |b| {
            let bar = b.register_field_options(
                object([("baz", number())]),
                FieldOptions::alias("qux").with_parameter("parameter", "value"),
            );
            object([("foo", object([("bar", bar)]))])
        },
        OperationOptions::default(),
        r#" { foo { bar: qux(parameter: "value") { baz } } }"#,
    );
}

#[test]
fn fragments() {
    check(|_| object([("foo", union_ab())]), OperationOptions::default(), FRAGMENTS_AB);
}

#[test]
fn fragments_with_parameters() {
    check(
        |b| {
            let value_a = b.register_field_options(string(), FieldOptions::default().with_parameter("baz", "qux"));
            object([(
                "foo",
                tagged_union(
                    "__typename",
                    [
                        object([("__typename", literal("A")), ("valueA", value_a)]),
                        object([("__typename", literal("B")), ("valueB", string())]),
                    ],
                ),
            )])
        },
        OperationOptions::default(),
        r#" { foo { ... on A { __typename, valueA(baz: "qux") }, ... on B { __typename, valueB } } }"#,
    );
}

#[test]
fn nested_fragments() {
    check(
        |_| {
            let inner = tagged_union(
                "__typename",
                [
                    object([("__typename", literal("C")), ("valueC", string())]),
                    object([("__typename", literal("D")), ("valueD", string())]),
                ],
            );
            object([(
                "foo",
                tagged_union(
                    "__typename",
                    [
                        object([("__typename", literal("A")), ("valueA", inner)]),
                        object([("__typename", literal("B")), ("valueB", string())]),
                    ],
                ),
            )])
        },
        OperationOptions::default(),
        " { foo { ... on A { __typename, valueA { ... on C { __typename, valueC }, \
         ... on D { __typename, valueD } } }, ... on B { __typename, valueB } } }",
    );
}

#[test]
fn fragments_in_lists() {
    check(|_| object([("foo", array(union_ab()))]), OperationOptions::default(), FRAGMENTS_AB);
    check(|_| object([("foo", tuple([union_ab()]))]), OperationOptions::default(), FRAGMENTS_AB);
    check(|_| object([("foo", array(union_ab()).nullable())]), OperationOptions::default(), FRAGMENTS_AB);
    check(
        |_| object([("foo", array(union_ab().nullable()).nullable())]),
        OperationOptions::default(),
        FRAGMENTS_AB,
    );
}

#[test]
fn objects_in_lists() {
    let bar = || object([("bar", string())]);
    check(|_| object([("foo", array(bar()))]), OperationOptions::default(), " { foo { bar } }");
    check(|_| object([("foo", tuple([bar()]))]), OperationOptions::default(), " { foo { bar } }");
    check(|_| object([("foo", array(bar()).nullable())]), OperationOptions::default(), " { foo { bar } }");
    check(
        |_| object([("foo", array(bar().nullable()).nullable())]),
        OperationOptions::default(),
        " { foo { bar } }",
    );
}

#[test]
fn transformed_object() {
    check(
        |_| object([("foo", object([("bar", string())]).transformed())]),
        OperationOptions::default(),
        " { foo { bar } }",
    );
}

#[test]
fn scalar_fields() {
    let fields = [
        number(),
        boolean(),
        literal(""),
        literal("").nullable(),
        array(literal("")),
        array(string()).read_only(),
    ];
    for field in fields {
        check(move |_| object([("foo", field.clone())]), OperationOptions::default(), " { foo }");
    }
}

#[test]
fn multiply_wrapped_field() {
    check(
        |_| object([("foo", lazy(|| literal("").nullable()).transformed())]),
        OperationOptions::default(),
        " { foo }",
    );
}

#[test]
fn always_undefined_fields_are_ignored() {
    check(|_| object([("foo", string()), ("bar", undefined())]), OperationOptions::default(), " { foo }");
}

#[test]
fn unions_of_primitives() {
    check(
        |_| {
            object([
                ("foo", union([string(), number(), boolean(), null(), undefined()])),
                ("bar", union([literal("a"), literal(1i64), literal(false)])),
            ])
        },
        OperationOptions::default(),
        " { foo, bar }",
    );
}

#[test]
fn custom_scalar_is_not_expanded() {
    check(
        |_| object([("foo", custom_scalar(object([("bar", object([("baz", string())]))])))]),
        OperationOptions::default(),
        " { foo }",
    );
    check(
        |_| object([("foo", custom_scalar(object([("bar", string())])).nullable())]),
        OperationOptions::default(),
        " { foo }",
    );
}

#[test]
fn self_referential_schema_resolves_lazily() {
    fn category(depth: usize) -> Node {
        if depth == 0 {
            return object([("name", string())]);
        }
        object([("name", string()), ("parent", lazy(move || category(depth - 1)).nullable())])
    }
    check(
        |_| object([("category", category(2))]),
        OperationOptions::default(),
        " { category { name, parent { name, parent { name } } } }",
    );
}

#[test]
fn building_is_deterministic() {
    let mut builder = QueryBuilder::new();
    let user = builder.register_field_options(
        object([("id", string()), ("pets", array(union_ab()))]),
        FieldOptions::alias("account").with_parameter("where", GraphqlValue::object([("id", var("$id"))])),
    );
    let root = object([("user", user)]).read_only();
    let options = OperationOptions::named("User").with_variable("$id", "ID!");

    let first = builder.build_query(&root, &options).unwrap();
    let second = builder.build_query(&root, &options).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first,
        "query User($id: ID!) { user: account(where: {id: $id}) { id, pets { ... on A { __typename, valueA }, \
         ... on B { __typename, valueB } } } }"
    );
}

#[test]
fn builders_do_not_share_registrations() {
    let mut first = QueryBuilder::new();
    let second = QueryBuilder::new();
    let foo = first.register_field_options(string(), FieldOptions::alias("bar"));
    let root = object([("foo", foo)]);
    assert_eq!(first.build_query(&root, &OperationOptions::default()).unwrap(), "query { foo: bar }");
    assert_eq!(second.build_query(&root, &OperationOptions::default()).unwrap(), "query { foo }");
}

#[test]
fn first_failure_aborts_the_build() {
    let mut builder = QueryBuilder::new();
    let bad = builder.register_field_options(string(), FieldOptions::default().with_parameter("not-ok", 1));
    let also_bad = builder.register_field_options(string(), FieldOptions::alias("no way"));
    let root = object([("a", bad), ("b", also_bad)]);
    let error = builder.build_query(&root, &OperationOptions::default()).unwrap_err();
    assert_eq!(error, BuildError::InvalidParameterName("not-ok".into()));
}
