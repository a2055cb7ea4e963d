//! Integration tests for the query engine.

use odata_core::catalog::{EntityDef, FieldDef, RelationDef, ScalarType, Schema};
use odata_core::query::QueryExecutor;
use odata_core::storage::MemoryStore;
use odata_core::Error;
use odata_lang::{parse_options, resolve};
use odata_proto::{QueryResult, Value};

struct TestContext {
    store: MemoryStore,
}

impl TestContext {
    fn new() -> Self {
        let schema = Schema::builder()
            .with_entity(
                EntityDef::new("Tag", "id")
                    .field("id", ScalarType::Int)
                    .field("name", ScalarType::String),
            )
            .with_entity(
                EntityDef::new("Number", "id")
                    .field("id", ScalarType::Int)
                    .field("value", ScalarType::Int),
            )
            .with_entity(
                EntityDef::new("Sub", "id")
                    .field("id", ScalarType::Int)
                    .field("name", ScalarType::String),
            )
            .with_entity(
                EntityDef::new("Main", "id")
                    .field("id", ScalarType::Int)
                    .field("name", ScalarType::String)
                    .with_field(FieldDef::optional("rel_id", ScalarType::Int)),
            )
            .with_entity(
                EntityDef::new("Author", "id")
                    .field("id", ScalarType::Int)
                    .field("name", ScalarType::String)
                    .field("dateOfBirth", ScalarType::DateTime),
            )
            .with_entity(
                EntityDef::new("Post", "id")
                    .field("id", ScalarType::Int)
                    .field("title", ScalarType::String)
                    .field("body", ScalarType::String)
                    .field("author_id", ScalarType::Int)
                    .field("publishDate", ScalarType::DateTime),
            )
            .with_relation(RelationDef::to_one("rel", "Main", "rel_id", "Sub", "id"))
            .with_relation_pair(
                RelationDef::to_many("posts", "Author", "id", "Post", "author_id"),
                "author",
            )
            .build()
            .unwrap();

        Self {
            store: MemoryStore::new(schema),
        }
    }

    fn executor(&self) -> QueryExecutor<'_, MemoryStore> {
        QueryExecutor::new(&self.store)
    }

    fn insert(&mut self, entity_set: &str, fields: Vec<(&str, Value)>) {
        self.store.insert(entity_set, fields).unwrap();
    }

    /// Run `path` with raw `$filter`/`$orderby` values.
    fn query(&self, path: &str, filter: Option<&str>, order_by: Option<&str>) -> Result<QueryResult, Error> {
        let target = resolve(path).unwrap();
        let options = parse_options(filter, order_by, None).unwrap();
        self.executor().execute(&target, Some(&options))
    }

    fn names(&self, path: &str, filter: Option<&str>, order_by: Option<&str>) -> Vec<String> {
        self.query(path, filter, order_by)
            .unwrap()
            .records()
            .iter()
            .map(|r| r.get("name").unwrap().to_text())
            .collect()
    }
}

fn setup_tags(ctx: &mut TestContext) {
    for (id, name) in [(1, "tag2"), (2, "tag1"), (3, "tag3"), (4, "tag3")] {
        ctx.insert("Tag", vec![("id", Value::from(id)), ("name", Value::from(name))]);
    }
    for x in 0..10 {
        ctx.insert("Number", vec![("id", Value::from(x + 1)), ("value", Value::from(x))]);
    }
}

fn setup_main_sub(ctx: &mut TestContext) {
    for (id, sub, main) in [
        (1, "Subobject2", "Mainobject2"),
        (2, "Subobject1", "Mainobject1"),
        (3, "Subobject3", "Mainobject3"),
    ] {
        ctx.insert("Sub", vec![("id", Value::from(id)), ("name", Value::from(sub))]);
        ctx.insert(
            "Main",
            vec![
                ("id", Value::from(id)),
                ("name", Value::from(main)),
                ("rel_id", Value::from(id)),
            ],
        );
    }
}

fn setup_blog(ctx: &mut TestContext) {
    for (id, name) in [(1, "Newton"), (2, "Hooke")] {
        ctx.insert(
            "Author",
            vec![
                ("id", Value::from(id)),
                ("name", Value::from(name)),
                ("dateOfBirth", Value::from("1643-01-04")),
            ],
        );
    }
    for (id, title, author, date) in [
        (1, "t1", 1, "2017-03-14T09:00:00"),
        (2, "t2", 1, "2017-03-15T09:00:00"),
        (3, "t3", 2, "2017-03-16T09:00:00"),
    ] {
        ctx.insert(
            "Post",
            vec![
                ("id", Value::from(id)),
                ("title", Value::from(title)),
                ("body", Value::from(format!("b{id}"))),
                ("author_id", Value::from(author)),
                ("publishDate", Value::from(date)),
            ],
        );
    }
}

#[test]
fn test_orderby_simple() {
    let mut ctx = TestContext::new();
    setup_tags(&mut ctx);

    let names = ctx.names("Tag", None, Some("name"));
    assert_eq!(names.len(), 4);
    assert_eq!(names[0], "tag1");
    assert_eq!(names, ctx.names("Tag", None, Some("name asc")));
}

#[test]
fn test_orderby_desc() {
    let mut ctx = TestContext::new();
    setup_tags(&mut ctx);

    let names = ctx.names("Tag", None, Some("name desc"));
    assert_eq!(names, vec!["tag3", "tag3", "tag2", "tag1"]);
}

#[test]
fn test_orderby_multiple_keys() {
    let mut ctx = TestContext::new();
    setup_tags(&mut ctx);

    let result = ctx.query("Tag", None, Some("name asc,id desc")).unwrap();
    let rows: Vec<(String, Value)> = result
        .records()
        .iter()
        .map(|r| (r.get("name").unwrap().to_text(), r.key.clone()))
        .collect();

    assert_eq!(rows[2], ("tag3".to_string(), Value::Int64(4)));
    assert_eq!(rows[3], ("tag3".to_string(), Value::Int64(3)));
}

#[test]
fn test_orderby_is_stable() {
    let mut ctx = TestContext::new();
    setup_tags(&mut ctx);

    // equal names keep insertion order
    let result = ctx.query("Tag", None, Some("name")).unwrap();
    let keys: Vec<_> = result.records().iter().map(|r| r.key.clone()).collect();
    assert_eq!(keys[2..], [Value::Int64(3), Value::Int64(4)]);
}

#[test]
fn test_orderby_property_path() {
    let mut ctx = TestContext::new();
    setup_main_sub(&mut ctx);

    let expected = vec!["Mainobject1", "Mainobject2", "Mainobject3"];
    assert_eq!(ctx.names("Main", None, Some("rel/name")), expected);
    assert_eq!(ctx.names("Main", None, Some("rel/name asc")), expected);
    assert_eq!(
        ctx.names("Main", None, Some("rel/name desc")),
        vec!["Mainobject3", "Mainobject2", "Mainobject1"]
    );
}

#[test]
fn test_orderby_missing_relation_sorts_first() {
    let mut ctx = TestContext::new();
    setup_main_sub(&mut ctx);
    ctx.insert("Main", vec![("id", Value::from(9)), ("name", Value::from("Orphan"))]);

    let names = ctx.names("Main", None, Some("rel/name"));
    assert_eq!(names[0], "Orphan");
}

#[test]
fn test_numeric_filters() {
    let mut ctx = TestContext::new();
    setup_tags(&mut ctx);

    let count = |filter: &str| ctx.query("Number", Some(filter), None).unwrap().len();
    assert_eq!(count("value eq 1"), 1);
    assert_eq!(count("value gt 2"), 7);
    assert_eq!(count("value lt 2"), 2);
    assert_eq!(count("value ge 2"), 8);
    assert_eq!(count("value le 2"), 3);
    assert_eq!(count("value ne 2"), 9);
}

#[test]
fn test_integer_equality_at_range_edge() {
    let mut ctx = TestContext::new();
    ctx.insert("Number", vec![("id", Value::from(1)), ("value", Value::from(i64::MAX))]);
    ctx.insert("Number", vec![("id", Value::from(2)), ("value", Value::from(i64::MAX - 1))]);

    let count = |filter: &str| ctx.query("Number", Some(filter), None).unwrap().len();
    assert_eq!(count("value eq 9223372036854775808"), 0);
    assert_eq!(count("value eq 9223372036854775807"), 1);
    assert_eq!(count("value ne 9223372036854775807"), 1);
    assert_eq!(count("value eq 9223372036854775807.0"), 0);
    assert_eq!(count("value lt 9223372036854775807.0"), 2);
}

#[test]
fn test_text_filters() {
    let mut ctx = TestContext::new();
    setup_tags(&mut ctx);

    assert_eq!(ctx.names("Tag", Some("name eq tag3"), None), vec!["tag3", "tag3"]);
    assert_eq!(ctx.names("Tag", Some("name eq 'tag1'"), None), vec!["tag1"]);
    assert!(ctx.names("Tag", Some("name eq 'tag9'"), None).is_empty());
    assert_eq!(ctx.names("Tag", Some("name gt 'tag2'"), None), vec!["tag3", "tag3"]);
}

#[test]
fn test_field_to_field_comparison() {
    let mut ctx = TestContext::new();
    setup_tags(&mut ctx);

    // value = id - 1, so value ge id never holds and id ge value always does
    assert_eq!(ctx.query("Number", Some("value ge id"), None).unwrap().len(), 0);
    assert_eq!(ctx.query("Number", Some("id ge value"), None).unwrap().len(), 10);
}

#[test]
fn test_non_numeric_token_against_numeric_field() {
    let mut ctx = TestContext::new();
    setup_tags(&mut ctx);

    // falls back to text ordering: every digit sorts before 'f'
    assert_eq!(ctx.query("Number", Some("value ge field"), None).unwrap().len(), 0);
    assert_eq!(ctx.query("Number", Some("value lt field"), None).unwrap().len(), 10);
}

#[test]
fn test_relation_filter() {
    let mut ctx = TestContext::new();
    setup_main_sub(&mut ctx);

    assert_eq!(
        ctx.names("Main", Some("rel/name eq 'Subobject1'"), None),
        vec!["Mainobject1"]
    );
    assert_eq!(
        ctx.names("Main", Some("rel/name ge Subobject2"), Some("name")),
        vec!["Mainobject2", "Mainobject3"]
    );
}

#[test]
fn test_to_many_relation_filter_matches_any() {
    let mut ctx = TestContext::new();
    setup_blog(&mut ctx);

    assert_eq!(ctx.names("Author", Some("posts/title eq 't2'"), None), vec!["Newton"]);
    assert_eq!(ctx.names("Author", Some("posts/title eq 't3'"), None), vec!["Hooke"]);
}

#[test]
fn test_date_filter() {
    let mut ctx = TestContext::new();
    setup_blog(&mut ctx);

    let result = ctx
        .query("Post", Some("publishDate gt 2017-03-14T12:00"), None)
        .unwrap();
    assert_eq!(result.len(), 2);
}

#[test]
fn test_query_collections() {
    let mut ctx = TestContext::new();
    setup_blog(&mut ctx);

    let authors = ctx.query("Author", None, None).unwrap();
    assert!(!authors.is_single());
    assert_eq!(authors.len(), 2);
    assert_eq!(ctx.query("Post", None, None).unwrap().len(), 3);
}

#[test]
fn test_query_single_entity() {
    let mut ctx = TestContext::new();
    setup_blog(&mut ctx);

    let result = ctx.query("Author(1)", None, None).unwrap();
    let QueryResult::SingleEntity { entity_set, record } = result else {
        panic!("expected single entity");
    };
    assert_eq!(entity_set.name, "Author");
    assert_eq!(record.key, Value::Int64(1));
    assert_eq!(record.get("name"), Some(&Value::String("Newton".into())));
}

#[test]
fn test_query_related_collection() {
    let mut ctx = TestContext::new();
    setup_blog(&mut ctx);

    let result = ctx.query("Author(1)/posts", None, None).unwrap();
    assert_eq!(result.entity_set().name, "Post");
    assert_eq!(result.len(), 2);
    assert!(result
        .records()
        .iter()
        .all(|r| r.get("author_id") == Some(&Value::Int64(1))));

    let filtered = ctx
        .query("Author(1)/posts", Some("title eq 't2'"), Some("title desc"))
        .unwrap();
    assert_eq!(filtered.len(), 1);
}

#[test]
fn test_to_one_navigation() {
    let mut ctx = TestContext::new();
    setup_blog(&mut ctx);

    let result = ctx.query("Post(3)/author", None, None).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result.records()[0].get("name"), Some(&Value::String("Hooke".into())));
}

#[test]
fn test_entity_not_found() {
    let mut ctx = TestContext::new();
    setup_blog(&mut ctx);

    assert!(matches!(
        ctx.query("Author(999)", None, None),
        Err(Error::EntityNotFound { .. })
    ));
    assert!(matches!(
        ctx.query("Author(abc)", None, None),
        Err(Error::EntityNotFound { .. })
    ));
}

#[test]
fn test_unknown_entity_set_and_relation() {
    let mut ctx = TestContext::new();
    setup_blog(&mut ctx);

    assert!(matches!(
        ctx.query("Publisher", None, None),
        Err(Error::UnknownEntitySet { .. })
    ));
    assert!(matches!(
        ctx.query("Author(1)/comments", None, None),
        Err(Error::UnknownProperty { .. })
    ));
}

#[test]
fn test_compile_errors_before_store_access() {
    let mut ctx = TestContext::new();
    setup_blog(&mut ctx);

    // the unknown property wins over the missing key
    assert!(matches!(
        ctx.query("Author(999)", Some("age gt 3"), None),
        Err(Error::UnknownProperty { .. })
    ));
}

#[test]
fn test_select_projection() {
    let mut ctx = TestContext::new();
    setup_blog(&mut ctx);

    let target = resolve("Author").unwrap();
    let options = parse_options(None, None, Some("name")).unwrap();
    let result = ctx.executor().execute(&target, Some(&options)).unwrap();

    for record in result.records() {
        assert_eq!(record.fields.len(), 1);
        assert!(record.get("name").is_some());
        assert!(!record.key.is_null());
    }
}

#[test]
fn test_execute_without_options() {
    let mut ctx = TestContext::new();
    setup_tags(&mut ctx);

    let result = ctx.executor().execute(&resolve("Tag(2)").unwrap(), None).unwrap();
    assert!(result.is_single());
    assert_eq!(result.records()[0].get("name"), Some(&Value::String("tag1".into())));
}
