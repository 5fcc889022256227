//! Derived mappings, checked through rendered statements.
//!
//! Statement methods need no executor, so these use `&()` and never touch a
//! database.

#![allow(dead_code)]

use structq::prelude::*;
use structq::{FieldDef, JoinOp, JoinSpec, Reference as _};

#[derive(Debug, Clone, Default, Embed, FromRow)]
pub struct Audit {
    pub created: i64,
    #[orm(column = "updated_at")]
    pub updated: i64,
}

#[derive(Debug, Clone, Table, FromRow)]
#[orm(table = "invoice_test")]
pub struct Invoice {
    pub id: i64,
    #[orm(embed)]
    pub audit: Audit,
    pub memo: String,
    pub person_id: i64,
    pub is_paid: bool,
    #[orm(transient)]
    pub person_name: Option<String>,
    #[orm(skip)]
    pub loaded: bool,
    cached: Option<String>,
}

#[derive(Debug, Clone, Table, FromRow)]
#[orm(table = "person_test", schema = "crm")]
pub struct Person {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Table)]
pub struct LineItem {
    pub id: i64,
}

#[derive(Debug, Clone, Table)]
pub struct OnlyPrivate {
    secret: i64,
}

fn db() -> DbMap {
    let mut db = DbMap::new(DialectKind::Postgres);
    db.add_table::<Invoice>();
    db.add_table::<Person>();
    db.add_table::<LineItem>();
    db.add_table::<OnlyPrivate>();
    db
}

#[test]
fn field_defs_follow_declaration_order() {
    assert_eq!(Invoice::TABLE, "invoice_test");
    assert_eq!(Invoice::SCHEMA, None);
    assert_eq!(Person::SCHEMA, Some("crm"));
    assert_eq!(LineItem::TABLE, "line_item");
    assert_eq!(
        Invoice::columns(),
        vec![
            FieldDef::new("id", "id"),
            FieldDef::new("created", "created"),
            FieldDef::new("updated", "updated_at"),
            FieldDef::new("memo", "memo"),
            FieldDef::new("person_id", "person_id"),
            FieldDef::new("is_paid", "is_paid"),
            FieldDef::transient("person_name", "person_name"),
        ]
    );
    assert!(OnlyPrivate::columns().is_empty());
}

#[test]
fn reference_tokens_line_up_with_columns() {
    let inv = Invoice::reference();
    assert_eq!(inv.id.index(), 0);
    assert_eq!(inv.audit.created.index(), 1);
    assert_eq!(inv.audit.updated.index(), 2);
    assert_eq!(inv.person_name.index(), 6);
    assert_eq!(inv.audit.updated.instance(), inv.instance());
    assert_ne!(Invoice::reference().instance(), inv.instance());
}

#[test]
fn embedded_fields_are_plain_columns() {
    let db = db();
    let inv = Invoice::reference();

    let stmt = db
        .query(&(), &inv)
        .where_()
        .greater_or_equal(inv.audit.created, 10i64)
        .fields([inv.id, inv.audit.updated])
        .select_statement()
        .unwrap();
    assert_eq!(
        stmt.sql(),
        "SELECT \"invoice_test\".\"id\", \"invoice_test\".\"updated_at\" FROM \"invoice_test\" \
         WHERE \"invoice_test\".\"created\" >= $1"
    );
}

#[test]
fn join_with_schema_qualified_table() {
    let db = db();
    let inv = Invoice::reference();
    let person = Person::reference();

    let stmt = db
        .query(&(), &inv)
        .join(&person)
        .on()
        .equal(inv.person_id, person.id)
        .where_()
        .equal(person.name, "x")
        .fields([inv.id])
        .select_statement()
        .unwrap();
    assert_eq!(
        stmt.sql(),
        "SELECT \"invoice_test\".\"id\" FROM \"invoice_test\" \
         INNER JOIN \"crm\".\"person_test\" ON \"invoice_test\".\"person_id\" = \"crm\".\"person_test\".\"id\" \
         WHERE \"crm\".\"person_test\".\"name\" = $1"
    );
    assert_eq!(stmt.args().len(), 1);
}

#[test]
fn private_only_struct_is_not_mappable() {
    let db = db();
    let only = OnlyPrivate::reference();

    let err = db.query(&(), &only).select_statement().unwrap_err();
    assert!(matches!(
        err.as_plan_error(),
        Some(PlanError::NoMappableFields { .. })
    ));
}

#[test]
fn transient_field_joined_on_demand() {
    let db = db();
    let inv = Invoice::reference();
    let person_name = JoinOp::new(inv.person_name, move |_, _| {
        let person = Person::reference();
        Some(
            JoinSpec::left(person, person.name)
                .alias("owner")
                .on(Filter::equal(inv.person_id, person.id)),
        )
    });

    let stmt = db
        .query_with(&(), &inv, vec![person_name])
        .fields([inv.id, inv.person_name])
        .select_statement()
        .unwrap();
    assert_eq!(
        stmt.sql(),
        "SELECT \"invoice_test\".\"id\", \"owner\".\"name\" AS \"person_name\" FROM \"invoice_test\" \
         LEFT OUTER JOIN \"crm\".\"person_test\" AS \"owner\" ON \"invoice_test\".\"person_id\" = \"owner\".\"id\""
    );
}

#[test]
fn config_driven_dialect() {
    let config: DbMapConfig = serde_json::from_str(r#"{"dialect":"sqlite"}"#).unwrap();
    let mut db = DbMap::from_config(config);
    db.add_table::<LineItem>();
    let item = LineItem::reference();

    let stmt = db
        .query(&(), &item)
        .where_()
        .in_list(item.id, [1i64, 2])
        .limit(1)
        .select_statement()
        .unwrap();
    assert_eq!(
        stmt.sql(),
        "SELECT \"line_item\".\"id\" FROM \"line_item\" WHERE \"line_item\".\"id\" IN (?, ?) LIMIT ?"
    );
    assert_eq!(stmt.args().len(), 3);
}
