//! Round trips against a real PostgreSQL server.
//!
//! Set `DATABASE_URL` (directly or in `.env`) to run these; they skip
//! otherwise. Each test works on temporary tables of its own connection.

use structq::prelude::*;
use structq::{JoinOp, JoinSpec, create_pool};

#[derive(Debug, Clone, Table, FromRow)]
#[orm(table = "invoice_test")]
pub struct Invoice {
    pub id: i64,
    pub created: i64,
    pub memo: String,
    pub person_id: i64,
    pub is_paid: bool,
    #[orm(transient)]
    pub person_name: Option<String>,
}

#[derive(Debug, Clone, Table, FromRow)]
#[orm(table = "person_test")]
pub struct Person {
    pub id: i64,
    pub name: String,
}

fn database_url(test: &str) -> Option<String> {
    dotenvy::dotenv().ok();
    match std::env::var("DATABASE_URL") {
        Ok(url) => Some(url),
        Err(_) => {
            eprintln!("DATABASE_URL is not set; skipping {test}");
            None
        }
    }
}

fn db() -> DbMap {
    let mut db = DbMap::from_config(
        DbMapConfig::new(DialectKind::Postgres).with_extension(ExtensionKind::Postgres),
    );
    db.add_table::<Invoice>();
    db.add_table::<Person>();
    db
}

async fn setup(client: &deadpool_postgres::Client, db: &DbMap) -> OrmResult<()> {
    client
        .batch_execute(
            "CREATE TEMP TABLE person_test (id BIGINT PRIMARY KEY, name TEXT NOT NULL);
             CREATE TEMP TABLE invoice_test (
                 id BIGINT PRIMARY KEY,
                 created BIGINT NOT NULL,
                 memo TEXT NOT NULL,
                 person_id BIGINT NOT NULL,
                 is_paid BOOLEAN NOT NULL
             );",
        )
        .await
        .map_err(OrmError::from_db_error)?;

    for (id, name) in [(1i64, "alice"), (2, "bob")] {
        let p = Person::reference();
        db.query(client, &p)
            .assign(p.id, id)
            .assign(p.name, name)
            .insert()
            .await?;
    }

    let created = [1i64, 2, 1, 2, 1];
    for (i, created) in created.into_iter().enumerate() {
        let id = i as i64 + 1;
        let inv = Invoice::reference();
        let inserted = db
            .query(client, &inv)
            .assign(inv.id, id)
            .assign(inv.created, created)
            .assign(inv.memo, format!("memo {id}"))
            .assign(inv.person_id, if id % 2 == 0 { 2i64 } else { 1i64 })
            .assign(inv.is_paid, id % 2 == 1)
            .insert()
            .await?;
        assert_eq!(inserted, 1);
    }
    Ok(())
}

#[tokio::test]
async fn filter_count_delete_round_trip() -> OrmResult<()> {
    let Some(url) = database_url("filter_count_delete_round_trip") else {
        return Ok(());
    };
    let pool = create_pool(&url)?;
    let client = pool.get().await?;
    let db = db();
    setup(&client, &db).await?;

    let inv = Invoice::reference();
    let rows = db
        .query(&client, &inv)
        .where_()
        .equal(inv.memo, "memo 3")
        .select()
        .await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, 3);
    assert_eq!(rows[0].person_name, None);

    let ids_only = db
        .query(&client, &inv)
        .where_()
        .less(inv.id, 3i64)
        .fields([inv.id])
        .order_by(inv.id, "")
        .select()
        .await?;
    let ids: Vec<i64> = ids_only.iter().map(|i| i.id).collect();
    assert_eq!(ids, [1, 2]);
    assert!(ids_only.iter().all(|i| i.memo.is_empty() && !i.is_paid));

    let paid = db
        .query(&client, &inv)
        .where_()
        .is_true(inv.is_paid)
        .count()
        .await?;
    assert_eq!(paid, 3);

    let deleted = db
        .query(&client, &inv)
        .where_()
        .is_false(inv.is_paid)
        .delete()
        .await?;
    assert_eq!(deleted, 2);

    let unpaid = db
        .query(&client, &inv)
        .where_()
        .is_false(inv.is_paid)
        .count()
        .await?;
    assert_eq!(unpaid, 0);
    Ok(())
}

#[tokio::test]
async fn ordering_and_paging() -> OrmResult<()> {
    let Some(url) = database_url("ordering_and_paging") else {
        return Ok(());
    };
    let pool = create_pool(&url)?;
    let client = pool.get().await?;
    let db = db();
    setup(&client, &db).await?;

    let inv = Invoice::reference();
    let asc = db
        .query(&client, &inv)
        .order_by(inv.created, "asc")
        .select()
        .await?;
    assert!(asc.windows(2).all(|w| w[0].created <= w[1].created));

    let desc = db
        .query(&client, &inv)
        .order_by(inv.created, "desc")
        .select()
        .await?;
    assert!(desc.windows(2).all(|w| w[0].created >= w[1].created));

    let err = db
        .query(&client, &inv)
        .order_by(inv.created, "sideways")
        .select()
        .await
        .unwrap_err();
    assert_eq!(
        err.as_plan_error(),
        Some(&PlanError::InvalidDirection("sideways".into()))
    );

    let page = db
        .query(&client, &inv)
        .where_()
        .greater(inv.id, 1i64)
        .order_by(inv.id, "")
        .limit(2)
        .offset(1)
        .select()
        .await?;
    let ids: Vec<i64> = page.iter().map(|i| i.id).collect();
    assert_eq!(ids, [3, 4]);
    Ok(())
}

#[tokio::test]
async fn joins_and_updates() -> OrmResult<()> {
    let Some(url) = database_url("joins_and_updates") else {
        return Ok(());
    };
    let pool = create_pool(&url)?;
    let client = pool.get().await?;
    let db = db();
    setup(&client, &db).await?;

    let inv = Invoice::reference();
    let person = Person::reference();
    let bobs = db
        .query(&client, &inv)
        .join(&person)
        .on()
        .equal(inv.person_id, person.id)
        .where_()
        .equal(person.name, "bob")
        .order_by(inv.id, "")
        .select()
        .await?;
    let ids: Vec<i64> = bobs.iter().map(|i| i.id).collect();
    assert_eq!(ids, [2, 4]);

    let updated = db
        .query(&client, &inv)
        .postgres()
        .assign(inv.memo, "bob's")
        .join(&person)
        .equal(inv.person_id, person.id)
        .where_()
        .equal(person.name, "bob")
        .update()
        .await?;
    assert_eq!(updated, 2);

    let with_names = JoinOp::new(inv.person_name, move |_, _| {
        let person = Person::reference();
        Some(JoinSpec::left(person, person.name).on(Filter::equal(inv.person_id, person.id)))
    });
    let rows = db
        .query_with(&client, &inv, vec![with_names])
        .where_()
        .equal(inv.memo, "bob's")
        .add_field(inv.person_name)
        .select()
        .await?;
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.person_name.as_deref() == Some("bob")));
    Ok(())
}

#[tokio::test]
async fn subquery_round_trip() -> OrmResult<()> {
    let Some(url) = database_url("subquery_round_trip") else {
        return Ok(());
    };
    let pool = create_pool(&url)?;
    let client = pool.get().await?;
    let db = db();
    setup(&client, &db).await?;

    let inv = Invoice::reference();
    let early = db
        .query(&client, &inv)
        .where_()
        .equal(inv.created, 1i64)
        .into_subquery("early");
    let paid_early = db
        .query_subquery(&client, early)
        .where_()
        .is_true(inv.is_paid)
        .count()
        .await?;
    assert_eq!(paid_early, 3);
    Ok(())
}
