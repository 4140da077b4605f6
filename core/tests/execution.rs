//! Execution-layer tests against a scripted in-memory adapter.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::Arc;

use serde::Deserialize;

use quarry_core::prelude::*;
use quarry_core::{Adapter, Op, Row, Rows, with_tx};

#[derive(Debug, PartialEq, Deserialize)]
struct User {
    id: i64,
    name: String,
}

fn repo() -> (Repository<User>, Field<User>, Field<User>) {
    let mut b = Repository::<User>::builder("users");
    let id = b.add(Column::int("id", |u: &User| u.id.into()));
    let name = b.add(Column::text("name", |u: &User| u.name.as_str().into()));
    let repo = b.build().unwrap();
    (repo, id, name)
}

fn user_row(id: i64, name: &str) -> Row {
    vec![
        ("id".to_owned(), Value::Int(id)),
        ("name".to_owned(), Value::Text(name.to_owned())),
    ]
}

// ==================== scripted adapter ====================

#[derive(Default)]
struct MockAdapter {
    dialect: Dialect,
    log: RefCell<Vec<String>>,
    result_sets: RefCell<VecDeque<Vec<Row>>>,
    affected: RefCell<VecDeque<u64>>,
}

impl MockAdapter {
    fn new() -> Self {
        Self::default()
    }

    fn with_dialect(dialect: Dialect) -> Self {
        MockAdapter {
            dialect,
            ..Self::default()
        }
    }

    fn script_rows(&self, rows: Vec<Row>) {
        self.result_sets.borrow_mut().push_back(rows);
    }

    fn script_affected(&self, n: u64) {
        self.affected.borrow_mut().push_back(n);
    }

    fn queries(&self) -> usize {
        self.log
            .borrow()
            .iter()
            .filter(|sql| sql.starts_with("SELECT"))
            .count()
    }

    fn log_contains(&self, needle: &str) -> bool {
        self.log.borrow().iter().any(|sql| sql.contains(needle))
    }
}

struct VecRows {
    rows: Vec<Row>,
    pos: Option<usize>,
}

impl Rows for VecRows {
    fn advance(&mut self) -> quarry_core::Result<bool> {
        let next = self.pos.map_or(0, |p| p + 1);
        if next < self.rows.len() {
            self.pos = Some(next);
            Ok(true)
        } else {
            self.pos = None;
            Ok(false)
        }
    }

    fn row(&self) -> quarry_core::Result<Row> {
        let pos = self
            .pos
            .ok_or_else(|| Error::Execution("row cursor is not positioned".into()))?;
        Ok(self.rows[pos].clone())
    }
}

impl Adapter for MockAdapter {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn execute(&self, _ctx: &Context, sql: &str, _params: &[Value]) -> quarry_core::Result<u64> {
        self.log.borrow_mut().push(sql.to_owned());
        Ok(self.affected.borrow_mut().pop_front().unwrap_or(1))
    }

    fn query<'a>(
        &'a self,
        _ctx: &Context,
        sql: &str,
        _params: &[Value],
    ) -> quarry_core::Result<Box<dyn Rows + 'a>> {
        self.log.borrow_mut().push(sql.to_owned());
        let rows = self.result_sets.borrow_mut().pop_front().unwrap_or_default();
        Ok(Box::new(VecRows { rows, pos: None }))
    }
}

// ==================== caching ====================

#[test]
fn second_identical_read_is_served_from_cache() {
    let (repo, id, _) = repo();
    let db = MockAdapter::new();
    db.script_rows(vec![user_row(1, "ann")]);
    let ctx = Context::new().with_cache(Arc::new(CacheStore::new()));

    let first = repo
        .get_list(&db, &ctx, |q| {
            q.filter().condition(id, Op::Gt, 0i64);
        })
        .unwrap();
    let second = repo
        .get_list(&db, &ctx, |q| {
            q.filter().condition(id, Op::Gt, 0i64);
        })
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(db.queries(), 1, "second read must not touch the adapter");
}

#[test]
fn different_params_are_distinct_cache_entries() {
    let (repo, id, _) = repo();
    let db = MockAdapter::new();
    db.script_rows(vec![user_row(1, "ann")]);
    db.script_rows(vec![user_row(2, "bob")]);
    let ctx = Context::new().with_cache(Arc::new(CacheStore::new()));

    repo.get_list(&db, &ctx, |q| {
        q.filter().condition(id, Op::Eq, 1i64);
    })
    .unwrap();
    repo.get_list(&db, &ctx, |q| {
        q.filter().condition(id, Op::Eq, 2i64);
    })
    .unwrap();

    assert_eq!(db.queries(), 2);
}

#[test]
fn mutations_invalidate_cached_reads() {
    let (repo, id, _) = repo();
    let db = MockAdapter::new();
    db.script_rows(vec![user_row(1, "ann")]);
    db.script_rows(vec![user_row(1, "ann"), user_row(2, "bob")]);
    let ctx = Context::new().with_cache(Arc::new(CacheStore::new()));

    let read = |db: &MockAdapter| {
        repo.get_list(db, &ctx, |q| {
            q.filter().condition(id, Op::Gt, 0i64);
        })
        .unwrap()
    };

    assert_eq!(read(&db).len(), 1);
    assert_eq!(read(&db).len(), 1);
    assert_eq!(db.queries(), 1);

    let bob = User {
        id: 2,
        name: "bob".into(),
    };
    repo.insert(&db, &ctx, &bob, |_| {}).unwrap();

    assert_eq!(read(&db).len(), 2, "insert must wipe the cache scope");
    assert_eq!(db.queries(), 2);
}

#[test]
fn delete_invalidates_cached_reads() {
    let (repo, id, _) = repo();
    let db = MockAdapter::new();
    db.script_rows(vec![user_row(1, "ann")]);
    db.script_rows(vec![]);
    let ctx = Context::new().with_cache(Arc::new(CacheStore::new()));

    repo.get_list(&db, &ctx, |q| {
        q.filter().condition(id, Op::Gt, 0i64);
    })
    .unwrap();
    repo.delete(&db, &ctx, |q| {
        q.filter().condition(id, Op::Eq, 1i64);
    })
    .unwrap();
    repo.get_list(&db, &ctx, |q| {
        q.filter().condition(id, Op::Gt, 0i64);
    })
    .unwrap();

    assert_eq!(db.queries(), 2);
}

#[test]
fn mutation_affecting_nothing_keeps_the_cache() {
    let (repo, id, _) = repo();
    let db = MockAdapter::new();
    db.script_rows(vec![user_row(1, "ann")]);
    let ctx = Context::new().with_cache(Arc::new(CacheStore::new()));

    repo.get_list(&db, &ctx, |q| {
        q.filter().condition(id, Op::Gt, 0i64);
    })
    .unwrap();
    db.script_affected(0);
    repo.delete(&db, &ctx, |q| {
        q.filter().condition(id, Op::Eq, 99i64);
    })
    .unwrap();
    repo.get_list(&db, &ctx, |q| {
        q.filter().condition(id, Op::Gt, 0i64);
    })
    .unwrap();

    assert_eq!(db.queries(), 1);
}

#[test]
fn reads_without_a_store_always_hit_the_adapter() {
    let (repo, id, _) = repo();
    let db = MockAdapter::new();
    db.script_rows(vec![user_row(1, "ann")]);
    db.script_rows(vec![user_row(1, "ann")]);
    let ctx = Context::new();

    for _ in 0..2 {
        repo.get_list(&db, &ctx, |q| {
            q.filter().condition(id, Op::Gt, 0i64);
        })
        .unwrap();
    }
    assert_eq!(db.queries(), 2);
}

// ==================== reads ====================

#[test]
fn get_first_maps_an_empty_set_to_not_found() {
    let (repo, id, _) = repo();
    let db = MockAdapter::new();
    db.script_rows(vec![]);
    let ctx = Context::new();

    let err = repo
        .get_first(&db, &ctx, |q| {
            q.filter().condition(id, Op::Eq, 404i64);
        })
        .unwrap_err();
    assert!(matches!(err, Error::NotFound));
}

#[test]
fn count_reads_the_window_column() {
    let (repo, _, _) = repo();
    let db = MockAdapter::new();
    db.script_rows(vec![vec![("count".to_owned(), Value::Int(5))]]);
    let ctx = Context::new();

    let n = repo.count(&db, &ctx, |_| {}).unwrap();
    assert_eq!(n, 5);
    assert!(db.log_contains("SELECT count(*) over() AS count FROM users"));
}

#[test]
fn count_of_an_empty_set_is_zero() {
    let (repo, _, _) = repo();
    let db = MockAdapter::new();
    db.script_rows(vec![]);
    let ctx = Context::new();
    assert_eq!(repo.count(&db, &ctx, |_| {}).unwrap(), 0);
}

#[test]
fn postgres_dialect_reaches_the_adapter_translated() {
    let (repo, id, _) = repo();
    let db = MockAdapter::with_dialect(Dialect::PostgreSQL);
    db.script_rows(vec![user_row(1, "ann")]);
    let ctx = Context::new();

    repo.get_list(&db, &ctx, |q| {
        q.filter().condition(id, Op::Eq, 1i64);
    })
    .unwrap();
    assert!(db.log_contains("users.id = $1"));
}

// ==================== mutations ====================

#[test]
fn insert_affecting_nothing_is_an_error() {
    let (repo, _, _) = repo();
    let db = MockAdapter::new();
    db.script_affected(0);
    let ctx = Context::new();

    let ann = User {
        id: 1,
        name: "ann".into(),
    };
    let err = repo.insert(&db, &ctx, &ann, |_| {}).unwrap_err();
    assert!(matches!(err, Error::NoRowsAffected));
}

#[test]
fn update_reports_affected_rows() {
    let (repo, id, _) = repo();
    let db = MockAdapter::new();
    db.script_affected(3);
    let ctx = Context::new();

    let ann = User {
        id: 1,
        name: "ann".into(),
    };
    let affected = repo
        .update(&db, &ctx, &ann, |q| {
            q.exclude(&[id]);
            q.filter().condition(id, Op::Gt, 0i64);
        })
        .unwrap();
    assert_eq!(affected, 3);
    assert!(db.log_contains("UPDATE users SET name = ? WHERE users.id > ?"));
}

// ==================== persistent filter ====================

#[test]
fn persistent_filter_is_grouped_ahead_of_user_conditions() {
    let mut b = Repository::<User>::builder("users");
    let id = b.add(Column::int("id", |u: &User| u.id.into()));
    b.add(Column::text("name", |u: &User| u.name.as_str().into()));
    b.persistent_filter(move |w| {
        w.condition(id, Op::Gt, 0i64);
    });
    let repo = b.build().unwrap();

    let db = MockAdapter::new();
    db.script_rows(vec![]);
    let ctx = Context::new();

    repo.get_list(&db, &ctx, |q| {
        q.filter().condition(id, Op::Eq, 7i64).or().condition(id, Op::Eq, 8i64);
    })
    .unwrap();
    assert!(db.log_contains(
        "WHERE (users.id > ?) AND users.id = ? OR users.id = ?"
    ));
}

// ==================== transactions ====================

#[test]
fn commit_sets_the_flag_and_reaches_the_adapter() {
    let db = MockAdapter::new();
    let ctx = Context::new();

    let mut tx = quarry_core::begin(&db as &dyn Adapter, &ctx).unwrap();
    quarry_core::Tx::commit(&mut tx).unwrap();
    assert!(tx.is_committed());
    drop(tx);

    assert!(db.log_contains("BEGIN"));
    assert!(db.log_contains("COMMIT"));
    assert!(!db.log_contains("ROLLBACK"), "drop after commit is a no-op");
}

#[test]
fn dropping_an_unfinished_transaction_rolls_back() {
    let db = MockAdapter::new();
    let ctx = Context::new();
    {
        let _tx = quarry_core::begin(&db as &dyn Adapter, &ctx).unwrap();
    }
    assert!(db.log_contains("ROLLBACK"));
}

#[test]
fn explicit_rollback_then_drop_rolls_back_once() {
    let db = MockAdapter::new();
    let ctx = Context::new();
    {
        let mut tx = quarry_core::begin(&db as &dyn Adapter, &ctx).unwrap();
        quarry_core::Tx::rollback(&mut tx).unwrap();
        assert!(
            quarry_core::Tx::rollback(&mut tx).is_err(),
            "double rollback is rejected"
        );
    }
    let rollbacks = db
        .log
        .borrow()
        .iter()
        .filter(|sql| sql.as_str() == "ROLLBACK")
        .count();
    assert_eq!(rollbacks, 1);
}

#[test]
fn with_tx_commits_on_success_and_rolls_back_on_error() {
    let (repo, id, _) = repo();
    let db = MockAdapter::new();
    let ctx = Context::new();

    let affected = with_tx(&db as &dyn Adapter, &ctx, |tx| {
        repo.delete(tx, &ctx, |q| {
            q.filter().condition(id, Op::Eq, 1i64);
        })
    })
    .unwrap();
    assert_eq!(affected, 1);
    assert!(db.log_contains("COMMIT"));

    let err: quarry_core::Result<()> = with_tx(&db as &dyn Adapter, &ctx, |_tx| {
        Err(Error::Execution("boom".into()))
    });
    assert!(err.is_err());
    assert!(db.log_contains("ROLLBACK"));
}
