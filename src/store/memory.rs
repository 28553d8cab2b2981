use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};
use time::{macros::format_description, Duration, OffsetDateTime};

use super::{DataStore, Direction, Filter, Query, StoreError};

#[derive(Default)]
struct Tables {
    rows: HashMap<String, Vec<Value>>,
    next_id: HashMap<String, i64>,
    inserts: u32,
}

/// In-process stand-in for the hosted store: ids and `created_at` are
/// generated on insert, `created_at` strictly increasing and fixed-width
/// so string order matches time order.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    failing: Mutex<HashSet<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads rows as-is; the next generated id continues after the largest seeded one.
    pub fn seed(&self, table: &str, rows: Vec<Value>) {
        let mut t = self.tables.lock().expect("store lock");
        let max_id = rows
            .iter()
            .filter_map(|r| r.get("id").and_then(Value::as_i64))
            .max()
            .unwrap_or(0);
        let next = t.next_id.entry(table.to_string()).or_insert(1);
        *next = (*next).max(max_id + 1);
        t.rows.entry(table.to_string()).or_default().extend(rows);
    }

    pub fn count(&self, table: &str) -> usize {
        let t = self.tables.lock().expect("store lock");
        t.rows.get(table).map(Vec::len).unwrap_or(0)
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        let t = self.tables.lock().expect("store lock");
        t.rows.get(table).cloned().unwrap_or_default()
    }

    /// Every later insert into `table` fails with a 500 from the "server".
    pub fn fail_inserts_into(&self, table: &str) {
        self.failing
            .lock()
            .expect("failing lock")
            .insert(table.to_string());
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn compare(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

fn matches(row: &Value, filter: &Filter) -> bool {
    match filter {
        Filter::Eq(column, expected) => {
            let actual = row.get(column).unwrap_or(&Value::Null);
            values_equal(actual, expected)
        }
        Filter::In(column, options) => {
            let actual = row.get(column).unwrap_or(&Value::Null);
            options.iter().any(|o| values_equal(actual, o))
        }
    }
}

fn project(row: &Value, columns: &str) -> Value {
    if columns.trim() == "*" {
        return row.clone();
    }
    let mut out = Map::new();
    for col in columns.split(',').map(str::trim) {
        if let Some(v) = row.get(col) {
            out.insert(col.to_string(), v.clone());
        }
    }
    Value::Object(out)
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn select(&self, query: &Query) -> Result<Vec<Value>, StoreError> {
        let t = self.tables.lock().expect("store lock");
        let mut rows: Vec<Value> = t
            .rows
            .get(&query.table)
            .map(|rows| {
                rows.iter()
                    .filter(|r| query.filters.iter().all(|f| matches(r, f)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        rows.sort_by(|a, b| {
            for o in &query.order {
                let av = a.get(&o.column).unwrap_or(&Value::Null);
                let bv = b.get(&o.column).unwrap_or(&Value::Null);
                let ord = match o.direction {
                    Direction::Asc => compare(av, bv),
                    Direction::Desc => compare(bv, av),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });

        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }

        Ok(rows.iter().map(|r| project(r, &query.columns)).collect())
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Value, StoreError> {
        if self.failing.lock().expect("failing lock").contains(table) {
            return Err(StoreError::Api {
                status: 500,
                body: format!("insert into {table} rejected"),
            });
        }

        let Value::Object(mut fields) = row else {
            return Err(StoreError::Decode {
                table: table.to_string(),
                reason: "row must be a JSON object".into(),
            });
        };

        let mut t = self.tables.lock().expect("store lock");
        let next = t.next_id.entry(table.to_string()).or_insert(1);
        let id = *next;
        *next += 1;
        t.inserts += 1;
        let created_at = (OffsetDateTime::now_utc() + Duration::milliseconds(i64::from(t.inserts)))
            .format(format_description!(
                "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]+00:00"
            ))
            .map_err(|e| StoreError::Decode {
                table: table.to_string(),
                reason: e.to_string(),
            })?;

        fields.entry("id").or_insert(Value::from(id));
        fields
            .entry("created_at")
            .or_insert(Value::String(created_at));

        let stored = Value::Object(fields);
        t.rows.entry(table.to_string()).or_default().push(stored.clone());
        Ok(stored)
    }
}

#[cfg(test)]
mod memory_tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn insert_assigns_ids_and_timestamps() {
        let store = MemoryStore::new();
        let a = store.insert("recetas", json!({"nombre": "a"})).await.unwrap();
        let b = store.insert("recetas", json!({"nombre": "b"})).await.unwrap();
        assert_eq!(a["id"], 1);
        assert_eq!(b["id"], 2);
        assert!(a["created_at"].as_str().unwrap() < b["created_at"].as_str().unwrap());
    }

    #[tokio::test]
    async fn select_filters_orders_and_limits() {
        let store = MemoryStore::new();
        store.seed(
            "productos",
            vec![
                json!({"id": 1, "estado": "proximo_vencer", "fecha_caducidad": "2024-03-01"}),
                json!({"id": 2, "estado": "ok", "fecha_caducidad": "2024-01-01"}),
                json!({"id": 3, "estado": "proximo_vencer", "fecha_caducidad": "2024-02-01"}),
            ],
        );

        let q = Query::table("productos")
            .eq("estado", "proximo_vencer")
            .order("fecha_caducidad", Direction::Asc);
        let rows = store.select(&q).await.unwrap();
        let ids: Vec<i64> = rows.iter().map(|r| r["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![3, 1]);

        let q = Query::table("productos").in_("id", [2, 3, 99]).limit(1);
        let rows = store.select(&q).await.unwrap();
        assert_eq!(rows.len(), 1);

        let next = store.insert("productos", json!({"nombre": "x"})).await.unwrap();
        assert_eq!(next["id"], 4);
    }

    #[tokio::test]
    async fn failing_table_rejects_inserts() {
        let store = MemoryStore::new();
        store.fail_inserts_into("recetas");
        let err = store.insert("recetas", json!({})).await.unwrap_err();
        assert!(matches!(err, StoreError::Api { status: 500, .. }));
        assert_eq!(store.count("recetas"), 0);
    }
}
