//! Gateway to the hosted data store.
//!
//! Handlers only see the [`DataStore`] trait: table-scoped selects with
//! equality / membership filters, ordering and limit, plus single-row inserts.

#[cfg(test)]
pub mod memory;
pub mod supabase;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::config::{ConfigError, SupabaseConfig};

pub use supabase::SupabaseStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("store error status={status} body={body}")]
    Api { status: u16, body: String },
    #[error("invalid row in {table}: {reason}")]
    Decode { table: String, reason: String },
    #[error("insert into {0} returned no row")]
    EmptyInsert(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(String, Value),
    In(String, Vec<Value>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub column: String,
    pub direction: Direction,
}

/// A select against one table, built the way PostgREST reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub table: String,
    pub columns: String,
    pub filters: Vec<Filter>,
    pub order: Vec<Order>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn table(name: &str) -> Self {
        Self {
            table: name.to_string(),
            columns: "*".into(),
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
        }
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.columns = columns.to_string();
        self
    }

    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq(column.to_string(), value.into()));
        self
    }

    pub fn in_<I, V>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.filters.push(Filter::In(column.to_string(), values));
        self
    }

    pub fn order(mut self, column: &str, direction: Direction) -> Self {
        self.order.push(Order {
            column: column.to_string(),
            direction,
        });
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }
}

#[async_trait]
pub trait DataStore: Send + Sync {
    async fn select(&self, query: &Query) -> Result<Vec<Value>, StoreError>;

    /// Inserts one row and returns it as stored (generated id, timestamps).
    async fn insert(&self, table: &str, row: Value) -> Result<Value, StoreError>;
}

/// Opens a store handle, failing fast when either credential is absent.
pub fn connect(config: &SupabaseConfig) -> Result<SupabaseStore, ConfigError> {
    if config.url.trim().is_empty() {
        return Err(ConfigError::Missing("SUPABASE_URL"));
    }
    if config.key.trim().is_empty() {
        return Err(ConfigError::Missing("SUPABASE_KEY"));
    }
    Ok(SupabaseStore::new(&config.url, &config.key))
}
