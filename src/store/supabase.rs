// PostgREST client for a Supabase project.
// Auth: `apikey` header plus the same key as a bearer token.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::{DataStore, Direction, Filter, Query, StoreError};

#[derive(Clone)]
pub struct SupabaseStore {
    client: Client,
    rest_url: String,
    api_key: String,
}

impl SupabaseStore {
    pub fn new(url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            rest_url: format!("{}/rest/v1", url.trim_end_matches('/')),
            api_key: api_key.to_string(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.rest_url, table)
    }
}

/// Renders a query as PostgREST URL parameters.
pub(crate) fn query_params(query: &Query) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), query.columns.clone())];

    for filter in &query.filters {
        match filter {
            Filter::Eq(column, Value::Null) => params.push((column.clone(), "is.null".into())),
            Filter::Eq(column, value) => {
                params.push((column.clone(), format!("eq.{}", scalar(value))))
            }
            Filter::In(column, values) => {
                let list = values
                    .iter()
                    .map(list_item)
                    .collect::<Vec<_>>()
                    .join(",");
                params.push((column.clone(), format!("in.({})", list)));
            }
        }
    }

    if !query.order.is_empty() {
        let order = query
            .order
            .iter()
            .map(|o| {
                let dir = match o.direction {
                    Direction::Asc => "asc",
                    Direction::Desc => "desc",
                };
                format!("{}.{}", o.column, dir)
            })
            .collect::<Vec<_>>()
            .join(",");
        params.push(("order".into(), order));
    }

    if let Some(limit) = query.limit {
        params.push(("limit".into(), limit.to_string()));
    }

    params
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// Strings inside `in.(...)` are double-quoted so commas and parens survive.
fn list_item(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
        other => other.to_string(),
    }
}

#[async_trait]
impl DataStore for SupabaseStore {
    async fn select(&self, query: &Query) -> Result<Vec<Value>, StoreError> {
        debug!(table = %query.table, filters = query.filters.len(), "store select");

        let resp = self
            .client
            .get(self.table_url(&query.table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .query(&query_params(query))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(StoreError::Api {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str::<Vec<Value>>(&body).map_err(|e| StoreError::Decode {
            table: query.table.clone(),
            reason: format!("{e}; body={body}"),
        })
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Value, StoreError> {
        debug!(%table, "store insert");

        let resp = self
            .client
            .post(self.table_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=representation")
            .json(&row)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(StoreError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let rows = serde_json::from_str::<Vec<Value>>(&body).map_err(|e| StoreError::Decode {
            table: table.to_string(),
            reason: format!("{e}; body={body}"),
        })?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::EmptyInsert(table.to_string()))
    }
}
