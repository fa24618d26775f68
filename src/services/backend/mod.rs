pub mod rest;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::AppError;
use crate::models::AuthSession;

#[async_trait]
pub trait Backend: Send + Sync {
    async fn select(&self, token: &str, table: &str, query: &Query) -> Result<Vec<Value>, AppError>;

    async fn insert(&self, token: &str, table: &str, row: Value) -> Result<Value, AppError>;

    // Empty when no row matched
    async fn update(
        &self,
        token: &str,
        table: &str,
        query: &Query,
        patch: Value,
    ) -> Result<Vec<Value>, AppError>;

    async fn rpc(&self, token: &str, function: &str, args: Value) -> Result<Value, AppError>;

    async fn upload(
        &self,
        token: &str,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AppError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AppError>;

    async fn sign_out(&self, token: &str) -> Result<(), AppError>;

    fn public_url(&self, bucket: &str, path: &str) -> String;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(String, String),
    Neq(String, String),
    In(String, Vec<String>),
}

impl Filter {
    fn column(&self) -> &str {
        match self {
            Filter::Eq(c, _) | Filter::Neq(c, _) | Filter::In(c, _) => c,
        }
    }

    fn param(&self) -> String {
        match self {
            Filter::Eq(_, v) => format!("eq.{v}"),
            Filter::Neq(_, v) => format!("neq.{v}"),
            Filter::In(_, vs) => format!("in.({})", vs.join(",")),
        }
    }

    pub fn matches(&self, row: &Value) -> bool {
        let cell = cell_text(&row[self.column()]);
        match self {
            Filter::Eq(_, v) => cell == *v,
            Filter::Neq(_, v) => cell != *v,
            Filter::In(_, vs) => vs.contains(&cell),
        }
    }
}

fn cell_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    select: Option<String>,
    filters: Vec<Filter>,
    order: Option<(String, bool)>,
    limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.select = Some(columns.to_string());
        self
    }

    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters.push(Filter::Eq(column.to_string(), value.to_string()));
        self
    }

    pub fn neq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters.push(Filter::Neq(column.to_string(), value.to_string()));
        self
    }

    pub fn in_list<T: ToString>(mut self, column: &str, values: &[T]) -> Self {
        self.filters.push(Filter::In(
            column.to_string(),
            values.iter().map(ToString::to_string).collect(),
        ));
        self
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        self.order = Some((column.to_string(), ascending));
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn ordering(&self) -> Option<(&str, bool)> {
        self.order.as_ref().map(|(c, asc)| (c.as_str(), *asc))
    }

    pub fn row_limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn matches(&self, row: &Value) -> bool {
        self.filters.iter().all(|f| f.matches(row))
    }

    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(select) = &self.select {
            params.push(("select".to_string(), select.clone()));
        }
        for f in &self.filters {
            params.push((f.column().to_string(), f.param()));
        }
        if let Some((column, ascending)) = &self.order {
            let dir = if *ascending { "asc" } else { "desc" };
            params.push(("order".to_string(), format!("{column}.{dir}")));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_params() {
        let q = Query::new()
            .select("*,products(name,images)")
            .eq("user_id", "abc")
            .in_list("status", &["pending", "confirmed"])
            .order("created_at", false)
            .limit(20);
        assert_eq!(
            q.to_params(),
            vec![
                ("select".to_string(), "*,products(name,images)".to_string()),
                ("user_id".to_string(), "eq.abc".to_string()),
                ("status".to_string(), "in.(pending,confirmed)".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
                ("limit".to_string(), "20".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_matches_rows() {
        let row = json!({"id": "b1", "status": "pending", "is_available": true, "price": 10});
        assert!(Query::new().eq("id", "b1").eq("status", "pending").matches(&row));
        assert!(Query::new().eq("is_available", true).eq("price", 10).matches(&row));
        assert!(!Query::new().neq("status", "pending").matches(&row));
        assert!(Query::new().in_list("status", &["pending", "paid"]).matches(&row));
        assert!(Query::new().eq("missing", "null").matches(&row));
        assert!(Query::new().matches(&row));
    }
}
