use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde_json::{json, Value};

use super::{Backend, Query};
use crate::errors::AppError;
use crate::models::AuthSession;

pub struct RestBackend {
    base_url: String,
    anon_key: String,
    client: reqwest::Client,
}

impl RestBackend {
    pub fn new(base_url: String, anon_key: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
            client,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    fn authed(&self, builder: RequestBuilder, token: &str) -> RequestBuilder {
        builder.header("apikey", &self.anon_key).bearer_auth(token)
    }

    async fn send(&self, builder: RequestBuilder, what: &str) -> Result<Value, AppError> {
        let (status, body) = self.send_raw(builder, what).await?;
        if !status.is_success() {
            return Err(classify(status, &body, what));
        }
        Ok(body)
    }

    async fn send_raw(
        &self,
        builder: RequestBuilder,
        what: &str,
    ) -> Result<(StatusCode, Value), AppError> {
        let resp = builder
            .send()
            .await
            .map_err(|e| AppError::Remote(format!("{what}: {e}")))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| AppError::Remote(format!("{what}: failed to read response: {e}")))?;
        let body: Value = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };
        Ok((status, body))
    }
}

pub fn classify(status: StatusCode, body: &Value, what: &str) -> AppError {
    let message = error_message(body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            AppError::Unauthorized(format!("{what}: {message}"))
        }
        StatusCode::NOT_FOUND => AppError::NotFound(format!("{what}: {message}")),
        _ => AppError::Remote(format!("{what} ({status}): {message}")),
    }
}

fn error_message(body: &Value) -> String {
    ["message", "error_description", "msg", "error"]
        .iter()
        .find_map(|k| body[*k].as_str())
        .map(str::to_string)
        .or_else(|| body.as_str().map(str::to_string))
        .unwrap_or_else(|| "no details".to_string())
}

fn into_rows(body: Value) -> Vec<Value> {
    match body {
        Value::Array(rows) => rows,
        Value::Null => vec![],
        other => vec![other],
    }
}

#[async_trait]
impl Backend for RestBackend {
    async fn select(&self, token: &str, table: &str, query: &Query) -> Result<Vec<Value>, AppError> {
        let req = self
            .authed(self.client.get(self.table_url(table)), token)
            .query(&query.to_params());
        let body = self.send(req, &format!("select {table}")).await?;
        Ok(into_rows(body))
    }

    async fn insert(&self, token: &str, table: &str, row: Value) -> Result<Value, AppError> {
        let req = self
            .authed(self.client.post(self.table_url(table)), token)
            .header("Prefer", "return=representation")
            .json(&row);
        let body = self.send(req, &format!("insert into {table}")).await?;
        into_rows(body)
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Remote(format!("insert into {table} returned no row")))
    }

    async fn update(
        &self,
        token: &str,
        table: &str,
        query: &Query,
        patch: Value,
    ) -> Result<Vec<Value>, AppError> {
        let req = self
            .authed(self.client.patch(self.table_url(table)), token)
            .header("Prefer", "return=representation")
            .query(&query.to_params())
            .json(&patch);
        let body = self.send(req, &format!("update {table}")).await?;
        Ok(into_rows(body))
    }

    async fn rpc(&self, token: &str, function: &str, args: Value) -> Result<Value, AppError> {
        let url = format!("{}/rest/v1/rpc/{function}", self.base_url);
        let req = self.authed(self.client.post(url), token).json(&args);
        self.send(req, &format!("rpc {function}")).await
    }

    async fn upload(
        &self,
        token: &str,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AppError> {
        let url = format!("{}/storage/v1/object/{bucket}/{path}", self.base_url);
        let req = self
            .authed(self.client.post(url), token)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes);
        self.send(req, &format!("upload to {bucket}")).await?;
        Ok(path.to_string())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AppError> {
        let url = format!("{}/auth/v1/token", self.base_url);
        let req = self
            .client
            .post(url)
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }));
        let (status, body) = self.send_raw(req, "sign in").await?;
        // bad credentials come back as 400
        if status == StatusCode::BAD_REQUEST {
            return Err(AppError::Unauthorized(format!("sign in: {}", error_message(&body))));
        }
        if !status.is_success() {
            return Err(classify(status, &body, "sign in"));
        }
        Ok(serde_json::from_value(body)?)
    }

    async fn sign_out(&self, token: &str) -> Result<(), AppError> {
        let url = format!("{}/auth/v1/logout", self.base_url);
        let req = self.authed(self.client.post(url), token);
        self.send(req, "sign out").await?;
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/public/{bucket}/{path}", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_statuses() {
        let body = json!({"code": "PGRST301", "message": "JWT expired"});
        let err = classify(StatusCode::UNAUTHORIZED, &body, "select bookings");
        assert!(matches!(err, AppError::Unauthorized(_)));
        assert!(err.to_string().contains("JWT expired"));

        let err = classify(StatusCode::NOT_FOUND, &json!({"message": "Could not find the function"}), "rpc x");
        assert!(matches!(err, AppError::NotFound(_)));

        let err = classify(StatusCode::INTERNAL_SERVER_ERROR, &Value::Null, "rpc admin_ban_user");
        assert!(matches!(err, AppError::Remote(_)));
        assert!(err.to_string().contains("no details"));
    }

    #[test]
    fn test_error_message_variants() {
        assert_eq!(error_message(&json!({"error_description": "Invalid login credentials"})), "Invalid login credentials");
        assert_eq!(error_message(&json!({"msg": "bad"})), "bad");
        assert_eq!(error_message(&json!("plain text")), "plain text");
    }

    #[test]
    fn test_into_rows() {
        assert!(into_rows(Value::Null).is_empty());
        assert_eq!(into_rows(json!([{"a": 1}, {"a": 2}])).len(), 2);
        assert_eq!(into_rows(json!({"a": 1})).len(), 1);
    }

    #[test]
    fn test_urls() {
        let backend = RestBackend::new(
            "https://project.example.co/".to_string(),
            "anon".to_string(),
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(backend.table_url("bookings"), "https://project.example.co/rest/v1/bookings");
        assert_eq!(
            backend.public_url("product-images", "u/p/1.jpg"),
            "https://project.example.co/storage/v1/object/public/product-images/u/p/1.jpg"
        );
    }
}
