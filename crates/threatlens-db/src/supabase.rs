//! Supabase-backed analysis log (PostgREST over HTTPS).

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use threatlens_common::AnalysisRecord;
use threatlens_security::Role;
use tracing::{debug, info};

use crate::error::{DbError, Result};
use crate::schema::{LogEntry, NewLogEntry, SUMMARY_COLUMNS};
use crate::store::AnalysisLog;

pub struct SupabaseLog {
    base_url: String,
    table: String,
    api_key: SecretString,
    client: reqwest::Client,
}

impl SupabaseLog {
    pub fn new(base_url: impl Into<String>, api_key: SecretString, table: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            table: table.into(),
            api_key,
            client: reqwest::Client::new(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), self.table)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let key = self.api_key.expose_secret();
        req.header("apikey", key).bearer_auth(key)
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status().as_u16();
    if status >= 400 {
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v["message"].as_str().map(str::to_string))
            .unwrap_or(body);
        return Err(DbError::Api { status, message });
    }
    Ok(resp)
}

#[async_trait]
impl AnalysisLog for SupabaseLog {
    async fn append(&self, record: &AnalysisRecord) -> Result<i64> {
        let row = NewLogEntry::from_record(record)?;
        let resp = self
            .authorize(self.client.post(self.table_url()))
            .header("Prefer", "return=representation")
            .json(&[row])
            .send()
            .await?;
        let inserted: Vec<LogEntry> = check_status(resp).await?.json().await?;
        let id = inserted
            .first()
            .map(|e| e.id)
            .ok_or_else(|| DbError::InvalidResponse("insert returned no rows".to_string()))?;
        info!(id, table = %self.table, "Analysis appended to Supabase log");
        Ok(id)
    }

    async fn list_recent(&self, limit: usize, role: Role) -> Result<Vec<LogEntry>> {
        let select = if role.is_top_tier() { "*" } else { SUMMARY_COLUMNS };
        let limit = limit.to_string();
        let resp = self
            .authorize(self.client.get(self.table_url()))
            .query(&[("select", select), ("order", "id.desc"), ("limit", limit.as_str())])
            .send()
            .await?;
        let rows: Vec<LogEntry> = check_status(resp).await?.json().await?;
        debug!(rows = rows.len(), role = %role, "Fetched recent log entries");
        Ok(rows)
    }

    async fn delete_one(&self, id: i64) -> Result<()> {
        let filter = format!("eq.{id}");
        let resp = self
            .authorize(self.client.delete(self.table_url()))
            .query(&[("id", filter.as_str())])
            .send()
            .await?;
        check_status(resp).await?;
        info!(id, "Deleted log entry");
        Ok(())
    }

    async fn delete_all(&self) -> Result<()> {
        // PostgREST refuses unfiltered deletes; ids start at 1.
        let resp = self
            .authorize(self.client.delete(self.table_url()))
            .query(&[("id", "neq.0")])
            .send()
            .await?;
        check_status(resp).await?;
        info!(table = %self.table, "Deleted all log entries");
        Ok(())
    }
}
