//! @ai:module:intent Record store trait and the HTTP client for the spreadsheet backend
//! @ai:module:layer infrastructure
//! @ai:module:public_api RecordStoreTrait, SheetsClient, SetupReport, SheetProbe
//! @ai:module:stateless false

use crate::config::StoreConfig;
use crate::records::{Record, RecordKind};
use crate::store::error::{Result, StoreError};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Rows are 1-based and the first row holds column headers.
const HEADER_ROWS: usize = 1;

const API_URL_ENV: &str = "SHEETS_API_URL";

/// @ai:intent Trait for a full-collection record source and sink
#[allow(async_fn_in_trait)]
pub trait RecordStoreTrait: Send + Sync {
    /// @ai:intent Fetch every record of a kind, unfiltered
    async fn fetch(&self, kind: RecordKind) -> Result<Vec<Record>>;

    /// @ai:intent Append a new record to a collection
    async fn append(&self, kind: RecordKind, record: &Record) -> Result<()>;

    /// @ai:intent Replace the record at a zero-based position
    async fn update(&self, kind: RecordKind, index: usize, record: &Record) -> Result<()>;

    /// @ai:intent Probe that each collection can be read
    /// @ai:effects network
    async fn check_setup(&self) -> SetupReport {
        let mut probes = Vec::new();

        for kind in RecordKind::all() {
            probes.push(SheetProbe::from_fetch(kind.sheet_name(), self.fetch(kind).await));
        }

        SetupReport { probes }
    }
}

/// @ai:intent Outcome of probing one sheet
#[derive(Debug, Clone, Serialize)]
pub struct SheetProbe {
    pub sheet: String,
    pub ok: bool,
    pub detail: String,
}

impl SheetProbe {
    fn from_fetch(sheet: &str, result: Result<Vec<Record>>) -> Self {
        match result {
            Ok(records) => Self {
                sheet: sheet.to_string(),
                ok: true,
                detail: format!("{} records", records.len()),
            },
            Err(e) => Self {
                sheet: sheet.to_string(),
                ok: false,
                detail: e.to_string(),
            },
        }
    }
}

/// @ai:intent Result of checking store connectivity and sheet layout
#[derive(Debug, Clone, Serialize)]
pub struct SetupReport {
    pub probes: Vec<SheetProbe>,
}

impl SetupReport {
    pub fn success(&self) -> bool {
        self.probes.iter().all(|p| p.ok)
    }
}

/// @ai:intent HTTP client for the spreadsheet web-app backend
pub struct SheetsClient {
    client: reqwest::Client,
    api_url: String,
}

impl SheetsClient {
    /// @ai:intent Create a client from configuration, falling back to SHEETS_API_URL
    /// @ai:pre store.api_url is set or SHEETS_API_URL is in the environment
    /// @ai:effects env
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let api_url = config
            .api_url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .or_else(|| std::env::var(API_URL_ENV).ok())
            .filter(|url| !url.trim().is_empty())
            .ok_or(StoreError::NotConfigured)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, api_url })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// @ai:intent GET a sheet and return the raw response
    /// @ai:effects network
    async fn get(&self, sheet: &str) -> Result<reqwest::Response> {
        let cache_buster = chrono::Utc::now().timestamp_millis();

        let response = self
            .client
            .get(&self.api_url)
            .query(&fetch_query(sheet, cache_buster))
            .send()
            .await?;

        ensure_success(response).await
    }

    /// @ai:intent POST a write form and validate the reply
    /// @ai:effects network
    async fn post_write(
        &self,
        action: &'static str,
        kind: RecordKind,
        form: &[(&'static str, String)],
    ) -> Result<()> {
        let response = self.client.post(&self.api_url).form(form).send().await?;
        let response = ensure_success(response).await?;
        let reply: Value = response.json().await?;

        check_write_reply(action, kind, &reply)?;
        tracing::debug!("{} on sheet {} acknowledged: {}", action, kind.sheet_name(), reply);
        Ok(())
    }
}

impl RecordStoreTrait for SheetsClient {
    /// @ai:intent Fetch a full sheet
    /// @ai:effects network
    async fn fetch(&self, kind: RecordKind) -> Result<Vec<Record>> {
        tracing::debug!("Fetching {} from sheets store", kind.sheet_name());

        let reply: Value = self.get(kind.sheet_name()).await?.json().await?;
        let records = records_from_reply(kind, reply)?;

        tracing::info!("Fetched {} {} records", records.len(), kind);
        Ok(records)
    }

    /// @ai:intent Append a record as a new row
    /// @ai:effects network
    async fn append(&self, kind: RecordKind, record: &Record) -> Result<()> {
        tracing::info!("Appending record to {}", kind.sheet_name());
        self.post_write("append", kind, &append_form(kind, record)?).await
    }

    /// @ai:intent Overwrite an existing row
    /// @ai:effects network
    async fn update(&self, kind: RecordKind, index: usize, record: &Record) -> Result<()> {
        tracing::info!("Updating {} record {} (row {})", kind.sheet_name(), index, sheet_row(index));
        self.post_write("update", kind, &update_form(kind, index, record)?)
            .await
    }

    /// @ai:intent Probe the Test sheet, then both record sheets
    /// @ai:effects network
    async fn check_setup(&self) -> SetupReport {
        let test_probe = match self.get("Test").await {
            Ok(response) => match response.text().await {
                Ok(body) => SheetProbe {
                    sheet: "Test".to_string(),
                    ok: true,
                    detail: body.chars().take(80).collect(),
                },
                Err(e) => SheetProbe {
                    sheet: "Test".to_string(),
                    ok: false,
                    detail: e.to_string(),
                },
            },
            Err(e) => SheetProbe {
                sheet: "Test".to_string(),
                ok: false,
                detail: e.to_string(),
            },
        };

        let mut probes = vec![test_probe];

        for kind in RecordKind::all() {
            probes.push(SheetProbe::from_fetch(kind.sheet_name(), self.fetch(kind).await));
        }

        SetupReport { probes }
    }
}

/// @ai:intent Map a non-2xx response to StoreError::Status
/// @ai:effects network
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Status {
        status: status.as_u16(),
        body,
    })
}

/// @ai:intent Sheet row addressed by a zero-based record index
/// @ai:effects pure
pub(crate) fn sheet_row(index: usize) -> usize {
    index + HEADER_ROWS + 1
}

/// @ai:intent Query parameters for a full-sheet read
/// @ai:effects pure
fn fetch_query(sheet: &str, cache_buster: i64) -> Vec<(&'static str, String)> {
    vec![
        ("action", "get".to_string()),
        ("sheet", sheet.to_string()),
        ("_", cache_buster.to_string()),
    ]
}

/// @ai:intent Form body for appending a record
/// @ai:effects pure
fn append_form(kind: RecordKind, record: &Record) -> Result<Vec<(&'static str, String)>> {
    Ok(vec![
        ("action", "append".to_string()),
        ("sheet", kind.sheet_name().to_string()),
        ("data", serde_json::to_string(record)?),
    ])
}

/// @ai:intent Form body for updating the record at a zero-based index
/// @ai:effects pure
fn update_form(kind: RecordKind, index: usize, record: &Record) -> Result<Vec<(&'static str, String)>> {
    Ok(vec![
        ("action", "update".to_string()),
        ("sheet", kind.sheet_name().to_string()),
        ("id", sheet_row(index).to_string()),
        ("data", serde_json::to_string(record)?),
    ])
}

/// @ai:intent Decode a sheet read; non-object rows are dropped with a warning
/// @ai:effects pure
fn records_from_reply(kind: RecordKind, reply: Value) -> Result<Vec<Record>> {
    let Value::Array(rows) = reply else {
        return Err(StoreError::UnexpectedResponse(format!(
            "expected a JSON array for sheet {}, got {}",
            kind.sheet_name(),
            reply
        )));
    };

    let total = rows.len();
    let records: Vec<Record> = rows.into_iter().filter_map(Record::from_value).collect();

    if records.len() < total {
        tracing::warn!(
            "Skipped {} non-object rows in sheet {}",
            total - records.len(),
            kind.sheet_name()
        );
    }

    Ok(records)
}

/// @ai:intent Reject write replies that report failure in-band
/// @ai:effects pure
fn check_write_reply(action: &'static str, kind: RecordKind, reply: &Value) -> Result<()> {
    let Some(obj) = reply.as_object() else {
        return Ok(());
    };

    let failed = obj.get("success").and_then(Value::as_bool) == Some(false);
    let error = obj.get("error").filter(|e| !e.is_null());

    if failed || error.is_some() {
        let message = match error {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "success=false".to_string(),
        };

        return Err(StoreError::Rejected {
            action,
            sheet: kind.sheet_name(),
            message,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sheet_row_skips_header() {
        assert_eq!(sheet_row(0), 2);
        assert_eq!(sheet_row(9), 11);
    }

    #[test]
    fn test_fetch_query() {
        let query = fetch_query("Issues", 1735689600000);
        assert_eq!(query[0], ("action", "get".to_string()));
        assert_eq!(query[1], ("sheet", "Issues".to_string()));
        assert_eq!(query[2], ("_", "1735689600000".to_string()));
    }

    #[test]
    fn test_update_form_addresses_sheet_row() {
        let record = Record::new().with("status", "Resolved");
        let form = update_form(RecordKind::Billing, 3, &record).unwrap();

        assert_eq!(form[0].1, "update");
        assert_eq!(form[1].1, "Billing");
        assert_eq!(form[2], ("id", "5".to_string()));
        assert_eq!(form[3].1, r#"{"status":"Resolved"}"#);
    }

    #[test]
    fn test_append_form() {
        let form = append_form(RecordKind::Issues, &Record::new().with("title", "x")).unwrap();
        assert_eq!(form.len(), 3);
        assert_eq!(form[0].1, "append");
        assert_eq!(form[2].1, r#"{"title":"x"}"#);
    }

    #[test]
    fn test_records_from_reply_skips_non_objects() {
        let reply = json!([{"status": "Open"}, null, 3, {"status": "Resolved"}]);
        let records = records_from_reply(RecordKind::Issues, reply).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[1].is_resolved());
    }

    #[test]
    fn test_records_from_reply_rejects_non_array() {
        let err = records_from_reply(RecordKind::Issues, json!({"error": "no sheet"})).unwrap_err();
        assert!(matches!(err, StoreError::UnexpectedResponse(_)));
    }

    #[test]
    fn test_check_write_reply() {
        assert!(check_write_reply("append", RecordKind::Issues, &json!({"success": true})).is_ok());
        assert!(check_write_reply("append", RecordKind::Issues, &json!("ok")).is_ok());

        let err = check_write_reply("update", RecordKind::Billing, &json!({"success": false}))
            .unwrap_err();
        assert!(matches!(err, StoreError::Rejected { action: "update", .. }));

        let err = check_write_reply("append", RecordKind::Issues, &json!({"error": "Sheet not found"}))
            .unwrap_err();
        assert!(err.to_string().contains("Sheet not found"));
    }

    #[test]
    fn test_new_requires_url() {
        let config = StoreConfig {
            api_url: Some("https://example.invalid/exec".to_string()),
            ..Default::default()
        };
        let client = SheetsClient::new(&config).unwrap();
        assert_eq!(client.api_url(), "https://example.invalid/exec");
    }
}
