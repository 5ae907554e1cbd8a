use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::error::RequestError;
use crate::models::ChartDescription;
use crate::utils::{check_upload_extension, mime_for_extension};

/// Async client for the visualization service.
///
/// One request is in flight at a time; the caller enforces that. Every
/// method returns either the parsed response or a user-facing
/// `RequestError` -- nothing here panics on bad server output.
pub struct VisualizeClient {
    client: Client,
    base_url: String,
}

impl VisualizeClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Upload a spreadsheet for the default (image) rendering pipeline.
    pub async fn visualize_excel(
        &self,
        path: &Path,
        sheet_name: Option<&str>,
    ) -> Result<Vec<ChartDescription>, RequestError> {
        self.upload("/api/visualize/excel", path, sheet_name).await
    }

    /// Upload a spreadsheet, asking for interactive plot specs.
    pub async fn visualize_plotly_excel(
        &self,
        path: &Path,
        sheet_name: Option<&str>,
    ) -> Result<Vec<ChartDescription>, RequestError> {
        self.upload("/api/visualize/plotly/excel", path, sheet_name)
            .await
    }

    /// Upload a spreadsheet, asking for generic series data.
    pub async fn visualize_d3_excel(
        &self,
        path: &Path,
        sheet_name: Option<&str>,
    ) -> Result<Vec<ChartDescription>, RequestError> {
        self.upload("/api/visualize/d3/excel", path, sheet_name)
            .await
    }

    /// Submit a free-text prompt for analysis.
    pub async fn visualize_text_prompt(
        &self,
        prompt: &str,
    ) -> Result<Vec<ChartDescription>, RequestError> {
        let response = self
            .client
            .post(self.url("/api/visualize/text-prompt"))
            .json(&serde_json::json!({ "prompt": prompt }))
            .send()
            .await
            .map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;
        charts_from_body(status, &body)
    }

    /// Fetch a server-side artifact by the path the service handed back.
    pub async fn download(&self, path: &str) -> Result<Vec<u8>, RequestError> {
        let url = self.url(&format!(
            "/api/visualize/download/{}",
            path.trim_start_matches('/')
        ));
        self.fetch_bytes(self.client.get(url)).await
    }

    /// Ask the server to rasterize an interactive plot spec to PNG.
    pub async fn download_png(&self, chart_json: &str) -> Result<Vec<u8>, RequestError> {
        let url = self.url("/api/visualize/download-png");
        self.fetch_bytes(self.client.get(url).query(&[("chart_json", chart_json)]))
            .await
    }

    async fn upload(
        &self,
        endpoint: &str,
        path: &Path,
        sheet_name: Option<&str>,
    ) -> Result<Vec<ChartDescription>, RequestError> {
        let ext = check_upload_extension(path)
            .map_err(|e| RequestError::Transport(e.to_string()))?;
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| RequestError::Transport(format!("cannot read {}: {e}", path.display())))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();

        let mut part = Part::bytes(bytes).file_name(file_name);
        if let Some(mime) = mime_for_extension(&ext) {
            part = part
                .mime_str(mime)
                .map_err(|e| RequestError::Transport(e.to_string()))?;
        }
        let mut form = Form::new().part("file", part);
        if let Some(sheet) = sheet_name.filter(|s| !s.is_empty()) {
            form = form.text("sheet_name", sheet.to_string());
        }

        let response = self
            .client
            .post(self.url(endpoint))
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;
        charts_from_body(status, &body)
    }

    async fn fetch_bytes(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Vec<u8>, RequestError> {
        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RequestError::Payload(error_detail(status, &body)));
        }
        let bytes = response.bytes().await.map_err(transport)?;
        Ok(bytes.to_vec())
    }
}

fn transport(e: reqwest::Error) -> RequestError {
    if e.is_timeout() {
        RequestError::Transport("request timed out".to_string())
    } else if e.is_connect() {
        RequestError::Transport(format!("cannot reach service: {e}"))
    } else {
        RequestError::Transport(e.to_string())
    }
}

/// Parse a response body into chart descriptions, applying the error
/// message priority: error body `detail`, then the first element's
/// `error` when nothing in the sequence is renderable, then a generic
/// message tagged with the status code.
fn charts_from_body(
    status: StatusCode,
    body: &str,
) -> Result<Vec<ChartDescription>, RequestError> {
    if !status.is_success() {
        return Err(RequestError::Payload(error_detail(status, body)));
    }

    let charts: Vec<ChartDescription> = serde_json::from_str(body)
        .map_err(|e| RequestError::Payload(format!("unreadable response: {e}")))?;

    if charts.is_empty() {
        return Err(RequestError::Payload(
            "the service returned no charts".to_string(),
        ));
    }
    // An error-bearing first element with nothing renderable fails the
    // whole request, even when later sheets produced charts.
    if let Some(first) = charts.first() {
        if !first.has_renderable_payload() {
            if let Some(err) = &first.error {
                return Err(RequestError::Payload(err.clone()));
            }
        }
    }
    // A sequence where nothing is renderable is a whole-request failure;
    // surface the first per-sheet error if the server provided one.
    if !charts.iter().any(|c| c.has_renderable_payload()) {
        let message = charts
            .iter()
            .find_map(|c| c.error.clone())
            .unwrap_or_else(|| "the service returned no renderable charts".to_string());
        return Err(RequestError::Payload(message));
    }

    Ok(charts)
}

/// Best error message extractable from an error response body.
fn error_detail(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(detail) = value.get("detail").and_then(Value::as_str) {
            return detail.to_string();
        }
        if let Some(error) = value
            .as_array()
            .and_then(|a| a.first())
            .and_then(|v| v.get("error"))
            .and_then(Value::as_str)
        {
            return error.to_string();
        }
    }
    format!("the service replied with status {}", status.as_u16())
}

#[cfg(test)]
mod tests {
    use super::*;

    const OK: StatusCode = StatusCode::OK;
    const BAD: StatusCode = StatusCode::UNPROCESSABLE_ENTITY;

    #[test]
    fn success_body_parses_in_order() {
        let body = r#"[
            {"sheet_name":"Q1","d3_data":"{\"data\":[]}"},
            {"sheet_name":"Q2","chart_base64":"aGk="}
        ]"#;
        let charts = charts_from_body(OK, body).unwrap();
        assert_eq!(charts.len(), 2);
        assert_eq!(charts[0].sheet_name, "Q1");
        assert_eq!(charts[1].sheet_name, "Q2");
    }

    #[test]
    fn error_status_prefers_detail_field() {
        let err = charts_from_body(BAD, r#"{"detail":"no numeric columns found"}"#)
            .unwrap_err();
        assert_eq!(
            err,
            RequestError::Payload("no numeric columns found".to_string())
        );
    }

    #[test]
    fn error_status_without_detail_uses_status_code() {
        let err = charts_from_body(StatusCode::BAD_GATEWAY, "<html>oops</html>").unwrap_err();
        assert_eq!(
            err,
            RequestError::Payload("the service replied with status 502".to_string())
        );
    }

    #[test]
    fn empty_sequence_is_a_payload_failure() {
        let err = charts_from_body(OK, "[]").unwrap_err();
        assert!(matches!(err, RequestError::Payload(_)));
    }

    #[test]
    fn all_error_sequence_surfaces_first_error() {
        let body = r#"[
            {"sheet_name":"bad","error":"sheet has no data"},
            {"sheet_name":"worse","error":"sheet is corrupt"}
        ]"#;
        let err = charts_from_body(OK, body).unwrap_err();
        assert_eq!(err, RequestError::Payload("sheet has no data".to_string()));
    }

    #[test]
    fn first_element_error_fails_whole_request() {
        // A failed first sheet sinks the batch even when later sheets
        // rendered fine.
        let body = r#"[
            {"sheet_name":"bad","error":"unsupported sheet format"},
            {"sheet_name":"good","chart_base64":"aGk="}
        ]"#;
        let err = charts_from_body(OK, body).unwrap_err();
        assert_eq!(
            err,
            RequestError::Payload("unsupported sheet format".to_string())
        );
    }

    #[test]
    fn later_sheet_errors_render_inline() {
        // Only the first element's error is fatal; a later failed sheet
        // is a per-chart inline error next to its rendered siblings.
        let body = r#"[
            {"sheet_name":"good","chart_base64":"aGk="},
            {"sheet_name":"bad","error":"sheet has no data"}
        ]"#;
        let charts = charts_from_body(OK, body).unwrap();
        assert_eq!(charts.len(), 2);
        assert!(charts[0].has_renderable_payload());
        assert!(charts[1].error.is_some());
    }

    #[test]
    fn unreadable_success_body_is_payload_error() {
        let err = charts_from_body(OK, "not json at all").unwrap_err();
        assert!(matches!(err, RequestError::Payload(_)));
    }

    #[test]
    fn validation_array_error_body_uses_first_element() {
        let err = charts_from_body(BAD, r#"[{"error":"unsupported file"}]"#).unwrap_err();
        assert_eq!(err, RequestError::Payload("unsupported file".to_string()));
    }
}
