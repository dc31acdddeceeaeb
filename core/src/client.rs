//! Stateless HTTP request builder and response parser for the objects API.
//!
//! # Design
//! `ObjectClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! `ObjectsApi` glues the two halves to a `Transport`.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::Record;

/// Synchronous, stateless client for the `/objects` collection.
#[derive(Debug, Clone)]
pub struct ObjectClient {
    base_url: String,
}

impl ObjectClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/objects", self.base_url)
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/objects/{id}", self.base_url)
    }

    pub fn build_list_all(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.collection_url(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_get_by_id(&self, id: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.item_url(id),
            headers: Vec::new(),
            body: None,
        }
    }

    /// The body carries only `name` and a non-empty `data`; any id on the
    /// record is ignored.
    pub fn build_create(&self, record: &Record) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Post,
            path: self.collection_url(),
            headers: json_headers(),
            body: Some(record.to_request_body().to_string()),
        }
    }

    pub fn build_update(&self, id: &str, record: &Record) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Put,
            path: self.item_url(id),
            headers: json_headers(),
            body: Some(record.to_request_body().to_string()),
        }
    }

    pub fn build_delete(&self, id: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: self.item_url(id),
            headers: Vec::new(),
            body: None,
        }
    }

    /// A single malformed element fails the whole list.
    pub fn parse_list_all(&self, response: HttpResponse) -> Result<Vec<Record>, ApiError> {
        check_status(&response, &[200])?;
        decode(&response.body)
    }

    pub fn parse_get_by_id(&self, response: HttpResponse) -> Result<Record, ApiError> {
        check_status(&response, &[200])?;
        decode(&response.body)
    }

    pub fn parse_create(&self, response: HttpResponse) -> Result<Record, ApiError> {
        check_status(&response, &[200, 201])?;
        decode(&response.body)
    }

    pub fn parse_update(&self, response: HttpResponse) -> Result<Record, ApiError> {
        check_status(&response, &[200])?;
        decode(&response.body)
    }

    /// The confirmation body is not inspected.
    pub fn parse_delete(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, &[200])?;
        Ok(())
    }
}

fn json_headers() -> Vec<(String, String)> {
    vec![("content-type".to_string(), "application/json".to_string())]
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::MalformedResponse(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, accepted: &[u16]) -> Result<(), ApiError> {
    if accepted.contains(&response.status) {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::RequestFailed {
        status: response.status,
        body: response.body.clone(),
    })
}
