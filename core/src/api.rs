//! The objects API client: `ObjectClient` requests executed over a
//! `Transport`.

use tracing::{debug, warn};

use crate::client::ObjectClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::Record;

#[derive(Debug, Clone)]
pub struct ObjectsApi<T> {
    client: ObjectClient,
    transport: T,
}

impl<T: Transport> ObjectsApi<T> {
    pub fn new(client: ObjectClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub async fn list_all(&self) -> Result<Vec<Record>, ApiError> {
        let response = self.send(self.client.build_list_all()).await?;
        self.client.parse_list_all(response).inspect_err(log_failure)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Record, ApiError> {
        let response = self.send(self.client.build_get_by_id(id)).await?;
        self.client.parse_get_by_id(response).inspect_err(log_failure)
    }

    /// Returns the server's copy, which carries the assigned id.
    pub async fn create(&self, record: &Record) -> Result<Record, ApiError> {
        let response = self.send(self.client.build_create(record)).await?;
        self.client.parse_create(response).inspect_err(log_failure)
    }

    pub async fn update(&self, id: &str, record: &Record) -> Result<Record, ApiError> {
        let response = self.send(self.client.build_update(id, record)).await?;
        self.client.parse_update(response).inspect_err(log_failure)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let response = self.send(self.client.build_delete(id)).await?;
        self.client.parse_delete(response).inspect_err(log_failure)
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = %request.method, path = %request.path, "objects api request");
        let response = self.transport.execute(request).await.map_err(|e| {
            warn!(error = %e, "transport failure");
            ApiError::from(e)
        })?;
        debug!(status = response.status, "objects api response");
        Ok(response)
    }
}

fn log_failure(err: &ApiError) {
    warn!(status = err.status(), error = %err, "objects api call failed");
}
