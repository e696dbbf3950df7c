//! The CloudFormation custom resource protocol: the request a stack operation sends to the
//! function, and the outcome document the function must PUT to the request's pre-signed URL.
use std::collections::HashMap;

use async_trait::async_trait;
use backup_common::Error;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum RequestType {
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomResourceRequest {
    pub request_type: RequestType,
    #[serde(rename = "ResponseURL")]
    pub response_url: String,
    pub stack_id: String,
    pub request_id: String,
    pub logical_resource_id: String,
    #[serde(default)]
    pub physical_resource_id: Option<String>,
    #[serde(default)]
    pub resource_properties: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResponseStatus {
    Success,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomResourceResponse {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub physical_resource_id: String,
    pub stack_id: String,
    pub request_id: String,
    pub logical_resource_id: String,
    pub no_echo: bool,
    pub data: HashMap<String, String>,
}

impl CustomResourceResponse {
    pub fn success(request: &CustomResourceRequest, physical_resource_id: String) -> Self {
        Self::new(request, physical_resource_id, ResponseStatus::Success, None)
    }

    pub fn failed(
        request: &CustomResourceRequest,
        physical_resource_id: String,
        reason: String,
    ) -> Self {
        Self::new(
            request,
            physical_resource_id,
            ResponseStatus::Failed,
            Some(reason),
        )
    }

    fn new(
        request: &CustomResourceRequest,
        physical_resource_id: String,
        status: ResponseStatus,
        reason: Option<String>,
    ) -> Self {
        Self {
            status,
            reason,
            physical_resource_id,
            stack_id: request.stack_id.clone(),
            request_id: request.request_id.clone(),
            logical_resource_id: request.logical_resource_id.clone(),
            no_echo: false,
            data: HashMap::new(),
        }
    }
}

/// Delivers the outcome of a custom resource request back to CloudFormation.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn respond(&self, url: &str, response: &CustomResourceResponse) -> Result<(), Error>;
}

pub struct HttpResponder {
    client: reqwest::Client,
}

impl HttpResponder {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Responder for HttpResponder {
    async fn respond(&self, url: &str, response: &CustomResourceResponse) -> Result<(), Error> {
        let body =
            serde_json::to_vec(response).map_err(|e| Error::ResponseFailed(e.to_string()))?;
        debug!(status = ?response.status, "sending custom resource response");

        // The pre-signed URL is signed without a content type, so the header must be empty.
        self.client
            .put(url)
            .header(CONTENT_TYPE, "")
            .body(body)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::ResponseFailed(e.to_string()))?;

        Ok(())
    }
}
