//! Shared request pipeline used by every service.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::auth::{AuthProvider, API_KEY_HEADER};
use crate::errors::{XeroMlError, XeroMlResult};
use crate::observability::{body_preview, MetricsCollector, RequestTimer};
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};

const LOG_BODY_LIMIT: usize = 512;

/// Builds, sends and decodes API requests.
///
/// One call here is one HTTP exchange; failures are returned, never retried.
pub(crate) struct RequestExecutor {
    transport: Arc<dyn HttpTransport>,
    auth: Arc<dyn AuthProvider>,
    metrics: Arc<dyn MetricsCollector>,
    custom_headers: Vec<(String, String)>,
}

impl RequestExecutor {
    pub(crate) fn new(
        transport: Arc<dyn HttpTransport>,
        auth: Arc<dyn AuthProvider>,
        metrics: Arc<dyn MetricsCollector>,
        custom_headers: Vec<(String, String)>,
    ) -> Self {
        Self {
            transport,
            auth,
            metrics,
            custom_headers,
        }
    }

    pub(crate) fn metrics(&self) -> &Arc<dyn MetricsCollector> {
        &self.metrics
    }

    fn build_request<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
    ) -> XeroMlResult<HttpRequest> {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "application/json".to_string());

        for (name, value) in &self.custom_headers {
            if name.eq_ignore_ascii_case(API_KEY_HEADER) {
                tracing::debug!("Ignoring custom header that would replace the API key");
                continue;
            }
            headers.retain(|existing, _| !existing.eq_ignore_ascii_case(name));
            headers.insert(name.clone(), value.clone());
        }

        self.auth.apply_auth(&mut headers);

        let body = body.map(serde_json::to_vec).transpose()?;

        Ok(HttpRequest {
            method,
            path: path.to_string(),
            headers,
            body,
        })
    }

    /// Sends a request and turns non-2xx responses into typed errors.
    pub(crate) async fn execute(
        &self,
        operation: &'static str,
        request: HttpRequest,
    ) -> XeroMlResult<HttpResponse> {
        let timer = RequestTimer::start(operation);
        tracing::debug!(
            operation,
            method = request.method.as_str(),
            path = %request.path,
            "Sending request"
        );

        let result = match self.transport.send(request).await {
            Ok(response) if response.is_success() => Ok(response),
            Ok(response) => {
                let error =
                    XeroMlError::from_response(response.status, &response.headers, &response.body);
                tracing::warn!(
                    operation,
                    status = response.status,
                    code = error.code(),
                    request_id = response.request_id().unwrap_or("-"),
                    body = %body_preview(&response.body, LOG_BODY_LIMIT),
                    "API request failed"
                );
                Err(error)
            }
            Err(transport_error) => {
                let error = XeroMlError::from(transport_error);
                tracing::warn!(operation, error = %error, "Transport failure");
                Err(error)
            }
        };

        self.metrics
            .record_request(timer.operation(), result.is_ok(), timer.elapsed());
        match &result {
            Ok(response) => tracing::debug!(
                operation,
                status = response.status,
                elapsed_ms = u64::try_from(timer.elapsed().as_millis()).unwrap_or(u64::MAX),
                "Request completed"
            ),
            Err(error) => self.metrics.record_error(error.code()),
        }

        result
    }

    /// GETs a path and decodes the JSON response.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
    ) -> XeroMlResult<T> {
        let request = self.build_request::<()>(HttpMethod::Get, path, None)?;
        let response = self.execute(operation, request).await?;
        decode(operation, &response)
    }

    /// POSTs a JSON body and decodes the JSON response.
    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        body: &B,
    ) -> XeroMlResult<T> {
        let request = self.build_request(HttpMethod::Post, path, Some(body))?;
        let response = self.execute(operation, request).await?;
        decode(operation, &response)
    }

    /// POSTs a JSON body and ignores the response body.
    pub(crate) async fn post_unit<B: Serialize + ?Sized>(
        &self,
        operation: &'static str,
        path: &str,
        body: &B,
    ) -> XeroMlResult<()> {
        let request = self.build_request(HttpMethod::Post, path, Some(body))?;
        self.execute(operation, request).await.map(|_| ())
    }
}

fn decode<T: DeserializeOwned>(operation: &'static str, response: &HttpResponse) -> XeroMlResult<T> {
    response.json().map_err(|e| {
        tracing::warn!(
            operation,
            error = %e,
            body = %body_preview(&response.body, LOG_BODY_LIMIT),
            "Failed to decode response"
        );
        XeroMlError::Serialization {
            message: format!("Failed to decode {} response: {}", operation, e),
        }
    })
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("custom_headers", &self.custom_headers.len())
            .finish_non_exhaustive()
    }
}
