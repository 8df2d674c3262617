//! Stateless HTTP request builder and response parser for the reseller API.
//!
//! # Design
//! `ResellerClient` holds only its [`ClientConfig`] and carries no mutable
//! state between calls. Every operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`; the resource modules under [`crate::api`] add those pairs.
//! All of them funnel through [`ResellerClient::build_call`] and the response
//! helpers here, so URL layout, authentication and the upstream error
//! envelope live in one place.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::codec::{decode, Scalar, ScalarKind};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::form::EncodedForm;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::validate::is_numeric;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// One upstream call: `{namespace}/{operation}.json` plus its encoded form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiCall {
    pub method: HttpMethod,
    pub namespace: String,
    pub operation: String,
    pub form: EncodedForm,
}

impl ApiCall {
    pub fn get(namespace: impl Into<String>, operation: impl Into<String>, form: EncodedForm) -> Self {
        Self {
            method: HttpMethod::Get,
            namespace: namespace.into(),
            operation: operation.into(),
            form,
        }
    }

    pub fn post(namespace: impl Into<String>, operation: impl Into<String>, form: EncodedForm) -> Self {
        Self {
            method: HttpMethod::Post,
            namespace: namespace.into(),
            operation: operation.into(),
            form,
        }
    }
}

/// Synchronous, stateless client for the reseller API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. The caller is responsible for executing the HTTP
/// round-trip between `build_*` and `parse_*`.
#[derive(Debug, Clone)]
pub struct ResellerClient {
    config: ClientConfig,
}

impl ResellerClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Turn `call` into a request. GET sends auth and then the form in the
    /// query string; POST sends the form and then auth as the body.
    pub fn build_call(&self, call: ApiCall) -> Result<HttpRequest, ApiError> {
        let url = format!(
            "{}/{}/{}.json",
            self.config.base_url(),
            call.namespace,
            call.operation
        );
        debug!(
            method = %call.method,
            namespace = %call.namespace,
            operation = %call.operation,
            fields = call.form.len(),
            "building reseller call"
        );

        match call.method {
            HttpMethod::Get => {
                let mut query = self.auth_form();
                query.merge(call.form);
                Ok(HttpRequest {
                    method: HttpMethod::Get,
                    path: format!("{url}?{}", query.to_urlencoded()?),
                    headers: Vec::new(),
                    body: None,
                })
            }
            HttpMethod::Post => {
                let mut body = call.form;
                body.merge(self.auth_form());
                Ok(HttpRequest {
                    method: HttpMethod::Post,
                    path: url,
                    headers: vec![("content-type".to_string(), FORM_CONTENT_TYPE.to_string())],
                    body: Some(body.to_urlencoded()?),
                })
            }
        }
    }

    fn auth_form(&self) -> EncodedForm {
        let mut form = EncodedForm::new();
        form.append("auth-userid", self.config.reseller_id());
        form.append("api-key", self.config.api_key());
        form
    }
}

#[derive(Deserialize)]
struct StatusEnvelope {
    status: String,
    message: String,
}

/// Map a non-200 response to [`ApiError::Upstream`], or to
/// [`ApiError::Deserialization`] when the error envelope itself is unreadable.
pub(crate) fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.status == 200 {
        return Ok(());
    }
    let envelope: StatusEnvelope = serde_json::from_str(&response.body).map_err(|e| {
        warn!(http_status = response.status, error = %e, "unreadable upstream error body");
        ApiError::from(e)
    })?;
    warn!(
        http_status = response.status,
        status = %envelope.status,
        message = %envelope.message,
        "upstream error"
    );
    Err(ApiError::Upstream {
        status: envelope.status,
        message: envelope.message.to_lowercase(),
    })
}

/// Status check, then decode the body as `T`.
pub(crate) fn parse_json<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    check_status(response)?;
    let value = serde_json::from_str(&response.body)?;
    debug!(bytes = response.body.len(), "parsed reseller response");
    Ok(value)
}

/// Status check, then read a bare boolean body (`true`, `"1"`, …).
pub(crate) fn parse_bool(response: &HttpResponse) -> Result<bool, ApiError> {
    check_status(response)?;
    match decode(&response.body, ScalarKind::Bool)? {
        Scalar::Bool(b) => Ok(b),
        other => Err(ApiError::Deserialization(format!("expected a bool, got {other:?}"))),
    }
}

/// Like [`parse_bool`], but `false` is an [`ApiError::OperationFailed`].
pub(crate) fn expect_true(response: &HttpResponse, operation: &str) -> Result<(), ApiError> {
    if parse_bool(response)? {
        Ok(())
    } else {
        Err(ApiError::OperationFailed(operation.to_string()))
    }
}

/// Status check, then read a bare numeric id body (`12345` or `"12345"`).
pub(crate) fn parse_id(response: &HttpResponse) -> Result<String, ApiError> {
    check_status(response)?;
    let id = crate::codec::unquote(&response.body);
    if !is_numeric(id) {
        return Err(ApiError::Deserialization(format!(
            "expected a numeric id, got {:?}",
            response.body
        )));
    }
    Ok(id.to_string())
}

/// Reject identifiers that are not decimal numbers before building a call.
pub(crate) fn require_id(id: &str) -> Result<(), ApiError> {
    if is_numeric(id) {
        Ok(())
    } else {
        Err(ApiError::InvalidIdentifier(id.to_string()))
    }
}

/// Client with reseller id `42`, key `s3cret`, against `http://localhost:3000/api`.
#[cfg(test)]
pub(crate) fn test_client() -> ResellerClient {
    let config = crate::config::ClientConfig::new("42", "s3cret", crate::config::Environment::Test)
        .expect("static test config")
        .with_base_url("http://localhost:3000/api/");
    ResellerClient::new(config)
}
