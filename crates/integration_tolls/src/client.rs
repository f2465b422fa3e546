//! TollGuru origin-destination client
//!
//! Estimation never fails: every gate, HTTP error, timeout or unreadable body
//! degrades to a zero-amount [`TollQuote`] whose classification says why.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use domain::{Coordinate, TollClassification, TollQuote};
use reqwest::header::{ACCEPT, HeaderMap};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use tracing::{debug, info, instrument, warn};

use crate::config::TollConfig;
use crate::error::TollError;
use crate::extraction::TollResponseShape;
use crate::session::TollSessionState;

const ROUTING_ERROR_CODE: &str = "ROUTING_ERROR";
const QUOTA_MESSAGE: &str = "Toll estimates temporarily unavailable: API quota exceeded";
const NO_ID: &str = "<no-id>";
const NO_ERR: &str = "<no-err>";

/// Input for one toll estimate
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TollRequest {
    /// Route start; `None` short-circuits the estimate
    pub from: Option<Coordinate>,
    /// Route end; `None` short-circuits the estimate
    pub to: Option<Coordinate>,
    /// Encoded overview polyline, sent when non-empty
    pub encoded_polyline: Option<String>,
}

impl TollRequest {
    /// Request for a route between two known coordinates
    pub fn new(from: Coordinate, to: Coordinate, encoded_polyline: impl Into<String>) -> Self {
        let encoded_polyline = encoded_polyline.into();
        Self {
            from: Some(from),
            to: Some(to),
            encoded_polyline: (!encoded_polyline.is_empty()).then_some(encoded_polyline),
        }
    }
}

/// Trait for toll estimation providers
#[async_trait]
pub trait TollEstimator: Send + Sync {
    /// Estimate the toll for a route; failures degrade to a zero quote
    async fn estimate(&self, request: &TollRequest) -> TollQuote;
}

/// Mask an API key for diagnostics, keeping the first and last 4 characters
#[must_use]
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// One HTTP exchange with the toll endpoint
#[derive(Debug)]
struct TollResponse {
    status: StatusCode,
    request_id: Option<String>,
    error_type: Option<String>,
    body: String,
    json: Option<Value>,
}

impl TollResponse {
    async fn read(response: reqwest::Response) -> Self {
        let status = response.status();
        let headers = response.headers();
        let request_id = header(headers, "x-amzn-requestid").or_else(|| header(headers, "x-amz-request-id"));
        let error_type = header(headers, "x-amzn-errortype");
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<<unreadable response>>".to_string());
        let json = serde_json::from_str::<Value>(&body)
            .ok()
            .filter(|v| !v.is_null());

        Self {
            status,
            request_id,
            error_type,
            body,
            json,
        }
    }

    fn request_id(&self) -> &str {
        self.request_id.as_deref().unwrap_or(NO_ID)
    }

    fn raw(&self) -> String {
        format!("HTTP {} - {}", self.status.as_u16(), self.body)
    }

    /// A 500 whose body names a routing failure
    fn is_routing_error(&self) -> bool {
        self.status == StatusCode::INTERNAL_SERVER_ERROR
            && self.json.as_ref().is_some_and(|j| {
                j.get("code").and_then(Value::as_str) == Some(ROUTING_ERROR_CODE)
                    || j.get("status").and_then(Value::as_i64) == Some(500)
            })
    }
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

/// TollGuru client sharing a session-scoped circuit breaker
pub struct TollGuruClient {
    client: Client,
    config: TollConfig,
    session: Arc<TollSessionState>,
}

impl std::fmt::Debug for TollGuruClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TollGuruClient")
            .field("endpoint", &self.config.endpoint)
            .field("enabled", &self.config.enabled)
            .field("api_key", &self.config.api_key().map(mask_key))
            .field("disabled_for_session", &self.session.is_disabled())
            .finish_non_exhaustive()
    }
}

impl TollGuruClient {
    /// Create a new toll client
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: TollConfig, session: Arc<TollSessionState>) -> Result<Self, TollError> {
        config.validate().map_err(TollError::ConfigurationError)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TollError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config,
            session,
        })
    }

    /// Session state shared with this client
    #[must_use]
    pub fn session(&self) -> &Arc<TollSessionState> {
        &self.session
    }

    fn debounce_window(&self) -> Duration {
        Duration::from_secs(self.config.warn_debounce_secs)
    }

    /// Log a failure loudly unless the same key was reported recently
    fn report(&self, key: &str, message: &str, raw: &str) {
        if self.session.should_warn(key, self.debounce_window()) {
            warn!(key, raw, "{message}");
        } else {
            info!(key, "{message}: repeated failure suppressed");
        }
    }

    fn payload(&self, from: &Coordinate, to: &Coordinate, polyline: Option<&str>) -> Value {
        let mut payload = json!({
            "from": {"lat": from.latitude(), "lng": from.longitude()},
            "to": {"lat": to.latitude(), "lng": to.longitude()},
            "vehicle": {"type": self.config.vehicle_type},
        });
        if let (Some(polyline), Some(object)) = (polyline, payload.as_object_mut()) {
            object.insert("encoded_polyline".to_string(), Value::from(polyline));
        }
        payload
    }

    async fn post(&self, api_key: &str, payload: &Value) -> Result<TollResponse, reqwest::Error> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .header(ACCEPT, "application/json")
            .header("x-api-key", api_key)
            .json(payload)
            .send()
            .await?;
        Ok(TollResponse::read(response).await)
    }

    /// Short-circuit reason, if any gate is closed
    fn gate<'a>(&'a self, request: &TollRequest) -> Result<(&'a str, Coordinate, Coordinate), &'static str> {
        if !self.config.enabled {
            return Err("toll estimation disabled by config");
        }
        let Some(api_key) = self.config.api_key() else {
            return Err("missing toll API key");
        };
        if self.session.is_disabled() {
            return Err("toll estimation disabled for this session after a quota error");
        }
        match (request.from, request.to) {
            (Some(from), Some(to)) => Ok((api_key, from, to)),
            _ => Err("missing coordinates"),
        }
    }

    /// Turn a 2xx body into a quote
    fn extract(&self, response: &TollResponse) -> TollQuote {
        let Some(json) = response.json.as_ref() else {
            let raw = response.raw();
            let key = format!("unreadable|{}|{}", response.status.as_u16(), response.request_id());
            self.report(&key, "Toll response is not readable JSON", &raw);
            return TollQuote::zero(TollClassification::Unknown, raw);
        };

        let shape = TollResponseShape::classify(json);
        if shape == TollResponseShape::Unrecognized {
            warn!("Toll response did not include a toll amount, using 0");
        } else {
            debug!(shape = shape.label(), amount = shape.amount(), "Toll amount extracted");
        }
        TollQuote::priced(shape.amount(), response.body.clone())
    }

    /// Retry a routing failure once without the polyline
    async fn retry_without_polyline(
        &self,
        api_key: &str,
        from: &Coordinate,
        to: &Coordinate,
    ) -> Option<TollQuote> {
        let payload = self.payload(from, to, None);
        info!("Toll routing error, retrying without encoded_polyline");

        match self.post(api_key, &payload).await {
            Ok(retry)
                if retry.status.is_success()
                    && retry
                        .json
                        .as_ref()
                        .is_some_and(|j| TollResponseShape::classify(j) != TollResponseShape::Unrecognized) =>
            {
                Some(self.extract(&retry))
            },
            Ok(retry) => {
                debug!(status = retry.status.as_u16(), "Toll retry gave nothing usable");
                None
            },
            Err(e) => {
                warn!(error = %e, "Toll retry failed");
                None
            },
        }
    }

    fn classify_failure(&self, response: &TollResponse) -> TollQuote {
        let raw = response.raw();

        match response.status {
            StatusCode::FORBIDDEN => {
                self.session.disable();
                let key = format!("403|quota|{}", response.request_id());
                self.report(&key, "Toll quota exceeded", &raw);
                TollQuote::zero(TollClassification::QuotaExceeded, QUOTA_MESSAGE)
            },
            status => {
                let key = format!(
                    "{}|{}|{}",
                    status.as_u16(),
                    response.error_type.as_deref().unwrap_or(NO_ERR),
                    response.request_id()
                );
                self.report(&key, "Toll request failed", &raw);
                let classification = if status == StatusCode::UNAUTHORIZED {
                    TollClassification::AuthError
                } else {
                    TollClassification::ServiceError
                };
                TollQuote::zero(classification, raw)
            },
        }
    }
}

#[async_trait]
impl TollEstimator for TollGuruClient {
    #[instrument(skip(self, request))]
    async fn estimate(&self, request: &TollRequest) -> TollQuote {
        let (api_key, from, to) = match self.gate(request) {
            Ok(open) => open,
            Err(reason) => {
                debug!(reason, "Toll estimate short-circuited");
                return TollQuote::disabled(reason);
            },
        };

        let polyline = request.encoded_polyline.as_deref().filter(|p| !p.is_empty());
        let payload = self.payload(&from, &to, polyline);
        info!(
            endpoint = %self.config.endpoint,
            api_key = %mask_key(api_key),
            with_polyline = polyline.is_some(),
            "Requesting toll estimate"
        );

        let response = match self.post(api_key, &payload).await {
            Ok(response) => response,
            Err(e) => {
                let kind = if e.is_timeout() { "timeout" } else { "transport" };
                self.report(kind, "Toll request failed", &e.to_string());
                return TollQuote::zero(TollClassification::Unknown, e.to_string());
            },
        };
        debug!(status = response.status.as_u16(), request_id = response.request_id(), "Toll response");

        if response.status.is_success() {
            return self.extract(&response);
        }

        if response.is_routing_error() {
            if let Some(quote) = self.retry_without_polyline(api_key, &from, &to).await {
                return quote;
            }
        }

        self.classify_failure(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(config: TollConfig) -> TollGuruClient {
        TollGuruClient::new(config, Arc::new(TollSessionState::new())).unwrap()
    }

    fn request() -> TollRequest {
        TollRequest::new(
            Coordinate::new_unchecked(24.86, 67.0),
            Coordinate::new_unchecked(24.9, 67.1),
            "_p~iF~ps|U",
        )
    }

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("abcd1234wxyz"), "abcd...wxyz");
        assert_eq!(mask_key("12345678"), "****");
        assert_eq!(mask_key(""), "****");
        assert_eq!(mask_key("123456789"), "1234...6789");
    }

    #[test]
    fn test_request_drops_empty_polyline() {
        let request = TollRequest::new(
            Coordinate::new_unchecked(1.0, 2.0),
            Coordinate::new_unchecked(3.0, 4.0),
            "",
        );
        assert!(request.encoded_polyline.is_none());
    }

    #[test]
    fn test_payload_shape() {
        let client = client(TollConfig::for_testing());
        let payload = client.payload(
            &Coordinate::new_unchecked(24.86, 67.0),
            &Coordinate::new_unchecked(24.9, 67.1),
            Some("abc"),
        );
        assert_eq!(payload["from"]["lat"], json!(24.86));
        assert_eq!(payload["to"]["lng"], json!(67.1));
        assert_eq!(payload["vehicle"]["type"], json!("2AxlesAuto"));
        assert_eq!(payload["encoded_polyline"], json!("abc"));

        let without = client.payload(
            &Coordinate::new_unchecked(24.86, 67.0),
            &Coordinate::new_unchecked(24.9, 67.1),
            None,
        );
        assert!(without.get("encoded_polyline").is_none());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = TollConfig {
            timeout_secs: 0,
            ..TollConfig::for_testing()
        };
        assert!(matches!(
            TollGuruClient::new(config, Arc::new(TollSessionState::new())),
            Err(TollError::ConfigurationError(_))
        ));
    }

    #[tokio::test]
    async fn test_disabled_flag_short_circuits() {
        let client = client(TollConfig {
            enabled: false,
            ..TollConfig::for_testing()
        });
        let quote = client.estimate(&request()).await;
        assert_eq!(quote.classification, TollClassification::Disabled);
        assert!(quote.amount().abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_missing_key_short_circuits() {
        let client = client(TollConfig {
            api_key: None,
            ..TollConfig::for_testing()
        });
        let quote = client.estimate(&request()).await;
        assert_eq!(quote.classification, TollClassification::Disabled);
        assert!(quote.raw_response.contains("API key"));
    }

    #[tokio::test]
    async fn test_tripped_breaker_short_circuits() {
        let client = client(TollConfig::for_testing());
        client.session().disable();
        let quote = client.estimate(&request()).await;
        assert_eq!(quote.classification, TollClassification::Disabled);
    }

    #[tokio::test]
    async fn test_missing_coordinates_short_circuits() {
        let client = client(TollConfig::for_testing());
        let request = TollRequest {
            to: None,
            ..request()
        };
        let quote = client.estimate(&request).await;
        assert_eq!(quote.classification, TollClassification::Disabled);
        assert_eq!(quote.raw_response, "missing coordinates");
    }

    #[test]
    fn test_debug_masks_key() {
        let client = client(TollConfig::for_testing());
        let debug = format!("{client:?}");
        assert!(debug.contains("test...1234"));
        assert!(!debug.contains("test-toll-key-1234"));
    }
}
