//! Detector backed by a remote HTTP scorer.

use super::{FraudCheckRequest, FraudCheckResponse, FraudDetector, FraudError};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Fraud detector that POSTs the check request as JSON.
///
/// The endpoint must answer `{"fraudScore": <number>, "riskLevel": <string>?}`.
pub struct HttpFraudDetector {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpFraudDetector {
    /// Create a detector for `endpoint` with a per-request timeout.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, FraudError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FraudError::Transport(e.to_string()))?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    /// Configured endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl FraudDetector for HttpFraudDetector {
    fn name(&self) -> &str {
        "http"
    }

    async fn check(&self, request: &FraudCheckRequest) -> Result<FraudCheckResponse, FraudError> {
        debug!(
            endpoint = %self.endpoint,
            assessment_id = %request.assessment_id,
            "Requesting fraud score"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| FraudError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FraudError::Status(status.as_u16()));
        }

        response
            .json::<FraudCheckResponse>()
            .await
            .map_err(|e| FraudError::Decode(e.to_string()))
    }
}
