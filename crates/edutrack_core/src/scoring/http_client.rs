//! Blocking HTTP client for the scoring collaborator.
//!
//! # Responsibility
//! - POST JSON requests to the three scoring endpoints.
//! - Map transport, status and decode failures into `ScoringError`.

use crate::config::ScoringConfig;
use crate::scoring::{
    AttendanceRequest, AttendanceStatus, Eligibility, EligibilityRequest, GpaSubject,
    ScoringError, ScoringResult, ScoringService,
};
use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

pub const GPA_ENDPOINT: &str = "/api/calculate-gpa";
pub const ATTENDANCE_ENDPOINT: &str = "/api/calculate-attendance";
pub const ELIGIBILITY_ENDPOINT: &str = "/api/calculate-cie";

#[derive(Debug, Deserialize)]
struct GpaResponse {
    gpa: f64,
}

/// `ureq`-backed implementation of [`ScoringService`].
pub struct HttpScoringClient {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpScoringClient {
    pub fn new(config: &ScoringConfig) -> Self {
        let request_timeout = Duration::from_millis(config.request_timeout_ms);
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_millis(config.connect_timeout_ms))
            .timeout_read(request_timeout)
            .timeout_write(request_timeout)
            .build();
        Self {
            agent,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn post<Req, Resp>(&self, endpoint: &'static str, body: &Req) -> ScoringResult<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let started_at = Instant::now();
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self
            .agent
            .post(&url)
            .set("Content-Type", "application/json")
            .set("Accept", "application/json")
            .send_json(body)
            .map_err(|err| error_from_ureq(endpoint, err))?;

        let decoded = response
            .into_json::<Resp>()
            .map_err(|err| ScoringError::Decode {
                endpoint,
                message: err.to_string(),
            })?;

        debug!(
            "event=scoring_call module=scoring status=ok endpoint={endpoint} duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(decoded)
    }
}

impl ScoringService for HttpScoringClient {
    fn gpa(&self, subjects: &[GpaSubject]) -> ScoringResult<f64> {
        let response: GpaResponse = self.post(GPA_ENDPOINT, subjects)?;
        Ok(response.gpa)
    }

    fn attendance(&self, request: &AttendanceRequest) -> ScoringResult<AttendanceStatus> {
        self.post(ATTENDANCE_ENDPOINT, request)
    }

    fn eligibility(&self, request: &EligibilityRequest) -> ScoringResult<Eligibility> {
        self.post(ELIGIBILITY_ENDPOINT, request)
    }
}

fn error_from_ureq(endpoint: &'static str, err: ureq::Error) -> ScoringError {
    match err {
        ureq::Error::Status(status, _) => ScoringError::Status { endpoint, status },
        ureq::Error::Transport(transport) => {
            let message = transport.to_string();
            let combined = format!("{:?} {}", transport.kind(), message);
            ScoringError::Transport {
                endpoint,
                kind: classify_transport_error_kind(&combined),
                message,
            }
        }
    }
}

fn classify_transport_error_kind(raw: &str) -> &'static str {
    let lower = raw.to_ascii_lowercase();
    if lower.contains("timeout") || lower.contains("timed out") {
        "timeout"
    } else if lower.contains("dns") {
        "dns"
    } else if lower.contains("connection") || lower.contains("connect") {
        "connection"
    } else {
        "transport"
    }
}

#[cfg(test)]
mod tests {
    use super::{classify_transport_error_kind, HttpScoringClient};
    use crate::config::ScoringConfig;

    #[test]
    fn classifies_transport_errors() {
        assert_eq!(classify_transport_error_kind("Io timed out"), "timeout");
        assert_eq!(classify_transport_error_kind("Dns failed"), "dns");
        assert_eq!(
            classify_transport_error_kind("ConnectionFailed refused"),
            "connection"
        );
        assert_eq!(classify_transport_error_kind("BadHeader"), "transport");
    }

    #[test]
    fn strips_trailing_slash_from_base_url() {
        let client = HttpScoringClient::new(&ScoringConfig {
            base_url: "http://127.0.0.1:8080/".to_string(),
            ..ScoringConfig::default()
        });
        assert_eq!(client.base_url(), "http://127.0.0.1:8080");
    }
}
