//! Requesting simulated quotes from the server over HTTP.
use bourse_common::net::BOURSE_ROUTE;
use bourse_common::wire::{BourseResponse, ErrorResponse, QuotesRequest};
use bourse_common::{BourseError, Result, SimulatedQuote};
use log::{debug, info};
use reqwest::blocking::Client;

/// Helper type for posting quote requests to the server.
pub struct QuoteSender {
    http: Client,
    endpoint: String,
}

impl QuoteSender {
    pub fn new(server_url: &str) -> Self {
        Self {
            http: Client::new(),
            endpoint: format!("{}{}", server_url.trim_end_matches('/'), BOURSE_ROUTE),
        }
    }

    #[cfg(test)]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts `symbols` and returns the quotes of the success envelope.
    ///
    /// A non-2xx answer is turned into `BourseError::Http` carrying the
    /// server's `error` message when the body has one.
    pub fn fetch(&self, symbols: &[String]) -> Result<Vec<SimulatedQuote>> {
        let request = QuotesRequest::new(symbols.iter().cloned());
        info!("Requesting {} symbols from {}", symbols.len(), self.endpoint);

        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .map_err(|e| BourseError::Http(format!("Failed to reach server: {}", e)))?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|e| BourseError::Http(e.to_string()))?;
        debug!("Server answered {}: {}", status, body);

        if !status.is_success() {
            let reason = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(BourseError::Http(format!("{}: {}", status.as_u16(), reason)));
        }

        let envelope: BourseResponse = serde_json::from_str(&body)?;
        if !envelope.success {
            return Err(BourseError::Http("server reported failure".into()));
        }
        Ok(envelope.quotes)
    }
}
