//! openrouteservice matrix client.

use reqwest::blocking::Client;
use serde::Serialize;
use std::time::Duration;
use walkways::{DistanceMatrix, DistanceService, MatrixRequest, ServiceError};

const METRICS: [&str; 2] = ["distance", "duration"];

/// Body of `POST /v2/matrix/{profile}`.
#[derive(Debug, Serialize)]
struct MatrixBody<'a> {
    locations: &'a [[f64; 2]],
    sources: &'a [usize],
    destinations: &'a [usize],
    metrics: [&'static str; 2],
}

impl<'a> From<&'a MatrixRequest<'a>> for MatrixBody<'a> {
    fn from(request: &'a MatrixRequest<'a>) -> Self {
        Self {
            locations: request.locations,
            sources: &request.sources,
            destinations: &request.destinations,
            metrics: METRICS,
        }
    }
}

/// Blocking client for one openrouteservice matrix endpoint.
#[derive(Debug, Clone)]
pub struct OrsClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl OrsClient {
    pub fn new(base_url: &str, profile: &str, api_key: Option<String>) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(60)).build()?;
        Ok(Self {
            client,
            endpoint: matrix_endpoint(base_url, profile),
            api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn matrix_endpoint(base_url: &str, profile: &str) -> String {
    format!("{}/v2/matrix/{}", base_url.trim_end_matches('/'), profile)
}

impl DistanceService for OrsClient {
    fn matrix(&self, request: &MatrixRequest<'_>) -> Result<DistanceMatrix, ServiceError> {
        let mut call = self
            .client
            .post(&self.endpoint)
            .json(&MatrixBody::from(request));
        if let Some(key) = &self.api_key {
            call = call.header(reqwest::header::AUTHORIZATION, key);
        }

        let response = call
            .send()
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(ServiceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<DistanceMatrix>()
            .map_err(|e| ServiceError::MalformedResponse(e.to_string()))
    }
}
