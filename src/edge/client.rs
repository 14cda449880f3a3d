//! Edge function client
//!
//! The trait is the seam: the server holds an `Arc<dyn EdgeFunctions>` built
//! at startup, and tests swap in a fake.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, instrument};

use super::types::{
    AnalyzeFoodRequest, ContentGenerationResult, FoodAnalysisResult, TextGenerationRequest,
    WorkoutResponse, WorkoutRoutineRequest,
};

pub const ANALYZE_FOOD: &str = "analyze-food";
pub const GENERATE_TEXT: &str = "generate-text";
pub const GENERATE_WORKOUT_ROUTINE: &str = "generate-workout-routine";

/// Edge function error types
#[derive(Debug, Error)]
pub enum EdgeError {
    #[error("{0}")]
    Function(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid response from {function}: {message}")]
    Decode { function: String, message: String },

    #[error("{0}")]
    InvalidRequest(String),

    #[error("AI features are not configured (set FITAI_FUNCTIONS_URL and FITAI_FUNCTIONS_KEY)")]
    NotConfigured,
}

/// Result type for edge function calls
pub type EdgeResult<T> = Result<T, EdgeError>;

/// Remote AI functions used by the tracker
#[async_trait]
pub trait EdgeFunctions: Send + Sync {
    async fn analyze_food(&self, request: &AnalyzeFoodRequest) -> EdgeResult<FoodAnalysisResult>;

    async fn generate_workout_routine(
        &self,
        request: &WorkoutRoutineRequest,
    ) -> EdgeResult<WorkoutResponse>;

    async fn generate_text(
        &self,
        request: &TextGenerationRequest,
    ) -> EdgeResult<ContentGenerationResult>;

    /// Download generated text from the URL returned by `generate_text`
    async fn fetch_text(&self, url: &str) -> EdgeResult<String>;
}

/// HTTP implementation against a hosted functions endpoint
#[derive(Clone)]
pub struct HttpEdgeClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpEdgeClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> EdgeResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn function_url(&self, name: &str) -> String {
        format!("{}/functions/v1/{}", self.base_url, name)
    }

    #[instrument(skip(self, body))]
    async fn invoke<B, R>(&self, name: &str, body: &B, fallback: &str) -> EdgeResult<R>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .http
            .post(self.function_url(name))
            .bearer_auth(&self.api_key)
            .header("apikey", &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        debug!(%status, bytes = text.len(), "edge function responded");

        if !status.is_success() {
            let message = function_error_message(&text, fallback);
            error!(%status, %message, "edge function failed");
            return Err(EdgeError::Function(message));
        }

        serde_json::from_str(&text).map_err(|e| EdgeError::Decode {
            function: name.to_string(),
            message: e.to_string(),
        })
    }
}

/// Pull a readable message out of an error body
fn function_error_message(body: &str, fallback: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body).ok().and_then(|v| {
        ["error", "message"]
            .iter()
            .find_map(|key| v.get(*key).and_then(|m| m.as_str()).map(str::to_string))
    });

    from_json
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

#[async_trait]
impl EdgeFunctions for HttpEdgeClient {
    async fn analyze_food(&self, request: &AnalyzeFoodRequest) -> EdgeResult<FoodAnalysisResult> {
        self.invoke(ANALYZE_FOOD, request, "Analysis failed").await
    }

    async fn generate_workout_routine(
        &self,
        request: &WorkoutRoutineRequest,
    ) -> EdgeResult<WorkoutResponse> {
        self.invoke(GENERATE_WORKOUT_ROUTINE, request, "Failed to generate workout routine")
            .await
    }

    async fn generate_text(
        &self,
        request: &TextGenerationRequest,
    ) -> EdgeResult<ContentGenerationResult> {
        self.invoke(GENERATE_TEXT, request, "Function error").await
    }

    async fn fetch_text(&self, url: &str) -> EdgeResult<String> {
        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}
