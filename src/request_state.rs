//! Request state for long-running AI calls
//!
//! One explicit value per call instead of separate loading/error/data flags.

use serde::Serialize;

/// Where an asynchronous request currently stands
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "lowercase")]
pub enum RequestState<T> {
    Idle,
    Loading,
    Success(T),
    Error(String),
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        RequestState::Idle
    }
}

impl<T> RequestState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            RequestState::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RequestState::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            RequestState::Idle => "idle",
            RequestState::Loading => "loading",
            RequestState::Success(_) => "success",
            RequestState::Error(_) => "error",
        }
    }

    /// Back to `Idle`
    pub fn reset(&mut self) {
        *self = RequestState::Idle;
    }

    /// Record the outcome of a finished request
    pub fn finish<E: std::fmt::Display>(&mut self, result: &Result<T, E>)
    where
        T: Clone,
    {
        *self = match result {
            Ok(data) => RequestState::Success(data.clone()),
            Err(e) => RequestState::Error(e.to_string()),
        };
    }
}
