//! Score submission
//!
//! The game only produces a validated `(name, score)` pair; how it reaches a
//! leaderboard is up to a [`ScoreSubmitter`]. Failures are reported back to
//! the caller and never touch game state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Endpoint the browser build posts to
pub const SUBMIT_PATH: &str = "/submit-score";
/// Page shown after a successful submission
pub const LEADERBOARD_PATH: &str = "/leaderboard.html";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("Please enter your name!")]
    EmptyName,
    #[error("the game is still running")]
    GameNotOver,
    #[error("could not encode submission: {0}")]
    Encode(String),
    #[error("score submission failed: {0}")]
    Transport(String),
    #[error("server rejected the score (HTTP {0})")]
    Rejected(u16),
}

/// JSON body: `{"name": ..., "score": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub name: String,
    pub score: u64,
}

impl ScoreSubmission {
    /// Trim `name`; reject it if nothing is left
    pub fn new(name: &str, score: u64) -> Result<Self, SubmitError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SubmitError::EmptyName);
        }
        Ok(Self {
            name: name.to_string(),
            score,
        })
    }

    pub fn to_json(&self) -> Result<String, SubmitError> {
        serde_json::to_string(self).map_err(|e| SubmitError::Encode(e.to_string()))
    }
}

/// Completion callback; runs once with the outcome
pub type SubmitCallback = Box<dyn FnOnce(Result<(), SubmitError>)>;

/// Delivers a submission somewhere and reports back
pub trait ScoreSubmitter {
    fn submit(&self, submission: ScoreSubmission, done: SubmitCallback);
}

/// Logs the payload and reports success; used by the native build
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSubmitter;

impl ScoreSubmitter for LogSubmitter {
    fn submit(&self, submission: ScoreSubmission, done: SubmitCallback) {
        let result = submission.to_json().map(|json| {
            log::info!("Score submission: {}", json);
        });
        if let Err(ref e) = result {
            log::error!("Error submitting score: {}", e);
        }
        done(result);
    }
}

/// POSTs JSON to the game server with `fetch`
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct FetchSubmitter {
    pub url: String,
}

#[cfg(target_arch = "wasm32")]
impl Default for FetchSubmitter {
    fn default() -> Self {
        Self {
            url: SUBMIT_PATH.to_string(),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl FetchSubmitter {
    async fn post(url: String, body: String) -> Result<(), SubmitError> {
        use wasm_bindgen::JsCast;
        use wasm_bindgen_futures::JsFuture;
        use web_sys::{Request, RequestInit, Response};

        let transport = |e: wasm_bindgen::JsValue| SubmitError::Transport(format!("{:?}", e));

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_body(&wasm_bindgen::JsValue::from_str(&body));

        let request = Request::new_with_str_and_init(&url, &opts).map_err(transport)?;
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(transport)?;

        let window = web_sys::window().ok_or_else(|| SubmitError::Transport("no window".into()))?;
        let response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(transport)?;
        let response: Response = response.dyn_into().map_err(transport)?;

        if response.ok() {
            Ok(())
        } else {
            Err(SubmitError::Rejected(response.status()))
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreSubmitter for FetchSubmitter {
    fn submit(&self, submission: ScoreSubmission, done: SubmitCallback) {
        let body = match submission.to_json() {
            Ok(body) => body,
            Err(e) => return done(Err(e)),
        };
        let url = self.url.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = Self::post(url, body).await;
            match &result {
                Ok(()) => log::info!("Score submitted successfully"),
                Err(e) => log::error!("Error submitting score: {}", e),
            }
            done(result);
        });
    }
}
