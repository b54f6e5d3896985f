//! Test doubles shared by the unit tests in this crate.

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::ports::{Clock, GenerationRequest, GenerationService, PortError, PortResult};

/// A clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        let start = Utc
            .with_ymd_and_hms(2025, 1, 1, 6, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        Self {
            now: Mutex::new(start),
        }
    }
}

impl ManualClock {
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// A generation service that replays canned answers in order and records
/// every request it receives. Once the script runs out it fails.
#[derive(Default)]
pub struct ScriptedGenerator {
    answers: Mutex<VecDeque<PortResult<String>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answering(self, text: impl Into<String>) -> Self {
        self.answers.lock().unwrap().push_back(Ok(text.into()));
        self
    }

    pub fn failing(self, error: PortError) -> Self {
        self.answers.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationService for ScriptedGenerator {
    async fn generate(&self, request: &GenerationRequest) -> PortResult<String> {
        self.requests.lock().unwrap().push(request.clone());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(PortError::ProviderCallFailed("script exhausted".to_string())))
    }
}

/// A generation service that never answers.
pub struct StalledGenerator;

#[async_trait]
impl GenerationService for StalledGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> PortResult<String> {
        std::future::pending::<PortResult<String>>().await
    }
}
