/*!
 * Scripted backend for tests.
 *
 * `MockBackend` answers translation requests according to a fixed
 * `MockBehavior` and counts every request it receives, including failed
 * attempts. Clones share the counter, so a test can keep a handle while the
 * orchestration layer owns the backend.
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::Backend;

/// How a [`MockBackend`] answers requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBehavior {
    /// Every request succeeds with a numbered marker text
    Working,
    /// Every request succeeds by returning the prompt unchanged
    Echo,
    /// The first `failures` requests fail with a connection error, later
    /// requests succeed
    FlakyConnection { failures: usize },
    /// The first `failures` requests fail with a rate limit error, later
    /// requests succeed
    RateLimited { failures: usize },
    /// Every request fails with a server error
    Failing,
    /// Requests succeed until `call`, from which point every request fails
    /// with a server error
    FailingFrom { call: usize },
    /// Every request fails with an authentication error
    AuthFailure,
    /// Every request succeeds after a delay
    Slow { delay_ms: u64 },
    /// Every request succeeds with an empty body
    Empty,
}

/// In-process backend driven by a [`MockBehavior`]
#[derive(Debug)]
pub struct MockBackend {
    behavior: MockBehavior,
    request_count: Arc<AtomicUsize>,
}

impl MockBackend {
    /// Create a backend with the given behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Backend that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Backend that returns each prompt unchanged
    pub fn echo() -> Self {
        Self::new(MockBehavior::Echo)
    }

    /// Backend that fails `failures` times with a connection error, then
    /// succeeds
    pub fn flaky(failures: usize) -> Self {
        Self::new(MockBehavior::FlakyConnection { failures })
    }

    /// Backend that fails `failures` times with a rate limit error, then
    /// succeeds
    pub fn rate_limited(failures: usize) -> Self {
        Self::new(MockBehavior::RateLimited { failures })
    }

    /// Backend that always fails with a server error
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Backend whose requests fail starting at the given 1-based call number
    pub fn failing_from(call: usize) -> Self {
        Self::new(MockBehavior::FailingFrom { call })
    }

    /// Backend that always fails with an authentication error
    pub fn auth_failure() -> Self {
        Self::new(MockBehavior::AuthFailure)
    }

    /// Backend that succeeds after the given delay
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Backend that succeeds with an empty body
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Number of requests received so far, failed attempts included
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Handle to the shared request counter
    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.request_count)
    }
}

impl Clone for MockBackend {
    /// Clones observe the same request counter
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
        }
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn request_translation(&self, prompt: &str) -> Result<String, ProviderError> {
        let call = self.request_count.fetch_add(1, Ordering::SeqCst) + 1;

        match self.behavior {
            MockBehavior::Working => Ok(format!("[translated #{call}]")),
            MockBehavior::Echo => Ok(prompt.to_string()),
            MockBehavior::FlakyConnection { failures } => {
                if call <= failures {
                    Err(ProviderError::ConnectionError(format!(
                        "scripted connection failure {call}/{failures}"
                    )))
                } else {
                    Ok(format!("[translated #{call}]"))
                }
            }
            MockBehavior::RateLimited { failures } => {
                if call <= failures {
                    Err(ProviderError::RateLimitExceeded(format!(
                        "scripted rate limit {call}/{failures}"
                    )))
                } else {
                    Ok(format!("[translated #{call}]"))
                }
            }
            MockBehavior::Failing => Err(ProviderError::ApiError {
                status_code: 500,
                message: "scripted server failure".to_string(),
            }),
            MockBehavior::FailingFrom { call: from } => {
                if call >= from {
                    Err(ProviderError::ApiError {
                        status_code: 500,
                        message: format!("scripted server failure from call {from}"),
                    })
                } else {
                    Ok(format!("[translated #{call}]"))
                }
            }
            MockBehavior::AuthFailure => Err(ProviderError::AuthenticationError(
                "scripted credential rejection".to_string(),
            )),
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                Ok(format!("[translated #{call}]"))
            }
            MockBehavior::Empty => Ok(String::new()),
        }
    }

    async fn check_reachable(&self) -> bool {
        !matches!(
            self.behavior,
            MockBehavior::Failing | MockBehavior::AuthFailure
        )
    }

    fn describe(&self) -> String {
        format!("mock ({:?})", self.behavior)
    }
}
