//! Bounded retry on transient rate-limit errors
//!
//! Only rate-limit signals are retried; every other failure propagates
//! immediately. Exhausting the attempt budget escalates to the terminal
//! quota error so callers can distinguish "the API is saturated" from
//! "the request is broken".

use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;

use super::{CompletionError, TextCompletion};

/// Retry behavior for completion calls
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            wait: Duration::from_secs(10),
        }
    }
}

// Compiled once; matched against the error text of failed completion calls
static RATE_LIMIT_PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();

fn rate_limit_patterns() -> &'static Vec<Regex> {
    RATE_LIMIT_PATTERNS.get_or_init(|| {
        vec![
            // Word boundary prevents false positives from IDs containing "429"
            Regex::new(r"(?i)\b429\b").unwrap(),
            Regex::new(r"(?i)resource\s+exhausted").unwrap(),
            Regex::new(r"(?i)rate[_\-\s]?limit(ed|ing)?").unwrap(),
            Regex::new(r"(?i)quota\s*(exceeded|limit)").unwrap(),
            Regex::new(r"(?i)too\s+many\s+requests").unwrap(),
        ]
    })
}

/// Whether an error is a transient rate-limit signal worth retrying
pub fn is_rate_limited(err: &CompletionError) -> bool {
    match err {
        CompletionError::Api { status: 429, .. } => true,
        CompletionError::Api { message, .. } => {
            rate_limit_patterns().iter().any(|p| p.is_match(message))
        }
        CompletionError::Transport(message) => {
            rate_limit_patterns().iter().any(|p| p.is_match(message))
        }
        _ => false,
    }
}

/// Run a completion operation with bounded retry on rate-limit signals
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, CompletionError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, CompletionError>>,
{
    for attempt in 1..=policy.max_attempts {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if is_rate_limited(&err) => {
                if attempt < policy.max_attempts {
                    log::warn!(
                        "Rate limit hit (attempt {}/{}), waiting {:?} before retry",
                        attempt,
                        policy.max_attempts,
                        policy.wait
                    );
                    tokio::time::sleep(policy.wait).await;
                }
            }
            Err(err) => return Err(err),
        }
    }
    Err(CompletionError::QuotaExceeded {
        attempts: policy.max_attempts,
    })
}

/// Text completion with the standard retry policy applied
pub async fn generate_with_retry<C: TextCompletion>(
    llm: &C,
    policy: &RetryPolicy,
    prompt: &str,
) -> Result<String, CompletionError> {
    with_retry(policy, || llm.complete(prompt)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct ScriptedCompletion {
        calls: AtomicU32,
        responses: Vec<Result<String, CompletionError>>,
    }

    impl ScriptedCompletion {
        fn new(responses: Vec<Result<String, CompletionError>>) -> Self {
            Self {
                calls: AtomicU32::new(0),
                responses,
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl TextCompletion for ScriptedCompletion {
        async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
            let idx = self.calls.fetch_add(1, Ordering::SeqCst) as usize;
            match self.responses.get(idx) {
                Some(Ok(text)) => Ok(text.clone()),
                Some(Err(CompletionError::Api { status, message })) => Err(CompletionError::Api {
                    status: *status,
                    message: message.clone(),
                }),
                Some(Err(CompletionError::Transport(m))) => {
                    Err(CompletionError::Transport(m.clone()))
                }
                _ => Err(CompletionError::EmptyResponse),
            }
        }
    }

    fn rate_limit_error() -> Result<String, CompletionError> {
        Err(CompletionError::Api {
            status: 429,
            message: "Resource exhausted".to_string(),
        })
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            wait: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_persistent_rate_limit_attempts_exactly_three_times() {
        let llm = ScriptedCompletion::new(vec![
            rate_limit_error(),
            rate_limit_error(),
            rate_limit_error(),
            rate_limit_error(),
        ]);

        let result = generate_with_retry(&llm, &fast_policy(), "prompt").await;
        assert!(matches!(
            result,
            Err(CompletionError::QuotaExceeded { attempts: 3 })
        ));
        assert_eq!(llm.calls(), 3);
    }

    #[tokio::test]
    async fn test_success_after_transient_rate_limit() {
        let llm = ScriptedCompletion::new(vec![rate_limit_error(), Ok("recovered".to_string())]);

        let result = generate_with_retry(&llm, &fast_policy(), "prompt").await;
        assert_eq!(result.unwrap(), "recovered");
        assert_eq!(llm.calls(), 2);
    }

    #[tokio::test]
    async fn test_non_rate_limit_error_propagates_immediately() {
        let llm = ScriptedCompletion::new(vec![Err(CompletionError::Api {
            status: 400,
            message: "invalid request".to_string(),
        })]);

        let result = generate_with_retry(&llm, &fast_policy(), "prompt").await;
        assert!(matches!(result, Err(CompletionError::Api { status: 400, .. })));
        assert_eq!(llm.calls(), 1);
    }

    #[test]
    fn test_rate_limit_detection_patterns() {
        let cases = [
            ("429 Too Many Requests", true),
            ("Resource exhausted", true),
            ("rate limit reached", true),
            ("Quota exceeded for model", true),
            ("invalid argument", false),
            // ID containing 429 must not match
            ("request id ses_429f18024ffe failed: bad input", false),
        ];
        for (message, expected) in cases {
            let err = CompletionError::Api {
                status: 500,
                message: message.to_string(),
            };
            assert_eq!(is_rate_limited(&err), expected, "message: {}", message);
        }
    }
}
