// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Retry/backoff driver over an injected agent-executor collaborator.
//!
//! The collaborator's own internals (subprocess spawn, SDK session) are
//! out of scope here; this module only owns the contract each attempt
//! reports back and the backoff loop that drives retryable attempts.

use crate::error::{ExecutorError, RetryCode};
use async_trait::async_trait;
use std::time::Duration;

const MAX_ATTEMPTS: u32 = 4;
const BACKOFF_SECONDS: [u64; 3] = [1, 3, 5];

/// What a single attempt reported.
#[derive(Debug, Clone)]
pub struct ExecutorResult {
    pub success: bool,
    pub output: String,
    pub session_id: Option<String>,
    pub cost_usd: Option<f64>,
    pub duration_ms: Option<u64>,
    pub retry_code: RetryCode,
}

/// The collaborator that actually runs an agent. Implementations own the
/// subprocess or SDK bridge; this trait only carries the contract the
/// retry loop needs.
#[async_trait]
pub trait AgentExecutor: Send + Sync {
    async fn run(&self, prompt: &str) -> Result<ExecutorResult, ExecutorError>;
}

/// Outcome of the whole retry-driven run, carrying the attempt count
/// alongside the winning (or last) result.
#[derive(Debug, Clone)]
pub struct ExecutorOutcome {
    pub result: ExecutorResult,
    pub attempts: u32,
}

fn backoff_for_attempt(attempt: u32) -> Duration {
    let index = (attempt as usize - 1).min(BACKOFF_SECONDS.len() - 1);
    Duration::from_secs(BACKOFF_SECONDS[index])
}

/// Drives up to [`MAX_ATTEMPTS`] attempts of `executor.run(prompt)`,
/// sleeping `BACKOFF_SECONDS[attempt - 1]` (saturating at the last
/// entry) between retryable failures. Returns the first successful
/// result, or `RetriesExhausted` once attempts run out while the last
/// reported `retry_code` is still retryable.
pub async fn run_with_retry(
    executor: &dyn AgentExecutor,
    prompt: &str,
) -> Result<ExecutorOutcome, ExecutorError> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        let result = executor.run(prompt).await?;

        if result.success || !result.retry_code.is_retryable() {
            return Ok(ExecutorOutcome { result, attempts: attempt });
        }

        if attempt >= MAX_ATTEMPTS {
            return Err(ExecutorError::RetriesExhausted(format!(
                "exhausted {attempt} attempt(s), last retry_code={:?}",
                result.retry_code
            )));
        }

        let delay = backoff_for_attempt(attempt);
        tracing::warn!(attempt, ?delay, retry_code = ?result.retry_code, "agent executor attempt failed, retrying");
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
