//! Async driver for [`RetryPolicy`].

use std::future::Future;

use memeswar_core::{FatalReason, RetryPolicy, Verdict};

/// Run `attempt` until it succeeds, turns fatal, or the policy runs out.
///
/// `attempt` receives the 1-based attempt number. Transient verdicts sleep
/// for `policy.backoff(n)` before the next try; the last transient verdict
/// becomes [`FatalReason::RetriesExhausted`]. Returns the number of attempts
/// used on success.
pub async fn run<F, Fut>(policy: &RetryPolicy, mut attempt: F) -> Result<u32, FatalReason>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Verdict>,
{
    let mut n = 1;
    loop {
        match attempt(n).await {
            Verdict::Success => return Ok(n),
            Verdict::Fatal(reason) => return Err(reason),
            Verdict::Transient(last) => {
                if !policy.has_attempts_after(n) {
                    return Err(FatalReason::RetriesExhausted { attempts: n, last });
                }
                let delay = policy.backoff(n);
                log::warn!("attempt {n} failed ({last}), retrying in {delay:?}");
                tokio::time::sleep(delay).await;
                n += 1;
            }
        }
    }
}
