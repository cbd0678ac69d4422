//! Ordered fallback over lazily-started attempts.
//!
//! Each attempt is a thunk; it only issues its request when the chain reaches it. The first
//! success ends the chain, so later candidates are never invoked. When everything fails the
//! chain reports one synthesized [`RocketChatError::Resolution`]; individual failures go to
//! the debug log only.

use std::fmt;
use std::future::Future;

use futures::future::BoxFuture;
use futures::FutureExt;
use rc_core::{Result, RocketChatError};
use tracing::debug;

type Thunk<'a, T> = Box<dyn FnOnce() -> BoxFuture<'a, Result<T>> + Send + 'a>;

/// Candidates tried in insertion order until one succeeds. `K` labels a candidate for logs and
/// is returned with the winning value.
pub struct FallbackChain<'a, K, T> {
    operation: String,
    attempts: Vec<(K, Thunk<'a, T>)>,
}

impl<'a, K, T> FallbackChain<'a, K, T>
where
    K: fmt::Display,
    T: Send + 'a,
{
    /// `operation` names the logical operation in the final error, e.g. `fetch messages`.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            attempts: Vec::new(),
        }
    }

    /// Appends a candidate. `thunk` is not called until every earlier candidate has failed.
    pub fn attempt<F, Fut>(mut self, key: K, thunk: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'a,
        Fut: Future<Output = Result<T>> + Send + 'a,
    {
        self.attempts.push((key, Box::new(move || thunk().boxed())));
        self
    }

    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }

    /// Runs candidates sequentially and returns the first success with its key.
    pub async fn run(self) -> Result<(K, T)> {
        let total = self.attempts.len();

        for (index, (key, thunk)) in self.attempts.into_iter().enumerate() {
            match thunk().await {
                Ok(value) => {
                    debug!(
                        operation = %self.operation,
                        candidate = %key,
                        attempt = index + 1,
                        total,
                        "step: candidate succeeded"
                    );
                    return Ok((key, value));
                }
                Err(err) => {
                    debug!(
                        operation = %self.operation,
                        candidate = %key,
                        attempt = index + 1,
                        total,
                        error = %err,
                        "step: candidate failed, trying next"
                    );
                }
            }
        }

        debug!(operation = %self.operation, total, "step: all candidates failed");
        Err(RocketChatError::resolution(self.operation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counted(
        counter: &Arc<AtomicUsize>,
        outcome: std::result::Result<u32, &'static str>,
    ) -> impl FnOnce() -> BoxFuture<'static, Result<u32>> + Send + 'static {
        let counter = Arc::clone(counter);
        move || {
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                outcome.map_err(|e| RocketChatError::Upstream(e.to_string()))
            }
            .boxed()
        }
    }

    /// **Test: A fails, B succeeds; C is never invoked.**
    #[tokio::test]
    async fn test_first_success_short_circuits() {
        let (a, b, c) = (
            Arc::new(AtomicUsize::new(0)),
            Arc::new(AtomicUsize::new(0)),
            Arc::new(AtomicUsize::new(0)),
        );

        let chain = FallbackChain::new("fetch messages")
            .attempt("a", counted(&a, Err("a failed")))
            .attempt("b", counted(&b, Ok(2)))
            .attempt("c", counted(&c, Ok(3)));
        assert_eq!(chain.len(), 3);

        let (key, value) = chain.run().await.unwrap();
        assert_eq!(key, "b");
        assert_eq!(value, 2);
        assert_eq!(a.load(Ordering::SeqCst), 1);
        assert_eq!(b.load(Ordering::SeqCst), 1);
        assert_eq!(c.load(Ordering::SeqCst), 0);
    }

    /// **Test: Exhaustion yields one fixed error without candidate texts.**
    #[tokio::test]
    async fn test_exhaustion_hides_candidate_errors() {
        let counter = Arc::new(AtomicUsize::new(0));
        let err = FallbackChain::<&str, u32>::new("fetch members")
            .attempt("a", counted(&counter, Err("error-room-not-found")))
            .attempt("b", counted(&counter, Err("error-not-allowed")))
            .run()
            .await
            .unwrap_err();

        let text = err.to_string();
        assert_eq!(text, "Unable to fetch members - room not found or no access");
        assert!(!text.contains("error-room-not-found"));
        assert!(!text.contains("error-not-allowed"));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_chain_fails() {
        let chain = FallbackChain::<&str, u32>::new("find room");
        assert!(chain.is_empty());
        assert!(matches!(
            chain.run().await,
            Err(RocketChatError::Resolution { .. })
        ));
    }
}
