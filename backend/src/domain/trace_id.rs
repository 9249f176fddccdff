//! Correlation identifier shared by a request, its log events, its error
//! payloads, and any notification it queues.
//!
//! The identifier lives in tokio task-local storage. Spawned tasks do not
//! inherit it, so work handed off (such as queued emails) carries a copy and
//! re-enters the scope with [`TraceId::scope`].

use std::fmt;
use std::future::Future;

use uuid::Uuid;

/// Header used to accept and echo the identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

tokio::task_local! {
    static CURRENT: TraceId;
}

/// UUID naming one unit of work.
///
/// # Examples
/// ```
/// use assessmate::domain::TraceId;
///
/// let id = TraceId::from_header("4c1f6a0e-33a8-4a4e-9a53-8c1b2a7d9e10").expect("uuid");
/// assert_eq!(id.to_string(), "4c1f6a0e-33a8-4a4e-9a53-8c1b2a7d9e10");
/// assert!(TraceId::from_header("request-17").is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Accept a caller-supplied header value when it is a well-formed UUID.
    #[must_use]
    pub fn from_header(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }

    /// Identifier of the enclosing scope, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Run `work` with `id` as the current identifier.
    pub async fn scope<F: Future>(id: Self, work: F) -> F::Output {
        CURRENT.scope(id, work).await
    }

    /// Run `work` inside `id`'s scope when one is given.
    pub async fn maybe_scope<F: Future>(id: Option<Self>, work: F) -> F::Output {
        match id {
            Some(id) => Self::scope(id, work).await,
            None => work.await,
        }
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[tokio::test]
    async fn scope_exposes_current() {
        let id = TraceId::new();
        assert_eq!(TraceId::scope(id, async { TraceId::current() }).await, Some(id));
        assert_eq!(TraceId::current(), None);
    }

    #[tokio::test]
    async fn maybe_scope_without_id_leaves_scope_empty() {
        assert_eq!(TraceId::maybe_scope(None, async { TraceId::current() }).await, None);
    }

    #[tokio::test]
    async fn spawned_tasks_do_not_inherit_scope() {
        let inner = TraceId::scope(TraceId::new(), async {
            tokio::spawn(async { TraceId::current() })
                .await
                .expect("join")
        })
        .await;
        assert_eq!(inner, None);
    }

    #[rstest]
    #[case("00000000-0000-0000-0000-000000000000", true)]
    #[case("  4c1f6a0e-33a8-4a4e-9a53-8c1b2a7d9e10 ", true)]
    #[case("", false)]
    #[case("abc-123", false)]
    fn header_values_must_be_uuids(#[case] raw: &str, #[case] accepted: bool) {
        assert_eq!(TraceId::from_header(raw).is_some(), accepted);
    }
}
