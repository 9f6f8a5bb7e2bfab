//! Correlation id for one HTTP request.
//!
//! [`crate::Trace`] installs a fresh id in Tokio task-local storage for the
//! lifetime of each request. Domain errors read it from there when they are
//! built, so a failure deep in a service still reports the id the client saw
//! in the `trace-id` header. Work moved onto another task leaves the scope
//! unless it is wrapped in [`TraceId::scope`] again.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use uuid::Uuid;

/// Response header carrying the request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

tokio::task_local! {
    static CURRENT: TraceId;
}

/// Random v4 UUID naming a single request.
///
/// # Examples
/// ```
/// use blog::TraceId;
///
/// async fn log_step() {
///     let id = TraceId::current();
///     tracing::debug!(trace_id = ?id, "step");
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// The id of the request whose task is running, or `None` outside one.
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Drive `fut` with `trace_id` as the current id.
    ///
    /// # Examples
    /// ```
    /// use blog::TraceId;
    ///
    /// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
    /// let id: TraceId = "7f0c3a52-8d7e-4f4b-9a36-2f0d2c1b5e10".parse().expect("uuid");
    /// assert_eq!(TraceId::scope(id, async { TraceId::current() }).await, Some(id));
    /// # });
    /// ```
    pub async fn scope<Fut>(trace_id: Self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        CURRENT.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}
