//! Loading/error bookkeeping shared by every tracked call.

use std::future::Future;
use std::sync::Arc;

use liftlog_client::RequestError;
use tokio::sync::watch;

/// Result of a tracked call. The error is shared so the same failure can sit in
/// the published view and be handed back to the caller.
pub type Outcome<T> = Result<T, Arc<RequestError>>;

/// In-flight count and most recent failure of a group of calls.
#[derive(Debug, Clone, Default)]
pub struct CallState {
    in_flight: u32,
    last_error: Option<Arc<RequestError>>,
}

impl CallState {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&Arc<RequestError>> {
        self.last_error.as_ref()
    }

    fn begin(&mut self) {
        self.in_flight = self.in_flight.saturating_add(1);
        self.last_error = None;
    }

    fn abandon(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    fn finish<T>(&mut self, outcome: &Outcome<T>, settle: Settle) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if let (Err(err), Settle::Record) = (outcome, settle) {
            self.last_error = Some(Arc::clone(err));
        }
    }
}

/// What to do with a call's result once it lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Settle {
    /// Keep the result, including recording a failure.
    Record,
    /// The owner went away while the call was in flight; leave no trace.
    Discard,
}

/// Undoes an in-flight increment if the call that raised it is dropped before
/// it settles, e.g. by a `select!` branch losing or a `timeout` elapsing.
pub(crate) struct CallGuard<'a, V, U: Fn(&mut V)> {
    view: &'a watch::Sender<V>,
    undo: U,
    armed: bool,
}

impl<'a, V, U: Fn(&mut V)> CallGuard<'a, V, U> {
    pub(crate) const fn new(view: &'a watch::Sender<V>, undo: U) -> Self {
        Self { view, undo, armed: true }
    }

    /// The call settled; its owner lowers the counter itself.
    pub(crate) fn disarm(&mut self) {
        self.armed = false;
    }
}

impl<V, U: Fn(&mut V)> Drop for CallGuard<'_, V, U> {
    fn drop(&mut self) {
        if self.armed {
            self.view.send_modify(|v| (self.undo)(v));
        }
    }
}

/// Runs `call` with loading raised, then applies its outcome to the view and
/// lowers loading in a single update.
///
/// `calls` picks the [`CallState`] inside the view; `apply` mutates the view
/// with the result and decides whether it is kept. If the returned future is
/// dropped early, loading is lowered and nothing is recorded.
pub(crate) async fn tracked<V, T, F, A>(
    view: &watch::Sender<V>,
    op: &'static str,
    calls: fn(&mut V) -> &mut CallState,
    call: F,
    apply: A,
) -> Outcome<T>
where
    F: Future<Output = Result<T, RequestError>>,
    A: FnOnce(&mut V, &Outcome<T>) -> Settle,
{
    view.send_modify(|v| calls(v).begin());
    let mut guard = CallGuard::new(view, |v: &mut V| {
        tracing::debug!(op, "tracked call dropped before completion");
        calls(v).abandon();
    });

    let outcome = call.await.map_err(Arc::new);
    guard.disarm();

    view.send_modify(|v| {
        let settle = apply(v, &outcome);
        if let (Err(err), Settle::Record) = (&outcome, settle) {
            tracing::warn!(op, error = %err, transient = err.is_transient(), "tracked call failed");
        }
        calls(v).finish(&outcome, settle);
    });

    outcome
}
