//! Scripted backend for tests.
//!
//! Every fetch parks until the test answers it with [`MockBackend::respond`],
//! so tests control exactly when and in which order responses arrive.

use crate::backend::{Backend, Payload};
use crate::error::FetchError;
use crate::key::SlotKey;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tokio::sync::oneshot;

type Reply = oneshot::Sender<Result<Payload, FetchError>>;

#[derive(Default)]
struct MockState {
    pending: RefCell<Vec<(SlotKey, Reply)>>,
    requests: RefCell<Vec<SlotKey>>,
    unreachable: Cell<bool>,
    ping_hangs: Cell<bool>,
}

#[derive(Clone, Default)]
pub(crate) struct MockBackend {
    state: Rc<MockState>,
}

impl MockBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_reachable(&self, reachable: bool) {
        self.state.unreachable.set(!reachable);
    }

    pub(crate) fn set_ping_hangs(&self, hangs: bool) {
        self.state.ping_hangs.set(hangs);
    }

    /// Answer the oldest outstanding request for `key`. Returns `false` if
    /// there is none or its requester has gone away.
    pub(crate) fn respond(&self, key: &SlotKey, result: Result<Payload, FetchError>) -> bool {
        let reply = {
            let mut pending = self.state.pending.borrow_mut();
            match pending.iter().position(|(k, _)| k == key) {
                Some(index) => pending.remove(index).1,
                None => return false,
            }
        };
        reply.send(result).is_ok()
    }

    /// Requests still waiting for an answer, abandoned ones excluded.
    pub(crate) fn pending_count(&self, key: &SlotKey) -> usize {
        self.state
            .pending
            .borrow()
            .iter()
            .filter(|(k, reply)| k == key && !reply.is_closed())
            .count()
    }

    /// How many times `key` has been requested.
    pub(crate) fn request_count(&self, key: &SlotKey) -> usize {
        self.state.requests.borrow().iter().filter(|k| *k == key).count()
    }

    pub(crate) fn total_requests(&self) -> usize {
        self.state.requests.borrow().len()
    }
}

impl Backend for MockBackend {
    async fn fetch(&self, key: &SlotKey) -> Result<Payload, FetchError> {
        let (tx, rx) = oneshot::channel();
        self.state.requests.borrow_mut().push(key.clone());
        self.state.pending.borrow_mut().push((key.clone(), tx));
        rx.await
            .unwrap_or_else(|_| Err(FetchError::transport("mock request dropped")))
    }

    async fn ping(&self) -> bool {
        if self.state.ping_hangs.get() {
            std::future::pending::<()>().await;
        }
        !self.state.unreachable.get()
    }
}

/// Let spawned local tasks run until they block, without advancing time.
pub(crate) async fn settle() {
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }
}
