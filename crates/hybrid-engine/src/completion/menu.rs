use log::debug;

use super::{CompletionSet, CompletionSupplier, PendingCompletion, PendingPoll};
use crate::token::TokenValue;

/// Headless state of the completion menu: whether it is open, the async
/// request it is waiting on and what that request delivered.
pub(crate) struct CompletionMenu<N: TokenValue> {
    active: bool,
    pending: Option<PendingCompletion<N>>,
    received: Option<(u64, CompletionSet<N>)>,
}

impl<N: TokenValue> Default for CompletionMenu<N> {
    fn default() -> Self {
        Self {
            active: false,
            pending: None,
            received: None,
        }
    }
}

impl<N: TokenValue> CompletionMenu<N> {
    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn open(&mut self, pending: PendingCompletion<N>) {
        self.close();
        self.active = true;
        self.pending = Some(pending);
    }

    /// Close the menu, cancelling any request still in flight.
    pub(crate) fn close(&mut self) {
        if let Some(mut pending) = self.pending.take() {
            debug!("cancelling async completion for {:?}", pending.supplier());
            pending.cancel();
        }
        self.received = None;
        self.active = false;
    }

    /// Collect a finished async request. Returns true when new items arrived.
    pub(crate) fn poll(&mut self, generation: u64) -> bool {
        let Some(pending) = self.pending.as_mut() else {
            return false;
        };
        match pending.poll(generation) {
            PendingPoll::Pending => false,
            PendingPoll::Discarded => {
                self.pending = None;
                false
            }
            PendingPoll::Ready(set) => {
                self.pending = None;
                self.received = Some((generation, set));
                true
            }
        }
    }

    /// Async items for `supplier`, if they were delivered for the current generation.
    pub(crate) fn received(&self, supplier: CompletionSupplier, generation: u64) -> Option<&CompletionSet<N>> {
        self.received
            .as_ref()
            .filter(|(received_at, set)| *received_at == generation && set.supplier() == supplier)
            .map(|(_, set)| set)
    }
}
