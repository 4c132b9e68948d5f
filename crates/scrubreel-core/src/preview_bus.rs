// crates/scrubreel-core/src/preview_bus.rs
//
// Fan-out of throttled PreviewRequests to explicit subscribers.
//
// Each subscriber gets its own unbounded channel; every published request is
// delivered once to each live subscriber. Subscribers whose receiver has been
// dropped are pruned on the next publish, so forgetting to unsubscribe only
// costs one failed send.

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::media_types::PreviewRequest;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

#[derive(Default)]
pub struct PreviewBus {
    next_id:     u64,
    subscribers: Vec<(SubscriberId, Sender<PreviewRequest>)>,
}

impl PreviewBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> (SubscriberId, Receiver<PreviewRequest>) {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        let (tx, rx) = unbounded();
        self.subscribers.push((id, tx));
        (id, rx)
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Deliver `req` to every live subscriber. Returns how many received it.
    pub fn publish(&mut self, req: PreviewRequest) -> usize {
        self.subscribers.retain(|(_, tx)| tx.send(req).is_ok());
        self.subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
