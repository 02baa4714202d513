use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::models::events::ServiceEvent;

/// Marshals adapter events onto the consumer's execution context.
///
/// Producers (adapter threads, OS callback contexts) push through cloned
/// `EventSender` handles; the single consumer drains once per tick. The
/// queue is unbounded so nothing is dropped under backpressure; sustained
/// growth is bounded in practice by the adapter's own emission rate (at
/// most one event per user-triggered action plus its terminal
/// completion).
pub struct EventBridge {
    tx: Sender<ServiceEvent>,
    rx: Receiver<ServiceEvent>,
}

impl EventBridge {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    /// A clonable producer handle.
    pub fn sender(&self) -> EventSender {
        EventSender {
            tx: self.tx.clone(),
        }
    }

    /// Take every event received before this call, in emission order.
    ///
    /// Events arriving while the batch is processed wait for the next
    /// drain.
    pub fn drain(&self) -> Vec<ServiceEvent> {
        let pending = self.rx.len();
        let mut batch = Vec::with_capacity(pending);
        for _ in 0..pending {
            match self.rx.try_recv() {
                Ok(event) => batch.push(event),
                Err(_) => break,
            }
        }
        batch
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl Default for EventBridge {
    fn default() -> Self {
        Self::new()
    }
}

/// Producer half of the bridge.
#[derive(Clone)]
pub struct EventSender {
    tx: Sender<ServiceEvent>,
}

impl EventSender {
    /// Queue an event for the next consumer drain. Never blocks.
    pub fn emit(&self, event: ServiceEvent) {
        // Fails only once the session (and with it the receiver) is gone;
        // a straggler from an adapter thread is logged and dropped.
        if self.tx.send(event).is_err() {
            log::warn!("event bridge closed; dropping late adapter event");
        }
    }
}
