use rustc_hash::FxHashMap;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

use super::ports::{BridgeReply, Notification};

#[derive(Debug)]
pub enum KernelMessage {
    Reply(BridgeReply),
}

#[derive(Clone)]
pub struct KernelBusSender {
    tx: Sender<KernelMessage>,
}

pub struct KernelBusReceiver {
    rx: Receiver<KernelMessage>,
}

pub fn kernel_bus() -> (KernelBusSender, KernelBusReceiver) {
    let (tx, rx) = mpsc::channel();
    (KernelBusSender { tx }, KernelBusReceiver { rx })
}

impl KernelBusSender {
    pub fn send(&self, msg: KernelMessage) -> Result<(), mpsc::SendError<KernelMessage>> {
        self.tx.send(msg)
    }

    pub fn send_reply(&self, reply: BridgeReply) -> Result<(), mpsc::SendError<KernelMessage>> {
        self.send(KernelMessage::Reply(reply))
    }
}

impl KernelBusReceiver {
    pub fn try_recv(&mut self) -> Result<KernelMessage, TryRecvError> {
        self.rx.try_recv()
    }

    pub fn recv_timeout(&mut self, timeout: Duration) -> Result<KernelMessage, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Render,
    ContentChanged,
    ActiveChanged,
    TreeChanged,
    Notified,
}

/// What the session announces to in-process listeners after applying state.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Render,
    ContentChanged { dirty: bool },
    ActiveChanged { label: String, path: String },
    TreeChanged,
    Notified(Notification),
}

impl SessionEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            SessionEvent::Render => EventKind::Render,
            SessionEvent::ContentChanged { .. } => EventKind::ContentChanged,
            SessionEvent::ActiveChanged { .. } => EventKind::ActiveChanged,
            SessionEvent::TreeChanged => EventKind::TreeChanged,
            SessionEvent::Notified(_) => EventKind::Notified,
        }
    }
}

type Listener = Box<dyn FnMut(&SessionEvent)>;

#[derive(Default)]
pub struct EventBus {
    listeners: FxHashMap<EventKind, Vec<Listener>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, kind: EventKind, listener: impl FnMut(&SessionEvent) + 'static) {
        self.listeners
            .entry(kind)
            .or_default()
            .push(Box::new(listener));
    }

    /// Returns how many listeners saw the event.
    pub fn publish(&mut self, event: &SessionEvent) -> usize {
        let Some(listeners) = self.listeners.get_mut(&event.kind()) else {
            return 0;
        };
        for listener in listeners.iter_mut() {
            listener(event);
        }
        listeners.len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("kinds", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/services/bus.rs"]
mod tests;
