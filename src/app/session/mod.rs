//! Session runner: owns the store and drives its collaborators.
//!
//! The store decides, the session acts. Effects returned by `Store::dispatch`
//! are executed here against the injected view, renderer and storage.

mod bridge;
mod tick;

use std::time::Instant;

use crate::kernel::services::bus::{
    kernel_bus, EventBus, EventKind, KernelBusReceiver, KernelBusSender, SessionEvent,
};
use crate::kernel::services::ports::{
    AnchorSource, Renderer, SessionConfig, Settings, StorageService, ViewPort,
};
use crate::kernel::{ScrollSync, SessionState, Store};

pub struct Session {
    store: Store,
    storage: Option<Box<dyn StorageService>>,
    view: Box<dyn ViewPort>,
    renderer: Box<dyn Renderer>,
    bus_tx: KernelBusSender,
    bus_rx: KernelBusReceiver,
    events: EventBus,
    settings: Settings,
    scroll_sync: ScrollSync,
    pending_dirty_deadline: Option<Instant>,
    pending_render_deadline: Option<Instant>,
}

impl Session {
    pub fn new(view: Box<dyn ViewPort>, renderer: Box<dyn Renderer>, settings: Settings) -> Self {
        let config = settings.session_config();
        let (bus_tx, bus_rx) = kernel_bus();
        Self {
            store: Store::with_config(SessionState::new(), config),
            storage: None,
            view,
            renderer,
            bus_tx,
            bus_rx,
            events: EventBus::new(),
            settings,
            scroll_sync: ScrollSync::new(),
            pending_dirty_deadline: None,
            pending_render_deadline: None,
        }
    }

    /// Replies from the storage side must be sent here.
    pub fn bus_sender(&self) -> KernelBusSender {
        self.bus_tx.clone()
    }

    /// Without storage the session runs offline: saves fall back to
    /// `ViewPort::download` and other requests are dropped.
    pub fn attach_storage(&mut self, storage: Box<dyn StorageService>) {
        self.storage = Some(storage);
    }

    pub fn detach_storage(&mut self) -> Option<Box<dyn StorageService>> {
        self.storage.take()
    }

    pub fn is_online(&self) -> bool {
        self.storage.is_some()
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn state(&self) -> &SessionState {
        self.store.state()
    }

    pub fn config(&self) -> &SessionConfig {
        self.store.config()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn subscribe(&mut self, kind: EventKind, listener: impl FnMut(&SessionEvent) + 'static) {
        self.events.subscribe(kind, listener);
    }

    pub fn has_pending_debounce(&self) -> bool {
        self.pending_dirty_deadline.is_some() || self.pending_render_deadline.is_some()
    }

    /// Editor scrolled to `line`: where the preview should scroll.
    /// `None` when scroll sync is turned off.
    pub fn preview_offset_for_line(&mut self, source: &dyn AnchorSource, line: f64) -> Option<f64> {
        if !self.settings.scroll_sync {
            return None;
        }
        Some(self.scroll_sync.sync_to_line(source, line))
    }

    /// Preview scrolled to `offset`: which editor line should be on top.
    pub fn editor_line_for_offset(
        &mut self,
        source: &dyn AnchorSource,
        offset: f64,
    ) -> Option<f64> {
        if !self.settings.scroll_sync {
            return None;
        }
        Some(self.scroll_sync.sync_to_offset(source, offset))
    }

    fn render_preview(&mut self) {
        let html = match self.store.state().documents.active() {
            Some(doc) => self.renderer.render(&doc.content()),
            None => String::new(),
        };
        self.view.set_preview(&html);
        // New markup means new anchor geometry.
        self.scroll_sync.invalidate();
        self.events.publish(&SessionEvent::Render);
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/app/session.rs"]
mod tests;
