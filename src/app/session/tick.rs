use std::sync::mpsc;
use std::time::Instant;

use super::Session;
use crate::kernel::services::bus::KernelMessage;
use crate::kernel::Action;

impl Session {
    /// Called by the host loop. Returns whether anything changed.
    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> bool {
        let mut changed = false;
        changed |= self.poll_kernel_bus();
        changed |= self.poll_dirty_debounce(now);
        changed |= self.poll_render_debounce(now);
        changed
    }

    pub fn poll_kernel_bus(&mut self) -> bool {
        let limit = self.store.config().max_replies_per_tick.max(1);
        let mut changed = false;
        let mut drained = 0usize;
        loop {
            if drained >= limit {
                break;
            }
            match self.bus_rx.try_recv() {
                Ok(msg) => {
                    drained += 1;
                    let KernelMessage::Reply(reply) = msg;
                    changed |= self.dispatch(Action::Reply(reply));
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => break,
            }
        }
        changed
    }

    fn poll_dirty_debounce(&mut self, now: Instant) -> bool {
        let Some(deadline) = self.pending_dirty_deadline else {
            return false;
        };
        if now < deadline {
            return false;
        }

        self.pending_dirty_deadline = None;
        self.dispatch(Action::RecomputeDirty)
    }

    fn poll_render_debounce(&mut self, now: Instant) -> bool {
        let Some(deadline) = self.pending_render_deadline else {
            return false;
        };
        if now < deadline {
            return false;
        }

        self.pending_render_deadline = None;
        self.render_preview();
        true
    }
}
