//! Animation frame scheduler
//!
//! Queues one-shot callbacks for the next frame. Callbacks requested while a
//! frame is running land in the following frame.

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    pub struct FrameId;
}

/// FIFO queue of frame callbacks with cancellation
pub struct FrameScheduler<C> {
    pending: SlotMap<FrameId, C>,
    order: Vec<FrameId>,
    frame_index: u64,
}

impl<C> FrameScheduler<C> {
    pub fn new() -> Self {
        Self {
            pending: SlotMap::with_key(),
            order: Vec::new(),
            frame_index: 0,
        }
    }

    pub fn request(&mut self, callback: C) -> FrameId {
        let id = self.pending.insert(callback);
        self.order.push(id);
        id
    }

    pub fn cancel(&mut self, id: FrameId) -> bool {
        self.pending.remove(id).is_some()
    }

    /// Start a frame: hand out every callback queued so far, oldest first
    pub fn begin_frame(&mut self) -> Vec<C> {
        self.frame_index += 1;
        let order = std::mem::take(&mut self.order);
        order
            .into_iter()
            .filter_map(|id| self.pending.remove(id))
            .collect()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Number of frames started so far
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }
}

impl<C> Default for FrameScheduler<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_in_request_order_and_skips_cancelled() {
        let mut frames = FrameScheduler::new();
        frames.request("a");
        let b = frames.request("b");
        frames.request("c");

        assert!(frames.cancel(b));
        assert!(!frames.cancel(b));
        assert_eq!(frames.begin_frame(), vec!["a", "c"]);
        assert_eq!(frames.pending_count(), 0);
        assert_eq!(frames.frame_index(), 1);
    }

    #[test]
    fn requests_during_frame_wait_for_next() {
        let mut frames = FrameScheduler::new();
        frames.request(1);
        let due = frames.begin_frame();
        frames.request(2);

        assert_eq!(due, vec![1]);
        assert_eq!(frames.begin_frame(), vec![2]);
        assert!(frames.begin_frame().is_empty());
    }
}
