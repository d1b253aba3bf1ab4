use rtrb::{Consumer, Producer};

use crate::notes::NoteId;

/// Notifications from the render thread.
///
/// The audio callback must not log or allocate, so anything worth reporting
/// is pushed into a fixed-size ring and drained by the host.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VoiceEvent {
    /// A voice decayed below the silence threshold and is free again.
    Finished {
        slot: usize,
        note: Option<NoteId>,
        generation: u64,
    },
    /// A voice was mid-restrike and was not rendered this block.
    Skipped { slot: usize },
}

pub trait EventSender {
    /// Hand off an event without blocking. Dropped when there is no room.
    fn send(&mut self, event: VoiceEvent);
}

impl EventSender for Producer<VoiceEvent> {
    fn send(&mut self, event: VoiceEvent) {
        // A full ring means the host is not draining; losing a notification
        // is fine, stalling the callback is not.
        let _ = self.push(event);
    }
}

pub trait EventReceiver {
    fn pop(&mut self) -> Option<VoiceEvent>;
}

impl EventReceiver for Consumer<VoiceEvent> {
    fn pop(&mut self) -> Option<VoiceEvent> {
        Consumer::pop(self).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtrb::RingBuffer;

    #[test]
    fn full_ring_drops_instead_of_blocking() {
        let (mut tx, mut rx) = RingBuffer::<VoiceEvent>::new(2);

        for slot in 0..5 {
            tx.send(VoiceEvent::Skipped { slot });
        }

        assert_eq!(EventReceiver::pop(&mut rx), Some(VoiceEvent::Skipped { slot: 0 }));
        assert_eq!(EventReceiver::pop(&mut rx), Some(VoiceEvent::Skipped { slot: 1 }));
        assert_eq!(EventReceiver::pop(&mut rx), None);
    }
}
