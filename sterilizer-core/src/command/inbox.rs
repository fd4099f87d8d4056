//! Bounded inbound message queue

use heapless::Deque;

use super::Payload;
use crate::config::INBOX_DEPTH;

/// Returned by [`Inbox::push`] when the queue is full
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InboxFull;

/// FIFO of raw payloads waiting for the next tick
///
/// Oversized payloads are truncated to the buffer size and marked so they
/// never decode to a command. When the queue is full the new message is
/// dropped and counted.
#[derive(Debug, Default)]
pub struct Inbox {
    queue: Deque<Payload, INBOX_DEPTH>,
    dropped: u32,
}

impl Inbox {
    pub const fn new() -> Self {
        Self {
            queue: Deque::new(),
            dropped: 0,
        }
    }

    /// Queue a payload straight off the wire
    pub fn push(&mut self, bytes: &[u8]) -> Result<(), InboxFull> {
        self.push_payload(Payload::from_wire(bytes))
    }

    /// Queue a payload that was already buffered
    pub fn push_payload(&mut self, payload: Payload) -> Result<(), InboxFull> {
        self.queue.push_back(payload).map_err(|_| {
            self.dropped = self.dropped.wrapping_add(1);
            InboxFull
        })
    }

    /// Take the oldest payload
    pub fn pop(&mut self) -> Option<Payload> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Messages dropped because the queue was full
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}
