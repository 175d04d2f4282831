use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use crate::Direction;

const EMPTY: u8 = 0;

/// One-slot, last-write-wins handoff of direction requests from an input
/// thread to the thread that steps the engine. Cloning shares the slot.
///
/// The stepping thread publishes the heading in effect with
/// [`DirectionMailbox::set_heading`]; posts that would reverse it are
/// dropped on arrival, so they never displace an accepted turn.
#[derive(Debug, Clone, Default)]
pub struct DirectionMailbox {
    slot: Arc<AtomicU8>,
    heading: Arc<AtomicU8>,
}

impl DirectionMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites any request that has not been taken yet, unless `direction`
    /// reverses the published heading. Returns whether it was accepted.
    pub fn post(&self, direction: Direction) -> bool {
        let heading = Direction::from_u8(self.heading.load(Ordering::Acquire));
        if heading.is_some_and(|heading| direction == heading.opposite()) {
            return false;
        }
        self.slot.store(direction.to_u8(), Ordering::Release);
        true
    }

    /// Empties the slot, returning the latest request if there was one.
    pub fn take(&self) -> Option<Direction> {
        Direction::from_u8(self.slot.swap(EMPTY, Ordering::AcqRel))
    }

    /// Called by the stepping thread whenever the engine's heading may change.
    pub fn set_heading(&self, heading: Direction) {
        self.heading.store(heading.to_u8(), Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn empty_mailbox_yields_nothing() {
        let mailbox = DirectionMailbox::new();
        assert_eq!(mailbox.take(), None);
    }

    #[test]
    fn last_write_wins_and_take_clears() {
        let mailbox = DirectionMailbox::new();
        mailbox.post(Direction::Up);
        mailbox.post(Direction::Left);
        assert_eq!(mailbox.take(), Some(Direction::Left));
        assert_eq!(mailbox.take(), None);
    }

    #[test]
    fn posts_from_another_thread_are_visible() {
        let mailbox = DirectionMailbox::new();
        let writer = mailbox.clone();
        thread::spawn(move || {
            writer.post(Direction::Down);
        })
        .join()
        .unwrap();
        assert_eq!(mailbox.take(), Some(Direction::Down));
    }

    #[test]
    fn reversal_does_not_displace_an_accepted_turn() {
        let mailbox = DirectionMailbox::new();
        mailbox.set_heading(Direction::Right);
        assert!(mailbox.post(Direction::Up));
        assert!(!mailbox.post(Direction::Left));
        assert_eq!(mailbox.take(), Some(Direction::Up));

        mailbox.set_heading(Direction::Up);
        assert!(!mailbox.post(Direction::Down));
        assert_eq!(mailbox.take(), None);
    }

    #[test]
    fn without_a_heading_everything_is_accepted() {
        let mailbox = DirectionMailbox::new();
        assert!(mailbox.post(Direction::Left));
        assert!(mailbox.post(Direction::Right));
        assert_eq!(mailbox.take(), Some(Direction::Right));
    }
}
