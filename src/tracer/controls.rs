//! In-Band Trace Controls.
//!
//! This module defines the reserved instruction encodings that toggle trace
//! output from inside a traced program, and the bounded enable stack that
//! backs the push/pop control forms.
//!
//! The control encodings are `xori x0,x0,K` variants: architecturally inert
//! no-ops, so embedding them in a program never alters its visible effects.
//! Matching is by full 32-bit equality, never by opcode field, to avoid
//! colliding with ordinary instructions sharing the XORI opcode.

/// Reserved encoding: disable trace output (`xori x0,x0,0`).
pub const TRACE_OFF: u32 = 0x0000_4013;

/// Reserved encoding: enable trace output (`xori x0,x0,1`).
pub const TRACE_ON: u32 = 0x0010_4013;

/// Reserved encoding: save current state, then disable (`xori x0,x0,2`).
pub const TRACE_PUSH_OFF: u32 = 0x0020_4013;

/// Reserved encoding: save current state, then enable (`xori x0,x0,3`).
pub const TRACE_PUSH_ON: u32 = 0x0030_4013;

/// Reserved encoding: restore the previously saved state (`xori x0,x0,4`).
pub const TRACE_POP: u32 = 0x0040_4013;

/// Default capacity of the enable stack.
pub const MAX_ENABLE_STACK: usize = 100;

/// Bounded save/restore stack for the tracer's enabled state.
///
/// A fixed-size ring of saved booleans. Pushing past capacity wraps the
/// write index and overwrites the oldest saved slot instead of growing or
/// erroring, which bounds memory under pathological push/pop nesting in the
/// traced program. Popping past the tracked depth is a no-op.
pub struct EnableStack {
    slots: Vec<bool>,
    head: usize,
    depth: usize,
}

impl Default for EnableStack {
    fn default() -> Self {
        Self::new(MAX_ENABLE_STACK)
    }
}

impl EnableStack {
    /// Creates a stack with the given capacity (at least 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: vec![false; capacity],
            head: 0,
            depth: 0,
        }
    }

    /// Saves an enabled state.
    ///
    /// When the stack is full the write index wraps and the oldest saved
    /// slot is silently overwritten; the tracked depth is clamped at
    /// capacity.
    pub fn push(&mut self, enabled: bool) {
        let cap = self.slots.len();
        self.slots[self.head] = enabled;
        self.head = (self.head + 1) % cap;
        if self.depth < cap {
            self.depth += 1;
        }
    }

    /// Restores the most recently saved state, if any.
    pub fn pop(&mut self) -> Option<bool> {
        if self.depth == 0 {
            return None;
        }
        let cap = self.slots.len();
        self.head = (self.head + cap - 1) % cap;
        self.depth -= 1;
        Some(self.slots[self.head])
    }

    /// Returns the number of saved states currently tracked.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns the fixed capacity of the stack.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests basic push/pop ordering.
    #[test]
    fn test_push_pop_order() {
        let mut stack = EnableStack::new(4);
        stack.push(true);
        stack.push(false);
        assert_eq!(stack.pop(), Some(false));
        assert_eq!(stack.pop(), Some(true));
        assert_eq!(stack.pop(), None);
    }

    /// Tests that popping an empty stack is a no-op.
    #[test]
    fn test_pop_empty() {
        let mut stack = EnableStack::new(2);
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.depth(), 0);
    }
}
