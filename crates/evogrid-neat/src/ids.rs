//! Identity allocation for nodes and connection genes
//!
//! Node ids and connection innovation numbers come from one shared,
//! monotonically increasing counter, so a node and a connection never
//! collide. The allocator is passed explicitly to every operation that
//! creates genes; nothing in this crate holds a global counter.

/// Issues unique, strictly increasing identifiers starting at 1
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u64,
    bootstrap_reset_done: bool,
}

impl IdAllocator {
    /// Create an allocator whose first id is 1
    pub fn new() -> Self {
        Self {
            next: 1,
            bootstrap_reset_done: false,
        }
    }

    /// Take the next id
    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Take the next id for which `in_use` returns false
    ///
    /// Skipped ids are consumed. Needed after [`reset`](Self::reset), when
    /// the counter can re-issue ids that already live in a genome.
    pub fn next_unused(&mut self, mut in_use: impl FnMut(u64) -> bool) -> u64 {
        loop {
            let id = self.next_id();
            if !in_use(id) {
                return id;
            }
        }
    }

    /// The id the next call to [`next_id`](Self::next_id) would return
    pub fn peek(&self) -> u64 {
        self.next
    }

    /// Restart numbering at 1
    pub fn reset(&mut self) {
        self.next = 1;
    }

    /// Reset after the first bootstrap network is built
    ///
    /// Only the first call resets; later bootstraps keep counting so ids
    /// stay in a small range without repeating the reset. Returns whether
    /// the reset happened.
    pub fn finish_bootstrap(&mut self) -> bool {
        if self.bootstrap_reset_done {
            return false;
        }
        self.bootstrap_reset_done = true;
        self.reset();
        true
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
