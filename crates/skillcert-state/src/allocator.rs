//! # Identifier Allocator
//!
//! Hands out credential identifiers in strictly increasing order, starting
//! at 1. An identifier is never handed out twice, including across a
//! snapshot/restore cycle (the cursor is part of the snapshot).

use skillcert_core::CredentialId;

/// Monotonic credential identifier allocator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator {
    /// The identifier the next call to [`IdAllocator::next`] returns.
    /// `None` once `u64::MAX` has been handed out.
    cursor: Option<u64>,
}

impl IdAllocator {
    /// A fresh allocator whose first identifier is 1.
    pub fn new() -> Self {
        Self { cursor: Some(1) }
    }

    /// Resume from a persisted cursor.
    pub fn resume(cursor: Option<CredentialId>) -> Self {
        Self {
            cursor: cursor.map(CredentialId::get),
        }
    }

    /// The identifier the next allocation would return, without consuming it.
    pub fn peek(&self) -> Option<CredentialId> {
        self.cursor.map(CredentialId::new)
    }

    /// Allocate the next identifier. `None` when the space is exhausted.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<CredentialId> {
        let current = self.cursor?;
        self.cursor = current.checked_add(1);
        Some(CredentialId::new(current))
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
