//! # skillcert-state: Credential Lifecycle
//!
//! The state machine that decides who may issue skill credentials, mints
//! them, answers "is this credential valid right now?", and revokes them.
//!
//! ## Components
//!
//! - **Allocator** (`allocator.rs`): strictly increasing credential ids.
//! - **Registry** (`registry.rs`): issuer authorization flags and labels.
//! - **Store** (`store.rs`): the `CredentialStore` seam, an in-memory
//!   implementation, and the append-only holder index.
//! - **Ledger** (`ledger.rs`): the `OwnershipLedger` seam, invoked once per
//!   mint to register the initial holder.
//! - **Notifications** (`notify.rs`): events emitted after each mutation.
//! - **Lifecycle** (`lifecycle.rs`): `LifecycleController`, which enforces
//!   every precondition and serializes mutations.
//! - **Snapshot** (`snapshot.rs`): validated export/restore of controller state.
//!
//! ## Crate Policy
//!
//! - Every public operation returns `Result<_, CredentialError>`; a returned
//!   error means no state changed and no notification was sent.
//! - No `.unwrap()` outside tests.

pub mod allocator;
pub mod credential;
pub mod error;
pub mod ledger;
pub mod lifecycle;
pub mod notify;
pub mod registry;
pub mod snapshot;
pub mod store;

// ─── Re-exports ─────────────────────────────────────────────────────

pub use allocator::IdAllocator;
pub use credential::{CredentialRecord, MintRequest, Verification};
pub use error::{CredentialError, LedgerError, SnapshotError};
pub use ledger::{MemoryOwnershipLedger, OwnershipLedger};
pub use lifecycle::{ControllerBuilder, LifecycleController};
pub use notify::{FanoutSink, MemorySink, Notification, NotificationSink, TracingSink};
pub use registry::{AuthorizationRegistry, IssuerEntry};
pub use snapshot::LedgerSnapshot;
pub use store::{CredentialStore, HolderEntry, HolderIndex, MemoryCredentialStore};
