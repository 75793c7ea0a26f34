//! Local mirror of the document lifecycle: pending queue, indexed collection and the
//! ledger that keeps a filename in at most one of them.

mod indexed;
mod ledger;
mod pending;

pub use indexed::IndexedCollection;
pub use ledger::{DocumentLedger, IndexCommit};
pub use pending::PendingQueueStore;
