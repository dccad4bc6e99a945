//! Striped per-vertex write locks.

use tokio::sync::{Mutex, MutexGuard};

use graphfs_core::VertexId;

/// A fixed pool of mutexes that writers pick from by vertex id.
///
/// Writers on the same vertex always land on the same stripe and are
/// serialized; writers on different vertices usually land on different
/// stripes and proceed in parallel. Guards release on drop, including on
/// error paths, and tokio mutexes never poison.
#[derive(Debug)]
pub struct VertexLocks {
    stripes: Vec<Mutex<()>>,
}

impl VertexLocks {
    /// Create a pool with `stripes` mutexes (at least one).
    pub fn new(stripes: usize) -> Self {
        Self {
            stripes: (0..stripes.max(1)).map(|_| Mutex::new(())).collect(),
        }
    }

    /// Number of stripes.
    pub fn len(&self) -> usize {
        self.stripes.len()
    }

    /// Always false; a pool has at least one stripe.
    pub fn is_empty(&self) -> bool {
        self.stripes.is_empty()
    }

    // The remainder is below len(), so it fits in usize.
    #[allow(clippy::cast_possible_truncation)]
    fn stripe_of(&self, id: VertexId) -> usize {
        (id.get() % self.stripes.len() as u64) as usize
    }

    /// Acquire the stripe guarding `id`.
    pub async fn lock(&self, id: VertexId) -> MutexGuard<'_, ()> {
        self.stripes[self.stripe_of(id)].lock().await
    }
}
