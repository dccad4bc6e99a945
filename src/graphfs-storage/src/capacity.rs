//! Byte budget accounting.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use common_error::{GraphFsError, GraphFsResult};

/// Serializable view of the byte budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityRecord {
    /// Total byte budget.
    pub total_bytes: u64,
    /// Bytes consumed by stored snapshots.
    pub used_bytes: u64,
}

impl CapacityRecord {
    /// Bytes still available.
    pub fn free_bytes(&self) -> u64 {
        self.total_bytes.saturating_sub(self.used_bytes)
    }
}

/// Tracks the total byte budget and the bytes consumed by stored snapshots.
///
/// Reservations are lock-free so writers on different vertices never
/// contend; `grow`, `shrink` and `reset` are only called while the owning
/// file system holds its whole-store gate exclusively.
#[derive(Debug)]
pub struct CapacityLedger {
    total: AtomicU64,
    used: AtomicU64,
}

impl CapacityLedger {
    /// Create a ledger with the given total and nothing used.
    pub fn new(total_bytes: u64) -> Self {
        Self {
            total: AtomicU64::new(total_bytes),
            used: AtomicU64::new(0),
        }
    }

    /// Total byte budget.
    pub fn total(&self) -> u64 {
        self.total.load(Ordering::SeqCst)
    }

    /// Bytes in use.
    pub fn used(&self) -> u64 {
        self.used.load(Ordering::SeqCst)
    }

    /// Bytes available. Never exceeds `total()`.
    pub fn free(&self) -> u64 {
        self.total().saturating_sub(self.used())
    }

    /// Snapshot of the ledger.
    pub fn record(&self) -> CapacityRecord {
        CapacityRecord {
            total_bytes: self.total(),
            used_bytes: self.used(),
        }
    }

    /// Reserve bytes, failing without change if they are not free.
    pub fn reserve(&self, bytes: u64) -> GraphFsResult<()> {
        if bytes == 0 {
            return Ok(());
        }

        let total = self.total();
        let mut current = self.used.load(Ordering::Relaxed);
        loop {
            let new = current.saturating_add(bytes);
            if new > total {
                return Err(GraphFsError::capacity_exceeded(
                    bytes,
                    total.saturating_sub(current),
                ));
            }

            match self
                .used
                .compare_exchange_weak(current, new, Ordering::SeqCst, Ordering::Relaxed)
            {
                Ok(_) => return Ok(()),
                Err(actual) => current = actual,
            }
        }
    }

    /// Release previously reserved bytes.
    pub fn release(&self, bytes: u64) {
        if bytes == 0 {
            return;
        }

        let mut current = self.used.load(Ordering::Relaxed);
        loop {
            let new = current.saturating_sub(bytes);
            match self
                .used
                .compare_exchange_weak(current, new, Ordering::SeqCst, Ordering::Relaxed)
            {
                Ok(_) => return,
                Err(actual) => current = actual,
            }
        }
    }

    /// Move a reservation from `old` bytes to `new` bytes.
    ///
    /// Growing reserves the difference and can fail; shrinking releases it.
    pub fn resize(&self, old: u64, new: u64) -> GraphFsResult<()> {
        if new > old {
            self.reserve(new - old)
        } else {
            self.release(old - new);
            Ok(())
        }
    }

    /// Add to the total. Returns the new total.
    pub fn grow(&self, bytes: u64) -> u64 {
        let new = self.total().saturating_add(bytes);
        self.total.store(new, Ordering::SeqCst);
        new
    }

    /// Remove from the total. Fails without change if `bytes` exceeds the
    /// free bytes. Returns the new total.
    pub fn shrink(&self, bytes: u64) -> GraphFsResult<u64> {
        let free = self.free();
        if bytes > free {
            return Err(GraphFsError::capacity_exceeded(bytes, free));
        }
        let new = self.total() - bytes;
        self.total.store(new, Ordering::SeqCst);
        Ok(new)
    }

    /// Mark every byte free.
    pub fn reset(&self) {
        self.used.store(0, Ordering::SeqCst);
    }

    /// Replace the ledger contents.
    pub fn restore(&self, record: CapacityRecord) {
        self.total.store(record.total_bytes, Ordering::SeqCst);
        self.used.store(record.used_bytes, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use common_error::ErrorKind;

    #[test]
    fn test_reserve_and_release() {
        let ledger = CapacityLedger::new(100);
        ledger.reserve(60).unwrap();
        assert_eq!(ledger.used(), 60);
        assert_eq!(ledger.free(), 40);

        let err = ledger.reserve(41).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CapacityExceeded);
        assert_eq!(ledger.used(), 60);

        ledger.release(60);
        assert_eq!(ledger.free(), 100);
        ledger.release(10);
        assert_eq!(ledger.used(), 0);
    }

    #[test]
    fn test_resize() {
        let ledger = CapacityLedger::new(100);
        ledger.reserve(50).unwrap();
        ledger.resize(50, 80).unwrap();
        assert_eq!(ledger.used(), 80);
        ledger.resize(80, 10).unwrap();
        assert_eq!(ledger.used(), 10);
        assert!(ledger.resize(10, 200).is_err());
        assert_eq!(ledger.used(), 10);
    }

    #[test]
    fn test_grow_and_shrink() {
        let ledger = CapacityLedger::new(100);
        ledger.reserve(30).unwrap();

        assert_eq!(ledger.grow(50), 150);
        assert_eq!(ledger.shrink(120).unwrap(), 30);
        assert_eq!(ledger.free(), 0);

        let err = ledger.shrink(1).unwrap_err();
        assert!(matches!(
            err,
            GraphFsError::CapacityExceeded {
                requested: 1,
                available: 0
            }
        ));
        assert_eq!(ledger.total(), 30);
    }

    #[test]
    fn test_reset_and_restore() {
        let ledger = CapacityLedger::new(100);
        ledger.reserve(70).unwrap();
        ledger.reset();
        assert_eq!(ledger.record().free_bytes(), 100);

        ledger.restore(CapacityRecord {
            total_bytes: 10,
            used_bytes: 4,
        });
        assert_eq!(ledger.free(), 6);
    }

    #[test]
    fn test_concurrent_reservations_never_overcommit() {
        let ledger = Arc::new(CapacityLedger::new(1000));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                std::thread::spawn(move || (0..100).filter(|_| ledger.reserve(3).is_ok()).count())
            })
            .collect();

        let granted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(granted, 333);
        assert_eq!(ledger.used(), 999);
    }
}
