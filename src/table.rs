use std::sync::{Arc, PoisonError, RwLock};

use crate::process::ProcessRecord;

/// Processes known as of the last completed snapshot, in enumeration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessTable {
    records: Vec<ProcessRecord>,
}

impl ProcessTable {
    /// Tables are only built by the snapshot collector, which keeps them within
    /// capacity and drops non-positive pids
    pub(crate) fn new(records: Vec<ProcessRecord>) -> Self {
        assert!(records.iter().all(|record| record.pid > 0));
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProcessRecord> {
        self.records.iter()
    }

    pub fn find(&self, pid: i32) -> Option<&ProcessRecord> {
        self.records.iter().find(|record| record.pid == pid)
    }

    pub fn contains(&self, pid: i32) -> bool {
        self.find(pid).is_some()
    }
}

/// Handle on the current snapshot, shared between the refresh and command loops.
///
/// Snapshots are swapped whole: a reader holds the lock only long enough to clone
/// the `Arc` and always sees one complete table.
#[derive(Debug, Clone, Default)]
pub struct SharedTable {
    current: Arc<RwLock<Arc<ProcessTable>>>,
}

impl SharedTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Arc<ProcessTable> {
        // The guarded value is only ever replaced whole, poisoning cannot leave it torn
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&current)
    }

    pub fn publish(&self, table: ProcessTable) {
        let table = Arc::new(table);
        let previous = {
            let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *current, table)
        };
        // Dropped outside the lock
        drop(previous);
    }
}
