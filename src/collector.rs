use crate::prelude::*;
use crate::process::{ProcessRecord, ProcessSource, UNKNOWN_OWNER, UserResolver};
use crate::table::{ProcessTable, SharedTable};

/// Builds process snapshots from a [`ProcessSource`]
pub struct SnapshotCollector<S, U> {
    source: S,
    users: U,
    max_count: usize,
}

impl<S: ProcessSource, U: UserResolver> SnapshotCollector<S, U> {
    pub fn new(source: S, users: U, max_count: usize) -> Self {
        Self {
            source,
            users,
            max_count,
        }
    }

    pub fn max_count(&self) -> usize {
        self.max_count
    }

    /// Collect at most `max_count` processes.
    ///
    /// Only a failure to open the namespace is returned. Entries that cannot be read
    /// are skipped and unresolved owners become [`UNKNOWN_OWNER`].
    pub fn collect(&self) -> Result<ProcessTable> {
        let mut entries = self.source.enumerate()?;
        let mut records = Vec::new();

        while records.len() < self.max_count {
            let Some(entry) = entries.next() else {
                break;
            };
            let Some(pid) = self.source.pid(&entry).filter(|pid| *pid > 0) else {
                continue;
            };

            let owner = self.resolve_owner(pid, &entry);
            let status = match self.source.read_status(&entry) {
                Ok(status) => status,
                Err(e) => {
                    trace!("Skipping process {pid}: {e:#}");
                    continue;
                }
            };

            records.push(ProcessRecord::new(pid, owner, status.name, status.state));
        }

        debug!("Collected {} processes", records.len());
        Ok(ProcessTable::new(records))
    }

    /// Collect a new snapshot and publish it
    pub fn refresh(&self, table: &SharedTable) -> Result<()> {
        let snapshot = self.collect()?;
        table.publish(snapshot);
        Ok(())
    }

    fn resolve_owner(&self, pid: i32, entry: &S::Entry) -> String {
        match self.source.owner(entry) {
            Ok(uid) => self
                .users
                .user_name(uid)
                .unwrap_or_else(|| UNKNOWN_OWNER.to_string()),
            Err(e) => {
                trace!("Failed to read owner of process {pid}: {e:#}");
                UNKNOWN_OWNER.to_string()
            }
        }
    }
}
