use crate::prelude::*;

/// Name and state code read from a process status record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessStatus {
    pub name: String,
    pub state: char,
}

/// Enumerable source of raw process entries, keyed by process id
pub trait ProcessSource {
    type Entry;

    /// Open the process namespace and lazily list its entries.
    ///
    /// An error here means there is no data source at all and is not recoverable.
    fn enumerate(&self) -> Result<Box<dyn Iterator<Item = Self::Entry> + '_>>;

    /// Process id of the entry, `None` when the entry does not name a process
    fn pid(&self, entry: &Self::Entry) -> Option<i32>;

    /// Uid owning the process
    fn owner(&self, entry: &Self::Entry) -> Result<u32>;

    /// Fails when the process exited between enumeration and the read
    fn read_status(&self, entry: &Self::Entry) -> Result<ProcessStatus>;
}

pub trait UserResolver {
    fn user_name(&self, uid: u32) -> Option<String>;
}
