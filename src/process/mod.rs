mod source;
mod users;

#[cfg(target_os = "linux")]
mod proc_fs;

#[cfg(target_os = "linux")]
pub use proc_fs::ProcFs;
pub use source::{ProcessSource, ProcessStatus, UserResolver};
pub use users::SystemUsers;

/// Owner shown when the uid of a process cannot be resolved to a user name
pub const UNKNOWN_OWNER: &str = "unknown";
pub const MAX_OWNER_BYTES: usize = 31;
pub const MAX_NAME_BYTES: usize = 63;

/// One process as seen by the last snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRecord {
    pub pid: i32,
    pub owner: String,
    pub name: String,
    pub state: char,
}

impl ProcessRecord {
    /// Build a record, truncating `owner` and `name` to their byte limits
    pub fn new(pid: i32, owner: impl Into<String>, name: impl Into<String>, state: char) -> Self {
        Self {
            pid,
            owner: truncate_to_bytes(owner.into(), MAX_OWNER_BYTES),
            name: truncate_to_bytes(name.into(), MAX_NAME_BYTES),
            state,
        }
    }
}

/// Truncate `s` to at most `max` bytes without splitting a UTF-8 character
fn truncate_to_bytes(mut s: String, max: usize) -> String {
    if s.len() > max {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        s.truncate(end);
    }
    s
}
