use std::path::PathBuf;

use procfs::process::{Process, all_processes_with_root};

use super::{ProcessSource, ProcessStatus};
use crate::config::DEFAULT_PROC_ROOT;
use crate::prelude::*;

/// Process source backed by a procfs mount
#[derive(Debug, Clone)]
pub struct ProcFs {
    root: PathBuf,
}

impl ProcFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Default for ProcFs {
    fn default() -> Self {
        Self::new(DEFAULT_PROC_ROOT)
    }
}

impl ProcessSource for ProcFs {
    type Entry = Process;

    fn enumerate(&self) -> Result<Box<dyn Iterator<Item = Process> + '_>> {
        let processes = all_processes_with_root(&self.root).with_context(|| {
            format!(
                "Failed to open process namespace at {}",
                self.root.display()
            )
        })?;

        // A process can exit between the directory listing and opening its entry
        Ok(Box::new(processes.filter_map(|process| match process {
            Ok(process) => Some(process),
            Err(e) => {
                trace!("Skipping process entry: {e}");
                None
            }
        })))
    }

    fn pid(&self, entry: &Process) -> Option<i32> {
        Some(entry.pid())
    }

    fn owner(&self, entry: &Process) -> Result<u32> {
        Ok(entry.uid()?)
    }

    fn read_status(&self, entry: &Process) -> Result<ProcessStatus> {
        let stat = entry.stat()?;
        Ok(ProcessStatus {
            name: stat.comm,
            state: stat.state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn stat_line(pid: i32, name: &str, state: char) -> String {
        format!(
            "{pid} ({name}) {state} 1 {pid} {pid} 0 -1 4194304 84 0 0 0 0 0 0 0 20 0 1 0 10398 \
             2703360 306 18446744073709551615 94662285975552 94662285995433 140735248797728 0 0 \
             0 0 0 0 0 0 0 17 0 0 0 0 0 0 94662286011440 94662286013056 94663290949632 \
             140735248803221 140735248803241 140735248803241 140735248805867 0\n"
        )
    }

    fn fake_proc(entries: &[(i32, &str, char)]) -> TempDir {
        let root = TempDir::new().unwrap();
        for (pid, name, state) in entries {
            let dir = root.path().join(pid.to_string());
            fs::create_dir(&dir).unwrap();
            fs::write(dir.join("stat"), stat_line(*pid, name, *state)).unwrap();
        }
        root
    }

    fn sorted_pids(source: &ProcFs) -> Vec<i32> {
        let mut pids: Vec<i32> = source
            .enumerate()
            .unwrap()
            .filter_map(|entry| source.pid(&entry))
            .collect();
        pids.sort();
        pids
    }

    #[test]
    fn test_enumerate_skips_non_process_entries() {
        let root = fake_proc(&[(1, "init", 'S'), (42, "bash", 'R')]);
        fs::create_dir(root.path().join("sys")).unwrap();
        fs::write(root.path().join("uptime"), "1.0 1.0\n").unwrap();

        let source = ProcFs::new(root.path());
        assert_eq!(sorted_pids(&source), vec![1, 42]);
    }

    #[test]
    fn test_read_status_and_owner() {
        let root = fake_proc(&[(42, "bash", 'S')]);
        let source = ProcFs::new(root.path());

        let entry = source.enumerate().unwrap().next().unwrap();
        let status = source.read_status(&entry).unwrap();
        assert_eq!(
            status,
            ProcessStatus {
                name: "bash".to_string(),
                state: 'S',
            }
        );
        assert_eq!(
            source.owner(&entry).unwrap(),
            nix::unistd::getuid().as_raw()
        );
    }

    #[test]
    fn test_name_with_parentheses() {
        let root = fake_proc(&[(7, "weird) (name", 'Z')]);
        let source = ProcFs::new(root.path());

        let entry = source.enumerate().unwrap().next().unwrap();
        let status = source.read_status(&entry).unwrap();
        assert_eq!(status.name, "weird) (name");
        assert_eq!(status.state, 'Z');
    }

    #[test]
    fn test_vanished_status_is_an_error() {
        let root = fake_proc(&[(42, "bash", 'S')]);
        let source = ProcFs::new(root.path());

        let entry = source.enumerate().unwrap().next().unwrap();
        fs::remove_file(root.path().join("42").join("stat")).unwrap();
        assert!(source.read_status(&entry).is_err());
    }

    #[test]
    fn test_missing_namespace_is_an_error() {
        let root = TempDir::new().unwrap();
        let source = ProcFs::new(root.path().join("does-not-exist"));
        let err = source.enumerate().err().unwrap();
        assert!(err.to_string().contains("Failed to open process namespace"));
    }

    #[test]
    fn test_live_proc_lists_current_process() {
        let source = ProcFs::default();
        let own_pid = std::process::id() as i32;
        let entry = source
            .enumerate()
            .unwrap()
            .find(|entry| source.pid(entry) == Some(own_pid))
            .unwrap();
        let status = source.read_status(&entry).unwrap();
        assert!(!status.name.is_empty());
    }
}
