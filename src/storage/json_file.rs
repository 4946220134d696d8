// Reference on-disk encoding: one text file, two JSON documents separated by a
// newline. Line 1 is the chain, line 2 the pending pool.

use crate::core::{LedgerSnapshot, PendingSnapshot};
use crate::error::{LedgerError, Result};
use crate::storage::StateStore;
use crate::utils::{from_json_line, to_json_line};
use log::{debug, info};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: &Path) -> JsonFileStore {
        JsonFileStore {
            path: path.to_path_buf(),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn parse(content: &str) -> Result<(LedgerSnapshot, PendingSnapshot)> {
        let mut lines = content.lines();
        let chain_line = lines.next().ok_or_else(|| {
            LedgerError::PersistenceFailure("state file has no chain record".to_string())
        })?;
        let pending_line = lines.next().ok_or_else(|| {
            LedgerError::PersistenceFailure("state file has no pending record".to_string())
        })?;
        if lines.any(|line| !line.trim().is_empty()) {
            return Err(LedgerError::PersistenceFailure(
                "state file has content after the pending record".to_string(),
            ));
        }

        let ledger: LedgerSnapshot = from_json_line(chain_line)
            .map_err(|e| LedgerError::PersistenceFailure(format!("chain record: {e}")))?;
        let pending: PendingSnapshot = from_json_line(pending_line)
            .map_err(|e| LedgerError::PersistenceFailure(format!("pending record: {e}")))?;
        Ok((ledger, pending))
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<Option<(LedgerSnapshot, PendingSnapshot)>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No state file at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(LedgerError::PersistenceFailure(format!(
                    "Failed to read {}: {e}",
                    self.path.display()
                )))
            }
        };

        let (ledger, pending) = Self::parse(&content)?;
        info!(
            "Loaded {} blocks and {} pending transactions from {}",
            ledger.blocks.len(),
            pending.transactions.len(),
            self.path.display()
        );
        Ok(Some((ledger, pending)))
    }

    fn save(&self, ledger: &LedgerSnapshot, pending: &PendingSnapshot) -> Result<()> {
        let mut content = to_json_line(ledger)?;
        content.push('\n');
        content.push_str(&to_json_line(pending)?);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LedgerError::PersistenceFailure(format!(
                    "Failed to create {}: {e}",
                    parent.display()
                ))
            })?;
        }

        // Write beside the target and rename so both records change together
        let temp = self.temp_path();
        fs::write(&temp, content).map_err(|e| {
            LedgerError::PersistenceFailure(format!("Failed to write {}: {e}", temp.display()))
        })?;
        fs::rename(&temp, &self.path).map_err(|e| {
            LedgerError::PersistenceFailure(format!(
                "Failed to replace {}: {e}",
                self.path.display()
            ))
        })?;
        debug!("Saved state to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{coins, funded_store, temp_state_path};

    #[test]
    fn test_missing_file_loads_as_none() {
        let (path, _dir) = temp_state_path("blockchain.txt").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let (path, _dir) = temp_state_path("blockchain.txt").unwrap();
        let store = JsonFileStore::new(&path);

        let mut ledger = funded_store("Shakeel", 2);
        ledger.submit_transaction("Shakeel", "Max", coins(3)).unwrap();
        let (chain, pending) = ledger.export_state();
        store.save(&chain, &pending).unwrap();

        let (loaded_chain, loaded_pending) = store.load().unwrap().unwrap();
        assert_eq!(loaded_chain, chain);
        assert_eq!(loaded_pending, pending);
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_file_is_two_json_lines() {
        let (path, _dir) = temp_state_path("blockchain.txt").unwrap();
        let store = JsonFileStore::new(&path);
        let (chain, pending) = funded_store("Shakeel", 0).export_state();
        store.save(&chain, &pending).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                r#"[{"previous_hash":"","index":0,"transactions":[],"proof":100}]"#,
                "[]"
            ]
        );
    }

    #[test]
    fn test_malformed_file_is_persistence_failure() {
        let (path, _dir) = temp_state_path("blockchain.txt").unwrap();
        fs::write(&path, "[{not json}]\n[]").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(
            store.load(),
            Err(LedgerError::PersistenceFailure(_))
        ));

        fs::write(&path, "[]").unwrap();
        assert!(matches!(
            store.load(),
            Err(LedgerError::PersistenceFailure(_))
        ));
    }

    #[test]
    fn test_trailing_record_is_persistence_failure() {
        let (path, _dir) = temp_state_path("blockchain.txt").unwrap();
        let store = JsonFileStore::new(&path);
        let (chain, pending) = funded_store("Shakeel", 1).export_state();
        store.save(&chain, &pending).unwrap();

        let mut content = fs::read_to_string(&path).unwrap();
        content.push_str("\n[]\n");
        fs::write(&path, &content).unwrap();
        assert!(matches!(
            store.load(),
            Err(LedgerError::PersistenceFailure(_))
        ));

        // A trailing newline alone is still a valid file
        let mut content = to_json_line(&chain).unwrap();
        content.push('\n');
        content.push_str(&to_json_line(&pending).unwrap());
        content.push('\n');
        fs::write(&path, content).unwrap();
        assert!(store.load().unwrap().is_some());
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let (path, _dir) = temp_state_path("nested/dir/blockchain.txt").unwrap();
        let store = JsonFileStore::new(&path);
        let (chain, pending) = funded_store("Shakeel", 1).export_state();
        store.save(&chain, &pending).unwrap();
        assert!(path.exists());
    }
}
