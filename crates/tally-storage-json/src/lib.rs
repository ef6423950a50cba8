use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use tally_core::{storage::LedgerStorage, CoreError};
use tally_domain::LedgerSnapshot;
use tracing::debug;

const LEDGER_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// Filesystem-backed JSON persistence for ledger snapshots.
#[derive(Debug, Clone)]
pub struct JsonLedgerStorage {
    ledgers_dir: PathBuf,
}

impl JsonLedgerStorage {
    pub fn new(ledgers_dir: PathBuf) -> Result<Self, CoreError> {
        fs::create_dir_all(&ledgers_dir)?;
        Ok(Self { ledgers_dir })
    }

    pub fn ledgers_dir(&self) -> &Path {
        &self.ledgers_dir
    }

    pub fn ledger_path(&self, name: &str) -> PathBuf {
        self.ledgers_dir
            .join(format!("{}.{}", canonical_name(name), LEDGER_EXTENSION))
    }

    /// Resolves `reference` either as a path to an existing file or as a
    /// ledger name inside the storage root.
    pub fn resolve(&self, reference: &str) -> PathBuf {
        let candidate = Path::new(reference);
        if candidate.is_file() {
            candidate.to_path_buf()
        } else {
            self.ledger_path(reference)
        }
    }

    pub fn list_ledger_metadata(&self) -> Result<Vec<LedgerMetadata>, CoreError> {
        let mut entries = Vec::new();
        for slug in self.list_ledgers()? {
            let ledger = self.load_ledger(&slug)?;
            entries.push(LedgerMetadata {
                path: self.ledger_path(&slug),
                slug,
                budget_count: ledger.budgets.len(),
                active_budget_count: ledger.active_budgets().count(),
                transaction_count: ledger.transactions.len(),
            });
        }
        entries.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(entries)
    }
}

impl LedgerStorage for JsonLedgerStorage {
    fn save_ledger(&self, name: &str, ledger: &LedgerSnapshot) -> Result<(), CoreError> {
        save_ledger_to_path(ledger, &self.ledger_path(name))
    }

    fn load_ledger(&self, name: &str) -> Result<LedgerSnapshot, CoreError> {
        let path = self.resolve(name);
        if !path.exists() {
            return Err(CoreError::LedgerNotFound(name.to_string()));
        }
        load_ledger_from_path(&path)
    }

    fn list_ledgers(&self) -> Result<Vec<String>, CoreError> {
        if !self.ledgers_dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.ledgers_dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some(LEDGER_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn delete_ledger(&self, name: &str) -> Result<(), CoreError> {
        let path = self.ledger_path(name);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn load_ledger_from_path(&self, path: &Path) -> Result<LedgerSnapshot, CoreError> {
        load_ledger_from_path(path)
    }
}

/// Saves a ledger snapshot to an arbitrary path on disk.
pub fn save_ledger_to_path(ledger: &LedgerSnapshot, path: &Path) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    write_atomic(&tmp, &serialize_ledger(ledger)?)?;
    fs::rename(&tmp, path)?;
    debug!(path = %path.display(), "ledger saved");
    Ok(())
}

/// Loads a ledger snapshot from the provided filesystem path.
pub fn load_ledger_from_path(path: &Path) -> Result<LedgerSnapshot, CoreError> {
    let data = fs::read_to_string(path)?;
    let ledger: LedgerSnapshot =
        serde_json::from_str(&data).map_err(|err| CoreError::Serialization(err.to_string()))?;
    debug!(
        path = %path.display(),
        budgets = ledger.budgets.len(),
        transactions = ledger.transactions.len(),
        "ledger loaded"
    );
    Ok(ledger)
}

#[derive(Debug, Clone)]
pub struct LedgerMetadata {
    pub slug: String,
    pub path: PathBuf,
    pub budget_count: usize,
    pub active_budget_count: usize,
    pub transaction_count: usize,
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "ledger".into()
    } else {
        sanitized
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

fn serialize_ledger(ledger: &LedgerSnapshot) -> Result<String, CoreError> {
    serde_json::to_string_pretty(ledger).map_err(|err| CoreError::Serialization(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_name_slugifies() {
        assert_eq!(canonical_name("Family Budget"), "family_budget");
        assert_eq!(canonical_name("q3-2024"), "q3-2024");
        assert_eq!(canonical_name("  !!  "), "ledger");
    }

    #[test]
    fn tmp_path_appends_suffix() {
        let path = Path::new("/tmp/ledgers/home.json");
        assert_eq!(tmp_path(path), PathBuf::from("/tmp/ledgers/home.json.tmp"));
    }
}
