use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::{Lead, Result, SentRecord};

/// The `LeadStore` struct owns the append-only lead table.
///
/// The header row is written once, when the file is created; later batches
/// append rows only. The crawl loop appends and drains its batch after every
/// query, so rows for completed queries survive a crash on a later one.
pub struct LeadStore {
    path: PathBuf,
}

impl LeadStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Appends a batch of leads, creating the file (and its parent
    /// directory) on first use.
    ///
    /// An empty batch is a complete no-op: no file is created, nothing is
    /// logged. Returns the number of rows written.
    pub fn append(&self, leads: &[Lead]) -> Result<usize> {
        if leads.is_empty() {
            return Ok(0);
        }

        let mut writer = open_append(&self.path)?;
        for lead in leads {
            writer.serialize(lead)?;
        }
        writer.flush()?;

        Ok(leads.len())
    }
}

/// The `SentLog` struct owns the append-only table of send outcomes.
/// One row is appended immediately after every attempt, never batched.
pub struct SentLog {
    path: PathBuf,
}

impl SentLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Appends a single outcome row.
    pub fn record(&self, record: &SentRecord) -> Result<()> {
        let mut writer = open_append(&self.path)?;
        writer.serialize(record)?;
        writer.flush()?;

        Ok(())
    }
}

/// Streams the lead table and collapses it into a mapping from email
/// address to the most recently seen query for that address.
///
/// Rows are visited in file order and the last row wins. A row contributes
/// only when its email field is non-empty, contains `@` and is not a known
/// placeholder; rows that fail to parse are logged and skipped. The full
/// stream is always consumed.
pub fn read_recipients(path: impl AsRef<Path>) -> Result<BTreeMap<String, String>> {
    let file = File::open(path.as_ref())?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(file);

    let mut recipients = BTreeMap::new();

    for row in reader.deserialize::<Lead>() {
        let lead = match row {
            Ok(lead) => lead,
            Err(e) => {
                warn!("Skipping unparseable lead row: {}", e);
                continue;
            }
        };

        let email = lead.email.trim();
        if !is_sendable(email) {
            continue;
        }

        let query = if lead.query.is_empty() {
            "N/A".to_string()
        } else {
            lead.query
        };
        recipients.insert(email.to_string(), query);
    }

    Ok(recipients)
}

/// A recipient must look like an address and must not be one of the
/// placeholder values older crawls may have let through.
fn is_sendable(email: &str) -> bool {
    !email.is_empty()
        && email.contains('@')
        && !email.contains("user@domain.com")
        && !email.ends_with("@example.com")
}

fn open_append(path: &Path) -> Result<csv::Writer<File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let write_header = !path.exists();
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    Ok(csv::WriterBuilder::new()
        .has_headers(write_header)
        .from_writer(file))
}
