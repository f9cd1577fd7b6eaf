use crate::{
    error::Error,
    options::Query,
    output,
    report::{Analyzer, Report},
};
use anyhow::{Context, Error as AnyError};
use arcgis::GisSource;
use indicatif::ProgressBar;
use log::{info, warn};
use std::{fs, path::Path, process::ExitCode};

/// One batch line and what came of it.
#[derive(Debug)]
pub struct Entry {
    pub input: String,
    pub outcome: Result<Report, Error>,
}

impl Entry {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub failed: usize,
}

impl Summary {
    pub fn of(entries: &[Entry]) -> Self {
        Self {
            total: entries.len(),
            failed: entries.iter().filter(|e| !e.is_ok()).count(),
        }
    }

    pub fn succeeded(&self) -> usize {
        self.total - self.failed
    }

    /// Process exit status: 0 when every entry succeeded, 1 otherwise.
    pub fn status(&self) -> u8 {
        u8::from(self.failed > 0)
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.status())
    }
}

/// Looks up a single query, appending its row to `csv` whether or not
/// it succeeded.
pub fn run_one<S: GisSource>(
    analyzer: &Analyzer<'_, S>,
    query: &Query,
    csv: Option<&Path>,
) -> Result<Report, AnyError> {
    let entry = Entry {
        input: query.input().to_owned(),
        outcome: analyzer.run(query),
    };
    if let Some(path) = csv {
        output::append_csv(path, std::slice::from_ref(&entry))?;
    }
    Ok(entry.outcome?)
}

/// Reads a batch file: one address per line, blank lines skipped.
pub fn read_batch(path: &Path) -> Result<Vec<String>, AnyError> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading batch file {}", path.display()))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect())
}

/// Looks up every address in order. A failed entry is recorded and the
/// batch carries on.
pub fn run<S: GisSource>(
    analyzer: &Analyzer<'_, S>,
    addresses: Vec<String>,
    pb: &ProgressBar,
) -> Vec<Entry> {
    let mut entries = Vec::with_capacity(addresses.len());
    for address in addresses {
        pb.set_message(address.clone());
        let outcome = analyzer.run(&Query::Address(address.clone()));
        if let Err(e) = &outcome {
            warn!("{address}: {} error, {e}", e.kind());
        }
        entries.push(Entry {
            input: address,
            outcome,
        });
        pb.inc(1);
    }
    pb.finish_and_clear();

    let summary = Summary::of(&entries);
    info!(
        "batch: {} of {} succeeded",
        summary.succeeded(),
        summary.total
    );
    entries
}
