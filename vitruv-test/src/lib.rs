// Integration test fixtures for Vitruv.

use std::path::{Path, PathBuf};

/// A Python source file written into a fresh temp directory.
#[derive(Debug)]
pub struct SourceFixture {
    pub dir: tempfile::TempDir,
    pub path: PathBuf,
}

impl SourceFixture {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `source` as `<name>` inside a fresh temp dir.
    pub fn new(name: &str, source: &str) -> Self {
        let dir = tempfile::tempdir().expect("create tempdir");
        let path = dir.path().join(name);
        std::fs::write(&path, source).expect("write fixture");
        Self { dir, path }
    }

    /// A small monolith in the shape of a typical legacy script: file I/O,
    /// aggregation, reporting, and a module-level entry call.
    pub fn legacy_monolith() -> Self {
        Self::new(
            "legacy_report.py",
            r"import csv
import json

def read_records(path):
    rows = []
    with open(path) as f:
        reader = csv.DictReader(f)
        for row in reader:
            rows.append(row)
    return rows

def aggregate(rows):
    totals = {}
    for row in rows:
        user = row['user_id']
        totals[user] = totals.get(user, 0) + float(row['value'])
    return totals

def write_report(totals, out_path):
    with open(out_path, 'w') as f:
        json.dump(totals, f)

def main():
    rows = read_records('in.csv')
    totals = aggregate(rows)
    write_report(totals, 'out.json')

main()
",
        )
    }

    /// A file with an unterminated definition after a clean one.
    pub fn partially_broken() -> Self {
        Self::new(
            "broken.py",
            "def good():\n    ping()\n\ndef broken(:\n    pass\n",
        )
    }
}
