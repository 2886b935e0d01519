use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use super::defaults::default_use_cases;
use crate::scoring::ScoredUseCase;
use crate::usecase::{Field, UseCase};

const PRIORITY_COLUMN: &str = "Priority Score";
const READINESS_COLUMN: &str = "Readiness Score";

/// Load the seed use cases.
///
/// Falls back to the built-in defaults when no path is given or the file
/// does not exist. A file that exists but cannot be read or parsed is an
/// error; unparseable rating cells are not.
pub fn load_seed(path: Option<&Path>) -> Result<Vec<UseCase>> {
    let path = match path {
        Some(p) if p.exists() => p,
        Some(p) => {
            tracing::info!(path = %p.display(), "seed file not found, using built-in use cases");
            return Ok(default_use_cases());
        }
        None => {
            tracing::debug!("no seed file configured, using built-in use cases");
            return Ok(default_use_cases());
        }
    };

    let file = File::open(path)
        .with_context(|| format!("Failed to open seed file at {}", path.display()))?;
    let use_cases = read_use_cases(file)
        .with_context(|| format!("Failed to parse seed file {}", path.display()))?;

    tracing::debug!(path = %path.display(), rows = use_cases.len(), "loaded seed file");
    warn_out_of_range(&use_cases);
    Ok(use_cases)
}

/// Parse use cases from CSV with a header row.
///
/// Columns are matched by header name, ignoring case and surrounding
/// whitespace. Missing columns and short rows leave fields empty.
pub fn read_use_cases<R: Read>(reader: R) -> Result<Vec<UseCase>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers().context("Failed to read CSV header")?.clone();
    let columns: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (normalize_header(h), i))
        .collect();

    let mut use_cases = Vec::new();
    for (line, record) in csv_reader.records().enumerate() {
        let record = record.with_context(|| format!("Invalid CSV record at row {}", line + 1))?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let mut use_case = UseCase::default();
        for field in Field::ALL {
            let cell = columns
                .get(&normalize_header(field.column()))
                .and_then(|i| record.get(*i))
                .unwrap_or("");
            field.set(&mut use_case, cell);
        }
        use_cases.push(use_case);
    }

    Ok(use_cases)
}

fn normalize_header(header: &str) -> String {
    header.trim_start_matches('\u{feff}').trim().to_lowercase()
}

fn warn_out_of_range(use_cases: &[UseCase]) {
    for (i, use_case) in use_cases.iter().enumerate() {
        for factor in use_case.out_of_range_factors() {
            tracing::warn!(
                row = i + 1,
                use_case = %use_case.name,
                column = factor.column(),
                value = %use_case.rating(factor).display(),
                "rating outside the 1-5 scale (scored as {})",
                use_case.value(factor)
            );
        }
    }
}

/// Write scored use cases as CSV: the seed columns followed by
/// Priority Score and Readiness Score.
pub fn write_scored_csv<W: Write>(writer: W, rows: &[&ScoredUseCase]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = Field::ALL.iter().map(|f| f.column()).collect();
    header.push(PRIORITY_COLUMN);
    header.push(READINESS_COLUMN);
    csv_writer.write_record(&header).context("Failed to write CSV header")?;

    for row in rows {
        let mut record: Vec<String> = Field::ALL.iter().map(|f| f.get(&row.use_case)).collect();
        record.push(format!("{:.4}", row.priority_score));
        record.push(format!("{:.4}", row.readiness_score));
        csv_writer
            .write_record(&record)
            .with_context(|| format!("Failed to write row '{}'", row.use_case.name))?;
    }

    csv_writer.flush().context("Failed to flush CSV output")?;
    Ok(())
}

/// Write scored use cases to a file atomically.
pub fn export_scored_csv(path: &Path, rows: &[&ScoredUseCase]) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    write_scored_csv(&mut file, rows)?;

    file.commit()
        .with_context(|| format!("Failed to save export to {}", path.display()))?;
    Ok(())
}
