// Copyright 2025 Colotrace Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Observation table reader
//!
//! The table is comma separated with a header row. The first four columns
//! are patient ID, disease, ARG label and MGE label; every later column is a
//! timepoint whose cells hold the presence value. Each non-empty cell past
//! the fourth column becomes one [`ObservationRecord`]. Header validity is
//! left to the graph builder so bad columns are reported in one place.
//!
//! Fields are trimmed and may be quoted; rows may be ragged.

use anyhow::{Context, Result};
use colotrace_core::{ObservationRecord, PatientId};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const LEADING_COLUMNS: usize = 4;

/// Counts from one pass over the table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadStats {
    pub rows: usize,
    pub short_rows: usize,
    pub bad_patient_ids: usize,
}

/// Everything read from one observation table
#[derive(Debug, Clone, Default)]
pub struct ObservationTable {
    pub records: Vec<ObservationRecord>,
    /// Disease of every row whose patient ID parsed; a later row wins
    pub diseases: BTreeMap<PatientId, String>,
    pub stats: ReadStats,
}

pub fn read_observations(path: &Path) -> Result<ObservationTable> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open observation table {}", path.display()))?;
    parse_observations(file)
        .with_context(|| format!("Failed to read observation table {}", path.display()))
}

pub fn parse_observations<R: Read>(reader: R) -> Result<ObservationTable> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);
    let mut table = ObservationTable::default();

    let headers = reader.headers().context("Failed to read header row")?.clone();
    if headers.is_empty() {
        tracing::warn!("Observation table is empty");
        return Ok(table);
    }

    let mut row = StringRecord::new();
    while reader.read_record(&mut row)? {
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        if row.len() < LEADING_COLUMNS {
            table.stats.short_rows += 1;
            tracing::warn!(line, fields = row.len(), "Skipping short row");
            continue;
        }

        let patient_id: PatientId = match row[0].parse() {
            Ok(id) => id,
            Err(_) => {
                table.stats.bad_patient_ids += 1;
                tracing::warn!(line, value = &row[0], "Skipping row: bad patient ID");
                continue;
            }
        };
        table.stats.rows += 1;

        let (disease, arg, mge) = (&row[1], &row[2], &row[3]);
        table.diseases.insert(patient_id, disease.to_string());

        for (column, cell) in headers.iter().zip(row.iter()).skip(LEADING_COLUMNS) {
            if cell.is_empty() {
                continue;
            }
            table
                .records
                .push(ObservationRecord::new(patient_id, disease, arg, mge, column, cell));
        }
    }

    tracing::info!(
        rows = table.stats.rows,
        records = table.records.len(),
        patients = table.diseases.len(),
        skipped = table.stats.short_rows + table.stats.bad_patient_ids,
        "Observation table read"
    );
    Ok(table)
}
