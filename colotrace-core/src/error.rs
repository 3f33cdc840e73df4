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

//! Error types for graph construction and registry lookups

use crate::timepoint::ParseTimepointError;
use thiserror::Error;

/// Result type for colotrace operations
pub type Result<T> = std::result::Result<T, ColotraceError>;

/// Errors raised by the core
///
/// Row-level variants (`UnknownArg`, `UnknownMge`, `UnknownTimepoint`,
/// `MalformedRow`) are recovered by the builder: the row is skipped and the
/// batch continues.
#[derive(Debug, Error)]
pub enum ColotraceError {
    /// ARG label not present in the registry
    #[error("Unknown ARG label: {0}")]
    UnknownArg(String),

    /// MGE label not present in the registry
    #[error("Unknown MGE label: {0}")]
    UnknownMge(String),

    /// Column header that is not a recognised timepoint
    #[error("Unknown timepoint column: {0}")]
    UnknownTimepoint(#[from] ParseTimepointError),

    /// Input row that could not be interpreted
    #[error("Malformed row: {0}")]
    MalformedRow(String),

    /// Registry construction or lookup failure
    #[error("Registry error: {0}")]
    Registry(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ColotraceError {
    /// Whether the builder skips the offending row instead of failing
    pub fn is_row_error(&self) -> bool {
        matches!(
            self,
            ColotraceError::UnknownArg(_)
                | ColotraceError::UnknownMge(_)
                | ColotraceError::UnknownTimepoint(_)
                | ColotraceError::MalformedRow(_)
        )
    }
}

impl From<serde_json::Error> for ColotraceError {
    fn from(e: serde_json::Error) -> Self {
        ColotraceError::Serialization(e.to_string())
    }
}
