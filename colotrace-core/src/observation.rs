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

//! Observation records
//!
//! One record is one cell of the surveillance table: a patient's ARG/MGE
//! row crossed with one timepoint column. Parsing the table into records is
//! the caller's job.

use crate::node::PatientId;
use serde::{Deserialize, Serialize};

/// Presence values that count as "observed at this timepoint"
pub const PRESENCE_SENTINELS: [&str; 2] = ["1", "2"];

/// A single `(patient, disease, ARG, MGE, timepoint column, presence)` cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationRecord {
    pub patient_id: PatientId,
    pub disease_label: String,
    pub arg_label: String,
    pub mge_label: String,
    /// Raw column header, e.g. `PostFMT_014`
    pub timepoint_column: String,
    /// Raw cell value
    pub presence: String,
}

impl ObservationRecord {
    pub fn new(
        patient_id: PatientId,
        disease_label: impl Into<String>,
        arg_label: impl Into<String>,
        mge_label: impl Into<String>,
        timepoint_column: impl Into<String>,
        presence: impl Into<String>,
    ) -> Self {
        Self {
            patient_id,
            disease_label: disease_label.into(),
            arg_label: arg_label.into(),
            mge_label: mge_label.into(),
            timepoint_column: timepoint_column.into(),
            presence: presence.into(),
        }
    }

    /// True only for the exact sentinel literals; empty, `0`, `true` etc. are absent
    pub fn is_observed(&self) -> bool {
        is_presence_sentinel(&self.presence)
    }
}

pub fn is_presence_sentinel(value: &str) -> bool {
    PRESENCE_SENTINELS.contains(&value)
}
