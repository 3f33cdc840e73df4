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

//! Colotrace Core
//!
//! Temporal colocalization graph of antibiotic-resistance genes (ARGs) and
//! mobile genetic elements (MGEs) across longitudinal patient samples.

pub mod builder;
pub mod config;
pub mod edge;
pub mod error;
pub mod filter;
pub mod graph;
pub mod node;
pub mod observation;
pub mod registry;
pub mod timepoint;

pub use builder::{BuildOutput, ExclusionReason, GraphBuilder, IngestOutcome, IngestStats};
pub use config::{BuildConfig, DRUG_RESISTANCE_CLASS};
pub use edge::{Edge, EdgeKey, EdgeKind};
pub use error::{ColotraceError, Result};
pub use filter::{
    filter_by_arg, filter_by_arg_and_mge, filter_by_disease, filter_by_mge, filter_by_mge_group,
    filter_by_timepoint,
};
pub use graph::Graph;
pub use node::{EntityId, EntityKind, Node, PatientId};
pub use observation::{is_presence_sentinel, ObservationRecord, PRESENCE_SENTINELS};
pub use registry::{ArgEntry, EntityRegistry, MgeEntry, StaticRegistry};
pub use timepoint::{
    post_bin_of, ParseTimepointError, PostBin, PostDay, Timepoint, TimepointCategory, DONOR_CODE,
    POST_FMT_DAYS, PRE_FMT_CODE,
};
