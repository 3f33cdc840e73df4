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

//! Sampling timepoints
//!
//! A closed set: the donor sample, the pre-treatment sample (day 0) and a
//! fixed list of post-treatment sampling days.
//!
//! **Ordering:** the donor sample sorts before every other timepoint even
//! though its backing code ([`DONOR_CODE`]) is larger than any sampling day.
//! Everything downstream that asks "which came first" relies on this.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Backing code of the donor timepoint (out of band, above every sampling day)
pub const DONOR_CODE: u16 = 1000;

/// Backing code of the pre-treatment timepoint
pub const PRE_FMT_CODE: u16 = 0;

/// Post-treatment sampling days, ascending
pub const POST_FMT_DAYS: [u16; 50] = [
    1, 2, 3, 6, 7, 12, 13, 14, 15, 16, 20, 21, 28, 29, 30, 31, 35, 36, 40, 41, 42, 44, 54, 56, 59,
    61, 63, 64, 65, 68, 81, 84, 90, 94, 95, 97, 98, 111, 112, 120, 135, 140, 150, 179, 180, 195,
    365, 384, 408, 730,
];

/// Errors produced when a timepoint label or column header is not recognised
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseTimepointError {
    #[error("unknown timepoint label: {0}")]
    UnknownLabel(String),

    #[error("unrecognized timepoint column header: {0}")]
    UnknownHeader(String),

    #[error("could not parse day from header column: {0}")]
    UnparseableDay(String),

    #[error("day {0} is not a post-treatment sampling day")]
    UnsupportedDay(u16),
}

/// A validated post-treatment sampling day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PostDay(u16);

impl PostDay {
    /// Returns `None` unless `day` is one of [`POST_FMT_DAYS`]
    pub fn new(day: u16) -> Option<Self> {
        POST_FMT_DAYS.binary_search(&day).ok().map(|_| Self(day))
    }

    pub fn day(self) -> u16 {
        self.0
    }
}

/// One sampled timepoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Timepoint {
    /// Donor material (sentinel code 1000)
    Donor,
    /// Pre-treatment sample, day 0
    PreFmt,
    /// Post-treatment sample on a specific day
    PostFmt(PostDay),
}

impl Timepoint {
    /// Post-treatment timepoint for `day`, if it is a sampling day
    pub fn post(day: u16) -> Option<Self> {
        PostDay::new(day).map(Timepoint::PostFmt)
    }

    /// Integer encoding: Donor = 1000, PreFmt = 0, PostFmt = day
    pub fn code(self) -> u16 {
        match self {
            Timepoint::Donor => DONOR_CODE,
            Timepoint::PreFmt => PRE_FMT_CODE,
            Timepoint::PostFmt(day) => day.day(),
        }
    }

    /// Inverse of [`Timepoint::code`]
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            DONOR_CODE => Some(Timepoint::Donor),
            PRE_FMT_CODE => Some(Timepoint::PreFmt),
            day => Timepoint::post(day),
        }
    }

    /// Resolve an input column header (`Donor`, `PreFMT`, `PostFMT_<day>`)
    ///
    /// Trailing whitespace is ignored. Any other header is an error; callers
    /// treat it as a column to skip rather than a fatal condition.
    pub fn from_column_header(header: &str) -> Result<Self, ParseTimepointError> {
        let col = header.trim_end();
        match col {
            "Donor" => Ok(Timepoint::Donor),
            "PreFMT" => Ok(Timepoint::PreFmt),
            _ => {
                let day_str = col
                    .strip_prefix("PostFMT_")
                    .ok_or_else(|| ParseTimepointError::UnknownHeader(col.to_string()))?;
                let day: u16 = day_str
                    .parse()
                    .map_err(|_| ParseTimepointError::UnparseableDay(col.to_string()))?;
                Timepoint::post(day).ok_or(ParseTimepointError::UnsupportedDay(day))
            }
        }
    }

    /// Display label: `donor`, `pre` or `post_NNN`
    pub fn label(self) -> String {
        self.to_string()
    }

    /// Donor classification by label, not by code
    pub fn is_donor(self) -> bool {
        self.label().contains("donor")
    }

    /// Pre-treatment classification by label
    pub fn is_pre(self) -> bool {
        self.label().contains("pre")
    }

    /// Post-treatment classification by label
    pub fn is_post(self) -> bool {
        self.label().contains("post")
    }

    /// Days-since-treatment bin, for post-treatment timepoints only
    pub fn post_bin(self) -> Option<PostBin> {
        match self {
            Timepoint::PostFmt(day) => Some(PostBin::from_day(day.day())),
            _ => None,
        }
    }

    /// Every timepoint in the closed set, in timepoint order
    pub fn all() -> impl Iterator<Item = Timepoint> {
        [Timepoint::Donor, Timepoint::PreFmt]
            .into_iter()
            .chain(POST_FMT_DAYS.iter().map(|&day| Timepoint::PostFmt(PostDay(day))))
    }
}

impl Ord for Timepoint {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Timepoint::Donor, Timepoint::Donor) => Ordering::Equal,
            (Timepoint::Donor, _) => Ordering::Less,
            (_, Timepoint::Donor) => Ordering::Greater,
            _ => self.code().cmp(&other.code()),
        }
    }
}

impl PartialOrd for Timepoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Timepoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timepoint::Donor => f.write_str("donor"),
            Timepoint::PreFmt => f.write_str("pre"),
            Timepoint::PostFmt(day) => write!(f, "post_{:03}", day.day()),
        }
    }
}

impl FromStr for Timepoint {
    type Err = ParseTimepointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "donor" => Ok(Timepoint::Donor),
            "pre" => Ok(Timepoint::PreFmt),
            _ => s
                .strip_prefix("post_")
                .and_then(|day| day.parse::<u16>().ok())
                .and_then(Timepoint::post)
                .ok_or_else(|| ParseTimepointError::UnknownLabel(s.to_string())),
        }
    }
}

impl From<Timepoint> for String {
    fn from(tp: Timepoint) -> Self {
        tp.to_string()
    }
}

impl TryFrom<String> for Timepoint {
    type Error = ParseTimepointError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Post-treatment day bins used by the per-disease report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PostBin {
    /// Days 1-30
    Early,
    /// Days 31-60
    Mid,
    /// Day 61 onwards
    Late,
}

impl PostBin {
    pub fn from_day(day: u16) -> Self {
        match day {
            0..=30 => PostBin::Early,
            31..=60 => PostBin::Mid,
            _ => PostBin::Late,
        }
    }

    /// Report column value (1, 2 or 3)
    pub fn index(self) -> u8 {
        match self {
            PostBin::Early => 1,
            PostBin::Mid => 2,
            PostBin::Late => 3,
        }
    }
}

/// Highest post-treatment bin present; `None` when there is no post timepoint
pub fn post_bin_of<'a, I>(timepoints: I) -> Option<PostBin>
where
    I: IntoIterator<Item = &'a Timepoint>,
{
    timepoints.into_iter().filter_map(|tp| tp.post_bin()).max()
}

/// Coarse category used by the timepoint subgraph filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimepointCategory {
    Donor,
    Pre,
    Post,
}

impl TimepointCategory {
    pub fn matches(self, tp: Timepoint) -> bool {
        match self {
            TimepointCategory::Donor => tp == Timepoint::Donor,
            TimepointCategory::Pre => tp == Timepoint::PreFmt,
            TimepointCategory::Post => matches!(tp, Timepoint::PostFmt(_)),
        }
    }
}

impl FromStr for TimepointCategory {
    type Err = ParseTimepointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "donor" => Ok(TimepointCategory::Donor),
            "pre" => Ok(TimepointCategory::Pre),
            "post" => Ok(TimepointCategory::Post),
            other => Err(ParseTimepointError::UnknownLabel(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn post(day: u16) -> Timepoint {
        Timepoint::post(day).unwrap()
    }

    #[test]
    fn test_donor_sorts_first() {
        assert!(Timepoint::Donor < Timepoint::PreFmt);
        assert!(Timepoint::Donor < post(730));
        assert!(Timepoint::PreFmt < post(1));
        assert!(post(14) < post(15));

        let ordered: Vec<_> = Timepoint::all().collect();
        let mut sorted = ordered.clone();
        sorted.sort();
        assert_eq!(ordered, sorted);
        assert_eq!(ordered.len(), 52);
    }

    #[test]
    fn test_codes_round_trip() {
        assert_eq!(Timepoint::Donor.code(), 1000);
        assert_eq!(Timepoint::PreFmt.code(), 0);
        assert_eq!(post(384).code(), 384);

        for tp in Timepoint::all() {
            assert_eq!(Timepoint::from_code(tp.code()), Some(tp));
        }
        assert_eq!(Timepoint::from_code(5), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Timepoint::Donor.to_string(), "donor");
        assert_eq!(Timepoint::PreFmt.to_string(), "pre");
        assert_eq!(post(7).to_string(), "post_007");
        assert_eq!(post(730).to_string(), "post_730");
        assert_eq!("post_014".parse::<Timepoint>(), Ok(post(14)));
        assert!("post_005".parse::<Timepoint>().is_err());
    }

    #[test]
    fn test_column_headers() {
        assert_eq!(Timepoint::from_column_header("Donor"), Ok(Timepoint::Donor));
        assert_eq!(Timepoint::from_column_header("PreFMT  "), Ok(Timepoint::PreFmt));
        assert_eq!(Timepoint::from_column_header("PostFMT_014"), Ok(post(14)));
        assert_eq!(Timepoint::from_column_header("PostFMT_14"), Ok(post(14)));
        assert_eq!(
            Timepoint::from_column_header("PostFMT_abc"),
            Err(ParseTimepointError::UnparseableDay("PostFMT_abc".to_string()))
        );
        assert_eq!(
            Timepoint::from_column_header("PostFMT_005"),
            Err(ParseTimepointError::UnsupportedDay(5))
        );
        assert!(matches!(
            Timepoint::from_column_header("Disease"),
            Err(ParseTimepointError::UnknownHeader(_))
        ));
    }

    #[test]
    fn test_label_classification() {
        assert!(Timepoint::Donor.is_donor());
        assert!(!Timepoint::Donor.is_pre());
        assert!(!Timepoint::Donor.is_post());

        assert!(Timepoint::PreFmt.is_pre());
        assert!(!Timepoint::PreFmt.is_post());

        for tp in Timepoint::all().skip(2) {
            assert!(tp.is_post());
            assert!(!tp.is_pre());
            assert!(!tp.is_donor());
        }
    }

    #[test]
    fn test_post_bins() {
        assert_eq!(post(30).post_bin(), Some(PostBin::Early));
        assert_eq!(post(31).post_bin(), Some(PostBin::Mid));
        assert_eq!(post(61).post_bin(), Some(PostBin::Late));
        assert_eq!(Timepoint::Donor.post_bin(), None);
        assert_eq!(Timepoint::PreFmt.post_bin(), None);

        // Highest bin wins
        let set: BTreeSet<_> = [Timepoint::PreFmt, post(7), post(90), post(42)].into();
        assert_eq!(post_bin_of(&set), Some(PostBin::Late));

        let donor_only: BTreeSet<_> = [Timepoint::Donor].into();
        assert_eq!(post_bin_of(&donor_only), None);
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&post(14)).unwrap();
        assert_eq!(json, "\"post_014\"");
        let back: Timepoint = serde_json::from_str("\"donor\"").unwrap();
        assert_eq!(back, Timepoint::Donor);
        assert!(serde_json::from_str::<Timepoint>("\"post_999\"").is_err());
    }

    #[test]
    fn test_category_matches() {
        assert!(TimepointCategory::Donor.matches(Timepoint::Donor));
        assert!(TimepointCategory::Pre.matches(Timepoint::PreFmt));
        assert!(TimepointCategory::Post.matches(post(1)));
        assert!(!TimepointCategory::Post.matches(Timepoint::Donor));
        assert_eq!("post".parse::<TimepointCategory>(), Ok(TimepointCategory::Post));
    }
}
