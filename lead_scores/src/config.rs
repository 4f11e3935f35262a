// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;
use std::ops::Range;

/// The header of the column that identifies the group (the lead) of each response.
pub const DEFAULT_GROUP_COLUMN: &str = "Your lead name:";

/// The token looked for in every answer cell.
pub const YES_TOKEN: &str = "Yes";

/// A table of survey responses, as read from an export.
///
/// Each row is the submission of one respondent. Cells that were left empty
/// are `None`. Rows are allowed to be shorter than the header.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct ResponseTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl ResponseTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> ResponseTable {
        ResponseTable { headers, rows }
    }

    /// Removes the leading and trailing whitespaces of all the column names.
    pub fn strip_header_whitespace(&mut self) {
        for h in self.headers.iter_mut() {
            *h = h.trim().to_string();
        }
    }

    /// The position of the column with exactly this name, if any.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .and_then(|c| c.as_deref())
    }

    /// The distinct non-empty values of a column, in the order in which they first appear.
    pub fn distinct_values(&self, col: usize) -> Vec<String> {
        let mut res: Vec<String> = Vec::new();
        for row in self.rows.iter() {
            if let Some(Some(v)) = row.get(col) {
                if !v.is_empty() && !res.contains(v) {
                    res.push(v.clone());
                }
            }
        }
        res
    }
}

// ********* Configuration **********

/// A category of questions: a name and a contiguous range of column positions.
///
/// The positions are 0-based and absolute in the table (the first column is 0).
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Band {
    pub name: String,
    pub columns: Range<usize>,
}

impl Band {
    pub fn new(name: &str, columns: Range<usize>) -> Band {
        Band {
            name: name.to_string(),
            columns,
        }
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }
}

/// The mapping from question columns to categories.
///
/// Invariant: every band is non-empty, and no column belongs to two bands.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct BandLayout {
    bands: Vec<Band>,
}

impl BandLayout {
    /// Builds a layout, checking that the bands are valid.
    pub fn new(bands: Vec<Band>) -> Result<BandLayout, ScoreErrors> {
        if bands.is_empty() {
            return Err(ScoreErrors::InvalidLayout {
                reason: "no band defined".to_string(),
            });
        }
        for (idx, b) in bands.iter().enumerate() {
            if b.columns.is_empty() {
                return Err(ScoreErrors::InvalidLayout {
                    reason: format!("band {:?} has no column", b.name),
                });
            }
            for other in bands.iter().skip(idx + 1) {
                if other.name == b.name {
                    return Err(ScoreErrors::InvalidLayout {
                        reason: format!("band {:?} is defined twice", b.name),
                    });
                }
                if b.columns.start < other.columns.end && other.columns.start < b.columns.end {
                    return Err(ScoreErrors::InvalidLayout {
                        reason: format!("bands {:?} and {:?} overlap", b.name, other.name),
                    });
                }
            }
        }
        Ok(BandLayout { bands })
    }

    /// The four categories of the 360 questionnaire, questions 1 to 20,
    /// the questions starting at the second column.
    pub fn standard() -> BandLayout {
        BandLayout {
            bands: vec![
                Band::new("Resilience", 1..6),
                Band::new("Intelligence", 6..11),
                Band::new("Culture", 11..16),
                Band::new("Emotional Intelligence", 16..21),
            ],
        }
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// One past the last column used by the layout.
    pub fn column_span(&self) -> usize {
        self.bands.iter().map(|b| b.columns.end).max().unwrap_or(0)
    }
}

impl Default for BandLayout {
    fn default() -> Self {
        BandLayout::standard()
    }
}

// ******** Output data structures *********

/// The statistics of one band for one group.
#[derive(PartialEq, Debug, Clone)]
pub struct BandScore {
    pub name: String,
    /// Number of cells containing the token.
    pub hits: u64,
    /// Number of cells looked at: the width of the band times the number of responses.
    pub cells: u64,
    pub ratio: f64,
}

/// The ratio of 'Yes' answers for each band, in the order of the layout.
#[derive(PartialEq, Debug, Clone)]
pub struct ScoreMap {
    pub responses: u64,
    pub scores: Vec<BandScore>,
}

impl ScoreMap {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.scores.iter().find(|s| s.name == name).map(|s| s.ratio)
    }

    pub fn names(&self) -> Vec<String> {
        self.scores.iter().map(|s| s.name.clone()).collect()
    }

    pub fn ratios(&self) -> Vec<f64> {
        self.scores.iter().map(|s| s.ratio).collect()
    }
}

/// Errors that prevent the scores of a group from being computed.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ScoreErrors {
    /// No column with this name in the header.
    MissingColumn { name: String },
    /// A band refers to columns past the end of the header.
    BandOutOfRange {
        band: String,
        last_column: usize,
        num_columns: usize,
    },
    /// The group does not have any response.
    NoRowsForGroup { group: String },
    InvalidLayout { reason: String },
}

impl Error for ScoreErrors {}

impl Display for ScoreErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreErrors::MissingColumn { name } => {
                write!(f, "column {:?} not found in the header", name)
            }
            ScoreErrors::BandOutOfRange {
                band,
                last_column,
                num_columns,
            } => write!(
                f,
                "band {:?} uses column {} but the table only has {} columns",
                band,
                last_column + 1,
                num_columns
            ),
            ScoreErrors::NoRowsForGroup { group } => write!(f, "no data for group {:?}", group),
            ScoreErrors::InvalidLayout { reason } => write!(f, "invalid band layout: {}", reason),
        }
    }
}
