pub use crate::config::*;

/// A builder for response tables.
///
/// This is mostly useful to assemble small tables in code, without going through a file.
/// The group is put in the first column, followed by the answers `Q1`, `Q2`, ...
///
/// ```
/// use lead_scores::builder::Builder;
///
/// let table = Builder::new()
///     .response("Bob", &["Yes", "No"])
///     .response("Alice", &["", "Yes"])
///     .build();
///
/// assert_eq!(table.headers, vec!["Your lead name:", "Q1", "Q2"]);
/// assert_eq!(table.cell(1, 1), None);
/// ```
pub struct Builder {
    _group_column: String,
    _responses: Vec<(String, Vec<String>)>,
}

impl Builder {
    pub fn new() -> Builder {
        Builder {
            _group_column: DEFAULT_GROUP_COLUMN.to_string(),
            _responses: Vec::new(),
        }
    }

    pub fn group_column(self, name: &str) -> Builder {
        Builder {
            _group_column: name.to_string(),
            _responses: self._responses,
        }
    }

    /// Adds the response of one respondent.
    ///
    /// Empty strings are recorded as empty cells.
    pub fn response(mut self, lead_name: &str, answers: &[&str]) -> Builder {
        self._responses.push((
            lead_name.to_string(),
            answers.iter().map(|s| s.to_string()).collect(),
        ));
        self
    }

    pub fn build(self) -> ResponseTable {
        let num_questions = self._responses.iter().map(|(_, a)| a.len()).max().unwrap_or(0);
        let mut headers = vec![self._group_column.clone()];
        headers.extend((1..=num_questions).map(|i| format!("Q{}", i)));
        let rows = self
            ._responses
            .into_iter()
            .map(|(lead_name, answers)| {
                std::iter::once(lead_name)
                    .chain(answers)
                    .map(|s| if s.is_empty() { None } else { Some(s) })
                    .collect()
            })
            .collect();
        ResponseTable::new(headers, rows)
    }
}

impl Default for Builder {
    fn default() -> Self {
        Builder::new()
    }
}
