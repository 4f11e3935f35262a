/*!
Computes, for each group of respondents of a survey, the share of 'Yes' answers in
each category of questions, and draws the result as a radar chart.

```
use lead_scores::builder::Builder;
use lead_scores::*;

let table = Builder::new()
    .response("Alice", &["Yes", "No", "Yes", "Yes", "No"])
    .response("Alice", &["Yes", "Yes", "No", "No", "No"])
    .build();
let layout = BandLayout::new(vec![Band::new("Resilience", 1..6)])?;

let scores = calculate_average_scores(&table, DEFAULT_GROUP_COLUMN, "Alice", &layout)?;
assert_eq!(scores.get("Resilience"), Some(0.5));

let chart = plot_spider_chart(&scores, "Alice");
assert!(chart.to_svg().starts_with("<svg"));
# Ok::<(), ScoreErrors>(())
```

See the [manual] for the details of the input format.
*/

pub mod builder;
mod chart;
mod config;
pub mod manual;

use log::{debug, info};

pub use crate::chart::*;
pub use crate::config::*;

/// Computes the ratio of 'Yes' answers in each band for one group.
///
/// Arguments:
/// * `table` the responses
/// * `group_column` the name of the column that contains the group of each response
/// * `lead_name` the group to look at. Only the rows whose group is exactly this value are counted.
/// * `layout` the columns of each band
///
/// A cell counts as 'Yes' when it contains the substring `Yes` (case-sensitive).
/// Each cell counts at most once, so the ratios are between 0 and 1.
pub fn calculate_average_scores(
    table: &ResponseTable,
    group_column: &str,
    lead_name: &str,
    layout: &BandLayout,
) -> Result<ScoreMap, ScoreErrors> {
    let group_idx = table
        .column_index(group_column)
        .ok_or_else(|| ScoreErrors::MissingColumn {
            name: group_column.to_string(),
        })?;
    check_layout(table, layout)?;

    let lead_rows: Vec<&Vec<Option<String>>> = table
        .rows
        .iter()
        .filter(|row| matches!(row.get(group_idx), Some(Some(v)) if v == lead_name))
        .collect();
    debug!(
        "calculate_average_scores: lead_name: {:?} rows: {:?}",
        lead_name,
        lead_rows.len()
    );
    if lead_rows.is_empty() {
        return Err(ScoreErrors::NoRowsForGroup {
            group: lead_name.to_string(),
        });
    }

    let num_rows = lead_rows.len() as u64;
    let mut scores: Vec<BandScore> = Vec::new();
    for band in layout.bands() {
        let hits: u64 = lead_rows
            .iter()
            .map(|row| count_yes(row, band) as u64)
            .sum();
        let cells = band.width() as u64 * num_rows;
        let ratio = hits as f64 / cells as f64;
        debug!(
            "calculate_average_scores: lead_name: {:?} band: {:?} hits: {} cells: {}",
            lead_name, band.name, hits, cells
        );
        scores.push(BandScore {
            name: band.name.clone(),
            hits,
            cells,
            ratio,
        });
    }
    info!(
        "Scores for {:?} ({} responses): {:?}",
        lead_name,
        num_rows,
        scores
            .iter()
            .map(|s| (s.name.as_str(), s.ratio))
            .collect::<Vec<(&str, f64)>>()
    );
    Ok(ScoreMap {
        responses: num_rows,
        scores,
    })
}

// Number of cells of the band containing the token in this row.
// Missing cells (short rows) do not count.
fn count_yes(row: &[Option<String>], band: &Band) -> usize {
    band.columns
        .clone()
        .filter(|idx| matches!(row.get(*idx), Some(Some(s)) if s.contains(YES_TOKEN)))
        .count()
}

fn check_layout(table: &ResponseTable, layout: &BandLayout) -> Result<(), ScoreErrors> {
    let num_columns = table.headers.len();
    for band in layout.bands() {
        if band.columns.end > num_columns {
            return Err(ScoreErrors::BandOutOfRange {
                band: band.name.clone(),
                last_column: band.columns.end - 1,
                num_columns,
            });
        }
    }
    Ok(())
}
