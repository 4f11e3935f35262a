use log::{debug, info, warn};

use lead_scores::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::survey::config_reader::*;
use crate::survey::io_common::simplify_file_name;

mod config_reader;
mod io_common;
mod io_csv;
mod io_xlsx;
mod report;

/// The message shown when the file is neither a workbook nor a CSV file.
pub const UNSUPPORTED_FILE_TYPE: &str = "Unsupported file type. Please upload an Excel or CSV file.";

#[derive(Debug, Snafu)]
pub enum SurveyError {
    #[snafu(display("Error opening file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening workbook {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The workbook {path} does not contain any worksheet"))]
    EmptyExcel { path: String },
    #[snafu(display("The workbook {path} does not contain the worksheet {name:?}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display("Could not understand the cell at line {lineno}: {content}"))]
    ExcelWrongCellType { lineno: u64, content: String },
    #[snafu(display("Error reading line {lineno} of the CSV file {path}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("The file {path} should start with a banner line followed by the header line"))]
    MissingHeaderRow { path: String },
    #[snafu(display("Column {name:?} not found in the header of {path}"))]
    MissingGroupColumn { name: String, path: String },
    #[snafu(display(
        "The questions need {needed} columns but the file {path} only has {found} columns"
    ))]
    NotEnoughColumns {
        needed: usize,
        found: usize,
        path: String,
    },
    #[snafu(display("Error opening JSON file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Could not understand the column index {value}"))]
    ParsingJsonNumber { value: String },
    #[snafu(display("Invalid band configuration"))]
    Layout { source: ScoreErrors },
    #[snafu(display("Error writing {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

type SurveyResult<T> = Result<T, SurveyError>;

/// A file handed over to the program: its name (used to select the parser) and its content.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub content: Vec<u8>,
}

impl UploadedFile {
    pub fn open(path: &str) -> SurveyResult<UploadedFile> {
        let content = fs::read(path).context(OpeningFileSnafu { path })?;
        debug!("UploadedFile::open: {:?} ({} bytes)", path, content.len());
        Ok(UploadedFile::from_bytes(path, content))
    }

    pub fn from_bytes(name: &str, content: Vec<u8>) -> UploadedFile {
        UploadedFile {
            name: name.to_string(),
            content,
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub enum LoadOutcome {
    Table(ResponseTable),
    /// The type of the file is not supported. Contains the message for the user.
    Unsupported(String),
}

/// The result of one group: its scores and chart, or the reason why they could not be computed.
#[derive(PartialEq, Debug, Clone)]
pub struct GroupOutcome {
    pub lead_name: String,
    pub result: Result<(ScoreMap, RadarChart), ScoreErrors>,
}

#[derive(PartialEq, Debug, Clone)]
pub enum RunOutcome {
    /// No file was provided, nothing was done.
    Idle,
    Unsupported(String),
    /// One entry per group, in the order in which the groups appear in the file.
    Rendered(Vec<GroupOutcome>),
}

impl RunOutcome {
    pub fn charts(&self) -> Vec<&RadarChart> {
        match self {
            RunOutcome::Rendered(outcomes) => outcomes
                .iter()
                .filter_map(|o| o.result.as_ref().ok().map(|(_, chart)| chart))
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Reads the responses from the file, choosing the parser from the name of the file.
///
/// The first line is a banner and is dropped, the second line contains the names of the columns.
pub fn load_file(file: &UploadedFile, source: &SurveySource) -> SurveyResult<LoadOutcome> {
    info!("Attempting to read survey file {:?}", file.name);
    let table = if file.name.ends_with(".xlsx") {
        io_xlsx::read_excel_table(file, source.excel_worksheet_name.as_deref())?
    } else if file.name.ends_with(".csv") {
        io_csv::read_csv_table(file)?
    } else {
        warn!("load_file: unsupported file type: {:?}", file.name);
        return Ok(LoadOutcome::Unsupported(UNSUPPORTED_FILE_TYPE.to_string()));
    };
    info!(
        "Read {} responses and {} columns from {:?}",
        table.rows.len(),
        table.headers.len(),
        file.name
    );
    debug!("load_file: headers: {:?}", table.headers);
    Ok(LoadOutcome::Table(table))
}

/// Computes the scores and the chart of every group found in the file.
///
/// The failure of one group does not prevent the other groups from being processed.
pub fn run_survey(file: Option<&UploadedFile>, config: &SurveyConfig) -> SurveyResult<RunOutcome> {
    let file = match file {
        Some(f) => f,
        None => {
            info!("No survey file provided");
            return Ok(RunOutcome::Idle);
        }
    };

    let mut table = match load_file(file, &config.survey_source)? {
        LoadOutcome::Table(t) => t,
        LoadOutcome::Unsupported(msg) => return Ok(RunOutcome::Unsupported(msg)),
    };
    table.strip_header_whitespace();

    let layout = config.survey_source.layout()?;
    let group_column = config.survey_source.group_column();
    let path = simplify_file_name(&file.name);
    let group_idx = table
        .column_index(&group_column)
        .context(MissingGroupColumnSnafu {
            name: group_column.clone(),
            path: path.clone(),
        })?;
    ensure!(
        layout.column_span() <= table.headers.len(),
        NotEnoughColumnsSnafu {
            needed: layout.column_span(),
            found: table.headers.len(),
            path,
        }
    );

    let lead_names = table.distinct_values(group_idx);
    let num_unassigned = table
        .rows
        .iter()
        .filter(|row| !matches!(row.get(group_idx), Some(Some(v)) if !v.is_empty()))
        .count();
    if num_unassigned > 0 {
        warn!(
            "{} responses without a value in {:?} are ignored",
            num_unassigned, group_column
        );
    }
    info!("Found {} leads: {:?}", lead_names.len(), lead_names);

    let mut outcomes: Vec<GroupOutcome> = Vec::new();
    for lead_name in lead_names {
        let result = calculate_average_scores(&table, &group_column, &lead_name, &layout).map(
            |scores| {
                let chart = plot_spider_chart(&scores, &lead_name);
                (scores, chart)
            },
        );
        if let Err(e) = &result {
            warn!("run_survey: lead {:?}: {}", lead_name, e);
        }
        outcomes.push(GroupOutcome { lead_name, result });
    }
    Ok(RunOutcome::Rendered(outcomes))
}

fn build_summary_js(config: &SurveyConfig, source_name: &str, outcomes: &[GroupOutcome]) -> JSValue {
    let mut results: Vec<JSValue> = Vec::new();
    let mut errors: Vec<JSValue> = Vec::new();
    for o in outcomes.iter() {
        match &o.result {
            Ok((scores, _)) => {
                let bands: Vec<JSValue> = scores
                    .scores
                    .iter()
                    .map(|s| {
                        json!({
                            "band": s.name,
                            "hits": s.hits.to_string(),
                            "cells": s.cells.to_string(),
                            "ratio": format!("{:.4}", s.ratio),
                        })
                    })
                    .collect();
                results.push(json!({
                    "lead": o.lead_name,
                    "responses": scores.responses.to_string(),
                    "scores": bands,
                }));
            }
            Err(e) => {
                errors.push(json!({"lead": o.lead_name, "error": e.to_string()}));
            }
        }
    }
    json!({
        "config": {
            "title": config.output_settings.report_title(),
            "groupColumn": config.survey_source.group_column(),
            "source": source_name,
        },
        "results": results,
        "errors": errors,
    })
}

fn print_outcomes(outcomes: &[GroupOutcome]) {
    for o in outcomes.iter() {
        if let Ok((scores, _)) = &o.result {
            let line: Vec<String> = scores
                .scores
                .iter()
                .map(|s| format!("{} {:.2}", s.name, s.ratio))
                .collect();
            println!("{} ({} responses): {}", o.lead_name, scores.responses, line.join(", "));
        }
    }
    for o in outcomes.iter() {
        if let Err(e) = &o.result {
            eprintln!("Could not draw the chart of {}: {}", o.lead_name, e);
        }
    }
}

fn check_reference(pretty_js_stats: &str, reference_path: &str) -> SurveyResult<()> {
    let summary_ref = read_summary(reference_path)?;
    info!("summary: {:?}", summary_ref);
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference string");
        print_diff(pretty_js_summary_ref.as_str(), pretty_js_stats, "\n");
        whatever!("Difference detected between calculated summary and reference summary")
    }
    Ok(())
}

/// Runs the whole program from the command line arguments.
pub fn run_report(args: &Args) -> SurveyResult<()> {
    let (mut config, config_dir) = match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            let dir = Path::new(config_path).parent().map(|p| p.to_path_buf());
            (config, dir)
        }
        None => (SurveyConfig::default(), None),
    };
    info!("config: {:?}", config);

    // The command line takes precedence over the configuration file.
    if let Some(name) = &args.group_column {
        config.survey_source.group_column = Some(name.clone());
    }
    if let Some(name) = &args.excel_worksheet_name {
        config.survey_source.excel_worksheet_name = Some(name.clone());
    }
    if let Some(out) = &args.out {
        config.output_settings.output_directory = Some(out.clone());
    }

    let input_path: Option<String> = match (&args.input, &config.survey_source.file_path) {
        (Some(p), _) => Some(p.clone()),
        (None, Some(p)) => {
            let full: PathBuf = match &config_dir {
                Some(dir) => dir.join(p),
                None => PathBuf::from(p),
            };
            Some(full.display().to_string())
        }
        (None, None) => None,
    };
    let upload = match &input_path {
        Some(p) => Some(UploadedFile::open(p)?),
        None => None,
    };

    let outcome = run_survey(upload.as_ref(), &config)?;
    debug!("run_report: {} charts", outcome.charts().len());
    let outcomes = match outcome {
        RunOutcome::Idle => {
            println!("No survey file provided. Use --input to select an Excel or CSV export.");
            return Ok(());
        }
        RunOutcome::Unsupported(msg) => {
            eprintln!("{}", msg);
            return Ok(());
        }
        RunOutcome::Rendered(outcomes) => outcomes,
    };

    let out_dir = config.output_settings.output_directory();
    let written = report::write_charts(
        Path::new(&out_dir),
        &config.output_settings.report_title(),
        &outcomes,
    )?;
    print_outcomes(&outcomes);
    info!("Wrote {} files to {:?}", written.len(), out_dir);

    let source_name = input_path
        .as_deref()
        .map(simplify_file_name)
        .unwrap_or_default();
    let result_js = build_summary_js(&config, &source_name, &outcomes);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;

    match args.summary.as_deref() {
        Some("stdout") => println!("{}", pretty_js_stats),
        Some(summary_path) => fs::write(summary_path, pretty_js_stats.as_bytes())
            .context(WritingOutputSnafu { path: summary_path })?,
        None => {}
    }

    // The reference summary, if provided for comparison
    if let Some(reference_path) = &args.reference {
        check_reference(&pretty_js_stats, reference_path)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn csv_file(name: &str, groups: &[(&str, [&str; 20])]) -> UploadedFile {
        let mut s = String::from("Employee 360 Questionnaire\n");
        s.push_str("  Your lead name:  ");
        for i in 1..=20 {
            s.push_str(&format!(",Q{}", i));
        }
        s.push('\n');
        for (lead, answers) in groups {
            s.push_str(lead);
            for a in answers.iter() {
                s.push(',');
                s.push_str(a);
            }
            s.push('\n');
        }
        UploadedFile::from_bytes(name, s.into_bytes())
    }

    fn rendered(outcome: RunOutcome) -> Vec<GroupOutcome> {
        match outcome {
            RunOutcome::Rendered(x) => x,
            x => panic!("unexpected outcome {:?}", x),
        }
    }

    const ALL_YES: [&str; 20] = ["Yes"; 20];
    const ALL_NO: [&str; 20] = ["No"; 20];

    #[test]
    fn no_file_is_idle() {
        init();
        let res = run_survey(None, &SurveyConfig::default()).unwrap();
        assert_eq!(res, RunOutcome::Idle);
        assert!(res.charts().is_empty());
    }

    #[test]
    fn unsupported_file_type() {
        init();
        let file = UploadedFile::from_bytes("report.docx", b"whatever".to_vec());
        let res = run_survey(Some(&file), &SurveyConfig::default()).unwrap();
        assert_eq!(res, RunOutcome::Unsupported(UNSUPPORTED_FILE_TYPE.to_string()));
        assert!(res.charts().is_empty());
    }

    #[test]
    fn charts_in_first_seen_order() {
        init();
        let file = csv_file(
            "responses.csv",
            &[("Bob", ALL_YES), ("Alice", ALL_NO), ("Bob", ALL_NO)],
        );
        let res = run_survey(Some(&file), &SurveyConfig::default()).unwrap();
        let titles: Vec<String> = res.charts().iter().map(|c| c.title.clone()).collect();
        assert_eq!(titles, vec!["Bob", "Alice"]);

        let outcomes = rendered(res);
        let (bob, _) = outcomes[0].result.as_ref().unwrap();
        assert_eq!(bob.responses, 2);
        assert_eq!(bob.ratios(), vec![0.5, 0.5, 0.5, 0.5]);
        let (alice, chart) = outcomes[1].result.as_ref().unwrap();
        assert_eq!(alice.ratios(), vec![0.0, 0.0, 0.0, 0.0]);
        assert_eq!(chart.axes.len(), 4);
        assert_eq!(chart.axes[3].label, "Emotional Intelligence");
        assert_eq!(chart.axes[3].text, "0.00");
    }

    #[test]
    fn resilience_example() {
        init();
        let mut a1 = ALL_NO;
        a1[..5].copy_from_slice(&["Yes", "No", "Yes", "Yes", "No"]);
        let mut a2 = ALL_NO;
        a2[..5].copy_from_slice(&["Yes", "Yes", "No", "No", "No"]);
        let file = csv_file("responses.csv", &[("Alice", a1), ("Alice", a2)]);
        let outcomes = rendered(run_survey(Some(&file), &SurveyConfig::default()).unwrap());
        assert_eq!(outcomes.len(), 1);
        let (scores, chart) = outcomes[0].result.as_ref().unwrap();
        assert_eq!(scores.get("Resilience"), Some(0.5));
        assert_eq!(chart.axes[0].text, "0.50");
    }

    #[test]
    fn rows_without_lead_are_skipped() {
        init();
        let file = csv_file("responses.csv", &[("", ALL_YES), ("Bob", ALL_NO)]);
        let outcomes = rendered(run_survey(Some(&file), &SurveyConfig::default()).unwrap());
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].lead_name, "Bob");
    }

    #[test]
    fn missing_group_column() {
        init();
        let file = csv_file("responses.csv", &[("Bob", ALL_YES)]);
        let mut config = SurveyConfig::default();
        config.survey_source.group_column = Some("Manager".to_string());
        let res = run_survey(Some(&file), &config);
        assert!(matches!(res, Err(SurveyError::MissingGroupColumn { .. })));
    }

    #[test]
    fn not_enough_columns() {
        init();
        let file = UploadedFile::from_bytes(
            "short.csv",
            b"banner\nYour lead name:,Q1,Q2\nBob,Yes,No\n".to_vec(),
        );
        let res = run_survey(Some(&file), &SurveyConfig::default());
        assert!(matches!(
            res,
            Err(SurveyError::NotEnoughColumns {
                needed: 21,
                found: 3,
                ..
            })
        ));
    }

    #[test]
    fn summary_lists_results_and_errors() {
        init();
        let file = csv_file("responses.csv", &[("Bob", ALL_YES)]);
        let mut outcomes = rendered(run_survey(Some(&file), &SurveyConfig::default()).unwrap());
        outcomes.push(GroupOutcome {
            lead_name: "Zoe".to_string(),
            result: Err(ScoreErrors::NoRowsForGroup {
                group: "Zoe".to_string(),
            }),
        });
        let js = build_summary_js(&SurveyConfig::default(), "responses.csv", &outcomes);
        assert_eq!(js["config"]["groupColumn"], "Your lead name:");
        assert_eq!(js["results"][0]["lead"], "Bob");
        assert_eq!(js["results"][0]["responses"], "1");
        assert_eq!(js["results"][0]["scores"][0]["band"], "Resilience");
        assert_eq!(js["results"][0]["scores"][0]["ratio"], "1.0000");
        assert_eq!(js["errors"][0]["lead"], "Zoe");
        assert_eq!(js["errors"][0]["error"], "no data for group \"Zoe\"");
    }

    #[test]
    fn report_from_the_command_line() {
        init();
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path();
        let file = csv_file("responses.csv", &[("Bob", ALL_YES), ("Alice", ALL_NO)]);
        let input = dir.join("responses.csv");
        fs::write(&input, &file.content).unwrap();
        let summary = dir.join("summary.json");
        let config = dir.join("config.json");
        fs::write(
            &config,
            r#"{"outputSettings": {"reportTitle": "Spring review"}, "surveySource": {"filePath": "responses.csv"}}"#,
        )
        .unwrap();

        let args = Args {
            config: Some(config.display().to_string()),
            out: Some(dir.join("charts").display().to_string()),
            summary: Some(summary.display().to_string()),
            ..Default::default()
        };
        run_report(&args).unwrap();
        assert!(dir.join("charts").join("Bob.svg").exists());
        assert!(dir.join("charts").join("Alice.svg").exists());
        let index = fs::read_to_string(dir.join("charts").join("index.html")).unwrap();
        assert!(index.contains("<h1>Spring review</h1>"));

        let js = read_summary(&summary.display().to_string()).unwrap();
        assert_eq!(js["config"]["source"], "responses.csv");
        assert_eq!(js["results"][1]["lead"], "Alice");

        // The same run checked against its own summary.
        let args_check = Args {
            reference: Some(summary.display().to_string()),
            summary: None,
            ..args.clone()
        };
        run_report(&args_check).unwrap();

        // A reference with other results is a failure.
        let other = dir.join("other.json");
        fs::write(&other, r#"{"results": []}"#).unwrap();
        let args_diff = Args {
            reference: Some(other.display().to_string()),
            summary: None,
            ..args
        };
        assert!(matches!(
            run_report(&args_diff),
            Err(SurveyError::Whatever { .. })
        ));
    }
}
