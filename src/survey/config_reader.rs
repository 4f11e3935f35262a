use crate::survey::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

pub const DEFAULT_REPORT_TITLE: &str = "Employee 360 Questionnaire";
pub const DEFAULT_OUTPUT_DIRECTORY: &str = "charts";

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "reportTitle")]
    pub report_title: Option<String>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
}

impl OutputSettings {
    pub fn report_title(&self) -> String {
        self.report_title
            .clone()
            .unwrap_or_else(|| DEFAULT_REPORT_TITLE.to_string())
    }

    pub fn output_directory(&self) -> String {
        self.output_directory
            .clone()
            .unwrap_or_else(|| DEFAULT_OUTPUT_DIRECTORY.to_string())
    }
}

/// A category of questions, as written in the configuration.
/// The column indexes start at 1 and the last column is included.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct BandConfig {
    pub name: String,
    #[serde(rename = "firstColumnIndex")]
    _first_column_index: JSValue,
    #[serde(rename = "lastColumnIndex")]
    _last_column_index: JSValue,
}

impl BandConfig {
    /// The 0-based range of columns of this band.
    pub fn columns(&self) -> SurveyResult<std::ops::Range<usize>> {
        let first = read_js_int(&self._first_column_index)?;
        let last = read_js_int(&self._last_column_index)?;
        if first == 0 || last < first {
            whatever!(
                "Band {:?}: the columns {} to {} do not form a valid range",
                self.name,
                first,
                last
            )
        }
        Ok((first - 1)..last)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveySource {
    #[serde(rename = "filePath")]
    pub file_path: Option<String>,
    #[serde(rename = "groupColumn")]
    pub group_column: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    pub bands: Option<Vec<BandConfig>>,
}

impl SurveySource {
    pub fn group_column(&self) -> String {
        self.group_column
            .clone()
            .unwrap_or_else(|| DEFAULT_GROUP_COLUMN.to_string())
    }

    pub fn layout(&self) -> SurveyResult<BandLayout> {
        match &self.bands {
            None => Ok(BandLayout::standard()),
            Some(bands) => {
                let mut res: Vec<Band> = Vec::new();
                for b in bands.iter() {
                    res.push(Band::new(&b.name, b.columns()?));
                }
                BandLayout::new(res).context(LayoutSnafu {})
            }
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveyConfig {
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    #[serde(rename = "surveySource", default)]
    pub survey_source: SurveySource,
}

pub fn read_config(path: &str) -> SurveyResult<SurveyConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})
}

pub fn read_summary(path: &str) -> SurveyResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_summary: {:?}", js);
    Ok(js)
}

// Reads a 1-based column index: a number, a number in a string or the letters of a
// spreadsheet column (A is 1, Z is 26, AA is 27).
fn read_js_int(x: &JSValue) -> SurveyResult<usize> {
    match x {
        JSValue::Number(n) => n.as_u64().map(|x| x as usize).context(ParsingJsonNumberSnafu {
            value: n.to_string(),
        }),
        JSValue::String(s) if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic()) => {
            Ok(s.to_ascii_uppercase()
                .chars()
                .fold(0, |acc, c| acc * 26 + (c as usize - 'A' as usize + 1)))
        }
        JSValue::String(s) => s.trim().parse::<usize>().ok().context(ParsingJsonNumberSnafu {
            value: s.clone(),
        }),
        _ => None.context(ParsingJsonNumberSnafu {
            value: x.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_has_defaults() {
        let config: SurveyConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SurveyConfig::default());
        assert_eq!(config.output_settings.report_title(), DEFAULT_REPORT_TITLE);
        assert_eq!(config.output_settings.output_directory(), "charts");
        assert_eq!(config.survey_source.group_column(), "Your lead name:");
        assert_eq!(config.survey_source.layout().unwrap(), BandLayout::standard());
    }

    #[test]
    fn full_config() {
        let js = r#"{
            "outputSettings": {"reportTitle": "Team review", "outputDirectory": "out"},
            "surveySource": {
                "filePath": "responses.xlsx",
                "groupColumn": "Manager",
                "excelWorksheetName": "Form1",
                "bands": [
                    {"name": "Resilience", "firstColumnIndex": 3, "lastColumnIndex": "7"},
                    {"name": "Culture", "firstColumnIndex": "H", "lastColumnIndex": "l"}
                ]
            }
        }"#;
        let config: SurveyConfig = serde_json::from_str(js).unwrap();
        assert_eq!(config.output_settings.report_title(), "Team review");
        assert_eq!(config.survey_source.group_column(), "Manager");
        assert_eq!(
            config.survey_source.excel_worksheet_name.as_deref(),
            Some("Form1")
        );
        let layout = config.survey_source.layout().unwrap();
        assert_eq!(
            layout.bands(),
            &[Band::new("Resilience", 2..7), Band::new("Culture", 7..12)]
        );
    }

    #[test]
    fn column_letters() {
        assert_eq!(read_js_int(&JSValue::String("A".to_string())).unwrap(), 1);
        assert_eq!(read_js_int(&JSValue::String("z".to_string())).unwrap(), 26);
        assert_eq!(read_js_int(&JSValue::String("AA".to_string())).unwrap(), 27);
        assert_eq!(read_js_int(&serde_json::json!(12)).unwrap(), 12);
        assert!(read_js_int(&serde_json::json!(-1)).is_err());
        assert!(read_js_int(&serde_json::json!("1B")).is_err());
    }

    #[test]
    fn band_past_column_z() {
        let js = r#"{"surveySource": {"bands": [
            {"name": "Late", "firstColumnIndex": "Z", "lastColumnIndex": "AD"}
        ]}}"#;
        let config: SurveyConfig = serde_json::from_str(js).unwrap();
        let layout = config.survey_source.layout().unwrap();
        assert_eq!(layout.bands(), &[Band::new("Late", 25..30)]);
    }

    #[test]
    fn invalid_bands() {
        let js = r#"{"surveySource": {"bands": [
            {"name": "A", "firstColumnIndex": 2, "lastColumnIndex": 6},
            {"name": "B", "firstColumnIndex": 6, "lastColumnIndex": 10}
        ]}}"#;
        let config: SurveyConfig = serde_json::from_str(js).unwrap();
        assert!(matches!(
            config.survey_source.layout(),
            Err(SurveyError::Layout { .. })
        ));

        let js = r#"{"surveySource": {"bands": [
            {"name": "A", "firstColumnIndex": 6, "lastColumnIndex": 2}
        ]}}"#;
        let config: SurveyConfig = serde_json::from_str(js).unwrap();
        assert!(config.survey_source.layout().is_err());
    }
}
