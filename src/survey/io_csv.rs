// Primitives for reading CSV files.

use crate::survey::{
    io_common::{simplify_file_name, text_cell},
    *,
};

pub fn read_csv_table(file: &UploadedFile) -> SurveyResult<ResponseTable> {
    let path = simplify_file_name(&file.name);
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file.content.as_slice());
    let mut records = rdr.into_records();

    // The first line only describes the export.
    let banner = records
        .next()
        .context(MissingHeaderRowSnafu { path: path.clone() })?
        .context(CsvLineParseSnafu {
            path: path.clone(),
            lineno: 1_usize,
        })?;
    debug!("read_csv_table: banner: {:?}", banner);
    let header = records
        .next()
        .context(MissingHeaderRowSnafu { path: path.clone() })?
        .context(CsvLineParseSnafu {
            path: path.clone(),
            lineno: 2_usize,
        })?;
    let headers: Vec<String> = header.iter().map(|s| s.to_string()).collect();
    debug!("read_csv_table: header: {:?}", headers);

    let mut rows: Vec<Vec<Option<String>>> = Vec::new();
    for (idx, line_r) in records.enumerate() {
        let lineno = idx + 3;
        let line = line_r.context(CsvLineParseSnafu {
            path: path.clone(),
            lineno,
        })?;
        debug!("read_csv_table: lineno: {:?} row: {:?}", lineno, line);
        rows.push(line.iter().map(text_cell).collect());
    }
    Ok(ResponseTable::new(headers, rows))
}
