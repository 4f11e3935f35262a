use calamine::{DataType, Reader, Xlsx};
use std::io::Cursor;

use crate::survey::{io_common::simplify_file_name, *};

pub fn read_excel_table(
    file: &UploadedFile,
    worksheet_name: Option<&str>,
) -> SurveyResult<ResponseTable> {
    let path = simplify_file_name(&file.name);
    let wrange = get_range(file, &path, worksheet_name)?;
    read_range(&wrange, &path)
}

// Blank rows are skipped, as the CSV reader does with empty lines.
fn read_range(wrange: &calamine::Range<DataType>, path: &str) -> SurveyResult<ResponseTable> {
    // The range starts at the first cell used. Empty leading columns are put back so that
    // the positions of the columns are the ones of the sheet.
    let (row_offset, col_offset) = wrange
        .start()
        .map(|(row, col)| (row as u64, col as usize))
        .unwrap_or((0, 0));
    debug!(
        "read_excel_table: start: {:?} end: {:?}",
        wrange.start(),
        wrange.end()
    );

    let mut iter = wrange
        .rows()
        .enumerate()
        .map(|(idx, row)| (row_offset + idx as u64 + 1, row))
        .filter(|(_, row)| !is_blank(row));
    let (_, banner) = iter.next().context(MissingHeaderRowSnafu { path })?;
    debug!("read_excel_table: banner: {:?}", banner);
    let (header_lineno, header) = iter.next().context(MissingHeaderRowSnafu { path })?;
    let mut headers: Vec<String> = vec![String::new(); col_offset];
    for elt in header.iter() {
        headers.push(read_cell(elt, header_lineno)?.unwrap_or_default());
    }
    debug!("read_excel_table: header: {:?}", headers);

    let mut rows: Vec<Vec<Option<String>>> = Vec::new();
    for (lineno, row) in iter {
        debug!("read_excel_table: lineno: {:?} row: {:?}", lineno, row);
        let mut cells: Vec<Option<String>> = vec![None; col_offset];
        for elt in row.iter() {
            cells.push(read_cell(elt, lineno)?);
        }
        rows.push(cells);
    }
    Ok(ResponseTable::new(headers, rows))
}

fn is_blank(row: &[DataType]) -> bool {
    row.iter().all(|cell| match cell {
        DataType::Empty => true,
        DataType::String(s) => s.is_empty(),
        _ => false,
    })
}

// The textual content of a cell. Numbers, booleans and dates are turned into text.
fn read_cell(cell: &DataType, lineno: u64) -> SurveyResult<Option<String>> {
    match cell {
        DataType::String(s) if s.is_empty() => Ok(None),
        DataType::String(s) => Ok(Some(s.clone())),
        DataType::Empty => Ok(None),
        DataType::Int(i) => Ok(Some(i.to_string())),
        DataType::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => {
            Ok(Some(format!("{}", *f as i64)))
        }
        DataType::Float(f) => Ok(Some(f.to_string())),
        DataType::Bool(b) => Ok(Some(b.to_string())),
        DataType::DateTime(f) => Ok(Some(f.to_string())),
        _ => Err(SurveyError::ExcelWrongCellType {
            lineno,
            content: format!("{:?}", cell),
        }),
    }
}

fn get_range(
    file: &UploadedFile,
    path: &str,
    worksheet_name: Option<&str>,
) -> SurveyResult<calamine::Range<DataType>> {
    debug!(
        "read_excel_table: path: {:?} worksheet: {:?}",
        path, worksheet_name
    );
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(file.content.clone())).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(name) = worksheet_name {
        workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { name, path })?
            .context(OpeningExcelSnafu { path })
    } else {
        let sheet_names = workbook.sheet_names().to_owned();
        if sheet_names.len() > 1 {
            warn!(
                "The workbook {} has several worksheets {:?}, using the first one",
                path, sheet_names
            );
        }
        workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })
    }
}
