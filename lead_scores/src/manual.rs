/*!

This is the long-form manual for `lead_scores` and `leadradar`.

## Input formats

The following formats are supported, selected by the extension of the file name:
* `.xlsx` Excel workbooks
* `.csv` Comma Separated Values

Any other extension is rejected with the message
`Unsupported file type. Please upload an Excel or CSV file.` and nothing is drawn.

Both formats follow the layout of the survey exports (Qualtrics, Microsoft Forms):
the first row is a banner that is ignored, the second row contains the names of
the columns, and each following row is the answer of one respondent.

```text
Employee 360 Questionnaire,,,,
Your lead name: ,Q1,Q2,...,Q20
Alice,Yes,No,...,Yes
Bob,No,Yes,...,Yes
```

The spaces around the column names are removed before looking for the group column.
Empty cells are allowed and never count as a 'Yes'.

### `.xlsx`

The worksheet is the one given with `--excel-worksheet-name` (or `excelWorksheetName` in the
configuration). Without it, the only worksheet of the workbook is used, or the first one
if there are several. Numbers, booleans and dates are read as text.

### `.csv`

Lines may have different numbers of fields. Missing fields are empty cells.

## Scores

For each distinct value of the group column (`Your lead name:`), in the order in which
they first appear, the score of a band is the number of answer cells that contain `Yes`
divided by the number of answer cells of the band for this group:

```text
ratio = hits / (width of the band * number of responses of the group)
```

The match is a case-sensitive substring match: `Yessir` counts, `yes` does not.

The default layout uses the columns 2 to 21 of the table (questions 1 to 20):

| Band                   | Questions |
|------------------------|-----------|
| Resilience             | 1 - 5     |
| Intelligence           | 6 - 10    |
| Culture                | 11 - 15   |
| Emotional Intelligence | 16 - 20   |

The columns are selected by position only, the names of the questions do not matter.

## Configuration

`leadradar` comes with defaults matching the 360 questionnaire. A configuration file in JSON
may override them:

```text
{
  "outputSettings": {
    "reportTitle": "Employee 360 Questionnaire",
    "outputDirectory": "charts"
  },
  "surveySource": {
    "filePath": "responses.xlsx",
    "groupColumn": "Your lead name:",
    "excelWorksheetName": "Sheet1",
    "bands": [
      { "name": "Resilience", "firstColumnIndex": 2, "lastColumnIndex": 6 },
      { "name": "Intelligence", "firstColumnIndex": "G", "lastColumnIndex": "K" }
    ]
  }
}
```

All the fields are optional.
 - `filePath` is relative to the directory of the configuration file.
 - `firstColumnIndex` and `lastColumnIndex` (string or number) are 1-based and inclusive,
   as in a spreadsheet. Spreadsheet column letters (`A`, `AA`) are also accepted. Bands may
   not overlap.

The command line options take precedence over the configuration file.

## Output

Each group gives one radar chart (`<group>.svg`) in the output directory, and an `index.html`
page shows all the charts in order. The scores may also be written as a JSON summary
(`--summary`), which can be compared with a reference summary (`--reference`).

A group that fails (for example because none of its rows could be found) is reported
after the other charts, which are still drawn.

 */
