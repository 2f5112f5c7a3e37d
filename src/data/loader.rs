use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use thiserror::Error;

use super::model::{Column, Table, TableCollection, Value};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Everything that can go wrong between raw bytes and a [`TableCollection`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file format \".{0}\" (expected .csv, .xlsx or .xls)")]
    UnsupportedFormat(String),

    #[error("could not decode text: neither valid UTF-8 nor EUC-KR")]
    Encoding,

    #[error("file contains no data")]
    Empty,

    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to parse workbook: {0}")]
    Spreadsheet(#[from] calamine::Error),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a tabular file from raw bytes.  Dispatch by the declared filename's
/// extension (case-insensitive); content is never sniffed.
///
/// Supported formats:
/// * `.csv`           – delimited text, UTF-8 with EUC-KR fallback
/// * `.xlsx` / `.xls` – spreadsheet workbook, all sheets in workbook order
pub fn load_bytes(bytes: &[u8], filename: &str) -> Result<TableCollection, LoadError> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(bytes),
        "xlsx" | "xls" => load_workbook(bytes),
        other => Err(LoadError::UnsupportedFormat(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Decode CSV bytes, UTF-8 first.  Korean-locale exports are commonly cp949;
/// retry the same bytes as EUC-KR before giving up.
fn decode_text(bytes: &[u8]) -> Result<String, LoadError> {
    if let Ok(s) = std::str::from_utf8(bytes) {
        return Ok(s.to_string());
    }
    let (decoded, _, had_errors) = encoding_rs::EUC_KR.decode(bytes);
    if had_errors {
        return Err(LoadError::Encoding);
    }
    Ok(decoded.into_owned())
}

fn load_csv(bytes: &[u8]) -> Result<TableCollection, LoadError> {
    let text = decode_text(bytes)?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.is_empty() {
        return Err(LoadError::Empty);
    }
    let names = mangle_names(headers);

    let mut cells: Vec<Vec<Value>> = vec![Vec::new(); names.len()];
    for result in reader.records() {
        let record = result?;
        // Short rows pad with nulls, long rows drop the overflow.
        for (i, col) in cells.iter_mut().enumerate() {
            col.push(parse_cell(record.get(i).unwrap_or("")));
        }
    }

    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, values)| Column::new(name, values))
        .collect();

    Ok(TableCollection::single(Table::new(columns)))
}

/// Guess a cell's type from its text, mirroring how the workbook path gets
/// typed cells for free: integer, float, bool, else text; empty → null.
fn parse_cell(s: &str) -> Value {
    let s = s.trim();
    if s.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Value::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return Value::Float(f);
    }
    if s == "true" || s == "false" {
        return Value::Bool(s == "true");
    }
    Value::Text(s.to_string())
}

// ---------------------------------------------------------------------------
// Workbook loader
// ---------------------------------------------------------------------------

/// Load every sheet of an xlsx/xls workbook, preserving workbook order.
/// A failure on any sheet fails the whole load; no partial collections.
fn load_workbook(bytes: &[u8]) -> Result<TableCollection, LoadError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

    let sheet_names = workbook.sheet_names().to_owned();
    if sheet_names.is_empty() {
        return Err(LoadError::Empty);
    }

    let mut sheets = Vec::with_capacity(sheet_names.len());
    for name in sheet_names {
        let range = workbook.worksheet_range(&name)?;
        sheets.push((name, table_from_rows(range.rows())));
    }

    Ok(TableCollection::from_sheets(sheets))
}

/// Assemble a [`Table`] from rectangular rows of workbook cells.  The first
/// row is the header; remaining rows become column cells.
fn table_from_rows<'a>(mut rows: impl Iterator<Item = &'a [Data]>) -> Table {
    let Some(header_row) = rows.next() else {
        return Table::new(Vec::new());
    };

    let names = mangle_names(
        header_row
            .iter()
            .map(|c| c.to_string().trim().to_string())
            .collect(),
    );

    let mut cells: Vec<Vec<Value>> = vec![Vec::new(); names.len()];
    for row in rows {
        for (i, col) in cells.iter_mut().enumerate() {
            col.push(row.get(i).map(cell_to_value).unwrap_or(Value::Null));
        }
    }

    Table::new(
        names
            .into_iter()
            .zip(cells)
            .map(|(name, values)| Column::new(name, values))
            .collect(),
    )
}

fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::String(s) => {
            if s.trim().is_empty() {
                Value::Null
            } else {
                Value::Text(s.clone())
            }
        }
        Data::Int(i) => Value::Integer(*i),
        Data::Float(f) => Value::Float(*f),
        Data::Bool(b) => Value::Bool(*b),
        // Serial date number; good enough for previews and statistics.
        Data::DateTime(dt) => Value::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::Text(s.clone()),
        Data::Error(_) => Value::Null,
    }
}

// ---------------------------------------------------------------------------
// Header mangling
// ---------------------------------------------------------------------------

/// Make header names unique and non-empty: blanks become `Unnamed: <idx>`,
/// duplicates get a `.1`, `.2`, … suffix.
fn mangle_names(raw: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for (i, name) in raw.into_iter().enumerate() {
        let base = if name.is_empty() {
            format!("Unnamed: {i}")
        } else {
            name
        };
        let mut candidate = base.clone();
        let mut suffix = 0usize;
        while out.contains(&candidate) {
            suffix += 1;
            candidate = format!("{base}.{suffix}");
        }
        out.push(candidate);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{ColumnKind, DEFAULT_SHEET};

    #[test]
    fn utf8_csv_loads_as_single_default_sheet() {
        let csv = "city,population,area\nSeoul,9411000,605.2\nBusan,3349000,770.1\n";
        let coll = load_bytes(csv.as_bytes(), "cities.csv").unwrap();

        assert_eq!(coll.len(), 1);
        assert_eq!(coll.sheet_names(), vec![DEFAULT_SHEET]);

        let table = coll.first();
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.n_cols(), 3);
        assert_eq!(table.columns()[0].kind, ColumnKind::Text);
        assert_eq!(table.columns()[1].kind, ColumnKind::Numeric);
        assert_eq!(table.columns()[1].values[0], Value::Integer(9_411_000));
        assert_eq!(table.columns()[2].values[1], Value::Float(770.1));
    }

    #[test]
    fn euc_kr_csv_falls_back() {
        let utf8 = "이름,점수\n철수,90\n영희,85\n";
        let (encoded, _, had_errors) = encoding_rs::EUC_KR.encode(utf8);
        assert!(!had_errors);
        // Not valid UTF-8, so this exercises the fallback path.
        assert!(std::str::from_utf8(&encoded).is_err());

        let coll = load_bytes(&encoded, "scores.csv").unwrap();
        let table = coll.first();
        assert_eq!(table.columns()[0].name, "이름");
        assert_eq!(table.columns()[0].values[0], Value::Text("철수".into()));
        assert_eq!(table.columns()[1].values[1], Value::Integer(85));
    }

    #[test]
    fn utf8_input_never_takes_the_fallback() {
        // A byte sequence that is valid UTF-8 must decode as UTF-8 even
        // though it would also decode (differently) under EUC-KR.
        let csv = "a,b\n1,café\n";
        let coll = load_bytes(csv.as_bytes(), "x.csv").unwrap();
        assert_eq!(
            coll.first().columns()[1].values[0],
            Value::Text("café".into())
        );
    }

    #[test]
    fn undecodable_bytes_fail_with_encoding_error() {
        // 0xFF is not a legal lead byte in UTF-8 or EUC-KR.
        let bytes = [b'a', b',', b'b', b'\n', 0xFF, 0xFF, b',', b'1', b'\n'];
        match load_bytes(&bytes, "junk.csv") {
            Err(LoadError::Encoding) => {}
            other => panic!("expected Encoding error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_extension_is_rejected() {
        match load_bytes(b"{}", "data.json") {
            Err(LoadError::UnsupportedFormat(ext)) => assert_eq!(ext, "json"),
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        let coll = load_bytes(b"a\n1\n", "DATA.CSV").unwrap();
        assert_eq!(coll.first().n_rows(), 1);
    }

    #[test]
    fn corrupt_workbook_fails_with_spreadsheet_error() {
        match load_bytes(b"this is not a zip archive", "book.xlsx") {
            Err(LoadError::Spreadsheet(_)) => {}
            other => panic!("expected Spreadsheet error, got {other:?}"),
        }
    }

    #[test]
    fn short_rows_pad_with_nulls() {
        let csv = "a,b,c\n1,2,3\n4,5\n";
        let table = load_bytes(csv.as_bytes(), "ragged.csv").unwrap().first().clone();
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.columns()[2].values[1], Value::Null);
    }

    #[test]
    fn headers_are_mangled_unique() {
        let names = mangle_names(vec![
            "a".to_string(),
            "".to_string(),
            "a".to_string(),
            "a".to_string(),
        ]);
        assert_eq!(names, vec!["a", "Unnamed: 1", "a.1", "a.2"]);
    }

    // -- In-memory xlsx fixture -------------------------------------------
    //
    // An xlsx file is a zip archive of XML parts.  Building a minimal one
    // with stored (uncompressed) entries keeps the fixture readable and
    // avoids checking in binary files.

    fn crc32(data: &[u8]) -> u32 {
        let mut crc = 0xFFFF_FFFFu32;
        for &b in data {
            crc ^= b as u32;
            for _ in 0..8 {
                crc = if crc & 1 != 0 {
                    (crc >> 1) ^ 0xEDB8_8320
                } else {
                    crc >> 1
                };
            }
        }
        !crc
    }

    /// Assemble a zip archive of stored entries: local headers, central
    /// directory, end-of-central-directory record.
    fn stored_zip(files: &[(&str, &str)]) -> Vec<u8> {
        let mut out = Vec::new();
        let mut central = Vec::new();
        for (name, content) in files {
            let data = content.as_bytes();
            let name_b = name.as_bytes();
            let offset = out.len() as u32;
            let crc = crc32(data);

            out.extend_from_slice(&[0x50, 0x4B, 0x03, 0x04]); // local header
            out.extend_from_slice(&20u16.to_le_bytes()); // version needed
            out.extend_from_slice(&0u16.to_le_bytes()); // flags
            out.extend_from_slice(&0u16.to_le_bytes()); // method: stored
            out.extend_from_slice(&0u32.to_le_bytes()); // mod time + date
            out.extend_from_slice(&crc.to_le_bytes());
            out.extend_from_slice(&(data.len() as u32).to_le_bytes());
            out.extend_from_slice(&(data.len() as u32).to_le_bytes());
            out.extend_from_slice(&(name_b.len() as u16).to_le_bytes());
            out.extend_from_slice(&0u16.to_le_bytes()); // extra len
            out.extend_from_slice(name_b);
            out.extend_from_slice(data);

            central.extend_from_slice(&[0x50, 0x4B, 0x01, 0x02]); // central entry
            central.extend_from_slice(&20u16.to_le_bytes()); // version made by
            central.extend_from_slice(&20u16.to_le_bytes()); // version needed
            central.extend_from_slice(&0u16.to_le_bytes()); // flags
            central.extend_from_slice(&0u16.to_le_bytes()); // method
            central.extend_from_slice(&0u32.to_le_bytes()); // mod time + date
            central.extend_from_slice(&crc.to_le_bytes());
            central.extend_from_slice(&(data.len() as u32).to_le_bytes());
            central.extend_from_slice(&(data.len() as u32).to_le_bytes());
            central.extend_from_slice(&(name_b.len() as u16).to_le_bytes());
            central.extend_from_slice(&0u16.to_le_bytes()); // extra len
            central.extend_from_slice(&0u16.to_le_bytes()); // comment len
            central.extend_from_slice(&0u16.to_le_bytes()); // disk number
            central.extend_from_slice(&0u16.to_le_bytes()); // internal attrs
            central.extend_from_slice(&0u32.to_le_bytes()); // external attrs
            central.extend_from_slice(&offset.to_le_bytes());
            central.extend_from_slice(name_b);
        }

        let cd_offset = out.len() as u32;
        out.extend_from_slice(&central);
        let cd_size = out.len() as u32 - cd_offset;
        let count = files.len() as u16;

        out.extend_from_slice(&[0x50, 0x4B, 0x05, 0x06]); // end of central dir
        out.extend_from_slice(&0u16.to_le_bytes()); // this disk
        out.extend_from_slice(&0u16.to_le_bytes()); // cd start disk
        out.extend_from_slice(&count.to_le_bytes());
        out.extend_from_slice(&count.to_le_bytes());
        out.extend_from_slice(&cd_size.to_le_bytes());
        out.extend_from_slice(&cd_offset.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes()); // comment len
        out
    }

    /// A two-sheet workbook: "Prices" (numeric data) then "Notes" (text),
    /// using inline strings so no sharedStrings part is needed.
    fn two_sheet_xlsx() -> Vec<u8> {
        let content_types = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
<Override PartName="/xl/worksheets/sheet2.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
</Types>"#;
        let workbook = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets>
<sheet name="Prices" sheetId="1" r:id="rId1"/>
<sheet name="Notes" sheetId="2" r:id="rId2"/>
</sheets>
</workbook>"#;
        let rels = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet2.xml"/>
</Relationships>"#;
        let sheet1 = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<sheetData>
<row r="1"><c r="A1" t="inlineStr"><is><t>price</t></is></c><c r="B1" t="inlineStr"><is><t>qty</t></is></c></row>
<row r="2"><c r="A2"><v>1.5</v></c><c r="B2"><v>2</v></c></row>
<row r="3"><c r="A3"><v>2.5</v></c><c r="B3"><v>4</v></c></row>
</sheetData>
</worksheet>"#;
        let sheet2 = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<sheetData>
<row r="1"><c r="A1" t="inlineStr"><is><t>note</t></is></c></row>
<row r="2"><c r="A2" t="inlineStr"><is><t>check totals</t></is></c></row>
</sheetData>
</worksheet>"#;

        stored_zip(&[
            ("[Content_Types].xml", content_types),
            ("xl/workbook.xml", workbook),
            ("xl/_rels/workbook.xml.rels", rels),
            ("xl/worksheets/sheet1.xml", sheet1),
            ("xl/worksheets/sheet2.xml", sheet2),
        ])
    }

    #[test]
    fn multi_sheet_workbook_loads_all_sheets_in_order() {
        let coll = load_bytes(&two_sheet_xlsx(), "book.xlsx").unwrap();

        assert_eq!(coll.len(), 2);
        assert_eq!(coll.sheet_names(), vec!["Prices", "Notes"]);

        let prices = coll.get("Prices").unwrap();
        assert_eq!(prices.n_rows(), 2);
        assert_eq!(prices.n_cols(), 2);
        assert_eq!(prices.columns()[0].name, "price");
        assert_eq!(prices.columns()[0].kind, ColumnKind::Numeric);
        assert_eq!(prices.columns()[0].values[0].as_f64(), Some(1.5));
        assert_eq!(prices.columns()[1].values[1].as_f64(), Some(4.0));

        let notes = coll.get("Notes").unwrap();
        assert_eq!(notes.n_cols(), 1);
        assert_eq!(notes.columns()[0].values[0], Value::Text("check totals".into()));
    }

    #[test]
    fn workbook_rows_assemble_with_header_mangling() {
        use calamine::Data;
        let header = vec![
            Data::String("id".into()),
            Data::Empty,
            Data::String("id".into()),
        ];
        let row1 = vec![Data::Int(1), Data::Float(2.5), Data::Bool(true)];
        let row2 = vec![Data::Int(2), Data::Empty, Data::Bool(false)];
        let rows: Vec<&[Data]> = vec![&header, &row1, &row2];

        let table = table_from_rows(rows.into_iter());
        let names: Vec<&str> = table.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "Unnamed: 1", "id.1"]);
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.columns()[0].kind, ColumnKind::Numeric);
        assert_eq!(table.columns()[1].values[1], Value::Null);
    }
}
