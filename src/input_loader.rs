use std::fs::File;
use std::path::Path;
use log::{info, error};
use calamine::{Reader, open_workbook_auto};
use crate::config::ColumnMapping;
use crate::error::InputError;
use crate::table::DirectoryTable;

pub fn is_spreadsheet(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| matches!(ext.to_ascii_lowercase().as_str(), "xlsx" | "xlsm" | "xls" | "ods"))
}

/// Reads the district sheet: Excel/ODS by extension, CSV otherwise. The first
/// row is the header.
pub fn load_table<P: AsRef<Path>>(filename: P, mapping: &ColumnMapping) -> Result<DirectoryTable, InputError> {
    let path = filename.as_ref();

    if !path.exists() {
        error!("Input file {:?} does not exist.", path);
        return Err(InputError::NotFound(path.to_path_buf()));
    }

    let mut rows = if is_spreadsheet(path) {
        load_excel(path)?
    } else {
        load_csv(path)?
    };

    if rows.is_empty() {
        return Err(InputError::MissingHeader(path.to_path_buf()));
    }
    let headers = rows.remove(0);
    let table = DirectoryTable::from_rows(headers, rows, mapping)?;

    info!("Loaded {} rows from {:?}", table.len(), path);
    Ok(table)
}

fn load_csv(path: &Path) -> Result<Vec<Vec<String>>, InputError> {
    let unreadable = |message: String| InputError::Unreadable {
        path: path.to_path_buf(),
        message,
    };

    let file = File::open(path).map_err(|e| unreadable(e.to_string()))?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| unreadable(format!("Error parsing CSV record: {}", e)))?;
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }
    Ok(rows)
}

fn load_excel(path: &Path) -> Result<Vec<Vec<String>>, InputError> {
    let unreadable = |message: String| InputError::Unreadable {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| unreadable(format!("Could not open Excel file: {}", e)))?;

    let worksheets = workbook.worksheets();
    let Some((name, range)) = worksheets.first() else {
        return Err(unreadable("Workbook has no worksheets".to_string()));
    };
    info!("Reading worksheet '{}'", name);

    Ok(range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string().trim().to_string()).collect())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_csv_with_extra_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("districts.csv");
        let mut f = File::create(&path).unwrap();
        writeln!(f, "District Name,Other Data").unwrap();
        writeln!(f, " Los Angeles Unified ,Info1").unwrap();
        writeln!(f, "\"Manteca Unified, CA\",Info3").unwrap();
        drop(f);

        let table = load_table(&path, &ColumnMapping::default()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.district_names(), vec!["Los Angeles Unified".to_string(), "Manteca Unified, CA".to_string()]);
        assert_eq!(table.headers().len(), 6);
    }

    #[test]
    fn header_only_csv_is_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, "District Name\n").unwrap();

        let table = load_table(&path, &ColumnMapping::default()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn missing_file_and_empty_file_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.csv");
        assert!(matches!(load_table(&missing, &ColumnMapping::default()), Err(InputError::NotFound(_))));

        let blank = dir.path().join("blank.csv");
        std::fs::write(&blank, "").unwrap();
        assert!(matches!(load_table(&blank, &ColumnMapping::default()), Err(InputError::MissingHeader(_))));
    }

    #[test]
    fn wrong_column_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("districts.csv");
        std::fs::write(&path, "District,Contact\nManteca Unified,John Doe\n").unwrap();

        let err = load_table(&path, &ColumnMapping::default()).unwrap_err();
        assert!(matches!(err, InputError::MissingColumn { .. }));
    }

    #[test]
    fn loads_xlsx_written_by_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("districts.xlsx");
        let source = DirectoryTable::from_rows(
            vec!["District Name".to_string(), "Other Data".to_string()],
            vec![vec!["Lodi Unified".to_string(), "Info".to_string()]],
            &ColumnMapping::default(),
        )
        .unwrap();
        source.save(&path).unwrap();

        let table = load_table(&path, &ColumnMapping::default()).unwrap();
        assert_eq!(table.district_names(), vec!["Lodi Unified".to_string()]);
        assert_eq!(table.headers(), source.headers());
    }
}
