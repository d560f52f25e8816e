use std::fs::File;
use std::path::Path;
use log::{info, warn};
use rust_xlsxwriter::Workbook;
use crate::config::ColumnMapping;
use crate::detail_page::Contact;
use crate::error::{InputError, ScrapeError};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DistrictRecord {
    pub district: String,
    pub contact: Contact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnIndex {
    district: usize,
    // name, title, email, phone
    contact: [usize; 4],
}

/// The whole input sheet, including columns this tool never touches.
#[derive(Debug, Clone)]
pub struct DirectoryTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    columns: ColumnIndex,
}

fn find_column(headers: &[String], name: &str) -> Option<usize> {
    let name = name.trim();
    headers
        .iter()
        .position(|h| h.trim() == name)
        .or_else(|| headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name)))
}

impl DirectoryTable {
    /// Builds the table, appending any contact columns the sheet lacks.
    pub fn from_rows(mut headers: Vec<String>, mut rows: Vec<Vec<String>>, mapping: &ColumnMapping) -> Result<Self, InputError> {
        let district = find_column(&headers, &mapping.district).ok_or_else(|| InputError::MissingColumn {
            column: mapping.district.clone(),
            available: headers.clone(),
        })?;

        let mut contact = [0usize; 4];
        for (slot, name) in contact.iter_mut().zip(mapping.contact_columns()) {
            *slot = match find_column(&headers, name) {
                Some(idx) => idx,
                None => {
                    info!("Adding missing column '{}'", name);
                    headers.push(name.to_string());
                    headers.len() - 1
                }
            };
        }

        let width = headers.len();
        for row in rows.iter_mut() {
            if row.len() < width {
                row.resize(width, String::new());
            }
        }

        Ok(DirectoryTable {
            headers,
            rows,
            columns: ColumnIndex { district, contact },
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn record(&self, idx: usize) -> Option<DistrictRecord> {
        let row = self.rows.get(idx)?;
        let cell = |i: usize| {
            let value = row[i].trim();
            (!value.is_empty()).then(|| value.to_string())
        };
        let [name, title, email, phone] = self.columns.contact;
        Some(DistrictRecord {
            district: row[self.columns.district].trim().to_string(),
            contact: Contact {
                name: cell(name),
                title: cell(title),
                email: cell(email),
                phone: cell(phone),
            },
        })
    }

    /// Distinct non-blank district names in order of first appearance.
    pub fn district_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for row in &self.rows {
            let name = row[self.columns.district].trim();
            if !name.is_empty() && !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        names
    }

    /// Overwrites the contact cells of every row for `district`. Returns the
    /// number of rows written.
    pub fn apply_contact(&mut self, district: &str, contact: &Contact) -> usize {
        let district = district.trim();
        let cells = contact.cells();
        let mut written = 0;
        for row in self.rows.iter_mut() {
            if row[self.columns.district].trim() != district {
                continue;
            }
            for (idx, value) in self.columns.contact.iter().zip(cells.iter()) {
                row[*idx] = value.clone();
            }
            written += 1;
        }
        if written == 0 {
            warn!("No row found for district '{}'", district);
        }
        written
    }

    /// Writes XLSX when `path` ends in `.xlsx`, CSV otherwise.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ScrapeError> {
        let path = path.as_ref();
        let output_err = |message: String| ScrapeError::Output {
            path: path.to_path_buf(),
            message,
        };

        let is_excel = path.extension().map_or(false, |ext| ext.eq_ignore_ascii_case("xlsx"));

        if is_excel {
            self.save_xlsx(path).map_err(|e| output_err(e.to_string()))?;
        } else {
            self.save_csv(path).map_err(|e| output_err(e.to_string()))?;
        }
        info!("Saved {} rows to {:?}", self.rows.len(), path);
        Ok(())
    }

    fn save_csv(&self, path: &Path) -> Result<(), csv::Error> {
        let file = File::create(path)?;
        let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(file);
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn save_xlsx(&self, path: &Path) -> Result<(), rust_xlsxwriter::XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        for (row_idx, row) in std::iter::once(&self.headers).chain(self.rows.iter()).enumerate() {
            for (col_idx, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    worksheet.write_string(row_idx as u32, col_idx as u16, value)?;
                }
            }
        }
        workbook.save(path)?;
        Ok(())
    }
}
