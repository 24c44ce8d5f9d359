use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, XlsxError};

use crate::domain::lead::LeadRecord;

pub const SHEET_NAME: &str = "Leads";
pub const HEADERS: [&str; 5] = ["URL", "Type", "Is Store", "Products", "Reasoning"];
const COLUMN_WIDTHS: [f64; 5] = [40.0, 20.0, 15.0, 30.0, 50.0];
const HEADER_COLOR: u32 = 0x4F81BD;
/// Excel's hard limit, the header row included.
const MAX_SHEET_ROWS: usize = 1_048_576;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to build report: {0}")]
    Xlsx(#[from] XlsxError),
    #[error("{0} rows do not fit in a worksheet")]
    TooManyRows(usize),
}

pub trait ReportExporter {
    fn export(&self, records: &[LeadRecord]) -> Result<PathBuf, ExportError>;
}

pub struct XlsxReportExporter {
    path: PathBuf,
}

impl XlsxReportExporter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        XlsxReportExporter {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ReportExporter for XlsxReportExporter {
    fn export(&self, records: &[LeadRecord]) -> Result<PathBuf, ExportError> {
        let last_row = last_data_row(records.len())?;

        let header_fmt = Format::new()
            .set_bold()
            .set_background_color(Color::RGB(HEADER_COLOR))
            .set_font_color(Color::White)
            .set_border(FormatBorder::Thin)
            .set_align(FormatAlign::VerticalCenter);
        let body_fmt = Format::new()
            .set_text_wrap()
            .set_align(FormatAlign::Top)
            .set_border(FormatBorder::Thin);

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        for (col, (header, width)) in HEADERS.iter().zip(COLUMN_WIDTHS).enumerate() {
            let col = col as u16;
            worksheet.write_string_with_format(0, col, *header, &header_fmt)?;
            worksheet.set_column_width(col, width)?;
        }

        for (row, record) in (1u32..).zip(records) {
            let cells = [
                record.url.as_str(),
                record.category.label(),
                record.is_store.label(),
                record.products.as_str(),
                record.reasoning.as_str(),
            ];
            for (col, cell) in cells.into_iter().enumerate() {
                worksheet.write_string_with_format(row, col as u16, cell, &body_fmt)?;
            }
        }

        worksheet.autofilter(0, 0, last_row, (HEADERS.len() - 1) as u16)?;

        workbook.save(&self.path)?;
        log::info!("Saved {} leads to {}", records.len(), self.path.display());

        Ok(self.path.clone())
    }
}

fn last_data_row(record_count: usize) -> Result<u32, ExportError> {
    match record_count < MAX_SHEET_ROWS {
        true => Ok(record_count as u32),
        false => Err(ExportError::TooManyRows(record_count)),
    }
}
