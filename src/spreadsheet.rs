use std::path::PathBuf;

use chrono::NaiveDate;
use log::{debug, info};
use thiserror::Error;
use umya_spreadsheet::{reader, writer, Spreadsheet, XlsxError};

use crate::calendar;
use crate::layout::{Layout, INVOICE_LABEL};
use crate::settings::Settings;

/// Sheet inside the invoice template that receives the writes.
const SHEET_NAME: &str = INVOICE_LABEL;

/// Both header cells show the end of the billing period: the issue date in
/// the top corner and the payment line further down.
const HEADER_DATE_CELLS: [&str; 2] = ["O2", "D10"];

/// Row of the first task line; task i lands on `FIRST_TASK_ROW + i`.
const FIRST_TASK_ROW: u32 = 20;

/// Opens the invoice template, fills in the billing period and one row per
/// task, and saves the result as a draft named after the recipient and month.
pub fn generate(settings: &Settings, layout: &Layout) -> Result<PathBuf, InvoiceError> {
    let template = layout.invoice_template();
    if !template.exists() {
        return Err(InvoiceError::TemplateNotFound { path: template });
    }
    let mut book =
        reader::xlsx::read(&template).map_err(|source| InvoiceError::TemplateCorrupt { source })?;

    let period_end = calendar::end_of_month(settings.year, settings.month).ok_or(
        InvoiceError::InvalidPeriod {
            year: settings.year,
            month: settings.month,
        },
    )?;

    let writes = cell_writes(settings, period_end);
    apply(&mut book, &writes)?;
    debug!("applied {} cell writes to sheet {}", writes.len(), SHEET_NAME);

    let refreshed = refresh_linked_values(&mut book);
    if refreshed > 0 {
        debug!("cleared cached results of {} formula cells", refreshed);
    }

    let out_path = layout.invoice_output(settings);
    writer::xlsx::write(&book, &out_path).map_err(|source| InvoiceError::Save { source })?;
    info!("invoice draft written to {}", out_path.display());
    Ok(out_path)
}

#[derive(Debug, PartialEq, Clone)]
enum Payload {
    Text(String),
    Number(f64),
}

/// One pending cell assignment, produced by [`cell_writes`] and applied to
/// the workbook in a separate step.
#[derive(Debug, PartialEq, Clone)]
struct CellWrite {
    coordinate: String,
    payload: Payload,
}

impl CellWrite {
    fn text(coordinate: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            coordinate: coordinate.into(),
            payload: Payload::Text(text.into()),
        }
    }

    fn number(coordinate: impl Into<String>, number: f64) -> Self {
        Self {
            coordinate: coordinate.into(),
            payload: Payload::Number(number),
        }
    }
}

/// Maps the settings onto cell coordinates: the two header dates, then a
/// 4-column row per task starting at [`FIRST_TASK_ROW`] with no gaps.
fn cell_writes(settings: &Settings, period_end: NaiveDate) -> Vec<CellWrite> {
    let date = period_end.format("%Y年%-m月%-d日").to_string();
    let mut writes: Vec<CellWrite> = HEADER_DATE_CELLS
        .iter()
        .map(|cell| CellWrite::text(*cell, date.clone()))
        .collect();

    for (index, task) in settings.tasks.iter().enumerate() {
        let row = FIRST_TASK_ROW + index as u32;
        let amount = i64::from(task.hour) * i64::from(settings.hourly_pay);
        writes.push(CellWrite::number(format!("A{}", row), (index + 1) as f64));
        writes.push(CellWrite::text(
            format!("B{}", row),
            format!("{} ({}h)", task.name, task.hour),
        ));
        writes.push(CellWrite::number(format!("J{}", row), 1.0));
        writes.push(CellWrite::number(format!("L{}", row), amount as f64));
    }
    writes
}

fn apply(book: &mut Spreadsheet, writes: &[CellWrite]) -> Result<(), InvoiceError> {
    let sheet = book
        .get_sheet_by_name_mut(SHEET_NAME)
        .ok_or(InvoiceError::SheetNotFound { name: SHEET_NAME })?;
    for write in writes {
        let cell = sheet.get_cell_mut(write.coordinate.as_str());
        match &write.payload {
            Payload::Text(text) => {
                cell.set_value(text.as_str());
            }
            Payload::Number(number) => {
                cell.set_value_number(*number);
            }
        }
    }
    Ok(())
}

/// Clears the cached result of every formula cell, keeping the formula, so
/// dependent totals recompute when the workbook is next opened. The library
/// has no formula engine; this is the closest equivalent to a recalculation.
fn refresh_linked_values(book: &mut Spreadsheet) -> usize {
    let mut refreshed = 0;
    for sheet in book.get_sheet_collection_mut().iter_mut() {
        for cell in sheet.get_cell_collection_mut() {
            let formula = cell.get_formula().to_string();
            if formula.is_empty() {
                continue;
            }
            cell.get_cell_value_mut().set_value_string("");
            cell.set_formula(formula.clone());
            eprintln!("DEBUG after set: coord={:?} formula={:?} is_formula={:?}", cell.get_coordinate().get_coordinate(), cell.get_formula(), cell.is_formula());
            refreshed += 1;
        }
    }
    refreshed
}

#[derive(Debug, Error)]
pub enum InvoiceError {
    #[error("invoice template not found: {}", .path.display())]
    TemplateNotFound { path: PathBuf },

    #[error("Error opening invoice template: {source}")]
    TemplateCorrupt { source: XlsxError },

    #[error("no sheet named '{name}' in the invoice template")]
    SheetNotFound { name: &'static str },

    #[error("{year}-{month} does not name a calendar month")]
    InvalidPeriod { year: i32, month: u32 },

    #[error("Error saving invoice: {source}")]
    Save { source: XlsxError },
}
