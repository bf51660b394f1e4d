use std::path::{Path, PathBuf};

use log::{error, info};

use crate::cli::Command;
use crate::layout::Layout;
use crate::report::{self, ReportError};
use crate::settings::{Settings, SettingsError};
use crate::spreadsheet::{self, InvoiceError};

/// Templates and generated documents live under this directory.
const DATA_DIR: &str = "data";

/// Per-document outcome of one run. Failures have already been logged; they
/// are kept here so the outcome of a partially completed run stays
/// inspectable.
pub struct Summary {
    pub invoice: Result<PathBuf, InvoiceError>,
    pub report: Result<PathBuf, ReportError>,
}

pub fn run(cmd: Command, settings_path: &Path) -> Result<(), SettingsError> {
    match cmd {
        Command::Generate => {
            let summary = generate(settings_path, &Layout::new(DATA_DIR))?;
            if summary.invoice.is_ok() && summary.report.is_ok() {
                info!("all documents generated");
            }
            Ok(())
        }
    }
}

/// Loads the settings, then runs both generators in order. A settings
/// failure aborts before any document is attempted. A failure in either
/// generator is logged and does not stop the other one.
fn generate(settings_path: &Path, layout: &Layout) -> Result<Summary, SettingsError> {
    let settings = Settings::load(settings_path)?;
    info!(
        "generating documents for {}, {}年{}月",
        settings.name, settings.year, settings.month
    );

    let invoice = spreadsheet::generate(&settings, layout);
    if let Err(error) = &invoice {
        error!("invoice generation failed: {}", error);
    }

    let report = report::generate(&settings, layout);
    if let Err(error) = &report {
        error!("work report generation failed: {}", error);
    }

    Ok(Summary { invoice, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SETTINGS_JSON: &str = r#"{
        "name": "Tanaka",
        "hourlyPay": 3000,
        "year": 2024,
        "month": 12,
        "tasks": [{"name": "設計", "hour": 10}]
    }"#;

    fn seed_settings(dir: &Path) -> PathBuf {
        let path = dir.join("settings.json");
        fs::write(&path, SETTINGS_JSON).unwrap();
        path
    }

    fn seed_invoice_template(layout: &Layout) {
        fs::create_dir_all(layout.template_dir()).unwrap();
        let mut book = umya_spreadsheet::new_file();
        let _ = book.new_sheet(crate::layout::INVOICE_LABEL);
        umya_spreadsheet::writer::xlsx::write(&book, layout.invoice_template()).unwrap();
    }

    fn seed_report_templates(layout: &Layout) {
        let skeleton = layout.report_skeleton();
        fs::create_dir_all(skeleton.join("word")).unwrap();
        fs::write(layout.report_template(), "<w:p>{{ name }} {{ hour_sum }}h</w:p>").unwrap();
        fs::write(skeleton.join("[Content_Types].xml"), "<Types/>").unwrap();
        fs::write(skeleton.join("word/document.xml"), "placeholder").unwrap();
    }

    /// Names in the data directory other than the seeded inputs.
    fn generated_outputs(layout: &Layout) -> Vec<String> {
        if !layout.data_dir().exists() {
            return Vec::new();
        }
        let mut names: Vec<String> = fs::read_dir(layout.data_dir())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name != "template")
            .collect();
        names.sort();
        names
    }

    #[test]
    fn missing_settings_aborts_before_any_output() {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::new(dir.path().join("data"));
        seed_invoice_template(&layout);
        seed_report_templates(&layout);

        let missing = dir.path().join("settings.json");
        assert!(matches!(
            generate(&missing, &layout),
            Err(SettingsError::NotFound { .. })
        ));
        assert_eq!(generated_outputs(&layout), Vec::<String>::new());
    }

    #[test]
    fn missing_invoice_template_does_not_block_the_report() {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::new(dir.path().join("data"));
        seed_report_templates(&layout);
        let settings_path = seed_settings(dir.path());

        let summary = generate(&settings_path, &layout).unwrap();
        assert!(matches!(
            summary.invoice,
            Err(InvoiceError::TemplateNotFound { .. })
        ));
        let report_path = summary.report.unwrap();
        assert!(report_path.exists());
    }

    #[test]
    fn missing_report_template_does_not_block_the_invoice() {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::new(dir.path().join("data"));
        seed_invoice_template(&layout);
        let settings_path = seed_settings(dir.path());

        let summary = generate(&settings_path, &layout).unwrap();
        assert!(matches!(
            summary.report,
            Err(ReportError::TemplateNotFound { .. })
        ));
        let invoice_path = summary.invoice.unwrap();
        assert!(invoice_path.exists());
    }

    #[test]
    fn both_documents_come_out_of_one_run() {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::new(dir.path().join("data"));
        seed_invoice_template(&layout);
        seed_report_templates(&layout);
        let settings_path = seed_settings(dir.path());

        let summary = generate(&settings_path, &layout).unwrap();
        assert!(summary.invoice.unwrap().exists());
        assert!(summary.report.unwrap().exists());
        assert_eq!(
            generated_outputs(&layout),
            vec![
                "作業報告書_Tanaka_2024年12月_暫定版.docx".to_string(),
                "請求書_Tanaka_2024年12月_暫定版.xlsx".to_string(),
            ]
        );
    }
}
