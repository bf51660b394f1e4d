use std::path::{Path, PathBuf};

use crate::settings::Settings;

/// Invoice document label, also the template file stem and sheet name.
pub const INVOICE_LABEL: &str = "請求書";
/// Work report document label.
pub const REPORT_LABEL: &str = "作業報告書";
/// Suffix marking every generated file as a draft.
pub const DRAFT_MARKER: &str = "暫定版";

/// Fixed path scheme under the data directory.
///
/// Templates live in `<data>/template/`, generated documents land directly in
/// `<data>/`. All methods are pure path construction; nothing here touches
/// the filesystem.
#[derive(Debug, Clone)]
pub struct Layout {
    data_dir: PathBuf,
}

impl Layout {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn template_dir(&self) -> PathBuf {
        self.data_dir.join("template")
    }

    /// The xlsx invoice template.
    pub fn invoice_template(&self) -> PathBuf {
        self.template_dir().join(format!("{}.xlsx", INVOICE_LABEL))
    }

    /// The report body template, Tera markup producing WordprocessingML.
    pub fn report_template(&self) -> PathBuf {
        self.template_dir().join("document.xml")
    }

    /// The unpacked docx skeleton tree that gets re-archived.
    pub fn report_skeleton(&self) -> PathBuf {
        self.template_dir().join("docx")
    }

    pub fn invoice_output(&self, settings: &Settings) -> PathBuf {
        self.data_dir.join(draft_name(INVOICE_LABEL, settings, "xlsx"))
    }

    pub fn report_output(&self, settings: &Settings) -> PathBuf {
        self.data_dir.join(draft_name(REPORT_LABEL, settings, "docx"))
    }
}

fn draft_name(label: &str, settings: &Settings, extension: &str) -> String {
    format!(
        "{}_{}_{}年{}月_{}.{}",
        label, settings.name, settings.year, settings.month, DRAFT_MARKER, extension
    )
}
