use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use tempfile::TempDir;
use tera::{Context, Tera};
use thiserror::Error;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::layout::Layout;
use crate::settings::Settings;

/// Where the rendered body lands inside the docx tree.
const BODY_ENTRY: &str = "word/document.xml";

/// Renders the report body and re-archives the docx skeleton around it.
///
/// The skeleton is copied into a scratch directory first and the body is
/// written into the copy, so the template tree on disk never carries output
/// from a previous run.
pub fn generate(settings: &Settings, layout: &Layout) -> Result<PathBuf, ReportError> {
    let template_path = layout.report_template();
    if !template_path.exists() {
        return Err(ReportError::TemplateNotFound {
            path: template_path,
        });
    }
    let skeleton = layout.report_skeleton();
    if !skeleton.exists() {
        return Err(ReportError::TemplateNotFound { path: skeleton });
    }

    let template = fs::read_to_string(&template_path)?;
    let body = render_body(&template, settings)?;

    let staging = TempDir::new()?;
    fs_extra::dir::copy(
        &skeleton,
        staging.path(),
        &fs_extra::dir::CopyOptions {
            overwrite: true,
            content_only: true,
            ..Default::default()
        },
    )?;
    let body_path = staging.path().join(BODY_ENTRY);
    if let Some(parent) = body_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&body_path, body)?;
    debug!("staged report files in {}", staging.path().display());

    let out_path = layout.report_output(settings);
    write_archive(staging.path(), &out_path)?;
    info!("work report draft written to {}", out_path.display());
    Ok(out_path)
}

/// Substitutes the settings fields and the hour total into the body template.
fn render_body(template: &str, settings: &Settings) -> Result<String, ReportError> {
    let mut context = Context::from_serialize(settings)?;
    context.insert("hour_sum", &settings.hour_sum());
    Ok(Tera::one_off(template, &context, true)?)
}

/// Streams every regular file under `root` into a zip entry named by its
/// forward-slash relative path. Any failure aborts immediately; a partially
/// written archive may remain at `out_path`.
fn write_archive(root: &Path, out_path: &Path) -> Result<(), ReportError> {
    let file = File::create(out_path)?;
    let mut archive = ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    for entry in WalkDir::new(root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry_name(root, entry.path()).ok_or_else(|| ReportError::EntryName {
            path: entry.path().to_path_buf(),
        })?;
        archive.start_file(name, options)?;
        let mut source = File::open(entry.path())?;
        io::copy(&mut source, &mut archive)?;
    }
    archive.finish()?;
    Ok(())
}

fn entry_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<&str> = relative
        .components()
        .map(|component| component.as_os_str().to_str())
        .collect::<Option<_>>()?;
    Some(parts.join("/"))
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("report template not found: {}", .path.display())]
    TemplateNotFound { path: PathBuf },

    #[error("Error rendering report body: {source}")]
    Render {
        #[from]
        source: tera::Error,
    },

    #[error("Error staging report files: {source}")]
    Copy {
        #[from]
        source: fs_extra::error::Error,
    },

    #[error("Error walking report files: {source}")]
    Walk {
        #[from]
        source: walkdir::Error,
    },

    #[error("Error writing report archive: {source}")]
    Archive {
        #[from]
        source: zip::result::ZipError,
    },

    #[error("no archive entry name for {}", .path.display())]
    EntryName { path: PathBuf },

    #[error("IO Error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}
