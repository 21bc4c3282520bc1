//! Turns a spreadsheet-exported exam index (`TOPIC,BK#,PG#,COMMENTS`) into a
//! two-column Word document laid out for quick lookup on paper.

pub mod docx;
pub mod error;
pub mod index;
pub mod layout;
pub mod loader;
pub mod logging;

pub use error::{Error, InputError, OutputError, Result};
pub use index::{IndexRow, Section};
pub use layout::{Layout, Orientation};

use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub input: PathBuf,
    /// Directory the .docx is written to.
    pub out_dir: PathBuf,
    pub overwrite: bool,
    /// Skip sorting and keep the CSV's row order.
    pub keep_order: bool,
    pub layout: Layout,
}

impl ConvertOptions {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            out_dir: PathBuf::from("."),
            overwrite: false,
            keep_order: false,
            layout: Layout::default(),
        }
    }
}

/// `<out_dir>/<input stem>.docx`
pub fn output_path_for(input: &Path, out_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "index".into());
    let mut name = stem;
    name.push(".docx");
    out_dir.join(name)
}

/// Loads, orders, groups and writes. Returns the path of the new document.
pub fn convert(opts: &ConvertOptions) -> Result<PathBuf> {
    let out_path = output_path_for(&opts.input, &opts.out_dir);
    if !opts.overwrite && out_path.exists() {
        return Err(OutputError::Exists { path: out_path }.into());
    }

    let mut rows = loader::load_rows(&opts.input)?;
    if !opts.keep_order {
        index::sort_rows(&mut rows);
    }
    let row_count = rows.len();
    let sections = index::group_sections(rows);
    debug!("{} rows in {} sections", row_count, sections.len());

    let parts = docx::package_parts(&sections, &opts.layout);
    docx::write_docx(&out_path, &parts, opts.overwrite)?;

    info!("Document created:  {}", out_path.display());
    Ok(out_path)
}
