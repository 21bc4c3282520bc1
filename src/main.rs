use anyhow::{Context, Result};
use clap::Parser;
use index_to_docx::logging::{init_logger, Verbosity};
use index_to_docx::{convert, ConvertOptions, Layout, Orientation};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Index CSV (UTF-8, header row, then TOPIC,BK#,PG#,COMMENTS).
    csvfile: PathBuf,

    /// Directory for the .docx (named after the CSV).
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Overwrite an existing .docx.
    #[arg(long)]
    force: bool,

    /// Keep the CSV's row order instead of sorting by topic.
    #[arg(long)]
    keep_order: bool,

    /// Text columns per page.
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(1..=4))]
    columns: u8,

    /// Body font.
    #[arg(long, default_value = "Times New Roman")]
    font: String,

    /// Body font size in points.
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u8).range(6..=72))]
    font_size: u8,

    /// Landscape pages.
    #[arg(long)]
    landscape: bool,

    /// Debug output.
    #[arg(short, long)]
    verbose: bool,

    /// Warnings and errors only.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(Verbosity::from_flags(args.verbose, args.quiet));

    let layout = Layout {
        orientation: if args.landscape {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        },
        columns: args.columns,
        font: args.font,
        font_size: args.font_size,
        ..Layout::default()
    };
    let opts = ConvertOptions {
        input: args.csvfile,
        out_dir: args.out_dir,
        overwrite: args.force,
        keep_order: args.keep_order,
        layout,
    };

    convert(&opts).with_context(|| format!("converting {}", opts.input.display()))?;
    Ok(())
}
