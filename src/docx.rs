use crate::error::OutputError;
use crate::index::Section;
use crate::layout::{Layout, Orientation};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

const REL_STYLES: &str = "rId1";
const REL_FOOTER: &str = "rId2";

#[derive(Debug, Clone, PartialEq, Eq)]
struct RunStyle {
    bold: bool,
    italic: bool,
    color: Option<String>,
}

impl RunStyle {
    fn plain() -> Self {
        Self {
            bold: false,
            italic: false,
            color: None,
        }
    }

    fn is_plain(&self) -> bool {
        !self.bold && !self.italic && self.color.is_none()
    }
}

#[derive(Debug, Clone)]
struct Run {
    text: String,
    style: RunStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParagraphStyle {
    Normal,
    Title,
}

#[derive(Debug, Clone)]
struct Paragraph {
    style: ParagraphStyle,
    runs: Vec<Run>,
}

/// How a section begins relative to the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionStart {
    NextPage,
    OddPage,
}

#[derive(Debug, Clone)]
enum Block {
    Paragraph(Paragraph),
    /// Ends the section it closes; carries that section's start type.
    SectionBreak(SectionStart),
}

/// Escapes markup and drops characters XML 1.0 cannot carry.
fn xml_escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(ch),
            c if (c as u32) < 0x20 || c == '\u{FFFE}' || c == '\u{FFFF}' => {}
            _ => out.push(ch),
        }
    }
    out
}

fn entry_paragraph(topic: &str, book: &str, page: &str, comment: &str, layout: &Layout) -> Paragraph {
    let mut runs = vec![
        Run {
            text: topic.to_string(),
            style: RunStyle {
                bold: true,
                italic: false,
                color: Some(layout.topic_color.clone()),
            },
        },
        Run {
            text: format!(" [b{book}/p{page}] "),
            style: RunStyle {
                bold: false,
                italic: true,
                color: None,
            },
        },
    ];
    if !comment.is_empty() {
        runs.push(Run {
            text: comment.to_string(),
            style: RunStyle::plain(),
        });
    }
    Paragraph {
        style: ParagraphStyle::Normal,
        runs,
    }
}

fn build_blocks(sections: &[Section], layout: &Layout) -> (Vec<Block>, SectionStart) {
    let mut blocks: Vec<Block> = Vec::new();
    let mut start = SectionStart::NextPage;

    for (i, section) in sections.iter().enumerate() {
        if i > 0 {
            blocks.push(Block::SectionBreak(start));
            start = SectionStart::OddPage;
        }
        info!("Processing:  {}", section.heading);
        blocks.push(Block::Paragraph(Paragraph {
            style: ParagraphStyle::Title,
            runs: vec![Run {
                text: section.heading.clone(),
                style: RunStyle::plain(),
            }],
        }));
        for row in &section.rows {
            blocks.push(Block::Paragraph(entry_paragraph(
                &row.topic,
                &row.book,
                &row.page,
                &row.comment,
                layout,
            )));
        }
    }

    (blocks, start)
}

fn run_xml(run: &Run) -> String {
    if run.text.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    out.push_str("<w:r>");
    if !run.style.is_plain() {
        out.push_str("<w:rPr>");
        if run.style.bold {
            out.push_str("<w:b/>");
        }
        if run.style.italic {
            out.push_str("<w:i/>");
        }
        if let Some(color) = &run.style.color {
            out.push_str(&format!(r#"<w:color w:val="{}"/>"#, xml_escape_text(color)));
        }
        out.push_str("</w:rPr>");
    }

    // Line breaks and tabs are elements of their own inside the run.
    let text = run.text.replace("\r\n", "\n").replace('\r', "\n");
    let mut buf = String::new();
    let flush = |out: &mut String, buf: &mut String| {
        if !buf.is_empty() {
            out.push_str(r#"<w:t xml:space="preserve">"#);
            out.push_str(&xml_escape_text(buf));
            out.push_str("</w:t>");
            buf.clear();
        }
    };
    for ch in text.chars() {
        match ch {
            '\n' => {
                flush(&mut out, &mut buf);
                out.push_str("<w:br/>");
            }
            '\t' => {
                flush(&mut out, &mut buf);
                out.push_str("<w:tab/>");
            }
            _ => buf.push(ch),
        }
    }
    flush(&mut out, &mut buf);

    out.push_str("</w:r>");
    out
}

fn paragraph_xml(p: &Paragraph) -> String {
    let mut out = String::new();
    out.push_str("<w:p>");
    match p.style {
        ParagraphStyle::Normal => {}
        ParagraphStyle::Title => out.push_str(r#"<w:pPr><w:pStyle w:val="Title"/></w:pPr>"#),
    }
    for run in &p.runs {
        out.push_str(&run_xml(run));
    }
    out.push_str("</w:p>");
    out
}

fn sect_pr_xml(start: SectionStart, layout: &Layout) -> String {
    let (w, h) = layout.page_size();
    let orient = match layout.orientation {
        Orientation::Portrait => "",
        Orientation::Landscape => r#" w:orient="landscape""#,
    };
    let start_type = match start {
        SectionStart::NextPage => "",
        SectionStart::OddPage => r#"<w:type w:val="oddPage"/>"#,
    };
    format!(
        concat!(
            "<w:sectPr>",
            r#"<w:footerReference w:type="default" r:id="{footer}"/>"#,
            "{start_type}",
            r#"<w:pgSz w:w="{w}" w:h="{h}"{orient}/>"#,
            r#"<w:pgMar w:top="{m}" w:right="{m}" w:bottom="{m}" w:left="{m}" w:header="720" w:footer="720" w:gutter="0"/>"#,
            r#"<w:cols w:num="{cols}" w:space="720"/>"#,
            r#"<w:docGrid w:linePitch="360"/>"#,
            "</w:sectPr>"
        ),
        footer = REL_FOOTER,
        start_type = start_type,
        w = w,
        h = h,
        orient = orient,
        m = layout.margin,
        cols = layout.columns,
    )
}

fn document_xml(blocks: &[Block], last_start: SectionStart, layout: &Layout) -> String {
    let mut body = String::new();
    for b in blocks {
        match b {
            Block::Paragraph(p) => body.push_str(&paragraph_xml(p)),
            Block::SectionBreak(start) => {
                body.push_str("<w:p><w:pPr>");
                body.push_str(&sect_pr_xml(*start, layout));
                body.push_str("</w:pPr></w:p>");
            }
        }
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"
 xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    {body}
    {sect_pr}
  </w:body>
</w:document>"#,
        body = body,
        sect_pr = sect_pr_xml(last_start, layout),
    )
}

/// Centred "Page X of Y".
fn footer_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:ftr xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"
 xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:p>
    <w:pPr><w:pStyle w:val="Footer"/><w:jc w:val="center"/></w:pPr>
    <w:r><w:t xml:space="preserve">Page </w:t></w:r>
    <w:r><w:fldChar w:fldCharType="begin"/></w:r>
    <w:r><w:instrText xml:space="preserve">PAGE</w:instrText></w:r>
    <w:r><w:fldChar w:fldCharType="separate"/></w:r>
    <w:r><w:t>1</w:t></w:r>
    <w:r><w:fldChar w:fldCharType="end"/></w:r>
    <w:r><w:t xml:space="preserve"> of </w:t></w:r>
    <w:r><w:fldChar w:fldCharType="begin"/></w:r>
    <w:r><w:instrText xml:space="preserve">NUMPAGES</w:instrText></w:r>
    <w:r><w:fldChar w:fldCharType="separate"/></w:r>
    <w:r><w:t>1</w:t></w:r>
    <w:r><w:fldChar w:fldCharType="end"/></w:r>
  </w:p>
</w:ftr>"#
}

fn content_types_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
  <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
  <Override PartName="/word/footer1.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml"/>
</Types>"#
}

fn rels_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#
}

fn document_rels_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="{styles}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
  <Relationship Id="{footer}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer" Target="footer1.xml"/>
</Relationships>"#,
        styles = REL_STYLES,
        footer = REL_FOOTER,
    )
}

fn styles_xml(layout: &Layout) -> String {
    let font = xml_escape_text(&layout.font);
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:docDefaults>
    <w:rPrDefault>
      <w:rPr>
        <w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:eastAsia="{font}" w:cs="{font}"/>
        <w:sz w:val="{body_sz}"/>
        <w:szCs w:val="{body_sz}"/>
      </w:rPr>
    </w:rPrDefault>
  </w:docDefaults>
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal">
    <w:name w:val="Normal"/>
    <w:qFormat/>
    <w:pPr>
      <w:spacing w:before="0" w:after="0" w:line="240" w:lineRule="auto"/>
      <w:ind w:left="{indent}" w:hanging="{indent}"/>
    </w:pPr>
    <w:rPr>
      <w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:cs="{font}"/>
      <w:sz w:val="{body_sz}"/>
      <w:szCs w:val="{body_sz}"/>
    </w:rPr>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Title">
    <w:name w:val="Title"/>
    <w:basedOn w:val="Normal"/>
    <w:next w:val="Normal"/>
    <w:uiPriority w:val="10"/>
    <w:qFormat/>
    <w:pPr>
      <w:keepNext/>
      <w:spacing w:before="0" w:after="0" w:line="240" w:lineRule="auto"/>
      <w:ind w:left="0" w:firstLine="0"/>
      <w:jc w:val="center"/>
    </w:pPr>
    <w:rPr>
      <w:b/>
      <w:sz w:val="{title_sz}"/>
      <w:szCs w:val="{title_sz}"/>
    </w:rPr>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Footer">
    <w:name w:val="footer"/>
    <w:basedOn w:val="Normal"/>
    <w:uiPriority w:val="99"/>
    <w:pPr>
      <w:ind w:left="0" w:firstLine="0"/>
    </w:pPr>
  </w:style>
</w:styles>"#,
        font = font,
        body_sz = u32::from(layout.font_size) * 2,
        title_sz = u32::from(layout.title_size) * 2,
        indent = layout.hanging_indent,
    )
}

/// All package parts, in archive order.
pub fn package_parts(sections: &[Section], layout: &Layout) -> Vec<(&'static str, String)> {
    let (blocks, last_start) = build_blocks(sections, layout);
    vec![
        ("[Content_Types].xml", content_types_xml().to_string()),
        ("_rels/.rels", rels_xml().to_string()),
        ("word/document.xml", document_xml(&blocks, last_start, layout)),
        ("word/styles.xml", styles_xml(layout)),
        ("word/footer1.xml", footer_xml().to_string()),
        ("word/_rels/document.xml.rels", document_rels_xml()),
    ]
}

/// Writes the package next to `out_path` and renames it into place once complete.
pub fn write_docx(
    out_path: &Path,
    parts: &[(&'static str, String)],
    overwrite: bool,
) -> Result<(), OutputError> {
    let dir = match out_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut builder = tempfile::Builder::new();
    builder.prefix(".index2docx-").suffix(".docx.tmp");
    // Temp files default to 0600; the finished document gets the usual umask-derived mode.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    let mut tmp = builder
        .tempfile_in(dir)
        .map_err(|source| OutputError::Create {
            dir: dir.to_path_buf(),
            source,
        })?;

    {
        let zip_err = |source| OutputError::Zip {
            path: out_path.to_path_buf(),
            source,
        };
        let write_err = |source| OutputError::Write {
            path: out_path.to_path_buf(),
            source,
        };

        let mut zip = ZipWriter::new(tmp.as_file_mut());
        // Fixed timestamps keep the output byte-stable across runs.
        let opts = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());

        for (name, body) in parts {
            zip.start_file(*name, opts).map_err(zip_err)?;
            zip.write_all(body.as_bytes()).map_err(write_err)?;
            debug!("wrote {} ({} bytes)", name, body.len());
        }
        zip.finish().map_err(zip_err)?;
    }

    tmp.as_file().sync_all().map_err(|source| OutputError::Write {
        path: out_path.to_path_buf(),
        source,
    })?;

    let persisted = if overwrite {
        tmp.persist(out_path).map(|_| ())
    } else {
        tmp.persist_noclobber(out_path).map(|_| ())
    };
    persisted.map_err(|e| {
        if e.error.kind() == std::io::ErrorKind::AlreadyExists {
            OutputError::Exists {
                path: out_path.to_path_buf(),
            }
        } else {
            OutputError::Persist {
                path: out_path.to_path_buf(),
                source: e.error,
            }
        }
    })
}
