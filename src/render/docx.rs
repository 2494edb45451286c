//! Packs a [`Document`] into a WordprocessingML (`.docx`) archive.
//!
//! Only the parts the layout needs are written: content types, package and
//! document relationships, the body, a style sheet with `Normal` and
//! `ListBullet`, and one bullet numbering definition for `ListBullet`.

use crate::render::document::{Block, Document, Paragraph, Table};
use crate::render::style::{Length, Margins, ParagraphStyle};
use crate::utils::error::Result;
use std::fmt::Write as _;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

const WORD_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

// US Letter, in twentieths of a point.
const PAGE_WIDTH: i64 = 12240;
const PAGE_HEIGHT: i64 = 15840;
const LINE_UNIT: f32 = 240.0;
// Grid widths are advisory once the table is 100% wide.
const CONTENT_WIDTH: i64 = PAGE_WIDTH - 2 * 1440;

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/><Override PartName="/word/numbering.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml"/></Types>"#;

const PACKAGE_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering" Target="numbering.xml"/></Relationships>"#;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style><w:style w:type="paragraph" w:styleId="ListBullet"><w:name w:val="List Bullet"/><w:basedOn w:val="Normal"/><w:pPr><w:numPr><w:numId w:val="1"/></w:numPr><w:ind w:left="360" w:hanging="360"/></w:pPr></w:style></w:styles>"#;

const NUMBERING_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:abstractNum w:abstractNumId="0"><w:multiLevelType w:val="singleLevel"/><w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="bullet"/><w:pStyle w:val="ListBullet"/><w:lvlText w:val="&#8226;"/><w:lvlJc w:val="left"/><w:pPr><w:ind w:left="360" w:hanging="360"/></w:pPr></w:lvl></w:abstractNum><w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num></w:numbering>"#;

/// Builds the `.docx` archive bytes for `document`.
pub fn write_docx(document: &Document) -> Result<Vec<u8>> {
    let body = document_xml(document);
    tracing::debug!("Packaging document ({} blocks, {} bytes of body XML)", document.blocks.len(), body.len());

    let parts: [(&str, &str); 6] = [
        ("[Content_Types].xml", CONTENT_TYPES_XML),
        ("_rels/.rels", PACKAGE_RELS_XML),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS_XML),
        ("word/document.xml", &body),
        ("word/styles.xml", STYLES_XML),
        ("word/numbering.xml", NUMBERING_XML),
    ];

    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, content) in parts {
        zip.start_file::<_, ()>(name, FileOptions::default())?;
        zip.write_all(content.as_bytes())?;
    }
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

pub fn document_xml(document: &Document) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push('\n');
    let _ = write!(xml, r#"<w:document xmlns:w="{}"><w:body>"#, WORD_NS);

    for block in &document.blocks {
        match block {
            Block::Paragraph(paragraph) => write_paragraph(&mut xml, paragraph),
            Block::Table(table) => write_table(&mut xml, table),
        }
    }

    write_section(&mut xml, &document.margins);
    xml.push_str("</w:body></w:document>");
    xml
}

fn write_paragraph(xml: &mut String, paragraph: &Paragraph) {
    let style = &paragraph.style;
    xml.push_str("<w:p><w:pPr>");
    if let Some(para_style) = style.para_style.filter(|s| *s != ParagraphStyle::Normal) {
        let _ = write!(xml, r#"<w:pStyle w:val="{}"/>"#, para_style.style_id());
    }
    if style.para_space_after.is_some() || style.para_line_spacing.is_some() {
        xml.push_str("<w:spacing");
        if let Some(after) = style.para_space_after {
            let _ = write!(xml, r#" w:after="{}""#, after.twips());
        }
        if let Some(multiple) = style.para_line_spacing {
            let _ = write!(xml, r#" w:line="{}" w:lineRule="auto""#, (multiple * LINE_UNIT).round() as i64);
        }
        xml.push_str("/>");
    }
    if let Some(alignment) = style.para_align {
        let _ = write!(xml, r#"<w:jc w:val="{}"/>"#, alignment.as_ooxml());
    }
    xml.push_str("</w:pPr>");

    let run_props = run_properties(paragraph);
    for run in &paragraph.runs {
        let _ = write!(
            xml,
            r#"<w:r>{}<w:t xml:space="preserve">{}</w:t></w:r>"#,
            run_props,
            escape_xml(run)
        );
    }
    xml.push_str("</w:p>");
}

fn run_properties(paragraph: &Paragraph) -> String {
    let style = &paragraph.style;
    let mut props = String::new();
    if let Some(font) = &style.font_name {
        let font = escape_xml(font);
        let _ = write!(props, r#"<w:rFonts w:ascii="{0}" w:hAnsi="{0}" w:cs="{0}"/>"#, font);
    }
    match style.font_bold {
        Some(true) => props.push_str("<w:b/>"),
        Some(false) => props.push_str(r#"<w:b w:val="0"/>"#),
        None => {}
    }
    if let Some(colour) = style.font_colour {
        let _ = write!(props, r#"<w:color w:val="{}"/>"#, colour.hex());
    }
    if let Some(size) = style.font_size {
        let _ = write!(props, r#"<w:sz w:val="{}"/>"#, size.half_points());
    }

    if props.is_empty() {
        props
    } else {
        format!("<w:rPr>{}</w:rPr>", props)
    }
}

fn write_table(xml: &mut String, table: &Table) {
    let columns = table.columns.max(1);
    let column_width = CONTENT_WIDTH / columns as i64;

    xml.push_str(r#"<w:tbl><w:tblPr><w:tblW w:w="5000" w:type="pct"/><w:tblLayout w:type="fixed"/></w:tblPr><w:tblGrid>"#);
    for _ in 0..columns {
        let _ = write!(xml, r#"<w:gridCol w:w="{}"/>"#, column_width);
    }
    xml.push_str("</w:tblGrid>");

    for row in &table.rows {
        xml.push_str("<w:tr>");
        for cell in row.iter().take(columns) {
            let _ = write!(xml, r#"<w:tc><w:tcPr><w:tcW w:w="{}" w:type="dxa"/></w:tcPr>"#, column_width);
            write_paragraph(xml, cell);
            xml.push_str("</w:tc>");
        }
        xml.push_str("</w:tr>");
    }
    xml.push_str("</w:tbl>");
}

fn write_section(xml: &mut String, margins: &Margins) {
    let twips = |mm: f32| Length::from_mm(mm).twips();
    let _ = write!(
        xml,
        r#"<w:sectPr><w:pgSz w:w="{}" w:h="{}"/><w:pgMar w:top="{}" w:right="{}" w:bottom="{}" w:left="{}" w:header="708" w:footer="708" w:gutter="0"/></w:sectPr>"#,
        PAGE_WIDTH,
        PAGE_HEIGHT,
        twips(margins.top),
        twips(margins.right),
        twips(margins.bottom),
        twips(margins.left)
    );
}

pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            // Control characters other than tab are not allowed in XML 1.0.
            c if c.is_control() && c != '\t' => {}
            c => escaped.push(c),
        }
    }
    escaped
}
