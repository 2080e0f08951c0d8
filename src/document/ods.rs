// src/document/ods.rs
//! Minimal OpenDocument spreadsheet (`.ods`) writer and reader.
//!
//! Writes a single table. The package holds:
//! - `mimetype` (first entry, stored uncompressed, as ODF requires),
//! - `META-INF/manifest.xml`, `content.xml`, `styles.xml`, `meta.xml`,
//! - one `Pictures/NNNN.ext` entry per distinct embedded image file.
//!
//! The reader only understands as much as the downloader needs: the text of
//! the first cell of every row in the first table.

use std::collections::HashMap;
use std::fmt::Display;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::EmphasisStyle;
use super::image::EmbeddedImage;
use crate::error::{Error, Result};
use crate::rich_text::TextSegment;

pub const MIMETYPE: &str = "application/vnd.oasis.opendocument.spreadsheet";
const ODF_VERSION: &str = "1.2";

const NS: [(&str, &str); 9] = [
    ("xmlns:office", "urn:oasis:names:tc:opendocument:xmlns:office:1.0"),
    ("xmlns:style", "urn:oasis:names:tc:opendocument:xmlns:style:1.0"),
    ("xmlns:text", "urn:oasis:names:tc:opendocument:xmlns:text:1.0"),
    ("xmlns:table", "urn:oasis:names:tc:opendocument:xmlns:table:1.0"),
    ("xmlns:draw", "urn:oasis:names:tc:opendocument:xmlns:drawing:1.0"),
    ("xmlns:fo", "urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0"),
    ("xmlns:xlink", "http://www.w3.org/1999/xlink"),
    ("xmlns:svg", "urn:oasis:names:tc:opendocument:xmlns:svg-compatible:1.0"),
    ("xmlns:meta", "urn:oasis:names:tc:opendocument:xmlns:meta:1.0"),
];
const NS_MANIFEST: &str = "urn:oasis:names:tc:opendocument:xmlns:manifest:1.0";

#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Text(String),
    Rich(Vec<TextSegment>),
    Image(EmbeddedImage),
}

/// One named table; rows may have different lengths.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(name: &str) -> Self {
        Self { name: s!(name), rows: Vec::new() }
    }

    /// New sheet whose first row holds `headers` as plain text.
    pub fn with_header(name: &str, headers: &[&str]) -> Self {
        let mut sheet = Self::new(name);
        sheet.rows.push(headers.iter().map(|h| Cell::Text(s!(*h))).collect());
        sheet
    }

    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

type XmlWriter = Writer<Vec<u8>>;

/// Write `sheet` to `path`, replacing any existing file.
pub fn write_sheet(path: &Path, sheet: &Sheet, style: &EmphasisStyle) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let pictures = collect_pictures(sheet);
    let content = content_xml(sheet, style, &pictures)?;

    let file = File::create(path)?; // truncate/overwrite
    let mut zip = ZipWriter::new(file);
    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("mimetype", stored)?;
    zip.write_all(MIMETYPE.as_bytes())?;

    zip.start_file("META-INF/manifest.xml", deflated)?;
    zip.write_all(&manifest_xml(&pictures)?)?;

    zip.start_file("content.xml", deflated)?;
    zip.write_all(&content)?;

    zip.start_file("styles.xml", deflated)?;
    zip.write_all(&styles_xml()?)?;

    zip.start_file("meta.xml", deflated)?;
    zip.write_all(&meta_xml()?)?;

    for pic in &pictures.ordered {
        let bytes = fs::read(&pic.source).map_err(|e| missing_or_io(e, &pic.source))?;
        // Already-compressed raster formats gain nothing from deflate.
        let opts = if pic.media_type == "image/svg+xml" { deflated } else { stored };
        zip.start_file(pic.href.as_str(), opts)?;
        zip.write_all(&bytes)?;
    }

    zip.finish()?;
    logf!("Wrote {} ({} rows, {} pictures)", path.display(), sheet.rows.len(), pictures.ordered.len());
    Ok(())
}

fn missing_or_io(e: io::Error, path: &Path) -> Error {
    if e.kind() == io::ErrorKind::NotFound {
        Error::MissingImage(path.to_path_buf())
    } else {
        Error::Io(e)
    }
}

/* ---------------- Pictures ---------------- */

struct Picture {
    source: PathBuf,
    href: String,
    media_type: &'static str,
}

#[derive(Default)]
struct Pictures {
    ordered: Vec<Picture>,
    by_source: HashMap<PathBuf, usize>,
}

impl Pictures {
    fn href_for(&self, source: &Path) -> Option<&str> {
        let ix = *self.by_source.get(source)?;
        Some(self.ordered[ix].href.as_str())
    }
}

/// Assign one package entry per distinct source file, in first-use order.
fn collect_pictures(sheet: &Sheet) -> Pictures {
    let mut pics = Pictures::default();
    for cell in sheet.rows.iter().flatten() {
        let Cell::Image(img) = cell else { continue };
        if pics.by_source.contains_key(&img.source) {
            continue;
        }
        let n = pics.ordered.len() + 1;
        let href = match img.source.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("Pictures/{n:04}.{}", ext.to_ascii_lowercase()),
            None => format!("Pictures/{n:04}"),
        };
        pics.by_source.insert(img.source.clone(), pics.ordered.len());
        pics.ordered.push(Picture { source: img.source.clone(), href, media_type: img.media_type() });
    }
    pics
}

/* ---------------- XML parts ---------------- */

fn start(w: &mut XmlWriter, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let mut el = BytesStart::new(name);
    for attr in attrs {
        el.push_attribute(*attr);
    }
    w.write_event(Event::Start(el))?;
    Ok(())
}

fn empty(w: &mut XmlWriter, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let mut el = BytesStart::new(name);
    for attr in attrs {
        el.push_attribute(*attr);
    }
    w.write_event(Event::Empty(el))?;
    Ok(())
}

fn end(w: &mut XmlWriter, name: &str) -> Result<()> {
    w.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn text(w: &mut XmlWriter, s: &str) -> Result<()> {
    if !s.is_empty() {
        w.write_event(Event::Text(BytesText::new(s)))?;
    }
    Ok(())
}

fn new_doc() -> Result<XmlWriter> {
    let mut w = Writer::new(Vec::new());
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    Ok(w)
}

fn root_attrs() -> Vec<(&'static str, &'static str)> {
    let mut attrs: Vec<_> = NS.to_vec();
    attrs.push(("office:version", ODF_VERSION));
    attrs
}

fn content_xml(sheet: &Sheet, style: &EmphasisStyle, pictures: &Pictures) -> Result<Vec<u8>> {
    let mut w = new_doc()?;
    start(&mut w, "office:document-content", &root_attrs())?;

    start(&mut w, "office:automatic-styles", &[])?;
    start(&mut w, "style:style", &[("style:name", style.name.as_str()), ("style:family", "text")])?;
    empty(&mut w, "style:text-properties", &[("fo:color", style.color.as_str())])?;
    end(&mut w, "style:style")?;
    end(&mut w, "office:automatic-styles")?;

    start(&mut w, "office:body", &[])?;
    start(&mut w, "office:spreadsheet", &[])?;
    start(&mut w, "table:table", &[("table:name", sheet.name.as_str())])?;

    let width = sheet.width();
    if width > 0 {
        let repeat = width.to_string();
        empty(&mut w, "table:table-column", &[("table:number-columns-repeated", repeat.as_str())])?;
    }

    let mut frame_no = 0usize;
    for row in &sheet.rows {
        start(&mut w, "table:table-row", &[])?;
        for cell in row {
            write_cell(&mut w, cell, style, pictures, &mut frame_no)?;
        }
        end(&mut w, "table:table-row")?;
    }

    end(&mut w, "table:table")?;
    end(&mut w, "office:spreadsheet")?;
    end(&mut w, "office:body")?;
    end(&mut w, "office:document-content")?;
    Ok(w.into_inner())
}

fn write_cell(
    w: &mut XmlWriter,
    cell: &Cell,
    style: &EmphasisStyle,
    pictures: &Pictures,
    frame_no: &mut usize,
) -> Result<()> {
    match cell {
        Cell::Text(s) => {
            start(w, "table:table-cell", &[("office:value-type", "string")])?;
            start(w, "text:p", &[])?;
            write_odf_text(w, s, &mut true)?;
            end(w, "text:p")?;
            end(w, "table:table-cell")
        }
        Cell::Rich(segments) => {
            start(w, "table:table-cell", &[("office:value-type", "string")])?;
            start(w, "text:p", &[])?;
            let mut prev_space = true;
            for seg in segments {
                match seg {
                    TextSegment::Plain(s) => write_odf_text(w, s, &mut prev_space)?,
                    TextSegment::Emphasized(s) => {
                        start(w, "text:span", &[("text:style-name", style.name.as_str())])?;
                        write_odf_text(w, s, &mut prev_space)?;
                        end(w, "text:span")?;
                    }
                }
            }
            end(w, "text:p")?;
            end(w, "table:table-cell")
        }
        Cell::Image(img) => {
            let href = pictures
                .href_for(&img.source)
                .ok_or_else(|| Error::MissingImage(img.source.clone()))?;
            *frame_no += 1;
            let name = format!("Image {frame_no}");
            let (width, height) = (px(img.size.width), px(img.size.height));
            start(w, "table:table-cell", &[])?;
            start(
                w,
                "draw:frame",
                &[
                    ("draw:name", name.as_str()),
                    ("draw:z-index", "0"),
                    ("svg:width", width.as_str()),
                    ("svg:height", height.as_str()),
                    ("svg:x", "0px"),
                    ("svg:y", "0px"),
                ],
            )?;
            empty(
                w,
                "draw:image",
                &[
                    ("xlink:href", href),
                    ("xlink:type", "simple"),
                    ("xlink:show", "embed"),
                    ("xlink:actuate", "onLoad"),
                ],
            )?;
            end(w, "draw:frame")?;
            end(w, "table:table-cell")
        }
    }
}

/// Write paragraph text, encoding whitespace so readers do not collapse it:
/// repeated or leading spaces become `<text:s/>`, tabs `<text:tab/>`,
/// newlines `<text:line-break/>`. `prev_space` carries across spans.
fn write_odf_text(w: &mut XmlWriter, s: &str, prev_space: &mut bool) -> Result<()> {
    let mut buf = s!();
    let mut chars = s.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            ' ' => {
                let mut run = 1usize;
                while chars.peek() == Some(&' ') {
                    chars.next();
                    run += 1;
                }
                let mut extra = run;
                if !*prev_space {
                    buf.push(' ');
                    extra -= 1;
                }
                if extra > 0 {
                    text(w, &buf)?;
                    buf.clear();
                    if extra == 1 {
                        empty(w, "text:s", &[])?;
                    } else {
                        empty(w, "text:s", &[("text:c", extra.to_string().as_str())])?;
                    }
                }
                *prev_space = true;
            }
            '\t' => {
                text(w, &buf)?;
                buf.clear();
                empty(w, "text:tab", &[])?;
                *prev_space = false;
            }
            '\n' => {
                text(w, &buf)?;
                buf.clear();
                empty(w, "text:line-break", &[])?;
                *prev_space = true;
            }
            '\r' => {}
            c => {
                buf.push(c);
                *prev_space = false;
            }
        }
    }
    text(w, &buf)
}

/// `50.0` → `"50px"`, `12.5` → `"12.5px"`.
fn px(v: f64) -> String {
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    format!("{s}px")
}

fn manifest_xml(pictures: &Pictures) -> Result<Vec<u8>> {
    let mut w = new_doc()?;
    start(
        &mut w,
        "manifest:manifest",
        &[("xmlns:manifest", NS_MANIFEST), ("manifest:version", ODF_VERSION)],
    )?;
    empty(
        &mut w,
        "manifest:file-entry",
        &[("manifest:full-path", "/"), ("manifest:version", ODF_VERSION), ("manifest:media-type", MIMETYPE)],
    )?;
    for part in ["content.xml", "styles.xml", "meta.xml"] {
        manifest_entry(&mut w, part, "text/xml")?;
    }
    for pic in &pictures.ordered {
        manifest_entry(&mut w, &pic.href, pic.media_type)?;
    }
    end(&mut w, "manifest:manifest")?;
    Ok(w.into_inner())
}

fn manifest_entry(w: &mut XmlWriter, path: &str, media: &str) -> Result<()> {
    empty(w, "manifest:file-entry", &[("manifest:full-path", path), ("manifest:media-type", media)])
}

fn styles_xml() -> Result<Vec<u8>> {
    let mut w = new_doc()?;
    start(&mut w, "office:document-styles", &root_attrs())?;
    empty(&mut w, "office:styles", &[])?;
    end(&mut w, "office:document-styles")?;
    Ok(w.into_inner())
}

fn meta_xml() -> Result<Vec<u8>> {
    let mut w = new_doc()?;
    start(&mut w, "office:document-meta", &root_attrs())?;
    start(&mut w, "office:meta", &[])?;
    start(&mut w, "meta:generator", &[])?;
    text(&mut w, crate::config::consts::USER_AGENT)?;
    end(&mut w, "meta:generator")?;
    end(&mut w, "office:meta")?;
    end(&mut w, "office:document-meta")?;
    Ok(w.into_inner())
}

/* ---------------- Reading ---------------- */

fn xml_err(e: impl Display) -> Error {
    Error::Xml(e.to_string())
}

/// Text of the first cell of every data row in the first table.
/// The header row and blank cells are skipped.
pub fn read_first_column(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file)?;
    let mut content = s!();
    archive.by_name("content.xml")?.read_to_string(&mut content)?;
    first_column_of(&content)
}

pub(crate) fn first_column_of(content_xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(content_xml);
    let mut out = Vec::new();

    let mut seen_table = false;
    let mut in_table = false;
    let mut row_no = 0usize;
    let mut cell_no = 0usize;
    let mut in_first_cell = false;
    let mut current = s!();

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"table:table" if !seen_table => {
                    seen_table = true;
                    in_table = true;
                }
                b"table:table-row" if in_table => {
                    cell_no = 0;
                    current.clear();
                }
                b"table:table-cell" | b"table:covered-table-cell" if in_table => {
                    in_first_cell = cell_no == 0;
                    cell_no += 1;
                }
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"table:table-cell" | b"table:covered-table-cell" if in_table => cell_no += 1,
                b"text:s" if in_first_cell => {
                    let n = match e.try_get_attribute("text:c")? {
                        Some(a) => a.unescape_value().map_err(xml_err)?.trim().parse().unwrap_or(1),
                        None => 1,
                    };
                    current.extend(std::iter::repeat_n(' ', n));
                }
                b"text:tab" if in_first_cell => current.push('\t'),
                b"text:line-break" if in_first_cell => current.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_first_cell => current.push_str(&t.unescape().map_err(xml_err)?),
            Event::End(e) => match e.name().as_ref() {
                b"table:table-cell" | b"table:covered-table-cell" => in_first_cell = false,
                b"table:table-row" if in_table => {
                    let value = current.trim();
                    if row_no > 0 && !value.is_empty() {
                        out.push(s!(value));
                    }
                    row_no += 1;
                }
                b"table:table" if in_table => break,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_table {
        return Err(Error::Document(s!("no table in content.xml")));
    }
    Ok(out)
}
