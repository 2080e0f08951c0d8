// src/document/image.rs
// Display size and media type of images embedded in the spreadsheet.

use std::fs;
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::config::options::SizePolicy;

/// Frame size in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageSize {
    pub width: f64,
    pub height: f64,
}

impl ImageSize {
    pub const fn square(px: f64) -> Self {
        Self { width: px, height: px }
    }
}

/// A local image file and the frame it is shown in.
#[derive(Clone, Debug, PartialEq)]
pub struct EmbeddedImage {
    pub source: PathBuf,
    pub size: ImageSize,
}

impl EmbeddedImage {
    pub fn new(source: impl Into<PathBuf>, policy: SizePolicy) -> Self {
        let source = source.into();
        let size = resolve_size(&source, policy);
        Self { source, size }
    }

    pub fn media_type(&self) -> &'static str {
        media_type(&self.source)
    }
}

/// Apply `policy` to the image at `path`. Never fails: a probe error is
/// logged and the policy's fallback is used.
pub fn resolve_size(path: &Path, policy: SizePolicy) -> ImageSize {
    match policy {
        SizePolicy::Fixed(size) => size,
        SizePolicy::Detect { fallback } => match probe(path) {
            Ok(size) => size,
            Err(reason) => {
                logw!("No size for {}: {reason}; using {}x{}px", path.display(), fallback.width, fallback.height);
                fallback
            }
        },
    }
}

/// Read the intrinsic size: SVG root attributes, otherwise the raster header.
pub fn probe(path: &Path) -> Result<ImageSize, String> {
    if is_svg(path) {
        let text = fs::read_to_string(path).map_err(|e| e.to_string())?;
        svg_size(&text)
    } else {
        let (w, h) = image::image_dimensions(path).map_err(|e| e.to_string())?;
        Ok(ImageSize { width: w as f64, height: h as f64 })
    }
}

/// Size declared on the root `<svg>` element: `width`/`height` when both are
/// present, otherwise the last two numbers of `viewBox`.
pub fn svg_size(svg: &str) -> Result<ImageSize, String> {
    let mut reader = Reader::from_str(svg);
    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(e) | Event::Empty(e) => {
                if e.local_name().as_ref() != b"svg" {
                    return Err(s!("root element is not <svg>"));
                }
                return root_size(&e);
            }
            Event::Eof => return Err(s!("no root element")),
            _ => {}
        }
    }
}

fn root_size(root: &BytesStart<'_>) -> Result<ImageSize, String> {
    let mut width = None;
    let mut height = None;
    let mut view_box = None;
    for attr in root.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        let value = attr.unescape_value().map_err(|e| e.to_string())?.into_owned();
        match attr.key.local_name().as_ref() {
            b"width" => width = Some(value),
            b"height" => height = Some(value),
            b"viewBox" => view_box = Some(value),
            _ => {}
        }
    }

    if let (Some(w), Some(h)) = (&width, &height) {
        return Ok(ImageSize { width: parse_px(w)?, height: parse_px(h)? });
    }
    if let Some(vb) = view_box {
        let nums: Vec<f64> = vb
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|p| !p.is_empty())
            .map(|p| p.parse::<f64>().map_err(|_| format!("bad viewBox {vb:?}")))
            .collect::<Result<_, _>>()?;
        if let [_, _, w, h] = nums[..] {
            if w > 0.0 && h > 0.0 {
                return Ok(ImageSize { width: w, height: h });
            }
        }
        return Err(format!("bad viewBox {vb:?}"));
    }
    Err(s!("no width/height or viewBox on <svg>"))
}

/// `"48"` or `"48px"`. Other units are refused rather than guessed.
fn parse_px(v: &str) -> Result<f64, String> {
    let t = v.trim();
    let num = t.strip_suffix("px").unwrap_or(t).trim();
    match num.parse::<f64>() {
        Ok(n) if n > 0.0 && n.is_finite() => Ok(n),
        _ => Err(format!("unsupported length {v:?}")),
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase())
}

fn is_svg(path: &Path) -> bool {
    matches!(extension(path).as_deref(), Some("svg"))
}

pub fn media_type(path: &Path) -> &'static str {
    match extension(path).as_deref() {
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
