//! `lopdf`-backed document source.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;

use lopdf::content::Content;
use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId, Stream};

use super::content::{coalesce, get_number, scan, GlyphSource};
use super::text::{decode_text_simple, parse_pdf_date};
use super::{ImageData, PdfSource, RawImage, RawLink, RawTextItem, SourceOpener};
use crate::detect::{detect_format_from_bytes, detect_format_from_path};
use crate::error::{Error, Result};
use crate::model::{BBox, DocumentInfo, ImageHandle, LinkDest, StyleFlags};

/// US Letter, used when a page has no usable MediaBox.
const DEFAULT_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

/// Guards against cyclic `/Parent`, `/Kids` and reference chains.
const MAX_DEPTH: usize = 32;

/// Portion of the em box above and below the baseline.
const ASCENT: f32 = 0.8;
const DESCENT: f32 = 0.2;

/// Opens independent [`LopdfSource`] handles over shared file bytes.
///
/// The bytes are read once; every [`SourceOpener::open`] call parses them
/// into a fresh `lopdf::Document` owned by the calling task.
#[derive(Debug, Clone)]
pub struct LopdfOpener {
    data: Arc<[u8]>,
    name: Option<String>,
}

impl LopdfOpener {
    /// Read a PDF file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        detect_format_from_path(path)?;

        let data = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string());

        Ok(Self {
            data: data.into(),
            name,
        })
    }

    /// Wrap in-memory PDF bytes.
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Result<Self> {
        let data = data.into();
        detect_format_from_bytes(&data)?;
        Ok(Self {
            data: data.into(),
            name: None,
        })
    }
}

impl SourceOpener for LopdfOpener {
    type Source = LopdfSource;

    fn open(&self) -> Result<LopdfSource> {
        LopdfSource::load(&self.data)
    }

    fn info(&self) -> Result<DocumentInfo> {
        let source = self.open()?;
        let mut info = source.document_info();
        info.file_name = self.name.clone();
        Ok(info)
    }
}

/// A parsed PDF document. Not `Send`; each task opens its own.
pub struct LopdfSource {
    doc: LopdfDocument,
    pages: Vec<ObjectId>,
    scans: RefCell<HashMap<u32, Rc<PageScan>>>,
}

#[derive(Debug, Default)]
struct PageScan {
    texts: Vec<RawTextItem>,
    images: Vec<RawImage>,
    links: Vec<RawLink>,
}

impl LopdfSource {
    /// Parse a PDF from bytes.
    pub fn load(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;

        if doc.is_encrypted() {
            log::warn!("Document is encrypted; text may not decode correctly");
        }

        let pages = doc.get_pages().into_values().collect();
        Ok(Self {
            doc,
            pages,
            scans: RefCell::new(HashMap::new()),
        })
    }

    /// Document information from the trailer `/Info` dictionary.
    pub fn document_info(&self) -> DocumentInfo {
        let mut info = DocumentInfo::with_page_count(self.page_count());
        info.pdf_version = self.doc.version.to_string();
        info.encrypted = self.doc.is_encrypted();

        let dict = self
            .doc
            .trailer
            .get(b"Info")
            .ok()
            .and_then(|obj| self.resolve(obj).as_dict().ok());

        if let Some(dict) = dict {
            let field = |key: &[u8]| self.string_field(dict, key);
            info.title = field(b"Title");
            info.author = field(b"Author");
            info.subject = field(b"Subject");
            info.creator = field(b"Creator");
            info.producer = field(b"Producer");
            info.created = field(b"CreationDate").and_then(|s| parse_pdf_date(&s));
            info.modified = field(b"ModDate").and_then(|s| parse_pdf_date(&s));
        }

        info
    }

    fn page_id(&self, page: u32) -> Result<ObjectId> {
        self.pages
            .get(page as usize)
            .copied()
            .ok_or(Error::PageOutOfRange(page, self.page_count()))
    }

    fn page_scan(&self, page: u32) -> Result<Rc<PageScan>> {
        if let Some(cached) = self.scans.borrow().get(&page) {
            return Ok(Rc::clone(cached));
        }

        let scan = Rc::new(self.scan_page(page)?);
        self.scans.borrow_mut().insert(page, Rc::clone(&scan));
        Ok(scan)
    }

    fn scan_page(&self, page: u32) -> Result<PageScan> {
        let page_id = self.page_id(page)?;
        let page_dict = self.doc.get_dictionary(page_id)?;
        let frame = PageFrame::new(self.media_box(page_dict));

        let links = self.page_links(page_dict, &frame);
        let link_boxes: Vec<BBox> = links.iter().map(|l| l.bbox).collect();

        let fonts = PageFonts::new(&self.doc, self.doc.get_page_fonts(page_id)?);
        let operations = match self.page_content(page_dict)? {
            Some(content) => Content::decode(&content)?.operations,
            None => Vec::new(),
        };
        let result = scan(&operations, &fonts);

        let texts = result
            .texts
            .into_iter()
            .map(|t| {
                let bbox = frame.text_box(t.x0, t.x1, t.baseline, t.size);
                RawTextItem::new(bbox, t.text, t.size, StyleFlags::from_font_name(&t.font))
            })
            .collect();
        let texts = coalesce(texts, &link_boxes);

        let mut images = Vec::new();
        for (name, id) in self.image_xobjects(page_dict) {
            let bbox = result
                .placements
                .iter()
                .find(|p| p.name == name)
                .map(|p| frame.rect(p.x0, p.y0, p.x1, p.y1));
            images.push(RawImage {
                handle: ImageHandle::new(encode_handle(id), String::from_utf8_lossy(&name)),
                bbox,
            });
        }

        log::debug!(
            "Page {}: {} spans, {} images, {} links",
            page + 1,
            texts.len(),
            images.len(),
            links.len()
        );

        Ok(PageScan {
            texts,
            images,
            links,
        })
    }

    fn resolve<'a>(&'a self, mut obj: &'a Object) -> &'a Object {
        for _ in 0..MAX_DEPTH {
            match obj {
                Object::Reference(id) => match self.doc.get_object(*id) {
                    Ok(next) => obj = next,
                    Err(_) => return obj,
                },
                _ => return obj,
            }
        }
        obj
    }

    fn dict_entry<'a>(&'a self, dict: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
        dict.get(key).ok().map(|o| self.resolve(o))
    }

    fn string_field(&self, dict: &Dictionary, key: &[u8]) -> Option<String> {
        match self.dict_entry(dict, key)? {
            Object::String(bytes, _) => Some(decode_text_simple(bytes)),
            Object::Name(bytes) => Some(String::from_utf8_lossy(bytes).to_string()),
            _ => None,
        }
        .filter(|s| !s.trim().is_empty())
    }

    /// Look up a page attribute, following `/Parent` for inherited keys.
    fn inherited<'a>(&'a self, page: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
        let mut node = page;
        for _ in 0..MAX_DEPTH {
            if let Some(value) = self.dict_entry(node, key) {
                return Some(value);
            }
            node = self.dict_entry(node, b"Parent")?.as_dict().ok()?;
        }
        None
    }

    fn media_box(&self, page: &Dictionary) -> [f32; 4] {
        let values: Vec<f32> = self
            .inherited(page, b"MediaBox")
            .and_then(|o| o.as_array().ok())
            .map(|arr| arr.iter().filter_map(|o| get_number(self.resolve(o))).collect())
            .unwrap_or_default();

        match values.as_slice() {
            [a, b, c, d] => [a.min(*c), b.min(*d), a.max(*c), b.max(*d)],
            _ => DEFAULT_MEDIA_BOX,
        }
    }

    fn page_content(&self, page: &Dictionary) -> Result<Option<Vec<u8>>> {
        let contents = match self.dict_entry(page, b"Contents") {
            Some(c) => c,
            None => return Ok(None),
        };

        match contents {
            Object::Stream(s) => stream_bytes(s).map(Some),
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Stream(s) = self.resolve(obj) {
                        match stream_bytes(s) {
                            Ok(data) => {
                                content.extend_from_slice(&data);
                                content.push(b' ');
                            }
                            Err(e) => log::warn!("Skipping unreadable content stream: {}", e),
                        }
                    }
                }
                Ok(Some(content))
            }
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    /// Image XObjects declared in the page resources, in name order.
    fn image_xobjects(&self, page: &Dictionary) -> Vec<(Vec<u8>, ObjectId)> {
        let xobjects = self
            .inherited(page, b"Resources")
            .and_then(|r| r.as_dict().ok())
            .and_then(|r| self.dict_entry(r, b"XObject"))
            .and_then(|x| x.as_dict().ok());

        let Some(xobjects) = xobjects else {
            return Vec::new();
        };

        xobjects
            .iter()
            .filter_map(|(name, obj)| {
                let id = obj.as_reference().ok()?;
                let stream = self.doc.get_object(id).ok()?.as_stream().ok()?;
                let subtype = stream.dict.get(b"Subtype").ok()?.as_name().ok()?;
                (subtype == b"Image").then(|| (name.clone(), id))
            })
            .collect()
    }

    fn page_links(&self, page: &Dictionary, frame: &PageFrame) -> Vec<RawLink> {
        let Some(Object::Array(annots)) = self.dict_entry(page, b"Annots") else {
            return Vec::new();
        };

        let mut links = Vec::new();
        for annot in annots {
            let Ok(annot) = self.resolve(annot).as_dict() else {
                continue;
            };
            let is_link = annot
                .get(b"Subtype")
                .and_then(|s| s.as_name())
                .is_ok_and(|s| s == b"Link");
            if !is_link {
                continue;
            }

            let rect: Vec<f32> = self
                .dict_entry(annot, b"Rect")
                .and_then(|r| r.as_array().ok())
                .map(|arr| arr.iter().filter_map(|o| get_number(self.resolve(o))).collect())
                .unwrap_or_default();
            let [x0, y0, x1, y1] = rect[..] else {
                log::debug!("Link annotation without a usable /Rect");
                continue;
            };

            match self.link_destination(annot) {
                Some(dest) => links.push(RawLink {
                    bbox: frame.rect(x0, y0, x1, y1),
                    dest,
                }),
                None => log::debug!("Skipping link with unresolvable destination"),
            }
        }
        links
    }

    fn link_destination(&self, annot: &Dictionary) -> Option<LinkDest> {
        if let Some(action) = self.dict_entry(annot, b"A").and_then(|a| a.as_dict().ok()) {
            let kind = action.get(b"S").and_then(|s| s.as_name()).ok()?;
            return match kind {
                b"URI" => match self.dict_entry(action, b"URI")? {
                    Object::String(bytes, _) => {
                        Some(LinkDest::Uri(decode_text_simple(bytes).trim().to_string()))
                    }
                    _ => None,
                },
                b"GoTo" => self.resolve_dest(self.dict_entry(action, b"D")?, 0),
                _ => None,
            };
        }

        self.resolve_dest(self.dict_entry(annot, b"Dest")?, 0)
    }

    /// Resolve an explicit or named destination to a 0-based page index.
    fn resolve_dest(&self, dest: &Object, depth: usize) -> Option<LinkDest> {
        if depth > MAX_DEPTH {
            return None;
        }

        match self.resolve(dest) {
            Object::Array(arr) => match arr.first()? {
                Object::Reference(id) => self
                    .pages
                    .iter()
                    .position(|p| p == id)
                    .map(|idx| LinkDest::Page(idx as u32)),
                Object::Integer(n) => u32::try_from(*n).ok().map(LinkDest::Page),
                _ => None,
            },
            Object::Dictionary(d) => self.resolve_dest(self.dict_entry(d, b"D")?, depth + 1),
            Object::Name(name) | Object::String(name, _) => {
                let target = self.named_destination(name)?;
                self.resolve_dest(target, depth + 1)
            }
            _ => None,
        }
    }

    fn named_destination(&self, name: &[u8]) -> Option<&Object> {
        let catalog = self.doc.catalog().ok()?;

        // PDF 1.1 style: /Dests dictionary in the catalog
        if let Some(dests) = self.dict_entry(catalog, b"Dests").and_then(|d| d.as_dict().ok()) {
            if let Some(found) = self.dict_entry(dests, name) {
                return Some(found);
            }
        }

        let tree = self
            .dict_entry(catalog, b"Names")
            .and_then(|n| n.as_dict().ok())
            .and_then(|n| self.dict_entry(n, b"Dests"))
            .and_then(|d| d.as_dict().ok())?;
        self.find_in_name_tree(tree, name, 0)
    }

    fn find_in_name_tree<'a>(
        &'a self,
        node: &'a Dictionary,
        key: &[u8],
        depth: usize,
    ) -> Option<&'a Object> {
        if depth > MAX_DEPTH {
            return None;
        }

        if let Some(Object::Array(names)) = self.dict_entry(node, b"Names") {
            for pair in names.chunks_exact(2) {
                if let Object::String(k, _) = self.resolve(&pair[0]) {
                    if k.as_slice() == key {
                        return Some(self.resolve(&pair[1]));
                    }
                }
            }
        }

        if let Some(Object::Array(kids)) = self.dict_entry(node, b"Kids") {
            for kid in kids {
                if let Ok(kid) = self.resolve(kid).as_dict() {
                    if let Some(found) = self.find_in_name_tree(kid, key, depth + 1) {
                        return Some(found);
                    }
                }
            }
        }

        None
    }
}

impl PdfSource for LopdfSource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn text_items(&self, page: u32) -> Result<Vec<RawTextItem>> {
        Ok(self.page_scan(page)?.texts.clone())
    }

    fn images(&self, page: u32) -> Result<Vec<RawImage>> {
        Ok(self.page_scan(page)?.images.clone())
    }

    fn links(&self, page: u32) -> Result<Vec<RawLink>> {
        Ok(self.page_scan(page)?.links.clone())
    }

    fn extract_image(&self, handle: &ImageHandle) -> Result<ImageData> {
        let id = decode_handle(handle.id);
        let stream = self
            .doc
            .get_object(id)
            .and_then(Object::as_stream)
            .map_err(|e| Error::ImageExtract(format!("{}: {}", handle.name, e)))?;

        let filters = stream_filters(stream);
        match filters.last().map(Vec::as_slice) {
            Some(b"DCTDecode") if filters.len() == 1 => {
                return Ok(ImageData::new(stream.content.clone(), "jpeg"))
            }
            Some(b"JPXDecode") if filters.len() == 1 => {
                return Ok(ImageData::new(stream.content.clone(), "jp2"))
            }
            _ => {}
        }

        let dims = |key: &[u8]| {
            stream
                .dict
                .get(key)
                .ok()
                .and_then(|o| o.as_i64().ok())
                .and_then(|v| u32::try_from(v).ok())
        };
        let (Some(width), Some(height)) = (dims(b"Width"), dims(b"Height")) else {
            return Err(Error::ImageExtract(format!(
                "{}: missing image dimensions",
                handle.name
            )));
        };
        let bits = dims(b"BitsPerComponent").unwrap_or(8);
        let components = stream
            .dict
            .get(b"ColorSpace")
            .ok()
            .and_then(|cs| color_components(&self.doc, cs));

        let Some(components) = components.filter(|_| bits == 8) else {
            return Err(Error::ImageExtract(format!(
                "{}: unsupported color space or bit depth",
                handle.name
            )));
        };

        let pixels = stream_bytes(stream)
            .map_err(|e| Error::ImageExtract(format!("{}: {}", handle.name, e)))?;
        let bytes = encode_png(width, height, components, &pixels)?;
        Ok(ImageData::new(bytes, "png"))
    }
}

/// Component count of a gray or RGB color space, either a device name or
/// a `[/CalGray dict]`, `[/CalRGB dict]` or `[/ICCBased stream]` array.
fn color_components(doc: &LopdfDocument, cs: &Object) -> Option<u8> {
    let deref = |obj: &Object| -> Option<Object> {
        match obj {
            Object::Reference(id) => doc.get_object(*id).ok().cloned(),
            other => Some(other.clone()),
        }
    };

    match deref(cs)? {
        Object::Name(name) => match name.as_slice() {
            b"DeviceGray" => Some(1),
            b"DeviceRGB" => Some(3),
            _ => None,
        },
        Object::Array(arr) => match arr.first()?.as_name().ok()? {
            b"CalGray" => Some(1),
            b"CalRGB" => Some(3),
            b"ICCBased" => {
                let profile = deref(arr.get(1)?)?;
                match profile.as_stream().ok()?.dict.get(b"N").ok()?.as_i64().ok()? {
                    1 => Some(1),
                    3 => Some(3),
                    _ => None,
                }
            }
            _ => None,
        },
        _ => None,
    }
}

/// Maps user-space coordinates into a top-left page frame.
struct PageFrame {
    left: f32,
    top: f32,
}

impl PageFrame {
    fn new(media_box: [f32; 4]) -> Self {
        Self {
            left: media_box[0],
            top: media_box[3],
        }
    }

    fn rect(&self, x0: f32, y0: f32, x1: f32, y1: f32) -> BBox {
        BBox::from_corners(
            x0 - self.left,
            self.top - y0,
            x1 - self.left,
            self.top - y1,
        )
    }

    fn text_box(&self, x0: f32, x1: f32, baseline: f32, size: f32) -> BBox {
        self.rect(x0, baseline - DESCENT * size, x1, baseline + ASCENT * size)
    }
}

/// Font lookups for one page.
struct PageFonts<'a> {
    doc: &'a LopdfDocument,
    fonts: BTreeMap<Vec<u8>, &'a Dictionary>,
    metrics: HashMap<Vec<u8>, FontMetrics>,
}

#[derive(Debug, Clone)]
struct FontMetrics {
    base_font: String,
    first_char: i64,
    widths: Vec<f32>,
    default_width: f32,
    two_byte: bool,
}

impl FontMetrics {
    fn from_dict(doc: &LopdfDocument, font: &Dictionary) -> Self {
        let resolve = |obj: &Object| -> Option<Object> {
            match obj {
                Object::Reference(id) => doc.get_object(*id).ok().cloned(),
                other => Some(other.clone()),
            }
        };

        let base_font = font
            .get(b"BaseFont")
            .and_then(|o| o.as_name())
            .map(|n| String::from_utf8_lossy(n).to_string())
            .unwrap_or_else(|_| "Unknown".to_string());

        let two_byte = font
            .get(b"Subtype")
            .and_then(|o| o.as_name())
            .is_ok_and(|s| s == b"Type0");

        if two_byte {
            let default_width = font
                .get(b"DescendantFonts")
                .ok()
                .and_then(resolve)
                .and_then(|d| d.as_array().ok().and_then(|a| a.first().cloned()))
                .and_then(|d| resolve(&d))
                .and_then(|d| d.as_dict().ok().and_then(|d| d.get(b"DW").ok().cloned()))
                .and_then(|w| get_number(&w))
                .unwrap_or(1000.0);
            return Self {
                base_font,
                first_char: 0,
                widths: Vec::new(),
                default_width,
                two_byte,
            };
        }

        let first_char = font
            .get(b"FirstChar")
            .ok()
            .and_then(|o| o.as_i64().ok())
            .unwrap_or(0);
        let widths = font
            .get(b"Widths")
            .ok()
            .and_then(resolve)
            .and_then(|w| {
                w.as_array()
                    .ok()
                    .map(|arr| arr.iter().map(|o| get_number(o).unwrap_or(0.0)).collect())
            })
            .unwrap_or_default();

        Self {
            base_font,
            first_char,
            widths,
            default_width: 500.0,
            two_byte,
        }
    }

    fn advance(&self, bytes: &[u8]) -> f32 {
        if self.two_byte {
            return (bytes.len() / 2) as f32 * self.default_width;
        }
        bytes
            .iter()
            .map(|&b| {
                usize::try_from(b as i64 - self.first_char)
                    .ok()
                    .and_then(|i| self.widths.get(i).copied())
                    .filter(|w| *w > 0.0)
                    .unwrap_or(self.default_width)
            })
            .sum()
    }
}

impl<'a> PageFonts<'a> {
    fn new(doc: &'a LopdfDocument, fonts: BTreeMap<Vec<u8>, &'a Dictionary>) -> Self {
        let metrics = fonts
            .iter()
            .map(|(name, dict)| (name.clone(), FontMetrics::from_dict(doc, dict)))
            .collect();
        Self {
            doc,
            fonts,
            metrics,
        }
    }
}

impl GlyphSource for PageFonts<'_> {
    fn decode(&self, font: &[u8], bytes: &[u8]) -> String {
        self.fonts
            .get(font)
            .and_then(|f| f.get_font_encoding(self.doc).ok())
            .and_then(|enc| LopdfDocument::decode_text(&enc, bytes).ok())
            .unwrap_or_else(|| decode_text_simple(bytes))
    }

    fn advance(&self, font: &[u8], bytes: &[u8]) -> f32 {
        match self.metrics.get(font) {
            Some(m) => m.advance(bytes),
            None => bytes.len() as f32 * 500.0,
        }
    }

    fn base_font(&self, font: &[u8]) -> String {
        self.metrics
            .get(font)
            .map(|m| m.base_font.clone())
            .unwrap_or_default()
    }
}

fn encode_handle(id: ObjectId) -> u64 {
    ((id.0 as u64) << 16) | id.1 as u64
}

fn decode_handle(handle: u64) -> ObjectId {
    ((handle >> 16) as u32, (handle & 0xFFFF) as u16)
}

fn stream_filters(stream: &Stream) -> Vec<Vec<u8>> {
    match stream.dict.get(b"Filter") {
        Ok(Object::Name(n)) => vec![n.clone()],
        Ok(Object::Array(arr)) => arr
            .iter()
            .filter_map(|o| o.as_name().ok().map(<[u8]>::to_vec))
            .collect(),
        _ => Vec::new(),
    }
}

fn stream_bytes(stream: &Stream) -> Result<Vec<u8>> {
    if stream_filters(stream).is_empty() {
        return Ok(stream.content.clone());
    }
    Ok(stream.decompressed_content()?)
}

/// Encode raw 8-bit samples as PNG.
fn encode_png(width: u32, height: u32, components: u8, pixels: &[u8]) -> Result<Vec<u8>> {
    let expected = width as usize * height as usize * components as usize;
    if pixels.len() != expected {
        return Err(Error::ImageExtract(format!(
            "sample data is {} bytes, expected {}",
            pixels.len(),
            expected
        )));
    }

    let color = match components {
        1 => png::ColorType::Grayscale,
        _ => png::ColorType::Rgb,
    };

    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(color);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(pixels)?;
        writer.finish()?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Object};

    #[test]
    fn test_handle_round_trip() {
        let id: ObjectId = (1234, 2);
        assert_eq!(decode_handle(encode_handle(id)), id);
    }

    #[test]
    fn test_page_frame_flips_y() {
        let frame = PageFrame::new([0.0, 0.0, 612.0, 792.0]);
        let bbox = frame.rect(72.0, 700.0, 172.0, 720.0);
        assert_eq!(bbox, BBox::new(72.0, 72.0, 172.0, 92.0));

        let text = frame.text_box(72.0, 100.0, 700.0, 10.0);
        assert_eq!(text.y0, 84.0);
        assert_eq!(text.y1, 94.0);
    }

    #[test]
    fn test_page_frame_offset_media_box() {
        let frame = PageFrame::new([10.0, 20.0, 110.0, 220.0]);
        assert_eq!(
            frame.rect(10.0, 200.0, 60.0, 220.0),
            BBox::new(0.0, 0.0, 50.0, 20.0)
        );
    }

    #[test]
    fn test_font_metrics_widths() {
        let doc = LopdfDocument::with_version("1.5");
        let font = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "FirstChar" => 65,
            "Widths" => vec![Object::Integer(600), Object::Integer(700)],
        };
        let metrics = FontMetrics::from_dict(&doc, &font);
        assert_eq!(metrics.base_font, "Helvetica-Bold");
        // 'A', 'B', then 'C' falls outside the table
        assert_eq!(metrics.advance(b"ABC"), 600.0 + 700.0 + 500.0);
    }

    #[test]
    fn test_font_metrics_type0_default_width() {
        let doc = LopdfDocument::with_version("1.5");
        let font = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type0",
            "BaseFont" => "NotoSansCJK",
        };
        let metrics = FontMetrics::from_dict(&doc, &font);
        assert_eq!(metrics.advance(&[0x4E, 0x00, 0x4E, 0x01]), 2000.0);
    }

    #[test]
    fn test_color_components() {
        let mut doc = LopdfDocument::with_version("1.5");
        let icc = doc.add_object(Stream::new(dictionary! { "N" => 3 }, Vec::new()));
        let cal_rgb = Object::Array(vec![
            Object::Name(b"CalRGB".to_vec()),
            Object::Dictionary(dictionary! {}),
        ]);
        let cal_gray_id = doc.add_object(Object::Array(vec![
            Object::Name(b"CalGray".to_vec()),
            Object::Dictionary(dictionary! {}),
        ]));

        assert_eq!(color_components(&doc, &Object::Name(b"DeviceGray".to_vec())), Some(1));
        assert_eq!(color_components(&doc, &cal_rgb), Some(3));
        assert_eq!(color_components(&doc, &Object::Reference(cal_gray_id)), Some(1));
        assert_eq!(
            color_components(
                &doc,
                &Object::Array(vec![Object::Name(b"ICCBased".to_vec()), Object::Reference(icc)])
            ),
            Some(3)
        );
        assert_eq!(color_components(&doc, &Object::Name(b"DeviceCMYK".to_vec())), None);
    }

    #[test]
    fn test_encode_png_checks_length() {
        let png = encode_png(2, 1, 3, &[255, 0, 0, 0, 255, 0]).unwrap();
        assert_eq!(&png[1..4], b"PNG");
        assert!(matches!(
            encode_png(2, 2, 1, &[0, 0, 0]),
            Err(Error::ImageExtract(_))
        ));
    }

    #[test]
    fn test_opener_rejects_non_pdf() {
        assert!(matches!(
            LopdfOpener::from_bytes(b"hello".to_vec()),
            Err(Error::UnknownFormat)
        ));
    }
}
