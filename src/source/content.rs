//! Content stream interpretation.
//!
//! Walks the operators of a page content stream, tracking the graphics
//! state (CTM) and text state (text/line matrices, font, leading) to place
//! every text-showing operation and every XObject invocation in PDF user
//! space.

use lopdf::content::Operation;
use lopdf::Object;

use super::text::{is_spaceless_script_char, needs_space_between};
use super::RawTextItem;
use crate::model::BBox;

/// TJ adjustments larger than this (in thousandths of an em) read as word breaks.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Default leading when a document uses `T*` without `TL`.
const DEFAULT_LEADING: f32 = 12.0;

/// A PDF transformation matrix `[a b c d e f]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    pub(crate) const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub(crate) fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    fn translation(tx: f32, ty: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// `self × other`, i.e. apply `self` first, then `other`.
    pub(crate) fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    pub(crate) fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }

    /// Bounding box of the unit square under this matrix, in user space.
    fn unit_square_bounds(&self) -> (f32, f32, f32, f32) {
        let corners = [
            self.apply(0.0, 0.0),
            self.apply(1.0, 0.0),
            self.apply(0.0, 1.0),
            self.apply(1.0, 1.0),
        ];
        corners.iter().fold(
            (f32::MAX, f32::MAX, f32::MIN, f32::MIN),
            |(x0, y0, x1, y1), &(x, y)| (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        )
    }
}

/// Font services needed while interpreting text operators.
pub(crate) trait GlyphSource {
    /// Decode string bytes shown with the given font resource.
    fn decode(&self, font: &[u8], bytes: &[u8]) -> String;

    /// Horizontal advance of the bytes, in thousandths of an em.
    fn advance(&self, font: &[u8], bytes: &[u8]) -> f32;

    /// Base font name of a font resource.
    fn base_font(&self, font: &[u8]) -> String;
}

/// A text-showing operation placed in user space (y grows upward).
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlacedText {
    pub text: String,
    pub x0: f32,
    pub x1: f32,
    pub baseline: f32,
    pub size: f32,
    pub font: String,
}

/// An XObject invocation placed in user space.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Placement {
    pub name: Vec<u8>,
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

/// Output of a content stream scan.
#[derive(Debug, Default)]
pub(crate) struct Scan {
    pub texts: Vec<PlacedText>,
    pub placements: Vec<Placement>,
}

#[derive(Debug, Clone)]
struct TextState {
    tm: Matrix,
    tlm: Matrix,
    font: Vec<u8>,
    font_size: f32,
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            tm: Matrix::IDENTITY,
            tlm: Matrix::IDENTITY,
            font: Vec::new(),
            font_size: 12.0,
            leading: DEFAULT_LEADING,
        }
    }
}

impl TextState {
    fn move_line(&mut self, tx: f32, ty: f32) {
        self.tlm = Matrix::translation(tx, ty).then(&self.tlm);
        self.tm = self.tlm;
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.leading);
    }

    fn advance(&mut self, thousandths: f32) {
        let tx = thousandths / 1000.0 * self.font_size;
        self.tm = Matrix::translation(tx, 0.0).then(&self.tm);
    }
}

/// Interpret a decoded content stream.
pub(crate) fn scan(operations: &[Operation], glyphs: &dyn GlyphSource) -> Scan {
    let mut out = Scan::default();
    let mut ctm = Matrix::IDENTITY;
    let mut stack: Vec<Matrix> = Vec::new();
    let mut ts = TextState::default();
    let mut in_text_block = false;

    for op in operations {
        let operands = &op.operands;
        match op.operator.as_str() {
            "q" => stack.push(ctm),
            "Q" => {
                if let Some(saved) = stack.pop() {
                    ctm = saved;
                }
            }
            "cm" => {
                if let Some(m) = matrix_operand(operands) {
                    ctm = m.then(&ctm);
                }
            }
            "BT" => {
                in_text_block = true;
                ts.tm = Matrix::IDENTITY;
                ts.tlm = Matrix::IDENTITY;
            }
            "ET" => in_text_block = false,
            "Tf" => {
                if operands.len() >= 2 {
                    if let Object::Name(name) = &operands[0] {
                        ts.font = name.clone();
                    }
                    ts.font_size = get_number(&operands[1]).unwrap_or(12.0);
                }
            }
            "TL" => {
                if let Some(l) = operands.first().and_then(get_number) {
                    ts.leading = l;
                }
            }
            "Td" | "TD" => {
                if operands.len() >= 2 {
                    let tx = get_number(&operands[0]).unwrap_or(0.0);
                    let ty = get_number(&operands[1]).unwrap_or(0.0);
                    if op.operator == "TD" {
                        ts.leading = -ty;
                    }
                    ts.move_line(tx, ty);
                }
            }
            "Tm" => {
                if let Some(m) = matrix_operand(operands) {
                    ts.tlm = m;
                    ts.tm = m;
                }
            }
            "T*" => ts.next_line(),
            "Tj" if in_text_block => {
                if let Some(Object::String(bytes, _)) = operands.first() {
                    show_text(&mut out, &mut ts, &ctm, glyphs, &[Shown::Bytes(bytes)]);
                }
            }
            "TJ" if in_text_block => {
                if let Some(Object::Array(arr)) = operands.first() {
                    let parts: Vec<Shown> = arr
                        .iter()
                        .filter_map(|item| match item {
                            Object::String(bytes, _) => Some(Shown::Bytes(bytes)),
                            other => get_number(other).map(Shown::Adjust),
                        })
                        .collect();
                    show_text(&mut out, &mut ts, &ctm, glyphs, &parts);
                }
            }
            "'" | "\"" => {
                ts.next_line();
                if in_text_block {
                    let idx = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(Object::String(bytes, _)) = operands.get(idx) {
                        show_text(&mut out, &mut ts, &ctm, glyphs, &[Shown::Bytes(bytes)]);
                    }
                }
            }
            "Do" => {
                if let Some(Object::Name(name)) = operands.first() {
                    let (x0, y0, x1, y1) = ctm.unit_square_bounds();
                    out.placements.push(Placement {
                        name: name.clone(),
                        x0,
                        y0,
                        x1,
                        y1,
                    });
                }
            }
            _ => {}
        }
    }

    out
}

enum Shown<'a> {
    Bytes(&'a [u8]),
    Adjust(f32),
}

fn show_text(
    out: &mut Scan,
    ts: &mut TextState,
    ctm: &Matrix,
    glyphs: &dyn GlyphSource,
    parts: &[Shown],
) {
    let start = ts.tm.then(ctm);
    let mut combined = String::new();

    for part in parts {
        match part {
            Shown::Bytes(bytes) => {
                combined.push_str(&glyphs.decode(&ts.font, bytes));
                ts.advance(glyphs.advance(&ts.font, bytes));
            }
            Shown::Adjust(n) => {
                // Negative adjustments move the pen right
                let adjustment = -n;
                if adjustment > TJ_SPACE_THRESHOLD
                    && !combined.is_empty()
                    && !combined.ends_with(' ')
                    && !combined.ends_with('\u{00A0}')
                    && !combined.chars().last().is_some_and(is_spaceless_script_char)
                {
                    combined.push(' ');
                }
                ts.advance(adjustment);
            }
        }
    }

    if combined.trim().is_empty() {
        return;
    }

    let end = ts.tm.then(ctm);
    let (sx, sy) = start.apply(0.0, 0.0);
    let (ex, _) = end.apply(0.0, 0.0);

    out.texts.push(PlacedText {
        text: combined,
        x0: sx.min(ex),
        x1: sx.max(ex),
        baseline: sy,
        size: ts.font_size * start.vertical_scale(),
        font: glyphs.base_font(&ts.font),
    });
}

fn matrix_operand(operands: &[Object]) -> Option<Matrix> {
    if operands.len() < 6 {
        return None;
    }
    let n: Vec<f32> = operands[..6].iter().filter_map(get_number).collect();
    (n.len() == 6).then(|| Matrix::new(n[0], n[1], n[2], n[3], n[4], n[5]))
}

/// Extract a number from a PDF object.
pub(crate) fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Merge adjacent spans that the content stream split mid-line.
///
/// Two consecutive items merge when they share size and style, sit on the
/// same baseline, the second starts within one em of the end of the first,
/// and both fall on the same link region (or neither does), so link text is
/// never fused with its surroundings.
pub(crate) fn coalesce(items: Vec<RawTextItem>, links: &[BBox]) -> Vec<RawTextItem> {
    let link_of = |b: &BBox| links.iter().position(|l| l.intersects(b));
    let mut merged: Vec<RawTextItem> = Vec::with_capacity(items.len());

    for item in items {
        if let Some(prev) = merged.last_mut() {
            let gap = item.bbox.x0 - prev.bbox.x1;
            let same_line = (item.bbox.y1 - prev.bbox.y1).abs() < 0.5;
            let same_style = (item.size - prev.size).abs() < 0.01 && item.flags == prev.flags;
            let close = gap > -0.5 * prev.size && gap < prev.size;

            if same_line && same_style && close && link_of(&prev.bbox) == link_of(&item.bbox) {
                if gap > prev.size * 0.1 && needs_space_between(&prev.text, &item.text) {
                    prev.text.push(' ');
                }
                prev.text.push_str(&item.text);
                prev.bbox = prev.bbox.union(&item.bbox);
                continue;
            }
        }
        merged.push(item);
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StyleFlags;

    struct FixedGlyphs;

    impl GlyphSource for FixedGlyphs {
        fn decode(&self, _font: &[u8], bytes: &[u8]) -> String {
            String::from_utf8_lossy(bytes).to_string()
        }

        fn advance(&self, _font: &[u8], bytes: &[u8]) -> f32 {
            bytes.len() as f32 * 500.0
        }

        fn base_font(&self, _font: &[u8]) -> String {
            "Helvetica".to_string()
        }
    }

    fn op(operator: &str, operands: Vec<Object>) -> Operation {
        Operation::new(operator, operands)
    }

    fn int(n: i64) -> Object {
        Object::Integer(n)
    }

    fn string(s: &str) -> Object {
        Object::string_literal(s)
    }

    #[test]
    fn test_matrix_then_applies_left_first() {
        let scale = Matrix::new(2.0, 0.0, 0.0, 2.0, 0.0, 0.0);
        let shift = Matrix::translation(10.0, 5.0);
        // scale, then shift
        assert_eq!(scale.then(&shift).apply(1.0, 1.0), (12.0, 7.0));
        // shift, then scale
        assert_eq!(shift.then(&scale).apply(1.0, 1.0), (22.0, 12.0));
    }

    #[test]
    fn test_scan_places_text_and_advances() {
        let ops = vec![
            op("BT", vec![]),
            op("Tf", vec![Object::Name(b"F1".to_vec()), int(10)]),
            op("Td", vec![int(100), int(700)]),
            op("Tj", vec![string("Hello")]),
            op("Tj", vec![string("World")]),
            op("ET", vec![]),
        ];
        let scan = scan(&ops, &FixedGlyphs);

        assert_eq!(scan.texts.len(), 2);
        let first = &scan.texts[0];
        assert_eq!(first.text, "Hello");
        assert_eq!(first.x0, 100.0);
        assert_eq!(first.x1, 125.0);
        assert_eq!(first.baseline, 700.0);
        assert_eq!(first.size, 10.0);
        // Second show starts where the first ended
        assert_eq!(scan.texts[1].x0, 125.0);
    }

    #[test]
    fn test_scan_tj_array_inserts_word_space() {
        let ops = vec![
            op("BT", vec![]),
            op("Tf", vec![Object::Name(b"F1".to_vec()), int(12)]),
            op(
                "TJ",
                vec![Object::Array(vec![
                    string("Hello"),
                    Object::Integer(-250),
                    string("world"),
                ])],
            ),
            op("ET", vec![]),
        ];
        let scan = scan(&ops, &FixedGlyphs);
        assert_eq!(scan.texts[0].text, "Hello world");
    }

    #[test]
    fn test_scan_respects_ctm_and_leading() {
        let ops = vec![
            op("q", vec![]),
            op(
                "cm",
                vec![int(2), int(0), int(0), int(2), int(0), int(0)],
            ),
            op("BT", vec![]),
            op("Tf", vec![Object::Name(b"F1".to_vec()), int(10)]),
            op("TL", vec![int(15)]),
            op("Td", vec![int(10), int(100)]),
            op("Tj", vec![string("a")]),
            op("T*", vec![]),
            op("Tj", vec![string("b")]),
            op("ET", vec![]),
            op("Q", vec![]),
            op(
                "cm",
                vec![int(50), int(0), int(0), int(40), int(300), int(400)],
            ),
            op("Do", vec![Object::Name(b"Im1".to_vec())]),
        ];
        let scan = scan(&ops, &FixedGlyphs);

        assert_eq!(scan.texts[0].size, 20.0);
        assert_eq!(scan.texts[0].x0, 20.0);
        assert_eq!(scan.texts[0].baseline, 200.0);
        assert_eq!(scan.texts[1].baseline, 170.0);

        // CTM was restored by Q before the image was drawn
        let placement = &scan.placements[0];
        assert_eq!(placement.name, b"Im1".to_vec());
        assert_eq!(
            (placement.x0, placement.y0, placement.x1, placement.y1),
            (300.0, 400.0, 350.0, 440.0)
        );
    }

    #[test]
    fn test_scan_ignores_text_outside_bt() {
        let ops = vec![op("Tj", vec![string("stray")])];
        assert!(scan(&ops, &FixedGlyphs).texts.is_empty());
    }

    fn raw(text: &str, x0: f32, x1: f32) -> RawTextItem {
        RawTextItem::new(
            BBox::new(x0, 100.0, x1, 110.0),
            text,
            10.0,
            StyleFlags::empty(),
        )
    }

    #[test]
    fn test_coalesce_same_line_runs() {
        let items = vec![raw("Hello", 0.0, 25.0), raw("world", 28.0, 53.0)];
        let merged = coalesce(items, &[]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].text, "Hello world");
        assert_eq!(merged[0].bbox, BBox::new(0.0, 100.0, 53.0, 110.0));
    }

    #[test]
    fn test_coalesce_keeps_distant_and_styled_runs_apart() {
        let far = vec![raw("Left", 0.0, 20.0), raw("Right", 200.0, 225.0)];
        assert_eq!(coalesce(far, &[]).len(), 2);

        let mut bold = raw("Bold", 21.0, 40.0);
        bold.flags = StyleFlags(StyleFlags::BOLD);
        let styled = vec![raw("Plain", 0.0, 20.0), bold];
        assert_eq!(coalesce(styled, &[]).len(), 2);
    }

    #[test]
    fn test_coalesce_does_not_fuse_link_text() {
        let link_area = BBox::new(26.0, 98.0, 60.0, 112.0);
        let items = vec![raw("Visit", 0.0, 25.0), raw("here", 27.0, 50.0)];
        assert_eq!(coalesce(items, &[link_area]).len(), 2);
    }
}
