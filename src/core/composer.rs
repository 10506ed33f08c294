//! Lays out monogram, font previews and notes into one SVG document.
//!
//! The composer is a pure function of its inputs: it never reads session or
//! global state, so the same inputs always produce byte-identical markup.

use crate::domain::catalog::CIRCULAR_MONOGRAM_FAMILY;
use crate::domain::model::{FrameStyle, MonogramMode, MonogramSpec, SvgDocument};
use crate::domain::selection::{Selection, DEFAULT_MONOGRAM_SIZE};
use crate::utils::error::{ProofError, Result};
use std::borrow::Cow;
use std::fmt::Write;

pub const CANVAS_WIDTH: f32 = 1000.0;
pub const PADDING: f32 = 40.0;
pub const DEFAULT_FONT_SIZE: f32 = 36.0;
pub const MIN_FONT_SIZE: f32 = 8.0;
pub const MAX_FONT_SIZE: f32 = 200.0;

const LABEL_SIZE: f32 = 14.0;
const LABEL_AFTER: f32 = 8.0;
const LABEL_FAMILY: &str = "sans-serif";
const LABEL_FILL: &str = "#6b6b6b";
const TEXT_FILL: &str = "#1a1a1a";
const NOTE_SIZE: f32 = 16.0;
const NOTE_FAMILY: &str = "sans-serif";
const LINE_SPACING: f32 = 1.25;
const BLOCK_GAP: f32 = 32.0;

// Monogram geometry, relative to the middle glyph size.
const REFERENCE_SIZE: f32 = 96.0;
const REFERENCE_OFFSET: f32 = 60.0;
const CIRCULAR_OFFSET_RATIO: f32 = 0.55;
const SIDE_SCALE: f32 = 0.7;
const CAP_CENTRE_RATIO: f32 = 0.35;
const DESCENT_RATIO: f32 = 0.2;
const FRAME_MARGIN_RATIO: f32 = 0.15;

/// `clamp` lets NaN through, so non-finite sizes take `default` first.
fn bounded_size(size: f32, default: f32, max: f32) -> f32 {
    let size = if size.is_finite() { size } else { default };
    size.clamp(MIN_FONT_SIZE, max)
}

/// Escapes text content for embedding between tags.
pub fn escape_text(input: &str) -> Cow<'_, str> {
    if !input.contains(['&', '<', '>']) {
        return Cow::Borrowed(input);
    }
    let mut out = String::with_capacity(input.len() + 8);
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Escapes a value placed inside a double-quoted attribute.
pub fn escape_attr(input: &str) -> Cow<'_, str> {
    let text = escape_text(input);
    if !text.contains('"') {
        return text;
    }
    Cow::Owned(text.replace('"', "&quot;"))
}

/// Builds the submission preview.
///
/// Fails with [`ProofError::EmptyInput`] when there is no monogram and either no
/// font is selected or `text` is blank. Blank lines of `text` and `notes` are skipped.
pub fn compose(
    monogram: Option<&MonogramSpec>,
    selection: &Selection,
    text: &str,
    notes: &str,
    font_size: f32,
) -> Result<SvgDocument> {
    let has_text = !text.trim().is_empty();
    if monogram.is_none() && (selection.is_empty() || !has_text) {
        return Err(ProofError::EmptyInput);
    }

    let font_size = bounded_size(font_size, DEFAULT_FONT_SIZE, MAX_FONT_SIZE);
    let mut canvas = Canvas::new();

    if let Some(spec) = monogram {
        canvas.begin_block();
        canvas.monogram(spec);
    }

    if has_text {
        for entry in selection.iter() {
            canvas.begin_block();
            canvas.label(&entry.label());
            for row in visible_rows(text) {
                canvas.row(row, entry.style.family, font_size);
            }
        }
    }

    if !notes.trim().is_empty() {
        canvas.begin_block();
        canvas.label("Notes");
        for row in visible_rows(notes) {
            canvas.row(row, NOTE_FAMILY, NOTE_SIZE);
        }
    }

    let document = canvas.finish();
    tracing::debug!(
        "Composed preview {}x{} ({} bytes)",
        document.width,
        document.height,
        document.markup.len()
    );
    Ok(document)
}

fn visible_rows(input: &str) -> impl Iterator<Item = &str> {
    input
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::trim_end)
}

/// Formats a coordinate with at most one decimal.
fn px(value: f32) -> String {
    let rounded = format!("{:.1}", value);
    match rounded.strip_suffix(".0") {
        Some(whole) => whole.to_string(),
        None => rounded,
    }
}

struct Canvas {
    body: String,
    cursor: f32,
    blocks: usize,
}

impl Canvas {
    fn new() -> Self {
        Self {
            body: String::new(),
            cursor: PADDING,
            blocks: 0,
        }
    }

    fn begin_block(&mut self) {
        if self.blocks > 0 {
            self.cursor += BLOCK_GAP;
        }
        self.blocks += 1;
    }

    fn label(&mut self, label: &str) {
        self.cursor += LABEL_SIZE;
        let _ = writeln!(
            self.body,
            r#"<text x="{}" y="{}" font-family="{}" font-size="{}" fill="{}">{}</text>"#,
            px(PADDING),
            px(self.cursor),
            LABEL_FAMILY,
            px(LABEL_SIZE),
            LABEL_FILL,
            escape_text(label)
        );
        self.cursor += LABEL_AFTER;
    }

    fn row(&mut self, content: &str, family: &str, size: f32) {
        self.cursor += size * LINE_SPACING;
        let _ = writeln!(
            self.body,
            r#"<text x="{}" y="{}" font-family="{}" font-size="{}" fill="{}" xml:space="preserve">{}</text>"#,
            px(PADDING),
            px(self.cursor),
            escape_attr(family),
            px(size),
            TEXT_FILL,
            escape_text(content)
        );
    }

    fn glyph(&mut self, glyph: char, x: f32, y: f32, family: &str, size: f32) {
        let mut buf = [0u8; 4];
        let _ = writeln!(
            self.body,
            r#"<text x="{}" y="{}" font-family="{}" font-size="{}" fill="{}" text-anchor="middle">{}</text>"#,
            px(x),
            px(y),
            escape_attr(family),
            px(size),
            TEXT_FILL,
            escape_text(glyph.encode_utf8(&mut buf))
        );
    }

    fn monogram(&mut self, spec: &MonogramSpec) {
        let (label, family, circular) = match &spec.mode {
            MonogramMode::Font(entry) => (
                format!("Monogram: {}", entry.label()),
                entry.style.family,
                false,
            ),
            MonogramMode::Circular => (
                "Monogram: Circular".to_string(),
                CIRCULAR_MONOGRAM_FAMILY,
                true,
            ),
        };
        self.label(&label);

        let size = bounded_size(spec.size, DEFAULT_MONOGRAM_SIZE, MAX_FONT_SIZE * 2.0);
        let side_size = if spec.uniform_scale || circular {
            size
        } else {
            size * SIDE_SCALE
        };
        let offset = if circular {
            size * CIRCULAR_OFFSET_RATIO
        } else {
            REFERENCE_OFFSET * (size / REFERENCE_SIZE)
        };
        let frame = spec
            .frame
            .or(if circular { Some(FrameStyle::Circle) } else { None });
        let radius = offset + side_size / 2.0 + size * FRAME_MARGIN_RATIO;

        // Baseline low enough that a frame never overlaps the label.
        let drop = match frame {
            Some(_) => size.max(size * CAP_CENTRE_RATIO + radius),
            None => size,
        };
        let baseline = self.cursor + drop;
        let side_baseline = baseline - (size - side_size) / 2.0;
        let centre_x = CANVAS_WIDTH / 2.0;
        let centre_y = baseline - size * CAP_CENTRE_RATIO;

        if let Some(frame) = frame {
            self.frame(frame, centre_x, centre_y, radius);
        }

        let [left, middle, right] = spec.initials;
        self.glyph(left, centre_x - offset, side_baseline, family, side_size);
        self.glyph(middle, centre_x, baseline, family, size);
        self.glyph(right, centre_x + offset, side_baseline, family, side_size);

        let glyph_bottom = baseline + size * DESCENT_RATIO;
        self.cursor = match frame {
            Some(_) => glyph_bottom.max(centre_y + radius),
            None => glyph_bottom,
        };
    }

    fn frame(&mut self, frame: FrameStyle, cx: f32, cy: f32, r: f32) {
        let stroke = format!(r#"fill="none" stroke="{}" stroke-width="2""#, TEXT_FILL);
        let _ = match frame {
            FrameStyle::Circle => writeln!(
                self.body,
                r#"<circle cx="{}" cy="{}" r="{}" {}/>"#,
                px(cx),
                px(cy),
                px(r),
                stroke
            ),
            FrameStyle::Square => writeln!(
                self.body,
                r#"<rect x="{}" y="{}" width="{}" height="{}" {}/>"#,
                px(cx - r),
                px(cy - r),
                px(2.0 * r),
                px(2.0 * r),
                stroke
            ),
            FrameStyle::Diamond => writeln!(
                self.body,
                r#"<polygon points="{},{} {},{} {},{} {},{}" {}/>"#,
                px(cx),
                px(cy - r),
                px(cx + r),
                px(cy),
                px(cx),
                px(cy + r),
                px(cx - r),
                px(cy),
                stroke
            ),
        };
    }

    fn finish(self) -> SvgDocument {
        let height = self.cursor + PADDING;
        let markup = format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
                "\n",
                r##"<rect width="100%" height="100%" fill="#ffffff"/>"##,
                "\n{body}</svg>\n"
            ),
            w = px(CANVAS_WIDTH),
            h = px(height),
            body = self.body
        );
        SvgDocument {
            markup,
            width: CANVAS_WIDTH,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::find_font;
    use crate::domain::model::SelectedFont;

    fn selection_of(names: &[&str]) -> Selection {
        let mut selection = Selection::new();
        for name in names {
            selection.toggle(find_font(name).unwrap()).unwrap();
        }
        selection
    }

    fn monogram(mode: MonogramMode) -> MonogramSpec {
        MonogramSpec {
            initials: ['J', 'D', 'S'],
            mode,
            size: 96.0,
            frame: None,
            uniform_scale: false,
        }
    }

    fn text_elements(doc: &SvgDocument) -> usize {
        doc.markup.matches("<text ").count()
    }

    #[test]
    fn test_empty_input_without_monogram() {
        let empty = Selection::new();
        assert!(matches!(
            compose(None, &empty, "", "", 32.0),
            Err(ProofError::EmptyInput)
        ));
        assert!(matches!(
            compose(None, &empty, "Hello", "notes", 32.0),
            Err(ProofError::EmptyInput)
        ));

        let selection = selection_of(&["Montserrat"]);
        assert!(matches!(
            compose(None, &selection, "  \n\t ", "notes", 32.0),
            Err(ProofError::EmptyInput)
        ));
    }

    #[test]
    fn test_monogram_alone_is_enough() {
        let spec = monogram(MonogramMode::Circular);
        let doc = compose(Some(&spec), &Selection::new(), "", "", 32.0).unwrap();
        assert!(doc.markup.contains("Monogram: Circular"));
        assert!(doc.markup.contains("<circle "));
        // label + three glyphs
        assert_eq!(text_elements(&doc), 4);
    }

    #[test]
    fn test_special_characters_are_escaped() {
        let selection = selection_of(&["Playfair Display"]);
        let doc = compose(None, &selection, "Tom & Jerry <3 >_<", "a<b & c>d", 32.0).unwrap();

        assert!(doc.markup.contains("Tom &amp; Jerry &lt;3 &gt;_&lt;"));
        assert!(doc.markup.contains("a&lt;b &amp; c&gt;d"));
        assert!(!doc.markup.contains("Tom & Jerry"));
        assert!(!doc.markup.contains("<3"));
        assert!(!doc.markup.contains("a<b"));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let selection = selection_of(&["Montserrat"]);
        let doc = compose(None, &selection, "first\n\n   \nsecond\n", "\n  \n", 32.0).unwrap();
        // one label + two rows, no notes block
        assert_eq!(text_elements(&doc), 3);
        assert!(!doc.markup.contains(">Notes<"));
    }

    #[test]
    fn test_fonts_render_in_selection_order_with_style() {
        let mut selection = selection_of(&["Great Vibes", "Montserrat"]);
        selection.set_style("Montserrat", "Bold").unwrap();

        let doc = compose(None, &selection, "Ada", "", 40.0).unwrap();
        let first = doc.markup.find("Great Vibes (Regular)").unwrap();
        let second = doc.markup.find("Montserrat (Bold)").unwrap();
        assert!(first < second);
        assert!(doc
            .markup
            .contains(r#"font-family="'Montserrat Bold', sans-serif" font-size="40""#));
    }

    #[test]
    fn test_notes_block_follows_fonts() {
        let selection = selection_of(&["Montserrat"]);
        let doc = compose(None, &selection, "Hi", "Gold foil\nNo rush", 32.0).unwrap();
        let font = doc.markup.find("Montserrat (Regular)").unwrap();
        let notes = doc.markup.find(">Notes<").unwrap();
        assert!(font < notes);
        assert!(doc.markup.contains(">Gold foil<"));
        assert!(doc.markup.contains(">No rush<"));
    }

    #[test]
    fn test_side_glyphs_are_smaller_and_raised() {
        let font = find_font("Interlock Monogram").unwrap();
        let spec = monogram(MonogramMode::Font(SelectedFont::new(font)));
        let doc = compose(Some(&spec), &Selection::new(), "", "", 32.0).unwrap();

        // label at 54, baseline 62 + 96 = 158, sides at 158 - 14.4
        assert!(doc
            .markup
            .contains(r#"<text x="440" y="143.6" font-family="'Interlock Monogram', serif" font-size="67.2""#));
        assert!(doc
            .markup
            .contains(r#"<text x="500" y="158" font-family="'Interlock Monogram', serif" font-size="96""#));
        assert!(doc.markup.contains(r#"x="560" y="143.6""#));
    }

    #[test]
    fn test_uniform_scale_keeps_one_size() {
        let font = find_font("Interlock Monogram").unwrap();
        let mut spec = monogram(MonogramMode::Font(SelectedFont::new(font)));
        spec.uniform_scale = true;
        let doc = compose(Some(&spec), &Selection::new(), "", "", 32.0).unwrap();
        assert_eq!(doc.markup.matches(r#"font-size="96""#).count(), 3);
    }

    #[test]
    fn test_frame_styles() {
        let font = find_font("Cinzel Decorative").unwrap();
        let mut spec = monogram(MonogramMode::Font(SelectedFont::new(font)));

        spec.frame = Some(FrameStyle::Square);
        let doc = compose(Some(&spec), &Selection::new(), "", "", 32.0).unwrap();
        assert!(doc.markup.contains("<rect x="));

        spec.frame = Some(FrameStyle::Diamond);
        let doc = compose(Some(&spec), &Selection::new(), "", "", 32.0).unwrap();
        assert!(doc.markup.contains("<polygon "));
    }

    #[test]
    fn test_height_tracks_content_and_width_is_fixed() {
        let selection = selection_of(&["Montserrat"]);
        let short = compose(None, &selection, "one", "", 32.0).unwrap();
        let long = compose(None, &selection, "one\ntwo\nthree", "", 32.0).unwrap();

        assert_eq!(short.width, CANVAS_WIDTH);
        assert_eq!(long.width, CANVAS_WIDTH);
        assert_eq!(long.height - short.height, 2.0 * 32.0 * LINE_SPACING);
        // 40 + 14 + 8 + 40 + 40
        assert_eq!(short.height, 142.0);
        assert!(short
            .markup
            .starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="1000" height="142""#));
    }

    #[test]
    fn test_compose_is_deterministic() {
        let selection = selection_of(&["Montserrat", "Parisienne"]);
        let spec = monogram(MonogramMode::Circular);
        let a = compose(Some(&spec), &selection, "Hello\nWorld", "n", 30.0).unwrap();
        let b = compose(Some(&spec), &selection, "Hello\nWorld", "n", 30.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_font_size_is_clamped() {
        let selection = selection_of(&["Montserrat"]);
        let doc = compose(None, &selection, "x", "", 1000.0).unwrap();
        assert!(doc.markup.contains(r#"font-size="200""#));
    }

    #[test]
    fn test_non_finite_sizes_fall_back_to_defaults() {
        let selection = selection_of(&["Montserrat"]);
        let mut spec = monogram(MonogramMode::Circular);
        spec.size = f32::NAN;

        let doc = compose(Some(&spec), &selection, "hi", "", f32::NAN).unwrap();
        assert!(!doc.markup.contains("NaN"));
        assert!(doc.height.is_finite());
        assert!(doc.markup.contains(r#"font-size="36""#));
        assert!(doc.markup.contains(r#"font-size="96""#));

        let doc = compose(None, &selection, "hi", "", f32::INFINITY).unwrap();
        assert!(!doc.markup.contains("inf"));
        assert!(doc.markup.contains(r#"font-size="36""#));
    }

    #[test]
    fn test_monogram_initials_are_escaped() {
        let mut spec = monogram(MonogramMode::Circular);
        spec.initials = ['&', '<', '>'];
        let doc = compose(Some(&spec), &Selection::new(), "", "", 32.0).unwrap();

        assert!(doc.markup.contains(">&amp;</text>"));
        assert!(doc.markup.contains(">&lt;</text>"));
        assert!(doc.markup.contains(">&gt;</text>"));
        assert!(!doc.markup.contains("><</text>"));
    }

    #[test]
    fn test_blank_note_lines_between_rows_are_skipped() {
        let selection = selection_of(&["Montserrat"]);
        let doc = compose(None, &selection, "Hi", "Gold foil\n   \n\nNo rush", 32.0).unwrap();
        // font label + row, notes label + two rows
        assert_eq!(text_elements(&doc), 5);
        assert!(doc.markup.contains(">Gold foil<"));
        assert!(doc.markup.contains(">No rush<"));
    }

    #[test]
    fn test_escape_attr_handles_quotes() {
        assert_eq!(escape_attr(r#"a"b&c"#), "a&quot;b&amp;c");
        assert!(matches!(escape_text("plain"), Cow::Borrowed(_)));
    }
}
