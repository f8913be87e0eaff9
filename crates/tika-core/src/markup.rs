//! Ordered markup buffer for annotated pane content
//!
//! A pane's content persists as an HTML-like markup string: plain text
//! interleaved with highlight spans. A highlight serializes as
//!
//! ```text
//! <span class="hl-node hl-2"><span class="hl-num">3</span>text<span class="del-btn"> × </span></span>
//! ```
//!
//! The parser accepts both generations of the format (documents written
//! before the number marker existed have no `hl-num` span) plus the debris
//! a contenteditable surface leaves behind: `<div>` line wrappers, `<br/>`
//! variants, stray tags, character entities. Parsing never fails; anything
//! unrecognized degrades to plain text or is dropped.

use serde::{Deserialize, Serialize};

/// One run of pane content: plain text or a highlighted span.
///
/// Buffers are kept in normal form: no empty text runs, no two adjacent
/// text runs. [`normalize`] restores the form after splicing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Segment {
    Text(String),
    Highlight(Highlight),
}

/// A highlighted span embedded in the buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    /// 1-based position among the pane's highlights in document order.
    /// Recomputed by the renumber pass after every structural change;
    /// never a stable identity.
    pub ordinal: usize,
    /// Palette slot. Also position-derived: `(ordinal - 1) % PALETTE_SIZE`.
    pub color_class: usize,
    /// The wrapped visible text.
    pub text: String,
}

impl Segment {
    /// Visible text of this run (markup markers carry no visible text).
    pub fn visible_str(&self) -> &str {
        match self {
            Segment::Text(t) => t,
            Segment::Highlight(h) => &h.text,
        }
    }

    /// Visible length in characters.
    pub fn visible_len(&self) -> usize {
        self.visible_str().chars().count()
    }
}

/// Concatenated visible text of a buffer.
pub fn visible_text(segments: &[Segment]) -> String {
    let mut out = String::new();
    for seg in segments {
        out.push_str(seg.visible_str());
    }
    out
}

/// Merge adjacent text runs and drop empty ones.
pub fn normalize(segments: &mut Vec<Segment>) {
    let mut out: Vec<Segment> = Vec::with_capacity(segments.len());
    for seg in segments.drain(..) {
        match seg {
            Segment::Text(t) if t.is_empty() => {}
            Segment::Text(t) => {
                if let Some(Segment::Text(prev)) = out.last_mut() {
                    prev.push_str(&t);
                } else {
                    out.push(Segment::Text(t));
                }
            }
            highlight => out.push(highlight),
        }
    }
    *segments = out;
}

/// Serialize a buffer to the markup wire format.
///
/// Every highlight is written with exactly one number marker and one
/// delete affordance. Newlines become `<br>`; `&`, `<`, `>` are escaped.
pub fn render(segments: &[Segment]) -> String {
    let mut out = String::new();
    for seg in segments {
        match seg {
            Segment::Text(t) => escape_into(&mut out, t),
            Segment::Highlight(h) => {
                out.push_str("<span class=\"hl-node hl-");
                out.push_str(&h.color_class.to_string());
                out.push_str("\"><span class=\"hl-num\">");
                out.push_str(&h.ordinal.to_string());
                out.push_str("</span>");
                escape_into(&mut out, &h.text);
                out.push_str("<span class=\"del-btn\"> × </span></span>");
            }
        }
    }
    out
}

fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\n' => out.push_str("<br>"),
            _ => out.push(c),
        }
    }
}

/// What a scanned tag means to the buffer.
enum Tag {
    /// `<span class="hl-node hl-K">`: start of a highlight span.
    HighlightOpen(usize),
    /// `<span class="hl-num">`: ordinal marker; its digits are markup,
    /// not content.
    NumOpen,
    /// `<span class="del-btn">`: delete affordance; same.
    DelOpen,
    /// Any other `<span ...>`.
    SpanOpen,
    /// `</span>`.
    SpanClose,
    /// `<br>` and variants.
    LineBreak,
    /// `<div>`: contenteditable line wrapper.
    DivOpen,
    /// Anything else; dropped.
    Other,
}

/// Parse a markup string into a buffer in normal form. Never fails.
pub fn parse(markup: &str) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();
    let mut text = String::new();
    let mut rest = markup;

    while !rest.is_empty() {
        match rest.find('<') {
            None => {
                decode_text_into(&mut text, rest);
                rest = "";
            }
            Some(lt) => {
                decode_text_into(&mut text, &rest[..lt]);
                rest = &rest[lt..];
                match read_tag(rest) {
                    None => {
                        // '<' that never closes: literal character
                        text.push('<');
                        rest = &rest[1..];
                    }
                    Some((tag, after)) => {
                        rest = after;
                        match classify(tag) {
                            Tag::HighlightOpen(color) => {
                                flush_text(&mut segments, &mut text);
                                let (highlight, after_body) = parse_highlight_body(rest, color);
                                segments.push(Segment::Highlight(highlight));
                                rest = after_body;
                            }
                            Tag::LineBreak => text.push('\n'),
                            Tag::DivOpen => {
                                // Line wrapper: a break, except at the very start
                                if !(text.is_empty() && segments.is_empty()) {
                                    text.push('\n');
                                }
                            }
                            // A marker span outside any highlight is debris
                            // from a hand-edited document: drop its text.
                            Tag::NumOpen | Tag::DelOpen => rest = span_text(rest).1,
                            Tag::SpanOpen | Tag::SpanClose | Tag::Other => {}
                        }
                    }
                }
            }
        }
    }

    flush_text(&mut segments, &mut text);
    segments
}

/// Scan the body of an `hl-node` span up to its matching close.
///
/// The `hl-num` marker yields the stored ordinal; the `del-btn` marker is
/// discarded; other nested spans contribute their text. An unclosed span
/// swallows the rest of the input as content.
fn parse_highlight_body(body: &str, color_class: usize) -> (Highlight, &str) {
    let mut text = String::new();
    let mut ordinal = 0usize;
    let mut depth = 0usize;
    let mut rest = body;

    while !rest.is_empty() {
        match rest.find('<') {
            None => {
                decode_text_into(&mut text, rest);
                rest = "";
            }
            Some(lt) => {
                decode_text_into(&mut text, &rest[..lt]);
                rest = &rest[lt..];
                match read_tag(rest) {
                    None => {
                        text.push('<');
                        rest = &rest[1..];
                    }
                    Some((tag, after)) => {
                        rest = after;
                        match classify(tag) {
                            Tag::SpanClose => {
                                if depth == 0 {
                                    return (
                                        Highlight {
                                            ordinal,
                                            color_class,
                                            text,
                                        },
                                        rest,
                                    );
                                }
                                depth -= 1;
                            }
                            Tag::NumOpen => {
                                let (digits, after_marker) = span_text(rest);
                                ordinal = digits.trim().parse().unwrap_or(0);
                                rest = after_marker;
                            }
                            Tag::DelOpen => rest = span_text(rest).1,
                            Tag::HighlightOpen(_) | Tag::SpanOpen => depth += 1,
                            Tag::LineBreak | Tag::DivOpen => text.push('\n'),
                            Tag::Other => {}
                        }
                    }
                }
            }
        }
    }

    (
        Highlight {
            ordinal,
            color_class,
            text,
        },
        rest,
    )
}

/// Consume input through the close of the span just opened, returning its
/// decoded text and the remaining input.
fn span_text(body: &str) -> (String, &str) {
    let mut text = String::new();
    let mut depth = 0usize;
    let mut rest = body;
    while !rest.is_empty() {
        match rest.find('<') {
            None => {
                decode_text_into(&mut text, rest);
                return (text, "");
            }
            Some(lt) => {
                decode_text_into(&mut text, &rest[..lt]);
                rest = &rest[lt..];
                match read_tag(rest) {
                    None => rest = &rest[1..],
                    Some((tag, after)) => {
                        rest = after;
                        match classify(tag) {
                            Tag::SpanClose => {
                                if depth == 0 {
                                    return (text, rest);
                                }
                                depth -= 1;
                            }
                            Tag::HighlightOpen(_) | Tag::NumOpen | Tag::DelOpen | Tag::SpanOpen => {
                                depth += 1
                            }
                            _ => {}
                        }
                    }
                }
            }
        }
    }
    (text, rest)
}

/// Read one `<...>` tag at the start of `rest`. Returns the tag interior
/// and the input after `>`. None when no `>` follows, or when the `<` is
/// not followed by an element name or `/`; that `<` is literal text.
fn read_tag(rest: &str) -> Option<(&str, &str)> {
    debug_assert!(rest.starts_with('<'));
    let opens_tag = rest[1..]
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '/');
    if !opens_tag {
        return None;
    }
    let gt = rest.find('>')?;
    Some((&rest[1..gt], &rest[gt + 1..]))
}

fn classify(tag: &str) -> Tag {
    let tag = tag.trim();
    if let Some(closing) = tag.strip_prefix('/') {
        if tag_name(closing).eq_ignore_ascii_case("span") {
            return Tag::SpanClose;
        }
        return Tag::Other;
    }
    let name = tag_name(tag);
    if name.eq_ignore_ascii_case("br") {
        Tag::LineBreak
    } else if name.eq_ignore_ascii_case("div") {
        Tag::DivOpen
    } else if name.eq_ignore_ascii_case("span") {
        match class_attr(tag) {
            Some(class) if class_list_contains(class, "hl-node") => {
                Tag::HighlightOpen(color_from_class(class))
            }
            Some(class) if class_list_contains(class, "hl-num") => Tag::NumOpen,
            Some(class) if class_list_contains(class, "del-btn") => Tag::DelOpen,
            _ => Tag::SpanOpen,
        }
    } else {
        Tag::Other
    }
}

/// Leading element name of a tag interior.
fn tag_name(tag: &str) -> &str {
    let end = tag
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(tag.len());
    &tag[..end]
}

/// The quoted value of a `class` attribute, if present.
fn class_attr(tag: &str) -> Option<&str> {
    let idx = tag.find("class=")?;
    let after = &tag[idx + "class=".len()..];
    let quote = after.chars().next()?;
    if quote != '"' && quote != '\'' {
        return None;
    }
    let inner = &after[1..];
    let close = inner.find(quote)?;
    Some(&inner[..close])
}

fn class_list_contains(class: &str, name: &str) -> bool {
    class.split_ascii_whitespace().any(|c| c == name)
}

/// Palette slot from an `hl-{digits}` class token; `hl-node`/`hl-num`
/// are not slot tokens. Missing or unparseable slots fall back to 0.
fn color_from_class(class: &str) -> usize {
    class
        .split_ascii_whitespace()
        .filter_map(|token| token.strip_prefix("hl-"))
        .filter_map(|suffix| suffix.parse::<usize>().ok())
        .next()
        .unwrap_or(0)
}

fn flush_text(segments: &mut Vec<Segment>, text: &mut String) {
    if text.is_empty() {
        return;
    }
    let run = std::mem::take(text);
    if let Some(Segment::Text(prev)) = segments.last_mut() {
        prev.push_str(&run);
    } else {
        segments.push(Segment::Text(run));
    }
}

/// Append `raw` to `out`, decoding character entities.
fn decode_text_into(out: &mut String, raw: &str) {
    let mut rest = raw;
    while !rest.is_empty() {
        match rest.find('&') {
            None => {
                out.push_str(rest);
                return;
            }
            Some(amp) => {
                out.push_str(&rest[..amp]);
                rest = &rest[amp..];
                match decode_entity(rest) {
                    Some((c, after)) => {
                        out.push(c);
                        rest = after;
                    }
                    None => {
                        out.push('&');
                        rest = &rest[1..];
                    }
                }
            }
        }
    }
}

/// Decode one entity at the start of `rest` (which begins with `&`).
fn decode_entity(rest: &str) -> Option<(char, &str)> {
    let semi = rest[1..].find(';')?;
    // Entities are short; a distant ';' means this '&' is literal text.
    if semi > 8 {
        return None;
    }
    let name = &rest[1..1 + semi];
    let after = &rest[semi + 2..];
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "nbsp" => ' ',
        "times" => '×',
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else if let Some(dec) = name.strip_prefix('#') {
                dec.parse::<u32>().ok()?
            } else {
                return None;
            };
            char::from_u32(code)?
        }
    };
    Some((c, after))
}
