//! `revision-core-render` - heat-map rendering helpers for `revision-core` attribution spans.
//!
//! The engine only produces `{start, end, origin}` spans. This crate slices the next snapshot by
//! those spans, tags each slice with a style id the host theme maps to a color, and renders a
//! self-contained HTML fragment for web views.

use revision_core::{DiffSpan, Origin, SpanError, build_diff_spans, validate_spans};
use std::fmt::Write as _;

/// A style identifier. Only an identifier; the UI/theme layer maps it to actual colors.
pub type StyleId = u32;

/// Default `StyleId` constants for heat-map segments.
pub const HEAT_STYLE_USER: StyleId = 0x0300_0001;
pub const HEAT_STYLE_AI: StyleId = 0x0300_0002;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeatMapStyles {
    pub user: StyleId,
    pub ai: StyleId,
}

impl Default for HeatMapStyles {
    fn default() -> Self {
        Self {
            user: HEAT_STYLE_USER,
            ai: HEAT_STYLE_AI,
        }
    }
}

impl HeatMapStyles {
    pub fn style_for(&self, origin: Origin) -> StyleId {
        match origin {
            Origin::User => self.user,
            Origin::Ai => self.ai,
        }
    }
}

/// One styled slice of the next snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeatSegment<'a> {
    /// The slice of text.
    pub text: &'a str,
    /// Who produced it.
    pub origin: Origin,
    /// Theme style for `origin`.
    pub style_id: StyleId,
}

/// Slice `next` by `spans`.
///
/// Fails if the spans do not tile `next` exactly; nothing is sliced in that case.
pub fn segments<'a>(
    next: &'a str,
    spans: &[DiffSpan],
    styles: HeatMapStyles,
) -> Result<Vec<HeatSegment<'a>>, SpanError> {
    validate_spans(spans, next)?;

    // Byte offset of every char boundary, including the end of the text.
    let mut boundaries: Vec<usize> = next.char_indices().map(|(i, _)| i).collect();
    boundaries.push(next.len());

    Ok(spans
        .iter()
        .map(|span| HeatSegment {
            text: &next[boundaries[span.start]..boundaries[span.end]],
            origin: span.origin,
            style_id: styles.style_for(span.origin),
        })
        .collect())
}

/// Diff two snapshots and slice the next one in a single call.
pub fn heat_map<'a>(previous: &str, next: &'a str, styles: HeatMapStyles) -> Vec<HeatSegment<'a>> {
    let spans = build_diff_spans(previous, next);
    segments(next, &spans, styles).unwrap_or_else(|_| unstyled(next, styles))
}

fn unstyled(next: &str, styles: HeatMapStyles) -> Vec<HeatSegment<'_>> {
    if next.is_empty() {
        return Vec::new();
    }
    vec![HeatSegment {
        text: next,
        origin: Origin::User,
        style_id: styles.user,
    }]
}

/// CSS classes and labels used by [`render_html`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlOptions {
    pub container_class: String,
    pub user_class: String,
    pub ai_class: String,
    pub user_title: String,
    pub ai_title: String,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            container_class: "whitespace-pre-wrap font-mono leading-6".to_string(),
            user_class: "px-0.5 rounded bg-green-100 dark:bg-green-900/80".to_string(),
            ai_class: "px-0.5 rounded bg-red-100 dark:bg-red-900/80".to_string(),
            user_title: "Your edit".to_string(),
            ai_title: "AI suggestion".to_string(),
        }
    }
}

/// Render an HTML fragment with one `<span data-origin="...">` per span.
///
/// If `spans` fail validation, `next` is rendered raw and unstyled inside the container. The
/// output depends only on the arguments.
pub fn render_html(next: &str, spans: &[DiffSpan], options: &HtmlOptions) -> String {
    let mut out = String::with_capacity(next.len() * 2 + 64);
    let _ = write!(out, r#"<p class="{}">"#, escape_html(&options.container_class));

    match segments(next, spans, HeatMapStyles::default()) {
        Ok(segments) => {
            for segment in segments {
                let (class, title) = match segment.origin {
                    Origin::User => (&options.user_class, &options.user_title),
                    Origin::Ai => (&options.ai_class, &options.ai_title),
                };
                let _ = write!(
                    out,
                    r#"<span class="{}" data-origin="{}" title="{}">{}</span>"#,
                    escape_html(class),
                    segment.origin,
                    escape_html(title),
                    escape_html(segment.text),
                );
            }
        }
        Err(_) => out.push_str(&escape_html(next)),
    }

    out.push_str("</p>");
    out
}

/// Escape text for use in HTML content and double-quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
