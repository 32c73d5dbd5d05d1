//! SVG output.
//!
//! Pure functions of the layout structs plus viewport/interaction state. The
//! viewport transform is carried by a single root group; everything inside is
//! drawn in content space.

use crate::interaction::Interaction;
use crate::model::{Bounds, CredentialDiagramLayout, VineDiagramLayout};
use arbor_core::{ConnectionKind, RelationKind};
use arbor_layout::viewport::Viewport;
use std::fmt::Write as _;

#[derive(Debug, Clone)]
pub struct SvgRenderOptions {
    /// Adds extra space around the computed viewBox.
    pub viewbox_padding: f64,
    /// Optional diagram id used to prefix internal element ids.
    pub diagram_id: Option<String>,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            viewbox_padding: 8.0,
            diagram_id: None,
        }
    }
}

fn fmt(v: f64) -> String {
    let v = if v == -0.0 { 0.0 } else { v };
    let mut buffer = ryu_js::Buffer::new();
    buffer.format_finite(v).to_string()
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

fn open_svg(out: &mut String, bounds: Bounds, options: &SvgRenderOptions) {
    let pad = options.viewbox_padding.max(0.0);
    let vb_min_x = bounds.min_x - pad;
    let vb_min_y = bounds.min_y - pad;
    let vb_w = (bounds.width() + pad * 2.0).max(1.0);
    let vb_h = (bounds.height() + pad * 2.0).max(1.0);

    let id_attr = options
        .diagram_id
        .as_deref()
        .map(|id| format!(r#" id="{}""#, escape_xml(id)))
        .unwrap_or_default();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg"{} viewBox="{} {} {} {}">"#,
        id_attr,
        fmt(vb_min_x),
        fmt(vb_min_y),
        fmt(vb_w),
        fmt(vb_h)
    );
}

const STYLE_BLOCK: &str = r#"<style>
.lane { stroke: #e5e7eb; stroke-width: 1; }
.lane-label { fill: #6b7280; font-family: ui-sans-serif, system-ui, sans-serif; font-size: 12px; text-anchor: middle; }
.band-marker { stroke: #d1d5db; stroke-width: 1; stroke-dasharray: 2 6; }
.band-symbol { fill: #6b7280; font-family: ui-sans-serif, system-ui, sans-serif; font-size: 12px; }
.connection { fill: none; stroke-width: 1.5; }
.connection.successor { stroke: #374151; }
.connection.predecessor { stroke: #374151; }
.connection.cross_link { stroke: #9ca3af; stroke-dasharray: 5 4; }
.relation { fill: none; }
.relation.part-of { stroke: #374151; stroke-width: 2; }
.relation.prereq { stroke: #1f2937; stroke-width: 1.5; }
.relation.recommended { stroke: #6b7280; stroke-width: 1.5; stroke-dasharray: 6 4; }
.relation.coreq { stroke: #6b7280; stroke-width: 1.5; stroke-dasharray: 2 3; }
.node { stroke: #ffffff; stroke-width: 2; }
.node.hovered { stroke: #111827; }
.node.selected { stroke: #111827; stroke-width: 3; }
.node-label { fill: #1f2937; font-family: ui-sans-serif, system-ui, sans-serif; font-size: 11px; text-anchor: middle; }
.card { stroke: #ffffff; stroke-width: 1.5; rx: 6; }
.card.hovered { stroke: #111827; }
.card.selected { stroke: #111827; stroke-width: 3; }
.braid { fill-opacity: 0.25; stroke: none; rx: 12; }
.highlight { fill: none; stroke: #f59e0b; stroke-width: 2; }
.placeholder { fill: #6b7280; font-family: ui-sans-serif, system-ui, sans-serif; font-size: 14px; text-anchor: middle; }
</style>
"#;

fn open_viewport_group(out: &mut String, viewport: Option<&Viewport>) {
    match viewport {
        Some(vp) => {
            let offset = vp.offset();
            let _ = writeln!(
                out,
                r#"<g class="viewport" transform="translate({} {}) scale({})">"#,
                fmt(offset.x),
                fmt(offset.y),
                fmt(vp.scale())
            );
        }
        None => {
            out.push_str("<g class=\"viewport\">\n");
        }
    }
}

fn connection_class(kind: ConnectionKind) -> &'static str {
    match kind {
        ConnectionKind::Predecessor => "predecessor",
        ConnectionKind::Successor => "successor",
        ConnectionKind::CrossLink => "cross_link",
    }
}

fn relation_class(kind: RelationKind) -> &'static str {
    match kind {
        RelationKind::PartOf => "part-of",
        RelationKind::Prereq => "prereq",
        RelationKind::Recommended => "recommended",
        RelationKind::Coreq => "coreq",
    }
}

fn state_class(interaction: &Interaction, id: &str) -> &'static str {
    if interaction.is_selected(id) {
        " selected"
    } else if interaction.is_hovered(id) {
        " hovered"
    } else {
        ""
    }
}

pub fn render_vine_svg(
    layout: &VineDiagramLayout,
    viewport: Option<&Viewport>,
    interaction: &Interaction,
    options: &SvgRenderOptions,
) -> String {
    let mut out = String::new();
    open_svg(&mut out, layout.bounds, options);
    out.push_str(STYLE_BLOCK);
    open_viewport_group(&mut out, viewport);

    out.push_str(r#"<g class="lanes">"#);
    for lane in &layout.lanes {
        let _ = write!(
            &mut out,
            r#"<line class="lane" x1="{x}" y1="{y1}" x2="{x}" y2="{y2}" />"#,
            x = fmt(lane.x),
            y1 = fmt(layout.bounds.min_y),
            y2 = fmt(layout.bounds.max_y),
        );
        let _ = write!(
            &mut out,
            r#"<text class="lane-label" x="{}" y="{}" fill="{}">{}</text>"#,
            fmt(lane.x),
            fmt(layout.bounds.min_y - 8.0),
            lane.color,
            escape_xml(&lane.vine)
        );
    }
    out.push_str("</g>\n");

    out.push_str(r#"<g class="bands">"#);
    for marker in &layout.band_markers {
        let _ = write!(
            &mut out,
            r#"<line class="band-marker" x1="{}" y1="{y}" x2="{}" y2="{y}" />"#,
            fmt(layout.bounds.min_x),
            fmt(layout.bounds.max_x),
            y = fmt(marker.y),
        );
        let _ = write!(
            &mut out,
            r#"<text class="band-symbol" x="{}" y="{}">{} {}</text>"#,
            fmt(layout.bounds.min_x),
            fmt(marker.y - 4.0),
            escape_xml(&marker.symbol),
            escape_xml(&marker.band)
        );
    }
    out.push_str("</g>\n");

    out.push_str(r#"<g class="braids">"#);
    for braid in &layout.braids {
        let _ = write!(
            &mut out,
            r#"<rect class="braid" x="{}" y="{}" width="{}" height="{}" fill="{}"><title>{}</title></rect>"#,
            fmt(braid.bounds.min_x),
            fmt(braid.bounds.min_y),
            fmt(braid.bounds.width()),
            fmt(braid.bounds.height()),
            braid.color,
            escape_xml(&braid.name)
        );
    }
    out.push_str("</g>\n");

    out.push_str(r#"<g class="connections">"#);
    for c in &layout.connections {
        let width = 1.0 + c.strength.unwrap_or(0.5).clamp(0.0, 1.0);
        let _ = write!(
            &mut out,
            r#"<line class="connection {}" x1="{}" y1="{}" x2="{}" y2="{}" stroke-width="{}" />"#,
            connection_class(c.kind),
            fmt(c.x1),
            fmt(c.y1),
            fmt(c.x2),
            fmt(c.y2),
            fmt(width)
        );
    }
    out.push_str("</g>\n");

    out.push_str(r#"<g class="nodes">"#);
    for node in &layout.nodes {
        let _ = write!(
            &mut out,
            r#"<circle class="node{}" cx="{}" cy="{}" r="{}" fill="{}" data-id="{}" />"#,
            state_class(interaction, &node.id),
            fmt(node.x),
            fmt(node.y),
            fmt(node.radius),
            node.color,
            escape_xml(&node.id)
        );
        let _ = write!(
            &mut out,
            r#"<text class="node-label" x="{}" y="{}">{}</text>"#,
            fmt(node.x),
            fmt(node.y + node.radius + 14.0),
            escape_xml(&node.title)
        );
        if interaction.is_selected(&node.id) {
            let _ = write!(
                &mut out,
                r#"<circle class="highlight" cx="{}" cy="{}" r="{}" />"#,
                fmt(node.x),
                fmt(node.y),
                fmt(node.radius + 6.0)
            );
        }
    }
    out.push_str("</g>\n");

    out.push_str("</g>\n</svg>\n");
    out
}

pub fn render_credential_svg(
    layout: &CredentialDiagramLayout,
    viewport: Option<&Viewport>,
    interaction: &Interaction,
    options: &SvgRenderOptions,
) -> String {
    let mut out = String::new();
    open_svg(&mut out, layout.bounds, options);
    out.push_str(STYLE_BLOCK);
    open_viewport_group(&mut out, viewport);

    out.push_str(r#"<g class="relations">"#);
    for r in &layout.relations {
        let _ = write!(
            &mut out,
            r#"<line class="relation {}" x1="{}" y1="{}" x2="{}" y2="{}" />"#,
            relation_class(r.kind),
            fmt(r.x1),
            fmt(r.y1),
            fmt(r.x2),
            fmt(r.y2)
        );
    }
    out.push_str("</g>\n");

    out.push_str(r#"<g class="cards">"#);
    for node in &layout.nodes {
        let _ = write!(
            &mut out,
            r#"<rect class="card{}" x="{}" y="{}" width="{}" height="{}" fill="{}" data-id="{}" />"#,
            state_class(interaction, &node.id),
            fmt(node.x - node.width / 2.0),
            fmt(node.y - node.height / 2.0),
            fmt(node.width),
            fmt(node.height),
            node.color,
            escape_xml(&node.id)
        );
        let _ = write!(
            &mut out,
            r#"<text class="node-label" x="{}" y="{}">{}</text>"#,
            fmt(node.x),
            fmt(node.y + 4.0),
            escape_xml(&node.title)
        );
    }
    out.push_str("</g>\n");

    out.push_str("</g>\n</svg>\n");
    out
}

/// Fallback surface for the data-unavailable and layout-absent states.
pub fn render_placeholder_svg(message: &str, width: f64, height: f64) -> String {
    let mut out = String::new();
    let _ = writeln!(
        &mut out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}">"#,
        fmt(width.max(1.0)),
        fmt(height.max(1.0))
    );
    out.push_str(STYLE_BLOCK);
    let _ = writeln!(
        &mut out,
        r#"<text class="placeholder" x="{}" y="{}">{}</text>"#,
        fmt(width / 2.0),
        fmt(height / 2.0),
        escape_xml(message)
    );
    out.push_str("</svg>\n");
    out
}
