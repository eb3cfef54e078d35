//! SVG adapter: paints a [`RenderedView`] as a standalone SVG document.

use syncline_protocol::{Point, Primitive, TextAlign, ThemeToken};

use crate::timeline::RenderedView;
use crate::views::legend::{LegendEntry, Swatch};

const LEGEND_ROW: f64 = 24.0;
const ARROW_HEAD: f64 = 8.0;
/// Fill opacity of markers outside the hovered trace.
const FADED_MARKER_OPACITY: f64 = 0.2;
const SELECTION_OPACITY: f64 = 0.25;

/// Render one frame as an SVG document string.
///
/// The legend is drawn in a row below the scene. `dark` selects the palette
/// for theme tokens; event colors come straight from the color map.
pub fn render_svg(view: &RenderedView, dark: bool) -> String {
    let scene = &view.scene;
    let width = scene.width;
    let height = scene.height + LEGEND_ROW;

    let mut svg = String::with_capacity(scene.primitives.len() * 160 + 512);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" style="font-family:system-ui,-apple-system,sans-serif;font-size:11px">"#,
    ));
    svg.push_str(&format!(
        r#"<rect width="{width}" height="{height}" fill="{}"/>"#,
        resolve_color(ThemeToken::Background, dark),
    ));

    for primitive in &scene.primitives {
        match primitive {
            Primitive::Lifeline {
                participant,
                label,
                from,
                to,
            } => {
                svg.push_str(&format!(
                    r#"<line class="lifeline" data-participant="{}" x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="1"/>"#,
                    escape_xml(participant),
                    from.x,
                    from.y,
                    to.x,
                    to.y,
                    resolve_color(ThemeToken::Lifeline, dark),
                ));
                svg.push_str(&format!(
                    r#"<text x="{}" y="{}" fill="{}">{}</text>"#,
                    from.x + 4.0,
                    from.y - 6.0,
                    resolve_color(ThemeToken::LaneLabel, dark),
                    escape_xml(label),
                ));
            }
            Primitive::Section {
                pairing_key,
                rect,
                color,
                opacity,
            } => {
                svg.push_str(&format!(
                    r#"<rect class="section" data-pairing-key="{}" x="{}" y="{}" width="{}" height="{}" fill="{}" fill-opacity="{opacity}" rx="2"/>"#,
                    escape_xml(pairing_key),
                    rect.x,
                    rect.y,
                    rect.w,
                    rect.h,
                    escape_xml(color),
                ));
            }
            Primitive::Arrow {
                pairing_key,
                kind,
                from,
                to,
                color,
                visible,
            } => {
                let visibility = if *visible { "visible" } else { "hidden" };
                let color = escape_xml(color);
                svg.push_str(&format!(
                    r#"<g class="arrow" data-pairing-key="{}" data-kind="{kind}" visibility="{visibility}"><line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{color}" stroke-width="1.5"/><polygon points="{}" fill="{color}"/></g>"#,
                    escape_xml(pairing_key),
                    from.x,
                    from.y,
                    to.x,
                    to.y,
                    arrow_head(*from, *to),
                ));
            }
            Primitive::Marker {
                key,
                center,
                radius,
                color,
                faded,
                ..
            } => {
                let opacity = if *faded { FADED_MARKER_OPACITY } else { 1.0 };
                svg.push_str(&format!(
                    r#"<circle class="marker" data-key="{}" cx="{}" cy="{}" r="{radius}" fill="{}" fill-opacity="{opacity}"/>"#,
                    escape_xml(&key.to_string()),
                    center.x,
                    center.y,
                    escape_xml(color),
                ));
            }
            Primitive::Label {
                position,
                text,
                color,
                font_size,
                align,
            } => {
                let anchor = match align {
                    TextAlign::Left => "start",
                    TextAlign::Center => "middle",
                    TextAlign::Right => "end",
                };
                svg.push_str(&format!(
                    r#"<text x="{}" y="{}" fill="{}" font-size="{font_size}" text-anchor="{anchor}">{}</text>"#,
                    position.x,
                    position.y,
                    resolve_color(*color, dark),
                    escape_xml(text),
                ));
            }
        }
    }

    if let Some(rect) = view.selection {
        svg.push_str(&format!(
            r#"<rect class="selection" x="{}" y="{}" width="{}" height="{}" fill="{}" fill-opacity="{SELECTION_OPACITY}" stroke="{}"/>"#,
            rect.x,
            rect.y,
            rect.w,
            rect.h,
            resolve_color(ThemeToken::SelectionFill, dark),
            resolve_color(ThemeToken::SelectionBorder, dark),
        ));
    }

    render_legend(&mut svg, view, dark);

    if let Some(tooltip) = &view.tooltip {
        let line_height = 14.0;
        let longest = tooltip
            .lines
            .iter()
            .flat_map(|l| l.lines())
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0);
        let rows: Vec<&str> = tooltip.lines.iter().flat_map(|l| l.lines()).collect();
        let (x, y) = (tooltip.position.x, tooltip.position.y);
        svg.push_str(&format!(
            r#"<g class="tooltip"><rect x="{x}" y="{y}" width="{}" height="{}" fill="{}" rx="3"/>"#,
            longest as f64 * 6.5 + 12.0,
            rows.len() as f64 * line_height + 8.0,
            resolve_color(ThemeToken::TooltipBackground, dark),
        ));
        for (i, row) in rows.iter().enumerate() {
            svg.push_str(&format!(
                r#"<text x="{}" y="{}" fill="{}">{}</text>"#,
                x + 6.0,
                y + 4.0 + (i as f64 + 1.0) * line_height - 3.0,
                resolve_color(ThemeToken::TooltipText, dark),
                escape_xml(row),
            ));
        }
        svg.push_str("</g>");
    }

    svg.push_str("</svg>");
    svg
}

fn render_legend(svg: &mut String, view: &RenderedView, dark: bool) {
    let y = view.scene.height + LEGEND_ROW / 2.0;
    let mut x = 8.0;

    let sync: &[LegendEntry] = if view.sync_legend_visible {
        &view.legend.sync
    } else {
        &[]
    };
    for entry in view.legend.primary.iter().chain(sync) {
        let color = escape_xml(&entry.color);
        match entry.swatch {
            Swatch::Dot => svg.push_str(&format!(
                r#"<circle cx="{}" cy="{y}" r="5" fill="{color}"/>"#,
                x + 5.0
            )),
            Swatch::Arrow => svg.push_str(&format!(
                r#"<line x1="{x}" y1="{y}" x2="{}" y2="{y}" stroke="{color}" stroke-width="1.5"/><polygon points="{}" fill="{color}"/>"#,
                x + 10.0,
                arrow_head(Point::new(x, y), Point::new(x + 12.0, y)),
            )),
            Swatch::Rectangle => svg.push_str(&format!(
                r#"<rect x="{x}" y="{}" width="12" height="8" fill="{color}" fill-opacity="0.6"/>"#,
                y - 4.0
            )),
        }
        svg.push_str(&format!(
            r#"<text x="{}" y="{}" fill="{}">{}</text>"#,
            x + 16.0,
            y + 4.0,
            resolve_color(ThemeToken::AxisText, dark),
            escape_xml(&entry.label),
        ));
        x += 16.0 + entry.label.chars().count() as f64 * 6.5 + 14.0;
    }
}

/// Triangle with its tip on `to`, pointing away from `from`.
fn arrow_head(from: Point, to: Point) -> String {
    let (dx, dy) = (to.x - from.x, to.y - from.y);
    let len = dx.hypot(dy);
    if len <= f64::EPSILON {
        return format!("{},{}", to.x, to.y);
    }
    let (ux, uy) = (dx / len, dy / len);
    let base = Point::new(to.x - ux * ARROW_HEAD, to.y - uy * ARROW_HEAD);
    let half = ARROW_HEAD / 2.0;
    format!(
        "{},{} {},{} {},{}",
        to.x,
        to.y,
        base.x - uy * half,
        base.y + ux * half,
        base.x + uy * half,
        base.y - ux * half,
    )
}

fn resolve_color(token: ThemeToken, dark: bool) -> &'static str {
    if dark {
        match token {
            ThemeToken::Background => "#181818",
            ThemeToken::Lifeline => "#424242",
            ThemeToken::LaneLabel => "#ececec",
            ThemeToken::AxisText => "#9e9e9e",
            ThemeToken::SelectionFill => "#448aff",
            ThemeToken::SelectionBorder => "#82b1ff",
            ThemeToken::TooltipBackground => "#303030",
            ThemeToken::TooltipText => "#ececec",
        }
    } else {
        match token {
            ThemeToken::Background => "#ffffff",
            ThemeToken::Lifeline => "#dee2e6",
            ThemeToken::LaneLabel => "#1a1a2e",
            ThemeToken::AxisText => "#666677",
            ThemeToken::SelectionFill => "#74c0fc",
            ThemeToken::SelectionBorder => "#1c7ed6",
            ThemeToken::TooltipBackground => "#212529",
            ThemeToken::TooltipText => "#f8f9fa",
        }
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
