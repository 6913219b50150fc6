use crate::config::RenderConfig;
use crate::geometry::Point;
use crate::model::{Element, Geometry};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

const MARGIN: f32 = 40.0;

pub fn render_svg(elements: &[Element], theme: &Theme, config: &RenderConfig) -> String {
    let bounds = canvas_bounds(elements, config);
    let CanvasBounds {
        min_x,
        min_y,
        width,
        height,
    } = bounds;
    let mut svg = String::new();

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"{min_x} {min_y} {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<rect x=\"{min_x}\" y=\"{min_y}\" width=\"{width}\" height=\"{height}\" fill=\"{}\"/>",
        config.background
    ));

    svg.push_str("<defs>");
    svg.push_str(&format!(
        "<marker id=\"arrow\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"6\" markerHeight=\"6\" orient=\"auto-start-reverse\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"{}\"/></marker>",
        theme.line_color
    ));
    svg.push_str("</defs>");

    // Hub first, then connectors, then labels on top.
    for element in elements {
        if let Geometry::Ellipse {
            origin,
            width,
            height,
        } = element.geometry
        {
            svg.push_str(&format!(
                "<ellipse id=\"{}\" cx=\"{:.2}\" cy=\"{:.2}\" rx=\"{:.2}\" ry=\"{:.2}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
                escape_xml(element.id.as_str()),
                origin.x + width / 2.0,
                origin.y + height / 2.0,
                width / 2.0,
                height / 2.0,
                theme.hub_fill,
                theme.hub_stroke,
                theme.hub_stroke_width
            ));
        }
    }

    for element in elements {
        if let Geometry::Arrow {
            start,
            end,
            arrowhead_end,
        } = element.geometry
        {
            let marker = if arrowhead_end { " marker-end=\"url(#arrow)\"" } else { "" };
            svg.push_str(&format!(
                "<path id=\"{}\" d=\"M {:.2} {:.2} L {:.2} {:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"{marker}/>",
                escape_xml(element.id.as_str()),
                start.x,
                start.y,
                end.x,
                end.y,
                theme.line_color,
                theme.line_width
            ));
        }
    }

    for element in elements {
        if let Geometry::Text { position, text } = &element.geometry {
            svg.push_str(&format!(
                "<text id=\"{}\" x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
                escape_xml(element.id.as_str()),
                position.x,
                position.y,
                escape_xml(&theme.font_family),
                theme.font_size,
                theme.text_color,
                escape_xml(text)
            ));
        }
    }

    svg.push_str("</svg>");
    svg
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct CanvasBounds {
    min_x: f32,
    min_y: f32,
    width: f32,
    height: f32,
}

/// Grows the configured canvas in every direction so that each element fits with a margin.
fn canvas_bounds(elements: &[Element], config: &RenderConfig) -> CanvasBounds {
    let mut min_x: f32 = 0.0;
    let mut min_y: f32 = 0.0;
    let mut max_x = config.width;
    let mut max_y = config.height;
    for element in elements {
        let (low, high) = match &element.geometry {
            Geometry::Ellipse {
                origin,
                width,
                height,
            } => (*origin, origin.offset(*width, *height)),
            Geometry::Text { position, .. } => (*position, *position),
            Geometry::Arrow { start, end, .. } => (
                Point::new(start.x.min(end.x), start.y.min(end.y)),
                Point::new(start.x.max(end.x), start.y.max(end.y)),
            ),
        };
        if low.x.is_finite() && high.x.is_finite() {
            min_x = min_x.min(low.x - MARGIN);
            max_x = max_x.max(high.x + MARGIN);
        }
        if low.y.is_finite() && high.y.is_finite() {
            min_y = min_y.min(low.y - MARGIN);
            max_y = max_y.max(high.y + MARGIN);
        }
    }
    let min_x = min_x.floor();
    let min_y = min_y.floor();
    CanvasBounds {
        min_x,
        min_y,
        width: max_x.ceil() - min_x,
        height: max_y.ceil() - min_y,
    }
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Inter".to_string();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .ok_or_else(|| anyhow::anyhow!("Invalid render size"))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
