use crate::config::load_config;
use crate::diagram::Diagram;
use crate::geometry::Point;
use crate::layout_dump::write_layout_dump;
use crate::model::{Element, ElementId, Geometry, Role, SpokeCount};
use crate::render::{render_svg, write_output_svg};
use crate::surface::{Canvas, Surface};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "spokes", version, about = "Hub-and-spoke radial layout renderer")]
pub struct Args {
    /// Initial spoke count (2-6). Defaults to the config value.
    #[arg(short = 'n', long = "count")]
    pub count: Option<usize>,

    /// Add this many spokes after mounting (stops at 6)
    #[arg(long = "add", default_value_t = 0)]
    pub add: usize,

    /// Remove this many spokes after adding (stops at 2)
    #[arg(long = "remove", default_value_t = 0)]
    pub remove: usize,

    /// Move the hub's top-left corner to X,Y
    #[arg(long = "move-hub", value_parser = parse_point)]
    pub move_hub: Option<Point>,

    /// Drag a label: INDEX=X,Y (repeatable)
    #[arg(long = "drag", value_parser = parse_drag)]
    pub drag: Vec<(usize, Point)>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Write the final hub and spoke positions as JSON
    #[arg(long = "dump")]
    pub dump: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(count) = args.count {
        if SpokeCount::new(count).is_none() {
            anyhow::bail!(crate::Error::SpokeCountOutOfRange(count));
        }
        config.layout.initial_count = count;
    }

    let mut diagram = Diagram::mount(Canvas::new(), config.layout.clone())?;
    for _ in 0..args.add {
        if !diagram.add_spoke()? {
            info!("already at {} spokes", SpokeCount::MAX);
            break;
        }
    }
    for _ in 0..args.remove {
        if !diagram.remove_spoke()? {
            info!("already at {} spokes", SpokeCount::MIN);
            break;
        }
    }

    if let Some(origin) = args.move_hub {
        move_hub(diagram.surface_mut(), origin)?;
    }
    for (index, position) in &args.drag {
        drag_label(diagram.surface_mut(), *index, *position)?;
    }

    let elements = diagram.surface().elements();
    if let Some(path) = args.dump.as_deref() {
        write_layout_dump(path, &elements)
            .with_context(|| format!("failed to write layout dump to {}", path.display()))?;
    }

    let svg = render_svg(&elements, &config.theme, &config.render);
    match args.output_format {
        OutputFormat::Svg => write_output_svg(&svg, args.output.as_deref())?,
        OutputFormat::Png => write_png(&svg, args.output.as_deref(), &config.render)?,
    }
    Ok(())
}

#[cfg(feature = "png")]
fn write_png(
    svg: &str,
    output: Option<&Path>,
    render: &crate::config::RenderConfig,
) -> Result<()> {
    let output = output.ok_or_else(|| anyhow::anyhow!("Output path required for png output"))?;
    crate::render::write_output_png(svg, output, render)
}

#[cfg(not(feature = "png"))]
fn write_png(
    _svg: &str,
    _output: Option<&Path>,
    _render: &crate::config::RenderConfig,
) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn move_hub(surface: &mut dyn Surface, origin: Point) -> Result<()> {
    let hub = surface
        .find_element(&|element: &Element| element.role == Role::Hub)
        .ok_or_else(|| anyhow::anyhow!("diagram has no hub"))?;
    let Geometry::Ellipse { width, height, .. } = hub.geometry else {
        anyhow::bail!("hub is not an ellipse");
    };
    surface.update_element(
        &hub.id,
        Geometry::Ellipse {
            origin,
            width,
            height,
        },
    )?;
    Ok(())
}

fn drag_label(surface: &mut dyn Surface, index: usize, position: Point) -> Result<()> {
    let label = surface
        .find_element(&|element: &Element| {
            element.role == Role::Label && element.spoke_index == Some(index)
        })
        .ok_or_else(|| anyhow::anyhow!("no label for spoke {index}"))?;
    let Geometry::Text { text, .. } = label.geometry else {
        anyhow::bail!("{} is not a text element", ElementId::label(index));
    };
    surface.update_element(&label.id, Geometry::Text { position, text })?;
    Ok(())
}

fn parse_point(value: &str) -> Result<Point, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{value}'"))?;
    let x = x.trim().parse::<f32>().map_err(|err| format!("bad x '{x}': {err}"))?;
    let y = y.trim().parse::<f32>().map_err(|err| format!("bad y '{y}': {err}"))?;
    if !x.is_finite() || !y.is_finite() {
        return Err(format!("coordinates must be finite, got '{value}'"));
    }
    Ok(Point::new(x, y))
}

fn parse_drag(value: &str) -> Result<(usize, Point), String> {
    let (index, point) = value
        .split_once('=')
        .ok_or_else(|| format!("expected INDEX=X,Y but got '{value}'"))?;
    let index = index
        .trim()
        .parse::<usize>()
        .map_err(|err| format!("bad index '{index}': {err}"))?;
    Ok((index, parse_point(point)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;

    #[test]
    fn parses_points_and_drags() {
        assert_eq!(parse_point("10, -2.5"), Ok(Point::new(10.0, -2.5)));
        assert!(parse_point("10").is_err());
        assert!(parse_point("NaN,1").is_err());
        assert!(parse_point("1,inf").is_err());
        assert!(parse_drag("0=-inf,0").is_err());
        assert_eq!(parse_drag("2=1,2"), Ok((2, Point::new(1.0, 2.0))));
        assert!(parse_drag("x=1,2").is_err());
    }

    #[test]
    fn args_collect_repeated_drags() {
        let args = Args::try_parse_from([
            "spokes", "-n", "4", "--drag", "0=1,1", "--drag", "3=5,5", "--move-hub", "0,0",
        ])
        .unwrap();
        assert_eq!(args.count, Some(4));
        assert_eq!(args.drag.len(), 2);
        assert_eq!(args.move_hub, Some(Point::new(0.0, 0.0)));
    }

    #[test]
    fn edits_flow_through_the_live_controller() {
        let mut diagram = Diagram::mount(Canvas::new(), LayoutConfig::default()).unwrap();
        move_hub(diagram.surface_mut(), Point::new(0.0, 0.0)).unwrap();
        drag_label(diagram.surface_mut(), 1, Point::new(50.0, 200.0)).unwrap();
        let canvas = diagram.surface();
        let connector = canvas.get(&ElementId::connector(1)).unwrap();
        let Geometry::Arrow { start, end, .. } = connector.geometry else {
            panic!("connector without arrow geometry");
        };
        assert_eq!(end, Point::new(50.0, 200.0));
        assert!((start.x - 50.0).abs() < 1e-3);
        assert!((start.y - 100.0).abs() < 1e-3);
        assert!(drag_label(diagram.surface_mut(), 7, Point::default()).is_err());
    }
}
