use crate::Error;
use crate::geometry::Point;
use crate::layout::CollisionResolver;
use crate::layout::collision::{DEFAULT_ANGLE_STEP, DEFAULT_MAX_ITERATIONS, DEFAULT_MIN_SEPARATION};
use crate::model::SpokeCount;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubConfig {
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            x: 250.0,
            y: 250.0,
            size: 100.0,
        }
    }
}

impl HubConfig {
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub hub: HubConfig,
    pub spoke_radius: f32,
    pub min_separation: f32,
    pub max_iterations: usize,
    pub angle_step: f32,
    pub initial_count: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            hub: HubConfig::default(),
            spoke_radius: 150.0,
            min_separation: DEFAULT_MIN_SEPARATION,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            angle_step: DEFAULT_ANGLE_STEP,
            initial_count: SpokeCount::default().get(),
        }
    }
}

impl LayoutConfig {
    pub fn resolver(&self) -> CollisionResolver {
        CollisionResolver {
            min_separation: self.min_separation,
            max_iterations: self.max_iterations,
            angle_step: self.angle_step,
        }
    }

    pub fn initial_spoke_count(&self) -> Result<SpokeCount, Error> {
        SpokeCount::new(self.initial_count)
            .ok_or(Error::SpokeCountOutOfRange(self.initial_count))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::classic();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    hub_fill: Option<String>,
    hub_stroke: Option<String>,
    line_color: Option<String>,
    text_color: Option<String>,
    background: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HubConfigFile {
    x: Option<f32>,
    y: Option<f32>,
    size: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpokesConfigFile {
    radius: Option<f32>,
    min_separation: Option<f32>,
    max_iterations: Option<usize>,
    angle_step: Option<f32>,
    initial_count: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    hub: Option<HubConfigFile>,
    spokes: Option<SpokesConfigFile>,
    render: Option<RenderConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        match theme_name {
            "modern" => config.theme = Theme::modern(),
            "classic" | "default" => config.theme = Theme::classic(),
            other => anyhow::bail!("unknown theme: {other}"),
        }
        config.render.background = config.theme.background.clone();
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.hub_fill {
            config.theme.hub_fill = v;
        }
        if let Some(v) = vars.hub_stroke {
            config.theme.hub_stroke = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.background {
            config.render.background = v.clone();
            config.theme.background = v;
        }
    }

    if let Some(hub) = parsed.hub {
        if let Some(v) = hub.x {
            config.layout.hub.x = v;
        }
        if let Some(v) = hub.y {
            config.layout.hub.y = v;
        }
        if let Some(v) = hub.size {
            config.layout.hub.size = v;
        }
    }

    if let Some(spokes) = parsed.spokes {
        if let Some(v) = spokes.radius {
            config.layout.spoke_radius = v;
        }
        if let Some(v) = spokes.min_separation {
            config.layout.min_separation = v;
        }
        if let Some(v) = spokes.max_iterations {
            config.layout.max_iterations = v;
        }
        if let Some(v) = spokes.angle_step {
            config.layout.angle_step = v;
        }
        if let Some(v) = spokes.initial_count {
            config.layout.initial_count = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
    }

    config.layout.initial_spoke_count()?;
    Ok(config)
}
