#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod controller;
pub mod diagram;
pub mod geometry;
pub mod layout;
pub mod layout_dump;
pub mod model;
pub mod render;
pub mod surface;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig, load_config};
pub use controller::{LiveUpdateController, sync_connectors};
pub use diagram::Diagram;
pub use geometry::{Point, angle_between, point_on_circle};
pub use layout::{RadialLayout, SpokeLayout, compute_radial_layout, regenerate};
pub use model::{Element, ElementId, Geometry, Hub, LayoutRequest, Role, SpokeCount};
pub use render::render_svg;
pub use surface::{Canvas, Surface, SurfaceError};
pub use theme::Theme;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(
        "spoke count {0} is outside {min}..={max}",
        min = SpokeCount::MIN,
        max = SpokeCount::MAX
    )]
    SpokeCountOutOfRange(usize),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}
