use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn hub() -> Self {
        Self::new("hub")
    }

    pub fn label(index: usize) -> Self {
        Self(format!("label-{index}"))
    }

    pub fn connector(index: usize) -> Self {
        Self(format!("spoke-{index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Hub,
    Label,
    Connector,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Geometry {
    /// Axis-aligned ellipse given by its top-left corner and size.
    Ellipse {
        origin: Point,
        width: f32,
        height: f32,
    },
    Text {
        position: Point,
        text: String,
    },
    Arrow {
        start: Point,
        end: Point,
        arrowhead_end: bool,
    },
}

impl Geometry {
    /// The point the element is anchored at: ellipse origin, text position or arrow start.
    pub fn position(&self) -> Point {
        match self {
            Geometry::Ellipse { origin, .. } => *origin,
            Geometry::Text { position, .. } => *position,
            Geometry::Arrow { start, .. } => *start,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    pub role: Role,
    pub spoke_index: Option<usize>,
    pub geometry: Geometry,
}

impl Element {
    pub fn hub(origin: Point, size: f32) -> Self {
        Self {
            id: ElementId::hub(),
            role: Role::Hub,
            spoke_index: None,
            geometry: Geometry::Ellipse {
                origin,
                width: size,
                height: size,
            },
        }
    }

    pub fn label(index: usize, position: Point) -> Self {
        Self {
            id: ElementId::label(index),
            role: Role::Label,
            spoke_index: Some(index),
            geometry: Geometry::Text {
                position,
                text: format!("Spoke {}", index + 1),
            },
        }
    }

    pub fn connector(index: usize, start: Point, end: Point) -> Self {
        Self {
            id: ElementId::connector(index),
            role: Role::Connector,
            spoke_index: Some(index),
            geometry: Geometry::Arrow {
                start,
                end,
                arrowhead_end: true,
            },
        }
    }

    pub fn position(&self) -> Point {
        self.geometry.position()
    }

    pub fn is_spoke_part(&self) -> bool {
        matches!(self.role, Role::Label | Role::Connector)
    }
}

/// The circular anchor at the center of the diagram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hub {
    pub center: Point,
    pub radius: f32,
}

impl Hub {
    pub fn new(center: Point, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Reads the hub circle out of a hub element. Only the width is used for the
    /// radius since hubs are circles.
    pub fn from_element(element: &Element) -> Option<Self> {
        if element.role != Role::Hub {
            return None;
        }
        match element.geometry {
            Geometry::Ellipse { origin, width, height } => Some(Self {
                center: origin.offset(width / 2.0, height / 2.0),
                radius: width / 2.0,
            }),
            _ => None,
        }
    }
}

/// Number of spokes, always within `[SpokeCount::MIN, SpokeCount::MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpokeCount(usize);

impl SpokeCount {
    pub const MIN: usize = 2;
    pub const MAX: usize = 6;

    pub fn new(count: usize) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&count).then_some(Self(count))
    }

    pub fn get(self) -> usize {
        self.0
    }

    pub fn increment(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }

    pub fn decrement(self) -> Option<Self> {
        self.0.checked_sub(1).and_then(Self::new)
    }
}

impl Default for SpokeCount {
    fn default() -> Self {
        Self(3)
    }
}

impl fmt::Display for SpokeCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Asks for a full regeneration of all spokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutRequest {
    pub count: SpokeCount,
}
