pub mod collision;

use log::debug;
use serde::Serialize;

use crate::config::LayoutConfig;
use crate::geometry::{Point, angle_between, point_on_circle};
use crate::model::{Element, Hub};
use crate::surface::{Surface, SurfaceError, find_hub};

pub use collision::{CollisionResolver, IndexedPoint, Resolution};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpokeLayout {
    pub index: usize,
    pub label: Point,
    pub connector_start: Point,
    pub connector_end: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CollisionSummary {
    pub passes: usize,
    pub converged: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadialLayout {
    pub hub: Hub,
    pub spoke_radius: f32,
    pub spokes: Vec<SpokeLayout>,
    /// `None` when the resolver was skipped.
    pub collision: Option<CollisionSummary>,
}

/// Connector endpoints for a label: from the hub edge facing the label to the label itself.
pub fn connector_endpoints(hub: Hub, label: Point) -> (Point, Point) {
    let angle = angle_between(hub.center, label);
    (point_on_circle(hub.center, hub.radius, angle), label)
}

/// Places `count` labels evenly around the hub, starting on the positive x axis, and resolves
/// collisions between them when there are more than two.
///
/// `count` is taken as given; bounds are enforced by [`crate::model::SpokeCount`] at the
/// command level.
pub fn compute_radial_layout(hub: Hub, config: &LayoutConfig, count: usize) -> RadialLayout {
    let spoke_radius = config.spoke_radius;
    let mut positions: Vec<IndexedPoint> = (0..count)
        .map(|idx| {
            let angle = std::f32::consts::TAU * idx as f32 / count as f32;
            IndexedPoint::new(idx, point_on_circle(hub.center, spoke_radius, angle))
        })
        .collect();

    let mut collision = None;
    if count > 2 {
        let resolution = config
            .resolver()
            .resolve(&positions, hub.center, spoke_radius);
        debug!(
            "collision pass for {count} spokes: {} passes, converged={}",
            resolution.passes, resolution.converged
        );
        collision = Some(CollisionSummary {
            passes: resolution.passes,
            converged: resolution.converged,
        });
        positions = resolution.positions;
    }

    let spokes = positions
        .iter()
        .map(|position| {
            let (connector_start, connector_end) = connector_endpoints(hub, position.point);
            SpokeLayout {
                index: position.index,
                label: position.point,
                connector_start,
                connector_end,
            }
        })
        .collect();

    RadialLayout {
        hub,
        spoke_radius,
        spokes,
        collision,
    }
}

/// Replaces every label and connector on the surface with a fresh layout of `count` spokes.
///
/// Returns `Ok(None)` without touching the surface when there is no hub.
pub fn regenerate(
    surface: &mut dyn Surface,
    config: &LayoutConfig,
    count: usize,
) -> Result<Option<RadialLayout>, SurfaceError> {
    let Some(hub) = find_hub(surface) else {
        debug!("regenerate skipped: no hub on the surface");
        return Ok(None);
    };

    let stale: Vec<_> = surface
        .elements()
        .into_iter()
        .filter(Element::is_spoke_part)
        .map(|element| element.id)
        .collect();
    for id in &stale {
        surface.delete_element(id);
    }

    let layout = compute_radial_layout(hub, config, count);
    for spoke in &layout.spokes {
        surface.create_element(Element::label(spoke.index, spoke.label))?;
        surface.create_element(Element::connector(
            spoke.index,
            spoke.connector_start,
            spoke.connector_end,
        ))?;
    }
    debug!(
        "regenerated {} spokes (removed {} stale elements)",
        layout.spokes.len(),
        stale.len()
    );
    Ok(Some(layout))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ElementId, Geometry, Role};
    use crate::surface::Canvas;
    use std::f32::consts::PI;

    const EPS: f32 = 1e-3;

    fn scenario_hub() -> Hub {
        Hub::new(Point::new(300.0, 300.0), 50.0)
    }

    fn assert_point(actual: Point, x: f32, y: f32) {
        assert!(
            (actual.x - x).abs() < 0.05 && (actual.y - y).abs() < 0.05,
            "expected ({x}, {y}), got {actual:?}"
        );
    }

    #[test]
    fn every_count_yields_matching_spokes_on_the_spoke_circle() {
        let config = LayoutConfig::default();
        for count in 2..=6 {
            let layout = compute_radial_layout(scenario_hub(), &config, count);
            assert_eq!(layout.spokes.len(), count);
            for (idx, spoke) in layout.spokes.iter().enumerate() {
                assert_eq!(spoke.index, idx);
                assert_eq!(spoke.connector_end, spoke.label);
                let hub_center = layout.hub.center;
                assert!((hub_center.distance(spoke.label) - config.spoke_radius).abs() < EPS);
                assert!((hub_center.distance(spoke.connector_start) - 50.0).abs() < EPS);
            }
        }
    }

    #[test]
    fn two_spokes_skip_the_resolver() {
        let layout = compute_radial_layout(scenario_hub(), &LayoutConfig::default(), 2);
        assert!(layout.collision.is_none());
        let first = angle_between(layout.hub.center, layout.spokes[0].label);
        let second = angle_between(layout.hub.center, layout.spokes[1].label);
        assert!(first.abs() < EPS);
        assert!((second.abs() - PI).abs() < EPS);
    }

    #[test]
    fn bounded_counts_converge_without_moving() {
        let config = LayoutConfig::default();
        for count in 3..=6 {
            let layout = compute_radial_layout(scenario_hub(), &config, count);
            let summary = layout.collision.expect("resolver runs above two spokes");
            assert!(summary.converged);
            for i in 0..count {
                for j in (i + 1)..count {
                    let distance = layout.spokes[i].label.distance(layout.spokes[j].label);
                    assert!(distance >= config.min_separation - EPS);
                }
            }
        }
    }

    #[test]
    fn three_spokes_match_reference_positions() {
        let layout = compute_radial_layout(scenario_hub(), &LayoutConfig::default(), 3);
        assert_point(layout.spokes[0].label, 450.0, 300.0);
        assert_point(layout.spokes[1].label, 225.0, 429.9);
        assert_point(layout.spokes[2].label, 225.0, 170.1);
        assert_point(layout.spokes[0].connector_start, 350.0, 300.0);
        assert_point(layout.spokes[1].connector_start, 275.0, 343.3);
        assert_point(layout.spokes[2].connector_start, 275.0, 256.7);
    }

    #[test]
    fn crowded_spoke_circle_moves_labels_but_keeps_radius() {
        let config = LayoutConfig {
            spoke_radius: 60.0,
            ..LayoutConfig::default()
        };
        let layout = compute_radial_layout(scenario_hub(), &config, 6);
        assert!(layout.collision.is_some());
        for spoke in &layout.spokes {
            assert!((layout.hub.center.distance(spoke.label) - 60.0).abs() < EPS);
            let (start, _) = connector_endpoints(layout.hub, spoke.label);
            assert_eq!(spoke.connector_start, start);
        }
    }

    #[test]
    fn regenerate_without_hub_is_a_no_op() {
        let mut canvas = Canvas::new();
        canvas.create_element(Element::label(0, Point::new(1.0, 1.0))).unwrap();
        let result = regenerate(&mut canvas, &LayoutConfig::default(), 3).unwrap();
        assert!(result.is_none());
        assert_eq!(canvas.len(), 1);
        assert_eq!(canvas.revision(), 1);
    }

    #[test]
    fn regenerate_replaces_all_spoke_elements() {
        let mut canvas = Canvas::new();
        canvas.create_element(Element::hub(Point::new(250.0, 250.0), 100.0)).unwrap();
        // A stray spoke with an index the new layout will not reuse.
        canvas.create_element(Element::label(9, Point::new(0.0, 0.0))).unwrap();

        regenerate(&mut canvas, &LayoutConfig::default(), 4).unwrap();
        let elements = canvas.elements();
        assert_eq!(elements.len(), 1 + 2 * 4);
        assert!(canvas.get(&ElementId::label(9)).is_none());
        let order: Vec<&str> = elements.iter().map(|element| element.id.as_str()).collect();
        assert_eq!(
            order,
            vec![
                "hub", "label-0", "spoke-0", "label-1", "spoke-1", "label-2", "spoke-2",
                "label-3", "spoke-3"
            ]
        );
        for element in elements.iter().filter(|element| element.role == Role::Connector) {
            let Geometry::Arrow { start, end, .. } = element.geometry else {
                panic!("connector without arrow geometry");
            };
            let label = canvas
                .get(&ElementId::label(element.spoke_index.unwrap()))
                .unwrap();
            assert_eq!(end, label.position());
            assert!((Point::new(300.0, 300.0).distance(start) - 50.0).abs() < EPS);
        }
    }
}
