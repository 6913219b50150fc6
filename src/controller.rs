//! Keeps connectors attached to the hub edge and their labels as elements move.

use std::collections::HashMap;

use log::{debug, warn};

use crate::layout::connector_endpoints;
use crate::model::{Element, Geometry, Role};
use crate::surface::{Subscription, Surface, SurfaceError, find_hub};

/// Recomputes every connector from the current hub and label positions.
///
/// Labels are never moved. Connectors whose geometry is already correct are left untouched,
/// so a second call with unchanged inputs applies nothing. Returns the number of connectors
/// updated.
pub fn sync_connectors(surface: &mut dyn Surface) -> Result<usize, SurfaceError> {
    let Some(hub) = find_hub(surface) else {
        return Ok(0);
    };

    let elements = surface.elements();
    let connectors: HashMap<usize, &Element> = elements
        .iter()
        .filter(|element| element.role == Role::Connector)
        .filter_map(|element| element.spoke_index.map(|idx| (idx, element)))
        .collect();

    let mut pending = Vec::new();
    for label in elements.iter().filter(|element| element.role == Role::Label) {
        let Some(index) = label.spoke_index else {
            continue;
        };
        let Some(connector) = connectors.get(&index) else {
            debug!("label {} has no connector, skipping", label.id);
            continue;
        };
        let (start, end) = connector_endpoints(hub, label.position());
        let arrowhead_end = match connector.geometry {
            Geometry::Arrow { arrowhead_end, .. } => arrowhead_end,
            _ => true,
        };
        let geometry = Geometry::Arrow {
            start,
            end,
            arrowhead_end,
        };
        if connector.geometry != geometry {
            pending.push((connector.id.clone(), geometry));
        }
    }

    let updated = pending.len();
    for (id, geometry) in pending {
        surface.update_element(&id, geometry)?;
    }
    Ok(updated)
}

/// Subscribes [`sync_connectors`] to a surface's change feed.
#[derive(Debug, Default, Clone, Copy)]
pub struct LiveUpdateController;

impl LiveUpdateController {
    pub fn attach(self, surface: &mut dyn Surface) -> Subscription {
        surface.subscribe(Box::new(|surface: &mut dyn Surface| {
            match sync_connectors(surface) {
                Ok(0) => {}
                Ok(updated) => debug!("re-attached {updated} connectors"),
                Err(err) => warn!("connector update failed: {err}"),
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::geometry::Point;
    use crate::layout::regenerate;
    use crate::model::ElementId;
    use crate::surface::Canvas;

    fn canvas_with_spokes(count: usize) -> Canvas {
        let mut canvas = Canvas::new();
        canvas.create_element(Element::hub(Point::new(250.0, 250.0), 100.0)).unwrap();
        regenerate(&mut canvas, &LayoutConfig::default(), count).unwrap();
        canvas
    }

    fn connector_endpoints_of(canvas: &Canvas, index: usize) -> (Point, Point) {
        match canvas.get(&ElementId::connector(index)).unwrap().geometry {
            Geometry::Arrow { start, end, .. } => (start, end),
            _ => panic!("connector without arrow geometry"),
        }
    }

    fn move_hub(surface: &mut dyn Surface, origin: Point) {
        surface
            .update_element(
                &ElementId::hub(),
                Geometry::Ellipse {
                    origin,
                    width: 100.0,
                    height: 100.0,
                },
            )
            .unwrap();
    }

    #[test]
    fn freshly_generated_layout_needs_no_update() {
        let mut canvas = canvas_with_spokes(5);
        assert_eq!(sync_connectors(&mut canvas).unwrap(), 0);
    }

    #[test]
    fn second_sync_is_a_no_op() {
        let mut canvas = canvas_with_spokes(3);
        move_hub(&mut canvas, Point::new(100.0, 80.0));
        assert_eq!(sync_connectors(&mut canvas).unwrap(), 3);
        let revision = canvas.revision();
        let before: Vec<_> = (0..3).map(|idx| connector_endpoints_of(&canvas, idx)).collect();

        assert_eq!(sync_connectors(&mut canvas).unwrap(), 0);
        let after: Vec<_> = (0..3).map(|idx| connector_endpoints_of(&canvas, idx)).collect();
        assert_eq!(before, after);
        assert_eq!(canvas.revision(), revision);
    }

    #[test]
    fn hub_move_reattaches_connectors_without_moving_labels() {
        let mut canvas = canvas_with_spokes(4);
        let labels_before: Vec<Point> = (0..4)
            .map(|idx| canvas.get(&ElementId::label(idx)).unwrap().position())
            .collect();
        LiveUpdateController.attach(&mut canvas);

        move_hub(&mut canvas, Point::new(400.0, 100.0));
        let center = Point::new(450.0, 150.0);
        for (idx, label) in labels_before.iter().enumerate() {
            assert_eq!(canvas.get(&ElementId::label(idx)).unwrap().position(), *label);
            let (start, end) = connector_endpoints_of(&canvas, idx);
            assert_eq!(end, *label);
            assert!((center.distance(start) - 50.0).abs() < 1e-3);
        }
    }

    #[test]
    fn resized_hub_uses_its_new_radius() {
        let mut canvas = canvas_with_spokes(4);
        LiveUpdateController.attach(&mut canvas);

        canvas
            .update_element(
                &ElementId::hub(),
                Geometry::Ellipse {
                    origin: Point::new(100.0, 100.0),
                    width: 40.0,
                    height: 40.0,
                },
            )
            .unwrap();

        let center = Point::new(120.0, 120.0);
        for idx in 0..4 {
            let label = canvas.get(&ElementId::label(idx)).unwrap().position();
            let (start, end) = connector_endpoints_of(&canvas, idx);
            assert_eq!(end, label);
            assert!((center.distance(start) - 20.0).abs() < 1e-3);
        }
    }

    #[test]
    fn dragged_label_pulls_its_connector() {
        let mut canvas = canvas_with_spokes(3);
        LiveUpdateController.attach(&mut canvas);
        let untouched = connector_endpoints_of(&canvas, 1);

        canvas
            .update_element(
                &ElementId::label(0),
                Geometry::Text {
                    position: Point::new(300.0, 500.0),
                    text: "Spoke 1".to_string(),
                },
            )
            .unwrap();

        let (start, end) = connector_endpoints_of(&canvas, 0);
        assert_eq!(end, Point::new(300.0, 500.0));
        assert!((start.x - 300.0).abs() < 1e-3);
        assert!((start.y - 350.0).abs() < 1e-3);
        assert_eq!(connector_endpoints_of(&canvas, 1), untouched);
    }

    #[test]
    fn orphan_label_is_skipped() {
        let mut canvas = canvas_with_spokes(3);
        canvas.delete_element(&ElementId::connector(2));
        move_hub(&mut canvas, Point::new(0.0, 0.0));
        assert_eq!(sync_connectors(&mut canvas).unwrap(), 2);
        assert!(canvas.get(&ElementId::label(2)).is_some());
    }

    #[test]
    fn missing_hub_is_a_no_op() {
        let mut canvas = canvas_with_spokes(3);
        canvas.delete_element(&ElementId::hub());
        let revision = canvas.revision();
        assert_eq!(sync_connectors(&mut canvas).unwrap(), 0);
        assert_eq!(canvas.revision(), revision);
    }
}
