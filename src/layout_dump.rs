use crate::model::{Element, Geometry, Hub, Role};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub spoke_count: usize,
    pub hub: Option<HubDump>,
    pub spokes: Vec<SpokeDump>,
}

#[derive(Debug, Serialize)]
pub struct HubDump {
    pub id: String,
    pub center: [f32; 2],
    pub radius: f32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpokeDump {
    pub index: usize,
    pub label_id: String,
    pub text: String,
    pub label: [f32; 2],
    pub connector_id: Option<String>,
    pub start: Option<[f32; 2]>,
    pub end: Option<[f32; 2]>,
}

impl LayoutDump {
    pub fn from_elements(elements: &[Element]) -> Self {
        let hub = elements.iter().find_map(|element| {
            Hub::from_element(element).map(|hub| HubDump {
                id: element.id.to_string(),
                center: [hub.center.x, hub.center.y],
                radius: hub.radius,
            })
        });

        let mut spokes: Vec<SpokeDump> = elements
            .iter()
            .filter(|element| element.role == Role::Label)
            .filter_map(|label| {
                let index = label.spoke_index?;
                let Geometry::Text { position, text } = &label.geometry else {
                    return None;
                };
                let connector = elements.iter().find(|element| {
                    element.role == Role::Connector && element.spoke_index == Some(index)
                });
                let endpoints = connector.and_then(|connector| match connector.geometry {
                    Geometry::Arrow { start, end, .. } => {
                        Some(([start.x, start.y], [end.x, end.y]))
                    }
                    _ => None,
                });
                Some(SpokeDump {
                    index,
                    label_id: label.id.to_string(),
                    text: text.clone(),
                    label: [position.x, position.y],
                    connector_id: connector.map(|connector| connector.id.to_string()),
                    start: endpoints.map(|(start, _)| start),
                    end: endpoints.map(|(_, end)| end),
                })
            })
            .collect();
        spokes.sort_by_key(|spoke| spoke.index);

        LayoutDump {
            spoke_count: spokes.len(),
            hub,
            spokes,
        }
    }
}

pub fn write_layout_dump(path: &Path, elements: &[Element]) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_elements(elements);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
