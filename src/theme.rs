use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub hub_fill: String,
    pub hub_stroke: String,
    pub hub_stroke_width: f32,
    pub line_color: String,
    pub line_width: f32,
    pub text_color: String,
    pub background: String,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "\"trebuchet ms\", verdana, arial, sans-serif".to_string(),
            font_size: 16.0,
            hub_fill: "#DCE6FF".to_string(),
            hub_stroke: "#1E5BD8".to_string(),
            hub_stroke_width: 2.0,
            line_color: "#333333".to_string(),
            line_width: 1.6,
            text_color: "#1D1D1D".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            hub_fill: "#F8FAFF".to_string(),
            hub_stroke: "#4F6BED".to_string(),
            hub_stroke_width: 1.5,
            line_color: "#7A8AA6".to_string(),
            line_width: 1.4,
            text_color: "#1C2430".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }
}
