use serde::Deserialize;
use timeline_rs_renderer::{RenderOptions, TrackKind, render_with_options};
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimelineRenderOptions {
    preset: Option<String>,
    style: Option<String>,
    font_family: Option<String>,
    width: Option<f32>,
    height: Option<f32>,
}

fn build_render_options(options: TimelineRenderOptions) -> RenderOptions {
    let mut render_options = if options.preset.as_deref() == Some("refined") {
        RenderOptions::refined()
    } else {
        RenderOptions::classic()
    };

    if options.style.as_deref() == Some("zigzag") {
        render_options.track = TrackKind::Zigzag;
    }
    if let Some(font_family) = options.font_family {
        render_options.theme.font_family = font_family;
    }
    if let Some(width) = options.width {
        render_options.layout.width = width;
    }
    if let Some(height) = options.height {
        render_options.layout.height = height;
    }

    // No font database in the browser.
    render_options.fast_text = true;
    render_options
}

#[wasm_bindgen]
pub fn render_timeline_svg(json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<TimelineRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        TimelineRenderOptions::default()
    };

    let render_options = build_render_options(options);
    render_with_options(json, render_options).map_err(|error| JsValue::from_str(&error.to_string()))
}

#[cfg(test)]
mod tests {
    use timeline_rs_renderer::render_with_options;

    use crate::{TimelineRenderOptions, build_render_options};

    #[test]
    fn renders_refined_zigzag_with_calibrated_text() {
        let json = r#"{
            "title": "Company history",
            "items": [
                { "year": "2015", "title": "Founded" },
                { "year": "2018", "title": "Series B & expansion" },
                { "year": "2021", "title": "IPO" }
            ]
        }"#;
        let options: TimelineRenderOptions =
            serde_json::from_str(r#"{"preset":"refined","style":"zigzag","width":1000}"#).unwrap();
        let render_options = build_render_options(options);
        assert!(render_options.fast_text);

        let svg = render_with_options(json, render_options).expect("timeline should render");

        assert!(svg.contains("<svg"));
        assert!(svg.contains("Company history"));
        assert!(svg.contains("Series B &amp; expansion"));
    }
}
