//! Prompt rendering for the briefing agent.
//!
//! Upstream payloads can be arbitrarily large, so lists are summarized as an
//! item count plus a short preview. The output is deterministic for a given
//! `FlightInfo` and its size does not grow with the length of any list.

use serde_json::{Map, Value};

use crate::domain::flight::FlightInfo;

/// Maximum number of list elements shown in a preview.
pub const PREVIEW_ITEMS: usize = 3;

/// Maximum number of characters of one previewed element.
pub const PREVIEW_CHARS: usize = 100;

const NO_DATA: &str = "No data available";
const INDENT: &str = "  ";

/// Renders the full analysis prompt for a flight.
pub fn render_prompt(info: &FlightInfo) -> Result<String, serde_json::Error> {
    let pilot_data = serde_json::to_value(&info.pilot_data)?;
    let online_resources = serde_json::to_value(&info.online_resources)?;

    Ok(format!(
        "
Please analyze the following flight information and provide a comprehensive flight briefing:

PILOT PROVIDED DATA:
{}

ONLINE RESOURCES (Weather, Airport Info, PIREPs):
{}

Please provide:
1. Weather analysis and recommendations
2. Route analysis and potential issues
3. Risk assessment
4. Alternate airport recommendations
5. Overall flight briefing summary

Focus on safety considerations and provide actionable recommendations for the pilot.
",
        render_value(&pilot_data, 0),
        render_value(&online_resources, 0),
    ))
}

/// Renders a JSON object as indented `key: value` lines.
///
/// Anything other than a non-empty object renders as "No data available".
pub fn render_value(value: &Value, depth: usize) -> String {
    match value.as_object() {
        Some(map) => render_mapping(map, depth),
        None => NO_DATA.to_string(),
    }
}

fn render_mapping(map: &Map<String, Value>, depth: usize) -> String {
    if map.is_empty() {
        return NO_DATA.to_string();
    }

    let indent = INDENT.repeat(depth);
    let mut out = String::new();

    for (key, value) in map {
        match value {
            Value::Object(child) => {
                out.push_str(&format!(
                    "{indent}{key}:\n{}\n",
                    render_mapping(child, depth + 1)
                ));
            }
            Value::Array(items) => {
                out.push_str(&format!("{indent}{key}: {} items\n", items.len()));
                for (i, item) in items.iter().take(PREVIEW_ITEMS).enumerate() {
                    out.push_str(&format!("{indent}{INDENT}[{i}]: {}...\n", preview(item)));
                }
            }
            Value::String(s) => out.push_str(&format!("{indent}{key}: {s}\n")),
            other => out.push_str(&format!("{indent}{key}: {other}\n")),
        }
    }

    out
}

/// Compact text of one element, cut to `PREVIEW_CHARS` characters.
fn preview(item: &Value) -> String {
    let text = match item {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    text.chars().take(PREVIEW_CHARS).collect()
}
