use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};

/// One milestone on the track. Both fields degrade to empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default, deserialize_with = "lenient_text")]
    pub year: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
}

impl Item {
    pub fn new(year: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            year: year.into(),
            title: title.into(),
        }
    }
}

/// The parsed input. Item order is placement order along the track.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineDocument {
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl TimelineDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn push(&mut self, year: impl Into<String>, title: impl Into<String>) {
        self.items.push(Item::new(year, title));
    }
}

/// Parse a timeline document. Strict JSON is tried first; hand-edited files
/// with comments or trailing commas go through JSON5.
pub fn parse_document(input: &str) -> Result<TimelineDocument> {
    let value = match serde_json::from_str::<serde_json::Value>(input) {
        Ok(value) => value,
        Err(json_err) => json5::from_str::<serde_json::Value>(input)
            .with_context(|| format!("input is neither JSON nor JSON5 ({json_err})"))?,
    };
    if !value.is_object() {
        anyhow::bail!("timeline document must be a JSON object");
    }
    serde_json::from_value(value).context("malformed timeline document")
}

fn value_to_text(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        // JSON5 hands integers over as floats; `2019.0` should still read "2019".
        serde_json::Value::Number(n) => match n.as_f64() {
            Some(f) if !n.is_i64() && !n.is_u64() && f.fract() == 0.0 && f.abs() < 1e15 => {
                Some(format!("{}", f as i64))
            }
            _ => Some(n.to_string()),
        },
        other => Some(other.to_string()),
    }
}

fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value_to_text(value).unwrap_or_default())
}

fn lenient_optional_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value_to_text(value))
}
