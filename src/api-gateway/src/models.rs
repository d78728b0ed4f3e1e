//! Backend record and webhook payload shapes
//!
//! The backend returns sparse, loosely typed rows. Each field is decoded
//! leniently so that an unexpected shape degrades to `None`/`Null` instead of
//! failing the whole request.

use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::{Map, Number, Value};
use tracing::warn;

/// Page of records returned by the backend's list endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct RecordList<T> {
    #[serde(default, deserialize_with = "lenient_records")]
    pub list: Vec<T>,
}

/// Row of the directories table
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DirectoryRecord {
    #[serde(rename = "Identifier", deserialize_with = "lenient_text")]
    pub identifier: Option<String>,
    #[serde(rename = "Name", deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(rename = "Description", deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(rename = "Domain", deserialize_with = "lenient_text")]
    pub domain: Option<String>,
    #[serde(rename = "Theme", deserialize_with = "lenient_text")]
    pub theme: Option<String>,
    /// Comma-separated layout names
    #[serde(rename = "Available_Layouts", deserialize_with = "lenient_text")]
    pub available_layouts: Option<String>,
    #[serde(rename = "Default Layout", deserialize_with = "lenient_text")]
    pub default_layout: Option<String>,
    #[serde(rename = "Primary Color", deserialize_with = "lenient_text")]
    pub primary_color: Option<String>,
    #[serde(rename = "Secondary Color", deserialize_with = "lenient_text")]
    pub secondary_color: Option<String>,
    /// Attachment reference, passed through as-is
    #[serde(rename = "Logo")]
    pub logo: Value,
    #[serde(rename = "Categories")]
    pub categories: Value,
    #[serde(rename = "Meta Tags")]
    pub meta_tags: Value,
    #[serde(rename = "Social Links")]
    pub social_links: Value,
    #[serde(rename = "Deployment")]
    pub deployment: Value,
    #[serde(rename = "Url Segments")]
    pub url_segments: Value,
}

/// Row of the listings table
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListingRecord {
    #[serde(rename = "Directory Identifier", deserialize_with = "lenient_text")]
    pub directory_identifier: Option<String>,
    #[serde(rename = "Slug", deserialize_with = "lenient_text")]
    pub slug: Option<String>,
    #[serde(rename = "Title", deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(rename = "Description", deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(rename = "Category", deserialize_with = "lenient_text")]
    pub category: Option<String>,
    /// `1`, `true` or anything else
    #[serde(rename = "Featured")]
    pub featured: Value,
    #[serde(rename = "Images")]
    pub images: Value,
    #[serde(rename = "Address", deserialize_with = "lenient_text")]
    pub address: Option<String>,
    #[serde(rename = "Website", deserialize_with = "lenient_text")]
    pub website: Option<String>,
    #[serde(rename = "Phone", deserialize_with = "lenient_text")]
    pub phone: Option<String>,
    #[serde(rename = "Rating", deserialize_with = "lenient_number")]
    pub rating: Option<Number>,
    #[serde(rename = "Tags")]
    pub tags: Value,
    #[serde(rename = "Opening_Hours")]
    pub opening_hours: Value,
    #[serde(rename = "Custom_Fields")]
    pub custom_fields: Value,
    #[serde(rename = "UpdatedAt", deserialize_with = "lenient_text")]
    pub updated_at: Option<String>,
}

/// Change notification sent by the backend
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WebhookPayload {
    #[serde(deserialize_with = "lenient_text")]
    pub table: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub data: WebhookData,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WebhookData {
    #[serde(deserialize_with = "lenient_text")]
    pub table_id: Option<String>,
    #[serde(deserialize_with = "lenient_rows")]
    pub rows: Vec<Map<String, Value>>,
}

impl WebhookPayload {
    /// Table identifier, preferring the top-level `table` field
    pub fn table_id(&self) -> Option<&str> {
        self.table
            .as_deref()
            .or(self.data.table_id.as_deref())
    }

    /// Non-blank text value of `field` in the first row
    pub fn first_row_text(&self, field: &str) -> Option<String> {
        self.data
            .rows
            .first()
            .and_then(|row| row.get(field))
            .and_then(value_as_text)
            .filter(|text| !text.trim().is_empty())
    }
}

/// Render scalar JSON as text; other shapes have no text form
pub fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_as_text(&value))
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<Number>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => Some(n),
        Value::String(s) => s.trim().parse::<f64>().ok().and_then(Number::from_f64),
        _ => None,
    })
}

/// Decode each element on its own; elements that are not records are skipped
fn lenient_records<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let values: Vec<Value> = lenient(deserializer)?;
    Ok(values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(index = index, error = %e, "Skipping undecodable backend record");
                None
            }
        })
        .collect())
}

/// Keep row positions; a row that is not an object reads as empty
fn lenient_rows<'de, D>(deserializer: D) -> Result<Vec<Map<String, Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    let values: Vec<Value> = lenient(deserializer)?;
    Ok(values
        .into_iter()
        .map(|value| match value {
            Value::Object(row) => row,
            _ => Map::new(),
        })
        .collect())
}

/// Decode into `T`, or `T::default()` if the shape does not fit
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}
