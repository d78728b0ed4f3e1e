//! Response transformer
//!
//! Maps backend rows onto the stable schema consumed by the directory sites.
//! Every output field has a defined value: absent text becomes `null`,
//! embedded JSON that is missing or malformed becomes the caller's fallback.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Number, Value};

use crate::models::{DirectoryRecord, ListingRecord};

pub const DEFAULT_THEME: &str = "default";
pub const DEFAULT_LAYOUT: &str = "Card";
pub const DEFAULT_PRIMARY_COLOR: &str = "#3366cc";

/// Public shape of a directory
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Directory {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub domain: Option<String>,
    pub theme: String,
    pub available_layouts: Vec<String>,
    pub default_layout: String,
    pub primary_color: String,
    pub secondary_color: Option<String>,
    pub logo: Value,
    pub categories: Vec<Value>,
    pub meta_tags: Map<String, Value>,
    pub social_links: Vec<Value>,
    pub deployment: Map<String, Value>,
    pub url_segments: Map<String, Value>,
}

/// A listing keyed by `<directory>/<slug>`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub slug: String,
    pub data: ListingData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingData {
    pub title: Option<String>,
    pub description: Option<String>,
    pub directory: String,
    pub category: Option<String>,
    pub featured: bool,
    pub images: Vec<Value>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub rating: Option<Number>,
    pub tags: Vec<Value>,
    pub opening_hours: Value,
    pub custom_fields: Map<String, Value>,
    #[serde(flatten)]
    pub freshness: Option<Freshness>,
}

/// Present on listing reads, absent from search results
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Freshness {
    pub updated_at: Option<String>,
}

/// Which endpoint a listing is being shaped for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingView {
    Listings,
    Search,
}

/// Decode embedded JSON, returning `fallback` for missing, blank or malformed input.
///
/// Text is parsed as JSON; an already-structured value is accepted when it has
/// the requested shape. Never fails.
pub fn safe_parse_json<T: DeserializeOwned>(raw: &Value, fallback: T) -> T {
    match raw {
        Value::Null => fallback,
        Value::String(text) if text.trim().is_empty() => fallback,
        Value::String(text) => serde_json::from_str(text).unwrap_or(fallback),
        other => serde_json::from_value(other.clone()).unwrap_or(fallback),
    }
}

/// `true` only for the number 1 or the boolean `true`
pub fn is_featured(raw: &Value) -> bool {
    match raw {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() == Some(1.0),
        _ => false,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_layouts(raw: Option<&str>) -> Vec<String> {
    let layouts: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|layout| !layout.is_empty())
        .map(String::from)
        .collect();

    if layouts.is_empty() {
        vec![DEFAULT_LAYOUT.to_string()]
    } else {
        layouts
    }
}

pub fn transform_directory(record: DirectoryRecord) -> Directory {
    Directory {
        available_layouts: parse_layouts(record.available_layouts.as_deref()),
        theme: non_blank(record.theme).unwrap_or_else(|| DEFAULT_THEME.to_string()),
        default_layout: non_blank(record.default_layout)
            .unwrap_or_else(|| DEFAULT_LAYOUT.to_string()),
        primary_color: non_blank(record.primary_color)
            .unwrap_or_else(|| DEFAULT_PRIMARY_COLOR.to_string()),
        categories: safe_parse_json(&record.categories, Vec::new()),
        meta_tags: safe_parse_json(&record.meta_tags, Map::new()),
        social_links: safe_parse_json(&record.social_links, Vec::new()),
        deployment: safe_parse_json(&record.deployment, Map::new()),
        url_segments: safe_parse_json(&record.url_segments, Map::new()),
        id: record.identifier,
        name: record.name,
        description: record.description,
        domain: record.domain,
        secondary_color: record.secondary_color,
        logo: record.logo,
    }
}

/// Shape one listing row. `requested_directory` stands in for a missing
/// `Directory Identifier` on the row.
pub fn transform_listing(
    record: ListingRecord,
    requested_directory: &str,
    view: ListingView,
) -> Listing {
    let directory = non_blank(record.directory_identifier)
        .unwrap_or_else(|| requested_directory.to_string());
    let slug = format!("{}/{}", directory, record.slug.unwrap_or_default());

    let freshness = match view {
        ListingView::Listings => Some(Freshness {
            updated_at: record.updated_at,
        }),
        ListingView::Search => None,
    };

    Listing {
        slug,
        data: ListingData {
            title: record.title,
            description: record.description,
            directory,
            category: record.category,
            featured: is_featured(&record.featured),
            images: safe_parse_json(&record.images, Vec::new()),
            address: record.address,
            website: record.website,
            phone: record.phone,
            rating: record.rating,
            tags: safe_parse_json(&record.tags, Vec::new()),
            opening_hours: safe_parse_json(&record.opening_hours, Value::Array(Vec::new())),
            custom_fields: safe_parse_json(&record.custom_fields, Map::new()),
            freshness,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn listing(raw: Value) -> ListingRecord {
        serde_json::from_value(raw).unwrap()
    }

    #[rstest]
    #[case(json!(null))]
    #[case(json!(""))]
    #[case(json!("{not json"))]
    #[case(json!("{\"a\": 1}"))]
    #[case(json!(12))]
    fn test_safe_parse_list_fallback_stays_list(#[case] raw: Value) {
        let parsed: Vec<Value> = safe_parse_json(&raw, Vec::new());
        assert!(parsed.is_empty());
    }

    #[rstest]
    #[case(json!(null))]
    #[case(json!(""))]
    #[case(json!("{not json"))]
    #[case(json!("[1, 2]"))]
    fn test_safe_parse_map_fallback_stays_map(#[case] raw: Value) {
        let parsed: Map<String, Value> = safe_parse_json(&raw, Map::new());
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_safe_parse_valid_input() {
        let tags: Vec<Value> = safe_parse_json(&json!("[\"vegan\", \"outdoor\"]"), Vec::new());
        assert_eq!(tags, vec![json!("vegan"), json!("outdoor")]);

        let fields: Map<String, Value> = safe_parse_json(&json!({"seats": 40}), Map::new());
        assert_eq!(fields.get("seats"), Some(&json!(40)));
    }

    #[rstest]
    #[case(json!(1), true)]
    #[case(json!(1.0), true)]
    #[case(json!(true), true)]
    #[case(json!(0), false)]
    #[case(json!(2), false)]
    #[case(json!("1"), false)]
    #[case(json!("true"), false)]
    #[case(json!(false), false)]
    #[case(json!(null), false)]
    fn test_is_featured(#[case] raw: Value, #[case] expected: bool) {
        assert_eq!(is_featured(&raw), expected);
    }

    #[test]
    fn test_directory_defaults() {
        let directory = transform_directory(DirectoryRecord::default());

        assert_eq!(directory.theme, "default");
        assert_eq!(directory.available_layouts, vec!["Card".to_string()]);
        assert_eq!(directory.default_layout, "Card");
        assert_eq!(directory.primary_color, "#3366cc");
        assert!(directory.categories.is_empty());
        assert!(directory.meta_tags.is_empty());
        assert!(directory.social_links.is_empty());
        assert!(directory.deployment.is_empty());
        assert!(directory.url_segments.is_empty());

        let value = serde_json::to_value(&directory).unwrap();
        assert_eq!(value["id"], Value::Null);
        assert_eq!(value["metaTags"], json!({}));
    }

    #[test]
    fn test_directory_mapping() {
        let record: DirectoryRecord = serde_json::from_value(json!({
            "Identifier": "acme",
            "Name": "Acme Eats",
            "Domain": "eats.acme.test",
            "Theme": "dark",
            "Available_Layouts": "Card, List,,Map",
            "Primary Color": "#000000",
            "Categories": "[\"Food\"]",
            "Meta Tags": "{\"title\": \"Acme\"}",
            "Social Links": "broken[",
            "Url Segments": "{\"listing\": \"places\"}"
        }))
        .unwrap();

        let value = serde_json::to_value(transform_directory(record)).unwrap();
        assert_eq!(value["id"], "acme");
        assert_eq!(value["theme"], "dark");
        assert_eq!(value["availableLayouts"], json!(["Card", "List", "Map"]));
        assert_eq!(value["defaultLayout"], "Card");
        assert_eq!(value["primaryColor"], "#000000");
        assert_eq!(value["categories"], json!(["Food"]));
        assert_eq!(value["metaTags"], json!({"title": "Acme"}));
        assert_eq!(value["socialLinks"], json!([]));
        assert_eq!(value["urlSegments"], json!({"listing": "places"}));
    }

    #[test]
    fn test_listing_slug_and_fields() {
        let shaped = transform_listing(
            listing(json!({
                "Directory Identifier": "acme",
                "Slug": "joes-pizza",
                "Title": "Joe's Pizza",
                "Featured": 1,
                "Images": "[\"a.jpg\"]",
                "Opening_Hours": "{\"mon\": \"9-5\"}",
                "Custom_Fields": "nope",
                "Rating": 4.5,
                "UpdatedAt": "2024-01-01 00:00:00+00:00"
            })),
            "acme",
            ListingView::Listings,
        );

        assert_eq!(shaped.slug, "acme/joes-pizza");
        let value = serde_json::to_value(&shaped).unwrap();
        assert_eq!(value["slug"], "acme/joes-pizza");
        assert_eq!(value["data"]["featured"], true);
        assert_eq!(value["data"]["images"], json!(["a.jpg"]));
        assert_eq!(value["data"]["openingHours"], json!({"mon": "9-5"}));
        assert_eq!(value["data"]["customFields"], json!({}));
        assert_eq!(value["data"]["rating"], json!(4.5));
        assert_eq!(value["data"]["updatedAt"], "2024-01-01 00:00:00+00:00");
    }

    #[test]
    fn test_listing_falls_back_to_requested_directory() {
        let shaped = transform_listing(
            listing(json!({"Slug": "x"})),
            "acme",
            ListingView::Listings,
        );
        assert_eq!(shaped.slug, "acme/x");
        assert_eq!(shaped.data.directory, "acme");
        assert!(!shaped.data.featured);
        assert_eq!(shaped.data.opening_hours, json!([]));

        let value = serde_json::to_value(&shaped).unwrap();
        assert_eq!(value["data"]["updatedAt"], Value::Null);
    }

    #[test]
    fn test_search_view_omits_updated_at() {
        let shaped = transform_listing(
            listing(json!({"Slug": "x", "UpdatedAt": "2024-01-01"})),
            "acme",
            ListingView::Search,
        );
        let value = serde_json::to_value(&shaped).unwrap();
        assert!(value["data"].get("updatedAt").is_none());
    }
}
