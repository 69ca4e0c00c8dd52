/// Display-safe value formatting for the read-only comparison view
///
/// The shareable comparison page renders raw records directly, without
/// going through the editing normalizer, so it needs its own best-effort
/// formatting: resolve the field, filter out sentinel "no value" strings
/// (`"n/a"`, `"-"`, `"null"`, ...), and fall back to a fixed
/// placeholder. Numbers pass through as stored; nothing here panics.
use crate::models::UnitSystem;
use crate::resolver::{is_valid_display_value, resolve_string};
use crate::units::legacy_display_date;
use serde_json::Value;

/// Placeholder rendered when a field has no displayable value.
pub const EMPTY_PLACEHOLDER: &str = "—";

/// Resolves a field for display, hiding sentinel values behind the
/// placeholder.
pub fn display_value(record: &Value, keys: &[&str]) -> String {
    let raw = resolve_string(record, keys);
    if is_valid_display_value(&raw) {
        raw.trim().to_string()
    } else {
        EMPTY_PLACEHOLDER.to_string()
    }
}

/// Formats a stored date for display through the lenient legacy parser
/// (which expands 2-digit years); `"RTM"` renders as "Ready to Move".
pub fn display_date(record: &Value, keys: &[&str]) -> String {
    let raw = resolve_string(record, keys);
    if !is_valid_display_value(&raw) {
        return EMPTY_PLACEHOLDER.to_string();
    }
    match legacy_display_date(&raw).as_str() {
        "" => EMPTY_PLACEHOLDER.to_string(),
        "RTM" => "Ready to Move".to_string(),
        formatted => formatted.to_string(),
    }
}

/// Renders land area with the unit suffix matching the record's unit
/// system.
pub fn display_land_area(record: &Value) -> String {
    let rera = resolve_string(record, &["reraNumber", "ReraNumber", "rera_number"]);
    let value = display_value(record, &["landArea", "LandArea", "land_area"]);
    if value == EMPTY_PLACEHOLDER {
        return value;
    }
    match UnitSystem::from_rera(&rera) {
        UnitSystem::AcresPercent => format!("{} acres", value),
        UnitSystem::SqmtAbsolute => format!("{} sqmt", value),
    }
}

/// Renders open space; a percentage for acres-system records, square
/// meters otherwise.
pub fn display_open_space(record: &Value) -> String {
    let rera = resolve_string(record, &["reraNumber", "ReraNumber", "rera_number"]);
    let value = display_value(record, &["openSpace", "OpenSpace", "open_space"]);
    if value == EMPTY_PLACEHOLDER {
        return value;
    }
    match UnitSystem::from_rera(&rera) {
        UnitSystem::AcresPercent => format!("{}%", value),
        UnitSystem::SqmtAbsolute => format!("{} sqmt", value),
    }
}

/// One comparison card worth of text for a raw record: a labelled
/// best-effort summary of the headline fields.
pub fn comparison_summary(record: &Value) -> String {
    let mut summary = String::new();
    summary.push_str(&format!(
        "Project: {}\n",
        display_value(record, &["projectName", "ProjectName", "project_name"])
    ));
    summary.push_str(&format!(
        "Builder: {}\n",
        display_value(record, &["builderName", "BuilderName", "builder_name"])
    ));
    summary.push_str(&format!(
        "Location: {}, {}\n",
        display_value(record, &["area", "Area", "locality"]),
        display_value(record, &["city", "City", "city_name"])
    ));
    summary.push_str(&format!("Land Area: {}\n", display_land_area(record)));
    summary.push_str(&format!("Open Space: {}\n", display_open_space(record)));
    summary.push_str(&format!(
        "Possession: {}\n",
        display_date(record, &["possessionDate", "PossessionDate", "possession_date"])
    ));
    summary.push_str(&format!(
        "Price/sqft: {}",
        display_value(record, &["pricePerSqft", "PricePerSqft", "price_per_sqft"])
    ));
    summary
}
