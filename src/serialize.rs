/// Outbound serialization: canonical form model -> flat persistence
/// payload
///
/// The inverse of the inbound normalizer: enum tables applied in
/// reverse, the flat `configurations` array re-derived from the nested
/// unit-type map, sqmt-entered values converted back to the storage unit
/// system, and form dates re-serialized to ISO. Free-text numeric fields
/// are reduced to their first numeric token on the way out.
use crate::errors::ValidationErrors;
use crate::models::{FormModel, UnitSystem};
use crate::units::{
    ddmmyyyy_to_iso, first_numeric_token, fmt_converted, sanitize_numeric, sqmt_to_acres,
    sqmt_to_sqft, RTM,
};
use serde_json::{json, Map, Value};

/// Serializes the form model into the flat payload the storage
/// collaborator expects. Pure and total; use [`submit_payload`] when
/// required-field validation should gate the result.
pub fn serialize(form: &FormModel) -> Value {
    let basics = &form.basics;
    let construction = &form.construction;

    let mut payload = Map::new();

    payload.insert("projectName".into(), json!(basics.project_name));
    payload.insert("builderName".into(), json!(basics.builder_name));
    payload.insert("reraNumber".into(), json!(basics.rera_number));
    payload.insert("area".into(), json!(basics.area));
    payload.insert("city".into(), json!(basics.city));
    payload.insert("state".into(), json!(basics.state));
    payload.insert(
        "projectType".into(),
        enum_or_null(basics.project_type.map(|t| t.as_str())),
    );
    payload.insert(
        "communityType".into(),
        enum_or_null(basics.community_type.map(|t| t.as_str())),
    );
    payload.insert("towers".into(), json!(sanitize_numeric(&basics.towers)));
    payload.insert(
        "floorsPerTower".into(),
        json!(sanitize_numeric(&basics.floors_per_tower)),
    );
    payload.insert("totalUnits".into(), json!(sanitize_numeric(&basics.total_units)));

    payload.insert("landArea".into(), json!(serialize_land_area(basics)));
    payload.insert("openSpace".into(), json!(serialize_open_space(basics)));

    payload.insert("launchDate".into(), date_or_null(&basics.launch_date));
    payload.insert("possessionDate".into(), date_or_null(&basics.possession_date));
    payload.insert(
        "constructionStatus".into(),
        enum_or_null(basics.construction_status.map(|s| s.as_str())),
    );

    payload.insert(
        "buildupArea".into(),
        json!(serialize_buildup_area(&construction.buildup_area, basics.unit_system)),
    );
    payload.insert("fsi".into(), json!(sanitize_numeric(&construction.fsi)));
    payload.insert("uds".into(), json!(sanitize_numeric(&construction.uds)));
    payload.insert(
        "carpetAreaPct".into(),
        json!(sanitize_numeric(&construction.carpet_area_pct)),
    );
    payload.insert(
        "ceilingHeight".into(),
        json!(sanitize_numeric(&construction.ceiling_height)),
    );
    payload.insert(
        "pricePerSqft".into(),
        json!(sanitize_numeric(&construction.price_per_sqft)),
    );
    payload.insert(
        "passengerLifts".into(),
        json!(sanitize_numeric(&construction.passenger_lifts)),
    );
    payload.insert(
        "serviceLifts".into(),
        json!(sanitize_numeric(&construction.service_lifts)),
    );
    payload.insert(
        "amenities".into(),
        json!(construction
            .amenities
            .iter()
            .map(|a| a.as_str())
            .collect::<Vec<_>>()),
    );
    payload.insert(
        "constructionMaterial".into(),
        enum_or_null(construction.material.map(|m| m.as_storage())),
    );
    payload.insert(
        "floorRiseCharge".into(),
        json!({
            "applicable": construction.floor_rise_charge.applicable,
            "value": sanitize_numeric(&construction.floor_rise_charge.value),
        }),
    );
    payload.insert(
        "facingCharge".into(),
        json!({
            "applicable": construction.facing_charge.applicable,
            "value": sanitize_numeric(&construction.facing_charge.value),
        }),
    );
    payload.insert(
        "plcCharge".into(),
        json!({
            "applicable": construction.plc_charge.applicable,
            "value": sanitize_numeric(&construction.plc_charge.value),
        }),
    );

    payload.insert("configurations".into(), json!(form.units.configurations()));

    payload.insert(
        "yearsInOperation".into(),
        json!(sanitize_numeric(&form.builder.years_in_operation)),
    );
    payload.insert(
        "completedProjects".into(),
        json!(sanitize_numeric(&form.builder.completed_projects)),
    );
    payload.insert(
        "ongoingProjects".into(),
        json!(sanitize_numeric(&form.builder.ongoing_projects)),
    );
    payload.insert(
        "operatingLocations".into(),
        json!(form.builder.operating_locations),
    );

    payload.insert(
        "tokenAdvance".into(),
        json!(sanitize_numeric(&form.financial.token_advance)),
    );
    payload.insert(
        "bookingAmount".into(),
        json!(sanitize_numeric(&form.financial.booking_amount)),
    );
    payload.insert(
        "maintenancePerSqft".into(),
        json!(sanitize_numeric(&form.financial.maintenance_per_sqft)),
    );
    payload.insert(
        "corpusFund".into(),
        json!(sanitize_numeric(&form.financial.corpus_fund)),
    );
    payload.insert("banks".into(), json!(form.financial.banks));

    payload.insert(
        "commissionPct".into(),
        json!(sanitize_numeric(&form.secondary.commission_pct)),
    );
    payload.insert("payoutTerms".into(), json!(form.secondary.payout_terms));
    payload.insert(
        "leadRegistration".into(),
        json!({
            "whatsapp": {
                "enabled": form.secondary.lead_registration.whatsapp.enabled,
                "details": form.secondary.lead_registration.whatsapp.details,
            },
            "email": {
                "enabled": form.secondary.lead_registration.email.enabled,
                "details": form.secondary.lead_registration.email.details,
            },
            "portal": {
                "enabled": form.secondary.lead_registration.portal.enabled,
                "details": form.secondary.lead_registration.portal.details,
            },
        }),
    );
    payload.insert(
        "pocDetails".into(),
        json!(form
            .secondary
            .pocs
            .iter()
            .map(|poc| {
                json!({
                    "name": poc.name,
                    "contact": poc.contact,
                    "role": poc.role,
                    // Absent status serializes as "" (the boolean-era
                    // convention for "no status").
                    "cpStatus": poc.cp_status.map(|s| s.as_str()).unwrap_or(""),
                })
            })
            .collect::<Vec<_>>()),
    );

    Value::Object(payload)
}

/// Required-field validation applied before a payload is considered
/// submit-ready. Failures come back as a field-keyed error map, never a
/// panic; all other fields are optional.
pub fn validate_for_submit(form: &FormModel) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if form.basics.project_name.trim().is_empty() {
        errors.insert("basics.projectName", "Project name is required");
    }
    if form.basics.builder_name.trim().is_empty() {
        errors.insert("basics.builderName", "Builder name is required");
    }
    if form.basics.rera_number.trim().is_empty() {
        errors.insert("basics.reraNumber", "RERA number is required");
    }
    if errors.is_empty() {
        Ok(())
    } else {
        tracing::debug!("Submit validation failed: {}", errors);
        Err(errors)
    }
}

/// Validates and serializes in one step.
pub fn submit_payload(form: &FormModel) -> Result<Value, ValidationErrors> {
    validate_for_submit(form)?;
    Ok(serialize(form))
}

/// Land area goes to storage in acres; sqmt-system entries are converted
/// back.
fn serialize_land_area(basics: &crate::models::BasicsSection) -> String {
    match basics.unit_system {
        UnitSystem::AcresPercent => sanitize_numeric(&basics.land_area),
        UnitSystem::SqmtAbsolute => {
            let acres = sqmt_to_acres(&basics.land_area);
            if acres > 0.0 {
                fmt_converted(acres)
            } else {
                String::new()
            }
        }
    }
}

/// Open space goes to storage as a percentage. For sqmt-system records
/// it is computed from the paired sqmt values when both are present,
/// otherwise the carried-over known percentage is kept.
fn serialize_open_space(basics: &crate::models::BasicsSection) -> String {
    match basics.unit_system {
        UnitSystem::AcresPercent => sanitize_numeric(&basics.open_space),
        UnitSystem::SqmtAbsolute => {
            match (
                first_numeric_token(&basics.open_space),
                first_numeric_token(&basics.land_area),
            ) {
                (Some(open), Some(land)) if open > 0.0 && land > 0.0 => {
                    fmt_converted(open / land * 100.0)
                }
                _ => sanitize_numeric(&basics.open_space_pct),
            }
        }
    }
}

/// Buildup area goes to storage in sqft; sqmt-system entries are
/// converted back.
fn serialize_buildup_area(buildup_area: &str, unit_system: UnitSystem) -> String {
    match unit_system {
        UnitSystem::AcresPercent => sanitize_numeric(buildup_area),
        UnitSystem::SqmtAbsolute => {
            let sqft = sqmt_to_sqft(buildup_area);
            if sqft > 0.0 {
                fmt_converted(sqft)
            } else {
                String::new()
            }
        }
    }
}

/// Form dates serialize to ISO; `"RTM"` passes through and anything
/// unparseable (including an empty field) becomes JSON null.
fn date_or_null(form_date: &str) -> Value {
    if form_date.trim() == RTM {
        return json!(RTM);
    }
    let iso = ddmmyyyy_to_iso(form_date);
    if iso.is_empty() {
        Value::Null
    } else {
        json!(iso)
    }
}

fn enum_or_null(value: Option<&str>) -> Value {
    match value {
        Some(s) => json!(s),
        None => Value::Null,
    }
}
