/// Inbound normalization: raw persisted record -> canonical form model
///
/// Stored property records come from two generations of backends and mix
/// naming conventions freely, so every canonical field declares an
/// explicit priority-ordered candidate-key list (current camelCase key
/// first, then legacy PascalCase, then snake_case). Nothing here throws:
/// unmapped or unparseable fields degrade to empty strings or documented
/// defaults, with a debug log for the curious.
use crate::models::{
    Amenity, BasicsSection, BuilderSection, CommunityType, ConstructionMaterial,
    ConstructionSection, ConstructionStatus, CpStatus, ExtraCharge, Facing, FinancialSection,
    FormModel, LeadRegistrationPolicy, PocEntry, ProjectType, RegistrationChannel,
    SecondarySection, UnitSystem, UnitTypeEntry, UnitVariant, UnitsSection,
    canonical_unit_label,
};
use crate::resolver::{
    resolve, resolve_array, resolve_bool, resolve_string, scalar_to_string, value_truthy,
};
use crate::units::{
    acres_to_sqmt, fmt_converted, first_numeric_token, legacy_display_date, sanitize_numeric,
    sqft_to_sqmt, RTM,
};
use chrono::NaiveDate;
use serde_json::Value;

// ============ Candidate Key Lists ============

const PROJECT_NAME_KEYS: &[&str] = &["projectName", "ProjectName", "project_name", "projectname"];
const BUILDER_NAME_KEYS: &[&str] = &["builderName", "BuilderName", "builder_name"];
const RERA_KEYS: &[&str] = &["reraNumber", "ReraNumber", "RERANumber", "rera_number", "rera_no"];
const AREA_KEYS: &[&str] = &["area", "Area", "locality", "Locality"];
const CITY_KEYS: &[&str] = &["city", "City", "city_name"];
const STATE_KEYS: &[&str] = &["state", "State"];
const PROJECT_TYPE_KEYS: &[&str] = &["projectType", "ProjectType", "project_type"];
const COMMUNITY_TYPE_KEYS: &[&str] = &["communityType", "CommunityType", "community_type"];
const TOWERS_KEYS: &[&str] = &["towers", "Towers", "noOfTowers", "NoOfTowers", "no_of_towers"];
const FLOORS_KEYS: &[&str] = &["floorsPerTower", "FloorsPerTower", "floors_per_tower", "floors"];
const TOTAL_UNITS_KEYS: &[&str] = &["totalUnits", "TotalUnits", "total_units", "no_of_units"];
const LAND_AREA_KEYS: &[&str] =
    &["landArea", "LandArea", "land_area", "totalLandArea", "total_land_area"];
const OPEN_SPACE_KEYS: &[&str] =
    &["openSpace", "OpenSpace", "open_space", "open_space_percentage"];
const LAUNCH_DATE_KEYS: &[&str] = &["launchDate", "LaunchDate", "launch_date"];
const POSSESSION_DATE_KEYS: &[&str] =
    &["possessionDate", "PossessionDate", "possession_date"];
const STATUS_KEYS: &[&str] = &["constructionStatus", "ConstructionStatus", "construction_status"];

const BUILDUP_AREA_KEYS: &[&str] =
    &["buildupArea", "BuildupArea", "buildup_area", "builtUpArea", "built_up_area"];
const FSI_KEYS: &[&str] = &["fsi", "FSI"];
const UDS_KEYS: &[&str] = &["uds", "UDS"];
const CARPET_KEYS: &[&str] =
    &["carpetAreaPct", "CarpetAreaPercentage", "carpet_area_pct", "carpet_area_percentage"];
const CEILING_KEYS: &[&str] = &["ceilingHeight", "CeilingHeight", "ceiling_height"];
const PRICE_SQFT_KEYS: &[&str] = &["pricePerSqft", "PricePerSqft", "price_per_sqft"];
const PASSENGER_LIFT_KEYS: &[&str] =
    &["passengerLifts", "PassengerLifts", "passenger_lifts", "no_of_lifts"];
const SERVICE_LIFT_KEYS: &[&str] = &["serviceLifts", "ServiceLifts", "service_lifts"];
const AMENITIES_KEYS: &[&str] = &["amenities", "Amenities"];
const MATERIAL_KEYS: &[&str] =
    &["constructionMaterial", "ConstructionMaterial", "construction_material", "material"];

const FLOOR_RISE_KEYS: &[&str] = &["floorRiseCharge", "FloorRiseCharge", "floor_rise_charge"];
const FACING_CHARGE_KEYS: &[&str] = &["facingCharge", "FacingCharge", "facing_charge"];
const PLC_CHARGE_KEYS: &[&str] = &["plcCharge", "PLCCharge", "plc_charge"];

const CONFIGURATIONS_KEYS: &[&str] = &["configurations", "Configurations", "unit_configurations"];

const BUILDER_AGE_KEYS: &[&str] =
    &["yearsInOperation", "YearsInOperation", "years_in_operation", "builderAge", "builder_age"];
const COMPLETED_KEYS: &[&str] = &["completedProjects", "CompletedProjects", "completed_projects"];
const ONGOING_KEYS: &[&str] = &["ongoingProjects", "OngoingProjects", "ongoing_projects"];
const LOCATIONS_KEYS: &[&str] =
    &["operatingLocations", "OperatingLocations", "operating_locations"];

const TOKEN_ADVANCE_KEYS: &[&str] = &["tokenAdvance", "TokenAdvance", "token_advance"];
const BOOKING_KEYS: &[&str] = &["bookingAmount", "BookingAmount", "booking_amount"];
const MAINTENANCE_KEYS: &[&str] =
    &["maintenancePerSqft", "MaintenancePerSqft", "maintenance_per_sqft"];
const CORPUS_KEYS: &[&str] = &["corpusFund", "CorpusFund", "corpus_fund"];
const BANKS_KEYS: &[&str] = &["banks", "Banks", "loanApprovedBanks", "loan_approved_banks"];

const COMMISSION_KEYS: &[&str] =
    &["commissionPct", "CommissionPercentage", "commission_pct", "commission_percentage"];
const PAYOUT_KEYS: &[&str] = &["payoutTerms", "PayoutTerms", "payout_terms"];
const LEAD_REG_KEYS: &[&str] = &["leadRegistration", "LeadRegistration", "lead_registration"];
const POC_DETAILS_KEYS: &[&str] = &["pocDetails", "POCDetails", "poc_details"];
const LEGACY_POC_NAME_KEYS: &[&str] = &["pocName", "POCName", "poc_name"];
const LEGACY_POC_CONTACT_KEYS: &[&str] = &["pocContact", "POCContact", "poc_contact", "poc_phone"];
const LEGACY_POC_ROLE_KEYS: &[&str] = &["pocRole", "POCRole", "poc_role"];
const LEGACY_CP_FLAG_KEYS: &[&str] = &["cpAccepting", "CPAccepting", "cp_accepting"];
const PERSON_CONFIRM_KEYS: &[&str] =
    &["person_to_confirm_registration", "personToConfirmRegistration"];

/// Legacy-data disambiguation threshold for sqmt-system land area: stored
/// values below this are assumed to be already-converted acres, values
/// above it raw legacy square meters. A magnitude guess, not a guaranteed
/// inverse; large-acreage or tiny-sqmt records can misclassify, and the
/// records carry no migration flag that would settle it.
const LEGACY_SQMT_THRESHOLD: f64 = 1000.0;

/// Builds the canonical form model from a raw persisted record, using
/// the current date for construction-status derivation.
pub fn normalize(raw: &Value) -> FormModel {
    normalize_with_today(raw, chrono::Local::now().date_naive())
}

/// Same as [`normalize`] with an injected "today" so status derivation
/// stays a pure function.
pub fn normalize_with_today(raw: &Value, today: NaiveDate) -> FormModel {
    let basics = normalize_basics(raw, today);
    let unit_system = basics.unit_system;
    FormModel {
        construction: normalize_construction(raw, unit_system),
        units: normalize_units(raw),
        builder: normalize_builder(raw),
        financial: normalize_financial(raw),
        secondary: normalize_secondary(raw),
        basics,
    }
}

fn normalize_basics(raw: &Value, today: NaiveDate) -> BasicsSection {
    let rera_number = resolve_string(raw, RERA_KEYS).trim().to_string();
    let unit_system = UnitSystem::from_rera(&rera_number);

    let land_area = normalize_land_area(&resolve_string(raw, LAND_AREA_KEYS), unit_system);
    let (open_space, open_space_pct) =
        normalize_open_space(&resolve_string(raw, OPEN_SPACE_KEYS), &land_area, unit_system);

    let launch_date = legacy_display_date(&resolve_string(raw, LAUNCH_DATE_KEYS));
    let possession_date = legacy_display_date(&resolve_string(raw, POSSESSION_DATE_KEYS));

    // An explicitly stored status wins; otherwise seed it from the
    // possession date.
    let construction_status = ConstructionStatus::from_raw(&resolve_string(raw, STATUS_KEYS))
        .or_else(|| derive_construction_status(&possession_date, today));

    BasicsSection {
        project_name: resolve_string(raw, PROJECT_NAME_KEYS),
        builder_name: resolve_string(raw, BUILDER_NAME_KEYS),
        rera_number,
        area: resolve_string(raw, AREA_KEYS),
        city: resolve_string(raw, CITY_KEYS),
        state: resolve_string(raw, STATE_KEYS),
        project_type: ProjectType::from_raw(&resolve_string(raw, PROJECT_TYPE_KEYS)),
        community_type: CommunityType::from_raw(&resolve_string(raw, COMMUNITY_TYPE_KEYS)),
        towers: sanitize_numeric(&resolve_string(raw, TOWERS_KEYS)),
        floors_per_tower: sanitize_numeric(&resolve_string(raw, FLOORS_KEYS)),
        total_units: sanitize_numeric(&resolve_string(raw, TOTAL_UNITS_KEYS)),
        unit_system,
        land_area,
        open_space,
        open_space_pct,
        launch_date,
        possession_date,
        construction_status,
    }
}

/// Storage keeps land area in acres. For sqmt-system records the form
/// shows square meters, so the stored value is reverse-derived with the
/// magnitude heuristic documented on [`LEGACY_SQMT_THRESHOLD`].
fn normalize_land_area(stored: &str, unit_system: UnitSystem) -> String {
    match unit_system {
        UnitSystem::AcresPercent => sanitize_numeric(stored),
        UnitSystem::SqmtAbsolute => match first_numeric_token(stored) {
            Some(v) if v > 0.0 && v < LEGACY_SQMT_THRESHOLD => {
                fmt_converted(acres_to_sqmt(&v.to_string()))
            }
            Some(v) if v > 0.0 => {
                tracing::warn!(
                    "Land area {} looks like raw legacy sqmt, keeping as-is",
                    stored
                );
                fmt_converted(v)
            }
            _ => String::new(),
        },
    }
}

/// Storage keeps open space as a percentage. Sqmt-system records display
/// the absolute area instead, computed against the (already-normalized)
/// land area; the stored percentage is carried along for the serializer's
/// fallback path.
///
/// The absolute value keeps two decimals, so a stored percentage with
/// more precision is not exactly recoverable; the re-derived pair
/// stabilizes only after the rounded values settle.
fn normalize_open_space(
    stored: &str,
    land_area: &str,
    unit_system: UnitSystem,
) -> (String, String) {
    match unit_system {
        UnitSystem::AcresPercent => (sanitize_numeric(stored), String::new()),
        UnitSystem::SqmtAbsolute => {
            let pct = sanitize_numeric(stored);
            let absolute = match (first_numeric_token(&pct), first_numeric_token(land_area)) {
                (Some(p), Some(l)) if p > 0.0 && l > 0.0 => fmt_converted(p / 100.0 * l),
                _ => String::new(),
            };
            (absolute, pct)
        }
    }
}

/// Seeds the construction status from a possession date in form format
/// (`DD/MM/YYYY` or `"RTM"`).
///
/// Possession within ~a month (including past dates) means ready to
/// move; within ~six months, about to be; otherwise under construction.
pub fn derive_construction_status(
    possession_date: &str,
    today: NaiveDate,
) -> Option<ConstructionStatus> {
    if possession_date.trim() == RTM {
        return Some(ConstructionStatus::Rtm);
    }
    let iso = crate::units::ddmmyyyy_to_iso(possession_date);
    if iso.is_empty() {
        return None;
    }
    let date = NaiveDate::parse_from_str(&iso, "%Y-%m-%d").ok()?;
    let days = (date - today).num_days();
    Some(if days <= 30 {
        ConstructionStatus::Rtm
    } else if days <= 182 {
        ConstructionStatus::AboutToRtm
    } else {
        ConstructionStatus::UnderConstruction
    })
}

fn normalize_construction(raw: &Value, unit_system: UnitSystem) -> ConstructionSection {
    // Storage keeps buildup area in sqft; sqmt-system records display
    // square meters.
    let buildup_stored = resolve_string(raw, BUILDUP_AREA_KEYS);
    let buildup_area = match unit_system {
        UnitSystem::AcresPercent => sanitize_numeric(&buildup_stored),
        UnitSystem::SqmtAbsolute => {
            let sqmt = sqft_to_sqmt(&buildup_stored);
            if sqmt > 0.0 {
                fmt_converted(sqmt)
            } else {
                String::new()
            }
        }
    };

    let material_raw = resolve_string(raw, MATERIAL_KEYS);
    let material = if material_raw.trim().is_empty() {
        None
    } else {
        Some(ConstructionMaterial::from_raw(&material_raw))
    };

    ConstructionSection {
        buildup_area,
        fsi: sanitize_numeric(&resolve_string(raw, FSI_KEYS)),
        uds: sanitize_numeric(&resolve_string(raw, UDS_KEYS)),
        carpet_area_pct: sanitize_numeric(&resolve_string(raw, CARPET_KEYS)),
        ceiling_height: sanitize_numeric(&resolve_string(raw, CEILING_KEYS)),
        price_per_sqft: sanitize_numeric(&resolve_string(raw, PRICE_SQFT_KEYS)),
        passenger_lifts: sanitize_numeric(&resolve_string(raw, PASSENGER_LIFT_KEYS)),
        service_lifts: sanitize_numeric(&resolve_string(raw, SERVICE_LIFT_KEYS)),
        amenities: normalize_amenities(raw),
        material,
        floor_rise_charge: normalize_charge(raw, FLOOR_RISE_KEYS),
        facing_charge: normalize_charge(raw, FACING_CHARGE_KEYS),
        plc_charge: normalize_charge(raw, PLC_CHARGE_KEYS),
    }
}

fn normalize_amenities(raw: &Value) -> Vec<Amenity> {
    let mut amenities = Vec::new();
    for entry in string_list(raw, AMENITIES_KEYS) {
        match Amenity::from_raw(&entry) {
            Some(amenity) if !amenities.contains(&amenity) => amenities.push(amenity),
            Some(_) => {}
            None => tracing::debug!("Dropping unrecognized amenity '{}'", entry),
        }
    }
    amenities
}

/// Pricing charges are stored either as `{applicable, value}` objects or
/// as bare legacy scalars where presence implies applicability.
fn normalize_charge(raw: &Value, keys: &[&str]) -> ExtraCharge {
    match resolve(raw, keys) {
        Some(charge @ Value::Object(_)) => {
            let value = sanitize_numeric(&resolve_string(charge, &["value", "Value", "amount"]));
            let applicable = match resolve(charge, &["applicable", "Applicable", "is_applicable"]) {
                Some(flag) => value_truthy(flag),
                None => !value.is_empty(),
            };
            ExtraCharge { applicable, value }
        }
        Some(scalar) => {
            let value = sanitize_numeric(&scalar_to_string(scalar));
            ExtraCharge {
                applicable: !value.is_empty(),
                value,
            }
        }
        None => ExtraCharge::default(),
    }
}

/// Rebuilds the nested unit-type map from the flat `configurations`
/// array, grouping by canonicalized type label and inferring the
/// Villa-vs-Apartment variant shape from which size keys are present.
fn normalize_units(raw: &Value) -> UnitsSection {
    let mut section = UnitsSection::default();
    let Some(configs) = resolve_array(raw, CONFIGURATIONS_KEYS) else {
        return section;
    };

    for config in configs {
        let type_raw = resolve_string(config, &["type", "Type", "unitType", "unit_type"]);
        let Some(label) = canonical_unit_label(&type_raw) else {
            tracing::debug!("Skipping configuration without a unit type: {}", config);
            continue;
        };

        let is_villa = resolve(
            config,
            &["sizeSqFt", "SizeSqFt", "size_sqft", "sizeSqYd", "SizeSqYd", "size_sqyd"],
        )
        .is_some();
        let size = if is_villa {
            crate::models::VariantSize::Villa {
                size_sqft: sanitize_numeric(&resolve_string(
                    config,
                    &["sizeSqFt", "SizeSqFt", "size_sqft"],
                )),
                size_sqyd: sanitize_numeric(&resolve_string(
                    config,
                    &["sizeSqYd", "SizeSqYd", "size_sqyd"],
                )),
            }
        } else {
            let unit = resolve_string(config, &["sizeUnit", "SizeUnit", "size_unit"]);
            crate::models::VariantSize::Apartment {
                size: sanitize_numeric(&resolve_string(
                    config,
                    &["sizeRange", "SizeRange", "size_range", "size"],
                )),
                size_unit: if unit.is_empty() { "Sq ft".to_string() } else { unit },
            }
        };

        let variant = UnitVariant {
            size,
            parking_slots: sanitize_numeric(&resolve_string(
                config,
                &[
                    "No_of_car_Parking",
                    "noOfCarParking",
                    "no_of_car_parking",
                    "parkingSlots",
                    "parking_slots",
                ],
            )),
            facing: Facing::from_raw(&resolve_string(config, &["facing", "Facing"])),
            uds: sanitize_numeric(&resolve_string(config, &["uds", "UDS"])),
            sold_out: resolve_bool(config, &["soldOut", "SoldOut", "sold_out"]),
        };

        section
            .unit_types
            .entry(label)
            .or_insert_with(|| UnitTypeEntry {
                enabled: true,
                variants: Vec::new(),
            })
            .variants
            .push(variant);
    }

    section
}

fn normalize_builder(raw: &Value) -> BuilderSection {
    BuilderSection {
        years_in_operation: sanitize_numeric(&resolve_string(raw, BUILDER_AGE_KEYS)),
        completed_projects: sanitize_numeric(&resolve_string(raw, COMPLETED_KEYS)),
        ongoing_projects: sanitize_numeric(&resolve_string(raw, ONGOING_KEYS)),
        operating_locations: string_list(raw, LOCATIONS_KEYS),
    }
}

fn normalize_financial(raw: &Value) -> FinancialSection {
    FinancialSection {
        token_advance: sanitize_numeric(&resolve_string(raw, TOKEN_ADVANCE_KEYS)),
        booking_amount: sanitize_numeric(&resolve_string(raw, BOOKING_KEYS)),
        maintenance_per_sqft: sanitize_numeric(&resolve_string(raw, MAINTENANCE_KEYS)),
        corpus_fund: sanitize_numeric(&resolve_string(raw, CORPUS_KEYS)),
        banks: string_list(raw, BANKS_KEYS),
    }
}

fn normalize_secondary(raw: &Value) -> SecondarySection {
    SecondarySection {
        commission_pct: sanitize_numeric(&resolve_string(raw, COMMISSION_KEYS)),
        payout_terms: resolve_string(raw, PAYOUT_KEYS),
        lead_registration: normalize_registration(raw),
        pocs: normalize_pocs(raw),
    }
}

fn normalize_registration(raw: &Value) -> LeadRegistrationPolicy {
    let container = resolve(raw, LEAD_REG_KEYS);
    LeadRegistrationPolicy {
        whatsapp: registration_channel(
            raw,
            container,
            &["whatsapp", "Whatsapp", "whats_app"],
            &["whatsappRegistration", "whatsapp_registration"],
            &["whatsappRegistrationDetails", "whatsapp_registration_details"],
        ),
        email: registration_channel(
            raw,
            container,
            &["email", "Email"],
            &["emailRegistration", "email_registration"],
            &["emailRegistrationDetails", "email_registration_details"],
        ),
        portal: registration_channel(
            raw,
            container,
            &["portal", "Portal"],
            &["portalRegistration", "portal_registration"],
            &["portalRegistrationDetails", "portal_registration_details"],
        ),
    }
}

/// Channel policy comes either nested under a `leadRegistration` object
/// (as `{enabled, details}` or a bare boolean) or as flat legacy
/// flag/details key pairs.
fn registration_channel(
    raw: &Value,
    container: Option<&Value>,
    channel_keys: &[&str],
    flag_keys: &[&str],
    details_keys: &[&str],
) -> RegistrationChannel {
    if let Some(channel) = container.and_then(|c| resolve(c, channel_keys)) {
        return match channel {
            Value::Object(_) => RegistrationChannel {
                enabled: resolve_bool(channel, &["enabled", "Enabled"]),
                details: resolve_string(channel, &["details", "Details"]),
            },
            other => RegistrationChannel {
                enabled: value_truthy(other),
                details: String::new(),
            },
        };
    }
    RegistrationChannel {
        enabled: resolve_bool(raw, flag_keys),
        details: resolve_string(raw, details_keys),
    }
}

/// Rebuilds the POC list from whichever shape the record carries:
/// a `pocDetails` array (preferred), the singular legacy POC field set,
/// or a `person_to_confirm_registration` array/object.
fn normalize_pocs(raw: &Value) -> Vec<PocEntry> {
    if let Some(details) = resolve_array(raw, POC_DETAILS_KEYS) {
        let pocs: Vec<PocEntry> = details.iter().filter_map(poc_from_entry).collect();
        if !pocs.is_empty() {
            return pocs;
        }
    }

    let legacy_name = resolve_string(raw, LEGACY_POC_NAME_KEYS);
    if !legacy_name.trim().is_empty() {
        let cp_status = resolve(raw, LEGACY_CP_FLAG_KEYS).and_then(CpStatus::from_value);
        return vec![PocEntry {
            name: legacy_name,
            contact: resolve_string(raw, LEGACY_POC_CONTACT_KEYS),
            role: resolve_string(raw, LEGACY_POC_ROLE_KEYS),
            cp_status,
        }];
    }

    match resolve(raw, PERSON_CONFIRM_KEYS) {
        Some(Value::Array(entries)) => entries.iter().filter_map(poc_from_entry).collect(),
        Some(entry @ Value::Object(_)) => poc_from_entry(entry).into_iter().collect(),
        _ => Vec::new(),
    }
}

fn poc_from_entry(entry: &Value) -> Option<PocEntry> {
    let name = resolve_string(entry, &["name", "Name", "pocName", "poc_name"]);
    let contact = resolve_string(
        entry,
        &["contact", "Contact", "phone", "mobile", "contactNumber", "contact_number"],
    );
    if name.trim().is_empty() && contact.trim().is_empty() {
        return None;
    }
    let cp_status = resolve(entry, &["cpStatus", "CpStatus", "cp_status", "isCp", "is_cp"])
        .and_then(CpStatus::from_value);
    Some(PocEntry {
        name,
        contact,
        role: resolve_string(entry, &["role", "Role", "designation", "Designation"]),
        cp_status,
    })
}

/// Reads a list field stored either as a JSON array of scalars or as a
/// comma-separated string.
fn string_list(raw: &Value, keys: &[&str]) -> Vec<String> {
    match resolve(raw, keys) {
        Some(Value::Array(items)) => items
            .iter()
            .map(scalar_to_string)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}
