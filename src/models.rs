use crate::units::sanitize_numeric;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

// ============ Canonical Form Model ============
//
// The single in-memory representation every raw schema variant is mapped
// into. It lives only for the duration of an editing session: built fresh
// for a new submission or populated by the inbound normalizer, and turned
// back into a flat persistence payload on submit. It is never persisted
// itself.

/// Canonical nested form model for a property submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormModel {
    pub basics: BasicsSection,
    pub construction: ConstructionSection,
    pub units: UnitsSection,
    pub builder: BuilderSection,
    pub financial: FinancialSection,
    pub secondary: SecondarySection,
}

/// Project identity and scale.
///
/// Numeric fields are kept as strings: the form tolerates free-text entry
/// ("~120 units") and the serializer reduces each to its first numeric
/// token before storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicsSection {
    pub project_name: String,
    pub builder_name: String,
    /// Government registration identifier; its `PRM/KA/RERA/` prefix
    /// doubles as the metric-units marker (see [`UnitSystem`]).
    pub rera_number: String,
    pub area: String,
    pub city: String,
    pub state: String,
    pub project_type: Option<ProjectType>,
    pub community_type: Option<CommunityType>,
    pub towers: String,
    pub floors_per_tower: String,
    pub total_units: String,
    /// Input-unit system for land area and open space, selected once per
    /// record. A single shared flag keeps the two fields consistent by
    /// construction.
    pub unit_system: UnitSystem,
    /// Land area in acres (acres system) or square meters (sqmt system).
    pub land_area: String,
    /// Open space as a percentage (acres system) or absolute square
    /// meters (sqmt system).
    pub open_space: String,
    /// Last known open-space percentage, carried for sqmt-system records
    /// so the serializer has a fallback when the sqmt pair is incomplete.
    pub open_space_pct: String,
    /// `DD/MM/YYYY` or the literal `"RTM"`.
    pub launch_date: String,
    /// `DD/MM/YYYY` or the literal `"RTM"`.
    pub possession_date: String,
    /// Seeded from the possession date by the normalizer; user edits may
    /// override it afterwards.
    pub construction_status: Option<ConstructionStatus>,
}

/// Build quality and pricing-charge details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstructionSection {
    /// Buildup area in sqft (acres system) or sqmt (sqmt system).
    pub buildup_area: String,
    pub fsi: String,
    pub uds: String,
    pub carpet_area_pct: String,
    pub ceiling_height: String,
    pub price_per_sqft: String,
    pub passenger_lifts: String,
    pub service_lifts: String,
    pub amenities: Vec<Amenity>,
    pub material: Option<ConstructionMaterial>,
    pub floor_rise_charge: ExtraCharge,
    pub facing_charge: ExtraCharge,
    pub plc_charge: ExtraCharge,
}

/// A pricing charge gated by an "applicable" flag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtraCharge {
    pub applicable: bool,
    pub value: String,
}

/// Unit-type inventory, keyed by canonical unit-type label ("2 BHK",
/// "Villa", "Commercial", ...).
///
/// The flat `configurations` array used by the persistence schema is a
/// pure derivation over this map ([`UnitsSection::configurations`]); it
/// is never stored redundantly, so nested and flat views cannot drift.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitsSection {
    pub unit_types: BTreeMap<String, UnitTypeEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitTypeEntry {
    pub enabled: bool,
    pub variants: Vec<UnitVariant>,
}

/// One size/facing variant within a unit type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitVariant {
    pub size: VariantSize,
    pub parking_slots: String,
    pub facing: Option<Facing>,
    pub uds: String,
    pub sold_out: bool,
}

/// Villa variants carry paired sqft/sqyd sizes; apartment variants a
/// single size plus its unit label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VariantSize {
    Apartment { size: String, size_unit: String },
    Villa { size_sqft: String, size_sqyd: String },
}

impl Default for VariantSize {
    fn default() -> Self {
        VariantSize::Apartment {
            size: String::new(),
            size_unit: "Sq ft".to_string(),
        }
    }
}

/// Builder reputation metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuilderSection {
    pub years_in_operation: String,
    pub completed_projects: String,
    pub ongoing_projects: String,
    pub operating_locations: Vec<String>,
}

/// Pricing and loan-related fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialSection {
    pub token_advance: String,
    pub booking_amount: String,
    pub maintenance_per_sqft: String,
    pub corpus_fund: String,
    pub banks: Vec<String>,
}

/// Commission terms, lead-registration policy, and points of contact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecondarySection {
    pub commission_pct: String,
    pub payout_terms: String,
    pub lead_registration: LeadRegistrationPolicy,
    pub pocs: Vec<PocEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadRegistrationPolicy {
    pub whatsapp: RegistrationChannel,
    pub email: RegistrationChannel,
    pub portal: RegistrationChannel,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistrationChannel {
    pub enabled: bool,
    pub details: String,
}

/// Point of contact for lead handling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PocEntry {
    pub name: String,
    pub contact: String,
    pub role: String,
    pub cp_status: Option<CpStatus>,
}

// ============ Enums & Remap Tables ============

/// Input-unit system for land area and open space.
///
/// Selected by the RERA-number prefix `PRM/KA/RERA/`, a data convention
/// in the stored records rather than a protocol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitSystem {
    /// Land area in acres, open space as a percentage.
    #[default]
    AcresPercent,
    /// Land area and open space in square meters.
    SqmtAbsolute,
}

/// RERA-number prefix marking metric-input records.
pub const SQMT_RERA_PREFIX: &str = "PRM/KA/RERA/";

impl UnitSystem {
    /// Detects the unit system from a RERA number.
    pub fn from_rera(rera_number: &str) -> Self {
        if rera_number.trim().starts_with(SQMT_RERA_PREFIX) {
            UnitSystem::SqmtAbsolute
        } else {
            UnitSystem::AcresPercent
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectType {
    Apartment,
    Villa,
    VillaApartment,
}

impl ProjectType {
    pub fn from_raw(raw: &str) -> Option<Self> {
        match compact(raw).as_str() {
            "apartment" | "flat" | "flats" => Some(ProjectType::Apartment),
            "villa" => Some(ProjectType::Villa),
            "villaapartment" => Some(ProjectType::VillaApartment),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Apartment => "Apartment",
            ProjectType::Villa => "Villa",
            ProjectType::VillaApartment => "Villa Apartment",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommunityType {
    Gated,
    SemiGated,
    Standalone,
}

impl CommunityType {
    pub fn from_raw(raw: &str) -> Option<Self> {
        match compact(raw).as_str() {
            "gated" | "gatedcommunity" => Some(CommunityType::Gated),
            "semigated" | "semigatedcommunity" => Some(CommunityType::SemiGated),
            "standalone" => Some(CommunityType::Standalone),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CommunityType::Gated => "Gated",
            CommunityType::SemiGated => "Semi-Gated",
            CommunityType::Standalone => "Standalone",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstructionStatus {
    UnderConstruction,
    AboutToRtm,
    Rtm,
}

impl ConstructionStatus {
    pub fn from_raw(raw: &str) -> Option<Self> {
        match compact(raw).as_str() {
            "underconstruction" => Some(ConstructionStatus::UnderConstruction),
            "abouttortm" => Some(ConstructionStatus::AboutToRtm),
            "rtm" | "readytomove" => Some(ConstructionStatus::Rtm),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConstructionStatus::UnderConstruction => "Under Construction",
            ConstructionStatus::AboutToRtm => "About to RTM",
            ConstructionStatus::Rtm => "RTM",
        }
    }
}

/// Construction material, with the remap table covering every raw value
/// observed in storage. Unknown values collapse to `Concrete`, a
/// documented lossy default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstructionMaterial {
    RedBricks,
    CementBricks,
    Concrete,
}

impl ConstructionMaterial {
    pub fn from_raw(raw: &str) -> Self {
        match compact(raw).as_str() {
            "brick" | "bricks" | "redbrick" | "redbricks" => ConstructionMaterial::RedBricks,
            "cementbrick" | "cementbricks" | "cementblock" | "cementblocks" => {
                ConstructionMaterial::CementBricks
            }
            "rcc" | "concrete" => ConstructionMaterial::Concrete,
            other => {
                if !other.is_empty() {
                    tracing::debug!(
                        "Unknown construction material '{}', defaulting to Concrete",
                        raw
                    );
                }
                ConstructionMaterial::Concrete
            }
        }
    }

    /// Canonical display label.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstructionMaterial::RedBricks => "Red Bricks",
            ConstructionMaterial::CementBricks => "Cement Bricks",
            ConstructionMaterial::Concrete => "Concrete",
        }
    }

    /// Storage vocabulary: the inbound remap table applied in reverse.
    pub fn as_storage(&self) -> &'static str {
        match self {
            ConstructionMaterial::RedBricks => "Brick",
            ConstructionMaterial::CementBricks => "cement brick",
            ConstructionMaterial::Concrete => "RCC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    East,
    West,
    North,
    South,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Facing {
    pub fn from_raw(raw: &str) -> Option<Self> {
        match compact(raw).as_str() {
            "east" => Some(Facing::East),
            "west" => Some(Facing::West),
            "north" => Some(Facing::North),
            "south" => Some(Facing::South),
            "northeast" => Some(Facing::NorthEast),
            "northwest" => Some(Facing::NorthWest),
            "southeast" => Some(Facing::SouthEast),
            "southwest" => Some(Facing::SouthWest),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Facing::East => "East",
            Facing::West => "West",
            Facing::North => "North",
            Facing::South => "South",
            Facing::NorthEast => "North-East",
            Facing::NorthWest => "North-West",
            Facing::SouthEast => "South-East",
            Facing::SouthWest => "South-West",
        }
    }
}

/// Channel-partner co-broking status of a POC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CpStatus {
    Accepting,
    OnBoarded,
    NotAccepted,
}

impl CpStatus {
    pub fn from_raw(raw: &str) -> Option<Self> {
        match compact(raw).as_str() {
            "accepting" => Some(CpStatus::Accepting),
            "onboarded" => Some(CpStatus::OnBoarded),
            "notaccepted" => Some(CpStatus::NotAccepted),
            _ => None,
        }
    }

    /// Migrates the legacy boolean CP flag: `true` means accepting,
    /// `false` or absent means no status.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(true) => Some(CpStatus::Accepting),
            Value::Bool(false) => None,
            Value::String(s) => CpStatus::from_raw(s),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CpStatus::Accepting => "Accepting",
            CpStatus::OnBoarded => "On-boarded",
            CpStatus::NotAccepted => "Not-accepted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Amenity {
    Clubhouse,
    Gym,
    SwimmingPool,
    ChildrensPlayArea,
    Park,
    PowerBackup,
    Security,
    IndoorGames,
    JoggingTrack,
    TennisCourt,
    BasketballCourt,
    MultipurposeHall,
    ConvenienceStore,
    Temple,
}

impl Amenity {
    pub fn from_raw(raw: &str) -> Option<Self> {
        match compact(raw).as_str() {
            "clubhouse" => Some(Amenity::Clubhouse),
            "gym" | "gymnasium" => Some(Amenity::Gym),
            "swimmingpool" | "pool" => Some(Amenity::SwimmingPool),
            "childrensplayarea" | "kidsplayarea" | "playarea" => Some(Amenity::ChildrensPlayArea),
            "park" | "landscapedgardens" => Some(Amenity::Park),
            "powerbackup" => Some(Amenity::PowerBackup),
            "security" | "24x7security" => Some(Amenity::Security),
            "indoorgames" => Some(Amenity::IndoorGames),
            "joggingtrack" => Some(Amenity::JoggingTrack),
            "tenniscourt" => Some(Amenity::TennisCourt),
            "basketballcourt" => Some(Amenity::BasketballCourt),
            "multipurposehall" | "banquethall" => Some(Amenity::MultipurposeHall),
            "conveniencestore" | "supermarket" => Some(Amenity::ConvenienceStore),
            "temple" => Some(Amenity::Temple),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Amenity::Clubhouse => "Clubhouse",
            Amenity::Gym => "Gym",
            Amenity::SwimmingPool => "Swimming Pool",
            Amenity::ChildrensPlayArea => "Children's Play Area",
            Amenity::Park => "Park",
            Amenity::PowerBackup => "Power Backup",
            Amenity::Security => "Security",
            Amenity::IndoorGames => "Indoor Games",
            Amenity::JoggingTrack => "Jogging Track",
            Amenity::TennisCourt => "Tennis Court",
            Amenity::BasketballCourt => "Basketball Court",
            Amenity::MultipurposeHall => "Multipurpose Hall",
            Amenity::ConvenienceStore => "Convenience Store",
            Amenity::Temple => "Temple",
        }
    }
}

/// Lowercases and strips everything but letters, digits, `+` and `.` so
/// raw enum values match regardless of spacing, hyphens, or case.
fn compact(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '+' || *c == '.')
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Canonicalizes a raw unit-type string to its display label.
///
/// `"2BHK"`, `"2 bhk"`, and `"2 BHK"` all map to `"2 BHK"`; named types
/// get their fixed spelling; anything else unrecognized is kept trimmed
/// as-is rather than dropped.
pub fn canonical_unit_label(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let compacted = compact(trimmed);
    match compacted.as_str() {
        "studio" => Some("Studio".to_string()),
        "villa" => Some("Villa".to_string()),
        "duplex" => Some("Duplex".to_string()),
        "penthouse" => Some("Penthouse".to_string()),
        "commercial" => Some("Commercial".to_string()),
        _ => {
            if let Some(prefix) = compacted.strip_suffix("bhk") {
                if !prefix.is_empty()
                    && prefix
                        .chars()
                        .all(|c| c.is_ascii_digit() || c == '.' || c == '+')
                {
                    return Some(format!("{} BHK", prefix));
                }
            }
            Some(trimmed.to_string())
        }
    }
}

impl UnitsSection {
    /// Derives the flat `configurations` array the persistence schema
    /// expects. Disabled unit types and empty variant lists are dropped.
    pub fn configurations(&self) -> Vec<Value> {
        let mut flat = Vec::new();
        for (label, entry) in &self.unit_types {
            if !entry.enabled || entry.variants.is_empty() {
                continue;
            }
            for variant in &entry.variants {
                // Numeric variant fields are free-text tolerant like every
                // other form field and get the same first-token reduction
                // on the way to storage.
                let mut config = serde_json::Map::new();
                config.insert("type".to_string(), json!(label));
                config.insert(
                    "No_of_car_Parking".to_string(),
                    json!(sanitize_numeric(&variant.parking_slots)),
                );
                config.insert(
                    "facing".to_string(),
                    json!(variant.facing.map(|f| f.as_str()).unwrap_or("")),
                );
                config.insert("uds".to_string(), json!(sanitize_numeric(&variant.uds)));
                config.insert("soldOut".to_string(), json!(variant.sold_out));
                match &variant.size {
                    VariantSize::Apartment { size, size_unit } => {
                        config.insert("sizeRange".to_string(), json!(sanitize_numeric(size)));
                        config.insert("sizeUnit".to_string(), json!(size_unit));
                    }
                    VariantSize::Villa { size_sqft, size_sqyd } => {
                        config.insert("sizeSqFt".to_string(), json!(sanitize_numeric(size_sqft)));
                        config.insert("sizeSqYd".to_string(), json!(sanitize_numeric(size_sqyd)));
                    }
                }
                flat.push(Value::Object(config));
            }
        }
        flat
    }
}
