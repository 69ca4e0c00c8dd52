/// Round-trip and idempotence guarantees between the inbound normalizer
/// and the outbound serializer
use chrono::NaiveDate;
use property_intake_core::models::{
    Amenity, BasicsSection, BuilderSection, CommunityType, ConstructionMaterial,
    ConstructionSection, ConstructionStatus, CpStatus, ExtraCharge, Facing, FinancialSection,
    FormModel, PocEntry, ProjectType, RegistrationChannel, SecondarySection, UnitSystem,
    UnitTypeEntry, UnitVariant, VariantSize,
};
use property_intake_core::normalize::normalize_with_today;
use property_intake_core::serialize::serialize;
use serde_json::json;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 28).unwrap()
}

/// A fully populated acres-system form model using only
/// currently-supported fields.
fn populated_form() -> FormModel {
    let mut form = FormModel {
        basics: BasicsSection {
            project_name: "Lakeside Heights".to_string(),
            builder_name: "Acme Developers".to_string(),
            rera_number: "P52100034567".to_string(),
            area: "Whitefield".to_string(),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            project_type: Some(ProjectType::Apartment),
            community_type: Some(CommunityType::Gated),
            towers: "4".to_string(),
            floors_per_tower: "14".to_string(),
            total_units: "240".to_string(),
            unit_system: UnitSystem::AcresPercent,
            land_area: "2.5".to_string(),
            open_space: "75".to_string(),
            open_space_pct: String::new(),
            launch_date: "01/06/2025".to_string(),
            possession_date: "RTM".to_string(),
            construction_status: Some(ConstructionStatus::Rtm),
        },
        construction: ConstructionSection {
            buildup_area: "1200000".to_string(),
            fsi: "1.75".to_string(),
            uds: "0.5".to_string(),
            carpet_area_pct: "68".to_string(),
            ceiling_height: "10".to_string(),
            price_per_sqft: "6500".to_string(),
            passenger_lifts: "2".to_string(),
            service_lifts: "1".to_string(),
            amenities: vec![Amenity::Clubhouse, Amenity::SwimmingPool, Amenity::Gym],
            material: Some(ConstructionMaterial::RedBricks),
            floor_rise_charge: ExtraCharge {
                applicable: true,
                value: "50".to_string(),
            },
            facing_charge: ExtraCharge::default(),
            plc_charge: ExtraCharge {
                applicable: true,
                value: "150".to_string(),
            },
        },
        builder: BuilderSection {
            years_in_operation: "18".to_string(),
            completed_projects: "22".to_string(),
            ongoing_projects: "5".to_string(),
            operating_locations: vec!["Bengaluru".to_string(), "Hyderabad".to_string()],
        },
        financial: FinancialSection {
            token_advance: "100000".to_string(),
            booking_amount: "500000".to_string(),
            maintenance_per_sqft: "4.5".to_string(),
            corpus_fund: "200000".to_string(),
            banks: vec!["HDFC".to_string(), "SBI".to_string()],
        },
        secondary: SecondarySection {
            commission_pct: "2".to_string(),
            payout_terms: "45 days from registration".to_string(),
            lead_registration: Default::default(),
            pocs: vec![
                PocEntry {
                    name: "Ravi".to_string(),
                    contact: "9876543210".to_string(),
                    role: "Sales Head".to_string(),
                    cp_status: Some(CpStatus::Accepting),
                },
                PocEntry {
                    name: "Meera".to_string(),
                    contact: "9123456780".to_string(),
                    role: "CRM".to_string(),
                    cp_status: None,
                },
            ],
        },
        units: Default::default(),
    };

    form.secondary.lead_registration.whatsapp = RegistrationChannel {
        enabled: true,
        details: "share RERA id first".to_string(),
    };

    form.units.unit_types.insert(
        "2 BHK".to_string(),
        UnitTypeEntry {
            enabled: true,
            variants: vec![UnitVariant {
                size: VariantSize::Apartment {
                    size: "1200".to_string(),
                    size_unit: "Sq ft".to_string(),
                },
                parking_slots: "1".to_string(),
                facing: Some(Facing::East),
                uds: "0.5".to_string(),
                sold_out: false,
            }],
        },
    );
    form.units.unit_types.insert(
        "Villa".to_string(),
        UnitTypeEntry {
            enabled: true,
            variants: vec![UnitVariant {
                size: VariantSize::Villa {
                    size_sqft: "2400".to_string(),
                    size_sqyd: "267".to_string(),
                },
                parking_slots: "2".to_string(),
                facing: Some(Facing::NorthEast),
                uds: String::new(),
                sold_out: true,
            }],
        },
    );

    form
}

#[cfg(test)]
mod round_trip_tests {
    use super::*;

    #[test]
    fn test_acres_system_round_trip() {
        let form = populated_form();
        let payload = serialize(&form);
        let reloaded = normalize_with_today(&payload, today());
        assert_eq!(reloaded, form);
    }

    #[test]
    fn test_sqmt_system_round_trip() {
        let mut form = populated_form();
        form.basics.rera_number = "PRM/KA/RERA/1251/446/PR/010203/004567".to_string();
        form.basics.unit_system = UnitSystem::SqmtAbsolute;
        // Values chosen to convert exactly both ways
        form.basics.land_area = "8093.72".to_string();
        form.basics.open_space = "2023.43".to_string();
        form.basics.open_space_pct = "25".to_string();
        form.construction.buildup_area = "100".to_string();

        let payload = serialize(&form);
        assert_eq!(payload["landArea"], "2");
        assert_eq!(payload["openSpace"], "25");
        assert_eq!(payload["buildupArea"], "1076.39");

        let reloaded = normalize_with_today(&payload, today());
        assert_eq!(reloaded, form);
    }

    #[test]
    fn test_unknown_material_collapses_lossily() {
        // Documented lossy default: any unknown stored material becomes
        // Concrete and stays Concrete across round trips
        let raw = json!({
            "projectName": "X",
            "builderName": "Y",
            "reraNumber": "P1",
            "constructionMaterial": "adobe",
        });
        let first = normalize_with_today(&raw, today());
        assert_eq!(first.construction.material, Some(ConstructionMaterial::Concrete));

        let second = normalize_with_today(&serialize(&first), today());
        assert_eq!(second.construction.material, Some(ConstructionMaterial::Concrete));
    }

    #[test]
    fn test_disabled_unit_types_drop_on_round_trip() {
        let mut form = populated_form();
        form.units.unit_types.insert(
            "3 BHK".to_string(),
            UnitTypeEntry {
                enabled: false,
                variants: vec![UnitVariant::default()],
            },
        );

        let reloaded = normalize_with_today(&serialize(&form), today());
        // The disabled entry does not survive; everything else does
        assert!(!reloaded.units.unit_types.contains_key("3 BHK"));
        assert!(reloaded.units.unit_types.contains_key("2 BHK"));
    }
}

#[cfg(test)]
mod idempotence_tests {
    use super::*;

    #[test]
    fn test_normalizer_is_idempotent_over_canonical_payloads() {
        let raw = json!({
            "ProjectName": "Sunrise Meadows",
            "builder_name": "Urban Living",
            "reraNumber": "P52100011111",
            "landArea": "3.2 acres",
            "possession_date": "2027-03-15",
            "configurations": [
                {"type": "2BHK", "sizeRange": 1150, "sizeUnit": "Sq ft", "No_of_car_Parking": 1}
            ],
            "pocName": "Suresh",
            "cpAccepting": true,
        });

        let first = normalize_with_today(&raw, today());
        let second = normalize_with_today(&serialize(&first), today());
        assert_eq!(second, first);
    }

    #[test]
    fn test_sqmt_idempotence_after_first_pass() {
        let raw = json!({
            "reraNumber": "PRM/KA/RERA/1251/446/PR/010203/004567",
            "projectName": "Metric Towers",
            "builderName": "Precise Builders",
            "landArea": "2",
            "openSpace": "25",
            "buildupArea": "1076.39",
        });

        let first = normalize_with_today(&raw, today());
        assert_eq!(first.basics.land_area, "8093.72");

        let second = normalize_with_today(&serialize(&first), today());
        assert_eq!(second, first);
    }
}
