/// Unit tests for the inbound normalizer
/// Covers field resolution across naming conventions, unit-system
/// handling, unit-type reconstruction, POC migration, and status
/// derivation.
use chrono::{Duration, NaiveDate};
use property_intake_core::models::{
    ConstructionMaterial, ConstructionStatus, CpStatus, Facing, UnitSystem, VariantSize,
};
use property_intake_core::normalize::{derive_construction_status, normalize_with_today};
use serde_json::json;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 28).unwrap()
}

fn form_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

#[cfg(test)]
mod field_resolution_tests {
    use super::*;

    #[test]
    fn test_current_keys_win_over_legacy() {
        let raw = json!({
            "projectName": "Current",
            "ProjectName": "Mongo",
            "project_name": "Supabase",
        });
        let form = normalize_with_today(&raw, today());
        assert_eq!(form.basics.project_name, "Current");
    }

    #[test]
    fn test_legacy_pascal_case_record() {
        let raw = json!({
            "ProjectName": "Sunrise Meadows",
            "BuilderName": "Acme Developers",
            "ReraNumber": "P52100034567",
            "NoOfTowers": "4 towers",
            "FloorsPerTower": 14,
        });
        let form = normalize_with_today(&raw, today());
        assert_eq!(form.basics.project_name, "Sunrise Meadows");
        assert_eq!(form.basics.builder_name, "Acme Developers");
        assert_eq!(form.basics.towers, "4");
        assert_eq!(form.basics.floors_per_tower, "14");
    }

    #[test]
    fn test_snake_case_record() {
        let raw = json!({
            "project_name": "Green Acres",
            "builder_name": "Urban Living",
            "rera_number": "P52100011111",
            "total_units": "approx 240 units",
            "price_per_sqft": "Rs 6500",
        });
        let form = normalize_with_today(&raw, today());
        assert_eq!(form.basics.project_name, "Green Acres");
        assert_eq!(form.basics.total_units, "240");
        assert_eq!(form.construction.price_per_sqft, "6500");
    }

    #[test]
    fn test_malformed_record_degrades_silently() {
        for raw in [json!(null), json!("not an object"), json!([1, 2, 3]), json!({})] {
            let form = normalize_with_today(&raw, today());
            assert_eq!(form.basics.project_name, "");
            assert!(form.units.unit_types.is_empty());
            assert!(form.secondary.pocs.is_empty());
        }
    }

    #[test]
    fn test_enum_fields_tolerate_loose_casing() {
        let raw = json!({
            "projectType": "villa apartment",
            "communityType": "SEMI GATED",
            "constructionMaterial": "cement brick",
        });
        let form = normalize_with_today(&raw, today());
        assert_eq!(
            form.basics.project_type.map(|t| t.as_str()),
            Some("Villa Apartment")
        );
        assert_eq!(
            form.basics.community_type.map(|t| t.as_str()),
            Some("Semi-Gated")
        );
        assert_eq!(
            form.construction.material,
            Some(ConstructionMaterial::CementBricks)
        );
    }

    #[test]
    fn test_unknown_material_defaults_to_concrete() {
        let raw = json!({"constructionMaterial": "bamboo"});
        let form = normalize_with_today(&raw, today());
        assert_eq!(form.construction.material, Some(ConstructionMaterial::Concrete));

        // Missing material stays unset, it does not default
        let empty = normalize_with_today(&json!({}), today());
        assert_eq!(empty.construction.material, None);
    }
}

#[cfg(test)]
mod unit_system_tests {
    use super::*;

    #[test]
    fn test_acres_system_passthrough() {
        let raw = json!({
            "reraNumber": "P52100034567",
            "landArea": "2.5 acres",
            "openSpace": "75%",
            "buildupArea": "1200000 sqft",
        });
        let form = normalize_with_today(&raw, today());
        assert_eq!(form.basics.unit_system, UnitSystem::AcresPercent);
        assert_eq!(form.basics.land_area, "2.5");
        assert_eq!(form.basics.open_space, "75");
        assert_eq!(form.construction.buildup_area, "1200000");
    }

    #[test]
    fn test_sqmt_system_reverse_derives_from_acres() {
        // Stored value below the threshold is treated as converted acres
        let raw = json!({
            "reraNumber": "PRM/KA/RERA/1251/446/PR/010203/004567",
            "landArea": "2",
            "openSpace": "25",
        });
        let form = normalize_with_today(&raw, today());
        assert_eq!(form.basics.unit_system, UnitSystem::SqmtAbsolute);
        assert_eq!(form.basics.land_area, "8093.72");
        // 25% of the derived sqmt value
        assert_eq!(form.basics.open_space, "2023.43");
        assert_eq!(form.basics.open_space_pct, "25");
    }

    #[test]
    fn test_sqmt_system_keeps_large_legacy_values() {
        // Above the threshold the stored value is assumed to be raw
        // legacy square meters already
        let raw = json!({
            "reraNumber": "PRM/KA/RERA/1251/446/PR/010203/004567",
            "landArea": "8093.72",
        });
        let form = normalize_with_today(&raw, today());
        assert_eq!(form.basics.land_area, "8093.72");
    }

    #[test]
    fn test_sqmt_system_buildup_area_from_sqft() {
        let raw = json!({
            "reraNumber": "PRM/KA/RERA/1251/446/PR/010203/004567",
            "buildupArea": "1076.39",
        });
        let form = normalize_with_today(&raw, today());
        assert_eq!(form.construction.buildup_area, "100");
    }

    #[test]
    fn test_sqmt_open_space_without_land_area() {
        let raw = json!({
            "reraNumber": "PRM/KA/RERA/1251/446/PR/010203/004567",
            "openSpace": "30",
        });
        let form = normalize_with_today(&raw, today());
        // No land area to compute against; only the percentage survives
        assert_eq!(form.basics.open_space, "");
        assert_eq!(form.basics.open_space_pct, "30");
    }
}

#[cfg(test)]
mod status_derivation_tests {
    use super::*;

    #[test]
    fn test_possession_today_is_rtm() {
        let status = derive_construction_status(&form_date(today()), today());
        assert_eq!(status, Some(ConstructionStatus::Rtm));
    }

    #[test]
    fn test_past_possession_is_rtm() {
        let past = today() - Duration::days(400);
        let status = derive_construction_status(&form_date(past), today());
        assert_eq!(status, Some(ConstructionStatus::Rtm));
    }

    #[test]
    fn test_possession_in_45_days_is_about_to_rtm() {
        let soon = today() + Duration::days(45);
        let status = derive_construction_status(&form_date(soon), today());
        assert_eq!(status, Some(ConstructionStatus::AboutToRtm));
    }

    #[test]
    fn test_possession_in_200_days_is_under_construction() {
        let later = today() + Duration::days(200);
        let status = derive_construction_status(&form_date(later), today());
        assert_eq!(status, Some(ConstructionStatus::UnderConstruction));
    }

    #[test]
    fn test_rtm_sentinel_and_garbage() {
        assert_eq!(
            derive_construction_status("RTM", today()),
            Some(ConstructionStatus::Rtm)
        );
        assert_eq!(derive_construction_status("soon-ish", today()), None);
        assert_eq!(derive_construction_status("", today()), None);
    }

    #[test]
    fn test_explicit_status_wins_over_derivation() {
        let later = today() + Duration::days(300);
        let raw = json!({
            "constructionStatus": "RTM",
            "possessionDate": later.format("%Y-%m-%d").to_string(),
        });
        let form = normalize_with_today(&raw, today());
        assert_eq!(form.basics.construction_status, Some(ConstructionStatus::Rtm));
    }

    #[test]
    fn test_status_seeded_from_stored_possession_date() {
        let soon = today() + Duration::days(60);
        let raw = json!({"possessionDate": soon.format("%Y-%m-%d").to_string()});
        let form = normalize_with_today(&raw, today());
        assert_eq!(form.basics.possession_date, form_date(soon));
        assert_eq!(
            form.basics.construction_status,
            Some(ConstructionStatus::AboutToRtm)
        );
    }
}

#[cfg(test)]
mod unit_reconstruction_tests {
    use super::*;

    #[test]
    fn test_flat_configuration_becomes_nested_unit_type() {
        let raw = json!({
            "configurations": [
                {"type": "2BHK", "sizeRange": 1200, "sizeUnit": "Sq ft", "No_of_car_Parking": 1}
            ]
        });
        let form = normalize_with_today(&raw, today());

        let entry = form.units.unit_types.get("2 BHK").expect("2 BHK entry");
        assert!(entry.enabled);
        assert_eq!(entry.variants.len(), 1);

        let variant = &entry.variants[0];
        assert_eq!(
            variant.size,
            VariantSize::Apartment {
                size: "1200".to_string(),
                size_unit: "Sq ft".to_string(),
            }
        );
        assert_eq!(variant.parking_slots, "1");
        assert!(!variant.sold_out);
    }

    #[test]
    fn test_villa_shape_inferred_from_size_keys() {
        let raw = json!({
            "configurations": [
                {"type": "Villa", "sizeSqFt": "2400", "sizeSqYd": "267", "facing": "north east"}
            ]
        });
        let form = normalize_with_today(&raw, today());

        let variant = &form.units.unit_types["Villa"].variants[0];
        assert_eq!(
            variant.size,
            VariantSize::Villa {
                size_sqft: "2400".to_string(),
                size_sqyd: "267".to_string(),
            }
        );
        assert_eq!(variant.facing, Some(Facing::NorthEast));
    }

    #[test]
    fn test_variants_group_by_canonical_label() {
        let raw = json!({
            "configurations": [
                {"type": "3 BHK", "sizeRange": "1650", "sizeUnit": "Sq ft"},
                {"type": "3BHK", "sizeRange": "1810", "sizeUnit": "Sq ft", "soldOut": true},
            ]
        });
        let form = normalize_with_today(&raw, today());

        assert_eq!(form.units.unit_types.len(), 1);
        let entry = &form.units.unit_types["3 BHK"];
        assert_eq!(entry.variants.len(), 2);
        assert!(entry.variants[1].sold_out);
    }

    #[test]
    fn test_configurations_without_type_are_skipped() {
        let raw = json!({
            "configurations": [
                {"sizeRange": "900"},
                {"type": "", "sizeRange": "950"},
                {"type": "1 BHK", "sizeRange": "600"},
            ]
        });
        let form = normalize_with_today(&raw, today());
        assert_eq!(form.units.unit_types.len(), 1);
        assert!(form.units.unit_types.contains_key("1 BHK"));
    }
}

#[cfg(test)]
mod poc_migration_tests {
    use super::*;

    #[test]
    fn test_poc_details_array_preferred() {
        let raw = json!({
            "pocDetails": [
                {"name": "Ravi", "contact": "9876543210", "role": "Sales Head", "cpStatus": "Accepting"},
                {"name": "Meera", "contact": "9123456780", "role": "CRM", "cpStatus": ""},
            ],
            "pocName": "Should Be Ignored",
        });
        let form = normalize_with_today(&raw, today());

        assert_eq!(form.secondary.pocs.len(), 2);
        assert_eq!(form.secondary.pocs[0].name, "Ravi");
        assert_eq!(form.secondary.pocs[0].cp_status, Some(CpStatus::Accepting));
        assert_eq!(form.secondary.pocs[1].cp_status, None);
    }

    #[test]
    fn test_singular_legacy_poc_fields() {
        let raw = json!({
            "POCName": "Suresh",
            "POCContact": "9000000001",
            "poc_role": "Site Manager",
            "cpAccepting": true,
        });
        let form = normalize_with_today(&raw, today());

        assert_eq!(form.secondary.pocs.len(), 1);
        let poc = &form.secondary.pocs[0];
        assert_eq!(poc.name, "Suresh");
        assert_eq!(poc.contact, "9000000001");
        assert_eq!(poc.role, "Site Manager");
        // Boolean flag migrates to the three-way enum
        assert_eq!(poc.cp_status, Some(CpStatus::Accepting));
    }

    #[test]
    fn test_person_to_confirm_registration_object() {
        let raw = json!({
            "person_to_confirm_registration": {"name": "Anita", "phone": "8888877777"}
        });
        let form = normalize_with_today(&raw, today());
        assert_eq!(form.secondary.pocs.len(), 1);
        assert_eq!(form.secondary.pocs[0].contact, "8888877777");
    }

    #[test]
    fn test_person_to_confirm_registration_array() {
        let raw = json!({
            "person_to_confirm_registration": [
                {"name": "Anita", "phone": "8888877777"},
                {"name": "", "phone": ""},
            ]
        });
        let form = normalize_with_today(&raw, today());
        // Entries with neither name nor contact are dropped
        assert_eq!(form.secondary.pocs.len(), 1);
    }

    #[test]
    fn test_false_cp_flag_means_no_status() {
        let raw = json!({"pocName": "Suresh", "cpAccepting": false});
        let form = normalize_with_today(&raw, today());
        assert_eq!(form.secondary.pocs[0].cp_status, None);
    }
}

#[cfg(test)]
mod registration_policy_tests {
    use super::*;

    #[test]
    fn test_nested_registration_object() {
        let raw = json!({
            "leadRegistration": {
                "whatsapp": {"enabled": true, "details": "share RERA id first"},
                "email": {"enabled": false, "details": ""},
            }
        });
        let form = normalize_with_today(&raw, today());
        let policy = &form.secondary.lead_registration;
        assert!(policy.whatsapp.enabled);
        assert_eq!(policy.whatsapp.details, "share RERA id first");
        assert!(!policy.email.enabled);
        assert!(!policy.portal.enabled);
    }

    #[test]
    fn test_flat_legacy_registration_flags() {
        let raw = json!({
            "whatsapp_registration": true,
            "whatsapp_registration_details": "weekdays only",
        });
        let form = normalize_with_today(&raw, today());
        let policy = &form.secondary.lead_registration;
        assert!(policy.whatsapp.enabled);
        assert_eq!(policy.whatsapp.details, "weekdays only");
    }
}

#[cfg(test)]
mod list_field_tests {
    use super::*;

    #[test]
    fn test_amenities_remap_and_dedup() {
        let raw = json!({
            "amenities": ["Swimming Pool", "pool", "Gymnasium", "hologram deck"]
        });
        let form = normalize_with_today(&raw, today());
        let labels: Vec<&str> = form.construction.amenities.iter().map(|a| a.as_str()).collect();
        // Duplicate pool forms collapse, the unknown amenity is dropped
        assert_eq!(labels, vec!["Swimming Pool", "Gym"]);
    }

    #[test]
    fn test_comma_separated_lists() {
        let raw = json!({
            "operatingLocations": "Bengaluru, Hyderabad , Pune",
            "banks": ["HDFC", "SBI", ""],
        });
        let form = normalize_with_today(&raw, today());
        assert_eq!(
            form.builder.operating_locations,
            vec!["Bengaluru", "Hyderabad", "Pune"]
        );
        assert_eq!(form.financial.banks, vec!["HDFC", "SBI"]);
    }
}
