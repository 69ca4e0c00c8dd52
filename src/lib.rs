//! Property Intake Normalization Core
//!
//! This library is the data-normalization and reconciliation layer of a
//! real-estate listing platform. Stored property records exist in several
//! inconsistent schema generations (legacy PascalCase Mongo fields,
//! snake_case Supabase fields, short-form vs. long-form names, mixed
//! acres/sqmt/sqft units); this crate maps any of them into one canonical
//! in-memory form model for editing, and maps the model back into a flat
//! persistence payload on submit.
//!
//! # Modules
//!
//! - `units`: acres/sqmt/sqft and date-format conversion helpers.
//! - `resolver`: priority-ordered field resolution over raw records.
//! - `models`: the canonical form model, enums, and remap tables.
//! - `normalize`: inbound raw record -> form model.
//! - `serialize`: outbound form model -> persistence payload, plus
//!   submit validation.
//! - `display`: display-safe formatting for the read-only comparison
//!   view.
//! - `errors`: field-keyed validation error map.

pub mod display;
pub mod errors;
pub mod models;
pub mod normalize;
pub mod resolver;
pub mod serialize;
pub mod units;

pub use errors::ValidationErrors;
pub use models::FormModel;
pub use normalize::{derive_construction_status, normalize, normalize_with_today};
pub use serialize::{serialize, submit_payload, validate_for_submit};
