use regex::Regex;
use std::sync::OnceLock;

/// Unit and date conversion helpers shared by both mapping directions
///
/// All functions here are pure and total: malformed input degrades to a
/// documented neutral value (`0.0` or an empty string) instead of
/// returning an error. The normalizer and serializer lean on that so a
/// half-filled legacy record never aborts an editing session.

/// Square meters in one acre.
pub const SQMT_PER_ACRE: f64 = 4046.86;

/// Square feet in one square meter.
pub const SQFT_PER_SQMT: f64 = 10.7639;

/// Sentinel date value for completed properties ("Ready to Move").
pub const RTM: &str = "RTM";

fn numeric_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-?\d+(?:\.\d+)?").unwrap())
}

fn ddmmyyyy_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{2})/(\d{2})/(\d{4})$").unwrap())
}

fn iso_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").unwrap())
}

/// Extracts the first numeric token from free-text input.
///
/// Form fields tolerate entries like `"75%"` or `"1200 sqft"`; only the
/// leading number survives into storage.
pub fn first_numeric_token(raw: &str) -> Option<f64> {
    let m = numeric_token_re().find(raw)?;
    m.as_str().parse::<f64>().ok()
}

/// Reduces free-text numeric input to its first valid numeric token,
/// discarding any residue. Returns an empty string when no token exists.
pub fn sanitize_numeric(raw: &str) -> String {
    match numeric_token_re().find(raw) {
        Some(m) if m.as_str().parse::<f64>().is_ok() => m.as_str().to_string(),
        _ => String::new(),
    }
}

/// Converts square meters to acres.
///
/// Non-numeric or non-positive input yields `0.0`.
pub fn sqmt_to_acres(raw: &str) -> f64 {
    match first_numeric_token(raw) {
        Some(v) if v > 0.0 => v / SQMT_PER_ACRE,
        _ => 0.0,
    }
}

/// Converts square meters to square feet.
///
/// Non-numeric or non-positive input yields `0.0`.
pub fn sqmt_to_sqft(raw: &str) -> f64 {
    match first_numeric_token(raw) {
        Some(v) if v > 0.0 => v * SQFT_PER_SQMT,
        _ => 0.0,
    }
}

/// Converts acres to square meters. Non-positive input yields `0.0`.
pub fn acres_to_sqmt(raw: &str) -> f64 {
    match first_numeric_token(raw) {
        Some(v) if v > 0.0 => v * SQMT_PER_ACRE,
        _ => 0.0,
    }
}

/// Converts square feet to square meters. Non-positive input yields `0.0`.
pub fn sqft_to_sqmt(raw: &str) -> f64 {
    match first_numeric_token(raw) {
        Some(v) if v > 0.0 => v / SQFT_PER_SQMT,
        _ => 0.0,
    }
}

/// Strict form-date conversion: `DD/MM/YYYY` -> `YYYY-MM-DD`.
///
/// The literal `"RTM"` passes through unchanged. Malformed input returns
/// an empty string. Two-digit years are rejected here; only the lenient
/// [`legacy_display_date`] expands them.
pub fn ddmmyyyy_to_iso(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == RTM {
        return RTM.to_string();
    }
    match ddmmyyyy_re().captures(trimmed) {
        Some(caps) => format!("{}-{}-{}", &caps[3], &caps[2], &caps[1]),
        None => {
            if !trimmed.is_empty() {
                tracing::debug!("Rejecting malformed form date: {}", trimmed);
            }
            String::new()
        }
    }
}

/// Strict storage-date conversion: `YYYY-MM-DD` -> `DD/MM/YYYY`.
///
/// The literal `"RTM"` passes through unchanged. Malformed input is
/// returned as-is (best effort), never an error.
pub fn iso_to_ddmmyyyy(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == RTM {
        return RTM.to_string();
    }
    match iso_date_re().captures(trimmed) {
        Some(caps) => format!("{}/{}/{}", &caps[3], &caps[2], &caps[1]),
        None => trimmed.to_string(),
    }
}

/// Lenient date parser used when seeding display values from legacy
/// records.
///
/// Accepts `/`- or `-`-separated dates in day-first or year-first order,
/// zero-pads day and month, and expands 2-digit years by prefixing `"20"`.
/// Unparseable input returns an empty string. Kept deliberately separate
/// from the strict parsers above, which reject 2-digit years.
pub fn legacy_display_date(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == RTM {
        return RTM.to_string();
    }
    let parts: Vec<&str> = trimmed.split(['/', '-']).collect();
    if parts.len() != 3 {
        return String::new();
    }

    // Year-first (ISO-like) vs day-first input.
    let (day, month, year) = if parts[0].len() == 4 {
        (parts[2], parts[1], parts[0])
    } else {
        (parts[0], parts[1], parts[2])
    };

    let (Ok(d), Ok(m)) = (day.parse::<u32>(), month.parse::<u32>()) else {
        return String::new();
    };
    if !(1..=31).contains(&d) || !(1..=12).contains(&m) {
        return String::new();
    }

    let expanded_year = match year.len() {
        4 => year.to_string(),
        2 if year.chars().all(|c| c.is_ascii_digit()) => format!("20{}", year),
        _ => return String::new(),
    };

    format!("{:02}/{:02}/{}", d, m, expanded_year)
}

/// Formats a converted value for a form field: whole numbers lose the
/// fractional part, everything else keeps at most two decimals.
pub fn fmt_converted(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{}", value.round() as i64)
    } else {
        let s = format!("{:.2}", value);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
