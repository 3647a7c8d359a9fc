//! Field validation and normalization.
//!
//! Pure functions, no dependencies on the rest of the pipeline. Every
//! candidate value a strategy produces passes through [`validate`]
//! before it can enter a consolidated record; a `None` here is not an
//! error, the field is simply omitted.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::schema::{FieldKind, FieldSpec};

/// Years accepted for founding-date fields.
const YEAR_MIN: i32 = 1800;
const YEAR_MAX: i32 = 2024;

/// Platform branding noise stripped from the tail of names.
/// Matched case-insensitively against the last separator-delimited segment.
const NAME_NOISE: &[&str] = &[
    "linkedin",
    "facebook",
    "instagram",
    "instagram photos and videos",
    "twitter",
    "x",
    "tiktok",
    "youtube",
    "google maps",
    "yelp",
    "crunchbase",
    "home",
    "official site",
    "official website",
];

/// Hosts that mark a URL as a CDN or static-resource link rather than a
/// real website. Substring match against the host.
const CDN_HOST_FRAGMENTS: &[&str] = &[
    "cdninstagram",
    "fbcdn",
    "akamaihd",
    "cloudfront",
    "twimg",
    "gstatic",
    "googleusercontent",
    "licdn",
    "pinimg",
    "wixstatic",
];

/// Path extensions that mark a URL as an image or asset, not a website.
const RESOURCE_EXTENSIONS: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".webp", ".svg", ".ico", ".css", ".js",
];

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(1[89]\d{2}|20\d{2})\b").unwrap());

static COUNT_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d[\d.,]*)\s*[-\x{2013}\x{2014}]\s*(\d[\d.,]*)").unwrap()
});

static COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\d.,]*\d)\s*([KkMmBb])?\b").unwrap());

/// Validate and normalize one raw candidate value for a field.
///
/// Returns the normalized value, or `None` when the candidate fails the
/// field's rules.
pub fn validate(spec: &FieldSpec, raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match spec.kind {
        FieldKind::Text => validate_name(raw),
        FieldKind::LongText => validate_long_text(raw),
        FieldKind::Count => validate_count(raw),
        FieldKind::Year => validate_year(raw),
        FieldKind::Url => validate_url(raw),
        FieldKind::Category => validate_category(raw),
        FieldKind::List => validate_list(raw),
        FieldKind::Phone => normalize_phone(raw),
        FieldKind::Country => country_code(raw).map(str::to_string),
    }
}

/// Short text: strip platform-branding tails, then require 2 to 200 chars.
pub fn validate_name(raw: &str) -> Option<String> {
    let cleaned = strip_name_noise(raw);
    let len = cleaned.chars().count();
    if (2..=200).contains(&len) {
        Some(cleaned)
    } else {
        None
    }
}

/// Strip a trailing platform-branding segment such as `" | LinkedIn"` or
/// `" • Instagram photos and videos"`.
fn strip_name_noise(raw: &str) -> String {
    let mut value = raw.trim().to_string();
    loop {
        let mut stripped = false;
        for sep in [" | ", " - ", " \u{2013} ", " \u{2014} ", " \u{2022} ", " · "] {
            if let Some(idx) = value.rfind(sep) {
                let tail = value[idx + sep.len()..].trim().to_lowercase();
                if NAME_NOISE.contains(&tail.as_str()) {
                    value.truncate(idx);
                    value = value.trim().to_string();
                    stripped = true;
                }
            }
        }
        if !stripped {
            break;
        }
    }
    value
}

/// Long-form text: 10 to 2000 chars after trimming.
pub fn validate_long_text(raw: &str) -> Option<String> {
    let len = raw.chars().count();
    if (10..=2000).contains(&len) {
        Some(raw.to_string())
    } else {
        None
    }
}

/// Category labels: 2 to 100 chars, trailing punctuation removed.
pub fn validate_category(raw: &str) -> Option<String> {
    let cleaned = raw.trim_end_matches(['.', ',', ';', ':']).trim();
    let len = cleaned.chars().count();
    if (2..=100).contains(&len) {
        Some(cleaned.to_string())
    } else {
        None
    }
}

/// Comma-separated lists: every item trimmed, blanks dropped, at least
/// one item remaining.
pub fn validate_list(raw: &str) -> Option<String> {
    let items: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if items.is_empty() || raw.chars().count() > 2000 {
        None
    } else {
        Some(items.join(", "))
    }
}

/// A 4-digit year inside the accepted window, found anywhere in the
/// string. `"Founded in 1998 by..."` validates to `"1998"`.
pub fn validate_year(raw: &str) -> Option<String> {
    for caps in YEAR_RE.captures_iter(raw) {
        let year: i32 = caps[1].parse().ok()?;
        if (YEAR_MIN..=YEAR_MAX).contains(&year) {
            return Some(year.to_string());
        }
    }
    None
}

/// Counts: a numeric range is averaged to its integer midpoint, a plain
/// or K/M/B-suffixed number is expanded. Returns the integer as a string.
pub fn validate_count(raw: &str) -> Option<String> {
    if let Some(caps) = COUNT_RANGE_RE.captures(raw) {
        let min = parse_plain_number(&caps[1])?;
        let max = parse_plain_number(&caps[2])?;
        return Some(((min + max) / 2).to_string());
    }
    parse_count(raw).map(|n| n.to_string())
}

/// Parse a count string with an optional K/M/B suffix into an integer.
///
/// With a suffix, both `.` and `,` act as the decimal separator
/// (`"1.2K"` and `"1,2K"` both parse to 1200) and the result is rounded
/// down. Without a suffix, separators are thousands grouping
/// (`"3,400"` parses to 3400).
pub fn parse_count(raw: &str) -> Option<u64> {
    let caps = COUNT_RE.captures(raw.trim())?;
    let digits = &caps[1];
    match caps.get(2).map(|m| m.as_str().to_ascii_uppercase()) {
        Some(suffix) => {
            let normalized = digits.replace(',', ".");
            let value: f64 = normalized.parse().ok()?;
            let factor = match suffix.as_str() {
                "K" => 1_000.0,
                "M" => 1_000_000.0,
                _ => 1_000_000_000.0,
            };
            Some((value * factor).floor() as u64)
        }
        None => parse_plain_number(digits),
    }
}

/// Parse a number whose `.`/`,` are thousands separators.
fn parse_plain_number(digits: &str) -> Option<u64> {
    let cleaned: String = digits.chars().filter(char::is_ascii_digit).collect();
    if cleaned.is_empty() {
        None
    } else {
        cleaned.parse().ok()
    }
}

/// Phone-like values: strip to digits and a leading plus; require at
/// least 10 digits.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let mut normalized = String::new();
    for (i, c) in trimmed.chars().enumerate() {
        if c == '+' && i == 0 {
            normalized.push(c);
        } else if c.is_ascii_digit() {
            normalized.push(c);
        }
    }
    let digit_count = normalized.chars().filter(char::is_ascii_digit).count();
    if digit_count >= 10 {
        Some(normalized)
    } else {
        None
    }
}

/// Website URLs: must carry an http(s) scheme and must not point at a
/// CDN host or an image/script resource. Such values are profile
/// pictures or icons picked up by a strategy, not a real website.
pub fn validate_url(raw: &str) -> Option<String> {
    let parsed = url::Url::parse(raw).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    let host = parsed.host_str()?.to_lowercase();
    if CDN_HOST_FRAGMENTS.iter().any(|frag| host.contains(frag)) {
        return None;
    }
    let path = parsed.path().to_lowercase();
    if RESOURCE_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
        return None;
    }
    Some(parsed.to_string())
}

/// Map a country name to its ISO-style two-letter code. Unknown names
/// yield `None`, never an error.
pub fn country_code(name: &str) -> Option<&'static str> {
    let normalized = name
        .trim()
        .trim_end_matches('.')
        .to_lowercase();
    let code = match normalized.as_str() {
        "united states" | "united states of america" | "usa" | "us" => "US",
        "united kingdom" | "great britain" | "uk" | "england" => "GB",
        "canada" => "CA",
        "australia" => "AU",
        "germany" | "deutschland" => "DE",
        "france" => "FR",
        "spain" | "espana" | "españa" => "ES",
        "italy" | "italia" => "IT",
        "netherlands" | "the netherlands" | "holland" => "NL",
        "belgium" => "BE",
        "switzerland" => "CH",
        "austria" => "AT",
        "sweden" => "SE",
        "norway" => "NO",
        "denmark" => "DK",
        "finland" => "FI",
        "ireland" => "IE",
        "portugal" => "PT",
        "poland" => "PL",
        "brazil" | "brasil" => "BR",
        "argentina" => "AR",
        "chile" => "CL",
        "colombia" => "CO",
        "mexico" | "méxico" => "MX",
        "peru" => "PE",
        "uruguay" => "UY",
        "india" => "IN",
        "china" => "CN",
        "japan" => "JP",
        "south korea" | "korea" => "KR",
        "singapore" => "SG",
        "indonesia" => "ID",
        "philippines" => "PH",
        "thailand" => "TH",
        "vietnam" => "VN",
        "israel" => "IL",
        "united arab emirates" | "uae" => "AE",
        "saudi arabia" => "SA",
        "turkey" | "türkiye" => "TR",
        "south africa" => "ZA",
        "nigeria" => "NG",
        "egypt" => "EG",
        "kenya" => "KE",
        "new zealand" => "NZ",
        "russia" => "RU",
        "ukraine" => "UA",
        "czech republic" | "czechia" => "CZ",
        "greece" => "GR",
        "romania" => "RO",
        "hungary" => "HU",
        _ => return None,
    };
    Some(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn spec(kind: FieldKind) -> FieldSpec {
        FieldSpec::new("field", kind)
    }

    #[test]
    fn test_count_suffix_expansion() {
        assert_eq!(parse_count("1.2K"), Some(1_200));
        assert_eq!(parse_count("1,2K"), Some(1_200));
        assert_eq!(parse_count("3,400"), Some(3_400));
        assert_eq!(parse_count("2M"), Some(2_000_000));
        assert_eq!(parse_count("1.5b"), Some(1_500_000_000));
        assert_eq!(parse_count("842"), Some(842));
        assert_eq!(parse_count("no digits"), None);
    }

    proptest! {
        #[test]
        fn prop_suffix_multiplies(value in 1u32..999, suffix in "[KkMmBb]") {
            let raw = format!("{value}{suffix}");
            let factor = match suffix.to_ascii_uppercase().as_str() {
                "K" => 1_000u64,
                "M" => 1_000_000,
                _ => 1_000_000_000,
            };
            prop_assert_eq!(parse_count(&raw), Some(value as u64 * factor));
        }
    }

    #[test]
    fn test_employee_range_midpoint() {
        assert_eq!(validate_count("120-450"), Some("285".to_string()));
        assert_eq!(validate_count("120 - 450 employees"), Some("285".to_string()));
        assert_eq!(validate_count("10,001-20,000"), Some("15000".to_string()));
    }

    #[test]
    fn test_year_window() {
        assert_eq!(
            validate_year("Founded in 1998 by two engineers"),
            Some("1998".to_string())
        );
        assert_eq!(validate_year("Founded in 1756"), None);
        assert_eq!(validate_year("est. 2031"), None);
        assert_eq!(validate_year("2005-06-01"), Some("2005".to_string()));
    }

    #[test]
    fn test_url_rejects_cdn_and_resources() {
        assert_eq!(validate_url("https://scontent.cdninstagram.com/v/t51/avatar"), None);
        assert_eq!(validate_url("https://d1xyz.cloudfront.net/logo"), None);
        assert_eq!(validate_url("https://example.com/banner.png"), None);
        assert_eq!(validate_url("https://example.com/app.js"), None);
        assert!(validate_url("https://acme.example.com/about").is_some());
        assert_eq!(validate_url("not a url"), None);
        assert_eq!(validate_url("ftp://example.com"), None);
    }

    #[test]
    fn test_name_noise_stripping() {
        assert_eq!(
            validate_name("Acme Corp | LinkedIn"),
            Some("Acme Corp".to_string())
        );
        assert_eq!(
            validate_name("acme (@acme) \u{2022} Instagram photos and videos"),
            Some("acme (@acme)".to_string())
        );
        assert_eq!(validate_name("Acme Corp - Home | Facebook"), Some("Acme Corp".to_string()));
        assert_eq!(validate_name("A"), None);
        assert_eq!(validate_name(&"x".repeat(201)), None);
    }

    #[test]
    fn test_long_text_bounds() {
        assert_eq!(validate_long_text("too short"), None);
        assert!(validate_long_text("A description long enough to keep.").is_some());
        assert_eq!(validate_long_text(&"x".repeat(2001)), None);
    }

    #[test]
    fn test_phone_normalization() {
        assert_eq!(
            normalize_phone("+1 (555) 123-4567"),
            Some("+15551234567".to_string())
        );
        assert_eq!(normalize_phone("555-1234"), None);
        assert_eq!(
            normalize_phone("11 98765-4321"),
            Some("11987654321".to_string())
        );
    }

    #[test]
    fn test_country_lookup() {
        assert_eq!(country_code("United States"), Some("US"));
        assert_eq!(country_code("brasil"), Some("BR"));
        assert_eq!(country_code(" Germany. "), Some("DE"));
        assert_eq!(country_code("Atlantis"), None);
    }

    #[test]
    fn test_validate_dispatch() {
        assert_eq!(
            validate(&spec(FieldKind::Count), "1.2K"),
            Some("1200".to_string())
        );
        assert_eq!(
            validate(&spec(FieldKind::Country), "France"),
            Some("FR".to_string())
        );
        assert_eq!(
            validate(&spec(FieldKind::List), " Software , Cloud ,, AI "),
            Some("Software, Cloud, AI".to_string())
        );
        assert_eq!(validate(&spec(FieldKind::Text), "   "), None);
    }
}
