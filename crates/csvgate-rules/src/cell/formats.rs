//! Boolean format checks (`is_email: true`, `is_uuid: true`, ...).

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock;

use regex::Regex;

use super::register_flags;
use crate::number::parse_number;
use crate::registry::RuleRegistry;

static INT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d+$").expect("Invalid integer regex"));

static ALIAS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:[-_][a-z0-9]+)*$").expect("Invalid alias regex"));

static SLUG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("Invalid slug regex"));

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
        .expect("Invalid email regex")
});

static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z][a-z0-9+.-]*://[^\s/?#@]+(?:@[^\s/?#]+)?(?::\d+)?(?:[/?#]\S*)?$")
        .expect("Invalid URL regex")
});

static UUID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("Invalid UUID regex")
});

static DOMAIN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,63}$")
        .expect("Invalid domain regex")
});

static BASE64_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9+/]*={0,2}$").expect("Invalid base64 regex"));

static HEX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:0[xX])?[0-9A-Fa-f]+$").expect("Invalid hex regex"));

static GEOHASH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9bcdefghjkmnpqrstuvwxyz]{1,12}$").expect("Invalid geohash regex")
});

const CARDINAL_DIRECTIONS: &[&str] = &[
    "N", "S", "E", "W", "NE", "SE", "NW", "SW", "NNE", "ENE", "ESE", "SSE", "SSW", "WSW", "WNW",
    "NNW",
];

const BOOL_VALUES: &[&str] = &["true", "false", "yes", "no", "on", "off", "1", "0"];

pub(super) fn register(registry: &mut RuleRegistry) {
    register_flags(
        registry,
        &[
            ("is_int", is_int, "an integer", "Check format only. Can be negative and positive. Without any separators."),
            ("is_float", is_float, "a float number", "Check format only. Can be negative and positive. Dot as decimal separator."),
            ("is_bool", is_bool, "a boolean", "Allow only boolean values \"true\" and \"false\", \"yes\" and \"no\", \"on\" and \"off\", \"1\" and \"0\"."),
            ("is_alias", is_alias, "an alias", "Only alias format. Example: \"my-alias-123\"."),
            ("is_slug", is_slug, "a slug", "Only slug format. Example: \"my-slug-123\"."),
            ("is_email", is_email, "a valid email", "Only email format. Example: \"user@example.com\"."),
            ("is_url", is_url, "a valid URL", "Only URL format. Example: \"https://example.com/page?query=string#anchor\"."),
            ("is_ip", is_ip, "a valid IP address", "Only IPv4 or IPv6. Example: \"127.0.0.1\" or \"::1\"."),
            ("is_ip4", is_ip4, "a valid IPv4 address", "Only IPv4. Example: \"127.0.0.1\"."),
            ("is_ip6", is_ip6, "a valid IPv6 address", "Only IPv6. Example: \"2001:0db8:85a3:08d3:1319:8a2e:0370:7334\"."),
            ("is_uuid", is_uuid, "a valid UUID", "Validates whether the input is a valid UUID."),
            ("is_domain", is_domain, "a valid domain", "Only domain name. Example: \"example.com\"."),
            ("is_json", is_json, "a valid JSON", "Validates if the given input is a valid JSON."),
            ("is_base64", is_base64, "a valid Base64", "Validate if a string is Base64-encoded. Example: \"cmVzcGVjdCE=\"."),
            ("is_hex", is_hex, "a hexadecimal number", "Hexadecimal digits, with optional 0x prefix."),
            ("is_latitude", is_latitude, "a valid latitude (-90..90)", "Can be integer or float. Example: 50.123456."),
            ("is_longitude", is_longitude, "a valid longitude (-180..180)", "Can be integer or float. Example: -89.123456."),
            ("is_geohash", is_geohash, "a valid geohash", "Check if the value is a valid geohash. Example: \"u4pruydqqvj\"."),
            ("is_cardinal_direction", is_cardinal_direction, "a cardinal direction", "Valid cardinal direction. Examples: \"N\", \"S\", \"NE\", \"SE\", \"none\", \"\"."),
        ],
    );
}

fn is_int(value: &str) -> bool {
    INT_REGEX.is_match(value)
}

fn is_float(value: &str) -> bool {
    parse_number(value).is_some() && value.trim() == value
}

fn is_bool(value: &str) -> bool {
    BOOL_VALUES.contains(&value.to_lowercase().as_str())
}

fn is_alias(value: &str) -> bool {
    ALIAS_REGEX.is_match(value)
}

fn is_slug(value: &str) -> bool {
    SLUG_REGEX.is_match(value)
}

fn is_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

fn is_url(value: &str) -> bool {
    URL_REGEX.is_match(value)
}

fn is_ip(value: &str) -> bool {
    value.parse::<IpAddr>().is_ok()
}

fn is_ip4(value: &str) -> bool {
    value.parse::<Ipv4Addr>().is_ok()
}

fn is_ip6(value: &str) -> bool {
    value.parse::<Ipv6Addr>().is_ok()
}

fn is_uuid(value: &str) -> bool {
    UUID_REGEX.is_match(value)
}

fn is_domain(value: &str) -> bool {
    value.len() <= 253 && DOMAIN_REGEX.is_match(value)
}

fn is_json(value: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(value).is_ok()
}

fn is_base64(value: &str) -> bool {
    value.len() % 4 == 0 && BASE64_REGEX.is_match(value)
}

fn is_hex(value: &str) -> bool {
    HEX_REGEX.is_match(value)
}

fn is_latitude(value: &str) -> bool {
    parse_number(value).is_some_and(|n| (-90.0..=90.0).contains(&n))
}

fn is_longitude(value: &str) -> bool {
    parse_number(value).is_some_and(|n| (-180.0..=180.0).contains(&n))
}

fn is_geohash(value: &str) -> bool {
    GEOHASH_REGEX.is_match(value)
}

fn is_cardinal_direction(value: &str) -> bool {
    value.eq_ignore_ascii_case("none") || CARDINAL_DIRECTIONS.contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_formats() {
        assert!(is_ip4("127.0.0.1"));
        assert!(!is_ip4("::1"));
        assert!(is_ip6("::1"));
        assert!(is_ip("::1"));
        assert!(is_url("https://example.com/page?query=string#anchor"));
        assert!(!is_url("example.com"));
        assert!(is_domain("sub.example.com"));
        assert!(!is_domain("localhost"));
        assert!(is_email("user@example.com"));
        assert!(!is_email("user@"));
    }

    #[test]
    fn identifiers() {
        assert!(is_uuid("550e8400-e29b-41d4-a716-446655440000"));
        assert!(!is_uuid("550e8400"));
        assert!(is_alias("my-alias_123"));
        assert!(!is_slug("My-Slug"));
        assert!(is_hex("0xFF"));
        assert!(is_base64("cmVzcGVjdCE="));
        assert!(!is_base64("abc"));
        assert!(is_geohash("u4pruydqqvj"));
        assert!(!is_geohash("a"));
    }

    #[test]
    fn numbers_and_coordinates() {
        assert!(is_int("-42"));
        assert!(!is_int("4.2"));
        assert!(is_float("4.2"));
        assert!(!is_float(" 4.2"));
        assert!(is_latitude("-90"));
        assert!(!is_latitude("90.1"));
        assert!(is_longitude("179.9"));
        assert!(is_bool("Yes"));
        assert!(!is_bool("maybe"));
        assert!(is_cardinal_direction("NNE"));
        assert!(!is_cardinal_direction("up"));
        assert!(is_json(r#"{"a": 1}"#));
    }
}
