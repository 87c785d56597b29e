//! Domain name syntax checks (RFC 1035 style).

use regex::Regex;
use std::sync::OnceLock;

/// Labels of up to 63 characters from `[A-Za-z0-9_-]`, not starting with a
/// hyphen, joined by single dots with no leading or trailing dot.
const DOMAIN_PATTERN: &str =
    r"^[a-zA-Z0-9_][a-zA-Z0-9_-]{0,62}(\.[a-zA-Z0-9_][a-zA-Z0-9_-]{0,62})*$";

fn domain_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(DOMAIN_PATTERN).expect("domain pattern is valid"))
}

/// Whether `name` looks like a fully qualified domain name.
///
/// Single-label names such as `localhost` are rejected.
pub fn valid_domain_name(name: &str) -> bool {
    !name.is_empty() && name.contains('.') && domain_regex().is_match(name)
}
