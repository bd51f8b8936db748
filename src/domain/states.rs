//! U.S. state lookup.
//!
//! The case-data source names states in full (`AdminRegion1`), while the
//! trends source wants a two-letter code for its locale and geography. Lookup
//! accepts either form, case-insensitively, with surrounding or repeated
//! whitespace ignored.

use crate::domain::State;

const STATES: [(&str, &str); 52] = [
    ("Alabama", "AL"),
    ("Alaska", "AK"),
    ("Arizona", "AZ"),
    ("Arkansas", "AR"),
    ("California", "CA"),
    ("Colorado", "CO"),
    ("Connecticut", "CT"),
    ("Delaware", "DE"),
    ("District of Columbia", "DC"),
    ("Florida", "FL"),
    ("Georgia", "GA"),
    ("Hawaii", "HI"),
    ("Idaho", "ID"),
    ("Illinois", "IL"),
    ("Indiana", "IN"),
    ("Iowa", "IA"),
    ("Kansas", "KS"),
    ("Kentucky", "KY"),
    ("Louisiana", "LA"),
    ("Maine", "ME"),
    ("Maryland", "MD"),
    ("Massachusetts", "MA"),
    ("Michigan", "MI"),
    ("Minnesota", "MN"),
    ("Mississippi", "MS"),
    ("Missouri", "MO"),
    ("Montana", "MT"),
    ("Nebraska", "NE"),
    ("Nevada", "NV"),
    ("New Hampshire", "NH"),
    ("New Jersey", "NJ"),
    ("New Mexico", "NM"),
    ("New York", "NY"),
    ("North Carolina", "NC"),
    ("North Dakota", "ND"),
    ("Ohio", "OH"),
    ("Oklahoma", "OK"),
    ("Oregon", "OR"),
    ("Pennsylvania", "PA"),
    ("Puerto Rico", "PR"),
    ("Rhode Island", "RI"),
    ("South Carolina", "SC"),
    ("South Dakota", "SD"),
    ("Tennessee", "TN"),
    ("Texas", "TX"),
    ("Utah", "UT"),
    ("Vermont", "VT"),
    ("Virginia", "VA"),
    ("Washington", "WA"),
    ("West Virginia", "WV"),
    ("Wisconsin", "WI"),
    ("Wyoming", "WY"),
];

/// Resolve a full state name or two-letter abbreviation.
pub fn lookup_state(input: &str) -> Option<State> {
    let needle = normalize(input);
    if needle.is_empty() {
        return None;
    }

    STATES
        .iter()
        .find(|(name, abbr)| normalize(name) == needle || abbr.eq_ignore_ascii_case(&needle))
        .map(|&(name, abbr)| State { name, abbr })
}

fn normalize(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_full_names_case_insensitively() {
        let state = lookup_state("  new   YORK ").unwrap();
        assert_eq!(state.name, "New York");
        assert_eq!(state.abbr, "NY");
    }

    #[test]
    fn resolves_abbreviations() {
        assert_eq!(lookup_state("wa").unwrap().name, "Washington");
        assert_eq!(lookup_state("DC").unwrap().name, "District of Columbia");
    }

    #[test]
    fn rejects_unknown_names() {
        assert!(lookup_state("Atlantis").is_none());
        assert!(lookup_state("").is_none());
        assert!(lookup_state("N").is_none());
    }

    #[test]
    fn abbreviations_are_unique() {
        let mut abbrs: Vec<&str> = STATES.iter().map(|(_, a)| *a).collect();
        abbrs.sort_unstable();
        abbrs.dedup();
        assert_eq!(abbrs.len(), STATES.len());
    }
}
