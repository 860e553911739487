//! Device error banner detection.
//!
//! A banner (e.g. `%VPN Routing instance VRF1 does not exist. Create first`)
//! means the device refused the command. It is reported as empty output and
//! never parsed as field data.

use regex::Regex;

/// Patterns recognized without any configuration.
pub const DEFAULT_BANNERS: &[&str] = &[
    r"^%",
    r"does not exist",
    r"Invalid input detected",
    r"Incomplete command",
];

/// Matches lines of raw output against banner patterns.
#[derive(Debug, Clone)]
pub struct BannerMatcher {
    patterns: Vec<Regex>,
}

impl Default for BannerMatcher {
    fn default() -> Self {
        let patterns = DEFAULT_BANNERS
            .iter()
            .map(|pattern| Regex::new(pattern).expect("static regex must compile"))
            .collect();
        Self { patterns }
    }
}

impl BannerMatcher {
    /// Builds a matcher from the defaults plus `extra` patterns.
    pub fn with_extra(extra: &[String]) -> Result<Self, regex::Error> {
        let mut matcher = Self::default();
        for pattern in extra {
            matcher.patterns.push(Regex::new(pattern)?);
        }
        Ok(matcher)
    }

    /// Returns the first banner line found in `raw`, trimmed.
    pub fn find<'a>(&self, raw: &'a str) -> Option<&'a str> {
        raw.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .find(|line| self.patterns.iter().any(|pattern| pattern.is_match(line)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vrf_banner_is_detected() {
        let raw = "\n    R2_iosv#show ipv6 pim vrf VRF1 bsr candidate-rp\n    %VPN Routing instance VRF1 does not exist. Create first\n";
        assert_eq!(
            BannerMatcher::default().find(raw),
            Some("%VPN Routing instance VRF1 does not exist. Create first")
        );
    }

    #[test]
    fn test_percent_prefixed_line_is_a_banner() {
        let raw = "PIM Group-to-RP Mappings\n    % DDDDD\n";
        assert_eq!(BannerMatcher::default().find(raw), Some("% DDDDD"));
    }

    #[test]
    fn test_regular_output_has_no_banner() {
        let raw = "PIMv2 C-RP information\n  Candidate RP: 2001:3:3:3::3 SM\n";
        assert!(BannerMatcher::default().find(raw).is_none());
    }

    #[test]
    fn test_extra_patterns_are_honored() {
        let matcher = BannerMatcher::with_extra(&["^PIM not enabled".to_string()]).unwrap();
        assert_eq!(matcher.find("PIM not enabled on this VRF"), Some("PIM not enabled on this VRF"));
    }

    #[test]
    fn test_invalid_extra_pattern_is_an_error() {
        assert!(BannerMatcher::with_extra(&["(".to_string()]).is_err());
    }
}
