//! Request ID resolution.
//!
//! The `X-Request-ID` header may hold several comma separated IDs (RFC 2616
//! list syntax). They are treated as one opaque value outside this module.
//! Resolution keeps whatever the client sent and makes sure at least one of
//! the IDs is unique, appending a generated one when it cannot tell.

use uuid::{Uuid, Version};

/// Name of the correlation header on requests and responses.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// What to do with a single inbound ID that already looks unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SingleIdPolicy {
    /// Always append a generated ID.
    #[default]
    AlwaysAppend,
    /// Keep the ID as-is when it is verifiably unique.
    TrustVerified,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestIdPolicy {
    pub single: SingleIdPolicy,
    /// Substring identifying IDs minted by a trusted upstream generator.
    pub trusted_marker: Option<String>,
}

impl RequestIdPolicy {
    pub fn new(single: SingleIdPolicy, trusted_marker: Option<String>) -> Self {
        Self {
            single,
            trusted_marker: trusted_marker.filter(|m| !m.trim().is_empty()),
        }
    }

    /// Compute the header value for a request given its inbound value, if any.
    pub fn resolve(&self, inbound: Option<&str>) -> String {
        let Some(inbound) = inbound else {
            return generate_request_id();
        };

        let tokens: Vec<&str> = inbound
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect();
        // Blank or separators only.
        if tokens.is_empty() {
            return generate_request_id();
        }

        let keep_as_is = match (tokens.as_slice(), self.single) {
            ([_], SingleIdPolicy::AlwaysAppend) => false,
            _ => tokens.iter().any(|t| self.is_verifiably_unique(t)),
        };

        if keep_as_is {
            inbound.to_string()
        } else {
            format!("{inbound},{}", generate_request_id())
        }
    }

    /// A token is unique when it is a version 4 UUID or carries the trusted marker.
    pub fn is_verifiably_unique(&self, token: &str) -> bool {
        if let Some(marker) = &self.trusted_marker {
            if token.contains(marker.as_str()) {
                return true;
            }
        }
        Uuid::parse_str(token.trim())
            .map(|id| id.get_version() == Some(Version::Random))
            .unwrap_or(false)
    }
}

/// A fresh, unique request ID.
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(value: &str) -> Vec<&str> {
        value.split(',').collect()
    }

    #[test]
    fn generates_when_absent() {
        let resolved = RequestIdPolicy::default().resolve(None);
        assert!(Uuid::parse_str(&resolved).is_ok());
    }

    #[test]
    fn blank_header_counts_as_absent() {
        let resolved = RequestIdPolicy::default().resolve(Some("  "));
        assert_eq!(tokens(&resolved).len(), 1);
        assert!(Uuid::parse_str(&resolved).is_ok());
    }

    #[test]
    fn separators_only_count_as_absent() {
        for inbound in [",", " , ,", ",,"] {
            let resolved = RequestIdPolicy::default().resolve(Some(inbound));
            assert_eq!(tokens(&resolved).len(), 1, "{inbound:?}");
            assert!(Uuid::parse_str(&resolved).is_ok());
        }
    }

    #[test]
    fn appends_to_non_unique_single_id() {
        let resolved = RequestIdPolicy::default().resolve(Some("abc"));
        let parts = tokens(&resolved);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0], "abc");
        assert!(Uuid::parse_str(parts[1]).is_ok());
    }

    #[test]
    fn appends_to_unique_single_id_by_default() {
        let inbound = Uuid::new_v4().to_string();
        let resolved = RequestIdPolicy::default().resolve(Some(&inbound));
        assert!(resolved.starts_with(&format!("{inbound},")));
        assert_eq!(tokens(&resolved).len(), 2);
    }

    #[test]
    fn trusts_unique_single_id_when_configured() {
        let policy = RequestIdPolicy::new(SingleIdPolicy::TrustVerified, None);
        let inbound = Uuid::new_v4().to_string();
        assert_eq!(policy.resolve(Some(&inbound)), inbound);
    }

    #[test]
    fn keeps_list_containing_a_uuid() {
        let inbound = format!("abc, {}", Uuid::new_v4());
        assert_eq!(RequestIdPolicy::default().resolve(Some(&inbound)), inbound);
    }

    #[test]
    fn appends_to_list_without_unique_ids() {
        let resolved = RequestIdPolicy::default().resolve(Some("abc,def"));
        let parts = tokens(&resolved);
        assert_eq!(&parts[..2], &["abc", "def"]);
        assert!(Uuid::parse_str(parts[2]).is_ok());
    }

    #[test]
    fn rejects_non_v4_uuids() {
        let policy = RequestIdPolicy::default();
        assert!(!policy.is_verifiably_unique("00000000-0000-0000-0000-000000000000"));
        assert!(!policy.is_verifiably_unique("6ba7b810-9dad-11d1-80b4-00c04fd430c8"));
        assert!(policy.is_verifiably_unique(&Uuid::new_v4().to_string()));
    }

    #[test]
    fn trusted_marker_counts_as_unique() {
        let policy = RequestIdPolicy::new(SingleIdPolicy::AlwaysAppend, Some("LB-RV1".into()));
        let inbound = "client-1,LB-RV1-0042";
        assert_eq!(policy.resolve(Some(inbound)), inbound);
    }

    #[test]
    fn blank_marker_is_ignored() {
        let policy = RequestIdPolicy::new(SingleIdPolicy::AlwaysAppend, Some(" ".into()));
        assert_eq!(policy.trusted_marker, None);
    }
}
