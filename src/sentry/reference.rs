//! Issue and event identifiers
//!
//! Accepts either a bare issue ID / short ID or a Sentry UI URL such as
//! `https://sentry.io/organizations/acme/issues/123/events/abc/` or
//! `https://acme.sentry.io/issues/123/`.

use reqwest::Url;

use super::error::ToolError;

/// Where an issue (and optionally one of its events) lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueReference {
    pub organization: Option<String>,
    pub issue_id: String,
    pub event_id: Option<String>,
}

impl IssueReference {
    pub fn parse(input: &str) -> Result<Self, ToolError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ToolError::validation("issue_id_or_url must not be empty"));
        }

        if input.starts_with("http://") || input.starts_with("https://") {
            return Self::parse_url(input);
        }

        if input.contains('/') || input.contains(char::is_whitespace) {
            return Err(ToolError::validation(format!(
                "'{}' is neither an issue ID nor a Sentry URL",
                input
            )));
        }

        Ok(Self {
            organization: None,
            issue_id: input.to_string(),
            event_id: None,
        })
    }

    fn parse_url(input: &str) -> Result<Self, ToolError> {
        let url = Url::parse(input)
            .map_err(|e| ToolError::validation(format!("invalid Sentry URL '{}': {}", input, e)))?;
        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();

        let after = |name: &str| {
            segments
                .iter()
                .position(|seg| *seg == name)
                .and_then(|i| segments.get(i + 1))
                .map(|seg| seg.to_string())
        };

        let issue_id = after("issues").ok_or_else(|| {
            ToolError::validation(format!("URL '{}' does not contain an issue ID", input))
        })?;

        let organization = after("organizations").or_else(|| subdomain_org(&url));

        Ok(Self {
            organization,
            issue_id,
            event_id: after("events"),
        })
    }
}

/// `acme` from `acme.sentry.io`
fn subdomain_org(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    let org = host.strip_suffix(".sentry.io")?;
    (!org.is_empty() && !org.contains('.')).then(|| org.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_ids() {
        let r = IssueReference::parse(" DEMO-12 ").unwrap();
        assert_eq!(r.issue_id, "DEMO-12");
        assert!(r.organization.is_none());
        assert!(r.event_id.is_none());
    }

    #[test]
    fn organizations_url() {
        let r = IssueReference::parse(
            "https://sentry.io/organizations/acme/issues/123/events/abcdef/?project=1",
        )
        .unwrap();
        assert_eq!(r.organization.as_deref(), Some("acme"));
        assert_eq!(r.issue_id, "123");
        assert_eq!(r.event_id.as_deref(), Some("abcdef"));
    }

    #[test]
    fn subdomain_url() {
        let r = IssueReference::parse("https://acme.sentry.io/issues/456/").unwrap();
        assert_eq!(r.organization.as_deref(), Some("acme"));
        assert_eq!(r.issue_id, "456");
    }

    #[test]
    fn self_hosted_url_without_org() {
        let r = IssueReference::parse("http://sentry.internal/issues/9/events/latest/").unwrap();
        assert!(r.organization.is_none());
        assert_eq!(r.event_id.as_deref(), Some("latest"));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            IssueReference::parse(""),
            Err(ToolError::Validation(_))
        ));
        assert!(IssueReference::parse("a/b").is_err());
        assert!(IssueReference::parse("two words").is_err());
        assert!(IssueReference::parse("https://sentry.io/organizations/acme/").is_err());
        assert!(IssueReference::parse("https://sentry.io/organizations/acme/issues/").is_err());
    }
}
