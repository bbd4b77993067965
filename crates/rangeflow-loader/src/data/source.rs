use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Describes where a loader reads from and with which request policy.
///
/// # Examples
///
/// ```
/// use rangeflow_loader::{DataSource, ReferrerPolicy};
///
/// let source = DataSource::new("https://cdn.example.com/live.flv")
///     .with_credentials(true)
///     .referrer_policy(ReferrerPolicy::NoReferrer);
/// assert!(source.cors);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSource {
    /// Nominal URL of the resource.
    pub url: String,

    /// Redirect target observed on an earlier open, if any.
    ///
    /// Only used when [`LoaderConfig::reuse_redirected_url`](crate::LoaderConfig)
    /// is enabled.
    #[serde(default)]
    pub redirected_url: Option<String>,

    /// Cross-origin requests allowed. Default: `true`.
    #[serde(default = "default_cors")]
    pub cors: bool,

    /// Send credentials with the request. Default: `false`.
    #[serde(default)]
    pub with_credentials: bool,

    /// Referrer policy override.
    #[serde(default)]
    pub referrer_policy: Option<ReferrerPolicy>,
}

fn default_cors() -> bool { true }

impl DataSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url:              url.into(),
            redirected_url:   None,
            cors:             true,
            with_credentials: false,
            referrer_policy:  None,
        }
    }

    #[must_use]
    pub fn redirected_url(mut self, url: impl Into<String>) -> Self {
        self.redirected_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn cors(mut self, cors: bool) -> Self {
        self.cors = cors;
        self
    }

    #[must_use]
    pub fn with_credentials(mut self, with_credentials: bool) -> Self {
        self.with_credentials = with_credentials;
        self
    }

    #[must_use]
    pub fn referrer_policy(mut self, policy: ReferrerPolicy) -> Self {
        self.referrer_policy = Some(policy);
        self
    }

    pub fn request_mode(&self) -> RequestMode {
        if self.cors {
            RequestMode::Cors
        } else {
            RequestMode::SameOrigin
        }
    }

    pub fn credentials(&self) -> Credentials {
        if self.with_credentials {
            Credentials::Include
        } else {
            Credentials::Omit
        }
    }

    pub fn effective_referrer_policy(&self) -> ReferrerPolicy {
        self.referrer_policy.unwrap_or_default()
    }
}

/// Whether the request may leave the origin of its URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestMode {
    #[default]
    Cors,
    /// Responses served from a different origin are rejected.
    SameOrigin,
}

/// Whether credentials travel with the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Credentials {
    #[default]
    Omit,
    Include,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferrerPolicy {
    NoReferrer,
    #[default]
    NoReferrerWhenDowngrade,
    Origin,
    OriginWhenCrossOrigin,
    SameOrigin,
    StrictOrigin,
    StrictOriginWhenCrossOrigin,
    UnsafeUrl,
}

impl ReferrerPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferrerPolicy::NoReferrer => "no-referrer",
            ReferrerPolicy::NoReferrerWhenDowngrade => "no-referrer-when-downgrade",
            ReferrerPolicy::Origin => "origin",
            ReferrerPolicy::OriginWhenCrossOrigin => "origin-when-cross-origin",
            ReferrerPolicy::SameOrigin => "same-origin",
            ReferrerPolicy::StrictOrigin => "strict-origin",
            ReferrerPolicy::StrictOriginWhenCrossOrigin => "strict-origin-when-cross-origin",
            ReferrerPolicy::UnsafeUrl => "unsafe-url",
        }
    }
}

impl fmt::Display for ReferrerPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown referrer policy: {0}")]
pub struct ParseReferrerPolicyError(pub String);

impl FromStr for ReferrerPolicy {
    type Err = ParseReferrerPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "no-referrer" => Ok(ReferrerPolicy::NoReferrer),
            "no-referrer-when-downgrade" => Ok(ReferrerPolicy::NoReferrerWhenDowngrade),
            "origin" => Ok(ReferrerPolicy::Origin),
            "origin-when-cross-origin" => Ok(ReferrerPolicy::OriginWhenCrossOrigin),
            "same-origin" => Ok(ReferrerPolicy::SameOrigin),
            "strict-origin" => Ok(ReferrerPolicy::StrictOrigin),
            "strict-origin-when-cross-origin" => Ok(ReferrerPolicy::StrictOriginWhenCrossOrigin),
            "unsafe-url" => Ok(ReferrerPolicy::UnsafeUrl),
            _ => Err(ParseReferrerPolicyError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let source = DataSource::new("http://example.com/a.flv");
        assert_eq!(source.request_mode(), RequestMode::Cors);
        assert_eq!(source.credentials(), Credentials::Omit);
        assert_eq!(
            source.effective_referrer_policy(),
            ReferrerPolicy::NoReferrerWhenDowngrade
        );
        assert!(source.redirected_url.is_none());
    }

    #[test]
    fn test_policy_flags() {
        let source = DataSource::new("http://example.com/a.flv")
            .cors(false)
            .with_credentials(true)
            .referrer_policy(ReferrerPolicy::StrictOrigin);
        assert_eq!(source.request_mode(), RequestMode::SameOrigin);
        assert_eq!(source.credentials(), Credentials::Include);
        assert_eq!(source.effective_referrer_policy(), ReferrerPolicy::StrictOrigin);
    }

    #[test]
    fn test_referrer_policy_round_trip_names() {
        for policy in [
            ReferrerPolicy::NoReferrer,
            ReferrerPolicy::NoReferrerWhenDowngrade,
            ReferrerPolicy::Origin,
            ReferrerPolicy::OriginWhenCrossOrigin,
            ReferrerPolicy::SameOrigin,
            ReferrerPolicy::StrictOrigin,
            ReferrerPolicy::StrictOriginWhenCrossOrigin,
            ReferrerPolicy::UnsafeUrl,
        ] {
            assert_eq!(policy.as_str().parse::<ReferrerPolicy>(), Ok(policy));
        }
        assert!("sometimes".parse::<ReferrerPolicy>().is_err());
    }

    #[test]
    fn test_deserialize_source_defaults() {
        let source: DataSource = toml::from_str(r#"url = "http://example.com/v.flv""#).unwrap();
        assert!(source.cors);
        assert!(!source.with_credentials);
        assert_eq!(source.referrer_policy, None);

        let source: DataSource = toml::from_str(
            r#"
            url = "http://example.com/v.flv"
            cors = false
            referrer_policy = "no-referrer"
            "#,
        )
        .unwrap();
        assert!(!source.cors);
        assert_eq!(source.referrer_policy, Some(ReferrerPolicy::NoReferrer));
    }
}
