//! WordPress site creation.
//!
//! Nothing is provisioned: [`StubProvisioner`] only stamps an id, a status and
//! a creation time on the validated request. Real orchestration would plug in
//! behind [`Provisioner`].

use chrono::{SecondsFormat, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub const STATUS_PROVISIONING: &str = "provisioning";

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Starter,
    Pro,
    Enterprise,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SiteCreationRequest {
    pub domain: String,
    pub title: String,
    pub admin_email: String,
    pub plan: Plan,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugins: Option<Vec<String>>,
}

impl SiteCreationRequest {
    #[must_use]
    pub fn violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        if self.domain.is_empty() {
            violations.push("domain: must not be empty".to_string());
        }
        if !valid_email(&self.admin_email) {
            violations.push("adminEmail: invalid email".to_string());
        }
        violations
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SiteRecord {
    pub id: String,
    #[serde(flatten)]
    pub request: SiteCreationRequest,
    pub status: String,
    pub created_at: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SiteCreated {
    pub success: bool,
    pub site: SiteRecord,
}

pub trait Provisioner: Send + Sync {
    fn provision(&self, request: SiteCreationRequest) -> SiteRecord;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StubProvisioner;

impl Provisioner for StubProvisioner {
    fn provision(&self, request: SiteCreationRequest) -> SiteRecord {
        SiteRecord {
            id: Uuid::new_v4().to_string(),
            request,
            status: STATUS_PROVISIONING.to_string(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

static EMAIL: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());

#[must_use]
pub fn valid_email(email: &str) -> bool {
    EMAIL.as_ref().is_some_and(|re| re.is_match(email))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::json;
    use std::collections::HashSet;

    fn request() -> SiteCreationRequest {
        SiteCreationRequest {
            domain: "example.com".to_string(),
            title: "Test".to_string(),
            admin_email: "a@b.com".to_string(),
            plan: Plan::Pro,
            plugins: None,
        }
    }

    #[test]
    fn valid_email_accepts_basic_format() {
        assert!(valid_email("a@b.com"));
        assert!(valid_email("name.surname@example.co"));
    }

    #[test]
    fn valid_email_rejects_malformed() {
        assert!(!valid_email(""));
        assert!(!valid_email("not-an-email"));
        assert!(!valid_email("a@b"));
        assert!(!valid_email("a b@c.com"));
    }

    #[test]
    fn empty_domain_and_bad_email_are_reported() {
        let mut req = request();
        assert!(req.violations().is_empty());

        req.domain = String::new();
        req.admin_email = "nope".to_string();
        let violations = req.violations();
        assert_eq!(violations.len(), 2);
        assert!(violations[0].starts_with("domain"));
        assert!(violations[1].starts_with("adminEmail"));
    }

    #[test]
    fn unknown_plan_does_not_deserialize() {
        let payload = json!({
            "domain": "example.com",
            "title": "Test",
            "adminEmail": "a@b.com",
            "plan": "platinum"
        });
        assert!(serde_json::from_value::<SiteCreationRequest>(payload).is_err());
    }

    #[test]
    fn stub_ids_are_unique_and_status_is_fixed() {
        let provisioner = StubProvisioner;
        let mut ids = HashSet::new();
        for _ in 0..64 {
            let site = provisioner.provision(request());
            assert_eq!(site.status, STATUS_PROVISIONING);
            assert!(ids.insert(site.id));
        }
    }

    #[test]
    fn record_serializes_flat_camel_case() -> Result<()> {
        let mut req = request();
        req.plugins = Some(vec!["woocommerce".to_string()]);
        let value = serde_json::to_value(StubProvisioner.provision(req))?;

        assert_eq!(value["domain"], "example.com");
        assert_eq!(value["adminEmail"], "a@b.com");
        assert_eq!(value["plan"], "pro");
        assert_eq!(value["plugins"], json!(["woocommerce"]));
        assert_eq!(value["status"], "provisioning");
        assert!(value["createdAt"].as_str().is_some_and(|ts| ts.ends_with('Z')));
        assert!(Uuid::parse_str(value["id"].as_str().unwrap_or_default()).is_ok());
        Ok(())
    }

    #[test]
    fn absent_plugins_are_omitted() -> Result<()> {
        let value = serde_json::to_value(StubProvisioner.provision(request()))?;
        assert!(value.get("plugins").is_none());
        Ok(())
    }
}
