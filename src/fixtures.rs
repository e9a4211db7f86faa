//! Fixture payloads for the dashboard metrics and the builder template catalog.
//! None of these values are derived from real state.

use rand::Rng;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const TEMPLATE_CATALOG_SIZE: u32 = 500;

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub total_sites: u64,
    pub active_users: u64,
    pub requests_per_sec: u64,
    pub revenue: u64,
    pub uptime: f64,
    pub ai_requests: u64,
}

impl MetricsSnapshot {
    #[must_use]
    pub fn sample() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            total_sites: 1247,
            active_users: 3891,
            requests_per_sec: rng.gen_range(2000..7000),
            revenue: 48750,
            uptime: 99.99,
            ai_requests: rng.gen_range(5000..15000),
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub id: u32,
    pub name: String,
    pub category: String,
    pub thumbnail: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TemplateList {
    pub templates: Vec<Template>,
    pub total: u32,
}

const FEATURED: [(&str, &str, &str); 5] = [
    ("Modern Business", "business", "modern-business"),
    ("E-commerce Pro", "shop", "ecommerce-pro"),
    ("Creative Portfolio", "portfolio", "creative-portfolio"),
    ("SaaS Landing", "landing", "saas-landing"),
    ("Blog Magazine", "blog", "blog-magazine"),
];

#[must_use]
pub fn featured_templates() -> TemplateList {
    let templates = (1u32..)
        .zip(FEATURED)
        .map(|(id, (name, category, slug))| Template {
            id,
            name: name.to_string(),
            category: category.to_string(),
            thumbnail: format!("/templates/{slug}.jpg"),
        })
        .collect();

    TemplateList {
        templates,
        total: TEMPLATE_CATALOG_SIZE,
    }
}
