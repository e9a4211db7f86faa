//! Plain-text rendering of the dashboard frame.

use crate::fixtures::MetricsSnapshot;

const CARD_WIDTH: usize = 20;

struct MetricCard {
    title: &'static str,
    value: String,
    change: &'static str,
}

struct FeatureCard {
    title: &'static str,
    description: &'static str,
    status: &'static str,
}

const FEATURES: [FeatureCard; 3] = [
    FeatureCard {
        title: "Code Assistant",
        description: "GPT-4 powered code suggestions and reviews",
        status: "active",
    },
    FeatureCard {
        title: "Visual Builder",
        description: "Drag-and-drop with AI design assistance",
        status: "active",
    },
    FeatureCard {
        title: "Predictive Scaling",
        description: "AI-driven resource optimization",
        status: "beta",
    },
];

const QUICK_ACTIONS: [&str; 4] = [
    "Deploy New Site",
    "Launch AI Assistant",
    "Open Builder",
    "View Analytics",
];

const NAV: [&str; 4] = ["Dashboard", "Sites", "AI Tools", "Analytics"];

/// Group digits in threes: `48750` becomes `48,750`.
#[must_use]
pub fn fmt_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn metric_cards(metrics: Option<&MetricsSnapshot>) -> [MetricCard; 4] {
    let pick = |field: fn(&MetricsSnapshot) -> u64| metrics.map_or(0, field);
    [
        MetricCard {
            title: "Total Sites",
            value: pick(|m| m.total_sites).to_string(),
            change: "+12%",
        },
        MetricCard {
            title: "Active Users",
            value: pick(|m| m.active_users).to_string(),
            change: "+5%",
        },
        MetricCard {
            title: "Requests/sec",
            value: pick(|m| m.requests_per_sec).to_string(),
            change: "+23%",
        },
        MetricCard {
            title: "Revenue",
            value: format!("${}", fmt_thousands(pick(|m| m.revenue))),
            change: "+18%",
        },
    ]
}

fn boxed_row(cards: &[[String; 3]]) -> String {
    let border = cards
        .iter()
        .map(|_| format!("+{}+", "-".repeat(CARD_WIDTH + 2)))
        .collect::<Vec<_>>()
        .join(" ");

    let mut out = String::new();
    out.push_str(&border);
    out.push('\n');
    for line in 0..3 {
        let row = cards
            .iter()
            .map(|card| format!("| {:<width$} |", card[line], width = CARD_WIDTH))
            .collect::<Vec<_>>()
            .join(" ");
        out.push_str(&row);
        out.push('\n');
    }
    out.push_str(&border);
    out.push('\n');
    out
}

/// Render one full frame. Missing metrics show as zero.
#[must_use]
pub fn render(metrics: Option<&MetricsSnapshot>) -> String {
    let cards = metric_cards(metrics).map(|card| {
        [
            card.title.to_string(),
            card.value,
            card.change.to_string(),
        ]
    });

    let title_width = FEATURES.iter().map(|f| f.title.len()).max().unwrap_or(0);
    let features = FEATURES.iter().map(|feature| {
        format!(
            "  {:<8} {:<title_width$}  {}\n",
            format!("[{}]", feature.status),
            feature.title,
            feature.description,
        )
    });

    let actions = QUICK_ACTIONS
        .iter()
        .map(|action| format!("[ {action} ]"))
        .collect::<Vec<_>>()
        .join("  ");

    let mut frame = String::new();
    frame.push_str("TechyPark Engine - AI-Powered Infrastructure\n");
    frame.push_str(&NAV.join("  |  "));
    frame.push_str("\n\n");
    frame.push_str(&boxed_row(&cards));
    frame.push_str("\nAI-Powered Features\n");
    frame.extend(features);
    frame.push_str("\nQuick Actions\n");
    frame.push_str(&format!("  {actions}\n"));
    frame
}
