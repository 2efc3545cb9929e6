// crates/pocketknife-cli/src/output.rs
//
// Output formatting for the pocketknife CLI.
// Supports table and JSON output modes. Both are pure functions of the
// report and the display denomination.

use clap::ValueEnum;
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};

use pocketknife_core::{
    Amount, CategoryTotal, Component, Denomination, FailedFetch, Role, TreasuryReport,
};

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed table output (default).
    Table,
    /// JSON output for machine consumption.
    Json,
}

/// Render the report in the requested format.
pub fn render(report: &TreasuryReport, denom: &Denomination, format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => render_table(report, denom),
        OutputFormat::Json => render_json(report, denom),
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

fn column_title(role: Role, component: Component) -> &'static str {
    match (role, component) {
        (Role::Liquid, Component::Liquid) => "Balance",
        (Role::DelegatorStake, Component::Staked) => "Delegated",
        (_, Component::Liquid) => "Liquid",
        (_, Component::Staked) => "Staked",
        (_, Component::Commission) => "Commission",
        (_, Component::Rewards) => "Rewards",
    }
}

/// Liquid has a single amount column, so it gets no separate Total column.
fn has_total_column(role: Role) -> bool {
    role.components().len() > 1
}

fn category_table(
    category: &CategoryTotal,
    failures: &[&FailedFetch],
    denom: &Denomination,
) -> String {
    let role = category.role;
    let components = role.components();
    let with_total = has_total_column(role);

    let mut builder = Builder::default();

    let mut header = vec!["Address".to_string()];
    header.extend(components.iter().map(|c| column_title(role, *c).to_string()));
    if with_total {
        header.push("Total".to_string());
    }
    header.push("Status".to_string());
    builder.push_record(header);

    for row in &category.rows {
        let mut record = vec![row.address.clone()];
        record.extend(components.iter().map(|c| denom.format(row.components.get(*c))));
        if with_total {
            record.push(denom.format(row.total));
        }
        record.push("OK".to_string());
        builder.push_record(record);
    }

    for failed in failures {
        let mut record = vec![failed.address.clone()];
        record.extend(components.iter().map(|_| String::new()));
        if with_total {
            record.push(String::new());
        }
        record.push("FAILED".to_string());
        builder.push_record(record);
    }

    let mut total_row = vec!["TOTAL".to_string()];
    total_row.extend(
        components
            .iter()
            .map(|c| denom.format(category.components.get(*c))),
    );
    if with_total {
        total_row.push(denom.format(category.total));
    }
    total_row.push(format!("{}/{}", category.count(), category.requested));
    builder.push_record(total_row);

    let amount_columns = components.len() + usize::from(with_total);
    let mut table = builder.build();
    table
        .with(Style::modern())
        .with(Modify::new(Columns::new(1..=amount_columns)).with(Alignment::right()));
    table.to_string()
}

/// Human-readable report: one section per present category, then a summary.
pub fn render_table(report: &TreasuryReport, denom: &Denomination) -> String {
    let mut out = String::new();

    for category in &report.categories {
        let failures: Vec<&FailedFetch> = report.failures_for(category.role).collect();
        let title = category.role.title();

        out.push_str(&format!(
            "{} ({} {})\n",
            title,
            category.requested,
            plural(category.requested)
        ));
        out.push_str(&category_table(category, &failures, denom));
        out.push('\n');

        if !failures.is_empty() {
            out.push_str(&format!(
                "\nFailed {} queries ({}):\n",
                title.to_lowercase(),
                failures.len()
            ));
            for failed in &failures {
                out.push_str(&format!("  - {}: {}\n", failed.address, failed.reason));
            }
        }
        out.push('\n');
    }

    out.push_str(&render_summary(report, denom));
    out
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        "address"
    } else {
        "addresses"
    }
}

fn render_summary(report: &TreasuryReport, denom: &Denomination) -> String {
    let lines: Vec<(String, String)> = report
        .categories
        .iter()
        .map(|c| (c.role.title().to_string(), denom.format_with_symbol(c.total)))
        .chain(std::iter::once((
            "GRAND TOTAL".to_string(),
            denom.format_with_symbol(report.grand_total),
        )))
        .collect();

    let label_width = lines.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
    let value_width = lines.iter().map(|(_, v)| v.len()).max().unwrap_or(0);
    let rule = "-".repeat(label_width + 2 + value_width);

    let mut out = String::from("Summary\n");
    out.push_str(&rule);
    out.push('\n');
    let category_lines = lines.len() - 1;
    for (i, (label, value)) in lines.iter().enumerate() {
        if i == category_lines {
            out.push_str(&rule);
            out.push('\n');
        }
        out.push_str(&format!(
            "{:<lw$}  {:>vw$}\n",
            label,
            value,
            lw = label_width,
            vw = value_width
        ));
    }
    if !report.failures.is_empty() {
        out.push_str(&format!(
            "\n{} of {} addresses failed and are excluded from the totals.\n",
            report.failures.len(),
            report.requested()
        ));
    }
    out
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// JSON view of the report with display-denominated decimal strings.
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    denom: &'a str,
    display_denom: &'a str,
    categories: Vec<JsonCategory<'a>>,
    grand_total: String,
    requested: usize,
    succeeded: usize,
    failures: &'a [FailedFetch],
}

#[derive(Debug, Serialize)]
struct JsonCategory<'a> {
    role: Role,
    requested: usize,
    succeeded: usize,
    #[serde(flatten)]
    components: JsonComponents,
    total: String,
    addresses: Vec<JsonAddress<'a>>,
}

#[derive(Debug, Serialize)]
struct JsonAddress<'a> {
    address: &'a str,
    #[serde(flatten)]
    components: JsonComponents,
    total: String,
}

/// Only the components the role actually fetches are emitted.
#[derive(Debug, Default, Serialize)]
struct JsonComponents {
    #[serde(skip_serializing_if = "Option::is_none")]
    liquid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    staked: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    commission: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rewards: Option<String>,
}

impl JsonComponents {
    fn new(role: Role, get: impl Fn(Component) -> Amount, denom: &Denomination) -> Self {
        let mut out = Self::default();
        for component in role.components() {
            let value = Some(denom.format_plain(get(*component)));
            match component {
                Component::Liquid => out.liquid = value,
                Component::Staked => out.staked = value,
                Component::Commission => out.commission = value,
                Component::Rewards => out.rewards = value,
            }
        }
        out
    }
}

/// Format the report as pretty-printed JSON.
pub fn render_json(report: &TreasuryReport, denom: &Denomination) -> String {
    let categories = report
        .categories
        .iter()
        .map(|c| JsonCategory {
            role: c.role,
            requested: c.requested,
            succeeded: c.count(),
            components: JsonComponents::new(c.role, |k| c.components.get(k), denom),
            total: denom.format_plain(c.total),
            addresses: c
                .rows
                .iter()
                .map(|row| JsonAddress {
                    address: &row.address,
                    components: JsonComponents::new(c.role, |k| row.components.get(k), denom),
                    total: denom.format_plain(row.total),
                })
                .collect(),
        })
        .collect();

    let view = JsonReport {
        denom: &denom.base_denom,
        display_denom: &denom.display,
        categories,
        grand_total: denom.format_plain(report.grand_total),
        requested: report.requested(),
        succeeded: report.succeeded(),
        failures: &report.failures,
    };

    serde_json::to_string_pretty(&view)
        .unwrap_or_else(|e| format!("JSON serialization error: {}", e))
}
