//! Reporting units shipped with the shell.
//!
//! Each unit is registered under a `reports::<name>` reference. The data is
//! static sample data; real deployments swap these for units backed by their
//! own sources.

use anyhow::{ensure, Result};
use module_loader::{Metric, ModuleCatalog, Page};
use shared::protocol::Notice;

pub const INCIDENT_DIGEST: &str = "reports::incident_digest";
pub const LICENSE_TRACKER: &str = "reports::license_tracker";
pub const CAPACITY_OVERVIEW: &str = "reports::capacity_overview";
pub const MONTHLY_KPI: &str = "reports::monthly_kpi";

pub fn builtin_catalog() -> ModuleCatalog {
    let mut catalog = ModuleCatalog::new();
    catalog
        .register_fn(INCIDENT_DIGEST, incident_digest)
        .register_fn(LICENSE_TRACKER, license_tracker)
        .register_fn(CAPACITY_OVERVIEW, capacity_overview)
        .register_fn(MONTHLY_KPI, monthly_kpi);
    catalog
}

struct Incident {
    reference: &'static str,
    severity: u8,
    service: &'static str,
    status: &'static str,
    minutes_open: u32,
}

const INCIDENTS: &[Incident] = &[
    Incident {
        reference: "INC-4102",
        severity: 1,
        service: "payments-gateway",
        status: "resolved",
        minutes_open: 42,
    },
    Incident {
        reference: "INC-4107",
        severity: 3,
        service: "sso",
        status: "monitoring",
        minutes_open: 185,
    },
    Incident {
        reference: "INC-4111",
        severity: 2,
        service: "reporting-db",
        status: "open",
        minutes_open: 96,
    },
    Incident {
        reference: "INC-4113",
        severity: 4,
        service: "intranet",
        status: "resolved",
        minutes_open: 12,
    },
];

fn incident_digest(page: &mut Page) -> Result<()> {
    let open = INCIDENTS.iter().filter(|i| i.status != "resolved").count();
    let critical = INCIDENTS.iter().filter(|i| i.severity <= 2).count();
    let resolved: Vec<u32> = INCIDENTS
        .iter()
        .filter(|i| i.status == "resolved")
        .map(|i| i.minutes_open)
        .collect();
    ensure!(!resolved.is_empty(), "no resolved incidents to compute MTTR");
    let mttr = resolved.iter().sum::<u32>() / resolved.len() as u32;

    page.heading("Last 24 hours").metrics(vec![
        Metric::new("Incidents", INCIDENTS.len().to_string()),
        Metric::new("Still open", open.to_string()),
        Metric::new("Sev 1-2", critical.to_string()),
        Metric::new("MTTR", format!("{mttr} min")),
    ]);

    let mut incidents: Vec<&Incident> = INCIDENTS.iter().collect();
    incidents.sort_by_key(|i| (i.severity, i.reference));
    page.subheading("Incidents by severity").table(
        &["Reference", "Severity", "Service", "Status", "Open for"],
        incidents
            .into_iter()
            .map(|i| {
                vec![
                    i.reference.to_string(),
                    format!("Sev {}", i.severity),
                    i.service.to_string(),
                    i.status.to_string(),
                    format!("{} min", i.minutes_open),
                ]
            })
            .collect(),
    );
    if open > 0 {
        page.notice(Notice::info(format!(
            "{open} incident(s) still need attention."
        )));
    }
    Ok(())
}

struct License {
    product: &'static str,
    seats: u32,
    assigned: u32,
    renewal: &'static str,
}

const LICENSES: &[License] = &[
    License {
        product: "Design Suite",
        seats: 50,
        assigned: 47,
        renewal: "2026-12-01",
    },
    License {
        product: "Data Warehouse",
        seats: 20,
        assigned: 12,
        renewal: "2027-03-15",
    },
    License {
        product: "Ticketing",
        seats: 120,
        assigned: 118,
        renewal: "2026-11-30",
    },
];

/// Seat usage at or above this percentage is flagged.
const LICENSE_PRESSURE_PERCENT: u32 = 90;

fn license_tracker(page: &mut Page) -> Result<()> {
    page.heading("License utilisation");
    let mut rows = Vec::with_capacity(LICENSES.len());
    let mut pressured = Vec::new();
    for license in LICENSES {
        ensure!(license.seats > 0, "{} has no seats", license.product);
        let usage = license.assigned * 100 / license.seats;
        if usage >= LICENSE_PRESSURE_PERCENT {
            pressured.push(license.product);
        }
        rows.push(vec![
            license.product.to_string(),
            format!("{}/{}", license.assigned, license.seats),
            format!("{usage}%"),
            license.renewal.to_string(),
        ]);
    }
    page.table(&["Product", "Assigned", "Usage", "Renewal"], rows);

    if !pressured.is_empty() {
        page.notice(Notice {
            level: shared::protocol::NoticeLevel::Warning,
            message: format!("Close to seat limit: {}", pressured.join(", ")),
        });
    }
    Ok(())
}

fn capacity_overview(page: &mut Page) -> Result<()> {
    const CLUSTERS: &[(&str, u32, u32)] = &[
        ("eu-west", 412, 640),
        ("us-east", 590, 640),
        ("ap-south", 128, 320),
    ];

    page.heading("Compute capacity");
    let metrics = CLUSTERS
        .iter()
        .map(|(name, used, total)| {
            Metric::new(*name, format!("{}%", used * 100 / total))
                .with_delta(format!("{used} / {total} vCPU"))
        })
        .collect();
    page.metrics(metrics);
    page.text("Utilisation is sampled hourly and averaged over the last day.");
    Ok(())
}

fn monthly_kpi(page: &mut Page) -> Result<()> {
    const MONTHS: &[(&str, f64, f64)] = &[
        ("Jul", 99.91, 4.2),
        ("Aug", 99.95, 3.8),
        ("Sep", 99.87, 5.1),
    ];

    page.heading("Quarter at a glance");
    let Some((latest, availability, backlog)) = MONTHS.last() else {
        anyhow::bail!("no KPI data available");
    };
    page.metrics(vec![
        Metric::new("Availability", format!("{availability:.2}%")).with_delta(format!("{latest}")),
        Metric::new("Backlog age", format!("{backlog:.1} d")),
    ]);
    page.subheading("Monthly trend").table(
        &["Month", "Availability", "Backlog age"],
        MONTHS
            .iter()
            .map(|(month, availability, backlog)| {
                vec![
                    month.to_string(),
                    format!("{availability:.2}%"),
                    format!("{backlog:.1} d"),
                ]
            })
            .collect(),
    );
    Ok(())
}
