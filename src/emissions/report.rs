use enum_dispatch::enum_dispatch;
use rust_decimal::Decimal;

use super::aggregate::{by_origin, mode_breakdown, top_emitters, totals};
use super::aggregate::{ModeShare, OriginTotals, TopEmitter, Totals};
use super::factors::{FactorTable, Mode};
use super::records::FreightRecord;

const BANNER: &str = "CO2 EMISSIONS REPORT - TRANSPORTATION";
const TOP_SHIPMENTS: usize = 5;

#[enum_dispatch]
pub trait RenderSection {
    fn render(&self, out: &mut String);
}

#[enum_dispatch(RenderSection)]
pub enum Section {
    SummaryBlock,
    ModeTable,
    OriginTable,
    TopTable,
    FactorListing,
}

/// Already-computed aggregates rendered as plain text. No arithmetic happens
/// here.
pub struct Report {
    sections: Vec<Section>,
}

impl Report {
    pub fn new(sections: Vec<Section>) -> Report {
        Report { sections }
    }

    pub fn render(&self) -> String {
        let rule = "=".repeat(60);
        let mut out = String::new();
        out.push_str(&rule);
        out.push('\n');
        out.push_str(BANNER);
        out.push('\n');
        out.push_str(&rule);
        out.push('\n');

        for section in &self.sections {
            section.render(&mut out);
        }

        out
    }
}

/// Full report: summary, per-mode, per-origin, top-5, factor listing.
pub fn full_report<R: FreightRecord>(noun: &'static str, records: &[R], factors: &FactorTable) -> Report {
    Report::new(vec![
        Section::SummaryBlock(SummaryBlock {
            noun,
            totals: totals(records),
            show_intensity: true,
        }),
        Section::ModeTable(ModeTable { rows: mode_breakdown(records) }),
        Section::OriginTable(OriginTable { rows: by_origin(records) }),
        Section::TopTable(TopTable {
            limit: TOP_SHIPMENTS,
            rows: top_emitters(records, TOP_SHIPMENTS),
        }),
        Section::FactorListing(FactorListing { factors: factors.clone() }),
    ])
}

/// Condensed report for large order-line sets: summary, per-mode, factor
/// listing.
pub fn summary_report<R: FreightRecord>(noun: &'static str, records: &[R], factors: &FactorTable) -> Report {
    Report::new(vec![
        Section::SummaryBlock(SummaryBlock {
            noun,
            totals: totals(records),
            show_intensity: false,
        }),
        Section::ModeTable(ModeTable { rows: mode_breakdown(records) }),
        Section::FactorListing(FactorListing { factors: factors.clone() }),
    ])
}

pub struct SummaryBlock {
    noun: &'static str,
    totals: Totals,
    show_intensity: bool,
}

impl RenderSection for SummaryBlock {
    fn render(&self, out: &mut String) {
        out.push_str("\n--- SUMMARY ---\n");
        out.push_str(&format!("Total {}: {}\n", self.noun, self.totals.records()));
        out.push_str(&format!("Total Weight: {} tons\n", fmt2(self.totals.weight_tons())));
        out.push_str(&format!("Total CO2 Emissions: {} kg\n", fmt2(self.totals.co2_kg())));
        if self.show_intensity {
            if let Some(per_ton) = self.totals.co2_per_ton() {
                out.push_str(&format!("Emissions per ton shipped: {} kg CO2/ton\n", fmt2(per_ton)));
            }
        }
    }
}

pub struct ModeTable {
    rows: Vec<ModeShare>,
}

impl RenderSection for ModeTable {
    fn render(&self, out: &mut String) {
        out.push_str("\n--- EMISSIONS BY MODE ---\n");
        out.push_str(&format!("{:<10} {:<15} {:<12}\n", "Mode", "CO2 (kg)", "Share (%)"));
        out.push_str(&format!("{}\n", "-".repeat(40)));
        for row in &self.rows {
            out.push_str(&format!(
                "{:<10} {:<15} {:<12}\n",
                row.mode.name(),
                fmt2(row.co2_kg),
                fmt1(row.share_pct),
            ));
        }
    }
}

pub struct OriginTable {
    rows: Vec<OriginTotals>,
}

impl RenderSection for OriginTable {
    fn render(&self, out: &mut String) {
        out.push_str("\n--- EMISSIONS BY ORIGIN ---\n");
        out.push_str(&format!("{:<15} {:<15} {:<12}\n", "Origin", "Weight (kg)", "CO2 (kg)"));
        out.push_str(&format!("{}\n", "-".repeat(45)));
        for row in &self.rows {
            out.push_str(&format!(
                "{:<15} {:<15} {:<12}\n",
                row.origin,
                fmt2(row.weight_kg),
                fmt2(row.co2_kg),
            ));
        }
    }
}

pub struct TopTable {
    limit: usize,
    rows: Vec<TopEmitter>,
}

impl RenderSection for TopTable {
    fn render(&self, out: &mut String) {
        out.push_str(&format!("\n--- TOP {} HIGHEST EMISSION SHIPMENTS ---\n", self.limit));
        out.push_str(&format!(
            "{:<10} {:<15} {:<15} {:<12}\n",
            "Shipment", "Destination", "Weight (kg)", "CO2 (kg)",
        ));
        out.push_str(&format!("{}\n", "-".repeat(55)));
        for row in &self.rows {
            out.push_str(&format!(
                "{:<10} {:<15} {:<15} {:<12}\n",
                row.label,
                row.destination,
                fmt2(row.weight_kg),
                fmt2(row.co2_kg),
            ));
        }
    }
}

pub struct FactorListing {
    factors: FactorTable,
}

impl RenderSection for FactorListing {
    fn render(&self, out: &mut String) {
        out.push_str("\n--- EMISSION FACTORS USED ---\n");
        out.push_str(&format!("{:<10} {:<25}\n", "Mode", "Factor (kg CO2/ton.km)"));
        out.push_str(&format!("{}\n", "-".repeat(35)));
        for mode in Mode::ALL {
            out.push_str(&format!("{:<10} {:<25}\n", mode.name(), self.factors.factor(mode).to_string()));
        }
    }
}

fn fmt2(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

fn fmt1(value: Decimal) -> String {
    format!("{:.1}", value.round_dp(1))
}
