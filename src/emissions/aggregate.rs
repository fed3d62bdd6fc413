use std::collections::BTreeMap;

use getset::CopyGetters;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::factors::Mode;
use super::records::{FreightRecord, KG_PER_TON};

/// Grand totals over a computed record set.
#[derive(Debug, Clone, Copy, PartialEq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct Totals {
    records: usize,
    weight_tons: Decimal,
    co2_kg: Decimal,
}

impl Totals {
    /// Emission intensity in kg CO2 per ton shipped, `None` for an empty or
    /// weightless record set.
    pub fn co2_per_ton(&self) -> Option<Decimal> {
        if self.weight_tons.is_zero() {
            None
        } else {
            Some(self.co2_kg / self.weight_tons)
        }
    }
}

pub fn totals<R: FreightRecord>(records: &[R]) -> Totals {
    let mut weight_kg = Decimal::ZERO;
    let mut co2_kg = Decimal::ZERO;
    for record in records {
        weight_kg += record.weight_kg();
        co2_kg += record.co2_total();
    }

    Totals {
        records: records.len(),
        weight_tons: weight_kg / KG_PER_TON,
        co2_kg,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeShare {
    pub mode: Mode,
    pub co2_kg: Decimal,
    pub share_pct: Decimal,
}

/// Per-mode CO2 sums and their share of the grand total. Shares are zero
/// when the grand total is zero.
pub fn mode_breakdown<R: FreightRecord>(records: &[R]) -> Vec<ModeShare> {
    let grand_total: Decimal = records.iter().map(|record| record.co2_total()).sum();

    Mode::ALL
        .iter()
        .map(|&mode| {
            let co2_kg: Decimal = records.iter().map(|record| record.co2(mode)).sum();
            let share_pct = if grand_total.is_zero() {
                Decimal::ZERO
            } else {
                co2_kg / grand_total * dec!(100)
            };
            ModeShare { mode, co2_kg, share_pct }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct OriginTotals {
    pub origin: String,
    pub weight_kg: Decimal,
    pub co2_kg: Decimal,
}

/// Weight and total CO2 summed per distinct origin, keys in ascending
/// lexical order.
pub fn by_origin<R: FreightRecord>(records: &[R]) -> Vec<OriginTotals> {
    let mut grouped: BTreeMap<&str, (Decimal, Decimal)> = BTreeMap::new();
    for record in records {
        let entry = grouped.entry(record.origin()).or_insert((Decimal::ZERO, Decimal::ZERO));
        entry.0 += record.weight_kg();
        entry.1 += record.co2_total();
    }

    grouped
        .into_iter()
        .map(|(origin, (weight_kg, co2_kg))| OriginTotals {
            origin: origin.to_string(),
            weight_kg,
            co2_kg,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopEmitter {
    pub label: String,
    pub destination: String,
    pub weight_kg: Decimal,
    pub co2_kg: Decimal,
}

/// The `n` records with the largest total CO2, descending. The sort is
/// stable, so ties keep their input order.
pub fn top_emitters<R: FreightRecord>(records: &[R], n: usize) -> Vec<TopEmitter> {
    let mut ranked: Vec<&R> = records.iter().collect();
    ranked.sort_by(|a, b| b.co2_total().cmp(&a.co2_total()));

    ranked
        .into_iter()
        .take(n)
        .map(|record| TopEmitter {
            label: record.label(),
            destination: record.destination().to_string(),
            weight_kg: record.weight_kg(),
            co2_kg: record.co2_total(),
        })
        .collect()
}
