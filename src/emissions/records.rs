use log::warn;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use super::factors::{FactorTable, Mode};

/// The formula works in metric tons; weights arrive in kilograms.
pub const KG_PER_TON: Decimal = dec!(1000);

fn leg_co2(weight_kg: Decimal, distance_km: Decimal, factor: Decimal) -> Decimal {
    weight_kg / KG_PER_TON * distance_km * factor
}

/// CO2 in kg for a single leg: weight (tons) × distance (km) × factor.
///
/// Mode names are matched case-insensitively. A name outside the known set
/// counts as zero emissions and is logged as a data-quality warning.
pub fn emission_kg(
    weight_kg: Decimal,
    distance_km: Decimal,
    mode: &str,
    factors: &FactorTable,
) -> Decimal {
    let factor = match Mode::parse(mode) {
        Some(mode) => factors.factor(mode),
        None => {
            warn!("unknown transport mode '{}', counting zero emissions", mode);
            Decimal::ZERO
        },
    };

    leg_co2(weight_kg, distance_km, factor)
}

/// A record the emissions pass and the aggregations can work on, whichever
/// pipeline it came from.
pub trait FreightRecord {
    fn weight_kg(&self) -> Decimal;
    fn distance_km(&self, mode: Mode) -> Decimal;

    fn co2(&self, mode: Mode) -> Decimal;
    fn set_co2(&mut self, mode: Mode, value: Decimal);
    fn co2_total(&self) -> Decimal;
    fn set_co2_total(&mut self, value: Decimal);

    fn origin(&self) -> &str;
    fn destination(&self) -> &str;
    fn label(&self) -> String;
}

/// Augments every record in place with one CO2 column per mode plus their
/// sum. Rows are independent; order and count are untouched.
pub fn compute_emissions<R: FreightRecord>(records: &mut [R], factors: &FactorTable) {
    for record in records.iter_mut() {
        let mut total = Decimal::ZERO;
        for mode in Mode::ALL {
            let co2 = leg_co2(record.weight_kg(), record.distance_km(mode), factors.factor(mode));
            record.set_co2(mode, co2);
            total += co2;
        }
        record.set_co2_total(total);
    }
}

/// One shipment of the synthetic dataset. Distances are zero for unused
/// modes; the co2 columns are derived, never input.
#[derive(Debug, Clone, Serialize)]
pub struct Shipment {
    pub shipment_id: u32,
    pub origin: String,
    pub destination: String,
    pub weight_kg: Decimal,
    pub distance_road: Decimal,
    pub distance_sea: Decimal,
    pub distance_air: Decimal,
    pub distance_rail: Decimal,
    pub co2_road: Decimal,
    pub co2_sea: Decimal,
    pub co2_air: Decimal,
    pub co2_rail: Decimal,
    pub co2_total: Decimal,
}

impl FreightRecord for Shipment {
    fn weight_kg(&self) -> Decimal {
        self.weight_kg
    }

    fn distance_km(&self, mode: Mode) -> Decimal {
        match mode {
            Mode::Road => self.distance_road,
            Mode::Rail => self.distance_rail,
            Mode::Sea => self.distance_sea,
            Mode::Air => self.distance_air,
        }
    }

    fn co2(&self, mode: Mode) -> Decimal {
        match mode {
            Mode::Road => self.co2_road,
            Mode::Rail => self.co2_rail,
            Mode::Sea => self.co2_sea,
            Mode::Air => self.co2_air,
        }
    }

    fn set_co2(&mut self, mode: Mode, value: Decimal) {
        match mode {
            Mode::Road => self.co2_road = value,
            Mode::Rail => self.co2_rail = value,
            Mode::Sea => self.co2_sea = value,
            Mode::Air => self.co2_air = value,
        }
    }

    fn co2_total(&self) -> Decimal {
        self.co2_total
    }

    fn set_co2_total(&mut self, value: Decimal) {
        self.co2_total = value;
    }

    fn origin(&self) -> &str {
        &self.origin
    }

    fn destination(&self) -> &str {
        &self.destination
    }

    fn label(&self) -> String {
        self.shipment_id.to_string()
    }
}

/// One order line of the real dataset after the join chain: UOM conversion
/// joined on item code, distances on warehouse+customer, GPS coordinates on
/// the composed location key. Serialized column names match the source
/// tables so the detailed export lines up with the inputs.
#[derive(Debug, Clone, Serialize)]
pub struct OrderLine {
    #[serde(rename = "Item Code")]
    pub item_code: String,
    #[serde(rename = "Warehouse Code")]
    pub warehouse: String,
    #[serde(rename = "Customer Code")]
    pub customer: String,
    #[serde(rename = "Units")]
    pub units: Decimal,
    #[serde(rename = "Conversion Ratio")]
    pub conversion_ratio: Decimal,
    #[serde(rename = "Customer Country")]
    pub country: String,
    #[serde(rename = "Customer City")]
    pub city: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Latitude")]
    pub latitude: Option<Decimal>,
    #[serde(rename = "Longitude")]
    pub longitude: Option<Decimal>,
    #[serde(rename = "Road")]
    pub road_km: Decimal,
    #[serde(rename = "Rail")]
    pub rail_km: Decimal,
    #[serde(rename = "Sea")]
    pub sea_km: Decimal,
    #[serde(rename = "Air")]
    pub air_km: Decimal,
    #[serde(rename = "KG")]
    pub weight_kg: Decimal,
    #[serde(rename = "CO2 Road")]
    pub co2_road: Decimal,
    #[serde(rename = "CO2 Rail")]
    pub co2_rail: Decimal,
    #[serde(rename = "CO2 Sea")]
    pub co2_sea: Decimal,
    #[serde(rename = "CO2 Air")]
    pub co2_air: Decimal,
    #[serde(rename = "CO2 Total")]
    pub co2_total: Decimal,
}

impl FreightRecord for OrderLine {
    fn weight_kg(&self) -> Decimal {
        self.weight_kg
    }

    fn distance_km(&self, mode: Mode) -> Decimal {
        match mode {
            Mode::Road => self.road_km,
            Mode::Rail => self.rail_km,
            Mode::Sea => self.sea_km,
            Mode::Air => self.air_km,
        }
    }

    fn co2(&self, mode: Mode) -> Decimal {
        match mode {
            Mode::Road => self.co2_road,
            Mode::Rail => self.co2_rail,
            Mode::Sea => self.co2_sea,
            Mode::Air => self.co2_air,
        }
    }

    fn set_co2(&mut self, mode: Mode, value: Decimal) {
        match mode {
            Mode::Road => self.co2_road = value,
            Mode::Rail => self.co2_rail = value,
            Mode::Sea => self.co2_sea = value,
            Mode::Air => self.co2_air = value,
        }
    }

    fn co2_total(&self) -> Decimal {
        self.co2_total
    }

    fn set_co2_total(&mut self, value: Decimal) {
        self.co2_total = value;
    }

    fn origin(&self) -> &str {
        &self.warehouse
    }

    fn destination(&self) -> &str {
        &self.customer
    }

    fn label(&self) -> String {
        self.item_code.clone()
    }
}
