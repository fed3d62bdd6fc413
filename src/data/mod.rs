use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::emissions::factors::FactorTable;
use crate::emissions::records::{OrderLine, Shipment};
use crate::emissions::FactorError;

#[cfg(test)]
mod data_tests;

pub const ORDER_LINES_FILE: &str = "order_lines.csv";
pub const UOM_CONVERSIONS_FILE: &str = "uom_conversions.csv";
pub const DISTANCES_FILE: &str = "distances.csv";
pub const GPS_LOCATIONS_FILE: &str = "gps_locations.csv";

#[derive(Debug, Error)]
pub enum DataError {
    #[error("input file not found: {}", .0.display())]
    MissingFile(PathBuf),
    #[error("{file}: missing required column '{column}'")]
    MissingColumn { file: String, column: String },
    #[error("order line references unknown item code '{0}'")]
    UnknownItem(String),
    #[error("no distance entry for warehouse '{warehouse}', customer '{customer}'")]
    UnknownRoute { warehouse: String, customer: String },
    #[error("{0}")]
    Factor(#[from] FactorError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Resolved paths of the four real-data inputs.
#[derive(Debug, Clone)]
pub struct InputFiles {
    pub order_lines: PathBuf,
    pub uom_conversions: PathBuf,
    pub distances: PathBuf,
    pub gps_locations: PathBuf,
}

/// Checks that every real-data input exists under `dir` before the pipeline
/// touches any of them. The first missing path comes back as a typed error
/// so the caller can decide to fall back to sample data.
pub fn locate_inputs(dir: &Path) -> Result<InputFiles, DataError> {
    let inputs = InputFiles {
        order_lines: dir.join(ORDER_LINES_FILE),
        uom_conversions: dir.join(UOM_CONVERSIONS_FILE),
        distances: dir.join(DISTANCES_FILE),
        gps_locations: dir.join(GPS_LOCATIONS_FILE),
    };

    for path in [
        &inputs.order_lines,
        &inputs.uom_conversions,
        &inputs.distances,
        &inputs.gps_locations,
    ] {
        if !path.is_file() {
            return Err(DataError::MissingFile(path.clone()));
        }
    }

    Ok(inputs)
}

#[derive(Debug, Deserialize)]
struct OrderLineRecord {
    #[serde(rename = "Item Code")]
    item_code: String,
    #[serde(rename = "Warehouse Code")]
    warehouse: String,
    #[serde(rename = "Customer Code")]
    customer: String,
    #[serde(rename = "Units")]
    units: Decimal,
}

#[derive(Debug, Deserialize)]
struct UomRecord {
    #[serde(rename = "Item Code")]
    item_code: String,
    #[serde(rename = "Conversion Ratio")]
    ratio: Decimal,
}

#[derive(Debug, Deserialize)]
struct DistanceRecord {
    #[serde(rename = "Warehouse Code")]
    warehouse: String,
    #[serde(rename = "Customer Code")]
    customer: String,
    #[serde(rename = "Customer Country")]
    country: String,
    #[serde(rename = "Customer City")]
    city: String,
    #[serde(rename = "Road", default)]
    road: Option<Decimal>,
    #[serde(rename = "Rail", default)]
    rail: Option<Decimal>,
    #[serde(rename = "Sea", default)]
    sea: Option<Decimal>,
    #[serde(rename = "Air", default)]
    air: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
struct GpsRecord {
    #[serde(rename = "Location")]
    location: String,
    #[serde(rename = "Latitude", default)]
    latitude: Option<Decimal>,
    #[serde(rename = "Longitude", default)]
    longitude: Option<Decimal>,
}

struct Route {
    country: String,
    city: String,
    location: String,
    latitude: Option<Decimal>,
    longitude: Option<Decimal>,
    road: Decimal,
    rail: Decimal,
    sea: Decimal,
    air: Decimal,
}

fn reader(path: &Path) -> Result<csv::Reader<File>, DataError> {
    let file = File::open(path)?;
    Ok(csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file))
}

/// Columns are mapped by header name, so a leading unnamed index column (as
/// written by dataframe exports) is tolerated. A renamed or dropped column
/// fails here with its name instead of a null propagating into arithmetic.
fn check_columns(
    reader: &mut csv::Reader<File>,
    path: &Path,
    required: &[&str],
) -> Result<(), DataError> {
    let headers = reader.headers()?;
    for column in required {
        if !headers.iter().any(|header| header == *column) {
            return Err(DataError::MissingColumn {
                file: path.display().to_string(),
                column: (*column).to_string(),
            });
        }
    }

    Ok(())
}

fn load_order_lines(path: &Path) -> Result<Vec<OrderLineRecord>, DataError> {
    let mut reader = reader(path)?;
    check_columns(&mut reader, path, &["Item Code", "Warehouse Code", "Customer Code", "Units"])?;

    let mut records = Vec::new();
    for record in reader.deserialize() {
        records.push(record?);
    }
    debug!("loaded {} order lines from {}", records.len(), path.display());

    Ok(records)
}

fn load_uom_conversions(path: &Path) -> Result<HashMap<String, Decimal>, DataError> {
    let mut reader = reader(path)?;
    check_columns(&mut reader, path, &["Item Code", "Conversion Ratio"])?;

    let mut ratios = HashMap::new();
    for record in reader.deserialize::<UomRecord>() {
        let record = record?;
        ratios.insert(record.item_code, record.ratio);
    }
    debug!("loaded {} UOM conversions from {}", ratios.len(), path.display());

    Ok(ratios)
}

fn load_distances(path: &Path) -> Result<Vec<DistanceRecord>, DataError> {
    let mut reader = reader(path)?;
    check_columns(
        &mut reader,
        path,
        &["Warehouse Code", "Customer Code", "Customer Country", "Customer City", "Road", "Rail", "Sea", "Air"],
    )?;

    let mut records = Vec::new();
    for record in reader.deserialize() {
        records.push(record?);
    }
    debug!("loaded {} distance entries from {}", records.len(), path.display());

    Ok(records)
}

fn load_gps_locations(path: &Path) -> Result<HashMap<String, (Option<Decimal>, Option<Decimal>)>, DataError> {
    let mut reader = reader(path)?;
    check_columns(&mut reader, path, &["Location", "Latitude", "Longitude"])?;

    let mut coordinates = HashMap::new();
    for record in reader.deserialize::<GpsRecord>() {
        let record = record?;
        coordinates.insert(record.location, (record.latitude, record.longitude));
    }
    debug!("loaded {} GPS locations from {}", coordinates.len(), path.display());

    Ok(coordinates)
}

/// Left-join chain of the real-data pipeline: order lines ⋈ UOM conversions
/// (item code) ⋈ distances (warehouse + customer), where the distance table
/// is first enriched with GPS coordinates joined on the composed
/// `"<Country>, <City>"` location key. Weight is derived as
/// units × conversion ratio; an absent distance counts as zero.
///
/// Unmatched item codes and routes feed arithmetic, so they fail with typed
/// errors. An unmatched GPS location only leaves the coordinates empty.
pub fn load_order_line_data(inputs: &InputFiles) -> Result<Vec<OrderLine>, DataError> {
    let lines = load_order_lines(&inputs.order_lines)?;
    let ratios = load_uom_conversions(&inputs.uom_conversions)?;
    let coordinates = load_gps_locations(&inputs.gps_locations)?;
    let distances = load_distances(&inputs.distances)?;

    let mut routes: HashMap<(String, String), Route> = HashMap::with_capacity(distances.len());
    for record in distances {
        let location = format!("{}, {}", record.country, record.city);
        let (latitude, longitude) = match coordinates.get(&location) {
            Some(&(latitude, longitude)) => (latitude, longitude),
            None => {
                debug!("no GPS entry for location '{}'", location);
                (None, None)
            },
        };

        let key = (record.warehouse, record.customer);
        let route = Route {
            country: record.country,
            city: record.city,
            location,
            latitude,
            longitude,
            road: record.road.unwrap_or(Decimal::ZERO),
            rail: record.rail.unwrap_or(Decimal::ZERO),
            sea: record.sea.unwrap_or(Decimal::ZERO),
            air: record.air.unwrap_or(Decimal::ZERO),
        };
        routes.insert(key, route);
    }

    let mut order_lines = Vec::with_capacity(lines.len());
    for line in lines {
        let ratio = match ratios.get(&line.item_code) {
            Some(&ratio) => ratio,
            None => return Err(DataError::UnknownItem(line.item_code)),
        };

        let key = (line.warehouse, line.customer);
        let route = match routes.get(&key) {
            Some(route) => route,
            None => {
                return Err(DataError::UnknownRoute {
                    warehouse: key.0,
                    customer: key.1,
                });
            },
        };

        order_lines.push(OrderLine {
            item_code: line.item_code,
            warehouse: key.0,
            customer: key.1,
            units: line.units,
            conversion_ratio: ratio,
            country: route.country.clone(),
            city: route.city.clone(),
            location: route.location.clone(),
            latitude: route.latitude,
            longitude: route.longitude,
            road_km: route.road,
            rail_km: route.rail,
            sea_km: route.sea,
            air_km: route.air,
            weight_kg: line.units * ratio,
            co2_road: Decimal::ZERO,
            co2_rail: Decimal::ZERO,
            co2_sea: Decimal::ZERO,
            co2_air: Decimal::ZERO,
            co2_total: Decimal::ZERO,
        });
    }

    Ok(order_lines)
}

const SAMPLE_COUNT: usize = 20;

const SAMPLE_WEIGHTS_KG: [u32; SAMPLE_COUNT] = [
    500, 1200, 800, 2500, 1500, 3000, 900, 1800, 2200, 700,
    1100, 2800, 600, 1900, 2400, 1300, 850, 2100, 1600, 950,
];
const SAMPLE_ROAD_KM: [u32; SAMPLE_COUNT] = [
    120, 0, 350, 200, 0, 180, 450, 0, 280, 160,
    220, 0, 380, 140, 0, 260, 320, 0, 190, 410,
];
const SAMPLE_SEA_KM: [u32; SAMPLE_COUNT] = [
    0, 4500, 0, 0, 6200, 0, 0, 3800, 0, 0,
    0, 5100, 0, 0, 4800, 0, 0, 5500, 0, 0,
];
const SAMPLE_AIR_KM: [u32; SAMPLE_COUNT] = [
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 1200, 0, 0, 0, 0, 0, 800, 0,
];
const SAMPLE_RAIL_KM: [u32; SAMPLE_COUNT] = [
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 600, 0, 0, 0, 0, 0, 500,
];

/// The synthetic 20-shipment dataset used when the real inputs are absent.
pub fn sample_shipments() -> Vec<Shipment> {
    (0..SAMPLE_COUNT)
        .map(|i| Shipment {
            shipment_id: i as u32 + 1,
            origin: if i < SAMPLE_COUNT / 2 { "Warehouse_A" } else { "Warehouse_B" }.to_string(),
            destination: format!("Customer_{}", i + 1),
            weight_kg: Decimal::from(SAMPLE_WEIGHTS_KG[i]),
            distance_road: Decimal::from(SAMPLE_ROAD_KM[i]),
            distance_sea: Decimal::from(SAMPLE_SEA_KM[i]),
            distance_air: Decimal::from(SAMPLE_AIR_KM[i]),
            distance_rail: Decimal::from(SAMPLE_RAIL_KM[i]),
            co2_road: Decimal::ZERO,
            co2_sea: Decimal::ZERO,
            co2_air: Decimal::ZERO,
            co2_rail: Decimal::ZERO,
            co2_total: Decimal::ZERO,
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct FactorRecord {
    mode: String,
    factor: Decimal,
}

/// Loads a factor-table override, rows of `mode,factor` covering all four
/// modes.
pub fn load_factor_table(path: &Path) -> Result<FactorTable, DataError> {
    let mut reader = reader(path)?;
    check_columns(&mut reader, path, &["mode", "factor"])?;

    let mut entries = Vec::new();
    for record in reader.deserialize::<FactorRecord>() {
        let record = record?;
        entries.push((record.mode, record.factor));
    }

    Ok(FactorTable::from_entries(entries)?)
}

/// Writes a computed record set, every input and derived column, one row per
/// record.
pub fn export_records<S: Serialize>(path: &Path, records: &[S]) -> Result<(), DataError> {
    let mut writer = csv::WriterBuilder::new().from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}
