use std::fs;
use std::path::Path;

use anyhow::{bail, Result};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tempfile::tempdir;

use crate::emissions::factors::FactorTable;
use crate::emissions::FactorError;
use crate::pipeline;

use super::*;

/// Fixture files in the shape the real inputs arrive in, leading unnamed
/// index column included.
fn write_inputs(dir: &Path) -> Result<()> {
    fs::write(
        dir.join(ORDER_LINES_FILE),
        ",Item Code,Warehouse Code,Customer Code,Units\n\
         0,ITEM-1,WH-1,CUST-1,10\n\
         1,ITEM-2,WH-1,CUST-2,4\n",
    )?;
    fs::write(
        dir.join(UOM_CONVERSIONS_FILE),
        ",Item Code,Conversion Ratio\n\
         0,ITEM-1,2.5\n\
         1,ITEM-2,1.2\n",
    )?;
    fs::write(
        dir.join(DISTANCES_FILE),
        ",Warehouse Code,Customer Code,Customer Country,Customer City,Road,Rail,Sea,Air\n\
         0,WH-1,CUST-1,France,Paris,120,0,0,0\n\
         1,WH-1,CUST-2,Japan,Osaka,50,,8000,\n",
    )?;
    fs::write(
        dir.join(GPS_LOCATIONS_FILE),
        ",Location,Latitude,Longitude\n\
         0,\"France, Paris\",48.86,2.35\n",
    )?;

    Ok(())
}

#[test]
fn test_locate_inputs_reports_first_missing() -> Result<()> {
    let dir = tempdir()?;

    match locate_inputs(dir.path()) {
        Err(DataError::MissingFile(path)) => assert!(path.ends_with(ORDER_LINES_FILE)),
        other => bail!("expected a missing file error, got {:?}", other),
    }

    Ok(())
}

#[test]
fn test_real_pipeline_join_and_compute() -> Result<()> {
    let dir = tempdir()?;
    write_inputs(dir.path())?;

    let inputs = locate_inputs(dir.path())?;
    let (records, report) = pipeline::run_real(&inputs, &FactorTable::default())?;

    assert_eq!(records.len(), 2);

    let first = &records[0];
    assert_eq!(first.weight_kg, dec!(25)); // 10 units × 2.5 kg
    assert_eq!(first.location, "France, Paris");
    assert_eq!(first.latitude, Some(dec!(48.86)));
    assert_eq!(first.co2_road, dec!(0.186)); // 0.025 t × 120 km × 0.062
    assert_eq!(first.co2_total, first.co2_road);

    // Blank distance fields count as zero; a location without a GPS entry
    // keeps empty coordinates.
    let second = &records[1];
    assert_eq!(second.weight_kg, dec!(4.8));
    assert_eq!(second.latitude, None);
    assert_eq!(second.co2_road, dec!(0.01488));
    assert_eq!(second.co2_sea, dec!(0.6144));
    assert_eq!(second.co2_rail, Decimal::ZERO);
    assert_eq!(second.co2_total, dec!(0.62928));

    assert!(report.render().contains("Total Order Lines: 2"));

    Ok(())
}

#[test]
fn test_missing_column_is_named() -> Result<()> {
    let dir = tempdir()?;
    write_inputs(dir.path())?;
    fs::write(
        dir.path().join(ORDER_LINES_FILE),
        ",Item Code,Warehouse Code,Customer Code\n\
         0,ITEM-1,WH-1,CUST-1\n",
    )?;

    let inputs = locate_inputs(dir.path())?;
    match load_order_line_data(&inputs) {
        Err(DataError::MissingColumn { column, .. }) => assert_eq!(column, "Units"),
        other => bail!("expected a missing column error, got {:?}", other),
    }

    Ok(())
}

#[test]
fn test_unknown_item_is_reported() -> Result<()> {
    let dir = tempdir()?;
    write_inputs(dir.path())?;
    fs::write(
        dir.path().join(UOM_CONVERSIONS_FILE),
        ",Item Code,Conversion Ratio\n\
         0,ITEM-1,2.5\n",
    )?;

    let inputs = locate_inputs(dir.path())?;
    match load_order_line_data(&inputs) {
        Err(DataError::UnknownItem(item)) => assert_eq!(item, "ITEM-2"),
        other => bail!("expected an unknown item error, got {:?}", other),
    }

    Ok(())
}

#[test]
fn test_unknown_route_is_reported() -> Result<()> {
    let dir = tempdir()?;
    write_inputs(dir.path())?;
    fs::write(
        dir.path().join(DISTANCES_FILE),
        ",Warehouse Code,Customer Code,Customer Country,Customer City,Road,Rail,Sea,Air\n\
         0,WH-1,CUST-1,France,Paris,120,0,0,0\n",
    )?;

    let inputs = locate_inputs(dir.path())?;
    match load_order_line_data(&inputs) {
        Err(DataError::UnknownRoute { warehouse, customer }) => {
            assert_eq!(warehouse, "WH-1");
            assert_eq!(customer, "CUST-2");
        },
        other => bail!("expected an unknown route error, got {:?}", other),
    }

    Ok(())
}

#[test]
fn test_sample_dataset_shape() -> Result<()> {
    let records = sample_shipments();

    assert_eq!(records.len(), 20);
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record.shipment_id, i as u32 + 1);
        let expected_origin = if i < 10 { "Warehouse_A" } else { "Warehouse_B" };
        assert_eq!(record.origin, expected_origin);
        assert_eq!(record.destination, format!("Customer_{}", i + 1));
        assert_eq!(record.co2_total, Decimal::ZERO);
    }

    let total_weight: Decimal = records.iter().map(|record| record.weight_kg).sum();
    assert_eq!(total_weight, dec!(30700));

    Ok(())
}

#[test]
fn test_sample_fallback_end_to_end() -> Result<()> {
    // No data directory anywhere in sight: the sample pipeline must still
    // produce the full 20-record report and export.
    let (records, report) = pipeline::run_sample(&FactorTable::default());

    assert_eq!(records.len(), 20);
    assert_eq!(records[0].co2_total, dec!(3.72)); // 0.5 t × 120 km × 0.062

    let text = report.render();
    assert!(text.contains("Total Shipments: 20"));

    let dir = tempdir()?;
    let output = dir.path().join("co2_emissions_report.csv");
    export_records(&output, &records)?;

    let mut reader = csv::Reader::from_path(&output)?;
    let headers = reader.headers()?.clone();
    assert!(headers.iter().any(|header| header == "co2_total"));
    assert_eq!(reader.records().count(), 20);

    Ok(())
}

#[test]
fn test_factor_table_loader() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("factors.csv");
    fs::write(&path, "mode,factor\nroad,0.096\nrail,0.028\nsea,0.01\nair,2.1\n")?;

    let factors = load_factor_table(&path)?;
    assert_eq!(factors.road(), dec!(0.096));
    assert_eq!(factors.air(), dec!(2.1));

    fs::write(&path, "mode,factor\nconveyor,0.5\n")?;
    match load_factor_table(&path) {
        Err(DataError::Factor(FactorError::UnknownMode(mode))) => assert_eq!(mode, "conveyor"),
        other => bail!("expected an unknown mode error, got {:?}", other),
    }

    Ok(())
}
