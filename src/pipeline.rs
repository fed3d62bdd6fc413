use crate::data::{self, DataError, InputFiles};
use crate::emissions::factors::FactorTable;
use crate::emissions::records::{compute_emissions, OrderLine, Shipment};
use crate::emissions::report::{full_report, summary_report, Report};

/// Real-data pipeline: join the four input tables, compute per-mode and
/// total emissions, build the summary report. Where the output goes is the
/// caller's business.
pub fn run_real(inputs: &InputFiles, factors: &FactorTable) -> Result<(Vec<OrderLine>, Report), DataError> {
    let mut records = data::load_order_line_data(inputs)?;
    compute_emissions(&mut records, factors);
    let report = summary_report("Order Lines", &records, factors);

    Ok((records, report))
}

/// Sample pipeline: synthetic shipments, full report.
pub fn run_sample(factors: &FactorTable) -> (Vec<Shipment>, Report) {
    let mut records = data::sample_shipments();
    compute_emissions(&mut records, factors);
    let report = full_report("Shipments", &records, factors);

    (records, report)
}
