use thiserror::Error;

pub mod aggregate;
pub mod factors;
pub mod records;
pub mod report;


/// Errors raised while assembling an emission factor table from user input.
/// Unknown modes inside a factor file are configuration mistakes and fail
/// hard, unlike unknown modes in shipment data (see `records::emission_kg`).
#[derive(Debug, PartialEq, Error)]
pub enum FactorError {
    #[error("unknown transport mode '{0}' in factor table")]
    UnknownMode(String),
    #[error("factor table has no entry for mode '{0}'")]
    MissingMode(&'static str),
}
