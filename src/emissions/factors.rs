use getset::CopyGetters;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::FactorError;

/// Transport modes with a known emission factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Road,
    Rail,
    Sea,
    Air,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Road, Mode::Rail, Mode::Sea, Mode::Air];

    /// Case-insensitive lookup from a mode name. Surrounding whitespace is
    /// ignored.
    pub fn parse(name: &str) -> Option<Mode> {
        match name.trim().to_ascii_lowercase().as_str() {
            "road" => Some(Mode::Road),
            "rail" => Some(Mode::Rail),
            "sea" => Some(Mode::Sea),
            "air" => Some(Mode::Air),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Road => "Road",
            Mode::Rail => "Rail",
            Mode::Sea => "Sea",
            Mode::Air => "Air",
        }
    }
}

/// Emission factors in kg CO2 per ton·km, one per mode.
///
/// The table is built once at startup and passed into every calculation;
/// published factor sets vary, so runs that need different constants supply
/// their own table instead of editing code.
#[derive(Debug, Clone, PartialEq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct FactorTable {
    road: Decimal,
    rail: Decimal,
    sea: Decimal,
    air: Decimal,
}

impl FactorTable {
    pub fn new(road: Decimal, rail: Decimal, sea: Decimal, air: Decimal) -> FactorTable {
        FactorTable { road, rail, sea, air }
    }

    /// Builds a table from `(mode name, factor)` entries. All four modes must
    /// be covered; later entries for the same mode win.
    pub fn from_entries<I>(entries: I) -> Result<FactorTable, FactorError>
    where
        I: IntoIterator<Item = (String, Decimal)>,
    {
        let mut road = None;
        let mut rail = None;
        let mut sea = None;
        let mut air = None;

        for (name, factor) in entries {
            match Mode::parse(&name) {
                Some(Mode::Road) => road = Some(factor),
                Some(Mode::Rail) => rail = Some(factor),
                Some(Mode::Sea) => sea = Some(factor),
                Some(Mode::Air) => air = Some(factor),
                None => return Err(FactorError::UnknownMode(name)),
            }
        }

        Ok(FactorTable {
            road: road.ok_or(FactorError::MissingMode(Mode::Road.name()))?,
            rail: rail.ok_or(FactorError::MissingMode(Mode::Rail.name()))?,
            sea: sea.ok_or(FactorError::MissingMode(Mode::Sea.name()))?,
            air: air.ok_or(FactorError::MissingMode(Mode::Air.name()))?,
        })
    }

    pub fn factor(&self, mode: Mode) -> Decimal {
        match mode {
            Mode::Road => self.road,
            Mode::Rail => self.rail,
            Mode::Sea => self.sea,
            Mode::Air => self.air,
        }
    }
}

impl Default for FactorTable {
    fn default() -> FactorTable {
        FactorTable {
            road: dec!(0.062),
            rail: dec!(0.022),
            sea: dec!(0.016),
            air: dec!(0.602),
        }
    }
}
