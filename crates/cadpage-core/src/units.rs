//! Measurement text formatting driven by the drawing header's unit settings.

use crate::error::{ConvertError, Result};
use crate::model::Header;

const MAX_PRECISION: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawingUnits {
    English,
    Metric,
}

impl TryFrom<i16> for DrawingUnits {
    type Error = ConvertError;

    fn try_from(value: i16) -> Result<Self> {
        match value {
            0 => Ok(DrawingUnits::English),
            1 => Ok(DrawingUnits::Metric),
            _ => Err(ConvertError::InvalidUnitEnumeration {
                field: "drawing units",
                value,
            }),
        }
    }
}

/// Header linear unit format (`$LUNITS`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitFormat {
    Scientific,
    Decimal,
    Engineering,
    ArchitecturalStacked,
    FractionalStacked,
    Architectural,
    Fractional,
}

impl TryFrom<i16> for UnitFormat {
    type Error = ConvertError;

    fn try_from(value: i16) -> Result<Self> {
        Ok(match value {
            1 => UnitFormat::Scientific,
            2 => UnitFormat::Decimal,
            3 => UnitFormat::Engineering,
            4 => UnitFormat::ArchitecturalStacked,
            5 => UnitFormat::FractionalStacked,
            6 => UnitFormat::Architectural,
            7 => UnitFormat::Fractional,
            _ => {
                return Err(ConvertError::InvalidUnitEnumeration {
                    field: "unit format",
                    value,
                })
            }
        })
    }
}

/// The notation measurement text is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notation {
    Decimal,
    Architectural,
    Fractional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthFormat {
    pub notation: Notation,
    /// Decimal places, or the power of two used as fraction denominator.
    pub precision: u32,
}

impl LengthFormat {
    pub fn new(units: DrawingUnits, format: UnitFormat, precision: i16) -> Self {
        let notation = match (format, units) {
            (UnitFormat::Scientific | UnitFormat::Decimal | UnitFormat::Engineering, _) => {
                Notation::Decimal
            }
            (UnitFormat::Architectural | UnitFormat::ArchitecturalStacked, DrawingUnits::English) => {
                Notation::Architectural
            }
            (UnitFormat::Architectural | UnitFormat::ArchitecturalStacked, DrawingUnits::Metric)
            | (UnitFormat::Fractional | UnitFormat::FractionalStacked, _) => Notation::Fractional,
        };
        Self {
            notation,
            precision: precision.clamp(0, MAX_PRECISION as i16) as u32,
        }
    }

    pub fn from_header(header: &Header) -> Result<Self> {
        let units = DrawingUnits::try_from(header.drawing_units)?;
        let format = UnitFormat::try_from(header.unit_format)?;
        Ok(Self::new(units, format, header.unit_precision))
    }

    pub fn format(&self, length: f64) -> String {
        let length = length.abs();
        match self.notation {
            Notation::Decimal => format!("{:.*}", self.precision as usize, length),
            Notation::Fractional => {
                let den = 1i64 << self.precision;
                let Some(total) = whole_units(length, den) else {
                    return format!("{length:.0}");
                };
                fraction(total / den, total % den, den)
            }
            Notation::Architectural => {
                let den = 1i64 << self.precision;
                let Some(total) = whole_units(length, den) else {
                    return format!("{length:.0}");
                };
                let per_foot = 12 * den;
                let feet = total / per_foot;
                let inches = total % per_foot;
                format!(
                    "{feet}'-{}\"",
                    fraction(inches / den, inches % den, den)
                )
            }
        }
    }
}

/// Count of `1/den` steps in `length`, or `None` once that count is no longer
/// an exact integer in `f64`.
fn whole_units(length: f64, den: i64) -> Option<i64> {
    const EXACT_LIMIT: f64 = (1u64 << f64::MANTISSA_DIGITS) as f64;
    let scaled = (length * den as f64).round();
    (scaled.is_finite() && scaled < EXACT_LIMIT).then_some(scaled as i64)
}

/// `whole num/den` with the fraction reduced; parts that are zero are left out.
fn fraction(whole: i64, num: i64, den: i64) -> String {
    if num == 0 {
        return whole.to_string();
    }
    let g = gcd(num, den);
    let (num, den) = (num / g, den / g);
    if whole == 0 {
        format!("{num}/{den}")
    } else {
        format!("{whole} {num}/{den}")
    }
}

fn gcd(mut a: i64, mut b: i64) -> i64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a.abs().max(1)
}
