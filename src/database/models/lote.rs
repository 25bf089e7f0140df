use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A parcel listing. `smp` (seccion-manzana-parcela) is the primary lookup key.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Lote {
    pub smp: String,
    pub direccion: Option<String>,
    pub barrio: Option<String>,
    pub estado: Option<String>,
    pub origen: Option<String>,
    pub tipo: Option<String>,
    pub agente: Option<String>,
    pub area: Option<f64>,
    pub fecha_alta: Option<DateTime<Utc>>,
}

/// Frontage row for a parcel; a parcel on a corner has one row per street.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Frente {
    pub smp: String,
    pub calle: Option<String>,
    pub frente: Option<f64>,
}

/// Observed bounds of a continuous attribute, used to configure range-filter
/// controls. The minimum is floored and the maximum is ceiled so the range
/// never excludes an observed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangoNumerico {
    pub min: i64,
    pub max: i64,
}

impl RangoNumerico {
    pub fn from_observed(min: f64, max: f64) -> Self {
        Self {
            min: min.floor() as i64,
            max: max.ceil() as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_floors_min_and_ceils_max() {
        let rango = RangoNumerico::from_observed(12.7, 340.2);
        assert_eq!(rango.min, 12);
        assert_eq!(rango.max, 341);
    }

    #[test]
    fn integral_bounds_pass_through() {
        let rango = RangoNumerico::from_observed(10.0, 200.0);
        assert_eq!(rango.min, 10);
        assert_eq!(rango.max, 200);
    }

    #[test]
    fn min_never_exceeds_max() {
        let rango = RangoNumerico::from_observed(4.2, 4.2);
        assert!(rango.min <= rango.max);
        assert_eq!(rango.min, 4);
        assert_eq!(rango.max, 5);
    }
}
