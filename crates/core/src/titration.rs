//! Normality and strength of an analyte from burette readings.
//!
//! Uses the equivalence relation `N1 * V1 = N2 * V2`, where `N1`/`V1` belong
//! to the titrant delivered from the burette and `V2` is the pipetted volume
//! of analyte.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum TitrationError {
    #[error("at least one burette reading is required")]
    NoReadings,

    #[error("final reading {final_ml} ml is below initial reading {initial_ml} ml")]
    NegativeTitre { initial_ml: f64, final_ml: f64 },

    #[error("{field} must be a positive, finite number")]
    NonPositive { field: &'static str },
}

/// One rough or fine run recorded from the burette scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuretteReading {
    pub initial_ml: f64,
    pub final_ml: f64,
}

impl BuretteReading {
    #[must_use]
    pub fn new(initial_ml: f64, final_ml: f64) -> Self {
        Self {
            initial_ml,
            final_ml,
        }
    }

    /// Volume of titrant delivered in this run.
    ///
    /// # Errors
    ///
    /// Returns `TitrationError::NegativeTitre` if the final reading is below
    /// the initial one.
    pub fn titre_ml(&self) -> Result<f64, TitrationError> {
        let titre = self.final_ml - self.initial_ml;
        if !titre.is_finite() || titre < 0.0 {
            return Err(TitrationError::NegativeTitre {
                initial_ml: self.initial_ml,
                final_ml: self.final_ml,
            });
        }
        Ok(titre)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitrationResult {
    pub mean_titre_ml: f64,
    pub normality: f64,
    pub strength_g_per_l: f64,
}

impl TitrationResult {
    /// Compute analyte normality and strength from burette runs.
    ///
    /// # Errors
    ///
    /// Returns `TitrationError::NoReadings` for an empty run list,
    /// `TitrationError::NegativeTitre` for an inverted reading, and
    /// `TitrationError::NonPositive` for non-positive concentrations or volumes.
    pub fn compute(
        readings: &[BuretteReading],
        titrant_normality: f64,
        analyte_volume_ml: f64,
        equivalent_weight: f64,
    ) -> Result<Self, TitrationError> {
        ensure_positive("titrant normality", titrant_normality)?;
        ensure_positive("analyte volume", analyte_volume_ml)?;
        ensure_positive("equivalent weight", equivalent_weight)?;

        if readings.is_empty() {
            return Err(TitrationError::NoReadings);
        }

        let mut total = 0.0;
        for reading in readings {
            total += reading.titre_ml()?;
        }
        #[allow(clippy::cast_precision_loss)]
        let mean_titre_ml = total / readings.len() as f64;

        let normality = titrant_normality * mean_titre_ml / analyte_volume_ml;
        Ok(Self {
            mean_titre_ml,
            normality,
            strength_g_per_l: normality * equivalent_weight,
        })
    }
}

fn ensure_positive(field: &'static str, value: f64) -> Result<(), TitrationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TitrationError::NonPositive { field })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn oxalic_acid_against_sodium_hydroxide() {
        // 0.1 N NaOH, 10 ml oxalic acid pipetted, equivalent weight 63.
        let readings = [
            BuretteReading::new(0.0, 10.1),
            BuretteReading::new(10.1, 20.0),
            BuretteReading::new(20.0, 30.0),
        ];
        let result = TitrationResult::compute(&readings, 0.1, 10.0, 63.0).unwrap();

        assert!(approx(result.mean_titre_ml, 10.0));
        assert!(approx(result.normality, 0.1));
        assert!(approx(result.strength_g_per_l, 6.3));
    }

    #[test]
    fn rejects_inverted_reading() {
        let readings = [BuretteReading::new(12.0, 2.0)];
        let err = TitrationResult::compute(&readings, 0.1, 10.0, 63.0).unwrap_err();
        assert!(matches!(err, TitrationError::NegativeTitre { .. }));
    }

    #[test]
    fn rejects_empty_and_zero_inputs() {
        assert_eq!(
            TitrationResult::compute(&[], 0.1, 10.0, 63.0).unwrap_err(),
            TitrationError::NoReadings
        );
        let readings = [BuretteReading::new(0.0, 9.8)];
        assert_eq!(
            TitrationResult::compute(&readings, 0.1, 0.0, 63.0).unwrap_err(),
            TitrationError::NonPositive {
                field: "analyte volume"
            }
        );
        assert_eq!(
            TitrationResult::compute(&readings, f64::NAN, 10.0, 63.0).unwrap_err(),
            TitrationError::NonPositive {
                field: "titrant normality"
            }
        );
    }
}
