use lab_core::titration::{BuretteReading, TitrationResult};

use crate::state::ViewError;

/// Raw values entered on the results sheet.
#[derive(Clone, Debug, PartialEq)]
pub struct TitrationInputVm {
    pub readings: Vec<BuretteReading>,
    pub titrant_normality: f64,
    pub analyte_volume_ml: f64,
    pub equivalent_weight: f64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TitrationResultVm {
    pub mean_titre_label: String,
    pub normality_label: String,
    pub strength_label: String,
}

#[must_use]
pub fn map_titration_result(result: &TitrationResult) -> TitrationResultVm {
    TitrationResultVm {
        mean_titre_label: format!("{:.2} ml", result.mean_titre_ml),
        normality_label: format!("{:.4} N", result.normality),
        strength_label: format!("{:.2} g/L", result.strength_g_per_l),
    }
}

/// # Errors
///
/// Returns `ViewError::InvalidInput` when the readings or constants are unusable.
pub fn compute_titration(input: &TitrationInputVm) -> Result<TitrationResultVm, ViewError> {
    let result = TitrationResult::compute(
        &input.readings,
        input.titrant_normality,
        input.analyte_volume_ml,
        input.equivalent_weight,
    )
    .map_err(|_| ViewError::InvalidInput)?;
    Ok(map_titration_result(&result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_result_labels() {
        let input = TitrationInputVm {
            readings: vec![BuretteReading::new(0.0, 9.8), BuretteReading::new(9.8, 19.6)],
            titrant_normality: 0.1,
            analyte_volume_ml: 10.0,
            equivalent_weight: 63.0,
        };
        let vm = compute_titration(&input).unwrap();

        assert_eq!(vm.mean_titre_label, "9.80 ml");
        assert_eq!(vm.normality_label, "0.0980 N");
        assert_eq!(vm.strength_label, "6.17 g/L");
    }

    #[test]
    fn invalid_input_is_reported() {
        let input = TitrationInputVm {
            readings: Vec::new(),
            titrant_normality: 0.1,
            analyte_volume_ml: 10.0,
            equivalent_weight: 63.0,
        };
        assert_eq!(compute_titration(&input), Err(ViewError::InvalidInput));
    }
}
