//! Family indicator types for stunting risk prediction.
//!
//! Based on the BKKBN family-at-risk survey indicators (Pendataan Keluarga).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::StuntguardError;

/// Number of input features expected by the model.
pub const FEATURE_COUNT: usize = 11;

/// Indicator names in model input order.
///
/// The order is load-bearing: it must match the column order used when the
/// model was trained and its scaler fitted. Permuting it silently changes
/// the prediction.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "baduta",
    "balita",
    "pus",
    "pus_hamil",
    "sumber_air_layak_tidak",
    "jamban_layak_tidak",
    "terlalu_muda",
    "terlalu_tua",
    "terlalu_dekat",
    "terlalu_banyak",
    "bukan_peserta_kb_modern",
];

/// Human-readable risk factor labels, aligned with [`FEATURE_NAMES`].
const FACTOR_LABELS: [&str; FEATURE_COUNT] = [
    "Ada anak usia 0-24 bulan",
    "Ada anak usia 0-59 bulan",
    "Pasangan usia subur",
    "Pasangan usia subur sedang hamil",
    "Air minum tidak layak",
    "Jamban tidak layak",
    "Ibu hamil di usia < 20 tahun",
    "Ibu hamil di usia > 35 tahun",
    "Jarak kelahiran < 2 tahun",
    "Jumlah anak lebih dari 4",
    "Tidak menggunakan KB modern",
];

/// Household risk indicators for one family.
///
/// Each field is a yes/no survey answer. Field order matches the model's
/// feature vector order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyIndicators {
    /// Has a child aged 0-24 months (baduta)
    pub baduta: bool,

    /// Has a child aged 0-59 months (balita)
    pub balita: bool,

    /// Is a fertile-age couple (PUS)
    pub pus: bool,

    /// Fertile-age couple, currently pregnant
    pub pus_hamil: bool,

    /// Drinking water source is not adequate
    pub sumber_air_layak_tidak: bool,

    /// Sanitation (toilet) is not adequate
    pub jamban_layak_tidak: bool,

    /// Mother pregnant at age < 20 years
    pub terlalu_muda: bool,

    /// Mother pregnant at age > 35 years
    pub terlalu_tua: bool,

    /// Birth spacing < 2 years
    pub terlalu_dekat: bool,

    /// More than 4 children
    pub terlalu_banyak: bool,

    /// Not using modern contraception
    pub bukan_peserta_kb_modern: bool,
}

impl FamilyIndicators {
    /// Build indicators from a name -> bool map.
    ///
    /// All 11 names from [`FEATURE_NAMES`] must be present; unknown keys are
    /// ignored.
    ///
    /// # Errors
    /// Returns `StuntguardError::MissingFeature` naming the first absent key.
    pub fn from_map(map: &HashMap<String, bool>) -> crate::Result<Self> {
        let get = |name: &str| -> crate::Result<bool> {
            map.get(name)
                .copied()
                .ok_or_else(|| StuntguardError::MissingFeature(name.to_string()))
        };

        Ok(Self {
            baduta: get("baduta")?,
            balita: get("balita")?,
            pus: get("pus")?,
            pus_hamil: get("pus_hamil")?,
            sumber_air_layak_tidak: get("sumber_air_layak_tidak")?,
            jamban_layak_tidak: get("jamban_layak_tidak")?,
            terlalu_muda: get("terlalu_muda")?,
            terlalu_tua: get("terlalu_tua")?,
            terlalu_dekat: get("terlalu_dekat")?,
            terlalu_banyak: get("terlalu_banyak")?,
            bukan_peserta_kb_modern: get("bukan_peserta_kb_modern")?,
        })
    }

    /// Indicator values as flags in feature order.
    #[must_use]
    pub fn as_flags(&self) -> [bool; FEATURE_COUNT] {
        [
            self.baduta,
            self.balita,
            self.pus,
            self.pus_hamil,
            self.sumber_air_layak_tidak,
            self.jamban_layak_tidak,
            self.terlalu_muda,
            self.terlalu_tua,
            self.terlalu_dekat,
            self.terlalu_banyak,
            self.bukan_peserta_kb_modern,
        ]
    }

    /// Convert indicators to the model input vector.
    ///
    /// Each element is exactly 0.0 or 1.0, in [`FEATURE_NAMES`] order.
    #[must_use]
    pub fn to_vector(&self) -> Vec<f64> {
        self.as_flags()
            .iter()
            .map(|&set| if set { 1.0 } else { 0.0 })
            .collect()
    }

    /// Human-readable labels of all indicators that are set, in feature
    /// vector position order.
    ///
    /// Empty when no indicator is set; callers display a "no risk factors
    /// identified" message in that case.
    #[must_use]
    pub fn contributing_factors(&self) -> Vec<String> {
        self.as_flags()
            .iter()
            .zip(FACTOR_LABELS)
            .filter(|(&set, _)| set)
            .map(|(_, label)| label.to_string())
            .collect()
    }
}
