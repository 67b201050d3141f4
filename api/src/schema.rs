use ::serde::{Deserialize, Serialize};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::ml::{FeatureVector, FEATURE_COLUMNS};

pub const NOT_A_NUMBER: &str = "Masukkan harus berupa angka.";
pub const FORM_REQUIRED: &str = "Formulir harus diisi";
pub const NOT_ALPHANUMERIC: &str = "Username dan password harus berupa huruf dan angka";
pub const ACCOUNT_EXISTS: &str = "Akun Sudah Ada";
pub const REGISTERED: &str = "Registrasi Berhasil, Silahkan Login";
pub const LOGIN_FAILED: &str = "Username dan Password salah";

static ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]+$").expect("static regex"));

/// Field name to error message, ordered by field name
pub type FieldErrors = BTreeMap<&'static str, &'static str>;

/// Raw prediction form exactly as submitted. Missing fields stay `None`.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct PredictionForm {
    pub luas_panen: Option<String>,
    pub bibit: Option<String>,
    pub pupuk_npk: Option<String>,
    pub pupuk_urea: Option<String>,
    pub obat_insectisida: Option<String>,
}

/// Validated inputs, one per feature column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HarvestInput {
    pub luas_panen: f64,
    pub bibit: f64,
    pub pupuk_npk: f64,
    pub pupuk_urea: f64,
    pub obat_insectisida: f64,
}

impl HarvestInput {
    pub fn features(&self) -> FeatureVector {
        [
            self.luas_panen,
            self.bibit,
            self.pupuk_npk,
            self.pupuk_urea,
            self.obat_insectisida,
        ]
    }
}

impl PredictionForm {
    /// The submitted string for a field, or `""` when absent.
    pub fn value(&self, field: &str) -> &str {
        let raw = match field {
            "luas_panen" => &self.luas_panen,
            "bibit" => &self.bibit,
            "pupuk_npk" => &self.pupuk_npk,
            "pupuk_urea" => &self.pupuk_urea,
            "obat_insectisida" => &self.obat_insectisida,
            _ => return "",
        };
        raw.as_deref().unwrap_or("")
    }

    /// Parse all five fields. Any failure rejects the whole form, with one
    /// message per offending field.
    pub fn validate(&self) -> Result<HarvestInput, FieldErrors> {
        let mut errors = FieldErrors::new();
        let mut values = [0.0; FEATURE_COLUMNS.len()];

        for (slot, field) in values.iter_mut().zip(FEATURE_COLUMNS) {
            match parse_number(self.value(field)) {
                Some(v) => *slot = v,
                None => {
                    errors.insert(field, NOT_A_NUMBER);
                }
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let [luas_panen, bibit, pupuk_npk, pupuk_urea, obat_insectisida] = values;
        Ok(HarvestInput {
            luas_panen,
            bibit,
            pupuk_npk,
            pupuk_urea,
            obat_insectisida,
        })
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct CredentialsForm {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl CredentialsForm {
    /// Both fields, if both were submitted (possibly empty)
    pub fn pair(&self) -> Option<(&str, &str)> {
        Some((self.username.as_deref()?, self.password.as_deref()?))
    }

    /// Format rules for a new account. The duplicate-username lookup runs
    /// before these.
    pub fn validate_registration(&self) -> Result<(&str, &str), &'static str> {
        let (username, password) = match self.pair() {
            Some((u, p)) if !u.is_empty() && !p.is_empty() => (u, p),
            _ => return Err(FORM_REQUIRED),
        };

        if !ALPHANUMERIC.is_match(username) || !ALPHANUMERIC.is_match(password) {
            return Err(NOT_ALPHANUMERIC);
        }

        Ok((username, password))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(values: [&str; 5]) -> PredictionForm {
        let [a, b, c, d, e] = values.map(|v| Some(v.to_string()));
        PredictionForm {
            luas_panen: a,
            bibit: b,
            pupuk_npk: c,
            pupuk_urea: d,
            obat_insectisida: e,
        }
    }

    fn credentials(username: &str, password: &str) -> CredentialsForm {
        CredentialsForm {
            username: Some(username.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[test]
    fn test_valid_form() {
        let input = form(["1.5", "20", " 100 ", "5e1", "-2"]).validate().unwrap();
        assert_eq!(input.features(), [1.5, 20.0, 100.0, 50.0, -2.0]);
    }

    #[test]
    fn test_each_bad_field_is_reported() {
        let errors = form(["abc", "20", "", "50", "1,5"]).validate().unwrap_err();

        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get("luas_panen"), Some(&NOT_A_NUMBER));
        assert_eq!(errors.get("pupuk_npk"), Some(&NOT_A_NUMBER));
        assert_eq!(errors.get("obat_insectisida"), Some(&NOT_A_NUMBER));
        assert!(!errors.contains_key("bibit"));
    }

    #[test]
    fn test_missing_and_non_finite_fields() {
        let mut f = form(["1", "2", "3", "4", "5"]);
        f.bibit = None;
        f.pupuk_urea = Some("inf".to_string());
        f.luas_panen = Some("NaN".to_string());

        let errors = f.validate().unwrap_err();
        assert_eq!(
            errors.keys().copied().collect::<Vec<_>>(),
            vec!["bibit", "luas_panen", "pupuk_urea"]
        );
    }

    #[test]
    fn test_value_echoes_raw_input() {
        let f = form(["  7 ", "x", "3", "4", "5"]);
        assert_eq!(f.value("luas_panen"), "  7 ");
        assert_eq!(f.value("bibit"), "x");
        assert_eq!(PredictionForm::default().value("bibit"), "");
        assert_eq!(f.value("unknown"), "");
    }

    #[test]
    fn test_registration_rules() {
        assert_eq!(credentials("budi", "rahasia123").validate_registration(), Ok(("budi", "rahasia123")));
        assert_eq!(credentials("", "x").validate_registration(), Err(FORM_REQUIRED));
        assert_eq!(CredentialsForm::default().validate_registration(), Err(FORM_REQUIRED));
        assert_eq!(credentials("budi!", "x1").validate_registration(), Err(NOT_ALPHANUMERIC));
        assert_eq!(credentials("budi", "pass word").validate_registration(), Err(NOT_ALPHANUMERIC));
        // the whole string must match, not just a leading run
        assert_eq!(credentials("abc-def", "x1").validate_registration(), Err(NOT_ALPHANUMERIC));
    }
}
