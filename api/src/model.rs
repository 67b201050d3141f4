use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Deserialize, FromRow, Serialize)]
pub struct PredictionRecord {
    pub id: i64,
    pub luas_panen: f64,
    pub bibit: f64,
    pub pupuk_npk: f64,
    pub pupuk_urea: f64,
    pub obat_insectisida: f64,
    pub hasil_panen: f64, // predicted, not measured
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize, FromRow, Serialize)]
pub struct UserAccount {
    pub id: i64,
    pub username: String,
    pub password: String,
}
