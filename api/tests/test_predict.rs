//! Integration test: prediction form and history

mod common;

use axum::http::StatusCode;
use common::{body_text, get, model, post_form, send, test_app};
use crop_yield_api::db::PredictionRepository;
use crop_yield_api::schema::NOT_A_NUMBER;

const VALID: &str = "luas_panen=4.5&bibit=112&pupuk_npk=675&pupuk_urea=450&obat_insectisida=2";

#[tokio::test]
async fn test_index_renders_form() {
    let (app, _) = test_app(false).await;

    let response = send(&app, get("/")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    for field in ["luas_panen", "bibit", "pupuk_npk", "pupuk_urea", "obat_insectisida"] {
        assert!(html.contains(&format!("name=\"{}\"", field)), "Missing field: {}", field);
    }
    assert!(!html.contains("id=\"prediction\""));
}

#[tokio::test]
async fn test_non_numeric_input_is_rejected_without_write() {
    let (app, pool) = test_app(false).await;

    let response = send(
        &app,
        post_form("/", "luas_panen=abc&bibit=112&pupuk_npk=675&pupuk_urea=lima&obat_insectisida=2"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains(NOT_A_NUMBER));
    assert!(html.contains("data-field=\"luas_panen\""));
    assert!(html.contains("data-field=\"pupuk_urea\""));
    assert!(!html.contains("data-field=\"bibit\""));
    assert!(html.contains("value=\"abc\""), "raw input should be echoed back");
    assert!(!html.contains("id=\"prediction\""));

    assert_eq!(PredictionRepository::count(&pool).await.unwrap(), 0);
}

#[tokio::test]
async fn test_missing_field_is_rejected() {
    let (app, pool) = test_app(false).await;

    let response = send(&app, post_form("/", "luas_panen=4.5&pupuk_npk=675&pupuk_urea=450&obat_insectisida=2")).await;
    let html = body_text(response).await;

    assert!(html.contains("data-field=\"bibit\""));
    assert_eq!(PredictionRepository::count(&pool).await.unwrap(), 0);
}

#[tokio::test]
async fn test_valid_input_stores_one_prediction() {
    let (app, pool) = test_app(false).await;

    let response = send(&app, post_form("/", VALID)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;

    let rows = PredictionRepository::list_all(&pool).await.unwrap();
    assert_eq!(rows.len(), 1);

    let row = &rows[0];
    assert_eq!(
        [row.luas_panen, row.bibit, row.pupuk_npk, row.pupuk_urea, row.obat_insectisida],
        [4.5, 112.0, 675.0, 450.0, 2.0]
    );

    let expected = model().predict(&[4.5, 112.0, 675.0, 450.0, 2.0]).unwrap();
    assert!(row.hasil_panen.is_finite());
    assert_eq!(row.hasil_panen, expected);
    assert!(html.contains(&format!("<strong id=\"prediction\">{:.2}</strong>", expected)));
}

#[tokio::test]
async fn test_prediction_tracks_harvested_area() {
    let (app, pool) = test_app(false).await;

    send(&app, post_form("/", "luas_panen=1&bibit=25&pupuk_npk=150&pupuk_urea=100&obat_insectisida=2")).await;
    send(&app, post_form("/", "luas_panen=9&bibit=225&pupuk_npk=1350&pupuk_urea=900&obat_insectisida=2")).await;

    let rows = PredictionRepository::list_all(&pool).await.unwrap();
    assert!(rows[0].hasil_panen < rows[1].hasil_panen);
}

#[tokio::test]
async fn test_history_lists_rows_in_insertion_order() {
    let (app, _) = test_app(false).await;

    for area in ["3", "1.5", "7"] {
        let body = format!("luas_panen={area}&bibit=100&pupuk_npk=500&pupuk_urea=300&obat_insectisida=2");
        send(&app, post_form("/", &body)).await;
    }

    let response = send(&app, get("/history")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;

    let first = html.find("<tr><td>1</td><td>3</td>").expect("first row");
    let second = html.find("<tr><td>2</td><td>1.5</td>").expect("second row");
    let third = html.find("<tr><td>3</td><td>7</td>").expect("third row");
    assert!(first < second && second < third);
}

#[tokio::test]
async fn test_history_empty() {
    let (app, _) = test_app(false).await;

    let html = body_text(send(&app, get("/history")).await).await;
    assert!(html.contains("Belum ada prediksi."));
}
