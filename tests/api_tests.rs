/// Integration tests for the HTTP surface
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use power_bill::{
    catalog::{CatalogService, RefreshPolicy},
    config::CorsConfig,
    handlers::AppState,
    server::create_router,
};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

fn write_dataset(path: &Path) {
    let doc = json!({
        "tariff_profiles": [
            {
                "tariff_id": "iber-estable",
                "company": "Iberdrola",
                "profile": "Plan Estable",
                "power_price_daily_p1": 0.108192,
                "energy_prices": {"punta": 0.1599}
            },
            {
                "tariff_id": "endesa-one",
                "company": "Endesa",
                "profile": "One Luz 3 Periodos"
            }
        ],
        "general_costs": {
            "electricity_tax_rate": 5.11269632,
            "vat_rate": 21,
            "meter_rental_daily": 0.02663
        }
    });
    std::fs::write(path, doc.to_string()).unwrap();
}

fn app_for(dataset: &Path, require_on_calculate: bool) -> Router {
    let state = AppState {
        catalog: Arc::new(CatalogService::new(dataset, RefreshPolicy::PerRequest)),
        require_catalog_on_calculate: require_on_calculate,
    };
    create_router(state, &CorsConfig::default(), None)
}

fn app_with_dataset() -> (TempDir, Router) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tariffs.json");
    write_dataset(&path);
    let app = app_for(&path, true);
    (dir, app)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_calculate(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/calculate")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn assert_close(actual: &Value, expected: f64) {
    let actual = actual.as_f64().unwrap();
    assert!(
        (actual - expected).abs() < 1e-4,
        "expected {} to be close to {}",
        actual,
        expected
    );
}

#[tokio::test]
async fn test_calculate_worked_example() {
    let (_dir, app) = app_with_dataset();
    let body = json!({
        "billingDays": 30,
        "contractedPowerP1": 3.45,
        "powerPriceDailyP1": 0.11,
        "consumptionPunta": 150,
        "pricePunta": 0.20,
        "electricityTaxRate": 5.11,
        "vatRate": 21
    });

    let (status, result) = send(app, post_calculate(&body.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_close(&result["powerTermP1"], 11.385);
    assert_close(&result["costPunta"], 30.0);
    assert_close(&result["fixedCharges"], 11.385);
    assert_close(&result["energyTerm"], 30.0);
    assert_close(&result["baseImponible"], 41.385);
    assert_close(&result["electricityTax"], 2.1147735);
    assert_close(&result["subtotalTaxBase"], 43.4997735);
    assert_close(&result["vat"], 9.134952435);
    assert_close(&result["totalBill"], 52.634725935);
    assert_eq!(result["billingDays"], json!(30.0));
    assert_eq!(result["totalConsumption"], json!(150.0));
}

#[tokio::test]
async fn test_calculate_response_has_every_field() {
    let (_dir, app) = app_with_dataset();
    let (status, result) = send(app, post_calculate("{}")).await;

    assert_eq!(status, StatusCode::OK);
    let object = result.as_object().unwrap();
    for key in [
        "totalBill",
        "billingDays",
        "totalConsumption",
        "powerTermP1",
        "powerTermP2",
        "powerTerm",
        "meterRentalTerm",
        "proratedFixedFee",
        "fixedCharges",
        "costPunta",
        "costLlano",
        "costValle",
        "energyTerm",
        "socialBonoFinancingCost",
        "socialBonoDiscount",
        "baseImponible",
        "electricityTax",
        "subtotalTaxBase",
        "vat",
    ] {
        assert!(object.contains_key(key), "missing {}", key);
    }
    assert_eq!(object.len(), 19);
    assert_eq!(result["billingDays"], json!(30.0));
    assert_eq!(result["totalBill"], json!(0.0));
}

#[tokio::test]
async fn test_calculate_rejects_non_numeric_field() {
    let (_dir, app) = app_with_dataset();
    let (status, body) = send(app, post_calculate(r#"{"pricePunta": "abc"}"#)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["type"], "invalid_input");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("pricePunta"));
}

#[tokio::test]
async fn test_calculate_rejects_non_finite_values() {
    for body in [
        r#"{"consumptionPunta": "inf", "pricePunta": 1}"#,
        r#"{"consumptionPunta": 1e200, "pricePunta": 1e200}"#,
    ] {
        let (_dir, app) = app_with_dataset();
        let (status, result) = send(app, post_calculate(body)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{}", body);
        assert_eq!(result["error"]["type"], "invalid_input", "{}", body);
    }
}

#[tokio::test]
async fn test_calculate_reads_booleans_as_numbers() {
    let (_dir, app) = app_with_dataset();
    let (status, result) =
        send(app, post_calculate(r#"{"consumptionPunta": true, "pricePunta": 2}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["costPunta"], json!(2.0));
}

#[tokio::test]
async fn test_calculate_rejects_malformed_json() {
    let (_dir, app) = app_with_dataset();
    let (status, body) = send(app, post_calculate("{\"billingDays\": 30,")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["type"], "invalid_input");
}

#[tokio::test]
async fn test_calculate_fails_when_dataset_required_but_missing() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_for(&dir.path().join("missing.json"), true);

    let (status, body) = send(app, post_calculate("{}")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["type"], "dataset_unavailable");
}

#[tokio::test]
async fn test_calculate_ignores_dataset_when_not_required() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_for(&dir.path().join("missing.json"), false);

    let (status, body) = send(app, post_calculate(r#"{"consumptionValle": 10}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalConsumption"], json!(10.0));
}

#[tokio::test]
async fn test_get_tariff_returns_full_record() {
    let (_dir, app) = app_with_dataset();
    let (status, body) = send(app, get("/tariffs/iber-estable")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["description"], "Iberdrola - Plan Estable");
    assert_eq!(
        body["details"],
        json!({
            "tariff_id": "iber-estable",
            "company": "Iberdrola",
            "profile": "Plan Estable",
            "power_price_daily_p1": 0.108192,
            "energy_prices": {"punta": 0.1599}
        })
    );
}

#[tokio::test]
async fn test_get_unknown_tariff_is_not_found() {
    let (_dir, app) = app_with_dataset();
    let (status, body) = send(app, get("/tariffs/does-not-exist")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["type"], "tariff_not_found");
}

#[tokio::test]
async fn test_list_tariffs() {
    let (_dir, app) = app_with_dataset();
    let (status, body) = send(app, get("/tariffs")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"id": "iber-estable", "company": "Iberdrola", "name": "Plan Estable"},
            {"id": "endesa-one", "company": "Endesa", "name": "One Luz 3 Periodos"}
        ])
    );
}

#[tokio::test]
async fn test_general_costs_verbatim() {
    let (_dir, app) = app_with_dataset();
    let (status, body) = send(app, get("/general-costs")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "electricity_tax_rate": 5.11269632,
            "vat_rate": 21,
            "meter_rental_daily": 0.02663
        })
    );
}

#[tokio::test]
async fn test_catalog_endpoints_fail_on_invalid_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tariffs.json");
    std::fs::write(&path, "{ \"tariff_profiles\": [").unwrap();

    for uri in ["/tariffs", "/tariffs/iber-estable", "/general-costs"] {
        let (status, body) = send(app_for(&path, true), get(uri)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{}", uri);
        assert_eq!(body["error"]["type"], "dataset_unavailable", "{}", uri);
    }
}

#[tokio::test]
async fn test_catalog_endpoints_fail_after_dataset_removed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tariffs.json");
    write_dataset(&path);

    let (status, _) = send(app_for(&path, true), get("/tariffs")).await;
    assert_eq!(status, StatusCode::OK);

    std::fs::remove_file(&path).unwrap();
    let (status, _) = send(app_for(&path, true), get("/tariffs")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_health_and_readiness() {
    let (_dir, app) = app_with_dataset();
    let (status, body) = send(app.clone(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(app, get("/ready")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tariffs"], 2);
}

#[tokio::test]
async fn test_cors_preflight_allows_any_origin() {
    let (_dir, app) = app_with_dataset();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/calculate")
        .header("origin", "https://frontend.example")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
}
