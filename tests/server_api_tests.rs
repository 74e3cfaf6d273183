use armory::model::Environment;
use armory::server::routes::route_request;

fn json(body: &str) -> serde_json::Value {
    serde_json::from_str(body).expect("response should be valid json")
}

#[test]
fn health_endpoint_returns_ok_json() {
    let response = route_request("GET", "/api/health", "", &Environment::default());
    assert_eq!(response.status_code, 200);
    assert_eq!(response.content_type, "application/json");
    assert!(response.body.contains("\"status\": \"ok\""));
}

#[test]
fn weapon_detail_lists_catalog() {
    let response = route_request("GET", "/api/weapons/minigun", "", &Environment::default());
    assert_eq!(response.status_code, 200);

    let payload = json(&response.body);
    assert_eq!(payload["kind"], "minigun");
    assert_eq!(payload["tiers"].as_array().map(Vec::len), Some(5));
    assert_eq!(payload["tiers"][1].as_array().map(Vec::len), Some(2));
    assert_eq!(payload["overclocks"].as_array().map(Vec::len), Some(7));
    assert_eq!(payload["overclocks"][0]["symbol"], "1");
    assert!(payload["overclocks"][0]["classification"].is_string());
    assert!(payload["tiers"][0][0].get("classification").is_none());
}

#[test]
fn unknown_weapon_is_not_found() {
    let response = route_request("GET", "/api/weapons/railgun", "", &Environment::default());
    assert_eq!(response.status_code, 404);
    assert_eq!(json(&response.body)["status"], "error");
}

#[test]
fn evaluate_returns_stats_and_metrics() {
    let body = r#"{"weapon":"autocannon","build":"A----3","status":{"frozen":true}}"#;
    let response = route_request("POST", "/api/evaluate", body, &Environment::default());
    assert_eq!(response.status_code, 200);

    let payload = json(&response.body);
    assert_eq!(payload["status"], "ok");
    assert_eq!(payload["combination"], "A----3");
    assert_eq!(payload["derived"]["direct_damage"], 11.0);
    assert_eq!(payload["stats"][0]["modified"], true);
    assert!(payload["metrics"]["ideal_sustained_dps"].as_f64().expect("number") > 0.0);
    assert_eq!(payload["deals_splash_damage"], true);
}

#[test]
fn frozen_status_raises_evaluated_dps() {
    let env = Environment::default();
    let dps = |body: &str| {
        let response = route_request("POST", "/api/evaluate", body, &env);
        json(&response.body)["metrics"]["ideal_burst_dps"]
            .as_f64()
            .expect("number")
    };
    let plain = dps(r#"{"weapon":"zhukov","build":"------"}"#);
    let frozen = dps(r#"{"weapon":"zhukov","build":"------","status":{"frozen":true}}"#);
    assert!(frozen > plain);
}

#[test]
fn invalid_build_returns_positional_diagnostics() {
    let body = r#"{"weapon":"zhukov","build":"C----9"}"#;
    let response = route_request("POST", "/api/validate", body, &Environment::default());
    assert_eq!(response.status_code, 400);

    let payload = json(&response.body);
    assert_eq!(payload["status"], "error");
    let positions: Vec<u64> = payload["diagnostics"]
        .as_array()
        .expect("diagnostics array")
        .iter()
        .map(|diag| diag["position"].as_u64().expect("position"))
        .collect();
    assert_eq!(positions, vec![0, 5]);
    assert!(payload["length"].is_null());
}

#[test]
fn evaluate_rejects_invalid_build() {
    let body = r#"{"weapon":"flamethrower","build":"ZZZ"}"#;
    let response = route_request("POST", "/api/evaluate", body, &Environment::default());
    assert_eq!(response.status_code, 400);
    let payload = json(&response.body);
    assert_eq!(payload["length"]["expected"], 6);
    assert_eq!(payload["length"]["found"], 3);
}

#[test]
fn valid_build_passes_validation() {
    let body = r#"{"weapon":"flamethrower","build":"BCA-B6"}"#;
    let response = route_request("POST", "/api/validate", body, &Environment::default());
    assert_eq!(response.status_code, 200);
    assert_eq!(json(&response.body)["valid"], true);
}

#[test]
fn malformed_body_is_bad_request() {
    let response = route_request("POST", "/api/evaluate", "{not json", &Environment::default());
    assert_eq!(response.status_code, 400);
    assert!(response.body.contains("Invalid request body"));
}

#[test]
fn unknown_route_is_not_found() {
    let response = route_request("DELETE", "/api/weapons", "", &Environment::default());
    assert_eq!(response.status_code, 404);
}
