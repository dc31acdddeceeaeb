//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results or error kinds. Comparing parsed JSON (not raw
//! strings) avoids false negatives from field-ordering differences.

use objects_core::{ApiError, HttpMethod, HttpRequest, HttpResponse, ObjectClient, Record};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000";

fn client() -> ObjectClient {
    ObjectClient::new(BASE_URL)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn load(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

fn simulated_response(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse::new(
        sim["status"].as_u64().unwrap() as u16,
        sim["body"].as_str().unwrap(),
    )
}

/// Check method, path, and (when the vector has them) headers and body.
fn assert_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.path, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: path");

    match expected.get("headers") {
        Some(headers) => {
            let expected_headers: Vec<(String, String)> = headers
                .as_array()
                .unwrap()
                .iter()
                .map(|h| {
                    let arr = h.as_array().unwrap();
                    (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
                })
                .collect();
            assert_eq!(req.headers, expected_headers, "{name}: headers");
        }
        None => assert!(req.headers.is_empty(), "{name}: headers should be empty"),
    }

    match expected.get("body") {
        Some(body) => {
            let req_body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&req_body, body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

fn assert_error_kind(name: &str, err: &ApiError, expected: &str) {
    let matched = match expected {
        "NotFound" => matches!(err, ApiError::NotFound),
        "RequestFailed" => matches!(err, ApiError::RequestFailed { .. }),
        "MalformedResponse" => matches!(err, ApiError::MalformedResponse(_)),
        other => panic!("{name}: unknown expected_error: {other}"),
    };
    assert!(matched, "{name}: expected {expected}, got {err:?}");
}

/// Compare a parse result against `expected_result` or `expected_error`.
fn assert_outcome<T>(name: &str, case: &Value, result: Result<T, ApiError>)
where
    T: PartialEq + std::fmt::Debug + serde::de::DeserializeOwned,
{
    if let Some(expected_error) = case.get("expected_error") {
        let err = result.unwrap_err();
        assert_error_kind(name, &err, expected_error.as_str().unwrap());
    } else {
        let expected: T = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(result.unwrap(), expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[test]
fn list_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/list.json")) {
        let name = case["name"].as_str().unwrap();
        assert_request(name, &c.build_list_all(), &case["expected_request"]);
        let result = c.parse_list_all(simulated_response(&case));
        assert_outcome::<Vec<Record>>(name, &case, result);
    }
}

// ---------------------------------------------------------------------------
// Get
// ---------------------------------------------------------------------------

#[test]
fn get_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/get.json")) {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_str().unwrap();
        assert_request(name, &c.build_get_by_id(id), &case["expected_request"]);
        let result = c.parse_get_by_id(simulated_response(&case));
        assert_outcome::<Record>(name, &case, result);
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[test]
fn create_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/create.json")) {
        let name = case["name"].as_str().unwrap();
        let input: Record = serde_json::from_value(case["input"].clone()).unwrap();
        assert_request(name, &c.build_create(&input), &case["expected_request"]);
        let result = c.parse_create(simulated_response(&case));
        assert_outcome::<Record>(name, &case, result);
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[test]
fn update_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/update.json")) {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_str().unwrap();
        let input: Record = serde_json::from_value(case["input"].clone()).unwrap();
        assert_request(name, &c.build_update(id, &input), &case["expected_request"]);
        let result = c.parse_update(simulated_response(&case));
        assert_outcome::<Record>(name, &case, result);
    }
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn delete_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/delete.json")) {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_str().unwrap();
        assert_request(name, &c.build_delete(id), &case["expected_request"]);
        let result = c.parse_delete(simulated_response(&case));

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            assert_error_kind(name, &err, expected_error.as_str().unwrap());
        } else {
            assert!(result.is_ok(), "{name}: expected success");
        }
    }
}
