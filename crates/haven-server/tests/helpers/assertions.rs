//! Custom assertions para tests.

use serde_json::Value;

/// Verifica que una respuesta JSON tenga la forma de un list envelope.
pub fn assert_list_envelope(json: &Value) {
    assert!(json.is_object(), "Response should be a JSON object");
    assert_eq!(json["success"], true, "success should be true");
    assert!(json["data"].is_array(), "'data' should be an array");
    assert!(
        json["appliedFilters"].is_object(),
        "'appliedFilters' should be an object"
    );

    let pagination = &json["pagination"];
    for field in [
        "currentPage",
        "totalPages",
        "totalCount",
        "limit",
        "hasNext",
        "hasPrev",
    ] {
        assert!(
            pagination.get(field).is_some(),
            "pagination missing '{}'",
            field
        );
    }
}

/// Verifica el body de error `{ success: false, error, message }`.
pub fn assert_error_body(json: &Value, error: &str) {
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], error);
    assert!(json["message"].is_string(), "'message' should be a string");
}

/// `fromCache` solo aparece en hits.
pub fn assert_from_cache(json: &Value, expected: bool) {
    if expected {
        assert_eq!(json["fromCache"], true, "expected a cache hit");
    } else {
        assert!(json.get("fromCache").is_none(), "expected a fresh response");
    }
}

/// Compara dos envelopes campo a campo, ignorando `fromCache`.
pub fn assert_same_envelope(a: &Value, b: &Value) {
    let strip = |v: &Value| {
        let mut v = v.clone();
        if let Some(obj) = v.as_object_mut() {
            obj.remove("fromCache");
        }
        v
    };
    assert_eq!(strip(a), strip(b));
}
