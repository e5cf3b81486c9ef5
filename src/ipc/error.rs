use crate::store::StoreError;
use serde_json::json;

pub fn ok(id: &str, result: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "ok": true,
        "result": result
    })
}

pub fn err(
    id: &str,
    code: &str,
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) -> serde_json::Value {
    let mut error = json!({
        "code": code,
        "message": message.into(),
    });
    if let Some(d) = details {
        error["details"] = d;
    }
    json!({
        "id": id,
        "ok": false,
        "error": error,
    })
}

pub fn store_err(id: &str, e: &StoreError) -> serde_json::Value {
    let details = match e {
        StoreError::DuplicateSemester { part, term } | StoreError::NotFound { part, term } => {
            Some(json!({ "part": part, "semester": term }))
        }
        StoreError::Backend(_) => None,
    };
    if let StoreError::Backend(inner) = e {
        tracing::error!(error = ?inner, "store operation failed");
    }
    err(id, e.code(), format!("{e:#}"), details)
}
