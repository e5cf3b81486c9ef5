use crate::ipc::error::{err, ok, store_err};
use crate::ipc::types::{AppState, Request};
use crate::model::StudentSummary;
use serde_json::json;

fn handle_student_summary(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(records) = state.records.as_mut() else {
        return ok(&req.id, json!(StudentSummary::empty()));
    };

    match records.get_student_summary() {
        Ok(summary) => ok(&req.id, json!(summary)),
        Err(e) => store_err(&req.id, &e),
    }
}

fn handle_student_reset(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(records) = state.records.as_mut() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };

    if let Err(e) = records.reset_all() {
        return store_err(&req.id, &e);
    }
    match records.get_student_summary() {
        Ok(summary) => ok(&req.id, json!({ "summary": summary })),
        Err(e) => store_err(&req.id, &e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "student.summary" => Some(handle_student_summary(state, req)),
        "student.reset" => Some(handle_student_reset(state, req)),
        _ => None,
    }
}
