use crate::ipc::error::{err, ok, store_err};
use crate::ipc::helpers::{parse_grade_rows, parse_part, parse_term, ParamError};
use crate::ipc::types::{AppState, Request};
use crate::model::{Grade, Semester, Term};
use crate::policy::Honours;
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeView {
    pub course: String,
    pub unit: f64,
    pub score: f64,
    pub points: u8,
    pub weighted_total: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SemesterView {
    pub part: String,
    pub semester: Term,
    pub gpa: f64,
    pub honours: Honours,
    pub total_units: f64,
    pub grades: Vec<GradeView>,
}

impl From<&Grade> for GradeView {
    fn from(g: &Grade) -> Self {
        Self {
            course: g.course().to_string(),
            unit: g.unit(),
            score: g.score(),
            points: g.points(),
            weighted_total: g.weighted_total(),
        }
    }
}

impl From<&Semester> for SemesterView {
    fn from(s: &Semester) -> Self {
        Self {
            part: s.part().to_string(),
            semester: s.term(),
            gpa: s.gpa(),
            honours: s.honours(),
            total_units: s.total_units(),
            grades: s.grades().iter().map(GradeView::from).collect(),
        }
    }
}

fn bad_params(req: &Request, e: ParamError) -> serde_json::Value {
    err(&req.id, "bad_params", e.message, e.details)
}

fn handle_semesters_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(records) = state.records.as_ref() else {
        return ok(&req.id, json!({ "semesters": [] }));
    };

    match records.get_all_semesters() {
        Ok(semesters) => {
            let views: Vec<SemesterView> = semesters.iter().map(SemesterView::from).collect();
            ok(&req.id, json!({ "semesters": views }))
        }
        Err(e) => store_err(&req.id, &e),
    }
}

fn handle_semesters_submit(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(records) = state.records.as_mut() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };

    let part = match parse_part(&req.params) {
        Ok(v) => v,
        Err(e) => return bad_params(req, e),
    };
    let term = match parse_term(&req.params) {
        Ok(v) => v,
        Err(e) => return bad_params(req, e),
    };
    let rows = match parse_grade_rows(&req.params) {
        Ok(v) => v,
        Err(e) => return bad_params(req, e),
    };

    let semester = match records.submit_semester(&part, term, &rows) {
        Ok(s) => s,
        Err(e) => return store_err(&req.id, &e),
    };
    match records.get_student_summary() {
        Ok(summary) => ok(
            &req.id,
            json!({
                "semester": SemesterView::from(&semester),
                "summary": summary,
            }),
        ),
        Err(e) => store_err(&req.id, &e),
    }
}

fn handle_semesters_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(records) = state.records.as_mut() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };

    let part = match parse_part(&req.params) {
        Ok(v) => v,
        Err(e) => return bad_params(req, e),
    };
    let term = match parse_term(&req.params) {
        Ok(v) => v,
        Err(e) => return bad_params(req, e),
    };

    if let Err(e) = records.remove_semester(&part, term) {
        return store_err(&req.id, &e);
    }
    match records.get_student_summary() {
        Ok(summary) => ok(&req.id, json!({ "summary": summary })),
        Err(e) => store_err(&req.id, &e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "semesters.list" => Some(handle_semesters_list(state, req)),
        "semesters.submit" => Some(handle_semesters_submit(state, req)),
        "semesters.delete" => Some(handle_semesters_delete(state, req)),
        _ => None,
    }
}
