use crate::model::{GradeRow, Term};
use crate::policy::{MAX_SCORE, MAX_UNIT};
use serde_json::json;

#[derive(Debug, Clone, PartialEq)]
pub struct ParamError {
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl ParamError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: None,
        }
    }

    fn at_row(index: usize, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: Some(json!({ "row": index })),
        }
    }
}

pub fn parse_part(params: &serde_json::Value) -> Result<String, ParamError> {
    let Some(raw) = params.get("part").and_then(|v| v.as_str()) else {
        return Err(ParamError::new("missing part"));
    };
    let part = raw.trim();
    if part.is_empty() {
        return Err(ParamError::new("part must not be empty"));
    }
    Ok(part.to_string())
}

pub fn parse_term(params: &serde_json::Value) -> Result<Term, ParamError> {
    let Some(raw) = params.get("semester").and_then(|v| v.as_str()) else {
        return Err(ParamError::new("missing semester"));
    };
    Term::parse(raw).ok_or_else(|| {
        ParamError::new(format!(
            "semester must be 'first' or 'second' (got '{}')",
            raw
        ))
    })
}

/// Reads `params.grades`. Rows must carry a course name, a unit within
/// `0..=MAX_UNIT` and a score within `0..=MAX_SCORE`.
pub fn parse_grade_rows(params: &serde_json::Value) -> Result<Vec<GradeRow>, ParamError> {
    let Some(rows) = params.get("grades").and_then(|v| v.as_array()) else {
        return Err(ParamError::new("grades must be an array"));
    };

    let mut out = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let Some(obj) = row.as_object() else {
            return Err(ParamError::at_row(i, "grade row must be an object"));
        };
        let Some(course) = obj.get("course").and_then(|v| v.as_str()) else {
            return Err(ParamError::at_row(i, "grade row missing course"));
        };
        let Some(unit) = obj.get("unit").and_then(|v| v.as_f64()) else {
            return Err(ParamError::at_row(i, "grade row unit must be a number"));
        };
        let Some(score) = obj.get("score").and_then(|v| v.as_f64()) else {
            return Err(ParamError::at_row(i, "grade row score must be a number"));
        };
        if !(0.0..=MAX_UNIT).contains(&unit) {
            return Err(ParamError::at_row(
                i,
                format!("unit must be between 0 and {}", MAX_UNIT),
            ));
        }
        if !(0.0..=MAX_SCORE).contains(&score) {
            return Err(ParamError::at_row(
                i,
                format!("score must be between 0 and {}", MAX_SCORE),
            ));
        }
        out.push(GradeRow {
            course: course.to_string(),
            unit,
            score,
        });
    }
    Ok(out)
}
