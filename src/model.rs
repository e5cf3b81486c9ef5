use crate::calc;
use crate::policy::{self, Honours};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Term {
    #[serde(alias = "harmattan")]
    First,
    #[serde(alias = "rain")]
    Second,
}

/// Label sets the front-end may show for a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermVocabulary {
    Ordinal,
    Season,
}

impl Term {
    pub fn as_str(self) -> &'static str {
        match self {
            Term::First => "first",
            Term::Second => "second",
        }
    }

    pub fn parse(raw: &str) -> Option<Term> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "first" | "harmattan" => Some(Term::First),
            "second" | "rain" => Some(Term::Second),
            _ => None,
        }
    }

    pub fn display_label(self, vocabulary: TermVocabulary) -> &'static str {
        match (vocabulary, self) {
            (TermVocabulary::Ordinal, Term::First) => "first",
            (TermVocabulary::Ordinal, Term::Second) => "second",
            (TermVocabulary::Season, Term::First) => "harmattan",
            (TermVocabulary::Season, Term::Second) => "rain",
        }
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One course result. Points and weighted total are derived on demand.
///
/// Stored rows are decoded through [`Grade::new`], so they get the same
/// course normalization as fresh input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "GradeRow")]
pub struct Grade {
    course: String,
    unit: f64,
    score: f64,
}

impl Grade {
    pub fn new(course: impl Into<String>, unit: f64, score: f64) -> Self {
        let course: String = course.into();
        Self {
            course: course.trim().to_lowercase(),
            unit,
            score,
        }
    }

    pub fn course(&self) -> &str {
        &self.course
    }

    pub fn unit(&self) -> f64 {
        self.unit
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn points(&self) -> u8 {
        policy::points_for_score(self.score)
    }

    pub fn weighted_total(&self) -> f64 {
        f64::from(self.points()) * self.unit
    }
}

/// Raw grade row as supplied by the front-end.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GradeRow {
    pub course: String,
    pub unit: f64,
    pub score: f64,
}

impl From<&GradeRow> for Grade {
    fn from(row: &GradeRow) -> Self {
        Grade::new(row.course.as_str(), row.unit, row.score)
    }
}

impl From<GradeRow> for Grade {
    fn from(row: GradeRow) -> Self {
        Grade::new(row.course, row.unit, row.score)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Semester {
    part: String,
    #[serde(rename = "semester")]
    term: Term,
    gpa: f64,
    grades: Vec<Grade>,
}

impl Semester {
    /// Builds a semester and computes its GPA from `grades`.
    pub fn new(part: impl Into<String>, term: Term, grades: Vec<Grade>) -> Self {
        let gpa = calc::semester_gpa(&grades);
        Self {
            part: part.into(),
            term,
            gpa,
            grades,
        }
    }

    pub fn part(&self) -> &str {
        &self.part
    }

    pub fn term(&self) -> Term {
        self.term
    }

    pub fn gpa(&self) -> f64 {
        self.gpa
    }

    pub fn grades(&self) -> &[Grade] {
        &self.grades
    }

    pub fn honours(&self) -> Honours {
        policy::honours_for_gpa(self.gpa)
    }

    pub fn total_units(&self) -> f64 {
        self.grades.iter().map(Grade::unit).sum()
    }

    pub fn is_identified_by(&self, part: &str, term: Term) -> bool {
        self.part == part && self.term == term
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentSummary {
    pub cgpa: f64,
    pub honours: Honours,
}

impl StudentSummary {
    pub fn from_semesters(semesters: &[Semester]) -> Self {
        let cgpa = calc::cumulative_gpa(semesters);
        Self {
            cgpa,
            honours: policy::honours_for_gpa(cgpa),
        }
    }

    pub fn empty() -> Self {
        Self::from_semesters(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn grade_derives_points_and_weighted_total() {
        let g = Grade::new("  MATH ", 3.0, 75.0);
        assert_eq!(g.course(), "math");
        assert_eq!(g.points(), 5);
        assert_eq!(g.weighted_total(), 15.0);

        let g = Grade::new("phy", 4.0, 55.0);
        assert_eq!(g.points(), 3);
        assert_eq!(g.weighted_total(), 12.0);
    }

    #[test]
    fn semester_computes_gpa_and_honours() {
        let s = Semester::new(
            "I",
            Term::First,
            vec![Grade::new("math", 3.0, 75.0), Grade::new("phy", 4.0, 55.0)],
        );
        assert_eq!(s.gpa(), 3.86);
        assert_eq!(s.honours(), Honours::SecondClassUpper);
        assert_eq!(s.total_units(), 7.0);
        assert!(s.is_identified_by("I", Term::First));
        assert!(!s.is_identified_by("I", Term::Second));
    }

    #[test]
    fn semester_serializes_to_persisted_layout() {
        let s = Semester::new("II", Term::Second, vec![Grade::new("chm", 2.0, 61.0)]);
        let v = serde_json::to_value(&s).expect("serialize");
        assert_eq!(
            v,
            json!({
                "part": "II",
                "semester": "second",
                "gpa": 4.0,
                "grades": [{ "course": "chm", "unit": 2.0, "score": 61.0 }]
            })
        );
    }

    #[test]
    fn stored_grade_rows_are_normalized_on_read() {
        let s: Semester = serde_json::from_value(json!({
            "part": "I",
            "semester": "first",
            "gpa": 5.0,
            "grades": [{ "course": "  MATH ", "unit": 3, "score": 75 }]
        }))
        .expect("parse");
        assert_eq!(s.grades()[0].course(), "math");
        assert_eq!(s.grades()[0], Grade::new("math", 3.0, 75.0));
    }

    #[test]
    fn term_accepts_season_vocabulary() {
        let t: Term = serde_json::from_value(json!("harmattan")).expect("parse");
        assert_eq!(t, Term::First);
        assert_eq!(Term::parse("Rain"), Some(Term::Second));
        assert_eq!(Term::parse("third"), None);
        assert_eq!(Term::Second.display_label(TermVocabulary::Season), "rain");
        assert_eq!(serde_json::to_value(Term::First).expect("ser"), json!("first"));
    }

    #[test]
    fn empty_summary_is_zero_with_no_classification() {
        let s = StudentSummary::empty();
        assert_eq!(s.cgpa, 0.0);
        assert_eq!(s.honours, Honours::NoClassification);
        assert_eq!(
            serde_json::to_value(&s).expect("ser"),
            json!({ "cgpa": 0.0, "honours": "no classification" })
        );
    }
}
