use serde::{Deserialize, Serialize};

/// Highest score on the grading scale.
pub const MAX_SCORE: f64 = 100.0;

/// Highest credit weight a single course can carry.
pub const MAX_UNIT: f64 = 20.0;

/// Grade points for a raw course score.
///
/// Bands are evaluated top-down against strict lower bounds, so every real
/// score lands in exactly one band:
/// `> 69` => 5, `> 59` => 4, `> 49` => 3, `> 44` => 2, `> 39` => 1, else 0.
pub fn points_for_score(score: f64) -> u8 {
    if score > 69.0 {
        5
    } else if score > 59.0 {
        4
    } else if score > 49.0 {
        3
    } else if score > 44.0 {
        2
    } else if score > 39.0 {
        1
    } else {
        0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Honours {
    #[serde(rename = "first class")]
    FirstClass,
    #[serde(rename = "second class upper")]
    SecondClassUpper,
    #[serde(rename = "second class lower")]
    SecondClassLower,
    #[serde(rename = "third class")]
    ThirdClass,
    #[serde(rename = "pass")]
    Pass,
    #[serde(rename = "no classification")]
    NoClassification,
}

impl Honours {
    pub fn label(self) -> &'static str {
        match self {
            Honours::FirstClass => "first class",
            Honours::SecondClassUpper => "second class upper",
            Honours::SecondClassLower => "second class lower",
            Honours::ThirdClass => "third class",
            Honours::Pass => "pass",
            Honours::NoClassification => "no classification",
        }
    }
}

impl std::fmt::Display for Honours {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Honours tier for a GPA on the 5-point scale.
///
/// `4.5` itself is second class upper; every other boundary belongs to the
/// band above it. NaN falls through to `NoClassification`.
pub fn honours_for_gpa(gpa: f64) -> Honours {
    if gpa > 4.5 {
        Honours::FirstClass
    } else if gpa >= 3.5 {
        Honours::SecondClassUpper
    } else if gpa >= 2.4 {
        Honours::SecondClassLower
    } else if gpa >= 1.5 {
        Honours::ThirdClass
    } else if gpa >= 1.0 {
        Honours::Pass
    } else {
        Honours::NoClassification
    }
}
