use crate::model::{Grade, Semester};

/// Half-up rounding to 2 decimals: `Int(100*x + 0.5) / 100`.
pub fn round_off_2_decimal(x: f64) -> f64 {
    ((100.0 * x) + 0.5).floor() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WeightedSums {
    pub weighted_total: f64,
    pub units: f64,
}

impl WeightedSums {
    pub fn add(&mut self, grade: &Grade) {
        self.weighted_total += grade.weighted_total();
        self.units += grade.unit();
    }

    /// Weighted GPA, or 0 when no units have been counted.
    pub fn gpa(&self) -> f64 {
        if self.units > 0.0 {
            round_off_2_decimal(self.weighted_total / self.units)
        } else {
            0.0
        }
    }
}

/// `sum(weighted_totals) / sum(units)` rounded to 2 decimals.
///
/// Both slices are produced pairwise from the same grade sequence. A zero
/// unit total (including empty input) yields 0.
pub fn aggregate(weighted_totals: &[f64], units: &[f64]) -> f64 {
    debug_assert_eq!(weighted_totals.len(), units.len());
    WeightedSums {
        weighted_total: weighted_totals.iter().sum(),
        units: units.iter().sum(),
    }
    .gpa()
}

pub fn sum_grades<'a, I>(grades: I) -> WeightedSums
where
    I: IntoIterator<Item = &'a Grade>,
{
    let mut sums = WeightedSums::default();
    for g in grades {
        sums.add(g);
    }
    sums
}

pub fn semester_gpa(grades: &[Grade]) -> f64 {
    sum_grades(grades).gpa()
}

/// CGPA over every grade of every semester, weighted by units.
pub fn cumulative_gpa(semesters: &[Semester]) -> f64 {
    sum_grades(semesters.iter().flat_map(|s| s.grades().iter())).gpa()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Term;

    #[test]
    fn round_off_is_half_up() {
        assert_eq!(round_off_2_decimal(0.0), 0.0);
        assert_eq!(round_off_2_decimal(27.0 / 7.0), 3.86);
        assert_eq!(round_off_2_decimal(3.6), 3.6);
        assert_eq!(round_off_2_decimal(2.125), 2.13);
    }

    #[test]
    fn aggregate_of_nothing_is_zero() {
        let v = aggregate(&[], &[]);
        assert_eq!(v, 0.0);
        assert!(v.is_finite());
    }

    #[test]
    fn aggregate_with_zero_units_is_zero() {
        assert_eq!(aggregate(&[0.0, 0.0], &[0.0, 0.0]), 0.0);
    }

    #[test]
    fn aggregate_weights_by_units() {
        assert_eq!(aggregate(&[15.0, 12.0], &[3.0, 4.0]), 3.86);
        assert_eq!(aggregate(&[27.0, 9.0], &[7.0, 3.0]), 3.6);
    }

    #[test]
    fn cumulative_weights_grades_not_semester_gpas() {
        let first = Semester::new(
            "I",
            Term::First,
            vec![Grade::new("math", 3.0, 75.0), Grade::new("phy", 4.0, 55.0)],
        );
        let second = Semester::new("I", Term::Second, vec![Grade::new("bio", 3.0, 52.0)]);
        assert_eq!(second.gpa(), 3.0);
        assert_eq!(cumulative_gpa(&[first, second]), 3.6);
    }

    #[test]
    fn sum_grades_totals_units_and_points() {
        let grades = vec![Grade::new("a", 2.0, 80.0), Grade::new("b", 0.0, 30.0)];
        let sums = sum_grades(&grades);
        assert_eq!(sums.units, 2.0);
        assert_eq!(sums.weighted_total, 10.0);
        assert_eq!(sums.gpa(), 5.0);
    }
}
