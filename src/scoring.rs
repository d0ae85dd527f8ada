use crate::models::{ScoredStudent, Student};

pub const CGPA_WEIGHT: f64 = 4.0;
pub const PROJECT_WEIGHT: f64 = 2.0;
pub const INTERNSHIP_WEIGHT: f64 = 1.5;
pub const EXTRACURRICULAR_WEIGHT: f64 = 1.0;

/// Total score used for ranking. Research papers do not count.
/// Inputs are not range checked.
pub fn score(student: &Student) -> f64 {
    student.cgpa * CGPA_WEIGHT
        + student.project_score * PROJECT_WEIGHT
        + student.internships as f64 * INTERNSHIP_WEIGHT
        + student.extracurricular_score * EXTRACURRICULAR_WEIGHT
}

impl ScoredStudent {
    pub fn from_student(student: &Student) -> Self {
        Self {
            student: student.clone(),
            total_score: score(student),
        }
    }
}

pub fn score_all(students: &[Student]) -> Vec<ScoredStudent> {
    students.iter().map(ScoredStudent::from_student).collect()
}
