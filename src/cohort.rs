use crate::error::EngineError;
use crate::models::{Department, Outcome, Student};
use crate::outcome::OutcomeModel;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

const FIRST_ENROLLMENT: usize = 1000;

/// Names used when no names file is configured.
pub const DEFAULT_ROSTER: [&str; 40] = [
    "Aarav Menon", "Aditi Rao", "Akash Kumar", "Ananya Iyer", "Arjun Nair",
    "Bhavana Reddy", "Chetan Hegde", "Deepika Shetty", "Dhruv Patil", "Divya Kulkarni",
    "Gaurav Joshi", "Harini Prasad", "Ishaan Verma", "Jyoti Desai", "Karthik Murthy",
    "Kavya Gowda", "Lakshmi Narayan", "Manoj Bhat", "Meera Pillai", "Naveen Shankar",
    "Neha Sharma", "Nikhil Rao", "Pallavi Naik", "Pooja Kamath", "Pranav Jain",
    "Rahul Singh", "Rakesh Babu", "Revathi Krishnan", "Rohan Das", "Sahana Murali",
    "Sanjay Kumar", "Shreya Hebbar", "Siddharth Menon", "Sneha Kaur", "Suhas Rao",
    "Tanvi Mehta", "Tarun Reddy", "Varun Acharya", "Vidya Shenoy", "Yash Gupta",
];

/// Cycle through `names` until `size` entries exist.
pub fn extend_roster(names: &[String], size: usize) -> Vec<String> {
    names.iter().cycle().take(size).cloned().collect()
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Generate one synthetic student per name. Outcomes are drawn once here and never recomputed.
pub fn generate<R: Rng + ?Sized>(
    names: &[String],
    departments: &[Department],
    rng: &mut R,
) -> Result<Vec<Student>, EngineError> {
    if names.is_empty() {
        return Ok(Vec::new());
    }
    if departments.is_empty() {
        return Err(EngineError::InvalidInput(
            "department enumeration is empty".to_string(),
        ));
    }

    let model = OutcomeModel::new()?;
    let mut students = Vec::with_capacity(names.len());
    for (i, name) in names.iter().enumerate() {
        let department = *departments
            .choose(rng)
            .ok_or_else(|| EngineError::InvalidInput("department enumeration is empty".to_string()))?;
        let cgpa = round_to(rng.gen_range(6.0..=10.0), 2);
        let project_score = round_to(rng.gen_range(50.0..=100.0), 1);
        let internships = rng.gen_range(0..=3);
        let research_papers = rng.gen_range(0..=2);
        let extracurricular_score = round_to(rng.gen_range(50.0..=100.0), 1);

        let outcome = model.simulate_outcome(cgpa, project_score, internships, extracurricular_score, rng);

        students.push(Student {
            id: (i + 1) as u32,
            enrollment_number: format!("EN{}", FIRST_ENROLLMENT + i),
            name: name.clone(),
            department,
            cgpa,
            project_score,
            internships,
            research_papers,
            extracurricular_score,
            field: department.field(),
            outcome,
        });
    }

    info!(students = students.len(), "cohort generated");
    Ok(students)
}

/// Count students per outcome; every outcome is present even with a zero count.
pub fn count_outcomes(students: &[Student]) -> Vec<(Outcome, usize)> {
    Outcome::ALL
        .iter()
        .map(|outcome| {
            let count = students.iter().filter(|s| s.outcome == *outcome).count();
            (*outcome, count)
        })
        .collect()
}
