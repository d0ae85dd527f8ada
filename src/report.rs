use crate::models::{Institution, Mapping, Outcome, Student};
use anyhow::Result;
use csv::Writer;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::Path;

/// Flat row handed to persistence and printing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappingRecord {
    pub student_name: String,
    pub cgpa: f64,
    pub project_score: f64,
    pub internships: u32,
    pub extracurricular_score: f64,
    pub total_score: f64,
    pub department: String,
    pub field: String,
    pub outcome: String,
    pub institution_name: String,
    pub institution_rank: u32,
}

impl fmt::Display for MappingRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Student: {}, CGPA: {:.2}, Project Score: {:.2}, Internships: {}, Extracurricular Score: {:.2}, \
             Total Score: {:.2}, Department: {}, Field: {}, Outcome: {}, Institution: {}, Rank: {}",
            self.student_name,
            self.cgpa,
            self.project_score,
            self.internships,
            self.extracurricular_score,
            self.total_score,
            self.department,
            self.field,
            self.outcome,
            self.institution_name,
            self.institution_rank
        )
    }
}

pub fn to_output_record(mapping: &Mapping) -> MappingRecord {
    let student = &mapping.student.student;
    MappingRecord {
        student_name: student.name.clone(),
        cgpa: student.cgpa,
        project_score: student.project_score,
        internships: student.internships,
        extracurricular_score: student.extracurricular_score,
        total_score: mapping.student.total_score,
        department: student.department.to_string(),
        field: student.field.to_string(),
        outcome: student.outcome.to_string(),
        institution_name: mapping.institution_name.clone(),
        institution_rank: mapping.institution_rank,
    }
}

pub fn to_output_records(mappings: &[Mapping]) -> Vec<MappingRecord> {
    mappings.iter().map(to_output_record).collect()
}

/// Student count per institution in rank order, zero counts included.
pub fn institution_loads(mappings: &[Mapping], institutions: &[Institution]) -> Vec<(String, u32, usize)> {
    let mut ranked: Vec<&Institution> = institutions.iter().collect();
    ranked.sort_by_key(|institution| institution.rank);

    ranked
        .into_iter()
        .map(|institution| {
            let count = mappings
                .iter()
                .filter(|m| m.institution_rank == institution.rank && m.institution_name == institution.name)
                .count();
            (institution.name.clone(), institution.rank, count)
        })
        .collect()
}

pub fn write_mappings_csv(records: &[MappingRecord], output_dir: &str) -> Result<()> {
    let csv_path = Path::new(output_dir).join("mappings.csv");
    let mut writer = Writer::from_path(csv_path)?;

    for record in records {
        writer.serialize(record)?;
    }

    writer.flush()?;
    Ok(())
}

pub fn write_students_csv(students: &[Student], output_dir: &str) -> Result<()> {
    let csv_path = Path::new(output_dir).join("students.csv");
    let mut writer = Writer::from_path(csv_path)?;

    writer.write_record([
        "id",
        "name",
        "enrollment_number",
        "department",
        "cgpa",
        "project_score",
        "internships",
        "research_papers",
        "extracurricular_score",
        "field",
        "outcome",
    ])?;

    for student in students {
        writer.write_record([
            student.id.to_string(),
            student.name.clone(),
            student.enrollment_number.clone(),
            student.department.to_string(),
            format!("{:.2}", student.cgpa),
            format!("{:.1}", student.project_score),
            student.internships.to_string(),
            student.research_papers.to_string(),
            format!("{:.1}", student.extracurricular_score),
            student.field.to_string(),
            student.outcome.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

pub fn render_summary(loads: &[(String, u32, usize)], outcomes: &[(Outcome, usize)]) -> String {
    let mut content = String::new();
    content.push_str("Allocation Summary\n");
    content.push_str("==================\n\n");

    let total: usize = loads.iter().map(|(_, _, count)| count).sum();
    content.push_str(&format!("Students allocated: {}\n", total));
    content.push_str(&format!("Institutions: {}\n\n", loads.len()));

    for (name, rank, count) in loads {
        content.push_str(&format!("Rank {}: {} - {} students\n", rank, name, count));
    }

    content.push_str("\nOutcome counts:\n");
    for (outcome, count) in outcomes {
        content.push_str(&format!("{}: {}\n", outcome, count));
    }

    content
}

pub fn write_summary(summary: &str, output_dir: &str) -> Result<()> {
    fs::write(Path::new(output_dir).join("allocation_summary.txt"), summary)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Department, Field, ScoredStudent};

    fn mapping(name: &str, total_score: f64, institution: &str, rank: u32) -> Mapping {
        Mapping {
            student: ScoredStudent {
                student: Student {
                    id: 1,
                    enrollment_number: "EN1000".to_string(),
                    name: name.to_string(),
                    department: Department::Electronics,
                    cgpa: 8.4567,
                    project_score: 77.5,
                    internships: 2,
                    research_papers: 1,
                    extracurricular_score: 64.0,
                    field: Field::It,
                    outcome: Outcome::NoOffer,
                },
                total_score,
            },
            institution_name: institution.to_string(),
            institution_rank: rank,
        }
    }

    fn institution(name: &str, rank: u32) -> Institution {
        Institution {
            id: rank,
            name: name.to_string(),
            rank,
            city: String::new(),
            state: String::new(),
            score: None,
        }
    }

    #[test]
    fn output_record_copies_fields() {
        let record = to_output_record(&mapping("Asha", 255.824, "Institute A", 1));
        assert_eq!(record.student_name, "Asha");
        assert_eq!(record.department, "Electronics");
        assert_eq!(record.field, "IT");
        assert_eq!(record.outcome, "No Offer");
        assert_eq!(record.total_score, 255.824);
        assert_eq!(record.institution_rank, 1);
    }

    #[test]
    fn display_line() {
        let record = to_output_record(&mapping("Asha", 255.824, "Institute A", 1));
        assert_eq!(
            record.to_string(),
            "Student: Asha, CGPA: 8.46, Project Score: 77.50, Internships: 2, Extracurricular Score: 64.00, \
             Total Score: 255.82, Department: Electronics, Field: IT, Outcome: No Offer, Institution: Institute A, Rank: 1"
        );
    }

    #[test]
    fn loads_include_empty_institutions() {
        let mappings = vec![
            mapping("A", 3.0, "Institute A", 1),
            mapping("B", 2.0, "Institute A", 1),
            mapping("C", 1.0, "Institute B", 2),
        ];
        let institutions = vec![institution("Institute C", 3), institution("Institute A", 1), institution("Institute B", 2)];

        assert_eq!(
            institution_loads(&mappings, &institutions),
            vec![
                ("Institute A".to_string(), 1, 2),
                ("Institute B".to_string(), 2, 1),
                ("Institute C".to_string(), 3, 0),
            ]
        );
    }

    #[test]
    fn csv_outputs_have_headers_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().to_str().unwrap();

        let mappings = vec![mapping("Asha", 255.824, "Institute A", 1)];
        write_mappings_csv(&to_output_records(&mappings), out).unwrap();
        write_students_csv(&[mappings[0].student.student.clone()], out).unwrap();

        let written = fs::read_to_string(dir.path().join("mappings.csv")).unwrap();
        let mut lines = written.lines();
        assert_eq!(
            lines.next().unwrap(),
            "student_name,cgpa,project_score,internships,extracurricular_score,total_score,department,field,outcome,institution_name,institution_rank"
        );
        assert!(lines.next().unwrap().starts_with("Asha,8.4567,77.5,2,64.0,255.824,Electronics,IT,No Offer,Institute A,1"));

        let students = fs::read_to_string(dir.path().join("students.csv")).unwrap();
        assert!(students.lines().nth(1).unwrap().starts_with("1,Asha,EN1000,Electronics,8.46,77.5,2,1,64.0,IT,No Offer"));
    }

    #[test]
    fn summary_lists_counts() {
        let loads = vec![("Institute A".to_string(), 1, 3), ("Institute B".to_string(), 2, 2)];
        let outcomes = vec![(Outcome::Selected, 4), (Outcome::Rejected, 0), (Outcome::NoOffer, 1)];
        let summary = render_summary(&loads, &outcomes);

        assert!(summary.contains("Students allocated: 5"));
        assert!(summary.contains("Rank 2: Institute B - 2 students"));
        assert!(summary.contains("Rejected: 0"));
        assert!(summary.contains("No Offer: 1"));
    }
}
