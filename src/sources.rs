use crate::error::EngineError;
use crate::models::{Department, Field, Institution, Outcome, Student};
use anyhow::{anyhow, Context, Result};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use std::fs;
use tracing::warn;

const RANKING_TABLE: &str = "table#tbl_overall";
const MIN_RANKING_CELLS: usize = 10;

/// Read a roster of names, one per line. Blank lines are ignored.
pub fn load_names(file_path: &str) -> Result<Vec<String>> {
    let content = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read names file: {}", file_path))?;

    let names: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if names.is_empty() {
        return Err(EngineError::InvalidInput(format!("no names found in {}", file_path)).into());
    }
    Ok(names)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct InstitutionRow {
    rank: Option<String>,
    institution_name: Option<String>,
    city: Option<String>,
    state: Option<String>,
    score: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StudentRow {
    name: Option<String>,
    enrollment_number: Option<String>,
    department: Option<String>,
    cgpa: Option<String>,
    project_score: Option<String>,
    internships: Option<String>,
    research_papers: Option<String>,
    extracurricular_score: Option<String>,
    field: Option<String>,
    outcome: Option<String>,
}

fn required<'a>(value: &'a Option<String>, record: &str, field: &str) -> Result<&'a str, EngineError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| EngineError::malformed(record, format!("missing {}", field)))
}

fn parse_number<T: std::str::FromStr>(value: &Option<String>, record: &str, field: &str) -> Result<T, EngineError> {
    let raw = required(value, record, field)?;
    raw.parse::<T>()
        .map_err(|_| EngineError::malformed(record, format!("{} '{}' is not a number", field, raw)))
}

/// Reads institution rankings from local CSV files or saved ranking pages.
pub struct InstitutionReader {
    rank_pattern: Regex,
    score_pattern: Regex,
}

impl InstitutionReader {
    pub fn new() -> Result<Self> {
        Ok(Self {
            rank_pattern: Regex::new(r"\d+")?,
            score_pattern: Regex::new(r"-?\d+(?:\.\d+)?")?,
        })
    }

    /// CSV with header `rank,institution_name,city,state,score`.
    pub fn read_csv(&self, file_path: &str) -> Result<Vec<Institution>> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(file_path)
            .with_context(|| format!("Failed to open institutions file: {}", file_path))?;

        let mut institutions = Vec::new();
        for (i, row) in reader.deserialize::<InstitutionRow>().enumerate() {
            let row = row.with_context(|| format!("Failed to read row {} of {}", i + 1, file_path))?;
            let record = format!("{} row {}", file_path, i + 1);
            institutions.push(self.institution_from_row(&row, (i + 1) as u32, &record)?);
        }

        Ok(institutions)
    }

    /// Locally saved ranking page with a `tbl_overall` table. Nothing is fetched.
    pub fn read_ranking_page(&self, file_path: &str) -> Result<Vec<Institution>> {
        let content = fs::read_to_string(file_path)
            .with_context(|| format!("Failed to read file: {}", file_path))?;

        self.parse_ranking_html(&content, file_path)
    }

    fn parse_ranking_html(&self, content: &str, source: &str) -> Result<Vec<Institution>> {
        let document = Html::parse_document(content);
        let table_selector = selector(RANKING_TABLE)?;
        let row_selector = selector("tr")?;
        let cell_selector = selector("td")?;

        let table = document
            .select(&table_selector)
            .next()
            .ok_or_else(|| anyhow!("No ranking table ({}) found in {}", RANKING_TABLE, source))?;

        let mut institutions = Vec::new();
        // First row is the header
        for (i, row) in table.select(&row_selector).enumerate().skip(1) {
            let cells: Vec<ElementRef> = row.select(&cell_selector).collect();
            if cells.len() < MIN_RANKING_CELLS {
                warn!(row = i, cells = cells.len(), "skipping short ranking row");
                continue;
            }

            // Name cell carries a trailing "More Details" link
            let full_name = cell_text(&cells[1]);
            let name = full_name.split("More").next().unwrap_or("").trim().to_string();

            let row = InstitutionRow {
                rank: cells.last().map(cell_text),
                institution_name: Some(name),
                city: Some(cell_text(&cells[7])),
                state: Some(cell_text(&cells[8])),
                score: Some(cell_text(&cells[9])),
            };
            let record = format!("{} row {}", source, i);
            institutions.push(self.institution_from_row(&row, (institutions.len() + 1) as u32, &record)?);
        }

        Ok(institutions)
    }

    fn institution_from_row(&self, row: &InstitutionRow, id: u32, record: &str) -> Result<Institution, EngineError> {
        let name = required(&row.institution_name, record, "institution_name")?;
        let raw_rank = required(&row.rank, record, "rank")?;

        let rank = self
            .rank_pattern
            .find(raw_rank)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .filter(|rank| *rank > 0)
            .ok_or_else(|| EngineError::malformed(record, format!("rank '{}' is not a positive integer", raw_rank)))?;

        let score = row
            .score
            .as_deref()
            .and_then(|s| self.score_pattern.find(s))
            .and_then(|m| m.as_str().parse::<f64>().ok());

        Ok(Institution {
            id,
            name: name.to_string(),
            rank,
            city: row.city.as_deref().unwrap_or("").trim().to_string(),
            state: row.state.as_deref().unwrap_or("").trim().to_string(),
            score,
        })
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("Invalid selector {}: {}", css, e))
}

fn cell_text(cell: &ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// Load a cohort produced elsewhere, e.g. a real admissions dataset.
pub fn load_students_csv(file_path: &str) -> Result<Vec<Student>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(file_path)
        .with_context(|| format!("Failed to open students file: {}", file_path))?;

    let mut students = Vec::new();
    for (i, row) in reader.deserialize::<StudentRow>().enumerate() {
        let row = row.with_context(|| format!("Failed to read row {} of {}", i + 1, file_path))?;
        let record = format!("{} row {}", file_path, i + 1);
        students.push(student_from_row(&row, i, &record)?);
    }

    Ok(students)
}

fn student_from_row(row: &StudentRow, index: usize, record: &str) -> Result<Student, EngineError> {
    let name = required(&row.name, record, "name")?;
    let department: Department = required(&row.department, record, "department")?
        .parse()
        .map_err(|e: String| EngineError::malformed(record, e))?;
    let outcome: Outcome = required(&row.outcome, record, "outcome")?
        .parse()
        .map_err(|e: String| EngineError::malformed(record, e))?;

    let field = department.field();
    if let Some(given) = row.field.as_deref().map(str::trim).filter(|f| !f.is_empty()) {
        let given: Field = given.parse().map_err(|e: String| EngineError::malformed(record, e))?;
        if given != field {
            return Err(EngineError::malformed(
                record,
                format!("field {} does not match department {}", given, department),
            ));
        }
    }

    let enrollment_number = row
        .enrollment_number
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("EN{}", 1000 + index));

    Ok(Student {
        id: (index + 1) as u32,
        enrollment_number,
        name: name.to_string(),
        department,
        cgpa: parse_number(&row.cgpa, record, "cgpa")?,
        project_score: parse_number(&row.project_score, record, "project_score")?,
        internships: parse_number(&row.internships, record, "internships")?,
        research_papers: parse_number(&row.research_papers, record, "research_papers")?,
        extracurricular_score: parse_number(&row.extracurricular_score, record, "extracurricular_score")?,
        field,
        outcome,
    })
}
