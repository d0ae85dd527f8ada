use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub seed: Option<u64>,
    pub cohort_size: usize,
    pub names_file: Option<String>,
    pub departments: Vec<Department>,
    // Data source configuration
    pub student_source_mode: StudentSourceMode,
    pub students_file: Option<String>,
    pub institution_source_mode: InstitutionSourceMode,
    pub institutions_file: String,
    // Allocation
    pub tail_start: usize,
    pub output_directory: Option<String>,
    pub print_mappings: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StudentSourceMode {
    #[serde(rename = "generated")]
    Generated,
    #[serde(rename = "csv")]
    Csv,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InstitutionSourceMode {
    #[serde(rename = "csv")]
    Csv,
    #[serde(rename = "ranking_page")]
    RankingPage,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            cohort_size: 600,
            names_file: None,
            departments: Department::ALL.to_vec(),
            student_source_mode: StudentSourceMode::Generated,
            students_file: Some("data-source/students.csv".to_string()),
            institution_source_mode: InstitutionSourceMode::Csv,
            institutions_file: "data-source/institutions.csv".to_string(),
            tail_start: 0,
            output_directory: Some("output".to_string()),
            print_mappings: false,
        }
    }
}

impl Config {
    pub fn load_from_file(file_path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(file_path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, file_path: &str) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(file_path, content)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
    #[serde(rename = "Computer Science")]
    ComputerScience,
    #[serde(rename = "Mechanical")]
    Mechanical,
    #[serde(rename = "Electrical")]
    Electrical,
    #[serde(rename = "Civil")]
    Civil,
    #[serde(rename = "Electronics")]
    Electronics,
}

impl Department {
    pub const ALL: [Department; 5] = [
        Department::ComputerScience,
        Department::Mechanical,
        Department::Electrical,
        Department::Civil,
        Department::Electronics,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Department::ComputerScience => "Computer Science",
            Department::Mechanical => "Mechanical",
            Department::Electrical => "Electrical",
            Department::Civil => "Civil",
            Department::Electronics => "Electronics",
        }
    }

    /// Computer Science and Electronics count as IT, everything else does not.
    pub fn field(&self) -> Field {
        match self {
            Department::ComputerScience | Department::Electronics => Field::It,
            _ => Field::NonIt,
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Department {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Department::ALL
            .iter()
            .copied()
            .find(|d| d.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown department '{}'", wanted))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    #[serde(rename = "IT")]
    It,
    #[serde(rename = "Non-IT")]
    NonIt,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::It => "IT",
            Field::NonIt => "Non-IT",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "IT" => Ok(Field::It),
            "NON-IT" => Ok(Field::NonIt),
            other => Err(format!("unknown field '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "Selected")]
    Selected,
    #[serde(rename = "No Offer")]
    NoOffer,
    #[serde(rename = "Rejected")]
    Rejected,
}

impl Outcome {
    /// Tally order used in reports.
    pub const ALL: [Outcome; 3] = [Outcome::Selected, Outcome::Rejected, Outcome::NoOffer];

    pub fn name(&self) -> &'static str {
        match self {
            Outcome::Selected => "Selected",
            Outcome::NoOffer => "No Offer",
            Outcome::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Outcome::ALL
            .iter()
            .copied()
            .find(|o| o.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown outcome '{}'", wanted))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: u32,
    pub enrollment_number: String,
    pub name: String,
    pub department: Department,
    pub cgpa: f64,
    pub project_score: f64,
    pub internships: u32,
    pub research_papers: u32,
    pub extracurricular_score: f64,
    pub field: Field,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Institution {
    pub id: u32,
    pub name: String,
    pub rank: u32,
    pub city: String,
    pub state: String,
    pub score: Option<f64>,
}

/// A student together with the total score used for ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredStudent {
    pub student: Student,
    pub total_score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mapping {
    pub student: ScoredStudent,
    pub institution_name: String,
    pub institution_rank: u32,
}
