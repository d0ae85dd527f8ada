use crate::error::EngineError;
use crate::models::{Institution, Mapping, ScoredStudent};
use tracing::debug;

/// Where the cyclic remainder distribution starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocationPolicy {
    /// Index into the rank-sorted institutions, taken modulo their count.
    pub tail_start: usize,
}

/// Allocate students to institutions with the remainder starting at the best-ranked institution.
pub fn allocate(students: &[ScoredStudent], institutions: &[Institution]) -> Result<Vec<Mapping>, EngineError> {
    allocate_with_policy(students, institutions, AllocationPolicy::default())
}

/// Sort students by total score (descending) and institutions by rank (ascending), hand each
/// institution an equal contiguous block, then deal the remainder out one at a time.
///
/// Output follows the ranked student order: every block in institution rank order, then the
/// remainder students in the order they were dealt.
pub fn allocate_with_policy(
    students: &[ScoredStudent],
    institutions: &[Institution],
    policy: AllocationPolicy,
) -> Result<Vec<Mapping>, EngineError> {
    validate(students, institutions)?;

    // Stable sorts: equal keys keep their input order
    let mut ranked_students: Vec<&ScoredStudent> = students.iter().collect();
    ranked_students.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));

    let mut ranked_institutions: Vec<&Institution> = institutions.iter().collect();
    ranked_institutions.sort_by_key(|institution| institution.rank);

    let institution_count = ranked_institutions.len();
    let block_size = ranked_students.len() / institution_count;
    let block_end = institution_count * block_size;

    debug!(
        students = ranked_students.len(),
        institutions = institution_count,
        block_size,
        remainder = ranked_students.len() - block_end,
        "partitioning cohort"
    );

    let mut mappings = Vec::with_capacity(ranked_students.len());
    if block_size > 0 {
        let blocks = ranked_students[..block_end].chunks(block_size);
        for (institution, block) in ranked_institutions.iter().zip(blocks) {
            mappings.extend(block.iter().map(|student| mapping_for(student, institution)));
        }
    }

    for (j, student) in ranked_students[block_end..].iter().enumerate() {
        let institution = ranked_institutions[(policy.tail_start + j) % institution_count];
        mappings.push(mapping_for(student, institution));
    }

    Ok(mappings)
}

fn mapping_for(student: &ScoredStudent, institution: &Institution) -> Mapping {
    Mapping {
        student: student.clone(),
        institution_name: institution.name.clone(),
        institution_rank: institution.rank,
    }
}

fn validate(students: &[ScoredStudent], institutions: &[Institution]) -> Result<(), EngineError> {
    if institutions.is_empty() {
        return Err(EngineError::InvalidInput(
            "at least one institution is required for allocation".to_string(),
        ));
    }

    for institution in institutions {
        if institution.name.trim().is_empty() {
            return Err(EngineError::malformed(
                format!("institution {}", institution.id),
                "missing name",
            ));
        }
        if institution.rank == 0 {
            return Err(EngineError::malformed(
                format!("institution {}", institution.name),
                "rank must be a positive integer",
            ));
        }
    }

    if let Some(student) = students.iter().find(|s| s.student.name.trim().is_empty()) {
        return Err(EngineError::malformed(
            format!("student {}", student.student.id),
            "missing name",
        ));
    }

    Ok(())
}
