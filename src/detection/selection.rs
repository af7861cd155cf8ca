use crate::models::SquareCandidate;

/// Index of the smallest-area candidate; the earliest one wins a tie
pub fn min_area_index(candidates: &[SquareCandidate]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, candidate) in candidates.iter().enumerate() {
        match best {
            Some(b) if candidate.area() >= candidates[b].area() => {}
            _ => best = Some(i),
        }
    }
    best
}

/// Smallest-area candidate, or None for an empty set
pub fn select_minimum(candidates: &[SquareCandidate]) -> Option<&SquareCandidate> {
    min_area_index(candidates).map(|i| &candidates[i])
}
