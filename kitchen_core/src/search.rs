use crate::{KitchenView, Position};

/// Furthest ring inspected when looking for somewhere to put an item down.
pub const MAX_SEARCH_RADIUS: usize = 2;

/// Failures that abort planning for the current turn.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    #[error("No free counter within distance {radius} of ({}, {})", .origin.x, .origin.y)]
    NoFreeCounter { origin: Position, radius: usize },
}

/// Cells at exactly manhattan distance `radius` from `origin`, row by row.
///
/// Cells that would fall off the top or left edge are skipped.
fn ring(origin: Position, radius: usize) -> impl Iterator<Item = Position> {
    let r = radius as isize;
    (-r..=r).flat_map(move |dy| {
        let span = r - dy.abs();
        let xs: &[isize] = if span == 0 { &[0] } else { &[-1, 1] };
        xs.iter()
            .filter_map(move |sign| origin.offset(sign * span, dy))
    })
}

/// Finds the first empty plain counter around `origin`.
///
/// Rings of distance 1 and then 2 are inspected in turn; inside a ring, cells are
/// scanned top row first and left to right. Stations never qualify.
pub fn nearest_free_counter(view: &KitchenView<'_>, origin: Position) -> Result<Position, PlanError> {
    (1..=MAX_SEARCH_RADIUS)
        .flat_map(|radius| ring(origin, radius))
        .find(|candidate| view.is_free_counter(*candidate))
        .ok_or(PlanError::NoFreeCounter {
            origin,
            radius: MAX_SEARCH_RADIUS,
        })
}
