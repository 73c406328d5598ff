//! Brute-force proximity queries over agent sets.
//!
//! Populations stay in the low thousands, so a linear scan per query is
//! enough. Candidates are expected in ascending id order; ties on distance
//! resolve to the first candidate seen.

use crate::lifecycle::is_dead;
use glam::DVec3;
use terrarium_data::Agent;

/// Nearest live candidate other than `source`, strictly closer than `max_distance`.
///
/// Distance is compared squared. On exact ties the earliest candidate wins.
pub fn find_nearest<'a, I>(source: &Agent, candidates: I, max_distance: f64) -> Option<&'a Agent>
where
    I: IntoIterator<Item = &'a Agent>,
{
    nearest_to(source.position(), Some(source), candidates, max_distance)
}

/// Same as [`find_nearest`] around a bare point.
pub fn nearest_to<'a, I>(
    position: DVec3,
    exclude: Option<&Agent>,
    candidates: I,
    max_distance: f64,
) -> Option<&'a Agent>
where
    I: IntoIterator<Item = &'a Agent>,
{
    if !(max_distance > 0.0) {
        return None;
    }
    let limit_sq = max_distance * max_distance;
    let mut best: Option<(&'a Agent, f64)> = None;

    for candidate in candidates {
        if exclude.is_some_and(|s| s.id == candidate.id) || is_dead(candidate) {
            continue;
        }
        let d2 = candidate.position().distance_squared(position);
        if d2 >= limit_sq {
            continue;
        }
        match best {
            Some((_, best_d2)) if d2 >= best_d2 => {}
            _ => best = Some((candidate, d2)),
        }
    }

    best.map(|(agent, _)| agent)
}

/// Every live candidate strictly within `radius` of `position`, in input order.
pub fn in_radius<'a, I>(position: DVec3, radius: f64, candidates: I) -> Vec<&'a Agent>
where
    I: IntoIterator<Item = &'a Agent>,
{
    if !(radius > 0.0) {
        return Vec::new();
    }
    let limit_sq = radius * radius;
    candidates
        .into_iter()
        .filter(|c| !is_dead(c) && c.position().distance_squared(position) < limit_sq)
        .collect()
}
