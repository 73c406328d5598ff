/// Asserts that the agent is no longer in the world.
#[macro_export]
macro_rules! assert_agent_removed {
    ($world:expr, $id:expr) => {
        assert!(
            $world.get($id).is_none(),
            "Agent {} should be removed but was found",
            $id
        );
    };
}

/// Asserts the live count of one species.
#[macro_export]
macro_rules! assert_population {
    ($world:expr, $species:expr, $count:expr) => {
        assert_eq!(
            $world.agents_of($species).count(),
            $count,
            "{} population mismatch",
            $species
        );
    };
}

/// Asserts two floats are within `1e-9` of each other.
#[macro_export]
macro_rules! assert_close {
    ($left:expr, $right:expr) => {
        let (l, r): (f64, f64) = ($left, $right);
        assert!((l - r).abs() <= 1e-9, "{} is not within 1e-9 of {}", l, r);
    };
    ($left:expr, $right:expr, $tol:expr) => {
        let (l, r): (f64, f64) = ($left, $right);
        assert!((l - r).abs() <= $tol, "{} is not within {} of {}", l, $tol, r);
    };
}
