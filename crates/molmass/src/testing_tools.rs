//! Assertion helpers shared by the unit tests

macro_rules! assert_close {
    ($left:expr, $right:expr, $tolerance:expr) => {{
        let (left, right) = ($left, $right);
        assert!(
            (left - right).abs() <= $tolerance,
            "{left} is not within {} of {right}",
            $tolerance,
        );
    }};
}

pub(crate) use assert_close;
