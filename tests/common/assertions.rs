//! Domain-specific assertion macros for pilotlog harnesses.
//!
//! These wrap `pretty_assertions` and add failure messages that name the
//! view and the record involved.

/// Assert the funnel's `entered` counts, stage by stage.
///
/// ```rust
/// assert_funnel!(views.funnel, [2, 2, 2, 1, 1]);
/// ```
#[macro_export]
macro_rules! assert_funnel {
    ($funnel:expr, $expected:expr) => {{
        let actual: Vec<usize> = $funnel.iter().map(|step| step.entered).collect();
        let expected: Vec<usize> = $expected.to_vec();
        pretty_assertions::assert_eq!(actual, expected, "funnel entered counts");
    }};
}

/// Assert the ids of a record list, in order.
///
/// ```rust
/// assert_ids!(snapshot.visible_logs(), ["Q-3", "Q-1"]);
/// ```
#[macro_export]
macro_rules! assert_ids {
    ($records:expr, $expected:expr) => {{
        let actual: Vec<&str> = $records.iter().map(|r| r.id.as_str()).collect();
        let expected: Vec<&str> = $expected.to_vec();
        pretty_assertions::assert_eq!(actual, expected, "record ids");
    }};
}

/// Assert a daily series as `(label, request, successRate)` triples.
///
/// ```rust
/// assert_daily!(views.daily, [("12.18", 2, 50)]);
/// ```
#[macro_export]
macro_rules! assert_daily {
    ($daily:expr, $expected:expr) => {{
        let actual: Vec<(String, usize, u32)> = $daily
            .iter()
            .map(|p| (p.date.clone(), p.request, p.success_rate))
            .collect();
        let expected: Vec<(String, usize, u32)> = $expected
            .iter()
            .map(|(d, r, s): &(&str, usize, u32)| (d.to_string(), *r, *s))
            .collect();
        pretty_assertions::assert_eq!(actual, expected, "daily series");
    }};
}
