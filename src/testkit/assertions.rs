//! Assertion macros for analysis results.
//!
//! - [`crate::assert_result_ok!`] - Assert a Result is Ok and extract the value
//! - [`crate::assert_result_err!`] - Assert a Result is Err and extract the error
//! - [`crate::assert_contains_error!`] - Assert the error message contains a pattern
//! - [`crate::assert_clusters!`] - Assert the method/field partition of a
//!   [`GodClassAnalysis`](crate::organization::GodClassAnalysis)
//!
//! # Example
//!
//! ```rust,ignore
//! use cohesionmap::{assert_clusters, assert_contains_error};
//!
//! let invalid = parse_and_validate_config("[clustering]\ndistance_threshold = 2.0");
//! assert_contains_error!(invalid, "(0, 1]");
//!
//! assert_clusters!(analysis, [
//!     ["fun1()"; "a", "b", "c"],
//!     ["fun2()"; "d", "e"],
//! ]);
//! ```

/// Assert that a Result is Ok and extract the value
#[macro_export]
macro_rules! assert_result_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!(
                "Expected Ok, got Err: {:?}\n  at {}:{}",
                e,
                file!(),
                line!()
            ),
        }
    };
    ($result:expr, $($msg:tt)+) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!(
                "{}: expected Ok, got Err: {:?}\n  at {}:{}",
                format!($($msg)+),
                e,
                file!(),
                line!()
            ),
        }
    };
}

/// Assert that a Result is Err and extract the error
#[macro_export]
macro_rules! assert_result_err {
    ($result:expr) => {
        match $result {
            Ok(value) => panic!(
                "Expected Err, got Ok: {:?}\n  at {}:{}",
                value,
                file!(),
                line!()
            ),
            Err(e) => e,
        }
    };
}

/// Assert that a Result is Err and its message contains `pattern`
#[macro_export]
macro_rules! assert_contains_error {
    ($result:expr, $pattern:expr) => {{
        let err = $crate::assert_result_err!($result);
        let message = err.to_string();
        assert!(
            message.contains($pattern),
            "Error '{}' does not contain '{}'",
            message,
            $pattern
        );
        err
    }};
}

/// Assert the clusters of an analysis, in order, as
/// `[methods...; fields...]` groups
#[macro_export]
macro_rules! assert_clusters {
    ($analysis:expr, [$([$($method:expr),* ; $($field:expr),*]),* $(,)?]) => {{
        let actual: Vec<(Vec<String>, Vec<String>)> = $analysis
            .clusters
            .iter()
            .map(|cluster| (cluster.methods.clone(), cluster.fields.clone()))
            .collect();
        let expected: Vec<(Vec<String>, Vec<String>)> = vec![
            $((
                vec![$($method.to_string()),*],
                vec![$($field.to_string()),*],
            )),*
        ];
        assert_eq!(actual, expected, "clusters of {}", $analysis.class_name);
    }};
}
