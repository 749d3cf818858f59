//! Assertion helpers shared by unit tests across the umbra tools.
//!
//! Test scenarios are often parametrized over "the operation succeeds with
//! this value" and "the operation fails in this particular way". The
//! [`Expectation`] type expresses that union explicitly, and the check
//! functions run an operation once, capture its result, and compare it
//! against the expectation. A mismatch panics, which is how the test
//! harness reports failure.

use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt;

use serde_json::Value;

/// Capability for exposing the comparable parts of an error to assertions.
///
/// `Kind` identifies the error variant, and [`fields`](Self::fields) is the
/// allow-list of named payload values an assertion may look at. Variants
/// without payloads return an empty map.
pub trait InspectableError: Error {
    type Kind: Copy + Ord + fmt::Debug;

    fn kind(&self) -> Self::Kind;

    fn fields(&self) -> BTreeMap<&'static str, Value> {
        BTreeMap::new()
    }
}

/// What a test scenario expects an operation to produce.
#[derive(Debug)]
pub enum Expectation<T, E: InspectableError> {
    /// The operation returns this value.
    Value(T),
    /// The operation fails with an error matching this one.
    Instance(E),
    /// The operation fails with an error of one of these kinds.
    Kinds(BTreeSet<E::Kind>),
}

/// Return the subset of `err`'s fields whose names appear in `attrs`.
///
/// Names in `attrs` which the error does not expose are simply absent from
/// the result.
pub fn matching_attrs<E: InspectableError>(
    err: &E,
    attrs: &[&str],
) -> BTreeMap<&'static str, Value> {
    err.fields()
        .into_iter()
        .filter(|(name, _)| attrs.contains(name))
        .collect()
}

/// Return the sub-map containing only the entry whose key equals
/// `filter_key`, if any.
pub fn filter_dict(dct: &BTreeMap<String, Value>, filter_key: &str) -> BTreeMap<String, Value> {
    dct.iter()
        .filter(|(key, _)| key.as_str() == filter_key)
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Run `op` and check its result against `expect`.
///
/// For [`Expectation::Value`] the operation must succeed with an equal
/// value. For [`Expectation::Instance`] it must fail with an error of the
/// same kind whose fields named in `match_attrs` equal the expected error's.
/// For [`Expectation::Kinds`] it must fail with any of the listed kinds.
pub fn check_expectation<T, E, F>(expect: &Expectation<T, E>, match_attrs: &[&str], op: F)
where
    T: PartialEq + fmt::Debug,
    E: InspectableError,
    F: FnOnce() -> Result<T, E>,
{
    match (expect, op()) {
        (Expectation::Value(want), Ok(got)) => {
            assert_eq!(&got, want, "operation returned an unexpected value");
        }
        (Expectation::Value(want), Err(err)) => {
            panic!("expected the value {want:?}, but the operation failed: {err}");
        }
        (Expectation::Instance(want), Err(err)) => {
            assert_eq!(err.kind(), want.kind(), "unexpected error kind: {err}");
            assert_eq!(
                matching_attrs(&err, match_attrs),
                matching_attrs(want, match_attrs),
                "error fields differ from the expected error's"
            );
        }
        (Expectation::Instance(want), Ok(got)) => {
            panic!("expected failure {want}, but the operation returned {got:?}");
        }
        (Expectation::Kinds(kinds), Err(err)) => {
            assert!(
                kinds.contains(&err.kind()),
                "error kind {:?} is not among the expected kinds {kinds:?}",
                err.kind()
            );
        }
        (Expectation::Kinds(kinds), Ok(got)) => {
            panic!("expected failure of one of {kinds:?}, but the operation returned {got:?}");
        }
    }
}

/// Run `op` and check only whether it fails the way `expect` says.
///
/// [`Expectation::Kinds`] requires a failure of a listed kind, with no
/// message check. [`Expectation::Instance`] requires a failure of the same
/// kind whose rendered message equals the expected error's, compared as a
/// literal string. [`Expectation::Value`] requires the operation to run to
/// completion; the payload is not compared.
pub fn check_outcome<T, E, F>(expect: &Expectation<T, E>, op: F)
where
    T: fmt::Debug,
    E: InspectableError,
    F: FnOnce() -> Result<T, E>,
{
    match (expect, op()) {
        (Expectation::Value(_), Ok(_)) => {}
        (Expectation::Value(_), Err(err)) => {
            panic!("operation failed unexpectedly: {err}");
        }
        (Expectation::Instance(want), Err(err)) => {
            assert_eq!(err.kind(), want.kind(), "unexpected error kind: {err}");
            assert_eq!(
                err.to_string(),
                want.to_string(),
                "error message differs from the expected one"
            );
        }
        (Expectation::Instance(want), Ok(got)) => {
            panic!("expected failure {want}, but the operation returned {got:?}");
        }
        (Expectation::Kinds(kinds), Err(err)) => {
            assert!(
                kinds.contains(&err.kind()),
                "error kind {:?} is not among the expected kinds {kinds:?}",
                err.kind()
            );
        }
        (Expectation::Kinds(kinds), Ok(got)) => {
            panic!("expected failure of one of {kinds:?}, but the operation returned {got:?}");
        }
    }
}
