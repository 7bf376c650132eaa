//! Parameter extraction for matched routes.

use std::collections::BTreeMap;
use serde::Serialize;

use crate::routing::segment::{split_segments, Segment};

/// Value bound to a named parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Bound by a `:name` segment.
    Single(String),
    /// Bound by a `*name` segment: the remaining request segments.
    Tail(Vec<String>),
}

/// Parameter bindings, ordered by name.
pub type Params = BTreeMap<String, ParamValue>;

/// Derive the bindings of `pattern` against the request segments it matched.
///
/// Walks both sequences pairwise up to the shorter length. A catch-all binds
/// the request tail starting at its own position, whatever values precede it.
pub fn extract_params<S: AsRef<str>>(pattern: &str, request: &[S]) -> Params {
    let mut params = Params::new();

    for (position, (raw, value)) in split_segments(pattern).zip(request).enumerate() {
        match Segment::classify(raw) {
            Segment::Static(_) => {}
            Segment::Variable(name) => {
                let value: &str = value.as_ref();
                params.insert(name.to_string(), ParamValue::Single(value.to_string()));
            }
            Segment::CatchAll(name) => {
                let tail: Vec<&str> = request[position..].iter().map(AsRef::as_ref).collect();
                let tail = tail.into_iter().map(str::to_owned).collect();
                params.insert(name.to_string(), ParamValue::Tail(tail));
                break;
            }
        }
    }

    params
}
