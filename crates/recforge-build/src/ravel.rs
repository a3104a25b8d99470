//! Depth-first flattening of nested data

use recforge_model::Datum;

/// Flatten nested sequences into their leaves, depth-first
///
/// A leaf (or an undefined datum) flattens to itself.
#[must_use]
pub fn ravel(datum: Datum) -> Vec<Datum> {
    let mut out = Vec::new();
    ravel_into(datum, &mut out);
    out
}

/// Flatten every element of a slice of data, in order
#[must_use]
pub fn ravel_all(items: Vec<Datum>) -> Vec<Datum> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        ravel_into(item, &mut out);
    }
    out
}

fn ravel_into(datum: Datum, out: &mut Vec<Datum>) {
    match datum {
        Datum::Seq(items) => {
            for item in items {
                ravel_into(item, out);
            }
        }
        leaf => out.push(leaf),
    }
}

/// Number of leaves [`ravel`] would produce, without allocating
#[must_use]
pub fn ravel_len(datum: &Datum) -> usize {
    match datum {
        Datum::Seq(items) => items.iter().map(ravel_len).sum(),
        _ => 1,
    }
}
