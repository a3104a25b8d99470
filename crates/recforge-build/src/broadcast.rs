//! Broadcasting
//!
//! Inputs arrive at different cardinalities: one value for every unit, one
//! value per unit, or one inner sequence per group of units. The
//! [`BroadcastProfile`] computed over all participating fields says how many
//! records to build (`maxlen`) and, for ragged inputs, how wide each group is
//! (`nbroadcast`). [`BroadcastProfile::align`] then stretches every field to
//! exactly `maxlen` per-record values.

use crate::error::{BuildError, BuildResult};
use crate::fields::FieldEntry;
use crate::ravel::{ravel_all, ravel_len};
use recforge_model::Datum;

/// Target cardinality of one construction call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastProfile {
    /// Number of records to build, at least 1
    pub maxlen: usize,
    /// Inner length of each ragged group, when ragged inputs are present
    pub nbroadcast: Option<Vec<usize>>,
}

impl Default for BroadcastProfile {
    fn default() -> Self {
        Self {
            maxlen: 1,
            nbroadcast: None,
        }
    }
}

impl BroadcastProfile {
    /// Resolve profile over all entries not marked exempt
    pub fn resolve<'a, I, F>(entries: I, is_exempt: F) -> Self
    where
        I: IntoIterator<Item = &'a FieldEntry>,
        F: Fn(&FieldEntry) -> bool,
    {
        let mut profile = Self::default();
        for entry in entries {
            if is_exempt(entry) {
                continue;
            }
            profile.observe(&entry.value);
        }
        profile
    }

    /// Fold one field value into the profile
    pub fn observe(&mut self, value: &Datum) {
        let Some(items) = value.as_seq() else {
            return;
        };

        let size = if value.is_ragged() {
            let lens: Vec<usize> = items.iter().map(Datum::len).collect();
            self.nbroadcast = Some(match self.nbroadcast.take() {
                None => lens,
                Some(prev) => prev
                    .iter()
                    .zip(&lens)
                    .map(|(a, b)| (*a).max(*b))
                    .collect(),
            });
            ravel_len(value)
        } else {
            items.len()
        };

        self.maxlen = self.maxlen.max(size);
    }

    /// Stretch a field value to exactly `maxlen` per-record values
    ///
    /// Exempt fields keep their elements intact; all others are flattened.
    ///
    /// # Errors
    /// Returns [`BuildError::LengthMismatch`] if the value cannot be
    /// broadcast to `maxlen`
    pub fn align(&self, name: &str, value: Datum, exempt: bool) -> BuildResult<Vec<Datum>> {
        let maxlen = self.maxlen;
        let items = match value {
            Datum::Seq(items) => items,
            scalar => vec![scalar],
        };

        let measured = if exempt {
            items.len()
        } else {
            items.iter().map(ravel_len).sum()
        };

        let items = if items.is_empty() {
            vec![Datum::null(); maxlen]
        } else if measured == maxlen {
            items
        } else if items.len() == 1 {
            vec![items[0].clone(); maxlen]
        } else {
            match &self.nbroadcast {
                Some(widths) if items.len() == widths.len() && items.len() < maxlen => {
                    Self::replicate_per_group(items, widths)
                }
                _ => return Err(BuildError::length_mismatch(name, measured, maxlen)),
            }
        };

        let column = if exempt { items } else { ravel_all(items) };
        if column.len() != maxlen {
            return Err(BuildError::length_mismatch(name, column.len(), maxlen));
        }
        Ok(column)
    }

    /// Repeat element `i` `widths[i]` times, in order
    fn replicate_per_group(items: Vec<Datum>, widths: &[usize]) -> Vec<Datum> {
        let total = widths.iter().sum();
        let mut out = Vec::with_capacity(total);
        for (item, &width) in items.into_iter().zip(widths) {
            out.extend(std::iter::repeat(item).take(width));
        }
        out
    }
}
