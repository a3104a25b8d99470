//! Record partitions

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// One of the named partitions of a result record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    /// Classification tags restricted to the entity vocabulary
    Tags,
    /// Free-form metadata
    Metadata,
    /// Image path references
    Images,
    /// Scalar values
    Vals,
    /// Report path references
    Reports,
}

impl Group {
    /// All groups in canonical order
    pub const ALL: [Group; 5] = [
        Group::Tags,
        Group::Metadata,
        Group::Images,
        Group::Vals,
        Group::Reports,
    ];

    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tags => "tags",
            Self::Metadata => "metadata",
            Self::Images => "images",
            Self::Vals => "vals",
            Self::Reports => "reports",
        }
    }
}

impl Display for Group {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Group {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|group| group.as_str() == s)
            .ok_or_else(|| ModelError::UnknownGroup(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roundtrips_names() {
        for group in Group::ALL {
            assert_eq!(group.as_str().parse::<Group>().unwrap(), group);
        }
    }

    #[test]
    fn unknown_group_is_rejected() {
        let err = "figures".parse::<Group>().unwrap_err();
        assert_eq!(err.to_string(), "unknown record group: 'figures'");
    }
}
