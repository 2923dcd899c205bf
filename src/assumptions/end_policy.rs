//! Precedence between an item's explicit end age and its "ends at retirement" flag

use serde::{Deserialize, Serialize};

/// Which cutoff wins when an income or expense carries both an end age and
/// the ends-at-retirement flag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EndPrecedence {
    /// The earlier of the two cutoffs applies
    #[default]
    Earliest,
    /// The explicit end age applies; the retirement flag is only used when no end age is set
    EndAge,
    /// The retirement cutoff applies whenever the flag is set and a retirement age is known
    Retirement,
}

impl EndPrecedence {
    /// Resolve the last age at which an item is still active.
    ///
    /// `retirement_cutoff` is the scenario retirement age when the item ends at
    /// retirement, or `None` when the flag is off or no retirement age is known.
    /// Returns `None` when the item never ends within the projection.
    pub fn effective_cutoff(self, end_age: Option<u32>, retirement_cutoff: Option<u32>) -> Option<u32> {
        match (end_age, retirement_cutoff) {
            (None, None) => None,
            (Some(end), None) => Some(end),
            (None, Some(retire)) => Some(retire),
            (Some(end), Some(retire)) => match self {
                EndPrecedence::Earliest => Some(end.min(retire)),
                EndPrecedence::EndAge => Some(end),
                EndPrecedence::Retirement => Some(retire),
            },
        }
    }
}
