//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `HeaderId` where a
//! `LineId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(HeaderId, "Unique identifier for a transaction header.");
typed_id!(LineId, "Unique identifier for a transaction line.");
typed_id!(
    NominalTransactionId,
    "Unique identifier for a posted nominal ledger row."
);
typed_id!(
    VatTransactionId,
    "Unique identifier for a posted VAT ledger row."
);
typed_id!(
    NominalAccountId,
    "Unique identifier for a chart of accounts entry."
);
typed_id!(VatCodeId, "Unique identifier for a VAT code.");
typed_id!(FinancialYearId, "Unique identifier for a financial year.");
typed_id!(PeriodId, "Unique identifier for a period.");
typed_id!(MatchId, "Unique identifier for a match allocation.");
