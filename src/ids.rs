use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Declares a string-backed identifier newtype.
///
/// Fixture ids such as `"1"` are kept verbatim; ids minted at runtime are
/// random v4 UUIDs rendered as strings.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing identifier
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Mint a fresh random identifier
            #[must_use]
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Borrow the identifier as a string slice
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }
    };
}

string_id!(
    /// Identifies a book in the catalog
    BookId
);
string_id!(
    /// Identifies a library member
    MemberId
);
string_id!(
    /// Identifies a lending record in the ledger
    RecordId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_ids_are_kept_verbatim() {
        let id = BookId::from("1");
        assert_eq!(id.as_str(), "1");
        assert_eq!(id.to_string(), "1");
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(RecordId::generate(), RecordId::generate());
    }

    #[test]
    fn ids_serialize_as_plain_strings() -> Result<(), serde_json::Error> {
        let json = serde_json::to_string(&MemberId::new("42"))?;
        assert_eq!(json, "\"42\"");
        Ok(())
    }
}
