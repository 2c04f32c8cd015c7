//! Macros for defining typed ID types.

/// Macro to define a typed ID with a specific prefix.
///
/// This generates a newtype wrapper around the canonical string form with:
/// - A `PREFIX` constant
/// - `new()` to generate a fresh ID with a ULID suffix
/// - `parse()` to parse from string with strict prefix checking
/// - `Display` and `FromStr` implementations
/// - `Serialize` and `Deserialize` implementations (string form, usable as
///   JSON object keys)
/// - `Ord`, `Hash`, and other standard traits
///
/// `parse()` accepts any non-empty alphanumeric suffix, not just ULIDs:
/// earlier storage-schema revisions generated random hex suffixes and those
/// IDs must survive a load/save cycle unchanged.
///
/// # Example
///
/// ```ignore
/// define_id!(TrackerId, "trk");
/// define_id!(BreakdownId, "bd");
///
/// let id = TrackerId::new();
/// let parsed: TrackerId = "trk_01HV4Z2WQXKJNM8GPQY6VBKC3D".parse()?;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        /// A typed ID for this record kind.
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// The prefix for this ID type.
            pub const PREFIX: &'static str = $prefix;

            /// Creates a new ID with a fresh ULID suffix.
            #[must_use]
            pub fn new() -> Self {
                Self(format!("{}_{}", Self::PREFIX, $crate::Ulid::new()))
            }

            /// Parses an ID from a string.
            ///
            /// The string must be in the format `{prefix}_{suffix}` where the
            /// suffix is non-empty and alphanumeric.
            pub fn parse(s: &str) -> Result<Self, $crate::IdError> {
                if s.is_empty() {
                    return Err($crate::IdError::Empty);
                }

                let Some((prefix, suffix)) = s.split_once('_') else {
                    return Err($crate::IdError::MissingSeparator);
                };

                if prefix != Self::PREFIX {
                    return Err($crate::IdError::InvalidPrefix {
                        expected: Self::PREFIX,
                        actual: prefix.to_string(),
                    });
                }

                if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_alphanumeric()) {
                    return Err($crate::IdError::InvalidSuffix {
                        actual: suffix.to_string(),
                    });
                }

                Ok(Self(s.to_string()))
            }

            /// Returns the canonical string form.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns the timestamp portion of a ULID suffix in
            /// milliseconds. Legacy suffixes are not ULIDs and carry no
            /// timestamp.
            #[must_use]
            pub fn timestamp_ms(&self) -> Option<u64> {
                let (_, suffix) = self.0.split_once('_')?;
                let ulid: $crate::Ulid = suffix.parse().ok()?;
                Some(ulid.timestamp_ms())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Self::parse(&s).map_err(serde::de::Error::custom)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}
