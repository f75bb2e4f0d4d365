//! Resource identifiers.
//!
//! The backend hands out integer keys, but nothing in the client depends
//! on that, so identifiers are kept as opaque text and accept either JSON
//! numbers or strings.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, ErrorKind};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Integer(i64),
    Text(String),
}

/// Identifiers end up as a single URL path segment, so only ASCII letters,
/// digits, `-` and `_` are accepted.
fn is_valid_id(text: &str) -> bool {
    !text.is_empty()
        && text
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

macro_rules! resource_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        ///
        /// Equality and ordering look only at the text; whether the backend
        /// sent a number or a string is remembered for serialization.
        #[derive(Debug, Clone)]
        pub struct $name {
            text: String,
            numeric: bool,
        }

        impl $name {
            /// Returns the identifier as it appears in URLs.
            pub fn as_str(&self) -> &str {
                &self.text
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.text == other.text
            }
        }

        impl Eq for $name {}

        impl std::hash::Hash for $name {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                self.text.hash(state);
            }
        }

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> std::cmp::Ordering {
                self.text.cmp(&other.text)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self {
                    text: value.to_string(),
                    numeric: true,
                }
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if !is_valid_id(trimmed) {
                    return Err(ErrorKind::InvalidInput
                        .with_message(format!("invalid {} '{s}'", stringify!($name))));
                }
                Ok(Self {
                    text: trimmed.to_owned(),
                    numeric: false,
                })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.text)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                if self.numeric
                    && let Ok(number) = self.text.parse::<i64>()
                {
                    return serializer.serialize_i64(number);
                }
                serializer.serialize_str(&self.text)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                match RawId::deserialize(deserializer)? {
                    RawId::Integer(number) => Ok(Self::from(number)),
                    RawId::Text(text) if is_valid_id(&text) => Ok(Self {
                        text,
                        numeric: false,
                    }),
                    RawId::Text(text) => Err(D::Error::custom(format_args!(
                        "invalid {} '{text}'",
                        stringify!($name)
                    ))),
                }
            }
        }
    };
}

resource_id! {
    /// Identifier of a template.
    TemplateId
}

resource_id! {
    /// Identifier of a submitted form.
    FormId
}
