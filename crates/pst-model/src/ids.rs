//! String identifiers for scenario entities
//!
//! Identifiers are assigned by the scenario provider, so they are plain
//! strings on the wire. Newtypes keep a node id from being passed where a
//! topic id is expected.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create identifier from any string-like value
            #[inline]
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw identifier
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.pad(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Unique scenario identifier
    ScenarioId
);

string_id!(
    /// Identifier of the event a scenario is built around
    EventId
);

string_id!(
    /// Research-question identifier, unique within a scenario
    TopicId
);

string_id!(
    /// Source node identifier, unique within a scenario
    NodeId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_bare_strings() {
        let id = NodeId::new("n1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"n1\"");

        let back: NodeId = serde_json::from_str("\"lost_oral\"").unwrap();
        assert_eq!(back.as_str(), "lost_oral");
    }

    #[test]
    fn ids_display_raw_value() {
        assert_eq!(TopicId::from("t_raid").to_string(), "t_raid");
    }
}
