//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Every entity in the engine has a strongly-typed ID to prevent
//! accidental mixing of identifiers at compile time. All IDs use UUID v7
//! (time-ordered) so that insertion order roughly matches sort order in
//! the keyed stores.
//!
//! The `new()` constructors exist for app-side generation (blueprint
//! authoring, node instantiation, tests, seed data).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Identifier for a reusable resource node blueprint.
    BlueprintId
}

define_id! {
    /// Identifier for a concrete, location-bound resource node instance.
    NodeId
}

define_id! {
    /// Identifier for a resource type (owned by the external registry).
    ResourceId
}

define_id! {
    /// Identifier for a world location (owned by the external location
    /// subsystem).
    LocationId
}

define_id! {
    /// Identifier for a content theme a resource link may belong to.
    ThemeId
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = NodeId::new();
        let b = NodeId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn id_roundtrips_through_uuid() {
        let id = BlueprintId::new();
        let uuid: Uuid = id.into();
        assert_eq!(BlueprintId::from(uuid), id);
    }

    #[test]
    fn id_serializes_as_bare_uuid() {
        let id = ResourceId::new();
        let json = serde_json::to_string(&id).unwrap();
        let uuid_json = serde_json::to_string(&id.into_inner()).unwrap();
        assert_eq!(json, uuid_json);
    }

    #[test]
    fn display_matches_inner_uuid() {
        let id = LocationId::new();
        assert_eq!(id.to_string(), id.into_inner().to_string());
    }
}
