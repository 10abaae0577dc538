//! Opaque UUID identifiers.
//!
//! [`uuid_id!`] declares a `Copy` newtype over a v4 UUID that serializes as the
//! bare UUID string. Both crates declare their ids through it.

#[doc(hidden)]
pub use uuid::Uuid as __Uuid;

/// Declare an identifier newtype. The calling crate must depend on `serde`.
#[macro_export]
macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name($crate::ids::__Uuid);

        impl $name {
            /// Create a new random ID.
            pub fn new() -> Self {
                Self($crate::ids::__Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

uuid_id!(
    /// Stable identity of an event producer. Two events of one step with the same
    /// id are a protocol error.
    ActorId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_ids_are_distinct() {
        assert_ne!(ActorId::new(), ActorId::new());
    }

    #[test]
    fn test_serializes_as_bare_uuid() {
        let id = ActorId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
        assert_eq!(serde_json::from_str::<ActorId>(&json).unwrap(), id);
    }
}
