//! Service identity keys.

use std::any::TypeId;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of a service contract.
///
/// A key is built from the contract type itself, which may be a concrete
/// type (`Database`) or a trait object (`dyn Logger`). Both live in the same
/// identity space, so a contract is registered and requested with the same
/// type in either case.
///
/// Equality and hashing use the `TypeId` only; the type name is carried for
/// diagnostics and error messages.
///
/// # Examples
///
/// ```rust
/// use ferrule::Key;
///
/// trait Logger: Send + Sync {}
///
/// let string_key = Key::of::<String>();
/// let logger_key = Key::of::<dyn Logger>();
///
/// assert_eq!(string_key, Key::of::<String>());
/// assert_ne!(string_key, logger_key);
/// assert_eq!(string_key.display_name(), "alloc::string::String");
/// assert!(logger_key.display_name().contains("Logger"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Key {
    id: TypeId,
    name: &'static str,
}

impl Key {
    /// Key for the contract type `S`.
    #[inline(always)]
    pub fn of<S: ?Sized + 'static>() -> Self {
        Key {
            id: TypeId::of::<S>(),
            name: std::any::type_name::<S>(),
        }
    }

    /// Get the type or trait name for display
    pub fn display_name(&self) -> &'static str {
        self.name
    }

    /// The `TypeId` of the contract type.
    pub fn type_id(&self) -> TypeId {
        self.id
    }
}

impl PartialEq for Key {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Key {}

impl Hash for Key {
    #[inline(always)]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

// Name first so sorted diagnostics read alphabetically; TypeId breaks ties
impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(other.name).then_with(|| self.id.cmp(&other.id))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Helper for creating keys, mirrors [`Key::of`].
#[inline(always)]
pub fn key_of<S: ?Sized + 'static>() -> Key {
    Key::of::<S>()
}
