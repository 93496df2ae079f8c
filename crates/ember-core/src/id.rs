//! Scene object identifiers

use std::fmt;

/// Identifier of an object registered with a scene.
///
/// Ids are handed out by the scene in strictly increasing order and are
/// never reused, so a stale id can only ever miss; it cannot alias a newer
/// object.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Create an ObjectId from a raw value
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// The id that follows this one
    pub const fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_ordered() {
        let a = ObjectId::from_raw(1);
        let b = a.next();
        assert!(b > a);
        assert_eq!(b, ObjectId::from_raw(2));
    }

    #[test]
    fn display_format() {
        assert_eq!(ObjectId::from_raw(7).to_string(), "#7");
        assert_eq!(format!("{:?}", ObjectId::from_raw(7)), "ObjectId(7)");
    }
}
