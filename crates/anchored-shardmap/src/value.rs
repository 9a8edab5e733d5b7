use std::sync::Arc;


/// Values which may be stored in a [`ShardedSkiplist`].
///
/// The map has no representation for a key which is present but maps to nothing, so inserting an
/// empty value is silently ignored rather than stored. This keeps "absent" and "present"
/// unambiguous: a successful search always yields a non-empty value.
///
/// [`ShardedSkiplist`]: crate::ShardedSkiplist
pub trait MapValue {
    /// Whether this value is empty or absent, and must therefore not be stored.
    #[must_use]
    fn is_empty_value(&self) -> bool;
}

impl<T> MapValue for Option<T> {
    #[inline]
    fn is_empty_value(&self) -> bool {
        self.is_none()
    }
}

impl<T> MapValue for Vec<T> {
    #[inline]
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T> MapValue for Box<[T]> {
    #[inline]
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T> MapValue for Arc<[T]> {
    #[inline]
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T> MapValue for &[T] {
    #[inline]
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl MapValue for String {
    #[inline]
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl MapValue for Box<str> {
    #[inline]
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl MapValue for Arc<str> {
    #[inline]
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl MapValue for &str {
    #[inline]
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}
