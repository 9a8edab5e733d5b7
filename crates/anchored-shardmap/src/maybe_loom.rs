#[cfg(shardmap_loom)]
pub(crate) use loom::sync::atomic::AtomicUsize as AtomicUsize;
#[cfg(shardmap_loom)]
pub(crate) use self::loom_rwlock::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[cfg(not(shardmap_loom))]
pub(crate) use std::sync::atomic::AtomicUsize as AtomicUsize;
#[cfg(not(shardmap_loom))]
pub(crate) use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};


/// Gives `loom`'s `RwLock` the non-poisoning interface of `parking_lot`'s.
#[cfg(shardmap_loom)]
mod loom_rwlock {
    pub(crate) use loom::sync::{RwLockReadGuard, RwLockWriteGuard};


    pub(crate) struct RwLock<T>(loom::sync::RwLock<T>);

    impl<T> RwLock<T> {
        pub(crate) fn new(data: T) -> Self {
            Self(loom::sync::RwLock::new(data))
        }

        #[expect(clippy::unwrap_used, reason = "poison errors can only occur after/during a panic")]
        pub(crate) fn read(&self) -> RwLockReadGuard<'_, T> {
            self.0.read().unwrap()
        }

        #[expect(clippy::unwrap_used, reason = "poison errors can only occur after/during a panic")]
        pub(crate) fn write(&self) -> RwLockWriteGuard<'_, T> {
            self.0.write().unwrap()
        }
    }
}
