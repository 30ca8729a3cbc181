use std::fmt;
use std::ops::Deref;

use tokio::sync::watch;

/// A value that can be read and written through shared references.
/// Clones refer to the same underlying value, so a write is seen by every tree holding the config.
#[derive(Clone)]
pub struct Setting<T> {
    rx: watch::Receiver<T>,
    tx: watch::Sender<T>,
}

impl<T: Default> Default for Setting<T> {
    fn default() -> Self {
        Self::new(Default::default())
    }
}

impl<T: PartialEq> PartialEq<T> for Setting<T> {
    #[inline]
    fn eq(&self, other: &T) -> bool {
        *self.read() == *other
    }
}

impl<T: fmt::Debug> fmt::Debug for Setting<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.read(), f)
    }
}

impl<T> Setting<T> {
    pub fn new(value: T) -> Self {
        let (tx, rx) = watch::channel(value);
        Self { rx, tx }
    }

    #[inline]
    pub fn read(&self) -> impl Deref<Target = T> + '_ {
        self.rx.borrow()
    }

    #[inline]
    pub fn write(&self, value: T) {
        self.tx.send_replace(value);
    }
}

impl<T: Copy> Setting<T> {
    #[inline]
    pub fn get(&self) -> T {
        *self.read()
    }
}

/// Which child `redo` follows at a branch point with no recorded preference.
///
/// Every insert and branch switch records a preference, so this only matters for imported states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackBranch {
    /// The most recently created child.
    #[default]
    Newest,
    /// The first child ever created.
    Oldest,
}

/// Configuration shared between undo trees.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of reconstructed texts to memoize, `0` disables memoization.
    pub text_cache_capacity: Setting<usize>,
    pub fallback_branch: Setting<FallbackBranch>,
}

impl Default for Config {
    fn default() -> Self {
        Self { text_cache_capacity: Setting::new(32), fallback_branch: Setting::default() }
    }
}
