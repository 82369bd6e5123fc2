//! The property service contract.

use crate::ds::cache::LookupCache;
use crate::ds::error::PropertyError;
use crate::ds::value::Value;

/// Reads and writes values through property paths.
///
/// Implementations differ in how they evaluate a path, never in what a path
/// means, so any backend can stand in for another.
pub trait PropertyService: Send + Sync {
    /// Return the value at `path` on `target`.
    ///
    /// A `Null` met along the way ends the walk and is returned as is.
    fn read(&self, target: &Value, path: &str) -> Result<Value, PropertyError>;

    /// Like [`read`](Self::read), consulting and filling a call-scoped cache
    /// first.
    fn read_with_cache(
        &self,
        target: &Value,
        path: &str,
        _cache: &mut LookupCache,
    ) -> Result<Value, PropertyError> {
        self.read(target, path)
    }

    /// Store `value` at `path` on `target`.
    ///
    /// If an intermediate segment resolves to `Null` nothing is written and
    /// no error is raised.
    fn write(&self, target: &Value, path: &str, value: Value) -> Result<(), PropertyError>;

    /// Release cached state. The service stays usable.
    fn on_destroy(&self) {}

    /// Human-readable name for this backend (for debugging/logging).
    fn name(&self) -> &str;
}
