//! Shared cache abstraction used for session pins, cooldown markers and reset grants.

mod traits;

pub use traits::CacheServiceTrait;

#[cfg(test)]
pub mod mock;
#[cfg(test)]
pub use mock::MockCacheService;
