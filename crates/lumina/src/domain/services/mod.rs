//! Domain Services
//!
//! Stateless rules over domain entities. Scoring and ranking are pure
//! functions of their inputs; the progression, economy and throttle rules take
//! a `Character` snapshot and return the next one, leaving persistence to the
//! caller.

pub mod achievements;
pub mod economy;
pub mod progression;
pub mod ranking;
pub mod scoring;
pub mod tags;
pub mod throttle;

pub use achievements::Badge;
pub use ranking::ScoredBook;
pub use throttle::DailyThrottle;
