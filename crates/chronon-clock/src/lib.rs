//! Stopwatch-style timing built on chronon time sources.
//!
//! - **Clock** ([`clock`]): elapsed time since a start reading, with restart
//! - **Tick counter** ([`tick_counter`]): detects when a period has passed
//!   and reports the tick rate of the interval that just ended
//!
//! # Example
//!
//! ```
//! use chronon_clock::{Clock, TickCounter};
//! use chronon_core::Duration;
//!
//! let mut clock = Clock::new();
//! let lap = clock.restart();
//! assert!(!lap.is_negative());
//!
//! let mut counter = TickCounter::new();
//! let period = Duration::from_milliseconds_i32(100);
//! if counter.update(period) {
//!     println!("{:.1} ticks/s", counter.tick_rate());
//! }
//! ```

pub mod clock;
pub mod tick_counter;

pub use clock::Clock;
pub use tick_counter::TickCounter;
