//! A distributed unique ID generator inspired by [Twitter's Snowflake].
//!
//! Each generator independently mints 64-bit integers that are globally
//! unique and monotonically increasing within one instance, without any
//! cross-node coordination. An id packs a 39-bit time field (10 msec units),
//! an 8-bit sequence number and a 16-bit machine id, leaving the sign bit
//! zero.
//!
//! ## Quickstart
//!
//! Add the following to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! flakeid = "0.1"
//! ```
//!
//! Use the library like this:
//!
//! ```
//! use flakeid::Flake;
//!
//! let sf = Flake::builder().machine_id(&|| Ok(1)).finalize().unwrap();
//! let next_id = sf.next_id().unwrap();
//! println!("{}", next_id);
//! ```
//!
//! With no explicit machine id, `Flake::new()` derives one from the lower
//! 16 bits of the host's private IPv4 address and fails if none exists.
//!
//! ## Concurrent use
//!
//! Flake is thread-safe. `clone` it before moving to another thread:
//! ```
//! use flakeid::Flake;
//! use std::thread;
//!
//! let sf = Flake::builder().machine_id(&|| Ok(1)).finalize().unwrap();
//!
//! let mut children = Vec::new();
//! for _ in 0..10 {
//!     let thread_sf = sf.clone();
//!     children.push(thread::spawn(move || {
//!         println!("{}", thread_sf.next_id().unwrap());
//!     }));
//! }
//!
//! for child in children {
//!     child.join().unwrap();
//! }
//! ```
//!
//! [Twitter's Snowflake]: https://blog.twitter.com/2010/announcing-snowflake

mod builder;
mod error;
mod flake;
mod keygen;

pub use crate::flake::*;
pub use builder::*;
pub use error::*;
pub use keygen::*;
