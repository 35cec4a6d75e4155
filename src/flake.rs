use crate::builder::Builder;
use crate::error::*;
use chrono::prelude::*;
use std::{
    sync::{Arc, Mutex},
    thread,
    time::Duration,
};

/// bit length of time
pub(crate) const BIT_LEN_TIME: u64 = 39;
/// bit length of sequence number
pub(crate) const BIT_LEN_SEQUENCE: u64 = 8;
/// bit length of machine id
pub(crate) const BIT_LEN_MACHINE_ID: u64 = 63 - BIT_LEN_TIME - BIT_LEN_SEQUENCE;
/// mask for sequence number
pub(crate) const GENERATE_MASK_SEQUENCE: u16 = (1 << BIT_LEN_SEQUENCE) - 1;

/// Internals of Flake.
/// This struct is not exposed to the public.
#[derive(Debug)]
pub(crate) struct Internals {
    pub(crate) elapsed_time: i64,
    pub(crate) sequence: u16,
}

/// SharedFlake is shared between Flake handles.
/// This struct is not exposed to the public.
pub(crate) struct SharedFlake {
    pub(crate) start_time: i64,
    pub(crate) machine_id: u16,
    pub(crate) internals: Mutex<Internals>,
}

/// Flake is a distributed unique ID generator.
/// It is thread-safe and can be cloned to be used in multiple threads.
pub struct Flake(pub(crate) Arc<SharedFlake>);

impl Flake {
    /// Create a new Flake with the default configuration.
    /// For custom configuration see [`builder`].
    ///
    /// [`builder`]: struct.Flake.html#method.builder
    pub fn new() -> Result<Self, Error> {
        Builder::new().finalize()
    }

    /// Create a new [`Builder`] to construct a Flake.
    ///
    /// [`Builder`]: struct.Builder.html
    pub fn builder<'a>() -> Builder<'a> {
        Builder::new()
    }

    pub(crate) fn new_inner(shared: Arc<SharedFlake>) -> Self {
        Self(shared)
    }

    /// Generate the next unique id.
    /// After the Flake time overflows, next_id returns an error.
    pub fn next_id(&self) -> Result<u64, Error> {
        let mut internals = self.0.internals.lock().map_err(|_| Error::MutexPoisoned)?;

        let current = current_elapsed_time(self.0.start_time);
        if internals.elapsed_time < current {
            internals.elapsed_time = current;
            internals.sequence = 0;
        } else {
            // self.elapsed_time >= current
            internals.sequence = (internals.sequence + 1) & GENERATE_MASK_SEQUENCE;
            if internals.sequence == 0 {
                // The sequence space of the current tick is exhausted. Claim
                // the next tick and sleep out the remainder inside the
                // critical section so no other caller can reuse it.
                internals.elapsed_time += 1;
                let overtime = internals.elapsed_time - current;
                thread::sleep(sleep_time(overtime));
            }
        }

        if internals.elapsed_time >= 1 << BIT_LEN_TIME {
            return Err(Error::OverTimeLimit);
        }

        Ok((internals.elapsed_time as u64) << (BIT_LEN_SEQUENCE + BIT_LEN_MACHINE_ID)
            | (internals.sequence as u64) << BIT_LEN_MACHINE_ID
            | (self.0.machine_id as u64))
    }
}

/// Returns a new `Flake` referencing the same state as `self`.
/// This is used for concurrent use.
impl Clone for Flake {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

const FLAKE_TIME_UNIT: i64 = 10_000_000; // nanoseconds, i.e. 10 msec

/// Convert a `DateTime<Utc>` to a Flake time.
/// The time is the number of 10 msec units since the start time.
pub(crate) fn to_flake_time(time: DateTime<Utc>) -> i64 {
    time.timestamp_nanos_opt().unwrap() / FLAKE_TIME_UNIT
}

/// Returns the current elapsed time in 10 msec units.
fn current_elapsed_time(start_time: i64) -> i64 {
    to_flake_time(Utc::now()) - start_time
}

/// Returns the time to sleep until the claimed tick has actually passed.
fn sleep_time(overtime: i64) -> Duration {
    Duration::from_millis(overtime as u64 * 10)
        - Duration::from_nanos(
            (Utc::now().timestamp_nanos_opt().unwrap() % FLAKE_TIME_UNIT) as u64,
        )
}

/// DecomposedFlake is the parts of a Flake ID.
pub struct DecomposedFlake {
    pub id: u64,
    pub msb: u64,
    pub time: u64,
    pub sequence: u64,
    pub machine_id: u64,
}

impl DecomposedFlake {
    /// Returns the timestamp in nanoseconds without an epoch.
    pub fn nanos_time(&self) -> i64 {
        (self.time as i64) * FLAKE_TIME_UNIT
    }
}

/// The mask to decompose the sequence number.
const DECOMPOSE_MASK_SEQUENCE: u64 = ((1 << BIT_LEN_SEQUENCE) - 1) << BIT_LEN_MACHINE_ID;
/// The mask for machine ID.
const MASK_MACHINE_ID: u64 = (1 << BIT_LEN_MACHINE_ID) - 1;

/// Break a Flake ID up into its parts.
pub fn decompose(id: u64) -> DecomposedFlake {
    DecomposedFlake {
        id,
        msb: id >> 63,
        time: id >> (BIT_LEN_SEQUENCE + BIT_LEN_MACHINE_ID),
        sequence: (id & DECOMPOSE_MASK_SEQUENCE) >> BIT_LEN_MACHINE_ID,
        machine_id: id & MASK_MACHINE_ID,
    }
}
