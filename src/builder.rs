use crate::error::{BoxDynError, Error};
use crate::flake::{to_flake_time, Internals, SharedFlake, GENERATE_MASK_SEQUENCE};
use crate::Flake;
use chrono::prelude::*;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Arc, Mutex};

/// A builder for building the ['Flake'] generator.
///
/// [`Flake`]: struct.Flake.html
pub struct Builder<'a> {
    start_time: Option<DateTime<Utc>>,
    machine_id: Option<&'a dyn Fn() -> Result<u16, BoxDynError>>,
    check_machine_id: Option<&'a dyn Fn(u16) -> bool>,
}

impl<'a> Default for Builder<'a> {
    fn default() -> Self {
        Builder::new()
    }
}

impl<'a> Builder<'a> {
    /// Construct a new builder for the build of ['Flake'].
    ///
    /// [`Flake`]: struct.Flake.html
    pub fn new() -> Self {
        Self {
            start_time: None,
            machine_id: None,
            check_machine_id: None,
        }
    }

    /// Set the start time.
    /// If the time is set later than the current time, 'finalize' will fail.
    pub fn start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = Some(start_time);
        self
    }

    /// Set the machine ID.
    /// If the provided closure returns an error, 'finalize' will fail.
    pub fn machine_id(mut self, machine_id: &'a dyn Fn() -> Result<u16, BoxDynError>) -> Self {
        self.machine_id = Some(machine_id);
        self
    }

    /// Set up a function to check the machine ID.
    /// If the function returns 'false', 'finalize' will fail.
    pub fn check_machine_id(mut self, check_machine_id: &'a dyn Fn(u16) -> bool) -> Self {
        self.check_machine_id = Some(check_machine_id);
        self
    }

    /// Finish building and create a Flake instance.
    /// This method will return an error if any of the configured functions
    /// return an error or if validation fails.
    pub fn finalize(self) -> Result<Flake, Error> {
        let start_time = if let Some(start_time) = self.start_time {
            if start_time > Utc::now() {
                return Err(Error::StartTimeAheadOfCurrentTime(start_time));
            }
            to_flake_time(start_time)
        } else {
            // Default start time
            to_flake_time(Utc.with_ymd_and_hms(2014, 9, 1, 0, 0, 0).unwrap())
        };

        let machine_id = if let Some(machine_id_fn) = self.machine_id {
            machine_id_fn().map_err(Error::MachineIdFailed)?
        } else {
            lower_16_bit_private_ip()?
        };

        if let Some(check_machine_id) = self.check_machine_id {
            if !check_machine_id(machine_id) {
                return Err(Error::CheckMachineIdFailed);
            }
        }

        let shared = Arc::new(SharedFlake {
            start_time,
            machine_id,
            internals: Mutex::new(Internals {
                elapsed_time: 0,
                // Start at the mask so the first id minted within tick zero
                // wraps to sequence 0.
                sequence: GENERATE_MASK_SEQUENCE,
            }),
        });
        Ok(Flake::new_inner(shared))
    }
}

/// Get the machine ID from the private IPv4 address.
/// Uses the lower 16 bits (the last two octets) as the identity.
fn lower_16_bit_private_ip() -> Result<u16, Error> {
    match private_ipv4() {
        Some(ip) => {
            let octets = ip.octets();
            Ok(u16::from(octets[2]) << 8 | u16::from(octets[3]))
        }
        None => Err(Error::NoPrivateIPv4),
    }
}

fn private_ipv4() -> Option<Ipv4Addr> {
    pnet_datalink::interfaces()
        .iter()
        .filter(|iface| iface.is_up() && !iface.is_loopback() && !iface.ips.is_empty())
        .flat_map(|iface| iface.ips.iter())
        .find_map(|network| match network.ip() {
            IpAddr::V4(ipv4) if is_private_ipv4(&ipv4) => Some(ipv4),
            _ => None,
        })
}

fn is_private_ipv4(ip: &Ipv4Addr) -> bool {
    let octets = ip.octets();
    matches!(octets[0], 10)
        || (octets[0] == 172 && (16..=31).contains(&octets[1]))
        || (octets[0] == 192 && octets[1] == 168)
}
