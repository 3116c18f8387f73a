// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Access to the `sev-guest` device through which an SEV-SNP guest sends
//! requests (attestation reports, derived keys) to the AMD secure processor.
//!
//! This crate only relays requests: building their payloads and making sense
//! of the responses is left to the caller.

use std::os::raw::{c_int, c_ulong};
use std::path::Path;

mod abi;
pub mod config;
mod device;
mod error;
mod request;

#[cfg(test)]
mod sim;

pub use abi::{HostKernel, Kernel};
pub use device::LinuxDevice;
pub use error::{Error, Result};
pub use request::{ControlRequest, SnpUserGuestRequest};

pub use sev_guest_sys as sys;

/// A device through which guest requests can be issued.
pub trait Device {
    /// Open the device node at `path` for reading and writing.
    ///
    /// On failure the device is left unopened.
    fn open(&mut self, path: &Path) -> Result<()>;

    /// Release the device.  Closing a device which is not open succeeds
    /// without doing anything.
    fn close(&mut self) -> Result<()>;

    /// Issue ioctl `cmd` carrying `req`.
    ///
    /// Payloads a device does not know how to relay are refused with
    /// [`Error::UnsupportedRequest`] before anything reaches the kernel.
    /// Request payloads must not embed userspace addresses (as
    /// `SNP_GET_EXT_REPORT` does for its certificate buffer), since the
    /// kernel would copy out through them unchecked.
    fn ioctl(&mut self, cmd: c_ulong, req: ControlRequest<'_>) -> Result<c_int>;
}
