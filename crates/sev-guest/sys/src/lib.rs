// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Definitions mirroring the Linux `sev-guest` driver uapi
//! (`include/uapi/linux/sev-guest.h`).

#![allow(non_camel_case_types)]

pub mod ioctls;
mod structs;

pub use ioctls::*;
pub use structs::*;

/// Path at which the Linux `sev-guest` driver exposes its device node.
pub const SEV_GUEST_DEV_PATH: &str = "/dev/sev-guest";

/// The only message version understood by the driver.
pub const SNP_GUEST_REQ_MSG_VERSION: u8 = 1;

/// Size of the user-provided data included in an attestation report.
pub const SNP_REPORT_USER_DATA_SIZE: usize = 64;

/// Size of the response buffer the driver fills for report requests.
pub const SNP_REPORT_RESP_SIZE: usize = 4000;

/// Size of the key returned by `SNP_GET_DERIVED_KEY`.
pub const SNP_DERIVED_KEY_RESP_SIZE: usize = 64;

/// VMM error codes, reported in the upper 32 bits of `exitinfo2`.
pub const SNP_GUEST_VMM_ERR_INVALID_LEN: u32 = 1;
pub const SNP_GUEST_VMM_ERR_BUSY: u32 = 2;
