// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{
    SNP_DERIVED_KEY_RESP_SIZE, SNP_REPORT_RESP_SIZE, SNP_REPORT_USER_DATA_SIZE,
};

/// Argument to every `sev-guest` ioctl.
///
/// `req_data` and `resp_data` hold userspace addresses of the
/// command-specific request and response structures.  The kernel writes the
/// firmware (low 32 bits) and VMM (high 32 bits) error codes to `exitinfo2`.
#[repr(C)]
#[derive(Copy, Clone, Default, Debug)]
pub struct snp_guest_request_ioctl {
    pub msg_version: u8,
    pub req_data: u64,
    pub resp_data: u64,
    pub exitinfo2: u64,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct snp_report_req {
    /// Guest-provided data to be included in the report
    pub user_data: [u8; SNP_REPORT_USER_DATA_SIZE],
    /// VMPL level to be included in the report
    pub vmpl: u32,
    pub rsvd: [u8; 28],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct snp_report_resp {
    pub data: [u8; SNP_REPORT_RESP_SIZE],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct snp_derived_key_req {
    pub root_key_select: u32,
    pub rsvd: u32,
    pub guest_field_select: u64,
    pub vmpl: u32,
    pub guest_svn: u32,
    pub tcb_version: u64,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct snp_derived_key_resp {
    pub data: [u8; SNP_DERIVED_KEY_RESP_SIZE],
}
