// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::os::raw::c_ulong;

use crate::structs::snp_guest_request_ioctl;

pub const SNP_GUEST_REQ_IOC_TYPE: u8 = b'S';

const GUEST_REQ_SZ: usize = std::mem::size_of::<snp_guest_request_ioctl>();

pub const SNP_GET_REPORT: c_ulong =
    nix::request_code_readwrite!(SNP_GUEST_REQ_IOC_TYPE, 0x0, GUEST_REQ_SZ)
        as c_ulong;
pub const SNP_GET_DERIVED_KEY: c_ulong =
    nix::request_code_readwrite!(SNP_GUEST_REQ_IOC_TYPE, 0x1, GUEST_REQ_SZ)
        as c_ulong;
pub const SNP_GET_EXT_REPORT: c_ulong =
    nix::request_code_readwrite!(SNP_GUEST_REQ_IOC_TYPE, 0x2, GUEST_REQ_SZ)
        as c_ulong;
