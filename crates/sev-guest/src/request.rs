// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use sev_guest_sys::SNP_GUEST_REQ_MSG_VERSION;
use zerocopy::{FromBytes, Immutable, IntoBytes};

/// A guest request to be relayed to the `sev-guest` driver.
///
/// The request and response payloads are opaque to this crate: their layout
/// is dictated by the command issued alongside them.  The length of
/// `resp_data` is the capacity offered for the response, and after a call it
/// holds what the driver wrote back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnpUserGuestRequest {
    pub msg_version: u8,
    pub req_data: Vec<u8>,
    pub resp_data: Vec<u8>,
    /// Raw `exitinfo2` as reported by the driver.  Only meaningful after a
    /// call which failed with `EIO`; cleared after any other outcome.
    pub fw_err: u64,
}

impl SnpUserGuestRequest {
    /// Build a request from raw payload bytes, with a zeroed response buffer
    /// of `resp_len` bytes.
    pub fn new(req_data: impl Into<Vec<u8>>, resp_len: usize) -> Self {
        Self {
            msg_version: SNP_GUEST_REQ_MSG_VERSION,
            req_data: req_data.into(),
            resp_data: vec![0; resp_len],
            fw_err: 0,
        }
    }

    /// Build a request around a typed payload, such as
    /// [`sev_guest_sys::snp_report_req`].
    pub fn from_payload<T: IntoBytes + Immutable>(
        payload: &T,
        resp_len: usize,
    ) -> Self {
        Self::new(payload.as_bytes(), resp_len)
    }

    /// Interpret the leading bytes of the response buffer as `T`.
    ///
    /// Returns `None` if the buffer is too short to hold a `T`.
    pub fn response<T: FromBytes>(&self) -> Option<T> {
        T::read_from_prefix(&self.resp_data).ok().map(|(val, _rest)| val)
    }

    /// Firmware status, from the low half of `exitinfo2`
    pub fn fw_error(&self) -> u32 {
        self.fw_err as u32
    }

    /// VMM status, from the high half of `exitinfo2`
    pub fn vmm_error(&self) -> u32 {
        (self.fw_err >> 32) as u32
    }
}

/// Payloads which may be submitted through [`crate::Device::ioctl`].
pub enum ControlRequest<'a> {
    /// A `struct snp_guest_request_ioctl` exchange.
    UserGuest(&'a mut SnpUserGuestRequest),

    /// A raw payload meant for some other backend, which reads and writes
    /// `data` in place.  [`crate::LinuxDevice`] refuses it, naming `kind` in
    /// the error.
    Opaque { kind: &'static str, data: &'a mut [u8] },
}

impl ControlRequest<'_> {
    /// Name of the payload type, as used in error reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            ControlRequest::UserGuest(_) => "SnpUserGuestRequest",
            ControlRequest::Opaque { kind, .. } => *kind,
        }
    }
}

impl<'a> From<&'a mut SnpUserGuestRequest> for ControlRequest<'a> {
    fn from(req: &'a mut SnpUserGuestRequest) -> Self {
        ControlRequest::UserGuest(req)
    }
}
