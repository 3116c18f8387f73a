// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plumbing between [`SnpUserGuestRequest`] and the raw ioctl interface.
//!
//! Every bit of pointer handling required to issue a guest request lives in
//! this module.  Callers hand over a structured request, and get it back
//! with the driver's output copied into it.

use std::io::{Error as IoError, Result as IoResult};
use std::os::fd::RawFd;
use std::os::raw::{c_int, c_ulong};

use sev_guest_sys::{snp_guest_request_ioctl, snp_report_resp};

use crate::error::{Error, Result};
use crate::request::SnpUserGuestRequest;

/// Minimum size of the request buffer handed to the driver.
///
/// The driver copies in a fixed-size structure chosen by the command, the
/// largest of which (`snp_ext_report_req`) fits comfortably.
const MIN_REQ_BUF: usize = 128;

/// Minimum size of the response buffer handed to the driver.
///
/// As with requests, the driver copies out a fixed-size structure chosen by
/// the command, no larger than `snp_report_resp`.  A caller offering a
/// smaller buffer receives only the leading bytes.
const MIN_RESP_BUF: usize = std::mem::size_of::<snp_report_resp>();

/// Means of issuing a guest request ioctl.
pub trait Kernel {
    /// Issue ioctl `cmd` against `fd`.
    ///
    /// # Safety
    ///
    /// `arg` must point to a valid `snp_guest_request_ioctl` whose
    /// `req_data` and `resp_data` addresses refer to buffers adequate for
    /// any copyin/copyout which `cmd` may perform.
    unsafe fn ioctl(
        &self,
        fd: RawFd,
        cmd: c_ulong,
        arg: *mut snp_guest_request_ioctl,
    ) -> IoResult<c_int>;
}

/// The kernel of the running host.
#[derive(Copy, Clone, Debug, Default)]
pub struct HostKernel;

impl Kernel for HostKernel {
    #[cfg(target_os = "linux")]
    unsafe fn ioctl(
        &self,
        fd: RawFd,
        cmd: c_ulong,
        arg: *mut snp_guest_request_ioctl,
    ) -> IoResult<c_int> {
        match libc::ioctl(fd, cmd as _, arg) {
            -1 => Err(IoError::last_os_error()),
            other => Ok(other),
        }
    }

    #[cfg(not(target_os = "linux"))]
    unsafe fn ioctl(
        &self,
        _fd: RawFd,
        _cmd: c_ulong,
        _arg: *mut snp_guest_request_ioctl,
    ) -> IoResult<c_int> {
        Err(IoError::new(std::io::ErrorKind::Unsupported, "linux required"))
    }
}

/// A [`SnpUserGuestRequest`] laid out the way the driver expects.
///
/// Exists only for the span of a single ioctl: built by [`Self::new`] right
/// before the call and consumed by [`Self::finish`] right after.
struct RawGuestRequest {
    ioc: snp_guest_request_ioctl,
    req_buf: Box<[u8]>,
    resp_buf: Box<[u8]>,
}

impl RawGuestRequest {
    fn new(req: &SnpUserGuestRequest) -> Self {
        Self {
            ioc: snp_guest_request_ioctl {
                msg_version: req.msg_version,
                exitinfo2: req.fw_err,
                ..Default::default()
            },
            req_buf: padded(&req.req_data, MIN_REQ_BUF),
            resp_buf: padded(&req.resp_data, MIN_RESP_BUF),
        }
    }

    /// Pointer to pass to the ioctl.
    ///
    /// The buffer addresses are filled in here, so that they are derived
    /// from the same borrow which covers the call.
    fn as_mut_ptr(&mut self) -> *mut snp_guest_request_ioctl {
        self.ioc.req_data = self.req_buf.as_mut_ptr() as u64;
        self.ioc.resp_data = self.resp_buf.as_mut_ptr() as u64;
        &mut self.ioc
    }

    /// Copy the driver's output back into `req`.
    ///
    /// Both buffers are copied, as some commands report through the request
    /// side (`SNP_GET_EXT_REPORT` writes back the required `certs_len`).
    fn finish(self, req: &mut SnpUserGuestRequest) {
        req.fw_err = self.ioc.exitinfo2;
        let len = req.req_data.len();
        req.req_data.copy_from_slice(&self.req_buf[..len]);
        let len = req.resp_data.len();
        req.resp_data.copy_from_slice(&self.resp_buf[..len]);
    }
}

fn padded(data: &[u8], min: usize) -> Box<[u8]> {
    let mut buf = vec![0u8; data.len().max(min)];
    buf[..data.len()].copy_from_slice(data);
    buf.into_boxed_slice()
}

/// Clear the firmware error unless the ioctl failed with `EIO`.
///
/// The driver copies `exitinfo2` back to userspace on every path, but only
/// fills it in when the firmware request itself fails, which is reported as
/// `EIO`.  Any other outcome can leave uninitialized kernel memory in the
/// field.
// TODO: drop once the oldest supported kernel initializes exitinfo2 on every
// path through the guest request ioctl.
fn scrub_fw_err(req: &mut SnpUserGuestRequest, res: &IoResult<c_int>) {
    let fw_failed =
        matches!(res, Err(e) if e.raw_os_error() == Some(libc::EIO));
    if !fw_failed {
        req.fw_err = 0;
    }
}

/// Issue exactly one guest request ioctl.
pub(crate) fn invoke<K: Kernel + ?Sized>(
    kernel: &K,
    fd: RawFd,
    cmd: c_ulong,
    req: &mut SnpUserGuestRequest,
) -> Result<c_int> {
    let mut raw = RawGuestRequest::new(req);

    // Safety: `raw` outlives the call, and its buffers are sized to cover
    // the fixed structures any guest request command will copy in or out.
    let res = unsafe { kernel.ioctl(fd, cmd, raw.as_mut_ptr()) };

    raw.finish(req);
    scrub_fw_err(req, &res);
    res.map_err(Error::Syscall)
}
