// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Simulated `sev-guest` driver for exercising the crate without hardware.

use std::cell::{Cell, RefCell};
use std::io::{Error as IoError, Result as IoResult};
use std::os::fd::RawFd;
use std::os::raw::{c_int, c_ulong};

use sev_guest_sys::snp_guest_request_ioctl;

use crate::abi::Kernel;

/// Number of request bytes captured from each call.
const CAPTURE_LEN: usize = 128;

/// Stands in for the driver: captures what it was handed, writes a canned
/// response and `exitinfo2`, then reports a canned outcome.
#[derive(Default)]
pub(crate) struct SimKernel {
    response: Vec<u8>,
    req_writeback: Option<(usize, Vec<u8>)>,
    exitinfo2: u64,
    errno: Option<i32>,
    rval: c_int,

    calls: Cell<usize>,
    last_cmd: Cell<c_ulong>,
    last_fd: Cell<RawFd>,
    last_version: Cell<u8>,
    last_request: RefCell<Vec<u8>>,
}

impl SimKernel {
    pub(crate) fn new() -> Self {
        Self::default()
    }
    pub(crate) fn response(mut self, bytes: Vec<u8>) -> Self {
        self.response = bytes;
        self
    }
    /// Have the driver overwrite request bytes starting at `offset`, as
    /// `SNP_GET_EXT_REPORT` does with `certs_len`.
    pub(crate) fn request_writeback(
        mut self,
        offset: usize,
        bytes: Vec<u8>,
    ) -> Self {
        assert!(offset + bytes.len() <= CAPTURE_LEN);
        self.req_writeback = Some((offset, bytes));
        self
    }
    pub(crate) fn exitinfo2(mut self, val: u64) -> Self {
        self.exitinfo2 = val;
        self
    }
    pub(crate) fn errno(mut self, errno: i32) -> Self {
        self.errno = Some(errno);
        self
    }
    pub(crate) fn rval(mut self, rval: c_int) -> Self {
        self.rval = rval;
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.get()
    }
    pub(crate) fn last_cmd(&self) -> c_ulong {
        self.last_cmd.get()
    }
    pub(crate) fn last_fd(&self) -> RawFd {
        self.last_fd.get()
    }
    pub(crate) fn last_version(&self) -> u8 {
        self.last_version.get()
    }
    pub(crate) fn last_request(&self) -> Vec<u8> {
        self.last_request.borrow().clone()
    }
}

impl Kernel for SimKernel {
    unsafe fn ioctl(
        &self,
        fd: RawFd,
        cmd: c_ulong,
        arg: *mut snp_guest_request_ioctl,
    ) -> IoResult<c_int> {
        self.calls.set(self.calls.get() + 1);
        self.last_cmd.set(cmd);
        self.last_fd.set(fd);

        let ioc = &mut *arg;
        self.last_version.set(ioc.msg_version);

        let req = std::slice::from_raw_parts_mut(
            ioc.req_data as *mut u8,
            CAPTURE_LEN,
        );
        *self.last_request.borrow_mut() = req.to_vec();
        if let Some((offset, bytes)) = &self.req_writeback {
            req[*offset..*offset + bytes.len()].copy_from_slice(bytes);
        }

        let resp = std::slice::from_raw_parts_mut(
            ioc.resp_data as *mut u8,
            self.response.len(),
        );
        resp.copy_from_slice(&self.response);
        ioc.exitinfo2 = self.exitinfo2;

        match self.errno {
            Some(errno) => Err(IoError::from_raw_os_error(errno)),
            None => Ok(self.rval),
        }
    }
}
