// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io;
use std::os::fd::{AsRawFd, IntoRawFd, RawFd};
use std::os::raw::{c_int, c_ulong};
use std::path::Path;

use sev_guest_sys::SEV_GUEST_DEV_PATH;
use slog::{o, Discard, Logger};

use crate::abi::{self, HostKernel, Kernel};
use crate::error::{Error, Result};
use crate::request::ControlRequest;
use crate::Device;

/// Handle to the Linux `sev-guest` device node.
///
/// Holds at most one open descriptor.  A handle which has not been opened
/// (or whose open failed) is inert: ioctls issued against it fail with
/// `EBADF` from the kernel.
pub struct LinuxDevice<K: Kernel = HostKernel> {
    fp: Option<File>,
    kernel: K,
    log: Logger,
}

impl LinuxDevice {
    /// Create an unopened handle.
    pub fn new() -> Self {
        Self::with_kernel(HostKernel)
    }

    /// Open the device at its well-known path.
    pub fn open_default() -> Result<Self> {
        let mut dev = Self::new();
        dev.open(Path::new(SEV_GUEST_DEV_PATH))?;
        Ok(dev)
    }
}

impl Default for LinuxDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Kernel> LinuxDevice<K> {
    /// Create an unopened handle which issues its ioctls through `kernel`.
    pub fn with_kernel(kernel: K) -> Self {
        Self { fp: None, kernel, log: Logger::root(Discard, o!()) }
    }

    pub fn with_logger(mut self, log: &Logger) -> Self {
        self.log = log.new(o!("component" => "sev-guest"));
        self
    }

    pub fn is_open(&self) -> bool {
        self.fp.is_some()
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Descriptor to hand to the kernel, or -1 if the handle is not open
    fn raw_fd(&self) -> RawFd {
        self.fp.as_ref().map_or(-1, AsRawFd::as_raw_fd)
    }
}

impl<K: Kernel> fmt::Debug for LinuxDevice<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinuxDevice").field("fd", &self.raw_fd()).finish()
    }
}

impl<K: Kernel> Device for LinuxDevice<K> {
    fn open(&mut self, path: &Path) -> Result<()> {
        // Any previously held descriptor is released first, leaving the
        // handle unopened should this attempt fail.
        self.fp = None;

        let fp = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|source| Error::DeviceOpen {
                path: path.to_path_buf(),
                source,
            })?;
        slog::debug!(self.log, "opened device";
            "path" => %path.display(), "fd" => fp.as_raw_fd());
        self.fp = Some(fp);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let Some(fp) = self.fp.take() else {
            return Ok(());
        };
        let fd = fp.into_raw_fd();
        slog::debug!(self.log, "closing device"; "fd" => fd);

        // Safety: `fd` was surrendered by the `File` which owned it, and the
        // handle no longer refers to it, so it is released exactly once.
        match unsafe { libc::close(fd) } {
            0 => Ok(()),
            _ => Err(Error::Close(io::Error::last_os_error())),
        }
    }

    fn ioctl(
        &mut self,
        cmd: c_ulong,
        req: ControlRequest<'_>,
    ) -> Result<c_int> {
        match req {
            ControlRequest::UserGuest(req) => {
                let res = abi::invoke(&self.kernel, self.raw_fd(), cmd, req);
                slog::trace!(self.log, "guest request";
                    "cmd" => cmd,
                    "ok" => res.is_ok(),
                    "fw_err" => req.fw_err);
                res
            }
            ControlRequest::Opaque { kind, .. } => {
                Err(Error::UnsupportedRequest(kind))
            }
        }
    }
}
