// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors emitted while operating a guest attestation device.
#[derive(Debug, Error)]
pub enum Error {
    /// The device node could not be opened.
    #[error("could not open SEV guest device at {}", path.display())]
    DeviceOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The request is not of a shape the device knows how to relay.  No
    /// syscall was attempted.
    #[error("unexpected request value: {0}")]
    UnsupportedRequest(&'static str),

    /// The ioctl itself failed.  For `EIO`, the request's firmware error
    /// field holds the code reported by the firmware.
    #[error("guest request ioctl failed")]
    Syscall(#[source] io::Error),

    /// Releasing the descriptor failed.  The handle is considered closed
    /// regardless.
    #[error("failed to close SEV guest device")]
    Close(#[source] io::Error),
}

impl Error {
    /// The OS error code underlying this error, if any.
    pub fn errno(&self) -> Option<i32> {
        match self {
            Error::DeviceOpen { source, .. } => source.raw_os_error(),
            Error::Syscall(e) | Error::Close(e) => e.raw_os_error(),
            Error::UnsupportedRequest(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
