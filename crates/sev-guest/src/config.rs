// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! TOML configuration naming the device to operate.

use std::path::{Path, PathBuf};

use serde_derive::{Deserialize, Serialize};
use sev_guest_sys::SEV_GUEST_DEV_PATH;
use slog::Logger;
use thiserror::Error;

use crate::abi::{HostKernel, Kernel};
use crate::device::LinuxDevice;
use crate::Device;

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Path of the device node
    #[serde(default = "default_path")]
    pub path: PathBuf,
}

fn default_path() -> PathBuf {
    PathBuf::from(SEV_GUEST_DEV_PATH)
}

impl Default for Config {
    fn default() -> Self {
        Self { path: default_path() }
    }
}

impl Config {
    /// Open the configured device.
    pub fn open(&self, log: &Logger) -> crate::Result<LinuxDevice> {
        self.open_with(HostKernel, log)
    }

    /// Open the configured device, issuing its ioctls through `kernel`.
    pub fn open_with<K: Kernel>(
        &self,
        kernel: K,
        log: &Logger,
    ) -> crate::Result<LinuxDevice<K>> {
        let mut dev = LinuxDevice::with_kernel(kernel).with_logger(log);
        dev.open(&self.path)?;
        Ok(dev)
    }
}

/// Errors which may be returned when parsing the configuration.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Cannot parse toml: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Cannot read config file: {0}")]
    Io(#[from] std::io::Error),
}

/// Parses a TOML file into a configuration object.
pub fn parse<P: AsRef<Path>>(path: P) -> Result<Config, ParseError> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    let cfg = toml::from_str::<Config>(&contents)?;
    Ok(cfg)
}
