//! mid2smps configuration files, which point at the GYB bank
//! and the DAC and PSG tables a conversion uses.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;

use crate::{Error, Result};
use crate::bank::InstrumentBank;
use crate::gyb;

pub const HEADER: &str = "-- mid2smps Configuration --";

/// Paths named by a mid2smps configuration file, resolved against
/// the directory the file is in.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Mapping {
    gyb: PathBuf,
    dac_map: PathBuf,
    dac_list: PathBuf,
    psg_list: PathBuf,
}

impl Mapping {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => Error::FileNotFound(path.to_path_buf()),
            _ => Error::from(err),
        })?;
        let parent = path.parent().unwrap_or_else(|| Path::new(""));
        Self::parse(&text, parent)
    }

    /// Parses configuration text, joining each path onto `parent`.
    pub fn parse(text: &str, parent: &Path) -> Result<Self> {
        let mut lines = text.lines();

        if lines.next() != Some(HEADER) {
            return Err(Error::invalid_format("File is not a mappings file"));
        }

        let mut next_path = |what: &str| {
            lines.next()
                .map(|line| parent.join(line))
                .ok_or_else(|| Error::invalid_format(format!("missing {} path", what)))
        };

        let mapping = Mapping {
            gyb: next_path("GYB bank")?,
            dac_map: next_path("DAC map")?,
            dac_list: next_path("DAC list")?,
            psg_list: next_path("PSG list")?,
        };
        debug!("mid2smps configuration: {:?}", mapping);
        Ok(mapping)
    }

    pub fn gyb(&self) -> &Path {
        &self.gyb
    }

    pub fn dac_map(&self) -> &Path {
        &self.dac_map
    }

    pub fn dac_list(&self) -> &Path {
        &self.dac_list
    }

    pub fn psg_list(&self) -> &Path {
        &self.psg_list
    }

    /// Opens the GYB bank this configuration points at.
    pub fn load_bank(&self) -> Result<InstrumentBank> {
        gyb::open(&self.gyb)
    }
}
