use std::borrow::Cow;
use std::fmt;
use std::io::{Cursor, Read};

use bitflags::bitflags;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::debug;

use crate::{Error, Result};
use crate::ym2612::operators::{Operators, REGISTER_COUNT};

/// GYB format version an instrument record was written with.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Version {
    V1,
    V2,
    V3,
}

bitflags! {
    /// Additional data flags of a v3 instrument record.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PatchOptions: u8 {
        /// Extra notes that sound along with the played one.
        const CHORD_NOTES = 0b0000_0001;
    }
}

// Size field, registers, key byte, options byte and name length.
const FIXED_SIZE: usize = 2 + REGISTER_COUNT + 1 + 1 + 1;

/// An FM instrument: YM2612 registers plus name and key setting.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct Patch {
    pub operators: Operators,
    pub options: PatchOptions,
    name: Vec<u8>,
    // Transposition (signed) in the melodic bank,
    // default drum note (unsigned) in the drum bank.
    key: u8,
}

impl Patch {
    pub const EMPTY: Patch = Patch {
        operators: Operators::EMPTY,
        options: PatchOptions::empty(),
        name: Vec::new(),
        key: 0,
    };

    /// Creates a patch with all registers zeroed and no name.
    pub fn new() -> Self {
        Self::EMPTY
    }

    pub fn named(name: &str) -> Self {
        Self {
            name: name.as_bytes().to_vec(),
            ..Self::new()
        }
    }

    /// Makes a new patch with random register settings.
    pub fn random() -> Self {
        Self {
            operators: Operators::random(),
            ..Self::named("RANDOM")
        }
    }

    /// Parses an instrument record of the given GYB version.
    pub fn from_bytes(version: Version, data: &[u8]) -> Result<Self> {
        match version {
            Version::V1 => Err(Error::unsupported("Version 1 FM data")),
            Version::V2 => Err(Error::unsupported("Version 2 FM data")),
            Version::V3 => Self::load_v3(data),
        }
    }

    fn load_v3(data: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(data);

        let total_size = cursor.read_u16::<LittleEndian>()? as usize;
        if total_size != data.len() {
            return Err(Error::SizeMismatch { declared: total_size, actual: data.len() });
        }

        let mut registers = [0u8; REGISTER_COUNT];
        cursor.read_exact(&mut registers)?;
        let key = cursor.read_u8()?;

        let options = PatchOptions::from_bits_retain(cursor.read_u8()?);
        if options.contains(PatchOptions::CHORD_NOTES) {
            return Err(Error::unsupported("Chord notes"));
        }

        let name_length = cursor.read_u8()? as usize;
        let mut name = vec![0u8; name_length];
        cursor.read_exact(&mut name)?;

        let patch = Patch {
            operators: Operators::from_registers(registers),
            options,
            name,
            key,
        };
        debug!("Loaded patch '{}', {} bytes", patch.name(), total_size);
        Ok(patch)
    }

    /// Gets the v3 instrument record for this patch, size field included.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        if self.options.contains(PatchOptions::CHORD_NOTES) {
            return Err(Error::unsupported("Chord notes"));
        }
        let name_length = u8::try_from(self.name.len())
            .map_err(|_| Error::invalid_format(format!("instrument name is {} bytes, at most 255 fit", self.name.len())))?;

        let size = self.data_size();
        let mut data: Vec<u8> = Vec::with_capacity(size);
        data.write_u16::<LittleEndian>(size as u16)?;
        data.extend(self.operators.to_bytes());
        data.write_u8(self.key)?;
        data.write_u8(self.options.bits())?;
        data.write_u8(name_length)?;
        data.extend(&self.name);

        debug_assert_eq!(data.len(), size);

        Ok(data)
    }

    /// Number of bytes the v3 record of this patch takes up.
    pub fn data_size(&self) -> usize {
        FIXED_SIZE + self.name.len()
    }

    /// Instrument name. Bytes that are not UTF-8 are shown as replacement characters.
    pub fn name(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.name)
    }

    pub fn name_bytes(&self) -> &[u8] {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.as_bytes().to_vec();
    }

    pub fn transposition(&self) -> i8 {
        self.key as i8
    }

    pub fn set_transposition(&mut self, semitones: i8) {
        self.key = semitones as u8;
    }

    pub fn default_drum_note(&self) -> u8 {
        self.key
    }

    pub fn set_default_drum_note(&mut self, note: u8) {
        self.key = note;
    }
}

impl fmt::Display for Patch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "==========
{}
==========
Transpose: {}
{}",
            self.name(),
            self.transposition(),
            self.operators)
    }
}
