use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::{Error, Result};

/// Entries per map: one per General MIDI program (melodic)
/// or per GM drum kit sound (drum).
pub const MAP_ENTRY_COUNT: usize = 128;

/// Byte value that matches every bank in a sub-entry.
pub const ALL_BANKS: u8 = 0xFF;

const DRUM_BANK_FLAG: u16 = 0x8000;

/// One candidate FM instrument for a GM program or drum sound.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct MapSubEntry {
    /// Bank MSB (melodic, 0 = default) or drum kit (drum).
    pub bank_msb: u8,
    /// Bank LSB (melodic), unused in drum maps.
    pub bank_lsb: u8,
    /// FM instrument index, bit 15 selects the drum bank.
    pub instrument: u16,
}

impl MapSubEntry {
    pub fn is_drum(&self) -> bool {
        self.instrument & DRUM_BANK_FLAG != 0
    }

    /// Index of the instrument within its bank.
    pub fn instrument_index(&self) -> u16 {
        self.instrument & !DRUM_BANK_FLAG
    }

    fn matches(&self, msb: u8, lsb: u8) -> bool {
        (self.bank_msb == ALL_BANKS || self.bank_msb == msb)
            && (self.bank_lsb == ALL_BANKS || self.bank_lsb == lsb)
    }
}

pub type MapEntry = Vec<MapSubEntry>;

/// GM-to-FM instrument mapping tables of a GYB v3 file.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct InstrumentMaps {
    pub melodic: Vec<MapEntry>,
    pub drum: Vec<MapEntry>,
}

impl Default for InstrumentMaps {
    fn default() -> Self {
        InstrumentMaps {
            melodic: vec![MapEntry::new(); MAP_ENTRY_COUNT],
            drum: vec![MapEntry::new(); MAP_ENTRY_COUNT],
        }
    }
}

impl InstrumentMaps {
    /// Parses the melodic map followed by the drum map.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(data);
        let melodic = read_map(&mut cursor)?;
        let drum = read_map(&mut cursor)?;
        Ok(InstrumentMaps { melodic, drum })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut data: Vec<u8> = Vec::new();
        write_map(&mut data, &self.melodic, "melodic")?;
        write_map(&mut data, &self.drum, "drum")?;
        Ok(data)
    }

    /// First FM instrument mapped for a GM program in the given bank.
    pub fn melodic_lookup(&self, program: u8, msb: u8, lsb: u8) -> Option<&MapSubEntry> {
        self.melodic.get(program as usize)?
            .iter()
            .find(|sub| sub.matches(msb, lsb))
    }

    /// First FM instrument mapped for a GM drum sound in the given kit.
    pub fn drum_lookup(&self, note: u8, kit: u8) -> Option<&MapSubEntry> {
        self.drum.get(note as usize)?
            .iter()
            .find(|sub| sub.bank_msb == ALL_BANKS || sub.bank_msb == kit)
    }
}

fn read_map(cursor: &mut Cursor<&[u8]>) -> Result<Vec<MapEntry>> {
    let mut map = Vec::with_capacity(MAP_ENTRY_COUNT);
    for _ in 0..MAP_ENTRY_COUNT {
        let count = cursor.read_u16::<LittleEndian>()?;
        let mut entry = MapEntry::with_capacity(count as usize);
        for _ in 0..count {
            entry.push(MapSubEntry {
                bank_msb: cursor.read_u8()?,
                bank_lsb: cursor.read_u8()?,
                instrument: cursor.read_u16::<LittleEndian>()?,
            });
        }
        map.push(entry);
    }
    Ok(map)
}

fn write_map(data: &mut Vec<u8>, map: &[MapEntry], kind: &str) -> Result<()> {
    if map.len() != MAP_ENTRY_COUNT {
        return Err(Error::invalid_format(format!("{} map has {} entries, expected {}", kind, map.len(), MAP_ENTRY_COUNT)));
    }
    for entry in map {
        let count = u16::try_from(entry.len())
            .map_err(|_| Error::invalid_format(format!("too many {} map sub-entries: {}", kind, entry.len())))?;
        data.write_u16::<LittleEndian>(count)?;
        for sub in entry {
            data.write_u8(sub.bank_msb)?;
            data.write_u8(sub.bank_lsb)?;
            data.write_u16::<LittleEndian>(sub.instrument)?;
        }
    }
    Ok(())
}
