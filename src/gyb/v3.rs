use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::{debug, warn};

use crate::{Error, Result};
use crate::bank::{BankKey, InstrumentBank};
use crate::instrument::Instrument;
use crate::ym2612::LfoSpeed;
use crate::ym2612::patch::{Patch, Version};
use crate::gyb::maps::InstrumentMaps;
use crate::gyb::{MAGIC, MELODIC_BANK, DRUM_BANK};

/// Signature, version, LFO speed, file size and two table offsets.
pub const HEADER_SIZE: usize = 0x10;

/// Fields read from a v3 header.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Header {
    pub lfo_byte: u8,
    pub default_lfo_speed: LfoSpeed,
    pub bank_offset: u32,
    pub maps_offset: u32,
}

impl Header {
    /// Reads the header and checks the declared file size.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(data);
        cursor.set_position(3);

        let lfo_byte = cursor.read_u8()?;
        let default_lfo_speed = LfoSpeed::from_header_byte(lfo_byte).unwrap_or_else(|| {
            warn!("Default LFO speed out of range: {:#04X}, setting to Off", lfo_byte);
            LfoSpeed::Off
        });

        let file_size = cursor.read_u32::<LittleEndian>()?;
        if file_size as usize != data.len() {
            return Err(Error::invalid_format(format!(
                "declared file size {} does not match actual size {}", file_size, data.len())));
        }

        let header = Header {
            lfo_byte,
            default_lfo_speed,
            bank_offset: cursor.read_u32::<LittleEndian>()?,
            maps_offset: cursor.read_u32::<LittleEndian>()?,
        };
        debug!("GYB v3 header: {:?}", header);
        Ok(header)
    }
}

pub(crate) fn load(data: &[u8]) -> Result<InstrumentBank> {
    let header = Header::from_bytes(data)?;

    let mut bank = InstrumentBank::new();
    bank.default_lfo_speed = header.default_lfo_speed;
    bank.set_lfo_byte(header.lfo_byte);

    let mut cursor = Cursor::new(data);
    cursor.set_position(header.bank_offset as u64);

    let melodic = bank.add_bank(MELODIC_BANK)?;
    read_instruments(&mut cursor, &mut bank, melodic)?;

    let drum = bank.add_bank(DRUM_BANK)?;
    read_instruments(&mut cursor, &mut bank, drum)?;

    Ok(bank)
}

// Each record starts with its own length, which is what moves the
// cursor on. Records may carry more than the fixed fields.
fn read_instruments(cursor: &mut Cursor<&[u8]>, bank: &mut InstrumentBank, bank_id: BankKey) -> Result<()> {
    let data = *cursor.get_ref();
    let count = cursor.read_u16::<LittleEndian>()?;
    debug!("Reading {} instruments into bank #{}", count, bank_id);

    for _ in 0..count {
        let start = cursor.position() as usize;
        let size = cursor.read_u16::<LittleEndian>()? as usize;
        let end = start + size;
        let record = data.get(start..end).ok_or_else(|| Error::invalid_format(format!(
            "instrument at offset {} runs past end of file", start)))?;

        let patch = Patch::from_bytes(Version::V3, record)?;
        bank.add_instrument(Instrument::Fm(patch), bank_id)?;
        cursor.set_position(end as u64);
    }
    Ok(())
}

pub(crate) fn write(bank: &InstrumentBank, maps: Option<&InstrumentMaps>) -> Result<Vec<u8>> {
    let banks = bank.bank_order();
    if banks.len() > 2 {
        return Err(Error::unsupported(format!("Writing {} banks (melodic and drum only)", banks.len())));
    }

    let mut table: Vec<u8> = Vec::new();
    for slot in 0..2 {
        let instruments: Vec<&Instrument> = match banks.get(slot) {
            Some(id) => bank.bank_instruments(*id).map(|(_, instrument)| instrument).collect(),
            None => Vec::new(),
        };
        let count = u16::try_from(instruments.len())
            .map_err(|_| Error::invalid_format(format!("too many instruments: {}", instruments.len())))?;
        table.write_u16::<LittleEndian>(count)?;

        for instrument in instruments {
            match instrument {
                Instrument::Fm(patch) => table.extend(patch.to_bytes()?),
            }
        }
    }

    let maps = match maps {
        Some(maps) => maps.to_bytes()?,
        None => InstrumentMaps::default().to_bytes()?,
    };

    let bank_offset = HEADER_SIZE;
    let maps_offset = bank_offset + table.len();
    let file_size = maps_offset + maps.len();
    let file_size = u32::try_from(file_size)
        .map_err(|_| Error::invalid_format(format!("file too large: {} bytes", file_size)))?;

    let mut data: Vec<u8> = Vec::with_capacity(file_size as usize);
    data.extend(MAGIC);
    data.write_u8(3)?;
    data.write_u8(bank.lfo_byte())?;
    data.write_u32::<LittleEndian>(file_size)?;
    data.write_u32::<LittleEndian>(bank_offset as u32)?;
    data.write_u32::<LittleEndian>(maps_offset as u32)?;
    debug_assert_eq!(data.len(), HEADER_SIZE);

    data.extend(table);
    data.extend(maps);

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ym2612::{OpId, FeedbackMode};

    #[test]
    fn test_header() {
        let mut data = vec![26, 12, 3, 5];
        data.extend(20u32.to_le_bytes());
        data.extend(16u32.to_le_bytes());
        data.extend(18u32.to_le_bytes());
        data.extend([0, 0, 0, 0]);

        let header = Header::from_bytes(&data).unwrap();
        assert_eq!(header.default_lfo_speed, LfoSpeed::Hz6_88);
        assert_eq!(header.bank_offset, 16);
        assert_eq!(header.maps_offset, 18);
    }

    fn header_with_lfo(lfo: u8) -> Vec<u8> {
        let mut data = vec![26, 12, 3, lfo];
        data.extend(16u32.to_le_bytes());
        data.extend(16u32.to_le_bytes());
        data.extend(16u32.to_le_bytes());
        data
    }

    #[test]
    fn test_header_lfo_register_layout() {
        let header = Header::from_bytes(&header_with_lfo(0x0A)).unwrap();
        assert_eq!(header.lfo_byte, 0x0A);
        assert_eq!(header.default_lfo_speed, LfoSpeed::Hz6_02);
    }

    #[test]
    fn test_header_lfo_out_of_range() {
        let header = Header::from_bytes(&header_with_lfo(0x10)).unwrap();
        assert_eq!(header.lfo_byte, 0x10);
        assert_eq!(header.default_lfo_speed, LfoSpeed::Off);
    }

    #[test]
    fn test_header_truncated() {
        let data = vec![26, 12, 3, 0, 7, 0, 0];
        assert!(Header::from_bytes(&data).unwrap_err().is_format_error());
    }

    #[test]
    fn test_write_then_load() {
        let mut bank = InstrumentBank::new();
        bank.default_lfo_speed = LfoSpeed::Hz9_63;
        let melodic = bank.add_bank(MELODIC_BANK).unwrap();
        let drum = bank.add_bank(DRUM_BANK).unwrap();

        let mut piano = Patch::named("Piano");
        piano.operators.set_total_level(OpId::Op2, 0x1C);
        piano.operators.set_feedback(FeedbackMode::PiDiv4);
        piano.set_transposition(-12);
        bank.add_instrument(piano.into(), melodic).unwrap();
        bank.add_instrument(Patch::random().into(), melodic).unwrap();

        let mut kick = Patch::named("Kick");
        kick.set_default_drum_note(36);
        bank.add_instrument(kick.into(), drum).unwrap();

        let data = write(&bank, None).unwrap();
        assert_eq!(u32::from_le_bytes(data[4..8].try_into().unwrap()) as usize, data.len());

        let loaded = load(&data).unwrap();
        assert_eq!(loaded, bank);
        assert_eq!(write(&loaded, None).unwrap(), data);
    }

    #[test]
    fn test_write_too_many_banks() {
        let mut bank = InstrumentBank::new();
        bank.add_bank("One").unwrap();
        bank.add_bank("Two").unwrap();
        bank.add_bank("Three").unwrap();
        assert!(write(&bank, None).unwrap_err().is_unsupported());
    }

    #[test]
    fn test_write_empty() {
        let data = write(&InstrumentBank::new(), None).unwrap();
        assert_eq!(data.len(), HEADER_SIZE + 4 + 512);

        let loaded = load(&data).unwrap();
        assert_eq!(loaded.instrument_count(), 0);
        assert_eq!(loaded.bank_count(), 2);
    }
}
