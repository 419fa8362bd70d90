//! GYB instrument bank files, as written by the mid2smps tools.
//!
//! All versions start with the signature `26 12` (decimal) and a version
//! byte. Versions 1 and 2 are recognized but not loaded. Version 3:
//!
//! ```text
//! 00  u8[2]  signature
//! 02  u8     version (3)
//! 03  u8     default LFO speed (0...8, or 0x09...0x0F as in register 22)
//! 04  u32    file size
//! 08  u32    offset of the instrument banks
//! 0C  u32    offset of the instrument maps
//!
//! Instrument bank (melodic, then drum):
//! 00  u16    instrument count
//! 02  ..     instrument records
//!
//! Instrument record:
//! 00  u16    bytes used by this record, this field included
//! 02  u8[30] YM2612 registers 30 34 38 3C ... 90 94 98 9C B0 B4
//! 20  u8     transposition (signed) / default drum note
//! 21  u8     additional data flags, bit 0 = chord notes
//! 22  ..     additional data
//! ..  u8     name length n
//! ..  u8[n]  name
//! ```
//!
//! All multi-byte values are little-endian.

use std::fs;
use std::io;
use std::path::Path;

use log::debug;

use crate::{Error, Result};
use crate::bank::InstrumentBank;
use crate::ym2612::patch::Version;

pub mod maps;
pub mod v3;

pub use maps::InstrumentMaps;

/// File signature, 26 and 12 in decimal.
pub const MAGIC: [u8; 2] = [26, 12];

/// Name given to the bank of melodic instruments on load.
pub const MELODIC_BANK: &str = "Melodic bank";

/// Name given to the bank of drum instruments on load.
pub const DRUM_BANK: &str = "Drum bank";

/// Checks the signature and gets the format version.
pub fn version(data: &[u8]) -> Result<Version> {
    if data.len() < 3 || data[0..2] != MAGIC {
        return Err(Error::invalid_format("missing GYB signature"));
    }

    match data[2] {
        1 => Ok(Version::V1),
        2 => Ok(Version::V2),
        3 => Ok(Version::V3),
        other => Err(Error::invalid_format(format!("unknown version {}", other))),
    }
}

/// Reads a GYB file into a new instrument bank.
pub fn open(path: impl AsRef<Path>) -> Result<InstrumentBank> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => Error::FileNotFound(path.to_path_buf()),
        _ => Error::Io(err),
    })?;
    debug!("Read {} bytes from {}", data.len(), path.display());
    from_bytes(&data)
}

/// Parses a whole GYB file. Either every instrument loads or none do.
pub fn from_bytes(data: &[u8]) -> Result<InstrumentBank> {
    match version(data)? {
        Version::V1 => Err(Error::unsupported("GYB version 1")),
        Version::V2 => Err(Error::unsupported("GYB version 2")),
        Version::V3 => v3::load(data),
    }
}

/// Parses the GM instrument maps of a version 3 file.
pub fn read_instrument_maps(data: &[u8]) -> Result<InstrumentMaps> {
    match version(data)? {
        Version::V3 => {},
        other => return Err(Error::unsupported(format!("Instrument maps in {:?} files", other))),
    }

    let header = v3::Header::from_bytes(data)?;
    let maps = data.get(header.maps_offset as usize..).ok_or_else(|| Error::invalid_format(format!(
        "instrument map offset {} past end of file", header.maps_offset)))?;
    InstrumentMaps::from_bytes(maps)
}

/// Gets a version 3 file for the bank. The first bank is written as
/// the melodic bank and the second as the drum bank.
pub fn to_bytes(bank: &InstrumentBank, maps: Option<&InstrumentMaps>) -> Result<Vec<u8>> {
    v3::write(bank, maps)
}

pub fn save(path: impl AsRef<Path>, bank: &InstrumentBank, maps: Option<&InstrumentMaps>) -> Result<()> {
    let data = to_bytes(bank, maps)?;
    fs::write(path.as_ref(), &data)?;
    debug!("Wrote {} bytes to {}", data.len(), path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use crate::bank::BankKey;
    use crate::ym2612::{LfoSpeed, Patch};

    fn registers() -> Vec<u8> {
        (0..30u8).map(|i| 0x10 + i).collect()
    }

    fn instrument_record(name: &[u8], options: u8) -> Vec<u8> {
        let mut record = ((35 + name.len()) as u16).to_le_bytes().to_vec();
        record.extend(registers());
        record.push(0x00);
        record.push(options);
        record.push(name.len() as u8);
        record.extend(name);
        record
    }

    // Header, then the bank table, then empty instrument maps.
    fn gyb_file(melodic: &[Vec<u8>], drum: &[Vec<u8>]) -> Vec<u8> {
        let mut table = (melodic.len() as u16).to_le_bytes().to_vec();
        melodic.iter().for_each(|record| table.extend(record));
        table.extend((drum.len() as u16).to_le_bytes());
        drum.iter().for_each(|record| table.extend(record));

        let maps = vec![0u8; 512];
        let size = 16 + table.len() + maps.len();

        let mut data = vec![26, 12, 3, 0x02];
        data.extend((size as u32).to_le_bytes());
        data.extend(16u32.to_le_bytes());
        data.extend(((16 + table.len()) as u32).to_le_bytes());
        data.extend(table);
        data.extend(maps);
        data
    }

    fn names(bank: &InstrumentBank, id: BankKey) -> Vec<String> {
        bank.bank_instruments(id).map(|(_, i)| i.name().into_owned()).collect()
    }

    #[test]
    fn test_load_single_instrument() {
        let record = instrument_record(b"Ok", 0);
        assert_eq!(record.len(), 0x25);
        let data = gyb_file(&[record], &[]);

        let bank = from_bytes(&data).expect("valid GYB");
        assert_eq!(bank.default_lfo_speed, LfoSpeed::Hz5_56);

        let melodic = bank.find_bank(MELODIC_BANK).unwrap();
        let drum = bank.find_bank(DRUM_BANK).unwrap();
        assert_eq!(names(&bank, melodic), vec!["Ok"]);
        assert_eq!(bank.instrument_order(drum).len(), 0);

        let (_, instrument) = bank.bank_instruments(melodic).next().unwrap();
        let patch = instrument.as_fm().unwrap();
        assert_eq!(patch.operators.to_bytes().to_vec(), registers());
    }

    #[test]
    fn test_load_both_banks_in_order() {
        let melodic = [instrument_record(b"Bass", 0), instrument_record(b"Lead", 0)];
        let drum = [instrument_record(b"Kick", 0), instrument_record(b"Snare", 0), instrument_record(b"Hat", 0)];
        let bank = from_bytes(&gyb_file(&melodic, &drum)).unwrap();

        assert_eq!(bank.bank_count(), 2);
        assert_eq!(names(&bank, bank.bank_order()[0]), vec!["Bass", "Lead"]);
        assert_eq!(names(&bank, bank.bank_order()[1]), vec!["Kick", "Snare", "Hat"]);
        assert_eq!(bank.instrument_count(), 5);
    }

    #[test]
    fn test_record_length_moves_to_next_record() {
        // Two bytes after the name that the loader does not know about.
        let mut padded = instrument_record(b"Pad", 0);
        let size = padded.len() as u16 + 2;
        padded[0..2].copy_from_slice(&size.to_le_bytes());
        padded.extend([0xAA, 0xBB]);

        let melodic = [padded, instrument_record(b"Lead", 0)];
        let bank = from_bytes(&gyb_file(&melodic, &[instrument_record(b"Kick", 0)])).unwrap();

        assert_eq!(names(&bank, bank.bank_order()[0]), vec!["Pad", "Lead"]);
        assert_eq!(names(&bank, bank.bank_order()[1]), vec!["Kick"]);
        let (_, lead) = bank.bank_instruments(bank.bank_order()[0]).nth(1).unwrap();
        assert_eq!(lead.as_fm().unwrap().operators.to_bytes().to_vec(), registers());
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let mut data = gyb_file(&[instrument_record(b"Ok", 0)], &[]);
        data.push(0);
        let err = from_bytes(&data).unwrap_err();
        assert!(err.is_format_error());
        assert!(matches!(err, Error::InvalidFormat(_)));
    }

    #[test]
    fn test_chord_notes_rejected() {
        let melodic = [instrument_record(b"Ok", 0), instrument_record(b"Chord", 0b1)];
        let err = from_bytes(&gyb_file(&melodic, &[])).unwrap_err();
        assert!(err.is_unsupported());
    }

    #[test]
    fn test_bad_signature() {
        let mut data = gyb_file(&[], &[]);
        data[1] = 13;
        assert!(from_bytes(&data).unwrap_err().is_format_error());
        assert!(from_bytes(&[]).unwrap_err().is_format_error());
    }

    #[test]
    fn test_versions() {
        let mut data = gyb_file(&[], &[]);
        data[2] = 1;
        assert!(from_bytes(&data).unwrap_err().is_unsupported());
        data[2] = 2;
        assert!(from_bytes(&data).unwrap_err().is_unsupported());
        data[2] = 4;
        assert!(from_bytes(&data).unwrap_err().is_format_error());
    }

    #[test]
    fn test_instrument_count_past_end() {
        let mut data = gyb_file(&[instrument_record(b"Ok", 0)], &[]);
        // Claim a second melodic instrument; its length field is read from the drum count.
        data[16] = 2;
        assert!(from_bytes(&data).is_err());
    }

    #[test]
    fn test_lfo_header_byte_kept_on_save() {
        for lfo in [0x02, 0x08, 0x0A, 0x0F, 0x3C] {
            let mut data = gyb_file(&[instrument_record(b"Ok", 0)], &[instrument_record(b"Kick", 0)]);
            data[3] = lfo;

            let bank = from_bytes(&data).unwrap();
            assert_eq!(to_bytes(&bank, None).unwrap(), data);
        }
    }

    #[test]
    fn test_changed_lfo_speed_written() {
        let mut data = gyb_file(&[instrument_record(b"Ok", 0)], &[]);
        data[3] = 0x0A;

        let mut bank = from_bytes(&data).unwrap();
        assert_eq!(bank.default_lfo_speed, LfoSpeed::Hz6_02);
        bank.default_lfo_speed = LfoSpeed::Hz48_1;
        assert_eq!(to_bytes(&bank, None).unwrap()[3], 7);
    }

    #[test]
    fn test_read_instrument_maps() {
        let data = gyb_file(&[instrument_record(b"Ok", 0)], &[]);
        let maps = read_instrument_maps(&data).unwrap();
        assert_eq!(maps, InstrumentMaps::default());
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.gyb");
        match open(&path) {
            Err(Error::FileNotFound(missing)) => assert_eq!(missing, path),
            other => panic!("expected missing file, got {:?}", other),
        }
    }

    #[test]
    fn test_open_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&gyb_file(&[instrument_record(b"Ok", 0)], &[])).unwrap();

        let bank = open(file.path()).unwrap();
        assert_eq!(bank.instrument_count(), 1);
    }

    #[test]
    fn test_save_then_open() {
        let mut bank = InstrumentBank::new();
        let melodic = bank.add_bank(MELODIC_BANK).unwrap();
        bank.add_bank(DRUM_BANK).unwrap();
        bank.add_instrument(Patch::named("Strings").into(), melodic).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bank.gyb");
        save(&path, &bank, None).unwrap();
        assert_eq!(open(&path).unwrap(), bank);
    }
}
