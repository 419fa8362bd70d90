use std::collections::HashMap;
use std::collections::hash_map::Entry;

use log::debug;

use crate::{Error, Result};
use crate::instrument::{Instrument, EMPTY_INSTRUMENT};
use crate::ym2612::LfoSpeed;

pub type InstrumentKey = u16;
pub type BankKey = u16;

/// Instruments grouped into named banks.
///
/// Ids are handed out by probing upward from a cursor that only moves
/// forward, so an id is never reused. Nothing is ever removed.
#[derive(Debug, Default, Clone)]
pub struct InstrumentBank {
    pub default_lfo_speed: LfoSpeed,
    // LFO byte as read from a file header.
    lfo_byte: Option<u8>,
    instruments: HashMap<InstrumentKey, Instrument>,
    banks: HashMap<BankKey, String>,
    instruments_order: HashMap<BankKey, Vec<InstrumentKey>>,
    bank_order: Vec<BankKey>,
    next_instrument_id: InstrumentKey,
    next_bank_id: BankKey,
}

// Probes upward from `cursor` for an id not in `taken`, leaving the
// cursor on the id it returns.
fn allocate<V>(taken: &HashMap<u16, V>, cursor: &mut u16, kind: &'static str) -> Result<u16> {
    if taken.len() > u16::MAX as usize {
        return Err(Error::IdsExhausted(kind));
    }
    while taken.contains_key(&*cursor) {
        *cursor = cursor.wrapping_add(1);
    }
    Ok(*cursor)
}

impl InstrumentBank {
    pub fn new() -> Self {
        Default::default()
    }

    /// Header byte the default LFO speed is written as. A byte read from
    /// a file is kept until the speed is changed.
    pub fn lfo_byte(&self) -> u8 {
        match self.lfo_byte {
            Some(byte) if LfoSpeed::from_header_byte(byte).unwrap_or_default() == self.default_lfo_speed => byte,
            _ => self.default_lfo_speed.as_byte(),
        }
    }

    pub(crate) fn set_lfo_byte(&mut self, byte: u8) {
        self.lfo_byte = Some(byte);
    }

    /// Reserves the lowest free instrument id at or above the cursor.
    pub fn allocate_instrument_id(&mut self) -> Result<InstrumentKey> {
        allocate(&self.instruments, &mut self.next_instrument_id, "instrument")
    }

    /// Reserves the lowest free bank id at or above the cursor.
    pub fn allocate_bank_id(&mut self) -> Result<BankKey> {
        allocate(&self.banks, &mut self.next_bank_id, "bank")
    }

    /// Adds a bank, or returns the id of an existing bank whose name
    /// matches ignoring ASCII case.
    pub fn add_bank(&mut self, name: &str) -> Result<BankKey> {
        if let Some(id) = self.find_bank(name) {
            return Ok(id);
        }

        let id = self.allocate_bank_id()?;
        if self.banks.insert(id, name.to_string()).is_some() {
            return Err(Error::IdCollision { kind: "bank", id });
        }
        self.bank_order.push(id);
        self.instruments_order.entry(id).or_default();
        debug!("Added bank #{} '{}'", id, name);
        Ok(id)
    }

    /// Takes ownership of `instrument` and appends it to the bank.
    pub fn add_instrument(&mut self, instrument: Instrument, bank: BankKey) -> Result<&mut Instrument> {
        if !self.banks.contains_key(&bank) {
            return Err(Error::UnknownBank(bank));
        }

        let id = self.allocate_instrument_id()?;
        match self.instruments.entry(id) {
            Entry::Occupied(_) => Err(Error::IdCollision { kind: "instrument", id }),
            Entry::Vacant(slot) => {
                self.instruments_order.entry(bank).or_default().push(id);
                Ok(slot.insert(instrument))
            },
        }
    }

    pub fn find_bank(&self, name: &str) -> Option<BankKey> {
        self.bank_order
            .iter()
            .copied()
            .find(|id| self.banks[id].eq_ignore_ascii_case(name))
    }

    pub fn bank_name(&self, bank: BankKey) -> Option<&str> {
        self.banks.get(&bank).map(String::as_str)
    }

    /// Bank ids in the order the banks were added.
    pub fn bank_order(&self) -> &[BankKey] {
        &self.bank_order
    }

    /// Instrument ids of a bank in the order they were added.
    pub fn instrument_order(&self, bank: BankKey) -> &[InstrumentKey] {
        self.instruments_order.get(&bank).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Instruments of a bank, in order.
    pub fn bank_instruments(&self, bank: BankKey) -> impl Iterator<Item = (InstrumentKey, &Instrument)> + '_ {
        self.instrument_order(bank)
            .iter()
            .filter_map(move |id| self.instruments.get(id).map(|instrument| (*id, instrument)))
    }

    pub fn instrument(&self, id: InstrumentKey) -> Option<&Instrument> {
        self.instruments.get(&id)
    }

    pub fn instrument_mut(&mut self, id: InstrumentKey) -> Option<&mut Instrument> {
        self.instruments.get_mut(&id)
    }

    /// Looks up an instrument, falling back to an empty one.
    pub fn instrument_or_empty(&self, id: Option<InstrumentKey>) -> &Instrument {
        id.and_then(|id| self.instruments.get(&id)).unwrap_or(&EMPTY_INSTRUMENT)
    }

    pub fn instrument_count(&self) -> usize {
        self.instruments.len()
    }

    pub fn bank_count(&self) -> usize {
        self.banks.len()
    }
}

impl PartialEq for InstrumentBank {
    // Same banks with the same names and instruments in the same order.
    // The allocation cursors do not take part.
    fn eq(&self, other: &Self) -> bool {
        self.default_lfo_speed == other.default_lfo_speed
            && self.bank_order.len() == other.bank_order.len()
            && self.bank_order.iter().zip(&other.bank_order).all(|(a, b)| {
                self.bank_name(*a) == other.bank_name(*b)
                    && self.bank_instruments(*a).map(|(_, i)| i)
                        .eq(other.bank_instruments(*b).map(|(_, i)| i))
            })
    }
}
