use std::borrow::Cow;
use std::fmt;

use crate::ym2612::Patch;

/// An instrument of any supported sound chip.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Instrument {
    /// YM2612 FM patch.
    Fm(Patch),
}

/// Harmless stand-in for lookups that find nothing.
pub static EMPTY_INSTRUMENT: Instrument = Instrument::Fm(Patch::EMPTY);

impl Instrument {
    pub fn name(&self) -> Cow<'_, str> {
        match self {
            Instrument::Fm(patch) => patch.name(),
        }
    }

    pub fn as_fm(&self) -> Option<&Patch> {
        match self {
            Instrument::Fm(patch) => Some(patch),
        }
    }

    pub fn as_fm_mut(&mut self) -> Option<&mut Patch> {
        match self {
            Instrument::Fm(patch) => Some(patch),
        }
    }
}

impl Default for Instrument {
    fn default() -> Self {
        Instrument::Fm(Patch::new())
    }
}

impl From<Patch> for Instrument {
    fn from(patch: Patch) -> Self {
        Instrument::Fm(patch)
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Instrument::Fm(patch) => write!(f, "FM: {}", patch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_instrument() {
        assert_eq!(EMPTY_INSTRUMENT.name(), "");
        assert_eq!(EMPTY_INSTRUMENT, Instrument::default());
    }

    #[test]
    fn test_fm_access() {
        let mut instrument = Instrument::from(Patch::named("Lead"));
        assert_eq!(instrument.name(), "Lead");

        instrument.as_fm_mut().unwrap().set_name("Lead 2");
        assert_eq!(instrument.as_fm().unwrap().name(), "Lead 2");
    }
}
