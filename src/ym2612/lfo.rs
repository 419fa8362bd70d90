use std::fmt;

use bit::BitIndex;

use crate::{Error, Result};

/// Hardware LFO frequency, stored as its table index rather than in Hz.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
#[repr(u8)]
pub enum LfoSpeed {
    #[default]
    Off,
    Hz3_98,
    Hz5_56,
    Hz6_02,
    Hz6_37,
    Hz6_88,
    Hz9_63,
    Hz48_1,
    Hz72_2,
}

/// Frequencies in Hz, indexed by `LfoSpeed` discriminant.
pub static LFO_HZ: [f64; 9] = [0.0, 3.98, 5.56, 6.02, 6.37, 6.88, 9.63, 48.1, 72.2];

impl LfoSpeed {
    pub const ALL: [LfoSpeed; 9] = [
        LfoSpeed::Off,
        LfoSpeed::Hz3_98,
        LfoSpeed::Hz5_56,
        LfoSpeed::Hz6_02,
        LfoSpeed::Hz6_37,
        LfoSpeed::Hz6_88,
        LfoSpeed::Hz9_63,
        LfoSpeed::Hz48_1,
        LfoSpeed::Hz72_2,
    ];

    pub fn hz(self) -> f64 {
        LFO_HZ[self as usize]
    }

    pub fn as_byte(self) -> u8 {
        self as u8
    }

    /// Decodes the LFO byte of a GYB header.
    ///
    /// 0...8 is the speed index. 0x09...0x0F is the YM2612 register 0x22
    /// layout: enable bit 3 set, speed in bits 0-2.
    pub fn from_header_byte(byte: u8) -> Option<Self> {
        match byte {
            0..=8 => Some(Self::ALL[byte as usize]),
            0x09..=0x0F => Some(Self::ALL[byte.bit_range(0..3) as usize + 1]),
            _ => None,
        }
    }
}

impl TryFrom<u8> for LfoSpeed {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match Self::ALL.get(value as usize) {
            Some(speed) => Ok(*speed),
            None => Err(Error::invalid_format(format!("LFO speed out of range: {}", value))),
        }
    }
}

impl fmt::Display for LfoSpeed {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LfoSpeed::Off => write!(f, "Off"),
            _ => write!(f, "{} Hz", self.hz()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_byte() {
        assert_eq!(LfoSpeed::try_from(0).unwrap(), LfoSpeed::Off);
        assert_eq!(LfoSpeed::try_from(2).unwrap(), LfoSpeed::Hz5_56);
        assert_eq!(LfoSpeed::try_from(8).unwrap(), LfoSpeed::Hz72_2);
        assert!(LfoSpeed::try_from(9).unwrap_err().is_format_error());
    }

    #[test]
    fn test_from_header_byte() {
        assert_eq!(LfoSpeed::from_header_byte(0), Some(LfoSpeed::Off));
        assert_eq!(LfoSpeed::from_header_byte(2), Some(LfoSpeed::Hz5_56));
        assert_eq!(LfoSpeed::from_header_byte(8), Some(LfoSpeed::Hz72_2));
        assert_eq!(LfoSpeed::from_header_byte(0x09), Some(LfoSpeed::Hz3_98));
        assert_eq!(LfoSpeed::from_header_byte(0x0A), Some(LfoSpeed::Hz6_02));
        assert_eq!(LfoSpeed::from_header_byte(0x0F), Some(LfoSpeed::Hz72_2));
        assert_eq!(LfoSpeed::from_header_byte(0x10), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(LfoSpeed::Off.to_string(), "Off");
        assert_eq!(LfoSpeed::Hz3_98.to_string(), "3.98 Hz");
        assert_eq!(LfoSpeed::Hz48_1.to_string(), "48.1 Hz");
    }
}
