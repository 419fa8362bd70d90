use std::fmt;

use crate::safe_int::SafeInt;

pub mod operators;
pub mod lfo;
pub mod patch;

pub use operators::Operators;
pub use lfo::LfoSpeed;
pub use patch::Patch;

/// One byte of YM2612 register data.
pub type Register = SafeInt<u8>;

/// Operator slot.
///
/// The discriminant is the column in the register block. The chip
/// lays the operators out as OP1, OP3, OP2, OP4, so OP2 and OP3 swap.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum OpId {
    Op1 = 0,
    Op3 = 1,
    Op2 = 2,
    Op4 = 3,
}

impl OpId {
    /// Operators in their logical order.
    pub const ALL: [OpId; 4] = [OpId::Op1, OpId::Op2, OpId::Op3, OpId::Op4];

    /// Makes an operator id from a physical slot (0...3).
    pub fn from_slot(slot: u8) -> Self {
        match slot {
            0 => OpId::Op1,
            1 => OpId::Op3,
            2 => OpId::Op2,
            3 => OpId::Op4,
            _ => panic!("Invalid operator slot {}, outside of range of 0-3", slot),
        }
    }

    /// Physical column in the register block.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for OpId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            OpId::Op1 => "Operator 1",
            OpId::Op2 => "Operator 2",
            OpId::Op3 => "Operator 3",
            OpId::Op4 => "Operator 4",
        })
    }
}

/// Detune (DT1), register bits 4-6.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u8)]
pub enum DetuneMode {
    NoChange1,
    PlusE,
    Plus2E,
    Plus3E,
    NoChange2,
    MinusE,
    Minus2E,
    Minus3E,
}

impl DetuneMode {
    pub const ALL: [DetuneMode; 8] = [
        DetuneMode::NoChange1,
        DetuneMode::PlusE,
        DetuneMode::Plus2E,
        DetuneMode::Plus3E,
        DetuneMode::NoChange2,
        DetuneMode::MinusE,
        DetuneMode::Minus2E,
        DetuneMode::Minus3E,
    ];
}

impl From<u8> for DetuneMode {
    fn from(item: u8) -> Self {
        match Self::ALL.get(item as usize) {
            Some(mode) => *mode,
            None => panic!("Invalid value for detune_mode, got {}", item),
        }
    }
}

impl fmt::Display for DetuneMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            DetuneMode::NoChange1 | DetuneMode::NoChange2 => "No Change",
            DetuneMode::PlusE => "+1 × E",
            DetuneMode::Plus2E => "+2 × E",
            DetuneMode::Plus3E => "+3 × E",
            DetuneMode::MinusE => "-1 × E",
            DetuneMode::Minus2E => "-2 × E",
            DetuneMode::Minus3E => "-3 × E",
        })
    }
}

/// Rate scaling (RS), register bits 6-7.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u8)]
pub enum RateScalingMode {
    Kc8,
    Kc4,
    Kc2,
    Kc1,
}

impl RateScalingMode {
    pub const ALL: [RateScalingMode; 4] = [
        RateScalingMode::Kc8,
        RateScalingMode::Kc4,
        RateScalingMode::Kc2,
        RateScalingMode::Kc1,
    ];
}

impl From<u8> for RateScalingMode {
    fn from(item: u8) -> Self {
        match Self::ALL.get(item as usize) {
            Some(mode) => *mode,
            None => panic!("Invalid value for rate_scaling_mode, got {}", item),
        }
    }
}

impl fmt::Display for RateScalingMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            RateScalingMode::Kc8 => "(KC/8) + (2×Rate)",
            RateScalingMode::Kc4 => "(KC/4) + (2×Rate)",
            RateScalingMode::Kc2 => "(KC/2) + (2×Rate)",
            RateScalingMode::Kc1 => "(KC/1) + (2×Rate)",
        })
    }
}

/// SSG-EG envelope shape. Bit 3 enables it, bits 0-2 select the shape.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u8)]
pub enum SsgEgMode {
    Disabled = 0,
    Mode0 = 0b1000,
    Mode1,
    Mode2,
    Mode3,
    Mode4,
    Mode5,
    Mode6,
    Mode7,
}

impl SsgEgMode {
    pub const ALL: [SsgEgMode; 9] = [
        SsgEgMode::Disabled,
        SsgEgMode::Mode0,
        SsgEgMode::Mode1,
        SsgEgMode::Mode2,
        SsgEgMode::Mode3,
        SsgEgMode::Mode4,
        SsgEgMode::Mode5,
        SsgEgMode::Mode6,
        SsgEgMode::Mode7,
    ];

    /// Decodes the low nibble of an SSG-EG register.
    /// Shape bits are ignored by the chip while the enable bit is clear.
    pub fn from_nibble(nibble: u8) -> Self {
        if nibble & 0b1000 == 0 {
            SsgEgMode::Disabled
        } else {
            Self::ALL[(nibble & 0b0111) as usize + 1]
        }
    }
}

impl From<u8> for SsgEgMode {
    fn from(item: u8) -> Self {
        match item {
            0 => SsgEgMode::Disabled,
            0b1000..=0b1111 => Self::from_nibble(item),
            _ => panic!("Invalid value for ssgeg_mode, got {}", item),
        }
    }
}

impl fmt::Display for SsgEgMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            SsgEgMode::Disabled => "Disabled",
            SsgEgMode::Mode0 => r"\\\\",
            SsgEgMode::Mode1 => r"\___",
            SsgEgMode::Mode2 => r"\/\/",
            SsgEgMode::Mode3 => r"\¯¯¯",
            SsgEgMode::Mode4 => "////",
            SsgEgMode::Mode5 => "/¯¯¯",
            SsgEgMode::Mode6 => r"/\/\",
            SsgEgMode::Mode7 => "/___",
        })
    }
}

/// Operator 1 self-feedback amount.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u8)]
pub enum FeedbackMode {
    Off,
    PiDiv16,
    PiDiv8,
    PiDiv4,
    PiDiv2,
    Pi,
    PiMul2,
    PiMul4,
}

impl FeedbackMode {
    pub const ALL: [FeedbackMode; 8] = [
        FeedbackMode::Off,
        FeedbackMode::PiDiv16,
        FeedbackMode::PiDiv8,
        FeedbackMode::PiDiv4,
        FeedbackMode::PiDiv2,
        FeedbackMode::Pi,
        FeedbackMode::PiMul2,
        FeedbackMode::PiMul4,
    ];
}

impl From<u8> for FeedbackMode {
    fn from(item: u8) -> Self {
        match Self::ALL.get(item as usize) {
            Some(mode) => *mode,
            None => panic!("Invalid value for feedback_mode, got {}", item),
        }
    }
}

impl fmt::Display for FeedbackMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            FeedbackMode::Off => "Off",
            FeedbackMode::PiDiv16 => "Pi / 16",
            FeedbackMode::PiDiv8 => "Pi / 8",
            FeedbackMode::PiDiv4 => "Pi / 4",
            FeedbackMode::PiDiv2 => "Pi / 2",
            FeedbackMode::Pi => "Pi",
            FeedbackMode::PiMul2 => "2 * Pi",
            FeedbackMode::PiMul4 => "4 * Pi",
        })
    }
}

/// Operator connection topology (0...7).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u8)]
pub enum AlgorithmMode {
    Mode0,
    Mode1,
    Mode2,
    Mode3,
    Mode4,
    Mode5,
    Mode6,
    Mode7,
}

impl AlgorithmMode {
    pub const ALL: [AlgorithmMode; 8] = [
        AlgorithmMode::Mode0,
        AlgorithmMode::Mode1,
        AlgorithmMode::Mode2,
        AlgorithmMode::Mode3,
        AlgorithmMode::Mode4,
        AlgorithmMode::Mode5,
        AlgorithmMode::Mode6,
        AlgorithmMode::Mode7,
    ];
}

impl From<u8> for AlgorithmMode {
    fn from(item: u8) -> Self {
        match Self::ALL.get(item as usize) {
            Some(mode) => *mode,
            None => panic!("Invalid value for algorithm_mode, got {}", item),
        }
    }
}

impl fmt::Display for AlgorithmMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            AlgorithmMode::Mode0 => "0 (Out 4)",
            AlgorithmMode::Mode1 => "1 (Out 4)",
            AlgorithmMode::Mode2 => "2 (Out 4)",
            AlgorithmMode::Mode3 => "3 (Out 4)",
            AlgorithmMode::Mode4 => "4 (Out 2-4)",
            AlgorithmMode::Mode5 => "5 (Out 2-3-4)",
            AlgorithmMode::Mode6 => "6 (Out 2-3-4)",
            AlgorithmMode::Mode7 => "7 (Out 1-2-3-4)",
        })
    }
}

/// Tremolo depth in dB for each AMS setting.
pub static AMS_DB: [f64; 4] = [0.0, 1.4, 5.9, 11.8];

/// Vibrato depth in cents for each FMS setting.
pub static FMS_CENTS: [f64; 8] = [0.0, 3.4, 6.7, 10.0, 14.0, 20.0, 40.0, 80.0];
