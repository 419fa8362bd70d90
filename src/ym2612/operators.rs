use std::fmt;
use std::ops::Range;

use bit::BitIndex;
use rand::Rng;

use crate::ym2612::{
    Register,
    OpId,
    DetuneMode,
    RateScalingMode,
    SsgEgMode,
    FeedbackMode,
    AlgorithmMode,
};

/// Number of register bytes stored per instrument.
pub const REGISTER_COUNT: usize = 0x1E;

// Register rows. Each row holds one byte per operator, in physical
// slot order, in the same sequence as the chip's register map
// (30 34 38 3C, 40 44 48 4C, ... 90 94 98 9C, then B0 B4).
const DT_MUL: usize = 0;
const TL: usize = 1;
const RS_AR: usize = 2;
const AM_DR: usize = 3;
const SR: usize = 4;
const SL_RR: usize = 5;
const SSG_EG: usize = 6;
const CHANNEL: usize = 7;

const DETUNE: Range<usize> = 4..7;
const MULTIPLE: Range<usize> = 0..4;
const TOTAL_LEVEL: Range<usize> = 0..7;
const RATE_SCALING: Range<usize> = 6..8;
const ATTACK_RATE: Range<usize> = 0..5;
const AMPLITUDE_MODULATION: usize = 7;
const DECAY_RATE: Range<usize> = 0..5;
const SUSTAIN_RATE: Range<usize> = 0..5;
const SUSTAIN_LEVEL: Range<usize> = 4..8;
const RELEASE_RATE: Range<usize> = 0..4;
const SSGEG: Range<usize> = 0..4;
const AMS: Range<usize> = 4..6;
const FMS: Range<usize> = 0..3;
const FEEDBACK: Range<usize> = 3..6;
const ALGORITHM: Range<usize> = 0..3;

// Byte B4 (AMS/FMS) sits in operator 3's column of the last row,
// byte B0 (feedback/algorithm) in operator 1's.
const LFO_SENSITIVITY_SLOT: OpId = OpId::Op3;
const FEEDBACK_ALGORITHM_SLOT: OpId = OpId::Op1;

fn field_max(bits: &Range<usize>) -> u8 {
    ((1u16 << (bits.end - bits.start)) - 1) as u8
}

// Generates a clamped get/set pair for a plain numeric operator field.
macro_rules! operator_field {
    ($(#[$meta:meta])* $get:ident, $set:ident, $row:expr, $bits:expr) => {
        $(#[$meta])*
        pub fn $get(&self, op: OpId) -> u8 {
            self.field(op, $row, $bits)
        }

        pub fn $set(&mut self, op: OpId, value: u8) {
            self.set_field(op, $row, $bits, value);
        }
    }
}

/// YM2612 register block for one FM instrument (four operators).
#[repr(transparent)]
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub struct Operators {
    registers: [Register; REGISTER_COUNT],
}

impl Operators {
    /// All registers zeroed.
    pub const EMPTY: Operators = Operators {
        registers: [Register::new(0); REGISTER_COUNT],
    };

    pub fn new() -> Self {
        Self::EMPTY
    }

    /// Makes a register block from raw bytes in physical order.
    pub fn from_registers(data: [u8; REGISTER_COUNT]) -> Self {
        Self {
            registers: data.map(Register::new),
        }
    }

    pub fn registers(&self) -> &[Register; REGISTER_COUNT] {
        &self.registers
    }

    /// Gets the raw register bytes in physical order.
    pub fn to_bytes(&self) -> [u8; REGISTER_COUNT] {
        self.registers.map(Register::get)
    }

    fn reg(&self, op: OpId, row: usize) -> u8 {
        self.registers[op.index() + row * 4].get()
    }

    fn reg_mut(&mut self, op: OpId, row: usize) -> &mut Register {
        &mut self.registers[op.index() + row * 4]
    }

    fn field(&self, op: OpId, row: usize, bits: Range<usize>) -> u8 {
        self.reg(op, row).bit_range(bits)
    }

    /// Clamps `value` to the width of `bits` and writes it,
    /// leaving every other bit of the register alone.
    fn set_field(&mut self, op: OpId, row: usize, bits: Range<usize>, value: u8) {
        let max = Register::new(field_max(&bits));
        let value = Register::new(value).min(max);

        let reg = self.reg_mut(op, row);
        let mut byte = reg.get();
        byte.set_bit_range(bits, value.get());
        *reg = Register::new(byte);
    }

    pub fn detune(&self, op: OpId) -> DetuneMode {
        DetuneMode::from(self.field(op, DT_MUL, DETUNE))
    }

    pub fn set_detune(&mut self, op: OpId, mode: DetuneMode) {
        self.set_field(op, DT_MUL, DETUNE, mode as u8);
    }

    operator_field!(
        /// Frequency multiple (0...15).
        multiple, set_multiple, DT_MUL, MULTIPLE);

    operator_field!(
        /// Attenuation (0...127), 0 is loudest.
        total_level, set_total_level, TL, TOTAL_LEVEL);

    pub fn rate_scaling(&self, op: OpId) -> RateScalingMode {
        RateScalingMode::from(self.field(op, RS_AR, RATE_SCALING))
    }

    pub fn set_rate_scaling(&mut self, op: OpId, mode: RateScalingMode) {
        self.set_field(op, RS_AR, RATE_SCALING, mode as u8);
    }

    operator_field!(
        /// Attack rate (0...31).
        attack_rate, set_attack_rate, RS_AR, ATTACK_RATE);

    pub fn amplitude_modulation(&self, op: OpId) -> bool {
        self.reg(op, AM_DR).bit(AMPLITUDE_MODULATION)
    }

    pub fn set_amplitude_modulation(&mut self, op: OpId, enabled: bool) {
        let reg = self.reg_mut(op, AM_DR);
        let mut byte = reg.get();
        byte.set_bit(AMPLITUDE_MODULATION, enabled);
        *reg = Register::new(byte);
    }

    operator_field!(
        /// First decay rate (0...31).
        decay_rate, set_decay_rate, AM_DR, DECAY_RATE);

    operator_field!(
        /// Second decay rate (0...31).
        sustain_rate, set_sustain_rate, SR, SUSTAIN_RATE);

    operator_field!(
        /// Level where the first decay hands over to the second (0...15).
        sustain_level, set_sustain_level, SL_RR, SUSTAIN_LEVEL);

    operator_field!(
        /// Release rate (0...15).
        release_rate, set_release_rate, SL_RR, RELEASE_RATE);

    pub fn ssgeg(&self, op: OpId) -> SsgEgMode {
        SsgEgMode::from_nibble(self.field(op, SSG_EG, SSGEG))
    }

    pub fn set_ssgeg(&mut self, op: OpId, mode: SsgEgMode) {
        self.set_field(op, SSG_EG, SSGEG, mode as u8);
    }

    /// Amplitude modulation sensitivity (0...3), shared by all operators.
    pub fn ams(&self) -> u8 {
        self.field(LFO_SENSITIVITY_SLOT, CHANNEL, AMS)
    }

    pub fn set_ams(&mut self, value: u8) {
        self.set_field(LFO_SENSITIVITY_SLOT, CHANNEL, AMS, value);
    }

    /// Frequency modulation sensitivity (0...7), shared by all operators.
    pub fn fms(&self) -> u8 {
        self.field(LFO_SENSITIVITY_SLOT, CHANNEL, FMS)
    }

    pub fn set_fms(&mut self, value: u8) {
        self.set_field(LFO_SENSITIVITY_SLOT, CHANNEL, FMS, value);
    }

    pub fn feedback(&self) -> FeedbackMode {
        FeedbackMode::from(self.field(FEEDBACK_ALGORITHM_SLOT, CHANNEL, FEEDBACK))
    }

    pub fn set_feedback(&mut self, mode: FeedbackMode) {
        self.set_field(FEEDBACK_ALGORITHM_SLOT, CHANNEL, FEEDBACK, mode as u8);
    }

    pub fn algorithm(&self) -> AlgorithmMode {
        AlgorithmMode::from(self.field(FEEDBACK_ALGORITHM_SLOT, CHANNEL, ALGORITHM))
    }

    pub fn set_algorithm(&mut self, mode: AlgorithmMode) {
        self.set_field(FEEDBACK_ALGORITHM_SLOT, CHANNEL, ALGORITHM, mode as u8);
    }

    /// Makes a register block with random settings.
    pub fn random() -> Self {
        let mut rng = rand::rng();
        let mut ops = Operators::new();

        for op in OpId::ALL {
            ops.set_detune(op, DetuneMode::ALL[rng.random_range(0..DetuneMode::ALL.len())]);
            ops.set_multiple(op, rng.random_range(0..=15));
            ops.set_total_level(op, rng.random_range(0..=127));
            ops.set_rate_scaling(op, RateScalingMode::ALL[rng.random_range(0..RateScalingMode::ALL.len())]);
            ops.set_attack_rate(op, rng.random_range(0..=31));
            ops.set_amplitude_modulation(op, rng.random_bool(0.5));
            ops.set_decay_rate(op, rng.random_range(0..=31));
            ops.set_sustain_rate(op, rng.random_range(0..=31));
            ops.set_sustain_level(op, rng.random_range(0..=15));
            ops.set_release_rate(op, rng.random_range(0..=15));
            ops.set_ssgeg(op, SsgEgMode::ALL[rng.random_range(0..SsgEgMode::ALL.len())]);
        }

        ops.set_ams(rng.random_range(0..=3));
        ops.set_fms(rng.random_range(0..=7));
        ops.set_feedback(FeedbackMode::ALL[rng.random_range(0..FeedbackMode::ALL.len())]);
        ops.set_algorithm(AlgorithmMode::ALL[rng.random_range(0..AlgorithmMode::ALL.len())]);

        ops
    }
}

impl fmt::Display for Operators {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "ALG: {}, feedback = {}, AMS = {}, FMS = {}",
            self.algorithm(), self.feedback(), self.ams(), self.fms())?;
        for op in OpId::ALL {
            writeln!(f, "{}: DT = {}, MUL = {}, TL = {}, RS = {}, AR = {}, AM = {}, D1R = {}, D2R = {}, D1L = {}, RR = {}, SSG-EG = {}",
                op,
                self.detune(op),
                self.multiple(op),
                self.total_level(op),
                self.rate_scaling(op),
                self.attack_rate(op),
                self.amplitude_modulation(op),
                self.decay_rate(op),
                self.sustain_rate(op),
                self.sustain_level(op),
                self.release_rate(op),
                self.ssgeg(op))?;
        }
        Ok(())
    }
}
