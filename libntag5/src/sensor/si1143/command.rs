// libntag5/src/sensor/si1143/command.rs

use thiserror::Error;

/// Response register bit 7: the last command failed.
pub const RESPONSE_ERROR: u8 = 0x80;

/// Commands written to the COMMAND register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Nop,
    Reset,
    BusAddr,
    PsForce,
    AlsForce,
    PsAlsForce,
    PsPause,
    AlsPause,
    PsAlsPause,
    PsAuto,
    AlsAuto,
    PsAlsAuto,
    GetCal,
    ParamQuery(u8),
    ParamSet(u8),
}

impl Command {
    pub fn opcode(self) -> u8 {
        match self {
            Command::Nop => 0x00,
            Command::Reset => 0x01,
            Command::BusAddr => 0x02,
            Command::PsForce => 0x05,
            Command::AlsForce => 0x06,
            Command::PsAlsForce => 0x07,
            Command::PsPause => 0x09,
            Command::AlsPause => 0x0A,
            Command::PsAlsPause => 0x0B,
            Command::PsAuto => 0x0D,
            Command::AlsAuto => 0x0E,
            Command::PsAlsAuto => 0x0F,
            Command::GetCal => 0x12,
            Command::ParamQuery(p) => 0x80 | (p & 0x1F),
            Command::ParamSet(p) => 0xA0 | (p & 0x1F),
        }
    }

    /// NOP clears the response register and RESET wipes it, so neither
    /// advances the response counter.
    pub fn has_response(self) -> bool {
        !matches!(self, Command::Nop | Command::Reset)
    }
}

/// Failure codes reported through the response register.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Si114xError {
    #[error("invalid command or parameter setting")]
    InvalidSetting,
    #[error("PS1 ADC overflow")]
    Ps1Overflow,
    #[error("PS2 ADC overflow")]
    Ps2Overflow,
    #[error("PS3 ADC overflow")]
    Ps3Overflow,
    #[error("ALS visible ADC overflow")]
    AlsVisibleOverflow,
    #[error("ALS IR ADC overflow")]
    AlsIrOverflow,
    #[error("AUX ADC overflow")]
    AuxOverflow,
    #[error("unknown response code {0:#04x}")]
    Unknown(u8),
}

impl Si114xError {
    pub fn from_response(code: u8) -> Self {
        match code {
            0x80 => Self::InvalidSetting,
            0x88 => Self::Ps1Overflow,
            0x89 => Self::Ps2Overflow,
            0x8A => Self::Ps3Overflow,
            0x8C => Self::AlsVisibleOverflow,
            0x8D => Self::AlsIrOverflow,
            0x8E => Self::AuxOverflow,
            other => Self::Unknown(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_opcodes() {
        assert_eq!(Command::ParamQuery(0x01).opcode(), 0x81);
        assert_eq!(Command::ParamSet(0x01).opcode(), 0xA1);
        assert_eq!(Command::ParamSet(0x3F).opcode(), 0xBF);
        assert!(!Command::Nop.has_response());
        assert!(Command::PsForce.has_response());
    }

    #[test]
    fn response_codes() {
        assert_eq!(Si114xError::from_response(0x8D), Si114xError::AlsIrOverflow);
        assert_eq!(Si114xError::from_response(0x81), Si114xError::Unknown(0x81));
    }
}
