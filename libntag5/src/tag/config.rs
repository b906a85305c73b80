// libntag5/src/tag/config.rs

//! Bit layouts of the CONFIG and EH_CONFIG pages.
//!
//! Every record keeps the bits it does not name in an `rfu` field so that
//! decode followed by encode reproduces the page exactly.

use derive_more::Display;

use crate::types::ConfigPage;

/// CONFIG page: CONFIG_0, CONFIG_1, CONFIG_2 and one reserved byte.
pub const ADDR_CONFIG: u8 = 0x37;
/// EH_CONFIG page: energy harvesting byte, RFU, ED_CONFIG, RFU.
pub const ADDR_EH_CONFIG: u8 = 0x3D;
/// Energy harvesting session register.
pub const ADDR_EH_SESSION: u8 = 0xA7;
/// I2C master status session register.
pub const ADDR_I2C_MASTER_STATUS: u8 = 0xAD;

fn bit(v: u8, n: u8) -> bool {
    v & (1 << n) != 0
}

fn flag(on: bool, n: u8) -> u8 {
    if on { 1 << n } else { 0 }
}

/// Field strength needed before the harvester switches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum EhMode {
    #[display(fmt = "rfu0")]
    Rfu0,
    #[display(fmt = "rfu1")]
    Rfu1,
    #[display(fmt = "low_field_strength")]
    LowFieldStrength,
    #[display(fmt = "high_field_strength")]
    HighFieldStrength,
}

impl EhMode {
    fn from_bits(v: u8) -> Self {
        match v & 0x03 {
            0 => EhMode::Rfu0,
            1 => EhMode::Rfu1,
            2 => EhMode::LowFieldStrength,
            _ => EhMode::HighFieldStrength,
        }
    }

    fn bits(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Config0 {
    pub auto_standby: bool,
    pub lock_session_register: bool,
    pub eh_mode: EhMode,
    pub sram_copy: bool,
    /// Bits 4..=6 as read.
    pub rfu: u8,
}

impl Config0 {
    pub fn decode(v: u8) -> Self {
        Self {
            auto_standby: bit(v, 0),
            lock_session_register: bit(v, 1),
            eh_mode: EhMode::from_bits(v >> 2),
            sram_copy: bit(v, 7),
            rfu: v & 0x70,
        }
    }

    pub fn encode(&self) -> u8 {
        flag(self.auto_standby, 0)
            | flag(self.lock_session_register, 1)
            | (self.eh_mode.bits() << 2)
            | (self.rfu & 0x70)
            | flag(self.sram_copy, 7)
    }
}

/// Pass-through direction. Cleared bit means data flows from the I2C side
/// to the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TransferDirection {
    #[display(fmt = "tag_to_reader")]
    TagToReader,
    #[display(fmt = "reader_to_tag")]
    ReaderToTag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ArbiterMode {
    #[display(fmt = "normal")]
    Normal,
    #[display(fmt = "sram_mirror")]
    SramMirror,
    #[display(fmt = "sram_passthrough")]
    SramPassThrough,
    #[display(fmt = "sram_phdc")]
    SramPhdc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum UseCase {
    #[display(fmt = "i2c_slave")]
    I2cSlave,
    #[display(fmt = "i2c_master")]
    I2cMaster,
    #[display(fmt = "gpio_pwm")]
    GpioPwm,
    #[display(fmt = "tristate")]
    Tristate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Config1 {
    pub transfer_direction: TransferDirection,
    pub sram_enable: bool,
    pub arbiter_mode: ArbiterMode,
    pub use_case: UseCase,
    pub eh_arbiter_enable: bool,
    /// Bit 6 as read.
    pub rfu: u8,
}

impl Config1 {
    pub fn decode(v: u8) -> Self {
        let arbiter_mode = match (v >> 2) & 0x03 {
            0 => ArbiterMode::Normal,
            1 => ArbiterMode::SramMirror,
            2 => ArbiterMode::SramPassThrough,
            _ => ArbiterMode::SramPhdc,
        };
        let use_case = match (v >> 4) & 0x03 {
            0 => UseCase::I2cSlave,
            1 => UseCase::I2cMaster,
            2 => UseCase::GpioPwm,
            _ => UseCase::Tristate,
        };
        Self {
            transfer_direction: if bit(v, 0) {
                TransferDirection::ReaderToTag
            } else {
                TransferDirection::TagToReader
            },
            sram_enable: bit(v, 1),
            arbiter_mode,
            use_case,
            eh_arbiter_enable: bit(v, 7),
            rfu: v & 0x40,
        }
    }

    pub fn encode(&self) -> u8 {
        flag(self.transfer_direction == TransferDirection::ReaderToTag, 0)
            | flag(self.sram_enable, 1)
            | ((self.arbiter_mode as u8) << 2)
            | ((self.use_case as u8) << 4)
            | (self.rfu & 0x40)
            | flag(self.eh_arbiter_enable, 7)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SlewRate {
    #[display(fmt = "normal")]
    Normal,
    #[display(fmt = "fast")]
    Fast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum PadInput {
    #[display(fmt = "disabled")]
    Disabled,
    #[display(fmt = "plain_pullup")]
    PlainPullUp,
    #[display(fmt = "plain")]
    Plain,
    #[display(fmt = "plain_pulldown")]
    PlainPullDown,
}

impl PadInput {
    fn from_bits(v: u8) -> Self {
        match v & 0x03 {
            0 => PadInput::Disabled,
            1 => PadInput::PlainPullUp,
            2 => PadInput::Plain,
            _ => PadInput::PlainPullDown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Config2 {
    pub gpio0_slew_rate: SlewRate,
    pub gpio1_slew_rate: SlewRate,
    pub lock_block_supported: bool,
    pub extended_commands_supported: bool,
    pub gpio0_pad: PadInput,
    pub gpio1_pad: PadInput,
}

impl Config2 {
    pub fn decode(v: u8) -> Self {
        let slew = |on| if on { SlewRate::Fast } else { SlewRate::Normal };
        Self {
            gpio0_slew_rate: slew(bit(v, 0)),
            gpio1_slew_rate: slew(bit(v, 1)),
            lock_block_supported: bit(v, 2),
            extended_commands_supported: bit(v, 3),
            gpio0_pad: PadInput::from_bits(v >> 4),
            gpio1_pad: PadInput::from_bits(v >> 6),
        }
    }

    pub fn encode(&self) -> u8 {
        flag(self.gpio0_slew_rate == SlewRate::Fast, 0)
            | flag(self.gpio1_slew_rate == SlewRate::Fast, 1)
            | flag(self.lock_block_supported, 2)
            | flag(self.extended_commands_supported, 3)
            | ((self.gpio0_pad as u8) << 4)
            | ((self.gpio1_pad as u8) << 6)
    }
}

/// Decoded CONFIG page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ConfigInfo {
    pub config0: Config0,
    pub config1: Config1,
    pub config2: Config2,
}

impl ConfigInfo {
    pub fn decode(page: &ConfigPage) -> Self {
        Self {
            config0: Config0::decode(page.byte(0)),
            config1: Config1::decode(page.byte(1)),
            config2: Config2::decode(page.byte(2)),
        }
    }

    /// Write all three bytes over `page`, keeping byte 3.
    pub fn apply(&self, page: ConfigPage) -> ConfigPage {
        page.with_byte(0, self.config0.encode())
            .with_byte(1, self.config1.encode())
            .with_byte(2, self.config2.encode())
    }
}

/// Harvester output current limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum EhCurrent {
    #[display(fmt = "0.4 mA")]
    Ma0_4,
    #[display(fmt = "0.6 mA")]
    Ma0_6,
    #[display(fmt = "1.4 mA")]
    Ma1_4,
    #[display(fmt = "2.7 mA")]
    Ma2_7,
    #[display(fmt = "4.0 mA")]
    Ma4_0,
    #[display(fmt = "6.5 mA")]
    Ma6_5,
    #[display(fmt = "9.0 mA")]
    Ma9_0,
    #[display(fmt = "12.5 mA")]
    Ma12_5,
}

impl EhCurrent {
    pub const ALL: [EhCurrent; 8] = [
        EhCurrent::Ma0_4,
        EhCurrent::Ma0_6,
        EhCurrent::Ma1_4,
        EhCurrent::Ma2_7,
        EhCurrent::Ma4_0,
        EhCurrent::Ma6_5,
        EhCurrent::Ma9_0,
        EhCurrent::Ma12_5,
    ];

    pub fn milliamps(self) -> f32 {
        [0.4, 0.6, 1.4, 2.7, 4.0, 6.5, 9.0, 12.5][self as usize]
    }
}

/// Harvester output voltage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum EhVoltage {
    #[display(fmt = "1.8 V")]
    V1_8,
    #[display(fmt = "2.4 V")]
    V2_4,
    #[display(fmt = "3.0 V")]
    V3_0,
    #[display(fmt = "RFU")]
    Rfu,
}

/// Event signalled on the energy detection pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum EdConfig {
    #[display(fmt = "disable")]
    Disable,
    #[display(fmt = "nfc_field_detect")]
    NfcFieldDetect,
    #[display(fmt = "pwm")]
    Pwm,
    #[display(fmt = "i2c_to_nfc_pass_through")]
    I2cToNfcPassThrough,
    #[display(fmt = "nfc_to_i2c_pass_through")]
    NfcToI2cPassThrough,
    #[display(fmt = "arbiter_lock")]
    ArbiterLock,
    #[display(fmt = "ndef_msg_tlv_length")]
    NdefMessageTlvLength,
    #[display(fmt = "standby_mode")]
    StandbyMode,
    #[display(fmt = "write_cmd_indication")]
    WriteCommandIndication,
    #[display(fmt = "read_cmd_indication")]
    ReadCommandIndication,
    #[display(fmt = "start_of_command_indication")]
    StartOfCommandIndication,
    #[display(fmt = "read_from_synch_block")]
    ReadFromSyncBlock,
    #[display(fmt = "write_to_synch_block")]
    WriteToSyncBlock,
    #[display(fmt = "software_interrupt")]
    SoftwareInterrupt,
    #[display(fmt = "rfu1")]
    Rfu1,
    #[display(fmt = "rfu2")]
    Rfu2,
}

impl EdConfig {
    pub const ALL: [EdConfig; 16] = [
        EdConfig::Disable,
        EdConfig::NfcFieldDetect,
        EdConfig::Pwm,
        EdConfig::I2cToNfcPassThrough,
        EdConfig::NfcToI2cPassThrough,
        EdConfig::ArbiterLock,
        EdConfig::NdefMessageTlvLength,
        EdConfig::StandbyMode,
        EdConfig::WriteCommandIndication,
        EdConfig::ReadCommandIndication,
        EdConfig::StartOfCommandIndication,
        EdConfig::ReadFromSyncBlock,
        EdConfig::WriteToSyncBlock,
        EdConfig::SoftwareInterrupt,
        EdConfig::Rfu1,
        EdConfig::Rfu2,
    ];
}

/// Decoded EH_CONFIG page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EnergyConfig {
    pub enable: bool,
    pub voltage: EhVoltage,
    pub disable_power_check: bool,
    pub current: EhCurrent,
    pub ed_config: EdConfig,
    /// Bit 7 of byte 0 as read.
    pub rfu0: u8,
    /// Bits 4..=7 of byte 2 as read.
    pub rfu2: u8,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            enable: false,
            voltage: EhVoltage::V1_8,
            disable_power_check: false,
            current: EhCurrent::Ma0_4,
            ed_config: EdConfig::Disable,
            rfu0: 0,
            rfu2: 0,
        }
    }
}

impl EnergyConfig {
    pub fn decode(page: &ConfigPage) -> Self {
        let b0 = page.byte(0);
        let b2 = page.byte(2);
        let voltage = match (b0 >> 1) & 0x03 {
            0 => EhVoltage::V1_8,
            1 => EhVoltage::V2_4,
            2 => EhVoltage::V3_0,
            _ => EhVoltage::Rfu,
        };
        Self {
            enable: bit(b0, 0),
            voltage,
            disable_power_check: bit(b0, 3),
            current: EhCurrent::ALL[((b0 >> 4) & 0x07) as usize],
            ed_config: EdConfig::ALL[(b2 & 0x0F) as usize],
            rfu0: b0 & 0x80,
            rfu2: b2 & 0xF0,
        }
    }

    /// Overwrite bytes 0 and 2 of `page`; bytes 1 and 3 are kept.
    pub fn apply(&self, page: ConfigPage) -> ConfigPage {
        let b0 = flag(self.enable, 0)
            | ((self.voltage as u8) << 1)
            | flag(self.disable_power_check, 3)
            | ((self.current as u8) << 4)
            | (self.rfu0 & 0x80);
        let b2 = (self.ed_config as u8) | (self.rfu2 & 0xF0);
        page.with_byte(0, b0).with_byte(2, b2)
    }
}
