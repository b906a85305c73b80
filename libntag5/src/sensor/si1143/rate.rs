// libntag5/src/sensor/si1143/rate.rs

//! 8-bit compressed rates used by MEAS_RATE, ALS_RATE and PS_RATE.
//!
//! The upper nibble is an exponent, the lower nibble the fraction of a
//! 1.xxxx mantissa. Uncompressed values count 31.25 µs ticks.

/// Duration of one uncompressed tick in microseconds.
pub const TICK_US: f32 = 31.25;

pub fn uncompress(input: u8) -> u16 {
    if input < 8 {
        return 0;
    }
    let exponent = u32::from(input >> 4);
    let mantissa = 0x10 | u32::from(input & 0x0F);
    let out = if exponent >= 4 {
        mantissa << (exponent - 4)
    } else {
        mantissa >> (4 - exponent)
    };
    out as u16
}

/// Inverse of [`uncompress`], rounding to the nearest representable value.
/// Values above the largest representable rate saturate at 0xFF.
pub fn compress(input: u16) -> u8 {
    match input {
        0 => return 0,
        1 => return 0x08,
        _ => {}
    }
    let input = u32::from(input);
    let mut exponent = 31 - input.leading_zeros();
    if exponent < 5 {
        let fraction = (input << (4 - exponent)) & 0x0F;
        return ((exponent << 4) | fraction) as u8;
    }

    let mut significand = input >> (exponent - 5);
    if significand & 0x01 != 0 {
        significand += 2;
    }
    if significand & 0x40 != 0 {
        exponent += 1;
        significand >>= 1;
    }
    if exponent > 0x0F {
        return 0xFF;
    }
    ((exponent << 4) | ((significand >> 1) & 0x0F)) as u8
}

/// Compressed rate to microseconds.
pub fn to_micros(compressed: u8) -> f32 {
    f32::from(uncompress(compressed)) * TICK_US
}
