//! Funciones de conversión para datos de la GY-85
//!
//! Este módulo proporciona funciones para convertir datos raw de los
//! registros a unidades físicas: aceleración en m/s², velocidad angular
//! en grados por segundo y temperatura en grados Celsius.

use crate::types::{gravity, sensitivity, AccelRange};

/// Interpreta una palabra de 16 bits como entero con signo en complemento a dos
///
/// # Arguments
/// * `value` - Palabra sin signo tal y como sale de los registros
///
/// # Returns
/// `0x7FFF → 32767`, `0x8000 → -32768`, `0xFFFF → -1`
#[inline]
pub fn twos_complement_16(value: u16) -> i16 {
    value as i16
}

/// Combina dos bytes big-endian (alto primero), como en el ITG3205
#[inline]
pub fn word_from_be(high: u8, low: u8) -> i16 {
    twos_complement_16(((high as u16) << 8) | low as u16)
}

/// Combina dos bytes little-endian (bajo primero), como en el ADXL345
#[inline]
pub fn word_from_le(low: u8, high: u8) -> i16 {
    word_from_be(high, low)
}

/// Convierte datos brutos del giroscopio a grados/segundo
///
/// # Arguments
/// * `raw` - Valores brutos del giroscopio [x, y, z]
///
/// # Returns
/// Velocidad angular en grados/segundo [x, y, z]
pub fn gyro_raw_to_dps(raw: [i16; 3]) -> [f32; 3] {
    [
        raw[0] as f32 / sensitivity::GYRO_LSB_PER_DPS,
        raw[1] as f32 / sensitivity::GYRO_LSB_PER_DPS,
        raw[2] as f32 / sensitivity::GYRO_LSB_PER_DPS,
    ]
}

/// Factor g/LSB del ADXL345 según rango y modo de resolución
///
/// En resolución completa la sensibilidad es fija (4 mg/LSB); en modo de
/// 10 bits se duplica con cada rango.
pub fn accel_g_per_lsb(range: AccelRange, full_resolution: bool) -> f32 {
    if full_resolution {
        return sensitivity::ACCEL_G_PER_LSB;
    }
    sensitivity::ACCEL_G_PER_LSB * (1u32 << (range as u8)) as f32
}

/// Convierte datos brutos del acelerómetro a m/s²
///
/// # Arguments
/// * `raw` - Valores brutos del acelerómetro [x, y, z]
/// * `range` - Rango configurado en DATA_FORMAT
/// * `full_resolution` - Si el bit FULL_RES está activo
///
/// # Returns
/// Aceleración en m/s² [x, y, z]
pub fn accel_raw_to_ms2(raw: [i16; 3], range: AccelRange, full_resolution: bool) -> [f32; 3] {
    let factor = accel_g_per_lsb(range, full_resolution) * gravity::GRAVITY_MSS;
    [
        raw[0] as f32 * factor,
        raw[1] as f32 * factor,
        raw[2] as f32 * factor,
    ]
}

/// Convierte datos brutos de temperatura del ITG3205 a grados Celsius
pub fn temp_raw_to_celsius(raw: i16) -> f32 {
    // Temp °C = 35 + (TEMP_OUT - (-13200)) / 280
    sensitivity::TEMP_REF_C
        + (raw as f32 - sensitivity::TEMP_OFFSET_LSB) / sensitivity::TEMP_LSB_PER_C
}
