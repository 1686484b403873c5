//! Controles del acelerómetro ADXL345
//!
//! Los valores por defecto replican los del driver de referencia del
//! ADXL345: rango ±2g, 100Hz, interrupciones desactivadas y modo medida.

use embedded_hal::delay::DelayNs;
use log::debug;

use crate::conversion::{accel_raw_to_ms2, word_from_le};
use crate::device::{Gy85, Gy85Error};
use crate::interface::Interface;
use crate::register::{adxl345, bits};
use crate::types::{AccelDataRate, AccelRange};

impl<I, D> Gy85<I, D>
where
    I: Interface,
    D: DelayNs,
    Gy85Error: From<I::Error>,
{
    /// Configura formato y tasa del ADXL345 y lo pasa a modo medida
    pub fn init_accel(&mut self) -> Result<(), Gy85Error> {
        let format = data_format_value(
            self.base_state.config.accel_range,
            self.base_state.config.accel_full_resolution,
        );
        self.write_reg::<adxl345::Map>(adxl345::DATA_FORMAT, format)?;

        let rate = self.base_state.config.accel_data_rate;
        self.write_reg::<adxl345::Map>(adxl345::BW_RATE, rate as u8)?;

        self.write_reg::<adxl345::Map>(adxl345::INT_ENABLE, 0x00)?;
        self.write_reg::<adxl345::Map>(adxl345::POWER_CTL, bits::ADXL_MEASURE)?;

        self.base_state.accel_measuring = true;
        debug!("ADXL345 en modo medida: formato 0x{:02X}, tasa {:?}", format, rate);
        Ok(())
    }

    /// Sale del modo medida (standby)
    pub fn set_accel_standby(&mut self) -> Result<(), Gy85Error> {
        self.write_reg::<adxl345::Map>(adxl345::POWER_CTL, 0x00)?;
        self.base_state.accel_measuring = false;
        Ok(())
    }

    pub fn set_accel_range(&mut self, range: AccelRange) -> Result<(), Gy85Error> {
        self.modify_reg::<adxl345::Map, _>(adxl345::DATA_FORMAT, |val| {
            (val & !bits::ADXL_RANGE_MASK) | range as u8
        })?;
        self.base_state.config.accel_range = range;
        Ok(())
    }

    pub fn set_accel_full_resolution(&mut self, enable: bool) -> Result<(), Gy85Error> {
        self.modify_reg::<adxl345::Map, _>(adxl345::DATA_FORMAT, |val| {
            if enable {
                val | bits::ADXL_FULL_RES
            } else {
                val & !bits::ADXL_FULL_RES
            }
        })?;
        self.base_state.config.accel_full_resolution = enable;
        Ok(())
    }

    pub fn set_accel_data_rate(&mut self, rate: AccelDataRate) -> Result<(), Gy85Error> {
        self.modify_reg::<adxl345::Map, _>(adxl345::BW_RATE, |val| {
            (val & !bits::ADXL_RATE_MASK) | rate as u8
        })?;
        self.base_state.config.accel_data_rate = rate;
        Ok(())
    }

    /// Lee los datos del acelerómetro desde los registros (little-endian)
    pub fn accel_read_hw_reg_data(&mut self) -> Result<[i16; 3], Gy85Error> {
        let mut accel_data = [0u8; 6];
        self.read_regs::<adxl345::Map>(adxl345::DATAX0, &mut accel_data)?;

        Ok([
            word_from_le(accel_data[0], accel_data[1]),
            word_from_le(accel_data[2], accel_data[3]),
            word_from_le(accel_data[4], accel_data[5]),
        ])
    }

    /// Lee los datos raw del acelerómetro y los devuelve en m/s²
    pub fn read_accelerometer(&mut self) -> Result<[f32; 3], Gy85Error> {
        if !self.base_state.accel_measuring {
            return Err(Gy85Error::NotInitialized);
        }
        let raw = self.accel_read_hw_reg_data()?;
        let cfg = &self.base_state.config;
        Ok(accel_raw_to_ms2(raw, cfg.accel_range, cfg.accel_full_resolution))
    }
}

fn data_format_value(range: AccelRange, full_resolution: bool) -> u8 {
    let mut value = range as u8 & bits::ADXL_RANGE_MASK;
    if full_resolution {
        value |= bits::ADXL_FULL_RES;
    }
    value
}
