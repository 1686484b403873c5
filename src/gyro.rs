//! Controles del giroscopio ITG3205

use embedded_hal::delay::DelayNs;
use log::debug;

use crate::conversion::{gyro_raw_to_dps, temp_raw_to_celsius, word_from_be};
use crate::device::{Gy85, Gy85Error};
use crate::interface::Interface;
use crate::register::{bits, itg3205};
use crate::types::GyroDlpf;

/// Tiempo de arranque del giroscopio tras salir de reposo (ms)
const GYRO_STARTUP_MS: u32 = 50;

impl<I, D> Gy85<I, D>
where
    I: Interface,
    D: DelayNs,
    Gy85Error: From<I::Error>,
{
    /// Despierta el ITG3205 y fija la escala completa a ±2000 °/s
    pub fn init_gyro(&mut self) -> Result<(), Gy85Error> {
        // Oscilador interno, sin reposo
        self.write_reg::<itg3205::Map>(itg3205::PWR_MGM, bits::ITG_CLK_INTERNAL)?;
        self.delay.delay_ms(GYRO_STARTUP_MS);

        let divider = self.base_state.config.gyro_sample_divider;
        self.write_reg::<itg3205::Map>(itg3205::SMPLRT_DIV, divider)?;

        let dlpf = self.base_state.config.gyro_dlpf;
        self.write_reg::<itg3205::Map>(itg3205::DLPF_FS, dlpf_fs_value(dlpf))?;

        self.base_state.gyro_awake = true;
        debug!(
            "ITG3205 activo: DLPF {:?}, {} Hz",
            dlpf,
            self.gyro_sample_rate_hz()
        );
        Ok(())
    }

    /// Reset por software del ITG3205; hay que volver a llamar a `init_gyro`
    pub fn soft_reset_gyro(&mut self) -> Result<(), Gy85Error> {
        self.write_reg::<itg3205::Map>(itg3205::PWR_MGM, bits::ITG_H_RESET)?;
        self.delay.delay_ms(GYRO_STARTUP_MS);
        self.base_state.gyro_awake = false;
        Ok(())
    }

    /// Pone el giroscopio en reposo o lo despierta
    pub fn set_gyro_sleep(&mut self, sleep: bool) -> Result<(), Gy85Error> {
        self.modify_reg::<itg3205::Map, _>(itg3205::PWR_MGM, |val| {
            if sleep {
                val | bits::ITG_SLEEP
            } else {
                val & !bits::ITG_SLEEP
            }
        })?;
        self.base_state.gyro_awake = !sleep;
        Ok(())
    }

    pub fn set_gyro_dlpf(&mut self, dlpf: GyroDlpf) -> Result<(), Gy85Error> {
        self.write_reg::<itg3205::Map>(itg3205::DLPF_FS, dlpf_fs_value(dlpf))?;
        self.base_state.config.gyro_dlpf = dlpf;
        Ok(())
    }

    pub fn set_gyro_sample_divider(&mut self, divider: u8) -> Result<(), Gy85Error> {
        self.write_reg::<itg3205::Map>(itg3205::SMPLRT_DIV, divider)?;
        self.base_state.config.gyro_sample_divider = divider;
        Ok(())
    }

    /// Frecuencia de salida del giroscopio según DLPF y divisor
    pub fn gyro_sample_rate_hz(&self) -> f32 {
        let cfg = &self.base_state.config;
        cfg.gyro_dlpf.internal_rate_hz() as f32 / (cfg.gyro_sample_divider as f32 + 1.0)
    }

    /// Indica si hay un dato nuevo disponible (RAW_DATA_RDY)
    pub fn gyro_data_ready(&mut self) -> Result<bool, Gy85Error> {
        let status = self.read_reg::<itg3205::Map>(itg3205::INT_STATUS)?;
        Ok(status & bits::ITG_RAW_DATA_RDY != 0)
    }

    /// Lee los datos del giroscopio desde los registros
    pub fn gyro_read_hw_reg_data(&mut self) -> Result<[i16; 3], Gy85Error> {
        let mut gyro_data = [0u8; 6];
        self.read_regs::<itg3205::Map>(itg3205::GYRO_XOUT_H, &mut gyro_data)?;

        Ok([
            word_from_be(gyro_data[0], gyro_data[1]),
            word_from_be(gyro_data[2], gyro_data[3]),
            word_from_be(gyro_data[4], gyro_data[5]),
        ])
    }

    /// Lee los datos raw del giroscopio y los devuelve en grados/segundo
    pub fn read_gyroscope(&mut self) -> Result<[f32; 3], Gy85Error> {
        if !self.base_state.gyro_awake {
            return Err(Gy85Error::NotInitialized);
        }
        let raw = self.gyro_read_hw_reg_data()?;
        Ok(gyro_raw_to_dps(raw))
    }

    pub fn read_temp_raw(&mut self) -> Result<i16, Gy85Error> {
        self.read_word::<itg3205::Map>(itg3205::TEMP_OUT_H)
    }

    /// Temperatura del encapsulado del ITG3205 en °C
    pub fn read_temperature(&mut self) -> Result<f32, Gy85Error> {
        let raw = self.read_temp_raw()?;
        Ok(temp_raw_to_celsius(raw))
    }
}

fn dlpf_fs_value(dlpf: GyroDlpf) -> u8 {
    bits::ITG_FS_SEL_2000DPS | (dlpf as u8 & bits::ITG_DLPF_CFG_MASK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Gy85Config;
    use crate::interface::mock::{MockI2c, NoopDelay};
    use crate::interface::I2cInterface;

    fn device(bus: MockI2c) -> Gy85<I2cInterface<MockI2c>, NoopDelay> {
        Gy85::new(I2cInterface::new(bus), NoopDelay)
    }

    #[test]
    fn full_scale_bits_always_set() {
        assert_eq!(dlpf_fs_value(GyroDlpf::Lp256Hz), 0x18);
        assert_eq!(dlpf_fs_value(GyroDlpf::Lp42Hz), 0x1B);
        assert_eq!(dlpf_fs_value(GyroDlpf::Lp5Hz), 0x1E);
    }

    #[test]
    fn reading_before_init_is_rejected() {
        let mut dev = device(MockI2c::gy85());
        assert!(matches!(dev.read_gyroscope(), Err(Gy85Error::NotInitialized)));
    }

    #[test]
    fn gyroscope_in_degrees_per_second() {
        let mut bus = MockI2c::gy85();
        // 28750 = 2000 °/s, -1 LSB, 0
        bus.set_many(0x68, 0x1D, &[0x70, 0x4E, 0xFF, 0xFF, 0x00, 0x00]);
        let mut dev = device(bus);
        dev.init_gyro().unwrap();
        let dps = dev.read_gyroscope().unwrap();
        assert!((dps[0] - 2000.0).abs() < 1e-2);
        assert!((dps[1] + 1.0 / 14.375).abs() < 1e-6);
        assert_eq!(dps[2], 0.0);
    }

    #[test]
    fn sample_rate_from_divider() {
        let config = Gy85Config {
            gyro_dlpf: GyroDlpf::Lp42Hz,
            gyro_sample_divider: 9,
            ..Default::default()
        };
        let mut dev = Gy85::with_config(I2cInterface::new(MockI2c::gy85()), NoopDelay, config);
        assert!((dev.gyro_sample_rate_hz() - 100.0).abs() < 1e-3);
        dev.set_gyro_sample_divider(0).unwrap();
        assert!((dev.gyro_sample_rate_hz() - 1000.0).abs() < 1e-3);
    }

    #[test]
    fn data_ready_and_temperature() {
        let mut bus = MockI2c::gy85();
        bus.set(0x68, itg3205::INT_STATUS, 0x01);
        // -13200 = 0xCC70 -> 35 °C
        bus.set_many(0x68, itg3205::TEMP_OUT_H, &[0xCC, 0x70]);
        let mut dev = device(bus);
        assert!(dev.gyro_data_ready().unwrap());
        assert!((dev.read_temperature().unwrap() - 35.0).abs() < 1e-3);
    }

    #[test]
    fn sleep_toggles_bit() {
        let mut dev = device(MockI2c::gy85());
        dev.init_gyro().unwrap();
        dev.set_gyro_sleep(true).unwrap();
        assert!(matches!(dev.read_gyroscope(), Err(Gy85Error::NotInitialized)));
        dev.set_gyro_sleep(false).unwrap();
        let (iface, _) = dev.release();
        let bus = iface.release();
        assert_eq!(bus.get(0x68, itg3205::PWR_MGM), 0x00);
    }
}
