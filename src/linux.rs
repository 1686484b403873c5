//! Soporte para buses I2C de Linux (`/dev/i2c-N`)

use linux_embedded_hal::{Delay, I2cdev};
use log::info;

use crate::config::Gy85Config;
use crate::device::{Gy85, Gy85Error};
use crate::interface::I2cInterface;

/// Bus I2C por defecto en una Raspberry Pi
pub const DEFAULT_I2C_BUS: &str = "/dev/i2c-1";

pub type LinuxGy85 = Gy85<I2cInterface<I2cdev>, Delay>;

/// Abre el bus y crea el dispositivo, sin inicializarlo
pub fn open_i2c_device(path: &str, config: Gy85Config) -> Result<LinuxGy85, Gy85Error> {
    let i2c = I2cdev::new(path).map_err(|e| Gy85Error::BusOpen {
        path: path.to_owned(),
        reason: e.to_string(),
    })?;
    info!("Bus I2C {} abierto", path);
    Ok(Gy85::with_config(I2cInterface::new(i2c), Delay, config))
}
