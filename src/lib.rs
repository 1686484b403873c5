//! Biblioteca Rust para la placa inercial GY-85
//!
//! Esta biblioteca proporciona una interfaz para leer el giroscopio ITG3205
//! y el acelerómetro ADXL345 de la GY-85 por I2C, grabar repeticiones de
//! gestos etiquetadas en CSV y visualizar los datos en tiempo real.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

// Importaciones internas
pub mod accel;
pub mod base;
pub mod collection;
pub mod config;
pub mod conversion;
pub mod csv_log;
pub mod device;
pub mod gyro;
pub mod interface;
pub mod pacing;
pub mod plot;
pub mod prompt;
pub mod register;
pub mod types;

#[cfg(feature = "linux")]
pub mod linux;

// Re-exports públicos
pub use base::{MonotonicTimeSource, TimeSource};
pub use collection::{CollectionSummary, GestureRecorder};
pub use config::{CollectionConfig, Gy85Config, PlotConfig};
pub use conversion::{accel_raw_to_ms2, gyro_raw_to_dps, temp_raw_to_celsius, twos_complement_16};
pub use csv_log::CsvLog;
pub use device::{Gy85, Gy85Error, Gy85Result, MotionSensor};
pub use pacing::PacingMode;
pub use types::{AccelDataRate, AccelRange, GyroDlpf, MotionReading, Sample};

use crate::interface::I2cInterface;

/// Crea un nuevo dispositivo GY-85 usando el bus I2C
pub fn new_i2c_device<I, D>(i2c: I, delay: D) -> Gy85<I2cInterface<I>, D>
where
    I: I2c,
    D: DelayNs,
{
    Gy85::new(I2cInterface::new(i2c), delay)
}
