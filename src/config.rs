//! Configuración del sensor, de la captura de gestos y del gráfico

use std::path::PathBuf;
use std::time::Duration;

use crate::device::{Gy85Error, Gy85Result};
use crate::pacing::PacingMode;
use crate::register::{adxl345, itg3205, Chip, RegisterMap};
use crate::types::{AccelDataRate, AccelRange, GyroDlpf};

/// Configuración de la placa GY-85
#[derive(Debug, Clone)]
pub struct Gy85Config {
    pub gyro_address: u8,
    pub accel_address: u8,
    pub gyro_dlpf: GyroDlpf,
    /// Divisor de SMPLRT_DIV: F = F_interna / (div + 1)
    pub gyro_sample_divider: u8,
    pub accel_range: AccelRange,
    pub accel_full_resolution: bool,
    pub accel_data_rate: AccelDataRate,
    /// Si es `true`, un WHO_AM_I/DEVID inesperado aborta la inicialización
    pub verify_identity: bool,
}

impl Default for Gy85Config {
    fn default() -> Self {
        Self {
            gyro_address: itg3205::Map::DEFAULT_ADDRESS,
            accel_address: adxl345::Map::DEFAULT_ADDRESS,
            gyro_dlpf: GyroDlpf::default(),
            gyro_sample_divider: 0,
            accel_range: AccelRange::default(),
            accel_full_resolution: false,
            accel_data_rate: AccelDataRate::default(),
            verify_identity: false,
        }
    }
}

impl Gy85Config {
    /// Dirección configurada para un chip
    pub fn address(&self, chip: Chip) -> u8 {
        match chip {
            Chip::Itg3205 => self.gyro_address,
            Chip::Adxl345 => self.accel_address,
        }
    }
}

/// Parámetros de una sesión de captura de gestos
#[derive(Debug, Clone)]
pub struct CollectionConfig {
    pub person: String,
    pub gesture: String,
    pub repetitions: u32,
    /// Duración de cada repetición
    pub duration: Duration,
    /// Frecuencia nominal de muestreo en Hz
    pub sample_rate: f64,
    /// Pausa entre repeticiones (no se aplica tras la última)
    pub pause: Duration,
    pub output_dir: PathBuf,
    pub pacing: PacingMode,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            person: String::new(),
            gesture: String::new(),
            repetitions: 5,
            duration: Duration::from_secs(5),
            sample_rate: 50.0,
            pause: Duration::from_secs(5),
            output_dir: PathBuf::from("gesture_data"),
            pacing: PacingMode::default(),
        }
    }
}

impl CollectionConfig {
    pub fn validate(&self) -> Gy85Result<()> {
        if self.person.trim().is_empty() {
            return Err(Gy85Error::InvalidInput("el nombre de la persona está vacío".into()));
        }
        if self.gesture.trim().is_empty() {
            return Err(Gy85Error::InvalidInput("el nombre del gesto está vacío".into()));
        }
        if self.repetitions == 0 {
            return Err(Gy85Error::InvalidParameter("repetitions debe ser >= 1"));
        }
        if self.duration.is_zero() {
            return Err(Gy85Error::InvalidParameter("duration debe ser > 0"));
        }
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(Gy85Error::InvalidParameter("sample_rate debe ser > 0"));
        }
        Ok(())
    }

    /// Número de muestras esperado por repetición
    pub fn expected_samples(&self) -> usize {
        (self.duration.as_secs_f64() * self.sample_rate).round() as usize
    }
}

/// Parámetros de la visualización en tiempo real
#[derive(Debug, Clone)]
pub struct PlotConfig {
    /// Periodo del temporizador
    pub interval: Duration,
    /// Puntos visibles en cada serie
    pub points: usize,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(10),
            points: 100,
            output: PathBuf::from("gy85_plot.png"),
            width: 1000,
            height: 800,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labelled() -> CollectionConfig {
        CollectionConfig {
            person: "ana".into(),
            gesture: "swipe_left".into(),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_match_board() {
        let cfg = Gy85Config::default();
        assert_eq!(cfg.address(Chip::Itg3205), 0x68);
        assert_eq!(cfg.address(Chip::Adxl345), 0x53);
        assert!(!cfg.verify_identity);
    }

    #[test]
    fn default_collection_expects_250_samples() {
        assert_eq!(labelled().expected_samples(), 250);
        assert!(labelled().validate().is_ok());
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut cfg = labelled();
        cfg.gesture = "  ".into();
        assert!(matches!(cfg.validate(), Err(Gy85Error::InvalidInput(_))));

        let mut cfg = labelled();
        cfg.repetitions = 0;
        assert!(matches!(cfg.validate(), Err(Gy85Error::InvalidParameter(_))));

        let mut cfg = labelled();
        cfg.sample_rate = 0.0;
        assert!(cfg.validate().is_err());

        let mut cfg = labelled();
        cfg.duration = Duration::ZERO;
        assert!(cfg.validate().is_err());
    }
}
