//! Control de la frecuencia de muestreo

use std::fmt;
use std::str::FromStr;

use crate::base::TimeSource;
use crate::device::{Gy85Error, Gy85Result};

/// Estrategia para esperar hasta el siguiente periodo de muestreo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PacingMode {
    /// Espera activa consultando el reloj (máxima precisión, 100% CPU)
    #[default]
    Spin,
    /// Duerme el hilo el tiempo restante
    Sleep,
}

impl FromStr for PacingMode {
    type Err = Gy85Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spin" | "busy" => Ok(PacingMode::Spin),
            "sleep" => Ok(PacingMode::Sleep),
            other => Err(Gy85Error::InvalidInput(format!(
                "modo de espera desconocido '{}' (spin|sleep)",
                other
            ))),
        }
    }
}

impl fmt::Display for PacingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PacingMode::Spin => write!(f, "spin"),
            PacingMode::Sleep => write!(f, "sleep"),
        }
    }
}

/// Mantiene una frecuencia nominal esperando hasta `inicio + periodo`
pub struct RatePacer<'a, T: TimeSource> {
    clock: &'a T,
    period_us: u64,
    mode: PacingMode,
}

impl<'a, T: TimeSource> RatePacer<'a, T> {
    pub fn new(clock: &'a T, rate_hz: f64, mode: PacingMode) -> Gy85Result<Self> {
        Ok(Self {
            clock,
            period_us: period_us(rate_hz)?,
            mode,
        })
    }

    pub fn period_us(&self) -> u64 {
        self.period_us
    }

    /// Espera hasta que haya pasado un periodo desde `loop_start_us`
    pub fn wait_period(&self, loop_start_us: u64) {
        self.wait_until(loop_start_us + self.period_us);
    }

    pub fn wait_until(&self, deadline_us: u64) {
        match self.mode {
            PacingMode::Spin => {
                while self.clock.get_timestamp_us() < deadline_us {
                    std::hint::spin_loop();
                }
            }
            PacingMode::Sleep => {
                let now = self.clock.get_timestamp_us();
                if now < deadline_us {
                    self.clock.sleep_us(deadline_us - now);
                }
            }
        }
    }
}

/// Periodo en microsegundos para una frecuencia en Hz
pub fn period_us(rate_hz: f64) -> Gy85Result<u64> {
    if !(rate_hz.is_finite() && rate_hz > 0.0) {
        return Err(Gy85Error::InvalidParameter("la frecuencia debe ser > 0"));
    }
    Ok((1_000_000.0 / rate_hz).round() as u64)
}
