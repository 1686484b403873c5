//! Funcionalidades y traits base para el muestreo

#[cfg(test)]
use std::cell::Cell;
use std::time::{Duration, Instant};

/// Trait para obtener un timestamp en microsegundos.
/// Permite implementar diferentes fuentes (reloj real o simulado).
pub trait TimeSource {
    /// Retorna el timestamp (en microsegundos)
    fn get_timestamp_us(&self) -> u64;

    /// Bloquea el hilo durante `us` microsegundos
    fn sleep_us(&self, us: u64) {
        std::thread::sleep(Duration::from_micros(us));
    }

    /// Timestamp en segundos, como los contadores de rendimiento
    fn get_timestamp_s(&self) -> f64 {
        self.get_timestamp_us() as f64 / 1_000_000.0
    }
}

/// Reloj monotónico con origen en su creación
pub struct MonotonicTimeSource {
    start: Instant,
}

impl MonotonicTimeSource {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Reiniciar el origen
    pub fn reset(&mut self) {
        self.start = Instant::now();
    }
}

impl Default for MonotonicTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicTimeSource {
    fn get_timestamp_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}

/// Reloj simulado: solo avanza al dormir o en cada lectura si se
/// configura `auto_advance_us`. Solo para tests.
#[cfg(test)]
pub(crate) struct ManualTimeSource {
    now_us: Cell<u64>,
    auto_advance_us: u64,
}

#[cfg(test)]
impl ManualTimeSource {
    pub fn new(start_us: u64) -> Self {
        Self {
            now_us: Cell::new(start_us),
            auto_advance_us: 0,
        }
    }

    /// Cada lectura del reloj avanza `step_us`
    pub fn with_auto_advance(start_us: u64, step_us: u64) -> Self {
        Self {
            now_us: Cell::new(start_us),
            auto_advance_us: step_us,
        }
    }

    pub fn advance(&self, us: u64) {
        self.now_us.set(self.now_us.get() + us);
    }

    /// Valor actual sin avanzar el reloj
    pub fn peek_us(&self) -> u64 {
        self.now_us.get()
    }
}

#[cfg(test)]
impl TimeSource for ManualTimeSource {
    fn get_timestamp_us(&self) -> u64 {
        let now = self.now_us.get();
        self.now_us.set(now + self.auto_advance_us);
        now
    }

    fn sleep_us(&self, us: u64) {
        self.advance(us);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic_time_source() {
        let ts = MonotonicTimeSource::new();
        let a = ts.get_timestamp_us();
        ts.sleep_us(1_000);
        let b = ts.get_timestamp_us();
        assert!(b >= a + 1_000);
    }

    #[test]
    fn test_manual_time_source() {
        let ts = ManualTimeSource::new(123_456_789);
        assert_eq!(ts.get_timestamp_us(), 123_456_789);
        ts.sleep_us(11);
        assert_eq!(ts.get_timestamp_us(), 123_456_800);
        assert!((ts.get_timestamp_s() - 123.4568).abs() < 1e-9);
    }

    #[test]
    fn test_auto_advance() {
        let ts = ManualTimeSource::with_auto_advance(0, 5);
        assert_eq!(ts.get_timestamp_us(), 0);
        assert_eq!(ts.get_timestamp_us(), 5);
        assert_eq!(ts.peek_us(), 10);
    }
}
