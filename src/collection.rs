//! Captura de repeticiones de gestos
//!
//! Cada repetición se muestrea a frecuencia fija y se guarda en memoria;
//! la escritura a disco ocurre solo entre repeticiones.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{info, warn};

use crate::base::TimeSource;
use crate::config::CollectionConfig;
use crate::csv_log::CsvLog;
use crate::device::{Gy85Result, MotionSensor};
use crate::pacing::RatePacer;
use crate::types::Sample;

/// Tramo máximo de sueño durante la pausa, para atender Ctrl+C
const PAUSE_SLICE_US: u64 = 100_000;

/// Tope de muestras reservadas de antemano por repetición
const MAX_PREALLOC_SAMPLES: usize = 1 << 16;

/// Resumen de una sesión de captura
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionSummary {
    /// Repeticiones completadas y guardadas
    pub repetitions: u32,
    /// Filas escritas en total
    pub samples: usize,
    /// `true` si la sesión terminó por una señal de parada
    pub interrupted: bool,
}

/// Graba repeticiones de un gesto desde un sensor
pub struct GestureRecorder<'a, S, T> {
    sensor: &'a mut S,
    clock: &'a T,
    config: &'a CollectionConfig,
    stop: Option<Arc<AtomicBool>>,
}

impl<'a, S, T> GestureRecorder<'a, S, T>
where
    S: MotionSensor,
    T: TimeSource,
{
    pub fn new(sensor: &'a mut S, clock: &'a T, config: &'a CollectionConfig) -> Self {
        Self {
            sensor,
            clock,
            config,
            stop: None,
        }
    }

    /// Bandera de parada compartida (p. ej. con el manejador de Ctrl+C)
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = Some(stop);
        self
    }

    fn stopped(&self) -> bool {
        self.stop
            .as_ref()
            .map(|s| s.load(Ordering::SeqCst))
            .unwrap_or(false)
    }

    /// Muestrea durante `duration` a `sample_rate`
    ///
    /// Devuelve `None` si se pidió parar a mitad: una repetición
    /// incompleta no se guarda.
    pub fn record_repetition(&mut self) -> Gy85Result<Option<Vec<Sample>>> {
        let pacer = RatePacer::new(self.clock, self.config.sample_rate, self.config.pacing)?;
        let capacity = self.config.expected_samples().min(MAX_PREALLOC_SAMPLES);
        let mut buffer = Vec::with_capacity(capacity);

        let start = self.clock.get_timestamp_us();
        let end = start + self.config.duration.as_micros() as u64;

        while self.clock.get_timestamp_us() < end {
            if self.stopped() {
                return Ok(None);
            }
            let loop_start = self.clock.get_timestamp_us();

            let reading = self.sensor.read_motion()?;
            let timestamp = self.clock.get_timestamp_s();
            buffer.push(Sample::new(
                timestamp,
                reading,
                &self.config.person,
                &self.config.gesture,
            ));

            pacer.wait_period(loop_start);
        }
        Ok(Some(buffer))
    }

    /// Ejecuta todas las repeticiones y las añade al CSV tras cada una
    pub fn run(&mut self, log: &CsvLog) -> Gy85Result<CollectionSummary> {
        self.config.validate()?;
        let total = self.config.repetitions;
        let mut summary = CollectionSummary::default();

        for i in 0..total {
            info!(
                "Grabando gesto '{}' ({}/{})...",
                self.config.gesture,
                i + 1,
                total
            );
            let Some(samples) = self.record_repetition()? else {
                warn!("Repetición {} interrumpida, se descarta", i + 1);
                summary.interrupted = true;
                break;
            };

            summary.samples += log.append(&samples)?;
            summary.repetitions += 1;
            info!(
                "Gesto '{}' grabado durante {:.1} s ({} muestras)",
                self.config.gesture,
                self.config.duration.as_secs_f64(),
                samples.len()
            );

            if i + 1 < total {
                info!(
                    "Pausa de {:.1} s antes de la siguiente grabación...",
                    self.config.pause.as_secs_f64()
                );
                self.pause();
                if self.stopped() {
                    summary.interrupted = true;
                    break;
                }
            }
        }

        info!(
            "Terminadas {} repeticiones de '{}' en {}",
            summary.repetitions,
            self.config.gesture,
            log.path().display()
        );
        Ok(summary)
    }

    fn pause(&self) {
        let mut remaining = self.config.pause.as_micros() as u64;
        while remaining > 0 && !self.stopped() {
            let slice = remaining.min(PAUSE_SLICE_US);
            self.clock.sleep_us(slice);
            remaining -= slice;
        }
    }
}
