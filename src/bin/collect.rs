//! Captura de gestos con la GY-85 en Linux
//!
//! Pregunta por persona, gesto y número de repeticiones (si no se pasan
//! como opciones) y añade las muestras a `<salida>/<persona>_<gesto>.csv`.
//!
//! Para ejecutar: cargo run --bin gy85-collect --features linux

use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use gy85_rs::linux::{open_i2c_device, DEFAULT_I2C_BUS};
use gy85_rs::prompt::{prompt_count, prompt_line};
use gy85_rs::{
    CollectionConfig, CsvLog, GestureRecorder, Gy85Config, MonotonicTimeSource, PacingMode,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Graba repeticiones de gestos desde una GY-85")]
struct Args {
    /// Nombre de la persona (se pregunta si falta)
    #[arg(long)]
    person: Option<String>,

    /// Nombre del gesto, p. ej. swipe_left (se pregunta si falta)
    #[arg(long)]
    gesture: Option<String>,

    /// Número de repeticiones (se pregunta si falta)
    #[arg(long)]
    repetitions: Option<u32>,

    /// Duración de cada repetición en segundos
    #[arg(long, default_value_t = 5.0)]
    duration: f64,

    /// Frecuencia de muestreo en Hz
    #[arg(long, default_value_t = 50.0)]
    rate: f64,

    /// Pausa entre repeticiones en segundos
    #[arg(long, default_value_t = 5.0)]
    pause: f64,

    /// Directorio de salida de los CSV
    #[arg(long, default_value = "gesture_data")]
    output_dir: PathBuf,

    /// Bus I2C
    #[arg(long, default_value = DEFAULT_I2C_BUS)]
    bus: String,

    /// Espera entre muestras: spin o sleep
    #[arg(long, default_value_t = PacingMode::Spin)]
    pacing: PacingMode,

    /// Aborta si WHO_AM_I/DEVID no coinciden
    #[arg(long)]
    verify: bool,
}

fn seconds(value: f64, name: &str) -> Result<Duration, Box<dyn Error>> {
    Duration::try_from_secs_f64(value).map_err(|_| format!("--{} inválido: {}", name, value).into())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Args::parse()) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    let person = match args.person {
        Some(p) => p,
        None => prompt_line(&mut input, &mut output, "Nombre de la persona: ")?,
    };
    let gesture = match args.gesture {
        Some(g) => g,
        None => prompt_line(
            &mut input,
            &mut output,
            "Nombre del gesto (p. ej. swipe_left, swipe_right): ",
        )?,
    };
    let repetitions = match args.repetitions {
        Some(n) => n,
        None => prompt_count(
            &mut input,
            &mut output,
            "Número de veces que se grabará el gesto: ",
        )?,
    };

    let config = CollectionConfig {
        person,
        gesture,
        repetitions,
        duration: seconds(args.duration, "duration")?,
        sample_rate: args.rate,
        pause: seconds(args.pause, "pause")?,
        output_dir: args.output_dir,
        pacing: args.pacing,
    };
    config.validate()?;

    let gy85_config = Gy85Config {
        verify_identity: args.verify,
        ..Default::default()
    };
    let mut device = open_i2c_device(&args.bus, gy85_config)?;
    device.initialize()?;

    // Flag para detener la captura con Ctrl+C
    let stop = Arc::new(AtomicBool::new(false));
    let s = stop.clone();
    ctrlc::set_handler(move || {
        log::warn!("Deteniendo la captura...");
        s.store(true, Ordering::SeqCst);
    })?;

    let clock = MonotonicTimeSource::new();
    let csv_log = CsvLog::for_labels(&config.output_dir, &config.person, &config.gesture);
    let summary = GestureRecorder::new(&mut device, &clock, &config)
        .with_stop_flag(stop)
        .run(&csv_log)?;

    if summary.interrupted {
        log::warn!(
            "Captura interrumpida: {} de {} repeticiones guardadas",
            summary.repetitions,
            config.repetitions
        );
    }
    Ok(())
}
