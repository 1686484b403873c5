//! Visualización en tiempo real de la GY-85 en Linux
//!
//! Un temporizador cooperativo (sondeo de eventos de `crossterm` con el
//! periodo como timeout) lee el sensor en cada tick, desplaza los búferes
//! y redibuja los gráficos del giroscopio y del acelerómetro en una imagen.
//! `q`, `Esc` o Ctrl+C terminan.
//!
//! Para ejecutar: cargo run --bin gy85-plot --features plotting

use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use gy85_rs::linux::{open_i2c_device, DEFAULT_I2C_BUS};
use gy85_rs::plot::{render, PlotBuffers};
use gy85_rs::{Gy85Config, PlotConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Gráfico en tiempo real de la GY-85")]
struct Args {
    /// Bus I2C
    #[arg(long, default_value = DEFAULT_I2C_BUS)]
    bus: String,

    /// Periodo del temporizador en milisegundos
    #[arg(long, default_value_t = 10)]
    interval_ms: u64,

    /// Puntos visibles por serie
    #[arg(long, default_value_t = 100)]
    points: usize,

    /// Imagen que se redibuja en cada tick
    #[arg(long, default_value = "gy85_plot.png")]
    output: PathBuf,
}

/// Modo raw del terminal mientras vive el guard
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Siguiente tick del temporizador; los ticks perdidos se saltan
fn next_deadline(previous: Instant, interval: Duration, now: Instant) -> Instant {
    let next = previous + interval;
    if next <= now {
        now + interval
    } else {
        next
    }
}

fn main() {
    // En modo raw hace falta \r para volver al inicio de línea
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| writeln!(buf, "[{}] {}\r", record.level(), record.args()))
        .init();

    if let Err(e) = run(Args::parse()) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    if args.interval_ms == 0 {
        return Err("--interval-ms debe ser > 0".into());
    }
    let config = PlotConfig {
        interval: Duration::from_millis(args.interval_ms),
        points: args.points,
        output: args.output,
        ..Default::default()
    };

    let mut device = open_i2c_device(&args.bus, Gy85Config::default())?;
    device.initialize()?;

    let mut buffers = PlotBuffers::new(config.points, config.interval);
    let _raw = RawModeGuard::enable()?;
    log::info!(
        "Graficando en {} cada {} ms. Pulsa 'q' para salir...",
        config.output.display(),
        args.interval_ms
    );

    let mut next_tick = Instant::now() + config.interval;
    loop {
        let timeout = next_tick.saturating_duration_since(Instant::now());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if is_quit(&key) {
                    break;
                }
            }
            continue;
        }

        let gyro = device.read_gyroscope()?;
        let accel = device.read_accelerometer()?;
        buffers.push(&gy85_rs::MotionReading { accel, gyro });
        render(&buffers, &config.output, (config.width, config.height))?;
        next_tick = next_deadline(next_tick, config.interval, Instant::now());
    }

    log::info!("Gráfico guardado como '{}'", config.output.display());
    Ok(())
}
