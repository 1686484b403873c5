//! Búferes y dibujo para la visualización en tiempo real
//!
//! Los búferes siempre están disponibles; el dibujo con `plotters`
//! requiere la feature `plotting`.

use std::collections::VecDeque;
use std::time::Duration;

use crate::types::MotionReading;

/// Búfer circular de capacidad fija: al llenarse descarta el más antiguo
#[derive(Debug, Clone)]
pub struct ScrollingBuffer<T> {
    data: VecDeque<T>,
    capacity: usize,
}

impl<T: Copy> ScrollingBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            data: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push con sobrescritura (comportamiento cíclico)
    pub fn push(&mut self, val: T) {
        if self.capacity == 0 {
            return;
        }
        if self.data.len() == self.capacity {
            self.data.pop_front();
        }
        self.data.push_back(val);
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.data.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn last(&self) -> Option<T> {
        self.data.back().copied()
    }

    pub fn first(&self) -> Option<T> {
        self.data.front().copied()
    }

    /// Itera del más antiguo al más reciente
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.data.iter().copied()
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }
}

/// Series desplazables de tiempo, giroscopio y acelerómetro
#[derive(Debug, Clone)]
pub struct PlotBuffers {
    interval_s: f64,
    pub time: ScrollingBuffer<f64>,
    pub gyro: [ScrollingBuffer<f64>; 3],
    pub accel: [ScrollingBuffer<f64>; 3],
}

impl PlotBuffers {
    pub fn new(points: usize, interval: Duration) -> Self {
        Self {
            interval_s: interval.as_secs_f64(),
            time: ScrollingBuffer::new(points),
            gyro: std::array::from_fn(|_| ScrollingBuffer::new(points)),
            accel: std::array::from_fn(|_| ScrollingBuffer::new(points)),
        }
    }

    /// Añade una lectura; el eje de tiempo avanza un intervalo por tick
    /// empezando en 0.
    pub fn push(&mut self, reading: &MotionReading) {
        let t = match self.time.last() {
            Some(prev) => prev + self.interval_s,
            None => 0.0,
        };
        self.time.push(t);
        for axis in 0..3 {
            self.gyro[axis].push(reading.gyro[axis] as f64);
            self.accel[axis].push(reading.accel[axis] as f64);
        }
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Rango visible del eje de tiempo; nunca vacío
    pub fn time_range(&self) -> (f64, f64) {
        match (self.time.first(), self.time.last()) {
            (Some(a), Some(b)) if b > a => (a, b),
            (Some(a), _) => (a, a + self.interval_s.max(f64::EPSILON)),
            _ => (0.0, self.interval_s.max(f64::EPSILON)),
        }
    }

    pub fn gyro_range(&self) -> (f64, f64) {
        value_range(&self.gyro)
    }

    pub fn accel_range(&self) -> (f64, f64) {
        value_range(&self.accel)
    }
}

/// Mínimo y máximo de las tres series con un 10% de margen
fn value_range(series: &[ScrollingBuffer<f64>; 3]) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in series.iter().flat_map(|s| s.iter()) {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if !lo.is_finite() || !hi.is_finite() {
        return (-1.0, 1.0);
    }
    let margin = ((hi - lo) * 0.1).max(0.5);
    (lo - margin, hi + margin)
}

#[cfg(feature = "plotting")]
pub use render::render;

#[cfg(feature = "plotting")]
mod render {
    use super::{PlotBuffers, ScrollingBuffer};
    use plotters::prelude::*;
    use std::error::Error;
    use std::path::Path;

    const AXIS_COLORS: [RGBColor; 3] = [RED, GREEN, BLUE];
    const AXIS_LABELS: [&str; 3] = ["X", "Y", "Z"];

    /// Dibuja los dos gráficos apilados en un fichero de imagen
    pub fn render<P: AsRef<Path>>(
        buffers: &PlotBuffers,
        path: P,
        size: (u32, u32),
    ) -> Result<(), Box<dyn Error>> {
        let root = BitMapBackend::new(path.as_ref(), size).into_drawing_area();
        root.fill(&WHITE)?;
        let panels = root.split_evenly((2, 1));

        draw_panel(
            &panels[0],
            "Gyroscope Data",
            "Gyroscope (°/s)",
            buffers,
            &buffers.gyro,
            buffers.gyro_range(),
            true,
        )?;
        draw_panel(
            &panels[1],
            "Accelerometer Data",
            "Accelerometer (m/s²)",
            buffers,
            &buffers.accel,
            buffers.accel_range(),
            false,
        )?;

        root.present()?;
        Ok(())
    }

    fn draw_panel<DB: DrawingBackend>(
        area: &DrawingArea<DB, plotters::coord::Shift>,
        caption: &str,
        y_desc: &str,
        buffers: &PlotBuffers,
        series: &[ScrollingBuffer<f64>; 3],
        y_range: (f64, f64),
        with_legend: bool,
    ) -> Result<(), Box<dyn Error>>
    where
        DB::ErrorType: 'static,
    {
        let (t0, t1) = buffers.time_range();
        let mut chart = ChartBuilder::on(area)
            .caption(caption, ("sans-serif", 24))
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(50)
            .build_cartesian_2d(t0..t1, y_range.0..y_range.1)?;

        chart
            .configure_mesh()
            .x_labels(5)
            .y_labels(5)
            .x_desc("Time (s)")
            .y_desc(y_desc)
            .draw()?;

        for axis in 0..3 {
            let color = AXIS_COLORS[axis];
            let points: Vec<(f64, f64)> = buffers.time.iter().zip(series[axis].iter()).collect();
            chart
                .draw_series(LineSeries::new(points, &color))?
                .label(AXIS_LABELS[axis])
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
        }

        if with_legend {
            chart
                .configure_series_labels()
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_evicts_oldest() {
        let mut buf = ScrollingBuffer::new(3);
        for v in 1..=5 {
            buf.push(v);
        }
        assert!(buf.is_full());
        assert_eq!(buf.iter().collect::<Vec<_>>(), vec![3, 4, 5]);
        assert_eq!(buf.first(), Some(3));
        assert_eq!(buf.last(), Some(5));
    }

    #[test]
    fn zero_capacity_stays_empty() {
        let mut buf = ScrollingBuffer::new(0);
        buf.push(1.0);
        assert!(buf.is_empty());
    }

    #[test]
    fn time_axis_advances_by_interval() {
        let mut plot = PlotBuffers::new(100, Duration::from_millis(10));
        let reading = MotionReading {
            accel: [0.0, 0.0, 9.8],
            gyro: [1.0, -1.0, 0.0],
        };
        for _ in 0..150 {
            plot.push(&reading);
        }
        assert_eq!(plot.len(), 100);
        let times: Vec<f64> = plot.time.iter().collect();
        assert!((times[0] - 0.5).abs() < 1e-9);
        assert!((times[99] - 1.49).abs() < 1e-9);
        assert_eq!(plot.gyro[1].len(), 100);
        assert_eq!(plot.accel[2].last(), Some(9.8f32 as f64));
    }

    #[test]
    fn ranges_are_never_empty() {
        let plot = PlotBuffers::new(10, Duration::from_millis(10));
        assert_eq!(plot.gyro_range(), (-1.0, 1.0));
        let (t0, t1) = plot.time_range();
        assert!(t1 > t0);

        let mut plot = PlotBuffers::new(10, Duration::from_millis(10));
        plot.push(&MotionReading::default());
        let (lo, hi) = plot.accel_range();
        assert!(lo < 0.0 && hi > 0.0);
        let (t0, t1) = plot.time_range();
        assert!((t1 - t0 - 0.01).abs() < 1e-12);
    }

    #[cfg(feature = "plotting")]
    #[test]
    fn renders_both_charts_to_png() {
        let dir = tempfile::tempdir().unwrap();

        let empty = PlotBuffers::new(100, Duration::from_millis(10));
        let path = dir.path().join("empty.png");
        render(&empty, &path, (400, 300)).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);

        let mut plot = PlotBuffers::new(100, Duration::from_millis(10));
        for i in 0..120 {
            let t = i as f32 * 0.1;
            plot.push(&MotionReading {
                accel: [t.sin(), t.cos(), 9.8],
                gyro: [10.0 * t.sin(), -5.0, 0.5 * t],
            });
        }
        let path = dir.path().join("full.png");
        render(&plot, &path, (400, 300)).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
