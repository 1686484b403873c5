//! Registro de muestras en ficheros CSV
//!
//! Un fichero por pareja (persona, gesto). La cabecera se escribe solo
//! cuando el fichero está vacío, de modo que añadir repeticiones o
//! ejecutar varias sesiones nunca la duplica.

use std::borrow::Cow;
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::device::Gy85Result;
use crate::types::Sample;

pub const CSV_HEADER: [&str; 9] = [
    "Timestamp", "Acc_X", "Acc_Y", "Acc_Z", "Gyro_X", "Gyro_Y", "Gyro_Z", "Person", "Gesture",
];

/// Fichero CSV de una pareja (persona, gesto)
#[derive(Debug, Clone)]
pub struct CsvLog {
    path: PathBuf,
}

impl CsvLog {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// `<dir>/<persona>_<gesto>.csv`
    pub fn for_labels<P: AsRef<Path>>(dir: P, person: &str, gesture: &str) -> Self {
        let name = format!(
            "{}_{}.csv",
            encode_label(person, true),
            encode_label(gesture, false)
        );
        Self::new(dir.as_ref().join(name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Añade las muestras al final del fichero, creando directorio y
    /// cabecera si hace falta. Devuelve el número de filas escritas.
    pub fn append(&self, samples: &[Sample]) -> Gy85Result<usize> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let needs_header = file.metadata()?.len() == 0;
        let mut writer = BufWriter::new(file);

        if needs_header {
            writeln!(writer, "{}", CSV_HEADER.join(","))?;
        }
        for sample in samples {
            writeln!(writer, "{}", format_row(sample))?;
        }
        writer.flush()?;

        debug!("{} filas añadidas a {}", samples.len(), self.path.display());
        Ok(samples.len())
    }
}

/// Formatea una muestra como fila de 9 campos
pub fn format_row(sample: &Sample) -> String {
    format!(
        "{:.6},{},{},{},{},{},{},{},{}",
        sample.timestamp,
        sample.accel[0],
        sample.accel[1],
        sample.accel[2],
        sample.gyro[0],
        sample.gyro[1],
        sample.gyro[2],
        escape_field(&sample.person),
        escape_field(&sample.gesture),
    )
}

/// Entrecomilla un campo si contiene separadores, comillas o saltos de línea
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains(&[',', '"', '\n', '\r'][..]) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Codifica una etiqueta para usarla en un nombre de fichero
///
/// Todo byte fuera de `[A-Za-z0-9_-]` se escribe como `%XX`. Con
/// `escape_underscore` también `_`, de modo que en `<persona>_<gesto>` el
/// primer `_` literal separa siempre las dos etiquetas y parejas distintas
/// nunca comparten fichero.
pub fn encode_label(label: &str, escape_underscore: bool) -> String {
    let mut out = String::with_capacity(label.len());
    for &b in label.as_bytes() {
        let keep = b.is_ascii_alphanumeric() || b == b'-' || (b == b'_' && !escape_underscore);
        if keep {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{:02X}", b));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MotionReading;
    use tempfile::tempdir;

    fn sample(t: f64, gesture: &str) -> Sample {
        let reading = MotionReading {
            accel: [0.5, -1.0, 9.80665],
            gyro: [1.0, 2.0, -3.5],
        };
        Sample::new(t, reading, "ana", gesture)
    }

    #[test]
    fn file_name_from_labels() {
        let log = CsvLog::for_labels("out", "ana", "swipe_left");
        assert_eq!(log.path(), Path::new("out/ana_swipe_left.csv"));

        let log = CsvLog::for_labels("out", "Ana María", "swipe/left");
        assert_eq!(log.path(), Path::new("out/Ana%20Mar%C3%ADa_swipe%2Fleft.csv"));
    }

    #[test]
    fn distinct_label_pairs_never_share_a_file() {
        let pairs = [
            ("a_b", "c"),
            ("a", "b_c"),
            ("a b", "c"),
            ("a%20b", "c"),
            ("a", "b c"),
            ("a", "b%20c"),
            ("a-b", "c"),
            ("a", "b-c"),
        ];
        let paths: Vec<PathBuf> = pairs
            .iter()
            .map(|(p, g)| CsvLog::for_labels("out", p, g).path().to_path_buf())
            .collect();
        for i in 0..paths.len() {
            for j in (i + 1)..paths.len() {
                assert_ne!(paths[i], paths[j], "{:?} vs {:?}", pairs[i], pairs[j]);
            }
        }
    }

    #[test]
    fn row_has_nine_fields() {
        let row = format_row(&sample(1.25, "circle"));
        assert_eq!(row, "1.250000,0.5,-1,9.80665,1,2,-3.5,ana,circle");
        assert_eq!(row.split(',').count(), 9);
    }

    #[test]
    fn labels_with_commas_are_quoted() {
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("plain"), "plain");
    }

    #[test]
    fn header_written_once_across_appends() {
        let dir = tempdir().unwrap();
        let log = CsvLog::for_labels(dir.path(), "ana", "wave");
        for rep in 0..3 {
            let rows: Vec<Sample> = (0..4).map(|i| sample((rep * 4 + i) as f64, "wave")).collect();
            assert_eq!(log.append(&rows).unwrap(), 4);
        }
        // Una sesión nueva sobre el mismo fichero tampoco repite la cabecera
        CsvLog::for_labels(dir.path(), "ana", "wave").append(&[sample(99.0, "wave")]).unwrap();

        let text = fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1 + 12 + 1);
        assert_eq!(lines[0], CSV_HEADER.join(","));
        assert_eq!(lines.iter().filter(|l| l.starts_with("Timestamp")).count(), 1);
        assert!(lines[1..].iter().all(|l| l.split(',').count() == 9));
    }

    #[test]
    fn empty_append_still_creates_header() {
        let dir = tempdir().unwrap();
        let log = CsvLog::for_labels(dir.path(), "bo", "tap");
        assert_eq!(log.append(&[]).unwrap(), 0);
        let text = fs::read_to_string(log.path()).unwrap();
        assert_eq!(text, format!("{}\n", CSV_HEADER.join(",")));
    }
}
