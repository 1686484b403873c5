//! Definiciones de tipos y constantes comunes para la GY-85

/// Ancho de banda del filtro paso bajo digital del ITG3205 (DLPF_CFG)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum GyroDlpf {
    /// 256Hz, muestreo interno 8kHz
    Lp256Hz = 0,
    /// 188Hz
    Lp188Hz = 1,
    /// 98Hz
    Lp98Hz = 2,
    /// 42Hz
    Lp42Hz = 3,
    /// 20Hz
    Lp20Hz = 4,
    /// 10Hz
    Lp10Hz = 5,
    /// 5Hz
    Lp5Hz = 6,
}

impl Default for GyroDlpf {
    fn default() -> Self {
        GyroDlpf::Lp256Hz
    }
}

impl From<u8> for GyroDlpf {
    fn from(value: u8) -> Self {
        match value & 0x07 {
            0 => GyroDlpf::Lp256Hz,
            1 => GyroDlpf::Lp188Hz,
            2 => GyroDlpf::Lp98Hz,
            3 => GyroDlpf::Lp42Hz,
            4 => GyroDlpf::Lp20Hz,
            5 => GyroDlpf::Lp10Hz,
            // 7 está reservado en el datasheet
            _ => GyroDlpf::Lp5Hz,
        }
    }
}

impl GyroDlpf {
    /// Frecuencia de muestreo interna en Hz para este ajuste
    pub fn internal_rate_hz(&self) -> u32 {
        match self {
            GyroDlpf::Lp256Hz => 8000,
            _ => 1000,
        }
    }
}

/// Rangos de escala completa del ADXL345
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AccelRange {
    /// ±2g
    G2 = 0,
    /// ±4g
    G4 = 1,
    /// ±8g
    G8 = 2,
    /// ±16g
    G16 = 3,
}

impl Default for AccelRange {
    fn default() -> Self {
        AccelRange::G2
    }
}

impl From<u8> for AccelRange {
    fn from(value: u8) -> Self {
        match value & 0x03 {
            0 => AccelRange::G2,
            1 => AccelRange::G4,
            2 => AccelRange::G8,
            _ => AccelRange::G16,
        }
    }
}

/// Tasas de salida del ADXL345 (BW_RATE)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AccelDataRate {
    Hz12_5 = 0x07,
    Hz25 = 0x08,
    Hz50 = 0x09,
    Hz100 = 0x0A,
    Hz200 = 0x0B,
    Hz400 = 0x0C,
    Hz800 = 0x0D,
    Hz1600 = 0x0E,
    Hz3200 = 0x0F,
}

impl Default for AccelDataRate {
    fn default() -> Self {
        AccelDataRate::Hz100
    }
}

/// Lectura de movimiento sin etiquetar: aceleración y velocidad angular
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionReading {
    /// Aceleración [x, y, z] en m/s²
    pub accel: [f32; 3],
    /// Velocidad angular [x, y, z] en °/s
    pub gyro: [f32; 3],
}

/// Muestra etiquetada de una repetición de gesto
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Segundos desde el origen del reloj monotónico
    pub timestamp: f64,
    /// Aceleración [x, y, z] en m/s²
    pub accel: [f32; 3],
    /// Velocidad angular [x, y, z] en °/s
    pub gyro: [f32; 3],
    pub person: String,
    pub gesture: String,
}

impl Sample {
    pub fn new(timestamp: f64, reading: MotionReading, person: &str, gesture: &str) -> Self {
        Self {
            timestamp,
            accel: reading.accel,
            gyro: reading.gyro,
            person: person.to_owned(),
            gesture: gesture.to_owned(),
        }
    }
}

/// Valores de aceleración gravitacional
pub mod gravity {
    pub const GRAVITY_MSS: f32 = 9.80665;
}

/// Sensibilidades de los chips
pub mod sensitivity {
    /// ITG3205: LSB por °/s con FS_SEL = 3
    pub const GYRO_LSB_PER_DPS: f32 = 14.375;
    /// ADXL345: g por LSB en resolución completa (y en ±2g a 10 bits)
    pub const ACCEL_G_PER_LSB: f32 = 0.004;
    /// ITG3205: LSB por °C
    pub const TEMP_LSB_PER_C: f32 = 280.0;
    /// ITG3205: desplazamiento del sensor de temperatura a 35°C
    pub const TEMP_OFFSET_LSB: f32 = -13200.0;
    pub const TEMP_REF_C: f32 = 35.0;
}
