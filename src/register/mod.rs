//! Definiciones de registros para los chips de la placa GY-85
//!
//! Cada chip tiene su propia dirección I2C y su propio mapa de registros,
//! así que se agrupan en un submódulo por chip.

/// Chips de la placa accesibles por I2C
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chip {
    /// Giroscopio ITG3205
    Itg3205,
    /// Acelerómetro ADXL345
    Adxl345,
}

impl Chip {
    pub fn name(&self) -> &'static str {
        match self {
            Chip::Itg3205 => "ITG3205",
            Chip::Adxl345 => "ADXL345",
        }
    }
}

/// Trait para identificar a qué chip del bus pertenece un mapa de registros
pub trait RegisterMap {
    const CHIP: Chip;
    /// Dirección I2C de 7 bits por defecto
    const DEFAULT_ADDRESS: u8;
}

/// Registros del giroscopio ITG3205
pub mod itg3205 {
    use super::{Chip, RegisterMap};

    pub struct Map;
    impl RegisterMap for Map {
        const CHIP: Chip = Chip::Itg3205;
        const DEFAULT_ADDRESS: u8 = 0x68;
    }

    /// Dirección alternativa con AD0 a nivel alto
    pub const ALT_ADDRESS: u8 = 0x69;

    // Identificación
    pub const WHO_AM_I: u8 = 0x00;

    // Configuración
    pub const SMPLRT_DIV: u8 = 0x15;
    pub const DLPF_FS: u8 = 0x16;
    pub const INT_CFG: u8 = 0x17;
    pub const INT_STATUS: u8 = 0x1A;

    // Temperatura
    pub const TEMP_OUT_H: u8 = 0x1B;
    pub const TEMP_OUT_L: u8 = 0x1C;

    // Salidas del giroscopio (big-endian)
    pub const GYRO_XOUT_H: u8 = 0x1D;
    pub const GYRO_XOUT_L: u8 = 0x1E;
    pub const GYRO_YOUT_H: u8 = 0x1F;
    pub const GYRO_YOUT_L: u8 = 0x20;
    pub const GYRO_ZOUT_H: u8 = 0x21;
    pub const GYRO_ZOUT_L: u8 = 0x22;

    // Gestión de energía
    pub const PWR_MGM: u8 = 0x3E;
}

/// Registros del acelerómetro ADXL345
pub mod adxl345 {
    use super::{Chip, RegisterMap};

    pub struct Map;
    impl RegisterMap for Map {
        const CHIP: Chip = Chip::Adxl345;
        const DEFAULT_ADDRESS: u8 = 0x53;
    }

    /// Dirección alternativa con SDO a nivel alto
    pub const ALT_ADDRESS: u8 = 0x1D;

    pub const DEVID: u8 = 0x00;
    pub const BW_RATE: u8 = 0x2C;
    pub const POWER_CTL: u8 = 0x2D;
    pub const INT_ENABLE: u8 = 0x2E;
    pub const INT_SOURCE: u8 = 0x30;
    pub const DATA_FORMAT: u8 = 0x31;

    // Salidas del acelerómetro (little-endian)
    pub const DATAX0: u8 = 0x32;
    pub const DATAX1: u8 = 0x33;
    pub const DATAY0: u8 = 0x34;
    pub const DATAY1: u8 = 0x35;
    pub const DATAZ0: u8 = 0x36;
    pub const DATAZ1: u8 = 0x37;
}

/// Bits útiles para configuración y control
pub mod bits {
    // ITG3205 PWR_MGM
    pub const ITG_H_RESET: u8 = 0x80;
    pub const ITG_SLEEP: u8 = 0x40;
    pub const ITG_CLK_INTERNAL: u8 = 0x00;

    // ITG3205 DLPF_FS: FS_SEL debe ser 3 para un funcionamiento correcto
    pub const ITG_FS_SEL_2000DPS: u8 = 0x18;
    pub const ITG_DLPF_CFG_MASK: u8 = 0x07;

    // ITG3205 INT_STATUS
    pub const ITG_RAW_DATA_RDY: u8 = 0x01;

    // ADXL345 POWER_CTL
    pub const ADXL_MEASURE: u8 = 0x08;

    // ADXL345 DATA_FORMAT
    pub const ADXL_FULL_RES: u8 = 0x08;
    pub const ADXL_RANGE_MASK: u8 = 0x03;

    // ADXL345 BW_RATE
    pub const ADXL_RATE_MASK: u8 = 0x0F;
}

/// Valores esperados en los registros de identificación
pub mod ids {
    /// ITG3205: bits [6:1] de WHO_AM_I
    pub const ITG3205_WHO_AM_I: u8 = 0x34;
    pub const ITG3205_WHO_AM_I_MASK: u8 = 0x7E;
    pub const ADXL345_DEVID: u8 = 0xE5;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_addresses_match_board() {
        assert_eq!(itg3205::Map::DEFAULT_ADDRESS, 0x68);
        assert_eq!(adxl345::Map::DEFAULT_ADDRESS, 0x53);
    }

    #[test]
    fn gyro_axes_are_consecutive_word_pairs() {
        assert_eq!(itg3205::GYRO_YOUT_H, itg3205::GYRO_XOUT_H + 2);
        assert_eq!(itg3205::GYRO_ZOUT_H, itg3205::GYRO_YOUT_H + 2);
        assert_eq!(itg3205::GYRO_ZOUT_L, itg3205::GYRO_ZOUT_H + 1);
    }

    #[test]
    fn who_am_i_mask_covers_0x68() {
        assert_eq!(0x68 & ids::ITG3205_WHO_AM_I_MASK, ids::ITG3205_WHO_AM_I << 1);
    }
}
