use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::ErrorKind;
use log::{debug, info, warn};
use thiserror::Error;

use crate::config::Gy85Config;
use crate::conversion::word_from_be;
use crate::interface::Interface;
use crate::register::{adxl345, itg3205, Chip, RegisterMap};
use crate::types::MotionReading;

/// Dispositivo GY-85: giroscopio ITG3205 y acelerómetro ADXL345 en un mismo bus
pub struct Gy85<I, D> {
    pub(crate) interface: I,
    pub(crate) base_state: BaseState,
    pub(crate) delay: D,
}

#[derive(Debug, Error)]
pub enum Gy85Error {
    #[error("error del bus I2C: {0}")]
    Bus(ErrorKind),
    #[error("no se pudo abrir el bus {path}: {reason}")]
    BusOpen { path: String, reason: String },
    #[error("{chip}: identificador inesperado 0x{found:02X} (esperado 0x{expected:02X})")]
    IdentityMismatch {
        chip: &'static str,
        expected: u8,
        found: u8,
    },
    #[error("parámetro inválido: {0}")]
    InvalidParameter(&'static str),
    #[error("entrada inválida: {0}")]
    InvalidInput(String),
    #[error("el dispositivo no está inicializado")]
    NotInitialized,
    #[error("error de E/S: {0}")]
    Io(#[from] std::io::Error),
}

pub type Gy85Result<T> = Result<T, Gy85Error>;

/// Estado base del dispositivo
#[derive(Debug, Clone, Default)]
pub struct BaseState {
    pub config: Gy85Config,
    pub gyro_awake: bool,
    pub accel_measuring: bool,
    pub gyro_id: Option<u8>,
    pub accel_id: Option<u8>,
}

/// Fuente de lecturas de movimiento
pub trait MotionSensor {
    /// Lee aceleración y velocidad angular, en ese orden
    fn read_motion(&mut self) -> Gy85Result<MotionReading>;
}

impl<I, D> Gy85<I, D>
where
    I: Interface,
    D: DelayNs,
    Gy85Error: From<I::Error>,
{
    /// Crea una instancia con la configuración por defecto
    pub fn new(interface: I, delay: D) -> Self {
        Self::with_config(interface, delay, Gy85Config::default())
    }

    pub fn with_config(interface: I, delay: D, config: Gy85Config) -> Self {
        Self {
            interface,
            base_state: BaseState {
                config,
                ..Default::default()
            },
            delay,
        }
    }

    pub fn config(&self) -> &Gy85Config {
        &self.base_state.config
    }

    pub fn is_initialized(&self) -> bool {
        self.base_state.gyro_awake && self.base_state.accel_measuring
    }

    /// Consume el dispositivo y devuelve la interfaz y el retardo
    pub fn release(self) -> (I, D) {
        (self.interface, self.delay)
    }

    fn address<M: RegisterMap>(&self) -> u8 {
        self.base_state.config.address(M::CHIP)
    }

    pub fn read_reg<M: RegisterMap>(&mut self, reg: u8) -> Result<u8, Gy85Error> {
        let mut data = [0u8];
        self.read_regs::<M>(reg, &mut data)?;
        Ok(data[0])
    }

    /// Lee varios registros consecutivos de un chip
    pub fn read_regs<M: RegisterMap>(&mut self, reg: u8, data: &mut [u8]) -> Result<(), Gy85Error> {
        let addr = self.address::<M>();
        self.interface.read_reg(addr, reg, data)?;
        Ok(())
    }

    pub fn write_reg<M: RegisterMap>(&mut self, reg: u8, value: u8) -> Result<(), Gy85Error> {
        let addr = self.address::<M>();
        self.interface.write_reg(addr, reg, &[value])?;
        Ok(())
    }

    pub fn modify_reg<M: RegisterMap, F>(&mut self, reg: u8, f: F) -> Result<(), Gy85Error>
    where
        F: FnOnce(u8) -> u8,
    {
        let value = self.read_reg::<M>(reg)?;
        self.write_reg::<M>(reg, f(value))
    }

    /// Lee una palabra de 16 bits con signo de dos registros consecutivos (alto primero)
    pub fn read_word<M: RegisterMap>(&mut self, reg: u8) -> Result<i16, Gy85Error> {
        let mut buf = [0u8; 2];
        self.read_regs::<M>(reg, &mut buf)?;
        Ok(word_from_be(buf[0], buf[1]))
    }

    /// Inicializa ambos chips: primero el giroscopio, luego el acelerómetro
    pub fn initialize(&mut self) -> Result<(), Gy85Error> {
        self.check_identity(Chip::Itg3205)?;
        self.init_gyro()?;
        self.check_identity(Chip::Adxl345)?;
        self.init_accel()?;
        info!(
            "GY-85 inicializada (ITG3205 en 0x{:02X}, ADXL345 en 0x{:02X})",
            self.base_state.config.gyro_address, self.base_state.config.accel_address
        );
        Ok(())
    }

    /// Comprueba el registro de identificación de un chip
    ///
    /// Con `verify_identity` desactivado solo se avisa en el log.
    pub fn check_identity(&mut self, chip: Chip) -> Result<bool, Gy85Error> {
        let (found, ok, expected) = match chip {
            Chip::Itg3205 => {
                let id = self.gyro_whoami()?;
                self.base_state.gyro_id = Some(id);
                (id, is_itg3205_id(id), crate::register::ids::ITG3205_WHO_AM_I << 1)
            }
            Chip::Adxl345 => {
                let id = self.accel_devid()?;
                self.base_state.accel_id = Some(id);
                (
                    id,
                    id == crate::register::ids::ADXL345_DEVID,
                    crate::register::ids::ADXL345_DEVID,
                )
            }
        };
        debug!("{} id = 0x{:02X}", chip.name(), found);

        if ok {
            return Ok(true);
        }
        if self.base_state.config.verify_identity {
            return Err(Gy85Error::IdentityMismatch {
                chip: chip.name(),
                expected,
                found,
            });
        }
        warn!(
            "{}: identificador inesperado 0x{:02X} (esperado 0x{:02X}), se continúa",
            chip.name(),
            found,
            expected
        );
        Ok(false)
    }

    /// Lee el registro WHO_AM_I del ITG3205
    pub fn gyro_whoami(&mut self) -> Result<u8, Gy85Error> {
        self.read_reg::<itg3205::Map>(itg3205::WHO_AM_I)
    }

    /// Lee el registro DEVID del ADXL345
    pub fn accel_devid(&mut self) -> Result<u8, Gy85Error> {
        self.read_reg::<adxl345::Map>(adxl345::DEVID)
    }
}

impl<I, D> MotionSensor for Gy85<I, D>
where
    I: Interface,
    D: DelayNs,
    Gy85Error: From<I::Error>,
{
    fn read_motion(&mut self) -> Gy85Result<MotionReading> {
        let accel = self.read_accelerometer()?;
        let gyro = self.read_gyroscope()?;
        Ok(MotionReading { accel, gyro })
    }
}

fn is_itg3205_id(id: u8) -> bool {
    use crate::register::ids::{ITG3205_WHO_AM_I, ITG3205_WHO_AM_I_MASK};
    (id & ITG3205_WHO_AM_I_MASK) >> 1 == ITG3205_WHO_AM_I
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::mock::{MockI2c, NoopDelay};
    use crate::interface::I2cInterface;

    fn device(bus: MockI2c) -> Gy85<I2cInterface<MockI2c>, NoopDelay> {
        Gy85::new(I2cInterface::new(bus), NoopDelay)
    }

    #[test]
    fn initialize_writes_expected_sequence() {
        let mut dev = device(MockI2c::gy85());
        dev.initialize().unwrap();
        assert!(dev.is_initialized());

        let (iface, _) = dev.release();
        let bus = iface.release();
        assert_eq!(
            bus.writes_to(0x68),
            vec![(0x3E, 0x00), (0x15, 0x00), (0x16, 0x18)]
        );
        assert_eq!(
            bus.writes_to(0x53),
            vec![(0x31, 0x00), (0x2C, 0x0A), (0x2E, 0x00), (0x2D, 0x08)]
        );
    }

    #[test]
    fn read_word_boundaries() {
        let mut bus = MockI2c::gy85();
        bus.set_many(0x68, 0x1D, &[0x7F, 0xFF, 0x80, 0x00, 0xFF, 0xFF]);
        let mut dev = device(bus);
        assert_eq!(dev.read_word::<itg3205::Map>(0x1D).unwrap(), 32767);
        assert_eq!(dev.read_word::<itg3205::Map>(0x1F).unwrap(), -32768);
        assert_eq!(dev.read_word::<itg3205::Map>(0x21).unwrap(), -1);
        assert_eq!(dev.read_word::<itg3205::Map>(0x40).unwrap(), 0);
    }

    #[test]
    fn identity_mismatch_warns_by_default() {
        let mut bus = MockI2c::gy85();
        bus.set(0x53, 0x00, 0x00);
        let mut dev = device(bus);
        assert!(!dev.check_identity(Chip::Adxl345).unwrap());
        assert!(dev.initialize().is_ok());
    }

    #[test]
    fn identity_mismatch_fails_when_verified() {
        let mut bus = MockI2c::gy85();
        bus.set(0x68, 0x00, 0x00);
        let config = Gy85Config {
            verify_identity: true,
            ..Default::default()
        };
        let mut dev = Gy85::with_config(I2cInterface::new(bus), NoopDelay, config);
        match dev.initialize() {
            Err(Gy85Error::IdentityMismatch { chip, found, .. }) => {
                assert_eq!(chip, "ITG3205");
                assert_eq!(found, 0x00);
            }
            other => panic!("resultado inesperado: {:?}", other),
        }
    }

    #[test]
    fn alternate_gyro_address_is_accepted() {
        assert!(is_itg3205_id(0x68));
        assert!(is_itg3205_id(0x69));
        assert!(!is_itg3205_id(0xE5));
    }

    #[test]
    fn bus_failure_propagates() {
        let mut bus = MockI2c::gy85();
        bus.fail = true;
        let mut dev = device(bus);
        assert!(matches!(dev.initialize(), Err(Gy85Error::Bus(_))));
        assert!(dev.read_motion().is_err());
    }

    #[test]
    fn read_motion_orders_accel_then_gyro() {
        let mut bus = MockI2c::gy85();
        // ADXL345: X = 250 (1g), little-endian
        bus.set_many(0x53, 0x32, &[0xFA, 0x00, 0x00, 0x00, 0x06, 0xFF]);
        // ITG3205: X = 14375 (1000 °/s), big-endian
        bus.set_many(0x68, 0x1D, &[0x38, 0x27, 0x00, 0x00, 0xC7, 0xD9]);
        let mut dev = device(bus);
        dev.initialize().unwrap();

        let reading = dev.read_motion().unwrap();
        assert!((reading.accel[0] - 9.80665).abs() < 1e-3);
        assert!((reading.accel[2] - (-250.0 * 0.004 * 9.80665)).abs() < 1e-3);
        assert!((reading.gyro[0] - 1000.0).abs() < 1e-2);
        assert!((reading.gyro[2] + 1000.0).abs() < 1e-2);
    }
}
