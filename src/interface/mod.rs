//! Módulo de abstracción para la comunicación con los chips de la GY-85
//!
//! Los dos chips comparten el mismo bus, así que la interfaz recibe la
//! dirección de 7 bits en cada transacción.

use embedded_hal::i2c::{self, I2c};

use crate::device::Gy85Error;

/// Error genérico para interfaces de comunicación
#[derive(Debug, Clone)]
pub enum InterfaceError<E> {
    /// Error de comunicación I2C
    I2cError(E),
    /// Parámetro inválido
    InvalidParameter,
}

/// Trait para abstraer la comunicación con los chips de la GY-85
pub trait Interface {
    /// Tipo de error que puede producir la interfaz
    type Error;

    /// Escribe uno o varios registros consecutivos a partir de `reg`
    fn write_reg(&mut self, addr: u8, reg: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Lee uno o varios registros consecutivos a partir de `reg`
    fn read_reg(&mut self, addr: u8, reg: u8, data: &mut [u8]) -> Result<(), Self::Error>;
}

/// Implementación de Interface para I2C
pub struct I2cInterface<I2C> {
    i2c: I2C,
}

impl<I2C: I2c> I2cInterface<I2C> {
    /// Crea una nueva interfaz I2C
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Consume la interfaz y devuelve el dispositivo I2C subyacente
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> Interface for I2cInterface<I2C> {
    type Error = InterfaceError<I2C::Error>;

    fn write_reg(&mut self, addr: u8, reg: u8, data: &[u8]) -> Result<(), Self::Error> {
        let mut buffer = [0u8; 9]; // Ningún registro de estos chips necesita más
        if data.len() > buffer.len() - 1 {
            return Err(InterfaceError::InvalidParameter);
        }

        buffer[0] = reg;
        buffer[1..data.len() + 1].copy_from_slice(data);

        self.i2c
            .write(addr, &buffer[0..data.len() + 1])
            .map_err(InterfaceError::I2cError)
    }

    fn read_reg(&mut self, addr: u8, reg: u8, data: &mut [u8]) -> Result<(), Self::Error> {
        if data.is_empty() {
            return Err(InterfaceError::InvalidParameter);
        }
        self.i2c
            .write_read(addr, &[reg], data)
            .map_err(InterfaceError::I2cError)
    }
}

// Conversión de errores de la interfaz a Gy85Error
impl<E: i2c::Error> From<InterfaceError<E>> for Gy85Error {
    fn from(error: InterfaceError<E>) -> Self {
        match error {
            InterfaceError::I2cError(e) => Gy85Error::Bus(e.kind()),
            InterfaceError::InvalidParameter => {
                Gy85Error::InvalidParameter("longitud de transferencia I2C")
            }
        }
    }
}
