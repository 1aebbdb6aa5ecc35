//! Serial channel abstractions
//!
//! The ATtiny link is a plain byte pipe: writes are delivered in order and
//! unmodified, reads block until the buffer is full or the port's read
//! timeout elapses. A short read is not an error at this level; the protocol
//! decides what a missing byte means.

use core::time::Duration;

use embedded_io::{Error as _, ErrorKind, Read, Write};

/// Byte-oriented serial channel with a read timeout
pub trait SerialChannel {
    /// Send all bytes, in order
    fn write(&mut self, data: &[u8]);

    /// Read up to `buf.len()` bytes
    ///
    /// Blocks until the buffer is full or the channel's timeout elapses.
    /// Returns the number of bytes received, which may be zero.
    fn read(&mut self, buf: &mut [u8]) -> usize;
}

impl<T: SerialChannel + ?Sized> SerialChannel for &mut T {
    fn write(&mut self, data: &[u8]) {
        T::write(self, data)
    }

    fn read(&mut self, buf: &mut [u8]) -> usize {
        T::read(self, buf)
    }
}

/// [`SerialChannel`] on top of an `embedded-io` transport
///
/// Transport errors never reach the caller. A failed write leaves the
/// controller without a request, so the following read times out. A failed
/// or timed-out read ends the read early and reports what was received.
pub struct IoChannel<T> {
    io: T,
}

impl<T> IoChannel<T> {
    /// Wrap a transport
    pub fn new(io: T) -> Self {
        Self { io }
    }

    /// Borrow the transport
    pub fn inner(&self) -> &T {
        &self.io
    }

    /// Mutably borrow the transport
    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.io
    }

    /// Unwrap the transport
    pub fn into_inner(self) -> T {
        self.io
    }
}

impl<T: Read + Write> SerialChannel for IoChannel<T> {
    fn write(&mut self, data: &[u8]) {
        let result = self.io.write_all(data).and_then(|()| self.io.flush());
        if let Err(e) = result {
            warn!("serial write of {} bytes failed: {:?}", data.len(), e.kind());
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> usize {
        let mut filled = 0;
        while filled < buf.len() {
            match self.io.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) => {
                    let kind = e.kind();
                    if kind != ErrorKind::TimedOut {
                        warn!("serial read failed after {} bytes: {:?}", filled, kind);
                    }
                    break;
                }
            }
        }
        trace!("serial read {}/{} bytes", filled, buf.len());
        filled
    }
}

/// Serial port configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SerialConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
    /// Read timeout in milliseconds
    ///
    /// This is the only latency bound a transaction has.
    pub timeout_ms: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baudrate: 9600,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            timeout_ms: 100,
        }
    }
}

impl SerialConfig {
    /// Read timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms as u64)
    }

    /// Worst-case time to transfer `bytes` bytes at the configured baud rate
    ///
    /// Counts start, data, parity and stop bits per byte.
    pub fn transfer_time(&self, bytes: usize) -> Duration {
        let bits_per_byte = 1
            + self.data_bits.bits()
            + if self.parity == Parity::None { 0 } else { 1 }
            + self.stop_bits.bits();
        let total_bits = bytes as u64 * bits_per_byte as u64;
        Duration::from_micros(total_bits * 1_000_000 / self.baudrate.max(1) as u64)
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DataBits {
    Seven,
    Eight,
}

impl DataBits {
    fn bits(self) -> u32 {
        match self {
            DataBits::Seven => 7,
            DataBits::Eight => 8,
        }
    }
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StopBits {
    One,
    Two,
}

impl StopBits {
    fn bits(self) -> u32 {
        match self {
            StopBits::One => 1,
            StopBits::Two => 2,
        }
    }
}
