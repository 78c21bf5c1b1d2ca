//! Hub serial link on its own UART.
//!
//! The console UART carries the `log` output, so the hub gets a dedicated
//! port.  The installed driver is split into a [`HubTx`] half for
//! [`LineBus`](super::line_bus::LineBus) and a [`HubRx`] half that the
//! `bus-rx` thread owns.

use std::io;

use esp_idf_hal::delay::{BLOCK, NON_BLOCK};
use esp_idf_hal::gpio::AnyIOPin;
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_hal::uart::{config::Config, Uart, UartDriver, UartRxDriver, UartTxDriver};
use esp_idf_hal::units::Hertz;
use esp_idf_svc::sys::EspError;
use log::info;

/// Install the UART driver on `tx_gpio`/`rx_gpio` and split it.
///
/// # Safety
///
/// The caller must not hand either GPIO to another driver.
pub unsafe fn open<U: Uart>(
    uart: impl Peripheral<P = U> + 'static,
    tx_gpio: u8,
    rx_gpio: u8,
    baud: u32,
) -> Result<(HubTx, HubRx), EspError> {
    // SAFETY: exclusive use of both pins is the caller's contract.
    let (tx_pin, rx_pin) = unsafe { (AnyIOPin::new(i32::from(tx_gpio)), AnyIOPin::new(i32::from(rx_gpio))) };
    let driver = UartDriver::new(
        uart,
        tx_pin,
        rx_pin,
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &Config::new().baudrate(Hertz(baud)),
    )?;
    info!("Hub UART up (tx={} rx={} {} baud)", tx_gpio, rx_gpio, baud);
    let (tx, rx) = driver.into_split();
    Ok((HubTx(tx), HubRx(rx)))
}

/// Transmit half.
pub struct HubTx(UartTxDriver<'static>);

impl io::Write for HubTx {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf).map_err(io::Error::other)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.wait_done(BLOCK).map_err(io::Error::other)
    }
}

/// Receive half.  Blocks for the first byte, then takes whatever else is
/// already in the FIFO, so a short line is returned without waiting for
/// a full buffer.
pub struct HubRx(UartRxDriver<'static>);

impl io::Read for HubRx {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let Some((first, rest)) = buf.split_first_mut() else {
            return Ok(0);
        };
        let got = self.0.read(core::slice::from_mut(first), BLOCK).map_err(io::Error::other)?;
        if got == 0 {
            return Err(io::ErrorKind::WouldBlock.into());
        }
        let more = self.0.read(rest, NON_BLOCK).map_err(io::Error::other)?;
        Ok(got + more)
    }
}
