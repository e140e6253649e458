use static_cell::make_static;

use esp_hal::{gpio::interconnect::PeripheralOutput, peripherals::RMT, rmt::Rmt, time::Rate};
use esp_hal_smartled::{SmartLedsAdapter, buffer_size, smart_led_buffer};
use smart_leds::SmartLedsWrite;

use myrtio_sensor_core::Rgb;
use myrtio_sensor_core::domain::error::LedError;
use myrtio_sensor_core::domain::ports::LedStrip;

use crate::infrastructure::config::LED_COUNT;

/// WS2812 strip driven by the RMT peripheral
///
/// Keeps a frame buffer in logical RGB order, the adapter takes care of the
/// GRB wire order and timings.
pub(crate) struct EspLedStrip<'a> {
    adapter: SmartLedsAdapter<'a, { buffer_size(LED_COUNT) }>,
    frame: [Rgb; LED_COUNT],
}

impl<'a> EspLedStrip<'a> {
    /// Create a new strip driver
    ///
    /// # Arguments
    /// * `rmt` - RMT peripheral
    /// * `pin` - GPIO pin connected to the LED data line
    pub(crate) fn new<O>(rmt: RMT<'a>, pin: O) -> Result<Self, LedError>
    where
        O: PeripheralOutput<'a>,
    {
        let rmt = Rmt::new(rmt, Rate::from_mhz(80)).map_err(|_| LedError::Write)?;

        // The buffer has to outlive the adapter
        let rmt_buffer = make_static!(smart_led_buffer!(LED_COUNT));
        let adapter = SmartLedsAdapter::new(rmt.channel0, pin, rmt_buffer);

        Ok(Self {
            adapter,
            frame: [Rgb::default(); LED_COUNT],
        })
    }
}

impl LedStrip for EspLedStrip<'static> {
    fn set_pixel(&mut self, index: usize, color: Rgb) -> Result<(), LedError> {
        let pixel = self.frame.get_mut(index).ok_or(LedError::PixelOutOfRange)?;
        *pixel = color;
        Ok(())
    }

    fn refresh(&mut self) -> Result<(), LedError> {
        // RMT timings must not be interrupted mid-frame
        critical_section::with(|_| self.adapter.write(self.frame.iter().copied()))
            .map_err(|_| LedError::Write)
    }

    fn clear(&mut self) -> Result<(), LedError> {
        self.frame = [Rgb::default(); LED_COUNT];
        self.refresh()
    }
}
