//! Push button with red and green status LEDs
//!
//! The button reads high while pressed. The LEDs are wired to the supply,
//! so a low pin lights them; both start switched off.

use embedded_hal::delay::DelayNs;
use raspibot_hal::{InputPin, OutputPin};

/// Polling interval while waiting for an edge
const POLL_INTERVAL_US: u32 = 1_000;

pub struct Button<I, O> {
    button: I,
    led_red: O,
    led_green: O,
}

impl<I: InputPin, O: OutputPin> Button<I, O> {
    pub fn new(button: I, mut led_red: O, mut led_green: O) -> Self {
        led_red.set_high();
        led_green.set_high();
        Self {
            button,
            led_red,
            led_green,
        }
    }

    pub fn set_red_led(&mut self, on: bool) {
        self.led_red.set_state(!on);
    }

    pub fn set_green_led(&mut self, on: bool) {
        self.led_green.set_state(!on);
    }

    pub fn is_pressed(&self) -> bool {
        self.button.is_high()
    }

    /// Block until the button goes from released to pressed
    ///
    /// A button already held down must be released first.
    pub fn wait_for_press(&mut self, delay: &mut impl DelayNs) {
        self.wait_for_level(false, delay);
        self.wait_for_level(true, delay);
        trace!("button pressed");
    }

    /// Block until the button goes from pressed to released
    pub fn wait_for_release(&mut self, delay: &mut impl DelayNs) {
        self.wait_for_level(true, delay);
        self.wait_for_level(false, delay);
        trace!("button released");
    }

    /// Block for a full press and release
    pub fn wait_for_click(&mut self, delay: &mut impl DelayNs) {
        self.wait_for_press(delay);
        self.wait_for_level(false, delay);
    }

    /// Give back the pins: button, red LED, green LED
    pub fn release(self) -> (I, O, O) {
        (self.button, self.led_red, self.led_green)
    }

    fn wait_for_level(&self, pressed: bool, delay: &mut impl DelayNs) {
        while self.is_pressed() != pressed {
            delay.delay_us(POLL_INTERVAL_US);
        }
    }
}
