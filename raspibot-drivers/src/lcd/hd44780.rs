//! HD44780 character LCD in 4-bit mode
//!
//! The display is driven purely by GPIO: register select, read/write,
//! enable and the upper four data lines. Each byte goes out as two
//! nibbles, high nibble first, latched on the falling edge of enable.
//!
//! The busy flag is never read; every nibble is followed by a fixed wait
//! long enough for the slowest instruction.
//!
//! The driver implements [`core::fmt::Write`], so formatted output works
//! with `write!`:
//!
//! ```ignore
//! let mut lcd = Hd44780::new(pins, delay, LcdTiming::default());
//! lcd.init();
//! lcd.clear();
//! write!(lcd, "L {:>4}    R {:>4}", left, right)?;
//! ```

use core::fmt;

use embedded_hal::delay::DelayNs;
use raspibot_hal::OutputPin;

// Instructions
const CLEAR_DISPLAY: u8 = 0b0000_0001;
const ENTRY_MODE_INCREMENT: u8 = 0b0000_0110;
const DISPLAY_ON_CURSOR_BLINK: u8 = 0b0000_1111;
const FUNCTION_4BIT_2LINE: u8 = 0b0010_1000;
const SET_DDRAM_ADDRESS: u8 = 0b1000_0000;

/// DDRAM address of the second line
const LINE_2_ADDRESS: u8 = 0x40;

// Initialization nibbles: force 8-bit mode from any state, then switch to 4-bit
const INIT_8BIT: u8 = 0b0011;
const INIT_4BIT: u8 = 0b0010;

/// Printed for characters outside ASCII
const REPLACEMENT_CHAR: u8 = b'?';

/// GPIO lines of the display
pub struct LcdPins<P> {
    pub enable: P,
    pub rw: P,
    pub register_select: P,
    pub d4: P,
    pub d5: P,
    pub d6: P,
    pub d7: P,
}

/// Display timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LcdTiming {
    /// Wait after each nibble, covers the 1.52 ms clear instruction
    pub nibble_settle_us: u32,
}

impl Default for LcdTiming {
    fn default() -> Self {
        Self {
            nibble_settle_us: 2_000,
        }
    }
}

/// HD44780 driver
pub struct Hd44780<P, D> {
    pins: LcdPins<P>,
    delay: D,
    timing: LcdTiming,
}

impl<P: OutputPin, D: DelayNs> Hd44780<P, D> {
    /// Take the pins and drive all of them low
    pub fn new(mut pins: LcdPins<P>, delay: D, timing: LcdTiming) -> Self {
        pins.enable.set_low();
        pins.rw.set_low();
        pins.register_select.set_low();
        pins.d4.set_low();
        pins.d5.set_low();
        pins.d6.set_low();
        pins.d7.set_low();
        Self { pins, delay, timing }
    }

    /// Ensure 4-bit mode regardless of the controller's state, then set up
    /// two lines, auto-increment and a blinking cursor
    pub fn init(&mut self) {
        self.select_instruction_register();

        self.write_nibble(INIT_8BIT);
        self.write_nibble(INIT_8BIT);
        self.write_nibble(INIT_8BIT);
        self.write_nibble(INIT_4BIT);

        self.write_byte(ENTRY_MODE_INCREMENT);
        self.write_byte(DISPLAY_ON_CURSOR_BLINK);
        self.write_byte(FUNCTION_4BIT_2LINE);

        debug!("LCD initialized");
    }

    /// Clear the display and move the cursor to the top left
    pub fn clear(&mut self) {
        self.select_instruction_register();
        self.write_byte(CLEAR_DISPLAY);
    }

    /// Move the cursor to the start of a line
    ///
    /// The display has two lines; any line other than 0 selects the second.
    pub fn cursor_goto_line(&mut self, line: u8) {
        let address = if line == 0 { 0 } else { LINE_2_ADDRESS };
        self.select_instruction_register();
        self.write_byte(SET_DDRAM_ADDRESS | address);
    }

    /// Print one character code at the cursor
    pub fn print_codepoint(&mut self, code: u8) {
        self.select_data_register();
        self.write_byte(code);
    }

    /// Print a string at the cursor, non-ASCII characters as `?`
    pub fn print(&mut self, text: &str) {
        for c in text.chars() {
            let code = if c.is_ascii() { c as u8 } else { REPLACEMENT_CHAR };
            self.print_codepoint(code);
        }
    }

    /// Give back the pins and the delay
    pub fn release(self) -> (LcdPins<P>, D) {
        (self.pins, self.delay)
    }

    fn select_data_register(&mut self) {
        self.pins.register_select.set_high();
    }

    fn select_instruction_register(&mut self) {
        self.pins.register_select.set_low();
    }

    /// Send the low four bits of `nibble`
    fn write_nibble(&mut self, nibble: u8) {
        self.pins.rw.set_low();
        self.pins.enable.set_high();
        self.pins.d7.set_state(nibble & 0b1000 != 0);
        self.pins.d6.set_state(nibble & 0b0100 != 0);
        self.pins.d5.set_state(nibble & 0b0010 != 0);
        self.pins.d4.set_state(nibble & 0b0001 != 0);
        self.pins.enable.set_low();
        self.delay.delay_us(self.timing.nibble_settle_us);
    }

    fn write_byte(&mut self, byte: u8) {
        self.write_nibble(byte >> 4);
        self.write_nibble(byte & 0x0F);
    }
}

impl<P: OutputPin, D: DelayNs> fmt::Write for Hd44780<P, D> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.print(s);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write as _;
    use std::cell::RefCell;
    use std::rc::Rc;

    const ENABLE: usize = 0;
    const RW: usize = 1;
    const RS: usize = 2;
    const D4: usize = 3;

    /// Logic analyzer on the display lines
    #[derive(Default)]
    struct Lines {
        levels: [bool; 7],
        /// (register select, nibble) latched on each enable falling edge
        latched: Vec<(bool, u8)>,
    }

    impl Lines {
        /// Reassemble latched nibbles into (register select, byte) pairs
        fn bytes(&self, skip_nibbles: usize) -> Vec<(bool, u8)> {
            self.latched[skip_nibbles..]
                .chunks(2)
                .map(|pair| (pair[0].0, pair[0].1 << 4 | pair[1].1))
                .collect()
        }
    }

    struct Line {
        index: usize,
        lines: Rc<RefCell<Lines>>,
    }

    impl OutputPin for Line {
        fn set_high(&mut self) {
            self.lines.borrow_mut().levels[self.index] = true;
        }

        fn set_low(&mut self) {
            let mut lines = self.lines.borrow_mut();
            if self.index == ENABLE && lines.levels[ENABLE] {
                assert!(!lines.levels[RW], "write with RW high");
                let nibble = (0..4).fold(0u8, |acc, bit| {
                    acc | (lines.levels[D4 + bit] as u8) << bit
                });
                let rs = lines.levels[RS];
                lines.latched.push((rs, nibble));
            }
            lines.levels[self.index] = false;
        }

        fn is_set_high(&self) -> bool {
            self.lines.borrow().levels[self.index]
        }
    }

    #[derive(Default)]
    struct FakeDelay {
        total_us: u64,
    }

    impl DelayNs for FakeDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_us += ns as u64 / 1_000;
        }
    }

    fn display() -> (Hd44780<Line, FakeDelay>, Rc<RefCell<Lines>>) {
        let lines = Rc::new(RefCell::new(Lines::default()));
        let line = |index| Line {
            index,
            lines: lines.clone(),
        };
        let pins = LcdPins {
            enable: line(ENABLE),
            rw: line(RW),
            register_select: line(RS),
            d4: line(D4),
            d5: line(D4 + 1),
            d6: line(D4 + 2),
            d7: line(D4 + 3),
        };
        (Hd44780::new(pins, FakeDelay::default(), LcdTiming::default()), lines)
    }

    #[test]
    fn test_init_sequence() {
        let (mut lcd, lines) = display();
        lcd.init();

        let lines = lines.borrow();
        let nibbles: Vec<u8> = lines.latched[..4].iter().map(|&(_, n)| n).collect();
        assert_eq!(nibbles, [0b0011, 0b0011, 0b0011, 0b0010]);
        assert_eq!(
            lines.bytes(4),
            [(false, 0x06), (false, 0x0F), (false, 0x28)]
        );
    }

    #[test]
    fn test_print_sets_data_register() {
        let (mut lcd, lines) = display();
        lcd.clear();
        lcd.print("Hi");

        assert_eq!(
            lines.borrow().bytes(0),
            [(false, 0x01), (true, b'H'), (true, b'i')]
        );
    }

    #[test]
    fn test_non_ascii_is_replaced() {
        let (mut lcd, lines) = display();
        lcd.print("ä!");
        assert_eq!(lines.borrow().bytes(0), [(true, b'?'), (true, b'!')]);
    }

    #[test]
    fn test_cursor_goto_line() {
        let (mut lcd, lines) = display();
        lcd.cursor_goto_line(0);
        lcd.cursor_goto_line(1);
        lcd.cursor_goto_line(7);
        assert_eq!(
            lines.borrow().bytes(0),
            [(false, 0x80), (false, 0xC0), (false, 0xC0)]
        );
    }

    #[test]
    fn test_formatted_output() {
        let (mut lcd, lines) = display();
        write!(lcd, "L {:>4}", 42).unwrap();

        let text: Vec<u8> = lines.borrow().bytes(0).iter().map(|&(_, b)| b).collect();
        assert_eq!(text, b"L   42");
    }

    #[test]
    fn test_waits_after_each_nibble() {
        let (mut lcd, _lines) = display();
        lcd.print("ab");
        let (_, delay) = lcd.release();
        assert_eq!(delay.total_us, 4 * 2_000);
    }
}
