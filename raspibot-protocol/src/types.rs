//! Values exchanged with the controller
//!
//! Constructors saturate out-of-range inputs to the nearest boundary, so
//! every value of these types is representable on the wire.

use heapless::Vec;

/// Maximum echo payload, limited by the controller's receive buffer
pub const MAX_ECHO_LEN: usize = 3;

/// Loopback payload of an echo transaction
pub type EchoPayload = Vec<u8, MAX_ECHO_LEN>;

/// Cumulative wheel encoder ticks
///
/// Destructures by name (`EncoderValues { left, right }`) and converts to a
/// `(left, right)` tuple for positional access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderValues {
    pub left: u16,
    pub right: u16,
}

impl EncoderValues {
    pub const fn new(left: u16, right: u16) -> Self {
        Self { left, right }
    }

    /// Values in wire order, left first
    pub const fn to_array(self) -> [u16; 2] {
        [self.left, self.right]
    }
}

impl From<EncoderValues> for (u16, u16) {
    fn from(values: EncoderValues) -> Self {
        (values.left, values.right)
    }
}

impl From<(u16, u16)> for EncoderValues {
    fn from((left, right): (u16, u16)) -> Self {
        Self { left, right }
    }
}

/// Signed motor speed in `[-127, 127]`
///
/// Sign is direction (negative turns the wheel backwards), magnitude is
/// speed, zero stops the motor. -128 is excluded so the range is symmetric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotorSpeed(i8);

impl MotorSpeed {
    pub const MIN: i8 = -127;
    pub const MAX: i8 = 127;
    pub const STOP: MotorSpeed = MotorSpeed(0);

    /// Saturate `speed` to `[-127, 127]`
    pub fn new(speed: i32) -> Self {
        Self(speed.clamp(Self::MIN as i32, Self::MAX as i32) as i8)
    }

    /// Parse a wire byte, rejecting the reserved 0x80
    pub fn from_byte(byte: u8) -> Option<Self> {
        let speed = byte as i8;
        (speed >= Self::MIN).then_some(Self(speed))
    }

    pub fn get(self) -> i8 {
        self.0
    }

    /// Two's complement wire byte
    pub fn to_byte(self) -> u8 {
        self.0 as u8
    }

    pub fn is_stopped(self) -> bool {
        self.0 == 0
    }
}

impl From<i8> for MotorSpeed {
    fn from(speed: i8) -> Self {
        Self::new(speed as i32)
    }
}

/// Speed controller tuning sent to the firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PiParameters {
    /// Proportional gain
    pub proportional: i16,
    /// Integral gain
    pub integral: i16,
    /// Maximum speed the controller may command
    pub speed_limit: u8,
}

impl PiParameters {
    /// Encoded size: i16 + i16 + u8
    pub const WIRE_LEN: usize = 5;

    /// Saturate each value to its wire type independently
    pub fn new(proportional: i32, integral: i32, speed_limit: i32) -> Self {
        Self {
            proportional: proportional.clamp(i16::MIN as i32, i16::MAX as i32) as i16,
            integral: integral.clamp(i16::MIN as i32, i16::MAX as i32) as i16,
            speed_limit: speed_limit.clamp(u8::MIN as i32, u8::MAX as i32) as u8,
        }
    }

    /// Big-endian wire form
    pub fn to_bytes(&self) -> [u8; Self::WIRE_LEN] {
        let [p_hi, p_lo] = self.proportional.to_be_bytes();
        let [i_hi, i_lo] = self.integral.to_be_bytes();
        [p_hi, p_lo, i_hi, i_lo, self.speed_limit]
    }

    pub fn from_bytes(bytes: [u8; Self::WIRE_LEN]) -> Self {
        Self {
            proportional: i16::from_be_bytes([bytes[0], bytes[1]]),
            integral: i16::from_be_bytes([bytes[2], bytes[3]]),
            speed_limit: bytes[4],
        }
    }
}

/// Outcome of a command that returns no data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Acknowledgement {
    Ack,
    /// Explicit NAK, or no reply before the read timeout
    Nak,
}

impl Acknowledgement {
    pub fn is_ack(self) -> bool {
        self == Acknowledgement::Ack
    }
}

impl From<Acknowledgement> for bool {
    fn from(ack: Acknowledgement) -> Self {
        ack.is_ack()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_motor_speed_clamps() {
        assert_eq!(MotorSpeed::new(500).get(), 127);
        assert_eq!(MotorSpeed::new(-500).get(), -127);
        assert_eq!(MotorSpeed::new(-128).get(), -127);
        assert_eq!(MotorSpeed::new(42).get(), 42);
        assert!(MotorSpeed::new(0).is_stopped());
    }

    #[test]
    fn test_motor_speed_bytes() {
        assert_eq!(MotorSpeed::new(-1).to_byte(), 0xFF);
        assert_eq!(MotorSpeed::new(-127).to_byte(), 0x81);
        assert_eq!(MotorSpeed::from_byte(0x81), Some(MotorSpeed::new(-127)));
        assert_eq!(MotorSpeed::from_byte(0x80), None);
        assert_eq!(MotorSpeed::from(i8::MIN).get(), -127);
    }

    #[test]
    fn test_pi_parameters_clamp() {
        let params = PiParameters::new(-40000, 40000, 999);
        assert_eq!(params.proportional, i16::MIN);
        assert_eq!(params.integral, i16::MAX);
        assert_eq!(params.speed_limit, 255);
        assert_eq!(params.to_bytes(), [0x80, 0x00, 0x7F, 0xFF, 0xFF]);

        assert_eq!(PiParameters::new(0, 0, -3).speed_limit, 0);
    }

    #[test]
    fn test_encoder_values_access() {
        let values = EncoderValues::new(0, 65535);
        assert_eq!(values.left, 0);
        assert_eq!(values.right, 65535);
        assert_eq!(values.to_array()[1], 65535);
        let (left, right) = values.into();
        assert_eq!((left, right), (0, 65535));
        assert_eq!(EncoderValues::from((0, 65535)), values);
    }

    #[test]
    fn test_acknowledgement_as_bool() {
        assert!(bool::from(Acknowledgement::Ack));
        assert!(!bool::from(Acknowledgement::Nak));
    }

    proptest! {
        #[test]
        fn prop_motor_speed_in_range(speed in any::<i32>()) {
            let clamped = MotorSpeed::new(speed).get() as i32;
            prop_assert!((-127..=127).contains(&clamped));
            if (-127..=127).contains(&speed) {
                prop_assert_eq!(clamped, speed);
            } else {
                prop_assert_eq!(clamped, if speed < 0 { -127 } else { 127 });
            }
        }

        #[test]
        fn prop_pi_parameters_bytes_roundtrip(
            p in any::<i16>(),
            i in any::<i16>(),
            limit in any::<u8>(),
        ) {
            let params = PiParameters::new(p as i32, i as i32, limit as i32);
            prop_assert_eq!(PiParameters::from_bytes(params.to_bytes()), params);
            prop_assert_eq!(params.proportional, p);
            prop_assert_eq!(params.integral, i);
            prop_assert_eq!(params.speed_limit, limit);
        }
    }
}
