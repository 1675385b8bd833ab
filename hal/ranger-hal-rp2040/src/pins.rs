//! Dynamic pin allocation for config-driven hardware setup
//!
//! Provides a way to get GPIO pins by number at runtime, enabling
//! Klipper-style config-driven pin assignment. Pins stay typed until they
//! are taken so a pin can still be routed to its PWM slice.

use embassy_rp::gpio::AnyPin;
use embassy_rp::peripherals;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::{Peri, Peripherals};

use crate::pwm::{SliceChannel, SliceOutput};

/// Error when requesting a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin,
    /// Pin already taken
    AlreadyTaken,
    /// The pin's PWM slice already drives another output
    SliceInUse,
}

/// The eight PWM slices
struct PwmSlices {
    slice0: Option<Peri<'static, peripherals::PWM_SLICE0>>,
    slice1: Option<Peri<'static, peripherals::PWM_SLICE1>>,
    slice2: Option<Peri<'static, peripherals::PWM_SLICE2>>,
    slice3: Option<Peri<'static, peripherals::PWM_SLICE3>>,
    slice4: Option<Peri<'static, peripherals::PWM_SLICE4>>,
    slice5: Option<Peri<'static, peripherals::PWM_SLICE5>>,
    slice6: Option<Peri<'static, peripherals::PWM_SLICE6>>,
    slice7: Option<Peri<'static, peripherals::PWM_SLICE7>>,
}

/// GPIO `n` sits on slice `(n / 2) % 8`, output A for even pins
macro_rules! pin_bank {
    ($( $num:literal => $field:ident: $pin:ident, $slice:ident, $out:ident, $ctor:ident; )*) => {
        /// Pin bank that holds all GPIO pins and allows taking them by number
        pub struct PinBank {
            $( $field: Option<Peri<'static, peripherals::$pin>>, )*
            slices: PwmSlices,
        }

        impl PinBank {
            /// Create a pin bank from peripherals
            ///
            /// Takes ownership of every GPIO pin and PWM slice. After this
            /// call, pins must be obtained through the bank.
            pub fn new(p: Peripherals) -> Self {
                Self {
                    $( $field: Some(p.$pin), )*
                    slices: PwmSlices {
                        slice0: Some(p.PWM_SLICE0),
                        slice1: Some(p.PWM_SLICE1),
                        slice2: Some(p.PWM_SLICE2),
                        slice3: Some(p.PWM_SLICE3),
                        slice4: Some(p.PWM_SLICE4),
                        slice5: Some(p.PWM_SLICE5),
                        slice6: Some(p.PWM_SLICE6),
                        slice7: Some(p.PWM_SLICE7),
                    },
                }
            }

            /// Take a pin by number for plain GPIO use
            pub fn take(&mut self, pin: u8) -> Result<Peri<'static, AnyPin>, PinError> {
                match pin {
                    $( $num => self.$field.take().map(Into::into).ok_or(PinError::AlreadyTaken), )*
                    _ => Err(PinError::InvalidPin),
                }
            }

            /// Take a pin together with its PWM slice
            ///
            /// The slice starts disabled. On error the pin stays in the bank.
            pub fn take_pwm(&mut self, pin: u8) -> Result<SliceChannel, PinError> {
                match pin {
                    $(
                        $num => {
                            if self.$field.is_none() {
                                return Err(PinError::AlreadyTaken);
                            }
                            let slice = self.slices.$slice.take().ok_or(PinError::SliceInUse)?;
                            let gpio = self.$field.take().ok_or(PinError::AlreadyTaken)?;
                            let pwm = Pwm::$ctor(slice, gpio, PwmConfig::default());
                            Ok(SliceChannel::new(pwm, SliceOutput::$out))
                        }
                    )*
                    _ => Err(PinError::InvalidPin),
                }
            }
        }
    };
}

pin_bank! {
    0 => pin0: PIN_0, slice0, A, new_output_a;
    1 => pin1: PIN_1, slice0, B, new_output_b;
    2 => pin2: PIN_2, slice1, A, new_output_a;
    3 => pin3: PIN_3, slice1, B, new_output_b;
    4 => pin4: PIN_4, slice2, A, new_output_a;
    5 => pin5: PIN_5, slice2, B, new_output_b;
    6 => pin6: PIN_6, slice3, A, new_output_a;
    7 => pin7: PIN_7, slice3, B, new_output_b;
    8 => pin8: PIN_8, slice4, A, new_output_a;
    9 => pin9: PIN_9, slice4, B, new_output_b;
    10 => pin10: PIN_10, slice5, A, new_output_a;
    11 => pin11: PIN_11, slice5, B, new_output_b;
    12 => pin12: PIN_12, slice6, A, new_output_a;
    13 => pin13: PIN_13, slice6, B, new_output_b;
    14 => pin14: PIN_14, slice7, A, new_output_a;
    15 => pin15: PIN_15, slice7, B, new_output_b;
    16 => pin16: PIN_16, slice0, A, new_output_a;
    17 => pin17: PIN_17, slice0, B, new_output_b;
    18 => pin18: PIN_18, slice1, A, new_output_a;
    19 => pin19: PIN_19, slice1, B, new_output_b;
    20 => pin20: PIN_20, slice2, A, new_output_a;
    21 => pin21: PIN_21, slice2, B, new_output_b;
    22 => pin22: PIN_22, slice3, A, new_output_a;
    23 => pin23: PIN_23, slice3, B, new_output_b;
    24 => pin24: PIN_24, slice4, A, new_output_a;
    25 => pin25: PIN_25, slice4, B, new_output_b;
    26 => pin26: PIN_26, slice5, A, new_output_a;
    27 => pin27: PIN_27, slice5, B, new_output_b;
    28 => pin28: PIN_28, slice6, A, new_output_a;
    29 => pin29: PIN_29, slice6, B, new_output_b;
}
