//! ADC1 front end: joystick axis and resistive touch pressure.
//!
//! The touch panel is wired for Z only: X+ is held low and Y- high, and the
//! pressure is read from Y+ and X-. Samples are scaled from the ADC's 12 bits
//! down to the 10-bit range the game thresholds use.

use esp_hal::{
    Blocking,
    analog::adc::{
        Adc,
        AdcConfig,
        AdcPin,
        Attenuation,
    },
    gpio::{
        Level,
        Output,
        OutputConfig,
    },
    peripherals::{
        ADC1,
        GPIO1,
        GPIO2,
        GPIO4,
    },
};

use crate::{
    AnalogResources,
    input::{
        AnalogInputs,
        TouchSample,
    },
};

/// Reading used when a joystick conversion fails: stick at rest.
const JOYSTICK_REST: u16 = 1023;
/// 12-bit conversions to the 10-bit range.
const SAMPLE_SHIFT: u16 = 2;

pub struct AnalogFrontEnd {
    adc: Adc<'static, ADC1<'static>, Blocking>,
    joystick: AdcPin<GPIO1<'static>, ADC1<'static>>,
    touch_yp: AdcPin<GPIO2<'static>, ADC1<'static>>,
    touch_xm: AdcPin<GPIO4<'static>, ADC1<'static>>,
    _touch_xp: Output<'static>,
    _touch_ym: Output<'static>,
}

impl From<AnalogResources<'static>> for AnalogFrontEnd {
    fn from(res: AnalogResources<'static>) -> Self {
        let mut config = AdcConfig::new();
        let joystick = config.enable_pin(res.joystick, Attenuation::_11dB);
        let touch_yp = config.enable_pin(res.touch_yp, Attenuation::_11dB);
        let touch_xm = config.enable_pin(res.touch_xm, Attenuation::_11dB);
        let adc = Adc::new(res.adc, config);

        let touch_xp = Output::new(res.touch_xp, Level::Low, OutputConfig::default());
        let touch_ym = Output::new(res.touch_ym, Level::High, OutputConfig::default());

        Self {
            adc,
            joystick,
            touch_yp,
            touch_xm,
            _touch_xp: touch_xp,
            _touch_ym: touch_ym,
        }
    }
}

impl AnalogInputs for AnalogFrontEnd {
    fn joystick(&mut self) -> u16 {
        match nb::block!(self.adc.read_oneshot(&mut self.joystick)) {
            Ok(raw) => raw >> SAMPLE_SHIFT,
            Err(e) => {
                warn!("joystick conversion failed: {}", defmt::Debug2Format(&e));
                JOYSTICK_REST
            }
        }
    }

    fn touch(&mut self) -> TouchSample {
        let x = nb::block!(self.adc.read_oneshot(&mut self.touch_yp));
        let y = nb::block!(self.adc.read_oneshot(&mut self.touch_xm));
        match (x, y) {
            (Ok(x), Ok(y)) => TouchSample {
                x: x >> SAMPLE_SHIFT,
                y: y >> SAMPLE_SHIFT,
            },
            _ => {
                warn!("touch conversion failed");
                TouchSample::RELEASED
            }
        }
    }
}
