#![allow(dead_code)]

use std::{
    collections::VecDeque,
    convert::Infallible,
};

use embedded_graphics::pixelcolor::{
    IntoStorage,
    Rgb565,
};
use touchtris::{
    AnalogInputs,
    DisplayBus,
    Screen,
    TouchSample,
    render::{
        CMD_COLUMN_ADDRESS_SET,
        CMD_MEMORY_WRITE,
        CMD_ROW_ADDRESS_SET,
    },
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Op {
    Command(u8, Vec<u8>),
    Fill(u16, u32),
}

/// A region write decoded from the op stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub x0: u16,
    pub y0: u16,
    pub x1: u16,
    pub y1: u16,
    pub color: u16,
    pub count: u32,
}

#[derive(Default)]
pub struct RecordingBus {
    pub ops: Vec<Op>,
}

impl DisplayBus for RecordingBus {
    type Error = Infallible;

    fn command(&mut self, opcode: u8, args: &[u8]) -> Result<(), Infallible> {
        self.ops.push(Op::Command(opcode, args.to_vec()));
        Ok(())
    }

    fn fill(&mut self, color: Rgb565, count: u32) -> Result<(), Infallible> {
        self.ops.push(Op::Fill(color.into_storage(), count));
        Ok(())
    }
}

impl RecordingBus {
    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// Decode the op stream into region writes. Panics on anything that is
    /// not column set, row set, memory write, fill.
    pub fn regions(&self) -> Vec<Region> {
        self.ops
            .chunks(4)
            .map(|chunk| match chunk {
                [
                    Op::Command(CMD_COLUMN_ADDRESS_SET, cols),
                    Op::Command(CMD_ROW_ADDRESS_SET, rows),
                    Op::Command(CMD_MEMORY_WRITE, mem),
                    Op::Fill(color, count),
                ] if cols.len() == 4 && rows.len() == 4 && mem.is_empty() => Region {
                    x0: u16::from_be_bytes([cols[0], cols[1]]),
                    x1: u16::from_be_bytes([cols[2], cols[3]]),
                    y0: u16::from_be_bytes([rows[0], rows[1]]),
                    y1: u16::from_be_bytes([rows[2], rows[3]]),
                    color: *color,
                    count: *count,
                },
                other => panic!("not a region write: {other:?}"),
            })
            .collect()
    }
}

pub fn recording_screen() -> Screen<RecordingBus> {
    Screen::new(RecordingBus::default())
}

/// Joystick and touch readings replayed in order; the last value repeats.
pub struct ScriptedInputs {
    joystick: VecDeque<u16>,
    touch: VecDeque<TouchSample>,
    last_joystick: u16,
    last_touch: TouchSample,
}

impl ScriptedInputs {
    pub fn resting() -> Self {
        Self {
            joystick: VecDeque::new(),
            touch: VecDeque::new(),
            last_joystick: 1023,
            last_touch: TouchSample::RELEASED,
        }
    }

    pub fn push_joystick(&mut self, sample: u16) -> &mut Self {
        self.joystick.push_back(sample);
        self
    }

    pub fn push_touch(&mut self, sample: TouchSample) -> &mut Self {
        self.touch.push_back(sample);
        self
    }
}

impl AnalogInputs for ScriptedInputs {
    fn joystick(&mut self) -> u16 {
        if let Some(sample) = self.joystick.pop_front() {
            self.last_joystick = sample;
        }
        self.last_joystick
    }

    fn touch(&mut self) -> TouchSample {
        match self.touch.pop_front() {
            Some(sample) => sample,
            None => self.last_touch,
        }
    }
}

/// A firm press well above the default threshold.
pub const TAP: TouchSample = TouchSample { x: 400, y: 20 };

/// A model of the panel's frame memory, driven by the recorded op stream.
///
/// Writes walk the open window row by row and wrap back to its start once
/// the window is full, as the controller does.
pub struct Panel {
    pixels: Vec<u16>,
    window: (u16, u16, u16, u16),
    cursor: (u16, u16),
}

impl Panel {
    pub const WIDTH: u16 = 240;
    pub const HEIGHT: u16 = 320;

    pub fn new() -> Self {
        Self {
            pixels: vec![0; usize::from(Self::WIDTH) * usize::from(Self::HEIGHT)],
            window: (0, 0, Self::WIDTH - 1, Self::HEIGHT - 1),
            cursor: (0, 0),
        }
    }

    pub fn pixel(&self, x: u16, y: u16) -> u16 {
        self.pixels[usize::from(y) * usize::from(Self::WIDTH) + usize::from(x)]
    }

    /// Apply and drain every op recorded so far.
    pub fn replay(&mut self, bus: &mut RecordingBus) {
        for op in bus.ops.drain(..) {
            match op {
                Op::Command(CMD_COLUMN_ADDRESS_SET, args) => {
                    self.window.0 = u16::from_be_bytes([args[0], args[1]]);
                    self.window.2 = u16::from_be_bytes([args[2], args[3]]);
                }
                Op::Command(CMD_ROW_ADDRESS_SET, args) => {
                    self.window.1 = u16::from_be_bytes([args[0], args[1]]);
                    self.window.3 = u16::from_be_bytes([args[2], args[3]]);
                }
                Op::Command(CMD_MEMORY_WRITE, _) => {
                    self.cursor = (self.window.0, self.window.1);
                }
                Op::Command(opcode, _) => panic!("unexpected command {opcode:#04x}"),
                Op::Fill(color, count) => {
                    for _ in 0..count {
                        self.write(color);
                    }
                }
            }
        }
    }

    fn write(&mut self, color: u16) {
        let (x0, y0, x1, y1) = self.window;
        let (x, y) = self.cursor;
        if x < Self::WIDTH && y < Self::HEIGHT {
            self.pixels[usize::from(y) * usize::from(Self::WIDTH) + usize::from(x)] = color;
        }
        self.cursor = if x < x1 {
            (x + 1, y)
        } else if y < y1 {
            (x0, y + 1)
        } else {
            (x0, y0)
        };
    }
}
