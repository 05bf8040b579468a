//! ILI9341 display: 240×320 LCD over SPI with DMA.
//!
//! `mipidsi` runs the controller's init sequence, then the raw interface is
//! released so the game can stream its own region writes.

use embedded_graphics::pixelcolor::{
    IntoStorage,
    Rgb565,
};
use embedded_hal_bus::spi::ExclusiveDevice;
use esp_hal::{
    Blocking,
    delay::Delay,
    dma::{
        DmaRxBuf,
        DmaTxBuf,
    },
    dma_buffers,
    gpio::{
        Level,
        Output,
        OutputConfig,
    },
    spi::master::{
        Spi,
        SpiDmaBus,
    },
    time::Rate,
};
use mipidsi::interface::Interface;

use crate::{
    DisplayBus,
    DisplayResources,
    Screen,
    render::{
        SCREEN_HEIGHT,
        SCREEN_WIDTH,
    },
};

type SpiInterface<'a> = mipidsi::interface::SpiInterface<
    'a,
    ExclusiveDevice<SpiDmaBus<'a, Blocking>, Output<'a>, Delay>,
    Output<'a>,
>;

/// Initialised panel, driven with raw commands.
pub struct Lcd<'a> {
    di: SpiInterface<'a>,
    _rst: Option<Output<'a>>,
}

impl<'a> DisplayBus for Lcd<'a> {
    type Error = <SpiInterface<'a> as Interface>::Error;

    fn command(&mut self, opcode: u8, args: &[u8]) -> Result<(), Self::Error> {
        self.di.send_command(opcode, args)
    }

    fn fill(&mut self, color: Rgb565, count: u32) -> Result<(), Self::Error> {
        if count == 0 {
            return Ok(());
        }
        self.di
            .send_repeated_pixel(color.into_storage().to_be_bytes(), count)
    }
}

impl<'a> From<DisplayResources<'a>> for Screen<Lcd<'a>> {
    fn from(res: DisplayResources<'a>) -> Self {
        let (rx_buffer, rx_descriptors, tx_buffer, tx_descriptors) = dma_buffers!(4096);
        let dma_rx_buf = DmaRxBuf::new(rx_descriptors, rx_buffer).unwrap();
        let dma_tx_buf = DmaTxBuf::new(tx_descriptors, tx_buffer).unwrap();

        let mut delay = Delay::new();

        let dc = Output::new(res.dc, Level::Low, OutputConfig::default());
        let mut rst = Output::new(res.rst, Level::Low, OutputConfig::default());
        rst.set_high();

        let spi = Spi::new(
            res.spi,
            esp_hal::spi::master::Config::default().with_frequency(Rate::from_mhz(40)),
        )
        .unwrap()
        .with_sck(res.sck)
        .with_mosi(res.mosi)
        .with_miso(res.miso)
        .with_dma(res.dma)
        .with_buffers(dma_rx_buf, dma_tx_buf);

        let cs = Output::new(res.cs, Level::High, OutputConfig::default());
        let spi_device = ExclusiveDevice::new(spi, cs, delay).unwrap();

        let buffer = crate::mk_static!([u8; 512], [0_u8; 512]);
        let di = mipidsi::interface::SpiInterface::new(spi_device, dc, buffer);

        let display = mipidsi::Builder::new(mipidsi::models::ILI9341Rgb565, di)
            .reset_pin(rst)
            .display_size(SCREEN_WIDTH, SCREEN_HEIGHT)
            .color_order(mipidsi::options::ColorOrder::Bgr)
            .orientation(mipidsi::options::Orientation::new().flip_horizontal())
            .init(&mut delay)
            .unwrap();
        info!("ILI9341 ready");

        let (di, _model, rst) = display.release();
        Screen::new(Lcd { di, _rst: rst })
    }
}
