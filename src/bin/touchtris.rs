//! touchtris firmware.
//!
//! Controls:
//! - Left/Right buttons: shift the piece
//! - Rotate button: rotate clockwise
//! - Joystick down: soft drop, harder pull drops faster
//! - Tap the screen: start, or restart after game over

#![no_std]
#![no_main]

use defmt::{
    error,
    info,
};
use embassy_executor::Spawner;
use embassy_time::{
    Duration,
    Timer,
};
use esp_backtrace as _;
use esp_hal::{
    gpio::Input,
    timer::timg::TimerGroup,
};
use esp_println as _;
use touchtris::{
    AnalogFrontEnd,
    Buttons,
    Game,
    GameConfig,
    InputArbiter,
    Intent,
    Lcd,
    Screen,
    mk_static,
    split_resources,
};

esp_bootloader_esp_idf::esp_app_desc!();

/// One loop pass per tick; the default grace period is 9000 ticks.
const TICK: Duration = Duration::from_micros(50);

static INPUT: InputArbiter = InputArbiter::new();

#[embassy_executor::task(pool_size = 3)]
async fn button_task(mut button: Input<'static>, intent: Intent) {
    info!("{} button task started", intent);
    Buttons::forward(&mut button, intent, &INPUT).await;
}

#[embassy_executor::task]
async fn game_task(screen: &'static mut Screen<Lcd<'static>>, analog: &'static mut AnalogFrontEnd) {
    let mut game = Game::new(GameConfig::default());
    if let Err(e) = game.show_title(screen) {
        error!("title draw failed: {}", defmt::Debug2Format(&e));
    }
    info!("touchtris ready, tap to start");

    let mut state = game.state();
    loop {
        if let Err(e) = game.step(&INPUT, analog, screen) {
            error!("display write failed: {}", defmt::Debug2Format(&e));
        }
        if game.state() != state {
            state = game.state();
            info!(
                "{} (level {=u32}, {=u32} pieces)",
                state,
                game.progression().level(),
                game.locked_pieces()
            );
        }
        Timer::after(TICK).await;
    }
}

#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    let peripherals = touchtris::init();
    let resources = split_resources!(peripherals);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    let screen = mk_static!(Screen<Lcd<'static>>, resources.display.into());
    let analog = mk_static!(AnalogFrontEnd, resources.analog.into());
    let buttons: Buttons = resources.buttons.into();

    for (button, intent) in buttons.into_intents() {
        spawner.must_spawn(button_task(button, intent));
    }
    spawner.must_spawn(game_task(screen, analog));

    loop {
        Timer::after(Duration::from_secs(600)).await;
    }
}
