//! Full example code for putting text on an SSD1306 display. This runs on a Raspberry Pi Pico
//! (RP2040) with a 128x64 I2C module on I2C1, GP2 for SDA and GP3 for SCL, at address 0x3C.
//!
//! The framebuffer lives on the heap, so a global allocator is set up before the display is
//! created.

#![no_main]
#![no_std]

extern crate alloc;
extern crate cortex_m;
extern crate cortex_m_rt;
extern crate embedded_alloc;
extern crate embedded_hal as hal_api;
extern crate panic_halt;
extern crate rp_pico;
extern crate ssd1306_text;

use core::mem::MaybeUninit;

use cortex_m_rt::entry;
use embedded_alloc::Heap;
use fugit::RateExtU32;
use hal_api::blocking::delay::DelayMs;
use rp_pico::hal;
use rp_pico::hal::pac;
use ssd1306_text as oled;

#[global_allocator]
static HEAP: Heap = Heap::empty();

const HEAP_SIZE: usize = 2048;

#[entry]
fn main() -> ! {
    {
        static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
        unsafe { HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE) }
    }

    // Get peripherals and set up the clocks.
    let mut pac = pac::Peripherals::take().unwrap();
    let core = pac::CorePeripherals::take().unwrap();
    let mut watchdog = hal::Watchdog::new(pac.WATCHDOG);
    let clocks = hal::clocks::init_clocks_and_plls(
        rp_pico::XOSC_CRYSTAL_FREQ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    )
    .ok()
    .unwrap();
    let mut delay = cortex_m::delay::Delay::new(core.SYST, clocks.system_clock.freq().to_Hz());

    let sio = hal::Sio::new(pac.SIO);
    let pins = rp_pico::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );

    // I2C1 on GP2/GP3 at 400kHz.
    let sda_pin = pins.gpio2.into_mode::<hal::gpio::FunctionI2C>();
    let scl_pin = pins.gpio3.into_mode::<hal::gpio::FunctionI2C>();
    let i2c = hal::I2C::i2c1(
        pac.I2C1,
        sda_pin,
        scl_pin,
        400.kHz(),
        &mut pac.RESETS,
        clocks.peripheral_clock,
    );

    // Create the I2cInterface and Display.
    let mut disp = oled::Display::new(
        oled::I2cInterface::new(i2c, oled::interface::i2c::PRIMARY_ADDRESS),
        128,
        64,
    )
    .unwrap();

    // Bring the module up with its charge pump and full contrast.
    disp.init(oled::Config::new());
    disp.clear();
    disp.flush();

    // Redraw once a second. Bus failures are logged by the driver and the next frame is tried
    // regardless.
    loop {
        disp.clear();
        disp.draw_text(25, 25, 2, "BMRD");
        disp.flush();
        delay.delay_ms(1000u32);
    }
}
