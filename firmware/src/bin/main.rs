#![no_std]
#![no_main]

use core::pin::pin;

use defmt::{error, info, warn};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_rp::adc::{Adc, Channel as AdcChannel, Config as AdcConfig};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Flex, Input, Pull};
use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Ticker};
use embassy_usb::class::hid::State;
use embassy_usb::{Builder, Config as UsbConfig};
use legacy_joystick_adapter::{
    configure_usb_hid, OutputSink, PortBridge, ReportSignal, RpPinIo, SignalOutput, UsbHidOutput,
    POLL_INTERVAL_MS, PORT_A, PORT_B,
};
use static_cell::StaticCell;

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    USBCTRL_IRQ => embassy_rp::usb::InterruptHandler<USB>;
});

/// Signal for passing the joystick report from the poll task to the USB task.
/// Using Signal instead of Channel provides "latest value wins" semantics,
/// which is appropriate for a report where only the most recent state matters.
static REPORT_SIGNAL: StaticCell<ReportSignal> = StaticCell::new();

/// USB device configuration buffer.
static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static MSOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// HID state.
static HID_STATE: StaticCell<State> = StaticCell::new();

type Bridge = PortBridge<RpPinIo<'static>, SignalOutput>;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Legacy joystick adapter starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    // Initialize the report signal (latest-value semantics)
    let signal = REPORT_SIGNAL.init(Signal::new());

    // --- Connector Setup ---
    let adc = Adc::new_blocking(p.ADC, AdcConfig::default());
    let mut io = RpPinIo::new(adc);
    io.attach_digital(2, Flex::new(p.PIN_2))
        .attach_digital(3, Flex::new(p.PIN_3))
        .attach_digital(4, Flex::new(p.PIN_4))
        .attach_digital(5, Flex::new(p.PIN_5))
        .attach_digital(6, Flex::new(p.PIN_6))
        .attach_digital(7, Flex::new(p.PIN_7))
        .attach_digital(8, Flex::new(p.PIN_8))
        .attach_digital(9, Flex::new(p.PIN_9))
        .attach_digital(10, Flex::new(p.PIN_10))
        .attach_analog(6, AdcChannel::new_pin(p.PIN_26, Pull::None))
        .attach_analog(10, AdcChannel::new_pin(p.PIN_27, Pull::None));
    io.attach_digital(11, Flex::new(p.PIN_11))
        .attach_digital(12, Flex::new(p.PIN_12))
        .attach_digital(13, Flex::new(p.PIN_13))
        .attach_digital(14, Flex::new(p.PIN_14))
        .attach_digital(15, Flex::new(p.PIN_15))
        .attach_digital(16, Flex::new(p.PIN_16))
        .attach_digital(17, Flex::new(p.PIN_17))
        .attach_digital(18, Flex::new(p.PIN_18))
        .attach_digital(19, Flex::new(p.PIN_19))
        .attach_analog(15, AdcChannel::new_pin(p.PIN_28, Pull::None))
        .attach_analog(19, AdcChannel::new_pin(p.PIN_29, Pull::None));

    let bridge = PortBridge::new(io, SignalOutput::new(signal), [PORT_A, PORT_B]);
    let reset = Input::new(p.PIN_22, Pull::Up);

    // --- USB Setup ---
    let usb_driver = Driver::new(p.USB, Irqs);

    let mut usb_config = UsbConfig::new(0x1209, 0x0001); // pid.codes test VID/PID
    usb_config.manufacturer = Some("Legacy Adapter");
    usb_config.product = Some("Legacy Joystick Adapter");
    usb_config.serial_number = Some("001");
    usb_config.max_power = 100;
    usb_config.max_packet_size_0 = 64;

    let config_descriptor = CONFIG_DESCRIPTOR.init([0; 256]);
    let bos_descriptor = BOS_DESCRIPTOR.init([0; 256]);
    let msos_descriptor = MSOS_DESCRIPTOR.init([0; 256]);
    let control_buf = CONTROL_BUF.init([0; 64]);

    let mut builder = Builder::new(
        usb_driver,
        usb_config,
        config_descriptor,
        bos_descriptor,
        msos_descriptor,
        control_buf,
    );

    // Configure HID class
    let hid_state = HID_STATE.init(State::new());
    let hid_writer = configure_usb_hid(&mut builder, hid_state);

    // Build the USB device
    let usb_device = builder.build();

    // Create output
    let usb_output = UsbHidOutput::new(hid_writer);

    // Spawn tasks (unwrap the SpawnToken, then spawn)
    spawner.spawn(usb_task(usb_device).unwrap());
    spawner.spawn(poll_task(bridge, reset).unwrap());
    spawner.spawn(output_task(usb_output, signal).unwrap());

    info!("Legacy joystick adapter initialized, waiting for controllers...");
}

/// USB device task - runs the USB stack.
#[embassy_executor::task]
async fn usb_task(mut device: embassy_usb::UsbDevice<'static, Driver<'static, USB>>) {
    device.run().await;
}

/// Poll task - probes and decodes both connectors every tick.
///
/// One reset future lives across cycles, so a press that lands while a poll
/// is running is still seen on the next tick.
#[embassy_executor::task]
async fn poll_task(mut bridge: Bridge, mut reset: Input<'static>) {
    let mut ticker = Ticker::every(Duration::from_millis(POLL_INTERVAL_MS));

    loop {
        let mut pressed = pin!(reset.wait_for_falling_edge());

        loop {
            if let Err(e) = bridge.poll_once().await {
                warn!("Poll error: {:?}", e);
            }

            match select(ticker.next(), pressed.as_mut()).await {
                Either::First(()) => {}
                Either::Second(()) => break,
            }
        }

        info!("Reset requested, releasing both ports");
        bridge.reset_all_ports();
    }
}

/// Output task - waits for report signals and sends them to USB HID.
#[embassy_executor::task]
async fn output_task(mut output: UsbHidOutput<'static>, signal: &'static ReportSignal) {
    // Wait for USB to be ready
    output.wait_ready().await;
    info!("USB HID ready, forwarding joystick reports...");

    loop {
        // Wait for the next report (blocks until signaled)
        let report = signal.wait().await;
        if let Err(e) = output.send(&report).await {
            error!("Output error: {:?}", e);
        }
    }
}
