//! USB HID joystick output implementation.

use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_usb::class::hid::{HidWriter, State};
use embassy_usb::Builder;
use legacy_core::{JoystickReport, OutputError, OutputSink};

/// Largest report the HID writer accepts.
pub const MAX_REPORT_SIZE: usize = 32;

const _: () = assert!(JoystickReport::SIZE <= MAX_REPORT_SIZE);

/// Signal carrying the latest report from the polling task to the USB task.
pub type ReportSignal = Signal<CriticalSectionRawMutex, JoystickReport>;

/// HID writer type used by the adapter.
pub type JoystickWriter<'d> = HidWriter<'d, Driver<'d, USB>, MAX_REPORT_SIZE>;

/// Joystick HID Report Descriptor.
///
/// This descriptor defines a joystick with:
/// - 30 buttons (15 per connector) plus 2 padding bits
/// - X, Y, Z, Rx, Ry, Rz (signed 16-bit)
/// - Rudder, Throttle, Accelerator, Brake, Steering (signed 16-bit)
pub const REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x04, // Usage (Joystick)
    0xA1, 0x01, // Collection (Application)
    //
    // --- Buttons (30 buttons) ---
    0x05, 0x09, //   Usage Page (Button)
    0x19, 0x01, //   Usage Minimum (Button 1)
    0x29, 0x1E, //   Usage Maximum (Button 30)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x95, 0x1E, //   Report Count (30)
    0x75, 0x01, //   Report Size (1)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    0x95, 0x01, //   Report Count (1)
    0x75, 0x02, //   Report Size (2)
    0x81, 0x03, //   Input (Constant) - padding
    //
    // --- Generic Desktop axes ---
    0x05, 0x01, //   Usage Page (Generic Desktop)
    0x09, 0x30, //   Usage (X)
    0x09, 0x31, //   Usage (Y)
    0x09, 0x32, //   Usage (Z)
    0x09, 0x33, //   Usage (Rx)
    0x09, 0x34, //   Usage (Ry)
    0x09, 0x35, //   Usage (Rz)
    0x16, 0x01, 0x80, //   Logical Minimum (-32767)
    0x26, 0xFF, 0x7F, //   Logical Maximum (32767)
    0x75, 0x10, //   Report Size (16)
    0x95, 0x06, //   Report Count (6)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    // --- Simulation controls ---
    0x05, 0x02, //   Usage Page (Simulation Controls)
    0x09, 0xBA, //   Usage (Rudder)
    0x09, 0xBB, //   Usage (Throttle)
    0x09, 0xC4, //   Usage (Accelerator)
    0x09, 0xC5, //   Usage (Brake)
    0x09, 0xC8, //   Usage (Steering)
    0x95, 0x05, //   Report Count (5)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    0xC0, // End Collection
];

/// USB HID joystick output.
///
/// Wraps an embassy-usb HID writer to send joystick reports.
pub struct UsbHidOutput<'d> {
    writer: JoystickWriter<'d>,
    ready: bool,
}

impl<'d> UsbHidOutput<'d> {
    /// Create a new USB HID output from the given HID writer.
    pub fn new(writer: JoystickWriter<'d>) -> Self {
        Self {
            writer,
            ready: false,
        }
    }

    /// Wait until the device is ready (USB enumerated).
    pub async fn wait_ready(&mut self) {
        self.writer.ready().await;
        self.ready = true;
    }
}

impl<'d> OutputSink for UsbHidOutput<'d> {
    async fn send(&mut self, report: &JoystickReport) -> Result<(), OutputError> {
        self.writer
            .write(&report.as_bytes())
            .await
            .map_err(|_| OutputError::Io)
    }

    fn is_ready(&self) -> bool {
        self.ready
    }
}

/// Output sink that hands reports to the USB task.
///
/// Latest value wins: a report not yet picked up is replaced.
pub struct SignalOutput {
    signal: &'static ReportSignal,
}

impl SignalOutput {
    pub fn new(signal: &'static ReportSignal) -> Self {
        Self { signal }
    }
}

impl OutputSink for SignalOutput {
    async fn send(&mut self, report: &JoystickReport) -> Result<(), OutputError> {
        self.signal.signal(*report);
        Ok(())
    }

    fn is_ready(&self) -> bool {
        true
    }
}

/// Configure the USB HID class in the USB builder.
///
/// Returns the HID writer for use by the application.
pub fn configure_usb_hid<'d>(
    builder: &mut Builder<'d, Driver<'d, USB>>,
    state: &'d mut State<'d>,
) -> JoystickWriter<'d> {
    let config = embassy_usb::class::hid::Config {
        report_descriptor: REPORT_DESCRIPTOR,
        request_handler: None,
        poll_ms: 1,
        max_packet_size: MAX_REPORT_SIZE as u16,
        hid_subclass: embassy_usb::class::hid::HidSubclass::No,
        hid_boot_protocol: embassy_usb::class::hid::HidBootProtocol::None,
    };

    HidWriter::new(builder, state, config)
}
