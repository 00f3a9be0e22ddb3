//! PortBridge: connects the connector pins to a report output sink.

use crate::controller::LegacyController;
use crate::factory::{PortAllocator, PORT_COUNT};
use crate::output::{OutputError, OutputSink};
use crate::pins::{PinError, PinIo, PinSet};
use crate::report::JoystickReport;

/// One physical connector and the controller that claimed it, if any.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Port {
    pins: PinSet,
    controller: Option<LegacyController>,
}

impl Port {
    #[must_use]
    pub const fn new(pins: PinSet) -> Self {
        Self {
            pins,
            controller: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn pins(&self) -> &PinSet {
        &self.pins
    }

    #[inline]
    #[must_use]
    pub const fn controller(&self) -> Option<&LegacyController> {
        self.controller.as_ref()
    }
}

/// Polls both connectors and forwards the joystick report to an output sink.
///
/// Each cycle an open port is probed and a claimed port is decoded. The
/// report is sent only when it differs from the last one delivered.
///
/// # Error Handling
///
/// A pin fault while decoding one port is logged and does not stop the
/// other port; the controller stays attached and is sampled again next
/// cycle. Output errors leave the report pending so the next cycle retries.
pub struct PortBridge<P, O> {
    io: P,
    output: O,
    allocator: PortAllocator,
    ports: [Port; PORT_COUNT],
    report: JoystickReport,
    last_sent: Option<JoystickReport>,
}

impl<P: PinIo, O: OutputSink> PortBridge<P, O> {
    /// Create a bridge over two connectors.
    pub fn new(io: P, output: O, connectors: [PinSet; PORT_COUNT]) -> Self {
        Self {
            io,
            output,
            allocator: PortAllocator::new(),
            ports: connectors.map(Port::new),
            report: JoystickReport::neutral(),
            last_sent: None,
        }
    }

    /// Run one polling cycle and send the report if it changed.
    ///
    /// Returns whether a report was sent. A decode fault is reported after
    /// the report has been delivered.
    pub async fn poll_once(&mut self) -> Result<bool, BridgeError> {
        let scanned = self.scan();
        let sent = self.flush().await?;
        scanned.map(|()| sent)
    }

    /// Probe open ports and decode claimed ones into the report.
    ///
    /// Every port is serviced; the last decode fault, if any, is returned.
    pub fn scan(&mut self) -> Result<(), BridgeError> {
        let mut result = Ok(());
        for (index, port) in self.ports.iter_mut().enumerate() {
            match &mut port.controller {
                Some(controller) => {
                    if let Err(e) = controller.decode(&mut self.io, &mut self.report) {
                        warn!("port {}: {} decode failed: {:?}", index, controller.name(), e);
                        result = Err(BridgeError::Pin(e));
                    }
                }
                None => {
                    port.controller = self.allocator.look_for_controller(&port.pins, &mut self.io);
                }
            }
        }
        result
    }

    /// Send the report if it changed since the last successful send.
    pub async fn flush(&mut self) -> Result<bool, BridgeError> {
        if self.last_sent == Some(self.report) {
            return Ok(false);
        }
        self.output
            .send(&self.report)
            .await
            .map_err(BridgeError::Output)?;
        self.last_sent = Some(self.report);
        Ok(true)
    }

    /// Drop both controllers, release their buttons and free both slots.
    ///
    /// The next cycle probes both connectors again.
    pub fn reset_all_ports(&mut self) {
        for port in self.ports.iter_mut() {
            if let Some(mut controller) = port.controller.take() {
                info!("releasing {}", controller.name());
                controller.release(&mut self.report);
            }
        }
        self.allocator.reset_all_ports();
    }

    /// Get the current report.
    pub fn report(&self) -> &JoystickReport {
        &self.report
    }

    /// Get a connector and its controller.
    pub fn port(&self, index: usize) -> Option<&Port> {
        self.ports.get(index)
    }

    /// Get a reference to the pin I/O provider.
    pub fn io(&self) -> &P {
        &self.io
    }

    /// Get a mutable reference to the pin I/O provider.
    pub fn io_mut(&mut self) -> &mut P {
        &mut self.io
    }

    /// Get a reference to the output sink.
    pub fn output(&self) -> &O {
        &self.output
    }

    /// Get a mutable reference to the output sink.
    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    /// Decompose the bridge into its pin provider and output sink.
    pub fn into_parts(self) -> (P, O) {
        (self.io, self.output)
    }
}

/// Error type for bridge operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BridgeError {
    /// Pin fault while decoding an attached controller.
    Pin(PinError),
    /// Error from the output sink.
    Output(OutputError),
}

impl From<PinError> for BridgeError {
    fn from(e: PinError) -> Self {
        BridgeError::Pin(e)
    }
}

impl From<OutputError> for BridgeError {
    fn from(e: OutputError) -> Self {
        BridgeError::Output(e)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::controller::ControllerKind;
    use crate::mock::{MockBoard, PORT_A, PORT_B};
    use crate::types::{Axis, PortSlot, AXIS_MAX, AXIS_MIN};
    use core::future::Future;
    use core::pin::Pin;
    use core::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};
    use std::vec::Vec;

    // Simple mock output sink
    struct MockOutput {
        sent: Vec<JoystickReport>,
        fail_next: Option<OutputError>,
    }

    impl MockOutput {
        fn new() -> Self {
            Self {
                sent: Vec::new(),
                fail_next: None,
            }
        }
    }

    impl OutputSink for MockOutput {
        fn send(
            &mut self,
            report: &JoystickReport,
        ) -> impl Future<Output = Result<(), OutputError>> {
            let result = match self.fail_next.take() {
                Some(e) => Err(e),
                None => {
                    self.sent.push(*report);
                    Ok(())
                }
            };
            core::future::ready(result)
        }

        fn is_ready(&self) -> bool {
            true
        }
    }

    // Helper to run a future to completion (simple blocking executor)
    fn block_on<F: Future>(mut f: F) -> F::Output {
        fn noop_raw_waker() -> RawWaker {
            fn noop(_: *const ()) {}
            fn clone(_: *const ()) -> RawWaker {
                noop_raw_waker()
            }
            static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, noop, noop, noop);
            RawWaker::new(core::ptr::null(), &VTABLE)
        }

        let waker = unsafe { Waker::from_raw(noop_raw_waker()) };
        let mut cx = Context::from_waker(&waker);

        // SAFETY: We don't move f after pinning
        let mut f = unsafe { Pin::new_unchecked(&mut f) };

        loop {
            match f.as_mut().poll(&mut cx) {
                Poll::Ready(result) => return result,
                Poll::Pending => {
                    panic!("Mock future returned Pending unexpectedly");
                }
            }
        }
    }

    fn bridge(board: MockBoard) -> PortBridge<MockBoard, MockOutput> {
        PortBridge::new(board, MockOutput::new(), [PORT_A, PORT_B])
    }

    #[test]
    fn test_idle_bridge_sends_neutral_once() {
        let mut bridge = bridge(MockBoard::new());

        assert_eq!(block_on(bridge.poll_once()), Ok(true));
        assert_eq!(block_on(bridge.poll_once()), Ok(false));
        assert_eq!(bridge.output().sent, [JoystickReport::neutral()]);
        assert!(bridge.port(0).unwrap().controller().is_none());
    }

    #[test]
    fn test_joystick_fire_reaches_report_after_window() {
        let mut board = MockBoard::new();
        board.press(&PORT_A, 6);
        let mut bridge = bridge(board);

        block_on(bridge.poll_once()).unwrap();
        let controller = bridge.port(0).unwrap().controller().unwrap();
        assert!(matches!(
            controller.kind(),
            ControllerKind::AtariJoystick(_)
        ));

        // Still inside the window opened at attach.
        bridge.io_mut().advance(5);
        block_on(bridge.poll_once()).unwrap();
        assert!(!bridge.report().is_pressed(0));

        bridge.io_mut().advance(5);
        bridge.io_mut().press(&PORT_A, 4);
        assert_eq!(block_on(bridge.poll_once()), Ok(true));
        assert!(bridge.report().is_pressed(0));
        assert_eq!(bridge.report().axis(Axis::X), AXIS_MAX);
        assert_eq!(bridge.output().sent.last(), Some(bridge.report()));
    }

    #[test]
    fn test_two_controllers_use_separate_ranges() {
        let mut board = MockBoard::new();
        board.press(&PORT_A, 6);
        board.press(&PORT_B, 3);
        let mut bridge = bridge(board);

        block_on(bridge.poll_once()).unwrap();
        let second = bridge.port(1).unwrap().controller().unwrap();
        assert!(matches!(second.kind(), ControllerKind::AtariPaddles(_)));
        assert_eq!(second.slot(), PortSlot::Second);

        bridge.io_mut().set_analog(&PORT_B, 9, 0);
        bridge.io_mut().set_analog(&PORT_B, 5, 1023);
        bridge.io_mut().advance(10);
        block_on(bridge.poll_once()).unwrap();

        let report = bridge.report();
        assert!(report.is_pressed(0));
        assert!(report.is_pressed(15));
        assert!(!report.is_pressed(1));
        assert_eq!(report.axis(Axis::Rx), AXIS_MIN);
        assert_eq!(report.axis(Axis::Ry), 32704);
        assert_eq!(report.axis(Axis::X), 0);
    }

    #[test]
    fn test_output_error_retries_next_cycle() {
        let mut bridge = bridge(MockBoard::new());
        bridge.output_mut().fail_next = Some(OutputError::NotReady);

        assert_eq!(
            block_on(bridge.poll_once()),
            Err(BridgeError::Output(OutputError::NotReady))
        );
        assert_eq!(block_on(bridge.poll_once()), Ok(true));
        assert_eq!(bridge.output().sent.len(), 1);
    }

    #[test]
    fn test_reset_releases_and_reprobes() {
        let mut board = MockBoard::new();
        board.press(&PORT_A, 6);
        let mut bridge = bridge(board);
        block_on(bridge.poll_once()).unwrap();
        bridge.io_mut().advance(10);
        block_on(bridge.poll_once()).unwrap();
        assert!(bridge.report().is_pressed(0));

        bridge.reset_all_ports();
        assert_eq!(*bridge.report(), JoystickReport::neutral());
        assert!(bridge.port(0).unwrap().controller().is_none());

        // Nothing held any more: the port stays open.
        bridge.io_mut().unpress(&PORT_A, 6);
        assert_eq!(block_on(bridge.poll_once()), Ok(true));
        assert!(bridge.port(0).unwrap().controller().is_none());
        assert_eq!(
            bridge.output().sent.last(),
            Some(&JoystickReport::neutral())
        );
    }
}
