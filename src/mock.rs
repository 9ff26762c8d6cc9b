//! Recording doubles for the hardware capabilities, shared by unit tests.

use core::cell::{Cell, RefCell};

use embedded_hal::delay::DelayNs;
use heapless::Vec;

use crate::bus::{DigitalBus, Line, Port};
use crate::scheduler::RefreshTimer;

/// Enough for a full scan pass plus a reset.
pub const LOG_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Set(Line),
    Clear(Line),
    Write(Port, u8, u8),
    DelayNs(u32),
}

pub type Log = RefCell<Vec<Op, LOG_CAPACITY>>;

pub fn new_log() -> Log {
    RefCell::new(Vec::new())
}

fn record(log: &Log, op: Op) {
    log.borrow_mut().push(op).expect("op log full");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusFault;

/// Logs every bus operation. Fails every operation after `budget` ops
/// when one is set.
pub struct RecordingBus<'a> {
    log: &'a Log,
    budget: Option<usize>,
}

impl<'a> RecordingBus<'a> {
    pub fn new(log: &'a Log) -> Self {
        Self { log, budget: None }
    }

    pub fn failing_after(log: &'a Log, ops: usize) -> Self {
        Self {
            log,
            budget: Some(ops),
        }
    }

    fn op(&mut self, op: Op) -> Result<(), BusFault> {
        match &mut self.budget {
            Some(0) => return Err(BusFault),
            Some(n) => *n -= 1,
            None => {}
        }
        record(self.log, op);
        Ok(())
    }
}

impl DigitalBus for RecordingBus<'_> {
    type Error = BusFault;

    fn set_line(&mut self, line: Line) -> Result<(), Self::Error> {
        self.op(Op::Set(line))
    }

    fn clear_line(&mut self, line: Line) -> Result<(), Self::Error> {
        self.op(Op::Clear(line))
    }

    fn write_masked(&mut self, port: Port, mask: u8, value: u8) -> Result<(), Self::Error> {
        self.op(Op::Write(port, mask, value))
    }
}

/// Logs each delay into the same stream as the bus.
pub struct RecordingDelay<'a> {
    log: &'a Log,
}

impl<'a> RecordingDelay<'a> {
    pub fn new(log: &'a Log) -> Self {
        Self { log }
    }
}

impl DelayNs for RecordingDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        record(self.log, Op::DelayNs(ns));
    }

    fn delay_us(&mut self, us: u32) {
        record(self.log, Op::DelayNs(us * 1_000));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerOp {
    Start(u32),
    Pause,
    Resume,
    Stop,
}

/// Timer double that records its calls and whether it is currently
/// allowed to fire.
pub struct RecordingTimer<'a> {
    pub calls: &'a RefCell<Vec<TimerOp, 16>>,
    pub armed: &'a Cell<bool>,
}

impl RefreshTimer for RecordingTimer<'_> {
    fn start(&mut self, period_us: u32) {
        self.calls.borrow_mut().push(TimerOp::Start(period_us)).ok();
        self.armed.set(true);
    }

    fn pause(&mut self) {
        self.calls.borrow_mut().push(TimerOp::Pause).ok();
        self.armed.set(false);
    }

    fn resume(&mut self) {
        self.calls.borrow_mut().push(TimerOp::Resume).ok();
        self.armed.set(true);
    }

    fn stop(&mut self) {
        self.calls.borrow_mut().push(TimerOp::Stop).ok();
        self.armed.set(false);
    }
}
