// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

mod common;

use armbridge::exchange::{Exchange, FrameKind};
use armbridge::hw::{BusRole, Signal, SyncBus};
use armbridge::protocol::messages::*;
use armbridge::state::BridgeState;
use common::{new_log, Event, MockBus, MockPin};

fn slave_bus(log: &common::Log) -> MockBus {
    let mut bus = MockBus::new(log);
    bus.configure(BusRole::Slave);
    bus
}

#[test]
fn nothing_happens_without_sentinel() {
    let log = new_log();
    let mut bus = slave_bus(&log);
    let mut exchange = Exchange::new(Signal::active_high(MockPin::new("cmd", false, &log)));
    let mut state = BridgeState::new(false);
    state.queue.try_append(Command::IDLE).unwrap();

    bus.register = 0x5B;
    assert_eq!(exchange.poll(&mut bus, &mut state), None);
    assert!(bus.sent.is_empty());
    assert_eq!(bus.register, 0x5B);
    assert_eq!(state.queue.len(), 1);
}

#[test]
fn queued_command_is_framed_unmodified() {
    let log = new_log();
    let mut bus = slave_bus(&log);
    let strobe = MockPin::new("cmd", false, &log);
    let level = strobe.handle();
    let mut exchange = Exchange::new(Signal::active_high(strobe));
    let mut state = BridgeState::new(false);
    let cmd = Command::new(0xDEAD_BEEF, 0x0102_0304, 0xA5A5_5A5A, 0xE0);
    state.queue.try_append(cmd).unwrap();

    bus.register = SYNC_SENTINEL;
    assert_eq!(
        exchange.poll(&mut bus, &mut state),
        Some(FrameKind::Command)
    );

    assert_eq!(bus.register, 0x00);
    assert_eq!(bus.sent.len(), FRAME_LEN);
    assert_eq!(bus.sent[0], FRAME_HEADER);
    assert_eq!(&bus.sent[1..14], cmd.as_bytes());
    assert_eq!(&bus.sent[14..], &FRAME_TRAILER);
    assert!(state.queue.is_empty());

    // Strobe high for the frame, low afterwards.
    let strobe_events: Vec<_> = log
        .borrow()
        .iter()
        .filter(|e| matches!(e, Event::Pin("cmd", _)))
        .cloned()
        .collect();
    assert_eq!(
        strobe_events,
        [
            Event::Pin("cmd", false),
            Event::Pin("cmd", true),
            Event::Pin("cmd", false)
        ]
    );
    assert!(!level.get());
    assert_eq!(bus.discards, 1);
}

#[test]
fn empty_queue_sends_filler() {
    let log = new_log();
    let mut bus = slave_bus(&log);
    let mut exchange = Exchange::new(Signal::active_high(MockPin::new("cmd", false, &log)));
    let mut state = BridgeState::new(false);

    bus.register = SYNC_SENTINEL;
    assert_eq!(exchange.poll(&mut bus, &mut state), Some(FrameKind::Filler));
    assert_eq!(bus.sent.as_slice(), Frame::filler().as_bytes());
    assert_eq!(&bus.sent[1..5], &[0x02, 0x42, 0xF0, 0x00]);
}

#[test]
fn deferred_queue_is_held_until_released() {
    let log = new_log();
    let mut bus = slave_bus(&log);
    let mut exchange = Exchange::new(Signal::active_high(MockPin::new("cmd", false, &log)));
    let mut state = BridgeState::new(true);
    let cmd = Command::new(1, 2, 3, 0x40);
    state.queue.try_append(cmd).unwrap();

    bus.register = SYNC_SENTINEL;
    assert_eq!(exchange.poll(&mut bus, &mut state), Some(FrameKind::Filler));
    assert_eq!(state.queue.len(), 1);

    state.deferred = false;
    bus.sent.clear();
    bus.register = SYNC_SENTINEL;
    assert_eq!(
        exchange.poll(&mut bus, &mut state),
        Some(FrameKind::Command)
    );
    assert_eq!(&bus.sent[1..14], cmd.as_bytes());
}

#[test]
fn frames_follow_queue_order() {
    let log = new_log();
    let mut bus = slave_bus(&log);
    let mut exchange = Exchange::new(Signal::active_high(MockPin::new("cmd", false, &log)));
    let mut state = BridgeState::new(false);
    for n in 1..=3u32 {
        state.queue.try_append(Command::new(n, n, n, 0)).unwrap();
    }

    for n in 1..=3u32 {
        bus.sent.clear();
        bus.register = SYNC_SENTINEL;
        exchange.poll(&mut bus, &mut state);
        let frame = Frame::new(&Command::new(n, n, n, 0));
        assert_eq!(bus.sent.as_slice(), frame.as_bytes());
    }

    bus.sent.clear();
    bus.register = SYNC_SENTINEL;
    assert_eq!(exchange.poll(&mut bus, &mut state), Some(FrameKind::Filler));
}
