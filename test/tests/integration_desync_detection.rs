/// INTEGRATION TESTS: two peers exchanging execution opinions
///
/// Each peer runs the same seeded simulation, closes a range every few
/// ticks and ships the wire copy of its opinion to the other peer.

use std::thread;

use concord_client::{
    DesyncCause, DesyncNoticeEvent, DesyncReportEvent, RandomStateCategory, SyncConfig,
};
use concord_test::TestPeer;

const RANGE: u32 = 5;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn exchange(a: &mut TestPeer, b: &mut TestPeer) {
    let from_a = a.run_range(RANGE);
    let from_b = b.run_range(RANGE);
    if let Some(opinion) = from_a {
        b.deliver(opinion);
    }
    if let Some(opinion) = from_b {
        a.deliver(opinion);
    }
}

#[test]
fn identical_peers_never_desync() {
    init_logger();
    let mut a = TestPeer::new(7).with_maps(&[0, 3]);
    let mut b = TestPeer::new(7).with_maps(&[0, 3]);

    for range in 0..20 {
        exchange(&mut a, &mut b);
        assert!(a.update().is_empty());
        assert!(b.update().is_empty());

        let start = range * RANGE;
        assert_eq!(a.session().coordinator().last_valid_tick(), Some(start));
        assert_eq!(b.session().coordinator().last_valid_tick(), Some(start));
    }

    assert!(!a.session().is_desynced());
    assert_eq!(a.session().coordinator().backlog_len(), 0);
}

#[test]
fn corrupted_peer_is_detected_at_first_divergent_trace() {
    init_logger();
    let mut a = TestPeer::new(11).with_maps(&[1]);
    let mut b = TestPeer::new(11).with_maps(&[1]);
    b.corrupt_world_from(23);

    let mut reports = Vec::new();
    for _ in 0..6 {
        exchange(&mut a, &mut b);
        let mut events = a.update();
        reports.extend(events.read::<DesyncReportEvent>());
        b.update();
    }

    assert_eq!(reports.len(), 1);
    let report = &reports[0];
    assert_eq!(report.local.start_tick(), 20);
    assert_eq!(report.last_valid_tick, Some(15));
    assert_eq!(report.diff_at, Some(3));
    match &report.cause {
        DesyncCause::Divergence(divergence) => {
            assert_eq!(divergence.category, RandomStateCategory::World);
            assert_eq!(divergence.index, 3);
        }
        cause => panic!("unexpected cause {:?}", cause),
    }
    assert!(!report.local_traces_around_diff(1).is_empty());

    assert!(a.session().is_desynced());
    assert!(b.session().is_desynced());
    assert!(a.run_range(RANGE).is_none());
}

#[test]
fn both_peers_emit_a_notice() {
    init_logger();
    let mut a = TestPeer::new(3);
    let mut b = TestPeer::new(3);
    a.corrupt_world_from(0);

    exchange(&mut a, &mut b);
    let notices_a: Vec<_> = a.update().read::<DesyncNoticeEvent>().collect();
    let notices_b: Vec<_> = b.update().read::<DesyncNoticeEvent>().collect();

    assert_eq!(notices_a.len(), 1);
    assert_eq!(notices_b.len(), 1);
    assert_eq!(notices_a[0].local_start_tick, 0);
    assert_eq!(notices_a[0].diff_at, Some(0));
    assert_eq!(notices_b[0].diff_at, Some(0));
}

#[test]
fn lagging_peer_catches_up_without_desync() {
    init_logger();
    let mut a = TestPeer::new(5);
    let mut b = TestPeer::new(5);

    for _ in 0..10 {
        a.run_range(RANGE);
    }
    a.update();
    assert_eq!(a.session().coordinator().backlog_len(), 10);

    for _ in 0..10 {
        let opinion = b.run_range(RANGE).unwrap();
        a.deliver(opinion);
    }
    assert!(a.update().is_empty());

    assert_eq!(a.session().coordinator().last_valid_tick(), Some(45));
    assert_eq!(a.session().coordinator().backlog_len(), 0);
}

#[test]
fn overflowing_backlog_drops_oldest_ranges() {
    init_logger();
    let mut a = TestPeer::new(9);
    let mut b = TestPeer::new(9);

    for _ in 0..35 {
        a.run_range(RANGE);
    }
    assert_eq!(a.session().coordinator().backlog_len(), 30);

    let mut from_b = Vec::new();
    for _ in 0..35 {
        from_b.push(b.run_range(RANGE).unwrap());
    }

    // the first five ranges were evicted on `a`, their counterparts are stale
    for opinion in from_b.drain(..5) {
        a.deliver(opinion);
    }
    a.update();
    assert_eq!(a.session().coordinator().last_valid_tick(), None);
    assert_eq!(a.session().coordinator().backlog_len(), 30);

    for opinion in from_b {
        a.deliver(opinion);
    }
    assert!(a.update().is_empty());
    assert_eq!(a.session().coordinator().last_valid_tick(), Some(34 * RANGE));
}

#[test]
fn opinions_delivered_from_network_thread() {
    init_logger();
    let mut a = TestPeer::new(21).with_maps(&[2, 4]);
    let mut b = TestPeer::new(21).with_maps(&[2, 4]);

    let mut outgoing = Vec::new();
    for _ in 0..8 {
        a.run_range(RANGE);
        outgoing.push(b.run_range(RANGE).unwrap());
    }

    let sender = a.session().remote_opinion_sender();
    let network = thread::spawn(move || {
        for opinion in outgoing {
            sender.send(opinion).unwrap();
        }
    });
    network.join().unwrap();

    assert!(a.update().is_empty());
    assert_eq!(a.session().coordinator().last_valid_tick(), Some(35));
}

#[test]
fn arbiter_state_follows_last_confirmation() {
    init_logger();
    let mut a = TestPeer::new(1);
    let mut b = TestPeer::new(1);

    a.session_mut().coordinator_mut().set_arbiter_playing(true);
    exchange(&mut a, &mut b);
    a.update();
    assert!(a.session().coordinator().arbiter_was_playing_on_last_valid_tick());

    a.session_mut().coordinator_mut().set_arbiter_playing(false);
    exchange(&mut a, &mut b);
    a.update();
    assert!(!a.session().coordinator().arbiter_was_playing_on_last_valid_tick());
}

#[test]
fn catch_up_is_recorded_and_cancelled_by_desync() {
    init_logger();
    let mut a = TestPeer::with_config(4, SyncConfig::default());
    let mut b = TestPeer::new(4);
    b.corrupt_world_from(2);

    a.session_mut().coordinator_mut().start_catch_up(100);
    exchange(&mut a, &mut b);
    let mut events = a.update();

    let report = events.read::<DesyncReportEvent>().next().unwrap();
    assert!(report.local.is_simulating());
    assert!(!a.session().coordinator().is_catching_up());
}
