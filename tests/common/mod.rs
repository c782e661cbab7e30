
use std::sync::{Mutex, MutexGuard};

use embassy_futures::join::join;
use embassy_futures::select::{Either, select};
use embassy_time::{Duration, Timer};
use ridepad::channel::{KEY_EVENT_CHANNEL, KEYPAD_REPORT_CHANNEL};
use ridepad::config::KeypadConfig;
use ridepad::event::KeyEvent;
use ridepad::hid::Report;
use ridepad::input_device::Runnable;
use ridepad::keycode::KeyCode as K;
use ridepad::keycode::MediaKeyCode as M;
use ridepad::keycode::{KeyCode, MediaKeyCode};
use ridepad::keypad::Keypad;
use ridepad::mapping::{DispatchMode, ProfileTables};
use ridepad::profile::{DeviceIdentity, ProfileSelector};

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

pub const NUM_PROFILES: usize = 8;
pub const NUM_KEYS: usize = 8;
pub const NUM_ROWS: usize = 2 * NUM_PROFILES;

// The static channels and the mock clock are shared per test binary,
// so the sequence tests must not interleave.
static TEST_LOCK: Mutex<()> = Mutex::new(());

pub fn lock() -> MutexGuard<'static, ()> {
    TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

#[rustfmt::skip]
static NORMAL: [[KeyCode; NUM_KEYS]; NUM_ROWS] = [
    // Short press rows, one per profile
    [K::Equal, K::Minus, K::R,     K::C,    K::Up, K::Left, K::Right, K::Down],
    [K::No,    K::No,    K::No,    K::No,   K::Up, K::Left, K::Right, K::Down],
    [K::No,    K::No,    K::No,    K::No,   K::Up, K::Left, K::Right, K::Down],
    [K::F6,    K::F7,    K::Enter, K::F5,   K::Up, K::Left, K::Right, K::Down],
    [K::F1,    K::F2,    K::F3,    K::F4,   K::F5, K::F6,   K::F7,    K::F8],
    [K::Equal, K::Minus, K::N,     K::C,    K::Up, K::Left, K::Right, K::Down],
    [K::F1,    K::F2,    K::F3,    K::F4,   K::F5, K::F6,   K::F7,    K::F8],
    [K::Up,    K::Left,  K::Right, K::Down, K::F6, K::F7,   K::Enter, K::F5],
    // Long press rows, one per profile
    [K::No,    K::No,    K::No,    K::No,   K::Up,  K::Left, K::Right, K::Down],
    [K::No,    K::No,    K::No,    K::No,   K::No,  K::No,   K::No,    K::No],
    [K::No,    K::No,    K::No,    K::No,   K::No,  K::No,   K::No,    K::No],
    [K::No,    K::No,    K::No,    K::No,   K::No,  K::No,   K::No,    K::No],
    [K::No,    K::No,    K::No,    K::No,   K::No,  K::No,   K::No,    K::No],
    [K::No,    K::No,    K::D,     K::No,   K::No,  K::No,   K::No,    K::No],
    [K::F9,    K::F10,   K::F11,   K::No,   K::F12, K::No,   K::No,    K::No],
    [K::No,    K::No,    K::No,    K::No,   K::No,  K::No,   K::No,    K::No],
];

#[rustfmt::skip]
static MEDIA: [[MediaKeyCode; NUM_KEYS]; NUM_ROWS] = [
    // Short press rows
    [M::Zero,      M::Zero,      M::Zero,       M::Zero,       M::Zero, M::Zero,      M::Zero,      M::Zero],
    [M::PrevTrack, M::NextTrack, M::VolumeDown, M::VolumeUp,   M::Zero, M::Zero,      M::Zero,      M::Zero],
    [M::NextTrack, M::PrevTrack, M::VolumeUp,   M::VolumeDown, M::Zero, M::Zero,      M::Zero,      M::Zero],
    [M::Zero,      M::Zero,      M::Zero,       M::Zero,       M::Zero, M::Zero,      M::Zero,      M::Zero],
    [M::Zero,      M::Zero,      M::Zero,       M::Zero,       M::Zero, M::Zero,      M::Zero,      M::Zero],
    [M::Zero,      M::Zero,      M::Zero,       M::Zero,       M::Zero, M::Zero,      M::Zero,      M::Zero],
    [M::Zero,      M::Zero,      M::Zero,       M::Zero,       M::Zero, M::PrevTrack, M::NextTrack, M::PlayPause],
    [M::Zero,      M::Zero,      M::Zero,       M::Zero,       M::Zero, M::Zero,      M::Zero,      M::Zero],
    // Long press rows
    [M::Zero,      M::Zero,      M::Zero,       M::Zero,       M::Zero, M::Zero,      M::Zero,      M::Zero],
    [M::Zero,      M::Zero,      M::Zero,       M::Zero,       M::Zero, M::Zero,      M::Zero,      M::Zero],
    [M::PlayPause, M::Stop,      M::Zero,       M::Zero,       M::Zero, M::Zero,      M::Zero,      M::Zero],
    [M::Zero,      M::Zero,      M::Zero,       M::Zero,       M::Zero, M::Zero,      M::Zero,      M::Zero],
    [M::Zero,      M::Zero,      M::Zero,       M::Zero,       M::Zero, M::Zero,      M::Zero,      M::Zero],
    [M::Zero,      M::Zero,      M::Zero,       M::Zero,       M::Zero, M::Zero,      M::Zero,      M::Zero],
    [M::Zero,      M::Zero,      M::Zero,       M::Zero,       M::Zero, M::Zero,      M::Zero,      M::Zero],
    [M::Zero,      M::Zero,      M::Zero,       M::Zero,       M::Zero, M::Zero,      M::Zero,      M::Zero],
];

const I: DispatchMode = DispatchMode::Instant;
const DF: DispatchMode = DispatchMode::Deferred;

#[rustfmt::skip]
static DISPATCH: [[DispatchMode; NUM_KEYS]; NUM_PROFILES] = [
    [I,  I,  I,  I,  I,  I,  I,  I],
    [I,  I,  I,  I,  I,  I,  I,  I],
    [DF, DF, I,  I,  I,  I,  I,  I],
    [I,  I,  I,  I,  I,  I,  I,  I],
    [I,  I,  I,  I,  I,  I,  I,  I],
    [I,  I,  I,  I,  I,  I,  I,  I],
    [DF, DF, DF, DF, DF, DF, DF, DF],
    [I,  I,  I,  I,  I,  I,  I,  I],
];

static IDENTITIES: [DeviceIdentity; NUM_PROFILES] = [
    DeviceIdentity { name: "RCntrl Keypad",   manufacturer: "ridepad", vid: 0x05AC, pid: 0x0220 },
    DeviceIdentity { name: "RCntrl Keypad 2", manufacturer: "ridepad", vid: 0x05AC, pid: 0x0221 },
    DeviceIdentity { name: "Media Remote",    manufacturer: "ridepad", vid: 0x05AC, pid: 0x0222 },
    DeviceIdentity { name: "DMD2 Remote",     manufacturer: "ridepad", vid: 0x05AC, pid: 0x0223 },
    DeviceIdentity { name: "Function Pad",    manufacturer: "ridepad", vid: 0x05AC, pid: 0x0224 },
    DeviceIdentity { name: "Nav Keypad",      manufacturer: "ridepad", vid: 0x05AC, pid: 0x0225 },
    DeviceIdentity { name: "MyRide Remote",   manufacturer: "ridepad", vid: 0x05AC, pid: 0x0226 },
    DeviceIdentity { name: "DMD2 Remote Inv", manufacturer: "ridepad", vid: 0x05AC, pid: 0x0227 },
];

pub fn test_tables() -> ProfileTables<'static, NUM_PROFILES, NUM_KEYS, NUM_ROWS> {
    ProfileTables::new(&NORMAL, &MEDIA, &DISPATCH).expect("test tables must validate")
}

pub fn test_selector(initial: u8) -> ProfileSelector<'static, NUM_PROFILES> {
    ProfileSelector::new(&IDENTITIES, initial).expect("initial profile must be in range")
}

pub fn test_config() -> KeypadConfig {
    KeypadConfig {
        long_press_threshold: Duration::from_millis(600),
    }
}

#[derive(Debug, Clone)]
pub struct TestKeyPress {
    pub key: u8,
    pub pressed: bool,
    /// Delay before this key event, in milliseconds
    pub delay: u64,
}

pub fn press(key: u8, delay: u64) -> TestKeyPress {
    TestKeyPress {
        key,
        pressed: true,
        delay,
    }
}

pub fn release(key: u8, delay: u64) -> TestKeyPress {
    TestKeyPress {
        key,
        pressed: false,
        delay,
    }
}

/// Flattened view of a report for comparison in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedReport {
    Key(u8),
    KeyClear,
    Media(u16),
    MediaClear,
}

impl From<Report> for ExpectedReport {
    fn from(report: Report) -> Self {
        match report {
            Report::KeyboardReport(r) if r.keycodes[0] == 0 => ExpectedReport::KeyClear,
            Report::KeyboardReport(r) => ExpectedReport::Key(r.keycodes[0]),
            Report::MediaKeyboardReport(r) if r.usage_id == 0 => ExpectedReport::MediaClear,
            Report::MediaKeyboardReport(r) => ExpectedReport::Media(r.usage_id),
        }
    }
}

/// One emission of a normal code: the code report plus the all-clear report.
pub fn normal_tap(code: KeyCode) -> Vec<ExpectedReport> {
    vec![ExpectedReport::Key(code as u8), ExpectedReport::KeyClear]
}

/// One emission of a media code: the usage report plus the all-clear report.
pub fn media_tap(code: MediaKeyCode) -> Vec<ExpectedReport> {
    vec![
        ExpectedReport::Media(code.usage_id()),
        ExpectedReport::MediaClear,
    ]
}

/// Receive the next report, panicking if none arrives in mock time.
pub async fn recv_report() -> ExpectedReport {
    match select(
        Timer::after(Duration::from_secs(5)),
        KEYPAD_REPORT_CHANNEL.receive(),
    )
    .await
    {
        Either::First(_) => panic!("timed out waiting for a report"),
        Either::Second(report) => ExpectedReport::from(report),
    }
}

/// Run the keypad against a key sequence and verify the exact report stream.
///
/// After the expected reports are received, the harness keeps listening for a
/// while to catch double-fires and key repeats.
pub async fn run_key_sequence_test<const P: usize, const K: usize, const R: usize>(
    keypad: &mut Keypad<'_, P, { K }, R>,
    sequence: &[TestKeyPress],
    expected: &[ExpectedReport],
) {
    KEY_EVENT_CHANNEL.clear();
    KEYPAD_REPORT_CHANNEL.clear();

    let send = async {
        for step in sequence {
            Timer::after(Duration::from_millis(step.delay)).await;
            KEY_EVENT_CHANNEL
                .send(KeyEvent {
                    key: step.key,
                    pressed: step.pressed,
                })
                .await;
        }
    };

    let verify = async {
        for (i, want) in expected.iter().enumerate() {
            match select(
                Timer::after(Duration::from_secs(5)),
                KEYPAD_REPORT_CHANNEL.receive(),
            )
            .await
            {
                Either::First(_) => panic!("timed out waiting for report #{i}, expected {want:?}"),
                Either::Second(report) => {
                    let got = ExpectedReport::from(report);
                    assert_eq!(*want, got, "report #{i} mismatch");
                }
            }
        }
        // Nothing may trail the expected sequence
        if let Either::Second(report) = select(
            Timer::after(Duration::from_secs(2)),
            KEYPAD_REPORT_CHANNEL.receive(),
        )
        .await
        {
            panic!("unexpected extra report: {:?}", ExpectedReport::from(report));
        }
    };

    match select(keypad.run(), join(send, verify)).await {
        Either::First(_) => unreachable!("keypad run loop never returns"),
        Either::Second(_) => (),
    }
}
