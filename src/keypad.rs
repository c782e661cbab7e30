//! The dispatch engine.
//!
//! Owns one state machine per physical key and decides *when* a resolved code
//! is put on the wire. The cycle is `Idle -> Pressed -> (Emitted) -> Idle`:
//!
//! - Instant keys send their short mapping on the press edge. If the hold
//!   crosses the long-press threshold, the long mapping follows as a second
//!   send and the key stops producing anything until released.
//! - Deferred keys send nothing until the release edge, then send the mapping
//!   of the finalized press kind exactly once.
//!
//! One emission is one tap on the wire: the code report followed by an
//! all-clear report, so a held key never floods the host with repeats.

use embassy_futures::select::{Either, select};
use embassy_futures::yield_now;
use embassy_time::{Instant, Timer};

use crate::channel::{KEY_EVENT_CHANNEL, KEYPAD_REPORT_CHANNEL};
use crate::config::KeypadConfig;
use crate::event::KeyEvent;
use crate::hid::{KeyboardReport, MediaKeyboardReport, Report};
use crate::input_device::Runnable;
use crate::mapping::{DispatchMode, KeyOutput, ProfileTables};
use crate::press::{self, PressKind};
use crate::profile::ProfileSelector;

/// Lifecycle phase of one key's press cycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum KeyPhase {
    /// No active press
    #[default]
    Idle,
    /// Button down, press kind not yet final
    Pressed,
    /// Long promotion handled, nothing more until the release edge
    Emitted,
}

/// Runtime state of one physical key, owned exclusively by the engine.
/// Reset to its idle baseline at the end of every press cycle.
#[derive(Debug, Copy, Clone, Default)]
struct KeyState {
    phase: KeyPhase,
    press_start: Option<Instant>,
    /// Profile latched on the press edge, stable for the whole cycle
    profile: u8,
    /// Dispatch policy latched on the press edge
    mode: DispatchMode,
    /// Press kind, once decided
    kind: Option<PressKind>,
    /// Whether this cycle has already produced an emission
    emitted: bool,
}

pub struct Keypad<'a, const NUM_PROFILES: usize, const NUM_KEYS: usize, const NUM_ROWS: usize> {
    tables: &'a ProfileTables<'a, NUM_PROFILES, NUM_KEYS, NUM_ROWS>,
    profiles: &'a ProfileSelector<'a, NUM_PROFILES>,
    behavior: KeypadConfig,
    keys: [KeyState; NUM_KEYS],
}

impl<const NUM_PROFILES: usize, const NUM_KEYS: usize, const NUM_ROWS: usize> Runnable
    for Keypad<'_, NUM_PROFILES, NUM_KEYS, NUM_ROWS>
{
    /// Main dispatch task: waits for the next key edge or the earliest
    /// long-press deadline of a held key, whichever comes first.
    async fn run(&mut self) {
        loop {
            match self.next_promotion_deadline() {
                Some(deadline) => {
                    match select(KEY_EVENT_CHANNEL.receive(), Timer::at(deadline)).await {
                        Either::First(event) => self.process_event(event, Instant::now()).await,
                        Either::Second(_) => self.process_promotions(Instant::now()).await,
                    }
                }
                None => {
                    let event = KEY_EVENT_CHANNEL.receive().await;
                    self.process_event(event, Instant::now()).await;
                }
            }
        }
    }
}

impl<'a, const NUM_PROFILES: usize, const NUM_KEYS: usize, const NUM_ROWS: usize>
    Keypad<'a, NUM_PROFILES, NUM_KEYS, NUM_ROWS>
{
    pub fn new(
        tables: &'a ProfileTables<'a, NUM_PROFILES, NUM_KEYS, NUM_ROWS>,
        profiles: &'a ProfileSelector<'a, NUM_PROFILES>,
        behavior: KeypadConfig,
    ) -> Self {
        Self {
            tables,
            profiles,
            behavior,
            keys: [KeyState::default(); NUM_KEYS],
        }
    }

    /// Earliest instant at which a held, still-unclassified key crosses the
    /// long-press threshold. `None` when no key is waiting on the clock.
    fn next_promotion_deadline(&self) -> Option<Instant> {
        self.keys
            .iter()
            .filter(|k| k.phase == KeyPhase::Pressed && k.kind.is_none())
            .filter_map(|k| k.press_start)
            .map(|start| press::promotion_deadline(start, self.behavior.long_press_threshold))
            .min()
    }

    async fn process_event(&mut self, event: KeyEvent, now: Instant) {
        if (event.key as usize) >= NUM_KEYS {
            warn!("Dropping key event out of range: {:?}", event);
            return;
        }
        // Apply due promotions before the edge, so a release arriving at or
        // after the threshold still sees the long press first.
        self.process_promotions(now).await;

        if event.pressed {
            self.on_press(event.key, now).await;
        } else {
            self.on_release(event.key, now).await;
        }
    }

    async fn on_press(&mut self, key: u8, now: Instant) {
        let idx = key as usize;
        if self.keys[idx].phase != KeyPhase::Idle {
            warn!("Press edge while key {} is mid-cycle, ignored", key);
            return;
        }

        // Latch profile and policy for the whole cycle; the selector may only
        // change between cycles.
        let profile = self.profiles.get();
        let mode = self.tables.dispatch_mode(profile, key);
        self.keys[idx] = KeyState {
            phase: KeyPhase::Pressed,
            press_start: Some(now),
            profile,
            mode,
            kind: None,
            emitted: false,
        };
        debug!("Key {} down, profile {}, {:?} dispatch", key, profile, mode);

        if mode == DispatchMode::Instant {
            let output = self.tables.resolve(profile, PressKind::Short, key);
            let sent = self.emit(output).await;
            self.keys[idx].emitted = sent;
        }
    }

    async fn on_release(&mut self, key: u8, now: Instant) {
        let idx = key as usize;
        let state = self.keys[idx];
        match state.phase {
            KeyPhase::Idle => {
                warn!("Release edge while key {} is idle, ignored", key);
            }
            KeyPhase::Emitted => {
                debug!("Key {} up, cycle complete", key);
                self.keys[idx] = KeyState::default();
            }
            KeyPhase::Pressed => {
                let start = state.press_start.unwrap_or(now);
                let kind = state
                    .kind
                    .unwrap_or_else(|| press::classify(start, now, self.behavior.long_press_threshold));
                match state.mode {
                    DispatchMode::Deferred => {
                        let output = self.tables.resolve(state.profile, kind, key);
                        debug!("Key {} up, deferred {:?} press resolved {:?}", key, kind, output);
                        if !state.emitted {
                            self.emit(output).await;
                        }
                    }
                    DispatchMode::Instant => {
                        // The short mapping already went out on the press
                        // edge; a long hold would have been handled at
                        // promotion time.
                        debug!("Key {} up after instant short", key);
                    }
                }
                self.keys[idx] = KeyState::default();
            }
        }
    }

    /// Promote every held key whose threshold has passed. For Instant keys
    /// this also fires the long mapping while the key is still held.
    async fn process_promotions(&mut self, now: Instant) {
        let threshold = self.behavior.long_press_threshold;
        for idx in 0..NUM_KEYS {
            let state = self.keys[idx];
            if state.phase != KeyPhase::Pressed || state.kind.is_some() {
                continue;
            }
            let Some(start) = state.press_start else {
                continue;
            };
            if press::held_for(start, now) < threshold {
                continue;
            }

            self.keys[idx].kind = Some(PressKind::Long);
            match state.mode {
                DispatchMode::Instant => {
                    let output = self.tables.resolve(state.profile, PressKind::Long, idx as u8);
                    debug!("Key {} held past threshold, long mapping {:?}", idx, output);
                    let sent = self.emit(output).await;
                    self.keys[idx].emitted = state.emitted || sent;
                    self.keys[idx].phase = KeyPhase::Emitted;
                }
                DispatchMode::Deferred => {
                    debug!("Key {} held past threshold, deferred until release", idx);
                }
            }
        }
    }

    /// Put one resolved code on the wire as a tap: the code report followed
    /// by an all-clear report. Returns whether anything was sent.
    async fn emit(&self, output: KeyOutput) -> bool {
        match output {
            KeyOutput::Empty => false,
            KeyOutput::Normal(code) => {
                let report = KeyboardReport {
                    keycodes: [code as u8, 0, 0, 0, 0, 0],
                    ..KeyboardReport::default()
                };
                self.send_report(Report::KeyboardReport(report)).await;
                self.send_report(Report::KeyboardReport(KeyboardReport::default()))
                    .await;
                true
            }
            KeyOutput::Media(code) => {
                self.send_report(Report::MediaKeyboardReport(MediaKeyboardReport {
                    usage_id: code.usage_id(),
                }))
                .await;
                self.send_report(Report::MediaKeyboardReport(MediaKeyboardReport {
                    usage_id: 0,
                }))
                .await;
                true
            }
        }
    }

    async fn send_report(&self, report: Report) {
        KEYPAD_REPORT_CHANNEL.sender().send(report).await;
        // Yield once after sending the report to channel
        yield_now().await;
    }
}
