//! Key-event normalizer — turns raw key transitions from one source into
//! `pressed` / `short-pressed` / `released` / `held` / `long-pressed` events.
//!
//! Each source gets two tasks sharing one [`KeyEventNormalizer`]:
//!
//! - a **reader** task pulling frames from a [`FrameReader`], decoding them
//!   with a [`FrameDecoder`] and applying the resulting transitions;
//! - a **timer** task that sleeps until the nearest long-press or repeat
//!   deadline and is woken early whenever the press state changes.
//!
//! Both hold the same async mutex while they mutate state *and* while they
//! emit, so events of one source are delivered in the order they were
//! derived. Nothing is shared between sources.

use std::sync::Arc;
use std::time::Duration;

use nexus_domain::key_event::{KeyState, Modifier, ModifierSet, SourceRef};
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::ports::{EventSink, FrameDecoder, FrameReader, RawInput, RawKey};

/// Synthetic auto-repeat cadence while a key stays down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatTiming {
    /// Time from press to the first `held`.
    pub delay: Duration,
    /// Time between subsequent `held` events.
    pub interval: Duration,
}

/// Timing profile of one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub long_press: Duration,
    /// `None` for sources that report their own auto-repeat.
    pub repeat: Option<RepeatTiming>,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            long_press: Duration::from_secs(1),
            repeat: None,
        }
    }
}

#[derive(Debug)]
struct Press {
    key: String,
    modifier: Option<Modifier>,
    started: Instant,
    long_press_sent: bool,
    next_repeat: Option<Instant>,
}

#[derive(Debug, Default)]
struct State {
    /// Keys currently down, in press order.
    pressed: Vec<Press>,
    modifiers: ModifierSet,
    ended: bool,
}

impl Press {
    /// When the long press fires; `None` once sent or when out of range.
    fn long_press_at(&self, long_press: Duration) -> Option<Instant> {
        if self.long_press_sent {
            return None;
        }
        self.started.checked_add(long_press)
    }
}

impl State {
    fn next_deadline(&self, long_press: Duration) -> Option<Instant> {
        self.pressed
            .iter()
            .flat_map(|press| [press.long_press_at(long_press), press.next_repeat])
            .flatten()
            .min()
    }

    fn held_keys(&self) -> Vec<RawKey> {
        self.pressed
            .iter()
            .map(|press| RawKey::new(press.key.clone()).with_modifier(press.modifier))
            .collect()
    }
}

/// Per-source press state machine.
pub struct KeyEventNormalizer<D> {
    source: SourceRef,
    decoder: D,
    timing: Timing,
    sink: Arc<dyn EventSink>,
    state: Mutex<State>,
    wake: Notify,
}

/// Handles of the two tasks serving one source.
#[derive(Debug)]
pub struct NormalizerTasks {
    pub reader: JoinHandle<()>,
    pub timer: JoinHandle<()>,
}

#[cfg(test)]
impl NormalizerTasks {
    /// Wait for both tasks to finish (after end of stream).
    pub async fn join(self) {
        let _ = self.reader.await;
        let _ = self.timer.await;
    }
}

impl<D: FrameDecoder> KeyEventNormalizer<D> {
    #[must_use]
    pub fn new(source: SourceRef, decoder: D, timing: Timing, sink: Arc<dyn EventSink>) -> Self {
        Self {
            source,
            decoder,
            timing,
            sink,
            state: Mutex::new(State::default()),
            wake: Notify::new(),
        }
    }

    /// Start the reader and timer tasks. The reader owns `reader` and drops it
    /// at end of stream, which also releases the underlying handle.
    pub fn spawn<R: FrameReader>(self, reader: R) -> NormalizerTasks {
        let this = Arc::new(self);
        let timer = tokio::spawn(Arc::clone(&this).run_timer());
        let reader = tokio::spawn(this.run_reader(reader));
        NormalizerTasks { reader, timer }
    }

    async fn run_reader<R: FrameReader>(self: Arc<Self>, mut reader: R) {
        tracing::info!(source = %self.source, "source connected");
        loop {
            match reader.next_frame().await {
                Ok(Some(frame)) => {
                    if let Some(input) = self.decoder.decode(&frame) {
                        self.apply(input, Instant::now()).await;
                    }
                }
                Ok(None) => {
                    tracing::info!(source = %self.source, "end of stream");
                    break;
                }
                Err(err) => {
                    tracing::warn!(source = %self.source, error = %err, "read failed");
                    break;
                }
            }
        }
        drop(reader);
        self.state.lock().await.ended = true;
        self.wake.notify_one();
    }

    async fn run_timer(self: Arc<Self>) {
        loop {
            let deadline = {
                let mut state = self.state.lock().await;
                if state.ended {
                    break;
                }
                self.fire_due(&mut state, Instant::now()).await;
                state.next_deadline(self.timing.long_press)
            };
            match deadline {
                Some(deadline) => {
                    tokio::select! {
                        () = self.wake.notified() => {}
                        () = tokio::time::sleep_until(deadline) => {}
                    }
                }
                None => self.wake.notified().await,
            }
        }
        tracing::debug!(source = %self.source, "timer stopped");
    }

    async fn emit(&self, key: &str, state: KeyState, modifiers: ModifierSet) {
        self.sink
            .emit(self.source.key_event(key, state, modifiers))
            .await;
    }

    /// Emit `held` and `long-pressed` events that are due at `now`.
    async fn fire_due(&self, state: &mut State, now: Instant) {
        let modifiers = state.modifiers;
        for press in &mut state.pressed {
            if let (Some(due), Some(repeat)) = (press.next_repeat, self.timing.repeat)
                && now >= due
            {
                self.emit(&press.key, KeyState::Held, modifiers).await;
                press.next_repeat = due.checked_add(repeat.interval);
            }
            if press
                .long_press_at(self.timing.long_press)
                .is_some_and(|due| now >= due)
            {
                press.long_press_sent = true;
                self.emit(&press.key, KeyState::LongPressed, modifiers).await;
            }
        }
    }

    async fn apply(&self, input: RawInput, now: Instant) {
        let mut state = self.state.lock().await;
        match input {
            RawInput::Down(key) => self.press(&mut state, key, now).await,
            RawInput::Up(key) => {
                self.release(&mut state, &key, now).await;
                self.wake.notify_one();
            }
            RawInput::UpAll => {
                for key in &state.held_keys() {
                    self.release(&mut state, key, now).await;
                }
                self.wake.notify_one();
            }
            RawInput::Replace(key) => {
                for held in &state.held_keys() {
                    if held.name != key.name {
                        self.release(&mut state, held, now).await;
                    }
                }
                self.press(&mut state, key, now).await;
                self.wake.notify_one();
            }
            RawInput::Repeat(key) => {
                self.emit(&key.name, KeyState::Held, state.modifiers).await;
            }
            RawInput::Unknown(key) => {
                self.emit(&key.name, KeyState::Unknown, state.modifiers).await;
            }
            RawInput::Auxiliary(detail) => {
                self.sink.emit(self.source.auxiliary(&detail)).await;
            }
        }
    }

    async fn press(&self, state: &mut State, key: RawKey, now: Instant) {
        if let Some(modifier) = key.modifier {
            state.modifiers.insert(modifier);
        }
        if state.pressed.iter().any(|press| press.key == key.name) {
            return;
        }
        self.emit(&key.name, KeyState::Pressed, state.modifiers).await;
        state.pressed.push(Press {
            key: key.name,
            modifier: key.modifier,
            started: now,
            long_press_sent: false,
            next_repeat: self
                .timing
                .repeat
                .and_then(|repeat| now.checked_add(repeat.delay)),
        });
        self.wake.notify_one();
    }

    async fn release(&self, state: &mut State, key: &RawKey, now: Instant) {
        let press = state
            .pressed
            .iter()
            .position(|press| press.key == key.name)
            .map(|index| state.pressed.remove(index));
        if let Some(modifier) = key
            .modifier
            .or_else(|| press.as_ref().and_then(|press| press.modifier))
        {
            state.modifiers.remove(modifier);
        }
        if let Some(press) = press
            && now.duration_since(press.started) < self.timing.long_press
        {
            self.emit(&key.name, KeyState::ShortPressed, state.modifiers).await;
        }
        self.emit(&key.name, KeyState::Released, state.modifiers).await;
    }
}
