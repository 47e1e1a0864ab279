use crate::prelude::{CoreError, CoreResult};
use crate::timer::cue::{Cue, CuePlayer};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Lifecycle of a par countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPhase {
    Idle,
    Armed,
    Fired,
    Cancelled,
}

struct TimerState {
    phase: TimerPhase,
    generation: u64,
}

/// Single-shot countdown that plays the par cue and runs a callback.
///
/// Starting while armed replaces the pending countdown. Requires a tokio runtime.
pub struct ParTimer {
    cues: Arc<dyn CuePlayer>,
    state: Arc<Mutex<TimerState>>,
    task: Option<JoinHandle<()>>,
}

impl ParTimer {
    pub fn new(cues: Arc<dyn CuePlayer>) -> Self {
        Self {
            cues,
            state: Arc::new(Mutex::new(TimerState {
                phase: TimerPhase::Idle,
                generation: 0,
            })),
            task: None,
        }
    }

    pub fn phase(&self) -> TimerPhase {
        self.state
            .lock()
            .map(|state| state.phase)
            .unwrap_or(TimerPhase::Idle)
    }

    pub fn start_par_timer<F>(&mut self, par_time_s: f64, on_par_reached: F) -> CoreResult<()>
    where
        F: FnOnce() + Send + 'static,
    {
        if !(par_time_s.is_finite() && par_time_s >= 0.0) {
            return Err(CoreError::InvalidConfig(format!(
                "par time must be a non-negative number of seconds, got {}",
                par_time_s
            )));
        }
        let delay = Duration::try_from_secs_f64(par_time_s)
            .map_err(|err| CoreError::InvalidConfig(err.to_string()))?;
        let runtime = Handle::try_current()
            .map_err(|err| CoreError::TimerUnavailable(err.to_string()))?;

        self.stop_par_timer();
        let generation = {
            let mut state = self.lock_state()?;
            state.generation += 1;
            state.phase = TimerPhase::Armed;
            state.generation
        };

        let state = Arc::clone(&self.state);
        let cues = Arc::clone(&self.cues);
        self.task = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let Ok(mut guard) = state.lock() else {
                    return;
                };
                if guard.generation != generation || guard.phase != TimerPhase::Armed {
                    return;
                }
                guard.phase = TimerPhase::Fired;
            }
            play_or_warn(cues.as_ref(), Cue::Par);
            on_par_reached();
        }));
        info!("par timer armed for {:.2}s", par_time_s);
        Ok(())
    }

    /// Cancels a pending countdown. Safe to call at any time.
    pub fn stop_par_timer(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            state.generation += 1;
            if state.phase == TimerPhase::Armed {
                state.phase = TimerPhase::Cancelled;
                info!("par timer cancelled");
            }
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn play_start_beep(&self) {
        play_or_warn(self.cues.as_ref(), Cue::Start);
    }

    pub fn play_par_beep(&self) {
        play_or_warn(self.cues.as_ref(), Cue::Par);
    }

    pub fn cleanup(&mut self) {
        self.stop_par_timer();
        self.cues.release();
    }

    fn lock_state(&self) -> CoreResult<std::sync::MutexGuard<'_, TimerState>> {
        self.state
            .lock()
            .map_err(|_| CoreError::TimerUnavailable("timer state poisoned".into()))
    }
}

impl Drop for ParTimer {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

fn play_or_warn(cues: &dyn CuePlayer, cue: Cue) {
    if let Err(err) = cues.play(cue) {
        warn!("{:?} cue failed: {}", cue, err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::cue::LogCuePlayer;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct CountingPlayer {
        played: AtomicUsize,
        released: AtomicBool,
        fail: bool,
    }

    impl CountingPlayer {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                played: AtomicUsize::new(0),
                released: AtomicBool::new(false),
                fail,
            })
        }
    }

    impl CuePlayer for CountingPlayer {
        fn play(&self, _cue: Cue) -> CoreResult<()> {
            self.played.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(CoreError::Cue("no audio device".into()))
            } else {
                Ok(())
            }
        }

        fn release(&self) {
            self.released.store(true, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn par_callback_fires_once_after_delay() {
        let player = CountingPlayer::new(false);
        let mut timer = ParTimer::new(player.clone());
        let (tx, rx) = tokio::sync::oneshot::channel();

        timer
            .start_par_timer(2.0, move || {
                let _ = tx.send(());
            })
            .unwrap();
        assert_eq!(timer.phase(), TimerPhase::Armed);

        rx.await.unwrap();
        assert_eq!(timer.phase(), TimerPhase::Fired);
        assert_eq!(player.played.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stopped_timer_never_fires() {
        let mut timer = ParTimer::new(Arc::new(LogCuePlayer));
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();

        timer
            .start_par_timer(1.0, move || flag.store(true, Ordering::SeqCst))
            .unwrap();
        timer.stop_par_timer();
        timer.stop_par_timer();
        tokio::time::sleep(Duration::from_secs(3)).await;

        assert!(!fired.load(Ordering::SeqCst));
        assert_eq!(timer.phase(), TimerPhase::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn last_start_wins() {
        let mut timer = ParTimer::new(Arc::new(LogCuePlayer));
        let first = Arc::new(AtomicBool::new(false));
        let second = Arc::new(AtomicBool::new(false));
        let (first_flag, second_flag) = (first.clone(), second.clone());

        timer
            .start_par_timer(1.0, move || first_flag.store(true, Ordering::SeqCst))
            .unwrap();
        timer
            .start_par_timer(2.0, move || second_flag.store(true, Ordering::SeqCst))
            .unwrap();
        tokio::time::sleep(Duration::from_secs(3)).await;

        assert!(!first.load(Ordering::SeqCst));
        assert!(second.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn failing_cues_do_not_block_the_drill() {
        let player = CountingPlayer::new(true);
        let mut timer = ParTimer::new(player.clone());
        timer.play_start_beep();
        timer.play_par_beep();
        assert_eq!(player.played.load(Ordering::SeqCst), 2);

        timer.cleanup();
        assert!(player.released.load(Ordering::SeqCst));
    }

    #[test]
    fn stop_before_start_and_invalid_par_are_handled() {
        let mut timer = ParTimer::new(Arc::new(LogCuePlayer));
        timer.stop_par_timer();
        timer.stop_par_timer();
        assert_eq!(timer.phase(), TimerPhase::Idle);

        assert!(matches!(
            timer.start_par_timer(-1.0, || {}),
            Err(CoreError::InvalidConfig(_))
        ));
        assert!(matches!(
            timer.start_par_timer(1.0, || {}),
            Err(CoreError::TimerUnavailable(_))
        ));
    }
}
