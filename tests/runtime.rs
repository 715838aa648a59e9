//! Orchestrator, racing and channel port tests.

use core::cell::{Cell, RefCell};
use core::time::Duration;
use std::collections::VecDeque;
use std::rc::Rc;

use futures::future::{self, FutureExt};
use pretty_assertions::assert_eq;
use tokio::time::Instant;
use taprs::{
    AppAction, AppState, ChannelPort, ConfigureAction, FallbackPolicy, GameAction, GameOptions,
    MenuAction, Orchestrator, Player, PortError, PresentationPort, Roster, RoundPhase, RoundState,
    StepOutcome, Tap, first_of, next_of,
    round::RecordedTap,
};

// ============================================================================
// Scripted port
// ============================================================================

enum Scripted {
    /// Act as soon as the state is shown.
    Act(AppAction),
    /// Act after a delay.
    After(Duration, AppAction),
    /// Fail the render.
    Fail(&'static str),
}

/// Counts futures dropped before they finished.
struct Armed<'a> {
    counter: &'a Cell<usize>,
    armed: bool,
}

impl<'a> Armed<'a> {
    const fn new(counter: &'a Cell<usize>) -> Self {
        Self {
            counter,
            armed: true,
        }
    }
}

impl Drop for Armed<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.counter.set(self.counter.get() + 1);
        }
    }
}

#[derive(Default)]
struct ScriptedPort {
    script: RefCell<VecDeque<Scripted>>,
    rendered: RefCell<Vec<AppState>>,
    cancelled_renders: Cell<usize>,
    cancelled_timers: Cell<usize>,
}

impl ScriptedPort {
    fn new(script: impl IntoIterator<Item = Scripted>) -> Self {
        Self {
            script: RefCell::new(script.into_iter().collect()),
            ..Self::default()
        }
    }
}

impl PresentationPort for ScriptedPort {
    type Error = String;

    async fn render_and_await(&self, state: &AppState) -> Result<AppAction, String> {
        self.rendered.borrow_mut().push(state.clone());
        let next = self.script.borrow_mut().pop_front();

        let mut guard = Armed::new(&self.cancelled_renders);
        let result = match next {
            Some(Scripted::Act(action)) => Ok(action),
            Some(Scripted::After(delay, action)) => {
                tokio::time::sleep(delay).await;
                Ok(action)
            }
            Some(Scripted::Fail(reason)) => Err(reason.to_owned()),
            None => future::pending().await,
        };
        guard.armed = false;
        result
    }

    async fn schedule_timeout(&self, duration: Duration) {
        let mut guard = Armed::new(&self.cancelled_timers);
        tokio::time::sleep(duration).await;
        guard.armed = false;
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn p(name: &str) -> Player {
    Player::new(name)
}

fn tap(x: f32, y: f32) -> AppAction {
    AppAction::Game(GameAction::Tap(Tap::new(x, y)))
}

fn repeating_state() -> AppState {
    AppState::Game(RoundState::Repeating {
        queue: vec![p("p2"), p("p1")],
        recorded: vec![RecordedTap {
            player: p("p1"),
            tap: Tap::new(0.1, 0.1),
        }],
        attempt: Vec::new(),
        timeout: Duration::from_secs(2),
    })
}

fn phase(state: &AppState) -> Option<RoundPhase> {
    match state {
        AppState::Game(round) => Some(round.phase()),
        AppState::Menu(_) | AppState::ConfigureGame(_) => None,
    }
}

// ============================================================================
// first_of
// ============================================================================

#[tokio::test(start_paused = true)]
async fn first_of_returns_earliest_and_cancels_the_rest() {
    let cancelled = Cell::new(0);
    let counter = &cancelled;
    let slow = move |delay: u64, value: u8| {
        async move {
            let mut guard = Armed::new(counter);
            tokio::time::sleep(Duration::from_millis(delay)).await;
            guard.armed = false;
            value
        }
        .boxed_local()
    };

    let winner = first_of(vec![slow(300, 1), slow(100, 2), slow(200, 3)]).await;

    assert_eq!(winner, Some((2, 1)));
    assert_eq!(cancelled.get(), 2);
}

#[tokio::test]
async fn first_of_prefers_the_first_ready_future() {
    let winner = first_of([future::ready('a'), future::ready('b')]).await;
    assert_eq!(winner, Some(('a', 0)));
}

#[tokio::test]
async fn first_of_nothing_is_none() {
    let racers: Vec<future::Ready<()>> = Vec::new();
    assert_eq!(first_of(racers).await, None);
}

#[tokio::test(start_paused = true)]
async fn next_of_hands_back_the_pending_futures() {
    let after = |millis: u64, value: u8| {
        async move {
            tokio::time::sleep(Duration::from_millis(millis)).await;
            value
        }
        .boxed_local()
    };

    let (first, index, rest) = next_of(vec![after(200, 1), after(100, 2), after(300, 3)])
        .await
        .unwrap();
    assert_eq!((first, index, rest.len()), (2, 1, 2));

    let (second, index, rest) = next_of(rest).await.unwrap();
    assert_eq!((second, index, rest.len()), (1, 0, 1));
}

// ============================================================================
// Orchestrator
// ============================================================================

#[tokio::test(start_paused = true)]
async fn plays_from_menu_to_repeating_and_back_to_adding() {
    let port = ScriptedPort::new([
        Scripted::Act(AppAction::Menu(MenuAction::Start)),
        Scripted::Act(AppAction::Configure(ConfigureAction::Next)),
        Scripted::Act(tap(0.3, 0.3)),
        Scripted::After(Duration::from_millis(500), tap(0.31, 0.29)),
    ]);
    let mut orchestrator = Orchestrator::new(port, GameOptions::default());

    for _ in 0..3 {
        assert_eq!(
            orchestrator.step().await,
            StepOutcome::Advanced { winner: 0 }
        );
    }
    assert_eq!(phase(orchestrator.state()), Some(RoundPhase::Repeating));
    assert_eq!(
        orchestrator.effects().timeout(),
        Some(Duration::from_secs(2))
    );

    assert_eq!(
        orchestrator.step().await,
        StepOutcome::Advanced { winner: 0 }
    );

    let (port, state) = orchestrator.into_parts();
    let AppState::Game(round) = &state else {
        panic!("expected a game, got {state:?}");
    };
    assert_eq!(round.phase(), RoundPhase::Adding);
    assert_eq!(round.active_player(), Some(&p("player2")));
    assert_eq!(round.recorded().len(), 1);

    assert_eq!(port.rendered.borrow().len(), 4);
    assert_eq!(port.cancelled_timers.get(), 1);
    assert_eq!(port.cancelled_renders.get(), 0);
}

#[tokio::test(start_paused = true)]
async fn timeout_beats_a_slow_player() {
    let port = ScriptedPort::new([Scripted::After(Duration::from_secs(3), tap(0.1, 0.1))]);
    let mut orchestrator =
        Orchestrator::with_state(port, GameOptions::default(), repeating_state());

    let started = Instant::now();
    assert_eq!(
        orchestrator.step().await,
        StepOutcome::Advanced { winner: 1 }
    );
    let waited = started.elapsed();
    assert!(waited >= Duration::from_secs(2) && waited < Duration::from_secs(3));

    let AppState::Game(RoundState::GameOver { loser, attempt, .. }) = orchestrator.state() else {
        panic!("expected game over, got {:?}", orchestrator.state());
    };
    assert_eq!(loser, &p("p2"));
    assert!(attempt.is_empty());
    assert_eq!(orchestrator.port().cancelled_renders.get(), 1);
}

#[tokio::test(start_paused = true)]
async fn every_matching_tap_rearms_the_full_timeout() {
    let sequence = [Tap::new(0.1, 0.1), Tap::new(0.7, 0.7)];
    let state = AppState::Game(RoundState::Repeating {
        queue: vec![p("p2"), p("p1")],
        recorded: sequence
            .iter()
            .map(|t| RecordedTap {
                player: p("p1"),
                tap: *t,
            })
            .collect(),
        attempt: Vec::new(),
        timeout: Duration::from_secs(2),
    });
    let port = ScriptedPort::new([
        Scripted::After(Duration::from_millis(1500), tap(0.1, 0.1)),
        Scripted::After(Duration::from_millis(1500), tap(0.7, 0.7)),
    ]);
    let mut orchestrator = Orchestrator::with_state(port, GameOptions::default(), state);

    orchestrator.step().await;
    assert_eq!(phase(orchestrator.state()), Some(RoundPhase::Repeating));
    orchestrator.step().await;
    assert_eq!(phase(orchestrator.state()), Some(RoundPhase::Adding));
    assert_eq!(orchestrator.port().cancelled_timers.get(), 2);
}

#[tokio::test(start_paused = true)]
async fn ignored_actions_do_not_extend_the_timer() {
    let every = Duration::from_millis(500);
    let port = ScriptedPort::new([
        Scripted::After(every, AppAction::Game(GameAction::Next)),
        Scripted::After(every, AppAction::Menu(MenuAction::Start)),
        Scripted::After(every, AppAction::Configure(ConfigureAction::Next)),
        Scripted::After(Duration::from_secs(1), tap(0.1, 0.1)),
    ]);
    let mut orchestrator =
        Orchestrator::with_state(port, GameOptions::default(), repeating_state());

    let started = Instant::now();
    assert_eq!(
        orchestrator.step().await,
        StepOutcome::Advanced { winner: 1 }
    );
    let waited = started.elapsed();
    assert!(waited >= Duration::from_secs(2) && waited < Duration::from_millis(2500));
    assert_eq!(phase(orchestrator.state()), Some(RoundPhase::GameOver));

    let port = orchestrator.port();
    assert_eq!(*port.rendered.borrow(), vec![repeating_state(); 4]);
    assert_eq!(port.cancelled_timers.get(), 0);
    assert_eq!(port.cancelled_renders.get(), 1);
}

#[tokio::test(start_paused = true)]
async fn tap_after_ignored_action_still_counts() {
    let port = ScriptedPort::new([
        Scripted::After(Duration::from_millis(500), AppAction::Game(GameAction::Next)),
        Scripted::After(Duration::from_millis(1000), tap(0.1, 0.1)),
    ]);
    let mut orchestrator =
        Orchestrator::with_state(port, GameOptions::default(), repeating_state());

    let started = Instant::now();
    assert_eq!(
        orchestrator.step().await,
        StepOutcome::Advanced { winner: 0 }
    );
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(phase(orchestrator.state()), Some(RoundPhase::Adding));
    assert_eq!(orchestrator.port().rendered.borrow().len(), 2);
    assert_eq!(orchestrator.port().cancelled_timers.get(), 1);
}

#[tokio::test]
async fn failure_resets_to_menu_by_default() {
    let port = ScriptedPort::new([Scripted::Fail("surface gone")]);
    let roster = Roster::from_options(&GameOptions::default());
    let mut orchestrator = Orchestrator::with_state(
        port,
        GameOptions::default(),
        AppState::ConfigureGame(roster),
    );

    assert_eq!(orchestrator.step().await, StepOutcome::Recovered);
    assert_eq!(orchestrator.state(), &AppState::initial());
    assert_eq!(orchestrator.effects().timeout(), None);
}

#[tokio::test]
async fn restart_step_keeps_state_and_timer() {
    let port = ScriptedPort::new([
        Scripted::Fail("render failed"),
        Scripted::Act(tap(0.1, 0.1)),
    ]);
    let options = GameOptions::default().with_fallback(FallbackPolicy::RestartStep);
    let mut orchestrator = Orchestrator::with_state(port, options, repeating_state());

    assert_eq!(orchestrator.step().await, StepOutcome::Recovered);
    assert_eq!(orchestrator.state(), &repeating_state());
    assert_eq!(
        orchestrator.effects().timeout(),
        Some(Duration::from_secs(2))
    );

    assert_eq!(
        orchestrator.step().await,
        StepOutcome::Advanced { winner: 0 }
    );
    assert_eq!(phase(orchestrator.state()), Some(RoundPhase::Adding));
    assert_eq!(orchestrator.port().rendered.borrow().len(), 2);
}

#[tokio::test]
async fn repeated_failures_escalate_to_menu() {
    let port = ScriptedPort::new([
        Scripted::Fail("one"),
        Scripted::Fail("two"),
        Scripted::Fail("three"),
    ]);
    let options = GameOptions::default()
        .with_fallback(FallbackPolicy::RestartStep)
        .with_max_consecutive_failures(3);
    let mut orchestrator = Orchestrator::with_state(port, options, repeating_state());

    orchestrator.step().await;
    orchestrator.step().await;
    assert_eq!(orchestrator.state(), &repeating_state());

    orchestrator.step().await;
    assert_eq!(orchestrator.state(), &AppState::initial());
}

#[tokio::test]
async fn success_resets_the_failure_count() {
    let port = ScriptedPort::new([
        Scripted::Fail("one"),
        Scripted::Act(AppAction::Configure(ConfigureAction::Add(p("cy")))),
        Scripted::Fail("two"),
    ]);
    let options = GameOptions::default()
        .with_fallback(FallbackPolicy::RestartStep)
        .with_max_consecutive_failures(2);
    let roster = Roster::from_options(&options);
    let mut orchestrator =
        Orchestrator::with_state(port, options, AppState::ConfigureGame(roster));

    orchestrator.step().await;
    orchestrator.step().await;
    orchestrator.step().await;

    let AppState::ConfigureGame(roster) = orchestrator.state() else {
        panic!("expected configure, got {:?}", orchestrator.state());
    };
    assert_eq!(roster.len(), 3);
}

// ============================================================================
// ChannelPort
// ============================================================================

async fn wait_for_listener(handle: &taprs::ChannelHandle) {
    while !handle.is_listening() {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn late_tap_after_timeout_is_dropped() {
    let (port, handle) = ChannelPort::new(tokio::time::sleep);
    let mut orchestrator =
        Orchestrator::with_state(port, GameOptions::default(), repeating_state());

    assert_eq!(
        orchestrator.step().await,
        StepOutcome::Advanced { winner: 1 }
    );
    assert_eq!(phase(orchestrator.state()), Some(RoundPhase::GameOver));

    assert!(!handle.is_listening());
    assert_eq!(handle.submit(tap(0.1, 0.1)), Err(PortError::NoListener));
    assert_eq!(phase(orchestrator.state()), Some(RoundPhase::GameOver));
}

#[tokio::test(start_paused = true)]
async fn tap_before_timeout_wins_the_race() {
    let (port, handle) = ChannelPort::new(tokio::time::sleep);
    let mut orchestrator =
        Orchestrator::with_state(port, GameOptions::default(), repeating_state());

    let ui = async {
        wait_for_listener(&handle).await;
        assert_eq!(handle.snapshot(), Some(repeating_state()));
        tokio::time::sleep(Duration::from_millis(800)).await;
        handle.submit(tap(0.11, 0.1))
    };
    let (outcome, submitted) = tokio::join!(orchestrator.step(), ui);

    assert_eq!(submitted, Ok(()));
    assert_eq!(outcome, StepOutcome::Advanced { winner: 0 });
    assert_eq!(phase(orchestrator.state()), Some(RoundPhase::Adding));
}

#[tokio::test(start_paused = true)]
async fn stalling_with_ignored_actions_still_loses_on_time() {
    let (port, handle) = ChannelPort::new(tokio::time::sleep);
    let mut orchestrator =
        Orchestrator::with_state(port, GameOptions::default(), repeating_state());
    let started = Instant::now();

    let step = async {
        let outcome = orchestrator.step().await;
        (outcome, started.elapsed())
    };
    let ui = async {
        let mut submitted = Vec::new();
        for _ in 0..3 {
            tokio::time::sleep(Duration::from_millis(500)).await;
            wait_for_listener(&handle).await;
            submitted.push(handle.submit(AppAction::Game(GameAction::Next)));
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
        submitted.push(handle.submit(tap(0.1, 0.1)));
        submitted
    };
    let ((outcome, waited), submitted) = tokio::join!(step, ui);

    assert_eq!(outcome, StepOutcome::Advanced { winner: 1 });
    assert!(waited >= Duration::from_secs(2) && waited < Duration::from_millis(2500));
    assert_eq!(
        submitted,
        [Ok(()), Ok(()), Ok(()), Err(PortError::NoListener)]
    );
    assert_eq!(handle.generation(), 4);
    assert_eq!(phase(orchestrator.state()), Some(RoundPhase::GameOver));
}

#[tokio::test]
async fn superseded_render_drops_its_delivered_action() {
    let (port, handle) = ChannelPort::new(tokio::time::sleep);
    let state = AppState::initial();

    let mut render = Box::pin(port.render_and_await(&state));
    assert!(futures::poll!(render.as_mut()).is_pending());
    assert!(handle.is_listening());

    assert_eq!(handle.submit(AppAction::Menu(MenuAction::Start)), Ok(()));
    assert!(!handle.is_listening());
    drop(render);

    assert_eq!(
        handle.submit(AppAction::Menu(MenuAction::Start)),
        Err(PortError::NoListener)
    );
    assert_eq!(handle.snapshot(), Some(state));
}

#[tokio::test]
async fn stale_generation_is_rejected() {
    let (port, handle) = ChannelPort::new(tokio::time::sleep);
    let mut orchestrator = Orchestrator::new(port, GameOptions::default());

    let ui = async {
        wait_for_listener(&handle).await;
        let shown = handle.generation();
        assert_eq!(
            handle.submit_at(shown + 1, AppAction::Menu(MenuAction::Start)),
            Err(PortError::NoListener)
        );
        handle.submit_at(shown, AppAction::Menu(MenuAction::Start))
    };
    let (outcome, submitted) = tokio::join!(orchestrator.step(), ui);

    assert_eq!(submitted, Ok(()));
    assert_eq!(outcome, StepOutcome::Advanced { winner: 0 });
    assert!(matches!(orchestrator.state(), AppState::ConfigureGame(_)));
}

#[tokio::test]
async fn closed_channel_is_recovered_not_fatal() {
    let (port, handle) = ChannelPort::new(tokio::time::sleep);
    let mut orchestrator = Orchestrator::with_state(
        port,
        GameOptions::default(),
        AppState::ConfigureGame(Roster::from_options(&GameOptions::default())),
    );

    let ui = async {
        wait_for_listener(&handle).await;
        handle.close();
    };
    let (outcome, ()) = tokio::join!(orchestrator.step(), ui);

    assert_eq!(outcome, StepOutcome::Recovered);
    assert_eq!(orchestrator.state(), &AppState::initial());
    assert_eq!(
        handle.submit(AppAction::Menu(MenuAction::Start)),
        Err(PortError::Disconnected)
    );
}

#[tokio::test(start_paused = true)]
async fn run_stops_on_shutdown_and_cancels_the_pending_render() {
    let (port, handle) = ChannelPort::new(tokio::time::sleep);
    let mut orchestrator = Orchestrator::new(port, GameOptions::default());
    let stop = Rc::new(tokio::sync::Notify::new());

    let ui = {
        let stop = Rc::clone(&stop);
        let handle = handle.clone();
        async move {
            wait_for_listener(&handle).await;
            handle.submit(AppAction::Menu(MenuAction::Start)).unwrap();

            while handle.generation() < 2 || !handle.is_listening() {
                tokio::task::yield_now().await;
            }
            handle
                .submit(AppAction::Configure(ConfigureAction::Next))
                .unwrap();

            while handle.generation() < 3 || !handle.is_listening() {
                tokio::task::yield_now().await;
            }
            stop.notify_one();
        }
    };
    tokio::join!(orchestrator.run(stop.notified()), ui);

    assert_eq!(phase(orchestrator.state()), Some(RoundPhase::Adding));
    assert!(!handle.is_listening());
    assert_eq!(handle.submit(tap(0.5, 0.5)), Err(PortError::NoListener));
}
