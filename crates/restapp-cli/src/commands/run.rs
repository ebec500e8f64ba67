//! Interactive headless session.
//!
//! Drives a [`SessionController`] from a tokio loop: a 1 s countdown
//! interval, a ~30 Hz animation interval while breathing mode is active,
//! line commands on stdin and Ctrl-C. Events are printed as JSON lines.

use clap::Args;
use chrono::Utc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Instant, Interval, MissedTickBehavior};

use restapp_core::{
    format_remaining, Config, CoreError, Event, Mode, SessionController, TerminalAction,
    TerminalActionExecutor, TimerState, Volume, VolumeFlagFile, VolumeStore,
};

use super::{emit, emit_all};
use crate::host::{discover_scenes, ConsolePlayback, DryRunActions, SystemActions};

const ANIMATION_FRAME: Duration = Duration::from_millis(33);
const SECOND: Duration = Duration::from_secs(1);

#[derive(Args)]
pub struct RunArgs {
    /// Session length in minutes (defaults to the configured length)
    #[arg(long)]
    minutes: Option<u64>,
    /// What to do when the session ends: mute or shutdown
    #[arg(long)]
    action: Option<TerminalAction>,
    /// Scene to start with
    #[arg(long)]
    scene: Option<String>,
    /// Log the end-of-session action instead of running it
    #[arg(long)]
    dry_run: bool,
    /// Wait for a `start` command instead of starting immediately
    #[arg(long)]
    no_start: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    /// The session (re)started running; the next countdown tick is a full second away.
    RestartCountdown,
    Quit,
}

/// 1 Hz countdown source. The first tick fires one second after creation
/// or after the last [`restart`](Countdown::restart).
struct Countdown {
    interval: Interval,
}

impl Countdown {
    fn new() -> Self {
        let mut interval = tokio::time::interval_at(Instant::now() + SECOND, SECOND);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }

    fn restart(&mut self) {
        self.interval.reset();
    }

    async fn tick(&mut self) {
        self.interval.tick().await;
    }
}

type Controller = SessionController<ConsolePlayback>;

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let registry = discover_scenes(&config.scenes_dir()?)?;
    let mut store = VolumeFlagFile::open()?;
    let volume = Volume::initial(store.volume_was_zero(), config.default_volume());
    let audio = ConsolePlayback::new(config.audio.channels);
    let mut ctl = SessionController::new(&config, registry, audio, volume)?;

    match &args.scene {
        Some(id) => emit_all(&ctl.select_scene(id)?)?,
        None => emit_all(&ctl.start_ambient())?,
    }
    if let Some(action) = args.action {
        emit(&ctl.set_terminal_action(action)?)?;
    }
    if let Some(minutes) = args.minutes {
        emit(&ctl.set_duration(minutes.saturating_mul(60))?)?;
    }
    if !args.no_start {
        emit_all(&ctl.on_action_button())?;
    }

    let mut executor: Box<dyn TerminalActionExecutor> = if args.dry_run {
        Box::new(DryRunActions::default())
    } else {
        Box::new(SystemActions)
    };

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(event_loop(&mut ctl, &mut store, executor.as_mut()))
}

async fn event_loop(
    ctl: &mut Controller,
    store: &mut VolumeFlagFile,
    executor: &mut dyn TerminalActionExecutor,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut countdown = Countdown::new();

    let mut frames = tokio::time::interval(ANIMATION_FRAME);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            _ = countdown.tick() => {
                for event in ctl.on_timer_tick() {
                    emit(&event)?;
                    match event {
                        Event::Countdown { remaining_secs } => {
                            tracing::debug!(remaining = %format_remaining(remaining_secs), "tick");
                        }
                        Event::SessionCompleted { action } => {
                            executor.execute(action)?;
                            return Ok(());
                        }
                        _ => {}
                    }
                }
            }
            _ = frames.tick(), if ctl.mode() == Mode::Breathing => {
                emit_all(&ctl.on_animation_tick(Utc::now()))?;
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(line) => match handle_command(ctl, store, &line)? {
                        Flow::Continue => {}
                        Flow::RestartCountdown => countdown.restart(),
                        Flow::Quit => return Ok(()),
                    },
                    None => stdin_open = false,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                return Ok(());
            }
        }
    }
}

/// Apply one stdin command. Rejected commands are logged, not fatal.
fn handle_command(
    ctl: &mut Controller,
    store: &mut impl VolumeStore,
    line: &str,
) -> Result<Flow, serde_json::Error> {
    let mut words = line.split_whitespace();
    let Some(cmd) = words.next() else {
        return Ok(Flow::Continue);
    };
    let arg = words.next();

    let result: Result<Vec<Event>, CoreError> = match (cmd, arg) {
        ("start", _) if ctl.timer().state() == TimerState::Idle => Ok(ctl.on_action_button()),
        ("toggle", _) => Ok(ctl.on_action_button()),
        ("pause", _) if ctl.timer().state() == TimerState::Running => Ok(ctl.on_action_button()),
        ("resume", _) if ctl.timer().state() == TimerState::Paused => Ok(ctl.on_action_button()),
        ("start" | "pause" | "resume", _) => Ok(Vec::new()),
        ("click", _) => Ok(ctl.on_element_click(Utc::now())),
        ("overlay", _) => Ok(ctl.on_overlay_click(Utc::now())),
        ("back" | "esc", _) => Ok(ctl.exit_breathing()),
        ("scene", Some(id)) => ctl.select_scene(id),
        ("volume", Some(v)) => match v.parse::<u8>() {
            Ok(v) => {
                let event = ctl.set_volume(Volume::new(v));
                if let Event::VolumeChanged { is_zero, .. } = event {
                    if let Err(err) = store.set_volume_was_zero(is_zero) {
                        tracing::warn!(error = %err, "could not persist volume flag");
                    }
                }
                Ok(vec![event])
            }
            Err(_) => {
                tracing::warn!(value = v, "volume must be 0-100");
                Ok(Vec::new())
            }
        },
        ("slider", Some(pos)) => match pos.parse::<u16>() {
            Ok(pos) => ctl.on_slider_released(pos).map(|e| vec![e]),
            Err(_) => {
                tracing::warn!(value = pos, "slider position must be 0-1000");
                Ok(Vec::new())
            }
        },
        ("minutes", Some(m)) => match m.parse::<u64>() {
            Ok(m) => ctl.set_duration(m.saturating_mul(60)).map(|e| vec![e]),
            Err(_) => {
                tracing::warn!(value = m, "minutes must be a whole number");
                Ok(Vec::new())
            }
        },
        ("action", Some(a)) => match a.parse::<TerminalAction>() {
            Ok(action) => ctl.set_terminal_action(action).map(|e| vec![e]),
            Err(err) => {
                tracing::warn!(error = %err, "bad action");
                Ok(Vec::new())
            }
        },
        ("status", _) => Ok(vec![ctl.snapshot()]),
        ("phase", _) => {
            match ctl.breathing_phase(Utc::now()) {
                Some(phase) => println!("{}", serde_json::to_string(&phase)?),
                None => tracing::info!("not in breathing mode"),
            }
            Ok(Vec::new())
        }
        ("quit" | "exit", _) => return Ok(Flow::Quit),
        _ => {
            tracing::warn!(command = line, "unknown command");
            Ok(Vec::new())
        }
    };

    let events = match result {
        Ok(events) => events,
        Err(err) => {
            tracing::warn!(error = %err, command = line, "command rejected");
            return Ok(Flow::Continue);
        }
    };
    emit_all(&events)?;
    let running_again = events
        .iter()
        .any(|e| matches!(e, Event::TimerStarted { .. } | Event::TimerResumed { .. }));
    Ok(if running_again {
        Flow::RestartCountdown
    } else {
        Flow::Continue
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use restapp_core::{MemoryVolumeStore, SceneRegistry};

    fn controller() -> Controller {
        SessionController::new(
            &Config::default(),
            SceneRegistry::new(),
            ConsolePlayback::new(4),
            Volume::new(20),
        )
        .unwrap()
    }

    #[test]
    fn commands_drive_the_timer() {
        let mut ctl = controller();
        let mut store = MemoryVolumeStore::default();
        assert_eq!(handle_command(&mut ctl, &mut store, "minutes 5").unwrap(), Flow::Continue);
        assert_eq!(ctl.timer().remaining_secs(), 300);
        assert_eq!(
            handle_command(&mut ctl, &mut store, "start").unwrap(),
            Flow::RestartCountdown
        );
        assert_eq!(ctl.timer().state(), TimerState::Running);
        handle_command(&mut ctl, &mut store, "resume").unwrap();
        assert_eq!(ctl.timer().state(), TimerState::Running);
        handle_command(&mut ctl, &mut store, "pause").unwrap();
        assert_eq!(ctl.timer().state(), TimerState::Paused);
        // Rejected mid-run, not fatal.
        handle_command(&mut ctl, &mut store, "minutes 10").unwrap();
        assert_eq!(ctl.timer().remaining_secs(), 300);
    }

    #[test]
    fn repeated_start_keeps_running() {
        let mut ctl = controller();
        let mut store = MemoryVolumeStore::default();
        handle_command(&mut ctl, &mut store, "start").unwrap();
        assert_eq!(handle_command(&mut ctl, &mut store, "start").unwrap(), Flow::Continue);
        assert_eq!(ctl.timer().state(), TimerState::Running);

        handle_command(&mut ctl, &mut store, "pause").unwrap();
        handle_command(&mut ctl, &mut store, "start").unwrap();
        assert_eq!(ctl.timer().state(), TimerState::Paused);
        assert_eq!(
            handle_command(&mut ctl, &mut store, "resume").unwrap(),
            Flow::RestartCountdown
        );
        assert_eq!(
            handle_command(&mut ctl, &mut store, "toggle").unwrap(),
            Flow::Continue
        );
        assert_eq!(ctl.timer().state(), TimerState::Paused);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_delays_next_tick_by_a_full_second() {
        let mut countdown = Countdown::new();
        let created = Instant::now();
        countdown.tick().await;
        assert_eq!(created.elapsed(), SECOND);

        // Resume 950 ms into the next second: no early tick.
        tokio::time::advance(Duration::from_millis(950)).await;
        countdown.restart();
        let resumed = Instant::now();
        countdown.tick().await;
        assert_eq!(resumed.elapsed(), SECOND);
    }

    #[test]
    fn volume_command_persists_flag() {
        let mut ctl = controller();
        let mut store = MemoryVolumeStore::default();
        handle_command(&mut ctl, &mut store, "volume 0").unwrap();
        assert!(store.volume_was_zero());
        handle_command(&mut ctl, &mut store, "volume 35").unwrap();
        assert!(!store.volume_was_zero());
        handle_command(&mut ctl, &mut store, "volume loud").unwrap();
        assert_eq!(ctl.scenes().volume(), Volume::new(35));
    }

    #[test]
    fn unknown_scene_and_commands_are_not_fatal() {
        let mut ctl = controller();
        let mut store = MemoryVolumeStore::default();
        assert_eq!(
            handle_command(&mut ctl, &mut store, "scene ocean").unwrap(),
            Flow::Continue
        );
        assert_eq!(handle_command(&mut ctl, &mut store, "dance").unwrap(), Flow::Continue);
        assert_eq!(handle_command(&mut ctl, &mut store, "").unwrap(), Flow::Continue);
        assert_eq!(handle_command(&mut ctl, &mut store, "quit").unwrap(), Flow::Quit);
    }

    #[test]
    fn click_burst_enters_breathing() {
        let mut ctl = controller();
        let mut store = MemoryVolumeStore::default();
        for _ in 0..5 {
            handle_command(&mut ctl, &mut store, "click").unwrap();
        }
        assert_eq!(ctl.mode(), Mode::Breathing);
        handle_command(&mut ctl, &mut store, "back").unwrap();
        assert_eq!(ctl.mode(), Mode::Normal);
    }
}
