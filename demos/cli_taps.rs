//! CLI "repeat the taps" example.
//!
//! Taps are typed as two numbers between 0 and 1, e.g. `0.25 0.7`.
//! Set `RUST_LOG=taprs=debug` to watch the engine work.

#![allow(clippy::missing_docs_in_private_items)]

use core::cell::Cell;
use core::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

use taprs::{
    AppAction, AppState, ChannelHandle, ChannelPort, ConfigureAction, GameAction, GameOptions,
    MenuAction, NameGenerator, Orchestrator, Player, Roster, RoundState, Tap,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Notify;
use tracing_subscriber::EnvFilter;

enum Command {
    Act(AppAction),
    Quit,
    Unknown,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    println!("Repeat the taps (type 'q' to quit)");

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let options = GameOptions::default().with_repeat_timeout(Duration::from_secs(10));
    let tolerance = options.tolerance;
    let (port, handle) = ChannelPort::new(tokio::time::sleep);
    let mut orchestrator = Orchestrator::new(port, options);

    let quit = Notify::new();
    let done = Cell::new(false);

    tokio::join!(
        orchestrator.run(quit.notified()),
        show(&handle, tolerance, &done),
        read_input(&handle, NameGenerator::new(seed), &quit, &done),
    );
}

async fn show(handle: &ChannelHandle, tolerance: f32, done: &Cell<bool>) {
    let mut seen = 0;
    while !done.get() {
        let generation = handle.generation();
        if generation != seen && handle.is_listening() {
            seen = generation;
            if let Some(state) = handle.snapshot() {
                print_state(&state, tolerance);
            }
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

async fn read_input(
    handle: &ChannelHandle,
    mut names: NameGenerator,
    quit: &Notify,
    done: &Cell<bool>,
) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        let Some(state) = handle.snapshot() else {
            continue;
        };

        match parse(line.trim(), &state, &mut names) {
            Command::Act(action) => {
                if let Err(err) = handle.submit(action) {
                    println!("Too late: {err}");
                }
            }
            Command::Quit => break,
            Command::Unknown => println!("Unknown command."),
        }
    }

    println!("Goodbye.");
    done.set(true);
    quit.notify_one();
}

fn parse(line: &str, state: &AppState, names: &mut NameGenerator) -> Command {
    if matches!(line, "q" | "quit") {
        return Command::Quit;
    }

    let mut words = line.split_whitespace();
    let first = words.next().unwrap_or_default();
    let action = match state {
        AppState::Menu(_) => match first {
            "" | "s" | "start" => AppAction::Menu(MenuAction::Start),
            _ => return Command::Unknown,
        },
        AppState::ConfigureGame(roster) => {
            let configure = match (first, words.next(), words.next()) {
                ("a" | "add", None, _) => ConfigureAction::Add(names.next_for(roster)),
                ("a" | "add", Some(name), _) => ConfigureAction::Add(Player::new(name)),
                ("r" | "remove", Some(name), _) => ConfigureAction::Remove(Player::new(name)),
                ("n" | "rename", Some(old), Some(new)) => ConfigureAction::Rename {
                    player: Player::new(old),
                    name: new.to_owned(),
                },
                ("" | "p" | "play" | "next", None, _) => ConfigureAction::Next,
                _ => return Command::Unknown,
            };
            AppAction::Configure(configure)
        }
        AppState::Game(_) => {
            if matches!(first, "" | "next") {
                AppAction::Game(GameAction::Next)
            } else {
                let x = first.parse::<f32>();
                let y = words.next().map(str::parse::<f32>);
                match (x, y) {
                    (Ok(x), Some(Ok(y))) => AppAction::Game(GameAction::Tap(Tap::new(x, y))),
                    _ => return Command::Unknown,
                }
            }
        }
    };

    Command::Act(action)
}

fn print_state(state: &AppState, tolerance: f32) {
    match state {
        AppState::Menu(_) => {
            println!();
            println!("== Menu ==");
            println!("Press enter to start.");
        }
        AppState::ConfigureGame(roster) => print_roster(roster),
        AppState::Game(round) => print_round(round, tolerance),
    }
}

fn print_roster(roster: &Roster) {
    println!();
    println!("== Players ==");
    for (index, player) in roster.players().enumerate() {
        println!("{}. {player}", index + 1);
    }
    println!("add [name] | remove <name> | rename <old> <new> | enter to play");
}

fn print_round(round: &RoundState, tolerance: f32) {
    match round {
        RoundState::Adding { queue, recorded, .. } => {
            if let Some(player) = queue.first() {
                println!("{player}: add tap #{} (x y)", recorded.len() + 1);
            }
        }
        RoundState::Repeating {
            queue,
            recorded,
            attempt,
            timeout,
        } => {
            if let Some(player) = queue.first() {
                println!(
                    "{player}: repeat tap {}/{} within {}s",
                    attempt.len() + 1,
                    recorded.len(),
                    timeout.as_secs()
                );
            }
        }
        RoundState::GameOver { loser, recorded, .. } => {
            let repeated = round.repeated(tolerance);
            println!();
            println!("{loser} lost after {repeated} of {} taps.", recorded.len());
            println!("Press enter for the menu.");
        }
    }
}
