use std::io::Write;
use std::thread;

use clap::{Parser, Subcommand};
use pomotimer_core::{Config, ConfigPatch, Event, Session};

#[derive(Parser)]
#[command(name = "pomotimer", version, about = "Pomodoro countdown in your terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the countdown in the foreground
    Run {
        /// Pomodoro length in seconds
        #[arg(long)]
        pomodoro: Option<u32>,
        /// Short break length in seconds
        #[arg(long)]
        short_break: Option<u32>,
        /// Long break length in seconds
        #[arg(long)]
        long_break: Option<u32>,
        /// Completed pomodoros between long breaks
        #[arg(long)]
        long_break_interval: Option<u32>,
        /// Start breaks without waiting for input
        #[arg(long)]
        auto_start_breaks: bool,
        /// Start pomodoros without waiting for input
        #[arg(long)]
        auto_start_pomodoros: bool,
        /// Emit one JSON snapshot per tick instead of the inline display
        #[arg(long)]
        json: bool,
    },
    /// Print the default configuration as JSON
    Defaults,
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run {
            pomodoro,
            short_break,
            long_break,
            long_break_interval,
            auto_start_breaks,
            auto_start_pomodoros,
            json,
        } => run(
            ConfigPatch {
                pomodoro_secs: pomodoro,
                short_break_secs: short_break,
                long_break_secs: long_break,
                long_break_interval,
                auto_start_breaks: auto_start_breaks.then_some(true),
                auto_start_pomodoros: auto_start_pomodoros.then_some(true),
                notification: None,
            },
            json,
        ),
        Commands::Defaults => defaults(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn defaults() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(&Config::default())?);
    Ok(())
}

/// Foreground host loop: this binary plays the Clock Driver role. It sleeps
/// for the cadence the session reports, fires `tick()`, and re-reads the
/// cadence so a pause stops the loop synchronously.
fn run(patch: ConfigPatch, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::new(patch)?;
    session.subscribe(move |event, _snapshot| {
        if json {
            return;
        }
        if let Event::Advanced {
            from,
            to,
            completed_pomodoros,
            auto_started,
            ..
        } = event
        {
            println!(
                "\n{} done ({completed_pomodoros} pomodoro(s) so far) -- next: {}{}",
                from.label(),
                to.label(),
                if *auto_started { "" } else { " (paused)" }
            );
        }
    });

    session.start();
    loop {
        let Some(cadence) = session.cadence() else {
            break;
        };
        thread::sleep(cadence);
        session.tick();
        render(&session, json)?;
    }

    let snapshot = session.snapshot()?;
    if !json {
        println!(
            "\nstopped on {} at {} -- next up: {}",
            snapshot.state.current_type.label(),
            snapshot.view.formatted_time,
            snapshot.view.next_type.label()
        );
    }
    Ok(())
}

fn render(session: &Session, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = session.snapshot()?;
    if json {
        println!("{}", serde_json::to_string(&snapshot)?);
    } else {
        print!(
            "\r{} {} ({})   ",
            snapshot.state.current_type.label(),
            snapshot.view.formatted_time,
            snapshot.view.progress_percent
        );
        std::io::stdout().flush()?;
    }
    Ok(())
}
