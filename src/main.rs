use std::error::Error;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use mathheroes::events::Channel;
use mathheroes::game::{QuizSession, Settings, StatsManager};
use mathheroes::model::{Character, Mode, QuizEvent};

#[derive(Parser, Debug)]
#[command(name = "mathheroes")]
#[command(
    version,
    about = "Math practice with stars, streaks and unlockable levels"
)]
struct Cli {
    /// Directory holding saved progress (overrides MATH_HEROES_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Seed for problem generation (overrides SEED)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Answer a round of problems
    Play {
        /// addition, subtraction, skipcount, patterns, groups or multiplication
        #[arg(short, long)]
        mode: Option<Mode>,

        /// Number of problems before returning home
        #[arg(short, long, default_value_t = 10)]
        rounds: u32,
    },
    /// Show stars, accuracy and unlocks per mode
    Stats,
    /// Write the parent progress report
    Report {
        /// File to write; printed to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Clear all progress (the chosen character is kept)
    Reset,
    /// Show or choose the hero character
    Character { name: Option<Character> },
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let settings = Settings::from_env()
        .with_data_dir(cli.data_dir)
        .with_seed(cli.seed);
    if settings.debug {
        info!("Settings: {:?}", settings);
    }
    let mut stats = StatsManager::open(&settings);

    match cli.command {
        Command::Play { mode, rounds } => {
            let seed = settings.seed.unwrap_or_else(|| rand::rng().next_u64());
            info!(target: "quiz", "Problem seed {}", seed);
            play(stats, StdRng::seed_from_u64(seed), mode, rounds)?;
        }
        Command::Stats => print_stats(&stats),
        Command::Report { output } => {
            let report = stats.export_report();
            match output {
                Some(path) => {
                    fs::write(&path, report)?;
                    println!("Report written to {}", path.display());
                }
                None => println!("{}", report),
            }
        }
        Command::Reset => {
            stats.reset()?;
            println!("All progress cleared.");
        }
        Command::Character { name: Some(character) } => {
            stats.select_character(character)?;
            println!("Your hero is now {}.", character);
        }
        Command::Character { name: None } => {
            println!("Your hero: {}", stats.character());
            let roster: Vec<&str> = Character::all().iter().map(|c| c.name()).collect();
            println!("Available: {}", roster.join(", "));
        }
    }
    Ok(())
}

fn print_stats(stats: &StatsManager) {
    let totals = stats.stats();
    println!(
        "Stars: {}  Score: {}  Best streak: {}  Daily streak: {}",
        totals.total_stars, totals.total_score, totals.best_streak, totals.daily_streak
    );
    println!(
        "Accuracy: {}%  Time played: {}",
        stats.overall_accuracy(),
        stats.formatted_total_time()
    );
    if let Some(when) = stats.time_since_last_play() {
        println!("Last played {}", when);
    }
    for mode in Mode::all() {
        let progress = stats.unlock_progress(mode);
        let next = match (progress.next, progress.stars_remaining()) {
            (Some((tier, _)), Some(remaining)) => format!("{} more for {}", remaining, tier),
            _ => "all levels unlocked".to_string(),
        };
        println!(
            "{:<15} {:>3}% {:>3} stars  {:<6} ({})",
            mode.label(),
            stats.mode_accuracy(mode),
            progress.stars,
            progress.difficulty.name(),
            next
        );
    }
}

fn play<R: Rng>(
    stats: StatsManager,
    rng: R,
    mode: Option<Mode>,
    rounds: u32,
) -> Result<(), Box<dyn Error>> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    let mode = match mode {
        Some(mode) => mode,
        None => match choose_mode(&mut lines)? {
            Some(mode) => mode,
            None => return Ok(()),
        },
    };

    let (emitter, observer) = Channel::new();
    observer.subscribe(|event: &QuizEvent| match event {
        QuizEvent::StarEarned { total_stars, .. } => {
            println!("  You earned a star! ({} total)", total_stars)
        }
        QuizEvent::DifficultyUnlocked { mode, difficulty } => {
            println!("  {} {} level unlocked!", mode.label(), difficulty)
        }
        QuizEvent::SessionSaved(session) => println!(
            "Session saved: {}/{} correct ({}%)",
            session.correct,
            session.problems,
            session.accuracy()
        ),
        QuizEvent::AnswerChecked { .. } => {}
    });

    let mut quiz = QuizSession::new(stats, rng, emitter);
    let mut problem = quiz.enter_mode(mode).clone();

    for round in 1..=rounds {
        println!();
        println!("[{}/{}] {}", round, rounds, problem);
        if let Some(options) = problem.options() {
            let choices: Vec<String> = options.iter().map(u32::to_string).collect();
            println!("  Choices: {}", choices.join("  "));
        }
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next().transpose()? else {
            break;
        };
        if line.trim().eq_ignore_ascii_case("q") {
            break;
        }

        if let Some(feedback) = quiz.submit_text(&line) {
            if feedback.correct {
                println!("  Correct! Streak: {}", feedback.streak);
            } else {
                println!("  Not quite, the answer was {}.", feedback.answer);
                if let Some(hint) = problem.hint() {
                    println!("  Hint: {}", hint);
                }
            }
        }
        match quiz.next_problem() {
            Some(next) => problem = next.clone(),
            None => break,
        }
    }

    println!();
    quiz.go_home();
    Ok(())
}

fn choose_mode<B: BufRead>(lines: &mut io::Lines<B>) -> Result<Option<Mode>, Box<dyn Error>> {
    for (index, mode) in Mode::all().iter().enumerate() {
        println!("{}. {}", index + 1, mode.label());
    }
    loop {
        print!("Pick a game: ");
        io::stdout().flush()?;
        let Some(line) = lines.next().transpose()? else {
            return Ok(None);
        };
        let choice = line.trim();
        let by_number = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| Mode::all().get(i).copied());
        match by_number.or_else(|| Mode::from_name(choice)) {
            Some(mode) => return Ok(Some(mode)),
            None => println!("Pick a number from the list."),
        }
    }
}
