//! Batch-simulate n-back sessions with a synthetic subject and report the
//! total-score distribution, or run an adaptive course and report the level
//! trajectory.

use std::fs;

use nback::simulation::{
    aggregate_statistics, simulate_batch, simulate_course, SubjectModel,
};
use nback::types::{GameConfig, GameMode};

struct Args {
    sessions: usize,
    seed: u64,
    mode: GameMode,
    level: usize,
    jaeggi: bool,
    hit_rate: f64,
    fa_rate: f64,
    course: bool,
    output: Option<String>,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = Args {
        sessions: 1000,
        seed: 42,
        mode: GameMode::DualNback,
        level: 2,
        jaeggi: false,
        hit_rate: 0.8,
        fa_rate: 0.1,
        course: false,
        output: None,
    };

    fn value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> &'a str {
        *i += 1;
        match args.get(*i) {
            Some(v) => v,
            None => {
                eprintln!("Missing value for {}", flag);
                std::process::exit(1);
            }
        }
    }

    fn parse<T: std::str::FromStr>(raw: &str, flag: &str) -> T {
        raw.parse().unwrap_or_else(|_| {
            eprintln!("Invalid {} value: {}", flag, raw);
            std::process::exit(1);
        })
    }

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--sessions" => parsed.sessions = parse(value(&args, &mut i, "--sessions"), "--sessions"),
            "--seed" => parsed.seed = parse(value(&args, &mut i, "--seed"), "--seed"),
            "--mode" => {
                let name = value(&args, &mut i, "--mode");
                parsed.mode = GameMode::from_arg(name).unwrap_or_else(|| {
                    eprintln!("Unknown mode '{}'. Known modes:", name);
                    for m in GameMode::ALL {
                        eprintln!("  {}", m.as_str());
                    }
                    std::process::exit(1);
                })
            }
            "--level" => parsed.level = parse(value(&args, &mut i, "--level"), "--level"),
            "--jaeggi" => parsed.jaeggi = true,
            "--hit-rate" => parsed.hit_rate = parse(value(&args, &mut i, "--hit-rate"), "--hit-rate"),
            "--fa-rate" => parsed.fa_rate = parse(value(&args, &mut i, "--fa-rate"), "--fa-rate"),
            "--course" => parsed.course = true,
            "--output" => parsed.output = Some(value(&args, &mut i, "--output").to_string()),
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!(
                    "Usage: simulate [--sessions N] [--seed S] [--mode M] [--level L] \
                     [--jaeggi] [--hit-rate P] [--fa-rate P] [--course] [--output FILE]"
                );
                std::process::exit(1);
            }
        }
        i += 1;
    }
    parsed
}

fn main() {
    let args = parse_args();

    let config = GameConfig {
        jaeggi_mode: args.jaeggi,
        ..GameConfig::default()
    };
    if args.jaeggi && config.trials_per_session < args.level + 6 {
        eprintln!(
            "Jaeggi mode needs trials_per_session - level >= 6 (got {} - {})",
            config.trials_per_session, args.level
        );
        std::process::exit(1);
    }
    let subject = SubjectModel {
        hit_rate: args.hit_rate,
        false_alarm_rate: args.fa_rate,
        arithmetic_accuracy: args.hit_rate,
    };

    println!(
        "Simulating {} {} session(s), level {}, {} scoring, hit={} fa={}",
        args.sessions,
        args.mode.as_str(),
        args.level,
        if args.jaeggi { "jaeggi" } else { "standard" },
        args.hit_rate,
        args.fa_rate
    );

    if args.course {
        let course = simulate_course(args.mode, &config, &subject, args.sessions, args.seed);
        println!(
            "Course: start level {}, final level {} ({} up, {} down)",
            course.levels.first().copied().unwrap_or(0),
            course.final_level,
            course.level_increases,
            course.level_decreases
        );
        let shown = course.levels.len().min(30);
        println!("Level trajectory (first {}): {:?}", shown, &course.levels[..shown]);

        if let Some(path) = args.output {
            let json = serde_json::to_string_pretty(&course).expect("serialize course");
            fs::write(&path, json).unwrap_or_else(|e| {
                eprintln!("Failed to write {}: {}", path, e);
                std::process::exit(1);
            });
            println!("Course written to {}", path);
        }
    } else {
        let result = simulate_batch(
            args.mode,
            args.level,
            &config,
            &subject,
            args.sessions,
            args.seed,
        );
        println!(
            "mean={:.2} std={:.2} min={:.1} median={:.1} max={:.1} ({:.2?})",
            result.mean, result.std_dev, result.min, result.median, result.max, result.elapsed
        );

        if let Some(path) = args.output {
            let stats = aggregate_statistics(&result, args.mode, args.level, &config, args.seed);
            let json = serde_json::to_string_pretty(&stats).expect("serialize statistics");
            fs::write(&path, json).unwrap_or_else(|e| {
                eprintln!("Failed to write {}: {}", path, e);
                std::process::exit(1);
            });
            println!("Statistics written to {}", path);
        }
    }
}
