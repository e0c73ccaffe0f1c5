use std::fs;

use clap::Parser;
use dacwave::{PatternMode, RampDirection};

use crate::{ModeArg, Opts};

fn parse(args: &[&str]) -> Opts {
    Opts::try_parse_from(std::iter::once("dacwave-sim").chain(args.iter().copied()))
        .expect("arguments should parse")
}

#[test]
fn defaults_hold_minus_one_volt() {
    let opts = parse(&[]);
    assert_eq!(opts.steps, 1);
    assert!(!opts.json);

    let config = opts.generator_config().unwrap();
    assert_eq!(config.mode, PatternMode::SingleValue { volts: -1.0 });
    assert_eq!(config.bits, 14);
    assert_eq!(config.clock_hz, 20_000_000);
}

#[test]
fn negative_volts_parse() {
    let opts = parse(&["--mode", "single", "--volts", "-2.5"]);
    assert_eq!(opts.mode, Some(ModeArg::Single));
    assert_eq!(
        opts.generator_config().unwrap().mode,
        PatternMode::SingleValue { volts: -2.5 }
    );
}

#[test]
fn ramp_direction_flag() {
    let config = parse(&["--mode", "ramp", "--descending"])
        .generator_config()
        .unwrap();
    assert_eq!(
        config.mode,
        PatternMode::FullRange {
            direction: RampDirection::Descending
        }
    );
}

#[test]
fn out_of_range_bits_are_rejected() {
    let err = parse(&["--bits", "15"]).generator_config().unwrap_err();
    assert!(err.to_string().contains("invalid generator config"));
}

#[test]
fn unknown_mode_is_a_parse_error() {
    assert!(Opts::try_parse_from(["dacwave-sim", "--mode", "square"]).is_err());
}

#[test]
fn config_file_with_overrides() {
    let path = std::env::temp_dir().join(format!("dacwave-sim-{}.json", std::process::id()));
    fs::write(
        &path,
        r#"{ "mode": { "pattern": "full_range" }, "bits": 4, "select_pin": 3 }"#,
    )
    .unwrap();

    let path_arg = path.to_string_lossy().into_owned();
    let config = parse(&["--config", &path_arg, "--descending", "--clock", "1000000"])
        .generator_config()
        .unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(
        config.mode,
        PatternMode::FullRange {
            direction: RampDirection::Descending
        }
    );
    assert_eq!(config.bits, 4);
    assert_eq!(config.select_pin, Some(3));
    assert_eq!(config.clock_hz, 1_000_000);
}

#[test]
fn missing_config_file_names_the_path() {
    let err = parse(&["--config", "/nonexistent/dacwave.json"])
        .generator_config()
        .unwrap_err();
    assert!(err.to_string().contains("/nonexistent/dacwave.json"));
}

#[test]
fn mismatched_pattern_flags_are_reported() {
    let opts = parse(&["--descending", "--volts", "1.0"]);
    let config = opts.generator_config().unwrap();

    // Default mode is single-value: --volts applies, --descending does not.
    assert_eq!(config.mode, PatternMode::SingleValue { volts: 1.0 });
    assert_eq!(opts.ignored_flags(&config.mode), vec!["--descending"]);

    let opts = parse(&["--mode", "sine", "--volts", "2.0", "--descending"]);
    let config = opts.generator_config().unwrap();
    assert_eq!(
        opts.ignored_flags(&config.mode),
        vec!["--volts", "--descending"]
    );

    let opts = parse(&["--mode", "ramp", "--descending"]);
    assert!(opts
        .ignored_flags(&opts.generator_config().unwrap().mode)
        .is_empty());
}

#[test]
fn descending_without_mode_ignored_for_file_sine() {
    let path = std::env::temp_dir().join(format!(
        "dacwave-sim-sine-{}.json",
        std::process::id()
    ));
    fs::write(&path, r#"{ "mode": { "pattern": "sine_wave" } }"#).unwrap();

    let path_arg = path.to_string_lossy().into_owned();
    let opts = parse(&["--config", &path_arg, "--descending"]);
    let config = opts.generator_config().unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(config.mode, PatternMode::SineWave);
    assert_eq!(opts.ignored_flags(&config.mode), vec!["--descending"]);
}
