mod differ;
mod encoder;
mod error;
mod pipeline;
mod sampler;
mod shared;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::differ::ThresholdComparator;
use crate::encoder::FfmpegEncoder;
use crate::pipeline::Pipeline;
use crate::sampler::FfmpegSampler;
use crate::shared::constants;

#[derive(Parser, Debug)]
#[command(author, version, about = "Perceptual pixel-difference percentage between two videos", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compare two videos and print the changed-pixel percentage
    Compare {
        movie_a: PathBuf,
        movie_b: PathBuf,
        /// Frames sampled from each video
        #[arg(short, long, default_value_t = constants::DEFAULT_SAMPLE_COUNT,
              value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
        frames: usize,
        /// Per-pixel similarity threshold (0-1)
        #[arg(short, long, default_value_t = constants::DEFAULT_THRESHOLD)]
        threshold: f32,
        /// Count anti-aliased edge pixels as changes
        #[arg(long, default_value_t = false)]
        include_aa: bool,
        /// Print the report as JSON instead of the one-line summary
        #[arg(long, default_value_t = false)]
        json: bool,
        /// Bounded wait in seconds for each ffmpeg call
        #[arg(long, default_value_t = constants::COLLABORATOR_TIMEOUT_SECS)]
        timeout: u64,
    },
    /// Compare two videos and render a diff video with transparency
    #[command(alias = "compare_and_generate")]
    CompareAndGenerate {
        movie_a: PathBuf,
        movie_b: PathBuf,
        /// Path of the diff video to write
        output: PathBuf,
        /// Frames sampled from each video
        #[arg(short, long, default_value_t = constants::DEFAULT_SAMPLE_COUNT,
              value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
        frames: usize,
        /// Per-pixel similarity threshold (0-1)
        #[arg(short, long, default_value_t = constants::DEFAULT_THRESHOLD)]
        threshold: f32,
        /// Count anti-aliased edge pixels as changes
        #[arg(long, default_value_t = false)]
        include_aa: bool,
        /// Frame rate of the diff video
        #[arg(long, default_value_t = constants::DEFAULT_DIFF_FPS)]
        fps: u32,
        /// Bounded wait in seconds for each ffmpeg call
        #[arg(long, default_value_t = constants::COLLABORATOR_TIMEOUT_SECS)]
        timeout: u64,
    },
}

fn main() {
    utils::logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = usage_exit_code(&e);
            let _ = e.print();
            std::process::exit(code);
        }
    };

    if let Err(e) = run(cli) {
        utils::logger::error(&format!("{:#}", e));
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Help and version requests are not failures; every other argument
/// problem (wrong count, bad values) exits 1 with the usage message.
fn usage_exit_code(err: &clap::Error) -> i32 {
    use clap::error::ErrorKind;
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Compare {
            movie_a,
            movie_b,
            frames,
            threshold,
            include_aa,
            json,
            timeout,
        } => {
            utils::process::require_binary("ffmpeg")?;

            let timeout = Duration::from_secs(timeout);
            let sampler = FfmpegSampler::with_timeout(timeout);
            let comparator = ThresholdComparator::with_options(threshold, include_aa);
            let encoder = FfmpegEncoder::with_timeout(timeout);
            let pipeline = Pipeline {
                sampler: &sampler,
                comparator: &comparator,
                encoder: &encoder,
                sample_count: frames,
                diff_fps: constants::DEFAULT_DIFF_FPS,
            };

            let outcome = pipeline.run(&movie_a, &movie_b, None, |line| {
                utils::logger::info(line)
            })?;

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome.report)?);
            } else {
                println!("Difference: {:.2}%", outcome.report.percentage);
            }
        }
        Commands::CompareAndGenerate {
            movie_a,
            movie_b,
            output,
            frames,
            threshold,
            include_aa,
            fps,
            timeout,
        } => {
            utils::process::require_binary("ffmpeg")?;

            let timeout = Duration::from_secs(timeout);
            let sampler = FfmpegSampler::with_timeout(timeout);
            let comparator = ThresholdComparator::with_options(threshold, include_aa);
            let encoder = FfmpegEncoder::with_timeout(timeout);
            let pipeline = Pipeline {
                sampler: &sampler,
                comparator: &comparator,
                encoder: &encoder,
                sample_count: frames,
                diff_fps: fps,
            };

            let outcome = pipeline.run(&movie_a, &movie_b, Some(&output), |line| {
                println!("{}", line);
                utils::logger::info(line);
            })?;

            println!("Difference: {:.2}%", outcome.report.percentage);
            println!("Diff video written to {}", output.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_frame_count_must_be_at_least_one() {
        let err = Cli::try_parse_from(["viddiff", "compare", "a.mp4", "b.mp4", "--frames", "0"])
            .unwrap_err();
        assert_eq!(usage_exit_code(&err), 1);

        let cli =
            Cli::try_parse_from(["viddiff", "compare", "a.mp4", "b.mp4", "--frames", "3"]).unwrap();
        match cli.command {
            Commands::Compare { frames, .. } => assert_eq!(frames, 3),
            _ => panic!("expected compare subcommand"),
        }
    }

    #[test]
    fn test_wrong_argument_count_exits_one() {
        let err = Cli::try_parse_from(["viddiff", "compare", "onlyone.mp4"]).unwrap_err();
        assert_eq!(usage_exit_code(&err), 1);
    }

    #[test]
    fn test_help_and_version_exit_zero() {
        let help = Cli::try_parse_from(["viddiff", "--help"]).unwrap_err();
        assert_eq!(usage_exit_code(&help), 0);

        let version = Cli::try_parse_from(["viddiff", "--version"]).unwrap_err();
        assert_eq!(usage_exit_code(&version), 0);
    }
}
