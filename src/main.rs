// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::{crate_version, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use piezodrum::config::Instrument as InstrumentConfig;
use piezodrum::controller::{keyboard, Controller};
use piezodrum::instrument::Instrument;
use piezodrum::render::{self, Script};
use piezodrum::samples;
use piezodrum::stream::{CancelHandle, CaptureSink, ClockedTransport, CodeSink, NullSink};

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "A piezo-triggered drum sound core."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Loads and verifies the kit named by an instrument config.
    Verify {
        /// The path to the instrument config.
        config_path: String,
    },
    /// Renders a scripted performance to a WAV file.
    Render {
        /// The path to the instrument config.
        config_path: String,
        /// The path to the performance script.
        script_path: String,
        /// The WAV file to write.
        output_path: String,
    },
    /// Plays the instrument from the keyboard on a clocked host transport.
    Play {
        /// The path to the instrument config.
        config_path: String,
        /// Writes everything played to this WAV file on exit.
        #[arg(short, long)]
        capture: Option<String>,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Verify { config_path } => {
            let config = InstrumentConfig::deserialize(Path::new(&config_path))?;
            let repository = samples::load_kit(&config)?;
            let audio = config.audio();
            let sample_rate = audio.sample_rate();

            println!(
                "Instrument: {} Hz, {} voices, {} code words per buffer ({:?} refill budget)",
                sample_rate,
                audio.voices(),
                audio.buffer_size(),
                Duration::from_secs(audio.buffer_size() as u64) / sample_rate,
            );
            println!("Drums (count: {}):", repository.len());
            for ((drum_id, sample), path) in repository
                .iter()
                .enumerate()
                .zip(config.sample_paths().iter())
            {
                println!(
                    "- {}: {} ({} samples, {} ms)",
                    drum_id,
                    path.display(),
                    sample.len(),
                    u64::from(sample.len()) * 1000 / u64::from(sample_rate),
                );
            }
        }
        Commands::Render {
            config_path,
            script_path,
            output_path,
        } => {
            let config = InstrumentConfig::deserialize(Path::new(&config_path))?;
            let repository = Arc::new(samples::load_kit(&config)?);
            let script = Script::deserialize(Path::new(&script_path))?;

            let codes = render::render(&config, repository, &script)?;
            render::write_wav(
                &PathBuf::from(&output_path),
                &codes,
                config.audio().sample_rate(),
            )?;
            println!("Rendered {} samples to {}.", codes.len(), output_path);
        }
        Commands::Play {
            config_path,
            capture,
        } => {
            let config = InstrumentConfig::deserialize(Path::new(&config_path))?;
            let repository = Arc::new(samples::load_kit(&config)?);
            let (handle, mut core) = Instrument::build(&config, repository)?.split();

            let capture_sink = CaptureSink::new();
            let mut sink: Box<dyn CodeSink> = match capture {
                Some(_) => Box::new(capture_sink.clone()),
                None => Box::new(NullSink),
            };
            let cancel = CancelHandle::new();
            let transport = {
                let cancel = cancel.clone();
                thread::Builder::new()
                    .name("transport".into())
                    .spawn(move || {
                        core.run_clocked(&mut ClockedTransport::new(), sink.as_mut(), &cancel)
                    })?
            };

            let result = Controller::new(handle, Arc::new(keyboard::Driver::new())).run();
            cancel.cancel();
            let stats = transport
                .join()
                .map_err(|_| "transport thread panicked")?;
            result?;

            println!(
                "Played {} buffers, {} refill overruns, worst refill {:?}.",
                stats.periods, stats.overruns, stats.worst_refill
            );
            if let Some(capture) = capture {
                let codes = capture_sink.take();
                render::write_wav(Path::new(&capture), &codes, config.audio().sample_rate())?;
                println!("Captured {} samples to {}.", codes.len(), capture);
            }
        }
    }

    Ok(())
}
