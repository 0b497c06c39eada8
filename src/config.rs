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

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

mod audio;
mod error;
mod kit;
mod looper;
mod velocity;

pub use self::audio::{Audio, Dac};
pub use self::error::ConfigError;
pub use self::kit::Kit;
pub use self::looper::Looper;
pub use self::velocity::Velocity;

/// The environment prefix for configuration overrides, e.g. PIEZODRUM_AUDIO__VOICES=16.
const ENV_PREFIX: &str = "PIEZODRUM";

/// A YAML representation of the instrument configuration.
#[derive(Deserialize, Clone, Debug)]
pub struct Instrument {
    #[serde(default)]
    audio: Audio,

    #[serde(default)]
    velocity: Velocity,

    #[serde(default)]
    looper: Looper,

    kit: Kit,

    /// The directory sample paths are relative to.
    #[serde(skip)]
    base_dir: PathBuf,
}

impl Instrument {
    /// Parses the instrument configuration from a YAML file, applying environment overrides.
    pub fn deserialize(path: &Path) -> Result<Instrument, ConfigError> {
        let mut instrument = Config::builder()
            .add_source(File::from(path))
            .add_source(Self::environment())
            .build()?
            .try_deserialize::<Instrument>()?;

        instrument.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        instrument.validate()?;
        Ok(instrument)
    }

    /// Parses the instrument configuration from a YAML string. Sample paths are
    /// resolved against `base_dir`.
    pub fn from_yaml(yaml: &str, base_dir: &Path) -> Result<Instrument, ConfigError> {
        let mut instrument = Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()?
            .try_deserialize::<Instrument>()?;

        instrument.base_dir = base_dir.to_path_buf();
        instrument.validate()?;
        Ok(instrument)
    }

    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.audio.sample_rate() == 0 {
            return Err(ConfigError::Zero("audio.sample_rate"));
        }
        if self.audio.buffer_size() == 0 {
            return Err(ConfigError::Zero("audio.buffer_size"));
        }
        if self.audio.voices() == 0 {
            return Err(ConfigError::Zero("audio.voices"));
        }
        if self.audio.command_queue() == 0 {
            return Err(ConfigError::Zero("audio.command_queue"));
        }
        self.velocity.curve()?;
        self.kit.validate()
    }

    pub fn audio(&self) -> &Audio {
        &self.audio
    }

    pub fn velocity(&self) -> &Velocity {
        &self.velocity
    }

    pub fn looper(&self) -> &Looper {
        &self.looper
    }

    pub fn kit(&self) -> &Kit {
        &self.kit
    }

    /// The kit's sample files, resolved.
    pub fn sample_paths(&self) -> Vec<PathBuf> {
        self.kit.sample_paths(&self.base_dir)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use serial_test::serial;

    use super::*;
    use crate::engine::{DacChannel, DacGain};

    #[test]
    fn test_defaults() -> Result<(), Box<dyn Error>> {
        let instrument = Instrument::from_yaml(
            r#"
            kit:
              samples:
                - kick.wav
                - snare.wav
            "#,
            Path::new("/kits/rock"),
        )?;

        assert_eq!(instrument.audio().sample_rate(), 44100);
        assert_eq!(instrument.audio().buffer_size(), 256);
        assert_eq!(instrument.audio().voices(), 50);
        assert_eq!(instrument.audio().command_queue(), 256);
        assert_eq!(instrument.audio().dac().bits(), 0x3000);
        assert_eq!(instrument.velocity().curve()?.base_threshold(), 150);
        assert_eq!(instrument.velocity().curve()?.hardest_hit(), 800);
        assert!(!instrument.looper().overdub());
        assert_eq!(instrument.kit().attenuation_shift(), 4);
        assert_eq!(
            instrument.sample_paths(),
            vec![
                PathBuf::from("/kits/rock/kick.wav"),
                PathBuf::from("/kits/rock/snare.wav")
            ]
        );
        Ok(())
    }

    #[test]
    fn test_full_config() -> Result<(), Box<dyn Error>> {
        let instrument = Instrument::from_yaml(
            r#"
            audio:
              sample_rate: 22050
              buffer_size: 128
              voices: 8
              command_queue: 32
              dac:
                channel: b
                buffered: true
                gain: double
            velocity:
              base_threshold: 100
              hardest_hit: 900
            looper:
              overdub: true
            kit:
              attenuation_shift: 2
              samples:
                - /abs/kick.wav
            "#,
            Path::new("/kits"),
        )?;

        let audio = instrument.audio();
        assert_eq!(audio.sample_rate(), 22050);
        assert_eq!(audio.buffer_size(), 128);
        assert_eq!(audio.voices(), 8);
        assert_eq!(audio.command_queue(), 32);
        let dac = audio.dac();
        assert_eq!(dac.channel, DacChannel::B);
        assert!(dac.buffered);
        assert_eq!(dac.gain, DacGain::Double);
        assert!(dac.active);
        assert_eq!(instrument.velocity().curve()?.hardest_hit(), 900);
        assert!(instrument.looper().overdub());
        assert_eq!(instrument.kit().attenuation_shift(), 2);
        assert_eq!(
            instrument.sample_paths(),
            vec![PathBuf::from("/abs/kick.wav")]
        );
        Ok(())
    }

    #[test]
    fn test_invalid_velocity() {
        let result = Instrument::from_yaml(
            r#"
            velocity:
              base_threshold: 800
              hardest_hit: 800
            kit:
              samples: [kick.wav]
            "#,
            Path::new("."),
        );
        assert!(matches!(
            result,
            Err(ConfigError::InvalidVelocity {
                base_threshold: 800,
                hardest_hit: 800
            })
        ));
    }

    #[test]
    fn test_zero_sizes() {
        for (yaml, field) in [
            ("audio: {buffer_size: 0}", "audio.buffer_size"),
            ("audio: {voices: 0}", "audio.voices"),
            ("audio: {sample_rate: 0}", "audio.sample_rate"),
            ("audio: {command_queue: 0}", "audio.command_queue"),
        ] {
            let yaml = format!("{yaml}\nkit: {{samples: [kick.wav]}}");
            match Instrument::from_yaml(&yaml, Path::new(".")) {
                Err(ConfigError::Zero(name)) => assert_eq!(name, field),
                other => panic!("expected zero error for {field}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_kit_validation() {
        assert!(matches!(
            Instrument::from_yaml("kit: {samples: []}", Path::new(".")),
            Err(ConfigError::EmptyKit)
        ));
        assert!(matches!(
            Instrument::from_yaml(
                "kit: {attenuation_shift: 16, samples: [kick.wav]}",
                Path::new(".")
            ),
            Err(ConfigError::InvalidAttenuation(16))
        ));

        let samples: Vec<String> = (0..257).map(|i| format!("{i}.wav")).collect();
        let yaml = format!("kit: {{samples: [{}]}}", samples.join(", "));
        assert!(matches!(
            Instrument::from_yaml(&yaml, Path::new(".")),
            Err(ConfigError::TooManySamples(257))
        ));
    }

    #[test]
    fn test_missing_kit() {
        assert!(matches!(
            Instrument::from_yaml("audio: {voices: 4}", Path::new(".")),
            Err(ConfigError::Load(_))
        ));
    }

    #[test]
    #[serial]
    fn test_deserialize_file_relative_paths() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("instrument.yaml");
        std::fs::write(&path, "kit:\n  samples:\n    - drums/kick.wav\n")?;

        let instrument = Instrument::deserialize(&path)?;
        assert_eq!(
            instrument.sample_paths(),
            vec![dir.path().join("drums/kick.wav")]
        );
        Ok(())
    }

    #[test]
    #[serial]
    fn test_environment_overrides() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("instrument.yaml");
        std::fs::write(
            &path,
            "audio:\n  voices: 8\nkit:\n  samples:\n    - kick.wav\n",
        )?;

        std::env::set_var("PIEZODRUM_AUDIO__VOICES", "16");
        std::env::set_var("PIEZODRUM_LOOPER__OVERDUB", "true");
        let result = Instrument::deserialize(&path);
        std::env::remove_var("PIEZODRUM_AUDIO__VOICES");
        std::env::remove_var("PIEZODRUM_LOOPER__OVERDUB");

        let instrument = result?;
        assert_eq!(instrument.audio().voices(), 16);
        assert!(instrument.looper().overdub());
        Ok(())
    }
}
