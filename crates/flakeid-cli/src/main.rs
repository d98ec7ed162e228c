#![doc = include_str!("../README.md")]

mod config;
mod output;
mod telemetry;

use std::io::{self, BufWriter, Write};

use anyhow::Context;
use clap::Parser;
use config::{CliArgs, ClockKind, Command, DecodeArgs, GenerateConfig};
use flakeid::{BasicSnowflakeGenerator, MonotonicClock, SystemClock, TimeSource};
use telemetry::init_telemetry;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();

    init_telemetry();

    match args.command {
        Command::Generate(args) => {
            let config = GenerateConfig::try_from(args)?;
            log_startup_info(&config);
            let mut out = BufWriter::new(io::stdout().lock());
            match config.clock {
                ClockKind::System => generate(&mut out, &config, SystemClock)?,
                ClockKind::Monotonic => generate(&mut out, &config, MonotonicClock::new())?,
            }
            out.flush()?;
        }
        Command::Decode(args) => {
            let mut out = BufWriter::new(io::stdout().lock());
            decode(&mut out, &args)?;
            out.flush()?;
        }
    }
    Ok(())
}

fn generate<T: TimeSource>(
    out: &mut impl Write,
    config: &GenerateConfig,
    clock: T,
) -> anyhow::Result<()> {
    let generator = BasicSnowflakeGenerator::new(config.datacenter_id, config.worker_id, clock)?;

    for _ in 0..config.count {
        let id = generator.next_id().context("failed to generate ID")?;
        output::write_generated(out, id, config.format)?;
    }

    tracing::debug!(count = config.count, "generated IDs");
    Ok(())
}

fn decode(out: &mut impl Write, args: &DecodeArgs) -> anyhow::Result<()> {
    for &id in &args.ids {
        if !id.is_valid() {
            tracing::warn!(%id, "reserved bit is set; not produced by a snowflake generator");
        }
        output::write_decoded(out, id, args.format)?;
    }
    Ok(())
}

fn log_startup_info(config: &GenerateConfig) {
    if cfg!(debug_assertions) {
        tracing::debug!("Generating IDs with full config: {:#?}", config);
    } else {
        tracing::debug!(
            "Generating {} IDs as datacenter {} worker {}",
            config.count,
            config.datacenter_id,
            config.worker_id
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::OutputFormat;
    use flakeid::{SnowflakeId, TWITTER_EPOCH_MILLIS};

    struct FixedTime;

    impl TimeSource for FixedTime {
        fn current_millis(&self) -> u64 {
            TWITTER_EPOCH_MILLIS
        }
    }

    fn config(count: u64, format: OutputFormat) -> GenerateConfig {
        GenerateConfig {
            datacenter_id: 1,
            worker_id: 1,
            count,
            clock: ClockKind::System,
            format,
        }
    }

    fn lines(out: &[u8]) -> Vec<String> {
        String::from_utf8(out.to_vec())
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn generate_prints_increasing_ids() {
        let mut out: Vec<u8> = Vec::new();
        generate(&mut out, &config(3, OutputFormat::Text), SystemClock).unwrap();

        let ids: Vec<SnowflakeId> = lines(&out).iter().map(|l| l.parse().unwrap()).collect();
        assert_eq!(ids.len(), 3);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        for id in ids {
            assert_eq!(id.datacenter_id(), 1);
            assert_eq!(id.worker_id(), 1);
        }
    }

    #[test]
    fn generate_at_epoch_prints_known_values() {
        let mut out: Vec<u8> = Vec::new();
        generate(&mut out, &config(2, OutputFormat::Text), FixedTime).unwrap();
        assert_eq!(lines(&out), ["135168", "135169"]);
    }

    #[test]
    fn generate_json_lines() {
        let mut out: Vec<u8> = Vec::new();
        generate(&mut out, &config(2, OutputFormat::Json), FixedTime).unwrap();

        let lines = lines(&out);
        assert_eq!(lines.len(), 2);
        let second: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();
        assert_eq!(second["id"], 135_169);
        assert_eq!(second["sequence"], 1);
    }

    #[test]
    fn decode_prints_one_line_per_id() {
        let args = DecodeArgs {
            ids: vec![SnowflakeId::from_raw(135_168), SnowflakeId::from_raw(135_169)],
            format: OutputFormat::Text,
        };
        let mut out: Vec<u8> = Vec::new();
        decode(&mut out, &args).unwrap();

        assert_eq!(
            lines(&out),
            [
                "135168 timestamp=0 unix_millis=1288834974657 datacenter_id=1 worker_id=1 sequence=0",
                "135169 timestamp=0 unix_millis=1288834974657 datacenter_id=1 worker_id=1 sequence=1",
            ]
        );
    }
}
