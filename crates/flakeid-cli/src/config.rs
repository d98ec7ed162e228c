use anyhow::bail;
use clap::{Args, Parser, Subcommand, ValueEnum};
use flakeid::{SnowflakeId, validate_identity};

/// Command-line arguments for the `flakeid` binary.
///
/// Every generation setting can also come from the environment (or a `.env`
/// file in the working directory), so a deployment can pin its identity
/// without repeating flags.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "flakeid",
    version,
    about = "Mint and decode Twitter-style Snowflake IDs"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate new IDs and print one per line.
    Generate(GenerateArgs),
    /// Print the fields packed into existing IDs.
    Decode(DecodeArgs),
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Datacenter ID encoded into every generated ID (0-31).
    ///
    /// Must be unique per deployment together with `--worker-id`.
    ///
    /// Environment variable: `FLAKEID_DATACENTER_ID`
    #[arg(long, env = "FLAKEID_DATACENTER_ID", default_value_t = 0)]
    pub datacenter_id: u64,

    /// Worker ID encoded into every generated ID (0-31).
    ///
    /// Environment variable: `FLAKEID_WORKER_ID`
    #[arg(long, env = "FLAKEID_WORKER_ID", default_value_t = 0)]
    pub worker_id: u64,

    /// Number of IDs to generate.
    ///
    /// Environment variable: `FLAKEID_COUNT`
    #[arg(short = 'n', long, env = "FLAKEID_COUNT", default_value_t = 1)]
    pub count: u64,

    /// Time source used to stamp IDs.
    ///
    /// Environment variable: `FLAKEID_CLOCK`
    #[arg(long, env = "FLAKEID_CLOCK", value_enum, default_value_t = ClockKind::System)]
    pub clock: ClockKind,

    /// Output format.
    ///
    /// Environment variable: `FLAKEID_FORMAT`
    #[arg(long, env = "FLAKEID_FORMAT", value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Args, Debug, Clone)]
pub struct DecodeArgs {
    /// Decimal IDs to decode.
    #[arg(required = true)]
    pub ids: Vec<SnowflakeId>,

    /// Output format.
    #[arg(long, env = "FLAKEID_FORMAT", value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockKind {
    /// Read the system wall clock on every ID.
    System,
    /// Anchor to the wall clock once, then advance monotonically.
    Monotonic,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text: the bare decimal ID when generating, `key=value` fields
    /// when decoding.
    Text,
    /// One JSON object per line with every field.
    Json,
}

/// Validated settings for the `generate` subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateConfig {
    pub datacenter_id: u64,
    pub worker_id: u64,
    pub count: u64,
    pub clock: ClockKind,
    pub format: OutputFormat,
}

impl TryFrom<GenerateArgs> for GenerateConfig {
    type Error = anyhow::Error;

    fn try_from(args: GenerateArgs) -> Result<Self, Self::Error> {
        if args.count == 0 {
            bail!("count must be greater than 0 (--count / FLAKEID_COUNT)");
        }

        validate_identity(args.datacenter_id, args.worker_id)?;

        Ok(Self {
            datacenter_id: args.datacenter_id,
            worker_id: args.worker_id,
            count: args.count,
            clock: args.clock,
            format: args.format,
        })
    }
}
