use crate::prelude::*;
use std::path::PathBuf;
use std::time::Duration;

/// Period of the snapshot + render cycle
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(1);
/// Pause between two command prompts, keeps the input loop from spinning
pub const DEFAULT_POLL_THROTTLE: Duration = Duration::from_millis(100);
/// Maximum number of processes kept in a snapshot
pub const DEFAULT_MAX_PROCS: usize = 20;
pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// Parse a duration string
/// Supports humantime format: "1s", "500ms", "1.5s", "2m", etc.
/// Also supports pure numbers interpreted as seconds (e.g., "2" = 2s, "0.5" = 500ms)
fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();

    if let Ok(seconds) = s.parse::<f64>() {
        return Duration::try_from_secs_f64(seconds)
            .with_context(|| format!("Invalid duration: '{s}'"));
    }

    humantime::parse_duration(s).with_context(|| {
        format!(
            "Invalid duration format: '{s}'. Expected format like '1s', '500ms', '2m' or a number in seconds"
        )
    })
}

fn parse_non_zero_duration(s: Option<&str>, default: Duration, name: &str) -> Result<Duration> {
    let Some(s) = s else {
        return Ok(default);
    };

    let duration = parse_duration(s).with_context(|| format!("Invalid {name}"))?;
    if duration.is_zero() {
        bail!("{name} must be greater than zero");
    }
    Ok(duration)
}

/// Command line arguments tuning the monitor
#[derive(Debug, Clone, Default, clap::Args)]
pub struct MonitorArgs {
    /// Time between two refreshes of the process table.
    ///
    /// Format: duration string (e.g., "1s", "500ms") or number in seconds (e.g., "2", "0.5")
    /// Default: 1s
    #[arg(long, env = "PROCTOP_REFRESH_INTERVAL", value_name = "DURATION")]
    pub refresh_interval: Option<String>,

    /// Pause before each command prompt.
    ///
    /// Format: duration string (e.g., "100ms") or number in seconds
    /// Default: 100ms
    #[arg(long, env = "PROCTOP_POLL_THROTTLE", value_name = "DURATION")]
    pub poll_throttle: Option<String>,

    /// Maximum number of processes shown in the table
    #[arg(long, env = "PROCTOP_MAX_PROCS", value_name = "COUNT")]
    pub max_procs: Option<usize>,

    /// Root of the process namespace
    #[arg(long, hide = true, value_name = "PATH")]
    pub proc_root: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    pub refresh_interval: Duration,
    pub poll_throttle: Duration,
    pub max_procs: usize,
    pub proc_root: PathBuf,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            poll_throttle: DEFAULT_POLL_THROTTLE,
            max_procs: DEFAULT_MAX_PROCS,
            proc_root: PathBuf::from(DEFAULT_PROC_ROOT),
        }
    }
}

impl TryFrom<MonitorArgs> for MonitorConfig {
    type Error = anyhow::Error;

    fn try_from(args: MonitorArgs) -> Result<Self> {
        let refresh_interval = parse_non_zero_duration(
            args.refresh_interval.as_deref(),
            DEFAULT_REFRESH_INTERVAL,
            "refresh_interval",
        )?;
        let poll_throttle = parse_non_zero_duration(
            args.poll_throttle.as_deref(),
            DEFAULT_POLL_THROTTLE,
            "poll_throttle",
        )?;

        let max_procs = args.max_procs.unwrap_or(DEFAULT_MAX_PROCS);
        if max_procs == 0 {
            bail!("max_procs must be at least 1");
        }

        Ok(Self {
            refresh_interval,
            poll_throttle,
            max_procs,
            proc_root: args
                .proc_root
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PROC_ROOT)),
        })
    }
}
