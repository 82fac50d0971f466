use crate::{
    config::{MonitorArgs, MonitorConfig},
    logger::init_local_logger,
    prelude::*,
};
use clap::{
    Parser,
    builder::{Styles, styling},
};

fn create_styles() -> Styles {
    styling::Styles::styled()
        .header(styling::AnsiColor::Green.on_default() | styling::Effects::BOLD)
        .usage(styling::AnsiColor::Green.on_default() | styling::Effects::BOLD)
        .literal(styling::AnsiColor::Cyan.on_default() | styling::Effects::BOLD)
        .placeholder(styling::AnsiColor::Cyan.on_default())
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Live process table. Type `<pid> <signal>` and press enter to signal a listed process",
    styles = create_styles()
)]
pub struct Cli {
    #[command(flatten)]
    pub monitor: MonitorArgs,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_local_logger()?;

    let config = MonitorConfig::try_from(cli.monitor)?;
    debug!("Configuration: {config:?}");

    start(config).await
}

#[cfg(target_os = "linux")]
async fn start(config: MonitorConfig) -> Result<()> {
    use crate::collector::SnapshotCollector;
    use crate::command::{CommandLoop, KillSignal, spawn_input_reader};
    use crate::monitor::Monitor;
    use crate::process::{ProcFs, SystemUsers};
    use crate::render::Renderer;
    use crate::table::SharedTable;
    use std::io::{self, BufReader};
    use tokio_util::sync::CancellationToken;

    let table = SharedTable::new();
    let collector = SnapshotCollector::new(
        ProcFs::new(&config.proc_root),
        SystemUsers,
        config.max_procs,
    );
    let mut monitor = Monitor::new(
        collector,
        table.clone(),
        Renderer::new(io::stdout()),
        config.refresh_interval,
    );

    let cancel = CancellationToken::new();
    let lines = spawn_input_reader(BufReader::new(io::stdin()))?;
    let command_loop = CommandLoop::new(table, KillSignal, config.poll_throttle);
    let commands = tokio::spawn({
        let cancel = cancel.clone();
        async move { command_loop.run(lines, io::stdout(), cancel).await }
    });

    let result = monitor.run(cancel.clone()).await;

    cancel.cancel();
    if let Err(e) = commands.await {
        warn!("Command loop ended abnormally: {e}");
    }
    result
}

#[cfg(not(target_os = "linux"))]
async fn start(_config: MonitorConfig) -> Result<()> {
    bail!("proctop reads processes from procfs and only runs on Linux")
}
