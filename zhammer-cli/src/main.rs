// SPDX-License-Identifier: GPL-3.0-only

//! zhammer - zram lifecycle manager driven by a ztab

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use nix::sys::signal::{self, SigHandler, Signal};
use tracing_subscriber::EnvFilter;
use zhammer_core::{Action, Host, Invocation, Report, Settings, Table, ZhammerError, selection};
use zhammer_sys::{
    CommandExecutor, DeviceControlSurface, DryRunControl, DryRunExecutor, ShellExecutor,
    SysfsControl,
};

/// Advanced zram management utility
#[derive(Parser, Debug)]
#[command(name = "zhammer", version, about, long_about = None)]
struct Cli {
    /// Configure all zram devices with defaults
    #[arg(short, long)]
    all: bool,

    /// Set verbosity level
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only configure devices that match this type. Useful only with -a
    #[arg(short = 't', long = "type")]
    process_type: Option<String>,

    /// Read entries from this file instead of /etc/ztab
    #[arg(short = 'f', long = "alternate-ztab-file")]
    ztab: Option<PathBuf>,

    /// Log commands and sysfs writes without performing them
    #[arg(long)]
    dry_run: bool,

    action: ActionArg,

    /// ztab number or named device to configure
    device: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ActionArg {
    Online,
    Offline,
}

impl From<ActionArg> for Action {
    fn from(value: ActionArg) -> Self {
        match value {
            ActionArg::Online => Action::Online,
            ActionArg::Offline => Action::Offline,
        }
    }
}

fn log_filter(verbose: u8) -> EnvFilter {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

extern "C" fn on_interrupt(_: libc::c_int) {
    // Entries already processed keep their new state.
    unsafe { libc::_exit(0) }
}

fn install_interrupt_handler() {
    if let Err(e) = unsafe { signal::signal(Signal::SIGINT, SigHandler::Handler(on_interrupt)) } {
        tracing::warn!("Failed to install SIGINT handler: {}", e);
    }
}

fn exit_code(error: &anyhow::Error) -> u8 {
    error
        .downcast_ref::<ZhammerError>()
        .map_or(2, ZhammerError::exit_code)
}

fn run(cli: Cli) -> Result<Vec<Report>> {
    let settings = Settings::resolve(cli.ztab, cli.dry_run);
    let invocation = Invocation {
        action: cli.action.into(),
        device: cli.device,
        process_all: cli.all,
        process_type: cli.process_type,
    };

    tracing::info!("Processing from ztab: {:?}", settings.ztab_path);
    if invocation.process_all {
        match invocation.process_type.as_deref() {
            Some(kind) => tracing::info!("Processing all devices of type {}", kind),
            None => tracing::info!("Processing all devices"),
        }
    }

    let table = Table::load(&settings.ztab_path)?;

    if !settings.dry_run && unsafe { libc::geteuid() } != 0 {
        tracing::warn!("Not running as root; device changes will likely fail");
    }

    let (executor, control): (Box<dyn CommandExecutor>, Box<dyn DeviceControlSurface>) =
        if settings.dry_run {
            (Box::new(DryRunExecutor), Box::new(DryRunControl))
        } else {
            (
                Box::new(ShellExecutor::new().context("cannot run external commands")?),
                Box::new(SysfsControl::new(&settings.sysfs_root)),
            )
        };
    let host = Host::new(executor.as_ref(), control.as_ref());

    Ok(selection::execute(&table, &invocation, &host, print_report)?)
}

/// Notices go out as each entry finishes; an interrupt exits without unwinding.
fn print_report(report: &Report) {
    for notice in &report.notices {
        println!("{notice}");
    }
    for record in report.tolerated() {
        tracing::debug!(
            "{}: {} failed and was ignored: {:?}",
            report.entry,
            record.step,
            record.outcome
        );
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter(cli.verbose))
        .init();
    install_interrupt_handler();

    match run(cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            let code = exit_code(&e);
            eprintln!("zhammer: {e:#}");
            if code == 2 {
                eprintln!("           for help use --help");
            }
            ExitCode::from(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_batch_invocation() {
        let cli = Cli::try_parse_from(["zhammer", "-a", "-vv", "-t", "swap", "offline"]).unwrap();
        assert!(cli.all);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.process_type.as_deref(), Some("swap"));
        assert!(matches!(cli.action, ActionArg::Offline));
        assert!(cli.device.is_none());
    }

    #[test]
    fn parses_device_and_alternate_file() {
        let cli = Cli::try_parse_from(["zhammer", "-f", "/tmp/ztab", "online", "swap0"]).unwrap();
        assert_eq!(cli.ztab, Some(PathBuf::from("/tmp/ztab")));
        assert_eq!(cli.device.as_deref(), Some("swap0"));
    }

    #[test]
    fn rejects_unknown_action() {
        assert!(Cli::try_parse_from(["zhammer", "restart"]).is_err());
    }

    #[test]
    fn maps_errors_to_exit_codes() {
        let missing = anyhow::Error::new(ZhammerError::NoSuchEntry("swap9".into()));
        assert_eq!(exit_code(&missing), 1);

        let ambiguous = anyhow::Error::new(ZhammerError::UsageAmbiguous);
        assert_eq!(exit_code(&ambiguous), 2);

        assert_eq!(exit_code(&anyhow::anyhow!("boom")), 2);
    }
}
