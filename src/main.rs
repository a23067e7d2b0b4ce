use anyhow::{bail, Context};
use clap::Parser;
use dome3d::animation::{self, FrameQueue};
use dome3d::config::{Cli, Command, DomeStyle, PreviewKind, SnapshotArgs, TERMINAL_MIN_SCALE};
use dome3d::logging;
use dome3d::snapshot::write_snapshot;
use dome3d::state::AnimationClock;
use dome3d::terminal::{TerminalGuard, TerminalHost};
use dome3d::widget::build_preview;
use std::time::Duration;

fn run(cli: &Cli) -> anyhow::Result<()> {
    let kinds = match cli.only {
        Some(kind) => vec![kind],
        None => vec![PreviewKind::Ring, PreviewKind::Dome],
    };

    let mut host = TerminalHost::new(kinds.len()).context("failed to query terminal size")?;
    let mut frames = FrameQueue::new();
    let handles =
        animation::start_previews(&kinds, &cli.dome, TERMINAL_MIN_SCALE, &mut host, &mut frames);
    if handles.is_empty() {
        bail!("no preview could be started");
    }

    let clock = AnimationClock::start();
    let result = {
        let _guard = TerminalGuard::enter(logging::sink().clone())
            .context("failed to set up the terminal")?;
        host.run(&mut frames, &clock, Duration::from_millis(cli.frame_ms))
    };

    for handle in &handles {
        handle.stop();
    }
    result.context("terminal output failed")
}

fn snapshot(cli: &Cli, args: &SnapshotArgs) -> anyhow::Result<()> {
    let mut preview = build_preview(args.preview, &cli.dome, DomeStyle::default().min_scale)?;
    write_snapshot(
        preview.as_mut(),
        args.width,
        args.height,
        args.pixel_ratio,
        args.time_ms,
        &args.output,
    )
    .with_context(|| format!("failed to write {}", args.output.display()))?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    logging::init();

    let cli = Cli::parse();
    match &cli.command {
        Some(Command::Snapshot(args)) => snapshot(&cli, args),
        None => run(&cli),
    }
}
