use crate::error::ConfigError;
use crate::state::{RotationTiming, DEFAULT_MS_PER_RADIAN};
use crate::voxel::ShellParams;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Minimum unit scale used in the terminal, where a pixel is half a cell
pub const TERMINAL_MIN_SCALE: f64 = 1.0;

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(version, about = "Rotating voxel dome and blueprint ring previews")]
pub struct Cli {
    #[command(flatten)]
    pub dome: DomeArgs,

    /// Only run one of the previews
    #[arg(long, value_enum)]
    pub only: Option<PreviewKind>,

    /// Delay between frames in milliseconds
    #[arg(long, default_value_t = 16)]
    pub frame_ms: u64,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render a single frame to a PNG file
    Snapshot(SnapshotArgs),
}

#[derive(Debug, Clone, Args)]
pub struct DomeArgs {
    /// Dome radius in voxels
    #[arg(long, global = true, default_value_t = 11, allow_negative_numbers = true)]
    pub radius: i64,

    /// Shell thickness in voxels
    #[arg(long, global = true, default_value_t = 1, allow_negative_numbers = true)]
    pub thickness: i64,

    /// Build a solid hemisphere instead of a shell
    #[arg(long, global = true)]
    pub filled: bool,

    /// Lower bound of the unit scale in logical pixels
    #[arg(long, global = true)]
    pub min_scale: Option<f64>,

    /// Rotation speed in milliseconds per radian
    #[arg(long, global = true, default_value_t = DEFAULT_MS_PER_RADIAN)]
    pub ms_per_radian: f64,
}

impl DomeArgs {
    pub fn shell(&self) -> Result<ShellParams, ConfigError> {
        ShellParams::new(self.radius, self.thickness, self.filled)
    }

    pub fn timing(&self) -> RotationTiming {
        RotationTiming {
            ms_per_radian: self.ms_per_radian,
        }
    }

    /// Dome style with the scale floor overridden from the command line
    pub fn style(&self, default_min_scale: f64) -> DomeStyle {
        DomeStyle {
            min_scale: self.min_scale.unwrap_or(default_min_scale),
            ..DomeStyle::default()
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct SnapshotArgs {
    /// Which preview to render
    #[arg(long, value_enum, default_value_t = PreviewKind::Dome)]
    pub preview: PreviewKind,

    /// Logical width
    #[arg(long, default_value_t = 420.0)]
    pub width: f64,

    /// Logical height
    #[arg(long, default_value_t = 300.0)]
    pub height: f64,

    /// Device pixels per logical pixel
    #[arg(long, default_value_t = 1.0)]
    pub pixel_ratio: f64,

    /// Animation time of the frame in milliseconds
    #[arg(long, default_value_t = 0.0)]
    pub time_ms: f64,

    /// Output PNG path
    #[arg(short, long)]
    pub output: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PreviewKind {
    Dome,
    Ring,
}

impl PreviewKind {
    pub fn name(&self) -> &'static str {
        match self {
            PreviewKind::Dome => "dome",
            PreviewKind::Ring => "ring",
        }
    }
}

/// Layout and decoration of the dome preview, relative to the surface size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomeStyle {
    /// `min(width, height)` is divided by this to get the unit scale
    pub scale_divisor: f64,
    pub min_scale: f64,
    /// Dome base centre as fractions of width and height
    pub origin: [f64; 2],
    /// Block edge as a fraction of the unit scale
    pub block_ratio: f64,
    pub min_block_size: f64,
    /// Floor shadow centre and radii as fractions of width and height
    pub shadow_center: [f64; 2],
    pub shadow_radii: [f64; 2],
    /// Apex highlight lift, in radii times scale
    pub apex_lift: f64,
    /// Apex highlight radii, in block sizes
    pub apex_radii: [f64; 2],
}

impl Default for DomeStyle {
    fn default() -> Self {
        DomeStyle {
            scale_divisor: 42.0,
            min_scale: 4.0,
            origin: [0.5, 0.72],
            block_ratio: 0.9,
            min_block_size: 2.0,
            shadow_center: [0.55, 0.78],
            shadow_radii: [0.18, 0.06],
            apex_lift: 1.05,
            apex_radii: [2.3, 1.2],
        }
    }
}

/// Grid geometry of the blueprint ring preview
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingStyle {
    /// Cells per side
    pub grid: u32,
    pub padding: f64,
    pub min_cell: f64,
    /// Grid lines are drawn from this cell size up
    pub grid_line_min_cell: f64,
    /// Ring radius as a fraction of the grid
    pub radius_ratio: f64,
    /// Half-width of the ring band, in cells
    pub band: f64,
}

impl Default for RingStyle {
    fn default() -> Self {
        RingStyle {
            grid: 32,
            padding: 14.0,
            min_cell: 2.0,
            grid_line_min_cell: 6.0,
            radius_ratio: 0.33,
            band: 0.55,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_the_landing_page_dome() {
        let cli = Cli::parse_from(["dome3d"]);
        assert_eq!(cli.dome.radius, 11);
        assert_eq!(cli.dome.thickness, 1);
        assert!(!cli.dome.filled);
        assert_eq!(cli.frame_ms, 16);
        assert!(cli.command.is_none());
        assert_eq!(cli.dome.timing(), RotationTiming::default());
        assert_eq!(cli.dome.style(4.0), DomeStyle::default());
        assert_eq!(cli.dome.shell().map(|s| s.radius()), Ok(11));
    }

    #[test]
    fn negative_radius_parses_then_fails_validation() {
        let cli = Cli::parse_from(["dome3d", "--radius", "-2"]);
        assert_eq!(cli.dome.shell(), Err(ConfigError::InvalidRadius(-2)));
    }

    #[test]
    fn min_scale_overrides_style() {
        let cli = Cli::parse_from(["dome3d", "--min-scale", "2.5", "--only", "dome"]);
        assert_eq!(cli.dome.style(TERMINAL_MIN_SCALE).min_scale, 2.5);
        assert_eq!(cli.only, Some(PreviewKind::Dome));
    }

    #[test]
    fn snapshot_subcommand_parses() {
        let cli = Cli::parse_from([
            "dome3d",
            "--filled",
            "snapshot",
            "--preview",
            "ring",
            "--pixel-ratio",
            "2",
            "-o",
            "ring.png",
        ]);
        assert!(cli.dome.filled);
        match cli.command {
            Some(Command::Snapshot(args)) => {
                assert_eq!(args.preview, PreviewKind::Ring);
                assert_eq!(args.pixel_ratio, 2.0);
                assert_eq!(args.width, 420.0);
                assert_eq!(args.output, PathBuf::from("ring.png"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn dome_flags_are_accepted_after_the_subcommand() {
        let cli = Cli::parse_from([
            "dome3d",
            "snapshot",
            "--radius",
            "5",
            "--thickness",
            "2",
            "--min-scale",
            "3",
            "-o",
            "dome.png",
        ]);
        assert_eq!(cli.dome.radius, 5);
        assert_eq!(cli.dome.thickness, 2);
        assert_eq!(cli.dome.style(4.0).min_scale, 3.0);
        assert!(matches!(cli.command, Some(Command::Snapshot(_))));
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
