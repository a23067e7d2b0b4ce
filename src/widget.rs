use crate::block::{project, ProjectionParams};
use crate::config::{DomeArgs, DomeStyle, PreviewKind, RingStyle};
use crate::error::PreviewError;
use crate::graphics::{Canvas, Rgba};
use crate::render::render;
use crate::state::{ring_pulse, RotationTiming};
use crate::voxel::{ShellParams, Voxel};
use log::{info, trace};

const FLOOR_SHADOW: Rgba = Rgba::new(0, 0, 0, 0.18);
const APEX_HIGHLIGHT: Rgba = Rgba::new(255, 154, 61, 0.14);
const GRID_LINE: Rgba = Rgba::new(255, 255, 255, 0.08);

/// One animated preview, redrawn in full every frame
pub trait Preview {
    fn name(&self) -> &'static str;

    /// Draws the frame at `elapsed_ms` onto `canvas`
    fn draw_frame(&mut self, canvas: &mut dyn Canvas, elapsed_ms: f64);
}

/// Builds one preview, validating the dome configuration once
pub fn build_preview(
    kind: PreviewKind,
    dome: &DomeArgs,
    default_min_scale: f64,
) -> Result<Box<dyn Preview>, PreviewError> {
    match kind {
        PreviewKind::Ring => Ok(Box::new(RingWidget::default())),
        PreviewKind::Dome => {
            let shell = dome.shell()?;
            let widget = DomeWidget::new(shell, dome.timing(), dome.style(default_min_scale));
            info!(
                "dome built: radius {}, thickness {}, filled {}, {} voxels",
                shell.radius(),
                shell.thickness(),
                shell.filled(),
                widget.voxels().len()
            );
            Ok(Box::new(widget))
        }
    }
}

/// Rotating voxel hemisphere
pub struct DomeWidget {
    voxels: Vec<Voxel>,
    radius: f64,
    timing: RotationTiming,
    style: DomeStyle,
}

impl DomeWidget {
    /// Builds the voxel set once; frames only change its orientation
    pub fn new(shell: ShellParams, timing: RotationTiming, style: DomeStyle) -> Self {
        DomeWidget {
            voxels: shell.build(),
            radius: shell.radius() as f64,
            timing,
            style,
        }
    }

    pub fn voxels(&self) -> &[Voxel] {
        &self.voxels
    }

    /// Unit scale for a surface of the given size
    pub fn scale_for(&self, width: f64, height: f64) -> f64 {
        (width.min(height) / self.style.scale_divisor).max(self.style.min_scale)
    }

    pub fn block_size_for(&self, scale: f64) -> f64 {
        (scale * self.style.block_ratio).floor().max(self.style.min_block_size)
    }
}

impl Preview for DomeWidget {
    fn name(&self) -> &'static str {
        "dome"
    }

    fn draw_frame(&mut self, canvas: &mut dyn Canvas, elapsed_ms: f64) {
        let (w, h) = canvas.measure_current_size();
        canvas.clear_and_fill_background(w, h);

        let style = &self.style;
        canvas.fill_ellipse(
            w * style.shadow_center[0],
            h * style.shadow_center[1],
            w * style.shadow_radii[0],
            h * style.shadow_radii[1],
            FLOOR_SHADOW,
        );

        let scale = self.scale_for(w, h);
        let params = ProjectionParams {
            scale,
            origin: [w * style.origin[0], h * style.origin[1]],
            radius: self.radius,
        };
        let angle = self.timing.angle_at(elapsed_ms);

        let mut blocks = project(&self.voxels, angle, &params);
        let block_size = self.block_size_for(scale);
        render(&mut blocks, block_size, canvas);

        let [cx, cy] = params.origin;
        canvas.fill_ellipse(
            cx,
            cy - self.radius * scale * style.apex_lift,
            block_size * style.apex_radii[0],
            block_size * style.apex_radii[1],
            APEX_HIGHLIGHT,
        );
        trace!("dome frame: angle {angle:.3}, {} blocks", blocks.len());
    }
}

/// Pulsing ring drawn on a square blueprint grid
pub struct RingWidget {
    style: RingStyle,
}

impl RingWidget {
    pub fn new(style: RingStyle) -> Self {
        RingWidget { style }
    }

    /// Whether the grid cell `(x, z)` lies on a ring of radius `r`
    pub fn cell_on_ring(&self, x: u32, z: u32, r: f64) -> bool {
        let mid = (self.style.grid as f64 - 1.0) / 2.0;
        let dx = x as f64 - mid;
        let dz = z as f64 - mid;
        ((dx * dx + dz * dz).sqrt() - r).abs() <= self.style.band
    }

    pub fn radius_at(&self, elapsed_ms: f64) -> f64 {
        self.style.grid as f64 * self.style.radius_ratio * ring_pulse(elapsed_ms)
    }

    /// Cell edge for a surface of the given size
    pub fn cell_size_for(&self, width: f64, height: f64) -> f64 {
        let grid = self.style.grid as f64;
        let pad = self.style.padding * 2.0;
        ((width - pad) / grid)
            .min((height - pad) / grid)
            .floor()
            .max(self.style.min_cell)
    }
}

impl Default for RingWidget {
    fn default() -> Self {
        RingWidget::new(RingStyle::default())
    }
}

impl Preview for RingWidget {
    fn name(&self) -> &'static str {
        "ring"
    }

    fn draw_frame(&mut self, canvas: &mut dyn Canvas, elapsed_ms: f64) {
        let (w, h) = canvas.measure_current_size();
        canvas.clear_and_fill_background(w, h);

        let grid = self.style.grid;
        let s = self.cell_size_for(w, h);
        let map = s * grid as f64;
        let ox = ((w - map) / 2.0).floor();
        let oy = ((h - map) / 2.0).floor();

        if s >= self.style.grid_line_min_cell {
            for i in 0..=grid {
                let offset = i as f64 * s;
                canvas.draw_line(ox + offset, oy, ox + offset, oy + map, GRID_LINE);
                canvas.draw_line(ox, oy + offset, ox + map, oy + offset, GRID_LINE);
            }
        }

        let r = self.radius_at(elapsed_ms);
        for z in 0..grid {
            for x in 0..grid {
                if self.cell_on_ring(x, z, r) {
                    canvas.draw_unit_block(ox + x as f64 * s, oy + z as f64 * s, s - 1.0);
                }
            }
        }
        trace!("ring frame: radius {r:.3}, cell {s}");
    }
}
