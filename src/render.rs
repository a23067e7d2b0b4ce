//! Painter's-algorithm compositing of projected blocks.
//!
//! There is no depth buffer: blocks are drawn far to near so later blocks
//! cover earlier ones. The full set is re-sorted every frame.

use crate::block::ProjectedBlock;
use crate::graphics::Canvas;
use crate::math::opacity;

/// Stable ascending sort by depth key; exact ties keep their input order
pub fn sort_by_depth(blocks: &mut [ProjectedBlock]) {
    blocks.sort_by(|a, b| a.depth.total_cmp(&b.depth));
}

/// Sorts `blocks` and draws them far to near at their floored positions.
/// Global alpha is left at 1 afterwards.
pub fn render<C: Canvas + ?Sized>(blocks: &mut [ProjectedBlock], block_size: f64, canvas: &mut C) {
    sort_by_depth(blocks);

    for block in blocks.iter() {
        canvas.set_global_alpha(opacity(block.shade));
        canvas.draw_unit_block(
            block.screen_position[0].floor(),
            block.screen_position[1].floor(),
            block_size,
        );
    }
    canvas.set_global_alpha(1.0);
}
