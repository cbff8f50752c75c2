//! Relative placement of blocks on a character grid
//!
//! Each block is placed after its nearest predecessor on each axis: the
//! closest block to its left that shares some of its vertical span, and the
//! closest block above it that shares some of its horizontal span. Offsets are
//! resolved depth-first with an explicit stack and memoised, so every block is
//! placed exactly once per page.

use super::block::Block;
use super::{BLOCK_HORIZONTAL_SPACER, BLOCK_VERTICAL_SPACER};

/// Top-left cell of a block inside the page grid
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GridOffset {
    pub x: usize,
    pub y: usize,
}

impl GridOffset {
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Compute a grid offset for every block, parallel to `blocks`
pub fn locate(blocks: &[Block]) -> Vec<GridOffset> {
    let mut engine = LayoutEngine::new(blocks);

    for index in 0..blocks.len() {
        engine.resolve(index);
    }

    engine.into_offsets()
}

/// Top/bottom spans overlap
fn vertically_aligned(a: &Block, b: &Block) -> bool {
    !(a.top() > b.bottom() || a.bottom() < b.top())
}

/// Left/right spans overlap
fn horizontally_aligned(a: &Block, b: &Block) -> bool {
    !(a.left() > b.right() || a.right() < b.left())
}

fn overlap(a: &Block, b: &Block) -> bool {
    vertically_aligned(a, b) && horizontally_aligned(a, b)
}

fn before_on_left(block: &Block, candidate: &Block) -> bool {
    if candidate.right() <= block.left() {
        return true;
    }

    // An overlapping pair where one block is leftmost and the other topmost
    // would depend on each other; the topmost one wins.
    overlap(block, candidate)
        && candidate.left() < block.left()
        && candidate.top() <= block.top()
}

fn before_on_top(block: &Block, candidate: &Block) -> bool {
    candidate.bottom() <= block.top() || (overlap(block, candidate) && candidate.top() < block.top())
}

fn grid_intersects(a: GridOffset, a_size: (usize, usize), b: GridOffset, b_size: (usize, usize)) -> bool {
    a.x < b.x + b_size.0 && b.x < a.x + a_size.0 && a.y < b.y + b_size.1 && b.y < a.y + a_size.1
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Left,
    Top,
    Place,
}

#[derive(Clone, Copy, Debug)]
struct Frame {
    index: usize,
    stage: Stage,
    x: usize,
    y: usize,
}

impl Frame {
    fn new(index: usize) -> Self {
        Self {
            index,
            stage: Stage::Left,
            x: 0,
            y: 0,
        }
    }
}

struct LayoutEngine<'a> {
    blocks: &'a [Block],
    sizes: Vec<(usize, usize)>,
    nearest_left: Vec<Option<usize>>,
    nearest_top: Vec<Option<usize>>,
    offsets: Vec<Option<GridOffset>>,
}

impl<'a> LayoutEngine<'a> {
    fn new(blocks: &'a [Block]) -> Self {
        let sizes = blocks.iter().map(|b| (b.width(), b.height())).collect();
        let (nearest_left, nearest_top) = (0..blocks.len())
            .map(|index| nearest_predecessors(blocks, index))
            .unzip();

        Self {
            blocks,
            sizes,
            nearest_left,
            nearest_top,
            offsets: vec![None; blocks.len()],
        }
    }

    fn into_offsets(self) -> Vec<GridOffset> {
        self.offsets.into_iter().map(Option::unwrap_or_default).collect()
    }

    /// Resolve one block and whatever it depends on.
    ///
    /// `visiting` is private to this call. A predecessor that is visiting but
    /// not yet placed sits on the current chain, so following it would loop;
    /// that axis falls back to 0 instead.
    fn resolve(&mut self, root: usize) {
        if self.offsets[root].is_some() {
            return;
        }

        let mut visiting = vec![false; self.blocks.len()];
        let mut stack = vec![Frame::new(root)];
        visiting[root] = true;

        while let Some(frame) = stack.last_mut() {
            match frame.stage {
                Stage::Left => {
                    let Some(candidate) = self.nearest_left[frame.index] else {
                        frame.stage = Stage::Top;
                        continue;
                    };

                    if let Some(offset) = self.offsets[candidate] {
                        frame.x = offset.x + self.sizes[candidate].0 + BLOCK_HORIZONTAL_SPACER;
                        frame.stage = Stage::Top;
                    } else if visiting[candidate] {
                        frame.stage = Stage::Top;
                    } else {
                        visiting[candidate] = true;
                        stack.push(Frame::new(candidate));
                    }
                }
                Stage::Top => {
                    let Some(candidate) = self.nearest_top[frame.index] else {
                        frame.stage = Stage::Place;
                        continue;
                    };

                    if let Some(offset) = self.offsets[candidate] {
                        frame.y = offset.y + self.sizes[candidate].1 + BLOCK_VERTICAL_SPACER;
                        frame.stage = Stage::Place;
                    } else if visiting[candidate] {
                        frame.stage = Stage::Place;
                    } else {
                        visiting[candidate] = true;
                        stack.push(Frame::new(candidate));
                    }
                }
                Stage::Place => {
                    let Frame { index, x, y, .. } = *frame;
                    let offset = self.clear_of_placed(index, GridOffset::new(x, y));
                    self.offsets[index] = Some(offset);
                    stack.pop();
                }
            }
        }
    }

    /// Nudge a proposed offset until it intersects no placed block,
    /// alternating between pushing right and pushing down.
    ///
    /// Every push moves strictly past the offending block on one axis, so
    /// this terminates once the offset clears the extent of placed blocks.
    fn clear_of_placed(&self, index: usize, mut offset: GridOffset) -> GridOffset {
        let size = self.sizes[index];
        let mut push_right = true;

        while let Some((other, other_size)) = self
            .offsets
            .iter()
            .zip(&self.sizes)
            .find_map(|(placed, &other_size)| {
                placed
                    .filter(|&placed| grid_intersects(offset, size, placed, other_size))
                    .map(|placed| (placed, other_size))
            })
        {
            if push_right {
                offset.x = other.x + other_size.0 + BLOCK_HORIZONTAL_SPACER;
            } else {
                offset.y = other.y + other_size.1 + BLOCK_VERTICAL_SPACER;
            }
            push_right = !push_right;
        }

        offset
    }
}

/// Nearest block to the left and nearest block above `index`
fn nearest_predecessors(blocks: &[Block], index: usize) -> (Option<usize>, Option<usize>) {
    let block = &blocks[index];
    let mut nearest_left: Option<usize> = None;
    let mut nearest_top: Option<usize> = None;

    for (i, candidate) in blocks.iter().enumerate() {
        if i == index {
            continue;
        }

        if vertically_aligned(block, candidate)
            && before_on_left(block, candidate)
            && nearest_left.is_none_or(|n| candidate.right() > blocks[n].right())
        {
            nearest_left = Some(i);
        }

        if horizontally_aligned(block, candidate)
            && before_on_top(block, candidate)
            && nearest_top.is_none_or(|n| candidate.bottom() > blocks[n].bottom())
        {
            nearest_top = Some(i);
        }
    }

    (nearest_left, nearest_top)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rects_intersect(blocks: &[Block], offsets: &[GridOffset]) -> bool {
        for i in 0..blocks.len() {
            for j in (i + 1)..blocks.len() {
                let a = (blocks[i].width(), blocks[i].height());
                let b = (blocks[j].width(), blocks[j].height());
                if grid_intersects(offsets[i], a, offsets[j], b) {
                    return true;
                }
            }
        }
        false
    }

    #[test]
    fn side_by_side_blocks_get_spacer() {
        let blocks = vec![
            Block::new(0.0, 5.0, 0.0, 1.0, "Hello"),
            Block::new(10.0, 15.0, 0.0, 1.0, "World"),
        ];
        let offsets = locate(&blocks);
        assert_eq!(offsets, vec![GridOffset::new(0, 0), GridOffset::new(9, 0)]);
    }

    #[test]
    fn stacked_blocks_get_row_spacer() {
        let blocks = vec![
            Block::new(0.0, 50.0, 20.0, 30.0, "second"),
            Block::new(0.0, 50.0, 0.0, 10.0, "first\nline"),
        ];
        let offsets = locate(&blocks);
        assert_eq!(offsets[1], GridOffset::new(0, 0));
        assert_eq!(offsets[0], GridOffset::new(0, 3));
    }

    #[test]
    fn nearest_left_is_the_closest_right_edge() {
        let blocks = vec![
            Block::new(0.0, 10.0, 0.0, 10.0, "aa"),
            Block::new(20.0, 30.0, 0.0, 10.0, "bbbbbb"),
            Block::new(40.0, 50.0, 0.0, 10.0, "c"),
        ];
        let offsets = locate(&blocks);
        assert_eq!(offsets[0], GridOffset::new(0, 0));
        assert_eq!(offsets[1], GridOffset::new(6, 0));
        assert_eq!(offsets[2], GridOffset::new(16, 0));
    }

    #[test]
    fn mutually_overlapping_blocks_terminate_without_collision() {
        // b is further left, a is further up: each could claim to precede
        // the other on a different axis.
        let blocks = vec![
            Block::new(10.0, 40.0, 0.0, 20.0, "topmost"),
            Block::new(0.0, 30.0, 5.0, 25.0, "leftmost"),
        ];
        let offsets = locate(&blocks);
        assert_eq!(offsets[0], GridOffset::new(0, 0));
        assert_eq!(offsets[1], GridOffset::new(0, 2));
        assert!(!rects_intersect(&blocks, &offsets));
    }

    #[test]
    fn corner_touching_blocks_break_the_cycle_at_zero() {
        // a sits below b on the top axis while b sits right of a on the
        // left axis, so resolving either one revisits the other.
        let blocks = vec![
            Block::new(0.0, 10.0, 10.0, 20.0, "AAAA"),
            Block::new(10.0, 20.0, 0.0, 10.0, "BB"),
        ];
        let offsets = locate(&blocks);
        assert_eq!(offsets, vec![GridOffset::new(0, 2), GridOffset::new(0, 0)]);
        assert!(!rects_intersect(&blocks, &offsets));
    }

    #[test]
    fn identical_boxes_are_pushed_apart() {
        let blocks = vec![
            Block::new(0.0, 10.0, 0.0, 10.0, "same"),
            Block::new(0.0, 10.0, 0.0, 10.0, "spot"),
        ];
        let offsets = locate(&blocks);
        assert!(!rects_intersect(&blocks, &offsets));
    }

    #[test]
    fn unaligned_blocks_with_wide_text_do_not_collide() {
        let blocks = vec![
            Block::new(0.0, 5.0, 0.0, 1.0, "a very long line of text"),
            Block::new(10.0, 15.0, 5.0, 6.0, "short"),
        ];
        let offsets = locate(&blocks);
        assert!(!rects_intersect(&blocks, &offsets));
    }

    #[test]
    fn dense_random_page_has_no_collisions() {
        let mut blocks = Vec::new();
        let mut seed: u64 = 0x9e37_79b9_7f4a_7c15;
        let mut next = || {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            (seed % 100) as f64
        };
        for i in 0..40 {
            let left = next();
            let top = next();
            let text = "x".repeat(i % 7 + 1) + "\n" + &"y".repeat(i % 3 + 1);
            blocks.push(Block::new(left, left + next() / 4.0, top, top + next() / 8.0, text));
        }
        let offsets = locate(&blocks);
        assert_eq!(offsets.len(), blocks.len());
        assert!(!rects_intersect(&blocks, &offsets));
    }

    #[test]
    fn empty_page_has_no_offsets() {
        assert!(locate(&[]).is_empty());
    }
}
