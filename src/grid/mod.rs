//! Layout-to-grid reconstruction

mod block;
mod layout;
mod page;

pub use block::Block;
pub use layout::{GridOffset, locate};
pub use page::{Page, compose};

/// A 2D matrix of character cells, row-major
pub type Grid = Vec<Vec<char>>;

/// Cell used for padding and empty space
pub const BLANK: char = ' ';

/// Columns left between horizontally adjacent blocks
pub const BLOCK_HORIZONTAL_SPACER: usize = 4;

/// Rows left between vertically adjacent blocks
pub const BLOCK_VERTICAL_SPACER: usize = 1;
