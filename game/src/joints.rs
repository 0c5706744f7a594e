use rand::Rng;
use serde::{Deserialize, Serialize};

/// Orientation of one internal seam, seen from the piece above it (vertical joints) or the
/// piece to its left (horizontal joints).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JointShape {
    Knob,
    Indent,
}

/// Knob/indent assignment for every internal seam of a `rows`×`cols` grid.
///
/// - `horizontal` is `rows × (cols-1)`: the seam between (r, c) and (r, c+1).
/// - `vertical` is `(rows-1) × cols`: the seam between (r, c) and (r+1, c).
///
/// Both are stored row-major and never change after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JointTopology {
    rows: u32,
    cols: u32,
    horizontal: Vec<JointShape>,
    vertical: Vec<JointShape>,
}

impl JointTopology {
    /// One independent fair coin per seam.
    pub fn generate<R: Rng + ?Sized>(rows: u32, cols: u32, rng: &mut R) -> Self {
        let mut draw = |count: usize| -> Vec<JointShape> {
            (0..count)
                .map(|_| {
                    if rng.random_bool(0.5) {
                        JointShape::Knob
                    } else {
                        JointShape::Indent
                    }
                })
                .collect()
        };
        let horizontal = draw(horizontal_len(rows, cols));
        let vertical = draw(vertical_len(rows, cols));
        Self {
            rows,
            cols,
            horizontal,
            vertical,
        }
    }

    /// Builds a topology from explicit row-major matrices. Returns `None` if either matrix has
    /// the wrong length for the grid.
    pub fn from_parts(
        rows: u32,
        cols: u32,
        horizontal: Vec<JointShape>,
        vertical: Vec<JointShape>,
    ) -> Option<Self> {
        if horizontal.len() != horizontal_len(rows, cols)
            || vertical.len() != vertical_len(rows, cols)
        {
            return None;
        }
        Some(Self {
            rows,
            cols,
            horizontal,
            vertical,
        })
    }

    /// Same shape for every seam.
    pub fn uniform(rows: u32, cols: u32, shape: JointShape) -> Self {
        Self {
            rows,
            cols,
            horizontal: vec![shape; horizontal_len(rows, cols)],
            vertical: vec![shape; vertical_len(rows, cols)],
        }
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Seam between (`row`, `col`) and (`row`, `col + 1`).
    pub fn horizontal(&self, row: u32, col: u32) -> Option<JointShape> {
        if row >= self.rows || col + 1 >= self.cols {
            return None;
        }
        let stride = (self.cols - 1) as usize;
        self.horizontal
            .get(row as usize * stride + col as usize)
            .copied()
    }

    /// Seam between (`row`, `col`) and (`row + 1`, `col`).
    pub fn vertical(&self, row: u32, col: u32) -> Option<JointShape> {
        if row + 1 >= self.rows || col >= self.cols {
            return None;
        }
        self.vertical
            .get(row as usize * self.cols as usize + col as usize)
            .copied()
    }

    pub fn seam_count(&self) -> usize {
        self.horizontal.len() + self.vertical.len()
    }
}

fn horizontal_len(rows: u32, cols: u32) -> usize {
    rows as usize * cols.saturating_sub(1) as usize
}

fn vertical_len(rows: u32, cols: u32) -> usize {
    rows.saturating_sub(1) as usize * cols as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn matrix_sizes_follow_grid() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let topo = JointTopology::generate(3, 5, &mut rng);
        assert_eq!(topo.seam_count(), 3 * 4 + 2 * 5);
        assert!(topo.horizontal(2, 3).is_some());
        assert!(topo.horizontal(2, 4).is_none());
        assert!(topo.vertical(1, 4).is_some());
        assert!(topo.vertical(2, 0).is_none());
    }

    #[test]
    fn single_piece_has_no_seams() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let topo = JointTopology::generate(1, 1, &mut rng);
        assert_eq!(topo.seam_count(), 0);
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let a = JointTopology::generate(6, 7, &mut ChaCha8Rng::seed_from_u64(99));
        let b = JointTopology::generate(6, 7, &mut ChaCha8Rng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn both_shapes_appear_on_a_large_grid() {
        let topo = JointTopology::generate(20, 20, &mut ChaCha8Rng::seed_from_u64(5));
        let knobs = topo
            .horizontal
            .iter()
            .chain(topo.vertical.iter())
            .filter(|s| **s == JointShape::Knob)
            .count();
        let total = topo.seam_count();
        assert!(knobs > total / 4 && knobs < total * 3 / 4, "{knobs}/{total}");
    }

    #[test]
    fn from_parts_checks_lengths() {
        assert!(JointTopology::from_parts(2, 2, vec![JointShape::Knob; 2], vec![JointShape::Indent; 2]).is_some());
        assert!(JointTopology::from_parts(2, 2, vec![JointShape::Knob; 3], vec![JointShape::Indent; 2]).is_none());
    }
}
