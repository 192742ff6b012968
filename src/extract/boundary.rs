use crate::{assets::raster::AlphaGrid, foundation::core::GridPoint};

/// Moore neighborhood, clockwise on screen (y grows downward), starting east.
const DIRS: [(isize, isize); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

const WEST: usize = 4;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Result of tracing one outer contour.
pub struct BoundaryTrace {
    /// Boundary cells in trace order, in image coordinates. The loop is implicitly closed.
    pub points: Vec<GridPoint>,
    /// `false` when the follower hit its iteration cap before returning to the start cell.
    pub closed: bool,
}

impl BoundaryTrace {
    /// `true` when no foreground cell was found.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Trace the outer boundary of the first foreground region (opacity `>= threshold`)
/// met in row-major order, using 8-connected Moore-neighbor following.
///
/// Each step sweeps the neighbors clockwise, starting at the background cell that was
/// examined just before the current cell was accepted, and moves to the first foreground
/// neighbor. Tracing stops on returning to the start cell or after `width * height` steps.
pub fn trace_boundary(grid: &AlphaGrid, threshold: u8) -> BoundaryTrace {
    let w = grid.width();
    let h = grid.height();
    let mask = grid.binarize(threshold);
    let fg = |x: isize, y: isize| -> bool {
        x >= 0 && y >= 0 && (x as usize) < w && (y as usize) < h && mask[y as usize * w + x as usize]
    };

    let Some(start) = find_start(w, h, &fg) else {
        return BoundaryTrace::default();
    };

    let origin = grid.origin();
    let to_image = |(x, y): (isize, isize)| {
        GridPoint::new(origin.x + x as i32, origin.y + y as i32)
    };

    let mut points = vec![to_image(start)];
    let mut cur = start;
    let mut search = WEST;
    let cap = w * h;

    for _ in 0..cap {
        let Some(dir) = (0..8)
            .map(|k| (search + k) % 8)
            .find(|&d| fg(cur.0 + DIRS[d].0, cur.1 + DIRS[d].1))
        else {
            // Isolated cell.
            return BoundaryTrace {
                points,
                closed: true,
            };
        };

        cur = (cur.0 + DIRS[dir].0, cur.1 + DIRS[dir].1);
        if cur == start {
            return BoundaryTrace {
                points,
                closed: true,
            };
        }
        points.push(to_image(cur));
        search = backtrack_dir(dir);
    }

    tracing::warn!(
        steps = cap,
        points = points.len(),
        "boundary trace incomplete: iteration cap reached"
    );
    BoundaryTrace {
        points,
        closed: false,
    }
}

/// Direction, seen from the new cell, of the background cell swept just before it.
fn backtrack_dir(arrival: usize) -> usize {
    if arrival % 2 == 0 {
        (arrival + 6) % 8
    } else {
        (arrival + 5) % 8
    }
}

fn find_start(w: usize, h: usize, fg: &impl Fn(isize, isize) -> bool) -> Option<(isize, isize)> {
    for y in 0..h as isize {
        for x in 0..w as isize {
            if !fg(x, y) {
                continue;
            }
            let on_edge = x == 0 || y == 0 || x as usize == w - 1 || y as usize == h - 1;
            if on_edge || !fg(x, y - 1) || !fg(x - 1, y) {
                return Some((x, y));
            }
        }
    }
    None
}

#[cfg(test)]
#[path = "../../tests/unit/extract/boundary.rs"]
mod tests;
