//! Fog-of-war reveal (§4.7).

use crate::constants::FOG_REVEAL_SIZE;

/// Every in-bounds cell in a `size × size` square centered (as evenly as
/// possible) on `center`. For even `size` the per-axis offset range is
/// `[-size/2, size/2 - 1]`.
pub fn reveal_cells(center: (i32, i32), size: i32, bounds: (i32, i32)) -> Vec<(i32, i32)> {
    let half = size / 2;
    let (width, height) = bounds;
    let mut cells = Vec::new();
    for dx in -half..half {
        for dy in -half..half {
            let x = center.0 + dx;
            let y = center.1 + dy;
            if x >= 0 && x < width && y >= 0 && y < height {
                cells.push((x, y));
            }
        }
    }
    cells
}

/// Convenience wrapper using the game's fixed reveal size.
pub fn reveal_around(center: (i32, i32), bounds: (i32, i32)) -> Vec<(i32, i32)> {
    reveal_cells(center, FOG_REVEAL_SIZE, bounds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveals_36_cells_away_from_any_edge() {
        let cells = reveal_cells((50, 50), 6, (100, 100));
        assert_eq!(cells.len(), 36);
    }

    #[test]
    fn offsets_run_from_negative_half_to_half_minus_one() {
        let cells = reveal_cells((10, 10), 6, (100, 100));
        let xs: Vec<i32> = cells.iter().map(|(x, _)| *x).collect();
        assert!(xs.contains(&7)); // 10 - 3
        assert!(xs.contains(&12)); // 10 + 2
        assert!(!xs.contains(&6));
        assert!(!xs.contains(&13));
    }

    #[test]
    fn clips_at_a_corner_without_producing_out_of_bounds_cells() {
        let cells = reveal_cells((0, 0), 6, (100, 100));
        assert!(cells.iter().all(|&(x, y)| x >= 0 && y >= 0));
        // only the 3x3 quadrant toward positive coordinates survives clipping
        assert_eq!(cells.len(), 9);
    }
}
