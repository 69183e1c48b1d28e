//! # Field of View
//!
//! Recursive shadowcasting. The area around the origin is split into eight
//! octants; each octant is scanned row by row moving away from the origin,
//! and every opaque cell narrows the range of slopes still lit in the rows
//! behind it.

use crate::game::Position;

/// Octant transforms as `(xx, xy, yx, yy)`.
const OCTANTS: [(i32, i32, i32, i32); 8] = [
    (1, 0, 0, 1),
    (0, 1, 1, 0),
    (0, -1, 1, 0),
    (-1, 0, 0, 1),
    (-1, 0, 0, -1),
    (0, -1, -1, 0),
    (0, 1, -1, 0),
    (1, 0, 0, -1),
];

/// Computes the cells visible from `origin` within `radius`.
///
/// `is_transparent` must answer `false` for positions off the map; `mark` is
/// called for every lit cell (possibly more than once for cells on octant
/// borders). Opaque cells bordering lit space are themselves lit, so walls
/// around a room are visible from inside it.
///
/// # Examples
///
/// ```
/// use undercroft::{compute_fov, Position};
///
/// let mut lit = Vec::new();
/// compute_fov(Position::new(0, 0), 2, |_| true, |pos| lit.push(pos));
/// assert!(lit.contains(&Position::new(0, 0)));
/// assert!(lit.contains(&Position::new(2, 0)));
/// assert!(!lit.contains(&Position::new(2, 2)));
/// ```
pub fn compute_fov<T, M>(origin: Position, radius: i32, is_transparent: T, mut mark: M)
where
    T: Fn(Position) -> bool,
    M: FnMut(Position),
{
    mark(origin);
    if radius <= 0 {
        return;
    }

    let mut caster = ShadowCaster {
        origin,
        radius,
        is_transparent: &is_transparent,
        mark: &mut mark,
    };
    for transform in OCTANTS {
        caster.cast(1, 1.0, 0.0, transform);
    }
}

struct ShadowCaster<'a, T, M> {
    origin: Position,
    radius: i32,
    is_transparent: &'a T,
    mark: &'a mut M,
}

impl<T, M> ShadowCaster<'_, T, M>
where
    T: Fn(Position) -> bool,
    M: FnMut(Position),
{
    fn cast(&mut self, row: i32, mut start: f64, end: f64, transform: (i32, i32, i32, i32)) {
        if start < end {
            return;
        }

        let (xx, xy, yx, yy) = transform;
        let radius_squared = self.radius * self.radius;
        let mut new_start = 0.0;

        for distance in row..=self.radius {
            let dy = -distance;
            let mut blocked = false;

            for dx in -distance..=0 {
                let pos = Position::new(
                    self.origin.x + dx * xx + dy * xy,
                    self.origin.y + dx * yx + dy * yy,
                );
                let left_slope = (dx as f64 - 0.5) / (dy as f64 + 0.5);
                let right_slope = (dx as f64 + 0.5) / (dy as f64 - 0.5);

                if start < right_slope {
                    continue;
                } else if end > left_slope {
                    break;
                }

                if dx * dx + dy * dy <= radius_squared {
                    (self.mark)(pos);
                }

                let transparent = (self.is_transparent)(pos);
                if blocked {
                    if !transparent {
                        new_start = right_slope;
                        continue;
                    }
                    blocked = false;
                    start = new_start;
                } else if !transparent && distance < self.radius {
                    blocked = true;
                    self.cast(distance + 1, start, left_slope, transform);
                    new_start = right_slope;
                }
            }

            if blocked {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Parses a map where `#` is opaque and anything else is transparent.
    fn grid(rows: &[&str]) -> Vec<Vec<bool>> {
        rows.iter()
            .map(|row| row.chars().map(|c| c != '#').collect())
            .collect()
    }

    fn lit_from(cells: &[Vec<bool>], origin: Position, radius: i32) -> HashSet<Position> {
        let transparent = |pos: Position| {
            pos.y >= 0
                && pos.x >= 0
                && cells
                    .get(pos.y as usize)
                    .and_then(|row| row.get(pos.x as usize))
                    .copied()
                    .unwrap_or(false)
        };
        let mut lit = HashSet::new();
        compute_fov(origin, radius, transparent, |pos| {
            lit.insert(pos);
        });
        lit
    }

    #[test]
    fn test_open_room_fully_visible() {
        let cells = grid(&[
            "#######", //
            "#.....#", //
            "#.....#", //
            "#.....#", //
            "#######",
        ]);
        let lit = lit_from(&cells, Position::new(3, 2), 8);

        for y in 0..5 {
            for x in 0..7 {
                assert!(lit.contains(&Position::new(x, y)), "({x}, {y}) should be lit");
            }
        }
    }

    #[test]
    fn test_wall_casts_shadow() {
        let cells = grid(&[
            ".........", //
            "....#....", //
            ".........", //
            ".........",
        ]);
        let lit = lit_from(&cells, Position::new(4, 3), 8);

        // The pillar itself is visible but the cell straight behind it is not
        assert!(lit.contains(&Position::new(4, 1)));
        assert!(!lit.contains(&Position::new(4, 0)));
        assert!(lit.contains(&Position::new(0, 0)));
    }

    #[test]
    fn test_radius_limits_view() {
        let cells = vec![vec![true; 30]; 30];
        let origin = Position::new(15, 15);
        let lit = lit_from(&cells, origin, 4);

        assert!(lit.contains(&Position::new(19, 15)));
        assert!(!lit.contains(&Position::new(20, 15)));
        assert!(!lit.contains(&Position::new(19, 19)));
        for pos in &lit {
            let dx = pos.x - origin.x;
            let dy = pos.y - origin.y;
            assert!(dx * dx + dy * dy <= 16);
        }
    }

    #[test]
    fn test_corridor_blocks_side_rooms() {
        let cells = grid(&[
            "###########", //
            "#.........#", //
            "#####.#####", //
            "#####.#####", //
            "#.........#", //
            "###########",
        ]);
        let lit = lit_from(&cells, Position::new(5, 1), 10);

        assert!(lit.contains(&Position::new(5, 3)));
        assert!(lit.contains(&Position::new(5, 4)));
        assert!(!lit.contains(&Position::new(1, 4)));
        assert!(!lit.contains(&Position::new(9, 4)));
    }

    #[test]
    fn test_symmetric_octants_on_open_field() {
        let cells = vec![vec![true; 21]; 21];
        let origin = Position::new(10, 10);
        let lit = lit_from(&cells, origin, 6);

        for pos in &lit {
            let mirrored = Position::new(2 * origin.x - pos.x, 2 * origin.y - pos.y);
            let transposed = Position::new(
                origin.x + (pos.y - origin.y),
                origin.y + (pos.x - origin.x),
            );
            assert!(lit.contains(&mirrored));
            assert!(lit.contains(&transposed));
        }
    }

    #[test]
    fn test_origin_off_map_edge_is_safe() {
        let cells = grid(&["...", "...", "..."]);
        let lit = lit_from(&cells, Position::new(0, 0), 5);

        assert!(lit.contains(&Position::new(2, 2)));
        // Positions off the map may be reported but never panic
        assert!(lit.iter().filter(|p| p.x >= 0 && p.y >= 0 && p.x < 3 && p.y < 3).count() == 9);
    }

    #[test]
    fn test_zero_radius_lights_only_origin() {
        let cells = vec![vec![true; 5]; 5];
        let lit = lit_from(&cells, Position::new(2, 2), 0);
        assert_eq!(lit.len(), 1);
    }
}
