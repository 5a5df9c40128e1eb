// projection.rs: place tiles on screen for a given yaw and radius
//
// Each tile sits on the sphere at its base rotation. The sphere turns by yaw
// about the vertical axis and is pushed back by one radius, so the front tile
// lands on the screen plane; the eye sits two radii in front of it.

use dome_gallery::layout::{grid_unit_deg, TilePlacement};
use glam::{Quat, Vec3};

/// Fraction of a grid cell a tile covers; the rest is the gap between tiles.
const TILE_FILL: f32 = 0.92;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedTile {
    pub index: usize,
    /// Screen-space corners: top-left, top-right, bottom-right, bottom-left.
    pub corners: [[f32; 2]; 4],
    /// Distance along the view axis; larger is farther.
    pub depth: f32,
    /// Cosine between the tile normal and the direction to the eye.
    pub facing: f32,
}

fn sphere_point(yaw_deg: f32, pitch_deg: f32, radius: f32) -> Vec3 {
    let q = Quat::from_rotation_y(yaw_deg.to_radians())
        * Quat::from_rotation_x(pitch_deg.to_radians());
    q * Vec3::new(0.0, 0.0, radius)
}

/// Visible tiles sorted back to front.
pub fn project_tiles(
    tiles: &[TilePlacement],
    segments: usize,
    yaw_deg: f64,
    radius: f32,
    origin: [f32; 2],
) -> Vec<ProjectedTile> {
    let unit = grid_unit_deg(segments) as f32;
    let spin = Quat::from_rotation_y(yaw_deg.to_radians() as f32);
    let push_back = Vec3::new(0.0, 0.0, -radius);
    let eye_distance = 2.0 * radius;
    let eye = Vec3::new(0.0, 0.0, eye_distance);

    let mut out: Vec<ProjectedTile> = tiles
        .iter()
        .enumerate()
        .filter_map(|(index, tile)| {
            let rot = tile.base_rotation(segments);
            let (ry, rx) = (rot.rotate_y as f32, rot.rotate_x as f32);
            let half_w = unit * tile.size_x as f32 * TILE_FILL / 2.0;
            let half_h = unit * tile.size_y as f32 * TILE_FILL / 2.0;

            let centre = spin * sphere_point(ry, rx, radius) + push_back;
            let normal = (centre - push_back).normalize_or_zero();
            let facing = normal.dot((eye - centre).normalize_or_zero());
            if facing <= 0.0 {
                return None;
            }

            let project = |p: Vec3| {
                let s = eye_distance / (eye_distance - p.z).max(1e-3);
                [origin[0] + p.x * s, origin[1] + p.y * s]
            };
            let corner = |d_yaw: f32, d_pitch: f32| {
                project(spin * sphere_point(ry + d_yaw, rx + d_pitch, radius) + push_back)
            };

            Some(ProjectedTile {
                index,
                corners: [
                    corner(-half_w, -half_h),
                    corner(half_w, -half_h),
                    corner(half_w, half_h),
                    corner(-half_w, half_h),
                ],
                depth: eye_distance - centre.z,
                facing,
            })
        })
        .collect();

    out.sort_by(|a, b| b.depth.total_cmp(&a.depth));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use dome_gallery::{build_tiles, ImageRef};

    #[test]
    fn back_half_is_culled() {
        let tiles = build_tiles(&[ImageRef::new("a")], 35);
        let visible = project_tiles(&tiles, 35, 0.0, 800.0, [640.0, 360.0]);
        assert!(!visible.is_empty());
        assert!(visible.len() < tiles.len());
        assert!(visible.iter().all(|t| t.facing > 0.0));
    }

    #[test]
    fn sorted_back_to_front() {
        let tiles = build_tiles(&[ImageRef::new("a")], 35);
        let visible = project_tiles(&tiles, 35, 42.0, 800.0, [640.0, 360.0]);
        for w in visible.windows(2) {
            assert!(w[0].depth >= w[1].depth);
        }
    }

    #[test]
    fn front_tile_lands_near_screen_centre() {
        let tile = TilePlacement {
            offset_x: 0,
            offset_y: 0,
            size_x: 1,
            size_y: 1,
            image: ImageRef::default(),
        };
        let visible = project_tiles(&[tile], 36, 0.0, 1000.0, [500.0, 500.0]);
        assert_eq!(visible.len(), 1);
        let [tl, _, br, _] = visible[0].corners;
        let mid = [(tl[0] + br[0]) / 2.0, (tl[1] + br[1]) / 2.0];
        assert!((mid[0] - 500.0).abs() < 1.0);
        assert!((mid[1] - 500.0).abs() < 1.0);
    }
}
