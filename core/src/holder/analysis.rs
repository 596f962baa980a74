//! Closed-form expectations for the finished holder.
//!
//! These are derived from [`HolderParams`] alone, independent of any kernel,
//! so kernel output can be checked against them.

use super::params::HolderParams;
use crate::geometry::{Point3, Vector3};
use crate::kernel::{BoundingBox, Point3D};

/// Axis-aligned bounds of a cylinder with base centre `base`, unit `axis`.
pub fn cylinder_bounds(base: &Point3, axis: &Vector3, radius: f64, height: f64) -> BoundingBox {
    let top = base + axis * height;
    let mut min = [0.0; 3];
    let mut max = [0.0; 3];
    for i in 0..3 {
        // Rim half-extent along world axis i.
        let reach = radius * (1.0 - axis[i] * axis[i]).max(0.0).sqrt();
        min[i] = base[i].min(top[i]) - reach;
        max[i] = base[i].max(top[i]) + reach;
    }
    BoundingBox::new(Point3D::from_array(min), Point3D::from_array(max))
}

/// Bounds of the finished holder: the frame block plus both bosses.
///
/// Cuts never grow a solid, so the bores do not contribute.
pub fn expected_bounds(params: &HolderParams) -> BoundingBox {
    let frame = BoundingBox::new(
        Point3D::origin(),
        Point3D::new(params.outer.x, params.outer.y, params.outer.z),
    );
    let axis = params.feature_axis();
    params.boss_positions.both().iter().fold(frame, |acc, pos| {
        let base = params.feature_base(pos);
        acc.union(&cylinder_bounds(&base, &axis, params.boss.radius, params.boss.height))
    })
}

/// Length of the overlap of `[a0, a1]` and `[b0, b1]`.
pub fn interval_overlap(a0: f64, a1: f64, b0: f64, b1: f64) -> f64 {
    (a1.min(b1) - a0.max(b0)).max(0.0)
}

/// Area of a disk (centre `cx, cz`, radius `r`) inside the rectangle
/// `[x0, x1] × [z0, z1]`.
///
/// Integrates the clipped chord length with composite Simpson's rule.
pub fn disk_rect_area(cx: f64, cz: f64, r: f64, x0: f64, x1: f64, z0: f64, z1: f64) -> f64 {
    let lo = x0.max(cx - r);
    let hi = x1.min(cx + r);
    if hi <= lo {
        return 0.0;
    }

    let chord = |x: f64| {
        let h = (r * r - (x - cx) * (x - cx)).max(0.0).sqrt();
        interval_overlap(cz - h, cz + h, z0, z1)
    };

    const INTERVALS: usize = 8192;
    let step = (hi - lo) / INTERVALS as f64;
    let mut sum = chord(lo) + chord(hi);
    for i in 1..INTERVALS {
        let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
        sum += weight * chord(lo + step * i as f64);
    }
    sum * step / 3.0
}

/// Exact volume of the finished holder.
///
/// Accounts for each boss overlapping the frame's side wall and for the part
/// of each bore that runs outside its boss. Returns `None` unless the frame
/// is a straight prism along Y and the features run along Y, which is the
/// layout this derivation covers.
pub fn expected_volume(params: &HolderParams) -> Option<f64> {
    let axis = params.feature_axis();
    let along_y = (axis.y.abs() - 1.0).abs() < 1e-9;
    let prism = params.inner_offset.y.abs() < 1e-9 && (params.inner.y - params.outer.y).abs() < 1e-9;
    if !along_y || !prism {
        return None;
    }

    let outer = &params.outer;
    let inner = &params.inner;
    let off = &params.inner_offset;
    let frame_volume = outer.volume() - inner.volume();

    // Frame cross-section in the XZ plane: outer rectangle minus cavity.
    let section_area = |cx: f64, cz: f64, r: f64| {
        disk_rect_area(cx, cz, r, 0.0, outer.x, 0.0, outer.z)
            - disk_rect_area(cx, cz, r, off.x, off.x + inner.x, off.z, off.z + inner.z)
    };
    let span = |base: &Point3, height: f64| {
        let a = base.y;
        let b = base.y + axis.y * height;
        (a.min(b), a.max(b))
    };
    let (frame_y0, frame_y1) = (0.0, outer.y);

    let mut volume = frame_volume;
    for (boss_pos, bore_pos) in params
        .boss_positions
        .both()
        .iter()
        .zip(params.bore_positions.both().iter())
    {
        let boss_base = params.feature_base(boss_pos);
        let bore_base = params.feature_base(bore_pos);
        let (boss_y0, boss_y1) = span(&boss_base, params.boss.height);
        let (bore_y0, bore_y1) = span(&bore_base, params.bore.height);

        // Boss adds its volume minus what already sits in the frame.
        let boss_in_frame = section_area(boss_base.x, boss_base.z, params.boss.radius)
            * interval_overlap(boss_y0, boss_y1, frame_y0, frame_y1);
        volume += params.boss.volume() - boss_in_frame;

        // Bore removes material wherever boss or frame is present.
        let in_boss = interval_overlap(bore_y0, bore_y1, boss_y0, boss_y1);
        let in_frame = interval_overlap(bore_y0, bore_y1, frame_y0, frame_y1);
        let in_both = interval_overlap(
            bore_y0,
            bore_y1,
            boss_y0.max(frame_y0),
            boss_y1.min(frame_y1),
        );
        let bore_in_section = section_area(bore_base.x, bore_base.z, params.bore.radius);
        volume -= params.bore.cross_section_area() * in_boss
            + bore_in_section * (in_frame - in_both);
    }

    Some(volume)
}
