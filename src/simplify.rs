//! Polyline simplification for traced streamlines.
//!
//! Two phases: a cheap radial-distance pass drops points closer than the
//! tolerance to their kept predecessor, then Douglas-Peucker removes points
//! whose perpendicular deviation from the local chord is within tolerance.
//! All comparisons are done on squared distances.

use bevy::prelude::*;

/// Simplify `points` with the given tolerance. Inputs of two or fewer
/// points pass through unchanged.
pub fn simplify(points: &[Vec2], tolerance: f32) -> Vec<Vec2> {
    if points.len() <= 2 {
        return points.to_vec();
    }
    let sq_tolerance = tolerance * tolerance;
    let reduced = radial_distance(points, sq_tolerance);
    douglas_peucker(&reduced, sq_tolerance)
}

fn radial_distance(points: &[Vec2], sq_tolerance: f32) -> Vec<Vec2> {
    let mut prev = points[0];
    let mut kept = vec![prev];
    let mut point = prev;
    for &next in &points[1..] {
        point = next;
        if point.distance_squared(prev) > sq_tolerance {
            kept.push(point);
            prev = point;
        }
    }
    // The final point always survives.
    if prev != point {
        kept.push(point);
    }
    kept
}

fn douglas_peucker(points: &[Vec2], sq_tolerance: f32) -> Vec<Vec2> {
    let last = points.len() - 1;
    let mut simplified = vec![points[0]];
    dp_step(points, 0, last, sq_tolerance, &mut simplified);
    simplified.push(points[last]);
    simplified
}

fn dp_step(points: &[Vec2], first: usize, last: usize, sq_tolerance: f32, simplified: &mut Vec<Vec2>) {
    let mut max_sq_dist = sq_tolerance;
    let mut index = first;
    for i in (first + 1)..last {
        let sq_dist = sq_segment_distance(points[i], points[first], points[last]);
        if sq_dist > max_sq_dist {
            index = i;
            max_sq_dist = sq_dist;
        }
    }
    if max_sq_dist > sq_tolerance {
        if index - first > 1 {
            dp_step(points, first, index, sq_tolerance, simplified);
        }
        simplified.push(points[index]);
        if last - index > 1 {
            dp_step(points, index, last, sq_tolerance, simplified);
        }
    }
}

/// Squared distance from `point` to the segment `a`-`b`.
fn sq_segment_distance(point: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let mut closest = a;
    if ab.length_squared() > 0.0 {
        let t = (point - a).dot(ab) / ab.length_squared();
        if t > 1.0 {
            closest = b;
        } else if t > 0.0 {
            closest = a + ab * t;
        }
    }
    point.distance_squared(closest)
}
