//! Cleanup passes over connector polylines

use crate::geometry::Point;

/// Remove interior points that are collinear with both neighbors or that
/// duplicate their predecessor, until nothing changes.
///
/// The first and last points are always kept, so a polyline of two or more
/// points stays at two or more points. Every pass only drops points, which
/// makes the result a fixpoint: simplifying it again returns it unchanged.
pub fn simplify_points(points: &[Point], tolerance: f64) -> Vec<Point> {
    let mut current = points.to_vec();
    loop {
        let next = remove_collinear(&dedup_points(&current, tolerance), tolerance);
        if next.len() == current.len() {
            return next;
        }
        current = next;
    }
}

/// Merge consecutive points closer than `tolerance` on both axes
pub fn dedup_points(points: &[Point], tolerance: f64) -> Vec<Point> {
    let Some((&last, rest)) = points.split_last() else {
        return Vec::new();
    };
    if rest.is_empty() {
        return vec![last];
    }

    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for &p in rest {
        match out.last() {
            Some(prev) if prev.approx_eq(p, tolerance) => {}
            _ => out.push(p),
        }
    }
    // The endpoint is exact; drop the interior point it duplicates instead
    if out.len() > 1 && out.last().is_some_and(|prev| prev.approx_eq(last, tolerance)) {
        out.pop();
    }
    out.push(last);
    out
}

fn remove_collinear(points: &[Point], tolerance: f64) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let same = |a: f64, b: f64| (a - b).abs() < tolerance;

    let mut out = Vec::with_capacity(points.len());
    out.push(points[0]);
    for i in 1..points.len() - 1 {
        let (prev, cur, next) = (out[out.len() - 1], points[i], points[i + 1]);
        let vertical_run = same(prev.x, cur.x) && same(cur.x, next.x);
        let horizontal_run = same(prev.y, cur.y) && same(cur.y, next.y);
        if !vertical_run && !horizontal_run {
            out.push(cur);
        }
    }
    out.push(points[points.len() - 1]);
    out
}

/// Snap near-diagonal segments to horizontal or vertical.
///
/// A segment whose ends differ by more than `tolerance` on both axes keeps
/// its dominant axis: the later point takes the earlier point's coordinate
/// on the axis with the smaller delta. Equal deltas keep the run horizontal.
/// Deltas below `tolerance` count as on-axis, matching [`is_orthogonal`].
pub fn enforce_orthogonal(points: &mut [Point], tolerance: f64) {
    for i in 1..points.len() {
        let prev = points[i - 1];
        let cur = &mut points[i];
        let dx = (cur.x - prev.x).abs();
        let dy = (cur.y - prev.y).abs();
        if dx < tolerance || dy < tolerance {
            continue;
        }
        if dx < dy {
            cur.x = prev.x;
        } else {
            cur.y = prev.y;
        }
    }
}

/// Is every segment axis-aligned within `tolerance`?
pub fn is_orthogonal(points: &[Point], tolerance: f64) -> bool {
    points.windows(2).all(|w| {
        (w[0].x - w[1].x).abs() < tolerance || (w[0].y - w[1].y).abs() < tolerance
    })
}
