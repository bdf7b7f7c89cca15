use nalgebra::center;

use crate::types::{Point, Value};

// linearly map a number from one range to another
pub fn remap(s: Value, range_in: [Value; 2], range_out: [Value; 2]) -> Value {
    range_out[0] + (s - range_in[0]) * (range_out[1] - range_out[0]) / (range_in[1] - range_in[0])
}

/// Midpoint of the segment `p0..p1`.
///
/// Vertices sit at edge midpoints regardless of the corner values, so this stands in for
/// the usual iso-value interpolation.
#[inline]
pub fn midpoint(p0: &Point, p1: &Point) -> Point {
    center(p0, p1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remap_signed_unit_to_unit() {
        let range = [-1.0, 1.0];
        assert_eq!(remap(-1.0, range, [0.0, 1.0]), 0.0);
        assert_eq!(remap(0.0, range, [0.0, 1.0]), 0.5);
        assert_eq!(remap(1.0, range, [0.0, 1.0]), 1.0);
    }

    #[test]
    fn midpoint_of_unit_edge() {
        let m = midpoint(&Point::new(1.0, 1.0, 0.0), &Point::new(1.0, 1.0, 1.0));
        assert_eq!(m, Point::new(1.0, 1.0, 0.5));
    }
}
