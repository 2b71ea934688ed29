//! Named axes and the rescale from integer grid coordinates to floating-point
//! user units (spec.md §3, §4.7).

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One axis of a parameter domain: `[left, right]` discretised into
/// `2^bit_depth` cells.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub name: String,
    pub left: f64,
    pub right: f64,
    pub bit_depth: u32,
}

impl Axis {
    pub fn new(name: impl Into<String>, left: f64, right: f64, bit_depth: u32) -> Self {
        Axis { name: name.into(), left, right, bit_depth }
    }

    fn scale(&self) -> f64 {
        (self.right - self.left) / (1u64 << self.bit_depth) as f64
    }

    fn rescale(&self, coordinate: u64) -> f64 {
        self.left + coordinate as f64 * self.scale()
    }
}

/// An ordered sequence of axes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Domain(pub Vec<Axis>);

impl Domain {
    pub fn new(axes: Vec<Axis>) -> Self {
        Domain(axes)
    }

    /// `Σ axis.bit_depth`.
    pub fn bit_depth(&self) -> u32 {
        self.0.iter().map(|a| a.bit_depth).sum()
    }

    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|a| a.name.as_str()).collect()
    }

    /// Rescales one integer grid coordinate per axis into user units.
    pub fn scale(&self, int_coords: &[u64]) -> Result<Vec<f64>, Error> {
        if self.0.len() != int_coords.len() {
            return Err(Error::Domain(format!(
                "expected {} coordinates, got {}",
                self.0.len(),
                int_coords.len()
            )));
        }
        Ok(self.0.iter().zip(int_coords).map(|(axis, &c)| axis.rescale(c)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_bit_depth_sums_axes() {
        let d = Domain::new(vec![Axis::new("a", 0.0, 1.0, 3), Axis::new("b", -1.0, 1.0, 2)]);
        assert_eq!(d.bit_depth(), 5);
    }

    #[test]
    fn scale_maps_grid_endpoints_to_axis_endpoints() {
        let d = Domain::new(vec![Axis::new("p", 0.0, 1.0, 4)]);
        let low = d.scale(&[0]).unwrap();
        assert_eq!(low, vec![0.0]);
        // coordinate 2^bit_depth - 1 should be one cell-width short of `right`.
        let high = d.scale(&[15]).unwrap();
        assert!((high[0] - (1.0 - 1.0 / 16.0)).abs() < 1e-9);
    }

    #[test]
    fn scale_negative_range() {
        let d = Domain::new(vec![Axis::new("p", -1.0, 1.0, 1)]);
        let coords = d.scale(&[1]).unwrap();
        assert!((coords[0] - 0.0).abs() < 1e-9);
    }

    #[test]
    fn scale_rejects_axis_count_mismatch() {
        let d = Domain::new(vec![Axis::new("p", 0.0, 1.0, 4)]);
        assert!(d.scale(&[1, 2]).is_err());
    }
}


