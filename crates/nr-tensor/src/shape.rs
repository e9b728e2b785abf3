use crate::error::{Result, TensorError};
use std::fmt;

/// A tensor shape, wrapping a vector of dimension sizes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    dims: Vec<usize>,
}

impl Shape {
    /// Create a new shape from a vector of dimensions.
    pub fn new(dims: Vec<usize>) -> Self {
        Shape { dims }
    }

    /// Create a shape from a slice of dimensions.
    pub fn from_slice(dims: &[usize]) -> Self {
        Shape {
            dims: dims.to_vec(),
        }
    }

    /// Number of dimensions (rank).
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Total number of elements (product of all dimension sizes).
    pub fn numel(&self) -> usize {
        self.dims.iter().product()
    }

    /// Like [`Shape::numel`] but returns `None` on overflow.
    pub fn checked_numel(&self) -> Option<usize> {
        self.dims.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
    }

    /// Returns the size of dimension `i`.
    ///
    /// # Panics
    /// Panics if `i >= ndim()`.
    pub fn dim(&self, i: usize) -> usize {
        self.dims[i]
    }

    /// Returns a reference to the underlying dimension sizes.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Returns true if the shape has at least one dimension and no zero-sized
    /// dimension.
    pub fn is_valid_tensor_shape(&self) -> bool {
        !self.dims.is_empty() && self.dims.iter().all(|&d| d > 0)
    }

    /// Row-major element strides, e.g. `[2, 3, 4]` gives `[12, 4, 1]`.
    pub fn strides(&self) -> Vec<usize> {
        let mut strides = vec![1usize; self.dims.len()];
        let mut acc = 1;
        for (stride, &d) in strides.iter_mut().zip(&self.dims).rev() {
            *stride = acc;
            acc *= d;
        }
        strides
    }

    /// Returns true if the region `origin..origin + region` lies inside this
    /// shape in every dimension.
    pub fn contains_region(&self, region: &Shape, origin: &[usize]) -> bool {
        region.ndim() == self.ndim()
            && origin.len() == self.ndim()
            && self
                .dims
                .iter()
                .zip(region.dims.iter().zip(origin))
                .all(|(&outer, (&r, &o))| o + r <= outer)
    }

    /// Element offset of `origin` within this shape, if the sub-region
    /// `origin..origin + region` occupies one contiguous row-major run.
    ///
    /// Let `p` be the innermost dimension where the region is narrower than
    /// the parent. The run is contiguous when every dimension inside `p`
    /// spans the parent fully and every dimension outside `p` has extent 1.
    pub fn contiguous_offset(&self, region: &Shape, origin: &[usize]) -> Option<usize> {
        if !self.contains_region(region, origin) {
            return None;
        }
        let innermost_partial = self
            .dims
            .iter()
            .zip(region.dims.iter())
            .rposition(|(&outer, &r)| r != outer);

        if let Some(p) = innermost_partial {
            if region.dims[..p].iter().any(|&r| r != 1) {
                return None;
            }
        }

        let strides = self.strides();
        Some(origin.iter().zip(&strides).map(|(o, s)| o * s).sum())
    }

    /// Output shape of an elementwise layer over `a` and `b`.
    ///
    /// Dimensions are aligned from the innermost one, missing leading
    /// dimensions count as 1, and each pair must be equal or contain a 1.
    pub fn broadcast_shape(a: &Shape, b: &Shape) -> Result<Shape> {
        let rank = a.ndim().max(b.ndim());
        let padded = |s: &Shape, i: usize| {
            let lead = rank - s.ndim();
            if i < lead {
                1
            } else {
                s.dims[i - lead]
            }
        };

        (0..rank)
            .map(|i| match (padded(a, i), padded(b, i)) {
                (x, y) if x == y || y == 1 => Ok(x),
                (1, y) => Ok(y),
                _ => Err(TensorError::BroadcastError {
                    a: a.dims.clone(),
                    b: b.dims.clone(),
                }),
            })
            .collect::<Result<Vec<_>>>()
            .map(Shape::new)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", d)?;
        }
        write!(f, "]")
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Shape::new(dims)
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Shape::from_slice(dims)
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(dims: [usize; N]) -> Self {
        Shape::new(dims.to_vec())
    }
}
