//! Strided dense arrays backing the regression math.

use std::f64::consts::PI;
use std::ops::{Add, Mul, Sub};

use crate::error::{Error, Result};

macro_rules! binary_op {
    ($doc:literal, $name:ident, $op:expr) => {
        #[doc = $doc]
        ///
        /// # Errors
        ///
        /// Returns [`Error::DimensionMismatch`] if the operands' shapes differ.
        pub fn $name(&self, other: &Self) -> Result<Self> {
            self.apply_bop(other, stringify!($name), $op)
        }
    };
}

/// Tensor container (a multi-dimensional array, in practice a matrix or a vector).
///
/// A tensor consists of the actual data, stored as a flat vector,
/// a shape specifying the dimensionality of each axis, and
/// strides, which are the number of elements to skip to reach the next
/// element along each axis.
#[derive(Debug, Clone)]
pub struct Tensor<T> {
    data: Vec<T>,
    shape: Vec<usize>,
    strides: Vec<usize>,
}

/// Structural operations, independent of the element type.
///
/// These manipulate how the data is arranged (transposing, concatenating, copying into
/// row-major order) rather than the values themselves. The two generic higher-order
/// operators, unary and binary, also live here.
impl<T> Tensor<T>
where
    T: Copy,
{
    pub fn data(&self) -> &[T] {
        &self.data
    }
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Number of rows, i.e. the length of the first axis.
    pub fn rows(&self) -> usize {
        self.shape.first().copied().unwrap_or(1)
    }

    /// Number of columns. Vectors are treated as a single column.
    pub fn cols(&self) -> usize {
        self.shape.get(1).copied().unwrap_or(1)
    }

    /// Computes the strides of a contiguous tensor of a given shape.
    ///
    /// For a contiguous matrix of shape `[4, 6]`, moving from `[i, j]` to `[i+1, j]`
    /// skips a whole row of 6 elements, while moving from `[i, j]` to `[i, j+1]`
    /// skips nothing, so the strides are `[6, 1]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use linfit::Tensor;
    ///
    /// let strides = Tensor::<f64>::comp_strides(&[4, 6, 10]);
    ///
    /// assert_eq!(vec![60, 10, 1], strides);
    /// ```
    pub fn comp_strides(shape: &[usize]) -> Vec<usize> {
        let mut strides = vec![1; shape.len()];
        for i in (1..shape.len()).rev() {
            strides[i - 1] = strides[i] * shape[i];
        }
        strides
    }

    /// Converts a vector of coordinates into an index of the flat data given strides.
    pub fn coords_to_idx(coords: &[usize], strides: &[usize]) -> usize {
        coords
            .iter()
            .zip(strides.iter())
            .map(|(coord, stride)| coord * stride)
            .sum()
    }

    /// Converts an index of the flat data into a vector of coordinates given strides.
    ///
    /// The strides must be contiguous (row-major) for the result to be meaningful.
    ///
    /// # Examples
    ///
    /// ```
    /// use linfit::Tensor;
    ///
    /// let coords = Tensor::<f64>::idx_to_coords(7, &[3, 1]);
    ///
    /// assert_eq!(vec![2, 1], coords);
    /// ```
    pub fn idx_to_coords(mut idx: usize, strides: &[usize]) -> Vec<usize> {
        let mut coords = Vec::with_capacity(strides.len());
        for &stride in strides.iter() {
            if stride == 0 {
                coords.push(0);
            } else {
                coords.push(idx / stride);
                idx %= stride;
            }
        }
        coords
    }

    /// Translates an index from one strides basis to another.
    ///
    /// Given the same data and shape, an index in memory could refer to two different elements
    /// depending on the strides. For example, the matrix
    /// ```text
    /// 1 2 3
    /// 4 5 6
    /// ```
    /// is `1 2 3 4 5 6` in row-major order (strides `[3, 1]`) and `1 4 2 5 3 6` in
    /// column-major order (strides `[1, 2]`), so index 1 refers to 2 in the former
    /// and to 4 in the latter.
    pub fn translate_idx(idx: usize, strides_base: &[usize], strides_targ: &[usize]) -> usize {
        let coords = Self::idx_to_coords(idx, strides_base);
        Self::coords_to_idx(&coords, strides_targ)
    }

    /// Creates a new tensor of the given shape from row-major data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the data size and shape are incompatible.
    ///
    /// # Examples
    ///
    /// ```
    /// use linfit::Tensor;
    ///
    /// let vector = Tensor::new(vec![1.0, 2.0, 3.0], vec![3]).unwrap();
    /// let matrix = Tensor::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]).unwrap();
    ///
    /// assert!(Tensor::new(vec![1.0, 2.0], vec![3]).is_err());
    /// ```
    pub fn new(data: Vec<T>, shape: Vec<usize>) -> Result<Self> {
        if data.len() != shape.iter().product::<usize>() {
            return Err(Error::DimensionMismatch {
                op: "new",
                left: vec![data.len()],
                right: shape,
            });
        }

        Ok(Self {
            data,
            strides: Self::comp_strides(&shape),
            shape,
        })
    }

    /// Creates a tensor of the given shape with every element set to `value`.
    pub fn full(shape: Vec<usize>, value: T) -> Self {
        let n = shape.iter().product();
        Self {
            data: vec![value; n],
            strides: Self::comp_strides(&shape),
            shape,
        }
    }

    /// Wraps values into a rank-1 tensor.
    pub fn vector(values: Vec<T>) -> Self {
        Self {
            shape: vec![values.len()],
            strides: vec![1],
            data: values,
        }
    }

    /// Wraps values into an `n x 1` column.
    pub fn column(values: Vec<T>) -> Self {
        let shape = vec![values.len(), 1];
        Self {
            strides: Self::comp_strides(&shape),
            data: values,
            shape,
        }
    }

    /// Wraps values into a `1 x n` row.
    pub fn row(values: Vec<T>) -> Self {
        let shape = vec![1, values.len()];
        Self {
            strides: Self::comp_strides(&shape),
            data: values,
            shape,
        }
    }

    /// Stacks equally long rows into a matrix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the rows have different lengths.
    pub fn from_rows(rows: &[Vec<T>]) -> Result<Self> {
        let n_cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * n_cols);
        for row in rows {
            if row.len() != n_cols {
                return Err(Error::DimensionMismatch {
                    op: "from_rows",
                    left: vec![n_cols],
                    right: vec![row.len()],
                });
            }
            data.extend_from_slice(row);
        }
        Self::new(data, vec![rows.len(), n_cols])
    }

    /// Returns true if the tensor's memory layout follows its row-major order.
    ///
    /// # Examples
    ///
    /// ```
    /// use linfit::Tensor;
    ///
    /// let tensor = Tensor::full(vec![2, 3], 1.0);
    ///
    /// assert!(tensor.is_contig());
    /// assert!(!tensor.transpose().is_contig());
    /// ```
    pub fn is_contig(&self) -> bool {
        Self::comp_strides(&self.shape) == self.strides
    }

    /// Makes the tensor contiguous.
    ///
    /// A non-contiguous tensor (e.g. a transposed one) is copied element by element
    /// into a fresh buffer in row-major order. Contiguous tensors are returned untouched.
    pub fn contig(self) -> Self {
        if self.is_contig() {
            return self;
        }

        let n = self.data.len();
        let mut data_contig = Vec::with_capacity(n);
        let strides_contig = Self::comp_strides(&self.shape);

        for idx_contig in 0..n {
            let idx_orig = Self::translate_idx(idx_contig, &strides_contig, &self.strides);
            data_contig.push(self.data[idx_orig]);
        }

        Self {
            data: data_contig,
            shape: self.shape,
            strides: strides_contig,
        }
    }

    /// Reverses the tensor's axes, which for a matrix is the transpose.
    ///
    /// Only the metadata changes: shape and strides are swapped, leaving the data where it
    /// is, so the result is generally non-contiguous.
    ///
    /// # Examples
    ///
    /// ```
    /// use linfit::Tensor;
    ///
    /// let tensor = Tensor::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]).unwrap();
    /// let transposed = tensor.transpose();
    ///
    /// assert_eq!([3, 2], transposed.shape());
    /// assert_eq!([1, 3], transposed.strides());
    /// assert_eq!(vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0], transposed.to_vec());
    /// ```
    pub fn transpose(self) -> Self {
        let mut shape = self.shape;
        let mut strides = self.strides;
        shape.reverse();
        strides.reverse();

        Self {
            data: self.data,
            shape,
            strides,
        }
    }

    /// Turns a vector or an `n x 1` matrix into an `n x 1` column.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] for anything wider than one column.
    pub fn into_column(self) -> Result<Self> {
        let is_column = match self.shape.len() {
            1 => true,
            2 => self.shape[1] == 1,
            _ => false,
        };
        if !is_column {
            return Err(Error::DimensionMismatch {
                op: "into_column",
                left: self.shape,
                right: vec![self.data.len(), 1],
            });
        }

        Ok(Self::column(self.contig().data))
    }

    /// Copies the elements out in row-major order.
    pub fn to_vec(&self) -> Vec<T> {
        self.clone().contig().data
    }

    /// Concatenates the tensor and the other operand along an axis.
    ///
    /// Both tensors must have the same dimensions everywhere except for the given axis.
    /// Prepending a column of ones to a matrix is `ones.concat(&matrix, 1)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the ranks differ, the axis is out of range,
    /// or the other dimensions disagree.
    ///
    /// # Examples
    ///
    /// ```
    /// use linfit::Tensor;
    ///
    /// let ones = Tensor::full(vec![2, 1], 1.0);
    /// let features = Tensor::new(vec![2.0, 3.0], vec![2, 1]).unwrap();
    /// let design = ones.concat(&features, 1).unwrap();
    ///
    /// assert_eq!(Tensor::new(vec![1.0, 2.0, 1.0, 3.0], vec![2, 2]).unwrap(), design);
    /// ```
    pub fn concat(&self, other: &Self, axis: usize) -> Result<Self> {
        let mismatch = || Error::DimensionMismatch {
            op: "concat",
            left: self.shape.clone(),
            right: other.shape.clone(),
        };

        if self.shape.len() != other.shape.len() || axis >= self.shape.len() {
            return Err(mismatch());
        }

        let mut shape_concated = Vec::with_capacity(self.shape.len());
        for (i, (&dim1, &dim2)) in self.shape.iter().zip(other.shape.iter()).enumerate() {
            if i != axis && dim1 != dim2 {
                return Err(mismatch());
            }
            shape_concated.push(dim1 + if i == axis { dim2 } else { 0 });
        }

        let n_concated = shape_concated.iter().product();
        let mut concated = Vec::with_capacity(n_concated);
        let strides_concated = Self::comp_strides(&shape_concated);

        for idx_concated in 0..n_concated {
            let mut coords = Self::idx_to_coords(idx_concated, &strides_concated);
            if coords[axis] < self.shape[axis] {
                let idx_self = Self::coords_to_idx(&coords, &self.strides);
                concated.push(self.data[idx_self]);
            } else {
                coords[axis] -= self.shape[axis];
                let idx_other = Self::coords_to_idx(&coords, &other.strides);
                concated.push(other.data[idx_other]);
            }
        }

        Ok(Self {
            data: concated,
            shape: shape_concated,
            strides: strides_concated,
        })
    }

    /// Applies an arbitrary unary operation element wise, producing a contiguous tensor
    /// of the same shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use linfit::Tensor;
    ///
    /// let tensor = Tensor::new(vec![1.0, 2.0, 3.0], vec![3]).unwrap();
    /// let res = tensor.apply_uop(|a| 2.0 * a);
    ///
    /// assert_eq!(vec![2.0, 4.0, 6.0], res.to_vec());
    /// ```
    pub fn apply_uop<U>(&self, op: impl Fn(T) -> U) -> Tensor<U>
    where
        U: Copy,
    {
        let n = self.data.len();
        let mut res = Vec::with_capacity(n);
        let strides_res = Tensor::<U>::comp_strides(&self.shape);

        for idx_res in 0..n {
            let idx_orig = Self::translate_idx(idx_res, &strides_res, &self.strides);
            res.push(op(self.data[idx_orig]));
        }

        Tensor::<U> {
            data: res,
            shape: self.shape.clone(),
            strides: strides_res,
        }
    }

    /// Applies an arbitrary binary operation to pairs of elements at the same coordinates.
    ///
    /// Unlike NumPy, no broadcasting takes place: the operands must have identical shapes,
    /// though their layouts (strides) may differ.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`], tagged with `op_name`, if the shapes differ.
    pub fn apply_bop<U>(
        &self,
        other: &Self,
        op_name: &'static str,
        op: impl Fn(T, T) -> U,
    ) -> Result<Tensor<U>>
    where
        U: Copy,
    {
        if self.shape != other.shape {
            return Err(Error::DimensionMismatch {
                op: op_name,
                left: self.shape.clone(),
                right: other.shape.clone(),
            });
        }

        let n = self.data.len();
        let mut res = Vec::with_capacity(n);
        let strides_res = Tensor::<U>::comp_strides(&self.shape);

        for idx_res in 0..n {
            let idx_self = Self::translate_idx(idx_res, &strides_res, &self.strides);
            let idx_other = Self::translate_idx(idx_res, &strides_res, &other.strides);
            res.push(op(self.data[idx_self], other.data[idx_other]));
        }

        Ok(Tensor::<U> {
            data: res,
            shape: self.shape.clone(),
            strides: strides_res,
        })
    }
}

/// Operations applicable to numeric data in the most general sense.
impl<T> Tensor<T>
where
    T: Add<Output = T> + Mul<Output = T> + Sub<Output = T> + Default + Copy,
{
    /// Creates a tensor of the given shape filled with the type's zero.
    pub fn zeros(shape: Vec<usize>) -> Self {
        Self::full(shape, T::default())
    }

    /// Calculates the vector dot product.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the inputs aren't of rank 1 or differ in length.
    ///
    /// # Examples
    ///
    /// ```
    /// use linfit::Tensor;
    ///
    /// let tensor1 = Tensor::new(vec![1.0, 2.0, 3.0], vec![3]).unwrap();
    /// let tensor2 = Tensor::new(vec![2.0, 3.0, 4.0], vec![3]).unwrap();
    ///
    /// assert_eq!(20.0, tensor1.dot(&tensor2).unwrap());
    /// ```
    pub fn dot(&self, other: &Self) -> Result<T> {
        if self.shape.len() != 1 || self.shape != other.shape {
            return Err(Error::DimensionMismatch {
                op: "dot",
                left: self.shape.clone(),
                right: other.shape.clone(),
            });
        }

        let res = (0..self.shape[0])
            .map(|i| self.data[i * self.strides[0]] * other.data[i * other.strides[0]])
            .fold(T::default(), |acc, val| acc + val);
        Ok(res)
    }

    /// Performs matrix multiplication of two rank-2 tensors.
    ///
    /// Either operand may be non-contiguous; elements are addressed through the strides,
    /// so multiplying by a transposed view needs no copy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the inputs aren't of rank 2 or their inner
    /// dimensions differ.
    ///
    /// # Examples
    ///
    /// ```
    /// use linfit::Tensor;
    ///
    /// let tensor1 = Tensor::new(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]).unwrap();
    /// let tensor2 = Tensor::new(vec![5.0, 6.0, 7.0, 8.0], vec![2, 2]).unwrap();
    /// let res = tensor1.matmul(&tensor2).unwrap();
    ///
    /// assert_eq!(Tensor::new(vec![19.0, 22.0, 43.0, 50.0], vec![2, 2]).unwrap(), res);
    /// ```
    pub fn matmul(&self, other: &Self) -> Result<Self> {
        if self.shape.len() != 2 || other.shape.len() != 2 || self.shape[1] != other.shape[0] {
            return Err(Error::DimensionMismatch {
                op: "matmul",
                left: self.shape.clone(),
                right: other.shape.clone(),
            });
        }

        let (n_rows, n_inner, n_cols) = (self.shape[0], self.shape[1], other.shape[1]);
        let mut res = Vec::with_capacity(n_rows * n_cols);
        let shape_res = vec![n_rows, n_cols];
        let strides_res = Self::comp_strides(&shape_res);

        for row in 0..n_rows {
            for col in 0..n_cols {
                let mut acc = T::default();
                for idx_inner in 0..n_inner {
                    let val_self = self.data[self.strides[0] * row + self.strides[1] * idx_inner];
                    let val_other =
                        other.data[other.strides[0] * idx_inner + other.strides[1] * col];
                    acc = acc + val_self * val_other;
                }
                res.push(acc);
            }
        }

        Ok(Self {
            data: res,
            shape: shape_res,
            strides: strides_res,
        })
    }

    /// Multiplies every element by a scalar.
    pub fn scale(&self, factor: T) -> Self {
        self.apply_uop(|a| a * factor)
    }

    /// Sums every element of the tensor.
    pub fn sum(&self) -> T {
        self.data.iter().fold(T::default(), |acc, &val| acc + val)
    }

    binary_op!("Adds two tensors element wise.", add, |a, b| a + b);
    binary_op!(
        "Subtracts the other operand from the tensor element wise.",
        sub,
        |a, b| a - b
    );
    binary_op!("Multiplies two tensors element wise.", mul, |a, b| a * b);
}

/// Operations specific to double-precision tensors.
impl Tensor<f64> {
    /// Creates a tensor of the given shape filled with ones.
    pub fn ones(shape: Vec<usize>) -> Self {
        Self::full(shape, 1.0)
    }

    /// Generates a normally distributed tensor of the given shape.
    ///
    /// Values are drawn from scratch: a linear congruential generator (LCG) produces
    /// uniform samples on the unit interval, and the Box-Muller transform maps pairs of them
    /// to a standard normal sample. The LCG parameters (m = 2^31, a = 1103515245,
    /// c = 12345) follow glibc, so a given seed always yields the same tensor.
    ///
    /// # Examples
    ///
    /// ```
    /// use linfit::Tensor;
    ///
    /// let tensor1 = Tensor::randn(vec![6], 0);
    /// let tensor2 = Tensor::randn(vec![6], 0);
    ///
    /// assert_eq!(tensor1, tensor2);
    /// ```
    pub fn randn(shape: Vec<usize>, seed: u32) -> Self {
        let n = shape.iter().product();
        let mut data = Vec::with_capacity(n);
        let mut seed = seed;

        let mut next_uniform = || {
            seed = (1103515245u32.wrapping_mul(seed).wrapping_add(12345)) & 0x7FFFFFFF;
            f64::from(seed) / f64::from(0x80000000u32)
        };

        for _ in 0..n {
            let u1 = next_uniform();
            let u2 = next_uniform();
            data.push((-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos());
        }

        Self {
            data,
            strides: Self::comp_strides(&shape),
            shape,
        }
    }
}

/// Two tensors are equal when they have the same shape and the same elements at every
/// coordinate, whatever their memory layouts.
///
/// # Examples
///
/// ```
/// use linfit::Tensor;
///
/// let tensor1 = Tensor::new(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]).unwrap();
/// let tensor2 = Tensor::new(vec![1.0, 3.0, 2.0, 4.0], vec![2, 2]).unwrap().transpose();
/// let tensor3 = Tensor::new(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]).unwrap().transpose();
///
/// assert_eq!(tensor1, tensor2);
/// assert_ne!(tensor1, tensor3);
/// ```
impl<T> PartialEq for Tensor<T>
where
    T: PartialEq + Copy,
{
    fn eq(&self, other: &Self) -> bool {
        self.apply_bop(other, "eq", |a, b| a == b)
            .map(|res| res.data.iter().all(|&a| a))
            .unwrap_or(false)
    }
}
