use bytemuck::{Pod, Zeroable};

use crate::vec::Vec4;

/// 4x4 matrix stored column-major: `cols[c][r]`.
///
/// This is the only layout the kernel consumes. The memory image matches GLSL/WGSL
/// `mat4x4<f32>` and glam's `Mat4`, so a host float array uploaded for the GPU can be
/// reinterpreted as-is.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ColMat4 {
    pub cols: [[f32; 4]; 4],
}

impl Default for ColMat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ColMat4 {
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    #[inline]
    pub const fn from_cols(cols: [[f32; 4]; 4]) -> Self {
        Self { cols }
    }

    #[inline]
    pub fn from_cols_array(a: &[f32; 16]) -> Self {
        bytemuck::cast(*a)
    }

    #[inline]
    pub fn to_cols_array(&self) -> [f32; 16] {
        bytemuck::cast(self.cols)
    }

    /// Element at `row`, `col`.
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> f32 {
        self.cols[col][row]
    }

    #[inline]
    pub fn transpose(&self) -> Self {
        let c = &self.cols;
        let mut out = [[0.0; 4]; 4];
        for (i, col) in out.iter_mut().enumerate() {
            for (j, v) in col.iter_mut().enumerate() {
                *v = c[j][i];
            }
        }
        Self { cols: out }
    }

    /// `result[i] = Σ_j cols[j][i] · v[j]`.
    #[inline]
    pub fn mul_vec4(&self, v: Vec4) -> Vec4 {
        let c = &self.cols;
        let v = v.to_array();
        let mut out = [0.0f32; 4];
        for (i, o) in out.iter_mut().enumerate() {
            *o = c[0][i] * v[0] + c[1][i] * v[1] + c[2][i] * v[2] + c[3][i] * v[3];
        }
        Vec4::from_array(out)
    }

    /// Matrix product `self * rhs` (rhs applied first).
    pub fn mul_mat4(&self, rhs: &Self) -> Self {
        let mut out = [[0.0; 4]; 4];
        for (col, o) in out.iter_mut().enumerate() {
            *o = self.mul_vec4(Vec4::from_array(rhs.cols[col])).to_array();
        }
        Self { cols: out }
    }
}

/// 4x4 matrix stored row-major: `rows[r][c]`.
///
/// Exists only so row-major producers are explicit at the boundary. Convert with
/// [`RowMat4::to_col_major`] before handing anything to the kernel.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct RowMat4 {
    pub rows: [[f32; 4]; 4],
}

impl RowMat4 {
    #[inline]
    pub const fn from_rows(rows: [[f32; 4]; 4]) -> Self {
        Self { rows }
    }

    /// Same logical matrix, column-major storage.
    #[inline]
    pub fn to_col_major(&self) -> ColMat4 {
        ColMat4::from_cols(self.rows).transpose()
    }

    /// `result[i] = Σ_j rows[i][j] · v[j]`.
    #[inline]
    pub fn mul_vec4(&self, v: Vec4) -> Vec4 {
        let r = &self.rows;
        let v = v.to_array();
        let mut out = [0.0f32; 4];
        for (i, o) in out.iter_mut().enumerate() {
            *o = r[i][0] * v[0] + r[i][1] * v[1] + r[i][2] * v[2] + r[i][3] * v[3];
        }
        Vec4::from_array(out)
    }
}

impl From<RowMat4> for ColMat4 {
    fn from(m: RowMat4) -> Self {
        m.to_col_major()
    }
}

#[cfg(feature = "glam")]
impl From<glam::Mat4> for ColMat4 {
    #[inline]
    fn from(m: glam::Mat4) -> Self {
        Self::from_cols_array(&m.to_cols_array())
    }
}

#[cfg(feature = "glam")]
impl From<ColMat4> for glam::Mat4 {
    #[inline]
    fn from(m: ColMat4) -> Self {
        glam::Mat4::from_cols_array(&m.to_cols_array())
    }
}
