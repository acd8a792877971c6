#![forbid(unsafe_op_in_unsafe_fn)]

use glam::Mat4;

use crate::jitter::{halton_jitter, jitter_projection};
use crate::matrices::CameraMatrices;
use crate::projection::Projection;
use crate::rig::CameraRig;

impl CameraMatrices {
    /// Builds a bundle from the current and previous view-projection.
    ///
    /// Inverses are taken here, on the host side. The kernel only consumes them.
    pub fn from_glam(view_projection: Mat4, previous_view_projection: Mat4, projection: Mat4) -> Self {
        Self {
            view_projection: view_projection.into(),
            previous_view_projection: previous_view_projection.into(),
            inverse_view_projection: view_projection.inverse().into(),
            previous_inverse_view_projection: previous_view_projection.inverse().into(),
            projection: projection.into(),
            inverse_projection: projection.inverse().into(),
        }
    }
}

/// Produces one [`CameraMatrices`] per frame and remembers the previous frame's
/// view-projection for the `previous_*` slots.
#[derive(Clone, Debug)]
pub struct CameraTracker {
    pub rig: CameraRig,
    pub projection: Projection,
    /// Apply Halton sub-pixel jitter to the projection.
    pub jitter: bool,
    previous: Option<Mat4>,
}

impl CameraTracker {
    pub fn new(rig: CameraRig, projection: Projection) -> Self {
        Self {
            rig,
            projection,
            jitter: false,
            previous: None,
        }
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Bundle for `frame` at the given resolution.
    ///
    /// On the first call the previous matrices equal the current ones.
    pub fn advance(&mut self, frame: u32, width: u32, height: u32) -> CameraMatrices {
        let mut projection = self.projection.matrix_for(width, height);
        if self.jitter {
            projection = jitter_projection(projection, halton_jitter(frame, width, height));
        }

        let view_projection = projection * self.rig.view_matrix();
        let previous = self.previous.replace(view_projection).unwrap_or(view_projection);

        CameraMatrices::from_glam(view_projection, previous, projection)
    }

    /// Drops the previous-frame history (e.g. after a camera cut).
    pub fn reset_history(&mut self) {
        self.previous = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn tracker() -> CameraTracker {
        CameraTracker::new(
            CameraRig::from_look_at(Vec3::new(0.0, 1.0, 5.0), Vec3::ZERO, Vec3::Y),
            Projection::default(),
        )
    }

    #[test]
    fn first_frame_has_no_history() {
        let mut t = tracker();
        let m = t.advance(0, 64, 64);
        assert_eq!(m.previous_view_projection, m.view_projection);
    }

    #[test]
    fn previous_carries_last_frame() {
        let mut t = tracker();
        let first = t.advance(0, 64, 64);
        t.rig.orbit(Vec3::ZERO, 0.3);
        let second = t.advance(1, 64, 64);
        assert_eq!(second.previous_view_projection, first.view_projection);
        assert_ne!(second.view_projection, first.view_projection);
    }

    #[test]
    fn inverse_view_projection_undoes_view_projection() {
        let mut t = tracker().with_jitter(true);
        let m = t.advance(5, 320, 240);
        let vp: Mat4 = m.view_projection.into();
        let inv: Mat4 = m.inverse_view_projection.into();
        assert!((vp * inv).abs_diff_eq(Mat4::IDENTITY, 1e-4));
    }

    #[test]
    fn reset_history_forgets_previous() {
        let mut t = tracker();
        t.advance(0, 64, 64);
        t.rig.orbit(Vec3::ZERO, 0.5);
        t.reset_history();
        let m = t.advance(1, 64, 64);
        assert_eq!(m.previous_view_projection, m.view_projection);
    }
}
