use gbuffer_camera::{ray_direction, CameraRig, CameraTracker, Projection};
use gbuffer_kernel::shade::gradient_color;
use gbuffer_kernel::{
    to_coordinate, to_uv, AlgebraBackend, CameraMatrices, Channel, FrameInputs, Kernel,
    KernelConfig, KernelError, Mode, Quantize, RaySpace, Resolution, SolidFill,
};
use glam::Vec3;

const SENTINEL: u8 = 0xA5;

fn kernel(mode: Mode, backend: AlgebraBackend) -> Kernel {
    Kernel::new(KernelConfig::default().with_mode(mode).with_backend(backend))
}

fn sentinel_buffer(res: Resolution) -> Vec<u8> {
    vec![SENTINEL; res.byte_len()]
}

fn orbit_camera() -> CameraMatrices {
    let rig = CameraRig::from_look_at(Vec3::new(2.0, 1.5, 6.0), Vec3::ZERO, Vec3::Y);
    CameraTracker::new(rig, Projection::default())
        .with_jitter(true)
        .advance(3, 64, 48)
}

const MODES: [Mode; 4] = [Mode::Gradient, Mode::Uv, Mode::RayDirection, Mode::Solid];
const BACKENDS: [AlgebraBackend; 2] = [AlgebraBackend::Scalar, AlgebraBackend::Packed];

#[test_log::test]
fn gradient_frame_zero_single_pixel() {
    let res = Resolution::new(1, 1);
    let mut buf = sentinel_buffer(res);
    let report = kernel(Mode::Gradient, AlgebraBackend::Scalar).populate(&mut buf, &FrameInputs::new(0, res));
    assert_eq!(buf, [127, 127, 255, 255]);
    assert_eq!(report.pixels_written, 1);
}

#[test]
fn gradient_frame_zero_with_rounding() {
    let res = Resolution::new(1, 1);
    let mut buf = sentinel_buffer(res);
    let mut cfg = KernelConfig::default()
        .with_mode(Mode::Gradient)
        .with_backend(AlgebraBackend::Scalar);
    cfg.quantize = Quantize::Round;
    Kernel::new(cfg).populate(&mut buf, &FrameInputs::new(0, res));
    assert_eq!(buf, [128, 128, 255, 255]);
}

#[test]
fn packed_gradient_writes_sixteen_identical_bytes_per_group() {
    let res = Resolution::new(4, 2);
    let mut buf = sentinel_buffer(res);
    kernel(Mode::Gradient, AlgebraBackend::Packed).populate(&mut buf, &FrameInputs::new(157, res));
    let first = &buf[..4];
    assert_eq!(first[3], 255);
    assert!(buf.chunks_exact(4).all(|px| px == first));
}

#[test]
fn packed_stride_leaves_single_pixel_untouched_unless_tail_is_finished() {
    let res = Resolution::new(1, 1);

    let mut buf = sentinel_buffer(res);
    let report = kernel(Mode::Gradient, AlgebraBackend::Packed).populate(&mut buf, &FrameInputs::new(0, res));
    assert_eq!(buf, [SENTINEL; 4]);
    assert_eq!(report.bytes_untouched, 4);

    let mut cfg = KernelConfig::default().with_mode(Mode::Gradient);
    cfg.finish_tail = true;
    let mut buf = sentinel_buffer(res);
    Kernel::new(cfg).populate(&mut buf, &FrameInputs::new(0, res));
    assert_eq!(buf, [127, 127, 255, 255]);
}

#[test]
fn ray_direction_with_identity_inverse() {
    let res = Resolution::new(2, 2);
    let camera = CameraMatrices::IDENTITY;
    for backend in BACKENDS {
        let mut buf = sentinel_buffer(res);
        kernel(Mode::RayDirection, backend)
            .populate(&mut buf, &FrameInputs::new(0, res).with_camera(&camera));
        // pixel (1,1) sits at uv (0.5, 0.5)
        assert_eq!(&buf[12..16], &[0, 0, 255, 255], "{backend:?}");
        // pixel (0,0): uv (0,0) -> clip (1,1) -> normalize(1,1,1)
        assert_eq!(&buf[0..4], &[147, 147, 147, 255], "{backend:?}");
    }
}

#[test]
fn negative_ray_components_wrap() {
    // pixel (1,0) of 2x2 sits at uv (0.5, 0): clip (0, 1), ray (0, 1, 1)/sqrt2.
    // Flipping y through the inverse gives a negative component.
    let res = Resolution::new(2, 2);
    let mut camera = CameraMatrices::IDENTITY;
    camera.inverse_view_projection.cols[1] = [0.0, -1.0, 0.0, 0.0];
    let mut buf = sentinel_buffer(res);
    kernel(Mode::RayDirection, AlgebraBackend::Scalar)
        .populate(&mut buf, &FrameInputs::new(0, res).with_camera(&camera));
    // -0.7071 * 255 = -180.3 -> -180 -> 76
    assert_eq!(&buf[4..8], &[0, 76, 180, 255]);
}

#[test]
fn view_space_uses_inverse_projection() {
    let res = Resolution::new(2, 2);
    let mut camera = CameraMatrices::IDENTITY;
    // World inverse is degenerate; only the view-space path can produce a ray.
    camera.inverse_view_projection = gbuffer_math::ColMat4::from_cols([[0.0; 4]; 4]);
    let mut cfg = KernelConfig::default()
        .with_mode(Mode::RayDirection)
        .with_backend(AlgebraBackend::Scalar);
    cfg.ray_space = RaySpace::View;
    let mut buf = sentinel_buffer(res);
    Kernel::new(cfg).populate(&mut buf, &FrameInputs::new(0, res).with_camera(&camera));
    assert_eq!(&buf[12..16], &[0, 0, 255, 255]);
}

#[test]
fn uv_visualization() {
    let res = Resolution::new(4, 4);
    let mut buf = sentinel_buffer(res);
    kernel(Mode::Uv, AlgebraBackend::Scalar).populate(&mut buf, &FrameInputs::new(9, res));
    // pixel index 5 is (1,1): uv (0.25, 0.25)
    assert_eq!(&buf[20..24], &[63, 63, 0, 255]);
    // pixel index 15 is (3,3): uv (0.75, 0.75)
    assert_eq!(&buf[60..64], &[191, 191, 0, 255]);
}

#[test]
fn solid_fill_with_x_ramp() {
    let res = Resolution::new(2, 1);
    let mut cfg = KernelConfig::default()
        .with_mode(Mode::Solid)
        .with_backend(AlgebraBackend::Scalar);
    cfg.solid = SolidFill {
        rgba: [1, 2, 3, 4],
        x_gradient: Some(Channel::B),
    };
    let mut buf = sentinel_buffer(res);
    Kernel::new(cfg).populate(&mut buf, &FrameInputs::new(0, res));
    assert_eq!(buf, [1, 2, 0, 4, 1, 2, 127, 4]);
}

/// Expected bytes of pixel `index` under the default config for `mode`.
fn expected_pixel(
    mode: Mode,
    index: u32,
    res: Resolution,
    frame_index: u32,
    camera: &CameraMatrices,
) -> [u8; 4] {
    let q = Quantize::Truncate;
    let uv = to_uv(to_coordinate(res, index), res);
    match mode {
        Mode::Gradient => gradient_color(frame_index, q).to_array(),
        Mode::Uv => [q.unit(uv.x), q.unit(uv.y), 0, 255],
        Mode::RayDirection => {
            let d = ray_direction(uv, &camera.inverse_view_projection);
            [q.unit(d.x), q.unit(d.y), q.unit(d.z), 255]
        }
        Mode::Solid => SolidFill::default().rgba,
    }
}

fn assert_frame_matches(
    mode: Mode,
    buf: &[u8],
    res: Resolution,
    frame_index: u32,
    camera: &CameraMatrices,
    what: &str,
) {
    for (i, px) in buf.chunks_exact(4).enumerate() {
        let want = expected_pixel(mode, i as u32, res, frame_index, camera);
        for (c, (got, want)) in px.iter().zip(want).enumerate() {
            assert!(
                got.abs_diff(want) <= u8::from(mode == Mode::RayDirection && c < 3),
                "{what} {mode:?} pixel {i}: {px:?} vs {want:?}"
            );
        }
    }
}

#[test]
fn two_by_two_buffer_is_fully_overwritten_in_every_mode() {
    let res = Resolution::new(2, 2);
    let camera = orbit_camera();
    for mode in MODES {
        for backend in BACKENDS {
            let mut buf = sentinel_buffer(res);
            assert_eq!(buf.len(), 16);
            let report = kernel(mode, backend)
                .try_populate(&mut buf, &FrameInputs::new(42, res).with_camera(&camera))
                .unwrap();
            assert_eq!(report.pixels_written, 4, "{mode:?} {backend:?}");
            assert_eq!(report.bytes_untouched, 0);
            assert_frame_matches(mode, &buf, res, 42, &camera, &format!("{backend:?}"));
        }
    }
}

#[test]
fn per_pixel_modes_fill_odd_sizes_on_the_packed_backend() {
    let camera = orbit_camera();
    for res in [Resolution::new(3, 3), Resolution::new(5, 1)] {
        for mode in [Mode::Uv, Mode::Solid] {
            let mut buf = sentinel_buffer(res);
            let report =
                kernel(mode, AlgebraBackend::Packed).populate(&mut buf, &FrameInputs::new(1, res));
            assert_eq!(report.pixels_written, res.pixel_count(), "{mode:?} {res:?}");
            assert_frame_matches(mode, &buf, res, 1, &camera, &format!("{res:?}"));
        }
    }
}

#[test_log::test]
fn checked_entry_writes_every_pixel_of_odd_sizes() {
    let camera = orbit_camera();
    for res in [Resolution::new(3, 3), Resolution::new(5, 1)] {
        for mode in MODES {
            for backend in BACKENDS {
                let mut buf = sentinel_buffer(res);
                let report = kernel(mode, backend)
                    .try_populate(&mut buf, &FrameInputs::new(7, res).with_camera(&camera))
                    .unwrap();
                assert_eq!(report.pixels_written, res.pixel_count(), "{mode:?} {backend:?} {res:?}");
                assert_eq!(report.bytes_untouched, 0);
                assert_frame_matches(mode, &buf, res, 7, &camera, &format!("{backend:?} {res:?}"));
            }
        }
    }
}

#[test]
fn scalar_and_packed_agree() {
    let res = Resolution::new(64, 48);
    let camera = orbit_camera();
    for mode in MODES {
        let mut scalar = sentinel_buffer(res);
        let mut packed = sentinel_buffer(res);
        let frame = FrameInputs::new(77, res).with_camera(&camera);
        kernel(mode, AlgebraBackend::Scalar).populate(&mut scalar, &frame);
        kernel(mode, AlgebraBackend::Packed).populate(&mut packed, &frame);
        for (i, (s, p)) in scalar.iter().zip(packed.iter()).enumerate() {
            assert!(s.abs_diff(*p) <= 1, "{mode:?} byte {i}: {s} vs {p}");
        }
    }
}

#[test_log::test]
fn parallel_matches_serial() {
    let res = Resolution::new(97, 31);
    let camera = orbit_camera();
    for mode in MODES {
        for backend in BACKENDS {
            let mut cfg = KernelConfig::default().with_mode(mode).with_backend(backend);
            cfg.finish_tail = true;
            let serial = Kernel::new(cfg.clone());
            cfg.parallel = true;
            let parallel = Kernel::new(cfg);

            let frame = FrameInputs::new(5, res).with_camera(&camera);
            let mut a = sentinel_buffer(res);
            let mut b = sentinel_buffer(res);
            let ra = serial.populate(&mut a, &frame);
            let rb = parallel.populate(&mut b, &frame);
            assert_eq!(ra, rb);
            assert_eq!(a, b, "{mode:?} {backend:?}");
            assert_eq!(ra.pixels_written, res.pixel_count());
        }
    }
}

#[test]
fn checked_entry_rejects_bad_inputs_without_writing() {
    let k = kernel(Mode::RayDirection, AlgebraBackend::Packed);

    let mut buf = vec![SENTINEL; 16];
    let err = k
        .try_populate(&mut buf, &FrameInputs::new(0, Resolution::new(0, 4)))
        .unwrap_err();
    assert!(matches!(err, KernelError::ZeroResolution { width: 0, height: 4 }));

    let err = k
        .try_populate(&mut buf, &FrameInputs::new(0, Resolution::new(3, 3)))
        .unwrap_err();
    assert!(matches!(err, KernelError::LengthMismatch { expected: 36, got: 16 }));

    let err = k
        .try_populate(&mut buf, &FrameInputs::new(0, Resolution::new(2, 2)))
        .unwrap_err();
    assert!(matches!(err, KernelError::MissingCamera("ray_direction")));

    assert!(buf.iter().all(|&b| b == SENTINEL));
}

#[test]
fn trailing_partial_pixel_is_left_alone() {
    let res = Resolution::new(3, 1);
    let mut buf = vec![SENTINEL; res.byte_len() - 1];
    let report = kernel(Mode::Uv, AlgebraBackend::Scalar).populate(&mut buf, &FrameInputs::new(0, res));
    assert_eq!(report.pixels_written, 2);
    assert_eq!(report.bytes_untouched, 3);
    assert_eq!(&buf[8..], &[SENTINEL; 3]);
}

#[test]
fn packed_gradient_leaves_a_partial_group_without_finish_tail() {
    let res = Resolution::new(5, 1);
    let mut buf = sentinel_buffer(res);
    let report = kernel(Mode::Gradient, AlgebraBackend::Packed).populate(&mut buf, &FrameInputs::new(0, res));
    assert_eq!(report.pixels_written, 4);
    assert_eq!(&buf[16..], &[SENTINEL; 4]);
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "exceed")]
fn oversized_buffer_trips_debug_assertion() {
    let res = Resolution::new(2, 2);
    let mut buf = vec![SENTINEL; 64];
    kernel(Mode::Uv, AlgebraBackend::Scalar).populate(&mut buf, &FrameInputs::new(0, res));
}
