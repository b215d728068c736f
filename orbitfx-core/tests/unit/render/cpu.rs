use super::*;

fn vp(w: u32, h: u32) -> Viewport {
    Viewport::new(w, h).unwrap()
}

#[test]
fn rejects_surfaces_vello_cannot_allocate() {
    assert!(
        CpuSurface::new(Viewport {
            width: 0,
            height: 4
        })
        .is_err()
    );
    assert!(CpuSurface::new(vp(70_000, 4)).is_err());
}

#[test]
fn radial_gradient_fades_from_center_to_outer() {
    let bytes = radial_gradient_premul(
        9,
        9,
        Point::new(4.5, 4.5),
        4.0,
        [200, 100, 50, 200],
        [0, 0, 0, 0],
    );
    let at = |x: usize, y: usize| -> [u8; 4] {
        let i = (y * 9 + x) * 4;
        [bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]
    };
    assert_eq!(at(4, 4), [200, 100, 50, 200]);
    assert_eq!(at(0, 0), [0, 0, 0, 0]);
    let mid = at(6, 4);
    assert!(mid[3] > 0 && mid[3] < 200);
}

#[test]
fn circle_rasterizes_at_its_center_only() {
    let mut s = CpuSurface::new(vp(32, 32)).unwrap();
    s.clear();
    s.fill_circle(Point::new(16.0, 16.0), 4.0, Rgba::new(255, 255, 255, 1.0));
    s.present(Millis::ZERO);

    let frame = s.frame();
    assert_eq!(frame.data.len(), 32 * 32 * 4);
    assert_eq!(frame.pixel(16, 16).unwrap()[3], 255);
    assert_eq!(frame.pixel(1, 1).unwrap(), [0, 0, 0, 0]);
    assert_eq!(s.presented(), 1);
}

#[test]
fn clear_discards_previous_draws() {
    let mut s = CpuSurface::new(vp(16, 16)).unwrap();
    s.fill_circle(Point::new(8.0, 8.0), 4.0, Rgba::new(255, 0, 0, 1.0));
    s.present(Millis::ZERO);
    assert!(s.frame().pixel(8, 8).unwrap()[3] > 0);

    s.clear();
    s.present(Millis(16.0));
    assert_eq!(s.frame().pixel(8, 8).unwrap(), [0, 0, 0, 0]);
}

#[test]
fn gradient_line_is_opaque_at_head_and_faint_at_tail() {
    let mut s = CpuSurface::new(vp(64, 16)).unwrap();
    s.clear();
    s.stroke_gradient_line(
        Point::new(2.0, 8.0),
        Point::new(62.0, 8.0),
        4.0,
        Rgba::new(213, 183, 112, 1.0),
        Rgba::new(213, 183, 112, 0.0),
    );
    s.present(Millis::ZERO);
    let frame = s.frame();
    let head = frame.pixel(4, 8).unwrap()[3];
    let tail = frame.pixel(60, 8).unwrap()[3];
    assert!(head > tail, "head alpha {head} should exceed tail alpha {tail}");
}

#[test]
fn resize_reallocates_and_drops_gradient_cache() {
    let mut s = CpuSurface::new(vp(16, 16)).unwrap();
    s.fill_radial_gradient(
        Point::new(8.0, 8.0),
        8.0,
        Rgba::new(75, 0, 130, 0.15),
        Rgba::transparent(),
    );
    assert_eq!(s.gradient_cache.len(), 1);
    s.resize(vp(32, 8)).unwrap();
    assert!(s.gradient_cache.is_empty());
    assert_eq!(s.viewport(), vp(32, 8));
    s.present(Millis::ZERO);
    assert_eq!(s.frame().data.len(), 32 * 8 * 4);
}

#[test]
fn unpremultiply_restores_straight_color() {
    let mut f = FrameRGBA {
        width: 1,
        height: 1,
        data: vec![64, 32, 0, 128],
        premultiplied: true,
    };
    f.unpremultiply();
    assert!(!f.premultiplied);
    assert_eq!(f.data, vec![128, 64, 0, 128]);
}
