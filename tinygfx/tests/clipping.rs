mod support;

use support::gfx;
use test_log::test;
use tinygfx::device::FrameBuffer;
use tinygfx::layout::{Rotation, Size};
use tinygfx::{Color565, Gfx};

const W: i32 = 16;
const H: i32 = 12;

/// Rectangles sharing no pixel with a `W`x`H` surface
fn outside_rects() -> Vec<(i32, i32, i32, i32)> {
    vec![
        (-10, 0, 10, 5),
        (W, 0, 4, 4),
        (0, -7, 5, 7),
        (3, H, 2, 9),
        (-20, -20, 5, 5),
        (W + 3, H + 3, 100, 100),
        (-5, H, 40, 40),
    ]
}

#[test]
fn rectangles_outside_the_surface_never_reach_the_device() {
    let mut gfx = gfx(W, H);
    for (x, y, w, h) in outside_rects() {
        gfx.fill_rect(x, y, w, h, Color565::RED);
        gfx.draw_rect(x, y, w, h, Color565::RED);
        gfx.fill_round_rect(x, y, w, h, 2, Color565::RED);
        gfx.draw_round_rect(x, y, w, h, 2, Color565::RED);
        gfx.write_fill_rect(x, y, w, h, Color565::RED);
    }
    assert_eq!(gfx.device().total_writes(), 0);
    assert!(gfx.device().fill_rects.is_empty());
}

#[test]
fn other_primitives_outside_the_surface_write_nothing() {
    let mut gfx = gfx(W, H);
    gfx.draw_pixel(-1, 0, Color565::RED);
    gfx.draw_pixel(W, H, Color565::RED);
    gfx.draw_fast_hline(-10, 3, 10, Color565::RED);
    gfx.draw_fast_vline(3, H, 5, Color565::RED);
    gfx.draw_line(-5, -5, -1, 20, Color565::RED);
    gfx.draw_circle(-30, 5, 8, Color565::RED);
    gfx.fill_circle(5, 40, 8, Color565::RED);
    gfx.fill_triangle(-9, 0, -3, 5, -1, 11, Color565::RED);
    gfx.draw_bitmap(W, 0, &[0xFF; 8], 8, 8, Color565::RED);
    gfx.draw_16bit_rgb_bitmap(0, -4, &[0xFFFF; 16], None, 4, 4);
    gfx.set_cursor(W + 1, 0);
    gfx.set_text_wrap(false);
    gfx.print("offscreen");
    assert_eq!(gfx.device().total_writes(), 0);
}

#[test]
fn shapes_hanging_off_every_edge_stay_in_bounds_under_rotation() {
    // The recording device asserts that every write lands on the surface
    for index in 0..4 {
        let mut gfx = gfx(W, H);
        gfx.set_rotation(Rotation::from_index(index));
        let (w, h) = (gfx.width(), gfx.height());
        gfx.fill_circle(0, 0, 6, Color565::WHITE);
        gfx.draw_circle(w - 1, h - 1, 7, Color565::WHITE);
        gfx.draw_line(-20, h / 2, w + 20, h / 2 + 3, Color565::WHITE);
        gfx.draw_line(w / 2, -30, w / 2 - 4, h + 30, Color565::WHITE);
        gfx.fill_triangle(-5, -5, w + 5, h / 2, 2, h + 5, Color565::WHITE);
        gfx.fill_round_rect(-4, h - 4, 10, 10, 4, Color565::WHITE);
        gfx.draw_round_rect(w - 5, -3, 9, 9, 3, Color565::WHITE);
        gfx.draw_grayscale_bitmap(w - 3, h - 3, &[0x80; 36], None, 6, 6);
        gfx.set_cursor(w - 4, h - 4);
        gfx.set_text_size(3);
        gfx.print("Wx");
        assert!(gfx.device().total_writes() > 0, "rotation {index}");
    }
}

#[test]
fn partial_rect_is_trimmed_to_the_visible_part() {
    let mut gfx = gfx(W, H);
    gfx.fill_rect(W - 3, H - 2, 10, 10, Color565::RED);
    let device = gfx.into_device();
    assert_eq!(device.fill_rects, vec![(W - 3, H - 2, 3, 2)]);
    assert_eq!(device.total_writes(), 6);
}

#[test]
fn logical_writes_land_on_the_rotated_panel() {
    let mut gfx = Gfx::new(FrameBuffer::new(Size::new(4, 3)));
    gfx.set_rotation(Rotation::Deg90);
    assert_eq!((gfx.width(), gfx.height()), (3, 4));
    gfx.draw_pixel(0, 0, Color565::RED);
    gfx.draw_pixel(2, 3, Color565::BLUE);

    let fb = gfx.into_device();
    let slice = fb.as_slice();
    // logical (0, 0) is the physical top right corner at 90 degrees
    assert_eq!(slice[3], Color565::RED.0);
    // logical (2, 3) is the physical bottom left corner
    assert_eq!(slice[2 * 4], Color565::BLUE.0);
    assert_eq!(slice.iter().filter(|&&p| p != 0).count(), 2);
}

#[test]
fn every_rotation_maps_the_corners_onto_the_panel_corners() {
    let physical = [(0, 0), (3, 0), (3, 2), (0, 2)];
    for index in 0..4 {
        let mut gfx = Gfx::new(FrameBuffer::new(Size::new(4, 3)));
        gfx.set_rotation(Rotation::from_index(index));
        let (w, h) = (gfx.width(), gfx.height());
        gfx.draw_pixel(0, 0, Color565::WHITE);
        gfx.draw_pixel(w - 1, h - 1, Color565::WHITE);
        let fb = gfx.into_device();
        let lit: Vec<(i32, i32)> = fb
            .as_slice()
            .iter()
            .enumerate()
            .filter(|&(_, &p)| p != 0)
            .map(|(i, _)| ((i % 4) as i32, (i / 4) as i32))
            .collect();
        assert_eq!(lit.len(), 2, "rotation {index}");
        assert!(lit.iter().all(|p| physical.contains(p)), "rotation {index}");
    }
}

#[test]
fn coordinates_at_the_ends_of_the_range_are_clipped_quietly() {
    let mut gfx = gfx(W, H);
    gfx.write_pixel(i32::MAX, i32::MIN, Color565::RED);
    gfx.write_fast_hline(i32::MAX - 1, 0, 4, Color565::RED);
    gfx.write_fast_hline(i32::MIN, 0, 4, Color565::RED);
    gfx.write_fast_vline(0, i32::MAX, i32::MAX, Color565::RED);
    gfx.write_fill_rect(i32::MAX, i32::MAX, i32::MAX, i32::MAX, Color565::RED);
    gfx.write_line(i32::MAX, 0, i32::MAX - 3, 0, Color565::RED);
    gfx.draw_bitmap(i32::MAX - 2, 0, &[0xFF; 8], 8, 8, Color565::RED);
    gfx.draw_bitmap(i32::MIN, i32::MIN, &[0xFF; 8], 8, 8, Color565::RED);
    assert_eq!(gfx.device().total_writes(), 0);

    gfx.write_fast_hline(-4, 1, i32::MAX, Color565::GREEN);
    gfx.write_fast_vline(2, i32::MIN + 1, i32::MAX, Color565::GREEN);
    assert_eq!(gfx.device().painted(Color565::GREEN).len(), W as usize);
}

#[test]
fn text_near_the_right_end_of_the_range_saturates_the_cursor() {
    let mut gfx = gfx(W, H);
    gfx.set_text_wrap(false);
    gfx.set_cursor(i32::MAX - 3, 0);
    gfx.print("ab");
    assert_eq!(gfx.cursor_x(), i32::MAX);
    assert_eq!(gfx.device().total_writes(), 0);
    assert_eq!(gfx.text_bounds("ab", i32::MAX - 3, 0).x, i32::MAX - 3);
}

#[test]
fn inversion_reaches_the_device() {
    let mut gfx = Gfx::new(FrameBuffer::new(Size::new(2, 1)));
    gfx.draw_pixel(0, 0, Color565::WHITE);
    gfx.invert_display(true);
    let fb = gfx.into_device();
    assert!(fb.is_inverted());
    assert_eq!(fb.pixel(0, 0), Some(Color565::WHITE));
    assert_eq!(
        fb.physical_pixels().collect::<Vec<_>>(),
        vec![Color565::BLACK, Color565::WHITE]
    );
}
