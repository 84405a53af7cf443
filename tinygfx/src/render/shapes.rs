use std::mem::swap;

use bitflags::bitflags;

use super::Gfx;
use crate::device::Device;
use crate::graphics::Color565;
use crate::layout::{Coord, Rect};

bitflags! {
    /// Quarter-circle arcs for [`Gfx::draw_circle_helper`]
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Quadrants: u8 {
        const TOP_LEFT = 0x1;
        const TOP_RIGHT = 0x2;
        const BOTTOM_RIGHT = 0x4;
        const BOTTOM_LEFT = 0x8;
    }
}

bitflags! {
    /// Half discs for [`Gfx::fill_circle_helper`]
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Halves: u8 {
        const RIGHT = 0x1;
        const LEFT = 0x2;
    }
}

/// A straight run of pixels produced while stepping a line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Span {
    Horizontal { x: Coord, y: Coord, len: Coord },
    Vertical { x: Coord, y: Coord, len: Coord },
}

/// Integer Bresenham, emitted as runs: one [`Span`] per minor-axis step.
///
/// Endpoints are normalized before stepping, so a line and its reverse
/// produce the same pixels. Only the part of the line whose major-axis
/// coordinate falls inside `within` is stepped; the stepping state is
/// resumed at the first such column rather than walked to it. Clipping on
/// the minor axis is left to whoever consumes the spans.
pub fn line_spans(
    x0: Coord,
    y0: Coord,
    x1: Coord,
    y1: Coord,
    within: Rect,
    mut emit: impl FnMut(Span),
) {
    if within.is_empty() {
        return;
    }
    let (mut x0, mut y0, mut x1, mut y1) = (
        i64::from(x0),
        i64::from(y0),
        i64::from(x1),
        i64::from(y1),
    );
    let steep = (y1 - y0).abs() > (x1 - x0).abs();
    let (lo, hi) = match steep {
        true => {
            swap(&mut x0, &mut y0);
            swap(&mut x1, &mut y1);
            (within.y, within.max_y())
        }
        false => (within.x, within.max_x()),
    };
    if x0 > x1 {
        swap(&mut x0, &mut x1);
        swap(&mut y0, &mut y1);
    }
    let first = x0.max(i64::from(lo));
    let last = x1.min(i64::from(hi));
    if first > last {
        return;
    }

    let dx = x1 - x0;
    let dy = (y1 - y0).abs();
    let ystep = if y0 < y1 { 1 } else { -1 };

    // After k columns the error term is dx/2 - k*dy + steps*dx, kept in [0, dx)
    let (steps, mut err) = match dx {
        0 => (0, 0),
        _ => {
            let owed = i128::from(first - x0) * i128::from(dy) - i128::from(dx / 2);
            let dx = i128::from(dx);
            let steps = (owed + dx - 1).div_euclid(dx);
            (steps as i64, (steps * dx - owed) as i64)
        }
    };
    let mut y = y0 + ystep * steps;
    let mut run_start = first;

    for x in first..=last {
        err -= dy;
        let step = err < 0;
        if step || x == last {
            let len = (x - run_start + 1) as Coord;
            emit(match steep {
                true => Span::Vertical {
                    x: y as Coord,
                    y: run_start as Coord,
                    len,
                },
                false => Span::Horizontal {
                    x: run_start as Coord,
                    y: y as Coord,
                    len,
                },
            });
            run_start = x + 1;
        }
        if step {
            y += ystep;
            err += dx;
        }
    }
}

/// Incremental state of the midpoint circle algorithm, one octant at a time.
struct Midpoint {
    f: i64,
    ddf_x: i64,
    ddf_y: i64,
    x: i64,
    y: i64,
}
impl Midpoint {
    fn new(r: i64) -> Self {
        Self {
            f: 1 - r,
            ddf_x: 1,
            ddf_y: -2 * r,
            x: 0,
            y: r,
        }
    }

    /// Advances one column; `None` once the octant is exhausted.
    fn step(&mut self) -> Option<(i64, i64)> {
        if self.x >= self.y {
            return None;
        }
        if self.f >= 0 {
            self.y -= 1;
            self.ddf_y += 2;
            self.f += self.ddf_y;
        }
        self.x += 1;
        self.ddf_x += 2;
        self.f += self.ddf_x;
        Some((self.x, self.y))
    }
}

/// x where the edge leaving `(xa, ya)` with slope `dx / dy` crosses row `y`.
/// Truncates toward zero, like an accumulator stepped one row at a time.
fn edge_x(xa: i64, ya: i64, dx: i64, dy: i64, y: i64) -> i64 {
    xa + (i128::from(dx) * i128::from(y - ya) / i128::from(dy)) as i64
}

impl<'f, D: Device> Gfx<'f, D> {
    /// Bresenham with clipping per run; used when an endpoint is off the surface.
    pub fn write_slash_line(
        &mut self,
        x0: Coord,
        y0: Coord,
        x1: Coord,
        y1: Coord,
        color: Color565,
    ) {
        let surface = Rect::new(0, 0, self.width(), self.height());
        line_spans(x0, y0, x1, y1, surface, |span| match span {
            Span::Horizontal { x, y, len } => self.write_fast_hline(x, y, len, color),
            Span::Vertical { x, y, len } => self.write_fast_vline(x, y, len, color),
        });
    }

    pub fn draw_circle(&mut self, x0: Coord, y0: Coord, r: Coord, color: Color565) {
        let (cx, cy, r) = (i64::from(x0), i64::from(y0), i64::from(r));
        if r <= 0 || self.misses(cx - r, cy - r, cx + r, cy + r) {
            return;
        }
        self.batch(|gfx| {
            gfx.plot(cx, cy + r, color);
            gfx.plot(cx, cy - r, color);
            gfx.plot(cx + r, cy, color);
            gfx.plot(cx - r, cy, color);

            let mut mid = Midpoint::new(r);
            while let Some((x, y)) = mid.step() {
                // Past the diagonal every point mirrors one already plotted
                if x > y {
                    break;
                }
                gfx.plot(cx + x, cy + y, color);
                gfx.plot(cx - x, cy + y, color);
                gfx.plot(cx + x, cy - y, color);
                gfx.plot(cx - x, cy - y, color);
                if x != y {
                    gfx.plot(cx + y, cy + x, color);
                    gfx.plot(cx - y, cy + x, color);
                    gfx.plot(cx + y, cy - x, color);
                    gfx.plot(cx - y, cy - x, color);
                }
            }
        });
    }

    /// Quarter-circle arcs without the axis-aligned end points; those come
    /// from the straight edges of whatever is being composed.
    pub fn draw_circle_helper(
        &mut self,
        x0: Coord,
        y0: Coord,
        r: Coord,
        quadrants: Quadrants,
        color: Color565,
    ) {
        self.arcs(i64::from(x0), i64::from(y0), i64::from(r), quadrants, color);
    }

    fn arcs(&mut self, cx: i64, cy: i64, r: i64, quadrants: Quadrants, color: Color565) {
        if r <= 0 || self.misses(cx - r, cy - r, cx + r, cy + r) {
            return;
        }
        self.batch(|gfx| {
            let mut mid = Midpoint::new(r);
            while let Some((x, y)) = mid.step() {
                if x > y {
                    break;
                }
                let mirror = x != y;
                if quadrants.contains(Quadrants::BOTTOM_RIGHT) {
                    gfx.plot(cx + x, cy + y, color);
                    if mirror {
                        gfx.plot(cx + y, cy + x, color);
                    }
                }
                if quadrants.contains(Quadrants::TOP_RIGHT) {
                    gfx.plot(cx + x, cy - y, color);
                    if mirror {
                        gfx.plot(cx + y, cy - x, color);
                    }
                }
                if quadrants.contains(Quadrants::BOTTOM_LEFT) {
                    gfx.plot(cx - x, cy + y, color);
                    if mirror {
                        gfx.plot(cx - y, cy + x, color);
                    }
                }
                if quadrants.contains(Quadrants::TOP_LEFT) {
                    gfx.plot(cx - x, cy - y, color);
                    if mirror {
                        gfx.plot(cx - y, cy - x, color);
                    }
                }
            }
        });
    }

    pub fn fill_circle(&mut self, x0: Coord, y0: Coord, r: Coord, color: Color565) {
        let (cx, cy, r) = (i64::from(x0), i64::from(y0), i64::from(r));
        if r <= 0 || self.misses(cx - r, cy - r, cx + r, cy + r) {
            return;
        }
        self.batch(|gfx| {
            gfx.write_vspan(cx, cy - r, cy + r, color);
            gfx.chords(cx, cy, r, Halves::RIGHT | Halves::LEFT, 0, color);
        });
    }

    /// Fills half discs with vertical chords, excluding the center column.
    /// `delta` stretches every chord downwards, which turns two half discs
    /// into the rounded ends of a filled rounded rectangle.
    pub fn fill_circle_helper(
        &mut self,
        x0: Coord,
        y0: Coord,
        r: Coord,
        halves: Halves,
        delta: Coord,
        color: Color565,
    ) {
        let (cx, cy) = (i64::from(x0), i64::from(y0));
        self.chords(cx, cy, i64::from(r), halves, i64::from(delta), color);
    }

    fn chords(&mut self, cx: i64, cy: i64, r: i64, halves: Halves, delta: i64, color: Color565) {
        if r <= 0 || self.misses(cx - r, cy - r, cx + r, cy + r + delta.max(0)) {
            return;
        }
        self.batch(|gfx| {
            let (mut px, mut py) = (0, r);
            let mut mid = Midpoint::new(r);
            while let Some((x, y)) = mid.step() {
                // Each chord is drawn once, even where octants meet
                if x < y + 1 {
                    if halves.contains(Halves::RIGHT) {
                        gfx.write_vspan(cx + x, cy - y, cy + y + delta, color);
                    }
                    if halves.contains(Halves::LEFT) {
                        gfx.write_vspan(cx - x, cy - y, cy + y + delta, color);
                    }
                }
                if y != py {
                    if halves.contains(Halves::RIGHT) {
                        gfx.write_vspan(cx + py, cy - px, cy + px + delta, color);
                    }
                    if halves.contains(Halves::LEFT) {
                        gfx.write_vspan(cx - py, cy - px, cy + px + delta, color);
                    }
                    py = y;
                }
                px = x;
            }
        });
    }

    pub fn draw_triangle(
        &mut self,
        x0: Coord,
        y0: Coord,
        x1: Coord,
        y1: Coord,
        x2: Coord,
        y2: Coord,
        color: Color565,
    ) {
        self.batch(|gfx| {
            gfx.write_line(x0, y0, x1, y1, color);
            gfx.write_line(x1, y1, x2, y2, color);
            gfx.write_line(x2, y2, x0, y0, color);
        });
    }

    /// Scanline fill, one horizontal span per row from the top vertex to the
    /// bottom one. Rows off the surface are never visited; each visible row
    /// computes its edge crossings directly.
    pub fn fill_triangle(
        &mut self,
        x0: Coord,
        y0: Coord,
        x1: Coord,
        y1: Coord,
        x2: Coord,
        y2: Coord,
        color: Color565,
    ) {
        let (mut x0, mut y0) = (i64::from(x0), i64::from(y0));
        let (mut x1, mut y1) = (i64::from(x1), i64::from(y1));
        let (mut x2, mut y2) = (i64::from(x2), i64::from(y2));

        // Sort by y; strict comparisons keep equal-y vertices in their given order
        if y0 > y1 {
            swap(&mut y0, &mut y1);
            swap(&mut x0, &mut x1);
        }
        if y1 > y2 {
            swap(&mut y2, &mut y1);
            swap(&mut x2, &mut x1);
        }
        if y0 > y1 {
            swap(&mut y0, &mut y1);
            swap(&mut x0, &mut x1);
        }

        let left = x0.min(x1).min(x2);
        let right = x0.max(x1).max(x2);
        if self.misses(left, y0, right, y2) {
            return;
        }

        self.start_write();
        if y0 == y2 {
            self.write_hspan(left, right, y0, color);
            self.end_write();
            return;
        }

        // Upper part: edges 0-1 and 0-2. A flat bottom (y1 == y2) includes row
        // y1 here; otherwise row y1 starts the lower part, edges 1-2 and 0-2.
        // Either way no edge with zero height is ever divided through.
        let split = if y1 == y2 { y1 + 1 } else { y1 };
        let top = y0.max(0);
        let bottom = y2.min(i64::from(self.height()) - 1);
        for y in top..=bottom {
            let a = match y < split {
                true => edge_x(x0, y0, x1 - x0, y1 - y0, y),
                false => edge_x(x1, y1, x2 - x1, y2 - y1, y),
            };
            let b = edge_x(x0, y0, x2 - x0, y2 - y0, y);
            self.write_hspan(a.min(b), a.max(b), y, color);
        }
        self.end_write();
    }

    /// Radius is clamped to half the shorter side.
    pub fn draw_round_rect(
        &mut self,
        x: Coord,
        y: Coord,
        w: Coord,
        h: Coord,
        r: Coord,
        color: Color565,
    ) {
        if w <= 0 || h <= 0 {
            return;
        }
        let r = r.clamp(0, w.min(h) / 2);
        if r == 0 {
            self.draw_rect(x, y, w, h, color);
            return;
        }
        let (left, top) = (i64::from(x), i64::from(y));
        let (right, bottom) = (left + i64::from(w) - 1, top + i64::from(h) - 1);
        let r = i64::from(r);
        self.batch(|gfx| {
            gfx.write_hspan(left + r, right - r, top, color);
            gfx.write_hspan(left + r, right - r, bottom, color);
            gfx.write_vspan(left, top + r, bottom - r, color);
            gfx.write_vspan(right, top + r, bottom - r, color);

            gfx.arcs(left + r, top + r, r, Quadrants::TOP_LEFT, color);
            gfx.arcs(right - r, top + r, r, Quadrants::TOP_RIGHT, color);
            gfx.arcs(right - r, bottom - r, r, Quadrants::BOTTOM_RIGHT, color);
            gfx.arcs(left + r, bottom - r, r, Quadrants::BOTTOM_LEFT, color);
        });
    }

    pub fn fill_round_rect(
        &mut self,
        x: Coord,
        y: Coord,
        w: Coord,
        h: Coord,
        r: Coord,
        color: Color565,
    ) {
        if w <= 0 || h <= 0 {
            return;
        }
        let r = i64::from(r.clamp(0, w.min(h) / 2));
        let (left, top) = (i64::from(x), i64::from(y));
        let (right, bottom) = (left + i64::from(w) - 1, top + i64::from(h) - 1);
        let delta = i64::from(h) - 2 * r - 1;
        self.batch(|gfx| {
            gfx.write_box(left + r, top, right - r, bottom, color);
            gfx.chords(right - r, top + r, r, Halves::RIGHT, delta, color);
            gfx.chords(left + r, top + r, r, Halves::LEFT, delta, color);
        });
    }
}
