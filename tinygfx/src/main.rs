use std::num::NonZeroU32;

use eyre::WrapErr;
use tinygfx::device::FrameBuffer;
use tinygfx::graphics::{color565, BakedFont, Color565, GfxFont};
use tinygfx::layout::{Position, Rotation, Size};
use tinygfx::render::bitmap::{GrayscaleBitmap, IndexedBitmap, MonoBitmap};
use tinygfx::render::shapes::Quadrants;
use tinygfx::Gfx;

use winit::{
    dpi::PhysicalSize,
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    window::WindowBuilder,
};

/// Simulated panel, at rotation 0
const PANEL: Size = Size::new(240, 320);

/// Window pixels per panel pixel
const SCALE: u32 = 2;

/// 8x8 smiley, MSB first
const SMILEY: [u8; 8] = [0x3C, 0x42, 0xA5, 0x81, 0xA5, 0x99, 0x42, 0x3C];

fn draw_scene<'f>(gfx: &mut Gfx<'f, FrameBuffer>, custom: Option<GfxFont<'f>>) {
    gfx.fill_screen(Color565::NAVY);

    gfx.draw_rect(4, 4, 232, 312, Color565::WHITE);
    gfx.fill_round_rect(12, 12, 100, 40, 8, Color565::DARKGREEN);
    gfx.draw_round_rect(12, 12, 100, 40, 8, Color565::GREENYELLOW);
    gfx.fill_circle(170, 32, 20, Color565::ORANGE);
    gfx.draw_circle(170, 32, 24, Color565::YELLOW);
    gfx.draw_circle_helper(
        170,
        32,
        28,
        Quadrants::TOP_LEFT | Quadrants::BOTTOM_RIGHT,
        Color565::CYAN,
    );
    gfx.fill_triangle(20, 120, 60, 70, 100, 120, Color565::MAGENTA);
    gfx.draw_triangle(20, 120, 60, 70, 100, 120, Color565::WHITE);
    for i in 0..8 {
        gfx.draw_line(120, 70, 120 + i * 14, 130, color565(255, 32 * i as u8, 0));
    }

    gfx.set_cursor(12, 140);
    gfx.set_text_color(Color565::WHITE);
    gfx.print("Sphinx of black quartz,\njudge my vow\n");
    gfx.set_text_size(2);
    gfx.set_text_color_bg(Color565::BLACK, Color565::LIGHTGREY);
    gfx.print("size 2\n");
    gfx.set_text_size(1);
    gfx.cp437(true);
    gfx.set_text_color(Color565::PINK);
    gfx.print("\u{1}\u{2}\u{3}\u{4}\u{5}\u{6} ");
    gfx.write(176);
    gfx.write(177);
    gfx.write(178);

    let bounds = gfx.text_bounds("measured", 12, 200);
    gfx.fill_rect(
        bounds.x - 1,
        bounds.y - 1,
        bounds.width + 2,
        bounds.height + 2,
        Color565::DARKCYAN,
    );
    gfx.set_cursor(12, 200);
    gfx.set_text_color(Color565::WHITE);
    gfx.print("measured");

    gfx.draw(&MonoBitmap::new(&SMILEY, 8, 8, Color565::YELLOW), Position::new(12, 220));
    gfx.draw(
        &MonoBitmap::new(&SMILEY, 8, 8, Color565::BLACK).with_background(Color565::YELLOW),
        Position::new(24, 220),
    );
    let ramp: Vec<u8> = (0..32 * 8).map(|i| (i % 32 * 8) as u8).collect();
    gfx.draw(&GrayscaleBitmap::new(&ramp, 32, 8), Position::new(40, 220));
    let palette = [Color565::RED, Color565::GREEN, Color565::BLUE, Color565::WHITE];
    let stripes: Vec<u8> = (0..16 * 8).map(|i| (i % 16 / 4) as u8).collect();
    gfx.draw(
        &IndexedBitmap::new(&stripes, &palette, 16, 8).with_mask(&SMILEY),
        Position::new(80, 220),
    );

    if let Some(font) = custom {
        gfx.set_font(Some(font));
        gfx.set_cursor(12, 260);
        gfx.set_text_color(Color565::GREENYELLOW);
        gfx.print("Custom font");
        gfx.set_font(None);
    }

    // Sideways caption along the right edge
    gfx.set_rotation(Rotation::Deg90);
    gfx.set_cursor(8, 8);
    gfx.set_text_color(Color565::OLIVE);
    gfx.print("rotated 90");
    gfx.set_rotation(Rotation::Deg0);
}

fn main() -> eyre::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let baked = match std::env::args().nth(1) {
        Some(path) => {
            let data = std::fs::read(&path).wrap_err_with(|| format!("reading {path}"))?;
            let font = BakedFont::from_ttf(&data, 16.0, b' ', b'~')
                .wrap_err_with(|| format!("baking {path}"))?;
            Some(font)
        }
        None => None,
    };

    let mut gfx = Gfx::new(FrameBuffer::new(PANEL));
    gfx.begin(None)?;
    draw_scene(&mut gfx, baked.as_ref().map(BakedFont::as_font));
    gfx.flush()?;
    let pixels: Vec<u32> = gfx
        .into_device()
        .physical_pixels()
        .map(Color565::to_xrgb8888)
        .collect();
    log::info!("scene rendered on a {}x{} panel", PANEL.width, PANEL.height);

    let event_loop = EventLoop::new().wrap_err("creating event loop")?;
    let window = WindowBuilder::new()
        .with_title("tinygfx simulator")
        .with_inner_size(PhysicalSize::new(
            PANEL.width as u32 * SCALE,
            PANEL.height as u32 * SCALE,
        ))
        .build(&event_loop)
        .wrap_err("creating window")?;

    let context = unsafe { softbuffer::Context::new(&window) }
        .wrap_err("creating softbuffer context")?;
    let mut surface = unsafe { softbuffer::Surface::new(&context, &window) }
        .wrap_err("creating softbuffer surface")?;

    event_loop
        .run(move |event, _elwt, ctrl| match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                window_id,
            } if window_id == window.id() => ctrl.set_exit(),

            Event::RedrawRequested(window_id) if window_id == window.id() => {
                let size = window.inner_size();
                let (Some(width), Some(height)) =
                    (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
                else {
                    return;
                };
                if let Err(error) = surface.resize(width, height) {
                    log::error!("resizing surface: {error}");
                    return ctrl.set_exit();
                }

                let mut buffer = match surface.buffer_mut() {
                    Ok(buffer) => buffer,
                    Err(error) => {
                        log::error!("mapping surface: {error}");
                        return ctrl.set_exit();
                    }
                };
                let (panel_w, panel_h) = (PANEL.width as u32, PANEL.height as u32);
                for wy in 0..size.height {
                    for wx in 0..size.width {
                        let (px, py) = (wx / SCALE, wy / SCALE);
                        let pixel = match px < panel_w && py < panel_h {
                            true => pixels[(py * panel_w + px) as usize],
                            false => 0,
                        };
                        buffer[(wy * size.width + wx) as usize] = pixel;
                    }
                }

                if let Err(error) = buffer.present() {
                    log::error!("presenting frame: {error}");
                    ctrl.set_exit();
                }
            }
            _ => (),
        })
        .wrap_err("running event loop")
}
