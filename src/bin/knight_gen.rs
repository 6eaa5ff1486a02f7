use image::{ImageBuffer, Rgba, RgbaImage};
use std::f32::consts::TAU;

// 与游戏内 SHEET_FRAME_SIZE 保持一致
const FRAME_SIZE: u32 = 32;
const IDLE_FRAMES: usize = 3;
const RUN_FRAMES: usize = 8;

#[derive(Clone, Copy)]
struct Color {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

impl Color {
    const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

const HELMET: Color = Color::rgba(190, 196, 208, 255);
const VISOR: Color = Color::rgba(20, 20, 30, 255);
const ARMOR: Color = Color::rgba(196, 58, 49, 255);
const ARMOR_DARK: Color = Color::rgba(138, 40, 34, 255);
const BELT: Color = Color::rgba(107, 72, 36, 255);
const BOOT: Color = Color::rgba(64, 44, 26, 255);
const PLUME: Color = Color::rgba(240, 200, 70, 255);

fn blend(dst: Color, src: Color) -> Color {
    if src.a == 255 {
        return src;
    }
    let sa = src.a as f32 / 255.0;
    let da = dst.a as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Color::rgba(0, 0, 0, 0);
    }
    let r = (src.r as f32 * sa + dst.r as f32 * da * (1.0 - sa)) / out_a;
    let g = (src.g as f32 * sa + dst.g as f32 * da * (1.0 - sa)) / out_a;
    let b = (src.b as f32 * sa + dst.b as f32 * da * (1.0 - sa)) / out_a;
    Color::rgba(r as u8, g as u8, b as u8, (out_a * 255.0) as u8)
}

fn set_px(img: &mut RgbaImage, x: i32, y: i32, color: Color) {
    if x < 0 || y < 0 {
        return;
    }
    let (w, h) = img.dimensions();
    if x as u32 >= w || y as u32 >= h {
        return;
    }
    let dst = img.get_pixel(x as u32, y as u32);
    let dst = Color::rgba(dst[0], dst[1], dst[2], dst[3]);
    let out = blend(dst, color);
    img.put_pixel(x as u32, y as u32, Rgba([out.r, out.g, out.b, out.a]));
}

// 以左上角与宽高填充矩形，限制在帧内
fn fill_rect(img: &mut RgbaImage, frame: (i32, i32), x: i32, y: i32, w: i32, h: i32, color: Color) {
    let size = FRAME_SIZE as i32;
    for py in y.max(0)..(y + h).min(size) {
        for px in x.max(0)..(x + w).min(size) {
            set_px(img, frame.0 + px, frame.1 + py, color);
        }
    }
}

fn fill_ellipse(img: &mut RgbaImage, frame: (i32, i32), cx: i32, cy: i32, rx: i32, ry: i32, color: Color) {
    let rx2 = (rx * rx) as f32;
    let ry2 = (ry * ry) as f32;
    for y in (cy - ry)..=(cy + ry) {
        for x in (cx - rx)..=(cx + rx) {
            let dx = (x - cx) as f32;
            let dy = (y - cy) as f32;
            if (dx * dx) / rx2 + (dy * dy) / ry2 <= 1.0 {
                fill_rect(img, frame, x, y, 1, 1, color);
            }
        }
    }
}

// 绘制一帧骑士：bob 为上下起伏，stride 为双腿前后摆动（像素）
fn draw_knight_frame(img: &mut RgbaImage, frame: (i32, i32), bob: i32, stride: i32, blink: bool) {
    let cx = 16;
    let top = 4 + bob;

    // 头盔与羽饰
    fill_ellipse(img, frame, cx, top + 5, 6, 5, HELMET);
    fill_rect(img, frame, cx + 4, top - 1, 3, 3, PLUME);
    if !blink {
        fill_rect(img, frame, cx - 1, top + 4, 6, 2, VISOR);
    }

    // 躯干、手臂与腰带
    fill_rect(img, frame, cx - 5, top + 10, 10, 9, ARMOR);
    fill_rect(img, frame, cx - 7, top + 11, 2, 6 - stride.abs() / 2, ARMOR_DARK);
    fill_rect(img, frame, cx + 5, top + 11, 2, 6 - stride.abs() / 2, ARMOR_DARK);
    fill_rect(img, frame, cx - 5, top + 16, 10, 2, BELT);

    // 双腿与靴子
    let hip = top + 19;
    let leg_h = 27 - hip;
    fill_rect(img, frame, cx - 4 + stride, hip, 3, leg_h, ARMOR_DARK);
    fill_rect(img, frame, cx + 1 - stride, hip, 3, leg_h, ARMOR_DARK);
    fill_rect(img, frame, cx - 5 + stride, 27, 5, 2, BOOT);
    fill_rect(img, frame, cx + 1 - stride, 27, 5, 2, BOOT);
}

fn main() -> Result<(), String> {
    let width = FRAME_SIZE * RUN_FRAMES as u32;
    let height = FRAME_SIZE * 2;
    let mut img: RgbaImage = ImageBuffer::new(width, height);

    // 第 0 行：待机（第二帧眨眼，第三帧轻微下沉）
    for frame in 0..IDLE_FRAMES {
        let origin = ((frame as u32 * FRAME_SIZE) as i32, 0);
        let bob = if frame == 2 { 1 } else { 0 };
        draw_knight_frame(&mut img, origin, bob, 0, frame == 1);
    }

    // 第 1 行：跑步，按相位摆腿
    for frame in 0..RUN_FRAMES {
        let origin = ((frame as u32 * FRAME_SIZE) as i32, FRAME_SIZE as i32);
        let phase = frame as f32 / RUN_FRAMES as f32 * TAU;
        let stride = (phase.sin() * 3.0).round() as i32;
        let bob = ((phase * 2.0).cos() * -1.0).round() as i32;
        draw_knight_frame(&mut img, origin, bob, stride, false);
    }

    std::fs::create_dir_all("assets").map_err(|e| format!("mkdir failed: {e}"))?;
    img.save("assets/knight.png")
        .map_err(|e| format!("save failed: {e}"))?;
    println!("wrote assets/knight.png ({}x{})", width, height);
    Ok(())
}
