use macroquad::prelude::*;

use crate::actors::animation::{Action, FrameRef};

// 调色板：字符 → 颜色，第二个参数为配置中的主色
type PaletteFn = fn(char, Color) -> Option<Color>;

#[derive(Clone, Copy, Debug)]
pub struct PixelSprite {
    pub w: u8,
    pub h: u8,
    pub rows: &'static [&'static str],
}

impl PixelSprite {
    // 按字符像素点阵绘制精灵，可水平镜像
    pub fn draw(&self, origin: Vec2, scale: f32, flip_x: bool, palette: PaletteFn, tint: Color) {
        let w = self.w as usize;
        let h = self.h as usize;
        if w == 0 || h == 0 || self.rows.is_empty() {
            return;
        }

        for (y, row) in self.rows.iter().enumerate().take(h) {
            let bytes = row.as_bytes();
            for x in 0..w {
                let ch = bytes.get(x).copied().unwrap_or(b'.') as char;
                if ch == '.' {
                    continue;
                }
                if let Some(color) = palette(ch, tint) {
                    let col = if flip_x { w - 1 - x } else { x };
                    let px = origin.x + col as f32 * scale;
                    let py = origin.y + y as f32 * scale;
                    draw_rectangle(px, py, scale, scale, color);
                }
            }
        }
    }

    // 等比缩放进矩形：水平居中、底部对齐
    pub fn draw_in(&self, rect: Rect, flip_x: bool, palette: PaletteFn, tint: Color) {
        let scale = (rect.w / self.w as f32).min(rect.h / self.h as f32);
        let origin = vec2(
            rect.x + (rect.w - self.w as f32 * scale) * 0.5,
            rect.y + rect.h - self.h as f32 * scale,
        );
        self.draw(origin, scale, flip_x, palette, tint);
    }
}

// 程序化骑士与关卡装饰，贴图缺失时使用
#[derive(Clone, Copy, Debug)]
pub struct PixelUi {
    idle: [PixelSprite; 3],
    running: [PixelSprite; 4],
}

impl PixelUi {
    pub fn new() -> Self {
        Self {
            idle: [KNIGHT_STAND, KNIGHT_BLINK, KNIGHT_STAND],
            running: [KNIGHT_RUN_A, KNIGHT_RUN_B, KNIGHT_RUN_C, KNIGHT_RUN_D],
        }
    }

    // 跑步八帧复用四种腿部姿势
    fn knight_sprite(&self, frame: FrameRef) -> &PixelSprite {
        match frame.action {
            Action::Idle => &self.idle[frame.image % self.idle.len()],
            Action::Running => &self.running[frame.image % self.running.len()],
        }
    }

    pub fn draw_knight(&self, frame: FrameRef, rect: Rect, tint: Color) {
        self.knight_sprite(frame)
            .draw_in(rect, frame.flip_x, knight_palette, tint);
    }

    pub fn draw_flag(&self, rect: Rect, tint: Color) {
        FLAG_SPRITE.draw_in(rect, false, flag_palette, tint);
    }

    pub fn draw_bush(&self, rect: Rect, tint: Color) {
        BUSH_SPRITE.draw_in(rect, false, bush_palette, tint);
    }
}

const KNIGHT_STAND: PixelSprite = PixelSprite {
    w: 10,
    h: 12,
    rows: &[
        "...HHHH...",
        "..HHHHHHP.",
        "..HVVVVH..",
        "..HHHHHH..",
        "...AAAA...",
        "..AAAAAA..",
        ".GAAAAAAG.",
        "..ABBBBA..",
        "..AAAAAA..",
        "...LL.LL..",
        "...LL.LL..",
        "..FFF.FFF.",
    ],
};

const KNIGHT_BLINK: PixelSprite = PixelSprite {
    w: 10,
    h: 12,
    rows: &[
        "...HHHH...",
        "..HHHHHHP.",
        "..HHHHHH..",
        "..HHHHHH..",
        "...AAAA...",
        "..AAAAAA..",
        ".GAAAAAAG.",
        "..ABBBBA..",
        "..AAAAAA..",
        "...LL.LL..",
        "...LL.LL..",
        "..FFF.FFF.",
    ],
};

const KNIGHT_RUN_A: PixelSprite = PixelSprite {
    w: 10,
    h: 12,
    rows: &[
        "...HHHH...",
        "..HHHHHHP.",
        "..HHVVVV..",
        "..HHHHHH..",
        "...AAAA...",
        "..AAAAAAG.",
        ".GAAAAAA..",
        "..ABBBBA..",
        "..AAAAAA..",
        "..LL..LL..",
        ".LL....LL.",
        "FF......FF",
    ],
};

const KNIGHT_RUN_B: PixelSprite = PixelSprite {
    w: 10,
    h: 12,
    rows: &[
        "...HHHH...",
        "..HHHHHHP.",
        "..HHVVVV..",
        "..HHHHHH..",
        "...AAAA...",
        "..AAAAAA..",
        "..GAAAAG..",
        "..ABBBBA..",
        "..AAAAAA..",
        "...LLLL...",
        "....LL....",
        "...FFFF...",
    ],
};

const KNIGHT_RUN_C: PixelSprite = PixelSprite {
    w: 10,
    h: 12,
    rows: &[
        "...HHHH...",
        "..HHHHHHP.",
        "..HHVVVV..",
        "..HHHHHH..",
        "...AAAA...",
        ".GAAAAAA..",
        "..AAAAAAG.",
        "..ABBBBA..",
        "..AAAAAA..",
        "..LL.LL...",
        ".LL...LL..",
        ".FF....FF.",
    ],
};

const KNIGHT_RUN_D: PixelSprite = PixelSprite {
    w: 10,
    h: 12,
    rows: &[
        "...HHHH...",
        "..HHHHHHP.",
        "..HHVVVV..",
        "..HHHHHH..",
        "...AAAA...",
        "..AAAAAA..",
        "..GAAAAG..",
        "..ABBBBA..",
        "..AAAAAA..",
        "...LLLL...",
        "...LL.....",
        "..FFF.FF..",
    ],
};

const FLAG_SPRITE: PixelSprite = PixelSprite {
    w: 8,
    h: 10,
    rows: &[
        "PYYYYY..",
        "PYYYYYY.",
        "PYYYYY..",
        "P.......",
        "P.......",
        "P.......",
        "P.......",
        "P.......",
        "P.......",
        "PP......",
    ],
};

const BUSH_SPRITE: PixelSprite = PixelSprite {
    w: 8,
    h: 6,
    rows: &[
        "..GGGG..",
        ".GGGGGG.",
        "GGGgGGGG",
        "GGGGGgGG",
        ".GGGGGG.",
        "..T..T..",
    ],
};

// 主色按比例压暗
fn shade(c: Color, k: f32) -> Color {
    Color::new(c.r * k, c.g * k, c.b * k, c.a)
}

// 骑士配色：盔甲随玩家主色变化
fn knight_palette(ch: char, tint: Color) -> Option<Color> {
    match ch {
        'H' => Some(Color::new(0.74, 0.77, 0.82, 1.0)),
        'V' => Some(Color::new(0.08, 0.08, 0.12, 1.0)),
        'P' | 'A' => Some(tint),
        'G' => Some(Color::new(0.62, 0.65, 0.7, 1.0)),
        'B' => Some(Color::new(0.42, 0.28, 0.14, 1.0)),
        'L' => Some(shade(tint, 0.7)),
        'F' => Some(Color::new(0.25, 0.17, 0.1, 1.0)),
        _ => None,
    }
}

fn flag_palette(ch: char, tint: Color) -> Option<Color> {
    match ch {
        'P' => Some(Color::new(0.55, 0.55, 0.6, 1.0)),
        'Y' => Some(tint),
        _ => None,
    }
}

fn bush_palette(ch: char, tint: Color) -> Option<Color> {
    match ch {
        'G' => Some(tint),
        'g' => Some(Color::new(
            (tint.r + 0.2).min(1.0),
            (tint.g + 0.2).min(1.0),
            (tint.b + 0.2).min(1.0),
            1.0,
        )),
        'T' => Some(Color::new(0.35, 0.22, 0.12, 1.0)),
        _ => None,
    }
}
