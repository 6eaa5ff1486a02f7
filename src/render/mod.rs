use macroquad::prelude::*;

use crate::actors::animation::Action;
use crate::actors::player::Player;
use crate::assets::SHEET_FRAME_SIZE;
use crate::config::{rgb, ColorSettings};
use crate::pixel::PixelUi;
use crate::ui::{draw_overlay, draw_text_ui, Ui};
use crate::world::Level;

// 地砖按色阶逐级压暗
fn tile_color(base: Color, shade: u8) -> Color {
    let k = 1.0 - (shade.min(9) as f32) * 0.08;
    Color::new(base.r * k, base.g * k, base.b * k, 1.0)
}

// 绘制关卡：背景、装饰、地砖与终点
pub fn draw_level(pixels: &PixelUi, level: &Level, colors: &ColorSettings) {
    clear_background(rgb(colors.background));
    for prop in level.props() {
        pixels.draw_bush(*prop, rgb(colors.prop));
    }
    let base = rgb(colors.tile);
    for tile in level.tiles() {
        let r = tile.rect;
        draw_rectangle(r.x, r.y, r.w, r.h, tile_color(base, tile.shade));
        draw_rectangle_lines(r.x, r.y, r.w, r.h, 2.0, tile_color(base, tile.shade + 2));
    }
    pixels.draw_flag(level.target(), rgb(colors.target));
}

// 绘制玩家：优先使用贴图表，否则绘制像素骑士
pub fn draw_player(pixels: &PixelUi, sheet: Option<&Texture2D>, player: &Player, tint: Color) {
    let frame = player.current_frame();
    let rect = player.rect();
    let Some(sheet) = sheet else {
        pixels.draw_knight(frame, rect, tint);
        return;
    };
    let row = match frame.action {
        Action::Idle => 0.0,
        Action::Running => 1.0,
    };
    draw_texture_ex(
        sheet,
        rect.x,
        rect.y,
        WHITE,
        DrawTextureParams {
            source: Some(Rect::new(
                frame.image as f32 * SHEET_FRAME_SIZE,
                row * SHEET_FRAME_SIZE,
                SHEET_FRAME_SIZE,
                SHEET_FRAME_SIZE,
            )),
            dest_size: Some(vec2(rect.w, rect.h)),
            flip_x: frame.flip_x,
            ..Default::default()
        },
    );
}

// 死亡演出：渐暗遮罩与 YOU DIED
pub fn draw_death(ui: &Ui, player: &Player) {
    if let Some(fade) = player.death_fade() {
        draw_overlay(ui, "YOU DIED", RED, "", fade.alpha());
    }
}

// 绘制HUD信息
pub fn draw_hud(ui: &Ui, player: &Player) {
    let hint = "A/D move  SPACE jump  ESC pause  M mute  F3 debug";
    draw_text_ui(ui, hint, 16.0, ui.screen_h - 20.0, 20, GRAY);
    if player.is_muted() {
        draw_text_ui(ui, "MUTED", ui.screen_w - 90.0, 32.0, 20, GRAY);
    }
}

// 调试信息：速度、跳跃状态与动画帧
pub fn draw_debug(ui: &Ui, player: &Player) {
    let v = player.velocity();
    let spawn = player.spawn();
    let lines = [
        format!("pos {:.0},{:.0}  spawn {:.0},{:.0}", player.rect().x, player.rect().y, spawn.x, spawn.y),
        format!("vel {:.1},{:.1}", v.x, v.y),
        format!("jump {}  double {}", player.can_jump(), player.can_double_jump()),
        format!(
            "{:?} frame {}  left {}",
            player.action(),
            player.frame_index(),
            player.facing_left()
        ),
        format!("step cooldown {}", player.step_cooldown()),
    ];
    for (i, line) in lines.iter().enumerate() {
        draw_text_ui(ui, line, 16.0, 28.0 + i as f32 * 22.0, 18, WHITE);
    }
}
