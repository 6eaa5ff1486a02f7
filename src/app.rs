use macroquad::prelude::*;
use ::rand::rngs::SmallRng;
use ::rand::SeedableRng;

use crate::actors::player::{FrameEnv, Player};
use crate::assets::{load_ui_font, Assets};
use crate::audio::{AudioSink, MusicCommand};
use crate::config::{rgb, Settings, INTERNAL_RENDER_SCALE, SETTINGS_PATH};
use crate::pixel::PixelUi;
use crate::render::{draw_death, draw_debug, draw_hud, draw_level, draw_player};
use crate::systems::KeyboardInput;
use crate::ui::{draw_overlay, Ui};
use crate::world::{Level, LEVEL_PATH};

// 单个渲染帧内最多补跑的模拟步数
const MAX_STEPS_PER_FRAME: u32 = 5;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AppMode {
    Playing,
    Paused,
    Won,
}

// 单调毫秒时钟
fn now_ms() -> u64 {
    (get_time() * 1000.0) as u64
}

// 游戏主循环：加载配置与关卡，按固定步长推进玩家并渲染
pub async fn run() {
    let settings = Settings::load_or_default(SETTINGS_PATH);
    let screen_w = settings.window.screen_width;
    let screen_h = settings.window.screen_height;
    let tile = settings.window.tile_size;

    let level = Level::load_from_file(LEVEL_PATH, tile).unwrap_or_else(|err| {
        log::warn!("{err}; using built-in level");
        Level::builtin(tile)
    });
    log::info!(
        "level ready: {} solids, spawn {:?}",
        level.solids().len(),
        level.spawn()
    );

    let ui = Ui {
        font: load_ui_font().await,
        screen_w,
        screen_h,
    };
    let mut assets = Assets::load().await;
    let pixels = PixelUi::new();
    let player_color = rgb(settings.colors.player);

    let mut player = Player::new(
        level.spawn(),
        tile,
        &level,
        settings.player,
        SmallRng::from_entropy(),
    );
    let mut input = KeyboardInput::default();
    let mut mode = AppMode::Playing;
    let step = settings.step_seconds();
    let mut accumulator = 0.0;
    let mut show_debug = false;

    // 关闭窗口交给玩家输入处理
    prevent_quit();
    assets.sounds.music(MusicCommand::Play);

    // 低分辨率渲染目标，用于像素风画面
    let rt_w = (screen_w * INTERNAL_RENDER_SCALE).max(1.0) as u32;
    let rt_h = (screen_h * INTERNAL_RENDER_SCALE).max(1.0) as u32;
    let rt_w_f = rt_w as f32;
    let rt_h_f = rt_h as f32;
    let render_target = render_target(rt_w, rt_h);
    render_target.texture.set_filter(FilterMode::Nearest);

    loop {
        if is_key_pressed(KeyCode::F3) {
            show_debug = !show_debug;
        }
        match mode {
            AppMode::Playing => {
                input.collect();
                accumulator = (accumulator + get_frame_time()).min(step * MAX_STEPS_PER_FRAME as f32);
                while accumulator >= step {
                    accumulator -= step;
                    let env = FrameEnv {
                        now_ms: now_ms(),
                        viewport_height: screen_h,
                    };
                    let report = player.update(&mut input, &mut assets.sounds, env);
                    if report.quit_requested {
                        log::info!("quit requested");
                        std::process::exit(0);
                    }
                    if report.died {
                        log::info!("player died, respawning in 3s");
                    }
                    if report.pause_requested {
                        mode = AppMode::Paused;
                        break;
                    }
                    if report.reached_target {
                        log::info!("target reached");
                        mode = AppMode::Won;
                        break;
                    }
                }
            }
            AppMode::Paused => {
                if is_key_pressed(KeyCode::Escape) {
                    mode = AppMode::Playing;
                    accumulator = 0.0;
                }
            }
            AppMode::Won => {
                if is_key_pressed(KeyCode::Enter) {
                    player.restart(&mut assets.sounds);
                    mode = AppMode::Playing;
                    accumulator = 0.0;
                } else if is_key_pressed(KeyCode::Escape) {
                    std::process::exit(0);
                }
            }
        }
        // 暂停或通关界面下直接响应关闭窗口
        if mode != AppMode::Playing && is_quit_requested() {
            std::process::exit(0);
        }

        // 相机水平跟随玩家，限制在关卡范围内
        let cam_x = (player.rect().center().x - screen_w * 0.5)
            .clamp(0.0, (level.width() - screen_w).max(0.0));
        let mut camera = Camera2D::from_display_rect(Rect::new(cam_x, 0.0, screen_w, screen_h));
        camera.render_target = Some(render_target.clone());
        set_camera(&camera);

        draw_level(&pixels, &level, &settings.colors);
        draw_player(&pixels, assets.knight_sheet.as_ref(), &player, player_color);

        // 屏幕空间的界面层
        let mut overlay = Camera2D::from_display_rect(Rect::new(0.0, 0.0, screen_w, screen_h));
        overlay.render_target = Some(render_target.clone());
        set_camera(&overlay);

        draw_hud(&ui, &player);
        draw_death(&ui, &player);
        if show_debug {
            draw_debug(&ui, &player);
        }
        match mode {
            AppMode::Paused => draw_overlay(&ui, "PAUSED", WHITE, "ESC resume", 0.6),
            AppMode::Won => draw_overlay(&ui, "YOU WIN!", GOLD, "ENTER play again  ESC quit", 0.6),
            AppMode::Playing => {}
        }

        // 回到默认相机并放大显示
        let (scale, offset_x, offset_y) = compute_viewport(screen_w, screen_h);
        set_default_camera();
        clear_background(BLACK);
        draw_texture_ex(
            &render_target.texture,
            offset_x,
            offset_y,
            WHITE,
            DrawTextureParams {
                // RenderTarget 在纹理坐标系中是倒置的，这里做一次垂直翻转
                source: Some(Rect::new(0.0, rt_h_f, rt_w_f, -rt_h_f)),
                dest_size: Some(vec2(screen_w * scale, screen_h * scale)),
                ..Default::default()
            },
        );

        next_frame().await;
    }
}

// 根据窗口尺寸计算缩放比例与居中偏移
fn compute_viewport(logical_w: f32, logical_h: f32) -> (f32, f32, f32) {
    let sw = screen_width();
    let sh = screen_height();
    let scale = (sw / logical_w).min(sh / logical_h).max(0.1);
    let offset_x = (sw - logical_w * scale) * 0.5;
    let offset_y = (sh - logical_h * scale) * 0.5;
    (scale, offset_x, offset_y)
}
