use std::path::Path;

use macroquad::prelude::*;

use crate::audio::SoundBank;

pub const AUDIO_DIR: &str = "assets/audio";
pub const MUSIC_PATH: &str = "assets/music/bgm.wav";
pub const KNIGHT_SHEET_PATH: &str = "assets/knight.png";

// 贴图表布局：第 0 行待机，第 1 行跑步，每帧为正方形
pub const SHEET_FRAME_SIZE: f32 = 32.0;

// 加载UI字体，优先使用项目资源中的字体，其次尝试系统字体
pub async fn load_ui_font() -> Option<Font> {
    let candidates = [
        "assets/PressStart2P-Regular.ttf",
        "assets/font.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
        "/System/Library/Fonts/Supplemental/Comic Sans MS Bold.ttf",
        "/Library/Fonts/Arial.ttf",
        "C:/Windows/Fonts/comicbd.ttf",
        "C:/Windows/Fonts/arialbd.ttf",
    ];

    for path in candidates {
        // 跳过不存在的候选路径
        if !Path::new(path).exists() {
            continue;
        }
        // 成功加载即可返回
        if let Ok(font) = load_ttf_font(path).await {
            log::info!("using font {path}");
            return Some(font);
        }
    }

    log::warn!("no UI font found, falling back to the built-in font");
    None
}

// 加载骑士贴图表（由 knight_gen 生成），不存在时返回 None
pub async fn load_knight_sheet() -> Option<Texture2D> {
    if !Path::new(KNIGHT_SHEET_PATH).exists() {
        log::info!("{KNIGHT_SHEET_PATH} missing, drawing procedural knight");
        return None;
    }
    match load_texture(KNIGHT_SHEET_PATH).await {
        Ok(texture) => {
            texture.set_filter(FilterMode::Nearest);
            Some(texture)
        }
        Err(err) => {
            log::warn!("failed to load {KNIGHT_SHEET_PATH}: {err:?}");
            None
        }
    }
}

// 启动时一次性加载的全部资源
pub struct Assets {
    pub knight_sheet: Option<Texture2D>,
    pub sounds: SoundBank,
}

impl Assets {
    pub async fn load() -> Self {
        Self {
            knight_sheet: load_knight_sheet().await,
            sounds: SoundBank::load(AUDIO_DIR, MUSIC_PATH).await,
        }
    }
}
