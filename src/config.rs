use std::fs;
use std::io;
use std::path::Path;

use macroquad::prelude::{Color, Conf};
use serde::Deserialize;
use thiserror::Error;

pub const SETTINGS_PATH: &str = "data/settings.json";

// 降低内部渲染分辨率，放大时呈现像素风文本与画面
pub const INTERNAL_RENDER_SCALE: f32 = 0.5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings: {0}")]
    Io(#[from] io::Error),
    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

// 全部配置：窗口、配色、玩家手感
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window: WindowSettings,
    pub colors: ColorSettings,
    pub player: PlayerSettings,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub screen_width: f32,
    pub screen_height: f32,
    pub tile_size: f32,
    pub fps: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Pixel Jump".to_string(),
            screen_width: 1280.0,
            screen_height: 720.0,
            tile_size: 64.0,
            fps: 60,
        }
    }
}

// 颜色以 [r, g, b] 字节形式保存
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ColorSettings {
    pub player: [u8; 3],
    pub background: [u8; 3],
    pub tile: [u8; 3],
    pub target: [u8; 3],
    pub prop: [u8; 3],
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self {
            player: [196, 58, 49],
            background: [24, 26, 38],
            tile: [92, 74, 60],
            target: [250, 210, 60],
            prop: [60, 110, 70],
        }
    }
}

// 每个模拟步的移动常量（像素）
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    pub horizontal_velocity: f32,
    pub vertical_velocity: f32,
    pub gravity: f32,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            horizontal_velocity: 8.0,
            vertical_velocity: 20.0,
            gravity: 1.0,
        }
    }
}

impl Settings {
    // 从JSON文件加载配置并校验
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&text)?;
        settings.validate()?;
        Ok(settings)
    }

    // 加载失败时退回默认配置
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => {
                log::info!("loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("{err}; using default settings");
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.window.tile_size <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "window.tile_size",
                reason: format!("must be positive, got {}", self.window.tile_size),
            });
        }
        if self.window.fps == 0 {
            return Err(ConfigError::Invalid {
                field: "window.fps",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.window.screen_width <= 0.0 || self.window.screen_height <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "window.screen_width/screen_height",
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    // 模拟步长（秒）
    pub fn step_seconds(&self) -> f32 {
        1.0 / self.window.fps as f32
    }
}

// 字节配色转换为 macroquad 颜色
pub fn rgb(c: [u8; 3]) -> Color {
    Color::from_rgba(c[0], c[1], c[2], 255)
}

// 配置窗口标题、尺寸与可变大小选项
// 此时日志尚未初始化，静默读取；读取失败的告警由 app::run 输出
pub fn window_conf() -> Conf {
    let settings = Settings::load(SETTINGS_PATH).unwrap_or_default();
    conf_for(&settings)
}

fn conf_for(settings: &Settings) -> Conf {
    let resizable = cfg!(any(target_os = "windows", target_os = "macos", target_os = "linux"));
    Conf {
        window_title: settings.window.title.clone(),
        window_width: settings.window.screen_width as i32,
        window_height: settings.window.screen_height as i32,
        high_dpi: true,
        window_resizable: resizable,
        ..Default::default()
    }
}
