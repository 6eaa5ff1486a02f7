use std::fs;
use std::path::Path;

use macroquad::prelude::*;

use crate::world::map::{parse_map, LevelError, LevelMap, Tile, DEFAULT_MAP};

pub mod map;

pub const LEVEL_PATH: &str = "data/level.txt";

// 关卡状态：碰撞几何、终点与出生点，创建后只读
pub struct Level {
    map: LevelMap,
    solids: Vec<Rect>,
}

impl Level {
    // 从字符地图构建关卡
    pub fn parse(text: &str, tile_size: f32) -> Result<Self, LevelError> {
        let map = parse_map(text, tile_size)?;
        let solids = map.tiles.iter().map(|t| t.rect).collect();
        Ok(Self { map, solids })
    }

    // 从文件加载关卡
    pub fn load_from_file(path: impl AsRef<Path>, tile_size: f32) -> Result<Self, LevelError> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text, tile_size)
    }

    // 内置关卡
    pub fn builtin(tile_size: f32) -> Self {
        Self::parse(DEFAULT_MAP, tile_size).expect("built-in level map is valid")
    }

    // 碰撞矩形集合
    pub fn solids(&self) -> &[Rect] {
        &self.solids
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.map.tiles
    }

    pub fn props(&self) -> &[Rect] {
        &self.map.props
    }

    pub fn target(&self) -> Rect {
        self.map.target
    }

    pub fn spawn(&self) -> Vec2 {
        self.map.spawn
    }

    // 关卡像素宽度，用于限制相机
    pub fn width(&self) -> f32 {
        self.map.width
    }
}
