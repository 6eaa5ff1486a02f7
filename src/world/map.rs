use macroquad::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to read level: {0}")]
    Io(#[from] std::io::Error),
    #[error("level map is empty")]
    Empty,
    #[error("level map has no player spawn (`P`)")]
    MissingSpawn,
    #[error("level map has no target (`$`)")]
    MissingTarget,
}

// 可碰撞地砖：矩形与色阶（地图中的数字）
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tile {
    pub rect: Rect,
    pub shade: u8,
}

// 从字符地图解析出的关卡几何
#[derive(Clone, Debug)]
pub struct LevelMap {
    pub spawn: Vec2,
    pub target: Rect,
    pub tiles: Vec<Tile>,
    pub props: Vec<Rect>,
    pub width: f32,
}

// 逐字符解析地图：P 出生点，$ 终点，数字为地砖，# 为装饰
pub fn parse_map(text: &str, tile_size: f32) -> Result<LevelMap, LevelError> {
    let mut spawn = None;
    let mut target = None;
    let mut tiles = Vec::new();
    let mut props = Vec::new();
    let mut cols = 0usize;
    let mut rows = 0usize;

    for (row_idx, row) in text.lines().enumerate() {
        if row.trim().is_empty() {
            continue;
        }
        rows = row_idx + 1;
        cols = cols.max(row.chars().count());
        for (col_idx, ch) in row.chars().enumerate() {
            let x = col_idx as f32 * tile_size;
            let y = row_idx as f32 * tile_size;
            let cell = Rect::new(x, y, tile_size, tile_size);
            match ch {
                'P' => spawn = Some(vec2(x, y)),
                '$' => target = Some(cell),
                '#' => props.push(cell),
                d if d.is_ascii_digit() => tiles.push(Tile {
                    rect: cell,
                    shade: d as u8 - b'0',
                }),
                _ => {}
            }
        }
    }

    if rows == 0 {
        return Err(LevelError::Empty);
    }
    Ok(LevelMap {
        spawn: spawn.ok_or(LevelError::MissingSpawn)?,
        target: target.ok_or(LevelError::MissingTarget)?,
        tiles,
        props,
        width: cols as f32 * tile_size,
    })
}

// 内置关卡：缺少地图文件时的兜底
pub const DEFAULT_MAP: &str = "\
........................................
........................................
........................................
..........................#.........$...
.....................11111......11111111
........................................
..............1111..................#...
...P.....#.......................111111.
1111111111111........11111..............
2222222222222...........................
2222222222222...........................
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_spawn_target_and_tiles() {
        let map = parse_map("P..$\n11#2\n", 10.0).unwrap();
        assert_eq!(map.spawn, vec2(0.0, 0.0));
        assert_eq!(map.target, Rect::new(30.0, 0.0, 10.0, 10.0));
        assert_eq!(map.tiles.len(), 3);
        assert_eq!(map.tiles[2].shade, 2);
        assert_eq!(map.tiles[2].rect.x, 30.0);
        assert_eq!(map.props, vec![Rect::new(20.0, 10.0, 10.0, 10.0)]);
        assert_eq!(map.width, 40.0);
    }

    #[test]
    fn rejects_incomplete_maps() {
        assert!(matches!(parse_map("", 10.0), Err(LevelError::Empty)));
        assert!(matches!(parse_map("..$\n111", 10.0), Err(LevelError::MissingSpawn)));
        assert!(matches!(parse_map("P..\n111", 10.0), Err(LevelError::MissingTarget)));
    }

    #[test]
    fn default_map_is_playable() {
        let map = parse_map(DEFAULT_MAP, 64.0).unwrap();
        assert!(!map.tiles.is_empty());
        // 出生点正下方必须有地面
        let below = Rect::new(map.spawn.x, map.spawn.y + 64.0, 64.0, 64.0);
        assert!(map.tiles.iter().any(|t| t.rect == below));
    }
}
