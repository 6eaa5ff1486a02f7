use macroquad::prelude::Rect;

// 严格相交判定：仅接触边缘不算重叠
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && b.x < a.x + a.w && a.y < b.y + b.h && b.y < a.y + a.h
}

// 垂直方向的碰撞结果，每帧至多一次
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Contact {
    Ceiling,
    Floor,
}

// 水平碰撞：按移动方向把玩家推到障碍物边缘
pub fn resolve_horizontal(body: &mut Rect, vx: f32, solids: &[Rect]) {
    for solid in solids {
        if !overlaps(solid, body) {
            continue;
        }
        if vx < 0.0 {
            body.x = solid.x + solid.w;
        }
        if vx > 0.0 {
            body.x = solid.x - body.w;
        }
    }
}

// 施加重力并移动
pub fn apply_gravity(body: &mut Rect, vy: &mut f32, gravity: f32) {
    *vy += gravity;
    body.y += *vy;
}

// 垂直碰撞：向上撞顶或向下落地，均清零竖直速度
pub fn resolve_vertical(body: &mut Rect, vy: &mut f32, solids: &[Rect]) -> Option<Contact> {
    let mut contact = None;
    for solid in solids {
        if !overlaps(solid, body) {
            continue;
        }
        if *vy < 0.0 {
            body.y = solid.y + solid.h;
            *vy = 0.0;
            contact = Some(Contact::Ceiling);
        }
        if *vy > 0.0 {
            body.y = solid.y - body.h;
            *vy = 0.0;
            contact = Some(Contact::Floor);
        }
    }
    contact
}
