use macroquad::prelude::*;

// 每帧的离散按键事件
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InputEvent {
    Jump,
    Pause,
    Mute,
    Quit,
}

// 玩家每帧读取的按键状态
pub trait InputSource {
    fn left_held(&self) -> bool;
    fn right_held(&self) -> bool;
    // 取出本帧排队的按键事件
    fn poll_events(&mut self) -> Vec<InputEvent>;
}

// 键盘输入：每个渲染帧收集一次，交给第一个取事件的模拟步
#[derive(Default)]
pub struct KeyboardInput {
    pending: Vec<InputEvent>,
}

impl KeyboardInput {
    // 每个渲染帧调用一次，收集按下的键
    pub fn collect(&mut self) {
        self.pending.extend(get_keys_pressed().into_iter().filter_map(map_key));
        // 需要在启动时调用 prevent_quit，关闭窗口才会走到这里
        if is_quit_requested() {
            self.pending.push(InputEvent::Quit);
        }
    }
}

fn map_key(key: KeyCode) -> Option<InputEvent> {
    match key {
        KeyCode::Space => Some(InputEvent::Jump),
        KeyCode::Escape => Some(InputEvent::Pause),
        KeyCode::M => Some(InputEvent::Mute),
        _ => None,
    }
}

impl InputSource for KeyboardInput {
    fn left_held(&self) -> bool {
        is_key_down(KeyCode::A) || is_key_down(KeyCode::Left)
    }

    fn right_held(&self) -> bool {
        is_key_down(KeyCode::D) || is_key_down(KeyCode::Right)
    }

    fn poll_events(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.pending)
    }
}

// 根据左右键计算水平速度：左键优先
pub fn horizontal_velocity(input: &dyn InputSource, speed: f32) -> f32 {
    if input.left_held() {
        -speed
    } else if input.right_held() {
        speed
    } else {
        0.0
    }
}
