#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Action {
    Idle,
    Running,
}

// 每张图片持续的帧数（与原作手感一致）
pub const IDLE_DURATIONS: [usize; 3] = [7, 7, 40];
pub const RUNNING_DURATIONS: [usize; 8] = [7; 8];

// 各动作的逐帧图片序号
#[derive(Clone, Debug)]
pub struct AnimationTable {
    idle: Vec<usize>,
    running: Vec<usize>,
}

impl AnimationTable {
    // 按持续帧数展开帧序列
    pub fn from_durations(idle: &[usize], running: &[usize]) -> Self {
        let idle = expand(idle);
        let running = expand(running);
        assert!(
            !idle.is_empty() && !running.is_empty(),
            "animation sequences must contain at least one frame"
        );
        Self { idle, running }
    }

    // 骑士的默认动画表
    pub fn knight() -> Self {
        Self::from_durations(&IDLE_DURATIONS, &RUNNING_DURATIONS)
    }

    pub fn frames(&self, action: Action) -> &[usize] {
        match action {
            Action::Idle => &self.idle,
            Action::Running => &self.running,
        }
    }
}

fn expand(durations: &[usize]) -> Vec<usize> {
    durations
        .iter()
        .enumerate()
        .flat_map(|(image, &hold)| std::iter::repeat(image).take(hold))
        .collect()
}

// 当前帧引用：动作、图片序号与是否镜像
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FrameRef {
    pub action: Action,
    pub image: usize,
    pub flip_x: bool,
}

#[derive(Clone, Debug)]
pub struct Animator {
    action: Action,
    frame: usize,
    facing_left: bool,
}

impl Default for Animator {
    fn default() -> Self {
        Self {
            action: Action::Idle,
            frame: 0,
            facing_left: false,
        }
    }
}

impl Animator {
    pub fn action(&self) -> Action {
        self.action
    }

    pub fn frame_index(&self) -> usize {
        self.frame
    }

    pub fn facing_left(&self) -> bool {
        self.facing_left
    }

    // 切换动作：仅在动作变化时重置帧序号
    pub fn change_action(&mut self, action: Action) {
        if self.action != action {
            self.action = action;
            self.frame = 0;
        }
    }

    // 根据水平速度选择动作与朝向
    pub fn follow_velocity(&mut self, vx: f32) {
        if vx > 0.0 {
            self.change_action(Action::Running);
            self.facing_left = false;
        }
        if vx == 0.0 {
            self.change_action(Action::Idle);
        }
        if vx < 0.0 {
            self.change_action(Action::Running);
            self.facing_left = true;
        }
    }

    // 前进一帧，到达末尾回绕
    pub fn advance(&mut self, table: &AnimationTable) {
        self.frame += 1;
        if self.frame >= table.frames(self.action).len() {
            self.frame = 0;
        }
    }

    pub fn current(&self, table: &AnimationTable) -> FrameRef {
        FrameRef {
            action: self.action,
            image: table.frames(self.action)[self.frame],
            flip_x: self.facing_left,
        }
    }
}
