// 死亡演出总时长（毫秒）
pub const DEATH_DURATION_MS: u64 = 3_000;
// 死亡演出自身的刷新节奏：每秒 10 次
pub const DEATH_TICK_MS: u64 = 100;

const FADE_STEP: f32 = 0.04;
const FADE_MAX: f32 = 0.85;

// 死亡时的渐暗遮罩
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Fade {
    alpha: f32,
}

impl Fade {
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    fn tick(&mut self) {
        self.alpha = (self.alpha + FADE_STEP).min(FADE_MAX);
    }
}

// 坠落后的死亡演出：按自身固定节奏推进，与调用方帧率无关
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeathSequence {
    ends_at: u64,
    next_tick: u64,
    fade: Fade,
}

impl DeathSequence {
    pub fn start(now_ms: u64) -> Self {
        Self {
            ends_at: now_ms + DEATH_DURATION_MS,
            next_tick: now_ms,
            fade: Fade::default(),
        }
    }

    // 推进演出；时间到返回 true
    pub fn advance(&mut self, now_ms: u64) -> bool {
        while self.next_tick <= now_ms && self.next_tick < self.ends_at {
            self.fade.tick();
            self.next_tick += DEATH_TICK_MS;
        }
        now_ms >= self.ends_at
    }

    pub fn fade(&self) -> Fade {
        self.fade
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Lifecycle {
    #[default]
    Alive,
    Dying(DeathSequence),
}

impl Lifecycle {
    pub fn is_dying(&self) -> bool {
        matches!(self, Lifecycle::Dying(_))
    }
}
