use macroquad::prelude::*;
use ::rand::rngs::SmallRng;
use ::rand::seq::SliceRandom;

use crate::actors::animation::{Action, AnimationTable, Animator, FrameRef};
use crate::actors::lifecycle::{DeathSequence, Fade, Lifecycle};
use crate::actors::physics::{self, overlaps, Contact};
use crate::audio::{AudioSink, Cue, MusicCommand, JUMP_VOLUME, STEP_VOLUME};
use crate::config::PlayerSettings;
use crate::systems::{horizontal_velocity, InputEvent, InputSource};
use crate::world::Level;

// 两次脚步声之间至少间隔的帧数
pub const STEP_COOLDOWN_FRAMES: u32 = 30;

// 每帧由外部提供的环境信息
#[derive(Clone, Copy, Debug)]
pub struct FrameEnv {
    pub now_ms: u64,
    pub viewport_height: f32,
}

// 单帧更新的结果，交由主循环处理
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FrameReport {
    pub pause_requested: bool,
    pub reached_target: bool,
    pub quit_requested: bool,
    pub died: bool,
}

// 玩家实体：位置、速度、跳跃状态、动画与生命周期
pub struct Player<'a> {
    rect: Rect,
    velocity: Vec2,
    can_jump: bool,
    can_double_jump: bool,
    muted: bool,
    lifecycle: Lifecycle,
    animator: Animator,
    animations: AnimationTable,
    step_cooldown: u32,
    spawn: Vec2,
    movement: PlayerSettings,
    level: &'a Level,
    rng: SmallRng,
}

impl<'a> Player<'a> {
    // 创建玩家：出生点、关卡引用与移动参数
    pub fn new(
        spawn: Vec2,
        tile_size: f32,
        level: &'a Level,
        movement: PlayerSettings,
        rng: SmallRng,
    ) -> Self {
        Self {
            rect: Rect::new(spawn.x, spawn.y, tile_size, tile_size),
            velocity: Vec2::ZERO,
            can_jump: true,
            can_double_jump: true,
            muted: false,
            lifecycle: Lifecycle::Alive,
            animator: Animator::default(),
            animations: AnimationTable::knight(),
            step_cooldown: 0,
            spawn,
            movement,
            level,
            rng,
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn can_jump(&self) -> bool {
        self.can_jump
    }

    pub fn can_double_jump(&self) -> bool {
        self.can_double_jump
    }

    pub fn is_dead(&self) -> bool {
        self.lifecycle.is_dying()
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn action(&self) -> Action {
        self.animator.action()
    }

    pub fn frame_index(&self) -> usize {
        self.animator.frame_index()
    }

    pub fn facing_left(&self) -> bool {
        self.animator.facing_left()
    }

    pub fn step_cooldown(&self) -> u32 {
        self.step_cooldown
    }

    pub fn spawn(&self) -> Vec2 {
        self.spawn
    }

    // 当前应绘制的动画帧
    pub fn current_frame(&self) -> FrameRef {
        self.animator.current(&self.animations)
    }

    // 死亡演出中的遮罩
    pub fn death_fade(&self) -> Option<Fade> {
        match &self.lifecycle {
            Lifecycle::Dying(seq) => Some(seq.fade()),
            Lifecycle::Alive => None,
        }
    }

    // 每帧入口：输入 → 动画 → 水平移动碰撞 → 重力与垂直碰撞 → 死亡 → 胜利
    pub fn update(
        &mut self,
        input: &mut dyn InputSource,
        audio: &mut dyn AudioSink,
        env: FrameEnv,
    ) -> FrameReport {
        let mut report = FrameReport::default();

        if let Lifecycle::Dying(seq) = &mut self.lifecycle {
            if seq.advance(env.now_ms) {
                self.respawn(audio);
            }
            return report;
        }

        self.handle_input(input, audio, &mut report);
        if report.quit_requested {
            return report;
        }

        self.animator.follow_velocity(self.velocity.x);
        self.animator.advance(&self.animations);

        let solids = self.level.solids();
        self.rect.x += self.velocity.x;
        physics::resolve_horizontal(&mut self.rect, self.velocity.x, solids);

        physics::apply_gravity(&mut self.rect, &mut self.velocity.y, self.movement.gravity);
        if physics::resolve_vertical(&mut self.rect, &mut self.velocity.y, solids)
            == Some(Contact::Floor)
        {
            self.land(audio);
        }

        if self.check_alive(audio, env) {
            report.died = true;
        }
        report.reached_target = self.check_win();
        report
    }

    // 读取按键；死亡期间不处理
    fn handle_input(
        &mut self,
        input: &mut dyn InputSource,
        audio: &mut dyn AudioSink,
        report: &mut FrameReport,
    ) {
        if self.is_dead() {
            return;
        }
        if self.step_cooldown > 0 {
            self.step_cooldown -= 1;
        }

        self.velocity.x = horizontal_velocity(input, self.movement.horizontal_velocity);

        for event in input.poll_events() {
            match event {
                InputEvent::Jump => self.jump(audio),
                InputEvent::Pause => {
                    audio.play(Cue::PauseIn);
                    report.pause_requested = true;
                }
                InputEvent::Mute => self.toggle_mute(audio),
                InputEvent::Quit => {
                    report.quit_requested = true;
                    return;
                }
            }
        }
    }

    // 一段跳优先，其次二段跳
    fn jump(&mut self, audio: &mut dyn AudioSink) {
        if self.can_jump {
            self.velocity.y = -self.movement.vertical_velocity;
            self.can_jump = false;
            audio.play(Cue::Jump);
        } else if self.can_double_jump {
            self.velocity.y = -self.movement.vertical_velocity;
            self.can_double_jump = false;
            audio.play(Cue::Jump);
        }
    }

    // 切换静音：跳跃与脚步音量以及背景音乐
    pub fn toggle_mute(&mut self, audio: &mut dyn AudioSink) {
        self.muted = !self.muted;
        if self.muted {
            for cue in Cue::STEPS {
                audio.set_volume(cue, 0.0);
            }
            audio.set_volume(Cue::Jump, 0.0);
            audio.music(MusicCommand::Pause);
        } else {
            for cue in Cue::STEPS {
                audio.set_volume(cue, STEP_VOLUME);
            }
            audio.set_volume(Cue::Jump, JUMP_VOLUME);
            audio.music(MusicCommand::Resume);
        }
        log::debug!("audio muted: {}", self.muted);
    }

    // 落地：恢复跳跃，移动中按冷却播放脚步声
    fn land(&mut self, audio: &mut dyn AudioSink) {
        self.can_jump = true;
        self.can_double_jump = true;
        if self.velocity.x != 0.0 && self.step_cooldown == 0 {
            self.step_cooldown = STEP_COOLDOWN_FRAMES;
            if let Some(&cue) = Cue::STEPS.choose(&mut self.rng) {
                audio.play(cue);
            }
        }
    }

    // 掉出两倍视口高度即死亡
    fn check_alive(&mut self, audio: &mut dyn AudioSink, env: FrameEnv) -> bool {
        debug_assert!(self.rect.w > 0.0 && self.rect.h > 0.0, "player rect collapsed");
        if self.rect.y > env.viewport_height * 2.0 {
            audio.play(Cue::Falling);
            self.die(audio, env.now_ms);
            return true;
        }
        false
    }

    fn die(&mut self, audio: &mut dyn AudioSink, now_ms: u64) {
        log::debug!("player fell at {:?}", self.rect.point());
        self.lifecycle = Lifecycle::Dying(DeathSequence::start(now_ms));
        self.velocity = Vec2::ZERO;
        audio.music(MusicCommand::Stop);
        audio.play(Cue::Death);
    }

    fn respawn(&mut self, audio: &mut dyn AudioSink) {
        audio.stop(Cue::Death);
        self.lifecycle = Lifecycle::Alive;
        self.rect.move_to(self.spawn);
        audio.music(MusicCommand::Play);
        log::debug!("player respawned at {:?}", self.spawn);
    }

    // 与终点相交则通关；相交的每一帧都会上报
    fn check_win(&self) -> bool {
        overlaps(&self.rect, &self.level.target())
    }

    // 通关后重新开始：回到出生点并恢复跳跃，未静音时重新播放音乐
    pub fn restart(&mut self, audio: &mut dyn AudioSink) {
        self.lifecycle = Lifecycle::Alive;
        self.rect.move_to(self.spawn);
        self.velocity = Vec2::ZERO;
        self.can_jump = true;
        self.can_double_jump = true;
        self.step_cooldown = 0;
        self.animator = Animator::default();
        if !self.muted {
            audio.music(MusicCommand::Play);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use ::rand::SeedableRng;

    use super::*;
    use crate::actors::lifecycle::DEATH_DURATION_MS;

    const TILE: f32 = 10.0;
    const VIEWPORT_H: f32 = 100.0;

    #[derive(Default)]
    struct FakeInput {
        left: bool,
        right: bool,
        queued: VecDeque<Vec<InputEvent>>,
    }

    impl FakeInput {
        fn press(&mut self, events: &[InputEvent]) {
            self.queued.push_back(events.to_vec());
        }
    }

    impl InputSource for FakeInput {
        fn left_held(&self) -> bool {
            self.left
        }
        fn right_held(&self) -> bool {
            self.right
        }
        fn poll_events(&mut self) -> Vec<InputEvent> {
            self.queued.pop_front().unwrap_or_default()
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Heard {
        Play(Cue),
        Stop(Cue),
        Volume(Cue, f32),
        Music(MusicCommand),
    }

    #[derive(Default)]
    struct Recorder {
        log: Vec<Heard>,
    }

    impl Recorder {
        fn plays(&self, pred: impl Fn(Cue) -> bool) -> usize {
            self.log
                .iter()
                .filter(|h| matches!(h, Heard::Play(c) if pred(*c)))
                .count()
        }
    }

    impl AudioSink for Recorder {
        fn play(&mut self, cue: Cue) {
            self.log.push(Heard::Play(cue));
        }
        fn stop(&mut self, cue: Cue) {
            self.log.push(Heard::Stop(cue));
        }
        fn set_volume(&mut self, cue: Cue, volume: f32) {
            self.log.push(Heard::Volume(cue, volume));
        }
        fn music(&mut self, command: MusicCommand) {
            self.log.push(Heard::Music(command));
        }
    }

    fn movement() -> PlayerSettings {
        PlayerSettings {
            horizontal_velocity: 2.0,
            vertical_velocity: 5.0,
            gravity: 1.0,
        }
    }

    fn env(now_ms: u64) -> FrameEnv {
        FrameEnv {
            now_ms,
            viewport_height: VIEWPORT_H,
        }
    }

    // 出生点在 (0,0)，脚下是一整排地砖，终点在远处
    fn flat_level() -> Level {
        Level::parse("P.................$\n1111111111111111111\n", TILE).unwrap()
    }

    fn player(level: &Level) -> Player<'_> {
        Player::new(level.spawn(), TILE, level, movement(), SmallRng::seed_from_u64(7))
    }

    fn is_step(c: Cue) -> bool {
        Cue::STEPS.contains(&c)
    }

    #[test]
    fn landing_on_floor_restores_jumps() {
        let level = flat_level();
        let mut p = player(&level);
        p.can_jump = false;
        p.can_double_jump = false;
        let mut input = FakeInput::default();
        let mut audio = Recorder::default();

        let report = p.update(&mut input, &mut audio, env(0));

        assert_eq!(report, FrameReport::default());
        assert_eq!(p.velocity().y, 0.0);
        assert_eq!(p.rect().y, 0.0);
        assert!(p.can_jump());
        assert!(p.can_double_jump());
    }

    #[test]
    fn horizontal_velocity_follows_keys_each_frame() {
        let level = flat_level();
        let mut p = player(&level);
        let mut input = FakeInput::default();
        let mut audio = Recorder::default();

        p.update(&mut input, &mut audio, env(0));
        assert_eq!(p.velocity().x, 0.0);

        input.right = true;
        p.update(&mut input, &mut audio, env(16));
        assert_eq!(p.velocity().x, 2.0);
        assert_eq!(p.rect().x, 2.0);

        input.left = true;
        p.update(&mut input, &mut audio, env(32));
        assert_eq!(p.velocity().x, -2.0);

        input.right = false;
        input.left = false;
        p.update(&mut input, &mut audio, env(48));
        assert_eq!(p.velocity().x, 0.0);
    }

    #[test]
    fn at_most_two_jumps_between_landings() {
        let level = flat_level();
        let mut p = player(&level);
        let mut input = FakeInput::default();
        let mut audio = Recorder::default();

        input.press(&[InputEvent::Jump]);
        p.update(&mut input, &mut audio, env(0));
        assert!(!p.can_jump());
        assert!(p.can_double_jump());
        // 起跳后叠加一次重力
        assert_eq!(p.velocity().y, -4.0);

        input.press(&[InputEvent::Jump]);
        p.update(&mut input, &mut audio, env(16));
        assert!(!p.can_double_jump());
        assert_eq!(p.velocity().y, -4.0);

        input.press(&[InputEvent::Jump]);
        p.update(&mut input, &mut audio, env(32));
        assert_eq!(p.velocity().y, -3.0);
        assert_eq!(audio.plays(|c| c == Cue::Jump), 2);

        // 落回地面后两次跳跃都恢复
        for i in 0..40 {
            p.update(&mut input, &mut audio, env(48 + i * 16));
        }
        assert!(p.can_jump());
        assert!(p.can_double_jump());
        assert_eq!(p.rect().y, 0.0);
    }

    #[test]
    fn jumping_into_ceiling_stops_rise() {
        // 头顶正上方有一块地砖
        let level = Level::parse("1.$\nP..\n111\n", TILE).unwrap();
        let mut p = player(&level);
        let mut input = FakeInput::default();
        let mut audio = Recorder::default();

        input.press(&[InputEvent::Jump]);
        p.update(&mut input, &mut audio, env(0));
        assert_eq!(p.rect().y, TILE);
        assert_eq!(p.velocity().y, 0.0);
        // 撞顶不算落地
        assert!(!p.can_jump());
        assert!(p.can_double_jump());

        p.update(&mut input, &mut audio, env(16));
        assert_eq!(p.rect().y, TILE);
        assert!(p.can_jump());
    }

    #[test]
    fn step_sound_respects_cooldown() {
        let level = flat_level();
        let mut p = player(&level);
        let mut input = FakeInput {
            right: true,
            ..Default::default()
        };
        let mut audio = Recorder::default();

        for i in 0..61 {
            p.update(&mut input, &mut audio, env(i * 16));
        }
        // 第 0、30、60 帧各一次
        assert_eq!(audio.plays(is_step), 3);

        input.right = false;
        let before = audio.plays(is_step);
        for i in 61..200 {
            p.update(&mut input, &mut audio, env(i * 16));
        }
        assert_eq!(audio.plays(is_step), before);
    }

    #[test]
    fn frame_index_stays_in_bounds_and_resets_on_switch() {
        let level = flat_level();
        let mut p = player(&level);
        let mut input = FakeInput::default();
        let mut audio = Recorder::default();

        for i in 0..120 {
            p.update(&mut input, &mut audio, env(i));
            assert_eq!(p.action(), Action::Idle);
            assert!(p.frame_index() < AnimationTable::knight().frames(Action::Idle).len());
        }
        let idle_frame = p.frame_index();
        assert_eq!(idle_frame, 120 % 54);

        input.right = true;
        p.update(&mut input, &mut audio, env(200));
        assert_eq!(p.action(), Action::Running);
        // 切换后归零，再前进一帧
        assert_eq!(p.frame_index(), 1);
        assert!(!p.facing_left());

        input.right = false;
        input.left = true;
        p.update(&mut input, &mut audio, env(216));
        assert_eq!(p.frame_index(), 2);
        assert!(p.facing_left());
        assert!(p.current_frame().flip_x);
    }

    #[test]
    fn mute_toggles_volumes_and_music() {
        let level = flat_level();
        let mut p = player(&level);
        let mut input = FakeInput::default();
        let mut audio = Recorder::default();

        input.press(&[InputEvent::Mute]);
        p.update(&mut input, &mut audio, env(0));
        assert!(p.is_muted());
        assert!(audio.log.contains(&Heard::Volume(Cue::Step0, 0.0)));
        assert!(audio.log.contains(&Heard::Volume(Cue::Step1, 0.0)));
        assert!(audio.log.contains(&Heard::Volume(Cue::Jump, 0.0)));
        assert!(audio.log.contains(&Heard::Music(MusicCommand::Pause)));

        audio.log.clear();
        input.press(&[InputEvent::Mute]);
        p.update(&mut input, &mut audio, env(16));
        assert!(!p.is_muted());
        assert!(audio.log.contains(&Heard::Volume(Cue::Step0, 0.5)));
        assert!(audio.log.contains(&Heard::Volume(Cue::Step1, 0.5)));
        assert!(audio.log.contains(&Heard::Volume(Cue::Jump, 1.0)));
        assert!(audio.log.contains(&Heard::Music(MusicCommand::Resume)));
    }

    #[test]
    fn pause_plays_cue_and_is_reported() {
        let level = flat_level();
        let mut p = player(&level);
        let mut input = FakeInput::default();
        let mut audio = Recorder::default();

        input.press(&[InputEvent::Pause]);
        let report = p.update(&mut input, &mut audio, env(0));
        assert!(report.pause_requested);
        assert_eq!(audio.plays(|c| c == Cue::PauseIn), 1);
    }

    #[test]
    fn quit_stops_the_frame() {
        let level = flat_level();
        let mut p = player(&level);
        let mut input = FakeInput {
            right: true,
            ..Default::default()
        };
        let mut audio = Recorder::default();

        input.press(&[InputEvent::Quit, InputEvent::Jump]);
        let report = p.update(&mut input, &mut audio, env(0));
        assert!(report.quit_requested);
        assert_eq!(p.rect().x, 0.0);
        assert!(p.can_jump());
    }

    #[test]
    fn falling_out_of_the_world_dies_and_respawns() {
        // 出生点下方没有地面
        let level = Level::parse("P...$\n....1\n", TILE).unwrap();
        let mut p = player(&level);
        let mut input = FakeInput::default();
        let mut audio = Recorder::default();

        let mut now = 0;
        let mut died_at = None;
        for _ in 0..100 {
            let report = p.update(&mut input, &mut audio, env(now));
            if report.died {
                died_at = Some(now);
                break;
            }
            now += 16;
        }
        let died_at = died_at.expect("player should fall to death");
        assert!(p.is_dead());
        assert!(p.rect().y > VIEWPORT_H * 2.0);
        assert_eq!(p.velocity(), Vec2::ZERO);
        assert!(audio.log.contains(&Heard::Play(Cue::Falling)));
        assert!(audio.log.contains(&Heard::Music(MusicCommand::Stop)));
        assert!(audio.log.contains(&Heard::Play(Cue::Death)));

        // 死亡期间输入与物理都冻结
        let frozen = p.rect();
        input.right = true;
        input.press(&[InputEvent::Jump]);
        p.update(&mut input, &mut audio, env(died_at + 1_000));
        assert_eq!(p.rect(), frozen);
        assert_eq!(p.velocity(), Vec2::ZERO);
        assert!(p.death_fade().is_some());

        p.update(&mut input, &mut audio, env(died_at + DEATH_DURATION_MS));
        assert!(!p.is_dead());
        assert_eq!(p.rect().point(), p.spawn());
        assert!(audio.log.contains(&Heard::Stop(Cue::Death)));
        assert_eq!(audio.log.last(), Some(&Heard::Music(MusicCommand::Play)));
    }

    #[test]
    fn target_is_reported_every_overlapping_frame() {
        // 终点紧挨出生点右侧
        let level = Level::parse("P$\n11\n", TILE).unwrap();
        let mut p = player(&level);
        let mut input = FakeInput {
            right: true,
            ..Default::default()
        };
        let mut audio = Recorder::default();

        let first = p.update(&mut input, &mut audio, env(0));
        assert!(first.reached_target);
        let second = p.update(&mut input, &mut audio, env(16));
        assert!(second.reached_target);

        p.restart(&mut audio);
        input.right = false;
        let idle = p.update(&mut input, &mut audio, env(32));
        assert!(!idle.reached_target);
    }

    #[test]
    fn restart_keeps_music_off_while_muted() {
        let level = Level::parse("P$\n11\n", TILE).unwrap();
        let mut p = player(&level);
        let mut input = FakeInput::default();
        let mut audio = Recorder::default();

        input.press(&[InputEvent::Mute]);
        p.update(&mut input, &mut audio, env(0));
        audio.log.clear();
        p.restart(&mut audio);
        assert!(p.is_muted());
        assert!(!audio.log.contains(&Heard::Music(MusicCommand::Play)));

        input.press(&[InputEvent::Mute]);
        p.update(&mut input, &mut audio, env(16));
        audio.log.clear();
        p.restart(&mut audio);
        assert_eq!(audio.log, vec![Heard::Music(MusicCommand::Play)]);
    }
}
