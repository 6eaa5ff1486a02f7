use std::collections::HashMap;

use macroquad::audio::{load_sound, play_sound, set_sound_volume, stop_sound, PlaySoundParams, Sound};

// 玩家会触发的音效
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Cue {
    Jump,
    Step0,
    Step1,
    PauseIn,
    Falling,
    Death,
}

impl Cue {
    pub const ALL: [Cue; 6] = [
        Cue::Jump,
        Cue::Step0,
        Cue::Step1,
        Cue::PauseIn,
        Cue::Falling,
        Cue::Death,
    ];
    pub const STEPS: [Cue; 2] = [Cue::Step0, Cue::Step1];

    pub fn file_name(self) -> &'static str {
        match self {
            Cue::Jump => "jump.wav",
            Cue::Step0 => "step0.wav",
            Cue::Step1 => "step1.wav",
            Cue::PauseIn => "pause_in.wav",
            Cue::Falling => "falling.wav",
            Cue::Death => "ded.wav",
        }
    }

    // 未静音时的音量
    pub fn default_volume(self) -> f32 {
        match self {
            Cue::Step0 | Cue::Step1 => STEP_VOLUME,
            Cue::Death => 0.8,
            _ => JUMP_VOLUME,
        }
    }
}

pub const STEP_VOLUME: f32 = 0.5;
pub const JUMP_VOLUME: f32 = 1.0;
pub const MUSIC_VOLUME: f32 = 0.2;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MusicCommand {
    Play,
    Stop,
    Pause,
    Resume,
}

// 玩家使用的音频输出，音量取值 [0, 1]
pub trait AudioSink {
    fn play(&mut self, cue: Cue);
    fn stop(&mut self, cue: Cue);
    fn set_volume(&mut self, cue: Cue, volume: f32);
    fn music(&mut self, command: MusicCommand);
}

// macroquad 音频实现；缺失的文件静默处理
pub struct SoundBank {
    sounds: HashMap<Cue, Sound>,
    volumes: HashMap<Cue, f32>,
    music: Option<Sound>,
    music_playing: bool,
}

impl SoundBank {
    // 从目录加载全部音效与背景音乐
    pub async fn load(audio_dir: &str, music_path: &str) -> Self {
        let mut sounds = HashMap::new();
        for cue in Cue::ALL {
            let path = format!("{audio_dir}/{}", cue.file_name());
            match load_sound(&path).await {
                Ok(sound) => {
                    sounds.insert(cue, sound);
                }
                Err(err) => log::warn!("sound {path} unavailable: {err:?}"),
            }
        }
        let music = match load_sound(music_path).await {
            Ok(sound) => Some(sound),
            Err(err) => {
                log::warn!("music {music_path} unavailable: {err:?}");
                None
            }
        };
        log::info!("loaded {}/{} sounds", sounds.len(), Cue::ALL.len());
        Self {
            sounds,
            volumes: Cue::ALL.iter().map(|&c| (c, c.default_volume())).collect(),
            music,
            music_playing: false,
        }
    }

    fn volume(&self, cue: Cue) -> f32 {
        self.volumes.get(&cue).copied().unwrap_or(1.0)
    }
}

impl AudioSink for SoundBank {
    fn play(&mut self, cue: Cue) {
        if let Some(sound) = self.sounds.get(&cue) {
            play_sound(
                sound,
                PlaySoundParams {
                    looped: false,
                    volume: self.volume(cue),
                },
            );
        }
    }

    fn stop(&mut self, cue: Cue) {
        if let Some(sound) = self.sounds.get(&cue) {
            stop_sound(sound);
        }
    }

    fn set_volume(&mut self, cue: Cue, volume: f32) {
        let volume = volume.clamp(0.0, 1.0);
        self.volumes.insert(cue, volume);
        if let Some(sound) = self.sounds.get(&cue) {
            set_sound_volume(sound, volume);
        }
    }

    // macroquad 没有暂停接口，暂停即停止，恢复时从头循环播放
    fn music(&mut self, command: MusicCommand) {
        let Some(music) = &self.music else {
            return;
        };
        match command {
            MusicCommand::Play | MusicCommand::Resume => {
                if self.music_playing {
                    stop_sound(music);
                }
                play_sound(
                    music,
                    PlaySoundParams {
                        looped: true,
                        volume: MUSIC_VOLUME,
                    },
                );
                self.music_playing = true;
            }
            MusicCommand::Stop | MusicCommand::Pause => {
                stop_sound(music);
                self.music_playing = false;
            }
        }
    }
}
