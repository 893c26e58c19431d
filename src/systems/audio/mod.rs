//! Menu audio cues.
//!
//! The engine never talks to an audio backend directly. Every accepted input
//! edge issues exactly one [`MenuSound`] through an [`AudioCue`] sink; the bevy
//! host queues them in [`CueQueue`] and plays them after the menu tick.
use bevy::{
    audio::{PlaybackMode, Volume},
    prelude::*,
};
use enum_map::{enum_map, Enum, EnumMap};

use crate::systems::ui::menu::schema::SoundConfig;

#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuSound {
    /// Up/down/left/right navigation.
    Navigate,
    /// Accept.
    Select,
    /// Cancel / go back.
    Back,
}

impl MenuSound {
    pub const fn cue_name(self) -> &'static str {
        match self {
            Self::Navigate => "navigate",
            Self::Select => "select",
            Self::Back => "back",
        }
    }
}

/// Sink for menu sound cues.
pub trait AudioCue {
    fn play(&mut self, cue: MenuSound);
}

impl AudioCue for Vec<MenuSound> {
    fn play(&mut self, cue: MenuSound) {
        self.push(cue);
    }
}

/// Cues issued during the current frame, drained by [`play_queued_cues`].
#[derive(Resource, Debug, Default)]
pub struct CueQueue {
    pending: Vec<MenuSound>,
}

impl CueQueue {
    pub fn pending(&self) -> &[MenuSound] {
        &self.pending
    }

    pub fn drain(&mut self) -> impl Iterator<Item = MenuSound> + '_ {
        self.pending.drain(..)
    }
}

impl AudioCue for CueQueue {
    fn play(&mut self, cue: MenuSound) {
        self.pending.push(cue);
    }
}

#[derive(Resource, Clone, Debug)]
pub struct MenuSoundPaths {
    pub paths: EnumMap<MenuSound, String>,
    pub volume: f32,
}

impl Default for MenuSoundPaths {
    fn default() -> Self {
        Self::from(&SoundConfig::default())
    }
}

impl From<&SoundConfig> for MenuSoundPaths {
    fn from(config: &SoundConfig) -> Self {
        Self {
            paths: enum_map! {
                MenuSound::Navigate => config.navigate.clone(),
                MenuSound::Select => config.select.clone(),
                MenuSound::Back => config.back.clone(),
            },
            volume: config.volume,
        }
    }
}

impl MenuSoundPaths {
    pub fn playback(&self) -> PlaybackSettings {
        PlaybackSettings {
            mode: PlaybackMode::Despawn,
            volume: Volume::Linear(self.volume),
            ..default()
        }
    }
}

pub fn play_queued_cues(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    sounds: Res<MenuSoundPaths>,
    mut queue: ResMut<CueQueue>,
) {
    for cue in queue.drain() {
        let path = sounds.paths[cue].clone();
        commands.spawn((
            AudioPlayer::<AudioSource>(asset_server.load(path)),
            sounds.playback(),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cue_queue_drains_in_issue_order() {
        let mut queue = CueQueue::default();
        queue.play(MenuSound::Navigate);
        queue.play(MenuSound::Back);

        let drained: Vec<MenuSound> = queue.drain().collect();
        assert_eq!(drained, vec![MenuSound::Navigate, MenuSound::Back]);
        assert!(queue.pending().is_empty());
    }

    #[test]
    fn sound_paths_follow_config() {
        let config = SoundConfig {
            navigate: "audio/nav.ogg".to_string(),
            select: "audio/ok.ogg".to_string(),
            back: "audio/back.ogg".to_string(),
            volume: 0.5,
        };
        let paths = MenuSoundPaths::from(&config);
        assert_eq!(paths.paths[MenuSound::Select], "audio/ok.ogg");
        assert_eq!(paths.paths[MenuSound::Back], "audio/back.ogg");
        assert_eq!(paths.volume, 0.5);
    }
}
