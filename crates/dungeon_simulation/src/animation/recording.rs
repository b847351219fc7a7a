//! RecordingAnimator - headless animation driver
//!
//! Пишет каждый вызов в общий журнал (Arc), поэтому клон можно оставить
//! у себя и читать после того как driver ушёл в `AnimationBackend`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use super::AnimationDriver;
use crate::components::InstanceHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationCall {
    StopAll {
        instance: InstanceHandle,
    },
    StartClip {
        instance: InstanceHandle,
        clip_index: usize,
        looping: bool,
    },
}

#[derive(Debug, Default)]
struct Journal {
    calls: Vec<AnimationCall>,
    playing: HashMap<InstanceHandle, usize>,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingAnimator {
    journal: Arc<Mutex<Journal>>,
}

impl RecordingAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_journal<R>(&self, f: impl FnOnce(&mut Journal) -> R) -> R {
        let mut journal = self.journal.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut journal)
    }

    /// Все вызовы в порядке поступления
    pub fn calls(&self) -> Vec<AnimationCall> {
        self.with_journal(|journal| journal.calls.clone())
    }

    /// Вызовы для одного instance
    pub fn calls_for(&self, instance: InstanceHandle) -> Vec<AnimationCall> {
        self.with_journal(|journal| {
            journal
                .calls
                .iter()
                .filter(|call| match call {
                    AnimationCall::StopAll { instance: i } => *i == instance,
                    AnimationCall::StartClip { instance: i, .. } => *i == instance,
                })
                .copied()
                .collect()
        })
    }

    /// Текущий проигрываемый клип instance (None после stop_all)
    pub fn playing_clip(&self, instance: InstanceHandle) -> Option<usize> {
        self.with_journal(|journal| journal.playing.get(&instance).copied())
    }

    pub fn clear(&self) {
        self.with_journal(|journal| journal.calls.clear());
    }
}

impl AnimationDriver for RecordingAnimator {
    fn stop_all(&mut self, instance: InstanceHandle) {
        self.with_journal(|journal| {
            journal.calls.push(AnimationCall::StopAll { instance });
            journal.playing.remove(&instance);
        });
    }

    fn start_clip(&mut self, instance: InstanceHandle, clip_index: usize, looping: bool) {
        self.with_journal(|journal| {
            journal.calls.push(AnimationCall::StartClip {
                instance,
                clip_index,
                looping,
            });
            journal.playing.insert(instance, clip_index);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_shares_journal() {
        let observer = RecordingAnimator::new();
        let mut driver = observer.clone();
        let instance = InstanceHandle(7);

        driver.stop_all(instance);
        driver.start_clip(instance, 3, true);

        assert_eq!(
            observer.calls(),
            vec![
                AnimationCall::StopAll { instance },
                AnimationCall::StartClip {
                    instance,
                    clip_index: 3,
                    looping: true
                },
            ]
        );
        assert_eq!(observer.playing_clip(instance), Some(3));

        driver.stop_all(instance);
        assert_eq!(observer.playing_clip(instance), None);
    }
}
