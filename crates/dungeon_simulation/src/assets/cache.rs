//! AssetTemplateCache - дедупликация загрузок по ключу
//!
//! Инвариант: не более одной загрузки в полёте на ключ.
//! Повторный запрос ключа в состоянии Loading не создаёт новую task -
//! вызывающий ждёт завершения первой (pipeline кладёт запрос в очередь ожидания).
//!
//! Загрузка идёт на AsyncComputeTaskPool, завершение проверяется раз в кадр
//! (`poll_loads`), запись в map - только из main thread.

use std::collections::HashMap;
use std::sync::Arc;

use bevy::prelude::*;
use bevy::tasks::{block_on, futures_lite::future, AsyncComputeTaskPool, Task, TaskPool};

use super::loader::CharacterAssetLoader;
use super::template::{AssetTemplate, LoadedCharacter};
use crate::animation::AnimationSlots;
use crate::config::AssetConfig;
use crate::error::AssetLoadError;

/// Состояние ключа в кэше
enum TemplateSlot {
    Loading(Task<Result<LoadedCharacter, AssetLoadError>>),
    Ready(Arc<AssetTemplate>),
    Failed(AssetLoadError),
}

/// Результат lookup
#[derive(Debug, Clone)]
pub enum TemplateLookup {
    /// Template готов - можно инстанцировать синхронно
    Ready(Arc<AssetTemplate>),
    /// Загрузка в полёте (только что запущена или запущена ранее)
    Pending,
    /// Ключ не загрузился (без авто-retry)
    Failed(AssetLoadError),
}

/// Завершённая в этом кадре загрузка
#[derive(Debug)]
pub struct TemplateLoadOutcome {
    pub key: String,
    pub result: Result<Arc<AssetTemplate>, AssetLoadError>,
}

/// Кэш templates (string key → slot), живёт дольше уровня
#[derive(Resource)]
pub struct AssetTemplateCache {
    loader: Arc<dyn CharacterAssetLoader>,
    slots: HashMap<String, TemplateSlot>,
    loads_started: usize,
}

impl AssetTemplateCache {
    pub fn new(loader: Arc<dyn CharacterAssetLoader>) -> Self {
        Self {
            loader,
            slots: HashMap::new(),
            loads_started: 0,
        }
    }

    /// Сколько реальных загрузок было запущено (для проверки дедупликации)
    pub fn loads_started(&self) -> usize {
        self.loads_started
    }

    pub fn pending_count(&self) -> usize {
        self.slots
            .values()
            .filter(|slot| matches!(slot, TemplateSlot::Loading(_)))
            .count()
    }

    /// Готовый template без запуска загрузки
    pub fn get(&self, key: &str) -> Option<Arc<AssetTemplate>> {
        match self.slots.get(key) {
            Some(TemplateSlot::Ready(template)) => Some(template.clone()),
            _ => None,
        }
    }

    /// getOrLoad: готовый template, либо Pending (загрузка запускается только если ключа ещё нет)
    pub fn get_or_load(&mut self, key: &str) -> TemplateLookup {
        match self.slots.get(key) {
            Some(TemplateSlot::Ready(template)) => return TemplateLookup::Ready(template.clone()),
            Some(TemplateSlot::Failed(err)) => return TemplateLookup::Failed(err.clone()),
            Some(TemplateSlot::Loading(_)) => return TemplateLookup::Pending,
            None => {}
        }

        let loader = self.loader.clone();
        let owned_key = key.to_string();
        let pool = AsyncComputeTaskPool::get_or_init(TaskPool::new);
        let task = pool.spawn(async move { loader.load_character_asset(&owned_key) });

        self.loads_started += 1;
        self.slots.insert(key.to_string(), TemplateSlot::Loading(task));
        crate::log(&format!("📦 Template '{}': load started", key));

        TemplateLookup::Pending
    }

    /// Проверяет in-flight загрузки; завершённые переводит в Ready/Failed.
    ///
    /// Blending клипов настраивается здесь - один раз на template, не на instance.
    pub fn poll_loads(&mut self, config: &AssetConfig) -> Vec<TemplateLoadOutcome> {
        let mut finished = Vec::new();

        for (key, slot) in self.slots.iter_mut() {
            let TemplateSlot::Loading(task) = slot else {
                continue;
            };

            if !task.is_finished() {
                continue;
            }

            let result = block_on(future::poll_once(task)).unwrap_or_else(|| {
                Err(AssetLoadError::TaskDropped { key: key.clone() })
            });
            finished.push((key.clone(), result));
        }

        let mut outcomes = Vec::with_capacity(finished.len());

        for (key, result) in finished {
            let result = result.and_then(|loaded| build_template(&key, loaded, config));

            match &result {
                Ok(template) => {
                    crate::log_info(&format!(
                        "✅ Template '{}' loaded ({} clips)",
                        key,
                        template.clips().len()
                    ));
                    self.slots
                        .insert(key.clone(), TemplateSlot::Ready(template.clone()));
                }
                Err(err) => {
                    crate::log_error(&format!("❌ Template '{}' failed: {}", key, err));
                    self.slots.insert(key.clone(), TemplateSlot::Failed(err.clone()));
                }
            }

            outcomes.push(TemplateLoadOutcome { key, result });
        }

        outcomes
    }
}

/// Пост-обработка загруженного asset: blending + резолв animation slots
fn build_template(
    key: &str,
    loaded: LoadedCharacter,
    config: &AssetConfig,
) -> Result<Arc<AssetTemplate>, AssetLoadError> {
    let LoadedCharacter { mut clips, spawner } = loaded;

    for clip in clips.iter_mut() {
        clip.enable_blending = true;
        clip.blend_speed = config.animation_blend_speed;
    }

    let slots = AnimationSlots::resolve(key, &clips)?;

    Ok(Arc::new(AssetTemplate::new(
        key.to_string(),
        clips,
        slots,
        spawner,
    )))
}
