//! Assets domain - загрузка и кэш character templates
//!
//! - loader: collaborator `CharacterAssetLoader` + headless `ManifestAssetLoader`
//! - template: AssetTemplate (клипы, animation slots, instancing)
//! - cache: AssetTemplateCache (один load на ключ, async через task pool)

use std::sync::Arc;

use bevy::prelude::*;

pub mod cache;
pub mod loader;
pub mod template;

pub use cache::{AssetTemplateCache, TemplateLoadOutcome, TemplateLookup};
pub use loader::{CharacterAssetLoader, CharacterEntry, CharacterManifest, ManifestAssetLoader};
pub use template::{AnimationClip, AssetTemplate, InstanceSpawner, LoadedCharacter};

/// Assets Plugin
///
/// Если хост не вставил свой `AssetTemplateCache` - используем manifest loader по умолчанию.
/// Polling загрузок делает provisioning pipeline (ему нужны результаты в том же кадре).
pub struct AssetsPlugin;

impl Plugin for AssetsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<crate::config::AssetConfig>();

        if !app.world().contains_resource::<AssetTemplateCache>() {
            app.insert_resource(AssetTemplateCache::new(Arc::new(
                ManifestAssetLoader::dungeon_default(),
            )));
        }
    }
}
