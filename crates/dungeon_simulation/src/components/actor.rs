//! Компоненты заспавненных акторов: ActorInstance, InstanceHandle, Facing

use bevy::prelude::*;

/// Handle instance, выданный instancing операцией template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect)]
pub struct InstanceHandle(pub u32);

/// Независимо анимируемая копия AssetTemplate
///
/// Создаётся ActorProvisioningPipeline, живёт до конца уровня.
/// Позиция - в `Transform`, ориентация - в `Facing`.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(Transform, Facing)]
pub struct ActorInstance {
    pub instance: InstanceHandle,
    /// Ключ template, из которого создан instance
    pub template_key: String,
    /// false до регистрации в SimulationGate (ставится ровно один раз)
    pub registered_with_steering: bool,
}

impl ActorInstance {
    pub fn new(instance: InstanceHandle, template_key: impl Into<String>) -> Self {
        Self {
            instance,
            template_key: template_key.into(),
            registered_with_steering: false,
        }
    }
}

/// Yaw актора (радианы, инвариант: (-π, π])
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Facing {
    pub yaw: f32,
}

impl Facing {
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }
}
