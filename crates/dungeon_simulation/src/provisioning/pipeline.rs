//! ActorProvisioningPipeline - очередь requestActor + ожидание загрузки templates

use std::collections::{HashMap, VecDeque};

use bevy::prelude::*;

use super::events::SpawnActorRequest;

/// Per-level состояние pipeline
///
/// - `queued`: запросы, ещё не отправленные в кэш
/// - `waiting`: позиции, ждущие загрузки template своего ключа (FIFO на ключ)
#[derive(Resource, Debug, Default)]
pub struct ActorProvisioningPipeline {
    queued: VecDeque<SpawnActorRequest>,
    waiting: HashMap<String, Vec<Vec3>>,
}

impl ActorProvisioningPipeline {
    /// requestActor (async): instance появится, когда template ключа загружен.
    /// Слот в expected_actor_count учитывает вызывающая система.
    pub(crate) fn request_actor(&mut self, key: impl Into<String>, position: Vec3) {
        self.queued.push_back(SpawnActorRequest::new(key, position));
    }

    /// Запросы, для которых instance ещё не создан
    pub fn pending_requests(&self) -> usize {
        self.queued.len() + self.waiting.values().map(Vec::len).sum::<usize>()
    }

    pub fn waiting_for(&self, key: &str) -> usize {
        self.waiting.get(key).map_or(0, Vec::len)
    }

    /// resetLevel часть pipeline (кэш templates не трогаем)
    pub fn reset(&mut self) {
        self.queued.clear();
        self.waiting.clear();
    }

    pub(crate) fn drain_queued(&mut self) -> Vec<SpawnActorRequest> {
        self.queued.drain(..).collect()
    }

    pub(crate) fn wait_for_template(&mut self, request: SpawnActorRequest) {
        self.waiting
            .entry(request.key)
            .or_default()
            .push(request.position);
    }

    pub(crate) fn take_waiting(&mut self, key: &str) -> Vec<Vec3> {
        self.waiting.remove(key).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waiting_requests_flush_in_request_order() {
        let mut pipeline = ActorProvisioningPipeline::default();
        pipeline.request_actor("deathknight", Vec3::new(1.0, 0.0, 1.0));
        pipeline.request_actor("deathknight", Vec3::new(2.0, 0.0, 2.0));
        pipeline.request_actor("ghoul", Vec3::new(3.0, 0.0, 3.0));
        assert_eq!(pipeline.pending_requests(), 3);

        for request in pipeline.drain_queued() {
            pipeline.wait_for_template(request);
        }
        assert_eq!(pipeline.waiting_for("deathknight"), 2);
        assert_eq!(pipeline.pending_requests(), 3);

        let positions = pipeline.take_waiting("deathknight");
        assert_eq!(
            positions,
            vec![Vec3::new(1.0, 0.0, 1.0), Vec3::new(2.0, 0.0, 2.0)]
        );
        assert_eq!(pipeline.pending_requests(), 1);
        assert!(pipeline.take_waiting("deathknight").is_empty());
    }

    #[test]
    fn test_reset_drops_everything() {
        let mut pipeline = ActorProvisioningPipeline::default();
        pipeline.request_actor("deathknight", Vec3::ZERO);
        pipeline.wait_for_template(SpawnActorRequest::new("ghoul", Vec3::ONE));

        pipeline.reset();

        assert_eq!(pipeline.pending_requests(), 0);
    }
}
