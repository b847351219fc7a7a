//! Tests for behavior components.

#[cfg(test)]
mod tests {
    use super::super::behavior::{BehaviorRecord, BehaviorState};
    use crate::animation::AnimationSlot;
    use crate::navigation::AgentHandle;

    #[test]
    fn test_behavior_state_default() {
        assert_eq!(BehaviorState::default(), BehaviorState::Idle);
    }

    #[test]
    fn test_new_record_is_idle_and_not_reached() {
        let record = BehaviorRecord::new(AgentHandle(7));
        assert_eq!(record.agent, AgentHandle(7));
        assert_eq!(record.state, BehaviorState::Idle);
        assert!(!record.reached_destination);
    }

    #[test]
    fn test_each_state_has_its_own_animation_slot() {
        assert_eq!(BehaviorState::Idle.animation_slot(), AnimationSlot::Idle);
        assert_eq!(BehaviorState::Walking.animation_slot(), AnimationSlot::Walk);
        assert_eq!(BehaviorState::Running.animation_slot(), AnimationSlot::Run);
        assert_eq!(BehaviorState::Attacking.animation_slot(), AnimationSlot::Attack);
    }
}
