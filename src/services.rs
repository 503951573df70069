//! Outbound notifications raised by tile selection.
//!
//! The map announces the selected mission and requests the mission's message
//! history. Both are fire-and-forget: the map never waits for the consumers.

use bevy::ecs::system::SystemParam;
use bevy::platform::collections::HashMap;
use bevy::prelude::*;

use crate::quest::{MissionId, QuestData};
use crate::view_state::MapEffect;

/// The selected mission changed; `None` clears it.
#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub struct SelectedMissionChanged(pub Option<MissionId>);

/// Fetch the message history of a mission, keyed by hero and quest.
#[derive(Message, Clone, Debug, PartialEq)]
pub struct MessageHistoryRequested {
    /// Hero the history belongs to.
    pub hero_id: String,
    /// Quest the mission belongs to.
    pub quest_id: String,
    /// Mission whose history to fetch.
    pub mission: MissionId,
}

/// External map-state holder: the mission the user last selected.
#[derive(Resource, Default, Debug, Reflect)]
pub struct SelectedMission(pub Option<MissionId>);

/// Latest history fetch per mission; stands in for the network loader.
#[derive(Resource, Default, Debug)]
pub struct MessageHistoryLog {
    latest: HashMap<MissionId, MessageHistoryRequested>,
}

impl MessageHistoryLog {
    /// Records `request`, replacing an earlier one for the same mission.
    pub fn record(&mut self, request: MessageHistoryRequested) {
        self.latest.insert(request.mission, request);
    }

    /// Most recent request for `mission`.
    pub fn latest(&self, mission: MissionId) -> Option<&MessageHistoryRequested> {
        self.latest.get(&mission)
    }

    /// Number of missions with a recorded request.
    pub fn len(&self) -> usize {
        self.latest.len()
    }

    /// No request recorded yet.
    pub fn is_empty(&self) -> bool {
        self.latest.is_empty()
    }
}

/// Turns selection effects into outbound messages. Camera and panel
/// effects are handled by the map itself and are skipped here.
pub fn outbound_messages(
    effects: &[MapEffect],
    quest: Option<&QuestData>,
) -> (Vec<SelectedMissionChanged>, Vec<MessageHistoryRequested>) {
    let mut selected = Vec::new();
    let mut history = Vec::new();
    for effect in effects {
        match effect {
            MapEffect::SelectMission(mission) => selected.push(SelectedMissionChanged(*mission)),
            MapEffect::LoadMessageHistory(mission) => {
                let Some(quest) = quest else {
                    warn!("no quest loaded; dropping history request for mission {mission}");
                    continue;
                };
                history.push(MessageHistoryRequested {
                    hero_id: quest.hero_id.clone(),
                    quest_id: quest.quest_id.clone(),
                    mission: *mission,
                });
            }
            MapEffect::CameraMoved(_) | MapEffect::ShowDetails(_) | MapEffect::HideDetails => {}
        }
    }
    (selected, history)
}

/// Writers for both outbound messages.
#[derive(SystemParam)]
pub struct Outbound<'w> {
    quest: Option<Res<'w, QuestData>>,
    selected: MessageWriter<'w, SelectedMissionChanged>,
    history: MessageWriter<'w, MessageHistoryRequested>,
}

impl Outbound<'_> {
    /// Writes the messages for `effects`.
    pub fn dispatch(&mut self, effects: &[MapEffect]) {
        let (selected, history) = outbound_messages(effects, self.quest.as_deref());
        self.selected.write_batch(selected);
        self.history.write_batch(history);
    }
}

fn record_selected_mission(
    mut changes: MessageReader<SelectedMissionChanged>,
    mut selected: ResMut<SelectedMission>,
) {
    for SelectedMissionChanged(mission) in changes.read() {
        selected.0 = *mission;
        match mission {
            Some(mission) => info!("selected mission {mission}"),
            None => info!("selected mission cleared"),
        }
    }
}

fn load_message_history(
    mut requests: MessageReader<MessageHistoryRequested>,
    mut log: ResMut<MessageHistoryLog>,
) {
    for request in requests.read() {
        info!(
            "loading message history for mission {} (hero {}, quest {})",
            request.mission, request.hero_id, request.quest_id
        );
        log.record(request.clone());
    }
}

/// Registers the outbound messages and their consumers.
pub struct ServicesPlugin;

impl Plugin for ServicesPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<MissionId>()
            .register_type::<SelectedMission>()
            .add_message::<SelectedMissionChanged>()
            .add_message::<MessageHistoryRequested>()
            .init_resource::<SelectedMission>()
            .init_resource::<MessageHistoryLog>()
            .add_systems(Update, (record_selected_mission, load_message_history));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TileId;

    #[test]
    fn selection_effects_become_messages() {
        let quest = QuestData::demo();
        let effects = [
            MapEffect::CameraMoved(Vec3::ONE),
            MapEffect::SelectMission(Some(MissionId(5))),
            MapEffect::LoadMessageHistory(MissionId(5)),
            MapEffect::ShowDetails(TileId(4)),
        ];
        let (selected, history) = outbound_messages(&effects, Some(&quest));
        assert_eq!(selected, vec![SelectedMissionChanged(Some(MissionId(5)))]);
        assert_eq!(
            history,
            vec![MessageHistoryRequested {
                hero_id: quest.hero_id.clone(),
                quest_id: quest.quest_id.clone(),
                mission: MissionId(5),
            }]
        );
    }

    #[test]
    fn history_needs_a_quest() {
        let effects = [
            MapEffect::SelectMission(None),
            MapEffect::LoadMessageHistory(MissionId(1)),
        ];
        let (selected, history) = outbound_messages(&effects, None);
        assert_eq!(selected, vec![SelectedMissionChanged(None)]);
        assert!(history.is_empty());
    }

    #[test]
    fn consumers_record_requests() {
        let mut app = App::new();
        app.add_plugins(ServicesPlugin);
        app.world_mut()
            .write_message(SelectedMissionChanged(Some(MissionId(3))));
        app.world_mut().write_message(MessageHistoryRequested {
            hero_id: "h".into(),
            quest_id: "q".into(),
            mission: MissionId(3),
        });
        app.update();
        assert_eq!(
            app.world().resource::<SelectedMission>().0,
            Some(MissionId(3))
        );
        assert_eq!(app.world().resource::<MessageHistoryLog>().len(), 1);
    }

    #[test]
    fn history_log_keeps_latest_request_per_mission() {
        let request = |hero: &str, mission: u32| MessageHistoryRequested {
            hero_id: hero.into(),
            quest_id: "q".into(),
            mission: MissionId(mission),
        };
        let mut log = MessageHistoryLog::default();
        for _ in 0..50 {
            log.record(request("a", 1));
        }
        log.record(request("b", 1));
        log.record(request("a", 2));
        assert_eq!(log.len(), 2);
        assert_eq!(log.latest(MissionId(1)).map(|r| r.hero_id.as_str()), Some("b"));
    }
}
