//! Quest snapshot supplied by the hosting application.
//!
//! The map never mutates missions. It reads a [`QuestData`] resource, which
//! may be inserted (or replaced) at any time after startup.

use std::fs;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stable mission identifier.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Reflect,
)]
#[serde(transparent)]
pub struct MissionId(pub u32);

impl std::fmt::Display for MissionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What kind of learning task a mission represents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionKind {
    /// Self-paced course with lessons.
    Course,
    /// One-off task.
    #[default]
    Task,
    /// Attend an event.
    Event,
    /// Give or receive a review.
    Review,
}

/// Nested progress for course missions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseProgress {
    /// Lessons finished so far.
    pub completed_lessons: u32,
    /// Lessons in the course.
    pub total_lessons: u32,
}

impl CourseProgress {
    /// Completed share in `[0, 1]`; zero for a course without lessons.
    pub fn fraction(&self) -> f32 {
        if self.total_lessons == 0 {
            return 0.0;
        }
        (self.completed_lessons as f32 / self.total_lessons as f32).min(1.0)
    }
}

/// A single learning mission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    /// Identifier, unique within a quest.
    pub id: MissionId,
    /// Display name shown once the mission is unlocked.
    pub name: String,
    #[serde(default)]
    /// Task category.
    pub kind: MissionKind,
    #[serde(default)]
    /// Journey position; ties break on `id`.
    pub sort_order: i32,
    #[serde(default)]
    /// Completion date; `None` while open.
    pub completed_on: Option<NaiveDate>,
    #[serde(default)]
    /// Lesson progress for courses.
    pub course_progress: Option<CourseProgress>,
}

impl Mission {
    /// Whether the mission has a completion date.
    pub fn is_complete(&self) -> bool {
        self.completed_on.is_some()
    }
}

/// The quest snapshot the map visualizes.
#[derive(Resource, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuestData {
    /// Hero (user) the quest belongs to; keys message-history requests.
    pub hero_id: String,
    /// Quest identifier; keys message-history requests.
    pub quest_id: String,
    /// Missions in any order; the grid sorts them by `(sort_order, id)`.
    #[serde(default)]
    pub missions: Vec<Mission>,
    /// The mission the hero is currently working on.
    #[serde(default)]
    pub current_mission: Option<MissionId>,
}

impl QuestData {
    /// Looks up a mission by id.
    pub fn mission(&self, id: MissionId) -> Option<&Mission> {
        self.missions.iter().find(|m| m.id == id)
    }

    /// Missions ordered along the journey.
    pub fn ordered_missions(&self) -> Vec<&Mission> {
        let mut ordered: Vec<&Mission> = self.missions.iter().collect();
        ordered.sort_by_key(|m| (m.sort_order, m.id));
        ordered
    }

    /// Parses a quest snapshot from JSON text.
    pub fn from_json(text: &str) -> Result<Self, QuestLoadError> {
        let quest: Self = serde_json::from_str(text)?;
        quest.validate()?;
        Ok(quest)
    }

    /// Reads and parses a quest snapshot file.
    pub fn load(path: &Path) -> Result<Self, QuestLoadError> {
        let text = fs::read_to_string(path).map_err(|source| QuestLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    fn validate(&self) -> Result<(), QuestLoadError> {
        let mut ids: Vec<MissionId> = self.missions.iter().map(|m| m.id).collect();
        ids.sort();
        if let Some(pair) = ids.windows(2).find(|w| w[0] == w[1]) {
            return Err(QuestLoadError::DuplicateMission(pair[0]));
        }
        Ok(())
    }

    /// Demo journey used when no snapshot file is given.
    pub fn demo() -> Self {
        let date = |d: u32| NaiveDate::from_ymd_opt(2026, 3, d);
        let names = [
            ("Welcome aboard", MissionKind::Task),
            ("Meet your buddy", MissionKind::Event),
            ("Security basics", MissionKind::Course),
            ("First peer feedback", MissionKind::Review),
            ("Team retro", MissionKind::Event),
            ("Architecture tour", MissionKind::Course),
            ("Ship a small change", MissionKind::Task),
            ("Mentor session", MissionKind::Event),
            ("Quarterly review", MissionKind::Review),
            ("Present a demo", MissionKind::Task),
            ("Leadership primer", MissionKind::Course),
            ("Run a workshop", MissionKind::Event),
        ];
        let missions = names
            .iter()
            .enumerate()
            .map(|(i, (name, kind))| {
                let n = i as u32 + 1;
                Mission {
                    id: MissionId(n),
                    name: (*name).to_string(),
                    kind: *kind,
                    sort_order: n as i32,
                    completed_on: if n <= 4 { date(n * 3) } else { None },
                    course_progress: (*kind == MissionKind::Course).then_some(CourseProgress {
                        completed_lessons: if n <= 4 { 8 } else { 2 },
                        total_lessons: 8,
                    }),
                }
            })
            .collect();
        Self {
            hero_id: "hero-demo".into(),
            quest_id: "onboarding".into(),
            missions,
            current_mission: Some(MissionId(5)),
        }
    }
}

/// Failures while loading a quest snapshot.
#[derive(Debug, thiserror::Error)]
pub enum QuestLoadError {
    /// The snapshot file could not be read.
    #[error("failed to read quest file {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The snapshot is not valid quest JSON.
    #[error("malformed quest JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Two missions share an id.
    #[error("mission {0} appears more than once")]
    DuplicateMission(MissionId),
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "hero_id": "h1",
        "quest_id": "q1",
        "missions": [
            { "id": 2, "name": "Second", "sort_order": 2 },
            { "id": 1, "name": "First", "sort_order": 1, "completed_on": "2026-01-05",
              "kind": "course", "course_progress": { "completed_lessons": 3, "total_lessons": 4 } }
        ],
        "current_mission": 2
    }"#;

    #[test]
    fn parses_snapshot_with_defaults() {
        let quest = QuestData::from_json(SAMPLE).unwrap();
        assert_eq!(quest.missions.len(), 2);
        assert_eq!(quest.current_mission, Some(MissionId(2)));
        let second = quest.mission(MissionId(2)).unwrap();
        assert_eq!(second.kind, MissionKind::Task);
        assert!(!second.is_complete());
        let first = quest.mission(MissionId(1)).unwrap();
        assert!(first.is_complete());
        assert_eq!(first.kind, MissionKind::Course);
    }

    #[test]
    fn ordered_missions_follow_sort_order() {
        let quest = QuestData::from_json(SAMPLE).unwrap();
        let ids: Vec<_> = quest.ordered_missions().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![MissionId(1), MissionId(2)]);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let text = r#"{ "hero_id": "h", "quest_id": "q",
            "missions": [ { "id": 1, "name": "a" }, { "id": 1, "name": "b" } ] }"#;
        let err = QuestData::from_json(text).unwrap_err();
        assert!(matches!(err, QuestLoadError::DuplicateMission(MissionId(1))));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            QuestData::from_json("{ nope"),
            Err(QuestLoadError::Json(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = QuestData::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn course_fraction_handles_empty_course() {
        let empty = CourseProgress {
            completed_lessons: 0,
            total_lessons: 0,
        };
        assert_eq!(empty.fraction(), 0.0);
        let half = CourseProgress {
            completed_lessons: 2,
            total_lessons: 4,
        };
        assert!((half.fraction() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn demo_journey_is_valid() {
        let demo = QuestData::demo();
        assert!(demo.validate().is_ok());
        assert!(demo.current_mission.is_some());
    }
}
