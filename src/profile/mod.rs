//! Student progress tracking
//!
//! A profile records, per topic, which concepts the student has learned and
//! which are weak, with last-studied timestamps. One JSON file per student
//! id; the default student is "default".

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::tutor::topics::TopicMap;

/// Learning status of a concept after an evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConceptStatus {
    /// The student demonstrated understanding
    Learned,
    /// The student needs to revisit this
    Weak,
}

/// Progress on a single topic
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicProgress {
    /// Concepts the student has demonstrated
    pub concepts_learned: Vec<String>,
    /// Concepts needing review
    pub concepts_weak: Vec<String>,
    /// When this topic was last studied
    pub last_studied: Option<DateTime<Utc>>,
}

/// A student's learning profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentProfile {
    /// Student identifier
    pub student_id: String,
    /// When the profile was created
    pub created_at: DateTime<Utc>,
    /// Progress per topic
    pub topics: BTreeMap<String, TopicProgress>,

    /// Where this profile is persisted
    #[serde(skip)]
    path: PathBuf,
}

impl StudentProfile {
    /// Load a student's profile from the app profiles directory, creating
    /// a fresh one on first use
    pub fn open(student_id: &str) -> Result<Self> {
        Self::open_in(student_id, Config::profiles_dir()?)
    }

    /// Load or create a profile in a specific directory (used by tests)
    pub fn open_in(student_id: &str, dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create profiles directory {:?}", dir))?;
        let path = dir.join(format!("{}.json", student_id));

        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read profile from {:?}", path))?;
            let mut profile: StudentProfile =
                serde_json::from_str(&contents).with_context(|| "Failed to parse profile")?;
            profile.path = path;
            Ok(profile)
        } else {
            let profile = Self {
                student_id: student_id.to_string(),
                created_at: Utc::now(),
                topics: BTreeMap::new(),
                path,
            };
            profile.save()?;
            tracing::info!("Created new student profile: {}", student_id);
            Ok(profile)
        }
    }

    /// Save the profile to disk
    pub fn save(&self) -> Result<()> {
        let contents =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize profile")?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write profile to {:?}", self.path))?;
        Ok(())
    }

    /// Get progress on a specific topic
    pub fn topic_progress(&self, topic: &str) -> Option<&TopicProgress> {
        self.topics.get(topic)
    }

    /// Record the outcome of studying one concept
    ///
    /// The concept is removed from both lists before re-insertion so a
    /// concept is never counted twice, then the topic is timestamped and
    /// the profile saved.
    pub fn update_concept(&mut self, topic: &str, concept: &str, status: ConceptStatus) -> Result<()> {
        let progress = self.topics.entry(topic.to_string()).or_default();

        progress.concepts_learned.retain(|c| c != concept);
        progress.concepts_weak.retain(|c| c != concept);

        match status {
            ConceptStatus::Learned => progress.concepts_learned.push(concept.to_string()),
            ConceptStatus::Weak => progress.concepts_weak.push(concept.to_string()),
        }

        progress.last_studied = Some(Utc::now());
        self.save()
    }

    /// All weak concepts across topics, for review prioritization
    pub fn weak_concepts(&self) -> Vec<(&str, &str)> {
        self.topics
            .iter()
            .flat_map(|(topic, progress)| {
                progress.concepts_weak.iter().map(move |c| (topic.as_str(), c.as_str()))
            })
            .collect()
    }

    /// Render progress on a single topic
    pub fn render_topic(&self, topic: &str) -> String {
        let Some(progress) = self.topic_progress(topic) else {
            return format!("{}: Not studied yet", topic);
        };

        let mut out = format!("PROGRESS: {}\n", topic);

        if !progress.concepts_learned.is_empty() {
            out.push_str(&format!("\nMastered ({}):\n", progress.concepts_learned.len()));
            for concept in &progress.concepts_learned {
                out.push_str(&format!("    - {}\n", concept));
            }
        }

        if !progress.concepts_weak.is_empty() {
            out.push_str(&format!("\nNeeds review ({}):\n", progress.concepts_weak.len()));
            for concept in &progress.concepts_weak {
                out.push_str(&format!("    - {}\n", concept));
            }
        }

        if progress.concepts_learned.is_empty() && progress.concepts_weak.is_empty() {
            out.push_str("\nNo concepts studied yet\n");
        }

        out
    }

    /// Render progress across all topics with completion bars
    ///
    /// Totals prefer the topic map's concept lists; for topics absent from
    /// the map, the concepts the student has touched stand in as the total.
    pub fn render_all(&self, topic_map: Option<&TopicMap>) -> String {
        if self.topics.is_empty() {
            return "No topics studied yet".to_string();
        }

        let mut out = String::new();
        for (i, (topic, progress)) in self.topics.iter().enumerate() {
            let learned = progress.concepts_learned.len();
            let weak = progress.concepts_weak.len();

            let total = topic_map
                .and_then(|m| m.concepts_for(topic))
                .filter(|c| !c.is_empty())
                .map(|c| c.len())
                .unwrap_or(learned + weak);

            out.push_str(&format!("\n{}. {}\n", i + 1, topic));

            if total > 0 {
                // Sessions can record goals beyond the topic map's concept
                // list, so learned may exceed total. Cap the bar at full.
                let percent = ((learned * 100) / total).min(100);
                let filled = percent / 10;
                let empty = 10 - filled;
                out.push_str(&format!(
                    "  [{}{}]    {}% ({}/{} concepts)\n",
                    "\u{2588}".repeat(filled),
                    "\u{2591}".repeat(empty),
                    percent,
                    learned,
                    total
                ));
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn test_profile() -> (TempDir, StudentProfile) {
        let temp = TempDir::new().unwrap();
        let profile = StudentProfile::open_in("default", temp.path().to_path_buf()).unwrap();
        (temp, profile)
    }

    #[test]
    fn new_profile_is_empty_and_persisted() {
        let temp = TempDir::new().unwrap();
        let profile = StudentProfile::open_in("alex", temp.path().to_path_buf()).unwrap();
        assert_eq!(profile.student_id, "alex");
        assert!(profile.topics.is_empty());
        assert!(temp.path().join("alex.json").exists());
    }

    #[test]
    fn profile_reloads_from_disk() {
        let temp = TempDir::new().unwrap();
        {
            let mut profile = StudentProfile::open_in("default", temp.path().to_path_buf()).unwrap();
            profile.update_concept("tokens", "what tokens are", ConceptStatus::Learned).unwrap();
        }

        let reloaded = StudentProfile::open_in("default", temp.path().to_path_buf()).unwrap();
        let progress = reloaded.topic_progress("tokens").unwrap();
        assert_eq!(progress.concepts_learned, vec!["what tokens are"]);
        assert!(progress.last_studied.is_some());
    }

    #[test]
    fn concept_moves_between_lists_without_duplicates() {
        let (_temp, mut profile) = test_profile();

        profile.update_concept("tokens", "token limits", ConceptStatus::Weak).unwrap();
        profile.update_concept("tokens", "token limits", ConceptStatus::Learned).unwrap();

        let progress = profile.topic_progress("tokens").unwrap();
        assert_eq!(progress.concepts_learned, vec!["token limits"]);
        assert!(progress.concepts_weak.is_empty());
    }

    #[test]
    fn weak_concepts_span_topics() {
        let (_temp, mut profile) = test_profile();
        profile.update_concept("tokens", "subwords", ConceptStatus::Weak).unwrap();
        profile.update_concept("embeddings", "dimensions", ConceptStatus::Weak).unwrap();
        profile.update_concept("embeddings", "similarity", ConceptStatus::Learned).unwrap();

        let weak = profile.weak_concepts();
        assert_eq!(weak.len(), 2);
        assert!(weak.contains(&("tokens", "subwords")));
        assert!(weak.contains(&("embeddings", "dimensions")));
    }

    #[test]
    fn render_unstudied_topic() {
        let (_temp, profile) = test_profile();
        assert_eq!(profile.render_topic("algebra"), "algebra: Not studied yet");
    }

    #[test]
    fn render_all_uses_topic_map_totals() {
        let (_temp, mut profile) = test_profile();
        profile.update_concept("tokens", "definition of a token", ConceptStatus::Learned).unwrap();

        let mut map = TopicMap::default();
        map.topics.insert(
            "tokens".into(),
            crate::tutor::topics::TopicEntry {
                summary: String::new(),
                key_points: vec![],
                concepts: vec![
                    "definition of a token".into(),
                    "token limits".into(),
                    "subword units".into(),
                    "pricing".into(),
                ],
            },
        );

        let rendered = profile.render_all(Some(&map));
        // 1 of 4 concepts learned
        assert!(rendered.contains("25% (1/4 concepts)"));
        assert!(rendered.contains("\u{2588}\u{2588}"));
    }

    #[test]
    fn render_all_caps_bar_when_learned_exceeds_map_total() {
        let (_temp, mut profile) = test_profile();
        for goal in ["recognize tokens", "count tokens", "split rare words", "estimate cost"] {
            profile.update_concept("tokens", goal, ConceptStatus::Learned).unwrap();
        }

        let mut map = TopicMap::default();
        map.topics.insert(
            "tokens".into(),
            crate::tutor::topics::TopicEntry {
                summary: String::new(),
                key_points: vec![],
                concepts: vec!["a".into(), "b".into(), "c".into()],
            },
        );

        // 4 learned against a 3-concept map must render a full bar, not panic
        let rendered = profile.render_all(Some(&map));
        assert!(rendered.contains("100% (4/3 concepts)"));
        assert!(rendered.contains(&"\u{2588}".repeat(10)));
        assert!(!rendered.contains('\u{2591}'));
    }

    #[test]
    fn render_all_falls_back_to_seen_concepts() {
        let (_temp, mut profile) = test_profile();
        profile.update_concept("tokens", "a", ConceptStatus::Learned).unwrap();
        profile.update_concept("tokens", "b", ConceptStatus::Weak).unwrap();

        let rendered = profile.render_all(None);
        assert!(rendered.contains("50% (1/2 concepts)"));
    }
}
