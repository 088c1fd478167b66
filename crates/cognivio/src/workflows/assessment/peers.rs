use super::aggregate::{aggregate, AggregateElementSummary, ElementAggregates};
use super::domain::{AssessmentResult, TeacherId, TeacherProfile};
use super::normalizer::round_to;
use serde::Serialize;
use std::collections::HashMap;

/// Target averages below this mark an element as a weak area.
pub const WEAK_AREA_THRESHOLD: f64 = 6.0;
/// Peer averages at or above this count as a strength.
pub const PEER_STRENGTH_THRESHOLD: f64 = 7.0;
/// Stand-in target average for an element the target was never scored on.
pub const DEFAULT_TARGET_AVERAGE: f64 = 5.0;

const FALLBACK_WEAK_AREAS: usize = 3;
const MAX_RECOMMENDATIONS: usize = 3;
const MAX_STRENGTHS: usize = 3;
const REASON_NAMES: usize = 2;

/// A peer teacher together with their per-element averages.
#[derive(Debug, Clone)]
pub struct PeerCandidate {
    pub profile: TeacherProfile,
    pub scores: HashMap<String, f64>,
}

impl PeerCandidate {
    pub fn new(profile: TeacherProfile, scores: HashMap<String, f64>) -> Self {
        Self { profile, scores }
    }

    pub fn from_assessments(profile: TeacherProfile, assessments: &[AssessmentResult]) -> Self {
        let aggregates = aggregate(
            assessments
                .iter()
                .flat_map(|assessment| assessment.element_scores.iter()),
        );
        let scores = aggregates
            .iter()
            .map(|summary| (summary.element_id.clone(), summary.mean))
            .collect();
        Self { profile, scores }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeerStrength {
    pub element_id: String,
    pub name: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeerRecommendation {
    pub peer_id: TeacherId,
    pub peer_name: String,
    pub subject: String,
    pub grade_level: String,
    pub department: Option<String>,
    pub strengths: Vec<PeerStrength>,
    pub match_score: f64,
    pub reason: String,
}

/// Ranks peers whose strengths cover the target's weak areas. At most three results.
pub fn recommend_peers(
    target: &TeacherProfile,
    target_scores: &ElementAggregates,
    peers: &[PeerCandidate],
) -> Vec<PeerRecommendation> {
    if target_scores.is_empty() || peers.is_empty() {
        return Vec::new();
    }

    let weak_areas = weak_areas(target_scores);
    let mut recommendations: Vec<PeerRecommendation> = peers
        .iter()
        .filter(|peer| peer.profile.id != target.id && !peer.scores.is_empty())
        .filter_map(|peer| match_peer(target, target_scores, &weak_areas, peer))
        .collect();

    recommendations.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
    recommendations.truncate(MAX_RECOMMENDATIONS);
    recommendations
}

/// Element ids the target averages below the weak-area mark, or the three lowest
/// when nothing is below it.
pub fn weak_areas(target_scores: &ElementAggregates) -> Vec<String> {
    let below: Vec<String> = target_scores
        .iter()
        .filter(|summary| summary.mean < WEAK_AREA_THRESHOLD)
        .map(|summary| summary.element_id.clone())
        .collect();
    if !below.is_empty() {
        return below;
    }

    let mut ranked: Vec<&AggregateElementSummary> = target_scores.iter().collect();
    ranked.sort_by(|a, b| a.mean.total_cmp(&b.mean));
    ranked
        .into_iter()
        .take(FALLBACK_WEAK_AREAS)
        .map(|summary| summary.element_id.clone())
        .collect()
}

fn match_peer(
    target: &TeacherProfile,
    target_scores: &ElementAggregates,
    weak_areas: &[String],
    peer: &PeerCandidate,
) -> Option<PeerRecommendation> {
    let mut strengths = Vec::new();
    let mut accumulated = 0.0;

    for element_id in weak_areas {
        let Some(&peer_average) = peer.scores.get(element_id) else {
            continue;
        };
        if peer_average < PEER_STRENGTH_THRESHOLD {
            continue;
        }

        let target_summary = target_scores.get(element_id);
        let target_average = target_summary
            .map(|summary| summary.mean)
            .unwrap_or(DEFAULT_TARGET_AVERAGE);
        let name = target_summary
            .map(|summary| summary.element_name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(element_id.as_str())
            .to_string();

        strengths.push(PeerStrength {
            element_id: element_id.clone(),
            name,
            score: round_to(peer_average, 1),
        });
        accumulated += (peer_average - target_average) / 10.0;
    }

    if strengths.is_empty() {
        return None;
    }

    let names: Vec<&str> = strengths
        .iter()
        .take(REASON_NAMES)
        .map(|strength| strength.name.as_str())
        .collect();
    let mut reason = format!("Strong in {}", names.join(", "));
    if peer.profile.subject == target.subject {
        reason.push_str(" (same subject area)");
    }

    strengths.truncate(MAX_STRENGTHS);

    Some(PeerRecommendation {
        peer_id: peer.profile.id.clone(),
        peer_name: peer.profile.name.clone(),
        subject: peer.profile.subject.clone(),
        grade_level: peer.profile.grade_level.clone(),
        department: peer.profile.department.clone(),
        strengths,
        match_score: (accumulated / weak_areas.len() as f64).min(1.0),
        reason,
    })
}
