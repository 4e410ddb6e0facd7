//! Answer scoring.

use super::{
    entity::{AnswerSet, ProfileSummary},
    quiz::top_prefix,
};

/// Points for an answer in exactly the right rank.
pub const EXACT_POSITION_POINTS: u32 = 3;
/// Points for an answer in the top five but at the wrong rank.
pub const MISPLACED_POINTS: u32 = 1;

/// Score a participant's answers against the other participant's profile.
pub fn score(answers: &AnswerSet, ground_truth: &ProfileSummary) -> u32 {
    score_ranked(&answers.artists, top_prefix(&ground_truth.top_artists))
        + score_ranked(&answers.songs, top_prefix(&ground_truth.top_tracks))
}

/// Score one category. `truth` is the ranked top-five list.
pub fn score_ranked(answers: &[String], truth: &[String]) -> u32 {
    answers
        .iter()
        .enumerate()
        .map(|(index, answer)| {
            if truth.get(index) == Some(answer) {
                EXACT_POSITION_POINTS
            } else if truth.contains(answer) {
                MISPLACED_POINTS
            } else {
                0
            }
        })
        .sum()
}
