//! Quiz generation.
//!
//! Each participant is asked about the *other* participant's top artists and
//! top songs. The correct answers are the subject's top five in rank order;
//! the options are the subject's whole list in uniformly random order.

use rand::{Rng, seq::SliceRandom, thread_rng};

use super::entity::{ProfileSummary, Question, QuizHalf, QuizPair};

/// Number of ranked answers a question asks for.
pub const TOP_N: usize = 5;

/// Build the quiz pair for a room with the thread-local RNG.
///
/// `first` is the participant who took the first seat. Their half asks about
/// `second`, and vice versa.
pub fn generate_quiz(first: &ProfileSummary, second: &ProfileSummary) -> QuizPair {
    generate_quiz_with_rng(first, second, &mut thread_rng())
}

/// Same as [`generate_quiz`] with an explicit RNG.
pub fn generate_quiz_with_rng<R: Rng + ?Sized>(
    first: &ProfileSummary,
    second: &ProfileSummary,
    rng: &mut R,
) -> QuizPair {
    QuizPair {
        for_participant1: quiz_about(second, rng),
        for_participant2: quiz_about(first, rng),
    }
}

fn quiz_about<R: Rng + ?Sized>(subject: &ProfileSummary, rng: &mut R) -> QuizHalf {
    QuizHalf {
        artists: ranked_question(
            format!("What are {}'s top {} artists", subject.display_name, TOP_N),
            &subject.top_artists,
            rng,
        ),
        songs: ranked_question(
            format!("What are {}'s top {} songs", subject.display_name, TOP_N),
            &subject.top_tracks,
            rng,
        ),
    }
}

fn ranked_question<R: Rng + ?Sized>(prompt: String, ranked: &[String], rng: &mut R) -> Question {
    let mut options = ranked.to_vec();
    // SliceRandom::shuffle is Fisher-Yates.
    options.shuffle(rng);

    Question {
        prompt,
        correct_answers: top_prefix(ranked).to_vec(),
        options,
    }
}

/// The first [`TOP_N`] entries of a ranked list (fewer if the list is short).
pub fn top_prefix(ranked: &[String]) -> &[String] {
    &ranked[..ranked.len().min(TOP_N)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn names(prefix: &str, count: usize) -> Vec<String> {
        (0..count).map(|i| format!("{}{}", prefix, i)).collect()
    }

    fn profile(name: &str, artists: Vec<String>, tracks: Vec<String>) -> ProfileSummary {
        ProfileSummary::new(name.to_string(), artists, tracks)
    }

    fn sorted(mut values: Vec<String>) -> Vec<String> {
        values.sort();
        values
    }

    #[test]
    fn test_each_half_asks_about_the_other_participant() {
        // テスト項目: 各参加者のクイズは相手のトップ5を正解とする
        // given (前提条件):
        let alice = profile("Alice", names("a", 10), names("at", 15));
        let bob = profile("Bob", names("b", 10), names("bt", 15));

        // when (操作):
        let quiz = generate_quiz(&alice, &bob);

        // then (期待する結果):
        assert_eq!(quiz.for_participant1.artists.correct_answers, names("b", 5));
        assert_eq!(quiz.for_participant1.songs.correct_answers, names("bt", 5));
        assert_eq!(quiz.for_participant2.artists.correct_answers, names("a", 5));
        assert_eq!(quiz.for_participant2.songs.correct_answers, names("at", 5));
    }

    #[test]
    fn test_options_are_a_permutation_of_the_full_list() {
        // テスト項目: 選択肢は対象者のリスト全体の並べ替えである
        // given (前提条件):
        let alice = profile("Alice", names("a", 10), names("at", 15));
        let bob = profile("Bob", names("b", 10), names("bt", 15));
        let mut rng = StdRng::seed_from_u64(7);

        // when (操作):
        let quiz = generate_quiz_with_rng(&alice, &bob, &mut rng);

        // then (期待する結果):
        let artists = &quiz.for_participant1.artists.options;
        let songs = &quiz.for_participant1.songs.options;
        assert_eq!(artists.len(), 10);
        assert_eq!(songs.len(), 15);
        assert_eq!(sorted(artists.clone()), sorted(names("b", 10)));
        assert_eq!(sorted(songs.clone()), sorted(names("bt", 15)));
        assert_eq!(
            sorted(quiz.for_participant2.artists.options.clone()),
            sorted(names("a", 10))
        );
    }

    #[test]
    fn test_prompts_name_the_subject() {
        // テスト項目: 問題文に相手の表示名が含まれる
        // given (前提条件):
        let alice = profile("Alice", names("a", 10), names("at", 15));
        let bob = profile("Bob", names("b", 10), names("bt", 15));

        // when (操作):
        let quiz = generate_quiz(&alice, &bob);

        // then (期待する結果):
        assert_eq!(
            quiz.for_participant1.artists.prompt,
            "What are Bob's top 5 artists"
        );
        assert_eq!(
            quiz.for_participant2.songs.prompt,
            "What are Alice's top 5 songs"
        );
    }

    #[test]
    fn test_same_seed_gives_same_options() {
        // テスト項目: 同じシードの RNG では同じ並び順になる
        // given (前提条件):
        let alice = profile("Alice", names("a", 10), names("at", 15));
        let bob = profile("Bob", names("b", 10), names("bt", 15));

        // when (操作):
        let first = generate_quiz_with_rng(&alice, &bob, &mut StdRng::seed_from_u64(42));
        let second = generate_quiz_with_rng(&alice, &bob, &mut StdRng::seed_from_u64(42));

        // then (期待する結果):
        assert_eq!(first, second);
    }

    #[test]
    fn test_short_lists_yield_short_answer_keys() {
        // テスト項目: リストが5件未満の場合、正解はリスト全体になる
        // given (前提条件):
        let alice = profile("Alice", names("a", 10), names("at", 15));
        let newcomer = profile("Newcomer", names("n", 3), Vec::new());

        // when (操作):
        let quiz = generate_quiz(&alice, &newcomer);

        // then (期待する結果):
        assert_eq!(quiz.for_participant1.artists.correct_answers, names("n", 3));
        assert!(quiz.for_participant1.songs.correct_answers.is_empty());
        assert!(quiz.for_participant1.songs.options.is_empty());
    }
}
