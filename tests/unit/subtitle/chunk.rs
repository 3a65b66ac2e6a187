use proptest::prelude::*;

use super::*;

fn texts(groups: &[Vec<String>]) -> Vec<String> {
    groups.iter().map(|g| g.join(" ")).collect()
}

#[test]
fn five_words_split_three_two() {
    let groups = split_subtitle("The quick brown fox jumps");
    assert_eq!(texts(&groups), vec!["The quick brown", "fox jumps"]);
}

#[test]
fn four_words_merge_the_straggler() {
    let groups = split_subtitle("one two three four");
    assert_eq!(texts(&groups), vec!["one two three four"]);
}

#[test]
fn seven_words_merge_into_last_full_group() {
    let groups = split_subtitle("a b c d e f g");
    assert_eq!(texts(&groups), vec!["a b c", "d e f g"]);
}

#[test]
fn short_and_empty_text_is_one_chunk() {
    assert_eq!(texts(&split_subtitle("hi there")), vec!["hi there"]);
    assert_eq!(split_subtitle("   "), vec![Vec::<String>::new()]);
}

#[test]
fn capitalize_keeps_the_tail() {
    assert_eq!(capitalize_words("the quick  brown"), "The Quick Brown");
    assert_eq!(capitalize_words("iPhone über"), "IPhone Über");
    assert_eq!(capitalize_words(""), "");
}

#[test]
fn chunk_timing_divides_the_interval() {
    let sub = Subtitle::new("The quick brown fox jumps", 0.0, 2.0, 0);
    let chunks = chunk_subtitle(&sub, None);
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].text(), "The quick brown");
    assert_eq!((chunks[0].start, chunks[0].duration), (0.0, 1.0));
    assert_eq!(chunks[0].next_start, Some(1.0));
    assert_eq!((chunks[1].start, chunks[1].duration), (1.0, 1.0));
    assert_eq!(chunks[1].next_start, None);
}

#[test]
fn plan_links_across_subtitles_in_start_order() {
    let subs = vec![
        Subtitle::new("second line here", 3.0, 4.0, 1),
        Subtitle::new("first", 0.0, 3.5, 0),
    ];
    let chunks = plan_chunks(&subs);
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].owner_index, 0);
    assert_eq!(chunks[0].next_start, Some(3.0));
    assert_eq!(chunks[1].owner_index, 1);
    assert_eq!(chunks[1].next_start, None);
}

fn words_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-zA-Z]{1,8}", 0..40)
}

proptest! {
    #[test]
    fn split_preserves_words_in_order(words in words_strategy()) {
        let text = words.join(" ");
        let flat: Vec<String> = split_subtitle(&text).into_iter().flatten().collect();
        prop_assert_eq!(flat, words);
    }

    #[test]
    fn chunk_sizes_are_bounded(words in words_strategy()) {
        let groups = split_subtitle(&words.join(" "));
        if words.len() <= 3 {
            prop_assert_eq!(groups.len(), 1);
        } else {
            for g in &groups {
                prop_assert!(g.len() == 2 || g.len() == 3 || g.len() == 4);
            }
            // Only the final group may deviate from three words.
            for g in &groups[..groups.len() - 1] {
                prop_assert_eq!(g.len(), 3);
            }
        }
    }

    #[test]
    fn chunks_partition_the_subtitle(words in words_strategy(), start in 0.0f64..100.0, len in 0.01f64..20.0) {
        let sub = Subtitle::new(words.join(" "), start, start + len, 0);
        let chunks = chunk_subtitle(&sub, None);
        prop_assert!((chunks[0].start - start).abs() < 1e-9);
        let last = chunks.last().unwrap();
        prop_assert!((last.end() - (start + len)).abs() < 1e-9);
        for pair in chunks.windows(2) {
            prop_assert!((pair[0].end() - pair[1].start).abs() < 1e-9);
            prop_assert_eq!(pair[0].next_start, Some(pair[1].start));
        }
        let total: f64 = chunks.iter().map(|c| c.duration).sum();
        prop_assert!((total - len).abs() < 1e-9);
    }
}
