use crate::request::Subtitle;

/// Words per chunk.
pub const CHUNK_WORDS: usize = 3;

/// A group of words shown together, with its resolved timing.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Chunk {
    /// Words in display order.
    pub words: Vec<String>,
    /// Absolute start time in seconds.
    pub start: f64,
    /// Nominal duration in seconds.
    pub duration: f64,
    /// `index` of the subtitle this chunk came from.
    pub owner_index: usize,
    /// Start of the chunk that follows on the timeline, if any.
    pub next_start: Option<f64>,
}

impl Chunk {
    /// Words joined with single spaces.
    pub fn text(&self) -> String {
        self.words.join(" ")
    }

    /// Nominal end time.
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Split subtitle text into word groups of three.
///
/// Text of three words or fewer stays one group (empty text gives one empty group). A single
/// leftover word joins the previous group; a leftover pair stands alone.
pub fn split_subtitle(text: &str) -> Vec<Vec<String>> {
    let words: Vec<String> = text.split_whitespace().map(str::to_string).collect();
    if words.len() <= CHUNK_WORDS {
        return vec![words];
    }

    let mut groups: Vec<Vec<String>> = Vec::with_capacity(words.len() / CHUNK_WORDS + 1);
    for group in words.chunks(CHUNK_WORDS) {
        match (group.len(), groups.last_mut()) {
            (1, Some(prev)) => prev.extend_from_slice(group),
            _ => groups.push(group.to_vec()),
        }
    }
    groups
}

/// Uppercase the first character of every word, leaving the rest untouched.
pub fn capitalize_words(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Chunk one subtitle and divide its interval evenly.
///
/// The last chunk's `next_start` is `next_subtitle_start`.
pub fn chunk_subtitle(sub: &Subtitle, next_subtitle_start: Option<f64>) -> Vec<Chunk> {
    let groups = split_subtitle(&sub.text);
    let k = groups.len();
    let chunk_duration = sub.duration() / k as f64;
    let starts: Vec<f64> = (0..k)
        .map(|i| sub.start + i as f64 * chunk_duration)
        .collect();

    groups
        .into_iter()
        .enumerate()
        .map(|(i, words)| Chunk {
            words,
            start: starts[i],
            duration: chunk_duration,
            owner_index: sub.index,
            next_start: starts.get(i + 1).copied().or(next_subtitle_start),
        })
        .collect()
}

/// Chunk every subtitle in start order, linking each chunk to the one that follows it.
///
/// Empty chunks are kept so timing stays aligned; the layout stage skips them.
pub fn plan_chunks(subtitles: &[Subtitle]) -> Vec<Chunk> {
    let mut ordered: Vec<&Subtitle> = subtitles.iter().collect();
    ordered.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut out = Vec::new();
    for (i, sub) in ordered.iter().enumerate() {
        let next = ordered.get(i + 1).map(|s| s.start);
        out.extend(chunk_subtitle(sub, next));
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/subtitle/chunk.rs"]
mod tests;
