//! SRT subtitle parsing.
//!
//! The parser is deliberately forgiving: real-world SRT files come with
//! missing sequence numbers, mixed line endings, period decimal separators
//! and stray malformed blocks.  Anything that does not look like a cue is
//! skipped silently — the caller decides whether an empty result means the
//! whole file was invalid.

use once_cell::sync::Lazy;
use regex::Regex;

use super::SubtitleCue;

/// Matches `H:MM:SS,mmm --> H:MM:SS,mmm` with one- or two-digit hours and
/// either comma or period before the milliseconds.
static TIMECODE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,2}:\d{2}:\d{2}[,.]\d{3})\s*-->\s*(\d{1,2}:\d{2}:\d{2}[,.]\d{3})")
        .expect("timecode regex is valid")
});

/// One or more blank lines (possibly containing whitespace) ends a block.
static BLOCK_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("block split regex is valid"));

/// Convert an `H{1,2}:MM:SS[,.]mmm` timecode to seconds.
///
/// Returns `None` when the string does not have exactly four numeric
/// fields.  Inputs that already matched [`TIMECODE_RE`] always parse.
fn timecode_to_seconds(timecode: &str) -> Option<f64> {
    let mut parts = timecode.split([':', ',', '.']);
    let hours: u32 = parts.next()?.parse().ok()?;
    let minutes: u32 = parts.next()?.parse().ok()?;
    let seconds: u32 = parts.next()?.parse().ok()?;
    let millis: u32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(f64::from(hours) * 3600.0 + f64::from(minutes) * 60.0 + f64::from(seconds)
        + f64::from(millis) / 1000.0)
}

/// Parse SRT content into an ordered cue list.
///
/// Blocks are separated by one or more blank lines (CRLF tolerated).  Per
/// block, the first line containing `-->` is the timecode line; a line
/// directly above it is discarded as the sequence number without being
/// validated.  The remaining lines become the cue text, joined with single
/// spaces.  Blocks with no parseable timecode or no text are dropped.
///
/// Cue indices are re-assigned `1, 2, 3, …` over the cues actually emitted;
/// numbering found in the file is ignored.
///
/// Never fails: a file with zero recognizable cues parses to an empty `Vec`.
pub fn parse_srt(content: &str) -> Vec<SubtitleCue> {
    let normalized = content.replace("\r\n", "\n");
    let mut cues = Vec::new();

    for block in BLOCK_SPLIT_RE.split(normalized.trim()) {
        let block = block.trim();
        if block.is_empty() {
            continue;
        }
        let lines: Vec<&str> = block.lines().collect();

        let Some(arrow_pos) = lines.iter().position(|l| l.contains("-->")) else {
            continue;
        };
        let Some(caps) = TIMECODE_RE.captures(lines[arrow_pos]) else {
            continue;
        };

        // Both captures matched TIMECODE_RE, so the conversions cannot fail.
        let Some(start_secs) = timecode_to_seconds(&caps[1]) else {
            continue;
        };
        let Some(end_secs) = timecode_to_seconds(&caps[2]) else {
            continue;
        };

        let text = lines[arrow_pos + 1..].join(" ").trim().to_string();
        if text.is_empty() {
            continue;
        }

        cues.push(SubtitleCue {
            index: cues.len() + 1,
            start_secs,
            end_secs,
            text,
        });
    }

    cues
}

/// Split plain-text content into spoken units — one per non-blank line.
pub fn split_paragraphs(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // --- timecode_to_seconds ---

    #[test]
    fn timecode_converts_exactly() {
        assert_eq!(timecode_to_seconds("01:02:03,456"), Some(3723.456));
    }

    #[test]
    fn timecode_accepts_period_separator() {
        assert_eq!(timecode_to_seconds("00:00:01.500"), Some(1.5));
    }

    #[test]
    fn timecode_accepts_single_digit_hours() {
        assert_eq!(timecode_to_seconds("1:00:00,000"), Some(3600.0));
    }

    #[test]
    fn timecode_rejects_missing_fields() {
        assert_eq!(timecode_to_seconds("02:03,456"), None);
        assert_eq!(timecode_to_seconds("garbage"), None);
    }

    // --- parse_srt ---

    const TWO_CUES: &str = "\
1
00:00:00,000 --> 00:00:02,000
Hello

2
00:00:05,000 --> 00:00:07,000
World
";

    #[test]
    fn parses_two_cues_deterministically() {
        let cues = parse_srt(TWO_CUES);
        assert_eq!(cues.len(), 2);

        assert_eq!(cues[0].index, 1);
        assert_eq!(cues[0].start_secs, 0.0);
        assert_eq!(cues[0].end_secs, 2.0);
        assert_eq!(cues[0].text, "Hello");

        assert_eq!(cues[1].index, 2);
        assert_eq!(cues[1].start_secs, 5.0);
        assert_eq!(cues[1].end_secs, 7.0);
        assert_eq!(cues[1].text, "World");
    }

    #[test]
    fn tolerates_crlf_line_endings() {
        let crlf = TWO_CUES.replace('\n', "\r\n");
        let cues = parse_srt(&crlf);
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[1].text, "World");
    }

    #[test]
    fn block_missing_arrow_line_is_skipped() {
        let content = "\
1
not a timecode at all
Hello

2
00:00:05,000 --> 00:00:07,000
World
";
        let cues = parse_srt(content);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "World");
        // Index is assigned over emitted cues, not taken from the file.
        assert_eq!(cues[0].index, 1);
    }

    #[test]
    fn block_with_malformed_timecode_is_skipped() {
        let content = "\
1
00:00 --> 00:07
Broken

2
00:00:05,000 --> 00:00:07,000
Fine
";
        let cues = parse_srt(content);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "Fine");
    }

    #[test]
    fn cue_without_sequence_number_still_parses() {
        let content = "\
00:00:01,000 --> 00:00:02,000
No number here
";
        let cues = parse_srt(content);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].start_secs, 1.0);
        assert_eq!(cues[0].text, "No number here");
    }

    #[test]
    fn multi_line_text_joins_with_single_spaces() {
        let content = "\
1
00:00:01,000 --> 00:00:03,000
First line
second line
";
        let cues = parse_srt(content);
        assert_eq!(cues[0].text, "First line second line");
    }

    #[test]
    fn block_with_empty_text_is_dropped() {
        let content = "\
1
00:00:01,000 --> 00:00:03,000

2
00:00:04,000 --> 00:00:05,000
Spoken
";
        // The first block ends at the blank line, leaving it with no text.
        let cues = parse_srt(content);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "Spoken");
    }

    #[test]
    fn period_separator_timecodes_parse() {
        let content = "\
1
00:00:01.250 --> 00:00:03.750
Dotted
";
        let cues = parse_srt(content);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].start_secs, 1.25);
        assert_eq!(cues[0].end_secs, 3.75);
    }

    #[test]
    fn garbage_input_parses_to_empty() {
        assert!(parse_srt("complete nonsense\nwith no cues").is_empty());
        assert!(parse_srt("").is_empty());
    }

    #[test]
    fn multiple_blank_lines_between_blocks_are_fine() {
        let content = "\
1
00:00:00,000 --> 00:00:01,000
A



2
00:00:02,000 --> 00:00:03,000
B
";
        let cues = parse_srt(content);
        assert_eq!(cues.len(), 2);
    }

    // --- split_paragraphs ---

    #[test]
    fn split_paragraphs_drops_blank_lines() {
        let text = "first\n\n  \nsecond\nthird\n";
        assert_eq!(split_paragraphs(text), vec!["first", "second", "third"]);
    }

    #[test]
    fn split_paragraphs_trims_whitespace() {
        assert_eq!(split_paragraphs("  hello  \n"), vec!["hello"]);
    }

    #[test]
    fn split_paragraphs_of_empty_input_is_empty() {
        assert!(split_paragraphs("").is_empty());
        assert!(split_paragraphs("\n\n\n").is_empty());
    }
}
