//! Illustrative scenes, one per pipeline stage.
//!
//! Every number drawn here is a fixed illustrative constant; nothing is
//! computed from a model.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::widgets::{center, heatmap, pad, probability_bars};
use crate::stage::StageId;

/// Scene width in columns.
pub const SCENE_WIDTH: usize = 64;

/// A token of the running example sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoToken {
    pub text: &'static str,
    pub token_id: u32,
    /// Row of the embedding matrix this token looks up.
    pub row: usize,
}

/// "The quick brown fox", tokenized.
pub const INPUT_TOKENS: [DemoToken; 4] = [
    DemoToken { text: "The", token_id: 464, row: 1 },
    DemoToken { text: "quick", token_id: 2048, row: 3 },
    DemoToken { text: "brown", token_id: 3521, row: 5 },
    DemoToken { text: "fox", token_id: 1845, row: 7 },
];

/// Softmax over the next word after "fox".
pub const NEXT_WORD_CANDIDATES: [(&str, f32); 5] = [
    ("jumps", 0.75),
    ("runs", 0.15),
    ("sleeps", 0.05),
    ("eats", 0.03),
    ("is", 0.02),
];

const STARFIELD_SEED: u64 = 0x5EED_0F_57A5;
const MATRIX_ROWS: usize = 8;
const MATRIX_COLS: usize = 12;
const COLUMN: usize = 12;

/// Render the scene for a stage.
pub fn scene(stage: StageId) -> String {
    match stage {
        StageId::Intro => intro_scene(),
        StageId::Tokenization => tokenization_scene(),
        StageId::Embedding => embedding_scene(),
        StageId::Transformer => transformer_scene(),
        StageId::Prediction => prediction_scene(),
    }
}

fn token_columns<F: Fn(&DemoToken) -> String>(f: F) -> String {
    let cells: String = INPUT_TOKENS.iter().map(|t| center(&f(t), COLUMN)).collect();
    center(&cells, SCENE_WIDTH).trim_end().to_string()
}

fn intro_scene() -> String {
    const ROWS: usize = 9;
    let mut rng = StdRng::seed_from_u64(STARFIELD_SEED);
    let mut sky = vec![vec![' '; SCENE_WIDTH]; ROWS];
    for _ in 0..48 {
        let r = rng.gen_range(0..ROWS);
        let c = rng.gen_range(0..SCENE_WIDTH);
        sky[r][c] = if rng.gen_bool(0.2) { '*' } else { '·' };
    }

    for (row, text) in [(3, "L L M   A R C H I T E C T U R E"), (5, "Interactive Pipeline Visualization")] {
        let start = (SCENE_WIDTH - text.len()) / 2;
        for (i, ch) in text.chars().enumerate() {
            sky[row][start + i] = ch;
        }
        // Clear a margin around the banner text.
        sky[row][start - 1] = ' ';
        sky[row][start + text.len()] = ' ';
    }

    let mut lines: Vec<String> = sky
        .into_iter()
        .map(|r| r.into_iter().collect::<String>().trim_end().to_string())
        .collect();

    lines.push(String::new());
    lines.push(center("text ─► tokens ─► vectors ─► transformer ×N ─► next token", SCENE_WIDTH));
    lines.push(center("[1]        [2]           [3]                [4]", SCENE_WIDTH));
    lines.join("\n")
}

fn tokenization_scene() -> String {
    let mut lines = vec![
        center("Raw Text Input", SCENE_WIDTH),
        center("\"The quick brown fox\"", SCENE_WIDTH),
        token_columns(|_| "│".to_string()),
        token_columns(|_| "▼".to_string()),
        token_columns(|t| format!("┌{}┐", "─".repeat(t.text.len() + 2))),
        token_columns(|t| format!("│ {} │", t.text)),
        token_columns(|t| format!("└{}┘", "─".repeat(t.text.len() + 2))),
        token_columns(|t| format!("ID: {}", t.token_id)),
        token_columns(|_| "Input ID".to_string()),
        String::new(),
        center("Tokenizer (BPE)", SCENE_WIDTH),
        center(
            "Splits text into sub-word units found in the vocabulary.",
            SCENE_WIDTH,
        ),
    ];
    for line in &mut lines {
        *line = line.trim_end().to_string();
    }
    lines.join("\n")
}

fn embedding_scene() -> String {
    let mut lines = vec![
        center("Embedding Matrix (Lookup Table)", SCENE_WIDTH)
            .trim_end()
            .to_string(),
        String::new(),
    ];

    for row in 0..MATRIX_ROWS {
        let token = INPUT_TOKENS.iter().find(|t| t.row == row);
        let cell = if token.is_some() { "█" } else { "·" };
        let cells = vec![cell; MATRIX_COLS].join(" ");
        let pointer = match token {
            Some(t) => format!("  ◄── {:>4} ({})", t.token_id, t.text),
            None => String::new(),
        };
        lines.push(format!("  row {row}  {cells}{pointer}"));
    }

    lines.push(format!("  {}", pad("", 8) + &"─".repeat(MATRIX_COLS * 2 - 1)));
    lines.push(format!("  {}d_model (shown: {MATRIX_COLS} of 768/4096)", pad("", 8)));
    lines.push(String::new());
    lines.push(center("Dense Vectors", SCENE_WIDTH).trim_end().to_string());
    for t in INPUT_TOKENS {
        lines.push(format!(
            "  {} {:>4} ─► [{}]",
            pad(t.text, 6),
            t.token_id,
            "▓".repeat(MATRIX_COLS)
        ));
    }
    lines.join("\n")
}

/// Illustrative attention pattern: neighbours attend weakly, "fox" attends
/// strongly to "quick".
pub fn attention_weights() -> Vec<Vec<f32>> {
    INPUT_TOKENS
        .iter()
        .enumerate()
        .map(|(i, source)| {
            INPUT_TOKENS
                .iter()
                .enumerate()
                .map(|(j, target)| {
                    if source.text == "fox" && target.text == "quick" {
                        1.0
                    } else if i.abs_diff(j) <= 1 {
                        0.3
                    } else {
                        0.0
                    }
                })
                .collect()
        })
        .collect()
}

fn transformer_scene() -> String {
    let labels: Vec<&str> = INPUT_TOKENS.iter().map(|t| t.text).collect();

    let mut lines = vec![
        "  Transformer Layer (N=1)".to_string(),
        String::new(),
        token_columns(|_| "▲".to_string()),
        token_columns(|_| "◆".to_string()) + "    ║ residual",
        "      ┌─ Feed Forward (MLP) ──────────────────────────┐    ║".to_string(),
        "      │  per-token: expand ─► activate ─► project     │    ⊕".to_string(),
        "      └───────────────────────────────────────────────┘    ║".to_string(),
        token_columns(|_| "│".to_string()) + "    ║",
        "      ┌─ Self-Attention ──────────────────────────────┐    ║".to_string(),
        "      │  Q·Kᵀ ─► softmax ─► weighted sum of V         │    ⊕".to_string(),
        "      └───────────────────────────────────────────────┘    ║".to_string(),
        token_columns(|_| "│".to_string()) + "    ║",
        token_columns(|t| t.text.to_string()),
        String::new(),
        "  Who attends to whom (row → column):".to_string(),
    ];

    for line in heatmap(&attention_weights(), &labels, 6).lines() {
        lines.push(format!("    {line}"));
    }
    lines.push("    'fox' ══► 'quick' (strongest link)".to_string());
    lines.join("\n")
}

fn prediction_scene() -> String {
    let last = INPUT_TOKENS[INPUT_TOKENS.len() - 1];
    let mut lines = vec![
        center("Softmax Probability Distribution", SCENE_WIDTH)
            .trim_end()
            .to_string(),
        String::new(),
    ];
    for line in probability_bars(&NEXT_WORD_CANDIDATES, 30).lines() {
        lines.push(format!("    {line}"));
    }
    lines.extend([
        String::new(),
        center("▲", SCENE_WIDTH).trim_end().to_string(),
        center("Unembedding (Linear Layer) ─► vocabulary logits", SCENE_WIDTH)
            .trim_end()
            .to_string(),
        center("▲", SCENE_WIDTH).trim_end().to_string(),
        center(
            &format!("Final Context Vector (last token: \"{}\")", last.text),
            SCENE_WIDTH,
        )
        .trim_end()
        .to_string(),
        String::new(),
        center(
            "Next token: \"jumps\" (greedy) or drawn by sampling",
            SCENE_WIDTH,
        )
        .trim_end()
        .to_string(),
    ]);
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenes_are_deterministic() {
        for id in StageId::ALL {
            assert_eq!(scene(id), scene(id));
        }
    }

    #[test]
    fn test_scenes_are_distinct() {
        let all: Vec<String> = StageId::ALL.iter().map(|id| scene(*id)).collect();
        for i in 0..all.len() {
            for j in (i + 1)..all.len() {
                assert_ne!(all[i], all[j]);
            }
        }
    }

    #[test]
    fn test_tokenization_shows_ids() {
        let s = scene(StageId::Tokenization);
        for t in INPUT_TOKENS {
            assert!(s.contains(t.text));
            assert!(s.contains(&format!("ID: {}", t.token_id)));
        }
    }

    #[test]
    fn test_prediction_candidates_sum_to_one() {
        let total: f32 = NEXT_WORD_CANDIDATES.iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-6);
        assert!(scene(StageId::Prediction).contains("jumps"));
    }

    #[test]
    fn test_attention_fox_to_quick_is_strongest() {
        let w = attention_weights();
        assert_eq!(w[3][1], 1.0);
        assert_eq!(w[0][3], 0.0);
        assert_eq!(w[1][2], 0.3);
    }

    #[test]
    fn test_embedding_highlights_token_rows() {
        let s = scene(StageId::Embedding);
        assert!(s.contains("row 1  █"));
        assert!(s.contains("row 0  ·"));
        assert!(s.contains("◄──  464 (The)"));
    }
}
