//! Stage registry - the fixed, ordered pipeline walked through by the app.
//!
//! Each stage carries its display copy and a handful of "technical spec"
//! chips. The order here is the navigation order.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Identity of a pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Architecture overview.
    Intro,
    /// Text to token IDs.
    Tokenization,
    /// Token IDs to dense vectors.
    Embedding,
    /// Attention + feed-forward block.
    Transformer,
    /// Logits, softmax and sampling.
    Prediction,
}

impl StageId {
    /// All stage ids in pipeline order.
    pub const ALL: [StageId; 5] = [
        StageId::Intro,
        StageId::Tokenization,
        StageId::Embedding,
        StageId::Transformer,
        StageId::Prediction,
    ];

    /// Upper-case tag shown in the stage indicator.
    pub fn name(&self) -> &'static str {
        match self {
            StageId::Intro => "INTRO",
            StageId::Tokenization => "TOKENIZATION",
            StageId::Embedding => "EMBEDDING",
            StageId::Transformer => "TRANSFORMER",
            StageId::Prediction => "PREDICTION",
        }
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StageId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        StageId::ALL
            .into_iter()
            .find(|id| id.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnknownStage(wanted.to_string()))
    }
}

/// A single "key: value" chip in the technical specifications panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecChip {
    pub label: &'static str,
    pub value: &'static str,
}

/// One step of the illustrated pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage {
    /// Stage identity.
    pub id: StageId,
    /// Heading, optionally prefixed with an ordinal like `"2. "`.
    pub title: &'static str,
    /// English sub-heading.
    pub subtitle: &'static str,
    /// Body copy. May contain newlines.
    pub description: &'static str,
    /// Technical specification chips.
    pub specs: &'static [SpecChip],
}

impl Stage {
    /// Short label sent to the explanation service.
    pub fn concept(&self) -> &'static str {
        concept_label(self.title)
    }
}

/// Strip a leading ordinal prefix (everything up to the first `.`) from a
/// title. Titles without a `.`, or with nothing after it, come back whole.
pub fn concept_label(title: &str) -> &str {
    match title.split_once('.') {
        Some((_, rest)) if !rest.trim().is_empty() => rest.trim(),
        _ => title,
    }
}

/// The pipeline, in navigation order.
pub static STAGES: [Stage; 5] = [
    Stage {
        id: StageId::Intro,
        title: "LLM 全景概览",
        subtitle: "Architecture Overview",
        description: "Large Language Models (LLM) 并非魔法，而是一个巨大的数学函数。它接收文本，将其转换为数字序列，通过数十亿参数的计算，预测下一个最可能的字。本可视化将带您深入其内部工作流。",
        specs: &[],
    },
    Stage {
        id: StageId::Tokenization,
        title: "1. 词元化与编码",
        subtitle: "Tokenization & Encoding",
        description: "输入：“The quick brown fox”。计算机不认识单词，只认识数字。Tokenizer（分词器）使用 BPE 算法将文本切分为 Token，并查表赋予每个 Token 一个唯一的整数 ID（如 464, 2048）。这是模型的入口。",
        specs: &[
            SpecChip { label: "Vocab", value: "~50,257" },
            SpecChip { label: "Algo", value: "Byte-Pair Encoding" },
        ],
    },
    Stage {
        id: StageId::Embedding,
        title: "2. 嵌入层 (Embedding)",
        subtitle: "Vector Lookup Table",
        description: "整数 ID 没有任何语义信息（ID 2048 并不比 ID 1024 大两倍）。模型使用一个巨大的“查找表”（Embedding Matrix），将每个 ID 映射为一个稠密向量（Dense Vector）。在这个高维空间中，语义相似的词位置更接近。这是模型理解词义的基础。",
        specs: &[
            SpecChip { label: "Dim (d_model)", value: "768/4096" },
            SpecChip { label: "Positional Encoding", value: "Rotary/Sinusoidal" },
        ],
    },
    Stage {
        id: StageId::Transformer,
        title: "3. Transformer 模块",
        subtitle: "Attention & Feed Forward",
        description: "这是 LLM 的大脑。数据流经多个层：\n(1) Self-Attention（自注意力）：Token 之间互相“交流”，捕捉上下文依赖（如 'fox' 关注 'quick'）。\n(2) Feed Forward（前馈网络）：处理信息，提取更高级的特征。\n(3) Residual Connection：防止信息在深层网络中丢失。",
        specs: &[
            SpecChip { label: "Attention", value: "Multi-Head (Q,K,V)" },
            SpecChip { label: "Activation", value: "GeLU / SwiGLU" },
            SpecChip { label: "Norm", value: "RMSNorm / LayerNorm" },
        ],
    },
    Stage {
        id: StageId::Prediction,
        title: "4. 输出与概率采样",
        subtitle: "Logits & Softmax",
        description: "经过所有层处理后，最后一个 Token 的向量包含了对“接下来会发生什么”的理解。它通过 Unembedding 层映射回词表大小，再经由 Softmax 函数转化为概率分布。最后，根据概率（通常结合 Temperature 参数）采样选出下一个词（如 'jumps'）。",
        specs: &[
            SpecChip { label: "Temp", value: "0.7 - 1.0" },
            SpecChip { label: "Sampling", value: "Top-P / Top-K" },
        ],
    },
];

/// Look up a stage by id.
pub fn stage(id: StageId) -> &'static Stage {
    // STAGES is declared in StageId::ALL order.
    &STAGES[id as usize]
}
