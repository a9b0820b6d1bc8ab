//! Supported model families and their grammars.

use crate::TurnGrammar;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static CHATML: LazyLock<TurnGrammar> = LazyLock::new(|| TurnGrammar {
    name: "smollm",
    turn: Regex::new(r"(?s)<\|im_start\|>(.*?)<\|im_end\|>").expect("ChatML turn pattern"),
    role_trim: &[' ', '\r', '\t'],
    header_open: "<|im_start|>",
    header_close: "\n",
    turn_end: "<|im_end|>\n",
});

// The tokenizer emits `<s>` once before the first turn, so the opening tag is
// optional and each turn is closed by `</s>`.
static ZEPHYR: LazyLock<TurnGrammar> = LazyLock::new(|| TurnGrammar {
    name: "tinyllama",
    turn: Regex::new(r"(?s)(?:<s>)?(.*?)</s>").expect("Zephyr turn pattern"),
    role_trim: &[' ', '\r', '\t', '<', '|', '>'],
    header_open: "<|",
    header_close: "|>\n",
    turn_end: "</s>\n",
});

/// A family of models sharing one chat template.
///
/// Supporting another family means adding a variant here and its grammar.
/// Nothing else changes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ModelFamily {
    /// ChatML turns: `<|im_start|>role\n...<|im_end|>`
    #[serde(alias = "chatml")]
    #[strum(to_string = "smollm", serialize = "chatml")]
    SmolLm,
    /// Zephyr turns: `<|role|>\n...</s>`
    #[serde(alias = "zephyr")]
    #[strum(to_string = "tinyllama", serialize = "zephyr")]
    TinyLlama,
}

impl ModelFamily {
    /// The family's delimiter grammar.
    pub fn grammar(&self) -> &'static TurnGrammar {
        match self {
            ModelFamily::SmolLm => &CHATML,
            ModelFamily::TinyLlama => &ZEPHYR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_grammar_compiles() {
        for family in ModelFamily::iter() {
            assert_eq!(family.grammar().name(), family.to_string());
        }
    }

    #[test]
    fn test_family_aliases() {
        assert_eq!(ModelFamily::from_str("ChatML").unwrap(), ModelFamily::SmolLm);
        assert_eq!(ModelFamily::from_str("zephyr").unwrap(), ModelFamily::TinyLlama);
        let family: ModelFamily = serde_json::from_str("\"chatml\"").unwrap();
        assert_eq!(family, ModelFamily::SmolLm);
    }
}
