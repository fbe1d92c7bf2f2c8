// Risk Lexicons
//
// Fixed keyword sets. A hit is a substring match against the lowercased text,
// so "hate" also hits "hateful" and "right" hits "copyright".

use once_cell::sync::Lazy;
use std::collections::BTreeSet;

/// Keyword lexicon with its density multiplier
#[derive(Debug)]
pub struct Lexicon {
    pub name: &'static str,
    pub terms: BTreeSet<&'static str>,
    /// Scales hits-per-word into a 0.0-1.0 score
    pub multiplier: f64,
}

impl Lexicon {
    fn new(name: &'static str, multiplier: f64, terms: &[&'static str]) -> Self {
        Self {
            name,
            terms: terms.iter().copied().collect(),
            multiplier,
        }
    }

    /// Number of distinct terms occurring in already-lowercased text
    pub fn hits(&self, lowered: &str) -> usize {
        self.terms.iter().filter(|term| lowered.contains(*term)).count()
    }
}

pub static TOXICITY: Lazy<Lexicon> = Lazy::new(|| {
    Lexicon::new(
        "toxicity",
        10.0,
        &[
            "insult", "stupid", "idiot", "moron", "dumb", "fool", "loser", "hate", "despise",
            "loathe", "disgusting", "pathetic", "worthless",
        ],
    )
});

pub static HATE_SPEECH: Lazy<Lexicon> = Lazy::new(|| {
    Lexicon::new(
        "hate_speech",
        15.0,
        &[
            "racist", "racism", "sexist", "sexism", "homophobic", "bigot", "nazi", "fascist",
            "supremacist", "discrimination", "prejudice",
        ],
    )
});

pub static NSFW: Lazy<Lexicon> = Lazy::new(|| {
    Lexicon::new(
        "nsfw",
        20.0,
        &[
            "nsfw", "explicit", "adult", "xxx", "porn", "sexual", "nude", "naked", "erotic",
            "lewd", "vulgar", "obscene",
        ],
    )
});

pub static POLITICAL: Lazy<Lexicon> = Lazy::new(|| {
    Lexicon::new(
        "political",
        5.0,
        &[
            "politics", "political", "election", "vote", "democrat", "republican", "liberal",
            "conservative", "left", "right", "government", "policy", "congress", "senate",
            "president", "trump", "biden", "republic", "democracy", "authoritarian", "fascism",
            "socialism", "capitalism",
        ],
    )
});
