//! Rapper pairs and suggestion lines for each battle category

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::Category;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rapper {
    pub name: String,
    pub avatar: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RapperPair {
    pub left: Rapper,
    pub right: Rapper,
}

/// All suggestion lines offered for a category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuggestionPool {
    pub hinglish: Vec<String>,
    pub english: Vec<String>,
}

/// Lines currently shown in the suggestion box, one per flavour
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Suggestions {
    pub hinglish: String,
    pub english: String,
}

impl Suggestions {
    pub fn lines(&self) -> [&str; 2] {
        [&self.hinglish, &self.english]
    }
}

fn rapper(name: &str, avatar: &str) -> Rapper {
    Rapper {
        name: name.to_string(),
        avatar: avatar.to_string(),
    }
}

pub fn rapper_pair(category: Category) -> RapperPair {
    let (left, right) = match category {
        Category::Roast => (rapper("Raftaar", "raftaar.jpg"), rapper("2Pac", "tupac-pfp.jpg")),
        Category::Aggressive => (
            rapper("Eminem", "eminem.jpg"),
            rapper("KR$NA", "krsna-portrait.jpg"),
        ),
        Category::Funny => (rapper("Tyler", "Tyler 🎀.jpg"), rapper("MC Stan", "mc stan.jpg")),
        Category::Freestyle => (
            rapper("Encore ABJ", "Encore ABJ.jpg"),
            rapper("Harry Mack", "Harry.jpg"),
        ),
    };
    RapperPair { left, right }
}

const ROAST_HINGLISH: &[&str] = &[
    "Teri vibe hai thandi jaise purani chai,\nMain hoon spotlight, tu background guy",
    "Bars mere fire, tere jaise jal jaayein,\nRap kare tu, log neend mein chale jaayein",
];
const ROAST_ENGLISH: &[&str] = &[
    "You're all bark, no bite, just noise in the crowd,\nI'm the storm in the booth, thunder spittin' loud",
    "You flex online, but freeze on the mic,\nI drop one bar, and it ends your hype",
];
const AGGRESSIVE_HINGLISH: &[&str] = &[
    "Main hoon jung ka sher, tu gali ka chuha,\nTere jaise sau aaye, maine sabko dhooya",
    "Tere bars hai fake, jaise insta ka fame,\nMain likhu toh lage jaise jal gaya game",
];
const AGGRESSIVE_ENGLISH: &[&str] = &[
    "I don't play safe, I aim for the head,\nOne bar from me, and your whole crew's dead",
    "Step in my zone, get torn like a page,\nI spit like a beast that just broke out the cage",
];
const FUNNY_HINGLISH: &[&str] = &[
    "Tere jokes pe hansi sirf mummy ko aayi,\nBaaki sab ne bola, \"beta chhup ho ja bhai!\"",
    "Swag dikhaye tu, par chappal hai hawai,\nTinder pe likha \"model,\" par photo mein bhai",
];
const FUNNY_ENGLISH: &[&str] = &[
    "You call yourself a king, but can't find your crown,\nEven autocorrect turns your bars down",
    "You post gym pics like you lift a ton,\nBut dropped your phone and called it a 'leg day run'",
];
const FREESTYLE_HINGLISH: &[&str] = &[
    "Mic haath mein, beat chalu, mood hai high,\nSoch meri sky pe, main udta jaaun bhai",
    "Flow mera smooth, jaise butter on toast,\nTere bars ka taste, jaise kadvi chai ka dose",
];
const FREESTYLE_ENGLISH: &[&str] = &[
    "Words in my mind, let the rhythm decide,\nI ride every beat like a wave I can't hide",
    "No script, no pen, just vibes and flow,\nI speak from the soul, let the real ones know",
];

fn lines_for(category: Category) -> (&'static [&'static str], &'static [&'static str]) {
    match category {
        Category::Roast => (ROAST_HINGLISH, ROAST_ENGLISH),
        Category::Aggressive => (AGGRESSIVE_HINGLISH, AGGRESSIVE_ENGLISH),
        Category::Funny => (FUNNY_HINGLISH, FUNNY_ENGLISH),
        Category::Freestyle => (FREESTYLE_HINGLISH, FREESTYLE_ENGLISH),
    }
}

pub fn suggestion_pool(category: Category) -> SuggestionPool {
    let (hinglish, english) = lines_for(category);
    SuggestionPool {
        hinglish: hinglish.iter().map(|s| s.to_string()).collect(),
        english: english.iter().map(|s| s.to_string()).collect(),
    }
}

/// Draw one line of each flavour at random
pub fn draw_suggestions<R: Rng + ?Sized>(category: Category, rng: &mut R) -> Suggestions {
    let (hinglish, english) = lines_for(category);
    // Pools are static and never empty
    Suggestions {
        hinglish: hinglish.choose(rng).copied().unwrap_or_default().to_string(),
        english: english.choose(rng).copied().unwrap_or_default().to_string(),
    }
}
