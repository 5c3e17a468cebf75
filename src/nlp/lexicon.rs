// Topic lexicons: the positive/negative keyword sets scored per topic, plus
// the negation words that flip a keyword's context.
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    #[default]
    HousingCrisis,
    TenantRights,
    LandlordTenantRelations,
}

impl Topic {
    pub const ALL: [Topic; 3] = [
        Topic::HousingCrisis,
        Topic::TenantRights,
        Topic::LandlordTenantRelations,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Topic::HousingCrisis => "housing_crisis",
            Topic::TenantRights => "tenant_rights",
            Topic::LandlordTenantRelations => "landlord_tenant_relations",
        }
    }

    /// Resolves a topic name, falling back to the default topic for
    /// anything unrecognized. Never fails.
    pub fn from_name(name: &str) -> Topic {
        let wanted = name.trim().to_lowercase();
        match Topic::ALL.iter().find(|t| t.name() == wanted) {
            Some(topic) => *topic,
            None => {
                tracing::debug!(topic = %name, fallback = Topic::default().name(), "unknown topic, using default lexicon");
                Topic::default()
            }
        }
    }

    pub fn lexicon(&self) -> &'static Lexicon {
        &LEXICONS[*self as usize]
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug)]
pub struct Lexicon {
    positive: HashSet<&'static str>,
    negative: HashSet<&'static str>,
}

impl Lexicon {
    fn new(positive: &[&'static str], negative: &[&'static str]) -> Self {
        Lexicon {
            positive: positive.iter().copied().collect(),
            negative: negative.iter().copied().collect(),
        }
    }

    pub fn is_positive(&self, word: &str) -> bool {
        self.positive.contains(word)
    }

    pub fn is_negative(&self, word: &str) -> bool {
        self.negative.contains(word)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.is_positive(word) || self.is_negative(word)
    }

    pub fn positive(&self) -> &HashSet<&'static str> {
        &self.positive
    }

    pub fn negative(&self) -> &HashSet<&'static str> {
        &self.negative
    }
}

pub fn is_negation(word: &str) -> bool {
    NEGATIONS.contains(word)
}

static NEGATIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "not", "no", "never", "none", "nothing", "nowhere", "nobody", "neither", "nor",
        "without", "lack", "lacking", "unable", "cannot", "can't", "won't", "don't",
        "doesn't", "didn't", "isn't", "aren't", "wasn't", "weren't", "haven't", "hasn't",
        "hadn't",
    ]
    .iter()
    .copied()
    .collect()
});

// Emotion words shared by every topic's negative list
const SHARED_NEGATIVE_EMOTIONS: &[&str] = &[
    "anger", "angry", "furious", "rage", "outraged", "frustrated", "frustration",
    "sad", "sadness", "depressed", "depression", "hopeless", "despair", "grief",
    "pain", "suffering", "trauma", "traumatic", "devastating", "heartbreaking",
    "terrible", "awful", "horrible", "disgusting", "appalling", "shocking",
    "hate", "hated", "hateful", "disgusted", "disappointed", "disappointment",
    "fear", "afraid", "worried", "anxious", "terrified", "scared", "panic",
    "stress", "stressed", "overwhelmed", "exhausted", "burned_out",
];

// Conduct vocabulary shared by the two tenancy topics
const CONDUCT_NEGATIVE: &[&str] = &[
    "violation", "violated", "abuse", "abused", "exploitation", "exploited", "oppression",
    "oppressed", "discrimination", "discriminatory", "unfair", "unjust", "injustice",
    "illegal", "unlawful", "wrongful", "harassment", "harassed", "intimidation",
    "intimidated", "threat", "threatened", "retaliation", "retaliatory",
    "punishment", "punitive", "harsh", "cruel", "inhumane", "unethical", "immoral",
    "corrupt", "fraud", "fraudulent", "deception", "deceptive", "misleading",
    "false", "lies", "lying", "dishonest", "untrustworthy", "unreliable", "neglect",
    "neglected", "abandoned", "ignored", "dismissed", "disregarded", "disrespect",
    "disrespectful", "rude", "hostile", "aggressive", "confrontational", "argumentative",
    "unreasonable", "inflexible", "rigid", "stubborn", "uncooperative", "unresponsive",
    "incompetent", "inept", "unprofessional", "inappropriate", "unacceptable",
    "outrage", "outrageous", "scandal", "scandalous", "disgrace", "disgraceful",
];

// Indexed by `Topic` discriminant
static LEXICONS: Lazy<[Lexicon; 3]> = Lazy::new(|| {
    let housing_negative: Vec<&'static str> = [
        "homeless", "homelessness", "eviction", "evicted", "displacement", "crisis",
        "emergency", "urgent", "desperate", "desperation", "struggle", "struggling",
        "poverty", "poor", "destitute", "vulnerable", "at_risk", "unstable", "precarious",
        "insecure", "unsafe", "dangerous", "unsanitary", "overcrowded", "squalid",
        "deplorable", "inhumane", "unacceptable", "outrage", "outrageous", "scandal",
        "injustice", "unfair", "discrimination", "exploitation", "abuse", "neglect",
        "abandoned", "forgotten", "ignored", "neglected", "failed", "failure", "broken",
    ]
    .iter()
    .chain(SHARED_NEGATIVE_EMOTIONS)
    .copied()
    .collect();
    let housing = Lexicon::new(
        &[
            "affordable", "affordable_housing", "stable", "security", "home", "homeownership",
            "community", "neighborhood", "safe", "comfortable", "decent", "quality", "dignity",
            "support", "help", "assistance", "program", "initiative", "solution", "progress",
            "improvement", "reform", "policy", "investment", "funding", "subsidy", "voucher",
            "success", "achievement", "victory", "win", "breakthrough", "hope", "hopeful",
            "optimistic", "positive", "good", "great", "excellent", "amazing", "wonderful",
            "fantastic", "love", "loved", "happy", "happiness", "grateful", "gratitude",
            "relief", "joy", "joyful", "celebration", "proud", "pride", "accomplishment",
        ],
        &housing_negative,
    );

    let tenant_negative: Vec<&'static str> = CONDUCT_NEGATIVE
        .iter()
        .chain(["revenge"].iter())
        .chain(SHARED_NEGATIVE_EMOTIONS)
        .copied()
        .collect();
    let tenant = Lexicon::new(
        &[
            "rights", "protection", "legal", "law", "legislation", "regulation", "enforcement",
            "fair", "just", "justice", "equity", "equality", "dignity", "respect", "respectful",
            "professional", "responsive", "communication", "transparency", "honest", "honesty",
            "integrity", "ethical", "moral", "principled", "reasonable", "flexible",
            "understanding", "compassionate", "empathetic", "caring", "supportive", "helpful",
            "cooperative", "collaborative", "partnership", "mutual", "beneficial", "win_win",
            "solution", "resolution", "agreement", "compromise", "negotiation", "mediation",
            "arbitration", "success", "successful", "achievement", "victory", "win", "progress",
            "improvement", "reform", "change", "positive", "good", "great", "excellent",
            "satisfied", "content", "happy", "pleased", "grateful", "thankful", "appreciative",
        ],
        &tenant_negative,
    );

    let landlord_negative: Vec<&'static str> = CONDUCT_NEGATIVE
        .iter()
        .chain(["abandonment"].iter())
        .chain(SHARED_NEGATIVE_EMOTIONS)
        .copied()
        .collect();
    let landlord = Lexicon::new(
        &[
            "professional", "responsive", "communication", "transparent", "honest", "integrity",
            "ethical", "moral", "principled", "reasonable", "flexible", "understanding",
            "compassionate", "empathetic", "caring", "supportive", "helpful", "cooperative",
            "collaborative", "partnership", "mutual", "respect", "respectful", "dignity",
            "fair", "just", "justice", "equity", "equality", "rights", "protection",
            "maintenance", "repair", "fixed", "improved", "upgraded", "modern", "clean",
            "safe", "secure", "stable", "reliable", "trustworthy", "dependable", "consistent",
            "timely", "prompt", "efficient", "effective", "successful", "satisfied",
            "content", "happy", "pleased", "grateful", "thankful", "appreciative",
            "positive", "good", "great", "excellent", "amazing", "wonderful", "fantastic",
        ],
        &landlord_negative,
    );

    [housing, tenant, landlord]
});
