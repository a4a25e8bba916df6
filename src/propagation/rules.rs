// Declarative table of the double-propagation rules.
use serde::Serialize;

use crate::nlp::{PosClass, RelationSet};

/// Which lexicon a rule reads anchors from or writes targets into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LexiconKind {
    Opinion,
    Feature,
}

impl LexiconKind {
    /// Opinion words are adjectives, features are nouns.
    pub fn pos(self) -> PosClass {
        match self {
            LexiconKind::Opinion => PosClass::Adjective,
            LexiconKind::Feature => PosClass::Noun,
        }
    }
}

/// Where the polarity of new opinion words and annotations comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolaritySource {
    /// Polarity of the anchoring opinion word.
    Anchor,
    /// Rating-derived polarity of the review being scanned.
    Review,
}

/// One growth flag per rule group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GrowthFlag {
    OpinionToFeature,
    OpinionToFeatureChained,
    OpinionConjunction,
    FeatureConjunction,
    FeatureChained,
    FeatureToOpinion,
}

impl GrowthFlag {
    pub const ALL: [GrowthFlag; 6] = [
        GrowthFlag::OpinionToFeature,
        GrowthFlag::OpinionToFeatureChained,
        GrowthFlag::OpinionConjunction,
        GrowthFlag::FeatureConjunction,
        GrowthFlag::FeatureChained,
        GrowthFlag::FeatureToOpinion,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            GrowthFlag::OpinionToFeature => "R1.1",
            GrowthFlag::OpinionToFeatureChained => "R1.2",
            GrowthFlag::OpinionConjunction => "R4.1",
            GrowthFlag::FeatureConjunction => "R3.1",
            GrowthFlag::FeatureChained => "R3.2",
            GrowthFlag::FeatureToOpinion => "R2.x",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub name: &'static str,
    pub source: LexiconKind,
    pub relations: RelationSet,
    pub hops: usize,
    pub destination: LexiconKind,
    pub polarity: PolaritySource,
    pub negation: bool,
    pub annotate: bool,
}

/// Rules sharing one staging batch and one growth flag.
#[derive(Debug, Clone, Copy)]
pub struct RuleGroup {
    pub flag: GrowthFlag,
    pub rules: &'static [Rule],
}

const R1_1: Rule = Rule {
    name: "R1.1",
    source: LexiconKind::Opinion,
    relations: RelationSet::Core,
    hops: 1,
    destination: LexiconKind::Feature,
    polarity: PolaritySource::Anchor,
    negation: true,
    annotate: true,
};

const R1_2: Rule = Rule {
    name: "R1.2",
    hops: 2,
    ..R1_1
};

const R4_1: Rule = Rule {
    name: "R4.1",
    source: LexiconKind::Opinion,
    relations: RelationSet::Coordination,
    hops: 1,
    destination: LexiconKind::Opinion,
    polarity: PolaritySource::Anchor,
    negation: false,
    annotate: false,
};

const R3_1: Rule = Rule {
    name: "R3.1",
    source: LexiconKind::Feature,
    relations: RelationSet::Coordination,
    hops: 1,
    destination: LexiconKind::Feature,
    polarity: PolaritySource::Anchor,
    negation: false,
    annotate: false,
};

const R3_2: Rule = Rule {
    name: "R3.2",
    relations: RelationSet::Core,
    hops: 2,
    ..R3_1
};

const R2_1: Rule = Rule {
    name: "R2.1",
    source: LexiconKind::Feature,
    relations: RelationSet::Extended,
    hops: 1,
    destination: LexiconKind::Opinion,
    polarity: PolaritySource::Review,
    negation: false,
    annotate: true,
};

const R2_2: Rule = Rule {
    name: "R2.2",
    hops: 2,
    ..R2_1
};

/// Groups in execution order.
pub static RULE_GROUPS: [RuleGroup; 6] = [
    RuleGroup {
        flag: GrowthFlag::OpinionToFeature,
        rules: &[R1_1],
    },
    RuleGroup {
        flag: GrowthFlag::OpinionToFeatureChained,
        rules: &[R1_2],
    },
    RuleGroup {
        flag: GrowthFlag::OpinionConjunction,
        rules: &[R4_1],
    },
    RuleGroup {
        flag: GrowthFlag::FeatureConjunction,
        rules: &[R3_1],
    },
    RuleGroup {
        flag: GrowthFlag::FeatureChained,
        rules: &[R3_2],
    },
    RuleGroup {
        flag: GrowthFlag::FeatureToOpinion,
        rules: &[R2_1, R2_2],
    },
];
