// Per-review (phrase, polarity) annotations.
use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Annotation {
    pub review: usize,
    pub phrase: String,
    pub polarity: i32,
}

impl Annotation {
    pub fn new(review: usize, phrase: impl Into<String>, polarity: i32) -> Self {
        Annotation {
            review,
            phrase: phrase.into(),
            polarity,
        }
    }
}

/// Serialized as `review@phrase@polarity`.
impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}@{}", self.review, self.phrase, self.polarity)
    }
}

/// Set of annotations that remembers first-insertion order.
#[derive(Debug, Clone, Default)]
pub struct AnnotationSet {
    ordered: Vec<Annotation>,
    seen: HashSet<Annotation>,
}

impl AnnotationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when an identical annotation is already present.
    pub fn insert(&mut self, annotation: Annotation) -> bool {
        if self.seen.contains(&annotation) {
            return false;
        }
        self.seen.insert(annotation.clone());
        self.ordered.push(annotation);
        true
    }

    pub fn contains(&self, annotation: &Annotation) -> bool {
        self.seen.contains(annotation)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.ordered.iter()
    }

    /// Keeps annotations whose phrase is a case-insensitive substring of at
    /// least one of `features`.
    pub fn retain_within(&self, features: &[String]) -> AnnotationSet {
        let lowered: Vec<String> = features.iter().map(|f| f.to_lowercase()).collect();
        let mut kept = AnnotationSet::new();
        for annotation in &self.ordered {
            let phrase = annotation.phrase.to_lowercase();
            if lowered.iter().any(|f| f.contains(&phrase)) {
                kept.insert(annotation.clone());
            }
        }
        kept
    }
}
