//! Static word lists: CS and math dictionaries, per-domain keywords, stop words.
//!
//! Built once on first use and shared read-only through
//! [`Dictionaries::standard`].

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Academic domain a course maps to for the keyword scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Domain {
    ComputerScience,
    Mathematics,
    Physics,
    Chemistry,
    Biology,
}

impl Domain {
    pub fn all() -> &'static [Domain] {
        &[
            Self::ComputerScience,
            Self::Mathematics,
            Self::Physics,
            Self::Chemistry,
            Self::Biology,
        ]
    }

    /// Words in a course name that indicate this domain.
    fn indicators(self) -> &'static [&'static str] {
        match self {
            Self::ComputerScience => &["computer", "programming", "software", "computing", "algorithm"],
            Self::Mathematics => &["math", "calculus", "algebra", "statistics", "geometry"],
            Self::Physics => &["physics", "mechanics", "quantum", "astronomy"],
            Self::Chemistry => &["chemistry", "chemical", "biochem"],
            Self::Biology => &["biology", "genetics", "anatomy", "ecology", "life science"],
        }
    }

    /// Map a course label to at most one domain, first match in [`Domain::all`] order.
    pub fn from_course(course: &str) -> Option<Domain> {
        let course = course.to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|d| d.indicators().iter().any(|w| course.contains(w)))
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ComputerScience => "Computer Science",
            Self::Mathematics => "Mathematics",
            Self::Physics => "Physics",
            Self::Chemistry => "Chemistry",
            Self::Biology => "Biology",
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

const CS_TERMS: &[&str] = &[
    "algorithm", "algorithms", "array", "binary", "bit", "boolean", "bytecode", "cache",
    "class", "compiler", "complexity", "concurrency", "database", "debugging", "encapsulation",
    "encryption", "function", "graph", "hash", "hashing", "heap", "inheritance", "interface",
    "interpreter", "iteration", "kernel", "linked", "loop", "memory", "method", "mutex",
    "network", "object", "pointer", "polymorphism", "process", "protocol", "queue",
    "recursion", "recursive", "runtime", "scheduler", "sorting", "stack", "string", "syntax",
    "thread", "tree", "variable", "compilation", "abstraction", "programming", "bytes",
    "quicksort", "mergesort", "api", "sql", "deadlock", "semaphore", "traversal",
];

const MATH_TERMS: &[&str] = &[
    "algebra", "asymptote", "calculus", "coefficient", "combinatorics", "convergence",
    "derivative", "determinant", "differential", "eigenvalue", "eigenvector", "equation",
    "exponent", "factorial", "geometry", "gradient", "integral", "integration", "limit",
    "logarithm", "matrix", "polynomial", "prime", "probability", "proof", "ratio",
    "sequence", "series", "statistics", "theorem", "topology", "trigonometry", "vector",
    "variance", "lemma", "axiom", "permutation", "quadratic", "tangent", "infinity",
];

const COMPUTER_SCIENCE_KEYWORDS: &[&str] = &[
    "algorithm", "data structure", "recursion", "big o", "time complexity", "sorting",
    "binary search", "linked list", "hash table", "object oriented", "machine learning",
    "operating system", "dynamic programming", "graph traversal", "compiler", "database",
];

const MATHEMATICS_KEYWORDS: &[&str] = &[
    "derivative", "integral", "theorem", "proof", "matrix", "linear algebra", "probability",
    "limit", "polynomial", "differential equation", "eigenvalue", "vector space",
    "calculus", "statistics",
];

const PHYSICS_KEYWORDS: &[&str] = &[
    "velocity", "acceleration", "momentum", "energy", "force", "gravity", "quantum",
    "thermodynamics", "electromagnetism", "relativity", "wave", "friction", "newton",
];

const CHEMISTRY_KEYWORDS: &[&str] = &[
    "molecule", "atom", "reaction", "bond", "periodic table", "acid", "base", "catalyst",
    "oxidation", "electron", "compound", "stoichiometry", "equilibrium",
];

const BIOLOGY_KEYWORDS: &[&str] = &[
    "cell", "dna", "protein", "evolution", "gene", "organism", "photosynthesis", "enzyme",
    "mitosis", "ecosystem", "metabolism", "chromosome", "natural selection",
];

const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had", "her",
    "was", "one", "our", "out", "has", "him", "his", "how", "its", "may", "new", "now",
    "old", "see", "two", "way", "who", "did", "get", "let", "put", "say", "she", "too",
    "use", "big", "yes", "why", "what", "when", "where", "which", "while", "with", "this",
    "that", "these", "those", "there", "their", "they", "them", "then", "than", "from",
    "have", "been", "were", "will", "would", "could", "should", "about", "into", "your",
    "just", "also", "some", "such", "only", "other", "does", "like", "here", "very",
    "more", "most", "much", "many", "each", "every", "both", "being", "because", "after",
    "before", "again", "over", "under", "same", "well", "even", "still", "know", "think",
    "need", "want", "really", "thanks", "thank", "please", "help", "anyone", "someone",
    "something", "question", "answer", "hello", "hi", "hey", "okay", "sure", "maybe",
    "make", "made", "take", "good", "great", "first", "last", "next", "today", "however",
    "though", "although", "since", "until", "without", "within", "between", "through",
];

/// Read-only dictionary bundle handed to the extractors by reference.
#[derive(Debug)]
pub struct Dictionaries {
    cs_terms: HashSet<&'static str>,
    math_terms: HashSet<&'static str>,
    stop_words: HashSet<&'static str>,
}

static STANDARD: Lazy<Dictionaries> = Lazy::new(|| Dictionaries {
    cs_terms: CS_TERMS.iter().copied().collect(),
    math_terms: MATH_TERMS.iter().copied().collect(),
    stop_words: STOP_WORDS.iter().copied().collect(),
});

impl Dictionaries {
    /// The process-wide dictionary set.
    pub fn standard() -> &'static Dictionaries {
        &STANDARD
    }

    /// `word` must already be lower-cased.
    pub fn is_cs_term(&self, word: &str) -> bool {
        self.cs_terms.contains(word)
    }

    /// `word` must already be lower-cased.
    pub fn is_math_term(&self, word: &str) -> bool {
        self.math_terms.contains(word)
    }

    /// Case-insensitive stop-word check.
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word.to_lowercase().as_str())
    }

    pub fn domain_keywords(&self, domain: Domain) -> &'static [&'static str] {
        match domain {
            Domain::ComputerScience => COMPUTER_SCIENCE_KEYWORDS,
            Domain::Mathematics => MATHEMATICS_KEYWORDS,
            Domain::Physics => PHYSICS_KEYWORDS,
            Domain::Chemistry => CHEMISTRY_KEYWORDS,
            Domain::Biology => BIOLOGY_KEYWORDS,
        }
    }
}
