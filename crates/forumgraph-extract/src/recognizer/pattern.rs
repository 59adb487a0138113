//! Dictionary and shape-rule recognizer with a per-domain keyword scan.

use regex::Regex;

use forumgraph_core::{EntityCandidate, EntityType, Error, Result};

use super::EntityRecognizer;
use crate::text::{clean_token, split_sentences, starts_uppercase};
use crate::{Dictionaries, Domain};

const ORG_SUFFIXES: &[&str] = &["Corp", "Inc", "Ltd", "University", "College", "Institute", "Company"];

/// Primary recognizer.
///
/// Each surviving token gets the first matching classification:
/// CS dictionary, math dictionary, proper name, organization, technical term.
/// Dictionary hits win over the capitalization rules so a sentence-initial
/// "Algorithm" stays a CS concept rather than a person.
pub struct PatternRecognizer {
    dicts: &'static Dictionaries,
    person: Regex,
    mixed_case: Regex,
    all_caps: Regex,
    hyphenated: Regex,
    academic_suffix: Regex,
}

impl PatternRecognizer {
    pub fn new(dicts: &'static Dictionaries) -> Result<Self> {
        let compile = |p: &str| Regex::new(p).map_err(|e| Error::Extraction(e.to_string()));
        Ok(Self {
            dicts,
            person: compile(r"^[A-Z][a-z]+$")?,
            mixed_case: compile(r"^[A-Za-z0-9]*[a-z][A-Z][A-Za-z0-9]*$")?,
            all_caps: compile(r"^[A-Z][A-Z0-9]+$")?,
            hyphenated: compile(r"^[a-z0-9]+(?:-[a-z0-9]+)+$")?,
            academic_suffix: compile(r"(?:tion|sion|ology|ization|isation|ism|ics)$")?,
        })
    }

    fn classify(&self, token: &str, course_lower: &str) -> Option<EntityCandidate> {
        let lower = token.to_lowercase();
        let len = token.chars().count();

        if self.dicts.is_cs_term(&lower) {
            return Some(EntityCandidate::new(lower, EntityType::CsConcept, 0.8, "Computer science concept"));
        }
        if self.dicts.is_math_term(&lower) {
            return Some(EntityCandidate::new(lower, EntityType::MathConcept, 0.8, "Mathematics concept"));
        }
        if (3..=15).contains(&len) && self.person.is_match(token) {
            return Some(EntityCandidate::new(token, EntityType::Person, 0.7, "Person mentioned in discussion"));
        }
        if len >= 4 && starts_uppercase(token) && ORG_SUFFIXES.iter().any(|s| token.ends_with(s)) {
            return Some(EntityCandidate::new(
                token,
                EntityType::Organization,
                0.6,
                "Organization mentioned in discussion",
            ));
        }
        if len > 4 {
            return self.technical_term(token, &lower, len, course_lower);
        }
        None
    }

    fn technical_term(
        &self,
        token: &str,
        lower: &str,
        len: usize,
        course_lower: &str,
    ) -> Option<EntityCandidate> {
        let mixed = self.mixed_case.is_match(token);
        if !(mixed || self.all_caps.is_match(token) || self.hyphenated.is_match(token)) {
            return None;
        }
        let academic = self.academic_suffix.is_match(lower);

        let entity_type = if course_lower.contains("computer") || course_lower.contains("programming") {
            EntityType::CsConcept
        } else if ["math", "calculus", "algebra"].iter().any(|w| course_lower.contains(w)) {
            EntityType::MathConcept
        } else if academic {
            EntityType::Concept
        } else {
            EntityType::Term
        };

        let mut confidence: f64 = 0.5;
        if len > 6 {
            confidence += 0.1;
        }
        if mixed {
            confidence += 0.2;
        }
        if academic {
            confidence += 0.2;
        }

        Some(EntityCandidate::new(
            token,
            entity_type,
            confidence.min(0.9),
            "Technical term from discussion",
        ))
    }

    /// Substring scan of the whole text against the course domain's keywords.
    fn domain_concepts(&self, text_lower: &str, course: &str) -> Vec<EntityCandidate> {
        let Some(domain) = Domain::from_course(course) else {
            return Vec::new();
        };
        self.dicts
            .domain_keywords(domain)
            .iter()
            .filter(|kw| text_lower.contains(**kw))
            .map(|kw| {
                EntityCandidate::new(*kw, EntityType::Concept, 0.8, format!("{} domain concept", domain))
            })
            .collect()
    }
}

impl EntityRecognizer for PatternRecognizer {
    fn name(&self) -> &'static str {
        "pattern"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn extract(&self, text: &str, course: &str) -> Result<Vec<EntityCandidate>> {
        let course_lower = course.to_lowercase();
        let mut out = Vec::new();

        for sentence in split_sentences(text) {
            for raw in sentence.split_whitespace() {
                let token = clean_token(raw);
                if token.chars().count() < 3 || self.dicts.is_stop_word(&token) {
                    continue;
                }
                if let Some(candidate) = self.classify(&token, &course_lower) {
                    out.push(candidate);
                }
            }
        }

        out.extend(self.domain_concepts(&text.to_lowercase(), course));
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recognizer() -> PatternRecognizer {
        PatternRecognizer::new(Dictionaries::standard()).unwrap()
    }

    fn find<'a>(out: &'a [EntityCandidate], name: &str) -> Option<&'a EntityCandidate> {
        out.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    #[test]
    fn test_dictionary_hit_beats_capitalization() {
        let out = recognizer().extract("Algorithm design.", "").unwrap();
        let algo = find(&out, "algorithm").unwrap();
        assert_eq!(algo.entity_type, EntityType::CsConcept);
        assert_eq!(algo.confidence, 0.8);
        assert_eq!(algo.name, "algorithm");
    }

    #[test]
    fn test_person_and_organization() {
        let out = recognizer().extract("Turing worked with MegaCorp", "").unwrap();
        assert_eq!(find(&out, "Turing").unwrap().entity_type, EntityType::Person);
        let org = find(&out, "MegaCorp").unwrap();
        assert_eq!(org.entity_type, EntityType::Organization);
        assert_eq!(org.confidence, 0.6);
    }

    #[test]
    fn test_math_dictionary() {
        let out = recognizer().extract("the eigenvalue of this matrix", "").unwrap();
        assert_eq!(find(&out, "eigenvalue").unwrap().entity_type, EntityType::MathConcept);
        assert_eq!(find(&out, "matrix").unwrap().entity_type, EntityType::MathConcept);
    }

    #[test]
    fn test_technical_term_course_heuristic() {
        let r = recognizer();
        let cs = r.extract("we used JavaScript", "Programming Basics").unwrap();
        let js = find(&cs, "JavaScript").unwrap();
        assert_eq!(js.entity_type, EntityType::CsConcept);
        // 0.5 + 0.1 (len > 6) + 0.2 (mixed case)
        assert!((js.confidence - 0.8).abs() < 1e-9);

        let other = r.extract("we used JavaScript", "History").unwrap();
        assert_eq!(find(&other, "JavaScript").unwrap().entity_type, EntityType::Term);
    }

    #[test]
    fn test_academic_suffix_concept_capped() {
        let out = recognizer().extract("self-organization emerges", "Sociology").unwrap();
        let c = find(&out, "self-organization").unwrap();
        assert_eq!(c.entity_type, EntityType::Concept);
        // 0.5 + 0.1 + 0.2 (suffix) = 0.8
        assert!((c.confidence - 0.8).abs() < 1e-9);

        let capped = recognizer().extract("the neuroSocialization effect", "Sociology").unwrap();
        let c = find(&capped, "neuroSocialization").unwrap();
        assert!((c.confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_all_caps_acronym() {
        let out = recognizer().extract("configure the HTTPS proxy", "").unwrap();
        let c = find(&out, "HTTPS").unwrap();
        assert_eq!(c.entity_type, EntityType::Term);
        assert_eq!(c.confidence, 0.5);
    }

    #[test]
    fn test_short_and_stop_tokens_dropped() {
        let out = recognizer().extract("Big O is fun", "").unwrap();
        assert!(find(&out, "Big").is_none());
        assert!(find(&out, "O").is_none());
        assert!(out.is_empty());
    }

    #[test]
    fn test_domain_scan_by_course() {
        let text = "We studied dynamic programming and a linked list.";
        let cs = recognizer().extract(text, "Computer Science").unwrap();
        let dp = find(&cs, "dynamic programming").unwrap();
        assert_eq!(dp.entity_type, EntityType::Concept);
        assert_eq!(dp.confidence, 0.8);
        assert!(find(&cs, "linked list").is_some());

        let none = recognizer().extract(text, "Art History").unwrap();
        assert!(find(&none, "dynamic programming").is_none());
    }
}
