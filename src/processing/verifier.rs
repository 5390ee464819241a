//! Verification that tailoring changed enough of the rewritable content

use crate::config::TailoringConfig;
use crate::processing::sections::{ResumeSections, SectionEntry};

/// Compares a tailored resume against the original and decides whether the
/// pass changed enough of it to count as tailored at all.
///
/// Experience, projects and skills are compared entry by entry. Skill
/// infusion grows the skills list, which registers as a length mismatch.
pub struct ModificationVerifier {
    min_change_ratio: f64,
}

impl ModificationVerifier {
    pub fn new(config: &TailoringConfig) -> Self {
        Self {
            min_change_ratio: config.min_change_ratio,
        }
    }

    /// Fraction of compared entries that differ from their originals.
    ///
    /// A section length mismatch means entries were added or dropped,
    /// which counts as fully modified. So does having nothing to compare:
    /// with no entries anywhere there is nothing to hold against the
    /// tailored copy.
    pub fn change_ratio(&self, original: &ResumeSections, tailored: &ResumeSections) -> f64 {
        if original.experience.len() != tailored.experience.len()
            || original.projects.len() != tailored.projects.len()
            || original.skills.len() != tailored.skills.len()
        {
            return 1.0;
        }

        let (changed, total) = count_changes(original, tailored);
        if total == 0 {
            return 1.0;
        }
        changed as f64 / total as f64
    }

    pub fn is_sufficiently_modified(
        &self,
        original: &ResumeSections,
        tailored: &ResumeSections,
    ) -> bool {
        self.change_ratio(original, tailored) >= self.min_change_ratio
    }
}

fn count_changes(original: &ResumeSections, tailored: &ResumeSections) -> (usize, usize) {
    let mut changed = 0;
    let mut total = 0;

    let entry_pairs = original
        .experience
        .iter()
        .zip(tailored.experience.iter())
        .chain(original.projects.iter().zip(tailored.projects.iter()));
    for (before, after) in entry_pairs {
        total += 1;
        if before != after {
            changed += 1;
        }
    }

    for (before, after) in original.skills.iter().zip(tailored.skills.iter()) {
        total += 1;
        if before != after {
            changed += 1;
        }
    }

    (changed, total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verifier() -> ModificationVerifier {
        ModificationVerifier::new(&TailoringConfig::default())
    }

    fn resume_with_experience(entries: &[&str]) -> ResumeSections {
        ResumeSections {
            experience: entries
                .iter()
                .map(|raw| SectionEntry::flat(*raw))
                .collect(),
            ..ResumeSections::default()
        }
    }

    #[test]
    fn test_half_changed_passes_default_threshold() {
        let original = resume_with_experience(&["A: built reports", "B: ran dashboards"]);
        let tailored = resume_with_experience(&["A: delivered SQL reporting", "B: ran dashboards"]);

        assert!(verifier().is_sufficiently_modified(&original, &tailored));
        assert_eq!(verifier().change_ratio(&original, &tailored), 0.5);
    }

    #[test]
    fn test_unchanged_resume_fails() {
        let original = resume_with_experience(&["A: built reports", "B: ran dashboards"]);
        let tailored = original.clone();

        assert!(!verifier().is_sufficiently_modified(&original, &tailored));
        assert_eq!(verifier().change_ratio(&original, &tailored), 0.0);
    }

    #[test]
    fn test_length_mismatch_counts_as_modified() {
        let original = resume_with_experience(&["A: built reports", "B: ran dashboards"]);
        let tailored = resume_with_experience(&["A: built reports"]);

        assert!(verifier().is_sufficiently_modified(&original, &tailored));
        assert_eq!(verifier().change_ratio(&original, &tailored), 1.0);
    }

    #[test]
    fn test_nothing_to_compare_counts_as_modified() {
        let original = ResumeSections::default();
        let tailored = ResumeSections::default();

        assert!(verifier().is_sufficiently_modified(&original, &tailored));
    }

    #[test]
    fn test_ratio_exactly_at_threshold_passes() {
        let original = resume_with_experience(&[
            "A: one",
            "B: two",
            "C: three",
            "D: four",
            "E: five",
        ]);
        let mut tailored = original.clone();
        tailored.experience[0] = SectionEntry::flat("A: rewritten entirely");
        tailored.experience[1] = SectionEntry::flat("B: also rewritten");

        // 2 of 5 is exactly the default 0.4 threshold.
        assert!(verifier().is_sufficiently_modified(&original, &tailored));
    }

    #[test]
    fn test_skill_growth_is_a_length_mismatch() {
        let original = resume_with_experience(&["A: built reports"]);
        let mut tailored = original.clone();
        tailored.skills.push("Python".to_string());

        assert!(verifier().is_sufficiently_modified(&original, &tailored));
        assert_eq!(verifier().change_ratio(&original, &tailored), 1.0);
    }

    #[test]
    fn test_skill_entries_count_toward_the_ratio() {
        let mut original = resume_with_experience(&["A: built reports", "B: ran dashboards"]);
        original.skills.push("SQL".to_string());
        let mut tailored = original.clone();
        tailored.skills[0] = "Python".to_string();

        // 1 changed of 3 compared is below the 0.4 default.
        assert!(!verifier().is_sufficiently_modified(&original, &tailored));
        let ratio = verifier().change_ratio(&original, &tailored);
        assert!((ratio - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_project_changes_count() {
        let mut original = ResumeSections::default();
        original.projects = vec![
            SectionEntry::flat("Churn Model: logistic regression"),
            SectionEntry::flat("ETL Jobs: nightly loads"),
        ];
        let mut tailored = original.clone();
        tailored.projects[0] = SectionEntry::flat("Churn Model: gradient boosted churn scoring");

        assert!(verifier().is_sufficiently_modified(&original, &tailored));
    }
}
