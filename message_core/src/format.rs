//! Line Formatter - one display line per surviving group.

use crate::grouping::Group;

/// Renders groups using the "first K actors, then N others" convention.
#[derive(Debug, Clone, Copy)]
pub struct LineFormatter {
    list_limit: usize,
}

impl Default for LineFormatter {
    fn default() -> Self {
        Self { list_limit: 3 }
    }
}

impl LineFormatter {
    /// Create a formatter listing at most `list_limit` names (minimum 1).
    pub fn new(list_limit: usize) -> Self {
        Self {
            list_limit: list_limit.max(1),
        }
    }

    /// Render one group as a single line.
    pub fn format(&self, group: &Group) -> String {
        let subject = self.subject(&group.actor_names, group.member_count);
        let predicate = group.representative.for_count(group.member_count);
        format!("{} {}", subject, predicate)
    }

    /// Render every group, keeping their order.
    pub fn format_all<'g>(&self, groups: impl IntoIterator<Item = &'g Group>) -> Vec<String> {
        groups.into_iter().map(|g| self.format(g)).collect()
    }

    /// Build the subject phrase for a list of names.
    pub fn subject(&self, names: &[String], member_count: usize) -> String {
        let mut parts: Vec<String> = names.iter().take(self.list_limit).cloned().collect();
        let others = member_count.saturating_sub(parts.len());

        match others {
            0 => {}
            1 => parts.push("1 other".to_string()),
            n => parts.push(format!("{} others", n)),
        }

        match parts.as_slice() {
            [] => String::new(),
            [only] => only.clone(),
            [first, second] => format!("{} and {}", first, second),
            [init @ .., last] => format!("{}, and {}", init.join(", "), last),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::GroupKey;
    use message_rules::{Category, Description};

    fn group(names: &[&str], description: Description) -> Group {
        Group {
            key: GroupKey {
                category: Category::NpcTalk,
                action_key: "sing".to_string(),
                has_effect: false,
            },
            chosen_effect_key: None,
            actor_names: names.iter().map(|n| n.to_string()).collect(),
            representative: description,
            member_count: names.len(),
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_subject_lists() {
        let formatter = LineFormatter::default();
        assert_eq!(formatter.subject(&names(&["Jack"]), 1), "Jack");
        assert_eq!(formatter.subject(&names(&["Jack", "Bubbles"]), 2), "Jack and Bubbles");
        assert_eq!(
            formatter.subject(&names(&["Jack", "Bubbles", "Gus-Gus"]), 3),
            "Jack, Bubbles, and Gus-Gus"
        );
        assert_eq!(
            formatter.subject(&names(&["A", "B", "C", "D", "E"]), 5),
            "A, B, C, and 2 others"
        );
        assert_eq!(
            formatter.subject(&names(&["A", "B", "C", "D"]), 4),
            "A, B, C, and 1 other"
        );
    }

    #[test]
    fn test_custom_limit() {
        let formatter = LineFormatter::new(1);
        assert_eq!(formatter.subject(&names(&["A", "B", "C"]), 3), "A and 2 others");
    }

    #[test]
    fn test_singular_and_plural_agreement() {
        let formatter = LineFormatter::default();
        let desc = Description::new("waters the tomatoes.").with_plural("water the tomatoes.");

        assert_eq!(
            formatter.format(&group(&["Jack"], desc.clone())),
            "Jack waters the tomatoes."
        );
        assert_eq!(
            formatter.format(&group(&["Jack", "Bubbles"], desc)),
            "Jack and Bubbles water the tomatoes."
        );
    }

    #[test]
    fn test_singing_trio() {
        let desc = Description::new("starts singing 'I Will Survive' at the top of their lungs.")
            .with_plural("start singing 'I Will Survive' at the top of their lungs.");
        let line = LineFormatter::default().format(&group(&["Bubbles", "Gus-Gus", "Beep-Beep"], desc));

        assert_eq!(
            line,
            "Bubbles, Gus-Gus, and Beep-Beep start singing 'I Will Survive' at the top of their lungs."
        );
    }
}
