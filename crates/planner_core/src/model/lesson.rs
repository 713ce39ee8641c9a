//! Lesson catalogue.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// School subject assigned to a week slot or homework item.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Lesson {
    /// Empty slot marker, shown as `+`.
    #[default]
    None,
    Math,
    German,
    English,
    French,
    Latin,
    Biology,
    Chemistry,
    Physics,
    History,
    Geography,
    Politics,
    Religion,
    Ethics,
    Art,
    Music,
    Sports,
    ComputerScience,
}

impl Lesson {
    /// Every lesson in catalogue order, placeholder first.
    pub const ALL: [Lesson; 18] = [
        Lesson::None,
        Lesson::Math,
        Lesson::German,
        Lesson::English,
        Lesson::French,
        Lesson::Latin,
        Lesson::Biology,
        Lesson::Chemistry,
        Lesson::Physics,
        Lesson::History,
        Lesson::Geography,
        Lesson::Politics,
        Lesson::Religion,
        Lesson::Ethics,
        Lesson::Art,
        Lesson::Music,
        Lesson::Sports,
        Lesson::ComputerScience,
    ];

    /// Label shown to users.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::None => "+",
            Self::Math => "Math",
            Self::German => "German",
            Self::English => "English",
            Self::French => "French",
            Self::Latin => "Latin",
            Self::Biology => "Biology",
            Self::Chemistry => "Chemistry",
            Self::Physics => "Physics",
            Self::History => "History",
            Self::Geography => "Geography",
            Self::Politics => "Politics",
            Self::Religion => "Religion",
            Self::Ethics => "Ethics",
            Self::Art => "Art",
            Self::Music => "Music",
            Self::Sports => "Sports",
            Self::ComputerScience => "Computer Science",
        }
    }

    /// Stable storage key, matching the serde representation.
    pub fn key(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Math => "math",
            Self::German => "german",
            Self::English => "english",
            Self::French => "french",
            Self::Latin => "latin",
            Self::Biology => "biology",
            Self::Chemistry => "chemistry",
            Self::Physics => "physics",
            Self::History => "history",
            Self::Geography => "geography",
            Self::Politics => "politics",
            Self::Religion => "religion",
            Self::Ethics => "ethics",
            Self::Art => "art",
            Self::Music => "music",
            Self::Sports => "sports",
            Self::ComputerScience => "computer_science",
        }
    }

    /// Parses a storage key or display name, ignoring case and outer whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL.into_iter().find(|lesson| {
            lesson.key().eq_ignore_ascii_case(value)
                || lesson.display_name().eq_ignore_ascii_case(value)
        })
    }

    /// Whether this is the empty-slot marker rather than a real subject.
    pub fn is_placeholder(self) -> bool {
        self.display_name() == "+"
    }
}

impl Display for Lesson {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
