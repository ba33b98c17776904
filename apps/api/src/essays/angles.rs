use serde::Serialize;

/// The three drafting strategies, in the order drafts are requested and numbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EssayAngle {
    PrimaryStrength,
    PersonalStory,
    Balanced,
}

impl EssayAngle {
    pub const ALL: [EssayAngle; 3] = [
        EssayAngle::PrimaryStrength,
        EssayAngle::PersonalStory,
        EssayAngle::Balanced,
    ];

    /// 1-based position in `ALL`. Fixed per angle, even if other angles fail.
    pub fn version(self) -> u8 {
        match self {
            EssayAngle::PrimaryStrength => 1,
            EssayAngle::PersonalStory => 2,
            EssayAngle::Balanced => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EssayAngle::PrimaryStrength => "primary_strength",
            EssayAngle::PersonalStory => "personal_story",
            EssayAngle::Balanced => "balanced",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EssayAngle::PrimaryStrength => "Primary Strength Focus",
            EssayAngle::PersonalStory => "Personal Story Lead",
            EssayAngle::Balanced => "Balanced Approach",
        }
    }

    pub fn instruction(self) -> &'static str {
        match self {
            EssayAngle::PrimaryStrength => {
                "Lead with and emphasize the student's strengths that align most strongly \
                 with the scholarship's highest-weighted priorities"
            }
            EssayAngle::PersonalStory => {
                "Lead with the student's personal narrative, challenges overcome, and authentic \
                 journey, connecting it to scholarship values"
            }
            EssayAngle::Balanced => {
                "Balance multiple aspects of the student's profile, showing well-roundedness \
                 while still aligning with scholarship priorities"
            }
        }
    }
}

impl std::fmt::Display for EssayAngle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
