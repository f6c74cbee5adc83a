//! Goal - Why the reader wants to read

use serde::{Deserialize, Serialize};

/// Reading goal declared in the profile
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    #[default]
    #[serde(alias = "entretener", alias = "entertainment")]
    Entertain,
    #[serde(alias = "aprender")]
    Learn,
    #[serde(alias = "habito", alias = "hábito")]
    Habit,
    #[serde(alias = "productividad")]
    Productivity,
    #[serde(alias = "emocional")]
    Emotional,
}

impl Goal {
    /// Goals that favour non-fiction and productivity titles
    pub fn seeks_knowledge(self) -> bool {
        matches!(self, Goal::Learn | Goal::Productivity)
    }
}

impl std::fmt::Display for Goal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Goal::Entertain => write!(f, "entertain"),
            Goal::Learn => write!(f, "learn"),
            Goal::Habit => write!(f, "habit"),
            Goal::Productivity => write!(f, "productivity"),
            Goal::Emotional => write!(f, "emotional"),
        }
    }
}

impl std::str::FromStr for Goal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "entertain" | "entertainment" | "entretener" => Ok(Goal::Entertain),
            "learn" | "aprender" => Ok(Goal::Learn),
            "habit" | "habito" | "hábito" => Ok(Goal::Habit),
            "productivity" | "productividad" => Ok(Goal::Productivity),
            "emotional" | "emocional" => Ok(Goal::Emotional),
            _ => Err(format!("Unknown goal: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_spanish_aliases() {
        assert_eq!("aprender".parse::<Goal>(), Ok(Goal::Learn));
        assert_eq!(" Entretener ".parse::<Goal>(), Ok(Goal::Entertain));
        assert_eq!("productividad".parse::<Goal>(), Ok(Goal::Productivity));
        assert!("nap".parse::<Goal>().is_err());
    }

    #[test]
    fn test_serde_alias() {
        let goal: Goal = serde_json::from_str("\"emocional\"").unwrap();
        assert_eq!(goal, Goal::Emotional);
        assert_eq!(serde_json::to_string(&Goal::Habit).unwrap(), "\"habit\"");
    }
}
