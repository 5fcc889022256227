use crate::error::PlanError;
use crate::filter::Operand;
use std::str::FromStr;

/// ORDER BY direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Default,
    Asc,
    Desc,
}

impl Direction {
    pub(crate) fn suffix(self) -> &'static str {
        match self {
            Direction::Default => "",
            Direction::Asc => " ASC",
            Direction::Desc => " DESC",
        }
    }
}

impl FromStr for Direction {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" => Ok(Direction::Default),
            "asc" => Ok(Direction::Asc),
            "desc" => Ok(Direction::Desc),
            _ => Err(PlanError::InvalidDirection(s.to_string())),
        }
    }
}

/// One ORDER BY entry.
#[derive(Debug, Clone)]
pub struct Order {
    pub(crate) operand: Operand,
    pub(crate) direction: Direction,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directions_parse_case_insensitively() {
        assert_eq!("".parse::<Direction>(), Ok(Direction::Default));
        assert_eq!("ASC".parse::<Direction>(), Ok(Direction::Asc));
        assert_eq!("Desc".parse::<Direction>(), Ok(Direction::Desc));
        assert_eq!(
            "sideways".parse::<Direction>(),
            Err(PlanError::InvalidDirection("sideways".into()))
        );
    }
}
