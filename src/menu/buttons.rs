use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Raw bit reported by each button
pub const SELECT_BIT: u8 = 0b001;
pub const UP_BIT: u8 = 0b010;
pub const DOWN_BIT: u8 = 0b100;

/// Buttons held down at one instant
///
/// The input layer reports the sum of the pressed buttons' bits. Only the
/// combinations the menu understands have a variant; anything else (Up+Down,
/// all three) reads as [`ButtonCode::None`].
///
/// # Parsing formats
/// - `none`, `select`, `up`, `down`, `select+up`, `select+down` (any case,
///   `+` order free)
/// - a raw bit sum such as `3`
///
/// # Example
/// ```
/// use varioclub::menu::ButtonCode;
///
/// let code: ButtonCode = "up+select".parse().unwrap();
/// assert_eq!(code, ButtonCode::SelectUp);
/// assert_eq!(ButtonCode::from_raw(6), ButtonCode::None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonCode {
    #[default]
    None,
    Select,
    Up,
    Down,
    SelectUp,
    SelectDown,
}

impl ButtonCode {
    /// Decode a raw bit sum
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0 => ButtonCode::None,
            SELECT_BIT => ButtonCode::Select,
            UP_BIT => ButtonCode::Up,
            DOWN_BIT => ButtonCode::Down,
            x if x == SELECT_BIT + UP_BIT => ButtonCode::SelectUp,
            x if x == SELECT_BIT + DOWN_BIT => ButtonCode::SelectDown,
            _ => ButtonCode::None,
        }
    }

    /// Combine individual button states
    pub fn from_pressed(select: bool, up: bool, down: bool) -> Self {
        let mut raw = 0;
        if select {
            raw += SELECT_BIT;
        }
        if up {
            raw += UP_BIT;
        }
        if down {
            raw += DOWN_BIT;
        }
        Self::from_raw(raw)
    }

    pub fn raw(self) -> u8 {
        match self {
            ButtonCode::None => 0,
            ButtonCode::Select => SELECT_BIT,
            ButtonCode::Up => UP_BIT,
            ButtonCode::Down => DOWN_BIT,
            ButtonCode::SelectUp => SELECT_BIT + UP_BIT,
            ButtonCode::SelectDown => SELECT_BIT + DOWN_BIT,
        }
    }

    /// Select alone or with Up/Down: the start of a settings gesture
    pub fn is_select_gesture(self) -> bool {
        matches!(
            self,
            ButtonCode::Select | ButtonCode::SelectUp | ButtonCode::SelectDown
        )
    }
}

impl fmt::Display for ButtonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ButtonCode::None => "none",
            ButtonCode::Select => "select",
            ButtonCode::Up => "up",
            ButtonCode::Down => "down",
            ButtonCode::SelectUp => "select+up",
            ButtonCode::SelectDown => "select+down",
        };
        f.write_str(name)
    }
}

impl FromStr for ButtonCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Ok(raw) = s.parse::<u8>() {
            return Ok(Self::from_raw(raw));
        }

        let mut raw = 0u8;
        for part in s.split('+') {
            let bit = match part.trim().to_ascii_lowercase().as_str() {
                "none" => 0,
                "select" | "s" => SELECT_BIT,
                "up" | "u" => UP_BIT,
                "down" | "d" => DOWN_BIT,
                _ => return Err(format!("invalid button: {}", part.trim())),
            };
            if raw & bit != 0 {
                return Err(format!("button listed twice: {}", s));
            }
            raw |= bit;
        }
        Ok(Self::from_raw(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_sums() {
        assert_eq!(ButtonCode::from_raw(0), ButtonCode::None);
        assert_eq!(ButtonCode::from_raw(1), ButtonCode::Select);
        assert_eq!(ButtonCode::from_raw(2), ButtonCode::Up);
        assert_eq!(ButtonCode::from_raw(4), ButtonCode::Down);
        assert_eq!(ButtonCode::from_raw(3), ButtonCode::SelectUp);
        assert_eq!(ButtonCode::from_raw(5), ButtonCode::SelectDown);
    }

    #[test]
    fn test_meaningless_combinations_read_as_none() {
        assert_eq!(ButtonCode::from_raw(UP_BIT + DOWN_BIT), ButtonCode::None);
        assert_eq!(ButtonCode::from_raw(7), ButtonCode::None);
        assert_eq!(ButtonCode::from_pressed(false, true, true), ButtonCode::None);
    }

    #[test]
    fn test_raw_round_trip() {
        for code in [
            ButtonCode::None,
            ButtonCode::Select,
            ButtonCode::Up,
            ButtonCode::Down,
            ButtonCode::SelectUp,
            ButtonCode::SelectDown,
        ] {
            assert_eq!(ButtonCode::from_raw(code.raw()), code);
            assert_eq!(code.to_string().parse::<ButtonCode>().unwrap(), code);
        }
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("SELECT".parse::<ButtonCode>().unwrap(), ButtonCode::Select);
        assert_eq!("down + select".parse::<ButtonCode>().unwrap(), ButtonCode::SelectDown);
        assert_eq!("5".parse::<ButtonCode>().unwrap(), ButtonCode::SelectDown);
        assert_eq!("up+down".parse::<ButtonCode>().unwrap(), ButtonCode::None);
    }

    #[test]
    fn test_parse_invalid() {
        assert!("left".parse::<ButtonCode>().is_err());
        assert!("up+up".parse::<ButtonCode>().is_err());
        assert!("".parse::<ButtonCode>().is_err());
    }

    #[test]
    fn test_select_gesture() {
        assert!(ButtonCode::Select.is_select_gesture());
        assert!(ButtonCode::SelectUp.is_select_gesture());
        assert!(ButtonCode::SelectDown.is_select_gesture());
        assert!(!ButtonCode::Up.is_select_gesture());
        assert!(!ButtonCode::None.is_select_gesture());
    }
}
