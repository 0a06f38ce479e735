//! Interaction scripts: one dashboard action per line.
//!
//! ```text
//! # comments and blank lines are ignored
//! behavior Tail flags
//! age Adult
//! color Gray
//! dogs
//! brush 100 100 300 250
//! zoom 50 70
//! scale dynamic
//! ```

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use squirrel_model::{Activity, AgeGroup, FurColor, ModelError};

use crate::config::{ConfigError, ScaleMode};
use crate::map::Rect;

#[derive(Debug, Error)]
pub enum ActionParseError {
    #[error("empty action")]
    Empty,

    #[error("unknown action '{0}'")]
    UnknownAction(String),

    #[error("'{action}' expects {expected} argument(s), got {found}")]
    WrongArity {
        action: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("'{action}': '{value}' is not a number")]
    InvalidNumber { action: &'static str, value: String },

    #[error(transparent)]
    InvalidValue(#[from] ModelError),

    #[error(transparent)]
    InvalidScale(#[from] ConfigError),
}

/// Parse failure with its 1-based script line.
#[derive(Debug, Error)]
#[error("line {line}: {source}")]
pub struct ScriptError {
    pub line: usize,
    #[source]
    pub source: ActionParseError,
}

/// A user interaction the dashboard reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Legend click or behavior checkbox.
    ToggleBehavior(Activity),
    ToggleAge(AgeGroup),
    ToggleColor(FurColor),
    ToggleDogs,
    ClearFilters,
    /// Map brush; an empty hit clears the selection.
    Brush(Rect),
    ClearSelection,
    Zoom { lo: f64, hi: f64 },
    ResetZoom,
    SetScale(ScaleMode),
}

impl Action {
    pub fn keyword(&self) -> &'static str {
        match self {
            Action::ToggleBehavior(_) => "behavior",
            Action::ToggleAge(_) => "age",
            Action::ToggleColor(_) => "color",
            Action::ToggleDogs => "dogs",
            Action::ClearFilters => "clear",
            Action::Brush(_) => "brush",
            Action::ClearSelection => "clear-selection",
            Action::Zoom { .. } => "zoom",
            Action::ResetZoom => "reset-zoom",
            Action::SetScale(_) => "scale",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = self.keyword();
        match self {
            Action::ToggleBehavior(activity) => write!(f, "{keyword} {activity}"),
            Action::ToggleAge(age) => write!(f, "{keyword} {age}"),
            Action::ToggleColor(color) => write!(f, "{keyword} {color}"),
            Action::Brush(rect) => {
                write!(f, "{keyword} {} {} {} {}", rect.x0, rect.y0, rect.x1, rect.y1)
            }
            Action::Zoom { lo, hi } => write!(f, "{keyword} {lo} {hi}"),
            Action::SetScale(mode) => write!(f, "{keyword} {mode}"),
            Action::ToggleDogs
            | Action::ClearFilters
            | Action::ClearSelection
            | Action::ResetZoom => f.write_str(keyword),
        }
    }
}

impl FromStr for Action {
    type Err = ActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let keyword = words.next().ok_or(ActionParseError::Empty)?;
        let args: Vec<&str> = words.collect();

        match keyword.to_lowercase().as_str() {
            // Activity names may contain spaces ("Tail flags").
            "behavior" => {
                if args.is_empty() {
                    return Err(arity("behavior", 1, 0));
                }
                Ok(Action::ToggleBehavior(args.join(" ").parse()?))
            }
            "age" => Ok(Action::ToggleAge(single("age", &args)?.parse()?)),
            "color" => Ok(Action::ToggleColor(single("color", &args)?.parse()?)),
            "dogs" => none("dogs", &args).map(|()| Action::ToggleDogs),
            "clear" => none("clear", &args).map(|()| Action::ClearFilters),
            "brush" => {
                let [x0, y0, x1, y1] = numbers::<4>("brush", &args)?;
                Ok(Action::Brush(Rect::new(x0, y0, x1, y1)))
            }
            "clear-selection" => none("clear-selection", &args).map(|()| Action::ClearSelection),
            "zoom" => {
                let [lo, hi] = numbers::<2>("zoom", &args)?;
                Ok(Action::Zoom { lo, hi })
            }
            "reset-zoom" => none("reset-zoom", &args).map(|()| Action::ResetZoom),
            "scale" => Ok(Action::SetScale(single("scale", &args)?.parse()?)),
            _ => Err(ActionParseError::UnknownAction(keyword.to_string())),
        }
    }
}

fn arity(action: &'static str, expected: usize, found: usize) -> ActionParseError {
    ActionParseError::WrongArity {
        action,
        expected,
        found,
    }
}

fn none(action: &'static str, args: &[&str]) -> Result<(), ActionParseError> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(arity(action, 0, args.len()))
    }
}

fn single<'a>(action: &'static str, args: &[&'a str]) -> Result<&'a str, ActionParseError> {
    match args {
        [value] => Ok(*value),
        _ => Err(arity(action, 1, args.len())),
    }
}

fn numbers<const N: usize>(
    action: &'static str,
    args: &[&str],
) -> Result<[f64; N], ActionParseError> {
    if args.len() != N {
        return Err(arity(action, N, args.len()));
    }
    let mut values = [0.0; N];
    for (slot, raw) in values.iter_mut().zip(args) {
        *slot = raw
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| ActionParseError::InvalidNumber {
                action,
                value: (*raw).to_string(),
            })?;
    }
    Ok(values)
}

/// Parse a whole script, skipping blank lines and `#` comments.
pub fn parse_script(text: &str) -> Result<Vec<Action>, ScriptError> {
    text.lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let line = line.split('#').next().unwrap_or_default().trim();
            (!line.is_empty()).then_some((index + 1, line))
        })
        .map(|(line, content)| {
            content
                .parse()
                .map_err(|source| ScriptError { line, source })
        })
        .collect()
}
