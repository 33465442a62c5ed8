use std::fmt::Display;

use itertools::Itertools;

use super::classify::LinearStyle;
use super::symbols::{Symbol, SymbolSet, EPSILON};
use super::GrammarError;

/// One alternative on the right-hand side of a production.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Right {
    Epsilon,
    Symbols(String),
}

impl Right {
    /// `""` and `"ε"` both read as the empty alternative.
    pub fn parse(text: &str) -> Right {
        if text.is_empty() || text == EPSILON {
            Right::Epsilon
        } else {
            Right::Symbols(text.to_string())
        }
    }

    /// The symbols of this alternative, empty for epsilon.
    pub fn as_str(&self) -> &str {
        match self {
            Right::Epsilon => "",
            Right::Symbols(s) => s,
        }
    }

    pub fn len(&self) -> usize {
        self.as_str().chars().count()
    }

    pub fn is_epsilon(&self) -> bool {
        matches!(self, Right::Epsilon)
    }
}

impl From<&str> for Right {
    fn from(value: &str) -> Self {
        Right::parse(value)
    }
}

impl Display for Right {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Right::Epsilon => write!(f, "{EPSILON}"),
            Right::Symbols(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Production {
    left: String,
    rights: Vec<Right>,
}

impl Production {
    pub fn new<R>(left: &str, rights: R) -> Result<Self, GrammarError>
    where
        R: IntoIterator<Item = Right>,
    {
        if left.is_empty() || left == EPSILON {
            return Err(GrammarError::EmptyLeftSide);
        }

        let mut production = Production {
            left: left.to_string(),
            rights: vec![],
        };
        for right in rights {
            production.add_right(right);
        }

        if production.rights.is_empty() {
            return Err(GrammarError::EmptyProduction(production.left));
        }

        Ok(production)
    }

    pub fn left(&self) -> &str {
        &self.left
    }

    pub fn rights(&self) -> &[Right] {
        &self.rights
    }

    /// Appends an alternative unless an equal one is already present.
    pub fn add_right(&mut self, right: Right) {
        if !self.rights.contains(&right) {
            self.rights.push(right);
        }
    }

    pub fn has_epsilon(&self) -> bool {
        self.rights.iter().any(Right::is_epsilon)
    }

    /// The left side as a single symbol, when it is exactly one character long.
    pub fn single_left(&self) -> Option<Symbol> {
        self.left.chars().exactly_one().ok()
    }

    pub fn validate_symbols(&self, symbols: &SymbolSet) -> Result<(), GrammarError> {
        symbols.validate_string(&self.left)?;
        for right in &self.rights {
            symbols.validate_string(right.as_str())?;
        }
        Ok(())
    }

    pub fn is_type2_compliant(&self, symbols: &SymbolSet) -> bool {
        self.single_left()
            .map_or(false, |left| symbols.is_nonterminal(left))
    }

    pub fn is_type3_compliant(&self, symbols: &SymbolSet, style: LinearStyle) -> bool {
        self.is_type2_compliant(symbols)
            && self
                .rights
                .iter()
                .all(|right| is_linear_shape(right, symbols, style))
    }

    pub fn is_type1_compliant(&self, start: Symbol) -> bool {
        let left_len = self.left.chars().count();

        self.rights.iter().all(|right| match right {
            Right::Epsilon => self.single_left() == Some(start),
            Right::Symbols(_) => right.len() >= left_len,
        })
    }
}

fn is_linear_shape(right: &Right, symbols: &SymbolSet, style: LinearStyle) -> bool {
    let Right::Symbols(s) = right else {
        return true;
    };

    let shape = s.chars().collect_vec();
    match (shape.as_slice(), style) {
        ([a], _) => symbols.is_terminal(*a),
        ([a, b], LinearStyle::Right) => symbols.is_terminal(*a) && symbols.is_nonterminal(*b),
        ([a, b], LinearStyle::Left) => symbols.is_nonterminal(*a) && symbols.is_terminal(*b),
        _ => false,
    }
}

impl Display for Production {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} → {}", self.left, self.rights.iter().join(" | "))
    }
}
