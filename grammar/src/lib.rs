//! Operator grammars over single-character symbols.
//!
//! Rules are written one per line as `A->aBc|d`. Uppercase ASCII letters are
//! non-terminals, every other non-whitespace character is a terminal.

use std::fmt::{self, Display};
use std::str::FromStr;

mod error;
pub use error::{Defect, GrammarError};
mod parser;

/// Marks the bottom of the parse stack and the end of the input.
pub const BOUNDARY: char = '#';

/// A grammar character, classified once when it is read.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Symbol {
    Terminal(char),
    NonTerminal(char),
}

impl Symbol {
    pub fn classify(c: char) -> Self {
        if c.is_ascii_uppercase() {
            Symbol::NonTerminal(c)
        } else {
            Symbol::Terminal(c)
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Symbol::Terminal(c) | Symbol::NonTerminal(c) => c,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }

    pub fn is_non_terminal(self) -> bool {
        matches!(self, Symbol::NonTerminal(_))
    }
}

impl From<char> for Symbol {
    fn from(c: char) -> Self {
        Symbol::classify(c)
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A single alternative of a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub lhs: char,
    pub rhs: Vec<Symbol>,
}

impl Production {
    /// Create a production, classifying every character of `rhs`.
    pub fn new(lhs: char, rhs: &str) -> Self {
        Production {
            lhs,
            rhs: rhs.chars().map(Symbol::classify).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rhs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rhs.is_empty()
    }

    fn defect(&self) -> Option<Defect> {
        if !Symbol::classify(self.lhs).is_non_terminal() {
            return Some(Defect::LhsNotNonTerminal(self.lhs));
        }
        if self.rhs.is_empty() {
            return Some(Defect::EmptyRhs);
        }
        self.rhs.windows(2).find_map(|pair| match (pair[0], pair[1]) {
            (Symbol::NonTerminal(a), Symbol::NonTerminal(b)) => {
                Some(Defect::AdjacentNonTerminals(a, b))
            }
            _ => None,
        })
    }

    fn validate(&self) -> Result<(), GrammarError> {
        match self.defect() {
            Some(defect) => Err(GrammarError::MalformedProduction {
                production: self.to_string(),
                defect,
            }),
            None => Ok(()),
        }
    }
}

impl Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}->", self.lhs)?;
        for symbol in &self.rhs {
            write!(f, "{}", symbol)?;
        }
        Ok(())
    }
}

impl FromStr for Production {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (_, production) = nom::combinator::all_consuming(nom::sequence::terminated(
            parser::production,
            nom::character::complete::multispace0,
        ))(s)?;
        production.validate()?;
        Ok(production)
    }
}

/// A validated operator grammar.
///
/// Terminals and non-terminals are kept in the order they are first seen,
/// which is the order tables are displayed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    productions: Vec<Production>,
    start: char,
    terminals: Vec<char>,
    non_terminals: Vec<char>,
}

impl Grammar {
    /// Validate `productions` and derive the symbol sets. The start symbol is
    /// the left-hand side of the first production.
    pub fn new(productions: Vec<Production>) -> Result<Self, GrammarError> {
        let start = productions
            .first()
            .map(|p| p.lhs)
            .ok_or(GrammarError::Empty)?;
        for production in &productions {
            production.validate()?;
        }

        let mut terminals = Vec::new();
        let mut non_terminals = Vec::new();
        for production in &productions {
            push_unique(&mut non_terminals, production.lhs);
            for symbol in &production.rhs {
                match *symbol {
                    Symbol::Terminal(c) => push_unique(&mut terminals, c),
                    Symbol::NonTerminal(c) => push_unique(&mut non_terminals, c),
                }
            }
        }

        Ok(Grammar {
            productions,
            start,
            terminals,
            non_terminals,
        })
    }

    /// Use a different start symbol. It must have at least one production.
    ///
    /// The text form has no place for the start symbol, so parsing the
    /// `Display` output of the result gives back the default start. Call
    /// `with_start` again after parsing to restore it.
    pub fn with_start(mut self, start: char) -> Result<Self, GrammarError> {
        if !self.productions.iter().any(|p| p.lhs == start) {
            return Err(GrammarError::UnknownStart(start));
        }
        self.start = start;
        Ok(self)
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn start(&self) -> char {
        self.start
    }

    pub fn terminals(&self) -> &[char] {
        &self.terminals
    }

    pub fn non_terminals(&self) -> &[char] {
        &self.non_terminals
    }

    /// Whether some production already uses the boundary marker, as in an
    /// augmented grammar `S->#E#`.
    pub fn mentions_boundary(&self) -> bool {
        self.terminals.contains(&BOUNDARY)
    }
}

fn push_unique(v: &mut Vec<char>, c: char) {
    if !v.contains(&c) {
        v.push(c);
    }
}

/// One production per line, in declaration order. The start symbol is not
/// written.
impl Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for production in &self.productions {
            writeln!(f, "{}", production)?;
        }
        Ok(())
    }
}

impl FromStr for Grammar {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (_, productions) = parser::grammar(s)?;
        Grammar::new(productions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Debug;
    use std::string::ToString;

    const EXPR: &str = "E->E+T|T\nT->T*F|F\nF->(E)|i\n";

    fn assert_lossless_conversion<T, E>(t: T)
    where
        T: ToString + FromStr<Err = E> + Eq + Debug,
        E: std::error::Error,
    {
        let s = t.to_string();
        let t_parse = T::from_str(&s).unwrap();
        assert_eq!(t, t_parse, "To string:\n{}\n", s);
    }

    #[test]
    fn classify() {
        assert_eq!(Symbol::classify('E'), Symbol::NonTerminal('E'));
        assert_eq!(Symbol::classify('i'), Symbol::Terminal('i'));
        assert_eq!(Symbol::classify('+'), Symbol::Terminal('+'));
        assert_eq!(Symbol::classify('#'), Symbol::Terminal('#'));
        assert!(Symbol::from('(').is_terminal());
        assert!(Symbol::from('Q').is_non_terminal());
    }

    #[test]
    fn lossless_production() {
        assert_lossless_conversion(Production::new('F', "(E)"));
    }

    #[test]
    fn lossless_grammar() {
        let g: Grammar = EXPR.parse().unwrap();
        assert_lossless_conversion(g);
    }

    #[test]
    fn alternatives_are_split() {
        let g: Grammar = EXPR.parse().unwrap();
        let lines: Vec<String> = g.productions().iter().map(|p| p.to_string()).collect();
        assert_eq!(
            lines,
            vec!["E->E+T", "E->T", "T->T*F", "T->F", "F->(E)", "F->i"]
        );
    }

    #[test]
    fn symbols_in_first_seen_order() {
        let g: Grammar = EXPR.parse().unwrap();
        assert_eq!(g.start(), 'E');
        assert_eq!(g.non_terminals(), &['E', 'T', 'F']);
        assert_eq!(g.terminals(), &['+', '*', '(', ')', 'i']);
        assert!(!g.mentions_boundary());
    }

    #[test]
    fn augmented_grammar_mentions_boundary() {
        let g: Grammar = "S->#E#\nE->E+i|i".parse().unwrap();
        assert_eq!(g.start(), 'S');
        assert_eq!(g.terminals(), &['#', '+', 'i']);
        assert!(g.mentions_boundary());
    }

    #[test]
    fn adjacent_non_terminals() {
        let err = "E->ET|i".parse::<Grammar>().unwrap_err();
        assert_eq!(
            err,
            GrammarError::MalformedProduction {
                production: "E->ET".to_owned(),
                defect: Defect::AdjacentNonTerminals('E', 'T'),
            }
        );
    }

    #[test]
    fn empty_alternative() {
        let err = "E->i|".parse::<Grammar>().unwrap_err();
        assert_eq!(
            err,
            GrammarError::MalformedProduction {
                production: "E->".to_owned(),
                defect: Defect::EmptyRhs,
            }
        );
    }

    #[test]
    fn lhs_must_be_non_terminal() {
        let err = Grammar::new(vec![Production::new('e', "i")]).unwrap_err();
        assert!(matches!(
            err,
            GrammarError::MalformedProduction {
                defect: Defect::LhsNotNonTerminal('e'),
                ..
            }
        ));
    }

    #[test]
    fn empty_grammar() {
        assert_eq!("\n\n".parse::<Grammar>().unwrap_err(), GrammarError::Empty);
    }

    #[test]
    fn syntax_error() {
        let err = "E->i\nE=>i".parse::<Grammar>().unwrap_err();
        assert!(matches!(err, GrammarError::Syntax(_)), "{:?}", err);
    }

    #[test]
    fn start_override() {
        let g: Grammar = EXPR.parse().unwrap();
        assert_eq!(g.clone().with_start('T').unwrap().start(), 'T');

        let t = g.clone().with_start('T').unwrap();
        let reparsed: Grammar = t.to_string().parse().unwrap();
        assert_eq!(reparsed.start(), 'E');
        assert_eq!(reparsed.productions(), t.productions());
        assert_ne!(reparsed, t);
        assert_eq!(reparsed.with_start('T').unwrap(), t);
        assert_eq!(
            g.with_start('X').unwrap_err(),
            GrammarError::UnknownStart('X')
        );
    }
}
