use grammar::{Production, Symbol, BOUNDARY};

use crate::ParseError;

/// Symbol stack and remaining input of a single parse.
#[derive(Debug)]
pub(crate) struct ParseState {
    /// `stack[0]` is always the boundary marker, reductions never reach it.
    stack: Vec<Symbol>,
    input: Vec<char>,
    cursor: usize,
}

impl ParseState {
    /// Check `input` and set up the initial `#` stack. Whitespace is dropped,
    /// but a misplaced `#` is reported at its character offset in `input`.
    pub fn new(input: &str) -> Result<Self, ParseError> {
        let raw: Vec<char> = input.chars().collect();
        match raw.iter().position(|&c| c == BOUNDARY) {
            None => return Err(ParseError::MissingEndMarker),
            Some(pos) if raw[pos + 1..].iter().any(|c| !c.is_whitespace()) => {
                return Err(ParseError::MisplacedEndMarker(pos))
            }
            Some(_) => {}
        }
        let input: Vec<char> = raw.into_iter().filter(|c| !c.is_whitespace()).collect();
        if let Some(&c) = input.iter().find(|&&c| Symbol::classify(c).is_non_terminal()) {
            return Err(ParseError::NonTerminalInInput(c));
        }

        Ok(ParseState {
            stack: vec![Symbol::Terminal(BOUNDARY)],
            input,
            cursor: 0,
        })
    }

    /// Topmost terminal on the stack. Non-terminals carry no precedence.
    pub fn top_terminal(&self) -> char {
        self.stack
            .iter()
            .rev()
            .find(|s| s.is_terminal())
            .map_or(BOUNDARY, |s| s.as_char())
    }

    pub fn lookahead(&self) -> Option<char> {
        self.input.get(self.cursor).copied()
    }

    pub fn shift(&mut self) -> Result<(), ParseError> {
        let c = self.lookahead().ok_or(ParseError::InputExhausted)?;
        self.stack.push(Symbol::Terminal(c));
        self.cursor += 1;
        Ok(())
    }

    pub fn reduce(&mut self, production: &Production) {
        let len = self.stack.len() - production.len();
        self.stack.truncate(len);
        self.stack.push(Symbol::NonTerminal(production.lhs));
    }

    pub fn stack(&self) -> &[Symbol] {
        &self.stack
    }

    /// Stack contents above the boundary marker, the only part a reduction
    /// may replace.
    pub fn reducible(&self) -> &[Symbol] {
        &self.stack[1..]
    }

    pub fn stack_string(&self) -> String {
        self.stack.iter().map(|s| s.as_char()).collect()
    }

    pub fn remaining(&self) -> String {
        self.input[self.cursor..].iter().collect()
    }

    pub fn input_len(&self) -> usize {
        self.input.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_input() {
        let tests = vec![
            ("i+i", ParseError::MissingEndMarker),
            ("", ParseError::MissingEndMarker),
            ("i#+i#", ParseError::MisplacedEndMarker(1)),
            ("i # +i#", ParseError::MisplacedEndMarker(2)),
            ("  #i#", ParseError::MisplacedEndMarker(2)),
            ("i+E#", ParseError::NonTerminalInInput('E')),
        ];
        for (input, err) in tests {
            assert_eq!(ParseState::new(input).unwrap_err(), err, "input: {}", input);
        }
        assert!(ParseState::new("i#  \n").is_ok());
    }

    #[test]
    fn shift_and_reduce() {
        let mut state = ParseState::new("i + i #").unwrap();
        assert_eq!(state.remaining(), "i+i#");
        assert_eq!(state.top_terminal(), '#');
        assert_eq!(state.lookahead(), Some('i'));

        state.shift().unwrap();
        assert_eq!(state.stack_string(), "#i");
        assert_eq!(state.top_terminal(), 'i');

        state.reduce(&Production::new('F', "i"));
        assert_eq!(state.stack_string(), "#F");
        assert_eq!(state.top_terminal(), '#');
        assert_eq!(state.reducible(), &[Symbol::NonTerminal('F')]);
        assert_eq!(state.remaining(), "+i#");
    }

    #[test]
    fn shift_past_end() {
        let mut state = ParseState::new("#").unwrap();
        state.shift().unwrap();
        assert_eq!(state.lookahead(), None);
        assert_eq!(state.shift().unwrap_err(), ParseError::InputExhausted);
    }
}
