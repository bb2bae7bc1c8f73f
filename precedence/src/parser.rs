use grammar::{Grammar, Symbol, BOUNDARY};
use log::{debug, trace};

use crate::state::ParseState;
use crate::{Action, ParseError, ParseReport, PrecedenceTable, Relation, TraceStep, Verdict};

/// How the handle is chosen when the table says to reduce.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Reduction {
    /// The first production, in declaration order, whose right-hand side
    /// matches the top of the stack.
    FirstMatch,
    /// Scan down from the topmost terminal to the first terminal pair related
    /// by `<`; everything above it is the handle.
    Handle,
}

impl Default for Reduction {
    fn default() -> Self {
        Reduction::FirstMatch
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParserConfig {
    pub reduction: Reduction,
    /// Maximum number of steps. Derived from input length and grammar size
    /// when unset.
    pub step_limit: Option<usize>,
}

/// Shift-reduce parser driven by a precedence table.
#[derive(Debug)]
pub struct Parser<'a> {
    grammar: &'a Grammar,
    table: &'a PrecedenceTable,
    config: ParserConfig,
}

impl<'a> Parser<'a> {
    pub fn new(grammar: &'a Grammar, table: &'a PrecedenceTable) -> Self {
        Self::with_config(grammar, table, ParserConfig::default())
    }

    pub fn with_config(
        grammar: &'a Grammar,
        table: &'a PrecedenceTable,
        config: ParserConfig,
    ) -> Self {
        Parser {
            grammar,
            table,
            config,
        }
    }

    /// Parse `input`, which must end with `#`. Never panics on bad input; the
    /// failure is reported in the verdict along with the steps taken so far.
    pub fn parse(&self, input: &str) -> ParseReport {
        let mut steps = Vec::new();
        let verdict = match self.run(input, &mut steps) {
            Ok(()) => Verdict::Accepted,
            Err(err) => Verdict::Rejected(err),
        };
        debug!("parse of {:?} finished: {:?}", input, verdict);
        ParseReport { steps, verdict }
    }

    fn run(&self, input: &str, steps: &mut Vec<TraceStep>) -> Result<(), ParseError> {
        let mut state = ParseState::new(input)?;
        let limit = self.config.step_limit.unwrap_or_else(|| {
            4 * state.input_len() + self.grammar.productions().len() + 4
        });

        loop {
            let top = state.top_terminal();
            let lookahead = state.lookahead();
            let relation = lookahead.map_or(Relation::Undefined, |b| self.table.relation(top, b));
            let mut step = TraceStep {
                step: steps.len() + 1,
                stack: state.stack_string(),
                relation,
                input: state.remaining(),
                top,
                lookahead,
                action: Action::Reject,
            };

            // The last step allowed is spent on the rejection itself.
            let result = if step.step >= limit {
                Err(ParseError::StepLimitExceeded(limit))
            } else {
                match lookahead {
                    Some(lookahead) => self.act(&mut state, relation, top, lookahead),
                    None => Err(ParseError::InputExhausted),
                }
            };
            if let Ok(action) = &result {
                step.action = action.clone();
            }
            trace!(
                "{} {} {} {} {}",
                step.step,
                step.stack,
                step.relation,
                step.input,
                step.action
            );
            steps.push(step);

            if result? == Action::Accept {
                return Ok(());
            }
        }
    }

    fn act(
        &self,
        state: &mut ParseState,
        relation: Relation,
        top: char,
        lookahead: char,
    ) -> Result<Action, ParseError> {
        match relation {
            Relation::Equal if top == BOUNDARY && lookahead == BOUNDARY => Ok(Action::Accept),
            Relation::Lower | Relation::Equal => {
                state.shift()?;
                Ok(Action::Shift)
            }
            Relation::Higher => {
                let index = match self.config.reduction {
                    Reduction::FirstMatch => self.first_match(state.reducible()),
                    Reduction::Handle => self.handle_match(state.stack()),
                }
                .ok_or_else(|| ParseError::NoApplicableReduction {
                    stack: state.stack_string(),
                })?;
                let production = &self.grammar.productions()[index];
                state.reduce(production);
                Ok(Action::Reduce {
                    index,
                    production: production.clone(),
                })
            }
            Relation::Undefined => Err(ParseError::UndefinedPrecedence { top, lookahead }),
        }
    }

    /// First production whose right-hand side matches the top of `stack`. The
    /// matched part must hold a terminal, renaming a lone non-terminal would
    /// make no progress.
    fn first_match(&self, stack: &[Symbol]) -> Option<usize> {
        self.grammar.productions().iter().position(|p| {
            p.len() <= stack.len() && {
                let suffix = &stack[stack.len() - p.len()..];
                suffix.iter().any(|s| s.is_terminal()) && rhs_matches(&p.rhs, suffix)
            }
        })
    }

    /// Production whose right-hand side is exactly the handle on `stack`.
    fn handle_match(&self, stack: &[Symbol]) -> Option<usize> {
        let mut j = stack.iter().rposition(|s| s.is_terminal())?;
        let start = loop {
            let i = stack[..j].iter().rposition(|s| s.is_terminal())?;
            let relation = self
                .table
                .relation(stack[i].as_char(), stack[j].as_char());
            if relation == Relation::Lower {
                break i + 1;
            }
            j = i;
        };
        let handle = &stack[start..];
        self.grammar
            .productions()
            .iter()
            .position(|p| rhs_matches(&p.rhs, handle))
    }
}

/// Non-terminals match any non-terminal, terminals must be identical.
fn rhs_matches(rhs: &[Symbol], symbols: &[Symbol]) -> bool {
    rhs.len() == symbols.len()
        && rhs.iter().zip(symbols).all(|pair| match pair {
            (Symbol::NonTerminal(_), Symbol::NonTerminal(_)) => true,
            (Symbol::Terminal(a), Symbol::Terminal(b)) => a == b,
            _ => false,
        })
}
