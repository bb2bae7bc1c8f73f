use std::fmt::{self, Display};

use grammar::Production;

use crate::{ParseError, Relation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Shift,
    /// Reduced by the production at `index` in declaration order.
    Reduce { index: usize, production: Production },
    Accept,
    Reject,
}

impl Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Action::Shift => write!(f, "shift"),
            Action::Reduce { production, .. } => write!(f, "reduce {}", production),
            Action::Accept => write!(f, "accept"),
            Action::Reject => write!(f, "reject"),
        }
    }
}

/// One iteration of the parse loop. Snapshots are taken before the action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceStep {
    pub step: usize,
    pub stack: String,
    pub relation: Relation,
    pub input: String,
    /// Topmost stack terminal and next input symbol the relation was read for.
    /// `lookahead` is `None` once the end marker has been shifted.
    pub top: char,
    pub lookahead: Option<char>,
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected(ParseError),
}

/// Verdict of a parse and every step taken to reach it. A rejected parse
/// keeps the steps up to and including the failing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseReport {
    pub steps: Vec<TraceStep>,
    pub verdict: Verdict,
}

impl ParseReport {
    pub fn is_accepted(&self) -> bool {
        self.verdict == Verdict::Accepted
    }

    pub fn error(&self) -> Option<&ParseError> {
        match &self.verdict {
            Verdict::Accepted => None,
            Verdict::Rejected(err) => Some(err),
        }
    }

    pub fn last_step(&self) -> Option<&TraceStep> {
        self.steps.last()
    }

    /// Column width needed for stack and input snapshots.
    fn width(&self) -> usize {
        self.steps
            .iter()
            .map(|s| s.stack.chars().count().max(s.input.chars().count()))
            .max()
            .unwrap_or(0)
            .max(8)
            + 2
    }
}

impl Display for ParseReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let w = self.width();
        writeln!(
            f,
            "{:<6}{:<w$}{:<10}{:<w$}{}",
            "step",
            "stack",
            "relation",
            "input",
            "action",
            w = w
        )?;
        for step in &self.steps {
            writeln!(
                f,
                "{:<6}{:<w$}{:<10}{:<w$}{}",
                step.step,
                step.stack,
                step.relation.to_string(),
                step.input,
                step.action,
                w = w
            )?;
        }
        match &self.verdict {
            Verdict::Accepted => writeln!(f, "accepted"),
            Verdict::Rejected(err) => writeln!(f, "rejected: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(n: usize, stack: &str, input: &str, action: Action) -> TraceStep {
        TraceStep {
            step: n,
            stack: stack.to_owned(),
            relation: Relation::Lower,
            input: input.to_owned(),
            top: '#',
            lookahead: input.chars().next(),
            action,
        }
    }

    #[test]
    fn columns_count_characters() {
        let report = ParseReport {
            steps: vec![
                step(1, "#", "αβγδεζηθικ#", Action::Shift),
                step(2, "#αβγδεζηθικ", "#", Action::Shift),
            ],
            verdict: Verdict::Accepted,
        };
        assert_eq!(report.width(), 13);

        let rendered = report.to_string();
        let offsets: Vec<Option<usize>> = rendered
            .lines()
            .take(3)
            .map(|l| l.chars().position(|c| c == '<' || c == 'r'))
            .collect();
        assert_eq!(offsets, vec![Some(6 + 13); 3]);
    }
}
