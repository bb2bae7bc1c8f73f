use std::fmt::{self, Display};

use grammar::{Grammar, Symbol, BOUNDARY};
use log::{debug, warn};

use crate::vt::{first_vt, last_vt, VtSet};

type Map<K, V> = indexmap::IndexMap<K, V>;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Relation {
    Lower,
    Equal,
    Higher,
    Undefined,
}

impl Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let c = match self {
            Relation::Lower => '<',
            Relation::Equal => '=',
            Relation::Higher => '>',
            Relation::Undefined => ' ',
        };
        write!(f, "{}", c)
    }
}

/// Two rules assigned different relations to the same terminal pair. The
/// later assignment is the one kept in the table.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub pair: (char, char),
    pub previous: Relation,
    pub current: Relation,
}

impl Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "conflicting precedence for ({}, {}): '{}' replaced by '{}'",
            self.pair.0, self.pair.1, self.previous, self.current
        )
    }
}

/// Precedence relations between terminal pairs. Pairs without an entry are
/// [`Relation::Undefined`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecedenceTable {
    terminals: Vec<char>,
    relations: Map<(char, char), Relation>,
    conflicts: Vec<Conflict>,
}

impl PrecedenceTable {
    /// Compute the VT sets of `grammar` and build its table.
    pub fn for_grammar(grammar: &Grammar) -> Self {
        Self::build(grammar, &first_vt(grammar), &last_vt(grammar))
    }

    pub fn build(grammar: &Grammar, first_vt: &VtSet, last_vt: &VtSet) -> Self {
        let mut terminals = grammar.terminals().to_vec();
        if !terminals.contains(&BOUNDARY) {
            terminals.push(BOUNDARY);
        }
        let mut table = PrecedenceTable {
            terminals,
            relations: Map::new(),
            conflicts: Vec::new(),
        };

        for production in grammar.productions() {
            let rhs = &production.rhs;
            for (j, symbol) in rhs.iter().enumerate() {
                match (*symbol, rhs.get(j + 1).copied()) {
                    // ...ab...
                    (Symbol::Terminal(a), Some(Symbol::Terminal(b))) => {
                        table.set(a, b, Relation::Equal)
                    }
                    // ...aB...
                    (Symbol::Terminal(a), Some(Symbol::NonTerminal(b))) => {
                        if let Some(Symbol::Terminal(c)) = rhs.get(j + 2).copied() {
                            table.set(a, c, Relation::Equal);
                        }
                        for t in first_vt.terminals(b) {
                            table.set(a, t, Relation::Lower);
                        }
                    }
                    // ...Ab...
                    (Symbol::NonTerminal(a), Some(Symbol::Terminal(b))) => {
                        for t in last_vt.terminals(a) {
                            table.set(t, b, Relation::Higher);
                        }
                    }
                    _ => {}
                }
            }
        }

        // An augmented grammar, `S->#E#`, already relates the boundary marker
        // through its own productions.
        if !grammar.mentions_boundary() {
            let start = grammar.start();
            for t in first_vt.terminals(start) {
                table.set(BOUNDARY, t, Relation::Lower);
            }
            for t in last_vt.terminals(start) {
                table.set(t, BOUNDARY, Relation::Higher);
            }
            table.set(BOUNDARY, BOUNDARY, Relation::Equal);
        }

        debug!(
            "built precedence table with {} relations and {} conflicts",
            table.relations.len(),
            table.conflicts.len()
        );
        table
    }

    fn set(&mut self, a: char, b: char, relation: Relation) {
        if let Some(previous) = self.relations.insert((a, b), relation) {
            if previous != relation {
                let conflict = Conflict {
                    pair: (a, b),
                    previous,
                    current: relation,
                };
                warn!("{}", conflict);
                self.conflicts.push(conflict);
            }
        }
    }

    pub fn relation(&self, a: char, b: char) -> Relation {
        self.relations
            .get(&(a, b))
            .copied()
            .unwrap_or(Relation::Undefined)
    }

    /// Row and column order, grammar terminals followed by the boundary marker.
    pub fn terminals(&self) -> &[char] {
        &self.terminals
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    /// Number of defined relations.
    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    /// Defined relations in the order they were first assigned.
    pub fn iter(&self) -> impl Iterator<Item = ((char, char), Relation)> + '_ {
        self.relations.iter().map(|(&pair, &relation)| (pair, relation))
    }
}

impl Display for PrecedenceTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\\")?;
        for col in &self.terminals {
            write!(f, " {}", col)?;
        }
        writeln!(f)?;
        for &row in &self.terminals {
            write!(f, "{}", row)?;
            for &col in &self.terminals {
                write!(f, " {}", self.relation(row, col))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Relation::*;

    const EXPR: &str = "E->E+T|T\nT->T*F|F\nF->(E)|i";

    fn table(grammar: &str) -> PrecedenceTable {
        let g: Grammar = grammar.parse().unwrap();
        PrecedenceTable::for_grammar(&g)
    }

    #[test]
    fn expr_matrix() {
        let t = table(EXPR);
        assert_eq!(t.terminals(), &['+', '*', '(', ')', 'i', '#']);

        #[rustfmt::skip]
        let expected = [
            //        +        *        (          )          i          #
            /* + */ [Higher,    Lower,     Lower,     Higher,    Lower,     Higher],
            /* * */ [Higher,    Higher,    Lower,     Higher,    Lower,     Higher],
            /* ( */ [Lower,     Lower,     Lower,     Equal,     Lower,     Undefined],
            /* ) */ [Higher,    Higher,    Undefined, Higher,    Undefined, Higher],
            /* i */ [Higher,    Higher,    Undefined, Higher,    Undefined, Higher],
            /* # */ [Lower,     Lower,     Lower,     Undefined, Lower,     Equal],
        ];
        for (r, &row) in t.terminals().iter().enumerate() {
            for (c, &col) in t.terminals().iter().enumerate() {
                assert_eq!(
                    t.relation(row, col),
                    expected[r][c],
                    "relation ({}, {})",
                    row,
                    col
                );
            }
        }
        assert_eq!(t.len(), 30);
        assert!(t.conflicts().is_empty());
    }

    #[test]
    fn multiplication_binds_tighter() {
        let t = table(EXPR);
        assert_eq!(t.relation('+', '*'), Lower);
        assert_eq!(t.relation('*', '+'), Higher);
    }

    #[test]
    fn unknown_pair_is_undefined() {
        let t = table(EXPR);
        assert_eq!(t.relation('x', '+'), Undefined);
        assert_eq!(t.relation('i', 'i'), Undefined);
    }

    #[test]
    fn equal_across_non_terminal() {
        let t = table("S->aBc\nB->b");
        assert_eq!(t.relation('a', 'c'), Equal);
        assert_eq!(t.relation('a', 'b'), Lower);
        assert_eq!(t.relation('b', 'c'), Higher);
    }

    #[test]
    fn adjacent_terminals_are_equal() {
        let t = table("S->ab");
        assert_eq!(t.relation('a', 'b'), Equal);
        assert_eq!(t.relation('#', 'a'), Lower);
        assert_eq!(t.relation('b', '#'), Higher);
    }

    #[test]
    fn augmented_grammar_skips_boundary_rule() {
        let plain = table(EXPR);
        let augmented = table(&format!("S->#E#\n{}", EXPR));
        assert!(augmented.conflicts().is_empty());
        assert_eq!(augmented.terminals(), &['#', '+', '*', '(', ')', 'i']);
        for &a in plain.terminals() {
            for &b in plain.terminals() {
                assert_eq!(augmented.relation(a, b), plain.relation(a, b));
            }
        }
    }

    #[test]
    fn conflicting_assignment_is_recorded() {
        let t = table("E->E+E|i");
        assert_eq!(
            t.conflicts(),
            &[Conflict {
                pair: ('+', '+'),
                previous: Higher,
                current: Lower,
            }]
        );
        assert_eq!(t.relation('+', '+'), Lower);
    }

    #[test]
    fn display() {
        let t = table("S->ab");
        let rendered = t.to_string();
        let lines: Vec<&str> = rendered.lines().map(str::trim_end).collect();
        assert_eq!(lines, vec!["\\ a b #", "a   =", "b     >", "# <   ="]);
    }
}
