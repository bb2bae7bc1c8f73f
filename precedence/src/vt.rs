use std::fmt::{self, Display};

use grammar::{Grammar, Symbol};
use log::{debug, trace};

type Map<K, V> = indexmap::IndexMap<K, V>;
type Set<K> = indexmap::IndexSet<K>;

/// The end of a right-hand side a [`VtSet`] is read from.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Side {
    First,
    Last,
}

impl Side {
    /// The outermost symbol on this side and its neighbour.
    fn ends(self, rhs: &[Symbol]) -> (Option<Symbol>, Option<Symbol>) {
        match self {
            Side::First => (rhs.first().copied(), rhs.get(1).copied()),
            Side::Last => {
                let inner = rhs.len().checked_sub(2).and_then(|i| rhs.get(i));
                (rhs.last().copied(), inner.copied())
            }
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Side::First => write!(f, "FIRSTVT"),
            Side::Last => write!(f, "LASTVT"),
        }
    }
}

/// FIRSTVT or LASTVT of every non-terminal in a grammar.
///
/// Non-terminals keep grammar order and terminals keep the order they were
/// added in, so displaying a set is deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VtSet {
    side: Side,
    sets: Map<char, Set<char>>,
}

impl VtSet {
    pub fn side(&self) -> Side {
        self.side
    }

    /// Terminals in the set of `non_terminal`. Empty for symbols the grammar
    /// does not know.
    pub fn terminals(&self, non_terminal: char) -> impl Iterator<Item = char> + '_ {
        self.sets
            .get(&non_terminal)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    pub fn contains(&self, non_terminal: char, terminal: char) -> bool {
        self.sets
            .get(&non_terminal)
            .map_or(false, |set| set.contains(&terminal))
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, Vec<char>)> + '_ {
        self.sets
            .iter()
            .map(|(&nt, set)| (nt, set.iter().copied().collect()))
    }
}

impl Display for VtSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (non_terminal, set) in &self.sets {
            write!(f, "{}({}) = {{", self.side, non_terminal)?;
            for (i, terminal) in set.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", terminal)?;
            }
            writeln!(f, "}}")?;
        }
        Ok(())
    }
}

/// FIRSTVT of every non-terminal: the terminals that can begin a sentential
/// form derived from it, ignoring a leading non-terminal.
pub fn first_vt(grammar: &Grammar) -> VtSet {
    compute(grammar, Side::First)
}

/// LASTVT of every non-terminal, the mirror image of [`first_vt`].
pub fn last_vt(grammar: &Grammar) -> VtSet {
    compute(grammar, Side::Last)
}

/// Sweep every production until a full sweep adds nothing. Sets only grow and
/// are bounded by the terminal alphabet, so this terminates.
fn compute(grammar: &Grammar, side: Side) -> VtSet {
    let mut sets: Map<char, Set<char>> = grammar
        .non_terminals()
        .iter()
        .map(|&nt| (nt, Set::new()))
        .collect();

    let mut sweeps = 0;
    loop {
        let mut changed = false;
        sweeps += 1;

        for production in grammar.productions() {
            let lhs = production.lhs;
            let mut added = Vec::new();
            match side.ends(&production.rhs) {
                (Some(Symbol::Terminal(t)), _) => added.push(t),
                (Some(Symbol::NonTerminal(nt)), inner) => {
                    if nt != lhs {
                        let inherited = sets.get(&nt).into_iter().flat_map(|s| s.iter());
                        added.extend(inherited.copied());
                    }
                    if let Some(Symbol::Terminal(t)) = inner {
                        added.push(t);
                    }
                }
                (None, _) => {}
            }

            let set = sets.entry(lhs).or_default();
            for t in added {
                if set.insert(t) {
                    trace!("{}({}) += {} from {}", side, lhs, t, production);
                    changed = true;
                }
            }
        }

        if !changed {
            break;
        }
    }
    debug!("{} converged after {} sweeps", side, sweeps);

    VtSet { side, sets }
}
