//! Operator-precedence analysis and parsing.
//!
//! [`first_vt`] and [`last_vt`] compute the terminal sets the precedence
//! relations are derived from, [`PrecedenceTable`] holds those relations and
//! [`Parser`] uses the table to accept or reject input strings, recording
//! every step it takes.
//!
//! ```
//! use grammar::Grammar;
//! use precedence::{Analysis, Relation};
//!
//! let g: Grammar = "E->E+T|T\nT->T*F|F\nF->(E)|i".parse().unwrap();
//! let analysis = Analysis::new(&g);
//! assert_eq!(analysis.table.relation('+', '*'), Relation::Lower);
//! assert!(analysis.parser(&g).parse("i+i*i#").is_accepted());
//! ```

use grammar::Grammar;

mod error;
mod parser;
mod state;
mod table;
mod trace;
mod vt;

pub use error::ParseError;
pub use parser::{Parser, ParserConfig, Reduction};
pub use table::{Conflict, PrecedenceTable, Relation};
pub use trace::{Action, ParseReport, TraceStep, Verdict};
pub use vt::{first_vt, last_vt, Side, VtSet};

/// Everything derived from a grammar before parsing.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub first_vt: VtSet,
    pub last_vt: VtSet,
    pub table: PrecedenceTable,
}

impl Analysis {
    pub fn new(grammar: &Grammar) -> Self {
        let first_vt = first_vt(grammar);
        let last_vt = last_vt(grammar);
        let table = PrecedenceTable::build(grammar, &first_vt, &last_vt);
        Analysis {
            first_vt,
            last_vt,
            table,
        }
    }

    pub fn parser<'a>(&'a self, grammar: &'a Grammar) -> Parser<'a> {
        Parser::new(grammar, &self.table)
    }

    pub fn parser_with_config<'a>(
        &'a self,
        grammar: &'a Grammar,
        config: ParserConfig,
    ) -> Parser<'a> {
        Parser::with_config(grammar, &self.table, config)
    }
}
