//! Noyau décimal
//!
//! Organisation interne :
//! - decimal.rs    : Decimal base 10 (mantisse BigInt), arrondi HALF_UP
//! - jetons.rs     : tokenisation (table de motifs, le plus long d’abord)
//! - implicite.rs  : "sin 30" -> "sin(30)"
//! - rpn.rs        : shunting-yard
//! - eval.rs       : pipeline complet + pile RPN
//! - etat.rs       : Ans, mode d’angle, Shift, mémoire
//! - edition.rs    : tampon + curseur, jetons atomiques
//! - format.rs     : écran résultat (décimal, fraction, °′″)
//! - session.rs    : touches -> transitions (sans UI)
//! - erreur.rs     : LexError / SyntaxError / EvalError

pub mod decimal;
pub mod edition;
pub mod erreur;
pub mod etat;
pub mod eval;
pub mod format;
pub mod implicite;
pub mod jetons;
pub mod rpn;
pub mod session;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique
pub use decimal::{Decimal, PRECISION_TRAVAIL};
pub use edition::{edit, EditAction, EditBuffer};
pub use erreur::{EvalError, LexError, SyntaxError};
pub use etat::{AngleMode, EvaluatorState};
pub use eval::{evaluate, evaluate_detaille, Demarche};
pub use format::{formater, FormatAffichage};
pub use jetons::{tokenize, FunctionKind, OperatorKind, Token};
pub use session::{EntreeHistorique, ParametresSession, Session, Touche};
