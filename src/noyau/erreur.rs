//! Erreurs du noyau.
//!
//! Trois familles, du texte vers la valeur :
//! - `LexError`    : caractère inconnu ou nombre mal formé (jetons.rs)
//! - `SyntaxError` : parenthèses, opérateur final, entrée vide (rpn.rs)
//! - `EvalError`   : pile, domaine, division par zéro (eval.rs)
//!
//! `EvalError` enveloppe les deux autres (`#[from]`) : `evaluate` n’a qu’un
//! seul type d’erreur et `?` suffit partout dans le pipeline.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("caractère inattendu '{ch}' (position {position})")]
    UnexpectedChar { ch: char, position: usize },

    /// Ex: "3." (point sans décimales).
    #[error("nombre mal formé \"{text}\" (position {position})")]
    MalformedNumber { text: String, position: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("parenthèses non appariées")]
    UnmatchedParen,

    #[error("opérateur sans opérande à droite")]
    TrailingOperator,

    #[error("entrée vide")]
    EmptyExpression,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("opérande manquant")]
    StackUnderflow,

    /// Il reste zéro ou plusieurs valeurs sur la pile à la fin.
    #[error("expression invalide")]
    MalformedExpression,

    #[error("division par zéro")]
    DivisionByZero,

    #[error("hors domaine : {0}")]
    DomainError(&'static str),

    /// Garde-fou : exposant ou mantisse hors bornes (voir decimal::EXPOSANT_MAX).
    #[error("dépassement de capacité")]
    Overflow,
}
