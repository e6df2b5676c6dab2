// src/noyau/jetons.rs
//
// Tokenisation : texte brut -> suite de Token.
//
// Priorité des motifs (plus long d’abord, pour éviter "sin" avant "sin⁻¹") :
// 1. noms composés  : sin⁻¹ cos⁻¹ tan⁻¹ log₁₀
// 2. fonctions      : sin cos tan log ln √ ² ³ ⁻¹
// 3. nombres        : chiffres ("." chiffres)?
// 4. opérateurs     : + - × ÷ ^ % ( ) ,   (et * / en ASCII)
// Les espaces séparent, sans autre sens.

use std::fmt;

use super::decimal::Decimal;
use super::erreur::LexError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Percent,
}

impl OperatorKind {
    /// Add/Sub = 1, Mul/Div/Percent = 2, Pow = 3.
    pub fn precedence(self) -> u8 {
        match self {
            OperatorKind::Add | OperatorKind::Sub => 1,
            OperatorKind::Mul | OperatorKind::Div | OperatorKind::Percent => 2,
            OperatorKind::Pow => 3,
        }
    }

    pub fn symbole(self) -> &'static str {
        match self {
            OperatorKind::Add => "+",
            OperatorKind::Sub => "-",
            OperatorKind::Mul => "×",
            OperatorKind::Div => "÷",
            OperatorKind::Pow => "^",
            OperatorKind::Percent => "%",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    Sqrt,
    Square,
    Cube,
    Inverse,
    Sin,
    Cos,
    Tan,
    ArcSin,
    ArcCos,
    ArcTan,
    Log10,
    Ln,
}

impl FunctionKind {
    /// ² ³ ⁻¹ s’écrivent APRÈS leur argument ("9²").
    pub fn est_postfixe(self) -> bool {
        matches!(
            self,
            FunctionKind::Square | FunctionKind::Cube | FunctionKind::Inverse
        )
    }

    pub fn symbole(self) -> &'static str {
        match self {
            FunctionKind::Sqrt => "√",
            FunctionKind::Square => "²",
            FunctionKind::Cube => "³",
            FunctionKind::Inverse => "⁻¹",
            FunctionKind::Sin => "sin",
            FunctionKind::Cos => "cos",
            FunctionKind::Tan => "tan",
            FunctionKind::ArcSin => "sin⁻¹",
            FunctionKind::ArcCos => "cos⁻¹",
            FunctionKind::ArcTan => "tan⁻¹",
            FunctionKind::Log10 => "log",
            FunctionKind::Ln => "ln",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    Number(Decimal),
    Operator(OperatorKind),
    Function(FunctionKind),
    OpenParen,
    CloseParen,
    Comma,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{n}"),
            Token::Operator(op) => f.write_str(op.symbole()),
            Token::Function(fun) => f.write_str(fun.symbole()),
            Token::OpenParen => f.write_str("("),
            Token::CloseParen => f.write_str(")"),
            Token::Comma => f.write_str(","),
        }
    }
}

/// Table unique des motifs textuels, triée du plus long au plus court
/// (en caractères) : la première correspondance gagne.
const MOTIFS: &[(&str, Token)] = &[
    ("sin⁻¹", Token::Function(FunctionKind::ArcSin)),
    ("cos⁻¹", Token::Function(FunctionKind::ArcCos)),
    ("tan⁻¹", Token::Function(FunctionKind::ArcTan)),
    ("log₁₀", Token::Function(FunctionKind::Log10)),
    ("sin", Token::Function(FunctionKind::Sin)),
    ("cos", Token::Function(FunctionKind::Cos)),
    ("tan", Token::Function(FunctionKind::Tan)),
    ("log", Token::Function(FunctionKind::Log10)),
    ("ln", Token::Function(FunctionKind::Ln)),
    ("⁻¹", Token::Function(FunctionKind::Inverse)),
    ("√", Token::Function(FunctionKind::Sqrt)),
    ("²", Token::Function(FunctionKind::Square)),
    ("³", Token::Function(FunctionKind::Cube)),
    ("+", Token::Operator(OperatorKind::Add)),
    ("-", Token::Operator(OperatorKind::Sub)),
    ("×", Token::Operator(OperatorKind::Mul)),
    ("*", Token::Operator(OperatorKind::Mul)),
    ("÷", Token::Operator(OperatorKind::Div)),
    ("/", Token::Operator(OperatorKind::Div)),
    ("^", Token::Operator(OperatorKind::Pow)),
    ("%", Token::Operator(OperatorKind::Percent)),
    ("(", Token::OpenParen),
    (")", Token::CloseParen),
    (",", Token::Comma),
];

fn commence_par(chars: &[char], i: usize, motif: &str) -> bool {
    let mut j = i;
    for c in motif.chars() {
        if j >= chars.len() || chars[j] != c {
            return false;
        }
        j += 1;
    }
    true
}

/// Tokenize une chaîne en jetons.
///
/// Échoue (`LexError`) sur un caractère hors vocabulaire ou un nombre mal formé
/// ("3." sans décimales). Positions = index en caractères.
pub fn tokenize(s: &str) -> Result<Vec<Token>, LexError> {
    let mut out = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i: usize = 0;

    'lecture: while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        // Nombre : chiffres, puis éventuellement "." + au moins un chiffre
        if c.is_ascii_digit() {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            if i < chars.len() && chars[i] == '.' {
                i += 1;
                let start_frac = i;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                if i == start_frac {
                    return Err(LexError::MalformedNumber {
                        text: chars[start..i].iter().collect(),
                        position: start,
                    });
                }
            }

            let texte: String = chars[start..i].iter().collect();
            let n = texte
                .parse::<Decimal>()
                .map_err(|_| LexError::MalformedNumber {
                    text: texte.clone(),
                    position: start,
                })?;
            out.push(Token::Number(n));
            continue;
        }

        for (motif, tok) in MOTIFS {
            if commence_par(&chars, i, motif) {
                out.push(tok.clone());
                i += motif.chars().count();
                continue 'lecture;
            }
        }

        return Err(LexError::UnexpectedChar { ch: c, position: i });
    }

    Ok(out)
}

/// Format utilitaire (debug) : liste de jetons en texte.
pub fn format_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(Token::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
