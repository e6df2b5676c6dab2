//! Noyau : évaluation décimale (pipeline complet)
//!
//! "Ans" -> texte -> jetons -> appel implicite -> RPN -> pile de Decimal
//!
//! Contrats :
//! - Aucun panic : toute faute remonte en `EvalError`.
//! - Atomicité : `state.last_answer` n’est écrit qu’à la toute fin, après succès.
//! - + − × ² ³ exacts ; ÷ % ^ ⁻¹ à 16 chiffres ; √, trig, log via f64 puis 16 chiffres.

use log::{debug, warn};

use super::decimal::Decimal;
use super::erreur::EvalError;
use super::etat::{AngleMode, EvaluatorState};
use super::implicite::rewrite_implicit_calls;
use super::jetons::{format_tokens, tokenize, FunctionKind, OperatorKind, Token};
use super::rpn::to_rpn;

/// Trace lisible du pipeline (panneau “Démarche” de l’app).
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct Demarche {
    pub substitue: String,
    pub jetons: String,
    pub rpn: String,
}

/// API publique : évalue et met à jour `last_answer` (seulement si succès).
pub fn evaluate(expression: &str, state: &mut EvaluatorState) -> Result<Decimal, EvalError> {
    evaluate_detaille(expression, state).map(|(valeur, _d)| valeur)
}

/// Comme `evaluate`, avec la démarche (jetons + RPN).
pub fn evaluate_detaille(
    expression: &str,
    state: &mut EvaluatorState,
) -> Result<(Decimal, Demarche), EvalError> {
    // 1) Ans
    let texte = substituer_ans(expression, &state.last_answer);

    // 2) Jetons + appel implicite
    let jetons = rewrite_implicit_calls(&tokenize(&texte)?);
    let jetons_txt = format_tokens(&jetons);
    debug!("jetons: {jetons_txt}");

    // 3) RPN
    let rpn = to_rpn(&jetons)?;
    let rpn_txt = format_tokens(&rpn);
    debug!("rpn: {rpn_txt}");

    // 4) Pile
    let valeur = eval_rpn(&rpn, state.angle_mode)?;
    debug!("résultat: {valeur}");

    state.last_answer = valeur.clone();

    let d = Demarche {
        substitue: texte,
        jetons: jetons_txt,
        rpn: rpn_txt,
    };
    Ok((valeur, d))
}

/// Remplace chaque "Ans" littéral par la valeur précédente.
///
/// Substitution purement textuelle : un chiffre collé devant se soude au
/// nombre ("2Ans" avec Ans = 82 donne 282, pas 2×82).
pub fn substituer_ans(expression: &str, ans: &Decimal) -> String {
    expression.replace("Ans", &texte_operande(ans))
}

/// Texte d’une valeur réinjectée dans une expression.
/// Pas de moins unaire dans la grammaire : -5 devient "(0-5)".
pub fn texte_operande(v: &Decimal) -> String {
    if v.is_negative() {
        format!("(0-{})", v.abs())
    } else {
        v.to_string()
    }
}

/// Évalue une RPN avec une pile de Decimal.
pub fn eval_rpn(rpn: &[Token], mode: AngleMode) -> Result<Decimal, EvalError> {
    let mut st: Vec<Decimal> = Vec::with_capacity(rpn.len());

    for tok in rpn {
        let v = match tok {
            Token::Number(n) => n.clone(),

            Token::Operator(op) => {
                let b = st.pop().ok_or(EvalError::StackUnderflow)?;
                let a = st.pop().ok_or(EvalError::StackUnderflow)?;
                appliquer_operateur(&a, &b, *op)?
            }

            Token::Function(f) => {
                let a = st.pop().ok_or(EvalError::StackUnderflow)?;
                appliquer_fonction(&a, *f, mode)?
            }

            // Une RPN issue de to_rpn n’en contient jamais.
            Token::OpenParen | Token::CloseParen | Token::Comma => {
                return Err(EvalError::MalformedExpression);
            }
        };

        st.push(v.verifier_bornes()?);
    }

    match (st.pop(), st.is_empty()) {
        (Some(v), true) => Ok(v),
        _ => Err(EvalError::MalformedExpression),
    }
}

fn appliquer_operateur(a: &Decimal, b: &Decimal, op: OperatorKind) -> Result<Decimal, EvalError> {
    match op {
        OperatorKind::Add => Ok(a.ajouter(b)),
        OperatorKind::Sub => Ok(a.soustraire(b)),
        OperatorKind::Mul => Ok(a.multiplier(b)),
        OperatorKind::Div => a.diviser(b),
        OperatorKind::Percent => a.pourcentage(b),
        OperatorKind::Pow => {
            // Limite connue : exposant entier seulement (partie entière par défaut).
            let n = b.plancher_i64().ok_or(EvalError::Overflow)?;
            if !b.est_entier() {
                warn!("exposant fractionnaire {b} : seule la partie entière {n} est utilisée");
            }
            a.puissance(n)
        }
    }
}

fn appliquer_fonction(a: &Decimal, f: FunctionKind, mode: AngleMode) -> Result<Decimal, EvalError> {
    // angle saisi -> radians
    let vers_radians = |x: f64| match mode {
        AngleMode::Degrees => x.to_radians(),
        AngleMode::Radians => x,
    };
    // radians -> angle affiché
    let depuis_radians = |x: f64| match mode {
        AngleMode::Degrees => x.to_degrees(),
        AngleMode::Radians => x,
    };
    let dans_un = || a.abs() <= Decimal::un();

    match f {
        FunctionKind::Square => Ok(a.multiplier(a)),
        FunctionKind::Cube => Ok(a.multiplier(a).multiplier(a)),
        FunctionKind::Inverse => Decimal::un().diviser(a),

        FunctionKind::Sqrt => {
            if a.is_negative() {
                return Err(EvalError::DomainError("√ d’un nombre négatif"));
            }
            via_f64(a, f64::sqrt)
        }

        FunctionKind::Sin => via_f64(a, |x| vers_radians(x).sin()),
        FunctionKind::Cos => via_f64(a, |x| vers_radians(x).cos()),
        FunctionKind::Tan => via_f64(a, |x| vers_radians(x).tan()),

        FunctionKind::ArcSin => {
            if !dans_un() {
                return Err(EvalError::DomainError("sin⁻¹ hors de [-1, 1]"));
            }
            via_f64(a, |x| depuis_radians(x.asin()))
        }
        FunctionKind::ArcCos => {
            if !dans_un() {
                return Err(EvalError::DomainError("cos⁻¹ hors de [-1, 1]"));
            }
            via_f64(a, |x| depuis_radians(x.acos()))
        }
        FunctionKind::ArcTan => via_f64(a, |x| depuis_radians(x.atan())),

        FunctionKind::Log10 => {
            if a.is_negative() || a.is_zero() {
                return Err(EvalError::DomainError("log d’un nombre ≤ 0"));
            }
            via_f64(a, f64::log10)
        }
        FunctionKind::Ln => {
            if a.is_negative() || a.is_zero() {
                return Err(EvalError::DomainError("ln d’un nombre ≤ 0"));
            }
            via_f64(a, f64::ln)
        }
    }
}

/// Aller-retour flottant pour les fonctions transcendantes.
fn via_f64(a: &Decimal, f: impl Fn(f64) -> f64) -> Result<Decimal, EvalError> {
    let x = a.vers_f64();
    if !x.is_finite() {
        return Err(EvalError::DomainError("argument hors des flottants"));
    }
    Decimal::depuis_f64(f(x))
}
