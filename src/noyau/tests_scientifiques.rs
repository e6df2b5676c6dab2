//! Tests scientifiques (campagne) : propriétés du calculateur, bout en bout.
//!
//! But : vérifier les résultats “de cahier” sans faire chauffer la machine.
//! - budget temps global
//! - tailles bornées
//!
//! Notes (aligné avec l’état actuel du noyau) :
//! - ^ est associatif à gauche : 2^3^2 = 64.
//! - Pas de moins unaire : un négatif s’écrit (0-x).
//! - Trig / log / √ passent par f64 puis 16 chiffres : on compare avec une tolérance,
//!   ou via l’écran (10 chiffres), comme l’utilisateur le voit.

use std::time::{Duration, Instant};

use super::decimal::Decimal;
use super::erreur::{EvalError, SyntaxError};
use super::etat::{AngleMode, EvaluatorState};
use super::eval::evaluate;
use super::format::{formater, FormatAffichage};

fn eval_ok(expr: &str, st: &mut EvaluatorState) -> Decimal {
    evaluate(expr, st).unwrap_or_else(|e| panic!("expr={expr:?} err={e}"))
}

fn assert_exact_eq(expr: &str, attendu: &str) {
    let mut st = EvaluatorState::default();
    assert_eq!(eval_ok(expr, &mut st).to_string(), attendu, "expr={expr:?}");
}

/// Ce que l’écran montre (10 chiffres, largeur 10).
fn assert_ecran(expr: &str, mode: AngleMode, attendu: &str) {
    let mut st = EvaluatorState::new(mode);
    let v = eval_ok(expr, &mut st);
    assert_eq!(
        formater(&v, FormatAffichage::Decimal, 10, 10),
        attendu,
        "expr={expr:?}"
    );
}

fn assert_err(expr: &str, attendue: EvalError) {
    let mut st = EvaluatorState::default();
    assert_eq!(evaluate(expr, &mut st), Err(attendue), "expr={expr:?}");
}

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Arithmétique ------------------------ */

#[test]
fn sci_precedence_et_parentheses() {
    assert_exact_eq("2+3×4", "14");
    assert_exact_eq("(2+3)×4", "20");
    assert_exact_eq("10-4-3", "3");
    assert_exact_eq("100÷10÷5", "2");
    assert_exact_eq("2×(3+(4-1))×2", "24");
}

#[test]
fn sci_exactitude_decimale() {
    // aucun artefact binaire sur + − ×
    assert_exact_eq("0.1+0.2", "0.3");
    assert_exact_eq("2+3", "5");
    assert_exact_eq("1.1×1.1", "1.21");
    assert_exact_eq("0.3-0.1", "0.2");
    assert_exact_eq("123456789×987654321", "121932631112635269");
}

#[test]
fn sci_division_et_pourcentage() {
    assert_exact_eq("1÷3", "0.3333333333333333");
    assert_exact_eq("2÷3", "0.6666666666666667");
    assert_exact_eq("50%20", "10");
    assert_exact_eq("7÷8", "0.875");
}

#[test]
fn sci_puissances() {
    assert_exact_eq("2^10", "1024");
    assert_exact_eq("2^3^2", "64");
    assert_exact_eq("2^(0-2)", "0.25");
    assert_exact_eq("5^0", "1");
    // exposant fractionnaire : partie entière seulement
    assert_exact_eq("2^3.7", "8");
}

#[test]
fn sci_fonctions_postfixes_et_racine() {
    assert_exact_eq("√(9)", "3");
    assert_exact_eq("9²", "81");
    assert_exact_eq("8³", "512");
    assert_exact_eq("5⁻¹", "0.2");
    assert_exact_eq("(1+1)²³", "64");
    assert_exact_eq("√9+1", "4");
}

/* ------------------------ Trigonométrie ------------------------ */

#[test]
fn sci_trig_degres() {
    assert_ecran("sin 30", AngleMode::Degrees, "0.5");
    assert_ecran("cos 60", AngleMode::Degrees, "0.5");
    assert_ecran("tan 45", AngleMode::Degrees, "1");
    assert_ecran("sin⁻¹(1)", AngleMode::Degrees, "90");
    assert_ecran("cos⁻¹ 0", AngleMode::Degrees, "90");
    assert_ecran("tan⁻¹ 1", AngleMode::Degrees, "45");
}

#[test]
fn sci_trig_radians() {
    assert_ecran("sin 0", AngleMode::Radians, "0");
    assert_ecran("cos 0", AngleMode::Radians, "1");
    assert_ecran("sin⁻¹ 1", AngleMode::Radians, "1.57079633");
    assert_ecran("tan⁻¹ 1×4", AngleMode::Radians, "3.14159265");
}

#[test]
fn sci_appel_implicite_identique() {
    for (a, b) in [("sin 30", "sin(30)"), ("log 1000", "log(1000)"), ("ln 1", "ln(1)")] {
        let mut s1 = EvaluatorState::default();
        let mut s2 = EvaluatorState::default();
        assert_eq!(evaluate(a, &mut s1), evaluate(b, &mut s2), "{a} / {b}");
    }
}

#[test]
fn sci_logarithmes() {
    assert_ecran("log 1000", AngleMode::Degrees, "3");
    assert_ecran("log₁₀ 100", AngleMode::Degrees, "2");
    assert_ecran("ln 1", AngleMode::Degrees, "0");
    assert_ecran("ln(2.718281828459045)", AngleMode::Degrees, "1");
}

/* ------------------------ Erreurs ------------------------ */

#[test]
fn sci_erreurs_typees() {
    assert_err("5÷0", EvalError::DivisionByZero);
    assert_err("0⁻¹", EvalError::DivisionByZero);
    assert_err("(2+3", EvalError::Syntax(SyntaxError::UnmatchedParen));
    assert_err("2+3)", EvalError::Syntax(SyntaxError::UnmatchedParen));
    assert_err("2×", EvalError::Syntax(SyntaxError::TrailingOperator));
    assert_err("   ", EvalError::Syntax(SyntaxError::EmptyExpression));
    assert_err("×2", EvalError::StackUnderflow);
    assert_err("2 3", EvalError::MalformedExpression);

    let mut st = EvaluatorState::default();
    for expr in ["sin⁻¹(2)", "cos⁻¹(0-1.5)", "√(0-4)", "log 0", "ln(0-1)"] {
        assert!(
            matches!(evaluate(expr, &mut st), Err(EvalError::DomainError(_))),
            "expr={expr:?}"
        );
    }
}

/* ------------------------ Ans ------------------------ */

#[test]
fn sci_ans_enchaine() {
    let mut st = EvaluatorState::default();
    assert_eq!(eval_ok("5×5", &mut st), Decimal::from(25));
    assert_eq!(eval_ok("Ans+1", &mut st), Decimal::from(26));
    assert_eq!(eval_ok("Ans-30", &mut st), Decimal::from(-4));
    // négatif réinjecté comme (0-4)
    assert_eq!(eval_ok("Ans×Ans", &mut st), Decimal::from(16));
}

#[test]
fn sci_echec_preserve_ans() {
    let mut st = EvaluatorState::default();
    st.last_answer = Decimal::from(25);
    assert!(evaluate("5÷0", &mut st).is_err());
    assert_eq!(st.last_answer, Decimal::from(25));
    assert!(evaluate("sin⁻¹(Ans)", &mut st).is_err());
    assert_eq!(st.last_answer, Decimal::from(25));
}

/* ------------------------ Campagne : identités ------------------------ */

#[test]
fn sci_campagne_identites() {
    let t0 = Instant::now();
    let max = Duration::from_millis(2000);
    let mut st = EvaluatorState::default();

    for n in 1..=60i64 {
        budget(t0, max);

        // n² = n×n, exactement
        let carre = eval_ok(&format!("{n}²"), &mut st);
        assert_eq!(carre, Decimal::from(n * n));

        // (n⁻¹)⁻¹ revient à n à l’écran
        let v = eval_ok(&format!("({n}⁻¹)⁻¹"), &mut st);
        assert_eq!(formater(&v, FormatAffichage::Decimal, 10, 10), n.to_string());

        // sin² + cos² = 1 (écran)
        let v = eval_ok(&format!("(sin {n})²+(cos {n})²"), &mut st);
        assert_eq!(formater(&v, FormatAffichage::Decimal, 10, 10), "1");

        // √(n²) = n
        let v = eval_ok(&format!("√({n}²)"), &mut st);
        assert_eq!(v, Decimal::from(n));
    }
}
