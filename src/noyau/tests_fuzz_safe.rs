//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée
//! - budget temps global
//! - toute erreur est typée (jamais de panic)
//! - invariant clé : un échec ne touche pas à Ans

use std::time::{Duration, Instant};

use quickcheck::{QuickCheck, TestResult};

use super::decimal::Decimal;
use super::edition::{edit, EditAction, EditBuffer, JETONS_ATOMIQUES};
use super::erreur::EvalError;
use super::etat::{AngleMode, EvaluatorState};
use super::eval::evaluate;
use super::session::{Session, Touche};

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn choisir<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.pick(items.len() as u32) as usize]
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Génération d’expressions (bornée) ------------------------ */

fn gen_nombre(rng: &mut Rng) -> String {
    match rng.pick(6) {
        0 => "0".to_string(),
        1 => format!("{}", rng.pick(10)),
        2 => format!("{}.{}", rng.pick(100), rng.pick(1000)),
        3 => format!("{}", rng.pick(100_000)),
        4 => "Ans".to_string(),
        _ => format!("0.{:03}", rng.pick(1000)),
    }
}

fn gen_expr(rng: &mut Rng, depth: usize) -> String {
    const OPS: &[&str] = &["+", "-", "×", "÷", "^", "%"];
    const PREFIXES: &[&str] = &[
        "√", "sin", "cos", "tan", "sin⁻¹", "cos⁻¹", "tan⁻¹", "log", "ln",
    ];
    const POSTFIXES: &[&str] = &["²", "³", "⁻¹"];

    if depth == 0 {
        return gen_nombre(rng);
    }

    match rng.pick(6) {
        0 => gen_nombre(rng),
        1 | 2 => format!(
            "{}{}{}",
            gen_expr(rng, depth - 1),
            rng.choisir(OPS),
            gen_expr(rng, depth - 1)
        ),
        3 => format!("({})", gen_expr(rng, depth - 1)),
        // appel implicite : "sin 30"
        4 => {
            let f = rng.choisir(PREFIXES);
            if f == "√" {
                format!("√({})", gen_expr(rng, depth - 1))
            } else {
                format!("{f} {}", gen_nombre(rng))
            }
        }
        _ => format!("({}){}", gen_expr(rng, depth - 1), rng.choisir(POSTFIXES)),
    }
}

/// Expression “cassée” : on retire ou on duplique un caractère au hasard.
fn abimer(rng: &mut Rng, s: &str) -> String {
    let mut chars: Vec<char> = s.chars().collect();
    if chars.is_empty() {
        return String::new();
    }
    let i = rng.pick(chars.len() as u32) as usize;
    match rng.pick(3) {
        0 => {
            chars.remove(i);
        }
        1 => chars.insert(i, chars[i]),
        _ => chars.insert(i, '('),
    }
    chars.into_iter().collect()
}

/* ------------------------ Helper somme balancée ------------------------ */

fn somme_balancee(terme: &str, n: usize) -> String {
    let mut items: Vec<String> = (0..n).map(|_| terme.to_string()).collect();
    while items.len() > 1 {
        let mut next = Vec::new();
        let mut i = 0;
        while i < items.len() {
            if i + 1 < items.len() {
                next.push(format!("({}+{})", items[i], items[i + 1]));
                i += 2;
            } else {
                next.push(items[i].clone());
                i += 1;
            }
        }
        items = next;
    }
    items.pop().unwrap_or_else(|| "0".to_string())
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_determinisme_et_ans_preserve() {
    let t0 = Instant::now();
    let max = Duration::from_millis(2000);

    let mut rng = Rng::new(0xC0FFEE_u64);
    let mut st = EvaluatorState::default();
    st.last_answer = "12.5".parse().unwrap();

    let mut seen_ok = 0usize;
    let mut seen_err = 0usize;

    for _ in 0..300 {
        budget(t0, max);

        let expr = gen_expr(&mut rng, 4);
        let avant = st.last_answer.clone();

        // même entrée, même état => même sortie
        let mut jumeau = st.clone();
        let r1 = evaluate(&expr, &mut st);
        let r2 = evaluate(&expr, &mut jumeau);
        assert_eq!(r1, r2, "non déterministe: expr={expr:?}");

        match r1 {
            Ok(v) => {
                assert_eq!(st.last_answer, v);
                seen_ok += 1;
            }
            Err(e) => {
                // le générateur ne produit que du vocabulaire connu
                assert!(
                    !matches!(e, EvalError::Lex(_)),
                    "erreur lexicale inattendue: expr={expr:?} err={e}"
                );
                assert_eq!(st.last_answer, avant, "Ans modifié par un échec: {expr:?}");
                seen_err += 1;
            }
        }
    }

    // On veut voir un mix des deux, sinon le fuzz ne “balaye” rien.
    assert!(seen_ok > 30, "trop peu de succès: {seen_ok}");
    assert!(seen_err > 0, "aucune erreur vue: fuzz trop “sage”");
}

#[test]
fn fuzz_safe_expressions_abimees() {
    let t0 = Instant::now();
    let max = Duration::from_millis(2000);

    let mut rng = Rng::new(0xBADC0DE_u64);
    let mut st = EvaluatorState::new(AngleMode::Radians);

    for _ in 0..300 {
        budget(t0, max);

        let base = gen_expr(&mut rng, 3);
        let expr = abimer(&mut rng, &base);
        let avant = st.last_answer.clone();
        if evaluate(&expr, &mut st).is_err() {
            assert_eq!(st.last_answer, avant, "expr={expr:?}");
        }
    }
}

#[test]
fn fuzz_safe_somme_balancee() {
    let t0 = Instant::now();
    let max = Duration::from_millis(1000);

    let expr = somme_balancee("0.5", 800);
    let mut st = EvaluatorState::default();
    let v = evaluate(&expr, &mut st).unwrap_or_else(|e| panic!("err: {e}"));
    budget(t0, max);

    assert_eq!(v, Decimal::from(400));
}

#[test]
fn fuzz_safe_imbrication_profonde() {
    // pile explicite : pas de récursion, 5000 niveaux passent
    let n = 5000;
    let expr = format!("{}7{}", "(".repeat(n), ")".repeat(n));
    let mut st = EvaluatorState::default();
    assert_eq!(evaluate(&expr, &mut st), Ok(Decimal::from(7)));

    let expr = format!("{}7{}", "√(".repeat(200), ")".repeat(200));
    assert!(evaluate(&expr, &mut st).is_ok());
}

#[test]
fn fuzz_safe_explosions_bornees() {
    let t0 = Instant::now();
    let max = Duration::from_millis(2000);
    let mut st = EvaluatorState::default();

    for expr in [
        "10^5000×10^5000×10",
        "9^999999999",
        "2^99999999999999999999",
        "0.1^20000",
        format!("0.9999999{}", "²".repeat(40)).as_str(),
        format!("1.1{}", "³".repeat(40)).as_str(),
    ] {
        budget(t0, max);
        assert_eq!(
            evaluate(expr, &mut st),
            Err(EvalError::Overflow),
            "expr={expr:?}"
        );
    }
}

#[test]
fn fuzz_safe_session_touches_au_hasard() {
    const TOUCHES: &[Touche] = &[
        Touche::Chiffre(1),
        Touche::Chiffre(9),
        Touche::Point,
        Touche::ParenOuvrante,
        Touche::ParenFermante,
        Touche::Plus,
        Touche::Fois,
        Touche::Divise,
        Touche::Puissance,
        Touche::Carre,
        Touche::Inverse,
        Touche::Racine,
        Touche::Sin,
        Touche::Log,
        Touche::Ans,
        Touche::Shift,
        Touche::Egal,
        Touche::Egal,
        Touche::Fraction,
        Touche::Degre,
        Touche::Supprimer,
        Touche::Gauche,
        Touche::Droite,
        Touche::HistoriqueHaut,
        Touche::HistoriqueBas,
        Touche::ModeAngle,
        Touche::MemoirePlus,
        Touche::MemoireRappel,
        Touche::ToutEffacer,
    ];

    let t0 = Instant::now();
    let max = Duration::from_millis(2000);
    let mut rng = Rng::new(0x5E55_1011_u64);
    let mut s = Session::default();

    for _ in 0..3000 {
        budget(t0, max);
        let t = TOUCHES[rng.pick(TOUCHES.len() as u32) as usize];
        let avant = s.etat().last_answer.clone();
        if s.appuyer(t).is_err() {
            assert_eq!(s.etat().last_answer, avant, "touche={t:?}");
        }
        assert!(s.tampon().curseur() <= s.tampon().len());
    }
}

/* ------------------------ Propriétés (quickcheck) ------------------------ */

#[test]
fn quickcheck_evaluate_ne_panique_jamais() {
    fn prop(s: String) -> bool {
        let mut st = EvaluatorState::default();
        let avant = st.last_answer.clone();
        match evaluate(&s, &mut st) {
            Ok(v) => st.last_answer == v,
            Err(_) => st.last_answer == avant,
        }
    }
    QuickCheck::new()
        .tests(1000)
        .quickcheck(prop as fn(String) -> bool);
}

#[test]
fn quickcheck_entiers_exacts_comme_bigint() {
    use num_bigint::BigInt;

    fn prop(a: i64, b: i64, c: i32) -> TestResult {
        // pas de moins unaire : les négatifs s’écrivent (0-x)
        let t = |x: i64| {
            if x < 0 {
                format!("(0-{})", x.unsigned_abs())
            } else {
                x.to_string()
            }
        };
        let expr = format!("{}×{}-{}", t(a), t(b), t(c as i64));
        let mut st = EvaluatorState::default();
        let Ok(v) = evaluate(&expr, &mut st) else {
            return TestResult::failed();
        };
        let attendu = BigInt::from(a) * BigInt::from(b) - BigInt::from(c);
        TestResult::from_bool(v.to_string() == attendu.to_string())
    }
    QuickCheck::new()
        .tests(500)
        .quickcheck(prop as fn(i64, i64, i32) -> TestResult);
}

#[test]
fn quickcheck_del_sur_atome_retire_tout_l_atome() {
    fn prop(prefixe: u8, idx: usize) -> bool {
        let atome = JETONS_ATOMIQUES[idx % JETONS_ATOMIQUES.len()];
        let base = format!("{}", prefixe % 10);
        let mut b = EditBuffer::avec_texte(&base);
        edit(&mut b, EditAction::Insert(atome.to_string()));
        edit(&mut b, EditAction::DeleteBackward);
        b.texte() == base && b.curseur() == base.chars().count()
    }
    QuickCheck::new()
        .tests(200)
        .quickcheck(prop as fn(u8, usize) -> bool);
}
