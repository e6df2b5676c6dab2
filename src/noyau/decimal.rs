// src/noyau/decimal.rs
//
// Décimal exact en base 10 (pas de flottant binaire)
// --------------------------------------------------
// valeur = mantisse × 10^(-echelle)
//
// Contrats :
// - Toujours normalisé : mantisse sans zéro final, zéro = (0, 0).
//   => l’égalité structurelle (derive) est l’égalité des valeurs.
// - + − × exacts (aucun arrondi).
// - ÷, puissance, % : arrondis à PRECISION_TRAVAIL chiffres significatifs, HALF_UP.
// - f64 -> Decimal : toujours via PRECISION_TRAVAIL chiffres (0.1+0.2 en f64 -> 0.3).

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive, Zero};

use super::erreur::{EvalError, LexError};

/// Chiffres significatifs gardés par ÷, ^, % et les conversions f64.
pub const PRECISION_TRAVAIL: usize = 16;

/// Garde-fou : |exposant décimal| maximal d’un résultat intermédiaire.
pub const EXPOSANT_MAX: i64 = 10_000;

/// Garde-fou : taille maximale de la mantisse (≈ 21 000 chiffres).
/// × et ² sont exacts : sans borne, "0.9999999²²²²…" doublerait ses chiffres à chaque ².
const BITS_MANTISSE_MAX: u64 = 70_000;

/// Garde-fou : exposant entier maximal accepté par `^`.
const EXPOSANT_PUISSANCE_MAX: u64 = 999_999_999;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Decimal {
    mantisse: BigInt,
    echelle: i64,
}

/* ------------------------ Helpers BigInt ------------------------ */

fn pow10(n: u64) -> BigInt {
    BigInt::from(10).pow(n as u32)
}

fn nb_chiffres(m: &BigInt) -> usize {
    if m.is_zero() {
        1
    } else {
        m.magnitude().to_str_radix(10).len()
    }
}

impl Decimal {
    /* ------------------------ Construction ------------------------ */

    fn normaliser(mantisse: BigInt, echelle: i64) -> Self {
        if mantisse.is_zero() {
            return Self::zero();
        }

        // Un seul passage texte pour compter les zéros finaux (pas de boucle de /10).
        let txt = mantisse.magnitude().to_str_radix(10);
        let zeros = txt.len() - txt.trim_end_matches('0').len();
        if zeros == 0 {
            return Self { mantisse, echelle };
        }

        Self {
            mantisse: mantisse / pow10(zeros as u64),
            echelle: echelle - zeros as i64,
        }
    }

    pub fn zero() -> Self {
        Self {
            mantisse: BigInt::zero(),
            echelle: 0,
        }
    }

    pub fn un() -> Self {
        Self::from(1)
    }

    /* ------------------------ Inspection ------------------------ */

    pub fn is_zero(&self) -> bool {
        self.mantisse.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.mantisse.is_negative()
    }

    /// Normalisé : entier <=> échelle <= 0.
    pub fn est_entier(&self) -> bool {
        self.echelle <= 0
    }

    /// Exposant de la forme scientifique d.ddd × 10^e.
    pub fn exposant_ajuste(&self) -> i64 {
        if self.is_zero() {
            return 0;
        }
        nb_chiffres(&self.mantisse) as i64 - 1 - self.echelle
    }

    /// (négatif, chiffres de la mantisse, exposant ajusté) : matière première de
    /// l’affichage scientifique.
    pub fn chiffres_et_exposant(&self) -> (bool, String, i64) {
        (
            self.is_negative(),
            self.mantisse.magnitude().to_str_radix(10),
            self.exposant_ajuste(),
        )
    }

    /// Garde-fou anti-explosion (mémoire + texte “Ans” gigantesque).
    pub fn verifier_bornes(self) -> Result<Self, EvalError> {
        if self.exposant_ajuste().abs() > EXPOSANT_MAX || self.mantisse.bits() > BITS_MANTISSE_MAX {
            return Err(EvalError::Overflow);
        }
        Ok(self)
    }

    /* ------------------------ Arithmétique exacte ------------------------ */

    fn aligner(&self, autre: &Self) -> (BigInt, BigInt, i64) {
        let echelle = self.echelle.max(autre.echelle);
        let a = &self.mantisse * pow10((echelle - self.echelle) as u64);
        let b = &autre.mantisse * pow10((echelle - autre.echelle) as u64);
        (a, b, echelle)
    }

    pub fn ajouter(&self, autre: &Self) -> Self {
        let (a, b, echelle) = self.aligner(autre);
        Self::normaliser(a + b, echelle)
    }

    pub fn soustraire(&self, autre: &Self) -> Self {
        let (a, b, echelle) = self.aligner(autre);
        Self::normaliser(a - b, echelle)
    }

    pub fn multiplier(&self, autre: &Self) -> Self {
        Self::normaliser(&self.mantisse * &autre.mantisse, self.echelle + autre.echelle)
    }

    pub fn abs(&self) -> Self {
        Self {
            mantisse: self.mantisse.abs(),
            echelle: self.echelle,
        }
    }

    /// Partie entière vers zéro.
    pub fn tronque(&self) -> Self {
        if self.echelle <= 0 {
            return self.clone();
        }
        Self::normaliser(&self.mantisse / pow10(self.echelle as u64), 0)
    }

    /* ------------------------ Arithmétique arrondie ------------------------ */

    /// Arrondi HALF_UP à l’entier.
    pub fn arrondi_entier(&self) -> Self {
        if self.echelle <= 0 {
            return self.clone();
        }
        let precision = nb_chiffres(&self.mantisse) as i64 - self.echelle;
        if precision < 0 {
            // |x| < 0.1 : arrondit toujours vers 0
            return Self::zero();
        }
        if precision == 0 {
            // 0.1 <= |x| < 1 : dépend du premier chiffre
            let un = if self.is_negative() { Self::from(-1) } else { Self::un() };
            return if self.abs() >= Self::normaliser(BigInt::from(5), 1) {
                un
            } else {
                Self::zero()
            };
        }
        arrondir(self.mantisse.clone(), self.echelle, precision as usize)
    }

    /// Arrondi HALF_UP à `precision` chiffres significatifs.
    pub fn arrondi(&self, precision: usize) -> Self {
        arrondir(self.mantisse.clone(), self.echelle, precision.max(1))
    }

    /// a ÷ b à PRECISION_TRAVAIL chiffres, HALF_UP.
    pub fn diviser(&self, diviseur: &Self) -> Result<Self, EvalError> {
        if diviseur.is_zero() {
            return Err(EvalError::DivisionByZero);
        }
        if self.is_zero() {
            return Ok(Self::zero());
        }

        // Assez de chiffres pour que le quotient tronqué en ait > PRECISION_TRAVAIL :
        // la troncature suffit alors pour décider HALF_UP.
        let k = (PRECISION_TRAVAIL + 2 + nb_chiffres(&diviseur.mantisse)) as u64;
        let q = (&self.mantisse * pow10(k)) / &diviseur.mantisse;
        let echelle = self.echelle - diviseur.echelle + k as i64;

        Ok(arrondir(q, echelle, PRECISION_TRAVAIL))
    }

    /// a % b = a×b/100.
    pub fn pourcentage(&self, autre: &Self) -> Result<Self, EvalError> {
        self.multiplier(autre).diviser(&Self::from(100))
    }

    /// Puissance entière (exposant signé), arrondie à PRECISION_TRAVAIL chiffres.
    /// - 0^0 = 1
    /// - 0^(-n) : division par zéro
    pub fn puissance(&self, n: i64) -> Result<Self, EvalError> {
        if n == 0 {
            return Ok(Self::un());
        }
        let mut e = n.unsigned_abs();
        if e > EXPOSANT_PUISSANCE_MAX {
            return Err(EvalError::Overflow);
        }
        if self.is_zero() {
            return if n < 0 {
                Err(EvalError::DivisionByZero)
            } else {
                Ok(Self::zero())
            };
        }

        // Chiffres de garde pendant l’exponentiation rapide.
        let garde = PRECISION_TRAVAIL + e.to_string().len() + 1;

        let mut acc = Self::un();
        let mut base = self.clone();
        while e > 0 {
            if e & 1 == 1 {
                acc = acc.multiplier(&base).arrondi(garde).verifier_bornes()?;
            }
            e >>= 1;
            if e > 0 {
                base = base.multiplier(&base).arrondi(garde).verifier_bornes()?;
            }
        }

        let res = if n < 0 {
            Self::un().diviser(&acc)?
        } else {
            acc.arrondi(PRECISION_TRAVAIL)
        };
        res.verifier_bornes()
    }

    /* ------------------------ Conversions ------------------------ */

    /// Partie entière par défaut (floor), si elle tient dans un i64.
    pub fn plancher_i64(&self) -> Option<i64> {
        if self.echelle <= 0 {
            let entier = &self.mantisse * pow10(self.echelle.unsigned_abs());
            return entier.to_i64();
        }
        let d = pow10(self.echelle as u64);
        let mut q = &self.mantisse / &d;
        if self.is_negative() && !(&self.mantisse % &d).is_zero() {
            q -= 1;
        }
        q.to_i64()
    }

    /// Vers f64 (fonctions transcendantes). Peut donner ±inf : à vérifier par l’appelant.
    pub fn vers_f64(&self) -> f64 {
        format!("{}e{}", self.mantisse, -self.echelle)
            .parse::<f64>()
            .unwrap_or(f64::NAN)
    }

    /// Depuis f64, via PRECISION_TRAVAIL chiffres significatifs.
    pub fn depuis_f64(x: f64) -> Result<Self, EvalError> {
        if !x.is_finite() {
            return Err(EvalError::DomainError("résultat non fini"));
        }

        // "d.ddddddddddddddde-x" : la notation scientifique de Rust arrondit correctement.
        let txt = format!("{:.*e}", PRECISION_TRAVAIL - 1, x);
        let (mant, exp) = txt
            .split_once('e')
            .ok_or(EvalError::DomainError("flottant illisible"))?;
        let chiffres: String = mant.chars().filter(|c| *c != '.').collect();
        let mantisse = chiffres
            .parse::<BigInt>()
            .map_err(|_| EvalError::DomainError("flottant illisible"))?;
        let exp = exp
            .parse::<i64>()
            .map_err(|_| EvalError::DomainError("flottant illisible"))?;

        Ok(Self::normaliser(
            mantisse,
            (PRECISION_TRAVAIL as i64 - 1) - exp,
        ))
    }

    /// Conversion exacte (affichage fraction).
    pub fn vers_rationnel(&self) -> BigRational {
        if self.echelle <= 0 {
            BigRational::from_integer(&self.mantisse * pow10(self.echelle.unsigned_abs()))
        } else {
            BigRational::new(self.mantisse.clone(), pow10(self.echelle as u64))
        }
    }
}

/// HALF_UP sur la valeur absolue (donc symétrique autour de zéro).
fn arrondir(mantisse: BigInt, echelle: i64, precision: usize) -> Decimal {
    let n = nb_chiffres(&mantisse);
    if n <= precision {
        return Decimal::normaliser(mantisse, echelle);
    }

    let retire = n - precision;
    let diviseur = pow10(retire as u64);
    let negatif = mantisse.is_negative();
    let mag = mantisse.abs();

    let mut q = &mag / &diviseur;
    let r = &mag % &diviseur;
    if r * 2u32 >= diviseur {
        q += 1u32;
    }
    if negatif {
        q = -q;
    }

    Decimal::normaliser(q, echelle - retire as i64)
}

/* ------------------------ Traits ------------------------ */

impl From<i64> for Decimal {
    fn from(n: i64) -> Self {
        Self::normaliser(BigInt::from(n), 0)
    }
}

impl Default for Decimal {
    fn default() -> Self {
        Self::zero()
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b, _) = self.aligner(other);
        a.cmp(&b)
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Lecture d’un littéral : `-?chiffres(.chiffres)?`.
impl FromStr for Decimal {
    type Err = LexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mal_forme = || LexError::MalformedNumber {
            text: s.to_string(),
            position: 0,
        };

        let (negatif, corps) = match s.strip_prefix('-') {
            Some(reste) => (true, reste),
            None => (false, s),
        };
        let (entier, frac) = match corps.split_once('.') {
            Some((e, f)) => (e, f),
            None => (corps, ""),
        };

        let chiffres_ok = |t: &str| !t.is_empty() && t.chars().all(|c| c.is_ascii_digit());
        if !chiffres_ok(entier) || (corps.contains('.') && !chiffres_ok(frac)) {
            return Err(mal_forme());
        }

        let mut mantisse = format!("{entier}{frac}")
            .parse::<BigInt>()
            .map_err(|_| mal_forme())?;
        if negatif {
            mantisse = -mantisse;
        }

        Ok(Self::normaliser(mantisse, frac.len() as i64))
    }
}

/// Forme “plain” (jamais de notation scientifique), comme toPlainString.
impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let signe = if self.is_negative() { "-" } else { "" };
        let chiffres = self.mantisse.magnitude().to_str_radix(10);

        if self.echelle <= 0 {
            let zeros = "0".repeat(self.echelle.unsigned_abs() as usize);
            return write!(f, "{signe}{chiffres}{zeros}");
        }

        let echelle = self.echelle as usize;
        let chiffres = if chiffres.len() <= echelle {
            format!("{}{chiffres}", "0".repeat(echelle + 1 - chiffres.len()))
        } else {
            chiffres
        };
        let (entier, frac) = chiffres.split_at(chiffres.len() - echelle);
        write!(f, "{signe}{entier}.{frac}")
    }
}
