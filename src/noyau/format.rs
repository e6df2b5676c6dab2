// src/noyau/format.rs
//
// Affichage du résultat (l’évaluation garde la pleine précision, pas l’écran).
//
// Trois formats, basculés par les touches “fraction” et “°′″” après "=" :
// - Decimal  : N chiffres significatifs (HALF_UP), tient dans la largeur de l’écran
// - Fraction : meilleure approximation p/q avec q <= 1000 (fractions continues exactes)
// - Dms      : degrés° minutes′ secondes″

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};

use super::decimal::Decimal;

/// Dénominateur maximal de l’affichage fraction.
const DENOMINATEUR_MAX: u32 = 1000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatAffichage {
    #[default]
    Decimal,
    Fraction,
    Dms,
}

impl FormatAffichage {
    /// Bascule : même touche deux fois => retour au décimal.
    pub fn basculer(self, cible: FormatAffichage) -> FormatAffichage {
        if self == cible {
            FormatAffichage::Decimal
        } else {
            cible
        }
    }
}

/// API : texte à afficher pour `v`.
pub fn formater(v: &Decimal, format: FormatAffichage, chiffres: usize, largeur: usize) -> String {
    match format {
        FormatAffichage::Decimal => format_decimal(v, chiffres, largeur),
        FormatAffichage::Fraction => format_fraction(v),
        FormatAffichage::Dms => format_dms(v),
    }
}

/* ------------------------ Décimal ------------------------ */

fn format_decimal(v: &Decimal, chiffres: usize, largeur: usize) -> String {
    let chiffres = chiffres.max(1);
    let signe = usize::from(v.is_negative());
    let exp = v.exposant_ajuste();

    // Chiffres significatifs qui tiennent en forme “plain”
    let place = if exp >= 0 {
        // "ddd.fff" : exp+1 chiffres entiers + "." + décimales
        largeur as i64 - signe as i64 - 1
    } else {
        // "0.000ddd" : "0." + (-exp-1) zéros
        largeur as i64 - signe as i64 - 2 - (-exp - 1)
    };

    if place >= exp.max(0) + 1 {
        let sig = (place as usize).min(chiffres);
        let plain = v.arrondi(sig).to_string();
        if plain.chars().count() <= largeur {
            return plain;
        }
    }

    format_scientifique(v, chiffres, largeur)
}

/// "d.dddE-12" : on réduit la mantisse pour tenir dans la largeur.
fn format_scientifique(v: &Decimal, chiffres: usize, largeur: usize) -> String {
    let suffixe = format!("E{}", v.exposant_ajuste());
    let signe = usize::from(v.is_negative());
    let place = largeur.saturating_sub(signe + suffixe.len());
    let sig = place.saturating_sub(1).clamp(1, chiffres);

    // l’arrondi peut décaler l’exposant (9.99 -> 10.0) : on relit après coup
    let (negatif, mantisse, exp) = v.arrondi(sig).chiffres_et_exposant();
    let (tete, queue) = mantisse.split_at(1);

    let mut out = String::new();
    if negatif {
        out.push('-');
    }
    out.push_str(tete);
    if !queue.is_empty() {
        out.push('.');
        out.push_str(queue);
    }
    out.push_str(&format!("E{exp}"));
    out
}

/* ------------------------ Fraction ------------------------ */

fn format_fraction(v: &Decimal) -> String {
    let (p, q) = approximer_fraction(&v.vers_rationnel(), DENOMINATEUR_MAX);
    if q.is_one() {
        format!("{p}")
    } else {
        format!("{p}/{q}")
    }
}

/// Réduites successives de la fraction continue de `x`, tant que q <= den_max.
fn approximer_fraction(x: &BigRational, den_max: u32) -> (BigInt, BigInt) {
    let den_max = BigInt::from(den_max);

    let a0 = x.floor();
    let (mut p0, mut q0) = (BigInt::one(), BigInt::zero());
    let (mut p1, mut q1) = (a0.to_integer(), BigInt::one());
    let mut reste = x - a0;

    while !reste.is_zero() {
        let inv = reste.recip();
        let a = inv.floor().to_integer();

        let p2 = &a * &p1 + &p0;
        let q2 = &a * &q1 + &q0;
        if q2 > den_max {
            break;
        }

        p0 = std::mem::replace(&mut p1, p2);
        q0 = std::mem::replace(&mut q1, q2);
        reste = inv - BigRational::from_integer(a);
    }

    (p1, q1)
}

/* ------------------------ Degrés / minutes / secondes ------------------------ */

fn format_dms(v: &Decimal) -> String {
    let soixante = Decimal::from(60);
    let x = v.abs();

    let mut deg = x.tronque();
    let minutes_tot = x.soustraire(&deg).multiplier(&soixante);
    let mut min = minutes_tot.tronque();
    let mut sec = minutes_tot
        .soustraire(&min)
        .multiplier(&soixante)
        .arrondi_entier();

    // retenues 60″ -> 1′, 60′ -> 1°
    if sec >= soixante {
        sec = sec.soustraire(&soixante);
        min = min.ajouter(&Decimal::un());
    }
    if min >= soixante {
        min = min.soustraire(&soixante);
        deg = deg.ajouter(&Decimal::un());
    }

    let signe = if v.is_negative() && !(deg.is_zero() && min.is_zero() && sec.is_zero()) {
        "-"
    } else {
        ""
    };
    format!("{signe}{deg}° {min}′ {sec}″")
}
