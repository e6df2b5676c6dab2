//! État du moteur (une instance par session).
//!
//! Contrats :
//! - `last_answer` ne change QUE sur une évaluation réussie.
//! - `angle_mode` ne change QUE via `toggle_angle_mode` (jamais déduit de l’entrée).
//! - `shift_on` n’influence pas l’évaluation : il choisit la fonction émise par
//!   une touche (sin ou sin⁻¹, log ou ln).

use serde::Deserialize;

use super::decimal::Decimal;
use super::erreur::EvalError;
use super::eval::{evaluate, texte_operande};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleMode {
    #[default]
    Degrees,
    Radians,
}

impl AngleMode {
    pub fn libelle(self) -> &'static str {
        match self {
            AngleMode::Degrees => "DEG",
            AngleMode::Radians => "RAD",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct EvaluatorState {
    pub last_answer: Decimal,
    pub angle_mode: AngleMode,
    pub shift_on: bool,

    /// Registre mémoire (M+ / M− / MR / MC).
    pub memoire: Decimal,
}

impl EvaluatorState {
    pub fn new(angle_mode: AngleMode) -> Self {
        Self {
            angle_mode,
            ..Self::default()
        }
    }

    pub fn toggle_angle_mode(&mut self) {
        self.angle_mode = match self.angle_mode {
            AngleMode::Degrees => AngleMode::Radians,
            AngleMode::Radians => AngleMode::Degrees,
        };
    }

    pub fn toggle_shift(&mut self) {
        self.shift_on = !self.shift_on;
    }

    /// M+ : évalue d’abord l’expression en attente (si non vide), puis ajoute Ans.
    pub fn memory_add(&mut self, en_attente: &str) -> Result<(), EvalError> {
        self.evaluer_si_besoin(en_attente)?;
        self.memoire = self.memoire.ajouter(&self.last_answer);
        Ok(())
    }

    /// M− : comme M+, mais soustrait Ans.
    pub fn memory_subtract(&mut self, en_attente: &str) -> Result<(), EvalError> {
        self.evaluer_si_besoin(en_attente)?;
        self.memoire = self.memoire.soustraire(&self.last_answer);
        Ok(())
    }

    /// MR : texte prêt à insérer dans l’expression.
    pub fn memory_recall(&self) -> String {
        texte_operande(&self.memoire)
    }

    pub fn memory_clear(&mut self) {
        self.memoire = Decimal::zero();
    }

    fn evaluer_si_besoin(&mut self, en_attente: &str) -> Result<(), EvalError> {
        if !en_attente.trim().is_empty() {
            evaluate(en_attente, self)?;
        }
        Ok(())
    }
}
