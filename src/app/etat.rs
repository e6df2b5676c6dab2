//! src/app/etat.rs
//!
//! État UI (sans vue).
//!
//! Rôle : envelopper la `Session` du noyau et garder ce qui n’appartient qu’à
//! l’écran (message d’erreur).
//!
//! Contrats :
//! - Aucune évaluation ici : tout passe par `Session::appuyer`.
//! - Une erreur ne fait qu’afficher un message ; l’état du noyau reste intact.

use log::debug;

use crate::noyau::{Session, Touche};
use crate::reglages::Reglages;

#[derive(Clone, Debug, Default)]
pub struct AppCalc {
    pub session: Session,

    // message d’erreur (vide = pas d’erreur)
    pub erreur: String,
}

impl AppCalc {
    pub fn new(reglages: &Reglages) -> Self {
        Self {
            session: Session::new(reglages.parametres_session()),
            ..Self::default()
        }
    }

    /// Une touche (bouton ou clavier physique).
    ///
    /// Choix UX : l’erreur reste affichée jusqu’à la touche suivante, qui l’efface.
    pub fn appuyer(&mut self, touche: Touche) {
        self.erreur.clear();
        if let Err(e) = self.session.appuyer(touche) {
            debug!("touche {touche:?} : {e}");
            self.erreur = format!("Erreur : {e}");
        }
    }

    /// Ligne d’expression avec le curseur visible ("_").
    pub fn ligne_expression(&self) -> String {
        let (avant, apres) = self.session.tampon().autour_du_curseur();
        if self.session.en_post_evaluation() {
            format!("{avant}{apres}")
        } else {
            format!("{avant}_{apres}")
        }
    }

    /// Ligne résultat : l’erreur prime sur l’écran.
    pub fn ligne_resultat(&self) -> &str {
        if self.erreur.is_empty() {
            self.session.affichage()
        } else {
            &self.erreur
        }
    }

    /// Indicateurs d’état : SHIFT, DEG/RAD, M.
    pub fn indicateurs(&self) -> String {
        let etat = self.session.etat();
        let mut parts = Vec::new();
        if etat.shift_on {
            parts.push("SHIFT");
        }
        parts.push(etat.angle_mode.libelle());
        if self.session.memoire_active() {
            parts.push("M");
        }
        parts.join("  ")
    }
}
