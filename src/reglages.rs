// src/reglages.rs
//
// Réglages utilisateur (facultatifs)
// ----------------------------------
// Fichier : <dossier config>/calculatrice-dec/reglages.toml
//
//   mode_angle = "radians"
//   chiffres_affichage = 12
//   largeur_affichage = 14
//   taille_historique = 100
//
// Contrats :
// - Fichier absent                 => valeurs par défaut (silencieux).
// - Fichier illisible ou invalide  => valeurs par défaut + warn!.
// - Valeurs hors bornes            => ramenées dans les bornes (garde-fous).

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Deserialize;

use crate::noyau::{AngleMode, ParametresSession, PRECISION_TRAVAIL};

const DOSSIER: &str = "calculatrice-dec";
const FICHIER: &str = "reglages.toml";

/// Garde-fous d’affichage : on n’affiche pas plus que la précision de travail.
const CHIFFRES_MIN: usize = 1;
const LARGEUR_MIN: usize = 6;
const LARGEUR_MAX: usize = 40;
const HISTORIQUE_MAX: usize = 500;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Reglages {
    pub mode_angle: AngleMode,
    pub chiffres_affichage: usize,
    pub largeur_affichage: usize,
    pub taille_historique: usize,
}

impl Default for Reglages {
    fn default() -> Self {
        Self {
            mode_angle: AngleMode::Degrees,
            chiffres_affichage: 10,
            largeur_affichage: 10,
            taille_historique: 50,
        }
    }
}

impl Reglages {
    /// Chemin du fichier (None si le système n’a pas de dossier de config, ex. wasm).
    pub fn chemin() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(DOSSIER).join(FICHIER))
    }

    /// Charge depuis l’emplacement standard ; n’échoue jamais.
    pub fn charger() -> Self {
        match Self::chemin() {
            Some(p) => Self::charger_depuis(&p),
            None => Self::default(),
        }
    }

    pub fn charger_depuis(chemin: &Path) -> Self {
        let texte = match fs::read_to_string(chemin) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                warn!("réglages illisibles ({}) : {e}", chemin.display());
                return Self::default();
            }
        };

        match Self::depuis_toml(&texte) {
            Ok(r) => {
                info!("réglages chargés depuis {}", chemin.display());
                r
            }
            Err(e) => {
                warn!("réglages invalides ({}) : {e}", chemin.display());
                Self::default()
            }
        }
    }

    pub fn depuis_toml(texte: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<Reglages>(texte).map(Reglages::bornes)
    }

    /// Ramène chaque valeur dans ses bornes.
    pub fn bornes(self) -> Self {
        Self {
            mode_angle: self.mode_angle,
            chiffres_affichage: self.chiffres_affichage.clamp(CHIFFRES_MIN, PRECISION_TRAVAIL),
            largeur_affichage: self.largeur_affichage.clamp(LARGEUR_MIN, LARGEUR_MAX),
            taille_historique: self.taille_historique.clamp(1, HISTORIQUE_MAX),
        }
    }

    pub fn parametres_session(&self) -> ParametresSession {
        ParametresSession {
            mode_angle: self.mode_angle,
            chiffres: self.chiffres_affichage,
            largeur: self.largeur_affichage,
            taille_historique: self.taille_historique,
        }
    }
}
