// src/noyau/session.rs
//
// Session clavier : la calculatrice “sans écran”.
//
// Une touche = une transition. La session possède tout l’état mutable
// (moteur, tampon d’édition, historique, format d’affichage) ; la vue egui
// ne fait que lui passer des `Touche` et relire l’écran.
//
// Modes :
// - normal            : les touches texte passent par `edit(Insert)`
// - post-évaluation   : juste après "=" ou en consultant l’historique ;
//                       la première touche décide (format / "Ans op" / repartir de zéro)

use std::collections::VecDeque;
use std::sync::OnceLock;

use log::debug;
use regex::Regex;

use super::decimal::Decimal;
use super::edition::{edit, EditAction, EditBuffer};
use super::erreur::EvalError;
use super::etat::{AngleMode, EvaluatorState};
use super::eval::{evaluate_detaille, Demarche};
use super::format::{formater, FormatAffichage};

/// Écran résultat au repos.
const AFFICHAGE_REPOS: &str = "0";

/// Touches qui, après "=", enchaînent sur le résultat : "Ans " + touche.
const TOUCHES_ENCHAINEES: &[Touche] = &[
    Touche::Plus,
    Touche::Moins,
    Touche::Fois,
    Touche::Divise,
    Touche::Puissance,
    Touche::Pourcent,
    Touche::Carre,
    Touche::Cube,
    Touche::Inverse,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Touche {
    Chiffre(u8),
    Point,
    ParenOuvrante,
    ParenFermante,

    Plus,
    Moins,
    Negatif,
    Fois,
    Divise,
    Puissance,
    Pourcent,

    Carre,
    Cube,
    Racine,
    Inverse,
    Sin,
    Cos,
    Tan,
    Log,
    Ans,

    Shift,
    Egal,
    Fraction,
    Degre,
    Supprimer,
    ToutEffacer,
    Gauche,
    Droite,
    HistoriqueHaut,
    HistoriqueBas,
    ModeAngle,

    MemoirePlus,
    MemoireMoins,
    MemoireRappel,
    MemoireEfface,
}

impl Touche {
    /// Texte inséré par la touche (None : touche de commande).
    ///
    /// Les fonctions trig/log dépendent de Shift : sin -> sin⁻¹, log -> ln.
    pub fn texte(self, shift: bool) -> Option<String> {
        let s = match self {
            Touche::Chiffre(n) if n <= 9 => return Some(char::from(b'0' + n).to_string()),
            Touche::Chiffre(_) => return None,
            Touche::Point => ".",
            Touche::ParenOuvrante => "( ",
            Touche::ParenFermante => " )",
            Touche::Plus => "+",
            Touche::Moins => "-",
            // pas de moins unaire : le négatif s’écrit (0-x), à refermer par ")"
            Touche::Negatif => "( 0-",
            Touche::Fois => "×",
            Touche::Divise => "÷",
            Touche::Puissance => "^",
            Touche::Pourcent => "%",
            Touche::Carre => "²",
            Touche::Cube => "³",
            Touche::Racine => "√",
            Touche::Inverse => "⁻¹",
            Touche::Sin if shift => "sin⁻¹ ",
            Touche::Sin => "sin ",
            Touche::Cos if shift => "cos⁻¹ ",
            Touche::Cos => "cos ",
            Touche::Tan if shift => "tan⁻¹ ",
            Touche::Tan => "tan ",
            Touche::Log if shift => "ln ",
            Touche::Log => "log ",
            Touche::Ans => "Ans ",
            _ => return None,
        };
        Some(s.to_string())
    }

    /// Libellé du bouton (dépend aussi de Shift).
    pub fn libelle(self, shift: bool) -> String {
        match self {
            Touche::Shift => "SHIFT".into(),
            Touche::Egal => "=".into(),
            Touche::Fraction => "a/b".into(),
            Touche::Degre => "°′″".into(),
            Touche::Supprimer => "DEL".into(),
            Touche::ToutEffacer => "AC".into(),
            Touche::Gauche => "◀".into(),
            Touche::Droite => "▶".into(),
            Touche::HistoriqueHaut => "▲".into(),
            Touche::HistoriqueBas => "▼".into(),
            Touche::ModeAngle => "DRG".into(),
            Touche::MemoirePlus => "M+".into(),
            Touche::MemoireMoins => "M−".into(),
            Touche::MemoireRappel => "MR".into(),
            Touche::MemoireEfface => "MC".into(),
            Touche::Negatif => "(−)".into(),
            Touche::ParenOuvrante => "(".into(),
            Touche::ParenFermante => ")".into(),
            Touche::Carre => "x²".into(),
            Touche::Cube => "x³".into(),
            Touche::Inverse => "x⁻¹".into(),
            autre => autre
                .texte(shift)
                .map(|t| t.trim().to_string())
                .unwrap_or_default(),
        }
    }
}

/// Une ligne d’historique : expression telle que tapée + valeur exacte + écran.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntreeHistorique {
    pub expression: String,
    pub valeur: Decimal,
    pub affichage: String,
}

/// Paramètres d’une session (issus des réglages).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParametresSession {
    pub mode_angle: AngleMode,
    pub chiffres: usize,
    pub largeur: usize,
    pub taille_historique: usize,
}

impl Default for ParametresSession {
    fn default() -> Self {
        Self {
            mode_angle: AngleMode::Degrees,
            chiffres: 10,
            largeur: 10,
            taille_historique: 50,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Session {
    etat: EvaluatorState,
    tampon: EditBuffer,
    params: ParametresSession,

    vient_d_evaluer: bool,
    consulte_historique: bool,

    historique: VecDeque<EntreeHistorique>,
    position_historique: Option<usize>,

    // écran résultat
    valeur_affichee: Option<Decimal>,
    format: FormatAffichage,
    affichage: String,
    demarche: Demarche,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(ParametresSession::default())
    }
}

impl Session {
    pub fn new(params: ParametresSession) -> Self {
        Self {
            etat: EvaluatorState::new(params.mode_angle),
            tampon: EditBuffer::new(),
            params,
            vient_d_evaluer: false,
            consulte_historique: false,
            historique: VecDeque::new(),
            position_historique: None,
            valeur_affichee: None,
            format: FormatAffichage::Decimal,
            affichage: AFFICHAGE_REPOS.to_string(),
            demarche: Demarche::default(),
        }
    }

    /* ------------------------ Lecture (pour la vue) ------------------------ */

    pub fn tampon(&self) -> &EditBuffer {
        &self.tampon
    }

    pub fn etat(&self) -> &EvaluatorState {
        &self.etat
    }

    pub fn affichage(&self) -> &str {
        &self.affichage
    }

    pub fn demarche(&self) -> &Demarche {
        &self.demarche
    }

    pub fn format(&self) -> FormatAffichage {
        self.format
    }

    pub fn historique(&self) -> impl Iterator<Item = &EntreeHistorique> {
        self.historique.iter()
    }

    pub fn en_post_evaluation(&self) -> bool {
        self.vient_d_evaluer || self.consulte_historique
    }

    /// Indicateur "M" : registre non nul.
    pub fn memoire_active(&self) -> bool {
        !self.etat.memoire.is_zero()
    }

    /* ------------------------ Transitions ------------------------ */

    /// Applique une touche. Seules "=" et M+/M− peuvent échouer ; en cas
    /// d’erreur, tampon, historique et Ans restent tels quels.
    pub fn appuyer(&mut self, touche: Touche) -> Result<(), EvalError> {
        // ▲ ▼ et DEL gardent la position dans l’historique
        if !matches!(
            touche,
            Touche::HistoriqueHaut | Touche::HistoriqueBas | Touche::Supprimer
        ) {
            self.position_historique = None;
        }

        match touche {
            Touche::Egal => return self.egal(),
            Touche::Shift => self.shift(),
            Touche::Supprimer => self.supprimer(),
            Touche::ToutEffacer => self.tout_effacer(),
            Touche::Gauche => self.deplacer(EditAction::MoveLeft),
            Touche::Droite => self.deplacer(EditAction::MoveRight),
            Touche::HistoriqueHaut => self.parcourir_historique(true),
            Touche::HistoriqueBas => self.parcourir_historique(false),
            Touche::ModeAngle => {
                self.etat.shift_on = false;
                self.etat.toggle_angle_mode();
            }
            Touche::Fraction | Touche::Degre => self.touche_format(touche),
            Touche::MemoirePlus => return self.memoire(true),
            Touche::MemoireMoins => return self.memoire(false),
            Touche::MemoireEfface => {
                self.etat.shift_on = false;
                self.etat.memory_clear();
            }
            Touche::MemoireRappel => {
                self.etat.shift_on = false;
                let texte = self.etat.memory_recall();
                self.saisir(touche, texte);
            }
            _ => {
                let shift = self.etat.shift_on;
                if let Some(texte) = touche.texte(shift) {
                    // une fonction consomme Shift, toute autre touche l’annule
                    self.etat.shift_on = false;
                    self.saisir(touche, texte);
                }
            }
        }
        Ok(())
    }

    /// Insertion d’un texte de touche, avec l’aiguillage post-évaluation.
    fn saisir(&mut self, touche: Touche, texte: String) {
        if !self.en_post_evaluation() {
            edit(&mut self.tampon, EditAction::Insert(texte));
            return;
        }

        self.tampon.vider();
        if TOUCHES_ENCHAINEES.contains(&touche) {
            edit(&mut self.tampon, EditAction::Insert("Ans ".to_string()));
        }
        edit(&mut self.tampon, EditAction::Insert(texte));

        self.quitter_post_evaluation();
    }

    fn quitter_post_evaluation(&mut self) {
        self.vient_d_evaluer = false;
        self.consulte_historique = false;
        if self.format != FormatAffichage::Decimal {
            self.format = FormatAffichage::Decimal;
            self.rafraichir_affichage();
        }
    }

    /// Fraction / °′″ : ne touchent qu’à l’écran, et seulement après "=".
    fn touche_format(&mut self, touche: Touche) {
        self.etat.shift_on = false;
        if !self.en_post_evaluation() {
            return;
        }
        let cible = match touche {
            Touche::Fraction => FormatAffichage::Fraction,
            _ => FormatAffichage::Dms,
        };
        self.format = self.format.basculer(cible);
        self.rafraichir_affichage();
    }

    fn rafraichir_affichage(&mut self) {
        if let Some(v) = &self.valeur_affichee {
            self.affichage = formater(v, self.format, self.params.chiffres, self.params.largeur);
        }
    }

    fn shift(&mut self) {
        // après "=", Shift repart d’une expression vide (shift-sin sur page blanche)
        if self.en_post_evaluation() {
            self.tampon.vider();
            self.vient_d_evaluer = false;
            self.consulte_historique = false;
        }
        self.etat.toggle_shift();
    }

    fn supprimer(&mut self) {
        if !self.vient_d_evaluer {
            // sur une ligne d’historique rappelée : on la corrige sur place
            self.consulte_historique = false;
            edit(&mut self.tampon, EditAction::DeleteBackward);
        }
        self.etat.shift_on = false;
    }

    fn tout_effacer(&mut self) {
        self.tampon.vider();
        self.vient_d_evaluer = false;
        self.consulte_historique = false;
        self.etat.shift_on = false;
        self.valeur_affichee = None;
        self.format = FormatAffichage::Decimal;
        self.affichage = AFFICHAGE_REPOS.to_string();
        self.demarche = Demarche::default();
    }

    fn deplacer(&mut self, action: EditAction) {
        self.etat.shift_on = false;
        edit(&mut self.tampon, action);
    }

    /// ▲ : dernière entrée puis remonte ; ▼ : première entrée puis descend ;
    /// les deux bouclent.
    fn parcourir_historique(&mut self, haut: bool) {
        let n = self.historique.len();
        if n == 0 {
            return;
        }
        let pos = match (self.position_historique, haut) {
            (None, true) => n - 1,
            (None, false) => 0,
            (Some(p), true) => (p + n - 1) % n,
            (Some(p), false) => (p + 1) % n,
        };
        self.position_historique = Some(pos);

        if let Some(entree) = self.historique.get(pos) {
            self.tampon = EditBuffer::avec_texte(&entree.expression);
            self.valeur_affichee = Some(entree.valeur.clone());
            self.affichage = entree.affichage.clone();
            self.format = FormatAffichage::Decimal;
        }
        self.vient_d_evaluer = false;
        self.consulte_historique = true;
    }

    /// "=" : évalue le tampon. Une fonction laissée sans argument reçoit Ans.
    fn egal(&mut self) -> Result<(), EvalError> {
        let mut expression = self.tampon.texte();
        if fonction_sans_argument(&expression) {
            expression = format!("{} Ans ", expression.trim_end());
        }

        let (valeur, demarche) = evaluate_detaille(&expression, &mut self.etat)?;

        let affichage = formater(
            &valeur,
            FormatAffichage::Decimal,
            self.params.chiffres,
            self.params.largeur,
        );
        debug!("{expression} = {affichage}");

        if expression != self.tampon.texte() {
            self.tampon = EditBuffer::avec_texte(&expression);
        }
        self.historique.push_back(EntreeHistorique {
            expression,
            valeur: valeur.clone(),
            affichage: affichage.clone(),
        });
        while self.historique.len() > self.params.taille_historique.max(1) {
            self.historique.pop_front();
        }
        self.position_historique = None;

        self.valeur_affichee = Some(valeur);
        self.format = FormatAffichage::Decimal;
        self.affichage = affichage;
        self.demarche = demarche;

        self.vient_d_evaluer = true;
        self.consulte_historique = false;
        Ok(())
    }

    /// M+ / M− : en saisie, "=" d’abord (trace dans l’historique) ; après "=",
    /// on réutilise directement Ans.
    fn memoire(&mut self, ajout: bool) -> Result<(), EvalError> {
        self.etat.shift_on = false;
        if !self.en_post_evaluation() && !self.tampon.texte().trim().is_empty() {
            self.egal()?;
        }
        if ajout {
            self.etat.memory_add("")
        } else {
            self.etat.memory_subtract("")
        }
    }
}

/// Le tampon finit-il par un nom de fonction sans argument ? ("2×sin ")
fn fonction_sans_argument(texte: &str) -> bool {
    static MOTIF: OnceLock<Option<Regex>> = OnceLock::new();
    MOTIF
        .get_or_init(|| Regex::new(r"(sin⁻¹|cos⁻¹|tan⁻¹|sin|cos|tan|log|ln)\s*$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(texte))
}
