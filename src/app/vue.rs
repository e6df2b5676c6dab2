// src/app/vue.rs
//
// Vue (UI egui) : natif + web
// ---------------------------
// Objectifs :
// - Même AppCalc (etat.rs) pour natif + wasm
// - Pavé de touches : chaque bouton envoie une `Touche` à la session
// - Clavier physique : chiffres/opérateurs tapés, Enter "=", Backspace DEL,
//   flèches curseur/historique, Escape AC
//
// Note :
// - PAS de Key::NumEnter (n’existe pas dans egui 0.33.x)

use eframe::egui;

use super::etat::AppCalc;
use crate::noyau::Touche;

/// Pavé, ligne par ligne (5 colonnes).
const PAVE: &[&[Touche]] = &[
    &[
        Touche::Shift,
        Touche::ModeAngle,
        Touche::HistoriqueHaut,
        Touche::HistoriqueBas,
        Touche::ToutEffacer,
    ],
    &[
        Touche::Sin,
        Touche::Cos,
        Touche::Tan,
        Touche::Log,
        Touche::Supprimer,
    ],
    &[
        Touche::Racine,
        Touche::Carre,
        Touche::Cube,
        Touche::Inverse,
        Touche::Puissance,
    ],
    &[
        Touche::ParenOuvrante,
        Touche::ParenFermante,
        Touche::Fraction,
        Touche::Degre,
        Touche::Pourcent,
    ],
    &[
        Touche::MemoirePlus,
        Touche::MemoireMoins,
        Touche::MemoireRappel,
        Touche::MemoireEfface,
        Touche::Gauche,
    ],
    &[
        Touche::Chiffre(7),
        Touche::Chiffre(8),
        Touche::Chiffre(9),
        Touche::Divise,
        Touche::Droite,
    ],
    &[
        Touche::Chiffre(4),
        Touche::Chiffre(5),
        Touche::Chiffre(6),
        Touche::Fois,
        Touche::Ans,
    ],
    &[
        Touche::Chiffre(1),
        Touche::Chiffre(2),
        Touche::Chiffre(3),
        Touche::Moins,
        Touche::Negatif,
    ],
    &[
        Touche::Chiffre(0),
        Touche::Point,
        Touche::Egal,
        Touche::Plus,
    ],
];

impl AppCalc {
    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        // Densité “calc”
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        self.clavier_physique(ui);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading("Calculatrice décimale");
                ui.add_space(6.0);

                self.ui_ecran(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_pave(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_demarche(ui);
            });
    }

    fn ui_ecran(&mut self, ui: &mut egui::Ui) {
        ui.monospace(self.indicateurs());

        let expr = self.ligne_expression();
        Self::champ_monospace(ui, "ecran_expression", &expr, 1);

        ui.add_space(4.0);

        let resultat = self.ligne_resultat().to_string();
        if self.erreur.is_empty() {
            Self::champ_monospace(ui, "ecran_resultat", &resultat, 1);
        } else {
            ui.colored_label(ui.visuals().error_fg_color, resultat);
        }
    }

    fn ui_pave(&mut self, ui: &mut egui::Ui) {
        let shift = self.session.etat().shift_on;

        egui::Grid::new("pave_calculatrice")
            .num_columns(5)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                for ligne in PAVE {
                    for &touche in *ligne {
                        let resp = ui.add_sized(
                            [64.0, 34.0],
                            egui::Button::new(touche.libelle(shift)),
                        );
                        if resp.clicked() {
                            self.appuyer(touche);
                        }
                    }
                    ui.end_row();
                }
            });
    }

    fn ui_demarche(&mut self, ui: &mut egui::Ui) {
        let d = self.session.demarche().clone();
        egui::CollapsingHeader::new("Démarche")
            .default_open(false)
            .show(ui, |ui| {
                Self::champ_demarche(ui, "Substitué", "demarche_subst", &d.substitue);
                Self::champ_demarche(ui, "Jetons", "demarche_jetons", &d.jetons);
                Self::champ_demarche(ui, "RPN", "demarche_rpn", &d.rpn);

                ui.add_space(4.0);
                ui.label("Historique :");
                let lignes: Vec<String> = self
                    .session
                    .historique()
                    .map(|h| format!("{} = {}", h.expression.trim(), h.affichage))
                    .collect();
                Self::champ_monospace(ui, "historique", &lignes.join("\n"), 3);
            });
    }

    fn champ_demarche(ui: &mut egui::Ui, titre: &str, id: &str, contenu: &str) {
        ui.add_space(4.0);
        ui.label(format!("{titre} :"));
        Self::champ_monospace(ui, id, contenu, 1);
    }

    fn champ_monospace(ui: &mut egui::Ui, id: &str, contenu: &str, rows: usize) {
        // Affichage lecture seule “stable”, sans TextEdit interactif.
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.push_id(id, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.set_min_height(
                        rows as f32 * ui.text_style_height(&egui::TextStyle::Monospace),
                    );
                    ui.monospace(contenu);
                });
            });
    }

    /// Clavier physique -> touches.
    fn clavier_physique(&mut self, ui: &mut egui::Ui) {
        let touches: Vec<Touche> = ui.input(|i| {
            let mut out = Vec::new();
            for ev in &i.events {
                match ev {
                    egui::Event::Text(t) => out.extend(t.chars().filter_map(touche_du_caractere)),
                    egui::Event::Key {
                        key, pressed: true, ..
                    } => out.extend(touche_de_la_cle(*key)),
                    _ => {}
                }
            }
            out
        });

        for t in touches {
            self.appuyer(t);
        }
    }
}

fn touche_du_caractere(c: char) -> Option<Touche> {
    Some(match c {
        '0'..='9' => Touche::Chiffre(c as u8 - b'0'),
        '.' | ',' => Touche::Point,
        '(' => Touche::ParenOuvrante,
        ')' => Touche::ParenFermante,
        '+' => Touche::Plus,
        '-' => Touche::Moins,
        '*' | '×' => Touche::Fois,
        '/' | '÷' => Touche::Divise,
        '^' => Touche::Puissance,
        '%' => Touche::Pourcent,
        '²' => Touche::Carre,
        '³' => Touche::Cube,
        '=' => Touche::Egal,
        's' => Touche::Sin,
        'c' => Touche::Cos,
        't' => Touche::Tan,
        'l' => Touche::Log,
        'r' => Touche::Racine,
        'a' => Touche::Ans,
        _ => return None,
    })
}

/// Touches sans texte : ◀ ▶ curseur, ▲ ▼ historique.
fn touche_de_la_cle(key: egui::Key) -> Option<Touche> {
    Some(match key {
        egui::Key::Enter => Touche::Egal,
        egui::Key::Backspace => Touche::Supprimer,
        egui::Key::Escape => Touche::ToutEffacer,
        egui::Key::ArrowLeft => Touche::Gauche,
        egui::Key::ArrowRight => Touche::Droite,
        egui::Key::ArrowUp => Touche::HistoriqueHaut,
        egui::Key::ArrowDown => Touche::HistoriqueBas,
        _ => return None,
    })
}
