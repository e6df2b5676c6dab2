// src/noyau/edition.rs
//
// Édition au curseur avec jetons atomiques.
//
// Le tampon contient le texte tel que le clavier l’écrit ("sin⁻¹ ", "Ans ", "( "…).
// Ces motifs multi-caractères sont indivisibles : DEL les retire d’un bloc, les
// flèches les sautent, l’insertion sur leur début les remplace en entier.
//
// Curseur = index en CARACTÈRES (pas en octets) : 0 <= curseur <= longueur.

/// Jetons atomiques, du plus long au plus court (en caractères) :
/// la première correspondance gagne.
pub const JETONS_ATOMIQUES: &[&str] = &[
    "sin⁻¹ ", "cos⁻¹ ", "tan⁻¹ ", "sin ", "cos ", "tan ", "log ", "Ans ", "ln ", "₁₀ ", "⁻¹",
    "( ", " )",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditAction {
    Insert(String),
    DeleteBackward,
    MoveLeft,
    MoveRight,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditBuffer {
    texte: Vec<char>,
    curseur: usize,
}

impl EditBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tampon pré-rempli, curseur en fin (rappel d’historique).
    pub fn avec_texte(texte: &str) -> Self {
        let texte: Vec<char> = texte.chars().collect();
        let curseur = texte.len();
        Self { texte, curseur }
    }

    pub fn texte(&self) -> String {
        self.texte.iter().collect()
    }

    pub fn curseur(&self) -> usize {
        self.curseur
    }

    pub fn len(&self) -> usize {
        self.texte.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texte.is_empty()
    }

    pub fn vider(&mut self) {
        self.texte.clear();
        self.curseur = 0;
    }

    /// (avant, après) le curseur : pour dessiner le curseur dans la vue.
    pub fn autour_du_curseur(&self) -> (String, String) {
        (
            self.texte[..self.curseur].iter().collect(),
            self.texte[self.curseur..].iter().collect(),
        )
    }

    fn commence_a(&self, pos: usize, motif: &str) -> bool {
        let mut j = pos;
        for c in motif.chars() {
            if self.texte.get(j) != Some(&c) {
                return false;
            }
            j += 1;
        }
        true
    }

    fn finit_a(&self, pos: usize, motif: &str) -> bool {
        let n = motif.chars().count();
        n <= pos && self.commence_a(pos - n, motif)
    }

    /// Longueur du jeton atomique qui COMMENCE à `pos`, s’il y en a un.
    fn atome_a(&self, pos: usize) -> Option<usize> {
        JETONS_ATOMIQUES
            .iter()
            .find(|m| self.commence_a(pos, m))
            .map(|m| m.chars().count())
    }

    /// Longueur du jeton atomique qui FINIT à `pos`, s’il y en a un.
    fn atome_avant(&self, pos: usize) -> Option<usize> {
        JETONS_ATOMIQUES
            .iter()
            .find(|m| self.finit_a(pos, m))
            .map(|m| m.chars().count())
    }

    /// Insert : retire d’abord le jeton atomique qui commence au curseur, puis le
    /// texte remplace le caractère sous le curseur (ou s’ajoute en fin).
    fn inserer(&mut self, s: &str) {
        if let Some(n) = self.atome_a(self.curseur) {
            self.texte.drain(self.curseur..self.curseur + n);
        }

        let ajout: Vec<char> = s.chars().collect();
        let fin = (self.curseur + 1).min(self.texte.len());
        self.texte.splice(self.curseur..fin, ajout.iter().copied());

        self.curseur = (self.curseur + ajout.len()).min(self.texte.len());
    }

    /// DeleteBackward : retire le jeton atomique avant le curseur, sinon 1 caractère.
    fn effacer_arriere(&mut self) {
        if self.curseur == 0 {
            return;
        }
        let n = self.atome_avant(self.curseur).unwrap_or(1);
        self.texte.drain(self.curseur - n..self.curseur);
        self.curseur -= n;
    }

    fn gauche(&mut self) {
        if self.curseur == 0 {
            return;
        }
        self.curseur = match self.atome_avant(self.curseur) {
            Some(n) => self.curseur - n,
            None => self.curseur - 1,
        };
    }

    fn droite(&mut self) {
        if self.curseur >= self.texte.len() {
            return;
        }
        let pas = self.atome_a(self.curseur).unwrap_or(1);
        self.curseur = (self.curseur + pas).min(self.texte.len());
    }
}

/// Point d’entrée unique : applique une action d’édition au tampon.
pub fn edit(buffer: &mut EditBuffer, action: EditAction) {
    match action {
        EditAction::Insert(s) => buffer.inserer(&s),
        EditAction::DeleteBackward => buffer.effacer_arriere(),
        EditAction::MoveLeft => buffer.gauche(),
        EditAction::MoveRight => buffer.droite(),
    }
}
