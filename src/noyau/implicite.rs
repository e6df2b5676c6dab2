// src/noyau/implicite.rs
//
// Appel implicite : "sin 30" équivaut à "sin(30)".
//
// Règle : fonction PRÉFIXE immédiatement suivie d’un nombre (sans "(")
//   => on entoure le nombre : Function, OpenParen, Number, CloseParen.
// Les fonctions postfixes (² ³ ⁻¹) s’appliquent à ce qui PRÉCÈDE : jamais réécrites.
//
// Idempotent : après réécriture la fonction est suivie d’une "(" explicite.

use super::jetons::Token;

pub fn rewrite_implicit_calls(tokens: &[Token]) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len() + 2);
    let mut i = 0;

    while i < tokens.len() {
        let tok = &tokens[i];
        out.push(tok.clone());

        if let Token::Function(f) = tok {
            if !f.est_postfixe() {
                if let Some(n @ Token::Number(_)) = tokens.get(i + 1) {
                    out.push(Token::OpenParen);
                    out.push(n.clone());
                    out.push(Token::CloseParen);
                    i += 2;
                    continue;
                }
            }
        }

        i += 1;
    }

    out
}
