// src/noyau/rpn.rs
//
// Shunting-yard -> RPN (postfix)
//
// Règles (gauche à droite, une pile d’attente + une file de sortie) :
// - Number              : sortie directe
// - Function postfixe   : sortie directe (son argument est déjà complet en sortie)
// - Function préfixe    : empilée ; ne ressort qu’avec sa ")" ou en fin d’entrée
// - Comma               : dépile vers la sortie jusqu’à "("
// - Operator t          : dépile les opérateurs de précédence >= t, puis empile t
// - "("                 : empilée
// - ")"                 : dépile jusqu’à "(", jette la "(", puis sort la fonction
//                         éventuellement au sommet (elle est “collée” à son groupe)
//
// NOTE: l’égalité de précédence dépile aussi pour "^" : 2^3^2 = (2^3)^2 = 64.
// C’est un choix assumé du calculateur (associativité à gauche partout),
// pas la convention mathématique habituelle.

use super::erreur::SyntaxError;
use super::jetons::Token;

/// Convertit une suite de jetons en RPN (notation polonaise inversée).
///
/// Exemple:
///   tokens: [Function(Sin), OpenParen, Number(30), CloseParen, Operator(Add), Number(1)]
///   rpn:    [Number(30), Function(Sin), Number(1), Operator(Add)]
///
/// Erreurs :
/// - entrée vide                      -> EmptyExpression
/// - dernier jeton = opérateur        -> TrailingOperator
/// - ")" sans "(" ou "(" jamais fermée -> UnmatchedParen
pub fn to_rpn(tokens: &[Token]) -> Result<Vec<Token>, SyntaxError> {
    if tokens.is_empty() {
        return Err(SyntaxError::EmptyExpression);
    }
    if matches!(tokens.last(), Some(Token::Operator(_))) {
        return Err(SyntaxError::TrailingOperator);
    }

    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut pile: Vec<Token> = Vec::new();

    for tok in tokens.iter().cloned() {
        match tok {
            Token::Number(_) => out.push(tok),

            Token::Function(f) if f.est_postfixe() => out.push(tok),

            Token::Function(_) | Token::OpenParen => pile.push(tok),

            Token::Comma => {
                // dépile jusqu’à "(" (laissée en place pour la ")" qui suit)
                while let Some(top) = pile.pop() {
                    if matches!(top, Token::OpenParen) {
                        pile.push(top);
                        break;
                    }
                    out.push(top);
                }
            }

            Token::Operator(op) => {
                while let Some(&Token::Operator(haut)) = pile.last() {
                    if haut.precedence() < op.precedence() {
                        break;
                    }
                    pile.pop();
                    out.push(Token::Operator(haut));
                }
                pile.push(tok);
            }

            Token::CloseParen => {
                let mut ouverte = false;
                while let Some(top) = pile.pop() {
                    if matches!(top, Token::OpenParen) {
                        ouverte = true;
                        break;
                    }
                    out.push(top);
                }
                if !ouverte {
                    return Err(SyntaxError::UnmatchedParen);
                }

                // fonction au sommet : elle s’applique au groupe qu’on vient de fermer
                if let Some(&Token::Function(f)) = pile.last() {
                    pile.pop();
                    out.push(Token::Function(f));
                }
            }
        }
    }

    // vide la pile
    while let Some(top) = pile.pop() {
        if matches!(top, Token::OpenParen) {
            return Err(SyntaxError::UnmatchedParen);
        }
        out.push(top);
    }

    Ok(out)
}
