//! Calculatrice décimale : moteur (noyau), réglages, et front-end egui.
//!
//! Le noyau ne dépend ni de l’UI ni du système de fichiers :
//! `noyau::evaluate` et `noyau::edit` sont utilisables seuls.

pub mod app;
pub mod noyau;
pub mod reglages;
