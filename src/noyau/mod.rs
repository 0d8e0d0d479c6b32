//! Noyau de calcul scientifique
//!
//! Organisation interne :
//! - erreurs.rs      : ErreurCalcul (typée) + Resultat
//! - decimal.rs      : décimal exact (BigInt scalé) + arrondis
//! - complexe.rs     : complexes (num-complex) + nettoyage des résidus
//! - nombres.rs      : Valeur (réel, complexe, décimal, entier) + promotion
//! - format.rs       : affichage des valeurs
//! - modes.rs        : angle / régime / complexe / précision / arrondi
//! - operateurs.rs   : table des opérateurs et constantes
//! - fonctions.rs    : registre des fonctions (arité, catégorie, doc)
//! - bibliotheque.rs : fonctions standard
//! - jetons.rs       : tokenisation
//! - rpn.rs          : shunting-yard (arités de fonctions annotées)
//! - trig.rs         : angles remarquables en deg / grad
//! - eval.rs         : évaluation RPN
//! - calculatrice.rs : façade (variables, historique, ans)

pub mod bibliotheque;
pub mod calculatrice;
pub mod complexe;
pub mod decimal;
pub mod erreurs;
pub mod eval;
pub mod fonctions;
pub mod format;
pub mod jetons;
pub mod modes;
pub mod nombres;
pub mod operateurs;
pub mod rpn;
pub mod trig;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique
pub use calculatrice::{
    Calculatrice, EntreeHistorique, Etape, ResultatCalcul, Validation, CAPACITE_HISTORIQUE,
};
pub use erreurs::{ErreurCalcul, ErreurNumerique, Resultat};
pub use fonctions::{Arite, Categorie};
pub use modes::{Angle, Arrondi, Modes, PolitiqueComplexe, Regime};
pub use nombres::Valeur;
